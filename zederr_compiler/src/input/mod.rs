//! Specification documents
//!
//! Documents are TOML or JSON with the same layout: a header
//! (`spec_version`, `default_locale`, `domain`, `namespace`) and an ordered
//! `errors` array.

pub mod error;
pub mod loader;
pub mod raw;

pub use error::{InputError, InputResult};
pub use loader::{
    from_json_str, from_json_str_with, from_toml_str, from_toml_str_with, load_file,
    load_file_with, parse_json_str, parse_toml_str, read_document, DocumentFormat, LoadOptions,
};
pub use raw::{RawArgument, RawErrorEntry, RawLocalization, RawProtocolCode, RawSpecification};
