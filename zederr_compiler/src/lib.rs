// Internal modules
pub mod builder;
pub mod config;
pub mod input;
#[macro_use]
pub mod logging;
pub mod model;
pub mod spec;
pub mod template;
pub mod utils;

// Re-export key types for library consumers
pub use builder::{BuildError, BuildWarning, ErrorBuilder, ErrorInput};
pub use input::{from_json_str, from_toml_str, load_file, InputError, LoadOptions};
pub use model::{Argument, ArgumentType, ErrorDefinition, LocaleTag, Localization, ProtocolCode};
pub use spec::{assemble, SpecError, SpecHeader, Specification};
pub use template::{extract_fields, Extraction, TemplateError, TemplateOptions};
