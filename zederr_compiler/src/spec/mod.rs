//! Specification assembly and derived queries

pub mod assembler;
pub mod error;
pub mod specification;

pub use assembler::{assemble, is_fqdn, SpecHeader, SpecificationAssembler, SUPPORTED_SPEC_VERSIONS};
pub use error::{SpecError, SpecResult};
pub use specification::Specification;
