//! Argument, locale, status code and localization model
//!
//! Every value here is validated on construction. An `ErrorDefinition` is only
//! produced by the builder and never changes afterwards.

pub mod argument;
pub mod argument_type;
pub mod error;
pub mod error_definition;
pub mod locale;
pub mod localization;
pub mod naming;
pub mod protocol_code;

pub use argument::Argument;
pub use argument_type::ArgumentType;
pub use error::{ModelError, ModelResult};
pub use error_definition::ErrorDefinition;
pub use locale::LocaleTag;
pub use localization::{Localization, TextField, Translations};
pub use protocol_code::ProtocolCode;
