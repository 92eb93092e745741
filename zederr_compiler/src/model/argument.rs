//! Argument declarations

use super::argument_type::ArgumentType;
use super::error::{ModelError, ModelResult};
use super::naming;
use serde::{Deserialize, Serialize};

/// A named, typed placeholder that message templates may reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    name: String,
    description: String,
    #[serde(rename = "type")]
    arg_type: ArgumentType,
}

impl Argument {
    /// Validate and create an argument from raw input
    pub fn new(name: &str, description: &str, type_name: &str) -> ModelResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ModelError::empty_value("argument name"));
        }
        if !naming::is_valid_text(name) {
            return Err(ModelError::invalid_text("argument name", name));
        }
        if !naming::is_identifier(name) {
            return Err(ModelError::invalid_identifier("argument name", name));
        }

        let description = description.trim();
        if description.is_empty() {
            return Err(ModelError::empty_value("argument description"));
        }
        if !naming::is_valid_text(description) {
            return Err(ModelError::invalid_text("argument description", description));
        }

        let arg_type = type_name.trim().parse()?;

        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            arg_type,
        })
    }

    /// Same argument with a different type
    pub fn with_type(&self, arg_type: ArgumentType) -> Self {
        Self {
            arg_type,
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn arg_type(&self) -> ArgumentType {
        self.arg_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_valid_argument_is_trimmed() {
        let arg = Argument::new("  UserId ", " The user id ", "String").unwrap();
        assert_eq!(arg.name(), "UserId");
        assert_eq!(arg.description(), "The user id");
        assert_eq!(arg.arg_type(), ArgumentType::String);
    }

    #[test]
    fn test_rejects_empty_fields() {
        assert_matches!(
            Argument::new(" ", "desc", "string"),
            Err(ModelError::EmptyValue { field }) if field == "argument name"
        );
        assert_matches!(
            Argument::new("Name", "  ", "string"),
            Err(ModelError::EmptyValue { field }) if field == "argument description"
        );
    }

    #[test]
    fn test_rejects_bad_identifier() {
        assert_matches!(
            Argument::new("user id", "desc", "string"),
            Err(ModelError::InvalidIdentifier { value, .. }) if value == "user id"
        );
        assert_matches!(
            Argument::new("_Name", "desc", "string"),
            Err(ModelError::InvalidIdentifier { .. })
        );
    }

    #[test]
    fn test_rejects_unknown_type() {
        assert_matches!(
            Argument::new("Name", "desc", "uuid"),
            Err(ModelError::InvalidArgumentType { value }) if value == "uuid"
        );
        assert_matches!(
            Argument::new("Name", "desc", ""),
            Err(ModelError::InvalidArgumentType { .. })
        );
    }

    #[test]
    fn test_with_type() {
        let arg = Argument::new("Count", "How many", "unknown").unwrap();
        assert_eq!(arg.with_type(ArgumentType::Int).arg_type(), ArgumentType::Int);
        assert_eq!(arg.arg_type(), ArgumentType::Unknown);
    }
}
