//! Closed set of argument types

use super::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type of a message argument. `Unknown` is what the template analyzer infers
/// when no type marker is present.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentType {
    #[default]
    Unknown,
    String,
    Int,
    Float,
    Bool,
    Timestamp,
}

impl ArgumentType {
    pub const ALL: [ArgumentType; 6] = [
        ArgumentType::Unknown,
        ArgumentType::String,
        ArgumentType::Int,
        ArgumentType::Float,
        ArgumentType::Bool,
        ArgumentType::Timestamp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArgumentType::Unknown => "unknown",
            ArgumentType::String => "string",
            ArgumentType::Int => "int",
            ArgumentType::Float => "float",
            ArgumentType::Bool => "bool",
            ArgumentType::Timestamp => "timestamp",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ArgumentType::Unknown)
    }

    /// Two types agree when equal or when either side is still unknown
    pub fn is_compatible_with(&self, other: ArgumentType) -> bool {
        self.is_unknown() || other.is_unknown() || *self == other
    }

    /// The more specific of two compatible types
    pub fn unify(self, other: ArgumentType) -> Option<ArgumentType> {
        match (self, other) {
            (ArgumentType::Unknown, t) | (t, ArgumentType::Unknown) => Some(t),
            (a, b) if a == b => Some(a),
            _ => None,
        }
    }
}

impl fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ArgumentType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        ArgumentType::ALL
            .into_iter()
            .find(|t| t.as_str() == lowered)
            .ok_or_else(|| ModelError::InvalidArgumentType {
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_case_insensitive_parsing() {
        assert_eq!("string".parse::<ArgumentType>(), Ok(ArgumentType::String));
        assert_eq!("TIMESTAMP".parse::<ArgumentType>(), Ok(ArgumentType::Timestamp));
        assert_eq!("Bool".parse::<ArgumentType>(), Ok(ArgumentType::Bool));
        assert_eq!("unknown".parse::<ArgumentType>(), Ok(ArgumentType::Unknown));
    }

    #[test]
    fn test_unrecognized_type_is_echoed() {
        assert_matches!(
            "decimal".parse::<ArgumentType>(),
            Err(ModelError::InvalidArgumentType { value }) if value == "decimal"
        );
        assert_matches!("".parse::<ArgumentType>(), Err(ModelError::InvalidArgumentType { .. }));
    }

    #[test]
    fn test_unify() {
        assert_eq!(
            ArgumentType::Unknown.unify(ArgumentType::Int),
            Some(ArgumentType::Int)
        );
        assert_eq!(
            ArgumentType::Bool.unify(ArgumentType::Bool),
            Some(ArgumentType::Bool)
        );
        assert_eq!(ArgumentType::Bool.unify(ArgumentType::Int), None);
        assert!(ArgumentType::String.is_compatible_with(ArgumentType::Unknown));
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&ArgumentType::Timestamp).unwrap();
        assert_eq!(json, "\"timestamp\"");
    }
}
