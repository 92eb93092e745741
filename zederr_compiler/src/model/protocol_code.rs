//! gRPC-style protocol status codes

use super::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest code in the conventional taxonomy
pub const MAX_KNOWN_CODE: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum ProtocolCode {
    Ok,
    Cancelled,
    Unknown,
    InvalidArgument,
    DeadlineExceeded,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    ResourceExhausted,
    FailedPrecondition,
    Aborted,
    OutOfRange,
    Unimplemented,
    Internal,
    Unavailable,
    DataLoss,
    Unauthenticated,
    /// A number outside the conventional taxonomy
    Unrecognized(u32),
}

const KNOWN: [(ProtocolCode, &str); 17] = [
    (ProtocolCode::Ok, "OK"),
    (ProtocolCode::Cancelled, "CANCELLED"),
    (ProtocolCode::Unknown, "UNKNOWN"),
    (ProtocolCode::InvalidArgument, "INVALID_ARGUMENT"),
    (ProtocolCode::DeadlineExceeded, "DEADLINE_EXCEEDED"),
    (ProtocolCode::NotFound, "NOT_FOUND"),
    (ProtocolCode::AlreadyExists, "ALREADY_EXISTS"),
    (ProtocolCode::PermissionDenied, "PERMISSION_DENIED"),
    (ProtocolCode::ResourceExhausted, "RESOURCE_EXHAUSTED"),
    (ProtocolCode::FailedPrecondition, "FAILED_PRECONDITION"),
    (ProtocolCode::Aborted, "ABORTED"),
    (ProtocolCode::OutOfRange, "OUT_OF_RANGE"),
    (ProtocolCode::Unimplemented, "UNIMPLEMENTED"),
    (ProtocolCode::Internal, "INTERNAL"),
    (ProtocolCode::Unavailable, "UNAVAILABLE"),
    (ProtocolCode::DataLoss, "DATA_LOSS"),
    (ProtocolCode::Unauthenticated, "UNAUTHENTICATED"),
];

impl ProtocolCode {
    pub fn from_u32(value: u32) -> Self {
        KNOWN
            .get(value as usize)
            .map(|(code, _)| *code)
            .unwrap_or(ProtocolCode::Unrecognized(value))
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            ProtocolCode::Unrecognized(value) => *value,
            known => KNOWN
                .iter()
                .position(|(code, _)| code == known)
                .map(|index| index as u32)
                .unwrap_or_default(),
        }
    }

    /// Resolve a code by name: `NOT_FOUND`, `NotFound`, `not-found` and
    /// `not found` are all accepted. `CANCELED` is an alias of `CANCELLED`.
    pub fn from_name(name: &str) -> ModelResult<Self> {
        let squashed: String = name
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, '_' | '-' | ' '))
            .map(|ch| ch.to_ascii_uppercase())
            .collect();

        if squashed == "CANCELED" {
            return Ok(ProtocolCode::Cancelled);
        }

        KNOWN
            .iter()
            .find(|(_, known)| known.replace('_', "") == squashed)
            .map(|(code, _)| *code)
            .ok_or_else(|| ModelError::InvalidProtocolCode {
                value: name.to_string(),
            })
    }

    /// Canonical upper-snake name, if the code is part of the taxonomy
    pub fn name(&self) -> Option<&'static str> {
        match self {
            ProtocolCode::Unrecognized(_) => None,
            known => KNOWN
                .iter()
                .find(|(code, _)| code == known)
                .map(|(_, name)| *name),
        }
    }

    /// The success sentinel, which an error definition may not use
    pub fn is_ok(&self) -> bool {
        matches!(self, ProtocolCode::Ok)
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, ProtocolCode::Unrecognized(_))
    }
}

impl From<u32> for ProtocolCode {
    fn from(value: u32) -> Self {
        Self::from_u32(value)
    }
}

impl From<ProtocolCode> for u32 {
    fn from(code: ProtocolCode) -> Self {
        code.as_u32()
    }
}

impl fmt::Display for ProtocolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{}", self.as_u32()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_numeric_mapping() {
        assert_eq!(ProtocolCode::from_u32(0), ProtocolCode::Ok);
        assert_eq!(ProtocolCode::from_u32(5), ProtocolCode::NotFound);
        assert_eq!(ProtocolCode::from_u32(16), ProtocolCode::Unauthenticated);
        assert_eq!(ProtocolCode::from_u32(17), ProtocolCode::Unrecognized(17));
        assert_eq!(ProtocolCode::NotFound.as_u32(), 5);
        assert_eq!(ProtocolCode::Unrecognized(99).as_u32(), 99);
    }

    #[test]
    fn test_name_lookup() {
        assert_eq!(ProtocolCode::from_name("NOT_FOUND"), Ok(ProtocolCode::NotFound));
        assert_eq!(ProtocolCode::from_name("NotFound"), Ok(ProtocolCode::NotFound));
        assert_eq!(ProtocolCode::from_name("not_found"), Ok(ProtocolCode::NotFound));
        assert_eq!(ProtocolCode::from_name("Canceled"), Ok(ProtocolCode::Cancelled));
        assert_matches!(
            ProtocolCode::from_name("TEAPOT"),
            Err(ModelError::InvalidProtocolCode { value }) if value == "TEAPOT"
        );
    }

    #[test]
    fn test_display_and_flags() {
        assert_eq!(ProtocolCode::PermissionDenied.to_string(), "PERMISSION_DENIED");
        assert_eq!(ProtocolCode::Unrecognized(42).to_string(), "42");
        assert!(ProtocolCode::Ok.is_ok());
        assert!(!ProtocolCode::Unrecognized(42).is_recognized());
    }

    #[test]
    fn test_serde_as_number() {
        assert_eq!(serde_json::to_string(&ProtocolCode::NotFound).unwrap(), "5");
        let code: ProtocolCode = serde_json::from_str("3").unwrap();
        assert_eq!(code, ProtocolCode::InvalidArgument);
    }
}
