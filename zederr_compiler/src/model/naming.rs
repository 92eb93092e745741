//! Identifier grammar, casing normalization and text checks

use regex::Regex;
use std::sync::OnceLock;

/// Grammar shared by error codes and argument names
pub const IDENTIFIER_PATTERN: &str = "^(([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9])?$";

fn identifier_regex() -> Option<&'static Regex> {
    static IDENTIFIER_RE: OnceLock<Option<Regex>> = OnceLock::new();
    IDENTIFIER_RE
        .get_or_init(|| Regex::new(IDENTIFIER_PATTERN).ok())
        .as_ref()
}

/// Whether `value` matches the identifier grammar.
///
/// The grammar itself accepts the empty string; callers check emptiness first.
pub fn is_identifier(value: &str) -> bool {
    identifier_regex().is_some_and(|re| re.is_match(value))
}

/// Text is valid when it contains no NUL bytes and no U+FFFD replacement
/// characters left behind by a lossy decode.
pub fn is_valid_text(value: &str) -> bool {
    !value
        .chars()
        .any(|ch| ch == '\0' || ch == char::REPLACEMENT_CHARACTER)
}

/// Normalize an error code to UpperCamelCase.
///
/// `_`, `-`, `.` and spaces are word separators and are dropped. A digit also
/// starts a new word. Inside a run of capitals only the first one is kept, so
/// `HTTPError` becomes `Httperror`. Any other character is dropped.
pub fn to_camel(value: &str) -> String {
    let value = value.trim();
    let mut out = String::with_capacity(value.len());
    let mut cap_next = true;
    let mut prev_is_cap = false;

    for (i, byte) in value.bytes().enumerate() {
        let is_cap = byte.is_ascii_uppercase();
        let is_low = byte.is_ascii_lowercase();

        let mapped = if cap_next && is_low {
            byte.to_ascii_uppercase()
        } else if i == 0 && is_cap && !cap_next {
            byte.to_ascii_lowercase()
        } else if prev_is_cap && is_cap && !cap_next {
            byte.to_ascii_lowercase()
        } else {
            byte
        };
        prev_is_cap = is_cap;

        if is_cap || is_low {
            out.push(mapped as char);
            cap_next = false;
        } else if byte.is_ascii_digit() {
            out.push(mapped as char);
            cap_next = true;
        } else {
            cap_next = matches!(byte, b'_' | b' ' | b'-' | b'.');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_grammar() {
        assert!(is_identifier("Param1"));
        assert!(is_identifier("user-id.v2"));
        assert!(is_identifier("a"));
        assert!(is_identifier(""));
        assert!(!is_identifier("-leading"));
        assert!(!is_identifier("trailing_"));
        assert!(!is_identifier("with space"));
        assert!(!is_identifier("ümlaut"));
    }

    #[test]
    fn test_to_camel() {
        assert_eq!(to_camel("not_found"), "NotFound");
        assert_eq!(to_camel("user-not-found"), "UserNotFound");
        assert_eq!(to_camel("already exists"), "AlreadyExists");
        assert_eq!(to_camel("NotFound"), "NotFound");
        assert_eq!(to_camel("HTTPError"), "Httperror");
        assert_eq!(to_camel("error2fa"), "Error2Fa");
        assert_eq!(to_camel("  padded  "), "Padded");
        assert_eq!(to_camel("__"), "");
    }

    #[test]
    fn test_to_camel_drops_non_ascii() {
        assert_eq!(to_camel("café_error"), "CafError");
    }

    #[test]
    fn test_text_validity() {
        assert!(is_valid_text("Пользователь не найден"));
        assert!(!is_valid_text("bad\0text"));
        assert!(!is_valid_text("lossy \u{FFFD}"));
    }
}
