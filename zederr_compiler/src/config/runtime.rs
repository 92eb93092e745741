// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;

/// Type markers recognised inside message templates when nothing else is configured
pub const DEFAULT_TYPE_MARKERS: &[&str] = &["string", "int", "float", "bool", "timestamp"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePreferences {
    /// Opening action delimiter
    pub left_delimiter: String,

    /// Closing action delimiter
    pub right_delimiter: String,

    /// Whether to dump parsed template trees at debug level
    pub debug_parse_trees: bool,

    /// Marker function names accepted in templates (e.g. `string` in `{{ string .Name }}`)
    pub type_markers: Vec<String>,
}

impl Default for TemplatePreferences {
    fn default() -> Self {
        Self {
            left_delimiter: env::var(env_vars::TEMPLATE_LEFT_DELIMITER)
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "{{".to_string()),
            right_delimiter: env::var(env_vars::TEMPLATE_RIGHT_DELIMITER)
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "}}".to_string()),
            debug_parse_trees: env::var(env_vars::TEMPLATE_DEBUG_PARSE_TREES)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            type_markers: env::var(env_vars::TEMPLATE_TYPE_MARKERS)
                .ok()
                .map(|v| parse_marker_list(&v))
                .filter(|markers| !markers.is_empty())
                .unwrap_or_else(|| {
                    DEFAULT_TYPE_MARKERS
                        .iter()
                        .map(|marker| marker.to_string())
                        .collect()
                }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderPreferences {
    /// Whether out-of-range status codes are reported through the logging system
    pub log_range_warnings: bool,

    /// Whether out-of-range status codes fail the build instead of warning
    pub strict_status_codes: bool,
}

impl Default for BuilderPreferences {
    fn default() -> Self {
        Self {
            log_range_warnings: env::var(env_vars::BUILDER_LOG_RANGE_WARNINGS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            strict_status_codes: env::var(env_vars::BUILDER_STRICT_STATUS_CODES)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Whether to forward events to the `tracing` facade
    pub forward_to_tracing: bool,

    /// Preferred minimum log level
    pub min_log_level: LogLevel,

    /// Whether to enable cargo-style error reporting
    pub enable_cargo_style_output: bool,

    /// Whether to tag events with the error entry being built
    pub include_entry_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var(env_vars::LOGGING_ENABLE_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            forward_to_tracing: env::var(env_vars::LOGGING_FORWARD_TO_TRACING)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            enable_cargo_style_output: env::var(env_vars::LOGGING_CARGO_STYLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            include_entry_context: env::var(env_vars::LOGGING_INCLUDE_ENTRY_CONTEXT)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel for compatibility
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.trim().to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Parse a comma separated marker list, dropping blanks
fn parse_marker_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|marker| !marker.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub template: TemplatePreferences,
    pub builder: BuilderPreferences,
    pub logging: LoggingPreferences,
}

/// Environment variable names for configuration
pub mod env_vars {
    // Template
    pub const TEMPLATE_LEFT_DELIMITER: &str = "ZEDERR_TEMPLATE_LEFT_DELIMITER";
    pub const TEMPLATE_RIGHT_DELIMITER: &str = "ZEDERR_TEMPLATE_RIGHT_DELIMITER";
    pub const TEMPLATE_DEBUG_PARSE_TREES: &str = "ZEDERR_TEMPLATE_DEBUG_PARSE_TREES";
    pub const TEMPLATE_TYPE_MARKERS: &str = "ZEDERR_TEMPLATE_TYPE_MARKERS";

    // Builder
    pub const BUILDER_LOG_RANGE_WARNINGS: &str = "ZEDERR_BUILDER_LOG_RANGE_WARNINGS";
    pub const BUILDER_STRICT_STATUS_CODES: &str = "ZEDERR_BUILDER_STRICT_STATUS_CODES";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "ZEDERR_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "ZEDERR_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_FORWARD_TO_TRACING: &str = "ZEDERR_LOGGING_FORWARD_TO_TRACING";
    pub const LOGGING_MIN_LEVEL: &str = "ZEDERR_LOGGING_MIN_LEVEL";
    pub const LOGGING_CARGO_STYLE: &str = "ZEDERR_LOGGING_CARGO_STYLE";
    pub const LOGGING_INCLUDE_ENTRY_CONTEXT: &str = "ZEDERR_LOGGING_INCLUDE_ENTRY_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("0"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("warning"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level(" info "), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_marker_list_parsing() {
        assert_eq!(
            parse_marker_list("string, int,,bool "),
            vec!["string".to_string(), "int".to_string(), "bool".to_string()]
        );
        assert!(parse_marker_list(" , ").is_empty());
    }

    #[test]
    fn test_default_template_preferences() {
        let prefs = TemplatePreferences::default();
        assert!(!prefs.left_delimiter.is_empty());
        assert!(!prefs.right_delimiter.is_empty());
        assert!(!prefs.type_markers.is_empty());
    }

    #[test]
    fn test_env_var_names_exist() {
        assert!(env_vars::LOGGING_MIN_LEVEL.starts_with("ZEDERR_"));
        assert!(env_vars::TEMPLATE_TYPE_MARKERS.starts_with("ZEDERR_"));
        assert!(env_vars::BUILDER_STRICT_STATUS_CODES.starts_with("ZEDERR_"));
    }
}
