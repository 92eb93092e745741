//! Logging configuration
//!
//! Buffer and message limits come from the build profile and cannot be changed
//! at runtime. Output preferences come from `LoggingPreferences`.

use crate::config::compile_time::logging::*;
use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

type EventsLogLevel = crate::logging::events::LogLevel;
type RuntimeLogLevel = crate::config::runtime::LogLevel;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Initialize runtime preferences
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    validate_preferences(&preferences)?;

    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime preferences already initialized")?;

    Ok(())
}

/// Get runtime preferences (with fallback to defaults)
fn get_runtime_preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

fn validate_preferences(preferences: &LoggingPreferences) -> Result<(), String> {
    if preferences.use_structured_logging && !preferences.enable_console_logging {
        return Err(
            "Structured logging requires console logging to be enabled".to_string(),
        );
    }

    Ok(())
}

pub fn get_min_log_level() -> EventsLogLevel {
    get_runtime_preferences().min_log_level.to_events_log_level()
}

pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

pub fn use_console_logging() -> bool {
    get_runtime_preferences().enable_console_logging
}

pub fn forward_to_tracing() -> bool {
    get_runtime_preferences().forward_to_tracing
}

pub fn use_cargo_style_output() -> bool {
    get_runtime_preferences().enable_cargo_style_output
}

/// Whether events are tagged with the error entry currently being built
pub fn include_entry_context() -> bool {
    get_runtime_preferences().include_entry_context
}

/// Get error buffer size (compile-time constant)
pub fn get_error_buffer_size() -> usize {
    LOG_BUFFER_SIZE
}

pub fn get_max_log_events_per_entry() -> usize {
    MAX_LOG_EVENTS_PER_ENTRY
}

pub fn get_max_log_message_length() -> usize {
    MAX_LOG_MESSAGE_LENGTH
}

/// Validate current configuration settings
pub fn validate_config() -> Result<(), String> {
    if LOG_BUFFER_SIZE < 100 {
        return Err(format!("Log buffer size too small: {}", LOG_BUFFER_SIZE));
    }

    if MAX_LOG_EVENTS_PER_ENTRY > LOG_BUFFER_SIZE {
        return Err("Max log events per entry exceeds total buffer size".to_string());
    }

    if MAX_ERROR_COLLECTION > LOG_BUFFER_SIZE {
        return Err("Error collection limit exceeds total buffer size".to_string());
    }

    if let Some(preferences) = RUNTIME_PREFERENCES.get() {
        validate_preferences(preferences)?;
    }

    Ok(())
}

/// Get configuration summary for diagnostics
pub fn get_config_summary() -> String {
    let preferences = get_runtime_preferences();

    format!(
        "Logging Configuration:\n\
         === Limits (Compile-time) ===\n\
         - Log buffer size: {}\n\
         - Max events per entry: {}\n\
         - Max collected errors: {}\n\
         - Max message length: {}\n\
         === Preferences (Runtime) ===\n\
         - Min log level: {:?}\n\
         - Structured logging: {}\n\
         - Console logging: {}\n\
         - Forward to tracing: {}\n\
         - Cargo-style output: {}\n\
         - Include entry context: {}",
        LOG_BUFFER_SIZE,
        MAX_LOG_EVENTS_PER_ENTRY,
        MAX_ERROR_COLLECTION,
        MAX_LOG_MESSAGE_LENGTH,
        preferences.min_log_level,
        preferences.use_structured_logging,
        preferences.enable_console_logging,
        preferences.forward_to_tracing,
        preferences.enable_cargo_style_output,
        preferences.include_entry_context,
    )
}

/// Recommended preferences while authoring error specifications
pub fn get_development_preferences() -> LoggingPreferences {
    LoggingPreferences {
        use_structured_logging: false,
        enable_console_logging: true,
        forward_to_tracing: true,
        min_log_level: RuntimeLogLevel::Debug,
        enable_cargo_style_output: true,
        include_entry_context: true,
    }
}

/// Recommended preferences for code generation pipelines
pub fn get_production_preferences() -> LoggingPreferences {
    LoggingPreferences {
        use_structured_logging: true,
        enable_console_logging: true,
        forward_to_tracing: true,
        min_log_level: RuntimeLogLevel::Warning,
        enable_cargo_style_output: false,
        include_entry_context: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(validate_config().is_ok());
    }

    #[test]
    fn test_preference_validation() {
        let invalid = LoggingPreferences {
            use_structured_logging: true,
            enable_console_logging: false,
            ..Default::default()
        };
        assert!(validate_preferences(&invalid).is_err());

        assert!(validate_preferences(&get_development_preferences()).is_ok());
        assert!(validate_preferences(&get_production_preferences()).is_ok());
    }

    #[test]
    fn test_compile_time_limits() {
        assert!(get_error_buffer_size() > 0);
        assert!(get_max_log_events_per_entry() <= get_error_buffer_size());
        assert!(get_max_log_message_length() > 0);
    }

    #[test]
    fn test_config_summary() {
        let summary = get_config_summary();
        assert!(summary.contains("Max events per entry"));
        assert!(summary.contains("Forward to tracing"));
    }
}
