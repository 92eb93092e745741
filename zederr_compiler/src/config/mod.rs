//! Configuration module for the zederr compiler
//!
//! Compile-time limits are generated by `build.rs` from `config/<profile>.toml`;
//! runtime preferences are read from `ZEDERR_*` environment variables.

// Include generated constants from build.rs
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("ZEDERR_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("ZEDERR_CONFIG_DIR").unwrap_or("config")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_limits_are_usable() {
        assert!(compile_time::template::MAX_COMMANDS_PER_PIPELINE >= 2);
        assert!(compile_time::template::MAX_ARGS_PER_COMMAND >= 2);
        assert!(compile_time::model::MAX_NAMESPACE_LENGTH > 0);
        assert!(compile_time::input::MAX_FILE_SIZE > 0);
        assert!(
            compile_time::logging::MAX_LOG_EVENTS_PER_ENTRY
                <= compile_time::logging::LOG_BUFFER_SIZE
        );
    }

    #[test]
    fn test_build_info() {
        assert!(build_info::source_info().ends_with(".toml"));
    }
}
