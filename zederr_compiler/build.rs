// build.rs - TOML-driven compile-time limit generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    template: TemplateLimits,
    model: ModelLimits,
    spec: SpecLimits,
    input: InputLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct TemplateLimits {
    max_template_length: usize,
    max_actions_per_template: usize,
    max_commands_per_pipeline: usize,
    max_args_per_command: usize,
}

#[derive(serde::Deserialize)]
struct ModelLimits {
    max_arguments_per_error: usize,
    max_locales_per_field: usize,
    max_namespace_length: usize,
    max_domain_length: usize,
}

#[derive(serde::Deserialize)]
struct SpecLimits {
    max_errors_per_spec: usize,
}

#[derive(serde::Deserialize)]
struct InputLimits {
    max_file_size: u64,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_error_collection: usize,
    max_log_events_per_entry: usize,
    max_log_message_length: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=ZEDERR_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=ZEDERR_CONFIG_DIR");

    let profile = env::var("ZEDERR_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("ZEDERR_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Workspace root is the parent of the zederr_compiler directory
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_FILE_SIZE: u64 = 100_000_000;
    const ABSOLUTE_MAX_TEMPLATE_LENGTH: usize = 1_000_000;
    const ABSOLUTE_MAX_ERRORS: usize = 1_000_000;

    if config.input.max_file_size > ABSOLUTE_MAX_FILE_SIZE {
        panic!("LIMITS: max_file_size exceeds absolute maximum");
    }

    if config.template.max_template_length > ABSOLUTE_MAX_TEMPLATE_LENGTH {
        panic!("LIMITS: max_template_length exceeds absolute maximum");
    }

    if config.spec.max_errors_per_spec > ABSOLUTE_MAX_ERRORS {
        panic!("LIMITS: max_errors_per_spec exceeds absolute maximum");
    }

    // A pipeline needs room for the field command and its type marker
    if config.template.max_commands_per_pipeline < 2 {
        panic!("LIMITS: max_commands_per_pipeline must be at least 2");
    }

    if config.template.max_args_per_command < 2 {
        panic!("LIMITS: max_args_per_command must be at least 2");
    }

    if config.logging.max_log_events_per_entry > config.logging.log_buffer_size {
        panic!("LIMITS: max_log_events_per_entry exceeds log_buffer_size");
    }

    if profile == "production" && config.input.max_file_size > 10_000_000 {
        panic!("PRODUCTION: max_file_size too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod template {{
        pub const MAX_TEMPLATE_LENGTH: usize = {};
        pub const MAX_ACTIONS_PER_TEMPLATE: usize = {};
        pub const MAX_COMMANDS_PER_PIPELINE: usize = {};
        pub const MAX_ARGS_PER_COMMAND: usize = {};
    }}

    pub mod model {{
        pub const MAX_ARGUMENTS_PER_ERROR: usize = {};
        pub const MAX_LOCALES_PER_FIELD: usize = {};
        pub const MAX_NAMESPACE_LENGTH: usize = {};
        pub const MAX_DOMAIN_LENGTH: usize = {};
    }}

    pub mod spec {{
        pub const MAX_ERRORS_PER_SPEC: usize = {};
    }}

    pub mod input {{
        pub const MAX_FILE_SIZE: u64 = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_ERROR_COLLECTION: usize = {};
        pub const MAX_LOG_EVENTS_PER_ENTRY: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
    }}
}}
"#,
        profile,
        // Template
        config.template.max_template_length,
        config.template.max_actions_per_template,
        config.template.max_commands_per_pipeline,
        config.template.max_args_per_command,
        // Model
        config.model.max_arguments_per_error,
        config.model.max_locales_per_field,
        config.model.max_namespace_length,
        config.model.max_domain_length,
        // Spec
        config.spec.max_errors_per_spec,
        // Input
        config.input.max_file_size,
        // Logging
        config.logging.log_buffer_size,
        config.logging.max_error_collection,
        config.logging.max_log_events_per_entry,
        config.logging.max_log_message_length,
    );

    fs::write(output_path, constants_code).unwrap();
}
