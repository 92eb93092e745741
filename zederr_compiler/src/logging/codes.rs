//! Consolidated error codes and classification system
//!
//! Single source of truth for every diagnostic code the compiler emits, together
//! with the metadata used to classify and report it.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for error, warning and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a diagnostic code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Message template parsing and field extraction
pub mod template {
    use super::Code;

    pub const INVALID_DELIMITERS: Code = Code::new("E010");
    pub const UNTERMINATED_ACTION: Code = Code::new("E011");
    pub const UNTERMINATED_QUOTE: Code = Code::new("E012");
    pub const UNTERMINATED_COMMENT: Code = Code::new("E013");
    pub const UNEXPECTED_CHARACTER: Code = Code::new("E014");
    pub const UNSUPPORTED_CONSTRUCT: Code = Code::new("E015");
    pub const UNDEFINED_FUNCTION: Code = Code::new("E016");
    pub const MISSING_COMMAND: Code = Code::new("E017");
    pub const INVALID_NUMBER: Code = Code::new("E018");
    pub const TEMPLATE_LIMIT_EXCEEDED: Code = Code::new("E019");

    // Field extraction
    pub const MULTI_SEGMENT_FIELD: Code = Code::new("E020");
    pub const MISSING_FIELD_NAME: Code = Code::new("E021");
    pub const EXPECTED_FIELD_REFERENCE: Code = Code::new("E022");
    pub const EXPECTED_TYPE_MARKER: Code = Code::new("E023");
    pub const UNKNOWN_TYPE_MARKER: Code = Code::new("E024");
    pub const CONFLICTING_FIELD_TYPE: Code = Code::new("E025");
}

/// Argument, locale, status code and localization model codes
pub mod model {
    use super::Code;

    pub const EMPTY_VALUE: Code = Code::new("E040");
    pub const INVALID_TEXT: Code = Code::new("E041");
    pub const INVALID_IDENTIFIER: Code = Code::new("E042");
    pub const INVALID_ARGUMENT_TYPE: Code = Code::new("E043");
    pub const INVALID_LOCALE: Code = Code::new("E044");
    pub const INVALID_PROTOCOL_CODE: Code = Code::new("E045");
    pub const MODEL_LIMIT_EXCEEDED: Code = Code::new("E046");
}

/// Error definition builder codes
pub mod builder {
    use super::Code;

    pub const INVALID_ERROR_CODE: Code = Code::new("E060");
    pub const DUPLICATE_ERROR_CODE: Code = Code::new("E061");
    pub const EMPTY_REQUIRED_FIELD: Code = Code::new("E062");
    pub const INVALID_FIELD_TEXT: Code = Code::new("E063");
    pub const SUCCESS_PROTOCOL_CODE: Code = Code::new("E064");
    pub const DUPLICATE_ARGUMENT: Code = Code::new("E065");
    pub const UNKNOWN_LOCALIZED_ARGUMENT: Code = Code::new("E066");
    pub const UNDECLARED_TEMPLATE_ARGUMENT: Code = Code::new("E067");
    pub const INVALID_MESSAGE_TEMPLATE: Code = Code::new("E068");
    pub const ARGUMENT_TYPE_CONFLICT: Code = Code::new("E069");
    pub const ORPHAN_DEPRECATION_TRANSLATION: Code = Code::new("E070");
    pub const STATUS_CODE_OUT_OF_RANGE: Code = Code::new("E071");
    pub const BUILDER_LIMIT_EXCEEDED: Code = Code::new("E072");
}

/// Specification assembly codes
pub mod spec {
    use super::Code;

    pub const UNSUPPORTED_SPEC_VERSION: Code = Code::new("E080");
    pub const INVALID_DEFAULT_LOCALE: Code = Code::new("E081");
    pub const EMPTY_SPECIFICATION: Code = Code::new("E082");
    pub const INVALID_DOMAIN: Code = Code::new("E083");
    pub const INVALID_NAMESPACE: Code = Code::new("E084");
    pub const ENTRY_BUILD_FAILURE: Code = Code::new("E085");
    pub const SPEC_LIMIT_EXCEEDED: Code = Code::new("E086");
}

/// Document loading codes
pub mod input {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E100");
    pub const EMPTY_FILE: Code = Code::new("E101");
    pub const FILE_TOO_LARGE: Code = Code::new("E102");
    pub const INVALID_ENCODING: Code = Code::new("E103");
    pub const UNSUPPORTED_FORMAT: Code = Code::new("E104");
    pub const DOCUMENT_PARSE_ERROR: Code = Code::new("E105");
    pub const IO_ERROR: Code = Code::new("E106");
}

/// Non-fatal warning codes
pub mod warning {
    use super::Code;

    pub const PROTOCOL_CODE_OUT_OF_RANGE: Code = Code::new("W001");
    pub const HTTP_CODE_OUT_OF_RANGE: Code = Code::new("W002");
    pub const COLLECTION_LIMIT_REACHED: Code = Code::new("W003");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const TEMPLATE_PARSED: Code = Code::new("I010");
    pub const FIELDS_EXTRACTED: Code = Code::new("I011");
    pub const ERROR_DEFINITION_BUILT: Code = Code::new("I060");
    pub const SPECIFICATION_ASSEMBLED: Code = Code::new("I080");
    pub const DOCUMENT_LOADED: Code = Code::new("I100");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

const REGISTRY_ENTRIES: &[ErrorMetadata] = &[
    // System
    ErrorMetadata::new(
        "ERR001",
        "System",
        Severity::Critical,
        false,
        true,
        "Critical internal compiler error",
        "File a bug report with the specification that triggered it",
    ),
    ErrorMetadata::new(
        "ERR002",
        "System",
        Severity::Critical,
        false,
        true,
        "Logging or configuration initialization failure",
        "Check ZEDERR_* environment variables and the build profile",
    ),
    // Template
    ErrorMetadata::new(
        "E010",
        "Template",
        Severity::High,
        false,
        false,
        "Template delimiters are empty or identical",
        "Configure distinct, non-empty left and right delimiters",
    ),
    ErrorMetadata::new(
        "E011",
        "Template",
        Severity::High,
        true,
        false,
        "Template action is not closed",
        "Add the closing delimiter to the action",
    ),
    ErrorMetadata::new(
        "E012",
        "Template",
        Severity::High,
        true,
        false,
        "Quoted literal inside an action is not terminated",
        "Close the string, raw string or character literal",
    ),
    ErrorMetadata::new(
        "E013",
        "Template",
        Severity::High,
        true,
        false,
        "Template comment is not terminated or not followed by the closing delimiter",
        "Close the comment with */ immediately before the closing delimiter",
    ),
    ErrorMetadata::new(
        "E014",
        "Template",
        Severity::High,
        true,
        false,
        "Unexpected character inside a template action",
        "Remove the character or move it outside the action",
    ),
    ErrorMetadata::new(
        "E015",
        "Template",
        Severity::High,
        true,
        false,
        "Template construct is not supported in message templates",
        "Use only field references and type markers inside actions",
    ),
    ErrorMetadata::new(
        "E016",
        "Template",
        Severity::High,
        true,
        false,
        "Function is not a registered type marker",
        "Use one of the configured type markers such as string or int",
    ),
    ErrorMetadata::new(
        "E017",
        "Template",
        Severity::High,
        true,
        false,
        "Pipeline contains an empty command",
        "Remove the dangling pipe or add a command after it",
    ),
    ErrorMetadata::new(
        "E018",
        "Template",
        Severity::Medium,
        true,
        false,
        "Malformed number literal in template action",
        "Fix the numeric literal",
    ),
    ErrorMetadata::new(
        "E019",
        "Template",
        Severity::High,
        false,
        false,
        "Template exceeds a compile-time limit",
        "Shorten the template or raise the limit in the build profile",
    ),
    ErrorMetadata::new(
        "E020",
        "Template",
        Severity::High,
        true,
        false,
        "Field reference has more than one segment",
        "Rename the nested field to a single identifier",
    ),
    ErrorMetadata::new(
        "E021",
        "Template",
        Severity::High,
        true,
        false,
        "Type marker is not followed by a field reference",
        "Write the field after the marker, e.g. {{ string .Name }}",
    ),
    ErrorMetadata::new(
        "E022",
        "Template",
        Severity::High,
        true,
        false,
        "Second pipeline command must reference a field",
        "Pipe the marked field into a field reference or drop the pipe",
    ),
    ErrorMetadata::new(
        "E023",
        "Template",
        Severity::High,
        true,
        false,
        "Command after a field must be a type marker",
        "Pipe the field into a type marker, e.g. {{ .Name | string }}",
    ),
    ErrorMetadata::new(
        "E024",
        "Template",
        Severity::High,
        true,
        false,
        "Type marker does not name an argument type",
        "Use string, int, float, bool or timestamp",
    ),
    ErrorMetadata::new(
        "E025",
        "Template",
        Severity::High,
        true,
        false,
        "Field is used with conflicting types in one template",
        "Use the same type marker for every occurrence of the field",
    ),
    // Model
    ErrorMetadata::new(
        "E040",
        "Model",
        Severity::High,
        true,
        false,
        "Required value is empty",
        "Provide a non-empty value",
    ),
    ErrorMetadata::new(
        "E041",
        "Model",
        Severity::High,
        true,
        false,
        "Value is not valid text",
        "Remove NUL bytes and replacement characters from the value",
    ),
    ErrorMetadata::new(
        "E042",
        "Model",
        Severity::High,
        true,
        false,
        "Name does not match the identifier grammar",
        "Use letters, digits, '-', '_' and '.', starting and ending with a letter or digit",
    ),
    ErrorMetadata::new(
        "E043",
        "Model",
        Severity::High,
        true,
        false,
        "Unknown argument type",
        "Use unknown, string, int, float, bool or timestamp",
    ),
    ErrorMetadata::new(
        "E044",
        "Model",
        Severity::High,
        true,
        false,
        "Locale is not a well-formed language tag",
        "Use a BCP 47 tag such as en, en-US or zh-Hant-TW",
    ),
    ErrorMetadata::new(
        "E045",
        "Model",
        Severity::High,
        true,
        false,
        "Unknown protocol status code name",
        "Use a gRPC status name such as NOT_FOUND or its numeric value",
    ),
    ErrorMetadata::new(
        "E046",
        "Model",
        Severity::High,
        false,
        false,
        "Localization exceeds a compile-time limit",
        "Reduce the number of locales or raise the limit in the build profile",
    ),
    // Builder
    ErrorMetadata::new(
        "E060",
        "Builder",
        Severity::High,
        true,
        false,
        "Error code is empty or not a valid identifier",
        "Use an identifier-shaped error code",
    ),
    ErrorMetadata::new(
        "E061",
        "Builder",
        Severity::High,
        true,
        false,
        "Error code is already defined in this specification",
        "Rename one of the entries; codes are compared after camel-case normalization",
    ),
    ErrorMetadata::new(
        "E062",
        "Builder",
        Severity::High,
        true,
        false,
        "Required error field is empty",
        "Fill in the title, description, public and internal messages",
    ),
    ErrorMetadata::new(
        "E063",
        "Builder",
        Severity::High,
        true,
        false,
        "Error field is not valid text",
        "Remove NUL bytes and replacement characters from the field",
    ),
    ErrorMetadata::new(
        "E064",
        "Builder",
        Severity::High,
        true,
        false,
        "Error uses the OK protocol status code",
        "Pick a non-success gRPC status code",
    ),
    ErrorMetadata::new(
        "E065",
        "Builder",
        Severity::High,
        true,
        false,
        "Argument is declared more than once",
        "Remove or rename the duplicated argument",
    ),
    ErrorMetadata::new(
        "E066",
        "Builder",
        Severity::High,
        true,
        false,
        "Localization translates an argument that is not declared",
        "Declare the argument or remove its translations",
    ),
    ErrorMetadata::new(
        "E067",
        "Builder",
        Severity::High,
        true,
        false,
        "Message template references an undeclared argument",
        "Declare the argument or fix the field name in the template",
    ),
    ErrorMetadata::new(
        "E068",
        "Builder",
        Severity::High,
        true,
        false,
        "Message is not a valid template",
        "Fix the template syntax reported in the cause",
    ),
    ErrorMetadata::new(
        "E069",
        "Builder",
        Severity::High,
        true,
        false,
        "Argument is used with conflicting types",
        "Use one type marker consistently across messages and locales",
    ),
    ErrorMetadata::new(
        "E070",
        "Builder",
        Severity::Medium,
        true,
        false,
        "Deprecation notice is empty but has translations",
        "Add the deprecation notice or remove its translations",
    ),
    ErrorMetadata::new(
        "E071",
        "Builder",
        Severity::Medium,
        true,
        false,
        "Status code outside the conventional range in strict mode",
        "Use a standard status code or disable strict status codes",
    ),
    ErrorMetadata::new(
        "E072",
        "Builder",
        Severity::High,
        false,
        false,
        "Error definition exceeds a compile-time limit",
        "Reduce the number of arguments or raise the limit in the build profile",
    ),
    // Specification
    ErrorMetadata::new(
        "E080",
        "Specification",
        Severity::High,
        false,
        true,
        "Specification version is not supported",
        "Set spec_version to a supported version",
    ),
    ErrorMetadata::new(
        "E081",
        "Specification",
        Severity::High,
        false,
        true,
        "Default locale is not a well-formed language tag",
        "Set default_locale to a BCP 47 tag",
    ),
    ErrorMetadata::new(
        "E082",
        "Specification",
        Severity::High,
        false,
        true,
        "Specification contains no errors",
        "Add at least one error entry",
    ),
    ErrorMetadata::new(
        "E083",
        "Specification",
        Severity::High,
        false,
        true,
        "Domain is not a valid fully-qualified domain name",
        "Use a domain such as acme.com",
    ),
    ErrorMetadata::new(
        "E084",
        "Specification",
        Severity::High,
        false,
        true,
        "Namespace is invalid or too long",
        "Shorten the namespace and remove invalid characters",
    ),
    ErrorMetadata::new(
        "E085",
        "Specification",
        Severity::High,
        false,
        true,
        "An error entry failed to build",
        "Fix the entry named in the cause and rebuild",
    ),
    ErrorMetadata::new(
        "E086",
        "Specification",
        Severity::High,
        false,
        true,
        "Specification exceeds a compile-time limit",
        "Split the specification or raise the limit in the build profile",
    ),
    // Input
    ErrorMetadata::new(
        "E100",
        "Input",
        Severity::High,
        false,
        true,
        "Specification file not found",
        "Check the path to the specification file",
    ),
    ErrorMetadata::new(
        "E101",
        "Input",
        Severity::Medium,
        false,
        true,
        "Specification file is empty",
        "Add content to the specification file",
    ),
    ErrorMetadata::new(
        "E102",
        "Input",
        Severity::High,
        false,
        true,
        "Specification file exceeds the maximum size",
        "Split the file or raise max_file_size in the build profile",
    ),
    ErrorMetadata::new(
        "E103",
        "Input",
        Severity::High,
        false,
        true,
        "Specification file is not valid UTF-8",
        "Re-encode the file as UTF-8",
    ),
    ErrorMetadata::new(
        "E104",
        "Input",
        Severity::Medium,
        false,
        true,
        "Unsupported specification file format",
        "Use a .toml or .json file",
    ),
    ErrorMetadata::new(
        "E105",
        "Input",
        Severity::High,
        false,
        true,
        "Specification document could not be parsed",
        "Fix the document syntax reported in the message",
    ),
    ErrorMetadata::new(
        "E106",
        "Input",
        Severity::High,
        false,
        true,
        "I/O error while reading the specification",
        "Check file permissions and disk health",
    ),
    // Warnings
    ErrorMetadata::new(
        "W001",
        "Warning",
        Severity::Low,
        true,
        false,
        "Protocol status code is outside the standard gRPC range",
        "Use a gRPC status code between 1 and 16",
    ),
    ErrorMetadata::new(
        "W002",
        "Warning",
        Severity::Low,
        true,
        false,
        "HTTP status code is outside the standard range",
        "Use an HTTP status code between 100 and 599",
    ),
    ErrorMetadata::new(
        "W003",
        "Warning",
        Severity::Low,
        true,
        false,
        "Diagnostic collection limit reached",
        "Fix the reported problems first; later events were dropped",
    ),
    // Success
    ErrorMetadata::new(
        "I001",
        "System",
        Severity::Low,
        true,
        false,
        "Logging system initialized",
        "No action required",
    ),
    ErrorMetadata::new(
        "I010",
        "Template",
        Severity::Low,
        true,
        false,
        "Template parsed",
        "No action required",
    ),
    ErrorMetadata::new(
        "I011",
        "Template",
        Severity::Low,
        true,
        false,
        "Template fields extracted",
        "No action required",
    ),
    ErrorMetadata::new(
        "I060",
        "Builder",
        Severity::Low,
        true,
        false,
        "Error definition built",
        "No action required",
    ),
    ErrorMetadata::new(
        "I080",
        "Specification",
        Severity::Low,
        true,
        false,
        "Specification assembled",
        "No action required",
    ),
    ErrorMetadata::new(
        "I100",
        "Input",
        Severity::Low,
        true,
        false,
        "Specification document loaded",
        "No action required",
    ),
];

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        REGISTRY_ENTRIES
            .iter()
            .map(|metadata| (metadata.code, metadata.clone()))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_codes_are_unique() {
        let mut seen = HashSet::new();
        for entry in REGISTRY_ENTRIES {
            assert!(seen.insert(entry.code), "duplicate registry code {}", entry.code);
        }
    }

    #[test]
    fn test_every_declared_code_has_metadata() {
        let declared = [
            system::INTERNAL_ERROR,
            template::INVALID_DELIMITERS,
            template::CONFLICTING_FIELD_TYPE,
            model::INVALID_LOCALE,
            builder::UNDECLARED_TEMPLATE_ARGUMENT,
            builder::BUILDER_LIMIT_EXCEEDED,
            spec::ENTRY_BUILD_FAILURE,
            input::IO_ERROR,
            warning::HTTP_CODE_OUT_OF_RANGE,
            success::SPECIFICATION_ASSEMBLED,
        ];

        for code in declared {
            assert!(
                get_error_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
    }

    #[test]
    fn test_classification_lookups() {
        assert_eq!(get_category("E020"), "Template");
        assert_eq!(get_severity("ERR001"), Severity::Critical);
        assert!(requires_halt("E085"));
        assert!(is_recoverable("E067"));
        assert_eq!(get_description("E999"), "Unknown error");
        assert_eq!(get_action("E999"), "No specific action available");
    }
}
