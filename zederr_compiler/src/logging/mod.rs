//! Global logging for the zederr compiler
//!
//! Thread-safe global logger plus an error collector keyed by the error entry
//! being built, cargo-style reporting and a small macro interface.

pub mod codes;
pub mod collector;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use collector::{EntryContext, ErrorCollector, ProcessingSummary};
pub use events::{LogEvent, LogLevel};
pub use service::{
    ConsoleLogger, Logger, LoggingService, MemoryLogger, MultiLogger, StructuredLogger,
    TracingLogger,
};

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();
static GLOBAL_ERROR_COLLECTOR: OnceLock<Arc<ErrorCollector>> = OnceLock::new();

thread_local! {
    static ENTRY_CONTEXT: RefCell<Option<EntryContext>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from the runtime configuration
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let logging_service = Arc::new(service::create_configured_service());
    init_global_logging_with_service(logging_service.clone())?;

    for &code in &["ERR001", "E020", "E061", "E085", "E100"] {
        if codes::get_description(code) == "Unknown error" {
            return Err(format!("Missing metadata for error code: {}", code));
        }
    }

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Initialize with a custom service (primarily for testing)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized")?;

    GLOBAL_ERROR_COLLECTOR
        .set(Arc::new(ErrorCollector::new()))
        .map_err(|_| "Global error collector already initialized")?;

    Ok(())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some() && GLOBAL_ERROR_COLLECTOR.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

pub fn try_get_global_error_collector() -> Option<&'static ErrorCollector> {
    GLOBAL_ERROR_COLLECTOR
        .get()
        .map(|collector| collector.as_ref())
}

// ============================================================================
// ENTRY CONTEXT MANAGEMENT
// ============================================================================

/// Set the error entry being built on the current thread
pub fn set_entry_context(code: &str, index: usize) {
    ENTRY_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(EntryContext::new(code, index));
    });
}

pub fn clear_entry_context() {
    ENTRY_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Run `f` with an entry context, restoring the previous one afterwards
pub fn with_entry_context<F, R>(code: &str, index: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = get_current_entry_context();
    set_entry_context(code, index);
    let result = f();
    ENTRY_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = previous;
    });
    result
}

pub fn get_current_entry_context() -> Option<EntryContext> {
    ENTRY_CONTEXT.with(|ctx| ctx.borrow().clone())
}

fn attach_entry_context(event: LogEvent) -> LogEvent {
    if !config::include_entry_context() {
        return event;
    }

    match get_current_entry_context() {
        Some(entry) => event
            .with_context("entry", &entry.key())
            .with_context("entry_index", &entry.index.to_string()),
        None => event,
    }
}

fn dispatch(event: LogEvent, collect: bool) {
    let event = attach_entry_context(event);

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event.clone());
    }

    if collect {
        if let Some(collector) = try_get_global_error_collector() {
            let key = get_current_entry_context()
                .map(|entry| entry.key())
                .unwrap_or_else(|| collector::SPECIFICATION_KEY.to_string());
            collector.record_event(&key, event);
        }
    }
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

/// Log error with context (used by `log_error!`)
pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, &str)>,
) {
    let mut event = LogEvent::error(code, message);

    if let Some(s) = span {
        event = event.with_span(s);
    }

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    dispatch(event, true);
}

/// Log warning with context (used by `log_warning!`)
pub fn log_warning_with_context(code: Option<Code>, message: &str, context: Vec<(&str, &str)>) {
    let mut event = match code {
        Some(code) => LogEvent::warning_with_code(code, message),
        None => LogEvent::warning(message),
    };

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    dispatch(event, true);
}

/// Log success with context (used by `log_success!`)
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::success(code, message);

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    dispatch(event, true);
}

/// Log info with context (used by `log_info!`)
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::info(message);

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    dispatch(event, false);
}

/// Log debug with context (used by `log_debug!`)
pub fn log_debug_with_context(message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::debug(message);

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    dispatch(event, false);
}

// ============================================================================
// REPORTING
// ============================================================================

pub fn get_processing_summary() -> ProcessingSummary {
    try_get_global_error_collector()
        .map(|collector| collector.get_summary())
        .unwrap_or_default()
}

/// Errors recorded for one entry, keyed by its code
pub fn get_entry_errors(code: &str) -> Vec<LogEvent> {
    try_get_global_error_collector()
        .map(|collector| collector.get_entry_errors(code))
        .unwrap_or_default()
}

/// Cargo-style report of the collected diagnostics, when enabled and logging is initialized
pub fn cargo_style_report() -> Option<String> {
    if !config::use_cargo_style_output() {
        return None;
    }
    try_get_global_error_collector().map(collector::format_cargo_style_errors)
}

pub fn clear_error_collection() {
    if let Some(collector) = try_get_global_error_collector() {
        collector.clear();
    }
}
