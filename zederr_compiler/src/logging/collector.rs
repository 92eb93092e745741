//! Error collector grouping events by the error entry being built
//!
//! Produces cargo-style reports once a whole specification has been processed.

use super::codes;
use super::events::LogEvent;
use crate::config::compile_time::logging::*;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Key used for events raised outside of any entry (document loading, header checks)
pub const SPECIFICATION_KEY: &str = "<specification>";

/// The error entry currently being built
#[derive(Debug, Clone)]
pub struct EntryContext {
    pub code: String,
    pub index: usize,
    pub start_time: Instant,
}

impl EntryContext {
    pub fn new(code: impl Into<String>, index: usize) -> Self {
        Self {
            code: code.into(),
            index,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Key used to group this entry's events
    pub fn key(&self) -> String {
        if self.code.is_empty() {
            format!("#{}", self.index)
        } else {
            self.code.clone()
        }
    }
}

/// Summary of a processed specification
#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    pub total_entries: usize,
    pub successful_entries: usize,
    pub failed_entries: usize,
    pub entries_with_warnings: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub dropped_errors: usize,
}

impl ProcessingSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.total_warnings > 0
    }
}

#[derive(Default)]
struct CollectorState {
    entry_events: BTreeMap<String, Vec<LogEvent>>,
    collected_errors: usize,
    dropped_errors: usize,
}

/// Thread-safe collector of events keyed by entry
pub struct ErrorCollector {
    state: Mutex<CollectorState>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CollectorState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CollectorState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record an event for an entry
    pub fn record_event(&self, entry_key: &str, event: LogEvent) {
        let mut state = self.lock();

        if event.is_error() {
            if state.collected_errors >= MAX_ERROR_COLLECTION {
                state.dropped_errors += 1;
                return;
            }
            state.collected_errors += 1;
        }

        let events = state
            .entry_events
            .entry(entry_key.to_string())
            .or_default();

        if events.len() < MAX_LOG_EVENTS_PER_ENTRY {
            events.push(event);
        } else if events.len() == MAX_LOG_EVENTS_PER_ENTRY {
            events.push(LogEvent::warning_with_code(
                codes::warning::COLLECTION_LIMIT_REACHED,
                &format!(
                    "Too many events for entry (limit: {})",
                    MAX_LOG_EVENTS_PER_ENTRY
                ),
            ));
        }
    }

    pub fn get_entry_events(&self, entry_key: &str) -> Vec<LogEvent> {
        self.lock()
            .entry_events
            .get(entry_key)
            .cloned()
            .unwrap_or_default()
    }

    pub fn get_entry_errors(&self, entry_key: &str) -> Vec<LogEvent> {
        self.lock()
            .entry_events
            .get(entry_key)
            .map(|events| events.iter().filter(|e| e.is_error()).cloned().collect())
            .unwrap_or_default()
    }

    pub fn get_entry_warnings(&self, entry_key: &str) -> Vec<LogEvent> {
        self.lock()
            .entry_events
            .get(entry_key)
            .map(|events| events.iter().filter(|e| e.is_warning()).cloned().collect())
            .unwrap_or_default()
    }

    pub fn entry_has_errors(&self, entry_key: &str) -> bool {
        !self.get_entry_errors(entry_key).is_empty()
    }

    pub fn get_all_entry_events(&self) -> BTreeMap<String, Vec<LogEvent>> {
        self.lock().entry_events.clone()
    }

    /// Errors whose code requires halting
    pub fn get_critical_errors(&self) -> Vec<(String, LogEvent)> {
        let state = self.lock();
        let mut critical = Vec::new();

        for (key, events) in &state.entry_events {
            for event in events {
                if event.is_error() && event.requires_halt() {
                    critical.push((key.clone(), event.clone()));
                }
            }
        }

        critical
    }

    pub fn get_summary(&self) -> ProcessingSummary {
        let state = self.lock();

        let mut summary = ProcessingSummary::new();
        summary.dropped_errors = state.dropped_errors;

        for (key, events) in &state.entry_events {
            let errors = events.iter().filter(|e| e.is_error()).count();
            let warnings = events.iter().filter(|e| e.is_warning()).count();

            summary.total_errors += errors;
            summary.total_warnings += warnings;

            if key == SPECIFICATION_KEY {
                continue;
            }

            summary.total_entries += 1;
            if errors > 0 {
                summary.failed_entries += 1;
            } else if warnings > 0 {
                summary.entries_with_warnings += 1;
            } else {
                summary.successful_entries += 1;
            }
        }

        summary
    }

    pub fn total_event_count(&self) -> usize {
        self.lock().entry_events.values().map(Vec::len).sum()
    }

    /// Current event count, buffer size and fill ratio
    pub fn get_capacity_info(&self) -> (usize, usize, f64) {
        let current = self.total_event_count();
        let max = LOG_BUFFER_SIZE;
        let ratio = if max > 0 {
            current as f64 / max as f64
        } else {
            0.0
        };
        (current, max, ratio)
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        *state = CollectorState::default();
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Format collected errors and warnings cargo-style
pub fn format_cargo_style_errors(collector: &ErrorCollector) -> String {
    let mut output = String::new();

    for (entry, events) in &collector.get_all_entry_events() {
        let errors: Vec<_> = events.iter().filter(|e| e.is_error()).collect();
        let warnings: Vec<_> = events.iter().filter(|e| e.is_warning()).collect();

        if errors.is_empty() && warnings.is_empty() {
            continue;
        }

        for event in errors {
            output.push_str(&format!(
                "error[{}]: {}\n  --> {}{}\n",
                event.code.as_str(),
                event.message,
                entry,
                span_suffix(event)
            ));
            output.push_str(&format!(
                "  = severity: {}, category: {}\n",
                event.severity(),
                event.category()
            ));
            push_context(&mut output, event);

            let action = event.recommended_action();
            if action != "No specific action available" {
                output.push_str(&format!("  = help: {}\n", action));
            }
        }

        for event in warnings {
            output.push_str(&format!(
                "warning[{}]: {}\n  --> {}{}\n",
                event.code.as_str(),
                event.message,
                entry,
                span_suffix(event)
            ));
            push_context(&mut output, event);
        }

        output.push('\n');
    }

    let summary = collector.get_summary();
    if summary.total_errors > 0 {
        output.push_str(&format!("Total errors: {}\n", summary.total_errors));
    }
    if summary.dropped_errors > 0 {
        output.push_str(&format!("Errors not shown: {}\n", summary.dropped_errors));
    }
    if summary.total_warnings > 0 {
        output.push_str(&format!("Total warnings: {}\n", summary.total_warnings));
    }

    output
}

fn span_suffix(event: &LogEvent) -> String {
    event
        .span
        .as_ref()
        .map(|s| format!(":{}:{}", s.start().line, s.start().column))
        .unwrap_or_default()
}

fn push_context(output: &mut String, event: &LogEvent) {
    for (key, value) in &event.context {
        if key != "entry" && key != "entry_index" {
            output.push_str(&format!("  = {}: {}\n", key, value));
        }
    }
}
