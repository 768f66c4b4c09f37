//! Observability subsystem for primdb
//!
//! Provides:
//! - Structured logging (JSON lines on stderr)
//! - Typed lifecycle and operation events
//! - Timed scopes around shell commands
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on execution
//! 3. No async or background threads
//! 4. Logging failures are ignored, never propagated
//!
//! # Usage
//!
//! ```ignore
//! use primdb::observability::{log_event_with_fields, Event, ObservationScope};
//!
//! log_event_with_fields(Event::TableCreated, &[("table", "users")]);
//!
//! let scope = ObservationScope::new("COMMAND");
//! // ... do work ...
//! scope.complete();
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::{ObservationScope, Timer};

/// Log an event at its default severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log an event with fields at its default severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
