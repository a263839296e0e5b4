//! Observability subsystem for modelwire
//!
//! Structured JSON log lines for declaration and serialization events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on validation or conversion results
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use modelwire::observability::{Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Trace);
//! Logger::info("SCHEMAS_LOADED", &[("count", "3")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

#[cfg(test)]
pub(crate) use logger::capture_events;
