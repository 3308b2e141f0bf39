//! Structured access-log entries and the sinks they are emitted to.
//!
//! An [`Entry`] is a named-field record. A [`Sink`] takes finished entries
//! together with a level and a message. [`TracingSink`] hands them to
//! `tracing`, so formatting and output stay with the application's
//! subscriber; [`RecordingSink`] keeps them in memory.

mod entry;
mod sink;

pub use entry::{Entry, Value, field};
pub use sink::{Record, RecordingSink, Sink, TracingSink};

#[cfg(test)]
pub(crate) use sink::capture;
