//! Observability module
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! binary's job.

pub mod logging;

pub use logging::{LogFormat, LogSettings, init_logging};
