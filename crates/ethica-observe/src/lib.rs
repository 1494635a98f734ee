//! Observability setup for Ethica: the global tracing subscriber and the
//! optional OpenTelemetry span exporter.

pub mod tracing_setup;

pub use tracing_setup::{LogFormat, init_tracing, shutdown_tracing};
