//! Observability setup for Keepsake: tracing subscriber and optional
//! OpenTelemetry span export.

pub mod tracing_setup;
