//! Observability setup shared by the `rskills` binary.

pub mod tracing_setup;
