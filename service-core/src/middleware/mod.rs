pub mod cors;
pub mod tracing;
