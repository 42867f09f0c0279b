//! Crate-internal utilities.

pub(crate) mod tracing_targets;
