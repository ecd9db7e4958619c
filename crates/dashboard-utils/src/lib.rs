//! Shared utilities for the stock dashboard
//!
//! Currently limited to logging setup shared by the workspace binaries.

pub mod logging;

pub use logging::init_tracing_with_default;
