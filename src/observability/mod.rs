//! Observability for statpipe
//!
//! Structured logging only; metrics layers are out of scope. The executor
//! itself never logs (diagnostics are values on the result); the engine and
//! CLI log on its behalf.

mod logger;

pub use logger::{Logger, Severity};
