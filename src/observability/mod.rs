//! Observability subsystem
//!
//! Structured JSON logging for lifecycle events (table creation, server
//! start, request misses). Observability is read-only: logging never
//! affects execution and never fails an operation.

mod logger;

pub use logger::{Logger, Severity};
