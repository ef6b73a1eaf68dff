//! memodb - a schema-validated in-memory table store behind a CRUD HTTP API
//!
//! Core pieces: a method+path [`router`] with single-trailing-parameter
//! dynamic routes, and a [`store`] enforcing column data types and
//! constraints over in-memory tables. The [`http_server`] layer wires the
//! two together.

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod router;
pub mod store;
