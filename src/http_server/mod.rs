//! Request handler layer
//!
//! Adapts raw HTTP requests to route-table lookups and table store calls,
//! and maps store failures to status codes. Axum supplies the listener and
//! framing; matching belongs to the [`crate::router`] module.

mod config;
mod errors;
mod server;
mod users_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ErrorResponse};
pub use server::{handler, AppState, Handler, HttpServer, RequestContext};
pub use users_routes::{create_users_table, register_users_routes, USERS_TABLE};
