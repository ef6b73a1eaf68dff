//! Route registration and method + path matching
//!
//! Exact routes plus dynamic routes with a single trailing `:param`
//! segment, recognized at request time through the known-segment set.
//! Independent of the table store; handlers are opaque to this module.

mod errors;
mod router;

pub use errors::RouterError;
pub use router::{Binding, RouteMatch, Router};
