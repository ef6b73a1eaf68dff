//! Router error types

use thiserror::Error;

/// Errors raised at route registration time
///
/// Matching itself never errors: a miss is the `RouteMatch::NotFound`
/// variant, not a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// More than one `:param` segment in the pattern
    #[error("pattern '{0}' has more than one parameter segment")]
    MultipleParameters(String),

    /// A `:param` segment that is not the trailing segment
    #[error("pattern '{0}' has a non-trailing parameter segment")]
    ParameterNotTrailing(String),
}
