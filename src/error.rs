// Error taxonomy for the comparison engine.
//
// Everything here is local and recoverable: the caller decides whether to
// suppress the affected metric or report it to the user. An empty
// recommendation result is NOT an error; see `select::SelectionStatus`.
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// A category had no valued records, so an aggregate over it does not
    /// exist. Carries the category's display name for reporting.
    #[error("no records in category '{0}', aggregate is undefined")]
    UndefinedAggregate(String),

    /// A computation would divide by zero (zero baseline cost, zero-mpg
    /// vehicle). Fails loudly instead of producing Infinity or NaN.
    #[error("division by zero while computing {0}")]
    DivisionByZero(&'static str),

    /// Caller-supplied value outside the accepted domain, or a record
    /// missing a field the operation requires.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
