use crate::StrError;
use thiserror::Error;

/// Errors raised by the numerical demos
///
/// None of these is fatal: every failure is local to one computation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The objective key is not in the fixed registry
    #[error("unknown objective: '{0}'")]
    UnknownObjective(String),

    /// Newton-Raphson found an exactly zero (or guarded) derivative
    #[error("zero derivative at x = {x}; method stopped")]
    ZeroDerivative { x: f64 },

    /// Malformed function expression
    #[error("parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// An objective was evaluated outside its real domain
    #[error("{objective} is undefined at {at}")]
    DomainViolation { objective: &'static str, at: String },

    /// Invalid count, bound or shape parameter
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Message from a named-parameter lookup or from russell_lab/plotpy
    #[error("{0}")]
    Message(StrError),
}

impl From<StrError> for Error {
    fn from(message: StrError) -> Self {
        Error::Message(message)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
