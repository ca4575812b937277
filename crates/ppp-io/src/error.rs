use ppp_core::{CoreError, PlacementError};
use thiserror::Error;

/// Grammar errors. Line numbers are 1-based and count every line, comments
/// included.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Input ended before a required header value
    #[error("missing {0}")]
    Missing(&'static str),

    #[error("line {line}: invalid {field} '{token}'")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        token: String,
    },

    /// A coordinate line with fewer than two values
    #[error("line {line}: expected 'x y'")]
    MissingCoordinate { line: usize },

    #[error("expected {expected} {what}, found {found}")]
    CountMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// A city count no grid of the declared side can hold
    #[error("{declared} cities declared for a grid of only {cells} cells")]
    TooManyCities { declared: usize, cells: u64 },

    #[error("line {line}: unexpected content after the last {what}")]
    TrailingData { line: usize, what: &'static str },

    #[error("invalid instance: {0}")]
    Instance(#[from] CoreError),

    #[error("line {line}: {source}")]
    Tower {
        line: usize,
        #[source]
        source: PlacementError,
    },
}
