//! Error type for shape and domain violations.
//!
//! Every check runs before any arithmetic, so a rejected call never records
//! anything on the active tape.

use thiserror::Error;

/// Result alias used by every fallible operation in the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the linear-algebra layer and the densities built on it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Two operands have incompatible shapes.
    #[error("{function}: dimension mismatch between {lhs} ({lhs_rows}x{lhs_cols}) and {rhs} ({rhs_rows}x{rhs_cols})")]
    DimensionMismatch {
        function: &'static str,
        lhs: &'static str,
        lhs_rows: usize,
        lhs_cols: usize,
        rhs: &'static str,
        rhs_rows: usize,
        rhs_cols: usize,
    },

    /// A square matrix was required.
    #[error("{function}: {arg} must be square, got {rows}x{cols}")]
    NotSquare {
        function: &'static str,
        arg: &'static str,
        rows: usize,
        cols: usize,
    },

    /// A one-dimensional operand was required.
    #[error("{function}: {arg} must be a vector, got {rows}x{cols}")]
    NotVector {
        function: &'static str,
        arg: &'static str,
        rows: usize,
        cols: usize,
    },

    /// A requested length exceeds the available elements.
    #[error("{function}: requested {requested} elements of {arg}, which has {available}")]
    SizeExceeded {
        function: &'static str,
        arg: &'static str,
        requested: usize,
        available: usize,
    },

    /// An index lies outside its container.
    #[error("{function}: index {index} of {arg} out of range for size {size}")]
    IndexOutOfRange {
        function: &'static str,
        arg: &'static str,
        index: usize,
        size: usize,
    },

    /// An operand that must hold elements is empty.
    #[error("{function}: {arg} has no elements")]
    Empty {
        function: &'static str,
        arg: &'static str,
    },

    /// A matrix is not symmetric within tolerance.
    #[error("{function}: {arg} is not symmetric at ({row}, {col})")]
    NotSymmetric {
        function: &'static str,
        arg: &'static str,
        row: usize,
        col: usize,
    },

    /// A matrix is not positive definite.
    #[error("{function}: {arg} is not positive definite")]
    NotPositiveDefinite {
        function: &'static str,
        arg: &'static str,
    },

    /// A matrix is singular to working precision.
    #[error("{function}: {arg} is singular")]
    Singular {
        function: &'static str,
        arg: &'static str,
    },

    /// An iterative solver ran out of iterations.
    #[error("{function}: no convergence on {arg} after {iterations} iterations")]
    NoConvergence {
        function: &'static str,
        arg: &'static str,
        iterations: usize,
    },

    /// An argument lies outside the domain of the function.
    #[error("{function}: {arg} {reason}")]
    Domain {
        function: &'static str,
        arg: &'static str,
        reason: String,
    },
}

impl Error {
    /// Name of the function that raised the error.
    pub fn function(&self) -> &'static str {
        match self {
            Error::DimensionMismatch { function, .. }
            | Error::NotSquare { function, .. }
            | Error::NotVector { function, .. }
            | Error::SizeExceeded { function, .. }
            | Error::IndexOutOfRange { function, .. }
            | Error::Empty { function, .. }
            | Error::NotSymmetric { function, .. }
            | Error::NotPositiveDefinite { function, .. }
            | Error::Singular { function, .. }
            | Error::NoConvergence { function, .. }
            | Error::Domain { function, .. } => function,
        }
    }

    /// True for errors caused purely by operand shapes.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Error::DimensionMismatch { .. }
                | Error::NotSquare { .. }
                | Error::NotVector { .. }
                | Error::SizeExceeded { .. }
                | Error::IndexOutOfRange { .. }
                | Error::Empty { .. }
        )
    }
}
