//! cohorts::errors — error type for cohort age computations.
//!
//! Shape errors are the only failure mode of the age computation; numerical
//! degeneracies (empty years, cohorts without inflow) are absorbed by the
//! zero-safe reciprocal and never raise.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for cohort computations.
pub type AgeResult<T> = Result<T, AgeError>;

#[derive(Debug, Clone, PartialEq)]
pub enum AgeError {
    /// The year-by-cohort array is not square.
    NonSquareArray { rows: usize, cols: usize },

    /// The inflow vector does not hold one value per cohort.
    InflowLengthMismatch { cohorts: usize, inflows: usize },
}

impl std::error::Error for AgeError {}

impl std::fmt::Display for AgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgeError::NonSquareArray { rows, cols } => {
                write!(
                    f,
                    "The year-by-cohort array must be square (one cohort per year); got {rows}x{cols}."
                )
            }
            AgeError::InflowLengthMismatch { cohorts, inflows } => {
                write!(f, "Expected {cohorts} inflow values (one per cohort); got {inflows}.")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<AgeError> for PyErr {
    fn from(err: AgeError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
