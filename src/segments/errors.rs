//! segments::errors — error type and Python bridge for segmented series.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias shared by the partition builder,
//! [`SegmentedSeries`](crate::segments::series::SegmentedSeries) and the
//! per-segment uncertainty table. Every failure is reported synchronously at
//! the point of detection and before any mutation of the owning series.
//!
//! Key behaviors
//! -------------
//! - Define [`SegmentError`] and [`SegmentResult`] as the canonical error and
//!   result types of the `segments` subtree.
//! - Group variants into the coarse [`ErrorKind`] families (configuration,
//!   cardinality, data, unknown distribution, precondition) so callers can
//!   branch on the family without matching every variant.
//! - Map errors to Python exceptions (`ValueError`, `AttributeError`) when
//!   the `python-bindings` feature is enabled. Argument type errors never
//!   reach this layer; the bindings raise `TypeError` while extracting.
//!
//! Conventions
//! -----------
//! - Offending time points are carried as their `Display` rendering so the
//!   error type stays independent of the time-point type.
//! - Indices are 0-based positions into the series.

#[cfg(feature = "python-bindings")]
use pyo3::{
    PyErr,
    exceptions::{PyAttributeError, PyValueError},
};

/// Result alias for segmented-series operations.
pub type SegmentResult<T> = Result<T, SegmentError>;

/// Coarse failure families for [`SegmentError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed construction or configuration input.
    Configuration,
    /// A per-segment argument does not match the number of segments.
    Cardinality,
    /// The data itself cannot be partitioned as requested.
    Data,
    /// Bounds were requested for a distribution that is not supported.
    UnknownDistribution,
    /// An operation was issued before its prerequisites were configured.
    Precondition,
}

/// Unified error type for segmented time series.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentError {
    // ---- Configuration ----
    /// x or y is empty.
    EmptySeries,

    /// Fewer than two time points were supplied.
    TooFewPoints { len: usize },

    /// x and y differ in length.
    LengthMismatch { x_len: usize, y_len: usize },

    /// x is not strictly increasing at `index` (compared with `index - 1`).
    NonIncreasingX { index: usize },

    /// A y value is NaN or ±inf.
    NonFiniteValue { index: usize, value: f64 },

    /// A scalar argument is outside its admissible range.
    InvalidArgument { argument: &'static str, reason: &'static str },

    // ---- Cardinality ----
    /// A per-segment argument has the wrong number of elements.
    CardinalityMismatch { argument: &'static str, expected: usize, actual: usize },

    // ---- Data ----
    /// A boundary value is not one of the time points.
    BoundaryNotFound { value: String },

    /// The series contains no element strictly greater than zero.
    NoNonzeroElement,

    /// Two consecutive boundaries do not advance along the time axis.
    NonIncreasingBoundaries { previous: String, next: String },

    // ---- Distribution ----
    /// Bound reconstruction is not available for this distribution.
    UnknownDistribution { name: String },

    // ---- Preconditions ----
    /// Bounds were requested before `add_uncertainties`.
    UncertaintyNotConfigured,

    /// The uncertainty table has no entry for a non-zero segment.
    MissingSegmentUncertainty { segment: usize },

    /// The number of standard deviations must be positive.
    InvalidStdevCount { value: usize },
}

impl SegmentError {
    /// Failure family of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SegmentError::EmptySeries
            | SegmentError::TooFewPoints { .. }
            | SegmentError::LengthMismatch { .. }
            | SegmentError::NonIncreasingX { .. }
            | SegmentError::NonFiniteValue { .. }
            | SegmentError::InvalidArgument { .. } => ErrorKind::Configuration,
            SegmentError::CardinalityMismatch { .. } => ErrorKind::Cardinality,
            SegmentError::BoundaryNotFound { .. }
            | SegmentError::NoNonzeroElement
            | SegmentError::NonIncreasingBoundaries { .. } => ErrorKind::Data,
            SegmentError::UnknownDistribution { .. } => ErrorKind::UnknownDistribution,
            SegmentError::UncertaintyNotConfigured
            | SegmentError::MissingSegmentUncertainty { .. }
            | SegmentError::InvalidStdevCount { .. } => ErrorKind::Precondition,
        }
    }
}

impl std::error::Error for SegmentError {}

impl std::fmt::Display for SegmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            SegmentError::EmptySeries => {
                write!(f, "The x- and y-components of the time series must not be empty.")
            }
            SegmentError::TooFewPoints { len } => {
                write!(f, "A segmented series needs at least 2 time points; got {len}.")
            }
            SegmentError::LengthMismatch { x_len, y_len } => {
                write!(
                    f,
                    "The x- and y-components need to have the same length: x has {x_len}, y has {y_len}."
                )
            }
            SegmentError::NonIncreasingX { index } => {
                write!(f, "The x-component must be strictly increasing; violated at index {index}.")
            }
            SegmentError::NonFiniteValue { index, value } => {
                write!(f, "Value at index {index} is non-finite: {value}")
            }
            SegmentError::InvalidArgument { argument, reason } => {
                write!(f, "Invalid value for {argument}: {reason}")
            }
            // ---- Cardinality ----
            SegmentError::CardinalityMismatch { argument, expected, actual } => {
                write!(
                    f,
                    "Mismatch in number of non-zero segments ({expected}) and length of the provided {argument} ({actual})."
                )
            }
            // ---- Data ----
            SegmentError::BoundaryNotFound { value } => {
                write!(f, "Segment boundary {value} is not a time point of the series.")
            }
            SegmentError::NoNonzeroElement => {
                write!(f, "No nonzero element found in the y-component.")
            }
            SegmentError::NonIncreasingBoundaries { previous, next } => {
                write!(
                    f,
                    "Segment boundaries must be strictly increasing: {next} does not follow {previous}."
                )
            }
            // ---- Distribution ----
            SegmentError::UnknownDistribution { name } => {
                write!(f, "The distribution name \"{name}\" is not known.")
            }
            // ---- Preconditions ----
            SegmentError::UncertaintyNotConfigured => {
                write!(f, "The uncertainty has not been added to the segmented series.")
            }
            SegmentError::MissingSegmentUncertainty { segment } => {
                write!(f, "No uncertainty is configured for segment {segment}.")
            }
            SegmentError::InvalidStdevCount { value } => {
                write!(f, "The number of standard deviations must be positive; got {value}.")
            }
        }
    }
}

/// Convert a [`SegmentError`] into the closest Python exception.
///
/// Preconditions surface as `AttributeError` (matching attribute access on an
/// unconfigured object); all other kinds surface as `ValueError`.
#[cfg(feature = "python-bindings")]
impl From<SegmentError> for PyErr {
    fn from(err: SegmentError) -> PyErr {
        match err.kind() {
            ErrorKind::Precondition => PyAttributeError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}
