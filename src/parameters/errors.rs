//! parameters::errors — error type for parameter tables and sampling.
//!
//! Purpose
//! -------
//! Report malformed index tables, rank or shape inconsistencies between a
//! parameter and its index string, failed lookups during dimension
//! reduction, and draw/problem mismatches during uncertainty sampling.
//!
//! Conventions
//! -----------
//! - Segment failures raised while scaling inflow series are wrapped
//!   unchanged in [`ParamError::Segment`].

use crate::segments::errors::SegmentError;

/// Result alias for parameter-table operations.
pub type ParamResult<T> = Result<T, ParamError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    // ---- Index table ----
    /// Two aspects share an index letter.
    DuplicateIndexLetter { letter: char },

    /// Two aspects share a name.
    DuplicateAspect { name: String },

    /// An index letter is not part of the table.
    UnknownIndex { letter: char },

    /// An item is not classified under the aspect.
    UnknownItem { aspect: String, item: String },

    // ---- Parameter values ----
    /// The index string does not have one letter per array axis.
    RankMismatch { indices: String, ndim: usize },

    /// An axis length differs from the size of its aspect.
    ShapeMismatch { letter: char, expected: usize, actual: usize },

    /// A letter occurs twice in one index string.
    RepeatedIndex { indices: String, letter: char },

    // ---- Sampling ----
    /// A name occurs twice in a sampling problem.
    DuplicateName { name: String },

    /// A draw does not hold one value per problem name.
    DrawLengthMismatch { expected: usize, actual: usize },

    /// Inflow-segment draws were given without an inflow series.
    MissingInflowSeries,

    // ---- Lifetime ----
    /// The Weibull shape must be finite and strictly positive.
    InvalidShape { value: f64 },

    // ---- Wrapped ----
    /// Failure while scaling a segmented inflow series.
    Segment(SegmentError),
}

impl std::error::Error for ParamError {}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Index table ----
            ParamError::DuplicateIndexLetter { letter } => {
                write!(f, "Index letter '{letter}' is used by more than one aspect.")
            }
            ParamError::DuplicateAspect { name } => {
                write!(f, "Aspect \"{name}\" is defined more than once.")
            }
            ParamError::UnknownIndex { letter } => {
                write!(f, "Index '{letter}' is not part of the index table.")
            }
            ParamError::UnknownItem { aspect, item } => {
                write!(f, "Item \"{item}\" is not classified under aspect \"{aspect}\".")
            }
            // ---- Parameter values ----
            ParamError::RankMismatch { indices, ndim } => {
                write!(
                    f,
                    "Index string \"{indices}\" has {} letters but the values have {ndim} axes.",
                    indices.chars().count()
                )
            }
            ParamError::ShapeMismatch { letter, expected, actual } => {
                write!(
                    f,
                    "Axis '{letter}' has length {actual}; the index table defines {expected} items."
                )
            }
            ParamError::RepeatedIndex { indices, letter } => {
                write!(f, "Index '{letter}' occurs more than once in \"{indices}\".")
            }
            // ---- Sampling ----
            ParamError::DuplicateName { name } => {
                write!(f, "Parameter \"{name}\" occurs more than once in the sampling problem.")
            }
            ParamError::DrawLengthMismatch { expected, actual } => {
                write!(f, "Expected {expected} sampled values (one per problem name); got {actual}.")
            }
            ParamError::MissingInflowSeries => {
                write!(f, "Inflow segment draws were supplied but no segmented inflow series.")
            }
            // ---- Lifetime ----
            ParamError::InvalidShape { value } => {
                write!(f, "Weibull shape must be finite and > 0; got {value}.")
            }
            // ---- Wrapped ----
            ParamError::Segment(err) => write!(f, "{err}"),
        }
    }
}

impl From<SegmentError> for ParamError {
    fn from(err: SegmentError) -> ParamError {
        ParamError::Segment(err)
    }
}
