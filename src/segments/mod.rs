//! segments — piecewise-uncertain time series.
//!
//! Purpose
//! -------
//! Divide a time series into contiguous trend segments, attach a parametric
//! uncertainty to every segment that carries data, and use that table to
//! shock, scale and bound the series segment by segment. This is the entry
//! point for sampling-based uncertainty propagation of inflow series.
//!
//! Key behaviors
//! -------------
//! - [`partition`] derives boundaries from the data (leading zero run) and
//!   caller-supplied trend-change points, and resolves them to index ranges.
//! - [`uncertainty`] holds the per-segment distribution table and the
//!   scalar-or-list configuration arguments ([`PerSegment`]).
//! - [`series`] exposes [`SegmentedSeries`], which owns x/y, the partition and
//!   the table, and implements shifts, inflow scaling and bound queries.
//! - [`errors`] centralizes [`SegmentError`] with its coarse [`ErrorKind`]
//!   families and the optional `PyErr` conversion.
//!
//! Invariants & assumptions
//! ------------------------
//! - Time points are exact-match keys ([`TimePoint`]); boundaries that are not
//!   time points of the series are errors, not interpolation requests.
//! - The leading zero-valued segment, when present, never carries uncertainty
//!   and is passed through unchanged by every shock operation.
//! - Values are finite `f64`; shocks are multiplicative (`1 + shock`).
//!
//! Conventions
//! -----------
//! - Indexing is 0-based. Segment `0` is the zero-lead segment when
//!   `has_zero_lead()` is true.
//! - "Non-zero segment count" is the expected length of every per-segment
//!   argument (shifts, draws, list-valued configuration).
//! - Operations log through `tracing` at `debug` level; a skipped non-zero
//!   first segment is reported at `warn`.
//!
//! Testing notes
//! -------------
//! - Unit tests in each submodule cover their error branches and the worked
//!   examples in their docs.
//! - `tests/integration_uncertainty_pipeline.rs` exercises configure → shift
//!   → bound flows; `tests/proptest_segments.rs` checks partition coverage and
//!   shift invariants on random inputs.

pub mod errors;
pub mod partition;
pub mod series;
pub mod uncertainty;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{ErrorKind, SegmentError, SegmentResult};
pub use self::partition::{SegmentPartition, TimePoint};
pub use self::series::{SegmentedSeries, combine_segments};
pub use self::uncertainty::{
    Distribution, PerSegment, SegmentUncertainty, UncertaintyConfig, UncertaintyModel,
    ZeroLeadSkip,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_stockflow::segments::prelude::*;
//
// to import the main segmentation surface in a single line.

pub mod prelude {
    pub use super::{
        Distribution, PerSegment, SegmentError, SegmentResult, SegmentedSeries,
        UncertaintyConfig, ZeroLeadSkip,
    };
}
