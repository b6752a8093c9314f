//! segments::partition — derive the segment partition of a time series.
//!
//! Purpose
//! -------
//! Turn a time axis, its values, and a caller-supplied list of trend-change
//! points into a gap-free partition of the series into contiguous segments.
//! A leading run of exact zeros becomes a segment of its own, which carries
//! no uncertainty downstream.
//!
//! Key behaviors
//! -------------
//! - [`build_partition`] computes the boundary list
//!   `[x0] + [first non-zero x, if the series opens with zeros] + manual + [x_last]`
//!   together with the zero-lead flag.
//! - [`SegmentPartition`] resolves every boundary to a position through a
//!   value→position map built once, and stores the half-open index range of
//!   each segment. The final segment includes the last time point.
//!
//! Invariants & assumptions
//! ------------------------
//! - Boundary values are exact-match keys into x; nothing is interpolated.
//! - Manual delimiters are used in caller order and are not re-sorted. An
//!   out-of-order delimiter, or one equal to an earlier boundary, produces
//!   `SegmentError::NonIncreasingBoundaries`. Only the final boundary may
//!   repeat its predecessor (a one-point final segment).
//! - Resolved ranges are non-empty, contiguous and cover `0..x.len()` exactly
//!   once.
//!
//! Conventions
//! -----------
//! - "Non-zero segments" are all segments except the zero-lead segment, when
//!   present.
//! - Positions are 0-based.

use crate::segments::errors::{SegmentError, SegmentResult};
use ndarray::ArrayView1;
use std::{collections::HashMap, fmt, hash::Hash, ops::Range};

/// Time-point type usable as an exact-match segment key.
///
/// Implemented for every `Copy + Ord + Hash + Display + Debug` type (years as
/// integers being the usual choice).
pub trait TimePoint: Copy + Ord + Hash + fmt::Display + fmt::Debug {}

impl<T> TimePoint for T where T: Copy + Ord + Hash + fmt::Display + fmt::Debug {}

/// Build the boundary list and zero-lead flag for a series.
///
/// Parameters
/// ----------
/// - `x`: `&[T]`
///   Time axis.
/// - `y`: `ArrayView1<f64>`
///   Values aligned with `x`.
/// - `manual_delimiters`: `&[T]`
///   Interior trend-change points, expected in ascending order.
///
/// Returns
/// -------
/// `SegmentResult<(Vec<T>, bool)>`
///   The boundaries (length `k + 1` for `k` segments) and whether a
///   zero-lead segment was inserted.
///
/// Errors
/// ------
/// - `SegmentError::EmptySeries` if either component is empty.
/// - `SegmentError::LengthMismatch` if their lengths differ.
/// - `SegmentError::NoNonzeroElement` if no value is strictly positive.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_stockflow::segments::partition::build_partition;
/// let (bounds, zero_lead) =
///     build_partition(&[1, 2, 3, 4], array![0.0, 5.0, 5.0, 7.0].view(), &[3]).unwrap();
/// assert_eq!(bounds, vec![1, 2, 3, 4]);
/// assert!(zero_lead);
/// ```
pub fn build_partition<T: TimePoint>(
    x: &[T], y: ArrayView1<'_, f64>, manual_delimiters: &[T],
) -> SegmentResult<(Vec<T>, bool)> {
    if x.is_empty() || y.is_empty() {
        return Err(SegmentError::EmptySeries);
    }
    if x.len() != y.len() {
        return Err(SegmentError::LengthMismatch { x_len: x.len(), y_len: y.len() });
    }

    let first_nonzero =
        y.iter().position(|&value| value > 0.0).ok_or(SegmentError::NoNonzeroElement)?;

    let mut boundaries = Vec::with_capacity(manual_delimiters.len() + 3);
    boundaries.push(x[0]);
    let has_zero_lead = x[first_nonzero] != x[0];
    if has_zero_lead {
        boundaries.push(x[first_nonzero]);
    }
    boundaries.extend_from_slice(manual_delimiters);
    boundaries.push(x[x.len() - 1]);

    Ok((boundaries, has_zero_lead))
}

/// Map each time point to its position on the axis.
pub fn position_map<T: TimePoint>(x: &[T]) -> HashMap<T, usize> {
    x.iter().enumerate().map(|(position, &value)| (value, position)).collect()
}

/// Resolve boundaries into half-open position ranges, one per segment.
///
/// Segment `s` spans `pos(b[s])..pos(b[s + 1])`; the last segment is extended
/// by one so it includes the final time point. The last two boundaries may
/// coincide, which yields a final segment holding only the last time point.
///
/// Errors
/// ------
/// - `SegmentError::BoundaryNotFound` if a boundary is not a key of
///   `positions`.
/// - `SegmentError::NonIncreasingBoundaries` if a boundary does not lie
///   strictly after its predecessor (except for the final pair).
pub fn segment_ranges<T: TimePoint>(
    boundaries: &[T], positions: &HashMap<T, usize>,
) -> SegmentResult<Vec<Range<usize>>> {
    let lookup = |value: &T| {
        positions
            .get(value)
            .copied()
            .ok_or_else(|| SegmentError::BoundaryNotFound { value: value.to_string() })
    };

    let resolved = boundaries.iter().map(lookup).collect::<SegmentResult<Vec<usize>>>()?;
    let segment_count = resolved.len().saturating_sub(1);

    let mut ranges = Vec::with_capacity(segment_count);
    for s in 0..segment_count {
        let (start, end) = (resolved[s], resolved[s + 1]);
        let last = s + 1 == segment_count;
        if end < start || (end == start && !last) {
            return Err(SegmentError::NonIncreasingBoundaries {
                previous: boundaries[s].to_string(),
                next: boundaries[s + 1].to_string(),
            });
        }
        ranges.push(if last { start..end + 1 } else { start..end });
    }
    Ok(ranges)
}

/// SegmentPartition — resolved segment layout of one series.
///
/// Purpose
/// -------
/// Hold the boundary values, the zero-lead flag and the position range of
/// each segment so segment views can be produced without repeated scans of
/// the time axis.
///
/// Fields
/// ------
/// - `boundaries`: `Vec<T>`
///   Boundary time points, strictly increasing along the axis.
/// - `has_zero_lead`: `bool`
///   Whether segment 0 is the leading all-zero segment.
/// - `ranges`: `Vec<Range<usize>>`
///   Half-open positions of each segment; contiguous and covering the axis.
///
/// Invariants
/// ----------
/// - `ranges.len() == boundaries.len() - 1 >= 1`.
/// - `ranges[0].start == 0` and `ranges.last().end == x.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentPartition<T> {
    boundaries: Vec<T>,
    has_zero_lead: bool,
    ranges: Vec<Range<usize>>,
}

impl<T: TimePoint> SegmentPartition<T> {
    /// Build and resolve the partition of `(x, y)` around `manual_delimiters`.
    ///
    /// Errors
    /// ------
    /// - Any error of [`build_partition`] or [`segment_ranges`].
    pub fn new(x: &[T], y: ArrayView1<'_, f64>, manual_delimiters: &[T]) -> SegmentResult<Self> {
        let (boundaries, has_zero_lead) = build_partition(x, y, manual_delimiters)?;
        let positions = position_map(x);
        let ranges = segment_ranges(&boundaries, &positions)?;
        Ok(SegmentPartition { boundaries, has_zero_lead, ranges })
    }

    /// Boundary time points.
    pub fn boundaries(&self) -> &[T] {
        &self.boundaries
    }

    /// Whether the series opens with a run of zeros.
    pub fn has_zero_lead(&self) -> bool {
        self.has_zero_lead
    }

    /// Half-open position ranges of all segments.
    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    /// Number of segments, zero-lead included.
    pub fn segment_count(&self) -> usize {
        self.ranges.len()
    }

    /// Number of segments that carry uncertainty.
    pub fn nonzero_segment_count(&self) -> usize {
        self.segment_count() - self.first_nonzero_segment()
    }

    /// Index of the first segment that carries uncertainty.
    pub fn first_nonzero_segment(&self) -> usize {
        usize::from(self.has_zero_lead)
    }
}
