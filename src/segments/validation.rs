//! segments::validation — shared input guards for segmented series.
//!
//! Purpose
//! -------
//! Centralize the construction-time checks on the time axis and value
//! sequence, plus the scalar argument checks used by bound reconstruction,
//! so that [`SegmentedSeries`](crate::segments::series::SegmentedSeries) and
//! the partition builder report the same errors for the same defects.
//!
//! Invariants & assumptions
//! ------------------------
//! - A series needs at least 2 time points, equal-length x and y, a strictly
//!   increasing x, and finite y values.
//! - Confidence levels are percentages in the open interval (0, 100).
//!
//! Testing notes
//! -------------
//! - Unit tests below cover every error branch and a success path.

use crate::segments::{
    errors::{SegmentError, SegmentResult},
    partition::TimePoint,
};
use ndarray::ArrayView1;

/// Validate the x/y pair of a segmented series.
///
/// Errors
/// ------
/// - `SegmentError::EmptySeries` when either component is empty.
/// - `SegmentError::LengthMismatch` when `x.len() != y.len()`.
/// - `SegmentError::TooFewPoints` when fewer than 2 points are supplied.
/// - `SegmentError::NonIncreasingX` at the first position where
///   `x[i] <= x[i - 1]`.
/// - `SegmentError::NonFiniteValue` at the first NaN/±inf in `y`.
pub fn validate_series<T: TimePoint>(x: &[T], y: ArrayView1<'_, f64>) -> SegmentResult<()> {
    if x.is_empty() || y.is_empty() {
        return Err(SegmentError::EmptySeries);
    }
    if x.len() != y.len() {
        return Err(SegmentError::LengthMismatch { x_len: x.len(), y_len: y.len() });
    }
    if x.len() < 2 {
        return Err(SegmentError::TooFewPoints { len: x.len() });
    }
    if let Some(index) = x.windows(2).position(|pair| pair[1] <= pair[0]) {
        return Err(SegmentError::NonIncreasingX { index: index + 1 });
    }
    for (index, &value) in y.iter().enumerate() {
        if !value.is_finite() {
            return Err(SegmentError::NonFiniteValue { index, value });
        }
    }
    Ok(())
}

/// Reject a zero standard-deviation multiplier.
pub fn validate_stdev_count(n_std: usize) -> SegmentResult<()> {
    if n_std == 0 {
        return Err(SegmentError::InvalidStdevCount { value: n_std });
    }
    Ok(())
}

/// Reject confidence levels outside `(0, 100)`.
pub fn validate_confidence_level(level: f64) -> SegmentResult<()> {
    if !level.is_finite() || level <= 0.0 || level >= 100.0 {
        return Err(SegmentError::InvalidArgument {
            argument: "level",
            reason: "confidence level must be a percentage strictly between 0 and 100",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn validate_series_accepts_well_formed_input() {
        let x = [1990_i64, 1991, 1992];
        let y = array![0.0, 1.0, 2.0];

        assert!(validate_series(&x, y.view()).is_ok());
    }

    #[test]
    fn validate_series_rejects_empty_components() {
        let x: [i64; 0] = [];
        let y = array![];

        assert_eq!(validate_series(&x, y.view()), Err(SegmentError::EmptySeries));
    }

    #[test]
    fn validate_series_rejects_length_mismatch() {
        let x = [1_i64, 2, 3];
        let y = array![1.0, 2.0];

        assert_eq!(
            validate_series(&x, y.view()),
            Err(SegmentError::LengthMismatch { x_len: 3, y_len: 2 })
        );
    }

    #[test]
    fn validate_series_rejects_single_point() {
        let x = [1_i64];
        let y = array![1.0];

        assert_eq!(validate_series(&x, y.view()), Err(SegmentError::TooFewPoints { len: 1 }));
    }

    #[test]
    // Purpose
    // -------
    // A repeated time point breaks the exact-match boundary lookup and must
    // be reported at the position of the repeat.
    fn validate_series_rejects_non_increasing_axis() {
        let x = [1_i64, 2, 2, 3];
        let y = array![1.0, 2.0, 3.0, 4.0];

        assert_eq!(validate_series(&x, y.view()), Err(SegmentError::NonIncreasingX { index: 2 }));
    }

    #[test]
    fn validate_series_rejects_non_finite_values() {
        let x = [1_i64, 2, 3];
        let y = array![1.0, f64::NAN, 3.0];

        match validate_series(&x, y.view()) {
            Err(SegmentError::NonFiniteValue { index, value }) => {
                assert_eq!(index, 1);
                assert!(value.is_nan());
            }
            other => panic!("expected NonFiniteValue error, got {other:?}"),
        }
    }

    #[test]
    fn scalar_guards_reject_out_of_range_values() {
        assert!(validate_stdev_count(0).is_err());
        assert!(validate_stdev_count(2).is_ok());
        assert!(validate_confidence_level(0.0).is_err());
        assert!(validate_confidence_level(100.0).is_err());
        assert!(validate_confidence_level(f64::NAN).is_err());
        assert!(validate_confidence_level(95.0).is_ok());
    }
}
