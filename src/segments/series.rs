//! segments::series — time series divided into uncertainty segments.
//!
//! Purpose
//! -------
//! Own a time axis and its values together with their segment partition, and
//! provide the per-segment operations used to propagate parametric
//! uncertainty: shock application, scaling of dependent series, and
//! reconstruction of confidence bounds.
//!
//! Key behaviors
//! -------------
//! - [`SegmentedSeries::new`] validates x/y, resolves the partition once and
//!   fails fast on misaligned or duplicate delimiters.
//! - Segment views ([`SegmentedSeries::get_x_segments`],
//!   [`SegmentedSeries::get_y_segments`]) are derived from the current values
//!   on every call.
//! - Pure operations ([`SegmentedSeries::shifted`],
//!   [`SegmentedSeries::multiply_inflows_by_piecewise_uncert`],
//!   [`SegmentedSeries::scale_by_segment`]) return new arrays;
//!   [`SegmentedSeries::add_shift`] is a thin wrapper that replaces `y`.
//! - Bounds ([`SegmentedSeries::get_stdevs`],
//!   [`SegmentedSeries::get_confidence_bounds`]) scale each non-zero segment by
//!   the factors of its uncertainty entry; the zero-lead segment is copied.
//!
//! Invariants & assumptions
//! ------------------------
//! - The partition is fixed at construction; only `y` and the uncertainty
//!   table change afterwards.
//! - Every fallible operation validates all inputs before touching `y` or the
//!   uncertainty table.
//! - Shocks are multiplicative: a segment is scaled by `1 + shock`, so
//!   repeated shifts compound.
//!
//! Downstream usage
//! ----------------
//! - Monte Carlo drivers that sample many shock vectors should prefer the
//!   `&self` operations, which leave the series untouched and can be shared.

use crate::segments::{
    errors::{SegmentError, SegmentResult},
    partition::{SegmentPartition, TimePoint},
    uncertainty::{Distribution, PerSegment, UncertaintyConfig, UncertaintyModel},
    validation::{validate_confidence_level, validate_series, validate_stdev_count},
};
use ndarray::{Array1, ArrayView1, s};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

/// Default name of the value series, used in uncertainty labels.
pub const DEFAULT_Y_NAME: &str = "y";

/// Flatten segment sequences back into one sequence, in the given order.
///
/// Works on anything iterable by reference, e.g. the outputs of
/// [`SegmentedSeries::get_x_segments`] and [`SegmentedSeries::get_y_segments`].
///
/// Examples
/// --------
/// ```rust
/// # use rust_stockflow::segments::series::combine_segments;
/// let flat: Vec<i32> = combine_segments(vec![&[1, 2][..], &[3][..]]);
/// assert_eq!(flat, vec![1, 2, 3]);
/// ```
pub fn combine_segments<'a, T, S, I>(segments: I) -> Vec<T>
where
    T: Copy + 'a,
    S: IntoIterator<Item = &'a T>,
    I: IntoIterator<Item = S>,
{
    segments.into_iter().flat_map(|segment| segment.into_iter().copied()).collect()
}

/// SegmentedSeries — a time series with per-segment uncertainty.
///
/// Purpose
/// -------
/// Pair an observed series with its trend segments so that uncertainty can
/// be configured, sampled and reconstructed segment by segment.
///
/// Fields
/// ------
/// - `x`: `Vec<T>`
///   Strictly increasing time axis.
/// - `y`: `Array1<f64>`
///   Finite values aligned with `x`; replaced wholesale by `add_shift`.
/// - `y_name`: `String`
///   Name used to label uncertainty entries.
/// - `partition`: [`SegmentPartition`]
///   Segment layout resolved at construction.
/// - `uncertainty`: `Option<UncertaintyModel>`
///   Table set by [`SegmentedSeries::add_uncertainties`].
///
/// Invariants
/// ----------
/// - `x.len() == y.len() >= 2`.
/// - The partition covers `0..x.len()` contiguously.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentedSeries<T> {
    x: Vec<T>,
    y: Array1<f64>,
    y_name: String,
    partition: SegmentPartition<T>,
    uncertainty: Option<UncertaintyModel>,
}

impl<T: TimePoint> SegmentedSeries<T> {
    /// Construct a segmented series.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `Vec<T>`
    ///   Time axis, strictly increasing, at least 2 points.
    /// - `y`: `Array1<f64>`
    ///   Values aligned with `x`; at least one must be strictly positive.
    /// - `seg_delim`: `&[T]`
    ///   Interior trend-change points in ascending order. Each must be a time
    ///   point of `x`, excluding the first and last.
    /// - `y_name`: `Option<&str>`
    ///   Label prefix for uncertainty entries; defaults to `"y"`.
    ///
    /// Errors
    /// ------
    /// - Configuration errors from
    ///   [`validate_series`](crate::segments::validation::validate_series).
    /// - `SegmentError::NoNonzeroElement`, `SegmentError::BoundaryNotFound`
    ///   or `SegmentError::NonIncreasingBoundaries` from the partition.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use rust_stockflow::segments::SegmentedSeries;
    /// let series =
    ///     SegmentedSeries::new(vec![1, 2, 3, 4], array![0.0, 5.0, 5.0, 7.0], &[3], None).unwrap();
    /// assert_eq!(series.boundaries(), &[1, 2, 3, 4]);
    /// assert_eq!(series.nonzero_segment_count(), 2);
    /// ```
    pub fn new(
        x: Vec<T>, y: Array1<f64>, seg_delim: &[T], y_name: Option<&str>,
    ) -> SegmentResult<Self> {
        validate_series(&x, y.view())?;
        let partition = SegmentPartition::new(&x, y.view(), seg_delim)?;
        let y_name = y_name.unwrap_or(DEFAULT_Y_NAME).to_string();

        debug!(
            series = %y_name,
            points = x.len(),
            segments = partition.segment_count(),
            zero_lead = partition.has_zero_lead(),
            "constructed segmented series"
        );
        Ok(SegmentedSeries { x, y, y_name, partition, uncertainty: None })
    }

    pub fn x(&self) -> &[T] {
        &self.x
    }

    /// Current values (after any applied shifts).
    pub fn y(&self) -> ArrayView1<'_, f64> {
        self.y.view()
    }

    pub fn y_name(&self) -> &str {
        &self.y_name
    }

    pub fn partition(&self) -> &SegmentPartition<T> {
        &self.partition
    }

    pub fn boundaries(&self) -> &[T] {
        self.partition.boundaries()
    }

    pub fn has_zero_lead(&self) -> bool {
        self.partition.has_zero_lead()
    }

    pub fn segment_count(&self) -> usize {
        self.partition.segment_count()
    }

    pub fn nonzero_segment_count(&self) -> usize {
        self.partition.nonzero_segment_count()
    }

    /// Uncertainty table, if configured.
    pub fn uncertainty(&self) -> Option<&UncertaintyModel> {
        self.uncertainty.as_ref()
    }

    /// Time axis split by segment.
    pub fn get_x_segments(&self) -> Vec<&[T]> {
        self.partition.ranges().iter().map(|range| &self.x[range.clone()]).collect()
    }

    /// Current values split by segment.
    pub fn get_y_segments(&self) -> Vec<ArrayView1<'_, f64>> {
        self.partition.ranges().iter().map(|range| self.y.slice(s![range.clone()])).collect()
    }

    /// Flatten value segments into one series; see [`combine_segments`].
    pub fn combine_segments<'a, S, I>(segments: I) -> Array1<f64>
    where
        S: IntoIterator<Item = &'a f64>,
        I: IntoIterator<Item = S>,
    {
        Array1::from(combine_segments(segments))
    }

    /// Values with each non-zero segment scaled by `1 + shift[i]`.
    ///
    /// The zero-lead segment, when present, is passed through unchanged.
    ///
    /// Errors
    /// ------
    /// - `SegmentError::CardinalityMismatch` if
    ///   `shift.len() != nonzero_segment_count()`.
    pub fn shifted(&self, shift: &[f64]) -> SegmentResult<Array1<f64>> {
        self.apply_shocks(self.y.view(), "shift", shift, self.partition.has_zero_lead())
    }

    /// Replace the values by [`SegmentedSeries::shifted`]`(shift)`.
    ///
    /// Repeated calls compound multiplicatively. On error the values are left
    /// unchanged.
    pub fn add_shift(&mut self, shift: &[f64]) -> SegmentResult<()> {
        let shifted = self.shifted(shift)?;
        debug!(series = %self.y_name, shocks = shift.len(), "applied shift");
        self.y = shifted;
        Ok(())
    }

    /// Scale the current values by per-segment uncertainty draws, without
    /// mutating the series.
    ///
    /// Unlike [`SegmentedSeries::shifted`], a leading zero segment is detected
    /// by inspecting the current values: if every value of the first segment
    /// is exactly zero, that segment is passed through and the draws apply to
    /// the remaining segments.
    ///
    /// Errors
    /// ------
    /// - `SegmentError::CardinalityMismatch` if `u_inflows` does not hold one
    ///   draw per scaled segment.
    pub fn multiply_inflows_by_piecewise_uncert(
        &self, u_inflows: &[f64],
    ) -> SegmentResult<Array1<f64>> {
        let leading_zeros = self
            .partition
            .ranges()
            .first()
            .is_some_and(|range| self.y.slice(s![range.clone()]).iter().all(|&v| v == 0.0));
        self.apply_shocks(self.y.view(), "u_inflows", u_inflows, leading_zeros)
    }

    /// Apply per-segment shocks to another series aligned with this series'
    /// time axis, using this series' partition as the template.
    ///
    /// Errors
    /// ------
    /// - `SegmentError::LengthMismatch` if `values` is not aligned with `x`.
    /// - `SegmentError::CardinalityMismatch` if
    ///   `shocks.len() != nonzero_segment_count()`.
    pub fn scale_by_segment(
        &self, values: ArrayView1<'_, f64>, shocks: &[f64],
    ) -> SegmentResult<Array1<f64>> {
        if values.len() != self.x.len() {
            return Err(SegmentError::LengthMismatch { x_len: self.x.len(), y_len: values.len() });
        }
        self.apply_shocks(values, "shocks", shocks, self.partition.has_zero_lead())
    }

    /// Configure uncertainty with scalar-or-list arguments and the default
    /// skip policy.
    ///
    /// Errors
    /// ------
    /// - `SegmentError::CardinalityMismatch` if any list argument does not
    ///   hold one value per non-zero segment. The previous table, if any, is
    ///   kept.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use rust_stockflow::segments::SegmentedSeries;
    /// let mut series =
    ///     SegmentedSeries::new(vec![1, 2, 3], array![0.0, 100.0, 100.0], &[], Some("I")).unwrap();
    /// series.add_uncertainties("norm", 0.0, 0.05).unwrap();
    /// let (lower, upper) = series.get_stdevs(2).unwrap();
    /// assert!((lower[1] - 90.0).abs() < 1e-9 && (upper[2] - 110.0).abs() < 1e-9);
    /// ```
    pub fn add_uncertainties(
        &mut self, dist: impl Into<PerSegment<Distribution>>, par1: impl Into<PerSegment<f64>>,
        par2: impl Into<PerSegment<f64>>,
    ) -> SegmentResult<()> {
        self.configure_uncertainty(&UncertaintyConfig::new(dist, par1, par2))
    }

    /// Configure uncertainty from a full [`UncertaintyConfig`].
    pub fn configure_uncertainty(&mut self, config: &UncertaintyConfig) -> SegmentResult<()> {
        let model = UncertaintyModel::build(&self.y_name, &self.x, &self.partition, config)?;
        self.uncertainty = Some(model);
        Ok(())
    }

    /// Lower and upper bounds at `n_std` standard deviations.
    ///
    /// For each non-zero segment with spread `σ` (second parameter):
    /// `lower = y · (1 − σ·n_std)` and `upper = y · (1 + σ·n_std)`. The
    /// zero-lead segment is copied into both bounds.
    ///
    /// Errors
    /// ------
    /// - `SegmentError::InvalidStdevCount` if `n_std == 0`.
    /// - `SegmentError::UncertaintyNotConfigured` before `add_uncertainties`.
    /// - `SegmentError::MissingSegmentUncertainty` if a non-zero segment has
    ///   no entry (first segment under [`ZeroLeadSkip::Always`] without a
    ///   zero lead).
    /// - `SegmentError::UnknownDistribution` for distributions other than
    ///   `"norm"`.
    ///
    /// [`ZeroLeadSkip::Always`]: crate::segments::uncertainty::ZeroLeadSkip::Always
    pub fn get_stdevs(&self, n_std: usize) -> SegmentResult<(Array1<f64>, Array1<f64>)> {
        validate_stdev_count(n_std)?;
        self.bounds_with_multiplier(n_std as f64)
    }

    /// Two-sided bounds at a confidence level given in percent.
    ///
    /// The multiplier is the standard normal quantile
    /// `z = Φ⁻¹((level + (100 − level) / 2) / 100)`, e.g. `≈ 1.96` for 95.
    ///
    /// Errors
    /// ------
    /// - `SegmentError::InvalidArgument` unless `0 < level < 100`.
    /// - Otherwise as [`SegmentedSeries::get_stdevs`].
    pub fn get_confidence_bounds(&self, level: f64) -> SegmentResult<(Array1<f64>, Array1<f64>)> {
        validate_confidence_level(level)?;
        let z = Normal::standard().inverse_cdf((level + (100.0 - level) / 2.0) / 100.0);
        self.bounds_with_multiplier(z)
    }

    fn bounds_with_multiplier(&self, multiplier: f64) -> SegmentResult<(Array1<f64>, Array1<f64>)> {
        let model = self.uncertainty.as_ref().ok_or(SegmentError::UncertaintyNotConfigured)?;

        let mut factors = Vec::with_capacity(self.partition.nonzero_segment_count());
        for segment in self.partition.first_nonzero_segment()..self.partition.segment_count() {
            let entry = model
                .entry_for_segment(segment)
                .ok_or(SegmentError::MissingSegmentUncertainty { segment })?;
            factors.push((segment, entry.dist.relative_bounds(entry.spread(), multiplier)?));
        }

        let mut lower = self.y.clone();
        let mut upper = self.y.clone();
        for (segment, (lo, hi)) in factors {
            let range = self.partition.ranges()[segment].clone();
            lower.slice_mut(s![range.clone()]).mapv_inplace(|v| v * lo);
            upper.slice_mut(s![range]).mapv_inplace(|v| v * hi);
        }
        Ok((lower, upper))
    }

    fn apply_shocks(
        &self, values: ArrayView1<'_, f64>, argument: &'static str, shocks: &[f64],
        skip_first: bool,
    ) -> SegmentResult<Array1<f64>> {
        let offset = usize::from(skip_first);
        let ranges = &self.partition.ranges()[offset..];
        if shocks.len() != ranges.len() {
            return Err(SegmentError::CardinalityMismatch {
                argument,
                expected: ranges.len(),
                actual: shocks.len(),
            });
        }

        let mut out = values.to_owned();
        for (range, &shock) in ranges.iter().zip(shocks) {
            out.slice_mut(s![range.clone()]).mapv_inplace(|v| v * (1.0 + shock));
        }
        Ok(out)
    }
}
