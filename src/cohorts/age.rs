//! cohorts::age — mean age of a cohort-resolved stock or outflow.
//!
//! Purpose
//! -------
//! Given a square year × cohort array (row `t` = observation year, column
//! `c` = cohort that entered in year `c`), compute the mean age of the
//! population in every year as the share-weighted cohort age.
//!
//! Key behaviors
//! -------------
//! - [`age_matrix`] builds the age of cohort `c` in year `t` under an
//!   [`AgeConvention`].
//! - [`compute_mean_age`] optionally normalizes every cohort column by its
//!   inflow, converts each year row into shares of its total, and returns
//!   `Σ_c share[t][c] · age[t][c]`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Cohorts and years share one index: column `c` entered in year `c`, so
//!   the array is square.
//! - Entries above the diagonal (cohorts not yet born) carry age `0`, so any
//!   mass placed there contributes nothing.
//! - Totals of zero map to a zero reciprocal; a year without stock has mean
//!   age `0` rather than NaN.
//!
//! Conventions
//! -----------
//! - Stock is measured at the end of the year: a cohort is `1` in its
//!   inflow year and `t - c + 1` afterwards.
//! - Outflows happen during the year: a cohort leaving in year `t` is
//!   `t - c` old, so same-year outflows have age `0`.

use crate::{
    cohorts::errors::{AgeError, AgeResult},
    numerical_stability::safe_reciprocal,
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use tracing::trace;

/// What the year × cohort array measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AgeConvention {
    /// End-of-year stock.
    #[default]
    Stock,
    /// Outflows during the year.
    Outflow,
}

impl From<bool> for AgeConvention {
    /// `true` selects [`AgeConvention::Stock`], matching an `is_stock` flag.
    fn from(is_stock: bool) -> Self {
        if is_stock { AgeConvention::Stock } else { AgeConvention::Outflow }
    }
}

/// Age of cohort `c` in year `t` for an `n`-year horizon.
///
/// Returns
/// -------
/// `Array2<f64>` of shape `(n, n)` with
/// - `Stock`: `t - c + 1` for `c <= t`, `0` above the diagonal;
/// - `Outflow`: `t - c` for `c <= t`, `0` above the diagonal.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_stockflow::cohorts::{AgeConvention, age_matrix};
/// assert_eq!(
///     age_matrix(3, AgeConvention::Stock),
///     array![[1.0, 0.0, 0.0], [2.0, 1.0, 0.0], [3.0, 2.0, 1.0]]
/// );
/// ```
pub fn age_matrix(n: usize, convention: AgeConvention) -> Array2<f64> {
    let offset = match convention {
        AgeConvention::Stock => 1.0,
        AgeConvention::Outflow => 0.0,
    };
    Array2::from_shape_fn((n, n), |(t, c)| if c <= t { (t - c) as f64 + offset } else { 0.0 })
}

/// Mean age per year of a cohort-resolved stock or outflow.
///
/// Parameters
/// ----------
/// - `array`: `ArrayView2<f64>`
///   Square year × cohort array.
/// - `convention`: [`AgeConvention`]
///   Whether `array` holds stocks or outflows.
/// - `inflows`: `Option<ArrayView1<f64>>`
///   Per-cohort inflows. When given, column `c` is divided by `inflows[c]`
///   (zero inflow maps to zero) before shares are taken.
///
/// Returns
/// -------
/// `AgeResult<Array1<f64>>`
///   One mean age per year; `0` for years with zero total.
///
/// Errors
/// ------
/// - `AgeError::NonSquareArray` if rows and columns differ.
/// - `AgeError::InflowLengthMismatch` if `inflows` is not one value per
///   cohort.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_stockflow::cohorts::{AgeConvention, compute_mean_age};
/// let stock = array![[100.0, 0.0, 0.0], [100.0, 0.0, 0.0], [100.0, 0.0, 0.0]];
/// let age = compute_mean_age(stock.view(), AgeConvention::Stock, None).unwrap();
/// assert_eq!(age, array![1.0, 2.0, 3.0]);
/// ```
pub fn compute_mean_age(
    array: ArrayView2<'_, f64>, convention: AgeConvention, inflows: Option<ArrayView1<'_, f64>>,
) -> AgeResult<Array1<f64>> {
    let (rows, cols) = array.dim();
    if rows != cols {
        return Err(AgeError::NonSquareArray { rows, cols });
    }

    let mut weights = array.to_owned();
    if let Some(inflows) = inflows {
        if inflows.len() != cols {
            return Err(AgeError::InflowLengthMismatch { cohorts: cols, inflows: inflows.len() });
        }
        weights *= &safe_reciprocal(&inflows);
    }

    let inv_totals = safe_reciprocal(&weights.sum_axis(Axis(1)));
    let shares = weights * &inv_totals.insert_axis(Axis(1));
    let ages = age_matrix(rows, convention);

    trace!(years = rows, ?convention, normalized = inflows.is_some(), "computing mean age");
    Ok((shares * ages).sum_axis(Axis(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Age matrices under both conventions.
    // - Share-weighted mean ages for single and mixed cohorts.
    // - Inflow normalization, including zero inflows.
    // - Zero-total years and shape errors.
    // -------------------------------------------------------------------------

    #[test]
    fn outflow_ages_start_at_zero() {
        assert_eq!(
            age_matrix(3, AgeConvention::Outflow),
            array![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 1.0, 0.0]]
        );
        assert_eq!(AgeConvention::from(false), AgeConvention::Outflow);
        assert_eq!(AgeConvention::from(true), AgeConvention::Stock);
    }

    #[test]
    // Purpose
    // -------
    // A single cohort kept constant ages by one year per year.
    //
    // Given
    // -----
    // - Stock of 100 in cohort 0 for 3 years, nothing else.
    //
    // Expect
    // ------
    // - Stock ages [1, 2, 3]; outflow ages [0, 1, 2].
    fn single_cohort_ages_linearly() {
        let stock = array![[100.0, 0.0, 0.0], [100.0, 0.0, 0.0], [100.0, 0.0, 0.0]];

        let stock_age = compute_mean_age(stock.view(), AgeConvention::Stock, None).unwrap();
        let outflow_age = compute_mean_age(stock.view(), AgeConvention::Outflow, None).unwrap();

        assert_eq!(stock_age, array![1.0, 2.0, 3.0]);
        assert_eq!(outflow_age, array![0.0, 1.0, 2.0]);
    }

    #[test]
    fn mixed_cohorts_are_share_weighted() {
        // Year 1 holds 30 units aged 2 and 10 units aged 1.
        let stock = array![[30.0, 0.0], [30.0, 10.0]];

        let age = compute_mean_age(stock.view(), AgeConvention::Stock, None).unwrap();

        assert_relative_eq!(age[0], 1.0);
        assert_relative_eq!(age[1], (30.0 * 2.0 + 10.0 * 1.0) / 40.0);
    }

    #[test]
    // Purpose
    // -------
    // Inflow normalization turns absolute cohort sizes into survival
    // fractions before shares are taken; a zero inflow drops its cohort.
    //
    // Given
    // -----
    // - Year 1 stock [50, 50] with inflows [100, 50] and [100, 0].
    //
    // Expect
    // ------
    // - Fractions [0.5, 1.0] give age (0.5·2 + 1·1) / 1.5.
    // - A zero inflow for cohort 1 leaves only cohort 0, age 2.
    fn inflows_normalize_cohort_columns() {
        let stock = array![[100.0, 0.0], [50.0, 50.0]];

        let age = compute_mean_age(
            stock.view(),
            AgeConvention::Stock,
            Some(array![100.0, 50.0].view()),
        )
        .unwrap();
        assert_relative_eq!(age[1], (0.5 * 2.0 + 1.0 * 1.0) / 1.5, epsilon = 1e-12);

        let age = compute_mean_age(
            stock.view(),
            AgeConvention::Stock,
            Some(array![100.0, 0.0].view()),
        )
        .unwrap();
        assert_relative_eq!(age[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_year_has_zero_age() {
        let stock = array![[0.0, 0.0], [0.0, 5.0]];

        let age = compute_mean_age(stock.view(), AgeConvention::Stock, None).unwrap();

        assert_eq!(age, array![0.0, 1.0]);
    }

    #[test]
    fn rejects_shape_errors() {
        let rect = Array2::<f64>::zeros((2, 3));
        assert_eq!(
            compute_mean_age(rect.view(), AgeConvention::Stock, None),
            Err(AgeError::NonSquareArray { rows: 2, cols: 3 })
        );

        let square = Array2::<f64>::zeros((2, 2));
        assert_eq!(
            compute_mean_age(square.view(), AgeConvention::Stock, Some(array![1.0].view())),
            Err(AgeError::InflowLengthMismatch { cohorts: 2, inflows: 1 })
        );
    }
}
