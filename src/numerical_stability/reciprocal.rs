//! Zero-safe reciprocals.
//!
//! Division by a cohort or year total is the normalization step of the age
//! computation. Totals are legitimately zero for years without stock and for
//! cohorts without inflow; the reciprocal of such a total is defined as `0`
//! so that the corresponding shares vanish instead of turning into NaN.
//!
//! # Provided items
//! - [`safe_reciprocal_scalar(x)`]: `1 / x`, or `0` when `x == 0`.
//! - [`safe_reciprocal(array)`]: the same map applied element-wise.

use ndarray::{Array, ArrayBase, Data, Dimension};

/// `1 / x`, with `0` mapped to `0`.
///
/// Both signed zeros map to `+0.0`. Non-zero inputs follow IEEE division, so
/// subnormal values may still produce `inf`.
#[inline]
pub fn safe_reciprocal_scalar(x: f64) -> f64 {
    if x == 0.0 { 0.0 } else { 1.0 / x }
}

/// Element-wise zero-safe reciprocal.
///
/// Parameters
/// ----------
/// - `array`: owned array or view of any dimension.
///
/// Returns
/// -------
/// `Array<f64, D>`
///   A new array of the same shape with `1 / x` where `x != 0` and `0`
///   elsewhere.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_stockflow::numerical_stability::safe_reciprocal;
/// assert_eq!(safe_reciprocal(&array![0.0, 2.0, 4.0]), array![0.0, 0.5, 0.25]);
/// ```
pub fn safe_reciprocal<S, D>(array: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    array.mapv(safe_reciprocal_scalar)
}
