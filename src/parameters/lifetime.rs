//! parameters::lifetime — Weibull lifetime conversions.
//!
//! Product lifetimes are modelled as Weibull(λ, k) with scale λ and shape k.
//! Parameter tables may specify either the mean lifetime or the scale; this
//! module maps scales to means, `μ = λ · Γ(1 + 1/k)`.

use crate::parameters::errors::{ParamError, ParamResult};
use ndarray::{Array, ArrayBase, Data, Dimension};
use statrs::function::gamma::gamma;

/// Mean lifetime for Weibull scale parameters and a common shape `k`.
///
/// Parameters
/// ----------
/// - `scale`: scale parameters λ, any dimension.
/// - `k`: shape parameter, finite and `> 0`.
///
/// Returns
/// -------
/// `ParamResult<Array<f64, D>>`
///   `λ · Γ(1 + 1/k)` element-wise.
///
/// Errors
/// ------
/// - `ParamError::InvalidShape` if `k` is not finite or `k <= 0`.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_stockflow::parameters::mean_from_scale_parameters;
/// // k = 1 is the exponential distribution: mean equals scale.
/// let mu = mean_from_scale_parameters(&array![10.0, 12.0], 1.0).unwrap();
/// assert!((mu[0] - 10.0).abs() < 1e-9 && (mu[1] - 12.0).abs() < 1e-9);
/// ```
pub fn mean_from_scale_parameters<S, D>(scale: &ArrayBase<S, D>, k: f64) -> ParamResult<Array<f64, D>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    if !k.is_finite() || k <= 0.0 {
        return Err(ParamError::InvalidShape { value: k });
    }
    let factor = gamma(1.0 + 1.0 / k);
    Ok(scale.mapv(|lambda| lambda * factor))
}
