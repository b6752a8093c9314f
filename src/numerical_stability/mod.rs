//! numerical_stability — guarded element-wise transforms.
//!
//! Purpose
//! -------
//! Collect small numerical helpers that must never raise or produce
//! non-finite values on degenerate inputs, so the cohort and segment layers
//! can normalize by totals without special-casing empty cohorts.
//!
//! Key behaviors
//! -------------
//! - [`safe_reciprocal`] computes `1 / x` element-wise for arrays of any
//!   dimension and maps exact zeros to zero instead of ±inf.
//!
//! Conventions
//! -----------
//! - Helpers are pure, allocate one output array, and never log.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`reciprocal`] cover the zero guard, signed values and
//!   rank-2 inputs.

pub mod reciprocal;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::reciprocal::{safe_reciprocal, safe_reciprocal_scalar};
