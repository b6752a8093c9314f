//! cohorts — cohort-resolved stock and outflow analysis.
//!
//! Purpose
//! -------
//! Derive per-year summary statistics from year × cohort arrays produced by
//! dynamic stock models. Currently this is the share-weighted mean age of a
//! stock or outflow, optionally relative to cohort inflows.
//!
//! Key behaviors
//! -------------
//! - [`age`] provides [`AgeConvention`], [`age_matrix`] and
//!   [`compute_mean_age`].
//! - [`errors`] defines [`AgeError`] / [`AgeResult`] for shape failures.
//!
//! Invariants & assumptions
//! ------------------------
//! - Arrays are square: cohort `c` enters in year `c`.
//! - Zero totals never raise; they are normalized through
//!   [`safe_reciprocal`](crate::numerical_stability::safe_reciprocal).
//!
//! Testing notes
//! -------------
//! - Unit tests in [`age`] cover both conventions, inflow normalization,
//!   zero-total years and shape errors.

pub mod age;
pub mod errors;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::age::{AgeConvention, age_matrix, compute_mean_age};
pub use self::errors::{AgeError, AgeResult};
