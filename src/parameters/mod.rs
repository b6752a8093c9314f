//! parameters — dimensioned model parameters and uncertainty sampling.
//!
//! Purpose
//! -------
//! Hold the parameter tables that drive a stock-flow model for a family of
//! durables, specialize them to one durable, and apply sampled relative
//! deviations (including piecewise inflow deviations through
//! [`SegmentedSeries`](crate::segments::SegmentedSeries)).
//!
//! Key behaviors
//! -------------
//! - [`index_table`]: aspects (dimension name, index letter, ordered items).
//! - [`parameter`]: `ArrayD<f64>` values tagged with an index string.
//! - [`reduce`]: [`reduce_dimensions`] slices parameters at one durable.
//! - [`sampling`]: [`SamplingProblem`] and [`multiply_by_uncertainty`].
//! - [`lifetime`]: Weibull scale → mean conversion.
//! - [`errors`]: [`ParamError`] / [`ParamResult`].
//!
//! Invariants & assumptions
//! ------------------------
//! - One index letter per axis, no repeats; axis lengths match the index
//!   table wherever a lookup is performed.
//! - Parameter maps are `BTreeMap`s so iteration order is deterministic.
//!
//! Conventions
//! -----------
//! - `d` indexes durables, `a` appliances, `t` time.
//! - Data loading (spreadsheets, CSV) is left to callers; this module only
//!   works on in-memory arrays.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its error branches; `reduce`
//!   tests both axis orders of `d` and `a`.

pub mod errors;
pub mod index_table;
pub mod lifetime;
pub mod parameter;
pub mod reduce;
pub mod sampling;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{ParamError, ParamResult};
pub use self::index_table::{Aspect, IndexTable};
pub use self::lifetime::mean_from_scale_parameters;
pub use self::parameter::Parameter;
pub use self::reduce::{ReduceOptions, reduce_dimensions};
pub use self::sampling::{SamplingProblem, multiply_by_uncertainty};
