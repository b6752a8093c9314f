//! parameters::sampling — apply one uncertainty draw to a parameter set.
//!
//! Purpose
//! -------
//! A sampling problem names the uncertain quantities of a model. Each draw
//! holds one relative deviation per name; applying it scales the named
//! parameters by `1 + deviation`. Names starting with [`INFLOW_SEGMENT_PREFIX`]
//! address segments of the inflow series instead of a parameter: their
//! deviations are collected in problem order and applied through
//! [`SegmentedSeries::multiply_inflows_by_piecewise_uncert`], and the result
//! replaces the inflow parameter [`INFLOW_PARAMETER`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Problem names are unique.
//! - Parameters not named by the problem are passed through unchanged;
//!   problem names matching no parameter are ignored.
//! - Inflow-segment names must appear in the same order as the segments of
//!   the inflow series.

use crate::{
    parameters::{
        errors::{ParamError, ParamResult},
        parameter::Parameter,
    },
    segments::{partition::TimePoint, series::SegmentedSeries},
};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Prefix of problem names that address inflow segments.
pub const INFLOW_SEGMENT_PREFIX: &str = "I-seg-";
/// Name of the inflow parameter replaced by segment draws.
pub const INFLOW_PARAMETER: &str = "I";
/// Index string of a replaced inflow parameter when none was supplied.
pub const TIME_INDEX: &str = "t";

/// Names of the uncertain quantities of a model.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplingProblem {
    names: Vec<String>,
}

impl SamplingProblem {
    /// Errors
    /// ------
    /// - `ParamError::DuplicateName` if a name occurs twice.
    pub fn new<I, S>(names: I) -> ParamResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(ParamError::DuplicateName { name: name.clone() });
            }
        }
        Ok(SamplingProblem { names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of `name` in the problem.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|candidate| candidate == name)
    }

    /// Problem positions addressing inflow segments, in problem order.
    pub fn inflow_segment_positions(&self) -> Vec<usize> {
        self.names
            .iter()
            .enumerate()
            .filter(|(_, name)| name.starts_with(INFLOW_SEGMENT_PREFIX))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Scale parameters (and inflow segments) by one draw.
///
/// Parameters
/// ----------
/// - `problem`: [`SamplingProblem`] naming the uncertain quantities.
/// - `draw`: one relative deviation per problem name.
/// - `values`: parameters by name, typically after
///   [`reduce_dimensions`](crate::parameters::reduce::reduce_dimensions).
/// - `inflows`: segmented inflow series of the current durable; required
///   when the problem contains inflow-segment names.
///
/// Returns
/// -------
/// `ParamResult<BTreeMap<String, Parameter>>`
///   Every input parameter, scaled where named. With inflow-segment draws,
///   `"I"` holds the scaled inflow series (keeping the index string of the
///   supplied `"I"`, or `"t"` when absent).
///
/// Errors
/// ------
/// - `ParamError::DrawLengthMismatch` if `draw.len() != problem.len()`.
/// - `ParamError::MissingInflowSeries` if inflow-segment draws exist but
///   `inflows` is `None`.
/// - `ParamError::Segment` if the draws do not match the inflow segments.
/// - `ParamError::RankMismatch` if the supplied `"I"` is not one-dimensional.
pub fn multiply_by_uncertainty<T: TimePoint>(
    problem: &SamplingProblem, draw: &[f64], values: &BTreeMap<String, Parameter>,
    inflows: Option<&SegmentedSeries<T>>,
) -> ParamResult<BTreeMap<String, Parameter>> {
    if draw.len() != problem.len() {
        return Err(ParamError::DrawLengthMismatch { expected: problem.len(), actual: draw.len() });
    }

    let mut scaled = BTreeMap::new();
    for (name, param) in values {
        let param = match problem.position(name) {
            Some(i) => param.with_values(param.values().mapv(|v| v * (1.0 + draw[i]))),
            None => param.clone(),
        };
        scaled.insert(name.clone(), param);
    }

    let u_inflows: Vec<f64> =
        problem.inflow_segment_positions().into_iter().map(|i| draw[i]).collect();
    if !u_inflows.is_empty() {
        let series = inflows.ok_or(ParamError::MissingInflowSeries)?;
        let inflow = series.multiply_inflows_by_piecewise_uncert(&u_inflows)?;
        let indices = values
            .get(INFLOW_PARAMETER)
            .map_or(TIME_INDEX.to_string(), |param| param.indices().to_string());
        scaled.insert(INFLOW_PARAMETER.to_string(), Parameter::new(indices, inflow.into_dyn())?);
    }

    debug!(parameters = scaled.len(), inflow_segments = u_inflows.len(), "applied draw");
    Ok(scaled)
}
