//! segments::uncertainty — per-segment uncertainty table.
//!
//! Purpose
//! -------
//! Describe the parametric uncertainty attached to each non-zero segment of a
//! [`SegmentedSeries`](crate::segments::series::SegmentedSeries): a named
//! distribution and a parameter pair per segment, labelled by the series name
//! and the first/last time point of the segment.
//!
//! Key behaviors
//! -------------
//! - [`PerSegment`] accepts either a scalar (broadcast to every non-zero
//!   segment) or a per-segment list of exactly the right length; a single
//!   validator serves `dist`, `par1` and `par2`.
//! - [`UncertaintyModel::build`] validates all three arguments before
//!   building anything, so a failed configuration leaves the previous table
//!   untouched.
//! - [`ZeroLeadSkip`] selects which partition segment is left out of the
//!   table: `Always` skips the first segment unconditionally (historical
//!   behavior, the default); `WhenDetected` skips it only when it is the
//!   zero-lead segment.
//! - [`Distribution::relative_bounds`] turns a spread and a multiplier into
//!   lower/upper scaling factors; only the normal distribution is supported.
//!
//! Invariants & assumptions
//! ------------------------
//! - For normal distributions `params.1` is a relative standard deviation;
//!   `params.0` is carried but not used for bounds.
//! - Each entry records the partition segment it belongs to, so lookups never
//!   depend on table offsets.

use crate::segments::{
    errors::{SegmentError, SegmentResult},
    partition::{SegmentPartition, TimePoint},
};
use tracing::{debug, warn};

/// Name under which the normal distribution is configured.
pub const NORMAL_DIST_NAME: &str = "norm";

/// Distribution family attached to a segment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum Distribution {
    /// Normal distribution (`"norm"`).
    Normal,
    /// Any other name; accepted at configuration, rejected by bound queries.
    Other(String),
}

impl Distribution {
    /// Parse a distribution name. Unknown names are kept verbatim.
    pub fn from_name(name: &str) -> Distribution {
        if name == NORMAL_DIST_NAME {
            Distribution::Normal
        } else {
            Distribution::Other(name.to_string())
        }
    }

    /// Configured name of the distribution.
    pub fn name(&self) -> &str {
        match self {
            Distribution::Normal => NORMAL_DIST_NAME,
            Distribution::Other(name) => name,
        }
    }

    /// Lower/upper scaling factors for a segment.
    ///
    /// For the normal distribution these are `1 - spread * multiplier` and
    /// `1 + spread * multiplier`.
    ///
    /// Errors
    /// ------
    /// - `SegmentError::UnknownDistribution` for any other distribution.
    pub fn relative_bounds(&self, spread: f64, multiplier: f64) -> SegmentResult<(f64, f64)> {
        match self {
            Distribution::Normal => Ok((1.0 - spread * multiplier, 1.0 + spread * multiplier)),
            Distribution::Other(name) => {
                Err(SegmentError::UnknownDistribution { name: name.clone() })
            }
        }
    }
}

impl From<&str> for Distribution {
    fn from(name: &str) -> Self {
        Distribution::from_name(name)
    }
}

impl From<String> for Distribution {
    fn from(name: String) -> Self {
        Distribution::from_name(&name)
    }
}

impl From<Distribution> for String {
    fn from(dist: Distribution) -> Self {
        dist.name().to_string()
    }
}

/// Scalar shorthand or explicit per-segment values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum PerSegment<T> {
    /// One value broadcast to every non-zero segment.
    Scalar(T),
    /// One value per non-zero segment, in segment order.
    Each(Vec<T>),
}

impl<T: Clone> PerSegment<T> {
    /// Expand into exactly `expected` values.
    ///
    /// Errors
    /// ------
    /// - `SegmentError::CardinalityMismatch` when an explicit list does not
    ///   hold `expected` values; `argument` names the offending parameter.
    pub fn expand(&self, argument: &'static str, expected: usize) -> SegmentResult<Vec<T>> {
        match self {
            PerSegment::Scalar(value) => Ok(vec![value.clone(); expected]),
            PerSegment::Each(values) if values.len() == expected => Ok(values.clone()),
            PerSegment::Each(values) => Err(SegmentError::CardinalityMismatch {
                argument,
                expected,
                actual: values.len(),
            }),
        }
    }
}

impl From<f64> for PerSegment<f64> {
    fn from(value: f64) -> Self {
        PerSegment::Scalar(value)
    }
}

impl From<Vec<f64>> for PerSegment<f64> {
    fn from(values: Vec<f64>) -> Self {
        PerSegment::Each(values)
    }
}

impl From<&[f64]> for PerSegment<f64> {
    fn from(values: &[f64]) -> Self {
        PerSegment::Each(values.to_vec())
    }
}

impl From<&str> for PerSegment<Distribution> {
    fn from(name: &str) -> Self {
        PerSegment::Scalar(Distribution::from_name(name))
    }
}

impl From<Distribution> for PerSegment<Distribution> {
    fn from(dist: Distribution) -> Self {
        PerSegment::Scalar(dist)
    }
}

impl From<Vec<&str>> for PerSegment<Distribution> {
    fn from(names: Vec<&str>) -> Self {
        PerSegment::Each(names.into_iter().map(Distribution::from_name).collect())
    }
}

impl From<Vec<String>> for PerSegment<Distribution> {
    fn from(names: Vec<String>) -> Self {
        PerSegment::Each(names.iter().map(|name| Distribution::from_name(name)).collect())
    }
}

/// Which partition segment is left out of the uncertainty table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ZeroLeadSkip {
    /// Always skip the first partition segment, zero-lead or not.
    #[default]
    Always,
    /// Skip the first segment only when it is the zero-lead segment.
    WhenDetected,
}

impl ZeroLeadSkip {
    fn skipped_segments(self, has_zero_lead: bool) -> usize {
        match self {
            ZeroLeadSkip::Always => 1,
            ZeroLeadSkip::WhenDetected => usize::from(has_zero_lead),
        }
    }
}

/// Arguments of an uncertainty configuration.
///
/// Fields
/// ------
/// - `dist`: distribution name(s), scalar or one per non-zero segment.
/// - `par1`: first distribution parameter(s).
/// - `par2`: second distribution parameter(s); the relative standard
///   deviation for `"norm"`.
/// - `skip`: segment skip policy, [`ZeroLeadSkip::Always`] by default.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UncertaintyConfig {
    pub dist: PerSegment<Distribution>,
    pub par1: PerSegment<f64>,
    pub par2: PerSegment<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skip: ZeroLeadSkip,
}

impl UncertaintyConfig {
    /// Configuration with the default skip policy.
    pub fn new(
        dist: impl Into<PerSegment<Distribution>>, par1: impl Into<PerSegment<f64>>,
        par2: impl Into<PerSegment<f64>>,
    ) -> Self {
        UncertaintyConfig {
            dist: dist.into(),
            par1: par1.into(),
            par2: par2.into(),
            skip: ZeroLeadSkip::default(),
        }
    }

    /// Replace the skip policy.
    pub fn with_skip(mut self, skip: ZeroLeadSkip) -> Self {
        self.skip = skip;
        self
    }
}

/// One row of the uncertainty table.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentUncertainty {
    /// Partition segment this row belongs to.
    pub segment: usize,
    /// Label `"{y_name}-{first x}-{last x}"`.
    pub name: String,
    /// Distribution family.
    pub dist: Distribution,
    /// Distribution parameters `(par1, par2)`.
    pub params: (f64, f64),
}

impl SegmentUncertainty {
    /// Relative standard deviation (`par2`).
    pub fn spread(&self) -> f64 {
        self.params.1
    }
}

/// UncertaintyModel — uncertainty table of one segmented series.
///
/// Invariants
/// ----------
/// - At most one entry per partition segment, in ascending segment order.
/// - Never contains an entry for the zero-lead segment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UncertaintyModel {
    entries: Vec<SegmentUncertainty>,
}

impl UncertaintyModel {
    /// Validate `config` against `partition` and build the table.
    ///
    /// Parameters
    /// ----------
    /// - `y_name`: series name used in entry labels.
    /// - `x`: time axis of the series (for labels).
    /// - `partition`: resolved partition of the series.
    /// - `config`: distribution names, parameters and skip policy.
    ///
    /// Errors
    /// ------
    /// - `SegmentError::CardinalityMismatch` if `dist`, `par1` or `par2` is a
    ///   list whose length differs from the number of non-zero segments.
    pub fn build<T: TimePoint>(
        y_name: &str, x: &[T], partition: &SegmentPartition<T>, config: &UncertaintyConfig,
    ) -> SegmentResult<Self> {
        let expected = partition.nonzero_segment_count();
        let dists = config.dist.expand("dist", expected)?;
        let par1 = config.par1.expand("par1", expected)?;
        let par2 = config.par2.expand("par2", expected)?;

        let skipped = config.skip.skipped_segments(partition.has_zero_lead());
        if skipped > usize::from(partition.has_zero_lead()) {
            warn!(
                series = y_name,
                "first segment carries data but is skipped; it will have no uncertainty entry"
            );
        }

        let entries = partition.ranges()[skipped..]
            .iter()
            .enumerate()
            .map(|(i, range)| SegmentUncertainty {
                segment: skipped + i,
                name: format!("{y_name}-{}-{}", x[range.start], x[range.end - 1]),
                dist: dists[i].clone(),
                params: (par1[i], par2[i]),
            })
            .collect::<Vec<_>>();

        debug!(series = y_name, entries = entries.len(), skip = ?config.skip, "built uncertainty table");
        Ok(UncertaintyModel { entries })
    }

    /// All entries in segment order.
    pub fn entries(&self) -> &[SegmentUncertainty] {
        &self.entries
    }

    /// Entry labels in segment order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    /// Entry for partition segment `segment`, if configured.
    pub fn entry_for_segment(&self, segment: usize) -> Option<&SegmentUncertainty> {
        self.entries.iter().find(|entry| entry.segment == segment)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Scalar broadcast and exact-length validation of `PerSegment`.
    // - Table construction under both skip policies, with and without a
    //   zero-lead segment.
    // - Normal bound factors and the unknown-distribution error.
    //
    // Bound reconstruction over a full series is tested in `series`.
    // -------------------------------------------------------------------------

    fn zero_lead_partition() -> (Vec<i64>, SegmentPartition<i64>) {
        let x = vec![2000, 2001, 2002, 2003, 2004];
        let y = array![0.0, 0.0, 1.0, 2.0, 3.0];
        let partition = SegmentPartition::new(&x, y.view(), &[2003]).unwrap();
        (x, partition)
    }

    fn plain_partition() -> (Vec<i64>, SegmentPartition<i64>) {
        let x = vec![2000, 2001, 2002, 2003, 2004];
        let y = array![1.0, 1.0, 1.0, 2.0, 3.0];
        let partition = SegmentPartition::new(&x, y.view(), &[2002]).unwrap();
        (x, partition)
    }

    #[test]
    fn per_segment_scalar_broadcasts() {
        let spread: PerSegment<f64> = 0.05.into();
        assert_eq!(spread.expand("par2", 3).unwrap(), vec![0.05, 0.05, 0.05]);
    }

    #[test]
    fn per_segment_list_must_match_exactly() {
        let spread: PerSegment<f64> = vec![0.1, 0.2].into();

        assert_eq!(spread.expand("par2", 2).unwrap(), vec![0.1, 0.2]);
        assert_eq!(
            spread.expand("par2", 3),
            Err(SegmentError::CardinalityMismatch { argument: "par2", expected: 3, actual: 2 })
        );
    }

    #[test]
    // Purpose
    // -------
    // With a zero-lead segment both skip policies agree: the zero segment is
    // left out and every non-zero segment gets its own labelled entry.
    fn build_labels_nonzero_segments_after_zero_lead() {
        let (x, partition) = zero_lead_partition();
        let config = UncertaintyConfig::new("norm", 0.0, vec![0.1, 0.2]);

        let model = UncertaintyModel::build("I", &x, &partition, &config).unwrap();
        let detected = UncertaintyModel::build(
            "I",
            &x,
            &partition,
            &config.clone().with_skip(ZeroLeadSkip::WhenDetected),
        )
        .unwrap();

        assert_eq!(model.names(), vec!["I-2002-2002", "I-2003-2004"]);
        assert_eq!(model.entries()[0].segment, 1);
        assert_eq!(model.entries()[1].spread(), 0.2);
        assert_eq!(model, detected);
    }

    #[test]
    // Purpose
    // -------
    // Without a zero lead, the default policy still skips segment 0 while
    // `WhenDetected` covers every segment.
    fn build_skip_policies_differ_without_zero_lead() {
        let (x, partition) = plain_partition();
        let config = UncertaintyConfig::new("norm", 0.0, vec![0.1, 0.2]);

        let literal = UncertaintyModel::build("y", &x, &partition, &config).unwrap();
        let detected = UncertaintyModel::build(
            "y",
            &x,
            &partition,
            &config.with_skip(ZeroLeadSkip::WhenDetected),
        )
        .unwrap();

        assert_eq!(literal.len(), 1);
        assert!(literal.entry_for_segment(0).is_none());
        assert_eq!(literal.names(), vec!["y-2002-2004"]);
        assert_eq!(literal.entries()[0].spread(), 0.1);

        assert_eq!(detected.names(), vec!["y-2000-2001", "y-2002-2004"]);
        assert_eq!(detected.entry_for_segment(1).map(|e| e.spread()), Some(0.2));
    }

    #[test]
    fn build_reports_first_mismatched_argument() {
        let (x, partition) = zero_lead_partition();
        let config = UncertaintyConfig::new(vec!["norm", "norm", "norm"], 0.0, vec![0.1]);

        assert_eq!(
            UncertaintyModel::build("y", &x, &partition, &config),
            Err(SegmentError::CardinalityMismatch { argument: "dist", expected: 2, actual: 3 })
        );
    }

    #[test]
    fn relative_bounds_for_normal_and_unknown() {
        let (lo, hi) = Distribution::Normal.relative_bounds(0.05, 2.0).unwrap();
        assert!((lo - 0.9).abs() < 1e-12 && (hi - 1.1).abs() < 1e-12);

        let unknown = Distribution::from_name("lognorm");
        assert_eq!(unknown.name(), "lognorm");
        assert_eq!(
            unknown.relative_bounds(0.05, 2.0),
            Err(SegmentError::UnknownDistribution { name: "lognorm".to_string() })
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn uncertainty_config_serde_roundtrip() {
        let config = UncertaintyConfig::new("norm", 0.0, vec![0.05, 0.1])
            .with_skip(ZeroLeadSkip::WhenDetected);

        let encoded = serde_json::to_string(&config).expect("config should serialize");
        let decoded: UncertaintyConfig =
            serde_json::from_str(&encoded).expect("config should deserialize");

        assert_eq!(decoded, config);
        let parsed: UncertaintyConfig =
            serde_json::from_str(r#"{"dist":"norm","par1":0.0,"par2":[0.05,0.1]}"#)
                .expect("scalar shorthand should deserialize");
        assert_eq!(parsed.skip, ZeroLeadSkip::Always);
        assert_eq!(parsed.par2, PerSegment::Each(vec![0.05, 0.1]));
    }
}
