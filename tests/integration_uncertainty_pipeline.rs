//! Integration tests for segmented uncertainty and cohort ages.
//!
//! Purpose
//! -------
//! - Validate the end-to-end sampling pipeline: from a raw inflow series,
//!   through segmentation and uncertainty configuration, to shocked inflows,
//!   confidence bounds, parameter reduction and sampling, and finally mean
//!   cohort ages of a stock built from those inflows.
//!
//! Coverage
//! --------
//! - `segments::SegmentedSeries`:
//!   - Construction with a leading zero run and manual delimiters.
//!   - `add_uncertainties`, `get_stdevs`, `get_confidence_bounds`.
//!   - `add_shift` vs `multiply_inflows_by_piecewise_uncert`.
//! - `parameters`:
//!   - `reduce_dimensions` followed by `multiply_by_uncertainty` with
//!     inflow-segment draws.
//!   - `mean_from_scale_parameters`.
//! - `cohorts::compute_mean_age` on a stock derived from sampled inflows.
//! - `tracing` output of the default skip policy, captured through a
//!   `tracing-subscriber` fmt layer writing into a shared buffer.
//!
//! Exclusions
//! ----------
//! - Error branches of individual building blocks; those are covered by
//!   unit tests.
//! - Python bindings.
use approx::assert_relative_eq;
use ndarray::{Array1, Array2, ArrayD, array};
use rust_stockflow::{
    cohorts::{AgeConvention, compute_mean_age},
    parameters::{
        Aspect, IndexTable, Parameter, ReduceOptions, SamplingProblem, mean_from_scale_parameters,
        multiply_by_uncertainty, reduce_dimensions,
    },
    segments::{SegmentError, SegmentedSeries, UncertaintyConfig, ZeroLeadSkip},
};
use std::{
    collections::BTreeMap,
    io,
    sync::{Arc, Mutex},
};
use tracing_subscriber::fmt::MakeWriter;

/// In-memory log sink shared between the subscriber and the test.
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = SharedBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Purpose
/// -------
/// Yearly inflows 2000–2009 that start at zero for two years, grow
/// linearly, and change trend in 2005.
fn inflow_series() -> SegmentedSeries<i64> {
    let x: Vec<i64> = (2000..2010).collect();
    let y = array![0.0, 0.0, 10.0, 12.0, 14.0, 16.0, 15.0, 14.0, 13.0, 12.0];
    SegmentedSeries::new(x, y, &[2005], Some("I")).unwrap()
}

/// Stock of a product without outflows: every cohort stays at its inflow.
fn stock_without_outflows(inflows: &Array1<f64>) -> Array2<f64> {
    let n = inflows.len();
    Array2::from_shape_fn((n, n), |(t, c)| if c <= t { inflows[c] } else { 0.0 })
}

#[test]
// Purpose
// -------
// Configure per-segment spreads, derive bounds, and check that a shocked
// series stays within the bounds it was drawn for.
//
// Given
// -----
// - Inflows with a two-year zero lead and segments 2002–2004, 2005–2009.
// - Spreads 5% and 10%.
//
// Expect
// ------
// - Zero-lead values are identical in both bounds.
// - ±2σ bounds scale each segment by (1 ∓ 2σ).
// - A shock of (+0.05, −0.1) lies inside the 2σ band.
fn configure_bound_and_shock_inflows() {
    let mut series = inflow_series();
    assert!(series.has_zero_lead());
    assert_eq!(series.boundaries(), &[2000, 2002, 2005, 2009]);
    assert_eq!(series.nonzero_segment_count(), 2);

    series.add_uncertainties("norm", 0.0, vec![0.05, 0.1]).unwrap();
    let names = series.uncertainty().map(|model| model.names()).unwrap_or_default();
    assert_eq!(names, vec!["I-2002-2004", "I-2005-2009"]);

    let (lower, upper) = series.get_stdevs(2).unwrap();
    assert_eq!(lower[0], 0.0);
    assert_eq!(upper[1], 0.0);
    assert_relative_eq!(lower[2], 9.0, epsilon = 1e-12);
    assert_relative_eq!(upper[9], 14.4, epsilon = 1e-12);

    let shocked = series.multiply_inflows_by_piecewise_uncert(&[0.05, -0.1]).unwrap();
    for i in 0..shocked.len() {
        assert!(lower[i] - 1e-12 <= shocked[i] && shocked[i] <= upper[i] + 1e-12, "index {i}");
    }

    let (lo95, hi95) = series.get_confidence_bounds(95.0).unwrap();
    assert!(lo95[5] > lower[5] && hi95[5] < upper[5]);
}

#[test]
fn shifts_compound_while_inflow_scaling_is_pure() {
    let mut series = inflow_series();
    let original = series.y().to_owned();

    let scaled = series.multiply_inflows_by_piecewise_uncert(&[0.1, 0.1]).unwrap();
    assert_eq!(series.y(), original);

    series.add_shift(&[0.1, 0.1]).unwrap();
    assert_eq!(series.y(), scaled);

    series.add_shift(&[0.1, 0.1]).unwrap();
    assert_relative_eq!(series.y()[2], 10.0 * 1.1 * 1.1, epsilon = 1e-12);

    let combined = SegmentedSeries::<i64>::combine_segments(series.get_y_segments());
    assert_eq!(combined, series.y().to_owned());
}

#[test]
// Purpose
// -------
// The skip policy is observable end to end: a series without zero lead
// cannot produce bounds under the default policy (and says so in a
// warning) but can under `WhenDetected`.
fn skip_policy_governs_series_without_zero_lead() {
    let x: Vec<i64> = (2000..2006).collect();
    let y = array![5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
    let mut series = SegmentedSeries::new(x, y, &[2003], None).unwrap();

    let buffer = SharedBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        series.add_uncertainties("norm", 0.0, 0.1).unwrap();
    });
    let logs = buffer.contents();
    assert!(logs.contains("WARN") && logs.contains("no uncertainty entry"), "logs: {logs}");
    assert_eq!(series.get_stdevs(1), Err(SegmentError::MissingSegmentUncertainty { segment: 0 }));

    series
        .configure_uncertainty(
            &UncertaintyConfig::new("norm", 0.0, 0.1).with_skip(ZeroLeadSkip::WhenDetected),
        )
        .unwrap();
    let (lower, _) = series.get_stdevs(1).unwrap();
    assert_relative_eq!(lower[0], 4.5, epsilon = 1e-12);
}

#[test]
// Purpose
// -------
// Run one Monte Carlo step: reduce parameters to one durable, apply a
// draw that shocks a lifetime scale and both inflow segments, and compute
// the mean age of the resulting stock.
//
// Given
// -----
// - Parameters "scale" (d) and "I" (t) for two durables.
// - Problem ["scale", "I-seg-2002-2004", "I-seg-2005-2009"] and draw
//   [0.1, 0.0, 0.0].
//
// Expect
// ------
// - The reduced "scale" is the fridge entry times 1.1; its Weibull mean
//   with k = 1 equals the scale.
// - Inflows are unchanged by zero draws.
// - In the first non-zero year the stock has age 1.
fn sample_parameters_and_compute_ages() {
    let table = IndexTable::new(vec![
        Aspect::new("Time", 't', (2000..2010).map(|year| year.to_string())),
        Aspect::new("Durable", 'd', ["fridge", "sofa"]),
    ])
    .unwrap();
    let series = inflow_series();

    let params = BTreeMap::from([
        ("scale".to_string(), Parameter::new("d", array![12.0, 20.0].into_dyn()).unwrap()),
        ("I".to_string(), Parameter::new("t", series.y().to_owned().into_dyn()).unwrap()),
    ]);
    for param in params.values() {
        param.validate_against(&table).unwrap();
    }

    let reduced = reduce_dimensions(&table, "fridge", &params, &ReduceOptions::default()).unwrap();
    assert_eq!(reduced["scale"].as_scalar(), Some(12.0));

    let problem =
        SamplingProblem::new(["scale", "I-seg-2002-2004", "I-seg-2005-2009"]).unwrap();
    let sampled =
        multiply_by_uncertainty(&problem, &[0.1, 0.0, 0.0], &reduced, Some(&series)).unwrap();

    let scale: &ArrayD<f64> = sampled["scale"].values();
    let mean = mean_from_scale_parameters(scale, 1.0).unwrap();
    assert_relative_eq!(mean.iter().sum::<f64>(), 13.2, epsilon = 1e-9);

    let inflows = sampled["I"].values().clone().into_dimensionality::<ndarray::Ix1>().unwrap();
    assert_eq!(inflows, series.y().to_owned());

    let stock = stock_without_outflows(&inflows);
    let age = compute_mean_age(stock.view(), AgeConvention::Stock, Some(inflows.view())).unwrap();
    assert_eq!(age[0], 0.0);
    assert_relative_eq!(age[2], 1.0, epsilon = 1e-12);
    // Year 3 holds the 2002 and 2003 cohorts in full, with equal weight.
    assert_relative_eq!(age[3], 1.5, epsilon = 1e-12);
}
