//! rust_stockflow — segmented uncertainty and cohort statistics for
//! dynamic stock-flow models, with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the core routines to Python via the `_rust_stockflow` extension
//! module. When the `python-bindings` feature is enabled, this module defines
//! the Python-facing classes, functions and submodules used by the
//! `rust_stockflow` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules: [`segments`] (piecewise uncertainty of
//!   time series), [`cohorts`] (mean age of stocks and outflows),
//!   [`parameters`] (dimensioned parameters and sampling) and
//!   [`numerical_stability`] (zero-safe reciprocals).
//! - Define the `TimeSeriesSegments` `#[pyclass]` and the `calculate_age` /
//!   `reciprocal` `#[pyfunction]`s, and register them in the `segments` and
//!   `cohorts` submodules of `_rust_stockflow`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in the inner Rust modules; this file
//!   performs only FFI glue, argument extraction, and error mapping.
//! - Python time axes are integer years (`i64`).
//!
//! Conventions
//! -----------
//! - Python-exposed items live under `_rust_stockflow.<submodule>` and are
//!   typically wrapped by thin pure-Python facades.
//! - Results are returned as Python lists (`Vec<f64>`), matching the
//!   list-based interface of the segment API; `reciprocal` preserves the
//!   NumPy array it is given.
//! - Errors from core Rust code are converted to `PyErr` at the boundary
//!   (`ValueError`, or `AttributeError` for unconfigured uncertainty);
//!   arguments of the wrong type raise `TypeError`.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend directly on the inner modules and can
//!   ignore the PyO3 items guarded by the `python-bindings` feature.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by the
//!   integration tests under `tests/`.

pub mod cohorts;
pub mod numerical_stability;
pub mod parameters;
pub mod segments;
pub mod utils;

#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArrayDyn, PyReadonlyArrayDyn};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    cohorts::{AgeConvention, compute_mean_age},
    numerical_stability::safe_reciprocal,
    segments::{SegmentError, SegmentedSeries, UncertaintyConfig},
    utils::{
        extract_dist_arg, extract_f64_array, extract_f64_matrix, extract_param_arg,
        extract_skip_policy,
    },
};

/// TimeSeriesSegments — Python-facing wrapper for [`SegmentedSeries`].
///
/// Purpose
/// -------
/// Let Python callers divide a yearly series into trend segments, attach
/// per-segment uncertainty, and shift or bound the series segment by segment.
///
/// Parameters
/// ----------
/// Constructed from Python via `TimeSeriesSegments(x, y, seg_delim, y_name=None)`:
/// - `x`: `list[int]`
///   Strictly increasing years.
/// - `y`: array-like of float
///   Values aligned with `x`, at least one strictly positive.
/// - `seg_delim`: `list[int]`
///   Interior years at which the trend changes.
/// - `y_name`: `Optional[str]`
///   Label prefix of uncertainty entries; defaults to `"y"`.
///
/// Fields
/// ------
/// - `inner`: [`SegmentedSeries<i64>`]
///   Rust-side series that owns values, partition and uncertainty table.
///
/// Notes
/// -----
/// - Native Rust code should use [`SegmentedSeries`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_stockflow.segments")]
pub struct TimeSeriesSegments {
    inner: SegmentedSeries<i64>,
}

#[cfg(feature = "python-bindings")]
impl TimeSeriesSegments {
    fn entries(&self) -> PyResult<&[crate::segments::SegmentUncertainty]> {
        let model = self.inner.uncertainty().ok_or(SegmentError::UncertaintyNotConfigured)?;
        Ok(model.entries())
    }
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl TimeSeriesSegments {
    #[new]
    #[pyo3(
        signature = (x, y, seg_delim, y_name = None),
        text_signature = "(x, y, seg_delim, /, y_name=None)"
    )]
    pub fn new<'py>(
        py: Python<'py>, x: Vec<i64>, y: &Bound<'py, PyAny>, seg_delim: Vec<i64>,
        y_name: Option<&str>,
    ) -> PyResult<Self> {
        let y = extract_f64_array(py, y)?.as_array().to_owned();
        let inner = SegmentedSeries::new(x, y, &seg_delim, y_name)?;
        Ok(TimeSeriesSegments { inner })
    }

    #[getter]
    pub fn x(&self) -> Vec<i64> {
        self.inner.x().to_vec()
    }

    #[getter]
    pub fn y(&self) -> Vec<f64> {
        self.inner.y().to_vec()
    }

    #[getter]
    pub fn y_name(&self) -> String {
        self.inner.y_name().to_string()
    }

    /// Segment boundaries including the automatic first, zero-lead and last
    /// points.
    #[getter]
    pub fn seg_delim(&self) -> Vec<i64> {
        self.inner.boundaries().to_vec()
    }

    #[getter]
    pub fn zeros_segment(&self) -> bool {
        self.inner.has_zero_lead()
    }

    #[getter]
    pub fn no_of_segments(&self) -> usize {
        self.inner.segment_count()
    }

    #[getter]
    pub fn no_of_nonzero_segments(&self) -> usize {
        self.inner.nonzero_segment_count()
    }

    /// Labels of the configured uncertainty entries.
    #[getter]
    pub fn uncert_names(&self) -> PyResult<Vec<String>> {
        Ok(self.entries()?.iter().map(|entry| entry.name.clone()).collect())
    }

    #[getter]
    pub fn uncert_dists(&self) -> PyResult<Vec<String>> {
        Ok(self.entries()?.iter().map(|entry| entry.dist.name().to_string()).collect())
    }

    #[getter]
    pub fn uncert_bounds(&self) -> PyResult<Vec<(f64, f64)>> {
        Ok(self.entries()?.iter().map(|entry| entry.params).collect())
    }

    pub fn get_x_segments(&self) -> Vec<Vec<i64>> {
        self.inner.get_x_segments().into_iter().map(<[i64]>::to_vec).collect()
    }

    pub fn get_y_segments(&self) -> Vec<Vec<f64>> {
        self.inner.get_y_segments().into_iter().map(|segment| segment.to_vec()).collect()
    }

    #[staticmethod]
    pub fn combine_segments(var_seg: Vec<Vec<f64>>) -> Vec<f64> {
        crate::segments::combine_segments(&var_seg)
    }

    pub fn add_shift<'py>(&mut self, py: Python<'py>, shift: &Bound<'py, PyAny>) -> PyResult<()> {
        let shift = extract_f64_array(py, shift)?;
        self.inner.add_shift(shift.as_slice()?)?;
        Ok(())
    }

    pub fn multiply_inflows_by_piecewise_uncert<'py>(
        &self, py: Python<'py>, u_inflows: &Bound<'py, PyAny>,
    ) -> PyResult<Vec<f64>> {
        let u_inflows = extract_f64_array(py, u_inflows)?;
        Ok(self.inner.multiply_inflows_by_piecewise_uncert(u_inflows.as_slice()?)?.to_vec())
    }

    #[pyo3(
        signature = (dist, par1, par2, skip = None),
        text_signature = "(self, dist, par1, par2, /, skip='always')"
    )]
    pub fn add_uncertainties<'py>(
        &mut self, dist: &Bound<'py, PyAny>, par1: &Bound<'py, PyAny>, par2: &Bound<'py, PyAny>,
        skip: Option<&str>,
    ) -> PyResult<()> {
        let config = UncertaintyConfig {
            dist: extract_dist_arg(dist)?,
            par1: extract_param_arg(par1, "par1")?,
            par2: extract_param_arg(par2, "par2")?,
            skip: extract_skip_policy(skip)?,
        };
        self.inner.configure_uncertainty(&config)?;
        Ok(())
    }

    /// Lower and upper bounds at `no_st_dev` standard deviations.
    pub fn get_stdevs(&self, no_st_dev: usize) -> PyResult<(Vec<f64>, Vec<f64>)> {
        let (lower, upper) = self.inner.get_stdevs(no_st_dev)?;
        Ok((lower.to_vec(), upper.to_vec()))
    }

    /// Lower and upper bounds at a two-sided confidence level in percent.
    pub fn get_confidence_bounds(&self, level: f64) -> PyResult<(Vec<f64>, Vec<f64>)> {
        let (lower, upper) = self.inner.get_confidence_bounds(level)?;
        Ok((lower.to_vec(), upper.to_vec()))
    }
}

/// calculate_age — mean age per year of a cohort-resolved stock or outflow.
///
/// Called from Python as `calculate_age(array, isstock=True, inflows=None)`
/// and forwarded to [`compute_mean_age`].
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (array, isstock = true, inflows = None),
    text_signature = "(array, /, isstock=True, inflows=None)"
)]
pub fn calculate_age<'py>(
    py: Python<'py>, array: &Bound<'py, PyAny>, isstock: bool, inflows: Option<&Bound<'py, PyAny>>,
) -> PyResult<Vec<f64>> {
    let array = extract_f64_matrix(array)?;
    let inflows: Option<Array1<f64>> = match inflows {
        Some(raw) => Some(extract_f64_array(py, raw)?.as_array().to_owned()),
        None => None,
    };
    let age = compute_mean_age(
        array.view(),
        AgeConvention::from(isstock),
        inflows.as_ref().map(|inflows| inflows.view()),
    )?;
    Ok(age.to_vec())
}

/// reciprocal — element-wise `1 / x` with zeros mapped to zero.
///
/// NumPy arrays of any dimension keep their shape; other sequences are
/// treated as 1-D.
#[cfg(feature = "python-bindings")]
#[pyfunction]
pub fn reciprocal<'py>(
    py: Python<'py>, array: &Bound<'py, PyAny>,
) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
    if let Ok(arr_ro) = array.extract::<PyReadonlyArrayDyn<f64>>() {
        return Ok(safe_reciprocal(&arr_ro.as_array()).into_pyarray(py));
    }
    let arr = extract_f64_array(py, array)?;
    Ok(safe_reciprocal(&arr.as_array()).into_dyn().into_pyarray(py))
}

/// _rust_stockflow — Python extension module initializer.
///
/// Purpose
/// -------
/// Build the `_rust_stockflow` module, create the `segments` and `cohorts`
/// submodules, and register them in `sys.modules` so that
/// `import rust_stockflow.segments` works.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_stockflow<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let segments_mod = PyModule::new(_py, "segments")?;
    let cohorts_mod = PyModule::new(_py, "cohorts")?;
    segments(_py, m, &segments_mod)?;
    cohorts(_py, m, &cohorts_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("rust_stockflow.segments", segments_mod)?;

    _py.import("sys")?.getattr("modules")?.set_item("rust_stockflow.cohorts", cohorts_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn segments<'py>(
    _py: Python, rust_stockflow: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<TimeSeriesSegments>()?;
    rust_stockflow.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn cohorts<'py>(
    _py: Python, rust_stockflow: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(calculate_age, m)?)?;
    m.add_function(wrap_pyfunction!(reciprocal, m)?)?;
    rust_stockflow.add_submodule(m)?;
    Ok(())
}
