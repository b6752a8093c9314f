//! utils — argument extraction helpers for the Python bindings.
//!
//! Convert loosely typed Python arguments (NumPy arrays, pandas objects,
//! lists, scalars) into the Rust types expected by the core modules. Type
//! errors surface as `TypeError`; value errors are left to the core
//! validators so both front-ends report the same messages.

#[cfg(feature = "python-bindings")]
use ndarray::Array2;

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::{PyAny, PyString},
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1, PyReadonlyArray2,
};

#[cfg(feature = "python-bindings")]
use crate::segments::uncertainty::{Distribution, PerSegment, ZeroLeadSkip};

/// Extract a contiguous 1-D float64 array from an ndarray, a pandas object
/// exposing `to_numpy`, or any sequence of floats.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Extract a 2-D float64 array from an ndarray, a pandas DataFrame or a list
/// of equal-length rows.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_matrix<'py>(raw_data: &Bound<'py, PyAny>) -> PyResult<Array2<f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(frame_ro.as_array().to_owned());
        }
    }

    let rows: Vec<Vec<f64>> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 2-D numpy.ndarray, pandas.DataFrame, or list of rows")
    })?;
    let ncols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|row| row.len() != ncols) {
        return Err(PyValueError::new_err("all rows must have the same length"));
    }
    let nrows = rows.len();
    Array2::from_shape_vec((nrows, ncols), rows.into_iter().flatten().collect())
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Extract a distribution argument: a name or a list of names.
#[cfg(feature = "python-bindings")]
pub fn extract_dist_arg(raw: &Bound<'_, PyAny>) -> PyResult<PerSegment<Distribution>> {
    if let Ok(name) = raw.downcast::<PyString>() {
        return Ok(PerSegment::Scalar(Distribution::from_name(name.to_str()?)));
    }
    let names: Vec<String> = raw
        .extract()
        .map_err(|_| PyTypeError::new_err("Variable dist must be of type list or string"))?;
    Ok(names.into())
}

/// Extract a parameter argument: a number or a list of numbers.
#[cfg(feature = "python-bindings")]
pub fn extract_param_arg(raw: &Bound<'_, PyAny>, argument: &str) -> PyResult<PerSegment<f64>> {
    if let Ok(value) = raw.extract::<f64>() {
        return Ok(PerSegment::Scalar(value));
    }
    let type_error =
        || PyTypeError::new_err(format!("Variable {argument} must be of type list, float or int"));
    if raw.is_instance_of::<PyString>() {
        return Err(type_error());
    }
    let values: Vec<f64> = raw.extract().map_err(|_| type_error())?;
    Ok(values.into())
}

/// Parse the zero-lead skip policy (`"always"` or `"when_detected"`).
#[cfg(feature = "python-bindings")]
pub fn extract_skip_policy(skip: Option<&str>) -> PyResult<ZeroLeadSkip> {
    match skip.unwrap_or("always") {
        "always" => Ok(ZeroLeadSkip::Always),
        "when_detected" => Ok(ZeroLeadSkip::WhenDetected),
        other => Err(PyValueError::new_err(format!(
            "invalid skip policy {:?} (expected 'always' or 'when_detected')",
            other
        ))),
    }
}
