//! parameters::parameter — an n-dimensional parameter with named axes.

use crate::parameters::{
    errors::{ParamError, ParamResult},
    index_table::IndexTable,
};
use ndarray::{ArrayD, Axis, IxDyn};

/// Parameter — values indexed by an index string.
///
/// Fields
/// ------
/// - `indices`: `String`
///   One index letter per axis, e.g. `"td"` for time × durable.
/// - `values`: `ArrayD<f64>`
///   Parameter values; `values.ndim() == indices.chars().count()`.
///
/// Invariants
/// ----------
/// - No letter occurs twice in `indices`.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    indices: String,
    values: ArrayD<f64>,
}

impl Parameter {
    /// Pair values with their index string.
    ///
    /// Errors
    /// ------
    /// - `ParamError::RankMismatch` if the letter count differs from the
    ///   number of axes.
    /// - `ParamError::RepeatedIndex` if a letter occurs twice.
    pub fn new(indices: impl Into<String>, values: ArrayD<f64>) -> ParamResult<Self> {
        let indices = indices.into();
        if indices.chars().count() != values.ndim() {
            return Err(ParamError::RankMismatch { ndim: values.ndim(), indices });
        }
        for (i, letter) in indices.chars().enumerate() {
            if indices.chars().skip(i + 1).any(|other| other == letter) {
                return Err(ParamError::RepeatedIndex { indices: indices.clone(), letter });
            }
        }
        Ok(Parameter { indices, values })
    }

    /// A rank-0 parameter.
    pub fn scalar(value: f64) -> Self {
        Parameter { indices: String::new(), values: ArrayD::from_elem(IxDyn(&[]), value) }
    }

    pub fn indices(&self) -> &str {
        &self.indices
    }

    pub fn values(&self) -> &ArrayD<f64> {
        &self.values
    }

    /// The value of a rank-0 parameter.
    pub fn as_scalar(&self) -> Option<f64> {
        if self.values.ndim() == 0 { self.values.iter().next().copied() } else { None }
    }

    pub fn into_values(self) -> ArrayD<f64> {
        self.values
    }

    /// Axis carrying `letter`, if any.
    pub fn axis_of(&self, letter: char) -> Option<Axis> {
        self.indices.chars().position(|candidate| candidate == letter).map(Axis)
    }

    /// Check every axis length against the index table.
    ///
    /// Errors
    /// ------
    /// - `ParamError::UnknownIndex` for letters missing from `table`.
    /// - `ParamError::ShapeMismatch` for axes of the wrong length.
    pub fn validate_against(&self, table: &IndexTable) -> ParamResult<()> {
        for (letter, &actual) in self.indices.chars().zip(self.values.shape()) {
            let expected = table.size(letter)?;
            if expected != actual {
                return Err(ParamError::ShapeMismatch { letter, expected, actual });
            }
        }
        Ok(())
    }

    /// Fix the axis indexed by `letter` at `position` and drop it.
    ///
    /// Returns `self` unchanged when the parameter has no such axis.
    ///
    /// Panics
    /// ------
    /// - If `position` is out of bounds for that axis.
    pub(crate) fn select(self, letter: char, position: usize) -> Parameter {
        match self.axis_of(letter) {
            Some(axis) => Parameter {
                indices: self.indices.chars().filter(|&c| c != letter).collect(),
                values: self.values.index_axis(axis, position).to_owned(),
            },
            None => self,
        }
    }

    /// Same axes, new values of identical shape.
    pub(crate) fn with_values(&self, values: ArrayD<f64>) -> Parameter {
        Parameter { indices: self.indices.clone(), values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::index_table::Aspect;
    use ndarray::{Array, array};

    #[test]
    fn new_validates_rank_and_letters() {
        let values = Array::zeros(IxDyn(&[2, 3]));

        assert!(Parameter::new("td", values.clone()).is_ok());
        assert_eq!(
            Parameter::new("t", values.clone()),
            Err(ParamError::RankMismatch { indices: "t".to_string(), ndim: 2 })
        );
        assert_eq!(
            Parameter::new("tt", values),
            Err(ParamError::RepeatedIndex { indices: "tt".to_string(), letter: 't' })
        );
    }

    #[test]
    fn validate_against_checks_axis_lengths() {
        let table = IndexTable::new(vec![
            Aspect::new("Time", 't', ["2000", "2001"]),
            Aspect::new("Durable", 'd', ["fridge", "sofa", "lamp"]),
        ])
        .unwrap();

        let ok = Parameter::new("td", Array::zeros(IxDyn(&[2, 3]))).unwrap();
        let bad = Parameter::new("dt", Array::zeros(IxDyn(&[2, 3]))).unwrap();

        assert!(ok.validate_against(&table).is_ok());
        assert_eq!(
            bad.validate_against(&table),
            Err(ParamError::ShapeMismatch { letter: 'd', expected: 3, actual: 2 })
        );
    }

    #[test]
    fn select_drops_the_axis() {
        let values = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]].into_dyn();
        let param = Parameter::new("td", values).unwrap();

        let reduced = param.clone().select('d', 1);
        assert_eq!(reduced.indices(), "t");
        assert_eq!(reduced.values(), &array![2.0, 4.0, 6.0].into_dyn());

        assert_eq!(param.clone().select('a', 0), param);
        assert_eq!(Parameter::scalar(2.5).as_scalar(), Some(2.5));
        assert_eq!(param.as_scalar(), None);
    }
}
