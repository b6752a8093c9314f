//! parameters::reduce — specialize parameter tables to one durable.
//!
//! Purpose
//! -------
//! Model parameters are defined over all durables (`d`) and, for appliance
//! properties, over all appliances (`a`). Before running a single-durable
//! model, every parameter is sliced at the durable's coordinate along these
//! axes and the axes are dropped.
//!
//! Key behaviors
//! -------------
//! - The `d` axis is always reduced when present.
//! - The `a` axis is reduced unless the durable is listed in
//!   [`ReduceOptions::appliance_exempt`]; exempt durables keep the full
//!   appliance dimension.
//! - Axis positions are looked up in the current index string after each
//!   reduction, so the order of `d` and `a` in the index string does not
//!   matter.

use crate::parameters::{
    errors::{ParamError, ParamResult},
    index_table::IndexTable,
    parameter::Parameter,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Index letter of the durable dimension.
pub const DURABLE_INDEX: char = 'd';
/// Index letter of the appliance dimension.
pub const APPLIANCE_INDEX: char = 'a';

/// Options for [`reduce_dimensions`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReduceOptions {
    /// Durables whose appliance axis is kept.
    pub appliance_exempt: Vec<String>,
}

impl Default for ReduceOptions {
    fn default() -> Self {
        ReduceOptions { appliance_exempt: vec!["furniture".to_string(), "cupboard".to_string()] }
    }
}

impl ReduceOptions {
    fn is_exempt(&self, durable: &str) -> bool {
        self.appliance_exempt.iter().any(|exempt| exempt == durable)
    }
}

/// Slice every parameter at `durable` along the `d` and `a` axes.
///
/// Parameters
/// ----------
/// - `table`: [`IndexTable`] holding the `d` (and, if used, `a`) aspects.
/// - `durable`: item name; must be an item of every aspect it is reduced on.
/// - `params`: parameters by name.
/// - `options`: appliance exemption list.
///
/// Errors
/// ------
/// - `ParamError::UnknownIndex` if a parameter uses `d`/`a` but the table
///   lacks that aspect.
/// - `ParamError::UnknownItem` if `durable` is not an item of it.
///
/// Examples
/// --------
/// ```rust
/// # use std::collections::BTreeMap;
/// # use ndarray::array;
/// # use rust_stockflow::parameters::{Aspect, IndexTable, Parameter, ReduceOptions, reduce_dimensions};
/// let table = IndexTable::new(vec![Aspect::new("Durable", 'd', ["fridge", "sofa"])]).unwrap();
/// let mut params = BTreeMap::new();
/// params.insert("k".to_string(), Parameter::new("d", array![2.0, 3.0].into_dyn()).unwrap());
///
/// let reduced = reduce_dimensions(&table, "sofa", &params, &ReduceOptions::default()).unwrap();
/// assert_eq!(reduced["k"].as_scalar(), Some(3.0));
/// ```
pub fn reduce_dimensions(
    table: &IndexTable, durable: &str, params: &BTreeMap<String, Parameter>,
    options: &ReduceOptions,
) -> ParamResult<BTreeMap<String, Parameter>> {
    let reduce_appliance = !options.is_exempt(durable);

    let mut reduced = BTreeMap::new();
    for (name, param) in params {
        let mut param = reduce_axis(table, param.clone(), DURABLE_INDEX, durable)?;
        if reduce_appliance {
            param = reduce_axis(table, param, APPLIANCE_INDEX, durable)?;
        }
        reduced.insert(name.clone(), param);
    }

    debug!(durable, parameters = reduced.len(), reduce_appliance, "reduced parameter dimensions");
    Ok(reduced)
}

fn reduce_axis(
    table: &IndexTable, param: Parameter, letter: char, durable: &str,
) -> ParamResult<Parameter> {
    let Some(axis) = param.axis_of(letter) else {
        return Ok(param);
    };
    let expected = table.size(letter)?;
    let actual = param.values().len_of(axis);
    if actual != expected {
        return Err(ParamError::ShapeMismatch { letter, expected, actual });
    }
    let position = table.item_position(letter, durable)?;
    Ok(param.select(letter, position))
}
