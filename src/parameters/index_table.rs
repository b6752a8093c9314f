//! parameters::index_table — classification of model dimensions.
//!
//! Purpose
//! -------
//! Describe the dimensions ("aspects") that parameter arrays are indexed
//! by. Every aspect has a name, a one-letter index used in index strings
//! such as `"td"`, and an ordered list of items; the position of an item is
//! its coordinate along the corresponding axis.
//!
//! Invariants & assumptions
//! ------------------------
//! - Aspect names and index letters are unique within a table.
//! - Item order is significant and never re-sorted.

use crate::parameters::errors::{ParamError, ParamResult};
use std::collections::HashSet;

/// One classified dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aspect {
    pub name: String,
    pub letter: char,
    pub items: Vec<String>,
}

impl Aspect {
    pub fn new<I, S>(name: impl Into<String>, letter: char, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Aspect { name: name.into(), letter, items: items.into_iter().map(Into::into).collect() }
    }

    /// Position of `item` along this aspect's axis.
    pub fn position(&self, item: &str) -> Option<usize> {
        self.items.iter().position(|candidate| candidate == item)
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }
}

/// IndexTable — the set of aspects known to a model.
///
/// Examples
/// --------
/// ```rust
/// # use rust_stockflow::parameters::{Aspect, IndexTable};
/// let table = IndexTable::new(vec![
///     Aspect::new("Time", 't', ["2000", "2001"]),
///     Aspect::new("Durable", 'd', ["fridge", "sofa"]),
/// ])
/// .unwrap();
/// assert_eq!(table.item_position('d', "sofa").unwrap(), 1);
/// assert_eq!(table.size('t').unwrap(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexTable {
    aspects: Vec<Aspect>,
}

impl IndexTable {
    /// Build a table, rejecting duplicate names or letters.
    ///
    /// Errors
    /// ------
    /// - `ParamError::DuplicateAspect` / `ParamError::DuplicateIndexLetter`.
    pub fn new(aspects: Vec<Aspect>) -> ParamResult<Self> {
        let mut names = HashSet::new();
        let mut letters = HashSet::new();
        for aspect in &aspects {
            if !names.insert(aspect.name.as_str()) {
                return Err(ParamError::DuplicateAspect { name: aspect.name.clone() });
            }
            if !letters.insert(aspect.letter) {
                return Err(ParamError::DuplicateIndexLetter { letter: aspect.letter });
            }
        }
        Ok(IndexTable { aspects })
    }

    pub fn aspects(&self) -> &[Aspect] {
        &self.aspects
    }

    pub fn aspect(&self, name: &str) -> Option<&Aspect> {
        self.aspects.iter().find(|aspect| aspect.name == name)
    }

    pub fn aspect_for_letter(&self, letter: char) -> Option<&Aspect> {
        self.aspects.iter().find(|aspect| aspect.letter == letter)
    }

    /// Position of `item` along the axis indexed by `letter`.
    ///
    /// Errors
    /// ------
    /// - `ParamError::UnknownIndex` if `letter` is not in the table.
    /// - `ParamError::UnknownItem` if the aspect does not classify `item`.
    pub fn item_position(&self, letter: char, item: &str) -> ParamResult<usize> {
        let aspect = self.require(letter)?;
        aspect.position(item).ok_or_else(|| ParamError::UnknownItem {
            aspect: aspect.name.clone(),
            item: item.to_string(),
        })
    }

    /// Number of items of the aspect indexed by `letter`.
    pub fn size(&self, letter: char) -> ParamResult<usize> {
        Ok(self.require(letter)?.size())
    }

    /// Expected array shape for an index string.
    pub fn shape(&self, indices: &str) -> ParamResult<Vec<usize>> {
        indices.chars().map(|letter| self.size(letter)).collect()
    }

    fn require(&self, letter: char) -> ParamResult<&Aspect> {
        self.aspect_for_letter(letter).ok_or(ParamError::UnknownIndex { letter })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> IndexTable {
        IndexTable::new(vec![
            Aspect::new("Time", 't', ["2000", "2001", "2002"]),
            Aspect::new("Durable", 'd', ["fridge", "sofa"]),
        ])
        .unwrap()
    }

    #[test]
    fn lookups_resolve_letters_and_items() {
        let table = table();

        assert_eq!(table.aspect_for_letter('d').map(|a| a.name.as_str()), Some("Durable"));
        assert_eq!(table.aspect("Time").map(Aspect::size), Some(3));
        assert_eq!(table.shape("td").unwrap(), vec![3, 2]);
        assert_eq!(table.item_position('t', "2001").unwrap(), 1);
    }

    #[test]
    fn lookups_report_unknown_letters_and_items() {
        let table = table();

        assert_eq!(table.size('x'), Err(ParamError::UnknownIndex { letter: 'x' }));
        assert_eq!(
            table.item_position('d', "lamp"),
            Err(ParamError::UnknownItem { aspect: "Durable".to_string(), item: "lamp".to_string() })
        );
    }

    #[test]
    fn new_rejects_duplicates() {
        let dup_letter = IndexTable::new(vec![
            Aspect::new("Durable", 'd', ["fridge"]),
            Aspect::new("Dwelling", 'd', ["flat"]),
        ]);
        assert_eq!(dup_letter, Err(ParamError::DuplicateIndexLetter { letter: 'd' }));

        let dup_name = IndexTable::new(vec![
            Aspect::new("Durable", 'd', ["fridge"]),
            Aspect::new("Durable", 'e', ["flat"]),
        ]);
        assert_eq!(dup_name, Err(ParamError::DuplicateAspect { name: "Durable".to_string() }));
    }
}
