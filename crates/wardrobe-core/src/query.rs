//! # Query Engine
//!
//! Applies a [`Predicate`] to the item store.
//!
//! The filter is stable: survivors keep their store order. It runs in full on
//! every change, with no index and no incremental patching; catalogs are
//! small enough that a linear pass is the whole cost model.

use serde::Serialize;

use crate::filter::Predicate;
use crate::types::Item;

/// The items that passed the current filter, in store order.
///
/// An empty `FilteredSet` is a valid answer ("no matches"). Whether the
/// catalog has been loaded at all is tracked separately by
/// [`crate::state::LoadState`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct FilteredSet {
    items: Vec<Item>,
}

impl FilteredSet {
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }
}

impl<'a> IntoIterator for &'a FilteredSet {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Runs the predicate over every item, keeping the survivors in order.
pub fn query(items: &[Item], predicate: &Predicate) -> FilteredSet {
    FilteredSet {
        items: items
            .iter()
            .filter(|item| predicate.matches(item))
            .cloned()
            .collect(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::filter::{build, Constraint, FilterState};
    use crate::money::Money;
    use crate::types::{Field, ItemId};

    fn catalog() -> Vec<Item> {
        [
            (1, "Camiseta", "Branco", 3),
            (2, "Calca", "Preto", 0),
            (3, "Camiseta", "Preto", 1),
            (4, "Saia", "Vermelho", 5),
        ]
        .into_iter()
        .map(|(id, item_type, color, stock)| Item {
            id: ItemId::new(id),
            item_type: item_type.to_string(),
            color: color.to_string(),
            size: "M".to_string(),
            season: "Verao".to_string(),
            gender: "Unissex".to_string(),
            price: Money::from_cents(4990),
            stock,
            sold: 0,
            image_ref: None,
            legacy_availability: None,
        })
        .collect()
    }

    fn ids(set: &FilteredSet) -> Vec<u32> {
        set.iter().map(|item| item.id.get()).collect()
    }

    #[test]
    fn test_match_all_returns_store_in_order() {
        let items = catalog();
        let result = query(&items, &Predicate::match_all());
        assert_eq!(result.items(), items.as_slice());
    }

    #[test]
    fn test_query_is_stable() {
        let items = catalog();
        let result = query(&items, &build("preto", &BTreeMap::new()));
        assert_eq!(ids(&result), vec![2, 3]);
    }

    #[test]
    fn test_empty_result_is_valid() {
        let items = catalog();
        let state = FilterState::new().with_constraint(Field::Type, Constraint::parse("Vestido"));
        let result = query(&items, &state.predicate());
        assert!(result.is_empty());
        assert_eq!(result.len(), 0);
    }

    #[test]
    fn test_query_on_empty_store() {
        let result = query(&[], &Predicate::match_all());
        assert!(result.is_empty());
    }
}
