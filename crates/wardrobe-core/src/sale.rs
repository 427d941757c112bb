//! # Item Store & Sale Mutator
//!
//! The item store is the authoritative catalog. After load it changes in
//! exactly one way: a sale confirmed by the backend replaces one item.
//!
//! ## Sale Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  store.sell(id) ──► precondition: exists AND stock > 0                 │
//! │        │                  │                                             │
//! │        │                  └──✗──► ItemNotFound / InvalidOperation       │
//! │        ▼                                                                │
//! │  POST /api/sell/{id}  (wardrobe-client)                                 │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  store.with_confirmed(server_item) ──► NEW store, item replaced by id   │
//! │                                                                         │
//! │  The server's copy is merged as-is, never re-derived locally, so the   │
//! │  store cannot drift from the source of truth.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::types::{Item, ItemId};
use crate::validation::{validate_catalog, validate_item};

/// Records one sale on an item: `stock - 1`, `sold + 1`.
///
/// Refuses with `InvalidOperation` at zero stock instead of going negative.
///
/// ## Example
/// ```rust
/// use wardrobe_core::sale::sell_one;
/// # use wardrobe_core::{Item, ItemId, Money};
/// # let item = Item {
/// #     id: ItemId::new(1), item_type: "Camiseta".into(), color: "Branco".into(),
/// #     size: "M".into(), season: "Verao".into(), gender: "Unissex".into(),
/// #     price: Money::from_cents(4990), stock: 5, sold: 10,
/// #     image_ref: None, legacy_availability: None,
/// # };
/// let updated = sell_one(&item).unwrap();
/// assert_eq!((updated.stock, updated.sold), (4, 11));
/// ```
pub fn sell_one(item: &Item) -> CoreResult<Item> {
    if item.stock == 0 {
        return Err(CoreError::out_of_stock(item.id));
    }

    let mut updated = item.clone();
    updated.stock -= 1;
    updated.sold = updated.sold.saturating_add(1);
    Ok(updated)
}

// =============================================================================
// Item Store
// =============================================================================

/// Immutable snapshot of the catalog.
///
/// Cloning is cheap (shared slice); every change builds a new store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStore {
    items: Arc<[Item]>,
}

impl ItemStore {
    /// The store before anything was loaded.
    pub fn empty() -> Self {
        ItemStore {
            items: Arc::from(Vec::new()),
        }
    }

    /// Validates and adopts a fetched catalog.
    pub fn load(items: Vec<Item>) -> CoreResult<Self> {
        validate_catalog(&items)?;
        Ok(ItemStore {
            items: Arc::from(items),
        })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The item as it would look after one sale. The store is not touched.
    pub fn sell(&self, id: ItemId) -> CoreResult<Item> {
        let item = self.get(id).ok_or(CoreError::ItemNotFound(id))?;
        sell_one(item)
    }

    /// A new store with `confirmed` replacing the item of the same id.
    ///
    /// The store never grows: an unknown id is an error, not an insert.
    pub fn with_confirmed(&self, confirmed: Item) -> CoreResult<Self> {
        validate_item(&confirmed)?;
        let position = self
            .items
            .iter()
            .position(|item| item.id == confirmed.id)
            .ok_or(CoreError::ItemNotFound(confirmed.id))?;

        let mut items = self.items.to_vec();
        items[position] = confirmed;
        Ok(ItemStore {
            items: Arc::from(items),
        })
    }
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
