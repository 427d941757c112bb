//! # Validation Module
//!
//! Input validation for catalogs coming from the backend and for the
//! filter input coming from the UI.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  ├── Shape of each record, integer counters (no negative stock)        │
//! │  └── Finite decimal prices                                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Unique item ids across the catalog                                │
//! │  ├── Non-negative prices, non-empty item type                          │
//! │  └── Bounded search input                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::Item;
use crate::{MAX_ITEM_PRICE, MAX_SEARCH_TERM_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a single item record.
///
/// ## Rules
/// - `type` must not be empty (it is the key of three charts)
/// - `price` must not be negative nor above [`MAX_ITEM_PRICE`]
pub fn validate_item(item: &Item) -> ValidationResult<()> {
    if item.item_type.trim().is_empty() {
        return Err(ValidationError::Required {
            field: format!("type of item {}", item.id),
        });
    }

    if item.price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: format!("price of item {}", item.id),
        });
    }

    if item.price > MAX_ITEM_PRICE {
        return Err(ValidationError::TooLarge {
            field: format!("price of item {}", item.id),
            max: MAX_ITEM_PRICE.to_decimal_string(),
        });
    }

    Ok(())
}

/// Validates a whole catalog before it becomes the item store.
///
/// Every record must pass [`validate_item`] and ids must be unique.
///
/// ## Example
/// ```rust
/// use wardrobe_core::validation::validate_catalog;
///
/// assert!(validate_catalog(&[]).is_ok());
/// ```
pub fn validate_catalog(items: &[Item]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        validate_item(item)?;
        if !seen.insert(item.id) {
            return Err(ValidationError::Duplicate {
                field: "id".to_string(),
                value: item.id.to_string(),
            });
        }
    }
    Ok(())
}

/// Validates free-text search input.
///
/// ## Example
/// ```rust
/// use wardrobe_core::validation::validate_search_term;
///
/// assert!(validate_search_term("camiseta").is_ok());
/// assert!(validate_search_term("").is_ok());
/// assert!(validate_search_term(&"x".repeat(500)).is_err());
/// ```
pub fn validate_search_term(term: &str) -> ValidationResult<()> {
    if term.chars().count() > MAX_SEARCH_TERM_LEN {
        return Err(ValidationError::TooLong {
            field: "search term".to_string(),
            max: MAX_SEARCH_TERM_LEN,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
