//! # Error Types
//!
//! Domain-specific error types for wardrobe-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  wardrobe-core errors (this file)                                      │
//! │  ├── CoreError        - Store / sale rule violations                   │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  wardrobe-client errors (separate crate)                               │
//! │  └── ClientError      - Fetch and sale failures                        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → UI                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An empty filtered set is never an error. It is a valid result and is
//! reported through [`crate::state::ResultStatus::NoMatches`].

use std::fmt;

use thiserror::Error;

use crate::types::ItemId;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// No item with this id exists in the store.
    ///
    /// ## When This Occurs
    /// - Selling an id that was never loaded
    /// - Merging a server-confirmed item whose id is unknown locally
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// The operation is refused for this item in its current state.
    ///
    /// ## User Workflow
    /// ```text
    /// Click "Sell" on item 2 (stock 0)
    ///      │
    ///      ▼
    /// InvalidOperation { item_id: 2, reason: OutOfStock }
    ///      │
    ///      ▼
    /// Store unchanged, UI shows "Item 2 is out of stock"
    /// ```
    #[error("Invalid operation on item {item_id}: {reason}")]
    InvalidOperation {
        item_id: ItemId,
        reason: InvalidReason,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Shorthand for a sale refused at zero stock.
    pub fn out_of_stock(item_id: ItemId) -> Self {
        CoreError::InvalidOperation {
            item_id,
            reason: InvalidReason::OutOfStock,
        }
    }

    /// Returns true for the `InvalidOperation` condition.
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, CoreError::InvalidOperation { .. })
    }
}

/// Why an operation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// Selling would make stock negative.
    OutOfStock,
    /// Another sale for the same item has not been confirmed yet.
    SaleInFlight,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::OutOfStock => write!(f, "item is out of stock"),
            InvalidReason::SaleInFlight => write!(f, "a sale for this item is already pending"),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised while loading a catalog or accepting filter input, before any
/// engine logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value exceeds its upper bound.
    #[error("{field} must be at most {max}")]
    TooLarge { field: String, max: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., duplicate item id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::out_of_stock(ItemId::new(2));
        assert_eq!(
            err.to_string(),
            "Invalid operation on item 2: item is out of stock"
        );
        assert!(err.is_invalid_operation());

        let err = CoreError::ItemNotFound(ItemId::new(42));
        assert_eq!(err.to_string(), "Item not found: 42");
        assert!(!err.is_invalid_operation());
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Duplicate {
            field: "id".to_string(),
            value: "7".to_string(),
        };
        assert_eq!(err.to_string(), "id '7' already exists");

        let err = ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        };
        assert_eq!(err.to_string(), "price must not be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "type".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
