//! # wardrobe-core: Pure Query Engine for the Wardrobe Dashboard
//!
//! This crate holds everything the inventory dashboard computes: search and
//! filter predicates, summary statistics, chart groupings and the sale
//! mutator. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Wardrobe Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Inventory Backend (HTTP)                       │   │
//! │  │   GET /api/clothing   POST /api/sell/{id}   GET /api/sales/...  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 wardrobe-client (I/O layer)                     │   │
//! │  │      HttpBackend, Dashboard session, config, wardrobe-report    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Action / DashboardView                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ wardrobe-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌───────────┐  ┌─────────┐         │   │
//! │  │   │ filter  │─►│  query  │─►│ aggregate │  │  sale   │         │   │
//! │  │   │Predicate│  │Filtered │  │ Summary   │  │ItemStore│         │   │
//! │  │   └─────────┘  │  Set    │  │ Charts    │  └─────────┘         │   │
//! │  │                └─────────┘  └───────────┘                       │   │
//! │  │                    state: DashboardState::reduce                │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Item record, field accessor table, availability
//! - [`money`] - Fixed-point Money and basis-point Rate
//! - [`filter`] - Search term + per-field constraints -> Predicate
//! - [`query`] - Stable filtering of the item store
//! - [`aggregate`] - Summary statistics, chart series, top sellers
//! - [`sale`] - Immutable item store and the sale mutator
//! - [`trend`] - Monthly sales feed
//! - [`state`] - Snapshot reducer tying it all together
//! - [`validation`] - Catalog and input checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use wardrobe_core::aggregate::summary;
//! use wardrobe_core::{Item, ItemId, Money};
//!
//! let shirt = Item {
//!     id: ItemId::new(1), item_type: "Shirt".into(), color: "Azul".into(),
//!     size: "M".into(), season: "Verao".into(), gender: "Unissex".into(),
//!     price: Money::from_cents(5000), stock: 2, sold: 1,
//!     image_ref: None, legacy_availability: None,
//! };
//!
//! let summary = summary(&[shirt]);
//! assert_eq!(summary.total_value, Money::from_cents(10000));
//! // 30% of R$ 50.00 in sales
//! assert_eq!(summary.estimated_profit, Money::from_cents(1500));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod money;
pub mod query;
pub mod sale;
pub mod state;
pub mod trend;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregate::{AggregateView, Chart, ChartSeries, Summary, TopSeller};
pub use error::{CoreError, CoreResult, InvalidReason, ValidationError};
pub use filter::{Constraint, FilterState, Predicate};
pub use money::{Money, Rate};
pub use query::FilteredSet;
pub use sale::ItemStore;
pub use state::{Action, DashboardState, DashboardView, LoadState, ResultStatus};
pub use trend::SalesTrend;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Flat margin applied to total sales value for the estimated profit.
pub const ESTIMATED_MARGIN: Rate = Rate::from_bps(3000);

/// Highest price an item may carry (R$ 1,000,000.00).
///
/// Keeps `price × stock` sums far from the saturation point of [`Money`].
pub const MAX_ITEM_PRICE: Money = Money::from_cents(100_000_000);

/// Longest search term accepted, in characters.
///
/// The term is matched against every item on each keystroke; anything longer
/// is a paste accident, not a search.
pub const MAX_SEARCH_TERM_LEN: usize = 200;

/// Default length of the top sellers list.
pub const DEFAULT_TOP_SELLERS: usize = 10;
