//! # Dashboard State
//!
//! The whole dashboard as one immutable snapshot, advanced by a reducer.
//!
//! ## Reducer Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   DashboardState ──reduce(Action)──► DashboardState'                    │
//! │        │                                   │                            │
//! │        │ view()                            │ view()                     │
//! │        ▼                                   ▼                            │
//! │   DashboardView                       DashboardView'                    │
//! │   (status, filtered items,            (recomputed in full,             │
//! │    summary, charts, trend)             never patched)                   │
//! │                                                                         │
//! │   Actions                                                               │
//! │   ───────                                                               │
//! │   LoadStarted / LoadSucceeded / LoadFailed     catalog fetch            │
//! │   TrendLoaded                                  monthly sales feed       │
//! │   SearchChanged / ConstraintChanged /          filter input             │
//! │   FiltersCleared                                                        │
//! │   ChartToggled                                 active chart             │
//! │   SaleStarted / SaleConfirmed / SaleFailed     the only store write     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sales Are Serialized Per Item
//! `SaleStarted` marks the item pending; a second `SaleStarted` for the same
//! item is refused with `InvalidOperation` until `SaleConfirmed` or
//! `SaleFailed` clears it. Two requests can therefore never both read the
//! same pre-sale stock. A catalog reload keeps the mark; it only drops marks
//! for items the new catalog no longer carries.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use ts_rs::TS;

use crate::aggregate::{distinct_values, summarize, AggregateView, Chart};
use crate::error::{CoreError, CoreResult, InvalidReason};
use crate::filter::{Constraint, FilterState};
use crate::query::{query, FilteredSet};
use crate::sale::ItemStore;
use crate::trend::SalesTrend;
use crate::types::{Field, Item, ItemId, MonthlySales};
use crate::validation::validate_search_term;

// =============================================================================
// Load State
// =============================================================================

/// Where the catalog fetch stands.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loading,
    Loaded { loaded_at: DateTime<Utc> },
    Failed { reason: String },
}

// =============================================================================
// Actions
// =============================================================================

/// Everything that can change the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LoadStarted,
    LoadSucceeded {
        items: Vec<Item>,
        at: DateTime<Utc>,
    },
    LoadFailed {
        reason: String,
    },
    TrendLoaded(Vec<MonthlySales>),
    SearchChanged(String),
    ConstraintChanged {
        field: Field,
        constraint: Constraint,
    },
    FiltersCleared,
    ChartToggled(Chart),
    SaleStarted(ItemId),
    SaleConfirmed(Item),
    SaleFailed(ItemId),
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::LoadStarted => "load_started",
            Action::LoadSucceeded { .. } => "load_succeeded",
            Action::LoadFailed { .. } => "load_failed",
            Action::TrendLoaded(_) => "trend_loaded",
            Action::SearchChanged(_) => "search_changed",
            Action::ConstraintChanged { .. } => "constraint_changed",
            Action::FiltersCleared => "filters_cleared",
            Action::ChartToggled(_) => "chart_toggled",
            Action::SaleStarted(_) => "sale_started",
            Action::SaleConfirmed(_) => "sale_confirmed",
            Action::SaleFailed(_) => "sale_failed",
        }
    }
}

// =============================================================================
// Dashboard State
// =============================================================================

/// Immutable dashboard snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardState {
    load: LoadState,
    store: ItemStore,
    filter: FilterState,
    active_chart: Option<Chart>,
    pending_sales: BTreeSet<ItemId>,
    trend: SalesTrend,
}

impl DashboardState {
    /// Fresh dashboard: nothing loaded, empty filter, no chart selected.
    pub fn new() -> Self {
        DashboardState::default()
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn active_chart(&self) -> Option<Chart> {
        self.active_chart
    }

    pub fn trend(&self) -> &SalesTrend {
        &self.trend
    }

    pub fn is_sale_pending(&self, id: ItemId) -> bool {
        self.pending_sales.contains(&id)
    }

    /// Applies one action, returning the next snapshot.
    ///
    /// On `Err` no new snapshot exists; the caller keeps `self`, so a refused
    /// action can never leave a half-applied state behind.
    pub fn reduce(&self, action: Action) -> CoreResult<DashboardState> {
        debug!(action = action.name(), "reducing dashboard state");
        let mut next = self.clone();

        match action {
            Action::LoadStarted => {
                next.load = LoadState::Loading;
            }
            Action::LoadSucceeded { items, at } => {
                next.store = ItemStore::load(items)?;
                // A reload never settles a sale; only its confirmation or
                // failure does. Ids gone from the catalog cannot be confirmed.
                let store = &next.store;
                next.pending_sales.retain(|id| store.get(*id).is_some());
                next.load = LoadState::Loaded { loaded_at: at };
            }
            Action::LoadFailed { reason } => {
                next.load = LoadState::Failed { reason };
            }
            Action::TrendLoaded(points) => {
                next.trend = SalesTrend::from_feed(points);
            }
            Action::SearchChanged(term) => {
                validate_search_term(&term)?;
                next.filter = next.filter.with_search(term);
            }
            Action::ConstraintChanged { field, constraint } => {
                next.filter = next.filter.with_constraint(field, constraint);
            }
            Action::FiltersCleared => {
                next.filter = FilterState::new();
            }
            Action::ChartToggled(chart) => {
                next.active_chart = match next.active_chart {
                    Some(active) if active == chart => None,
                    _ => Some(chart),
                };
            }
            Action::SaleStarted(id) => {
                if next.pending_sales.contains(&id) {
                    return Err(CoreError::InvalidOperation {
                        item_id: id,
                        reason: InvalidReason::SaleInFlight,
                    });
                }
                // Precondition only; the store changes when the server confirms.
                next.store.sell(id)?;
                next.pending_sales.insert(id);
            }
            Action::SaleConfirmed(item) => {
                let id = item.id;
                next.store = next.store.with_confirmed(item)?;
                next.pending_sales.remove(&id);
            }
            Action::SaleFailed(id) => {
                next.pending_sales.remove(&id);
            }
        }

        Ok(next)
    }

    /// The current filtered set.
    pub fn filtered(&self) -> FilteredSet {
        query(self.store.items(), &self.filter.predicate())
    }

    /// Dropdown options for a field, over the full store.
    pub fn filter_options(&self, field: Field) -> Vec<String> {
        distinct_values(self.store.items(), field)
    }

    /// Derives everything the dashboard renders.
    pub fn view(&self) -> DashboardView {
        let filtered = self.filtered();
        let aggregate = summarize(filtered.items());
        let status = ResultStatus::of(&self.load, &filtered);

        DashboardView {
            status,
            items: filtered.into_items(),
            aggregate,
            active_chart: self.active_chart,
            pending_sales: self.pending_sales.iter().copied().collect(),
            trend: self.trend.clone(),
        }
    }
}

// =============================================================================
// Views
// =============================================================================

/// What the item table / charts area should show.
///
/// `NoMatches` (loaded, nothing passed the filter) is deliberately distinct
/// from `NotLoaded` and `Loading` so an empty table is never mistaken for a
/// pending fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "status", rename_all = "snake_case")]
#[ts(export)]
pub enum ResultStatus {
    NotLoaded,
    Loading,
    Failed { reason: String },
    NoMatches,
    Matches { count: usize },
}

impl ResultStatus {
    pub fn of(load: &LoadState, filtered: &FilteredSet) -> Self {
        match load {
            LoadState::NotLoaded => ResultStatus::NotLoaded,
            LoadState::Loading => ResultStatus::Loading,
            LoadState::Failed { reason } => ResultStatus::Failed {
                reason: reason.clone(),
            },
            LoadState::Loaded { .. } if filtered.is_empty() => ResultStatus::NoMatches,
            LoadState::Loaded { .. } => ResultStatus::Matches {
                count: filtered.len(),
            },
        }
    }
}

/// Derived, read-only dashboard view.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardView {
    pub status: ResultStatus,
    /// The filtered set, in store order.
    pub items: Vec<Item>,
    pub aggregate: AggregateView,
    pub active_chart: Option<Chart>,
    /// Items whose sale awaits confirmation (their "Sell" control is disabled).
    pub pending_sales: Vec<ItemId>,
    pub trend: SalesTrend,
}

// =============================================================================
// Unit Tests
// =============================================================================
