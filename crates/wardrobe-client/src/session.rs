//! # Dashboard Session
//!
//! Async driver around the core reducer: it performs the backend calls and
//! feeds their outcomes into [`DashboardState::reduce`].
//!
//! ## Locking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   record_sale(id)                                                       │
//! │     │                                                                   │
//! │     ├─ write lock ─► reduce(SaleStarted)  ── refused? return error      │
//! │     │                                                                   │
//! │     ├─ (no lock held) ─► backend.sell(id).await                         │
//! │     │                                                                   │
//! │     └─ write lock ─► reduce(SaleConfirmed | SaleFailed)                 │
//! │                                                                         │
//! │   The lock is never held across an await on the backend. Readers see   │
//! │   either the old snapshot or the new one, never a half-applied sale.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;
use wardrobe_core::aggregate::top_sellers;
use wardrobe_core::{
    Action, Chart, Constraint, CoreResult, DashboardState, DashboardView, Field, Item, ItemId,
    SalesTrend, TopSeller,
};

use crate::backend::InventoryBackend;
use crate::error::{ClientError, ClientResult};

/// One dashboard bound to one backend.
pub struct Dashboard<B> {
    backend: B,
    state: RwLock<DashboardState>,
}

impl<B: InventoryBackend> Dashboard<B> {
    pub fn new(backend: B) -> Self {
        Dashboard {
            backend,
            state: RwLock::new(DashboardState::new()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Applies one action; on refusal the current snapshot is kept.
    async fn dispatch(&self, action: Action) -> CoreResult<()> {
        let mut state = self.state.write().await;
        let next = state.reduce(action)?;
        *state = next;
        Ok(())
    }

    /// A copy of the current snapshot.
    pub async fn snapshot(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Fetches the catalog and adopts it.
    ///
    /// A failed fetch is surfaced as the `Failed` status and returned; the
    /// store keeps whatever it held before (empty on first load).
    pub async fn load(&self) -> ClientResult<DashboardView> {
        self.dispatch(Action::LoadStarted).await?;

        let outcome = match self.backend.fetch_items().await {
            Ok(items) => {
                let count = items.len();
                self.dispatch(Action::LoadSucceeded {
                    items,
                    at: Utc::now(),
                })
                .await
                .map(|()| count)
                .map_err(ClientError::from)
            }
            Err(err) => Err(err),
        };

        match outcome {
            Ok(count) => {
                info!(items = count, "Catalog loaded");
                Ok(self.view().await)
            }
            Err(err) => {
                warn!(error = %err, "Catalog load failed");
                self.dispatch(Action::LoadFailed {
                    reason: err.to_string(),
                })
                .await?;
                Err(err)
            }
        }
    }

    /// Fetches the monthly sales feed. Failure degrades to "no data".
    pub async fn load_trend(&self) -> ClientResult<SalesTrend> {
        let points = match self.backend.fetch_monthly_sales().await {
            Ok(points) => points,
            Err(err) => {
                warn!(error = %err, "Monthly sales unavailable, showing no data");
                Vec::new()
            }
        };
        self.dispatch(Action::TrendLoaded(points)).await?;
        Ok(self.state.read().await.trend().clone())
    }

    // =========================================================================
    // Filter & Chart Input
    // =========================================================================

    pub async fn set_search(&self, term: impl Into<String>) -> ClientResult<DashboardView> {
        self.dispatch(Action::SearchChanged(term.into())).await?;
        Ok(self.view().await)
    }

    pub async fn set_constraint(
        &self,
        field: Field,
        constraint: Constraint,
    ) -> ClientResult<DashboardView> {
        self.dispatch(Action::ConstraintChanged { field, constraint })
            .await?;
        Ok(self.view().await)
    }

    pub async fn clear_filters(&self) -> ClientResult<DashboardView> {
        self.dispatch(Action::FiltersCleared).await?;
        Ok(self.view().await)
    }

    /// Selects `chart`, or deselects it if it is already active.
    pub async fn toggle_chart(&self, chart: Chart) -> ClientResult<Option<Chart>> {
        self.dispatch(Action::ChartToggled(chart)).await?;
        Ok(self.state.read().await.active_chart())
    }

    // =========================================================================
    // Views
    // =========================================================================

    pub async fn view(&self) -> DashboardView {
        self.state.read().await.view()
    }

    pub async fn filter_options(&self, field: Field) -> Vec<String> {
        self.state.read().await.filter_options(field)
    }

    /// Best sellers over the whole catalog, ignoring the current filter.
    pub async fn top_sellers(&self, limit: usize) -> Vec<TopSeller> {
        top_sellers(self.state.read().await.store().items(), limit)
    }

    pub async fn is_sale_pending(&self, id: ItemId) -> bool {
        self.state.read().await.is_sale_pending(id)
    }

    /// Everything the report binary prints.
    pub async fn report(&self, top: usize) -> Report {
        let state = self.state.read().await;
        Report {
            view: state.view(),
            top_sellers: top_sellers(state.store().items(), top),
            filter_options: Field::ALL
                .iter()
                .map(|field| (*field, state.filter_options(*field)))
                .collect(),
        }
    }

    // =========================================================================
    // Sales
    // =========================================================================

    /// Sells one unit of `id` through the backend and merges its answer.
    ///
    /// Refused up front (no backend call) when the item is unknown, out of
    /// stock, or already has a sale in flight.
    pub async fn record_sale(&self, id: ItemId) -> ClientResult<Item> {
        let request_id = Uuid::new_v4();
        let span = info_span!("sale", %request_id, item_id = %id);
        self.sell_through_backend(id).instrument(span).await
    }

    async fn sell_through_backend(&self, id: ItemId) -> ClientResult<Item> {
        self.dispatch(Action::SaleStarted(id)).await?;

        match self.backend.sell(id).await {
            Ok(item) => {
                if let Err(err) = self.dispatch(Action::SaleConfirmed(item.clone())).await {
                    warn!(error = %err, "Backend item could not be merged");
                    self.dispatch(Action::SaleFailed(id)).await?;
                    return Err(err.into());
                }
                info!(stock = item.stock, sold = item.sold, "Sale confirmed");
                Ok(item)
            }
            Err(err) => {
                warn!(error = %err, "Sale failed");
                self.dispatch(Action::SaleFailed(id)).await?;
                Err(err)
            }
        }
    }
}

/// Aggregate view plus the insights extras.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub view: DashboardView,
    pub top_sellers: Vec<TopSeller>,
    pub filter_options: BTreeMap<Field, Vec<String>>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use tokio::sync::Notify;
    use wardrobe_core::sale::sell_one;
    use wardrobe_core::{CoreError, InvalidReason, Money, MonthlySales, ResultStatus};

    use super::*;

    struct FakeBackend {
        items: Mutex<Vec<Item>>,
        monthly: Option<Vec<MonthlySales>>,
        fail_fetch: bool,
        gate: Option<Arc<Notify>>,
        sell_calls: Mutex<u32>,
    }

    impl FakeBackend {
        fn new(items: Vec<Item>) -> Self {
            FakeBackend {
                items: Mutex::new(items),
                monthly: None,
                fail_fetch: false,
                gate: None,
                sell_calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.sell_calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl InventoryBackend for FakeBackend {
        async fn fetch_items(&self) -> ClientResult<Vec<Item>> {
            if self.fail_fetch {
                return Err(ClientError::fetch("/api/clothing", "connection refused"));
            }
            Ok(self.items.lock().unwrap().clone())
        }

        async fn fetch_monthly_sales(&self) -> ClientResult<Vec<MonthlySales>> {
            self.monthly
                .clone()
                .ok_or_else(|| ClientError::fetch("/api/sales/monthly", "HTTP 404"))
        }

        async fn sell(&self, id: ItemId) -> ClientResult<Item> {
            *self.sell_calls.lock().unwrap() += 1;
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            let mut items = self.items.lock().unwrap();
            let slot = items
                .iter_mut()
                .find(|item| item.id == id)
                .ok_or_else(|| ClientError::sale(id, "Item not found"))?;
            let updated = sell_one(slot).map_err(|_| ClientError::sale(id, "Item is out of stock"))?;
            *slot = updated.clone();
            Ok(updated)
        }
    }

    fn item(id: u32, item_type: &str, price_cents: i64, stock: u32, sold: u32) -> Item {
        Item {
            id: ItemId::new(id),
            item_type: item_type.to_string(),
            color: "Azul".to_string(),
            size: "M".to_string(),
            season: "Verao".to_string(),
            gender: "Unissex".to_string(),
            price: Money::from_cents(price_cents),
            stock,
            sold,
            image_ref: None,
            legacy_availability: None,
        }
    }

    fn catalog() -> Vec<Item> {
        vec![item(1, "Shirt", 5000, 2, 1), item(2, "Pants", 10000, 0, 5)]
    }

    #[tokio::test]
    async fn test_load_and_filter() {
        let dashboard = Dashboard::new(FakeBackend::new(catalog()));
        assert_eq!(dashboard.view().await.status, ResultStatus::NotLoaded);

        let view = dashboard.load().await.unwrap();
        assert_eq!(view.status, ResultStatus::Matches { count: 2 });
        assert_eq!(view.aggregate.summary.total_value, Money::from_cents(10000));
        assert_eq!(view.aggregate.summary.total_sales_value, Money::from_cents(55000));
        assert_eq!(view.aggregate.summary.estimated_profit, Money::from_cents(16500));

        let view = dashboard
            .set_constraint(Field::Type, Constraint::parse("Shirt"))
            .await
            .unwrap();
        assert_eq!(view.aggregate.chart(Chart::Type).unwrap().labels(), vec!["Shirt"]);

        let view = dashboard.set_search("nothing like this").await.unwrap();
        assert_eq!(view.status, ResultStatus::NoMatches);

        let view = dashboard.clear_filters().await.unwrap();
        assert_eq!(view.items.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_load_surfaces_error_state() {
        let mut backend = FakeBackend::new(catalog());
        backend.fail_fetch = true;
        let dashboard = Dashboard::new(backend);

        let err = dashboard.load().await.unwrap_err();
        assert!(matches!(err, ClientError::Fetch { .. }));

        let view = dashboard.view().await;
        assert!(matches!(view.status, ResultStatus::Failed { .. }));
        assert!(view.items.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_catalog_is_a_failed_load() {
        let dashboard = Dashboard::new(FakeBackend::new(vec![
            item(1, "Shirt", 5000, 1, 0),
            item(1, "Pants", 5000, 1, 0),
        ]));
        let err = dashboard.load().await.unwrap_err();
        assert!(matches!(err, ClientError::Rejected(CoreError::Validation(_))));
        assert!(matches!(dashboard.view().await.status, ResultStatus::Failed { .. }));
    }

    #[tokio::test]
    async fn test_missing_trend_is_no_data() {
        let dashboard = Dashboard::new(FakeBackend::new(catalog()));
        let trend = dashboard.load_trend().await.unwrap();
        assert!(trend.is_no_data());
    }

    #[tokio::test]
    async fn test_trend_loaded() {
        let mut backend = FakeBackend::new(catalog());
        backend.monthly = Some(vec![MonthlySales {
            month: "Jan".to_string(),
            sales: 340,
            value: Money::from_cents(1_700_000),
        }]);
        let dashboard = Dashboard::new(backend);
        let trend = dashboard.load_trend().await.unwrap();
        assert_eq!(trend.total_units(), 340);
        assert_eq!(dashboard.view().await.trend, trend);
    }

    #[tokio::test]
    async fn test_sale_merges_backend_item() {
        let dashboard = Dashboard::new(FakeBackend::new(catalog()));
        dashboard.load().await.unwrap();

        let sold = dashboard.record_sale(ItemId::new(1)).await.unwrap();
        assert_eq!((sold.stock, sold.sold), (1, 2));

        let summary = dashboard.view().await.aggregate.summary;
        assert_eq!(summary.total_units_sold, 7);
        assert_eq!(summary.total_value, Money::from_cents(5000));
        assert!(!dashboard.is_sale_pending(ItemId::new(1)).await);
    }

    #[tokio::test]
    async fn test_out_of_stock_sale_never_reaches_backend() {
        let dashboard = Dashboard::new(FakeBackend::new(catalog()));
        dashboard.load().await.unwrap();
        let before = dashboard.snapshot().await;

        let err = dashboard.record_sale(ItemId::new(2)).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Rejected(CoreError::InvalidOperation {
                reason: InvalidReason::OutOfStock,
                ..
            })
        ));
        assert_eq!(dashboard.backend().calls(), 0);
        assert_eq!(dashboard.snapshot().await.store(), before.store());
    }

    #[tokio::test]
    async fn test_backend_rejection_leaves_store_unchanged() {
        let dashboard = Dashboard::new(FakeBackend::new(catalog()));
        dashboard.load().await.unwrap();
        // Someone else sold the last units behind our back.
        dashboard.backend().items.lock().unwrap()[0].stock = 0;

        let err = dashboard.record_sale(ItemId::new(1)).await.unwrap_err();
        assert!(matches!(err, ClientError::Sale { .. }));
        let state = dashboard.snapshot().await;
        assert_eq!(state.store().get(ItemId::new(1)).unwrap().stock, 2);
        assert!(!state.is_sale_pending(ItemId::new(1)));
    }

    #[tokio::test]
    async fn test_concurrent_sales_of_one_item_are_serialized() {
        let gate = Arc::new(Notify::new());
        let mut backend = FakeBackend::new(catalog());
        backend.gate = Some(gate.clone());
        let dashboard = Arc::new(Dashboard::new(backend));
        dashboard.load().await.unwrap();

        let first = {
            let dashboard = dashboard.clone();
            tokio::spawn(async move { dashboard.record_sale(ItemId::new(1)).await })
        };
        while !dashboard.is_sale_pending(ItemId::new(1)).await {
            tokio::task::yield_now().await;
        }

        let err = dashboard.record_sale(ItemId::new(1)).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Rejected(CoreError::InvalidOperation {
                reason: InvalidReason::SaleInFlight,
                ..
            })
        ));

        gate.notify_one();
        let sold = first.await.unwrap().unwrap();
        assert_eq!((sold.stock, sold.sold), (1, 2));
        assert_eq!(dashboard.backend().calls(), 1);
    }

    #[tokio::test]
    async fn test_reload_during_sale_keeps_it_serialized() {
        let gate = Arc::new(Notify::new());
        let mut backend = FakeBackend::new(catalog());
        backend.gate = Some(gate.clone());
        let dashboard = Arc::new(Dashboard::new(backend));
        dashboard.load().await.unwrap();

        let first = {
            let dashboard = dashboard.clone();
            tokio::spawn(async move { dashboard.record_sale(ItemId::new(1)).await })
        };
        while !dashboard.is_sale_pending(ItemId::new(1)).await {
            tokio::task::yield_now().await;
        }

        dashboard.load().await.unwrap();
        assert!(dashboard.is_sale_pending(ItemId::new(1)).await);

        let err = dashboard.record_sale(ItemId::new(1)).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Rejected(CoreError::InvalidOperation {
                reason: InvalidReason::SaleInFlight,
                ..
            })
        ));

        gate.notify_one();
        let sold = first.await.unwrap().unwrap();
        assert_eq!((sold.stock, sold.sold), (1, 2));
        assert!(!dashboard.is_sale_pending(ItemId::new(1)).await);
        assert_eq!(dashboard.backend().calls(), 1);
    }

    #[tokio::test]
    async fn test_chart_toggle_and_report() {
        let dashboard = Dashboard::new(FakeBackend::new(catalog()));
        dashboard.load().await.unwrap();

        assert_eq!(dashboard.toggle_chart(Chart::Sales).await.unwrap(), Some(Chart::Sales));
        assert_eq!(dashboard.toggle_chart(Chart::Sales).await.unwrap(), None);

        let report = dashboard.report(1).await;
        assert_eq!(report.top_sellers.len(), 1);
        assert_eq!(report.top_sellers[0].id, ItemId::new(2));
        assert_eq!(report.filter_options[&Field::Type], vec!["Shirt", "Pants"]);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["filterOptions"]["type"][1], "Pants");
        assert_eq!(json["view"]["status"]["status"], "matches");
    }
}
