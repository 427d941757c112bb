//! # Aggregator
//!
//! Reduces a filtered set into the summary cards and the chart series.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  FilteredSet ──┬──► summary()  ──► Summary (scalar cards)               │
//! │                │                                                        │
//! │                └──► group_by() ──► ChartSeries per Chart                │
//! │                       │                                                 │
//! │                       ├─ Count      type, color, gender, season,        │
//! │                       │             availability                        │
//! │                       ├─ UnitsSold  sales by type                       │
//! │                       └─ MeanPrice  average price by type               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Label Order
//! Series are built through a [`LabelRegistry`]: labels are appended the
//! first time they are seen and never reordered, so identical inputs always
//! produce identically ordered series (and therefore identical chart
//! colours). Only labels present in the input appear; a category that was
//! filtered out is absent, not zero.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, SCALE};
use crate::types::{Field, Item, ItemId};
use crate::ESTIMATED_MARGIN;

// =============================================================================
// Summary
// =============================================================================

/// Scalar statistics over a filtered set.
///
/// Monetary totals are exact sums in cents. They are rounded to two decimals
/// only when displayed (`Money`'s `Display`); `estimated_profit` applies the
/// margin to the summed sales value, so it is rounded exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Summary {
    pub total_items: usize,
    /// Σ(price × stock)
    #[ts(type = "number")]
    pub total_value: Money,
    /// Σ(price × sold)
    #[ts(type = "number")]
    pub total_sales_value: Money,
    /// Items with stock > 0.
    pub available_count: usize,
    /// Items with stock == 0.
    pub out_of_stock_count: usize,
    /// Σ(sold)
    #[ts(type = "number")]
    pub total_units_sold: u64,
    /// Σ(stock)
    #[ts(type = "number")]
    pub units_in_stock: u64,
    /// Σ(price × 30% × sold)
    #[ts(type = "number")]
    pub estimated_profit: Money,
}

/// Computes the scalar statistics in one pass.
pub fn summary(items: &[Item]) -> Summary {
    let mut out = Summary::default();

    for item in items {
        out.total_items += 1;
        out.total_value += item.stock_value();
        out.total_sales_value += item.sales_value();
        if item.is_available() {
            out.available_count += 1;
        } else {
            out.out_of_stock_count += 1;
        }
        out.total_units_sold += u64::from(item.sold);
        out.units_in_stock += u64::from(item.stock);
    }

    out.estimated_profit = out.total_sales_value.apply_rate(ESTIMATED_MARGIN);
    out
}

// =============================================================================
// Grouping
// =============================================================================

/// What a grouped series measures per label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Measure {
    /// Number of items sharing the label.
    Count,
    /// Σ(sold) over items sharing the label.
    UnitsSold,
    /// Arithmetic mean of price (not weighted by stock or sales).
    MeanPrice,
}

/// One bar / slice of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

/// Chart-ready `(label, value)` pairs in first-encounter order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, TS)]
#[ts(export)]
pub struct ChartSeries(Vec<SeriesPoint>);

impl ChartSeries {
    pub fn points(&self) -> &[SeriesPoint] {
        &self.0
    }

    pub fn labels(&self) -> Vec<&str> {
        self.0.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn value(&self, label: &str) -> Option<f64> {
        self.0.iter().find(|p| p.label == label).map(|p| p.value)
    }

    /// Sum of all values.
    pub fn total(&self) -> f64 {
        self.0.iter().map(|p| p.value).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Append-only, insertion-ordered label → accumulator map.
///
/// The `Vec` owns the order; the `HashMap` only finds a label's slot.
#[derive(Debug)]
pub struct LabelRegistry<A> {
    index: HashMap<String, usize>,
    entries: Vec<(String, A)>,
}

impl<A: Default> LabelRegistry<A> {
    pub fn new() -> Self {
        LabelRegistry {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Accumulator for `label`, registering the label on first sight.
    pub fn slot(&mut self, label: &str) -> &mut A {
        let next = self.entries.len();
        let position = *self.index.entry(label.to_string()).or_insert(next);
        if position == next {
            self.entries.push((label.to_string(), A::default()));
        }
        &mut self.entries[position].1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-encounter order.
    pub fn into_entries(self) -> Vec<(String, A)> {
        self.entries
    }
}

impl<A: Default> Default for LabelRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
struct Tally {
    items: u64,
    units_sold: u64,
    price_units: i128,
}

impl Tally {
    fn add(&mut self, item: &Item) {
        self.items += 1;
        self.units_sold += u64::from(item.sold);
        self.price_units += i128::from(item.price.units());
    }

    fn value(&self, measure: Measure) -> f64 {
        match measure {
            Measure::Count => self.items as f64,
            Measure::UnitsSold => self.units_sold as f64,
            // A label only exists once an item was tallied, so items > 0.
            Measure::MeanPrice => self.price_units as f64 / self.items as f64 / SCALE as f64,
        }
    }
}

/// Groups items by a key and measures each group.
///
/// ```rust
/// use wardrobe_core::aggregate::{group_by, Measure};
/// use wardrobe_core::types::Field;
///
/// let series = group_by(&[], Field::Color.accessor(), Measure::Count);
/// assert!(series.is_empty());
/// ```
pub fn group_by<K>(items: &[Item], key: K, measure: Measure) -> ChartSeries
where
    K: Fn(&Item) -> &str,
{
    let mut registry: LabelRegistry<Tally> = LabelRegistry::new();
    for item in items {
        registry.slot(key(item)).add(item);
    }

    ChartSeries(
        registry
            .into_entries()
            .into_iter()
            .map(|(label, tally)| SeriesPoint {
                value: tally.value(measure),
                label,
            })
            .collect(),
    )
}

/// [`group_by`] keyed on a categorical field.
pub fn group_by_field(items: &[Item], field: Field, measure: Measure) -> ChartSeries {
    group_by(items, field.accessor(), measure)
}

// =============================================================================
// Charts
// =============================================================================

/// The dashboard's charts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Chart {
    /// Items per type.
    Type,
    /// Items per color.
    Color,
    /// Average price per type.
    Price,
    /// Items per gender.
    Gender,
    /// Items per season.
    Season,
    /// In stock vs out of stock.
    Availability,
    /// Units sold per type.
    Sales,
}

impl Chart {
    pub const ALL: [Chart; 7] = [
        Chart::Type,
        Chart::Color,
        Chart::Price,
        Chart::Gender,
        Chart::Season,
        Chart::Availability,
        Chart::Sales,
    ];

    /// The field whose values label the chart.
    pub const fn field(&self) -> Field {
        match self {
            Chart::Type | Chart::Price | Chart::Sales => Field::Type,
            Chart::Color => Field::Color,
            Chart::Gender => Field::Gender,
            Chart::Season => Field::Season,
            Chart::Availability => Field::Availability,
        }
    }

    pub const fn measure(&self) -> Measure {
        match self {
            Chart::Price => Measure::MeanPrice,
            Chart::Sales => Measure::UnitsSold,
            _ => Measure::Count,
        }
    }

    pub const fn title(&self) -> &'static str {
        match self {
            Chart::Type => "Items by Type",
            Chart::Color => "Items by Color",
            Chart::Price => "Average Price by Type",
            Chart::Gender => "Items by Gender",
            Chart::Season => "Items by Season",
            Chart::Availability => "Availability",
            Chart::Sales => "Sales by Type",
        }
    }

    pub fn series(&self, items: &[Item]) -> ChartSeries {
        group_by_field(items, self.field(), self.measure())
    }
}

/// One chart with its data.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ChartData {
    pub chart: Chart,
    pub title: String,
    pub series: ChartSeries,
}

// =============================================================================
// Aggregate View
// =============================================================================

/// Everything the dashboard draws from a filtered set.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct AggregateView {
    pub summary: Summary,
    /// Every chart, in [`Chart::ALL`] order.
    pub charts: Vec<ChartData>,
}

impl AggregateView {
    pub fn chart(&self, chart: Chart) -> Option<&ChartSeries> {
        self.charts
            .iter()
            .find(|data| data.chart == chart)
            .map(|data| &data.series)
    }
}

/// Computes the summary and every chart series.
///
/// Pure: the same items always produce an equal view.
pub fn summarize(items: &[Item]) -> AggregateView {
    AggregateView {
        summary: summary(items),
        charts: Chart::ALL
            .iter()
            .map(|chart| ChartData {
                chart: *chart,
                title: chart.title().to_string(),
                series: chart.series(items),
            })
            .collect(),
    }
}

// =============================================================================
// Filter Options
// =============================================================================

/// Distinct values of a field in first-encounter order.
///
/// Called on the full store (not the filtered set) to populate the filter
/// dropdowns, so an option does not vanish when it is filtered out.
pub fn distinct_values(items: &[Item], field: Field) -> Vec<String> {
    let mut registry: LabelRegistry<()> = LabelRegistry::new();
    for item in items {
        registry.slot(item.field(field));
    }
    registry
        .into_entries()
        .into_iter()
        .map(|(label, _)| label)
        .collect()
}

// =============================================================================
// Top Sellers
// =============================================================================

/// An entry of the "top selling items" table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TopSeller {
    pub id: ItemId,
    pub item_type: String,
    pub color: String,
    pub size: String,
    #[ts(type = "number")]
    pub price: Money,
    pub sold: u32,
    /// price × sold
    #[ts(type = "number")]
    pub revenue: Money,
}

impl From<&Item> for TopSeller {
    fn from(item: &Item) -> Self {
        TopSeller {
            id: item.id,
            item_type: item.item_type.clone(),
            color: item.color.clone(),
            size: item.size.clone(),
            price: item.price,
            sold: item.sold,
            revenue: item.sales_value(),
        }
    }
}

/// Items ranked by units sold, best first, at most `limit` of them.
///
/// Items that never sold are left out. Ties keep store order.
pub fn top_sellers(items: &[Item], limit: usize) -> Vec<TopSeller> {
    let mut ranked: Vec<&Item> = items.iter().filter(|item| item.sold > 0).collect();
    ranked.sort_by(|a, b| b.sold.cmp(&a.sold));
    ranked.into_iter().take(limit).map(TopSeller::from).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u32, item_type: &str, color: &str, price_cents: i64, stock: u32, sold: u32) -> Item {
        Item {
            id: ItemId::new(id),
            item_type: item_type.to_string(),
            color: color.to_string(),
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

    fn shirt_and_pants() -> Vec<Item> {
        vec![
            item(1, "Shirt", "White", 5000, 2, 1),
            item(2, "Pants", "Black", 10000, 0, 5),
        ]
    }

    #[test]
    fn test_summary_end_to_end() {
        let summary = summary(&shirt_and_pants());

        assert_eq!(summary.total_items, 2);
        assert_eq!(summary.total_value, Money::from_cents(10000));
        assert_eq!(summary.total_sales_value, Money::from_cents(55000));
        assert_eq!(summary.available_count, 1);
        assert_eq!(summary.out_of_stock_count, 1);
        assert_eq!(summary.total_units_sold, 6);
        assert_eq!(summary.units_in_stock, 2);
        assert_eq!(summary.estimated_profit, Money::from_cents(16500));

        assert_eq!(summary.total_value.to_decimal_string(), "100.00");
        assert_eq!(summary.total_sales_value.to_decimal_string(), "550.00");
        assert_eq!(summary.estimated_profit.to_decimal_string(), "165.00");
    }

    #[test]
    fn test_sub_cent_prices_are_rounded_only_for_display() {
        let json = r#"[
            {"id":1,"tipo":"Botao","cor":"Preto","tamanho":"U","preco":0.125,
             "estacao":"Verao","genero":"Unissex","estoque":1000,"vendas":200}
        ]"#;
        let items: Vec<Item> = serde_json::from_str(json).unwrap();
        let summary = summary(&items);

        assert_eq!(summary.total_value.to_decimal_string(), "125.00");
        assert_eq!(summary.total_sales_value.to_decimal_string(), "25.00");
        assert_eq!(summary.estimated_profit.to_decimal_string(), "7.50");
        assert_eq!(serde_json::to_value(summary.total_value).unwrap(), 125.0);
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        let items = vec![
            item(1, "Casaco", "Preto", i64::MAX / 100, u32::MAX, u32::MAX),
            item(2, "Casaco", "Azul", i64::MAX / 100, u32::MAX, u32::MAX),
        ];
        let summary = summary(&items);
        assert_eq!(summary.total_value, Money::from_units(i64::MAX));
        assert_eq!(summary.total_units_sold, 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_summary_of_empty_set() {
        let summary = summary(&[]);
        assert_eq!(summary, Summary::default());
        assert!(summary.estimated_profit.is_zero());
    }

    #[test]
    fn test_profit_is_rounded_once() {
        // Per-item 30% rounded to cents would be 2 cents each (1.5 → 2),
        // i.e. 6 in total. Applied to the 15-cent sum it is 4.5 → 5.
        let items = vec![
            item(1, "Meia", "Preto", 5, 1, 1),
            item(2, "Meia", "Branco", 5, 1, 1),
            item(3, "Meia", "Azul", 5, 1, 1),
        ];
        assert_eq!(summary(&items).estimated_profit.cents(), 5);
    }

    #[test]
    fn test_group_by_preserves_first_encounter_order() {
        let items = vec![
            item(1, "Saia", "Rosa", 5990, 1, 0),
            item(2, "Calca", "Preto", 8990, 1, 0),
            item(3, "Saia", "Preto", 5990, 1, 0),
            item(4, "Blusa", "Rosa", 6990, 1, 0),
        ];
        let series = group_by_field(&items, Field::Type, Measure::Count);
        assert_eq!(series.labels(), vec!["Saia", "Calca", "Blusa"]);
        assert_eq!(series.value("Saia"), Some(2.0));
        assert_eq!(series.total(), 4.0);

        let series = group_by_field(&items, Field::Color, Measure::Count);
        assert_eq!(series.labels(), vec!["Rosa", "Preto"]);
    }

    #[test]
    fn test_units_sold_and_mean_price_groupings() {
        let items = vec![
            item(1, "Saia", "Rosa", 6000, 0, 3),
            item(2, "Calca", "Preto", 9000, 4, 1),
            item(3, "Saia", "Preto", 4000, 9, 2),
        ];

        let sales = Chart::Sales.series(&items);
        assert_eq!(sales.value("Saia"), Some(5.0));
        assert_eq!(sales.value("Calca"), Some(1.0));

        // Unweighted mean: (60 + 40) / 2, regardless of stock or sales.
        let price = Chart::Price.series(&items);
        assert_eq!(price.value("Saia"), Some(50.0));
        assert_eq!(price.value("Calca"), Some(90.0));
    }

    #[test]
    fn test_filtered_out_labels_disappear() {
        let shirts: Vec<Item> = shirt_and_pants()
            .into_iter()
            .filter(|i| i.item_type == "Shirt")
            .collect();
        let view = summarize(&shirts);
        let by_type = view.chart(Chart::Type).unwrap();
        assert_eq!(by_type.labels(), vec!["Shirt"]);
        assert_eq!(by_type.value("Pants"), None);
    }

    #[test]
    fn test_availability_chart_uses_stock() {
        let view = summarize(&shirt_and_pants());
        let availability = view.chart(Chart::Availability).unwrap();
        assert_eq!(availability.labels(), vec!["Disponivel", "Esgotado"]);
        assert_eq!(availability.total(), 2.0);
    }

    #[test]
    fn test_summarize_contains_every_chart() {
        let view = summarize(&shirt_and_pants());
        let charts: Vec<Chart> = view.charts.iter().map(|c| c.chart).collect();
        assert_eq!(charts, Chart::ALL.to_vec());
        assert_eq!(view.charts[2].title, "Average Price by Type");
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let items = shirt_and_pants();
        assert_eq!(summarize(&items), summarize(&items));
    }

    #[test]
    fn test_label_registry() {
        let mut registry: LabelRegistry<u32> = LabelRegistry::new();
        *registry.slot("b") += 1;
        *registry.slot("a") += 1;
        *registry.slot("b") += 1;
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.into_entries(),
            vec![("b".to_string(), 2), ("a".to_string(), 1)]
        );
    }

    #[test]
    fn test_distinct_values() {
        let items = vec![
            item(1, "Saia", "Rosa", 5990, 1, 0),
            item(2, "Calca", "Preto", 8990, 1, 0),
            item(3, "Saia", "Preto", 5990, 0, 0),
        ];
        assert_eq!(distinct_values(&items, Field::Type), vec!["Saia", "Calca"]);
        assert_eq!(
            distinct_values(&items, Field::Availability),
            vec!["Disponivel", "Esgotado"]
        );
    }

    #[test]
    fn test_top_sellers() {
        let items = vec![
            item(1, "Camiseta", "Preto", 4990, 3, 120),
            item(2, "Calca", "Azul", 12990, 1, 85),
            item(3, "Saia", "Rosa", 5990, 1, 0),
            item(4, "Blusa", "Branco", 5990, 1, 85),
        ];
        let top = top_sellers(&items, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].id, ItemId::new(1));
        assert_eq!(top[0].revenue, Money::from_cents(598800));
        // Tie on 85 keeps store order.
        assert_eq!(top[1].id, ItemId::new(2));

        let all = top_sellers(&items, 10);
        assert_eq!(all.len(), 3);
    }
}
