//! # Monthly Sales Trend
//!
//! Wraps the backend's monthly sales feed. An empty or unavailable feed is
//! "no data", a normal state the insights page renders as such.

use serde::Serialize;
use ts_rs::TS;

use crate::money::Money;
use crate::types::MonthlySales;

/// The monthly sales series, in feed order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, TS)]
#[ts(export)]
pub struct SalesTrend(Vec<MonthlySales>);

impl SalesTrend {
    pub fn from_feed(points: Vec<MonthlySales>) -> Self {
        SalesTrend(points)
    }

    /// The "no data" trend.
    pub fn no_data() -> Self {
        SalesTrend::default()
    }

    pub fn is_no_data(&self) -> bool {
        self.0.is_empty()
    }

    pub fn points(&self) -> &[MonthlySales] {
        &self.0
    }

    pub fn total_units(&self) -> u64 {
        self.0.iter().map(|p| u64::from(p.sales)).sum()
    }

    pub fn total_value(&self) -> Money {
        self.0.iter().map(|p| p.value).sum()
    }

    /// Month with the most units sold; the earliest wins a tie.
    pub fn best_month(&self) -> Option<&MonthlySales> {
        self.0
            .iter()
            .fold(None, |best: Option<&MonthlySales>, point| match best {
                Some(b) if b.sales >= point.sales => Some(b),
                _ => Some(point),
            })
    }
}
