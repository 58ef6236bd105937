//! Chart series for the active view mode.

use serde::Serialize;

use super::params::ViewMode;
use super::types::Projection;

/// One x-position of the three-line chart, values rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub year: u32,
    pub utility: f64,
    pub ppa: f64,
    pub purchase: f64,
}

/// Rounds a dollar amount to two decimals.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Builds the chart series: annual costs or running totals depending on `view`.
pub fn chart_series(projection: &Projection, view: ViewMode) -> Vec<ChartPoint> {
    projection
        .rows
        .iter()
        .map(|r| {
            let (utility, ppa, purchase) = match view {
                ViewMode::Annual => (r.utility_annual, r.ppa_annual, r.purchase_annual),
                ViewMode::Cumulative => (
                    r.utility_cumulative,
                    r.ppa_cumulative,
                    r.purchase_cumulative,
                ),
            };
            ChartPoint {
                year: r.year,
                utility: round_cents(utility),
                ppa: round_cents(ppa),
                purchase: round_cents(purchase),
            }
        })
        .collect()
}
