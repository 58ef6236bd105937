//! Projection output types: per-year rows and the full 25-year run.

use std::fmt;

use serde::Serialize;

/// Costs for one projection year. All money values are in dollars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionRow {
    /// Year index, 1-based.
    pub year: u32,
    /// Escalated utility rate for this year ($/kWh).
    pub utility_rate: f64,
    /// Escalated PPA rate for this year ($/kWh).
    pub ppa_rate: f64,
    /// Utility bill for the year.
    pub utility_annual: f64,
    /// PPA payments plus escalated battery subscription for the year.
    pub ppa_annual: f64,
    /// Maintenance plus flat battery fee minus NEM credit (may be negative).
    pub purchase_annual: f64,
    /// Utility spend since year 1.
    pub utility_cumulative: f64,
    /// PPA spend since year 1.
    pub ppa_cumulative: f64,
    /// Purchase operating spend since year 1, excluding the upfront cost.
    pub purchase_ops_cumulative: f64,
    /// ITC-adjusted upfront cost plus `purchase_ops_cumulative`.
    pub purchase_cumulative: f64,
}

impl fmt::Display for ProjectionRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "y={:>2} | annual: util={:>10.2}  ppa={:>10.2}  buy={:>10.2} \
             | cumulative: util={:>11.2}  ppa={:>11.2}  buy={:>11.2}",
            self.year,
            self.utility_annual,
            self.ppa_annual,
            self.purchase_annual,
            self.utility_cumulative,
            self.ppa_cumulative,
            self.purchase_cumulative,
        )
    }
}

/// Result of projecting a parameter set over the full horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    /// One row per year, in increasing year order.
    pub rows: Vec<ProjectionRow>,
    /// First year cumulative operating cost reached the discounted system cost.
    pub breakeven_year: Option<u32>,
    /// System cost after the investment tax credit.
    pub discounted_system_cost: f64,
}

impl Projection {
    /// Row for a 1-based year, if within the horizon.
    pub fn year(&self, year: u32) -> Option<&ProjectionRow> {
        let idx = usize::try_from(year.checked_sub(1)?).ok()?;
        self.rows.get(idx)
    }

    /// The final year's row.
    pub fn last(&self) -> Option<&ProjectionRow> {
        self.rows.last()
    }
}
