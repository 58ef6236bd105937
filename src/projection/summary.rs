//! Post-hoc summary metrics derived from a complete projection.

use std::fmt;

use serde::Serialize;

use super::engine::PROJECTION_YEARS;
use super::params::ParameterSet;
use super::types::Projection;

/// Grid emissions factor (kg CO2 per kWh).
pub const CO2_KG_PER_KWH: f64 = 0.7;
/// CO2 sequestered by one tree per year (kg).
pub const CO2_KG_PER_TREE: f64 = 21.77;

/// Lifetime figures shown next to the chart.
///
/// Computed from the finished rows so the headline numbers always agree
/// with the table they summarize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Sum over all years of utility cost minus PPA cost.
    pub total_savings_ppa_vs_utility: f64,
    /// Energy consumed over the horizon (kWh).
    pub total_kwh: f64,
    /// Emissions avoided by serving that energy from solar (kg).
    pub co2_saved_kg: f64,
    /// Trees needed to sequester the same CO2 in a year.
    pub trees_equivalent: f64,
    /// Purchase breakeven year, if any.
    pub breakeven_year: Option<u32>,
    /// System cost after the investment tax credit.
    pub discounted_system_cost: f64,
}

impl Summary {
    /// Computes the summary for a projection of `params`.
    pub fn from_projection(params: &ParameterSet, projection: &Projection) -> Self {
        let total_savings_ppa_vs_utility = projection
            .rows
            .iter()
            .map(|r| r.utility_annual - r.ppa_annual)
            .sum();
        let total_kwh = params.usage * f64::from(PROJECTION_YEARS);
        let co2_saved_kg = total_kwh * CO2_KG_PER_KWH;

        Self {
            total_savings_ppa_vs_utility,
            total_kwh,
            co2_saved_kg,
            trees_equivalent: co2_saved_kg / CO2_KG_PER_TREE,
            breakeven_year: projection.breakeven_year,
            discounted_system_cost: projection.discounted_system_cost,
        }
    }
}

/// Whole-dollar amount with thousands separators, e.g. `-1,235`.
pub fn format_whole(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Breakeven label: `Year N` or a dash.
pub fn breakeven_label(year: Option<u32>) -> String {
    year.map_or_else(|| "—".to_string(), |y| format!("Year {y}"))
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Summary ---")?;
        writeln!(
            f,
            "25-yr PPA savings vs utility:  ${}",
            format_whole(self.total_savings_ppa_vs_utility)
        )?;
        writeln!(
            f,
            "Purchase breakeven:            {}",
            breakeven_label(self.breakeven_year)
        )?;
        writeln!(
            f,
            "Net system cost (after ITC):   ${}",
            format_whole(self.discounted_system_cost)
        )?;
        write!(
            f,
            "CO2 offset (kg) / trees:       {} / {}",
            format_whole(self.co2_saved_kg),
            format_whole(self.trees_equivalent)
        )
    }
}
