//! Projection engine: walks the 25-year horizon one year at a time.

use tracing::debug;

use super::params::ParameterSet;
use super::types::{Projection, ProjectionRow};

/// Number of years projected.
pub const PROJECTION_YEARS: u32 = 25;
/// Battery subscription fee ($/month).
pub const BATTERY_MONTHLY_FEE: f64 = 59.99;
/// Annual escalation of the PPA battery subscription, independent of the PPA escalator.
pub const BATTERY_ESCALATION: f64 = 0.03;

/// Escalators smaller than this are treated as zero in [`geometric_total`].
const ZERO_RATE_EPSILON: f64 = 1e-12;

/// Yearly battery fee before escalation.
pub fn battery_annual_fee() -> f64 {
    BATTERY_MONTHLY_FEE * 12.0
}

/// Sum of `years` annual amounts starting at `first` and growing by `rate`.
///
/// # Arguments
///
/// * `first` - Year-1 amount
/// * `rate` - Fractional annual growth
/// * `years` - Number of years summed
///
/// Uses the closed form `first * ((1 + rate)^years - 1) / rate`, evaluated as
/// `expm1(years * ln1p(rate))` so small escalators keep full precision. A
/// zero rate makes that undefined, so it falls back to `first * years`.
///
/// # Examples
///
/// ```
/// use solar_savings::projection::engine::geometric_total;
///
/// assert_eq!(geometric_total(100.0, 0.0, 5), 500.0);
/// assert!((geometric_total(100.0, 0.1, 2) - 210.0).abs() < 1e-9);
/// ```
pub fn geometric_total(first: f64, rate: f64, years: u32) -> f64 {
    if rate.abs() < ZERO_RATE_EPSILON {
        first * f64::from(years)
    } else if rate > -1.0 {
        first * (f64::from(years) * rate.ln_1p()).exp_m1() / rate
    } else {
        // ln_1p is undefined here; no cancellation to avoid either
        let n = i32::try_from(years).unwrap_or(i32::MAX);
        first * ((1.0 + rate).powi(n) - 1.0) / rate
    }
}

/// `base * (1 + rate)^(year - 1)`: no escalation in year 1.
fn escalated(base: f64, rate: f64, year: u32) -> f64 {
    let exp = i32::try_from(year.saturating_sub(1)).unwrap_or(i32::MAX);
    base * (1.0 + rate).powi(exp)
}

/// Sequential projection over a borrowed parameter set.
///
/// Each row depends only on the parameters and its year, except the
/// purchase operating total, which is a running sum and forces the years to
/// be produced in order. The breakeven year latches on first hit.
pub struct Engine<'a> {
    params: &'a ParameterSet,
    discounted_system_cost: f64,
    next_year: u32,
    purchase_ops_cumulative: f64,
    breakeven_year: Option<u32>,
}

impl<'a> Engine<'a> {
    /// Creates an engine positioned before year 1.
    pub fn new(params: &'a ParameterSet) -> Self {
        Self {
            params,
            discounted_system_cost: params.discounted_system_cost(),
            next_year: 1,
            purchase_ops_cumulative: 0.0,
            breakeven_year: None,
        }
    }

    /// Computes the next year's row, or `None` past the horizon.
    pub fn step(&mut self) -> Option<ProjectionRow> {
        let year = self.next_year;
        if year > PROJECTION_YEARS {
            return None;
        }
        self.next_year += 1;

        let p = self.params;
        let battery_fee = if p.include_battery {
            battery_annual_fee()
        } else {
            0.0
        };

        // 1. Escalated rates for this year
        let utility_rate = escalated(p.utility_rate, p.utility_esc, year);
        let ppa_rate = escalated(p.ppa_rate, p.ppa_esc, year);
        let battery_ppa = escalated(battery_fee, BATTERY_ESCALATION, year);

        // 2. Annual costs. Purchase-path battery fee and NEM credit stay flat.
        let utility_annual = utility_rate * p.usage;
        let ppa_annual = ppa_rate * p.usage + battery_ppa;
        let nem_savings = p.usage * p.net_metering_credit;
        let purchase_annual = p.maintenance + battery_fee - nem_savings;

        // 3. Cumulative costs: closed form for the escalating paths,
        //    running sum for purchase operations
        self.purchase_ops_cumulative += purchase_annual;
        let utility_cumulative = geometric_total(p.utility_rate * p.usage, p.utility_esc, year);
        let ppa_cumulative = geometric_total(p.ppa_rate * p.usage, p.ppa_esc, year)
            + geometric_total(battery_fee, BATTERY_ESCALATION, year);
        let purchase_cumulative = self.discounted_system_cost + self.purchase_ops_cumulative;

        // 4. Breakeven latch
        if self.breakeven_year.is_none()
            && self.purchase_ops_cumulative >= self.discounted_system_cost
        {
            debug!(year, "purchase breakeven reached");
            self.breakeven_year = Some(year);
        }

        Some(ProjectionRow {
            year,
            utility_rate,
            ppa_rate,
            utility_annual,
            ppa_annual,
            purchase_annual,
            utility_cumulative,
            ppa_cumulative,
            purchase_ops_cumulative: self.purchase_ops_cumulative,
            purchase_cumulative,
        })
    }

    /// Runs the remaining years and returns the complete projection.
    pub fn run(mut self) -> Projection {
        let mut rows = Vec::with_capacity(PROJECTION_YEARS as usize);
        while let Some(row) = self.step() {
            rows.push(row);
        }
        Projection {
            rows,
            breakeven_year: self.breakeven_year,
            discounted_system_cost: self.discounted_system_cost,
        }
    }

    /// Breakeven year found so far.
    pub fn breakeven_year(&self) -> Option<u32> {
        self.breakeven_year
    }
}

/// Projects `params` over the full horizon.
///
/// # Arguments
///
/// * `params` - Calculator inputs; read only
pub fn project(params: &ParameterSet) -> Projection {
    Engine::new(params).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * b.abs().max(1.0)
    }

    #[test]
    fn produces_twenty_five_rows_in_order() {
        let p = project(&ParameterSet::default());
        assert_eq!(p.rows.len(), 25);
        for (i, r) in p.rows.iter().enumerate() {
            assert_eq!(r.year as usize, i + 1);
        }
    }

    #[test]
    fn year_one_matches_hand_calculation() {
        let p = project(&ParameterSet::default());
        let y1 = &p.rows[0];
        assert!(close(y1.utility_annual, 5454.52));
        assert!(close(y1.ppa_annual, 3157.88));
        assert!(close(y1.purchase_annual, -1235.4));
        assert!(close(p.discounted_system_cost, 31500.0));
        // no escalation in year 1
        assert_eq!(y1.utility_rate, 0.38);
        assert_eq!(y1.ppa_rate, 0.22);
    }

    #[test]
    fn battery_adds_flat_fee_to_both_paths_in_year_one() {
        let base = project(&ParameterSet::default());
        let params = ParameterSet {
            include_battery: true,
            ..ParameterSet::default()
        };
        let bat = project(&params);
        assert!(close(bat.rows[0].ppa_annual - base.rows[0].ppa_annual, 719.88));
        assert!(close(
            bat.rows[0].purchase_annual - base.rows[0].purchase_annual,
            719.88
        ));
    }

    #[test]
    fn battery_escalates_on_ppa_path_only() {
        let base = project(&ParameterSet::default());
        let params = ParameterSet {
            include_battery: true,
            ..ParameterSet::default()
        };
        let bat = project(&params);
        let ppa_delta = bat.rows[9].ppa_annual - base.rows[9].ppa_annual;
        let buy_delta = bat.rows[9].purchase_annual - base.rows[9].purchase_annual;
        assert!(close(ppa_delta, 719.88 * 1.03_f64.powi(9)));
        assert!(close(buy_delta, 719.88));
    }

    #[test]
    fn closed_form_agrees_with_running_sum() {
        let params = ParameterSet {
            include_battery: true,
            ..ParameterSet::default()
        };
        let p = project(&params);
        let mut util = 0.0;
        let mut ppa = 0.0;
        for r in &p.rows {
            util += r.utility_annual;
            ppa += r.ppa_annual;
            assert!(close(r.utility_cumulative, util), "util mismatch y={}", r.year);
            assert!(close(r.ppa_cumulative, ppa), "ppa mismatch y={}", r.year);
        }
    }

    #[test]
    fn zero_escalation_falls_back_to_linear_total() {
        let params = ParameterSet {
            utility_esc: 0.0,
            ppa_esc: 0.0,
            ..ParameterSet::default()
        };
        let p = project(&params);
        for r in &p.rows {
            let y = f64::from(r.year);
            assert!(r.utility_cumulative.is_finite());
            assert!(r.ppa_cumulative.is_finite());
            assert!(close(r.utility_cumulative, 0.38 * 14354.0 * y));
            assert!(close(r.ppa_cumulative, 0.22 * 14354.0 * y));
        }
    }

    #[test]
    fn discounted_cost_is_constant_across_rows() {
        let p = project(&ParameterSet::default());
        for r in &p.rows {
            assert!(close(
                r.purchase_cumulative - r.purchase_ops_cumulative,
                p.discounted_system_cost
            ));
        }
    }

    #[test]
    fn default_inputs_never_break_even() {
        // NEM credit outweighs maintenance, so operating cost only falls.
        let p = project(&ParameterSet::default());
        assert_eq!(p.breakeven_year, None);
    }

    #[test]
    fn breakeven_is_first_year_reaching_discounted_cost() {
        // 2000/yr ops vs 31500 upfront: 15 years = 30000, 16 years = 32000
        let params = ParameterSet {
            maintenance: 2000.0,
            net_metering_credit: 0.0,
            ..ParameterSet::default()
        };
        let p = project(&params);
        assert_eq!(p.breakeven_year, Some(16));
    }

    #[test]
    fn breakeven_counts_exact_equality() {
        let params = ParameterSet {
            system_cost: 10000.0,
            itc: 0.0,
            maintenance: 1000.0,
            net_metering_credit: 0.0,
            ..ParameterSet::default()
        };
        assert_eq!(project(&params).breakeven_year, Some(10));
    }

    #[test]
    fn engine_stops_after_horizon() {
        let params = ParameterSet::default();
        let mut engine = Engine::new(&params);
        for _ in 0..PROJECTION_YEARS {
            assert!(engine.step().is_some());
        }
        assert!(engine.step().is_none());
    }

    #[test]
    fn geometric_total_keeps_precision_for_tiny_rates() {
        let rate: f64 = 1e-9;
        let running: f64 = (0..25).map(|k| 100.0 * (1.0 + rate).powi(k)).sum();
        let total = geometric_total(100.0, rate, 25);
        assert!((total - running).abs() < 1e-9, "{total} vs {running}");
    }

    #[test]
    fn geometric_total_handles_rate_of_minus_one() {
        assert_eq!(geometric_total(100.0, -1.0, 4), 100.0);
    }

    #[test]
    fn geometric_total_handles_negative_rate() {
        let total = geometric_total(100.0, -0.5, 3);
        assert!(close(total, 100.0 + 50.0 + 25.0));
    }
}
