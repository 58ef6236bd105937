//! Integration tests for the 25-year projection and its summary.

mod common;

use common::close;
use solar_savings::projection::chart::chart_series;
use solar_savings::projection::engine::{Engine, PROJECTION_YEARS, battery_annual_fee, project};
use solar_savings::projection::params::{ParameterSet, ViewMode};
use solar_savings::projection::summary::Summary;

#[test]
fn default_projection_year_one() {
    let projection = project(&common::default_params());
    assert_eq!(projection.rows.len(), PROJECTION_YEARS as usize);

    let y1 = projection.year(1).expect("year 1 present");
    assert!(close(y1.utility_annual, 5454.52, 1e-6));
    assert!(close(y1.ppa_annual, 3157.88, 1e-6));
    assert!(close(y1.purchase_annual, -1235.4, 1e-6));
    assert!(close(projection.discounted_system_cost, 31500.0, 1e-9));
}

#[test]
fn battery_adds_fee_to_ppa_and_purchase() {
    let base = project(&common::default_params());
    let with_battery = project(&ParameterSet {
        include_battery: true,
        ..common::default_params()
    });

    let (a, b) = (&base.rows[0], &with_battery.rows[0]);
    assert!(close(b.ppa_annual - a.ppa_annual, 719.88, 1e-9));
    assert!(close(b.purchase_annual - a.purchase_annual, 719.88, 1e-9));
    assert!(close(b.utility_annual, a.utility_annual, 1e-12));
    assert!(close(battery_annual_fee(), 719.88, 1e-9));
}

#[test]
fn purchase_battery_fee_stays_flat_while_ppa_fee_escalates() {
    let base = project(&common::default_params());
    let with_battery = project(&ParameterSet {
        include_battery: true,
        ..common::default_params()
    });

    let ppa_delta = with_battery.rows[9].ppa_annual - base.rows[9].ppa_annual;
    let purchase_delta = with_battery.rows[9].purchase_annual - base.rows[9].purchase_annual;
    assert!(close(ppa_delta, 719.88 * 1.03_f64.powi(9), 1e-6));
    assert!(close(purchase_delta, 719.88, 1e-9));
}

#[test]
fn system_cost_is_constant_across_rows() {
    let params = common::default_params();
    let projection = project(&params);
    for row in &projection.rows {
        assert!(close(
            row.purchase_cumulative - row.purchase_ops_cumulative,
            params.system_cost * (1.0 - params.itc),
            1e-6
        ));
    }
}

#[test]
fn higher_utility_rate_and_escalator_cost_more_over_horizon() {
    let projection = project(&common::default_params());
    let last = projection.last().expect("25 rows");
    assert!(last.utility_cumulative > last.ppa_cumulative);
}

#[test]
fn cumulative_series_never_decrease_with_positive_costs() {
    let projection = project(&common::default_params());
    for pair in projection.rows.windows(2) {
        assert!(pair[1].utility_cumulative > pair[0].utility_cumulative);
        assert!(pair[1].ppa_cumulative > pair[0].ppa_cumulative);
    }
}

#[test]
fn zero_escalation_is_linear() {
    let params = ParameterSet {
        utility_esc: 0.0,
        ppa_esc: 0.0,
        ..common::default_params()
    };
    let projection = project(&params);
    for row in &projection.rows {
        let y = f64::from(row.year);
        assert!(close(row.utility_cumulative, 0.38 * 14354.0 * y, 1e-6));
        assert!(close(row.ppa_cumulative, 0.22 * 14354.0 * y, 1e-6));
        assert!(row.utility_cumulative.is_finite());
    }
}

#[test]
fn default_inputs_never_break_even() {
    let projection = project(&common::default_params());
    assert_eq!(projection.breakeven_year, None);
    let summary = Summary::from_projection(&common::default_params(), &projection);
    assert_eq!(summary.breakeven_year, None);
}

#[test]
fn breakeven_latches_on_first_year() {
    let params = common::breakeven_params();
    let mut engine = Engine::new(&params);
    let mut first = None;
    while let Some(row) = engine.step() {
        if first.is_none() {
            first = engine.breakeven_year();
            if first.is_some() {
                assert_eq!(first, Some(row.year));
            }
        }
        assert_eq!(engine.breakeven_year().is_some(), first.is_some());
        if first.is_some() {
            assert_eq!(engine.breakeven_year(), first);
        }
    }
    assert_eq!(first, Some(16));
    assert_eq!(project(&params).breakeven_year, Some(16));
}

#[test]
fn summary_totals_follow_rows() {
    let params = common::default_params();
    let projection = project(&params);
    let summary = Summary::from_projection(&params, &projection);

    let savings: f64 = projection
        .rows
        .iter()
        .map(|r| r.utility_annual - r.ppa_annual)
        .sum();
    assert!(close(summary.total_savings_ppa_vs_utility, savings, 1e-6));
    assert!(close(summary.total_kwh, 14354.0 * 25.0, 1e-9));
    assert!(close(summary.co2_saved_kg, 14354.0 * 25.0 * 0.7, 1e-6));
    assert!(close(summary.trees_equivalent, summary.co2_saved_kg / 21.77, 1e-9));
}

#[test]
fn chart_series_switches_with_view() {
    let projection = project(&common::default_params());
    let annual = chart_series(&projection, ViewMode::Annual);
    let cumulative = chart_series(&projection, ViewMode::Cumulative);

    assert_eq!(annual.len(), 25);
    assert_eq!(cumulative.len(), 25);
    assert_eq!(annual[0].utility, 5454.52);
    assert_eq!(annual[0].purchase, -1235.4);
    // year 1 cumulative purchase includes the net system cost
    assert_eq!(cumulative[0].purchase, 30264.6);
    assert!(cumulative[24].utility > annual[24].utility);
}
