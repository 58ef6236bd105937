//! Text and JSON renderings of a session for the CLI.

use std::fmt;

use serde::Serialize;

use crate::projection::chart::{ChartPoint, chart_series};
use crate::projection::params::{Field, ParameterSet, ViewMode};
use crate::projection::summary::Summary;
use crate::projection::types::ProjectionRow;
use crate::sync::access::Access;
use crate::sync::address::AddressBar;
use crate::sync::session::Session;

/// Plain-text report: inputs, the table for the active view, and the summary.
pub struct TextReport<'a, A: AddressBar> {
    session: &'a Session<A>,
}

impl<'a, A: AddressBar> TextReport<'a, A> {
    /// Borrows `session` for one rendering.
    pub fn new(session: &'a Session<A>) -> Self {
        Self { session }
    }
}

impl<A: AddressBar> fmt::Display for TextReport<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.session;
        let params = s.params();
        let view = params.view;

        write!(f, "Solar Savings Comparison")?;
        if s.is_locked() {
            write!(f, " · View-only")?;
        }
        writeln!(f)?;
        writeln!(f, "25-year projection · PPA vs Purchase vs Utility")?;
        writeln!(f)?;

        writeln!(f, "--- Inputs ---")?;
        for field in Field::ALL {
            writeln!(f, "{:<24} {}", field.label(), params.display_value(field))?;
        }
        writeln!(f)?;

        writeln!(f, "--- Projection ({view}) ---")?;
        writeln!(
            f,
            "{:>4}  {:>12}  {:>12}  {:>12}",
            "year", "utility", "ppa", "purchase"
        )?;
        for p in chart_series(s.projection(), view) {
            writeln!(
                f,
                "{:>4}  {:>12.2}  {:>12.2}  {:>12.2}",
                p.year, p.utility, p.ppa, p.purchase
            )?;
        }
        writeln!(f)?;

        write!(f, "{}", s.summary())
    }
}

/// Machine-readable snapshot of a session.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub params: &'a ParameterSet,
    pub access: Access,
    pub url: String,
    pub share_url: String,
    pub view: ViewMode,
    pub rows: &'a [ProjectionRow],
    pub chart: Vec<ChartPoint>,
    pub summary: &'a Summary,
}

impl<'a> JsonReport<'a> {
    /// Snapshots `session`, including the chart for its active view.
    pub fn new<A: AddressBar>(session: &'a Session<A>) -> Self {
        let params = session.params();
        Self {
            params,
            access: session.access(),
            url: session.current_url().to_string(),
            share_url: session.share_link().to_string(),
            view: params.view,
            rows: &session.projection().rows,
            chart: chart_series(session.projection(), params.view),
            summary: session.summary(),
        }
    }
}
