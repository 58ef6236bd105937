//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use solar_savings::projection::params::ParameterSet;
use solar_savings::sync::address::{DEFAULT_BASE_URL, MemoryAddressBar};
use solar_savings::sync::session::Session;

/// Admin secret used by every fixture session.
pub const SECRET: &str = "letmein";

/// Stock calculator inputs.
pub fn default_params() -> ParameterSet {
    ParameterSet::default()
}

/// Inputs whose purchase path pays off: no NEM credit, heavy maintenance.
///
/// Operating cost is 2000/yr against a 31,500 net system cost, so the
/// running total first reaches it in year 16.
pub fn breakeven_params() -> ParameterSet {
    ParameterSet {
        net_metering_credit: 0.0,
        maintenance: 2000.0,
        ..ParameterSet::default()
    }
}

/// Opens a session on the default base URL with `input` as the address.
pub fn open_session(input: &str) -> Session {
    let bar = MemoryAddressBar::resolve(DEFAULT_BASE_URL, input).expect("base url parses");
    Session::open(default_params(), bar, SECRET)
}

/// Opens an unlocked session with `query` appended after the credential.
pub fn open_admin_session(query: &str) -> Session {
    let input = if query.is_empty() {
        format!("?admin={SECRET}")
    } else {
        format!("?admin={SECRET}&{query}")
    };
    open_session(&input)
}

/// Absolute-tolerance float comparison.
pub fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}
