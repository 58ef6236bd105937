//! Color constants and auto-scaling helpers for the TUI.

use ratatui::style::Color;

/// Utility line color.
pub const UTILITY_COLOR: Color = Color::Blue;
/// PPA line color.
pub const PPA_COLOR: Color = Color::Green;
/// Purchase line color.
pub const PURCHASE_COLOR: Color = Color::Yellow;
/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Highlighted input row.
pub const SELECTED_FG: Color = Color::Cyan;
/// View-only badge and rejected-edit messages.
pub const LOCKED_FG: Color = Color::Magenta;

/// Computes Y-axis bounds across all series with 10% padding.
pub fn auto_bounds_y(series: &[&[(f64, f64)]]) -> [f64; 2] {
    let all = series.iter().flat_map(|s| s.iter()).map(|&(_, y)| y);
    let min = all.clone().fold(f64::INFINITY, f64::min);
    let max = all.fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return [-1.0, 1.0];
    }
    let range = (max - min).max(1.0);
    let pad = range * 0.1;
    [min - pad, max + pad]
}
