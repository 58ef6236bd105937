//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};

use super::runtime::App;
use super::style;
use crate::projection::chart::chart_series;
use crate::projection::params::Field;
use crate::projection::summary::{breakeven_label, format_whole};

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // header
            Constraint::Min(12),    // chart
            Constraint::Length(13), // inputs + summary
            Constraint::Length(1),  // status
            Constraint::Length(1),  // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_chart(frame, app, chunks[1]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[2]);
    render_inputs(frame, app, bottom[0]);
    render_summary(frame, app, bottom[1]);

    render_status(frame, app, chunks[3]);
    render_footer(frame, chunks[4]);
}

/// Header bar: title, view mode, lock badge.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(
            " SOLAR SAVINGS ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " 25-year projection │ {} ",
            app.session.params().view
        )),
    ];
    if app.session.is_locked() {
        spans.push(Span::styled(
            "· View-only",
            Style::default().fg(style::LOCKED_FG),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Utility vs PPA vs purchase, annual or cumulative.
fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let view = app.session.params().view;
    let points = chart_series(app.session.projection(), view);

    let utility: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (f64::from(p.year), p.utility))
        .collect();
    let ppa: Vec<(f64, f64)> = points.iter().map(|p| (f64::from(p.year), p.ppa)).collect();
    let purchase: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (f64::from(p.year), p.purchase))
        .collect();

    let y_bounds = style::auto_bounds_y(&[&utility, &ppa, &purchase]);
    let x_lo = utility.first().map_or(1.0, |p| p.0);
    let x_hi = utility.last().map_or(2.0, |p| p.0).max(x_lo + 1.0);

    let datasets = vec![
        line_dataset("Utility", style::UTILITY_COLOR, &utility),
        line_dataset("PPA", style::PPA_COLOR, &ppa),
        line_dataset("Purchase", style::PURCHASE_COLOR, &purchase),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(format!(" Projection ({view}) "))
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("year")
                .bounds([x_lo, x_hi])
                .labels(vec![format!("{}", x_lo as u32), format!("{}", x_hi as u32)]),
        )
        .y_axis(
            Axis::default()
                .title("$")
                .bounds(y_bounds)
                .labels(vec![format_whole(y_bounds[0]), format_whole(y_bounds[1])]),
        );

    frame.render_widget(chart, area);
}

fn line_dataset<'a>(name: &'a str, color: Color, data: &'a [(f64, f64)]) -> Dataset<'a> {
    Dataset::default()
        .name(name)
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(data)
}

/// Input list with the selected field highlighted.
fn render_inputs(frame: &mut Frame, app: &App, area: Rect) {
    let params = app.session.params();
    let selected = app.selected_field();
    let lines: Vec<Line> = Field::ALL
        .iter()
        .map(|&field| {
            let text = format!(
                " {:<22} {:>12}",
                field.label(),
                params.display_value(field)
            );
            if field == selected {
                Line::from(Span::styled(
                    text,
                    Style::default()
                        .fg(style::SELECTED_FG)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(text)
            }
        })
        .collect();

    let block = Block::default().title(" Inputs ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Lifetime figures.
fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let s = app.session.summary();
    let lines = vec![
        Line::from(" 25-yr PPA savings vs utility"),
        Line::from(Span::styled(
            format!("   ${}", format_whole(s.total_savings_ppa_vs_utility)),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(" Purchase breakeven"),
        Line::from(Span::styled(
            format!("   {}", breakeven_label(s.breakeven_year)),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(" Net system cost (after ITC)"),
        Line::from(format!("   ${}", format_whole(s.discounted_system_cost))),
        Line::from(" CO₂ offset (kg) / trees"),
        Line::from(format!(
            "   {} / {}",
            format_whole(s.co2_saved_kg),
            format_whole(s.trees_equivalent)
        )),
    ];

    let block = Block::default().title(" Summary ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Last action result or lock notice.
fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let text = app.status.as_deref().unwrap_or("");
    let color = if app.session.is_locked() {
        style::LOCKED_FG
    } else {
        style::FOOTER_FG
    };
    let status = Paragraph::new(Line::from(Span::styled(
        format!(" {text}"),
        Style::default().fg(color),
    )));
    frame.render_widget(status, area);
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  v:View  ↑/↓:Field  +/-:Adjust  b:Battery  s:Share link",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::projection::params::ParameterSet;
    use crate::sync::address::{DEFAULT_BASE_URL, MemoryAddressBar};
    use crate::sync::session::Session;

    #[test]
    fn renders_without_panicking() {
        let bar = MemoryAddressBar::resolve(DEFAULT_BASE_URL, "").expect("base url parses");
        let app = App::new(Session::open(ParameterSet::default(), bar, "k"));
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).expect("test backend");
        let drawn = terminal.draw(|frame| render(frame, &app));
        assert!(drawn.is_ok());
    }
}
