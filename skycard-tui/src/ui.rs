//! Rendering — banner, search bar, and the weather card.
//!
//! Pure presentation: everything here derives from [`App`] accessors and
//! the clock; no state is mutated except the throbber animation frame.

use chrono::{DateTime, Datelike, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::app::App;
use crate::icon::ConditionIcon;

const PLACEHOLDER: &str = "Search by city or country";
const MAX_WIDTH: u16 = 54;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let width = area.width.min(MAX_WIDTH);
    let column = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y,
        width,
        height: area.height,
    };

    let [banner_area, search_area, card_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(12),
    ])
    .areas(column);

    draw_banner(frame, app, banner_area);
    draw_search(frame, app, search_area);
    draw_card(frame, app, card_area);
}

/// Transient error banner above the search bar; absent unless a lookup
/// recently failed.
fn draw_banner(frame: &mut Frame, app: &App, area: Rect) {
    let Some(message) = app.error_message() else {
        return;
    };

    let banner = Paragraph::new(message)
        .style(Style::default().fg(Color::White).bg(Color::Red))
        .centered()
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Red)));
    frame.render_widget(banner, area);
}

fn draw_search(frame: &mut Frame, app: &App, area: Rect) {
    // The shake feedback for empty submits renders as a red border flash.
    let border_style = if app.is_shaking() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(" Search ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visible = inner.width.saturating_sub(1) as usize;
    let scroll = app.input().visual_scroll(visible);

    if app.input().value().is_empty() {
        let placeholder = Paragraph::new(PLACEHOLDER).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(placeholder, inner);
    } else {
        let draft = Paragraph::new(app.input().value()).scroll((0, scroll as u16));
        frame.render_widget(draft, inner);
    }

    let cursor_x = inner.x + (app.input().visual_cursor().max(scroll) - scroll) as u16;
    frame.set_cursor_position(Position::new(cursor_x, inner.y));
}

fn draw_card(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // The spinner replaces the whole card while a lookup is in flight,
    // stale snapshot included.
    if app.is_loading() {
        let [_, middle, _] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);

        let label = match app.loading_query() {
            Some(query) => format!("Fetching weather for {query}..."),
            None => "Fetching weather...".to_string(),
        };
        let throbber = throbber_widgets_tui::Throbber::default()
            .label(label)
            .throbber_style(Style::default().fg(Color::Cyan));
        frame.render_stateful_widget(throbber, middle, app.throbber_state());
        return;
    }

    let Some(snap) = app.snapshot() else {
        return;
    };
    let icon = ConditionIcon::for_condition(&snap.condition);

    let [header, date, _, temp, desc, _, row1, row2] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let heading = Line::from(vec![
        Span::styled(icon.glyph(), Style::default().fg(icon.color())),
        Span::raw("  "),
        Span::styled(snap.title(), Style::default().add_modifier(Modifier::BOLD)),
    ]);
    frame.render_widget(Paragraph::new(heading), header);
    frame.render_widget(
        Paragraph::new(format_date(Utc::now())).style(Style::default().fg(Color::Gray)),
        date,
    );

    let temperature = Line::from(vec![
        Span::styled(
            snap.temperature_deg().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("°C"),
    ])
    .centered();
    frame.render_widget(Paragraph::new(temperature), temp);
    frame.render_widget(Paragraph::new(Line::from(snap.description.clone()).centered()), desc);

    draw_metric_row(
        frame,
        row1,
        ("Visibility", format_visibility(snap.visibility_m)),
        ("Feels like", format_temperature(snap.feels_like_deg())),
    );
    draw_metric_row(
        frame,
        row2,
        ("Humidity", format_humidity(snap.humidity_pct)),
        ("Wind", format_wind(snap.wind_speed_mps)),
    );
}

fn draw_metric_row(frame: &mut Frame, area: Rect, left: (&str, String), right: (&str, String)) {
    let [left_cell, right_cell] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);

    frame.render_widget(Paragraph::new(metric_line(left.0, left.1)), left_cell);
    frame.render_widget(
        Paragraph::new(metric_line(right.0, right.1).right_aligned()),
        right_cell,
    );
}

fn metric_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}  "), Style::default().fg(Color::Gray)),
        Span::raw(value),
    ])
}

// ── Field formatting ────────────────────────────────────────────────

fn format_temperature(deg: i64) -> String {
    format!("{deg}°C")
}

/// Metres / 1000, displayed without rounding: 10000 → "10 km", 9500 → "9.5 km".
fn format_visibility(metres: u32) -> String {
    format!("{} km", f64::from(metres) / 1000.0)
}

fn format_humidity(pct: u8) -> String {
    format!("{pct} %")
}

/// No space before the unit, as the card has always rendered it.
fn format_wind(mps: f64) -> String {
    format!("{mps}m/s")
}

/// Client-side current date, UTC components, day/month/year. Unrelated to
/// the weather payload's own timestamp.
fn format_date(now: DateTime<Utc>) -> String {
    format!("{}/{}/{}", now.day(), now.month(), now.year())
}
