use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::metrics::round_half_up;
use crate::models::Severity;
use crate::ui::app::App;
use crate::ui::state::Phase;
use crate::ui::theme;
use crate::ui::util::{follow, format_currency, progress_bar, truncate};

const MAX_ALERT_LINES: usize = 6;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    match app.view.phase {
        Phase::Idle | Phase::Loading => render_loading(f, area),
        Phase::Failed => render_error(f, area, app),
        Phase::Ready => {
            let (alerts, table) = split(area, app);
            if let Some(alerts) = alerts {
                render_alerts(f, alerts, app);
            }
            render_table(f, table, app);
        }
    }
}

/// Alerts panel (when there are alerts) above the budgets table.
fn split(area: Rect, app: &App) -> (Option<Rect>, Rect) {
    let alert_lines = app.view.alerts.len().min(MAX_ALERT_LINES);
    if alert_lines == 0 {
        return (None, area);
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(alert_lines as u16 + 2),
            Constraint::Min(3),
        ])
        .split(area);
    (Some(chunks[0]), chunks[1])
}

/// Budget rows that fit in the table inside `area` (borders and header excluded).
pub(crate) fn page_size(area: Rect, app: &App) -> usize {
    let (_, table) = split(area, app);
    table_rows(table)
}

fn table_rows(table: Rect) -> usize {
    (table.height.saturating_sub(3) as usize).max(1)
}

fn titled_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ))
}

fn render_loading(f: &mut Frame, area: Rect) {
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("⠋ Loading budgets…", theme::dim_style())),
    ])
    .centered()
    .block(titled_block(" Budgets ".into()));
    f.render_widget(msg, area);
}

fn render_error(f: &mut Frame, area: Rect, app: &App) {
    let message = app.view.error.as_deref().unwrap_or_default();
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message, theme::banner_style())),
        Line::from(""),
        Line::from(Span::styled("Press r to retry", theme::dim_style())),
    ])
    .centered()
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::RED))
            .title(Span::styled(" Error ", theme::banner_style())),
    );
    f.render_widget(msg, area);
}

fn render_alerts(f: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = app
        .view
        .alerts
        .iter()
        .take(MAX_ALERT_LINES)
        .map(|alert| {
            let color = theme::severity_color(Some(alert.severity));
            let tag = match alert.severity {
                Severity::Error => " OVER ",
                Severity::Warning => " WARN ",
            };
            Line::from(vec![
                Span::styled(
                    tag,
                    Style::default()
                        .fg(theme::HEADER_BG)
                        .bg(color)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(alert.message.as_str(), Style::default().fg(color)),
            ])
        })
        .collect();

    let title = format!(" Alerts ({}) ", app.view.alerts.len());
    f.render_widget(Paragraph::new(lines).block(titled_block(title)), area);
}

fn render_table(f: &mut Frame, area: Rect, app: &App) {
    if app.view.budgets.is_empty() {
        render_empty(f, area);
        return;
    }

    let header_cells = ["Category", "Period", "Budget", "Spent", "Remaining", "Progress"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let page = table_rows(area);
    // the page may have shrunk since the last key
    let scroll = follow(app.budget_index, app.budget_scroll, page);

    let currency = app.currency.as_str();
    let rows: Vec<Row> = app
        .view
        .rows()
        .into_iter()
        .enumerate()
        .skip(scroll)
        .take(page)
        .map(|(i, (budget, row))| {
            let color = theme::severity_color(row.severity());

            let style = if i == app.budget_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let remaining_style = if row.remaining.is_sign_negative() {
                Style::default().fg(theme::RED)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(truncate(&budget.category, 20)),
                Cell::from(budget.period()),
                Cell::from(format_currency(budget.amount, currency)),
                Cell::from(format_currency(row.spent, currency)),
                Cell::from(Span::styled(
                    format_currency(row.remaining, currency),
                    remaining_style,
                )),
                Cell::from(Line::from(vec![
                    Span::styled(progress_bar(row.progress, 16), Style::default().fg(color)),
                    Span::styled(
                        format!(" {:.0}%", round_half_up(row.progress, 0)),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                ])),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(14),
        Constraint::Length(8),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(24),
    ];

    let title = format!(" Budgets ({}) ", app.view.budgets.len());
    let table = Table::new(rows, widths).header(header).block(titled_block(title));
    f.render_widget(table, area);
}

fn render_empty(f: &mut Frame, area: Rect) {
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("No budgets yet", theme::dim_style())),
        Line::from(""),
        Line::from(Span::styled(
            "Press n (or :new) to create a spending limit",
            theme::dim_style(),
        )),
    ])
    .centered()
    .block(titled_block(" Budgets ".into()));
    f.render_widget(msg, area);
}
