use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::app::{App, InputMode};
use super::commands;
use super::form::FormField;
use super::state::Phase;
use super::theme;

fn layout(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command bar
        ])
        .split(area)
}

/// Area handed to the budgets screen for a frame of size `area`.
fn content_area(area: Rect) -> Rect {
    layout(area)[1]
}

/// Budget rows the table shows on a frame of size `area`.
pub(crate) fn page_size(area: Rect, app: &App) -> usize {
    super::screens::budgets::page_size(content_area(area), app)
}

pub(crate) fn render(f: &mut Frame, app: &App) {
    let chunks = layout(f.area());

    render_title_bar(f, chunks[0], app);
    super::screens::budgets::render(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
    render_command_bar(f, chunks[3], app);

    if app.form.is_some() {
        render_form_modal(f, f.area(), app);
    }
    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

fn render_title_bar(f: &mut Frame, area: Rect, app: &App) {
    let title = Line::from(vec![
        Span::styled(
            " budgetview ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("| Budgets", Style::default().fg(theme::TEXT_DIM)),
        Span::styled(
            format!(" | {}", app.currency),
            Style::default().fg(theme::TEXT_DIM),
        ),
    ]);
    f.render_widget(
        Paragraph::new(title).style(Style::default().bg(theme::HEADER_BG)),
        area,
    );
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mode_label = format!(" {} ", app.input_mode);
    let mode_bg = match app.input_mode {
        InputMode::Normal => theme::ACCENT,
        InputMode::Command | InputMode::Form => theme::GREEN,
        InputMode::Confirm => theme::RED,
    };
    let mode_style = Style::default()
        .fg(theme::HEADER_BG)
        .bg(mode_bg)
        .add_modifier(Modifier::BOLD);

    let info = match app.view.phase {
        _ if app.view.is_loading() => " loading…".to_string(),
        Phase::Failed => " offline".to_string(),
        _ => format!(
            " {} budgets | {} alerts | {} txns",
            app.view.budgets.len(),
            app.view.alerts.len(),
            app.view.transactions.len()
        ),
    };

    let right = match app.input_mode {
        InputMode::Form => " Tab next | ←/→ adjust | Enter save | Esc cancel ",
        InputMode::Confirm => " y confirm | any key cancel ",
        _ => " n new | e edit | D delete | r refresh | ? help ",
    };

    let available = area.width as usize;
    let used = mode_label.chars().count() + info.chars().count() + right.chars().count();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(&mode_label, mode_style),
        Span::styled(&info, theme::status_bar_style()),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme::ACCENT)),
                Span::styled(&app.command_input, theme::command_bar_style()),
            ]),
            Some(1 + app.command_input.chars().count() as u16),
        ),
        InputMode::Confirm => (
            Line::from(vec![
                Span::styled(&app.confirm_message, Style::default().fg(theme::YELLOW)),
                Span::styled(" [y/N] ", Style::default().fg(theme::RED)),
            ]),
            None,
        ),
        InputMode::Normal | InputMode::Form => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(
                    " Press : for commands, ? for help",
                    theme::dim_style(),
                ))
            } else {
                Line::from(Span::styled(
                    &app.status_message,
                    theme::command_bar_style(),
                ))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::COMMAND_BG));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn render_form_modal(f: &mut Frame, area: Rect, app: &App) {
    let Some(form) = app.form.as_ref() else {
        return;
    };

    let mut lines = vec![Line::from("")];
    for field in FormField::all() {
        let focused = *field == form.focus;
        let marker = if focused { "▸ " } else { "  " };
        let value_style = if focused {
            theme::selected_style()
        } else {
            theme::normal_style()
        };
        let hint = match field {
            FormField::Category if focused && !app.view.categories.is_empty() => " ←/→ cycle",
            FormField::Month if focused => " 1-12, +/- step",
            _ => "",
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{:<10}", field.label()), theme::dim_style()),
            Span::styled(format!(" {} ", form.value(*field)), value_style),
            Span::styled(hint, theme::dim_style()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(match &form.error {
        Some(msg) => Line::from(Span::styled(format!("  {msg}"), theme::banner_style())),
        None => Line::from(Span::styled(
            "  Enter to save, Esc to cancel",
            theme::dim_style(),
        )),
    });

    let popup = centered(area, 56, lines.len() as u16 + 2);
    f.render_widget(Clear, popup);
    let modal = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .title(Span::styled(
                form.title(),
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(modal, popup);
}

const KEY_HELP: &[(&str, &str)] = &[
    ("j/k, Up/Down", "Move cursor"),
    ("Ctrl-d/u", "Half page down/up"),
    ("g/G", "Top/bottom"),
    ("n", "New budget"),
    ("e, Enter", "Edit selected budget"),
    ("D", "Delete selected budget"),
    ("r", "Refetch from the server"),
    (":", "Command mode"),
    ("Esc", "Cancel/back"),
    ("Ctrl-q, Ctrl-c", "Quit"),
];

/// One entry per command, under its longest alias.
fn command_help() -> Vec<(&'static str, &'static str)> {
    let mut by_desc: Vec<(&'static str, &'static str)> = Vec::new();
    for (&name, cmd) in commands::COMMANDS.iter() {
        match by_desc.iter_mut().find(|(_, d)| *d == cmd.description) {
            Some(entry) if entry.0.len() < name.len() => entry.0 = name,
            Some(_) => {}
            None => by_desc.push((name, cmd.description)),
        }
    }
    by_desc.sort_unstable();
    by_desc
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let section = |text: &'static str| {
        Line::from(Span::styled(
            text,
            Style::default()
                .fg(theme::YELLOW)
                .add_modifier(Modifier::BOLD),
        ))
    };
    let entry = |key: String, desc: &str| {
        Line::from(vec![
            Span::styled(format!("  {key:<18}"), Style::default().fg(theme::ACCENT)),
            Span::styled(desc.to_string(), theme::normal_style()),
        ])
    };

    let mut lines = vec![
        Line::from(Span::styled(
            " budgetview Help ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section(" Keys"),
    ];
    lines.extend(KEY_HELP.iter().map(|(key, desc)| entry((*key).to_string(), desc)));
    lines.push(Line::from(""));
    lines.push(section(" Commands"));
    lines.extend(
        command_help()
            .into_iter()
            .map(|(name, desc)| entry(format!(":{name}"), desc)),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Press any key to close ",
        theme::dim_style(),
    )));

    let popup = centered(area, 72, lines.len() as u16 + 2);
    f.render_widget(Clear, popup);
    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(help, popup);
}
