use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::info;

use crate::api::BudgetBackend;
use crate::ui::app::{App, InputMode};
use crate::ui::commands;
use crate::ui::render;
use crate::ui::form::FormField;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(app: &mut App, api: &dyn BudgetBackend) -> Result<()> {
    app.schedule_refresh();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    info!("terminal ready");

    let result = run_app(&mut terminal, app, api);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("terminal restored");

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    api: &dyn BudgetBackend,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            app.visible_rows = render::page_size(f.area(), app);
            render::render(f, app);
        })?;

        // The loading frame is on screen; run the fetch, then redraw.
        if app.refresh_pending {
            app.run_pending_refresh(api);
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            handle_key(key, app, api);
        }
    }
    Ok(())
}

pub(super) fn handle_key(key: KeyEvent, app: &mut App, api: &dyn BudgetBackend) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.running = false;
        return;
    }
    if app.show_help {
        app.show_help = false;
        return;
    }
    match app.input_mode {
        InputMode::Normal => handle_normal_input(key, app),
        InputMode::Command => handle_command_input(key, app),
        InputMode::Form => handle_form_input(key, app, api),
        InputMode::Confirm => handle_confirm_input(key, app, api),
    }
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: KeyEvent, app: &mut App) {
    let len = app.view.budgets.len();
    let page = app.visible_rows.max(1);
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..page / 2 {
                scroll_down(&mut app.budget_index, &mut app.budget_scroll, len, page);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..page / 2 {
                scroll_up(&mut app.budget_index, &mut app.budget_scroll);
            }
        }
        KeyCode::Char('j') | KeyCode::Down => {
            scroll_down(&mut app.budget_index, &mut app.budget_scroll, len, page);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            scroll_up(&mut app.budget_index, &mut app.budget_scroll);
        }
        KeyCode::Char('g') => scroll_to_top(&mut app.budget_index, &mut app.budget_scroll),
        KeyCode::Char('G') => {
            scroll_to_bottom(&mut app.budget_index, &mut app.budget_scroll, len, page);
        }
        KeyCode::Char('n') => app.open_new_form(),
        KeyCode::Char('e') | KeyCode::Enter => app.open_edit_form(),
        KeyCode::Char('D') => app.request_delete(),
        KeyCode::Char('r') => app.schedule_refresh(),
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => app.status_message.clear(),
        _ => {}
    }
}

fn handle_command_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app);
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
}

fn handle_form_input(key: KeyEvent, app: &mut App, api: &dyn BudgetBackend) {
    match key.code {
        KeyCode::Esc => {
            app.close_form();
            app.set_status("Cancelled");
        }
        KeyCode::Enter => app.submit_form(api),
        _ => {
            let categories = &app.view.categories;
            let Some(form) = app.form.as_mut() else {
                return;
            };
            // Category is free text: +/- are typed there, Left/Right still cycle.
            let stepper = form.focus != FormField::Category;
            match key.code {
                KeyCode::Tab | KeyCode::Down => form.focus_next(),
                KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
                KeyCode::Right => form.adjust(1, categories),
                KeyCode::Left => form.adjust(-1, categories),
                KeyCode::Char('+') | KeyCode::Char('=') if stepper => form.adjust(1, categories),
                KeyCode::Char('-') if stepper => form.adjust(-1, categories),
                KeyCode::Backspace => form.backspace(),
                KeyCode::Char(c) => form.input(c),
                _ => {}
            }
        }
    }
}

fn handle_confirm_input(key: KeyEvent, app: &mut App, api: &dyn BudgetBackend) {
    let accepted = matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'));
    app.resolve_confirm(api, accepted);
}

#[cfg(test)]
#[path = "tui_tests.rs"]
mod tui_tests;
