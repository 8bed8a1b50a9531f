#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use ratatui::{backend::TestBackend, layout::Rect, Terminal};
use rust_decimal_macros::dec;

use crate::api::fake::FakeBackend;
use crate::models::{Budget, BudgetForm, BudgetId, Transaction};
use crate::ui::app::App;
use crate::ui::render::{page_size, render};
use crate::ui::state::FETCH_FAILED_MESSAGE;
use crate::ui::util::{scroll_down, scroll_to_bottom};

fn screen_text(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|f| render(f, app)).unwrap();
    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn seeded() -> FakeBackend {
    let api = FakeBackend::with_categories(&["Food", "Travel"]);
    api.budgets.borrow_mut().push(Budget {
        id: BudgetId::new("b1"),
        category: "Travel".into(),
        month: 6,
        year: 2024,
        amount: dec!(100),
    });
    api.transactions.borrow_mut().push(Transaction::new(
        "Travel".into(),
        dec!(105),
        NaiveDate::from_ymd_opt(2024, 6, 12).unwrap(),
    ));
    api
}

#[test]
fn test_loading_frame() {
    let mut app = App::new("USD".into());
    app.schedule_refresh();
    let text = screen_text(&app);
    assert!(text.contains("Loading budgets"));
    assert!(!text.contains("Category"));
}

#[test]
fn test_ready_frame_shows_table_and_alerts() {
    let api = seeded();
    let mut app = App::new("USD".into());
    app.refresh_all(&api);
    let text = screen_text(&app);

    assert!(text.contains("Budgets (1)"));
    assert!(text.contains("Category"));
    assert!(text.contains("Remaining"));
    assert!(text.contains("6/2024"));
    assert!(text.contains("$105.00"));
    assert!(text.contains("-$5.00"));
    assert!(text.contains("100%"));
    assert!(text.contains("OVER"));
    assert!(text.contains("by 5.0%"));
}

#[test]
fn test_refetch_renders_same_frame() {
    let api = seeded();
    let mut app = App::new("USD".into());
    app.refresh_all(&api);
    let first = screen_text(&app);
    app.refresh_all(&api);
    let second = screen_text(&app);
    assert_eq!(first, second);
}

#[test]
fn test_failed_fetch_shows_banner_without_table() {
    let api = seeded();
    api.fail_fetch.set(true);
    let mut app = App::new("USD".into());
    app.refresh_all(&api);
    let text = screen_text(&app);

    assert!(text.contains(FETCH_FAILED_MESSAGE));
    assert!(text.contains("Press r to retry"));
    assert!(!text.contains("Category"));
}

#[test]
fn test_empty_state() {
    let api = FakeBackend::with_categories(&["Food"]);
    let mut app = App::new("USD".into());
    app.refresh_all(&api);
    let text = screen_text(&app);
    assert!(text.contains("No budgets yet"));
    assert!(!text.contains("Alerts"));
}

#[test]
fn test_created_budget_appears_after_refetch() {
    let api = FakeBackend::with_categories(&["Food"]);
    let mut app = App::new("USD".into());
    app.refresh_all(&api);

    let form = BudgetForm::new("Food".into(), 6, 2024, dec!(200));
    assert!(app.save_budget(&api, &form, None));
    app.run_pending_refresh(&api);
    let text = screen_text(&app);

    assert!(text.contains("Food"));
    assert!(text.contains("$200.00"));
    assert!(text.contains("$0.00"));
    assert!(text.contains(" 0%"));
    assert!(text.contains("Saved budget: Food 6/2024"));
}

#[test]
fn test_currency_prefix_follows_app_setting() {
    let api = seeded();
    let mut app = App::new("EUR".into());
    app.refresh_all(&api);
    let text = screen_text(&app);
    assert!(text.contains("€100.00"));
    assert!(!text.contains("$100.00"));
}

#[test]
fn test_form_modal_renders_fields_and_error() {
    let api = seeded();
    let mut app = App::new("USD".into());
    app.refresh_all(&api);
    app.open_edit_form();
    let text = screen_text(&app);
    assert!(text.contains("Edit Budget"));
    assert!(text.contains("Category"));
    assert!(text.contains("Amount"));
    assert!(text.contains("Travel"));

    if let Some(form) = app.form.as_mut() {
        form.amount.clear();
    }
    app.submit_form(&api);
    let text = screen_text(&app);
    assert!(text.contains("Amount must be a positive number"));
}

#[test]
fn test_confirm_prompt_in_command_bar() {
    let api = seeded();
    let mut app = App::new("USD".into());
    app.refresh_all(&api);
    app.request_delete();
    let text = screen_text(&app);
    assert!(text.contains("Delete budget for Travel 6/2024?"));
    assert!(text.contains("[y/N]"));
}

#[test]
fn test_help_overlay_lists_commands() {
    let mut app = App::new("USD".into());
    app.show_help = true;
    let text = screen_text(&app);
    assert!(text.contains("budgetview Help"));
    assert!(text.contains(":refresh"));
    assert!(text.contains(":currency"));
}

/// Thirty budgets, each 90% spent, so the alerts panel is full.
fn crowded() -> FakeBackend {
    let api = FakeBackend::with_categories(&[]);
    for i in 0..30 {
        let category = format!("Cat{i:02}");
        api.budgets.borrow_mut().push(Budget {
            id: BudgetId::new(format!("b{i}")),
            category: category.clone(),
            month: 6,
            year: 2024,
            amount: dec!(100),
        });
        api.transactions.borrow_mut().push(Transaction::new(
            category,
            dec!(90),
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
        ));
    }
    api
}

#[test]
fn test_page_size_leaves_room_for_alerts() {
    let mut app = App::new("USD".into());
    let frame = Rect::new(0, 0, 100, 30);
    app.refresh_all(&FakeBackend::with_categories(&[]));
    let bare = page_size(frame, &app);

    app.refresh_all(&crowded());
    let with_alerts = page_size(frame, &app);
    // six alert lines plus the panel border
    assert_eq!(bare - with_alerts, 8);
}

#[test]
fn test_scrolling_to_last_row_keeps_it_visible_with_alerts() {
    let api = crowded();
    let mut app = App::new("USD".into());
    app.refresh_all(&api);
    let page = page_size(Rect::new(0, 0, 100, 30), &app);
    let len = app.view.budgets.len();

    for _ in 0..29 {
        scroll_down(&mut app.budget_index, &mut app.budget_scroll, len, page);
    }
    assert_eq!(app.budget_index, 29);
    let text = screen_text(&app);
    assert!(text.contains("Cat29"), "{text}");
    assert_eq!(app.selected_budget().unwrap().category, "Cat29");

    app.budget_index = 0;
    app.budget_scroll = 0;
    scroll_to_bottom(&mut app.budget_index, &mut app.budget_scroll, len, page);
    assert!(screen_text(&app).contains("Cat29"));
}

#[test]
fn test_selection_stays_visible_with_stale_page_size() {
    let api = crowded();
    let mut app = App::new("USD".into());
    app.refresh_all(&api);
    let len = app.view.budgets.len();
    // taller than the table actually is
    let page = 25;
    for _ in 0..20 {
        scroll_down(&mut app.budget_index, &mut app.budget_scroll, len, page);
    }
    assert_eq!(app.budget_scroll, 0);
    assert!(screen_text(&app).contains("Cat20"));
}
