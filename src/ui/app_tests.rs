#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::*;
use crate::api::fake::{FakeBackend, Request};
use crate::models::Transaction;
use crate::ui::form::FormField;
use crate::ui::state::{DELETE_FAILED_MESSAGE, FETCH_FAILED_MESSAGE, SAVE_FAILED_MESSAGE};

fn seeded() -> FakeBackend {
    let api = FakeBackend::with_categories(&["Food", "Rent"]);
    api.budgets.borrow_mut().push(Budget {
        id: BudgetId::new("b1"),
        category: "Rent".into(),
        month: 6,
        year: 2024,
        amount: dec!(1000),
    });
    api.transactions.borrow_mut().push(Transaction::new(
        "Rent".into(),
        dec!(1000),
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
    ));
    api
}

fn ready_app(api: &FakeBackend) -> App {
    let mut app = App::new("USD".into());
    app.refresh_all(api);
    assert_eq!(app.view.phase, Phase::Ready);
    app
}

// ── Fetch ─────────────────────────────────────────────────────

#[test]
fn test_schedule_then_run_refresh() {
    let api = seeded();
    let mut app = App::new("USD".into());
    app.schedule_refresh();
    assert!(app.view.is_loading());
    assert!(api.requests().is_empty());

    app.run_pending_refresh(&api);
    assert_eq!(app.view.phase, Phase::Ready);
    assert_eq!(app.view.budgets.len(), 1);
    assert_eq!(app.view.alerts.len(), 1);

    // Nothing pending: no second request.
    app.run_pending_refresh(&api);
    assert_eq!(api.requests(), vec![Request::FetchAll]);
}

#[test]
fn test_fetch_failure_retains_data() {
    let api = seeded();
    let mut app = ready_app(&api);
    api.fail_fetch.set(true);
    app.refresh_all(&api);

    assert_eq!(app.view.phase, Phase::Failed);
    assert!(!app.view.is_loading());
    assert_eq!(app.view.error.as_deref(), Some(FETCH_FAILED_MESSAGE));
    assert_eq!(app.view.budgets.len(), 1);
    assert_eq!(app.view.transactions.len(), 1);
}

#[test]
fn test_selection_clamped_after_refetch() {
    let api = seeded();
    let mut app = ready_app(&api);
    app.budget_index = 5;
    app.refresh_all(&api);
    assert_eq!(app.budget_index, 0);
}

// ── Create / update ───────────────────────────────────────────

#[test]
fn test_create_via_form_then_refetch() {
    let api = FakeBackend::with_categories(&["Food"]);
    let mut app = ready_app(&api);

    app.open_new_form();
    assert_eq!(app.input_mode, InputMode::Form);
    {
        let form = app.form.as_mut().unwrap();
        assert_eq!(form.category, "Food");
        form.month = "6".into();
        form.year = "2024".into();
        form.focus = FormField::Amount;
        for c in "200".chars() {
            form.input(c);
        }
    }
    app.submit_form(&api);

    assert!(app.form.is_none());
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.refresh_pending);
    app.run_pending_refresh(&api);

    let expected = BudgetForm::new("Food".into(), 6, 2024, dec!(200));
    assert_eq!(
        api.requests(),
        vec![Request::FetchAll, Request::Create(expected), Request::FetchAll]
    );
    assert_eq!(app.view.budgets.len(), 1);
    assert!(app.status_message.contains("Saved budget"));
}

#[test]
fn test_invalid_form_sends_nothing() {
    let api = FakeBackend::with_categories(&["Food"]);
    let mut app = ready_app(&api);
    app.open_new_form();
    app.submit_form(&api);

    let form = app.form.as_ref().unwrap();
    assert_eq!(form.error.as_deref(), Some("Amount must be a positive number"));
    assert_eq!(app.input_mode, InputMode::Form);
    assert_eq!(api.requests(), vec![Request::FetchAll]);
}

#[test]
fn test_edit_form_puts_with_id() {
    let api = seeded();
    let mut app = ready_app(&api);
    app.open_edit_form();
    {
        let form = app.form.as_mut().unwrap();
        form.amount = "1200".into();
    }
    app.submit_form(&api);
    app.run_pending_refresh(&api);

    let expected = BudgetForm::new("Rent".into(), 6, 2024, dec!(1200));
    assert!(api
        .requests()
        .contains(&Request::Update(BudgetId::new("b1"), expected)));
    assert_eq!(app.view.budgets[0].amount, dec!(1200));
    // 1000 of 1200 spent: warning rather than none
    assert_eq!(app.view.alerts.len(), 1);
}

#[test]
fn test_save_failure_shows_banner_without_refetch() {
    let api = FakeBackend::with_categories(&["Food"]);
    let mut app = ready_app(&api);
    api.fail_mutations.set(true);

    let form = BudgetForm::new("Food".into(), 6, 2024, dec!(50));
    assert!(!app.save_budget(&api, &form, None));
    assert_eq!(app.view.phase, Phase::Failed);
    assert_eq!(app.view.error.as_deref(), Some(SAVE_FAILED_MESSAGE));
    assert!(!app.refresh_pending);
}

#[test]
fn test_edit_without_selection() {
    let api = FakeBackend::default();
    let mut app = ready_app(&api);
    app.open_edit_form();
    assert!(app.form.is_none());
    assert_eq!(app.status_message, "No budget selected");
}

// ── Delete ────────────────────────────────────────────────────

#[test]
fn test_delete_declined_sends_nothing() {
    let api = seeded();
    let mut app = ready_app(&api);
    app.request_delete();
    assert_eq!(app.input_mode, InputMode::Confirm);
    assert_eq!(app.confirm_message, "Delete budget for Rent 6/2024?");

    app.resolve_confirm(&api, false);
    assert_eq!(api.deletes(), 0);
    assert_eq!(app.view.budgets.len(), 1);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.status_message, "Cancelled");
}

#[test]
fn test_delete_confirmed_refetches() {
    let api = seeded();
    let mut app = ready_app(&api);
    app.request_delete();
    app.resolve_confirm(&api, true);
    app.run_pending_refresh(&api);

    assert_eq!(api.deletes(), 1);
    assert!(app.view.budgets.is_empty());
    assert!(app.view.alerts.is_empty());
    assert_eq!(app.status_message, "Deleted budget: Rent 6/2024");
}

#[test]
fn test_delete_failure_banner() {
    let api = seeded();
    let mut app = ready_app(&api);
    api.fail_mutations.set(true);
    app.request_delete();
    app.resolve_confirm(&api, true);

    assert_eq!(app.view.error.as_deref(), Some(DELETE_FAILED_MESSAGE));
    assert!(!app.refresh_pending);
}

#[test]
fn test_no_delete_prompt_while_failed() {
    let api = seeded();
    let mut app = ready_app(&api);
    api.fail_fetch.set(true);
    app.refresh_all(&api);
    app.request_delete();
    assert!(app.pending_action.is_none());
    assert_eq!(app.input_mode, InputMode::Normal);
}
