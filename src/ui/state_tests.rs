#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::*;
use crate::models::{BudgetId, Severity};

fn snapshot() -> Snapshot {
    Snapshot {
        budgets: vec![Budget {
            id: BudgetId::new("b1"),
            category: "Food".into(),
            month: 6,
            year: 2024,
            amount: dec!(100),
        }],
        categories: vec![Category::new("Food")],
        transactions: vec![Transaction::new(
            "Food".into(),
            dec!(90),
            NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
        )],
    }
}

#[test]
fn test_starts_idle() {
    let state = ViewState::default();
    assert_eq!(state.phase, Phase::Idle);
    assert!(!state.is_loading());
    assert!(state.error.is_none());
}

#[test]
fn test_fetch_cycle_to_ready() {
    let mut state = ViewState::default();
    state.apply(ViewEvent::FetchStarted);
    assert!(state.is_loading());

    state.apply(ViewEvent::FetchSucceeded(snapshot()));
    assert_eq!(state.phase, Phase::Ready);
    assert_eq!(state.budgets.len(), 1);
    assert_eq!(state.categories.len(), 1);
    assert_eq!(state.alerts.len(), 1);
    assert_eq!(state.alerts[0].severity, Severity::Warning);
}

#[test]
fn test_fetch_failure_keeps_previous_data() {
    let mut state = ViewState::default();
    state.apply(ViewEvent::FetchSucceeded(snapshot()));
    state.apply(ViewEvent::FetchStarted);
    state.apply(ViewEvent::FetchFailed);

    assert_eq!(state.phase, Phase::Failed);
    assert!(!state.is_loading());
    assert_eq!(state.error.as_deref(), Some(FETCH_FAILED_MESSAGE));
    assert_eq!(state.budgets.len(), 1);
    assert_eq!(state.transactions.len(), 1);
}

#[test]
fn test_success_clears_error() {
    let mut state = ViewState::default();
    state.apply(ViewEvent::FetchFailed);
    state.apply(ViewEvent::FetchStarted);
    assert!(state.error.is_some());
    state.apply(ViewEvent::FetchSucceeded(snapshot()));
    assert!(state.error.is_none());
}

#[test]
fn test_mutation_failure_messages() {
    let mut state = ViewState::default();
    state.apply(ViewEvent::MutationFailed(MutationKind::Save));
    assert_eq!(state.error.as_deref(), Some(SAVE_FAILED_MESSAGE));
    state.apply(ViewEvent::MutationFailed(MutationKind::Delete));
    assert_eq!(state.error.as_deref(), Some(DELETE_FAILED_MESSAGE));
    assert_eq!(state.phase, Phase::Failed);
}

#[test]
fn test_alerts_recomputed_when_data_changes() {
    let mut state = ViewState::default();
    state.apply(ViewEvent::FetchSucceeded(snapshot()));
    assert_eq!(state.alerts.len(), 1);

    let mut quieter = snapshot();
    quieter.transactions[0].cost = dec!(10);
    state.apply(ViewEvent::FetchSucceeded(quieter));
    assert!(state.alerts.is_empty());
}

#[test]
fn test_rows_follow_budget_order() {
    let mut state = ViewState::default();
    state.apply(ViewEvent::FetchSucceeded(snapshot()));
    let rows = state.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0.category, "Food");
    assert_eq!(rows[0].1.spent, dec!(90));
    assert_eq!(rows[0].1.remaining, dec!(10));
}
