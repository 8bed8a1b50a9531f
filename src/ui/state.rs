use crate::api::Snapshot;
use crate::metrics::{self, BudgetRow};
use crate::models::{Alert, Budget, Category, Transaction};

pub(crate) const FETCH_FAILED_MESSAGE: &str =
    "Failed to fetch data. Please check your connection and try again.";
pub(crate) const SAVE_FAILED_MESSAGE: &str = "Failed to save budget. Please try again.";
pub(crate) const DELETE_FAILED_MESSAGE: &str = "Failed to delete budget. Please try again.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MutationKind {
    Save,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ViewEvent {
    FetchStarted,
    FetchSucceeded(Snapshot),
    FetchFailed,
    MutationFailed(MutationKind),
}

/// Everything the budgets view shows, driven only through [`ViewState::apply`].
#[derive(Debug, Clone, Default)]
pub(crate) struct ViewState {
    pub(crate) phase: Phase,
    pub(crate) budgets: Vec<Budget>,
    pub(crate) categories: Vec<Category>,
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) alerts: Vec<Alert>,
    pub(crate) error: Option<String>,
}

impl ViewState {
    pub(crate) fn apply(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::FetchStarted => {
                self.phase = Phase::Loading;
            }
            ViewEvent::FetchSucceeded(snapshot) => {
                self.budgets = snapshot.budgets;
                self.categories = snapshot.categories;
                self.transactions = snapshot.transactions;
                self.alerts = metrics::generate_alerts(&self.budgets, &self.transactions);
                self.error = None;
                self.phase = Phase::Ready;
            }
            ViewEvent::FetchFailed => {
                self.error = Some(FETCH_FAILED_MESSAGE.into());
                self.phase = Phase::Failed;
            }
            ViewEvent::MutationFailed(kind) => {
                let msg = match kind {
                    MutationKind::Save => SAVE_FAILED_MESSAGE,
                    MutationKind::Delete => DELETE_FAILED_MESSAGE,
                };
                self.error = Some(msg.into());
                self.phase = Phase::Failed;
            }
        }
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Recomputed on every call; the table asks once per frame.
    pub(crate) fn rows(&self) -> Vec<(&Budget, BudgetRow)> {
        self.budgets
            .iter()
            .map(|b| (b, BudgetRow::compute(b, &self.transactions)))
            .collect()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod state_tests;
