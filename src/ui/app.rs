use chrono::{Datelike, Local};
use tracing::{error, info};

use super::form::BudgetFormState;
use super::state::{MutationKind, Phase, ViewEvent, ViewState};
use crate::api::BudgetBackend;
use crate::models::{Budget, BudgetForm, BudgetId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Form,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Form => write!(f, "FORM"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PendingAction {
    DeleteBudget { id: BudgetId, label: String },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    /// ISO code used for every monetary value on screen.
    pub(crate) currency: String,

    pub(crate) view: ViewState,
    /// Set when a fetch has been started but not yet run, so one loading
    /// frame can be drawn first.
    pub(crate) refresh_pending: bool,

    // Budgets table
    pub(crate) budget_index: usize,
    pub(crate) budget_scroll: usize,

    // Modal form
    pub(crate) form: Option<BudgetFormState>,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(currency: String) -> Self {
        Self {
            running: true,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            currency,

            view: ViewState::default(),
            refresh_pending: false,

            budget_index: 0,
            budget_scroll: 0,

            form: None,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    // ── Fetch ────────────────────────────────────────────────

    /// Enter the loading state; the fetch itself runs in [`run_pending_refresh`].
    ///
    /// [`run_pending_refresh`]: App::run_pending_refresh
    pub(crate) fn schedule_refresh(&mut self) {
        self.view.apply(ViewEvent::FetchStarted);
        self.refresh_pending = true;
    }

    pub(crate) fn run_pending_refresh(&mut self, api: &dyn BudgetBackend) {
        if !self.refresh_pending {
            return;
        }
        self.refresh_pending = false;
        match api.fetch_all() {
            Ok(snapshot) => {
                self.view.apply(ViewEvent::FetchSucceeded(snapshot));
                self.clamp_selection();
            }
            Err(e) => {
                error!(error = %e, "failed to fetch budget data");
                self.view.apply(ViewEvent::FetchFailed);
            }
        }
    }

    pub(crate) fn refresh_all(&mut self, api: &dyn BudgetBackend) {
        self.schedule_refresh();
        self.run_pending_refresh(api);
    }

    fn clamp_selection(&mut self) {
        let len = self.view.budgets.len();
        if self.budget_index >= len {
            self.budget_index = len.saturating_sub(1);
        }
        if self.budget_scroll > self.budget_index {
            self.budget_scroll = self.budget_index;
        }
    }

    // ── Mutations ────────────────────────────────────────────

    /// POST when `id` is `None`, PUT otherwise. Success schedules a full
    /// refetch; failure is logged and shown in the banner. Returns whether
    /// the backend accepted the change.
    pub(crate) fn save_budget(
        &mut self,
        api: &dyn BudgetBackend,
        form: &BudgetForm,
        id: Option<&BudgetId>,
    ) -> bool {
        let result = match id {
            Some(id) => api.update_budget(id, form),
            None => api.create_budget(form),
        };
        match result {
            Ok(saved) => {
                info!(id = %saved.id, "budget saved");
                self.set_status(format!(
                    "Saved budget: {} {}",
                    saved.category,
                    saved.period()
                ));
                self.schedule_refresh();
                true
            }
            Err(e) => {
                error!(error = %e, "failed to save budget");
                self.view.apply(ViewEvent::MutationFailed(MutationKind::Save));
                false
            }
        }
    }

    pub(crate) fn delete_budget(&mut self, api: &dyn BudgetBackend, id: &BudgetId) -> bool {
        match api.delete_budget(id) {
            Ok(()) => {
                self.schedule_refresh();
                true
            }
            Err(e) => {
                error!(error = %e, %id, "failed to delete budget");
                self.view.apply(ViewEvent::MutationFailed(MutationKind::Delete));
                false
            }
        }
    }

    // ── Selection ────────────────────────────────────────────

    pub(crate) fn selected_budget(&self) -> Option<&Budget> {
        if self.view.phase != Phase::Ready {
            return None;
        }
        self.view.budgets.get(self.budget_index)
    }

    // ── Modal form ───────────────────────────────────────────

    pub(crate) fn open_new_form(&mut self) {
        if self.view.phase != Phase::Ready {
            self.set_status("Budgets are not loaded yet (press r to retry)");
            return;
        }
        let today = Local::now().date_naive();
        self.form = Some(BudgetFormState::blank(
            &self.view.categories,
            today.month(),
            today.year(),
        ));
        self.input_mode = InputMode::Form;
    }

    pub(crate) fn open_edit_form(&mut self) {
        match self.selected_budget().map(BudgetFormState::for_budget) {
            Some(form) => {
                self.form = Some(form);
                self.input_mode = InputMode::Form;
            }
            None => self.set_status("No budget selected"),
        }
    }

    pub(crate) fn close_form(&mut self) {
        self.form = None;
        self.input_mode = InputMode::Normal;
    }

    /// Validate locally; invalid input keeps the modal open and sends nothing.
    pub(crate) fn submit_form(&mut self, api: &dyn BudgetBackend) {
        let Some(state) = self.form.as_mut() else {
            return;
        };
        let form = match state.validate() {
            Ok(form) => form,
            Err(msg) => {
                state.error = Some(msg);
                return;
            }
        };
        let id = state.editing.clone();
        self.close_form();
        self.save_budget(api, &form, id.as_ref());
    }

    // ── Delete confirmation ──────────────────────────────────

    pub(crate) fn request_delete(&mut self) {
        let Some((id, label)) = self
            .selected_budget()
            .map(|b| (b.id.clone(), format!("{} {}", b.category, b.period())))
        else {
            self.set_status("No budget selected");
            return;
        };
        self.confirm_message = format!("Delete budget for {label}?");
        self.pending_action = Some(PendingAction::DeleteBudget { id, label });
        self.input_mode = InputMode::Confirm;
    }

    /// Answer the pending prompt. Declining sends nothing.
    pub(crate) fn resolve_confirm(&mut self, api: &dyn BudgetBackend, accepted: bool) {
        let action = self.pending_action.take();
        self.input_mode = InputMode::Normal;
        self.confirm_message.clear();

        match action {
            Some(PendingAction::DeleteBudget { id, label }) if accepted => {
                if self.delete_budget(api, &id) {
                    self.set_status(format!("Deleted budget: {label}"));
                }
            }
            Some(_) => self.set_status("Cancelled"),
            None => {}
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod app_tests;
