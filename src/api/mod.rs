mod error;
#[cfg(test)]
pub(crate) mod fake;
mod http;

pub(crate) use error::ApiError;
pub(crate) use http::HttpBackend;

use crate::models::{Budget, BudgetForm, BudgetId, Category, Transaction};

/// Result of one joint fetch of the three read resources.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Snapshot {
    pub(crate) budgets: Vec<Budget>,
    pub(crate) categories: Vec<Category>,
    pub(crate) transactions: Vec<Transaction>,
}

/// The finance backend as seen by the budgets view.
pub(crate) trait BudgetBackend {
    /// Fetch budgets, expense categories and transactions together. Any
    /// single failure fails the whole fetch.
    fn fetch_all(&self) -> Result<Snapshot, ApiError>;

    fn create_budget(&self, form: &BudgetForm) -> Result<Budget, ApiError>;

    fn update_budget(&self, id: &BudgetId, form: &BudgetForm) -> Result<Budget, ApiError>;

    fn delete_budget(&self, id: &BudgetId) -> Result<(), ApiError>;
}
