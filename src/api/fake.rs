use std::cell::{Cell, RefCell};

use super::{ApiError, BudgetBackend, Snapshot};
use crate::models::{Budget, BudgetForm, BudgetId, Category, Transaction};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Request {
    FetchAll,
    Create(BudgetForm),
    Update(BudgetId, BudgetForm),
    Delete(BudgetId),
}

/// In-memory backend that records every request it receives.
#[derive(Default)]
pub(crate) struct FakeBackend {
    pub(crate) budgets: RefCell<Vec<Budget>>,
    pub(crate) categories: Vec<Category>,
    pub(crate) transactions: RefCell<Vec<Transaction>>,
    pub(crate) requests: RefCell<Vec<Request>>,
    pub(crate) fail_fetch: Cell<bool>,
    pub(crate) fail_mutations: Cell<bool>,
    next_id: Cell<u32>,
}

impl FakeBackend {
    pub(crate) fn with_categories(names: &[&str]) -> Self {
        Self {
            categories: names.iter().map(|n| Category::new(*n)).collect(),
            ..Self::default()
        }
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    pub(crate) fn deletes(&self) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| matches!(r, Request::Delete(_)))
            .count()
    }

    fn failure(method: &str, path: &str) -> ApiError {
        ApiError::Status {
            method: method.into(),
            url: format!("http://fake/{path}"),
            status: 503,
        }
    }

    fn budget_from(id: BudgetId, form: &BudgetForm) -> Budget {
        Budget {
            id,
            category: form.category.clone(),
            month: form.month,
            year: form.year,
            amount: form.amount,
        }
    }
}

impl BudgetBackend for FakeBackend {
    fn fetch_all(&self) -> Result<Snapshot, ApiError> {
        self.requests.borrow_mut().push(Request::FetchAll);
        if self.fail_fetch.get() {
            return Err(Self::failure("GET", "budgets"));
        }
        Ok(Snapshot {
            budgets: self.budgets.borrow().clone(),
            categories: self.categories.clone(),
            transactions: self.transactions.borrow().clone(),
        })
    }

    fn create_budget(&self, form: &BudgetForm) -> Result<Budget, ApiError> {
        self.requests.borrow_mut().push(Request::Create(form.clone()));
        if self.fail_mutations.get() {
            return Err(Self::failure("POST", "budgets"));
        }
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        let budget = Self::budget_from(BudgetId::new(format!("b{n}")), form);
        self.budgets.borrow_mut().push(budget.clone());
        Ok(budget)
    }

    fn update_budget(&self, id: &BudgetId, form: &BudgetForm) -> Result<Budget, ApiError> {
        self.requests
            .borrow_mut()
            .push(Request::Update(id.clone(), form.clone()));
        if self.fail_mutations.get() {
            return Err(Self::failure("PUT", "budgets"));
        }
        let budget = Self::budget_from(id.clone(), form);
        let mut budgets = self.budgets.borrow_mut();
        match budgets.iter_mut().find(|b| &b.id == id) {
            Some(slot) => *slot = budget.clone(),
            None => return Err(Self::failure("PUT", "budgets")),
        }
        Ok(budget)
    }

    fn delete_budget(&self, id: &BudgetId) -> Result<(), ApiError> {
        self.requests.borrow_mut().push(Request::Delete(id.clone()));
        if self.fail_mutations.get() {
            return Err(Self::failure("DELETE", "budgets"));
        }
        self.budgets.borrow_mut().retain(|b| &b.id != id);
        Ok(())
    }
}
