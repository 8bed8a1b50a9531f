//! Derived spend metrics and budget alerts.
//!
//! Everything here is pure and recomputed from the in-memory budget and
//! transaction lists on every fetch or render.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{Alert, Budget, Severity, Transaction};

/// Spend above this share of a budget raises a warning.
const WARNING_PERCENT: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

/// Sum of costs of transactions in the budget's category and calendar month.
pub(crate) fn spent(budget: &Budget, transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.category == budget.category && t.falls_in(budget.month, budget.year))
        .map(|t| t.cost)
        .sum()
}

pub(crate) fn remaining(budget: &Budget, spent: Decimal) -> Decimal {
    budget.amount - spent
}

/// `spent / amount * 100`, or `None` for a zero budget.
pub(crate) fn percent_used(budget: &Budget, spent: Decimal) -> Option<Decimal> {
    spent
        .checked_div(budget.amount)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
}

/// Percent clamped to `0..=100` for progress bars.
pub(crate) fn progress_percent(percent: Option<Decimal>) -> Decimal {
    percent
        .unwrap_or(Decimal::ZERO)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

/// Half-up rounding, so `85.25` shows as `85.3` rather than `85.2`.
pub(crate) fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

pub(crate) fn severity_for(percent: Option<Decimal>) -> Option<Severity> {
    match percent {
        Some(p) if p > Decimal::ONE_HUNDRED => Some(Severity::Error),
        Some(p) if p > WARNING_PERCENT => Some(Severity::Warning),
        _ => None,
    }
}

/// One display row of the budgets table.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BudgetRow {
    pub(crate) spent: Decimal,
    pub(crate) remaining: Decimal,
    pub(crate) percent: Option<Decimal>,
    pub(crate) progress: Decimal,
}

impl BudgetRow {
    pub(crate) fn compute(budget: &Budget, transactions: &[Transaction]) -> Self {
        let spent = spent(budget, transactions);
        let percent = percent_used(budget, spent);
        Self {
            spent,
            remaining: remaining(budget, spent),
            percent,
            progress: progress_percent(percent),
        }
    }

    pub(crate) fn severity(&self) -> Option<Severity> {
        severity_for(self.percent)
    }
}

pub(crate) fn alert_for(budget: &Budget, spent: Decimal) -> Option<Alert> {
    let percent = percent_used(budget, spent)?;
    match severity_for(Some(percent))? {
        Severity::Error => {
            let over = round_half_up(percent - Decimal::ONE_HUNDRED, 1);
            Some(Alert::error(format!(
                "You have exceeded your {} budget for {} by {over:.1}%",
                budget.category,
                budget.period()
            )))
        }
        Severity::Warning => {
            let used = round_half_up(percent, 1);
            Some(Alert::warning(format!(
                "You have used {used:.1}% of your {} budget for {}",
                budget.category,
                budget.period()
            )))
        }
    }
}

/// Alerts in budget list order. No deduplication.
pub(crate) fn generate_alerts(budgets: &[Budget], transactions: &[Transaction]) -> Vec<Alert> {
    budgets
        .iter()
        .filter_map(|b| alert_for(b, spent(b, transactions)))
        .collect()
}
