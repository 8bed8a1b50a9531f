use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::{Budget, BudgetForm, BudgetId, Category};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormField {
    Category,
    Month,
    Year,
    Amount,
}

impl FormField {
    pub(crate) fn all() -> &'static [FormField] {
        &[Self::Category, Self::Month, Self::Year, Self::Amount]
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Month => "Month",
            Self::Year => "Year",
            Self::Amount => "Amount",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Category => Self::Month,
            Self::Month => Self::Year,
            Self::Year => Self::Amount,
            Self::Amount => Self::Category,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Category => Self::Amount,
            Self::Month => Self::Category,
            Self::Year => Self::Month,
            Self::Amount => Self::Year,
        }
    }
}

/// Modal create/edit form. Text buffers stay raw until [`validate`].
///
/// [`validate`]: BudgetFormState::validate
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BudgetFormState {
    /// `Some` when editing an existing budget.
    pub(crate) editing: Option<BudgetId>,
    pub(crate) category: String,
    pub(crate) month: String,
    pub(crate) year: String,
    pub(crate) amount: String,
    pub(crate) focus: FormField,
    pub(crate) error: Option<String>,
}

impl BudgetFormState {
    pub(crate) fn blank(categories: &[Category], month: u32, year: i32) -> Self {
        Self {
            editing: None,
            category: categories.first().map(|c| c.name.clone()).unwrap_or_default(),
            month: month.to_string(),
            year: year.to_string(),
            amount: String::new(),
            focus: FormField::Category,
            error: None,
        }
    }

    pub(crate) fn for_budget(budget: &Budget) -> Self {
        Self {
            editing: Some(budget.id.clone()),
            category: budget.category.clone(),
            month: budget.month.to_string(),
            year: budget.year.to_string(),
            amount: budget.amount.normalize().to_string(),
            focus: FormField::Amount,
            error: None,
        }
    }

    pub(crate) fn title(&self) -> &'static str {
        if self.editing.is_some() {
            " Edit Budget "
        } else {
            " New Budget "
        }
    }

    pub(crate) fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Category => &self.category,
            FormField::Month => &self.month,
            FormField::Year => &self.year,
            FormField::Amount => &self.amount,
        }
    }

    fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Category => &mut self.category,
            FormField::Month => &mut self.month,
            FormField::Year => &mut self.year,
            FormField::Amount => &mut self.amount,
        }
    }

    pub(crate) fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub(crate) fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Type a character into the focused field. Numeric fields only take
    /// digits (and one `.` for the amount).
    pub(crate) fn input(&mut self, c: char) {
        let accept = match self.focus {
            FormField::Category => !c.is_control(),
            FormField::Month | FormField::Year => c.is_ascii_digit(),
            FormField::Amount => c.is_ascii_digit() || (c == '.' && !self.amount.contains('.')),
        };
        if accept {
            self.value_mut(self.focus).push(c);
            self.error = None;
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.value_mut(self.focus).pop();
    }

    /// `+`/`-` or Left/Right: cycle categories, step month (wrapping) or year.
    pub(crate) fn adjust(&mut self, delta: i32, categories: &[Category]) {
        match self.focus {
            FormField::Category => {
                if categories.is_empty() {
                    return;
                }
                let len = categories.len() as i32;
                let next = match Category::position(categories, &self.category) {
                    Some(i) => (i as i32 + delta).rem_euclid(len),
                    None if delta < 0 => len - 1,
                    None => 0,
                };
                self.category = categories[next as usize].name.clone();
            }
            FormField::Month => {
                let current = self.month.parse::<i32>().unwrap_or(1);
                let next = (current - 1 + delta).rem_euclid(12) + 1;
                self.month = next.to_string();
            }
            FormField::Year => {
                if let Ok(current) = self.year.parse::<i32>() {
                    self.year = (current + delta).clamp(MIN_YEAR, MAX_YEAR).to_string();
                }
            }
            FormField::Amount => {}
        }
    }

    pub(crate) fn validate(&self) -> Result<BudgetForm, String> {
        parse_form(&self.category, &self.month, &self.year, &self.amount)
    }
}

pub(crate) const MIN_YEAR: i32 = 1900;
pub(crate) const MAX_YEAR: i32 = 9999;

/// Shared by the modal form and the `add`/`edit` CLI commands.
pub(crate) fn parse_form(
    category: &str,
    month: &str,
    year: &str,
    amount: &str,
) -> Result<BudgetForm, String> {
    let category = category.trim();
    if category.is_empty() {
        return Err("Category is required".into());
    }
    let month = month
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or("Month must be between 1 and 12")?;
    let year = year
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|y| (MIN_YEAR..=MAX_YEAR).contains(y))
        .ok_or(format!("Year must be between {MIN_YEAR} and {MAX_YEAR}"))?;
    let amount = Decimal::from_str(amount.trim())
        .ok()
        .filter(|a| *a > Decimal::ZERO)
        .ok_or("Amount must be a positive number")?;
    Ok(BudgetForm::new(category.to_string(), month, year, amount))
}

#[cfg(test)]
#[path = "form_tests.rs"]
mod form_tests;
