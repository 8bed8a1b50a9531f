pub(crate) mod budgets;
