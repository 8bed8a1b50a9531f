mod alert;
mod budget;
mod category;
mod transaction;

pub use alert::{Alert, Severity};
pub use budget::{Budget, BudgetForm, BudgetId};
pub use category::Category;
pub use transaction::{Transaction, TransactionList};
