//! Session-resident expense records and the category registry.

pub mod category;
pub mod expense;
#[allow(clippy::module_inception)]
pub mod ledger;

pub use category::CategorySet;
pub use expense::{Expense, ExpenseDraft};
pub use ledger::Ledger;
