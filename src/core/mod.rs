//! Statistics core: stateless services, the session that owns mutable state,
//! and the clock abstraction.

pub mod services;
pub mod session;
pub mod time;

pub use session::{AddExpenseOutcome, BudgetSession};
pub use time::{Clock, FixedClock, SystemClock};
