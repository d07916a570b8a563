#![doc(test(attr(deny(warnings))))]

//! Budget Insights learns per-category spending statistics from an expense
//! ledger and turns them into predictions, anomaly checks and a monthly
//! budget health report.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod utils;

pub use crate::core::{AddExpenseOutcome, BudgetSession};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budget Insights tracing initialized.");
    });
}
