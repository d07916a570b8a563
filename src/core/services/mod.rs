pub mod anomaly_service;
pub mod category_service;
pub mod confidence_service;
pub mod expense_service;
pub mod health_service;
pub mod prediction_service;
pub mod statistics_service;

pub use anomaly_service::AnomalyService;
pub use category_service::CategoryService;
pub use confidence_service::ConfidenceService;
pub use expense_service::ExpenseService;
pub use health_service::HealthService;
pub use prediction_service::PredictionService;
pub use statistics_service::StatisticsService;

use uuid::Uuid;

use crate::errors::InsightsError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Rejections raised at the entry points before data reaches the statistics core.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Insights(#[from] InsightsError),
    #[error("Amount must be a positive number, got {0}")]
    InvalidAmount(f64),
    #[error("Budget must be a positive number, got {0}")]
    InvalidBudget(f64),
    #[error("Category name cannot be empty")]
    EmptyCategory,
    #[error("Category `{0}` already exists")]
    DuplicateCategory(String),
    #[error("Category `{0}` is not registered")]
    UnknownCategory(String),
    #[error("Expense description cannot be empty")]
    EmptyDescription,
    #[error("Expense not found: {0}")]
    ExpenseNotFound(Uuid),
}
