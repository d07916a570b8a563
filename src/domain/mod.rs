//! Derived value types: never stored, always recomputed from the ledger.

pub mod anomaly;
pub mod health;
pub mod model;
pub mod prediction;
pub mod summary;

pub use anomaly::{AnomalyVerdict, TypicalRange};
pub use health::{
    CategoryAnomaly, DaysRemaining, HealthReport, HealthStatus, Recommendation,
    RecommendationKind, TopCategory,
};
pub use model::{CategoryStats, Model, Trend, TrendDirection};
pub use prediction::{Prediction, PredictionOutlook, TREND_MIN_SAMPLES};
pub use summary::{CategoryShare, ExpenseQuery, ExpenseSummary, SortOrder};
