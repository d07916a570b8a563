//! Budget Health Evaluator: utilization against elapsed month, burn rate,
//! runway, top categories, off-pattern categories and the recommendation set.

use std::collections::BTreeMap;

use chrono::Datelike;

use crate::core::time::{days_in_month, elapsed_days, Clock};
use crate::currency::{round_amount, round_percent, MoneyFormat};
use crate::domain::{
    CategoryAnomaly, DaysRemaining, HealthReport, HealthStatus, Model, Recommendation,
    RecommendationKind, TopCategory,
};
use crate::ledger::Ledger;

use super::StatisticsService;

/// Utilization this far above month progress is a warning.
const WARNING_MARGIN: f64 = 15.0;
/// Utilization this far below month progress is excellent.
const EXCELLENT_MARGIN: f64 = 20.0;
/// Category totals further than this many dispersions from average are flagged.
const CATEGORY_DEVIATION_LIMIT: f64 = 2.0;
const TOP_CATEGORY_LIMIT: usize = 3;
/// Top-category share above which the allocation is called out.
const HEAVY_WEIGHT_PERCENT: f64 = 40.0;
/// Ledger size after which the depletion projection is worth mentioning.
const PROJECTION_MIN_RECORDS: usize = 10;
const PROJECTION_HORIZON_DAYS: i64 = 30;
/// Share of the budget suggested for reallocation when well under budget.
const REALLOCATION_SHARE: f64 = 0.1;

/// Numeric facts the recommendations are built from, at full precision.
struct HealthFacts {
    total_budget: f64,
    total_spent: f64,
    remaining: f64,
    utilization: f64,
    month_progress: f64,
    status: HealthStatus,
    burn_rate: f64,
    days_remaining: DaysRemaining,
    top_categories: Vec<TopCategory>,
    anomalies: Vec<CategoryAnomaly>,
    record_count: usize,
}

pub struct HealthService;

impl HealthService {
    /// Evaluates budget health using `$` formatting for the rendered text.
    ///
    /// Callers are expected to skip evaluation when no budget is set; a zero
    /// budget reports 0% utilization.
    pub fn evaluate(
        total_budget: f64,
        ledger: &Ledger,
        model: Option<&Model>,
        clock: &dyn Clock,
    ) -> HealthReport {
        Self::evaluate_with_format(total_budget, ledger, model, clock, &MoneyFormat::default())
    }

    pub fn evaluate_with_format(
        total_budget: f64,
        ledger: &Ledger,
        model: Option<&Model>,
        clock: &dyn Clock,
        money: &MoneyFormat,
    ) -> HealthReport {
        let now = clock.now();
        let today = clock.today();

        let total_spent = ledger.total_spent();
        let remaining = total_budget - total_spent;
        let utilization = if total_budget > 0.0 {
            total_spent / total_budget * 100.0
        } else {
            0.0
        };
        let month_progress = f64::from(today.day()) / f64::from(days_in_month(today)) * 100.0;
        let status = Self::classify(utilization, month_progress);

        let burn_rate = ledger
            .oldest_timestamp()
            .map(|oldest| total_spent / elapsed_days(oldest, now) as f64)
            .unwrap_or(0.0);
        let days_remaining = if burn_rate > 0.0 {
            DaysRemaining::Days((remaining / burn_rate).floor() as i64)
        } else {
            DaysRemaining::Unbounded
        };

        let totals = ledger.category_totals();
        let retrained;
        let model = match model {
            Some(model) if model.is_current_for(ledger) => Some(model),
            _ => {
                retrained = StatisticsService::train(ledger);
                retrained.as_ref()
            }
        };

        let facts = HealthFacts {
            total_budget,
            total_spent,
            remaining,
            utilization,
            month_progress,
            status,
            burn_rate,
            days_remaining,
            top_categories: Self::top_categories(&totals, total_spent),
            anomalies: model
                .map(|model| Self::anomalous_categories(&totals, model))
                .unwrap_or_default(),
            record_count: ledger.len(),
        };

        HealthReport {
            total_budget: round_amount(facts.total_budget),
            total_spent: round_amount(facts.total_spent),
            remaining_budget: round_amount(facts.remaining),
            utilization_percent: round_percent(facts.utilization),
            month_progress_percent: round_percent(facts.month_progress),
            status: facts.status,
            spending_ahead_of_schedule: facts.utilization > facts.month_progress,
            burn_rate: round_amount(facts.burn_rate),
            days_remaining: facts.days_remaining,
            headline: Self::headline(&facts, money),
            recommendations: Self::recommendations(&facts, money),
            top_categories: facts.top_categories,
            anomalous_categories: facts.anomalies,
        }
    }

    pub fn classify(utilization: f64, month_progress: f64) -> HealthStatus {
        if utilization > 100.0 {
            HealthStatus::Critical
        } else if utilization > month_progress + WARNING_MARGIN {
            HealthStatus::Warning
        } else if utilization < month_progress - EXCELLENT_MARGIN {
            HealthStatus::Excellent
        } else {
            HealthStatus::Good
        }
    }

    /// Largest categories by spend; ties resolve by label.
    fn top_categories(totals: &BTreeMap<String, f64>, total_spent: f64) -> Vec<TopCategory> {
        let mut ranked: Vec<(&String, f64)> =
            totals.iter().map(|(label, amount)| (label, *amount)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
            .into_iter()
            .take(TOP_CATEGORY_LIMIT)
            .map(|(label, amount)| TopCategory {
                category: label.clone(),
                amount: round_amount(amount),
                percent: if total_spent > 0.0 {
                    round_percent(amount / total_spent * 100.0)
                } else {
                    0.0
                },
            })
            .collect()
    }

    fn anomalous_categories(
        totals: &BTreeMap<String, f64>,
        model: &Model,
    ) -> Vec<CategoryAnomaly> {
        model
            .categories()
            .filter(|(_, stats)| stats.dispersion > 0.0)
            .filter_map(|(label, stats)| {
                let current = totals.get(label).copied().unwrap_or(0.0);
                let deviation = current - stats.average;
                if deviation.abs() <= CATEGORY_DEVIATION_LIMIT * stats.dispersion {
                    return None;
                }
                let deviation_percent = if stats.average > 0.0 {
                    (deviation / stats.average * 100.0).abs()
                } else {
                    0.0
                };
                Some(CategoryAnomaly {
                    category: label.to_string(),
                    is_high: current > stats.average,
                    deviation_percent: round_percent(deviation_percent),
                    amount: round_amount(current),
                })
            })
            .collect()
    }

    fn headline(facts: &HealthFacts, money: &MoneyFormat) -> String {
        let pace = format!(
            "{:.1}% used vs {:.1}% of time elapsed",
            facts.utilization, facts.month_progress
        );
        match facts.status {
            HealthStatus::Critical => format!(
                "CRITICAL: Budget exceeded by {}",
                money.format(facts.total_spent - facts.total_budget)
            ),
            HealthStatus::Warning => format!("WARNING: Spending ahead of schedule ({pace})"),
            HealthStatus::Excellent => format!("EXCELLENT: Spending well under budget ({pace})"),
            HealthStatus::Good => format!("GOOD: Spending on track ({pace})"),
        }
    }

    fn recommendations(facts: &HealthFacts, money: &MoneyFormat) -> Vec<Recommendation> {
        use RecommendationKind::{Action, Caution, Encouragement, Insight};

        let mut out = Vec::new();
        match facts.status {
            HealthStatus::Critical => {
                out.push(Recommendation::new(
                    Action,
                    "Immediate action needed: review and cut non-essential expenses.",
                ));
                out.push(Recommendation::new(
                    Action,
                    "Consider reallocating funds from lower-priority categories.",
                ));
                out.push(Recommendation::new(
                    Insight,
                    "Analyze whether this is a one-time overspend or a recurring pattern.",
                ));
                if let Some(top) = facts.top_categories.first() {
                    out.push(Recommendation::new(
                        Action,
                        format!(
                            "Focus on reducing expenses in your highest spending category: {} ({:.1}% of total).",
                            top.category, top.percent
                        ),
                    ));
                }
            }
            HealthStatus::Warning => {
                out.push(Recommendation::new(
                    Caution,
                    "Caution needed: your spending rate may lead to a budget overrun.",
                ));
                out.push(Recommendation::new(
                    Caution,
                    "Identify non-essential expenses that can be deferred.",
                ));
                out.push(Recommendation::new(
                    Caution,
                    format!(
                        "At your current burn rate of {}/day, consider adjusting to extend your budget.",
                        money.format(facts.burn_rate)
                    ),
                ));
                if let Some(high) = facts.anomalies.iter().find(|anomaly| anomaly.is_high) {
                    out.push(Recommendation::new(
                        Insight,
                        format!(
                            "Look into why {} is {:.1}% higher than usual.",
                            high.category, high.deviation_percent
                        ),
                    ));
                }
            }
            HealthStatus::Excellent => {
                out.push(Recommendation::new(
                    Encouragement,
                    "Great job: you're well under budget!",
                ));
                out.push(Recommendation::new(
                    Encouragement,
                    "Consider whether some under-utilized budget areas need attention.",
                ));
                out.push(Recommendation::new(
                    Insight,
                    format!(
                        "You could potentially reallocate {} to higher-priority needs.",
                        money.format(facts.total_budget * REALLOCATION_SHARE)
                    ),
                ));
                if let Some(low) = facts.anomalies.iter().find(|anomaly| !anomaly.is_high) {
                    out.push(Recommendation::new(
                        Insight,
                        format!(
                            "{} spending is unusually low. Consider if this area needs more investment.",
                            low.category
                        ),
                    ));
                }
            }
            HealthStatus::Good => {
                out.push(Recommendation::new(
                    Encouragement,
                    "Well done: your spending is on track with your budget timeline.",
                ));
                out.push(Recommendation::new(
                    Encouragement,
                    "Continue monitoring expenses to maintain this balance.",
                ));
                out.push(Recommendation::new(
                    Encouragement,
                    "Review upcoming expenses to ensure you stay on this positive trajectory.",
                ));
            }
        }

        if facts.top_categories.len() > 1 {
            let top = &facts.top_categories[0];
            if top.percent > HEAVY_WEIGHT_PERCENT {
                out.push(Recommendation::new(
                    Insight,
                    format!(
                        "Your budget is heavily weighted toward {} ({:.1}%). Consider if this allocation is optimal.",
                        top.category, top.percent
                    ),
                ));
            }
        }

        if let Some(days) = facts.days_remaining.days() {
            if facts.record_count > PROJECTION_MIN_RECORDS
                && days < PROJECTION_HORIZON_DAYS
                && facts.remaining > 0.0
            {
                out.push(Recommendation::new(
                    Insight,
                    format!(
                        "Budget projection: at current rates, funds will be depleted in {days} days."
                    ),
                ));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::FixedClock;
    use crate::ledger::Expense;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn june(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn classify_honours_margins() {
        assert_eq!(HealthService::classify(101.0, 50.0), HealthStatus::Critical);
        assert_eq!(HealthService::classify(66.0, 50.0), HealthStatus::Warning);
        assert_eq!(HealthService::classify(65.0, 50.0), HealthStatus::Good);
        assert_eq!(HealthService::classify(30.0, 50.0), HealthStatus::Good);
        assert_eq!(HealthService::classify(29.0, 50.0), HealthStatus::Excellent);
    }

    #[test]
    fn burn_rate_uses_days_since_oldest_expense() {
        let mut ledger = Ledger::new();
        ledger.add(Expense::new("rent", 600.0, "rent", june(1)));
        ledger.add(Expense::new("food", 300.0, "groceries", june(5)));
        let clock = FixedClock(june(10));

        let report = HealthService::evaluate(1000.0, &ledger, None, &clock);
        assert_eq!(report.burn_rate, 100.0);
        assert_eq!(report.days_remaining, DaysRemaining::Days(1));
        assert_eq!(report.remaining_budget, 100.0);
        assert!(report.spending_ahead_of_schedule);
    }

    #[test]
    fn empty_ledger_never_depletes() {
        let clock = FixedClock(june(15));
        let report = HealthService::evaluate(500.0, &Ledger::new(), None, &clock);
        assert_eq!(report.days_remaining, DaysRemaining::Unbounded);
        assert_eq!(report.burn_rate, 0.0);
        assert_eq!(report.utilization_percent, 0.0);
        assert!(report.top_categories.is_empty());
        assert!(report.anomalous_categories.is_empty());
    }

    #[test]
    fn zero_budget_reports_zero_utilization() {
        let ledger: Ledger = vec![Expense::new("food", 20.0, "snack", june(2))]
            .into_iter()
            .collect();
        let report = HealthService::evaluate(0.0, &ledger, None, &FixedClock(june(2)));
        assert_eq!(report.utilization_percent, 0.0);
    }

    #[test]
    fn top_categories_are_ranked_and_capped() {
        let ledger: Ledger = vec![
            Expense::new("food", 100.0, "a", june(1)),
            Expense::new("rent", 500.0, "b", june(1)),
            Expense::new("fuel", 250.0, "c", june(1)),
            Expense::new("fun", 150.0, "d", june(1)),
        ]
        .into_iter()
        .collect();
        let report = HealthService::evaluate(5000.0, &ledger, None, &FixedClock(june(2)));
        let names: Vec<_> = report
            .top_categories
            .iter()
            .map(|top| top.category.as_str())
            .collect();
        assert_eq!(names, vec!["rent", "fuel", "fun"]);
        assert_eq!(report.top_categories[0].percent, 50.0);
        assert!(report
            .recommendations
            .iter()
            .any(|rec| rec.message.contains("heavily weighted toward rent (50.0%)")));
    }

    #[test]
    fn categories_far_from_their_average_are_flagged() {
        let ledger: Ledger = vec![
            Expense::new("food", 10.0, "a", june(1)),
            Expense::new("food", 12.0, "b", june(2)),
            Expense::new("food", 11.0, "c", june(3)),
            Expense::new("gift", 40.0, "d", june(3)),
        ]
        .into_iter()
        .collect();
        let model = StatisticsService::train(&ledger);
        let report =
            HealthService::evaluate(1000.0, &ledger, model.as_ref(), &FixedClock(june(4)));

        assert_eq!(report.anomalous_categories.len(), 1);
        let food = &report.anomalous_categories[0];
        assert_eq!(food.category, "food");
        assert!(food.is_high);
        assert_eq!(food.amount, 33.0);
    }

    #[test]
    fn warning_mentions_burn_rate_and_high_category() {
        let start = june(1);
        let ledger: Ledger = (0..4)
            .map(|day| Expense::new("food", 100.0 + day as f64, "meal", start + Duration::days(day)))
            .collect();
        // 406 of 1000 spent by June 4th: 40.6% vs 13.3%
        let report = HealthService::evaluate(1000.0, &ledger, None, &FixedClock(june(4)));
        assert_eq!(report.status, HealthStatus::Warning);
        assert!(report.headline.starts_with("WARNING: Spending ahead of schedule"));
        assert!(report
            .recommendations
            .iter()
            .any(|rec| rec.message.contains("burn rate of $135.33/day")));
        assert!(report
            .recommendations
            .iter()
            .any(|rec| rec.message.starts_with("Look into why food is")));
    }

    #[test]
    fn depletion_projection_needs_enough_records() {
        let start = june(1);
        let ledger: Ledger = (0..11)
            .map(|index| Expense::new("food", 80.0, "meal", start + Duration::hours(index * 6)))
            .collect();
        // 880 spent over 3 days → ~293/day, 120 left
        let report = HealthService::evaluate(1000.0, &ledger, None, &FixedClock(june(4)));
        assert_eq!(report.days_remaining, DaysRemaining::Days(0));
        assert!(report
            .recommendations
            .iter()
            .any(|rec| rec.message.contains("depleted in 0 days")));
    }

    #[test]
    fn overspent_budget_reports_negative_runway() {
        let mut ledger = Ledger::new();
        ledger.add(Expense::new("rent", 600.0, "rent", june(1)));
        ledger.add(Expense::new("food", 600.0, "groceries", june(5)));
        // 1200 over 9 days, 200 past the budget
        let report = HealthService::evaluate(1000.0, &ledger, None, &FixedClock(june(10)));
        assert_eq!(report.remaining_budget, -200.0);
        assert_eq!(report.days_remaining, DaysRemaining::Days(-2));
        assert!(report.days_remaining.is_overspent());
        assert!(!report
            .recommendations
            .iter()
            .any(|rec| rec.message.contains("depleted in")));
    }

    #[test]
    fn model_from_same_sized_ledger_is_not_reused() {
        let at = |day| Expense::new("food", 10.0, "meal", june(day));
        let stale_ledger: Ledger = vec![at(1), at(2), at(3)].into_iter().collect();
        let stale = StatisticsService::train(&stale_ledger);

        let ledger: Ledger = vec![
            Expense::new("food", 100.0, "meal", june(1)),
            Expense::new("food", 100.0, "meal", june(2)),
            Expense::new("food", 100.0, "meal", june(3)),
        ]
        .into_iter()
        .collect();
        let clock = FixedClock(june(4));
        let report = HealthService::evaluate(1000.0, &ledger, stale.as_ref(), &clock);
        let fresh = HealthService::evaluate(1000.0, &ledger, None, &clock);
        assert_eq!(report, fresh);
    }
}
