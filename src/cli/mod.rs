//! Non-interactive report binary: loads an exported snapshot and prints the
//! health report, predictions, anomaly checks or expense summaries.

pub mod output;

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{Config, ConfigManager};
use crate::core::services::ServiceError;
use crate::core::BudgetSession;
use crate::currency::MoneyFormat;
use crate::domain::{
    DaysRemaining, ExpenseQuery, HealthReport, HealthStatus, Prediction, PredictionOutlook,
    RecommendationKind, SortOrder,
};
use crate::errors::InsightsError;
use crate::utils::build_info;

use output::MessageKind;

const USAGE: &str = "usage: budget_insights_cli <report [SNAPSHOT] | predict SNAPSHOT CATEGORY | \
check SNAPSHOT CATEGORY AMOUNT | summary SNAPSHOT [CATEGORY|all] [SORT] | version>";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}\n{usage}", usage = USAGE)]
    Usage(String),
    #[error("no snapshot given and none remembered from a previous report")]
    MissingSnapshot,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Insights(#[from] InsightsError),
}

pub type CliResult<T> = Result<T, CliError>;

/// Entry point used by the `budget_insights_cli` binary.
pub fn run_cli() -> CliResult<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    run(&args)
}

pub fn run(args: &[String]) -> CliResult<()> {
    let Some((command, rest)) = args.split_first() else {
        return Err(CliError::Usage("missing command".into()));
    };
    match command.as_str() {
        "report" => report(rest),
        "predict" => predict(rest),
        "check" => check(rest),
        "summary" => summary(rest),
        "version" => {
            println!("{}", build_info::current().summary());
            Ok(())
        }
        other => Err(CliError::Usage(format!("unknown command `{other}`"))),
    }
}

struct Context {
    manager: ConfigManager,
    config: Config,
}

impl Context {
    fn load() -> CliResult<Self> {
        let manager = ConfigManager::new()?;
        let config = manager.load()?;
        Ok(Self { manager, config })
    }

    fn money(&self) -> MoneyFormat {
        self.config.money_format()
    }

    fn open(&self, path: &Path) -> CliResult<BudgetSession> {
        let mut session = BudgetSession::default().with_money_format(self.money());
        session.load_snapshot(path)?;
        Ok(session)
    }
}

fn snapshot_arg(rest: &[String]) -> CliResult<PathBuf> {
    rest.first()
        .map(PathBuf::from)
        .ok_or_else(|| CliError::Usage("missing SNAPSHOT".into()))
}

fn report(rest: &[String]) -> CliResult<()> {
    let mut ctx = Context::load()?;
    let path = match rest.first() {
        Some(path) => PathBuf::from(path),
        None => ctx
            .config
            .last_snapshot
            .clone()
            .ok_or(CliError::MissingSnapshot)?,
    };
    let session = ctx.open(&path)?;

    if ctx.config.last_snapshot.as_ref() != Some(&path) {
        ctx.config.last_snapshot = Some(path.clone());
        ctx.manager.save(&ctx.config)?;
    }

    let money = ctx.money();
    match session.evaluate_health() {
        Some(report) => print_health(&report, &money),
        None => output::warning("No budget set in this snapshot; health report unavailable."),
    }
    print_model_insights(&session, &money);
    Ok(())
}

fn print_health(report: &HealthReport, money: &MoneyFormat) {
    output::section("Budget Health");
    output::field("Status", report.status);
    output::field("Budget", money.format(report.total_budget));
    output::field("Spent", money.format(report.total_spent));
    output::field("Remaining", money.format(report.remaining_budget));
    output::field(
        "Utilization",
        format!(
            "{:.1}% ({:.1}% of month elapsed)",
            report.utilization_percent, report.month_progress_percent
        ),
    );
    output::field("Burn rate", format!("{}/day", money.format(report.burn_rate)));
    output::field(
        "Days remaining",
        match report.days_remaining {
            DaysRemaining::Days(days) if days < 0 => format!("{days} (over budget)"),
            DaysRemaining::Days(days) => days.to_string(),
            DaysRemaining::Unbounded => "unbounded".to_string(),
        },
    );

    let tone = match report.status {
        HealthStatus::Critical => MessageKind::Error,
        HealthStatus::Warning => MessageKind::Warning,
        HealthStatus::Good | HealthStatus::Excellent => MessageKind::Success,
    };
    println!();
    output::headline(tone, &report.headline);

    if !report.top_categories.is_empty() {
        output::section("Top Categories");
        for top in &report.top_categories {
            output::detail(format!(
                "{}: {} ({:.1}%)",
                top.category,
                money.format(top.amount),
                top.percent
            ));
        }
    }

    if !report.anomalous_categories.is_empty() {
        output::section("Unusual Categories");
        for anomaly in &report.anomalous_categories {
            let direction = if anomaly.is_high { "above" } else { "below" };
            output::detail(format!(
                "{}: {} is {:.0}% {direction} typical",
                anomaly.category,
                money.format(anomaly.amount),
                anomaly.deviation_percent
            ));
        }
    }

    if !report.recommendations.is_empty() {
        output::section("Recommendations");
        for recommendation in &report.recommendations {
            let marker = match recommendation.kind {
                RecommendationKind::Action => "!",
                RecommendationKind::Caution => "~",
                RecommendationKind::Encouragement => "+",
                RecommendationKind::Insight => "*",
            };
            output::detail(format!("[{marker}] {}", recommendation.message));
        }
    }
}

fn print_model_insights(session: &BudgetSession, money: &MoneyFormat) {
    let Some(model) = session.model() else {
        output::info("No expenses recorded yet.");
        return;
    };
    output::section("Spending Patterns");
    for (category, stats) in model.categories() {
        let trend = stats.effective_trend();
        output::detail(format!(
            "{category}: {} ± {} over {} records, {} {:.1}%",
            money.format(stats.average),
            money.format(stats.dispersion),
            stats.sample_count,
            trend.direction,
            trend.magnitude_percent.abs()
        ));
    }
}

fn predict(rest: &[String]) -> CliResult<()> {
    let ctx = Context::load()?;
    let path = snapshot_arg(rest)?;
    let category = rest
        .get(1)
        .ok_or_else(|| CliError::Usage("missing CATEGORY".into()))?;
    let session = ctx.open(&path)?;

    match session.predict(category) {
        Some(prediction) if prediction.sample_count > 0 => {
            print_prediction(&prediction, &ctx.money())
        }
        _ => output::warning(format!("No history for `{}` yet.", category.trim())),
    }
    Ok(())
}

fn print_prediction(prediction: &Prediction, money: &MoneyFormat) {
    output::section(format!("Prediction: {}", prediction.category));
    output::field("Expected", money.format(prediction.expected_amount));
    output::field(
        "Suggested range",
        format!(
            "{} - {}",
            money.format(prediction.suggested_min),
            money.format(prediction.suggested_max)
        ),
    );
    let outlook = match prediction.outlook() {
        PredictionOutlook::Limited => "limited",
        PredictionOutlook::Moderate => "moderate",
        PredictionOutlook::Strong => "strong",
    };
    output::field(
        "Confidence",
        format!("{:.0}% ({outlook})", prediction.confidence_percent),
    );
    if prediction.trend_analysis_available() {
        output::field(
            "Trend",
            format!(
                "{} {:.1}%",
                prediction.trend_direction, prediction.trend_percent
            ),
        );
    } else {
        output::field("Trend", "needs at least 3 records");
    }
    output::field("Records", prediction.sample_count);
}

fn check(rest: &[String]) -> CliResult<()> {
    let ctx = Context::load()?;
    let path = snapshot_arg(rest)?;
    let (Some(category), Some(raw_amount)) = (rest.get(1), rest.get(2)) else {
        return Err(CliError::Usage("missing CATEGORY or AMOUNT".into()));
    };
    let amount: f64 = raw_amount
        .trim()
        .parse()
        .map_err(|_| CliError::InvalidArgument(format!("`{raw_amount}` is not a number")))?;
    let session = ctx.open(&path)?;
    let money = ctx.money();

    let verdict = session.check_anomaly(amount, category)?;
    if verdict.is_anomalous {
        let direction = if verdict.is_higher { "higher" } else { "lower" };
        output::warning(format!(
            "{} is unusually {direction} for {}",
            money.format(amount),
            category.trim()
        ));
    } else {
        output::success(format!(
            "{} looks typical for {}",
            money.format(amount),
            category.trim()
        ));
    }
    if let Some(range) = verdict.typical_range {
        output::field(
            "Typical range",
            format!(
                "{} - {} (avg {})",
                money.format(range.min),
                money.format(range.max),
                money.format(range.avg)
            ),
        );
    }
    Ok(())
}

fn summary(rest: &[String]) -> CliResult<()> {
    let ctx = Context::load()?;
    let path = snapshot_arg(rest)?;
    let sort = match rest.get(2) {
        Some(raw) => raw.parse::<SortOrder>().map_err(CliError::InvalidArgument)?,
        None => SortOrder::default(),
    };
    let query = match rest.get(1).map(|raw| raw.trim()) {
        None | Some("all") => ExpenseQuery::all(sort),
        Some(category) => ExpenseQuery::in_category(category.to_lowercase(), sort),
    };
    let session = ctx.open(&path)?;
    let money = ctx.money();

    let summary = session.summarize(&query);
    output::section("Expenses");
    for expense in session.query(&query) {
        output::detail(format!(
            "{}  {:<14} {:>12}  {}",
            expense.timestamp.format("%Y-%m-%d"),
            expense.category,
            money.format(expense.amount),
            expense.description
        ));
    }

    output::section("Summary");
    output::field(
        "Expenses",
        format!("{} of {}", summary.expense_count, summary.total_count),
    );
    output::field("Amount", money.format(summary.filtered_amount));
    if let Some(share) = summary.share_of_total_percent {
        output::field("Share of total", format!("{share:.1}%"));
    }
    for share in &summary.breakdown {
        output::detail(format!(
            "{}: {} ({:.1}%)",
            share.category,
            money.format(share.amount),
            share.percent_of_total
        ));
    }
    Ok(())
}
