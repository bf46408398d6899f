use serde::{Deserialize, Serialize};

use super::charges::ChargeAssessment;
use super::config::LendingPolicy;
use super::equity::EquityBreakdown;
use super::income::IncomeAssessment;
use crate::dossier::domain::PropertyContext;

/// Terminal conditions that make a dossier infeasible regardless of ratios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "condition", rename_all = "snake_case")]
pub enum BlockingCondition {
    /// Unconditional block, reported as the sole reason when present.
    ActiveDebtCollection { person: usize },
    InsufficientTenure {
        person: usize,
        record: usize,
        minimum_months: u32,
    },
    /// Tenure facts are still unknown; unknown is never read as satisfied.
    TenureFactsUnknown { person: usize, record: usize },
}

impl BlockingCondition {
    pub fn summary(&self) -> String {
        match self {
            BlockingCondition::ActiveDebtCollection { person } => {
                format!("active debt-collection proceeding against person {person}")
            }
            BlockingCondition::InsufficientTenure {
                person,
                record,
                minimum_months,
            } => format!(
                "employment record {record} of person {person} is below the {minimum_months}-month tenure minimum"
            ),
            BlockingCondition::TenureFactsUnknown { person, record } => format!(
                "tenure facts for employment record {record} of person {person} are unknown"
            ),
        }
    }
}

/// The four pass criteria of a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    TotalEquity,
    HardEquity,
    Affordability,
    AppraisalTolerance,
}

/// Itemized result for one criterion. This is mandatory output; the
/// surrounding application renders it verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionReport {
    pub criterion: Criterion,
    pub passed: bool,
    pub actual: f64,
    pub required: f64,
    /// Numeric distance to the threshold; zero when the criterion passes.
    pub gap: f64,
    pub note: String,
}

/// The underlying ratios of a verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioSet {
    pub equity_total: f64,
    pub equity_hard: f64,
    pub affordability: f64,
    /// Purchase price over the bank estimate, absent when no estimate is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_to_estimate: Option<f64>,
}

pub(crate) fn decide(
    equity: &EquityBreakdown,
    income: &IncomeAssessment,
    charges: &ChargeAssessment,
    property: &PropertyContext,
    policy: &LendingPolicy,
) -> (RatioSet, Vec<CriterionReport>) {
    let price = property.purchase_price;

    let equity_total = if price > 0.0 {
        equity.total_eligible / price
    } else {
        0.0
    };
    let equity_hard = if price > 0.0 {
        equity.total_hard / price
    } else {
        0.0
    };
    // Zero income always fails affordability rather than dividing by zero.
    let affordability = if income.annual_income > 0.0 {
        charges.annual_charges / income.annual_income
    } else {
        1.0
    };
    // Reported as a ratio only when it is well-defined; the criterion below
    // applies whenever an estimate was declared, including a zero one.
    let price_to_estimate = property
        .bank_estimate
        .filter(|estimate| *estimate > 0.0)
        .map(|estimate| price / estimate);

    let mut criteria = Vec::with_capacity(4);

    criteria.push(minimum_criterion(
        Criterion::TotalEquity,
        "total equity ratio",
        equity_total,
        policy.min_total_equity(property.usage),
    ));
    criteria.push(minimum_criterion(
        Criterion::HardEquity,
        "hard equity ratio",
        equity_hard,
        policy.min_hard_equity(property.usage),
    ));
    criteria.push(maximum_criterion(
        Criterion::Affordability,
        "affordability ratio",
        affordability,
        policy.max_affordability_ratio,
    ));
    if let Some(estimate) = property.bank_estimate {
        criteria.push(appraisal_criterion(
            price,
            estimate,
            policy.appraisal_tolerance,
        ));
    }

    (
        RatioSet {
            equity_total,
            equity_hard,
            affordability,
            price_to_estimate,
        },
        criteria,
    )
}

fn minimum_criterion(
    criterion: Criterion,
    label: &str,
    actual: f64,
    required: f64,
) -> CriterionReport {
    let passed = actual >= required;
    let gap = (required - actual).max(0.0);
    let note = if passed {
        format!("{label} {actual:.4} meets minimum {required:.2}")
    } else {
        format!("{label} {actual:.4} below required {required:.2}")
    };
    CriterionReport {
        criterion,
        passed,
        actual,
        required,
        gap,
        note,
    }
}

/// The price is held against the tolerated estimate in francs directly, not
/// as the rounded-through ratio, so the exact boundary passes and a zero
/// estimate still rejects any positive price.
fn appraisal_criterion(price: f64, estimate: f64, tolerance: f64) -> CriterionReport {
    let limit = estimate * tolerance;
    let passed = price <= limit;
    let gap = (price - limit).max(0.0);
    let note = if passed {
        format!("purchase price {price:.0} within appraisal limit {limit:.0}")
    } else {
        format!("purchase price {price:.0} exceeds appraisal limit {limit:.0}")
    };
    CriterionReport {
        criterion: Criterion::AppraisalTolerance,
        passed,
        actual: price,
        required: limit,
        gap,
        note,
    }
}

fn maximum_criterion(
    criterion: Criterion,
    label: &str,
    actual: f64,
    required: f64,
) -> CriterionReport {
    let passed = actual <= required;
    let gap = (actual - required).max(0.0);
    let note = if passed {
        format!("{label} {actual:.4} within limit {required:.2}")
    } else {
        format!("{label} {actual:.4} exceeds limit {required:.2}")
    };
    CriterionReport {
        criterion,
        passed,
        actual,
        required,
        gap,
        note,
    }
}
