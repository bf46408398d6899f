use serde::{Deserialize, Serialize};

use super::config::LendingPolicy;
use super::policy::BlockingCondition;
use crate::dossier::domain::{
    EmploymentRecord, PersonProfile, RecordState, SalariedIncome, TenureGate, YearlyAmount,
};
use chrono::NaiveDate;

/// Aggregated income picture across all persons of a dossier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeAssessment {
    pub annual_income: f64,
    /// Tenure blocks, in declaration order. Any entry makes the whole
    /// evaluation infeasible regardless of ratios.
    pub blocks: Vec<BlockingCondition>,
    pub records: Vec<RecordIncome>,
}

impl IncomeAssessment {
    pub fn blocking(&self) -> bool {
        !self.blocks.is_empty()
    }
}

/// Per-record derivation detail, kept for rendering and audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordIncome {
    pub person: usize,
    pub record: usize,
    pub kind: String,
    pub state: RecordState,
    pub annual_base: f64,
    pub annual_bonus: f64,
}

/// Normalize every employment record into an annual figure and fold in
/// annualized rental income. Records whose tenure gate is failed or unknown
/// derive no income and block the dossier.
pub(crate) fn aggregate(
    persons: &[PersonProfile],
    on: NaiveDate,
    policy: &LendingPolicy,
) -> IncomeAssessment {
    let mut annual_income = 0.0;
    let mut blocks = Vec::new();
    let mut records = Vec::new();

    for (person_index, person) in persons.iter().enumerate() {
        for (record_index, record) in person.employment_records.iter().enumerate() {
            let state = record.state(on);
            match record.tenure_gate(on) {
                TenureGate::Failed => blocks.push(BlockingCondition::InsufficientTenure {
                    person: person_index,
                    record: record_index,
                    minimum_months: record.minimum_tenure_months(),
                }),
                TenureGate::Unknown => blocks.push(BlockingCondition::TenureFactsUnknown {
                    person: person_index,
                    record: record_index,
                }),
                TenureGate::Satisfied => {}
            }

            let (annual_base, annual_bonus) = if state == RecordState::Complete {
                record_income(record, policy)
            } else {
                (0.0, 0.0)
            };

            annual_income += annual_base + annual_bonus;
            records.push(RecordIncome {
                person: person_index,
                record: record_index,
                kind: record.kind_label().to_string(),
                state,
                annual_base,
                annual_bonus,
            });
        }

        annual_income += person.liabilities.monthly_rental_income * 12.0;
    }

    IncomeAssessment {
        annual_income,
        blocks,
        records,
    }
}

fn record_income(record: &EmploymentRecord, policy: &LendingPolicy) -> (f64, f64) {
    match record {
        EmploymentRecord::Salaried {
            income,
            bonus_years,
            ..
        } => {
            let base = match income {
                SalariedIncome::Regular {
                    monthly_base,
                    pay_frequency,
                } => monthly_base * pay_frequency.multiplier(),
                SalariedIncome::Irregular { prior_year_salaries } => {
                    scoped_mean(prior_year_salaries, record.scope_start_year())
                }
            };
            let bonus = bonus_mean(bonus_years) * policy.bonus_dampening;
            (base, bonus)
        }
        EmploymentRecord::SelfEmployed {
            net_income_years, ..
        } => (
            scoped_mean(net_income_years, record.scope_start_year()),
            0.0,
        ),
    }
}

/// Mean over figures at or after the scope-start year. Fewer declared years
/// divide by the count actually present, never by a fixed three.
fn scoped_mean(figures: &[YearlyAmount], start_year: Option<i32>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for figure in figures {
        if start_year.map_or(true, |year| figure.year >= year) {
            sum += figure.amount;
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Averages only non-zero declared bonus years; a record with none
/// contributes zero bonus, not an error.
fn bonus_mean(figures: &[YearlyAmount]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for figure in figures {
        if figure.amount > 0.0 {
            sum += figure.amount;
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
