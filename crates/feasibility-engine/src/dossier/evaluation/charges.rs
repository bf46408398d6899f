use serde::{Deserialize, Serialize};

use super::config::LendingPolicy;
use crate::dossier::domain::PersonProfile;

/// Theoretical annual cost of ownership plus existing debt service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeAssessment {
    pub loan_amount: f64,
    pub theoretical_interest: f64,
    pub maintenance: f64,
    pub amortization_annual: f64,
    pub liabilities_annual: f64,
    pub annual_charges: f64,
}

pub(crate) fn compute(
    property_price: f64,
    total_eligible_equity: f64,
    persons: &[PersonProfile],
    policy: &LendingPolicy,
) -> ChargeAssessment {
    let loan_amount = (property_price - total_eligible_equity).max(0.0);
    let theoretical_interest = loan_amount * policy.theoretical_interest_rate;
    let maintenance = property_price * policy.maintenance_rate;

    // Only the portion above the LTV threshold must be paid down linearly.
    let amortization_threshold = property_price * policy.amortization_ltv_threshold;
    let amortization_annual = if loan_amount > amortization_threshold {
        (loan_amount - amortization_threshold) / policy.amortization_years
    } else {
        0.0
    };

    let liabilities_annual = persons
        .iter()
        .map(|person| {
            (person.liabilities.monthly_loan_installments
                + person.liabilities.monthly_leasing_installments
                + person.liabilities.monthly_alimony_paid)
                * 12.0
        })
        .sum::<f64>();

    let annual_charges =
        theoretical_interest + maintenance + amortization_annual + liabilities_annual;

    ChargeAssessment {
        loan_amount,
        theoretical_interest,
        maintenance,
        amortization_annual,
        liabilities_annual,
        annual_charges,
    }
}
