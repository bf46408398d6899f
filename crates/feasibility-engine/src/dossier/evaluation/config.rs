use serde::{Deserialize, Serialize};

use crate::dossier::domain::PropertyUsage;

/// Lending thresholds applied by the evaluation pipeline. Defaults follow
/// standard Swiss practice; the rates are regulatory fictions, not market
/// offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LendingPolicy {
    /// Flat theoretical interest rate on the financed amount.
    pub theoretical_interest_rate: f64,
    /// Yearly maintenance as a share of the purchase price.
    pub maintenance_rate: f64,
    /// Loan-to-value above which the excess must be amortized.
    pub amortization_ltv_threshold: f64,
    /// Linear paydown horizon for the excess loan portion, in years.
    pub amortization_years: f64,
    /// Maximum annual charges over annual income.
    pub max_affordability_ratio: f64,
    pub min_total_equity_primary: f64,
    pub min_hard_equity_primary: f64,
    pub min_total_equity_rental: f64,
    pub min_hard_equity_rental: f64,
    /// Pension-law floor for second-pillar withdrawals.
    pub pillar2_minimum_withdrawal: f64,
    /// Haircut applied to averaged bonus income.
    pub bonus_dampening: f64,
    /// Purchase price may exceed the bank estimate by at most this factor.
    pub appraisal_tolerance: f64,
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            theoretical_interest_rate: 0.05,
            maintenance_rate: 0.01,
            amortization_ltv_threshold: 2.0 / 3.0,
            amortization_years: 15.0,
            max_affordability_ratio: 0.33,
            min_total_equity_primary: 0.20,
            min_hard_equity_primary: 0.10,
            min_total_equity_rental: 0.25,
            min_hard_equity_rental: 0.25,
            pillar2_minimum_withdrawal: 20_000.0,
            bonus_dampening: 0.8,
            appraisal_tolerance: 1.1,
        }
    }
}

impl LendingPolicy {
    pub fn min_total_equity(&self, usage: PropertyUsage) -> f64 {
        match usage {
            PropertyUsage::PrimaryResidence => self.min_total_equity_primary,
            PropertyUsage::RentalInvestment => self.min_total_equity_rental,
        }
    }

    pub fn min_hard_equity(&self, usage: PropertyUsage) -> f64 {
        match usage {
            PropertyUsage::PrimaryResidence => self.min_hard_equity_primary,
            PropertyUsage::RentalInvestment => self.min_hard_equity_rental,
        }
    }
}
