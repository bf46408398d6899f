use serde::{Deserialize, Serialize};

use super::config::LendingPolicy;
use crate::dossier::domain::{EquityContribution, PillarThreeKind, PropertyUsage};

/// Classified funding picture: per-contribution tags plus the eligible and
/// hard totals the downstream ratios consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityBreakdown {
    pub tags: Vec<EquityTag>,
    pub total_eligible: f64,
    pub total_hard: f64,
}

/// Eligibility tag for one declared contribution. Ineligible contributions
/// count zero toward both totals but stay reported so the caller can render
/// actionable feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityTag {
    pub source: String,
    pub declared_amount: f64,
    pub eligible: bool,
    pub hard: bool,
    pub counted_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ineligibility: Option<IneligibilityReason>,
}

/// The specific unmet precondition for an ineligible contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum IneligibilityReason {
    NotAdmissibleForRental { source: String },
    BelowMinimumWithdrawal { minimum: f64 },
    InsufficientAvailableFunds { minimum: f64 },
    PledgedFunds,
}

impl IneligibilityReason {
    pub fn summary(&self) -> String {
        match self {
            IneligibilityReason::NotAdmissibleForRental { source } => {
                format!("{source} not admissible for rental_investment")
            }
            IneligibilityReason::BelowMinimumWithdrawal { minimum } => {
                format!("withdrawal below pension-law minimum of {minimum:.0}")
            }
            IneligibilityReason::InsufficientAvailableFunds { minimum } => {
                format!("available advance-withdrawal funds below {minimum:.0}")
            }
            IneligibilityReason::PledgedFunds => {
                "pledged second-pillar funds cannot be withdrawn".to_string()
            }
        }
    }
}

/// Classify every declared contribution independently of order.
pub(crate) fn classify(
    contributions: &[EquityContribution],
    usage: PropertyUsage,
    policy: &LendingPolicy,
) -> EquityBreakdown {
    let mut tags = Vec::with_capacity(contributions.len());
    let mut total_eligible = 0.0;
    let mut total_hard = 0.0;

    for contribution in contributions {
        let tag = classify_one(contribution, usage, policy);
        if tag.eligible {
            total_eligible += tag.counted_amount;
            if tag.hard {
                total_hard += tag.counted_amount;
            }
        }
        tags.push(tag);
    }

    EquityBreakdown {
        tags,
        total_eligible,
        total_hard,
    }
}

fn classify_one(
    contribution: &EquityContribution,
    usage: PropertyUsage,
    policy: &LendingPolicy,
) -> EquityTag {
    let source = contribution.source_label();
    let amount = contribution.amount();

    let (hard, ineligibility) = match contribution {
        EquityContribution::LiquidAssets { .. }
        | EquityContribution::Donation { .. }
        | EquityContribution::InheritanceAdvance { .. } => (true, None),

        EquityContribution::Pillar2Withdrawal {
            amount,
            available_for_withdrawal,
            pledged,
        } => (false, pillar2_withdrawal_check(*amount, *available_for_withdrawal, *pledged, usage, policy, source)),

        EquityContribution::Pillar2VestedBenefits { amount } => {
            (false, pillar2_vested_check(*amount, usage, policy, source))
        }

        EquityContribution::Pillar3 { subtype, .. } => match subtype {
            // Restricted pension savings follow the same residence rule as
            // second-pillar money and stay soft.
            PillarThreeKind::Restricted3a => match usage {
                PropertyUsage::PrimaryResidence => (false, None),
                PropertyUsage::RentalInvestment => (
                    false,
                    Some(IneligibilityReason::NotAdmissibleForRental {
                        source: source.to_string(),
                    }),
                ),
            },
            PillarThreeKind::Flexible3b => (true, None),
        },
    };

    let eligible = ineligibility.is_none();
    EquityTag {
        source: source.to_string(),
        declared_amount: amount,
        eligible,
        hard: eligible && hard,
        counted_amount: if eligible { amount } else { 0.0 },
        ineligibility,
    }
}

fn pillar2_withdrawal_check(
    amount: f64,
    available_for_withdrawal: f64,
    pledged: bool,
    usage: PropertyUsage,
    policy: &LendingPolicy,
    source: &'static str,
) -> Option<IneligibilityReason> {
    if usage == PropertyUsage::RentalInvestment {
        return Some(IneligibilityReason::NotAdmissibleForRental {
            source: source.to_string(),
        });
    }
    if pledged {
        return Some(IneligibilityReason::PledgedFunds);
    }
    if amount < policy.pillar2_minimum_withdrawal {
        return Some(IneligibilityReason::BelowMinimumWithdrawal {
            minimum: policy.pillar2_minimum_withdrawal,
        });
    }
    if available_for_withdrawal < policy.pillar2_minimum_withdrawal {
        return Some(IneligibilityReason::InsufficientAvailableFunds {
            minimum: policy.pillar2_minimum_withdrawal,
        });
    }
    None
}

fn pillar2_vested_check(
    amount: f64,
    usage: PropertyUsage,
    policy: &LendingPolicy,
    source: &'static str,
) -> Option<IneligibilityReason> {
    if usage == PropertyUsage::RentalInvestment {
        return Some(IneligibilityReason::NotAdmissibleForRental {
            source: source.to_string(),
        });
    }
    if amount < policy.pillar2_minimum_withdrawal {
        return Some(IneligibilityReason::BelowMinimumWithdrawal {
            minimum: policy.pillar2_minimum_withdrawal,
        });
    }
    None
}
