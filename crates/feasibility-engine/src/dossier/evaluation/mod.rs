mod config;
mod policy;

pub(crate) mod charges;
pub(crate) mod equity;
pub(crate) mod income;

pub use charges::ChargeAssessment;
pub use config::LendingPolicy;
pub use equity::{EquityBreakdown, EquityTag, IneligibilityReason};
pub use income::{IncomeAssessment, RecordIncome};
pub use policy::{BlockingCondition, Criterion, CriterionReport, RatioSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dossier::domain::{DossierId, DossierSnapshot};

/// Stateless evaluator applying the lending policy to a dossier snapshot.
///
/// A pure function of its inputs: given the same snapshot and evaluation
/// date it always produces the same verdict, so callers may recompute freely
/// and treat any stored verdict as a discardable cache.
pub struct FeasibilityEngine {
    policy: LendingPolicy,
}

impl FeasibilityEngine {
    pub fn new(policy: LendingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &LendingPolicy {
        &self.policy
    }

    /// Evaluate one consistent snapshot as of `on`.
    ///
    /// An active debt-collection proceeding short-circuits before any ratio
    /// is computed and is reported as the sole reason.
    pub fn evaluate(&self, snapshot: &DossierSnapshot, on: NaiveDate) -> Verdict {
        if let Some(person) = snapshot.active_debt_collection() {
            return Verdict {
                dossier_id: snapshot.dossier_id.clone(),
                feasible: false,
                blocking: Some(BlockingCondition::ActiveDebtCollection { person }),
                ratios: None,
                criteria: Vec::new(),
                equity: None,
            };
        }

        let equity = equity::classify(
            &snapshot.equity_contributions,
            snapshot.property.usage,
            &self.policy,
        );
        let income = income::aggregate(&snapshot.persons, on, &self.policy);
        let charges = charges::compute(
            snapshot.property.purchase_price,
            equity.total_eligible,
            &snapshot.persons,
            &self.policy,
        );
        let (ratios, criteria) =
            policy::decide(&equity, &income, &charges, &snapshot.property, &self.policy);

        let blocking = income.blocks.first().cloned();
        let feasible = blocking.is_none() && criteria.iter().all(|criterion| criterion.passed);

        Verdict {
            dossier_id: snapshot.dossier_id.clone(),
            feasible,
            blocking,
            ratios: Some(ratios),
            criteria,
            equity: Some(equity),
        }
    }
}

/// The engine's sole output, suitable for direct rendering and for storage
/// as a regenerable cached field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub dossier_id: DossierId,
    pub feasible: bool,
    /// Dominant terminal reason, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking: Option<BlockingCondition>,
    /// Absent only when a debt-collection proceeding short-circuited the
    /// evaluation before ratios were computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratios: Option<RatioSet>,
    pub criteria: Vec<CriterionReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equity: Option<EquityBreakdown>,
}

impl Verdict {
    /// One-line rationale for status views.
    pub fn headline(&self) -> String {
        if let Some(blocking) = &self.blocking {
            return blocking.summary();
        }
        if let Some(failed) = self.criteria.iter().find(|criterion| !criterion.passed) {
            return failed.note.clone();
        }
        "all criteria satisfied".to_string()
    }
}
