//! Mortgage dossier intake, evaluation, and lifecycle scaffolding.
//!
//! The evaluation pipeline is a pure function of one consistent snapshot:
//! classified equity, aggregated income, and theoretical charges feed the
//! threshold evaluator, which emits a structured verdict with itemized
//! justifications. Persistence, notification, and HTTP surfaces wrap the
//! engine without ever mutating its inputs.

pub mod domain;
pub mod evaluation;
pub(crate) mod intake;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    DossierId, DossierSnapshot, DossierStatus, DossierSubmission, EmploymentDeclaration,
    EmploymentRecord, EquityContribution, EquityDeclaration, IncomeMode, LiabilitiesDeclaration,
    LiabilitiesProfile, PayFrequency, PersonDeclaration, PersonProfile, PillarThreeKind,
    PropertyContext, PropertyDeclaration, PropertyUsage, RecordState, SalariedIncome, TenureGate,
    YearlyAmount, YearlyFigure,
};
pub use evaluation::{
    BlockingCondition, ChargeAssessment, Criterion, CriterionReport, EquityBreakdown, EquityTag,
    FeasibilityEngine, IncomeAssessment, IneligibilityReason, LendingPolicy, RatioSet,
    RecordIncome, Verdict,
};
pub use intake::IntakeViolation;
pub use repository::{
    CachedVerdict, DossierAlert, DossierRecord, DossierRepository, DossierStatusView, NotifyError,
    RepositoryError, VerdictNotifier,
};
pub use router::dossier_router;
pub use service::{FeasibilityService, ServiceError};
