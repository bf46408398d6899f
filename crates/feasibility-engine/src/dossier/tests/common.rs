use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::dossier::domain::{
    DossierId, DossierSnapshot, DossierSubmission, EmploymentDeclaration, EquityDeclaration,
    IncomeMode, LiabilitiesDeclaration, PersonDeclaration, PillarThreeKind, PropertyDeclaration,
    PropertyUsage, YearlyFigure,
};
use crate::dossier::evaluation::{FeasibilityEngine, LendingPolicy};
use crate::dossier::intake::DossierIntake;
use crate::dossier::repository::{
    DossierAlert, DossierRecord, DossierRepository, NotifyError, RepositoryError, VerdictNotifier,
};
use crate::dossier::router::dossier_router;
use crate::dossier::service::FeasibilityService;

pub(super) fn eval_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date")
}

pub(super) fn policy() -> LendingPolicy {
    LendingPolicy::default()
}

pub(super) fn engine() -> FeasibilityEngine {
    FeasibilityEngine::new(policy())
}

pub(super) fn primary_property(price: f64) -> PropertyDeclaration {
    PropertyDeclaration {
        purchase_price: Some(price),
        bank_estimate: Some(price * 1.05),
        usage: PropertyUsage::PrimaryResidence,
    }
}

pub(super) fn rental_property(price: f64) -> PropertyDeclaration {
    PropertyDeclaration {
        purchase_price: Some(price),
        bank_estimate: None,
        usage: PropertyUsage::RentalInvestment,
    }
}

pub(super) fn salaried_regular(monthly_base: f64) -> EmploymentDeclaration {
    EmploymentDeclaration::Salaried {
        income_mode: IncomeMode::Regular,
        monthly_base: Some(monthly_base),
        pay_frequency: Some(13),
        prior_year_salaries: Vec::new(),
        bonus_years: vec![
            YearlyFigure {
                year: 2023,
                amount: Some(5_000.0),
            },
            YearlyFigure {
                year: 2024,
                amount: Some(5_000.0),
            },
        ],
        tenure_start: Some(NaiveDate::from_ymd_opt(2019, 3, 1).expect("valid")),
        tenure_satisfied: Some(true),
    }
}

pub(super) fn self_employed(figures: Vec<YearlyFigure>, start: NaiveDate) -> EmploymentDeclaration {
    EmploymentDeclaration::SelfEmployed {
        net_income_years: figures,
        activity_start: Some(start),
        activity_satisfied: None,
    }
}

pub(super) fn liquid_assets(amount: f64) -> EquityDeclaration {
    EquityDeclaration::LiquidAssets {
        amount: Some(amount),
    }
}

pub(super) fn pillar3a(amount: f64) -> EquityDeclaration {
    EquityDeclaration::Pillar3 {
        amount: Some(amount),
        subtype: PillarThreeKind::Restricted3a,
    }
}

/// Baseline single-applicant primary-residence dossier that passes every
/// criterion: price 800k, 200k liquid equity, 13x10k salary plus dampened
/// bonus.
pub(super) fn submission() -> DossierSubmission {
    DossierSubmission {
        persons: vec![PersonDeclaration {
            employment_records: vec![salaried_regular(10_000.0)],
            liabilities: LiabilitiesDeclaration::default(),
        }],
        equity_contributions: vec![liquid_assets(200_000.0)],
        property: primary_property(800_000.0),
    }
}

pub(super) fn blocked_submission() -> DossierSubmission {
    let mut submission = submission();
    submission.persons[0].liabilities.active_debt_collection = Some(true);
    submission
}

pub(super) fn snapshot(submission: DossierSubmission) -> DossierSnapshot {
    DossierIntake
        .snapshot_from_submission(DossierId("dos-test".to_string()), submission)
        .expect("valid submission")
}

pub(super) fn build_service() -> (
    FeasibilityService<MemoryRepository, MemoryNotifier>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = FeasibilityService::new(repository.clone(), notifier.clone(), policy());
    (service, repository, notifier)
}

pub(super) fn router_with_service(
    service: FeasibilityService<MemoryRepository, MemoryNotifier>,
) -> axum::Router {
    dossier_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<DossierId, DossierRecord>>>,
}

impl DossierRepository for MemoryRepository {
    fn insert(&self, record: DossierRecord) -> Result<DossierRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.snapshot.dossier_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.snapshot.dossier_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: DossierRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.snapshot.dossier_id.clone(), record);
        Ok(())
    }

    fn update_guarded(
        &self,
        record: DossierRecord,
        expected_revision: u64,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.get(&record.snapshot.dossier_id) {
            Some(stored) if stored.revision == expected_revision => {
                guard.insert(record.snapshot.dossier_id.clone(), record);
                Ok(())
            }
            Some(_) => Err(RepositoryError::Conflict),
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &DossierId) -> Result<Option<DossierRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn awaiting_evaluation(&self, limit: usize) -> Result<Vec<DossierRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.verdict.is_none())
            .take(limit)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<DossierAlert>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<DossierAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

impl VerdictNotifier for MemoryNotifier {
    fn publish(&self, alert: DossierAlert) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("alert mutex poisoned")
            .push(alert);
        Ok(())
    }
}

pub(super) struct ConflictRepository;

impl DossierRepository for ConflictRepository {
    fn insert(&self, _record: DossierRecord) -> Result<DossierRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: DossierRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn update_guarded(
        &self,
        _record: DossierRecord,
        _expected_revision: u64,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &DossierId) -> Result<Option<DossierRecord>, RepositoryError> {
        Ok(None)
    }

    fn awaiting_evaluation(&self, _limit: usize) -> Result<Vec<DossierRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl DossierRepository for UnavailableRepository {
    fn insert(&self, _record: DossierRecord) -> Result<DossierRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: DossierRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_guarded(
        &self,
        _record: DossierRecord,
        _expected_revision: u64,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &DossierId) -> Result<Option<DossierRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn awaiting_evaluation(&self, _limit: usize) -> Result<Vec<DossierRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Repository around a [`MemoryRepository`] whose stored record is amended
/// right after every fetch, so a guarded write always finds the revision
/// moved. Models a form screen amending the dossier while an evaluation is
/// in flight.
pub(super) struct ShiftingRepository {
    pub(super) inner: MemoryRepository,
    amended: DossierRecord,
}

impl ShiftingRepository {
    pub(super) fn new(base: DossierRecord) -> Self {
        let inner = MemoryRepository::default();
        inner.insert(base.clone()).expect("seed record");
        let mut amended = base;
        amended.revision += 1;
        amended.verdict = None;
        Self { inner, amended }
    }
}

impl DossierRepository for ShiftingRepository {
    fn insert(&self, record: DossierRecord) -> Result<DossierRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn update(&self, record: DossierRecord) -> Result<(), RepositoryError> {
        self.inner.update(record)
    }

    fn update_guarded(
        &self,
        record: DossierRecord,
        expected_revision: u64,
    ) -> Result<(), RepositoryError> {
        self.inner.update_guarded(record, expected_revision)
    }

    fn fetch(&self, id: &DossierId) -> Result<Option<DossierRecord>, RepositoryError> {
        let record = self.inner.fetch(id)?;
        self.inner.update(self.amended.clone())?;
        Ok(record)
    }

    fn awaiting_evaluation(&self, limit: usize) -> Result<Vec<DossierRecord>, RepositoryError> {
        self.inner.awaiting_evaluation(limit)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
