use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use super::domain::{DossierId, DossierStatus, DossierSubmission};
use super::evaluation::{FeasibilityEngine, LendingPolicy, Verdict};
use super::intake::{DossierIntake, IntakeViolation};
use super::repository::{
    CachedVerdict, DossierAlert, DossierRecord, DossierRepository, NotifyError, RepositoryError,
    VerdictNotifier,
};

/// Service composing the intake guard, repository, notifier, and engine.
pub struct FeasibilityService<R, N> {
    intake: DossierIntake,
    repository: Arc<R>,
    notifier: Arc<N>,
    engine: Arc<FeasibilityEngine>,
}

static DOSSIER_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_dossier_id() -> DossierId {
    let id = DOSSIER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DossierId(format!("dos-{id:06}"))
}

impl<R, N> FeasibilityService<R, N>
where
    R: DossierRepository + 'static,
    N: VerdictNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, policy: LendingPolicy) -> Self {
        Self {
            intake: DossierIntake,
            repository,
            notifier,
            engine: Arc::new(FeasibilityEngine::new(policy)),
        }
    }

    /// Submit a new dossier, returning the repository-backed record.
    pub fn submit(&self, submission: DossierSubmission) -> Result<DossierRecord, ServiceError> {
        let dossier_id = next_dossier_id();
        let snapshot = self
            .intake
            .snapshot_from_submission(dossier_id, submission)?;

        let record = DossierRecord {
            snapshot,
            revision: 1,
            status: DossierStatus::Submitted,
            verdict: None,
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Replace a dossier's facts. Bumps the revision and drops the cached
    /// verdict, so an in-flight evaluation of the old facts cannot land.
    pub fn amend(
        &self,
        dossier_id: &DossierId,
        submission: DossierSubmission,
    ) -> Result<DossierRecord, ServiceError> {
        let current = self
            .repository
            .fetch(dossier_id)?
            .ok_or(RepositoryError::NotFound)?;

        let snapshot = self
            .intake
            .snapshot_from_submission(dossier_id.clone(), submission)?;

        let record = DossierRecord {
            snapshot,
            revision: current.revision + 1,
            status: DossierStatus::Submitted,
            verdict: None,
        };

        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Recompute the verdict from the current snapshot as of `on`.
    ///
    /// Persistence goes through the repository's revision guard: if an
    /// amendment lands mid-computation the guard rejects the write, the
    /// amended facts win, and the stale verdict is returned without being
    /// cached (last-write-wins).
    pub fn evaluate(&self, dossier_id: &DossierId, on: NaiveDate) -> Result<Verdict, ServiceError> {
        let record = self
            .repository
            .fetch(dossier_id)?
            .ok_or(RepositoryError::NotFound)?;
        let read_revision = record.revision;

        let verdict = self.engine.evaluate(&record.snapshot, on);

        let newly_feasible = verdict.feasible
            && record
                .verdict
                .as_ref()
                .map_or(true, |cached| !cached.verdict.feasible);

        let mut current = record;
        current.status = if verdict.blocking.is_some() {
            DossierStatus::Blocked
        } else if verdict.feasible {
            DossierStatus::Feasible
        } else {
            DossierStatus::Infeasible
        };
        current.verdict = Some(CachedVerdict {
            verdict: verdict.clone(),
            revision: read_revision,
        });

        match self.repository.update_guarded(current, read_revision) {
            Ok(()) => {}
            Err(RepositoryError::Conflict) => {
                info!(dossier = %dossier_id.0, "snapshot moved during evaluation, verdict not cached");
                return Ok(verdict);
            }
            Err(other) => return Err(other.into()),
        }

        if newly_feasible {
            let mut details = BTreeMap::new();
            details.insert("decision".to_string(), "feasible".to_string());
            self.notifier.publish(DossierAlert {
                template: "dossier_feasible".to_string(),
                dossier_id: verdict.dossier_id.clone(),
                details,
            })?;
        }

        Ok(verdict)
    }

    /// Evaluate every dossier still awaiting a verdict, up to `limit`. Runs
    /// after a lending policy rollout or a notifier outage so cached verdicts
    /// catch up without advisors re-triggering each dossier by hand.
    pub fn evaluate_pending(
        &self,
        on: NaiveDate,
        limit: usize,
    ) -> Result<Vec<Verdict>, ServiceError> {
        let pending = self.repository.awaiting_evaluation(limit)?;
        let mut verdicts = Vec::with_capacity(pending.len());
        for record in pending {
            verdicts.push(self.evaluate(&record.snapshot.dossier_id, on)?);
        }
        Ok(verdicts)
    }

    /// Evaluate a raw submission without persisting anything. Backs the
    /// quick-simulator screen.
    pub fn simulate(
        &self,
        submission: DossierSubmission,
        on: NaiveDate,
    ) -> Result<Verdict, ServiceError> {
        let snapshot = self
            .intake
            .snapshot_from_submission(DossierId("simulation".to_string()), submission)?;
        Ok(self.engine.evaluate(&snapshot, on))
    }

    /// Fetch a dossier and current status for API responses.
    pub fn get(&self, dossier_id: &DossierId) -> Result<DossierRecord, ServiceError> {
        let record = self
            .repository
            .fetch(dossier_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

/// Error raised by the feasibility service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}
