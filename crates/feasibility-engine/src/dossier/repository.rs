use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{DossierId, DossierSnapshot, DossierStatus};
use super::evaluation::Verdict;

/// Repository record. The snapshot is the source of truth; the verdict is a
/// regenerable cache tagged with the revision it was computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DossierRecord {
    pub snapshot: DossierSnapshot,
    /// Bumped on every submit/amend; evaluation results computed against an
    /// older revision are discarded rather than merged.
    pub revision: u64,
    pub status: DossierStatus,
    pub verdict: Option<CachedVerdict>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedVerdict {
    pub verdict: Verdict,
    pub revision: u64,
}

impl DossierRecord {
    pub fn decision_rationale(&self) -> String {
        match &self.verdict {
            Some(cached) => cached.verdict.headline(),
            None => "pending evaluation".to_string(),
        }
    }

    pub fn status_view(&self) -> DossierStatusView {
        DossierStatusView {
            dossier_id: self.snapshot.dossier_id.clone(),
            status: self.status.label(),
            decision_rationale: self.decision_rationale(),
            feasible: self
                .verdict
                .as_ref()
                .map(|cached| cached.verdict.feasible),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait DossierRepository: Send + Sync {
    fn insert(&self, record: DossierRecord) -> Result<DossierRecord, RepositoryError>;
    /// Unconditional replace. Used by amendments, where the caller's facts
    /// supersede whatever is stored.
    fn update(&self, record: DossierRecord) -> Result<(), RepositoryError>;
    /// Replace the stored record only while it is still at
    /// `expected_revision`. Returns `Conflict` when the record moved, so an
    /// amendment landing mid-evaluation is never overwritten.
    fn update_guarded(
        &self,
        record: DossierRecord,
        expected_revision: u64,
    ) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &DossierId) -> Result<Option<DossierRecord>, RepositoryError>;
    /// Records with no cached verdict, up to `limit`. Backs batch
    /// re-evaluation after a lending policy change.
    fn awaiting_evaluation(&self, limit: usize) -> Result<Vec<DossierRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook notified when a dossier turns feasible (advisor follow-up,
/// e-mail adapters, and similar integrations).
pub trait VerdictNotifier: Send + Sync {
    fn publish(&self, alert: DossierAlert) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DossierAlert {
    pub template: String,
    pub dossier_id: DossierId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("alert transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of a dossier's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct DossierStatusView {
    pub dossier_id: DossierId,
    pub status: &'static str,
    pub decision_rationale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feasible: Option<bool>,
}
