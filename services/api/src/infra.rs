use chrono::NaiveDate;
use feasibility_engine::dossier::{
    DossierAlert, DossierId, DossierRecord, DossierRepository, LendingPolicy, NotifyError,
    RepositoryError, VerdictNotifier,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryDossierRepository {
    records: Arc<Mutex<HashMap<DossierId, DossierRecord>>>,
}

impl DossierRepository for InMemoryDossierRepository {
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
        if guard.contains_key(&record.snapshot.dossier_id) {
            guard.insert(record.snapshot.dossier_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
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
pub(crate) struct InMemoryNotifier {
    events: Arc<Mutex<Vec<DossierAlert>>>,
}

impl VerdictNotifier for InMemoryNotifier {
    fn publish(&self, alert: DossierAlert) -> Result<(), NotifyError> {
        let mut guard = self.events.lock().expect("alert mutex poisoned");
        guard.push(alert);
        Ok(())
    }
}

impl InMemoryNotifier {
    pub(crate) fn events(&self) -> Vec<DossierAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

pub(crate) fn default_lending_policy() -> LendingPolicy {
    LendingPolicy::default()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
