use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use scorecard::appraisal::{AppraisalId, AppraisalRecord, PerformanceRepository, RepositoryError};
use scorecard::scoring::{PeriodKey, PeriodScore, SubjectId};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPerformanceRepository {
    periods: Arc<Mutex<HashMap<SubjectId, BTreeMap<PeriodKey, PeriodScore>>>>,
    appraisals: Arc<Mutex<HashMap<AppraisalId, AppraisalRecord>>>,
}

impl PerformanceRepository for InMemoryPerformanceRepository {
    fn store_period(&self, score: PeriodScore) -> Result<(), RepositoryError> {
        let mut guard = self.periods.lock().expect("period mutex poisoned");
        guard
            .entry(score.subject.clone())
            .or_default()
            .insert(score.period.clone(), score);
        Ok(())
    }

    fn periods(&self, subject: &SubjectId) -> Result<Vec<PeriodScore>, RepositoryError> {
        let guard = self.periods.lock().expect("period mutex poisoned");
        Ok(guard
            .get(subject)
            .map(|history| history.values().cloned().collect())
            .unwrap_or_default())
    }

    fn insert_appraisal(
        &self,
        record: AppraisalRecord,
    ) -> Result<AppraisalRecord, RepositoryError> {
        let mut guard = self.appraisals.lock().expect("appraisal mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update_appraisal(&self, record: AppraisalRecord) -> Result<(), RepositoryError> {
        let mut guard = self.appraisals.lock().expect("appraisal mutex poisoned");
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_appraisal(
        &self,
        id: &AppraisalId,
    ) -> Result<Option<AppraisalRecord>, RepositoryError> {
        let guard = self.appraisals.lock().expect("appraisal mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(crate) fn parse_period(raw: &str) -> Result<PeriodKey, String> {
    raw.parse::<PeriodKey>().map_err(|err| err.to_string())
}
