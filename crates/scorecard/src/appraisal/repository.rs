use serde::Serialize;

use crate::scoring::domain::{PeriodKey, PeriodScore, SubjectId};

use super::record::{AppraisalId, AppraisalRecord};

/// Storage abstraction so the service module can be exercised in isolation.
/// Persistence technology is the caller's concern.
pub trait PerformanceRepository: Send + Sync {
    /// Replaces any previous score for the same subject and period; a
    /// resubmission is a new PeriodScore, never an edit of the stored one.
    fn store_period(&self, score: PeriodScore) -> Result<(), RepositoryError>;
    /// Period history in ascending period-key order.
    fn periods(&self, subject: &SubjectId) -> Result<Vec<PeriodScore>, RepositoryError>;
    fn insert_appraisal(&self, record: AppraisalRecord)
        -> Result<AppraisalRecord, RepositoryError>;
    fn update_appraisal(&self, record: AppraisalRecord) -> Result<(), RepositoryError>;
    fn fetch_appraisal(&self, id: &AppraisalId)
        -> Result<Option<AppraisalRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Sanitized representation of an appraisal's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct AppraisalStatusView {
    pub appraisal_id: AppraisalId,
    pub subject: SubjectId,
    pub period_start: PeriodKey,
    pub period_end: PeriodKey,
    pub average_score: f64,
    pub rating_band: String,
    pub increment_pct: f64,
    pub state: &'static str,
}

impl AppraisalRecord {
    pub fn status_view(&self) -> AppraisalStatusView {
        AppraisalStatusView {
            appraisal_id: self.id.clone(),
            subject: self.subject.clone(),
            period_start: self.period_start.clone(),
            period_end: self.period_end.clone(),
            average_score: self.summary.average_overall,
            rating_band: self.rating.label.clone(),
            increment_pct: self.rating.increment_pct,
            state: self.state.label(),
        }
    }
}
