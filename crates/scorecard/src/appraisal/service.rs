use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::scoring::detector::LowPerformerVerdict;
use crate::scoring::domain::{PeriodKey, PeriodScore, SubjectId};
use crate::scoring::{EngineConfig, ScoringEngine, SubmissionError, SubmissionRecord};

use super::record::{AppraisalError, AppraisalId, AppraisalRecord};
use super::recommend::RecommendationOutcome;
use super::repository::{PerformanceRepository, RepositoryError};
use super::summary::YearlySummary;

/// Service composing the scoring engine with a repository implementation.
pub struct AppraisalService<R> {
    engine: ScoringEngine,
    repository: Arc<R>,
}

static APPRAISAL_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_appraisal_id() -> AppraisalId {
    let id = APPRAISAL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AppraisalId(format!("appr-{id:06}"))
}

impl<R> AppraisalService<R>
where
    R: PerformanceRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: EngineConfig) -> Self {
        Self {
            engine: ScoringEngine::new(config),
            repository,
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Score a submission and persist the resulting PeriodScore, replacing
    /// any earlier score for the same period.
    pub fn submit_period(
        &self,
        subject: SubjectId,
        submission: &SubmissionRecord,
    ) -> Result<PeriodScore, AppraisalServiceError> {
        let score = self.engine.score_period(subject, submission)?;
        self.repository.store_period(score.clone())?;
        Ok(score)
    }

    pub fn low_performer(
        &self,
        subject: &SubjectId,
    ) -> Result<LowPerformerVerdict, AppraisalServiceError> {
        let periods = self.repository.periods(subject)?;
        Ok(self.engine.low_performer(&periods))
    }

    /// Yearly summary plus the recommendations derived from it; `None` until
    /// the subject has scored periods.
    pub fn subject_report(
        &self,
        subject: &SubjectId,
    ) -> Result<Option<(YearlySummary, RecommendationOutcome)>, AppraisalServiceError> {
        let periods = self.repository.periods(subject)?;
        let Some(summary) = YearlySummary::from_periods(&periods, self.engine.config()) else {
            return Ok(None);
        };
        let recommendations = RecommendationOutcome::from_summary(&summary, self.engine.config());
        Ok(Some((summary, recommendations)))
    }

    /// Build and store a draft appraisal over the subject's stored history.
    pub fn build_appraisal(
        &self,
        subject: SubjectId,
        period_start: PeriodKey,
        period_end: PeriodKey,
        note: Option<String>,
    ) -> Result<AppraisalRecord, AppraisalServiceError> {
        let periods = self.repository.periods(&subject)?;
        let mut record = AppraisalRecord::build(
            next_appraisal_id(),
            subject,
            period_start,
            period_end,
            &periods,
            self.engine.config(),
        )?;

        if let Some(note) = note {
            record.amend_note(note)?;
        }

        let stored = self.repository.insert_appraisal(record)?;
        Ok(stored)
    }

    pub fn amend_note(
        &self,
        id: &AppraisalId,
        note: String,
    ) -> Result<AppraisalRecord, AppraisalServiceError> {
        let mut record = self
            .repository
            .fetch_appraisal(id)?
            .ok_or(RepositoryError::NotFound)?;
        record.amend_note(note)?;
        self.repository.update_appraisal(record.clone())?;
        Ok(record)
    }

    pub fn finalize(&self, id: &AppraisalId) -> Result<AppraisalRecord, AppraisalServiceError> {
        let mut record = self
            .repository
            .fetch_appraisal(id)?
            .ok_or(RepositoryError::NotFound)?;
        record.finalize()?;
        self.repository.update_appraisal(record.clone())?;
        Ok(record)
    }

    pub fn get_appraisal(
        &self,
        id: &AppraisalId,
    ) -> Result<AppraisalRecord, AppraisalServiceError> {
        let record = self
            .repository
            .fetch_appraisal(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

/// Error raised by the appraisal service.
#[derive(Debug, thiserror::Error)]
pub enum AppraisalServiceError {
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Appraisal(#[from] AppraisalError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
