use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scoring::bands::BandSpec;
use crate::scoring::domain::{PeriodKey, PeriodScore, SubjectId};
use crate::scoring::EngineConfig;

use super::recommend::RecommendationOutcome;
use super::summary::YearlySummary;

/// Identifier wrapper for appraisal decision records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppraisalId(pub String);

impl fmt::Display for AppraisalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of a decision record. `Draft -> Finalized` is the only
/// transition; there is no delete or reopen path in this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppraisalState {
    Draft,
    Finalized,
}

impl AppraisalState {
    pub const fn label(self) -> &'static str {
        match self {
            AppraisalState::Draft => "draft",
            AppraisalState::Finalized => "finalized",
        }
    }
}

/// Per-period line of the appraisal's score history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBreakdownEntry {
    pub period: PeriodKey,
    pub overall: f64,
}

/// Decision artifact binding a subject, a period range, the aggregated
/// summary, and the rating that drives increment eligibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppraisalRecord {
    pub id: AppraisalId,
    pub subject: SubjectId,
    pub period_start: PeriodKey,
    pub period_end: PeriodKey,
    pub summary: YearlySummary,
    pub rating: BandSpec,
    pub recommendations: RecommendationOutcome,
    pub monthly_breakdown: Vec<MonthlyBreakdownEntry>,
    pub note: Option<String>,
    pub state: AppraisalState,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppraisalError {
    #[error("no scored periods between {start} and {end}")]
    EmptyPeriodRange { start: PeriodKey, end: PeriodKey },
    #[error("appraisal period start {start} is after end {end}")]
    InvertedRange { start: PeriodKey, end: PeriodKey },
    #[error("appraisal {0} is finalized and can no longer be amended")]
    Finalized(AppraisalId),
    #[error("appraisal {0} is already finalized")]
    AlreadyFinalized(AppraisalId),
}

impl AppraisalRecord {
    /// Aggregate, classify, and assemble a draft record for the inclusive
    /// period range. Only periods inside the range participate; an empty
    /// range is rejected because an appraisal cannot be built over no
    /// history.
    pub fn build(
        id: AppraisalId,
        subject: SubjectId,
        period_start: PeriodKey,
        period_end: PeriodKey,
        periods: &[PeriodScore],
        config: &EngineConfig,
    ) -> Result<Self, AppraisalError> {
        if period_start > period_end {
            return Err(AppraisalError::InvertedRange {
                start: period_start,
                end: period_end,
            });
        }

        let mut in_range: Vec<PeriodScore> = periods
            .iter()
            .filter(|score| score.period >= period_start && score.period <= period_end)
            .cloned()
            .collect();
        in_range.sort_by(|a, b| a.period.cmp(&b.period));

        let summary = YearlySummary::from_periods(&in_range, config).ok_or(
            AppraisalError::EmptyPeriodRange {
                start: period_start.clone(),
                end: period_end.clone(),
            },
        )?;

        let rating = config
            .bands()
            .classify(summary.average_overall, config.scale())
            .clone();
        let recommendations = RecommendationOutcome::from_summary(&summary, config);
        let monthly_breakdown = in_range
            .iter()
            .map(|score| MonthlyBreakdownEntry {
                period: score.period.clone(),
                overall: score.overall,
            })
            .collect();

        Ok(Self {
            id,
            subject,
            period_start,
            period_end,
            summary,
            rating,
            recommendations,
            monthly_breakdown,
            note: None,
            state: AppraisalState::Draft,
        })
    }

    /// Notes stay amendable while the record is a draft.
    pub fn amend_note(&mut self, note: impl Into<String>) -> Result<(), AppraisalError> {
        if self.state == AppraisalState::Finalized {
            return Err(AppraisalError::Finalized(self.id.clone()));
        }
        self.note = Some(note.into());
        Ok(())
    }

    /// One-way transition out of draft.
    pub fn finalize(&mut self) -> Result<(), AppraisalError> {
        if self.state == AppraisalState::Finalized {
            return Err(AppraisalError::AlreadyFinalized(self.id.clone()));
        }
        self.state = AppraisalState::Finalized;
        Ok(())
    }
}
