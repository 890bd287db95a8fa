use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{LearningEntry, Metric, PeriodKey, PeriodKeyError, RawMetricValue};

/// Tagged union over the two submission schemas still in circulation.
///
/// The current monthly form and the legacy `submissions` export disagree on
/// casing and field names; both converge here on one canonical metric map so
/// downstream scoring never sees the alias zoo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "schema", rename_all = "snake_case")]
pub enum SubmissionRecord {
    Current(CurrentSubmission),
    Legacy(LegacySubmission),
}

/// Current monthly form payload: a free-form metric map plus structured
/// learning entries and externally supplied reviewer scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentSubmission {
    #[serde(alias = "submissionMonth")]
    pub submission_month: NaiveDate,
    #[serde(default)]
    pub metrics: BTreeMap<Metric, RawMetricValue>,
    #[serde(default)]
    pub learning: Vec<LearningEntry>,
    #[serde(default, alias = "managerScore")]
    pub manager_score: Option<RawMetricValue>,
    #[serde(default, alias = "mentorScore")]
    pub mentor_score: Option<RawMetricValue>,
}

/// Legacy flat row. Column names drifted across exports, so every score
/// field accepts its historical aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacySubmission {
    #[serde(alias = "monthKey")]
    pub month_key: String,
    #[serde(default, alias = "kpiScore", alias = "performance_score")]
    pub kpi_score: Option<RawMetricValue>,
    #[serde(default, alias = "learningScore")]
    pub learning_score: Option<RawMetricValue>,
    #[serde(default, alias = "relationshipScore", alias = "client_score")]
    pub relationship_score: Option<RawMetricValue>,
    #[serde(default, alias = "managerScore")]
    pub manager_score: Option<RawMetricValue>,
    #[serde(default)]
    pub learning: Vec<LearningEntry>,
    /// Aggregate fallback for exports that predate itemized learning.
    #[serde(default, alias = "learningMinutes")]
    pub learning_minutes: Option<u32>,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    PeriodKey(#[from] PeriodKeyError),
}

impl SubmissionRecord {
    /// Evaluation period the record belongs to. Legacy month keys are free
    /// text and can fail validation; current submissions carry a real date.
    pub fn period(&self) -> Result<PeriodKey, SubmissionError> {
        match self {
            SubmissionRecord::Current(current) => {
                Ok(PeriodKey::from_date(current.submission_month))
            }
            SubmissionRecord::Legacy(legacy) => Ok(legacy.month_key.parse()?),
        }
    }

    /// Canonical metric inputs, regardless of which schema carried them.
    pub fn metric_inputs(&self) -> BTreeMap<Metric, RawMetricValue> {
        match self {
            SubmissionRecord::Current(current) => current.metrics.clone(),
            SubmissionRecord::Legacy(legacy) => {
                let mut inputs = BTreeMap::new();
                if let Some(value) = &legacy.kpi_score {
                    inputs.insert(Metric::kpi(), value.clone());
                }
                if let Some(value) = &legacy.learning_score {
                    inputs.insert(Metric::learning(), value.clone());
                }
                if let Some(value) = &legacy.relationship_score {
                    inputs.insert(Metric::relationship(), value.clone());
                }
                inputs
            }
        }
    }

    /// Documented learning minutes for the period. Incomplete entries are
    /// dropped; legacy rows may fall back to their aggregate column.
    pub fn learning_minutes(&self) -> u32 {
        match self {
            SubmissionRecord::Current(current) => learning_total(&current.learning),
            SubmissionRecord::Legacy(legacy) => {
                if legacy.learning.is_empty() {
                    legacy.learning_minutes.unwrap_or(0)
                } else {
                    learning_total(&legacy.learning)
                }
            }
        }
    }

    pub fn manager_score(&self) -> Option<&RawMetricValue> {
        match self {
            SubmissionRecord::Current(current) => current.manager_score.as_ref(),
            SubmissionRecord::Legacy(legacy) => legacy.manager_score.as_ref(),
        }
    }

    pub fn mentor_score(&self) -> Option<&RawMetricValue> {
        match self {
            SubmissionRecord::Current(current) => current.mentor_score.as_ref(),
            SubmissionRecord::Legacy(_) => None,
        }
    }
}

fn learning_total(entries: &[LearningEntry]) -> u32 {
    entries
        .iter()
        .filter(|entry| entry.is_complete())
        .map(|entry| entry.minutes)
        .sum()
}
