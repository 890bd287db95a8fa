use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for scored subjects (employees or client engagements).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectId(pub String);

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sortable `YYYY-MM` evaluation period key.
///
/// Lexicographic order matches chronological order, so period histories can
/// be kept sorted with plain string comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeriodKey(String);

impl PeriodKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format("%Y-%m").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PeriodKey {
    type Err = PeriodKeyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let bytes = trimmed.as_bytes();
        let shaped = bytes.len() == 7
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[4] == b'-'
            && bytes[5..].iter().all(u8::is_ascii_digit);

        if !shaped {
            return Err(PeriodKeyError(raw.to_string()));
        }

        match trimmed[5..7].parse::<u8>() {
            Ok(month) if (1..=12).contains(&month) => Ok(Self(trimmed.to_string())),
            _ => Err(PeriodKeyError(raw.to_string())),
        }
    }
}

impl TryFrom<String> for PeriodKey {
    type Error = PeriodKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PeriodKey> for String {
    fn from(value: PeriodKey) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("period key must be formatted as YYYY-MM, got '{0}'")]
pub struct PeriodKeyError(pub String);

/// Canonical metric name, trimmed and lowercased so schema variants collide
/// onto one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Metric(String);

impl Metric {
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kpi() -> Self {
        Self::new("kpi")
    }

    pub fn learning() -> Self {
        Self::new("learning")
    }

    pub fn relationship() -> Self {
        Self::new("relationship")
    }
}

impl From<String> for Metric {
    fn from(value: String) -> Self {
        Metric::new(&value)
    }
}

impl From<Metric> for String {
    fn from(value: Metric) -> Self {
        value.0
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lenient wire representation of one submitted figure. Upstream forms send
/// numbers, numeric strings, blanks, and nulls interchangeably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawMetricValue {
    Number(f64),
    Text(String),
    Missing,
}

impl RawMetricValue {
    /// Numeric interpretation. Blank and non-numeric inputs are absent, not
    /// zero, so they never deflate an average.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawMetricValue::Number(value) if value.is_finite() => Some(*value),
            RawMetricValue::Number(_) => None,
            RawMetricValue::Text(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
            }
            RawMetricValue::Missing => None,
        }
    }
}

/// Self-study entry attached to a monthly submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningEntry {
    pub topic: String,
    pub url: String,
    #[serde(alias = "appliedWhere")]
    pub applied_where: String,
    #[serde(alias = "durationMins")]
    pub minutes: u32,
}

impl LearningEntry {
    /// Only fully documented entries count toward the monthly total.
    pub fn is_complete(&self) -> bool {
        !self.topic.trim().is_empty()
            && !self.url.trim().is_empty()
            && !self.applied_where.trim().is_empty()
            && self.minutes > 0
    }
}

/// Overall score for one period. `insufficient_data` distinguishes a genuine
/// zero from a period with nothing to average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyScore {
    pub overall: f64,
    pub insufficient_data: bool,
}

/// One subject's computed score for one evaluation period.
///
/// Immutable once computed. A resubmission produces a fresh value that
/// replaces the stored one; nothing edits an existing PeriodScore in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodScore {
    pub subject: SubjectId,
    pub period: PeriodKey,
    pub metrics: BTreeMap<Metric, f64>,
    pub overall: f64,
    pub insufficient_data: bool,
    /// Metrics whose submitted value fell outside the scoring range and was
    /// corrected, kept so callers can audit bad upstream data.
    pub clamped: Vec<Metric>,
    pub learning_minutes: u32,
    pub manager_score: Option<f64>,
    pub mentor_score: Option<f64>,
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
