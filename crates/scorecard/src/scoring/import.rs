use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::adapter::LegacySubmission;
use super::domain::{RawMetricValue, SubjectId};

/// One parsed row of a legacy `submissions` export together with its
/// subject.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedSubmission {
    pub subject: SubjectId,
    pub submission: LegacySubmission,
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read legacy export: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed legacy export: {0}")]
    Csv(#[from] csv::Error),
}

/// Batch importer for legacy submission CSV exports used during backfills.
pub struct LegacySubmissionImporter;

impl LegacySubmissionImporter {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Vec<ImportedSubmission>, ImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ImportedSubmission>, ImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut imported = Vec::new();

        for row in csv_reader.deserialize::<LegacyRow>() {
            let row = row?;
            let subject = SubjectId(row.employee_name.clone());
            imported.push(ImportedSubmission {
                subject,
                submission: row.into_submission(),
            });
        }

        Ok(imported)
    }
}

#[derive(Debug, Deserialize)]
struct LegacyRow {
    #[serde(alias = "employee")]
    employee_name: String,
    #[serde(alias = "month")]
    month_key: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    kpi_score: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    learning_score: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    relationship_score: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    manager_score: Option<String>,
    #[serde(default)]
    learning_minutes: Option<u32>,
}

impl LegacyRow {
    fn into_submission(self) -> LegacySubmission {
        LegacySubmission {
            month_key: self.month_key,
            kpi_score: self.kpi_score.map(RawMetricValue::Text),
            learning_score: self.learning_score.map(RawMetricValue::Text),
            relationship_score: self.relationship_score.map(RawMetricValue::Text),
            manager_score: self.manager_score.map(RawMetricValue::Text),
            learning: Vec::new(),
            learning_minutes: self.learning_minutes,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
