use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::scoring::{
    CurrentSubmission, EngineConfig, LearningEntry, Metric, PeriodScore, RawMetricValue,
    ScoringEngine, SubjectId, SubmissionRecord,
};

pub(super) fn employee_engine() -> ScoringEngine {
    ScoringEngine::new(EngineConfig::employee())
}

pub(super) fn seo_engine() -> ScoringEngine {
    ScoringEngine::new(EngineConfig::seo())
}

pub(super) fn number(value: f64) -> RawMetricValue {
    RawMetricValue::Number(value)
}

pub(super) fn text(value: &str) -> RawMetricValue {
    RawMetricValue::Text(value.to_string())
}

pub(super) fn raw_metrics(entries: &[(&str, RawMetricValue)]) -> BTreeMap<Metric, RawMetricValue> {
    entries
        .iter()
        .map(|(name, value)| (Metric::new(name), value.clone()))
        .collect()
}

pub(super) fn period_score(subject: &str, period: &str, overall: f64) -> PeriodScore {
    PeriodScore {
        subject: SubjectId(subject.to_string()),
        period: period.parse().expect("valid period key"),
        metrics: BTreeMap::new(),
        overall,
        insufficient_data: false,
        clamped: Vec::new(),
        learning_minutes: 400,
        manager_score: None,
        mentor_score: None,
    }
}

pub(super) fn learning_entry(topic: &str, minutes: u32) -> LearningEntry {
    LearningEntry {
        topic: topic.to_string(),
        url: "https://learning.example.com/course".to_string(),
        applied_where: "Client projects".to_string(),
        minutes,
    }
}

pub(super) fn current_submission(
    year: i32,
    month: u32,
    metrics: &[(&str, RawMetricValue)],
) -> SubmissionRecord {
    SubmissionRecord::Current(CurrentSubmission {
        submission_month: NaiveDate::from_ymd_opt(year, month, 1).expect("valid date"),
        metrics: raw_metrics(metrics),
        learning: Vec::new(),
        manager_score: None,
        mentor_score: None,
    })
}
