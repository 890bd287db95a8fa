use std::collections::BTreeMap;

use crate::scoring::{EngineConfig, Metric, PeriodScore, SubjectId};

pub(super) fn employee_config() -> EngineConfig {
    EngineConfig::employee()
}

pub(super) fn seo_config() -> EngineConfig {
    EngineConfig::seo()
}

pub(super) fn metric_map(entries: &[(&str, f64)]) -> BTreeMap<Metric, f64> {
    entries
        .iter()
        .map(|(name, value)| (Metric::new(name), *value))
        .collect()
}

pub(super) fn period(
    subject: &str,
    key: &str,
    metrics: &[(&str, f64)],
    overall: f64,
    learning_minutes: u32,
) -> PeriodScore {
    PeriodScore {
        subject: SubjectId(subject.to_string()),
        period: key.parse().expect("valid period key"),
        metrics: metric_map(metrics),
        overall,
        insufficient_data: false,
        clamped: Vec::new(),
        learning_minutes,
        manager_score: None,
        mentor_score: None,
    }
}

/// Twelve employee months: solid KPI, one learning-short February.
pub(super) fn strong_year(subject: &str) -> Vec<PeriodScore> {
    (1..=12u32)
        .map(|month| {
            let key = format!("2024-{month:02}");
            let learning = if month == 2 { 300 } else { 400 };
            period(
                subject,
                &key,
                &[("kpi", 8.0), ("learning", 8.0), ("relationship", 8.0)],
                8.0,
                learning,
            )
        })
        .collect()
}
