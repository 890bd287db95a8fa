//! Period scoring: normalization, monthly calculation, rating bands, and
//! low-performer detection, all driven by one injected configuration.

pub mod adapter;
pub mod bands;
pub mod config;
pub mod detector;
pub mod domain;
pub mod import;
mod monthly;
mod normalizer;

#[cfg(test)]
mod tests;

pub use adapter::{CurrentSubmission, LegacySubmission, SubmissionError, SubmissionRecord};
pub use bands::{BandSpec, BandTable};
pub use config::{
    EngineConfig, EngineConfigBuilder, EngineConfigError, LowPerformerPolicy, RecommendationRule,
    RuleTrigger, Scale,
};
pub use detector::LowPerformerVerdict;
pub use domain::{
    LearningEntry, Metric, MonthlyScore, PeriodKey, PeriodKeyError, PeriodScore, RawMetricValue,
    SubjectId,
};
pub use import::{ImportError, ImportedSubmission, LegacySubmissionImporter};
pub use normalizer::NormalizedMetrics;

use std::collections::BTreeMap;

/// Stateless engine applying one scoring-domain configuration.
///
/// Every method is a pure function over its arguments; the engine holds no
/// mutable state and can be shared freely across threads and subjects.
pub struct ScoringEngine {
    config: EngineConfig,
}

impl ScoringEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Bound raw metric inputs into the scoring range, excluding anything
    /// non-numeric.
    pub fn normalize(&self, raw: &BTreeMap<Metric, RawMetricValue>) -> NormalizedMetrics {
        normalizer::normalize(raw, self.config.scale())
    }

    /// Overall score for one period from its normalized metrics.
    pub fn score_month(&self, metrics: &NormalizedMetrics) -> MonthlyScore {
        monthly::score_month(metrics)
    }

    /// Full pipeline for one submission: adapt, normalize, average, and
    /// assemble the immutable [`PeriodScore`].
    pub fn score_period(
        &self,
        subject: SubjectId,
        submission: &SubmissionRecord,
    ) -> Result<PeriodScore, SubmissionError> {
        let period = submission.period()?;
        let raw = submission.metric_inputs();
        let normalized = self.normalize(&raw);
        let monthly = self.score_month(&normalized);

        let manager_score = self.reviewer_score(submission.manager_score());
        let mentor_score = self.reviewer_score(submission.mentor_score());
        let learning_minutes = submission.learning_minutes();
        let (metrics, clamped) = normalized.into_parts();

        Ok(PeriodScore {
            subject,
            period,
            metrics,
            overall: monthly.overall,
            insufficient_data: monthly.insufficient_data,
            clamped,
            learning_minutes,
            manager_score,
            mentor_score,
        })
    }

    /// Band assignment for a numeric score on this engine's scale.
    pub fn classify(&self, score: f64) -> &BandSpec {
        self.config.bands().classify(score, self.config.scale())
    }

    /// Rolling-average low-performer verdict over an ordered period history.
    pub fn low_performer(&self, periods: &[PeriodScore]) -> LowPerformerVerdict {
        detector::detect(periods, self.config.low_performer())
    }

    // Reviewer scores ride alongside the metric map and are never averaged
    // into the overall; they still get the same lenient parse and bounds.
    fn reviewer_score(&self, value: Option<&RawMetricValue>) -> Option<f64> {
        value
            .and_then(RawMetricValue::as_number)
            .map(|score| score.clamp(0.0, self.config.scale().max()))
    }
}
