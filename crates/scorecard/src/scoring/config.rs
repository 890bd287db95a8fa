use serde::{Deserialize, Serialize};

use super::bands::{BandSpec, BandTable};
use super::domain::Metric;

/// Upper bound of the scoring range. Employee scoring runs on ten points,
/// SEO client scoring on one hundred; the two stay separate configured
/// instances rather than being normalized into each other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale(f64);

impl Scale {
    pub const TEN_POINT: Scale = Scale(10.0);
    pub const HUNDRED_POINT: Scale = Scale(100.0);

    pub fn new(max: f64) -> Result<Self, EngineConfigError> {
        if max.is_finite() && max > 0.0 {
            Ok(Self(max))
        } else {
            Err(EngineConfigError::NonPositiveScale(max))
        }
    }

    pub const fn max(self) -> f64 {
        self.0
    }
}

/// Rolling-average policy for flagging sustained low performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowPerformerPolicy {
    /// Rolling averages strictly below this value flag the subject.
    pub threshold: f64,
    /// How many of the most recent periods feed the rolling average.
    pub window: usize,
    /// Minimum period count before any verdict other than insufficient data.
    pub min_periods: usize,
}

/// One entry in the ordered recommendation rule table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRule {
    pub trigger: RuleTrigger,
    pub advice: String,
}

impl RecommendationRule {
    pub fn new(trigger: RuleTrigger, advice: impl Into<String>) -> Self {
        Self {
            trigger,
            advice: advice.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleTrigger {
    /// Fires when any period in the summary fell short of the learning
    /// minute minimum.
    LearningShortfall,
    /// Fires when the summary average for a metric sits below the threshold.
    MetricBelow { metric: Metric, threshold: f64 },
}

/// Validated scoring-domain configuration consumed by every engine
/// component, so banding and low-performer thresholds can never drift apart.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    scale: Scale,
    bands: BandTable,
    low_performer: LowPerformerPolicy,
    learning_shortfall_minutes: Option<u32>,
    recommendation_rules: Vec<RecommendationRule>,
    on_track_message: String,
}

const ON_TRACK_MESSAGE: &str =
    "No specific recommendations at this time. Keep up the great work!";

impl EngineConfig {
    pub fn builder(scale: Scale) -> EngineConfigBuilder {
        EngineConfigBuilder::new(scale)
    }

    /// Ten-point employee scoring domain: status tiers, single-month
    /// low-performer rule, six learning hours expected per month.
    pub fn employee() -> Self {
        Self {
            scale: Scale::TEN_POINT,
            bands: BandTable::from_sorted(vec![
                BandSpec::new("excellent", 9.0, 10.0, "Consistently exceeds expectations"),
                BandSpec::new("good", 7.0, 7.0, "Meets and often exceeds expectations"),
                BandSpec::new("satisfactory", 5.0, 4.0, "Meets expectations"),
                BandSpec::new(
                    "needs_improvement",
                    3.0,
                    0.0,
                    "Below expectations, coaching required",
                ),
                BandSpec::new("unsatisfactory", 0.0, 0.0, "Sustained underperformance"),
            ]),
            low_performer: LowPerformerPolicy {
                threshold: 5.0,
                window: 1,
                min_periods: 1,
            },
            learning_shortfall_minutes: Some(360),
            recommendation_rules: vec![
                RecommendationRule::new(
                    RuleTrigger::LearningShortfall,
                    "Focus on dedicating at least 6 hours per month to learning to avoid appraisal delays.",
                ),
                RecommendationRule::new(
                    RuleTrigger::MetricBelow {
                        metric: Metric::kpi(),
                        threshold: 7.0,
                    },
                    "Review KPI performance to identify areas for improvement and focus on key metrics.",
                ),
                RecommendationRule::new(
                    RuleTrigger::MetricBelow {
                        metric: Metric::relationship(),
                        threshold: 7.0,
                    },
                    "Improve client relationship management by scheduling more regular check-ins and proactively addressing issues.",
                ),
            ],
            on_track_message: ON_TRACK_MESSAGE.to_string(),
        }
    }

    /// Hundred-point SEO client scoring domain: A/B/C/D appraisal bands with
    /// a two-month rolling low-performer rule.
    pub fn seo() -> Self {
        Self {
            scale: Scale::HUNDRED_POINT,
            bands: BandTable::from_sorted(vec![
                BandSpec::new("A", 85.0, 10.0, "Full increment bracket"),
                BandSpec::new("B", 75.0, 7.0, "Standard increment"),
                BandSpec::new("C", 65.0, 4.0, "Limited increment"),
                BandSpec::new("D", 0.0, 0.0, "PIP/No increment"),
            ]),
            low_performer: LowPerformerPolicy {
                threshold: 65.0,
                window: 2,
                min_periods: 2,
            },
            learning_shortfall_minutes: None,
            recommendation_rules: vec![RecommendationRule::new(
                RuleTrigger::MetricBelow {
                    metric: Metric::new("relationship_quality"),
                    threshold: 7.0,
                },
                "Strengthen client relationship hygiene: monthly review meetings and at least four touchpoints per month.",
            )],
            on_track_message: ON_TRACK_MESSAGE.to_string(),
        }
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn bands(&self) -> &BandTable {
        &self.bands
    }

    pub fn low_performer(&self) -> &LowPerformerPolicy {
        &self.low_performer
    }

    pub fn learning_shortfall_minutes(&self) -> Option<u32> {
        self.learning_shortfall_minutes
    }

    pub fn recommendation_rules(&self) -> &[RecommendationRule] {
        &self.recommendation_rules
    }

    pub fn on_track_message(&self) -> &str {
        &self.on_track_message
    }
}

/// Step-by-step construction with all validation deferred to [`build`].
///
/// [`build`]: EngineConfigBuilder::build
#[derive(Debug)]
pub struct EngineConfigBuilder {
    scale: Scale,
    bands: Vec<BandSpec>,
    low_performer: LowPerformerPolicy,
    learning_shortfall_minutes: Option<u32>,
    recommendation_rules: Vec<RecommendationRule>,
    on_track_message: String,
}

impl EngineConfigBuilder {
    pub fn new(scale: Scale) -> Self {
        Self {
            scale,
            bands: Vec::new(),
            // Inert default: a zero threshold never flags anyone.
            low_performer: LowPerformerPolicy {
                threshold: 0.0,
                window: 1,
                min_periods: 1,
            },
            learning_shortfall_minutes: None,
            recommendation_rules: Vec::new(),
            on_track_message: ON_TRACK_MESSAGE.to_string(),
        }
    }

    pub fn band(
        mut self,
        label: impl Into<String>,
        min_score: f64,
        increment_pct: f64,
        description: impl Into<String>,
    ) -> Self {
        self.bands
            .push(BandSpec::new(label, min_score, increment_pct, description));
        self
    }

    pub fn low_performer(mut self, threshold: f64, window: usize, min_periods: usize) -> Self {
        self.low_performer = LowPerformerPolicy {
            threshold,
            window,
            min_periods,
        };
        self
    }

    pub fn learning_shortfall_minutes(mut self, minutes: u32) -> Self {
        self.learning_shortfall_minutes = Some(minutes);
        self
    }

    pub fn rule(mut self, rule: RecommendationRule) -> Self {
        self.recommendation_rules.push(rule);
        self
    }

    pub fn on_track_message(mut self, message: impl Into<String>) -> Self {
        self.on_track_message = message.into();
        self
    }

    /// Validate the assembled configuration. Configuration errors are fatal:
    /// an engine is never constructed from a table that could misclassify.
    pub fn build(self) -> Result<EngineConfig, EngineConfigError> {
        let bands = BandTable::new(self.bands, self.scale)?;

        if self.low_performer.window == 0 {
            return Err(EngineConfigError::ZeroWindow);
        }
        if self.low_performer.min_periods == 0 {
            return Err(EngineConfigError::ZeroGate);
        }
        if !self.low_performer.threshold.is_finite()
            || self.low_performer.threshold < 0.0
            || self.low_performer.threshold > self.scale.max()
        {
            return Err(EngineConfigError::ThresholdOutOfRange {
                threshold: self.low_performer.threshold,
                scale_max: self.scale.max(),
            });
        }

        Ok(EngineConfig {
            scale: self.scale,
            bands,
            low_performer: self.low_performer,
            learning_shortfall_minutes: self.learning_shortfall_minutes,
            recommendation_rules: self.recommendation_rules,
            on_track_message: self.on_track_message,
        })
    }
}

/// Fatal construction-time configuration faults.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineConfigError {
    #[error("scale maximum must be a positive number, got {0}")]
    NonPositiveScale(f64),
    #[error("band table must contain at least one band")]
    EmptyBandTable,
    #[error("band '{label}' lower bound {min_score} falls outside 0..={scale_max}")]
    BandOutOfRange {
        label: String,
        min_score: f64,
        scale_max: f64,
    },
    #[error("band '{label}' increment percentage must not be negative")]
    NegativeIncrement { label: String },
    #[error("bands '{first}' and '{second}' share lower bound {min_score}")]
    OverlappingBands {
        first: String,
        second: String,
        min_score: f64,
    },
    #[error("band table leaves a gap below {floor}; the lowest band must start at 0")]
    GappedFloor { floor: f64 },
    #[error("rolling window must cover at least one period")]
    ZeroWindow,
    #[error("minimum sample gate must require at least one period")]
    ZeroGate,
    #[error("low-performer threshold {threshold} falls outside 0..={scale_max}")]
    ThresholdOutOfRange { threshold: f64, scale_max: f64 },
}
