use serde::{Deserialize, Serialize};

use crate::scoring::config::{RecommendationRule, RuleTrigger};
use crate::scoring::EngineConfig;

use super::summary::YearlySummary;

/// One numbered improvement action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: usize,
    pub advice: String,
}

/// Deterministic output of the rule table: either improvements numbered in
/// rule order, or the configured reinforcement message when nothing fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecommendationOutcome {
    Improvements { items: Vec<Recommendation> },
    OnTrack { message: String },
}

impl RecommendationOutcome {
    /// Walk the ordered rule table against a summary. The same summary
    /// always yields the same outcome, item for item.
    pub fn from_summary(summary: &YearlySummary, config: &EngineConfig) -> Self {
        let mut items = Vec::new();

        for rule in config.recommendation_rules() {
            if rule_fires(rule, summary) {
                items.push(Recommendation {
                    priority: items.len() + 1,
                    advice: rule.advice.clone(),
                });
            }
        }

        if items.is_empty() {
            RecommendationOutcome::OnTrack {
                message: config.on_track_message().to_string(),
            }
        } else {
            RecommendationOutcome::Improvements { items }
        }
    }
}

fn rule_fires(rule: &RecommendationRule, summary: &YearlySummary) -> bool {
    match &rule.trigger {
        RuleTrigger::LearningShortfall => summary.shortfall_periods > 0,
        // A metric with no recorded data stays silent rather than tripping
        // its low-average rule.
        RuleTrigger::MetricBelow { metric, threshold } => summary
            .metric_average(metric)
            .map(|average| average < *threshold)
            .unwrap_or(false),
    }
}
