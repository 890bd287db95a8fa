use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::scoring::domain::{round1, Metric, PeriodScore, SubjectId};
use crate::scoring::EngineConfig;

/// Aggregate statistics over one subject's ordered period history.
///
/// Derived, never stored on its own: replaying the fold over the same
/// period sequence always reproduces the identical summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySummary {
    pub subject: SubjectId,
    /// Mean per metric across the periods where that metric was present,
    /// rounded to one decimal to match reporting conventions.
    pub metric_averages: BTreeMap<Metric, f64>,
    pub average_overall: f64,
    pub total_periods: usize,
    /// Periods that fell short of the configured learning minute minimum.
    pub shortfall_periods: usize,
}

impl YearlySummary {
    /// Pure fold over an ascending-by-period slice. Returns `None` for an
    /// empty history instead of fabricating zeros.
    pub fn from_periods(periods: &[PeriodScore], config: &EngineConfig) -> Option<Self> {
        let first = periods.first()?;

        let mut totals: BTreeMap<Metric, (f64, usize)> = BTreeMap::new();
        let mut overall_total = 0.0;
        let mut shortfall_periods = 0;

        for period in periods {
            for (metric, value) in &period.metrics {
                let slot = totals.entry(metric.clone()).or_insert((0.0, 0));
                slot.0 += value;
                slot.1 += 1;
            }
            overall_total += period.overall;

            if let Some(minimum) = config.learning_shortfall_minutes() {
                if period.learning_minutes < minimum {
                    shortfall_periods += 1;
                }
            }
        }

        let metric_averages = totals
            .into_iter()
            .map(|(metric, (sum, count))| (metric, round1(sum / count as f64)))
            .collect();

        Some(Self {
            subject: first.subject.clone(),
            metric_averages,
            average_overall: round1(overall_total / periods.len() as f64),
            total_periods: periods.len(),
            shortfall_periods,
        })
    }

    pub fn metric_average(&self, metric: &Metric) -> Option<f64> {
        self.metric_averages.get(metric).copied()
    }
}
