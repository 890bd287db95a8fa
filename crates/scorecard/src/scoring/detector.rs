use serde::{Deserialize, Serialize};

use super::config::LowPerformerPolicy;
use super::domain::{round2, PeriodScore};

/// Outcome of the rolling-average low performance check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LowPerformerVerdict {
    Flagged { rolling_average: f64, window: usize },
    Clear { rolling_average: f64, window: usize },
    InsufficientData { available: usize, required: usize },
}

impl LowPerformerVerdict {
    pub fn is_flagged(&self) -> bool {
        matches!(self, LowPerformerVerdict::Flagged { .. })
    }
}

/// Flag a subject whose recent average falls below the policy threshold.
///
/// Periods must arrive in ascending period-key order; the newest `window`
/// entries feed the rolling average. Below the minimum-sample gate the
/// verdict is insufficient data, never a clear or a flag, so one bad month
/// cannot trigger a PIP without corroborating history.
pub(crate) fn detect(periods: &[PeriodScore], policy: &LowPerformerPolicy) -> LowPerformerVerdict {
    if periods.len() < policy.min_periods {
        return LowPerformerVerdict::InsufficientData {
            available: periods.len(),
            required: policy.min_periods,
        };
    }

    let window = policy.window.min(periods.len());
    let recent = &periods[periods.len() - window..];
    let rolling_average = round2(
        recent.iter().map(|period| period.overall).sum::<f64>() / window as f64,
    );

    if rolling_average < policy.threshold {
        LowPerformerVerdict::Flagged {
            rolling_average,
            window,
        }
    } else {
        LowPerformerVerdict::Clear {
            rolling_average,
            window,
        }
    }
}
