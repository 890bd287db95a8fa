use super::domain::{round2, MonthlyScore};
use super::normalizer::NormalizedMetrics;

/// Arithmetic mean of the metrics that are actually present, rounded to two
/// decimals.
///
/// A submitted zero is a present value and participates in the mean. Zero
/// present metrics yields an overall of zero with `insufficient_data` set,
/// so callers can tell "scored zero" apart from "nothing to score".
pub(crate) fn score_month(metrics: &NormalizedMetrics) -> MonthlyScore {
    if metrics.is_empty() {
        return MonthlyScore {
            overall: 0.0,
            insufficient_data: true,
        };
    }

    let total: f64 = metrics.values().values().sum();
    MonthlyScore {
        overall: round2(total / metrics.len() as f64),
        insufficient_data: false,
    }
}
