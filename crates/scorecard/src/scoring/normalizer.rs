use std::collections::BTreeMap;

use tracing::warn;

use super::config::Scale;
use super::domain::{Metric, RawMetricValue};

/// Clamp-audited metric values ready for averaging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedMetrics {
    values: BTreeMap<Metric, f64>,
    clamped: Vec<Metric>,
}

impl NormalizedMetrics {
    pub fn values(&self) -> &BTreeMap<Metric, f64> {
        &self.values
    }

    pub fn get(&self, metric: &Metric) -> Option<f64> {
        self.values.get(metric).copied()
    }

    pub fn clamped(&self) -> &[Metric] {
        &self.clamped
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn into_parts(self) -> (BTreeMap<Metric, f64>, Vec<Metric>) {
        (self.values, self.clamped)
    }
}

/// Convert raw metric inputs into bounded numeric values.
///
/// Non-numeric and blank inputs are excluded from the output entirely; they
/// never become zeros. Out-of-range values are clamped into the scale and
/// recorded in the audit list.
pub(crate) fn normalize(
    raw: &BTreeMap<Metric, RawMetricValue>,
    scale: Scale,
) -> NormalizedMetrics {
    let mut values = BTreeMap::new();
    let mut clamped = Vec::new();

    for (metric, value) in raw {
        let Some(number) = value.as_number() else {
            continue;
        };

        let bounded = number.clamp(0.0, scale.max());
        if bounded != number {
            warn!(
                metric = metric.as_str(),
                submitted = number,
                bounded,
                "metric value outside scoring range, clamped"
            );
            clamped.push(metric.clone());
        }
        values.insert(metric.clone(), bounded);
    }

    NormalizedMetrics { values, clamped }
}
