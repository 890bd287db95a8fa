use serde::{Deserialize, Serialize};

use super::config::{EngineConfigError, Scale};

/// One named tier of the rating partition. Lower bound is inclusive; the
/// next band up supplies the exclusive upper edge, and the top band closes
/// at the scale maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandSpec {
    pub label: String,
    pub min_score: f64,
    pub increment_pct: f64,
    pub description: String,
}

impl BandSpec {
    pub fn new(
        label: impl Into<String>,
        min_score: f64,
        increment_pct: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            min_score,
            increment_pct,
            description: description.into(),
        }
    }
}

/// Validated partition of the scoring range, kept sorted by descending lower
/// bound. Thresholds live here as data so they stay testable and tunable
/// apart from the classification walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandTable {
    bands: Vec<BandSpec>,
}

impl BandTable {
    /// Validate and sort a band list against a scale: every lower bound in
    /// range, no duplicate bounds, and a band anchored at zero so the
    /// partition has no floor gap.
    pub fn new(mut bands: Vec<BandSpec>, scale: Scale) -> Result<Self, EngineConfigError> {
        if bands.is_empty() {
            return Err(EngineConfigError::EmptyBandTable);
        }

        for band in &bands {
            if !band.min_score.is_finite() || band.min_score < 0.0 || band.min_score > scale.max()
            {
                return Err(EngineConfigError::BandOutOfRange {
                    label: band.label.clone(),
                    min_score: band.min_score,
                    scale_max: scale.max(),
                });
            }
            if !(band.increment_pct >= 0.0) {
                return Err(EngineConfigError::NegativeIncrement {
                    label: band.label.clone(),
                });
            }
        }

        bands.sort_by(|a, b| {
            b.min_score
                .partial_cmp(&a.min_score)
                .expect("band bounds are finite")
        });

        for pair in bands.windows(2) {
            if pair[0].min_score == pair[1].min_score {
                return Err(EngineConfigError::OverlappingBands {
                    first: pair[0].label.clone(),
                    second: pair[1].label.clone(),
                    min_score: pair[0].min_score,
                });
            }
        }

        let floor = bands
            .last()
            .map(|band| band.min_score)
            .expect("band table is non-empty");
        if floor != 0.0 {
            return Err(EngineConfigError::GappedFloor { floor });
        }

        Ok(Self { bands })
    }

    /// Preset constructor for tables already listed from top band down.
    pub(crate) fn from_sorted(bands: Vec<BandSpec>) -> Self {
        Self { bands }
    }

    /// Bands ordered from the top tier down.
    pub fn bands(&self) -> &[BandSpec] {
        &self.bands
    }

    /// Highest band whose inclusive lower bound the score meets. Scores are
    /// clamped into the scale first, so the top band is closed at the
    /// maximum and nothing falls off either end.
    pub fn classify(&self, score: f64, scale: Scale) -> &BandSpec {
        let bounded = score.clamp(0.0, scale.max());
        for band in &self.bands {
            if bounded >= band.min_score {
                return band;
            }
        }
        self.bands.last().expect("band table is non-empty")
    }
}
