use crate::rating::{DEFAULT_K_FACTOR, DEFAULT_RATING};
use crate::store::MAX_BATCH_SIZE;

/// Which tier a multi-tier rating jump reports. `FirstCrossed` reports the
/// lowest newly-crossed tier; `HighestCrossed` the tier actually reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionPolicy {
    FirstCrossed,
    HighestCrossed,
}

#[derive(Debug, Clone)]
pub struct RatingSettings {
    pub k_factor: f64,
    pub default_rating: i64,
    pub promotion_policy: PromotionPolicy,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            k_factor: DEFAULT_K_FACTOR,
            default_rating: DEFAULT_RATING,
            promotion_policy: PromotionPolicy::FirstCrossed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Division {
    pub key: &'static str,
    pub collection: &'static str,
}

#[derive(Debug, Clone)]
pub struct LadderSettings {
    /// Division order matters: the aggregator breaks elo ties by it.
    pub divisions: Vec<Division>,
}

impl Default for LadderSettings {
    fn default() -> Self {
        Self {
            divisions: vec![
                Division { key: "d1", collection: "playersD1" },
                Division { key: "d2", collection: "playersD2" },
                Division { key: "d3", collection: "playersD3" },
            ],
        }
    }
}

impl LadderSettings {
    pub fn division(&self, key: &str) -> Option<&Division> {
        self.divisions.iter().find(|division| division.key == key)
    }
}

#[derive(Debug, Clone)]
pub struct AggregationSettings {
    pub batch_size: usize,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            batch_size: MAX_BATCH_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub rating: RatingSettings,
    pub ladder: LadderSettings,
    pub aggregation: AggregationSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }
}
