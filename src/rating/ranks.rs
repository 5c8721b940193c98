use std::fmt;

use serde::{Deserialize, Serialize};

/// Named rank tiers in ascending order of the ratings they require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Unranked,
    Bronze,
    Silver,
    Gold,
    Emerald,
}

/// Rating thresholds, ascending. Both the promotion tracker and the member
/// aggregator derive ranks from this table and nothing else.
pub const PROMOTION_TIERS: [(i64, Rank); 4] = [
    (1400, Rank::Bronze),
    (1600, Rank::Silver),
    (1800, Rank::Gold),
    (2000, Rank::Emerald),
];

impl Rank {
    pub fn for_rating(rating: i64) -> Rank {
        let mut rank = Rank::Unranked;
        for (threshold, tier) in PROMOTION_TIERS {
            if rating >= threshold {
                rank = tier;
            }
        }
        rank
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::Unranked => "unranked",
            Rank::Bronze => "bronze",
            Rank::Silver => "silver",
            Rank::Gold => "gold",
            Rank::Emerald => "emerald",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First tier whose threshold the rating change crossed, in ascending order.
pub fn first_crossed(old_elo: i64, new_elo: i64) -> Option<(i64, Rank)> {
    PROMOTION_TIERS
        .into_iter()
        .find(|(threshold, _)| old_elo < *threshold && *threshold <= new_elo)
}

/// Highest tier whose threshold the rating change crossed.
pub fn highest_crossed(old_elo: i64, new_elo: i64) -> Option<(i64, Rank)> {
    PROMOTION_TIERS
        .into_iter()
        .filter(|(threshold, _)| old_elo < *threshold && *threshold <= new_elo)
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_boundaries() {
        assert_eq!(Rank::for_rating(0), Rank::Unranked);
        assert_eq!(Rank::for_rating(1399), Rank::Unranked);
        assert_eq!(Rank::for_rating(1400), Rank::Bronze);
        assert_eq!(Rank::for_rating(1599), Rank::Bronze);
        assert_eq!(Rank::for_rating(1600), Rank::Silver);
        assert_eq!(Rank::for_rating(1800), Rank::Gold);
        assert_eq!(Rank::for_rating(1999), Rank::Gold);
        assert_eq!(Rank::for_rating(2000), Rank::Emerald);
        assert_eq!(Rank::for_rating(2500), Rank::Emerald);
    }

    #[test]
    fn single_tier_crossing() {
        assert_eq!(first_crossed(1500, 1600), Some((1600, Rank::Silver)));
        assert_eq!(first_crossed(1600, 1650), None);
        assert_eq!(first_crossed(1650, 1500), None);
    }

    #[test]
    fn multi_tier_jump_first_vs_highest() {
        assert_eq!(first_crossed(1350, 2100), Some((1400, Rank::Bronze)));
        assert_eq!(highest_crossed(1350, 2100), Some((2000, Rank::Emerald)));
    }

    #[test]
    fn exact_threshold_landing_counts_as_crossed() {
        assert_eq!(first_crossed(1399, 1400), Some((1400, Rank::Bronze)));
        assert_eq!(first_crossed(1400, 1400), None);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Rank::Emerald).unwrap(), "\"emerald\"");
        assert_eq!(Rank::Silver.as_str(), "silver");
    }
}
