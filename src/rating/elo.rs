/// Starting rating assigned to players without one
pub const DEFAULT_RATING: i64 = 1200;

/// Default K-factor (maximum rating swing per match)
pub const DEFAULT_K_FACTOR: f64 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRatings {
    pub new_winner_rating: i64,
    pub new_loser_rating: i64,
}

/// Compute both players' new ratings after a match.
/// The K-factor is per call so divisions can tune it without touching the formula.
pub fn compute_ratings(winner_rating: i64, loser_rating: i64, k_factor: f64) -> MatchRatings {
    let expected_winner = expected_score(winner_rating, loser_rating);
    let expected_loser = expected_score(loser_rating, winner_rating);

    let new_winner = winner_rating as f64 + k_factor * (1.0 - expected_winner);
    let new_loser = loser_rating as f64 + k_factor * (0.0 - expected_loser);

    MatchRatings {
        new_winner_rating: new_winner.round() as i64,
        new_loser_rating: new_loser.round() as i64,
    }
}

fn expected_score(rating: i64, opponent_rating: i64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent_rating - rating) as f64 / 400.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_ratings() {
        let ratings = compute_ratings(1200, 1200, DEFAULT_K_FACTOR);
        assert_eq!(ratings.new_winner_rating, 1216);
        assert_eq!(ratings.new_loser_rating, 1184);
    }

    #[test]
    fn equal_ratings_gain_mirrors_loss() {
        for r in [800, 1200, 1500, 2100] {
            let ratings = compute_ratings(r, r, DEFAULT_K_FACTOR);
            assert_eq!(ratings.new_winner_rating - r, r - ratings.new_loser_rating);
        }
    }

    #[test]
    fn symmetric_under_reversal() {
        for a in (900..=2100).step_by(150) {
            for b in (900..=2100).step_by(150) {
                let forward = compute_ratings(a, b, DEFAULT_K_FACTOR);
                let reversed = compute_ratings(b, a, DEFAULT_K_FACTOR);
                assert_eq!(
                    forward.new_winner_rating - a,
                    -(reversed.new_loser_rating - a),
                    "winner gain at {a} vs {b} must mirror loser loss in the reversed match"
                );
            }
        }
    }

    #[test]
    fn winner_gains_and_loser_drops_for_positive_k() {
        for (w, l) in [(1000, 1400), (1400, 1000), (1200, 1200), (2000, 1999)] {
            let ratings = compute_ratings(w, l, DEFAULT_K_FACTOR);
            assert!(ratings.new_winner_rating > w);
            assert!(ratings.new_loser_rating < l);
        }
    }

    #[test]
    fn zero_k_changes_nothing() {
        let ratings = compute_ratings(1337, 1205, 0.0);
        assert_eq!(ratings.new_winner_rating, 1337);
        assert_eq!(ratings.new_loser_rating, 1205);
    }

    #[test]
    fn underdog_gains_more_than_favorite() {
        let underdog = compute_ratings(1000, 1400, DEFAULT_K_FACTOR);
        let favorite = compute_ratings(1400, 1000, DEFAULT_K_FACTOR);
        assert!(underdog.new_winner_rating - 1000 > 16);
        assert!(favorite.new_winner_rating - 1400 < 16);
    }
}
