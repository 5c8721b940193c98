pub mod elo;
pub mod ranks;

pub use elo::{compute_ratings, MatchRatings, DEFAULT_K_FACTOR, DEFAULT_RATING};
pub use ranks::{first_crossed, highest_crossed, Rank, PROMOTION_TIERS};
