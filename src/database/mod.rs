pub mod members;
pub mod models;
pub mod players;
pub mod promotions;
pub mod reports;
pub mod users;

pub use members::MemberRepository;
pub use models::*;
pub use players::PlayerRepository;
pub use promotions::PromotionRepository;
pub use reports::ReportRepository;
pub use users::UserRepository;

/// Collection names shared with the hosted store.
pub const USERS: &str = "users";
pub const NON_PARTICIPANTS: &str = "nonParticipants";
pub const MEMBERS: &str = "members";
pub const PENDING_REPORTS: &str = "pendingMatches";
pub const APPROVED_REPORTS: &str = "approvedMatches";
pub const PROMOTIONS: &str = "promotions";
