// Model exports
pub mod domain;
pub mod enums;
pub mod requests;
pub mod responses;

pub use domain::{Activity, Coordinates, Match, MatchingPreference, Profile, ProfileActivity, ProfileGoal, ProfileSchedule, ScoringWeights};
pub use enums::{ActivityCategory, FitnessGoal, FitnessLevel, GenderPreference, MatchStatus, TimeSlot, UnknownCode};
pub use requests::PotentialMatchesQuery;
pub use responses::{ErrorResponse, PotentialMatchesResponse, ProfileMatch};
