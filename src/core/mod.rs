// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod matcher;
pub mod scoring;

pub use distance::{bounding_box_miles, distance_between, distance_miles, is_within_bounding_box, BoundingBox};
pub use filters::{age_in_range, age_on, filter_candidates, matches_age_preference, within_radius, FilteredCandidate};
pub use matcher::{effective_preference, CandidatePool, MatchResult, Matcher};
pub use scoring::{calculate_compatibility_score, common_activities, score_breakdown, ScoreBreakdown};
