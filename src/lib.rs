//! Fit Match - partner recommendations for a fitness social platform
//!
//! Given a user, loads their profile and every eligible candidate, drops
//! anyone outside the search radius or the requester's age bounds, scores
//! the rest on distance, shared activities, schedule overlap, fitness level,
//! shared goals and home-gym access, and returns the best-ranked matches.
//!
//! The pure pipeline lives in [`core`]; [`services`] wires it to the data
//! repositories.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use core::{distance::{bounding_box_miles, distance_miles}, Matcher};
pub use models::{PotentialMatchesQuery, PotentialMatchesResponse, Profile, ProfileMatch, ScoringWeights};
pub use services::{InMemoryStore, MatchingError, MatchingService};
