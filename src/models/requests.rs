use serde::{Deserialize, Serialize};
use validator::Validate;

/// Caller-facing query for potential matches
///
/// Bounds are enforced here, at the boundary. The engine itself accepts any
/// positive radius and limit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PotentialMatchesQuery {
    /// Maximum distance in miles
    #[validate(range(min = 1, max = 100, message = "Radius must be between 1 and 100 miles"))]
    #[serde(default)]
    pub radius: Option<u32>,
    /// Maximum number of results
    #[validate(range(min = 1, max = 50, message = "Limit must be between 1 and 50"))]
    #[serde(default)]
    pub limit: Option<u32>,
}

impl PotentialMatchesQuery {
    pub fn new(radius: Option<u32>, limit: Option<u32>) -> Self {
        Self { radius, limit }
    }

    pub fn radius_or(&self, default_radius: u32) -> u32 {
        self.radius.unwrap_or(default_radius)
    }

    pub fn limit_or(&self, default_limit: u32) -> u32 {
        self.limit.unwrap_or(default_limit)
    }
}
