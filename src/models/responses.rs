use serde::{Deserialize, Serialize};

use super::enums::FitnessLevel;

/// One ranked candidate as shown to the requesting user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileMatch {
    pub profile_id: i32,
    pub display_name: String,
    /// None when the candidate never entered a date of birth
    pub age: Option<i32>,
    pub profile_picture_url: Option<String>,
    pub bio: Option<String>,
    /// Miles, rounded to one decimal place
    pub distance: f64,
    pub compatibility_score: f64,
    pub fitness_level: FitnessLevel,
    pub has_home_gym: bool,
    pub activities: Vec<String>,
    pub goals: Vec<String>,
    pub common_activities: Vec<String>,
}

/// Response for a potential matches query
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PotentialMatchesResponse {
    pub matches: Vec<ProfileMatch>,
    /// Candidates loaded before the radius and age filters ran
    pub total_candidates: usize,
    pub radius_miles: f64,
    pub limit: usize,
}

/// Error body printed for failed queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
