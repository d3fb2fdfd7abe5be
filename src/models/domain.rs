use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use super::enums::{ActivityCategory, FitnessGoal, FitnessLevel, GenderPreference, MatchStatus, TimeSlot};

/// Geographic coordinates in degrees
///
/// Latitude and longitude only ever travel together, so a profile either has
/// a complete location or none at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Build coordinates from two nullable columns; half a location is no location
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self { latitude, longitude }),
            _ => None,
        }
    }
}

/// Catalog entry for a workout activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i32,
    pub name: String,
    pub category: ActivityCategory,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// An activity attached to a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileActivity {
    pub activity: Activity,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileGoal {
    pub goal: FitnessGoal,
    /// 1 is the most important goal
    pub priority: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSchedule {
    pub day_of_week: Weekday,
    pub time_slot: TimeSlot,
    pub is_available: bool,
}

impl ProfileSchedule {
    pub fn available(day_of_week: Weekday, time_slot: TimeSlot) -> Self {
        Self {
            day_of_week,
            time_slot,
            is_available: true,
        }
    }

    pub fn slot(&self) -> (Weekday, TimeSlot) {
        (self.day_of_week, self.time_slot)
    }
}

/// What a profile is looking for in a partner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingPreference {
    pub max_distance_miles: u32,
    #[serde(default)]
    pub min_age: Option<i32>,
    #[serde(default)]
    pub max_age: Option<i32>,
    pub gender_preference: GenderPreference,
    pub prefer_similar_fitness_level: bool,
    /// How many levels apart is acceptable
    pub fitness_level_tolerance: i32,
    pub prefer_home_gym: bool,
    pub prefer_public_gym: bool,
    pub prefer_outdoor: bool,
    pub open_to_group_workouts: bool,
    pub max_group_size: i32,
}

impl MatchingPreference {
    /// Permissive preference used when a profile never saved one
    pub fn synthesized(radius_miles: u32) -> Self {
        Self {
            max_distance_miles: radius_miles,
            gender_preference: GenderPreference::Any,
            prefer_similar_fitness_level: true,
            fitness_level_tolerance: 1,
            ..Self::default()
        }
    }

    pub fn has_age_bounds(&self) -> bool {
        self.min_age.is_some() || self.max_age.is_some()
    }
}

impl Default for MatchingPreference {
    fn default() -> Self {
        Self {
            max_distance_miles: 5,
            min_age: None,
            max_age: None,
            gender_preference: GenderPreference::Any,
            prefer_similar_fitness_level: true,
            fitness_level_tolerance: 1,
            prefer_home_gym: false,
            prefer_public_gym: true,
            prefer_outdoor: true,
            open_to_group_workouts: true,
            max_group_size: 4,
        }
    }
}

/// Read-only snapshot of a profile and everything matching needs from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i32,
    pub user_id: i32,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    #[serde(default)]
    pub location: Option<Coordinates>,
    #[serde(default)]
    pub fitness_level: FitnessLevel,
    #[serde(default)]
    pub has_home_gym: bool,
    #[serde(default)]
    pub activities: Vec<ProfileActivity>,
    #[serde(default)]
    pub goals: Vec<ProfileGoal>,
    #[serde(default)]
    pub schedules: Vec<ProfileSchedule>,
    #[serde(default)]
    pub matching_preference: Option<MatchingPreference>,
}

impl Profile {
    /// Name shown to other users, falling back to "First L."
    pub fn display_name_or_initials(&self) -> String {
        if let Some(name) = &self.display_name {
            return name.clone();
        }

        let first = self.first_name.as_deref().unwrap_or("");
        let initial = self
            .last_name
            .as_deref()
            .and_then(|last| last.chars().next())
            .map(String::from)
            .unwrap_or_default();

        format!("{} {}.", first, initial)
    }

    pub fn activity_names(&self) -> impl Iterator<Item = &str> {
        self.activities.iter().map(|a| a.activity.name.as_str())
    }

    /// Goal of each stored row, in row order; duplicates are kept
    pub fn goal_kinds(&self) -> impl Iterator<Item = FitnessGoal> + '_ {
        self.goals.iter().map(|g| g.goal)
    }

    pub fn available_slots(&self) -> impl Iterator<Item = (Weekday, TimeSlot)> + '_ {
        self.schedules
            .iter()
            .filter(|s| s.is_available)
            .map(ProfileSchedule::slot)
    }
}

/// A match request between two profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: i32,
    pub requester_id: i32,
    pub requestee_id: i32,
    pub status: MatchStatus,
    pub compatibility_score: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub responded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_interaction_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub initial_message: Option<String>,
    /// Activities both profiles shared when the request was made
    #[serde(default)]
    pub shared_activities: Vec<String>,
}

impl Match {
    /// Whether this match involves both profiles, in either direction
    pub fn connects(&self, a: i32, b: i32) -> bool {
        (self.requester_id == a && self.requestee_id == b)
            || (self.requester_id == b && self.requestee_id == a)
    }

    /// The other side of the pair, if `profile_id` is part of it
    pub fn partner_of(&self, profile_id: i32) -> Option<i32> {
        if self.requester_id == profile_id {
            Some(self.requestee_id)
        } else if self.requestee_id == profile_id {
            Some(self.requester_id)
        } else {
            None
        }
    }
}

/// Maximum points each compatibility factor can contribute
///
/// The factors are summed without normalisation or clamping; with the
/// defaults a perfect candidate scores 115, not 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub distance: f64,
    pub activities: f64,
    pub schedule: f64,
    pub fitness_level: f64,
    pub points_per_shared_goal: f64,
    pub goal_cap: f64,
    pub home_gym: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            distance: 40.0,
            activities: 30.0,
            schedule: 20.0,
            fitness_level: 10.0,
            points_per_shared_goal: 3.0,
            goal_cap: 10.0,
            home_gym: 5.0,
        }
    }
}

fn default_true() -> bool { true }
