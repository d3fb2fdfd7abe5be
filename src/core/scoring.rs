use std::collections::HashSet;

use chrono::Weekday;

use crate::models::{MatchingPreference, Profile, ScoringWeights, TimeSlot};

/// Overlap ratio used when either side has no available slots at all
const NEUTRAL_SCHEDULE_OVERLAP: f64 = 0.5;

/// Per-factor contributions to a compatibility score
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub distance: f64,
    pub activities: f64,
    pub schedule: f64,
    pub fitness_level: f64,
    pub goals: f64,
    pub home_gym: f64,
}

impl ScoreBreakdown {
    /// Unclamped sum, rounded to two decimal places
    pub fn total(&self) -> f64 {
        round_to(
            self.distance
                + self.activities
                + self.schedule
                + self.fitness_level
                + self.goals
                + self.home_gym,
            2,
        )
    }
}

/// Calculate the compatibility score for a candidate
///
/// Scoring formula (default weights):
/// score = distance_points       # step: <=2mi 40, <=5mi 30, <=10mi 20, else 10
///       + activity_overlap * 30 # shared activities / requester's activities
///       + schedule_overlap * 20 # shared available slots / requester's slots
///       + level_points          # level gap 0 -> 10, 1 -> 7, 2 -> 3, else 0
///       + min(shared_goals * 3, 10)
///       + 5 if the requester prefers a home gym and the candidate has one
///
/// The sum is not clamped to 100.
pub fn calculate_compatibility_score(
    requester: &Profile,
    candidate: &Profile,
    distance_miles: f64,
    preferences: &MatchingPreference,
    weights: &ScoringWeights,
) -> f64 {
    score_breakdown(requester, candidate, distance_miles, preferences, weights).total()
}

/// Compute each factor separately
pub fn score_breakdown(
    requester: &Profile,
    candidate: &Profile,
    distance_miles: f64,
    preferences: &MatchingPreference,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    ScoreBreakdown {
        distance: weights.distance * distance_factor(distance_miles),
        activities: weights.activities * activity_overlap(requester, candidate),
        schedule: weights.schedule * schedule_overlap(requester, candidate),
        fitness_level: weights.fitness_level
            * fitness_level_factor(requester.fitness_level.distance_to(candidate.fitness_level)),
        goals: goal_bonus(requester, candidate, weights),
        home_gym: if preferences.prefer_home_gym && candidate.has_home_gym {
            weights.home_gym
        } else {
            0.0
        },
    }
}

/// Activity names both profiles share, in the requester's order
///
/// Names are compared exactly, so "Yoga" and "yoga" are different activities.
pub fn common_activities(requester: &Profile, candidate: &Profile) -> Vec<String> {
    let theirs: HashSet<&str> = candidate.activity_names().collect();
    let mut seen = HashSet::new();

    requester
        .activity_names()
        .filter(|name| theirs.contains(name) && seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Step function over distance; a candidate at 2.01 miles loses a full step
#[inline]
fn distance_factor(distance_miles: f64) -> f64 {
    if distance_miles <= 2.0 {
        1.0
    } else if distance_miles <= 5.0 {
        0.75
    } else if distance_miles <= 10.0 {
        0.5
    } else {
        0.25
    }
}

/// Share of the requester's activities the candidate also does (0-1)
#[inline]
fn activity_overlap(requester: &Profile, candidate: &Profile) -> f64 {
    if requester.activities.is_empty() {
        return 0.0;
    }

    common_activities(requester, candidate).len() as f64 / requester.activities.len() as f64
}

/// Share of the requester's available slots the candidate is also free for (0-1)
#[inline]
fn schedule_overlap(requester: &Profile, candidate: &Profile) -> f64 {
    let ours: Vec<(Weekday, TimeSlot)> = requester.available_slots().collect();
    let theirs: HashSet<(Weekday, TimeSlot)> = candidate.available_slots().collect();

    if ours.is_empty() || theirs.is_empty() {
        return NEUTRAL_SCHEDULE_OVERLAP;
    }

    let common = ours.iter().filter(|slot| theirs.contains(*slot)).count();
    common as f64 / ours.len() as f64
}

#[inline]
fn fitness_level_factor(level_gap: u8) -> f64 {
    match level_gap {
        0 => 1.0,
        1 => 0.7,
        2 => 0.3,
        _ => 0.0,
    }
}

#[inline]
fn goal_bonus(requester: &Profile, candidate: &Profile, weights: &ScoringWeights) -> f64 {
    let ours: HashSet<_> = requester.goal_kinds().collect();
    let theirs: HashSet<_> = candidate.goal_kinds().collect();
    let shared = ours.intersection(&theirs).count();

    (shared as f64 * weights.points_per_shared_goal).min(weights.goal_cap)
}

/// Round half to even, the way stored scores and distances are rounded
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}
