use chrono::NaiveDate;

use crate::core::{
    filters::{age_on, filter_candidates, FilteredCandidate},
    scoring::{calculate_compatibility_score, common_activities, round_to},
};
use crate::models::{Coordinates, MatchingPreference, Profile, ProfileMatch, ScoringWeights};

/// Requester plus the raw candidates loaded for them
#[derive(Debug, Clone)]
pub struct CandidatePool {
    pub requester: Profile,
    /// Requester's location; a pool is never built for a profile without one
    pub origin: Coordinates,
    pub candidates: Vec<Profile>,
}

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<ProfileMatch>,
    pub total_candidates: usize,
}

/// Main matching orchestrator - implements the filter, score and rank pipeline
///
/// # Pipeline Stages
/// 1. Bounding box and haversine radius filter
/// 2. Age filter from the effective preference
/// 3. Compatibility scoring
/// 4. Ranking and truncation
///
/// The matcher is pure: it never performs I/O and gives the same output for
/// the same pool, radius, limit and date.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Find matches for the pool's requester
    ///
    /// # Arguments
    /// * `pool` - Requester and raw candidates
    /// * `radius_miles` - Hard distance cutoff, used as given
    /// * `limit` - Maximum number of matches to return
    /// * `today` - Date ages are computed against
    ///
    /// # Returns
    /// MatchResult with matches ordered by descending compatibility score
    pub fn find_matches(
        &self,
        pool: CandidatePool,
        radius_miles: f64,
        limit: usize,
        today: NaiveDate,
    ) -> MatchResult {
        let CandidatePool {
            requester,
            origin,
            candidates,
        } = pool;
        let total_candidates = candidates.len();

        let preferences = effective_preference(&requester, radius_miles);

        let candidates: Vec<Profile> = candidates
            .into_iter()
            .filter(|profile| profile.id != requester.id)
            .collect();

        let filtered = filter_candidates(&origin, candidates, &preferences, radius_miles, today);

        tracing::debug!(
            profile_id = requester.id,
            total_candidates,
            within_filters = filtered.len(),
            "Candidate pool filtered"
        );

        let mut scored_matches: Vec<ProfileMatch> = filtered
            .into_iter()
            .map(|candidate| self.to_profile_match(&requester, candidate, &preferences, today))
            .collect();

        // Sort by score (descending), then distance (ascending), then id
        scored_matches.sort_by(|a, b| {
            b.compatibility_score
                .total_cmp(&a.compatibility_score)
                .then_with(|| a.distance.total_cmp(&b.distance))
                .then_with(|| a.profile_id.cmp(&b.profile_id))
        });

        scored_matches.truncate(limit);

        MatchResult {
            matches: scored_matches,
            total_candidates,
        }
    }

    fn to_profile_match(
        &self,
        requester: &Profile,
        candidate: FilteredCandidate,
        preferences: &MatchingPreference,
        today: NaiveDate,
    ) -> ProfileMatch {
        let FilteredCandidate {
            profile,
            distance_miles,
        } = candidate;

        let compatibility_score = calculate_compatibility_score(
            requester,
            &profile,
            distance_miles,
            preferences,
            &self.weights,
        );

        ProfileMatch {
            profile_id: profile.id,
            display_name: profile.display_name_or_initials(),
            age: profile.date_of_birth.map(|dob| age_on(dob, today)),
            distance: round_to(distance_miles, 1),
            compatibility_score,
            fitness_level: profile.fitness_level,
            has_home_gym: profile.has_home_gym,
            activities: profile.activity_names().map(str::to_string).collect(),
            goals: profile.goal_kinds().map(|goal| goal.to_string()).collect(),
            common_activities: common_activities(requester, &profile),
            profile_picture_url: profile.profile_picture_url,
            bio: profile.bio,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// The requester's stored preference, or a permissive one built from the radius
pub fn effective_preference(requester: &Profile, radius_miles: f64) -> MatchingPreference {
    requester
        .matching_preference
        .clone()
        .unwrap_or_else(|| MatchingPreference::synthesized(radius_miles.round() as u32))
}
