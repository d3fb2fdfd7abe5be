use std::collections::HashSet;

use async_trait::async_trait;

use crate::models::{Match, MatchStatus, Profile};
use crate::services::repository::{MatchRepository, ProfileRepository, RepositoryError};

/// Point-in-time snapshot of profiles and matches held in memory
///
/// Serves both repository traits, so a host that already has the data loaded
/// (or a test) can run the engine without a database. Candidate listing
/// returns profiles without coordinates as-is; the filter pipeline drops them.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    profiles: Vec<Profile>,
    matches: Vec<Match>,
}

impl InMemoryStore {
    pub fn new(profiles: Vec<Profile>, matches: Vec<Match>) -> Self {
        Self { profiles, matches }
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profiles.push(profile);
        self
    }

    pub fn with_match(mut self, m: Match) -> Self {
        self.matches.push(m);
        self
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn get_profile_with_relations(&self, user_id: i32) -> Result<Option<Profile>, RepositoryError> {
        Ok(self.profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn list_candidate_profiles(
        &self,
        exclude_profile_id: i32,
        exclude_profile_ids: &HashSet<i32>,
    ) -> Result<Vec<Profile>, RepositoryError> {
        Ok(self
            .profiles
            .iter()
            .filter(|p| p.id != exclude_profile_id && !exclude_profile_ids.contains(&p.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MatchRepository for InMemoryStore {
    async fn list_non_excluded_match_partner_ids(&self, profile_id: i32) -> Result<HashSet<i32>, RepositoryError> {
        Ok(self
            .matches
            .iter()
            .filter(|m| m.status.blocks_rematch())
            .filter_map(|m| m.partner_of(profile_id))
            .collect())
    }

    async fn match_exists(
        &self,
        profile_a: i32,
        profile_b: i32,
        excluded_statuses: &[MatchStatus],
    ) -> Result<bool, RepositoryError> {
        Ok(self
            .matches
            .iter()
            .any(|m| m.connects(profile_a, profile_b) && !excluded_statuses.contains(&m.status)))
    }
}
