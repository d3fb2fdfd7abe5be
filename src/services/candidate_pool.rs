use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::core::CandidatePool;
use crate::services::matching::MatchingError;
use crate::services::repository::{MatchRepository, ProfileRepository, RepositoryError};

/// Loads the requester and everyone they could be matched with
///
/// Excludes the requester, every profile already paired with them by a
/// match that blocks re-matching, and (when the repository honours it)
/// profiles without coordinates.
#[derive(Clone)]
pub struct CandidatePoolBuilder {
    profiles: Arc<dyn ProfileRepository>,
    matches: Arc<dyn MatchRepository>,
    call_timeout: Option<Duration>,
}

impl CandidatePoolBuilder {
    pub fn new(profiles: Arc<dyn ProfileRepository>, matches: Arc<dyn MatchRepository>) -> Self {
        Self {
            profiles,
            matches,
            call_timeout: None,
        }
    }

    /// Bound every repository call; an expired call fails the whole build
    pub fn with_call_timeout(mut self, call_timeout: Option<Duration>) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub async fn build(&self, user_id: i32) -> Result<CandidatePool, MatchingError> {
        let requester = self
            .bounded(self.profiles.get_profile_with_relations(user_id))
            .await?
            .ok_or(MatchingError::ProfileNotFound(user_id))?;

        let origin = requester
            .location
            .ok_or(MatchingError::LocationMissing(requester.id))?;

        let excluded = self
            .bounded(self.matches.list_non_excluded_match_partner_ids(requester.id))
            .await?;

        let candidates = self
            .bounded(self.profiles.list_candidate_profiles(requester.id, &excluded))
            .await?;

        tracing::debug!(
            user_id,
            profile_id = requester.id,
            excluded = excluded.len(),
            candidates = candidates.len(),
            "Candidate pool built"
        );

        Ok(CandidatePool {
            requester,
            origin,
            candidates,
        })
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, RepositoryError>
    where
        F: Future<Output = Result<T, RepositoryError>>,
    {
        match self.call_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(timeout = ?limit, "Repository call timed out");
                    Err(RepositoryError::Timeout(limit))
                }
            },
            None => call.await,
        }
    }
}
