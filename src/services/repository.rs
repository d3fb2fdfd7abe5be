use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{MatchStatus, Profile, UnknownCode};

/// Errors raised by the data collaborators the engine reads from
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Repository call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

impl From<UnknownCode> for RepositoryError {
    fn from(value: UnknownCode) -> Self {
        RepositoryError::InvalidData(value.to_string())
    }
}

/// Read access to profiles and their relations
///
/// Every profile returned carries its activities, goals and schedules. The
/// requester lookup also carries the matching preference; candidates may
/// leave it empty.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Load the profile owned by `user_id`, if there is one
    async fn get_profile_with_relations(&self, user_id: i32) -> Result<Option<Profile>, RepositoryError>;

    /// Load every profile except `exclude_profile_id` and `exclude_profile_ids`
    ///
    /// Implementations may or may not drop profiles without coordinates.
    async fn list_candidate_profiles(
        &self,
        exclude_profile_id: i32,
        exclude_profile_ids: &HashSet<i32>,
    ) -> Result<Vec<Profile>, RepositoryError>;
}

/// Read access to existing match relationships
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// Profiles paired with `profile_id` in either direction by a match whose
    /// status still blocks re-matching (anything but Rejected or Expired)
    async fn list_non_excluded_match_partner_ids(&self, profile_id: i32) -> Result<HashSet<i32>, RepositoryError>;

    /// Whether a match links the two profiles, in either direction, with a
    /// status outside `excluded_statuses`
    async fn match_exists(
        &self,
        profile_a: i32,
        profile_b: i32,
        excluded_statuses: &[MatchStatus],
    ) -> Result<bool, RepositoryError>;
}
