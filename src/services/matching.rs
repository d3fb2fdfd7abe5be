use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use config::ConfigError;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::config::Settings;
use crate::core::{MatchResult, Matcher};
use crate::models::{
    ErrorResponse, PotentialMatchesQuery, PotentialMatchesResponse, ProfileMatch, ScoringWeights,
};
use crate::services::candidate_pool::CandidatePoolBuilder;
use crate::services::repository::{MatchRepository, ProfileRepository, RepositoryError};

const DEFAULT_RADIUS_MILES: u32 = 5;
const DEFAULT_LIMIT: u32 = 20;

/// Errors that end a potential matches request
#[derive(Debug, Error)]
pub enum MatchingError {
    #[error("User profile not found for user {0}. Please complete your profile first.")]
    ProfileNotFound(i32),

    #[error("Location not set for profile {0}. Please update your location in your profile.")]
    LocationMissing(i32),

    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] ValidationErrors),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl MatchingError {
    /// Whether the caller can fix this themselves
    pub fn is_client_error(&self) -> bool {
        !matches!(self, MatchingError::Repository(_))
    }

    /// Stable machine-readable code for the error body
    pub fn code(&self) -> &'static str {
        match self {
            MatchingError::ProfileNotFound(_) => "profile_not_found",
            MatchingError::LocationMissing(_) => "location_missing",
            MatchingError::InvalidQuery(_) => "invalid_query",
            MatchingError::Repository(RepositoryError::Timeout(_)) => "timeout",
            MatchingError::Repository(_) => "internal_error",
        }
    }
}

impl From<&MatchingError> for ErrorResponse {
    fn from(err: &MatchingError) -> Self {
        // Infrastructure details stay in the logs
        let message = if err.is_client_error() {
            err.to_string()
        } else {
            "Failed to load potential matches".to_string()
        };

        ErrorResponse {
            error: err.code().to_string(),
            message,
        }
    }
}

/// Entry point for potential match queries
///
/// Stateless apart from its collaborators: concurrent requests share nothing
/// mutable. Dropping the returned future cancels any outstanding repository
/// call and nothing partial is returned.
#[derive(Clone)]
pub struct MatchingService {
    pool_builder: CandidatePoolBuilder,
    matcher: Matcher,
    default_radius_miles: u32,
    default_limit: u32,
}

impl MatchingService {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        matches: Arc<dyn MatchRepository>,
        matcher: Matcher,
    ) -> Self {
        Self {
            pool_builder: CandidatePoolBuilder::new(profiles, matches),
            matcher,
            default_radius_miles: DEFAULT_RADIUS_MILES,
            default_limit: DEFAULT_LIMIT,
        }
    }

    /// Build a service with weights, defaults and timeouts from configuration
    ///
    /// Fails when a configured scoring weight is negative or not finite.
    pub fn from_settings(
        profiles: Arc<dyn ProfileRepository>,
        matches: Arc<dyn MatchRepository>,
        settings: &Settings,
    ) -> Result<Self, ConfigError> {
        let weights = ScoringWeights::try_from(&settings.scoring.weights)?;
        let matching = &settings.matching;

        Ok(Self::new(profiles, matches, Matcher::new(weights))
            .with_defaults(
                matching.default_radius_miles.unwrap_or(DEFAULT_RADIUS_MILES),
                matching.default_limit.unwrap_or(DEFAULT_LIMIT),
            )
            .with_call_timeout(matching.repository_timeout_secs.map(Duration::from_secs)))
    }

    pub fn with_defaults(mut self, radius_miles: u32, limit: u32) -> Self {
        self.default_radius_miles = radius_miles;
        self.default_limit = limit;
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Option<Duration>) -> Self {
        self.pool_builder = self.pool_builder.with_call_timeout(call_timeout);
        self
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Ranked potential matches for the user, as of today's date
    ///
    /// `radius_miles` and `limit` are used as given; bounds checking belongs
    /// to the caller (see [`MatchingService::query`]).
    pub async fn get_potential_matches(
        &self,
        user_id: i32,
        radius_miles: f64,
        limit: usize,
    ) -> Result<Vec<ProfileMatch>, MatchingError> {
        let today = chrono::Local::now().date_naive();
        let result = self
            .get_potential_matches_on(user_id, radius_miles, limit, today)
            .await?;

        Ok(result.matches)
    }

    /// Same as [`MatchingService::get_potential_matches`] with a fixed date
    /// for age computation
    pub async fn get_potential_matches_on(
        &self,
        user_id: i32,
        radius_miles: f64,
        limit: usize,
        today: NaiveDate,
    ) -> Result<MatchResult, MatchingError> {
        tracing::info!(user_id, radius_miles, limit, "Finding potential matches");

        let pool = self.pool_builder.build(user_id).await?;
        let result = self.matcher.find_matches(pool, radius_miles, limit, today);

        tracing::info!(
            user_id,
            matches = result.matches.len(),
            total_candidates = result.total_candidates,
            "Returning potential matches"
        );

        Ok(result)
    }

    /// Validate a caller query, fill in defaults and run it
    pub async fn query(
        &self,
        user_id: i32,
        query: &PotentialMatchesQuery,
    ) -> Result<PotentialMatchesResponse, MatchingError> {
        if let Err(errors) = query.validate() {
            tracing::info!(user_id, ?query, "Rejected potential matches query: {}", errors);
            return Err(errors.into());
        }

        let radius_miles = f64::from(query.radius_or(self.default_radius_miles));
        let limit = query.limit_or(self.default_limit) as usize;
        let today = chrono::Local::now().date_naive();

        let result = self
            .get_potential_matches_on(user_id, radius_miles, limit, today)
            .await?;

        Ok(PotentialMatchesResponse {
            matches: result.matches,
            total_candidates: result.total_candidates,
            radius_miles,
            limit,
        })
    }
}
