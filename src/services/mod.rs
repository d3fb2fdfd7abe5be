// Service exports
pub mod candidate_pool;
pub mod matching;
pub mod memory;
pub mod postgres;
pub mod repository;

pub use candidate_pool::CandidatePoolBuilder;
pub use matching::{MatchingError, MatchingService};
pub use memory::InMemoryStore;
pub use postgres::PostgresClient;
pub use repository::{MatchRepository, ProfileRepository, RepositoryError};
