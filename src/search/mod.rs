//! Search Module
//!
//! Medical literature search backed by the Parallel.ai Search API.
//!
//! The [`SearchProvider`] trait is the seam the HTTP layer depends on, so the
//! concrete client is constructed once at startup and injected through
//! [`crate::models::AppState`].

pub mod error;
pub mod parallel;
pub mod sources;

use async_trait::async_trait;

use crate::models::RawResult;

pub use error::SearchError;
pub use parallel::ParallelSearchClient;
pub use sources::{determine_source_type, GENERIC_SOURCE_TYPE};

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run one search and return the usable results in provider order.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawResult>, SearchError>;

    /// Whether a credential is present.
    fn is_configured(&self) -> bool;

    fn default_max_results(&self) -> usize {
        10
    }
}
