//! Error types for the search client.

use thiserror::Error;

use crate::utils::Retryable;

/// Errors that can occur during search operations
#[derive(Debug, Error)]
pub enum SearchError {
    /// No API key was supplied; raised before any network call.
    #[error("Parallel.ai API key not configured")]
    NotConfigured,

    /// The provider rejected the API key.
    #[error("Invalid Parallel.ai API key")]
    Unauthorized,

    /// The provider throttled the request.
    #[error("Parallel.ai API rate limit exceeded")]
    RateLimited,

    /// Any other non-success status.
    #[error("Search service error: {status}")]
    Service { status: u16 },

    #[error("Search request timed out. Please try again.")]
    Timeout,

    #[error("Unable to connect to search service: {0}")]
    Connectivity(String),

    /// A 200 response whose body could not be read as search results.
    #[error("Invalid response from search service: {0}")]
    InvalidResponse(String),
}

impl Retryable for SearchError {
    fn is_retryable(&self) -> bool {
        matches!(self, SearchError::Timeout | SearchError::Connectivity(_))
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SearchError::Timeout
        } else {
            SearchError::Connectivity(e.to_string())
        }
    }
}
