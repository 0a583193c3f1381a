use std::sync::Arc;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::Config;
use crate::enrichment::ResultEnricher;
use crate::pipeline::EnrichmentPipeline;
use crate::search::SearchProvider;

/// Longest query accepted, in characters.
pub const MAX_QUERY_CHARS: u64 = 200;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub search: Arc<dyn SearchProvider>,
    pub enricher: Arc<dyn ResultEnricher>,
    pub pipeline: EnrichmentPipeline,
}

impl AppState {
    pub fn new(
        config: Config,
        search: Arc<dyn SearchProvider>,
        enricher: Arc<dyn ResultEnricher>,
    ) -> Self {
        let pipeline = EnrichmentPipeline::new(enricher.clone())
            .with_concurrency(config.enrichment.concurrency);
        Self {
            config,
            search,
            enricher,
            pipeline,
        }
    }
}

/// A search hit as returned by the search provider, before enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawResult {
    pub title: String,
    pub url: String,
    pub content: String,
    pub source_type: String,
    pub publication_date: String,
    pub relevance_score: f64,
}

/// A search hit with its generated summary and credibility label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedResult {
    pub title: String,
    pub url: String,
    /// Display excerpt, truncated to 500 characters
    pub content: String,
    pub summary: String,
    pub credibility_score: String,
    pub source_type: String,
    pub publication_date: String,
    pub relevance_score: f64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Please enter a medical question or search term.")]
    Empty,

    #[error("Your search query is quite long. For better results, try using shorter, more specific medical terms.")]
    TooLong,
}

/// A trimmed, non-empty, length-bounded search query.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct SearchQuery {
    #[validate(length(min = 1, max = MAX_QUERY_CHARS))]
    text: String,
}

impl SearchQuery {
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let query = Self {
            text: raw.trim().to_string(),
        };

        match query.validate() {
            Ok(()) => Ok(query),
            Err(_) if query.text.is_empty() => Err(QueryError::Empty),
            Err(_) => Err(QueryError::TooLong),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

// Request / response payloads

#[derive(Debug, Clone, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<EnrichedResult>,
    pub total_results: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionsRequest {
    #[serde(default)]
    pub topic: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub topic: String,
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub search_configured: bool,
    pub llm_configured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_is_trimmed() {
        let query = SearchQuery::parse("  diabetes treatment \n").unwrap();
        assert_eq!(query.as_str(), "diabetes treatment");
    }

    #[test]
    fn test_empty_query_rejected() {
        assert_eq!(SearchQuery::parse(""), Err(QueryError::Empty));
        assert_eq!(SearchQuery::parse("   \t"), Err(QueryError::Empty));
    }

    #[test]
    fn test_query_length_bound() {
        let at_limit = "a".repeat(MAX_QUERY_CHARS as usize);
        assert!(SearchQuery::parse(&at_limit).is_ok());

        let over_limit = "a".repeat(MAX_QUERY_CHARS as usize + 1);
        assert_eq!(SearchQuery::parse(&over_limit), Err(QueryError::TooLong));
    }

    #[test]
    fn test_query_error_messages() {
        assert!(QueryError::Empty.to_string().contains("medical question"));
        assert!(QueryError::TooLong.to_string().contains("shorter"));
    }
}
