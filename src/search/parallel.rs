//! Parallel.ai Search Client
//!
//! Sends one request per user query to the Parallel.ai Search API, asking
//! for evidence-based medical material:
//!
//! 1. The query is restated as an "objective" for the search processor.
//! 2. Up to two query variants with clinical context terms are attached to
//!    broaden recall. Only two are sent to stay under provider rate limits.
//! 3. Returned records are reshaped into [`RawResult`]s, classified by
//!    publisher domain, and short records are dropped as noise.
//!
//! Every failure is surfaced as a [`SearchError`]; nothing is cached.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::error::SearchError;
use super::sources::determine_source_type;
use super::SearchProvider;
use crate::config::SearchConfig;
use crate::models::RawResult;
use crate::utils::{with_retry, RetryPolicy};

pub const DEFAULT_BASE_URL: &str = "https://api.parallel.ai/v1beta/search";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Records with this many characters of content or fewer are discarded.
pub const MIN_CONTENT_CHARS: usize = 100;
/// Query variants sent per request.
const MAX_QUERY_VARIANTS: usize = 2;
const MAX_CHARS_PER_RESULT: u32 = 2000;
const PROCESSOR: &str = "base";
const TOPIC_MAX_RESULTS: usize = 8;
const DEFAULT_TITLE: &str = "Medical Literature";
const DEFAULT_DATE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParallelSearchRequest {
    pub objective: String,
    pub search_queries: Vec<String>,
    pub processor: String,
    pub max_results: usize,
    pub max_chars_per_result: u32,
}

#[derive(Debug, Deserialize)]
struct ParallelSearchResponse {
    #[serde(default)]
    results: Vec<ParallelResultRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct ParallelResultRecord {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    excerpts: Option<Vec<String>>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    publication_date: Option<String>,
    #[serde(default)]
    score: Option<f64>,
}

/// Client for the Parallel.ai Search API
#[derive(Debug, Clone)]
pub struct ParallelSearchClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    max_results: usize,
    retry_policy: RetryPolicy,
}

impl ParallelSearchClient {
    /// Create a client with the default endpoint and a 30 second timeout.
    pub fn new(api_key: impl Into<String>) -> Result<Self, SearchError> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self, SearchError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Connectivity(format!("failed to build HTTP client: {}", e)))?;

        let api_key = api_key.into();
        if api_key.is_empty() {
            warn!("PARALLEL_API_KEY environment variable not set");
        }

        Ok(Self {
            http_client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_results: 10,
            retry_policy: RetryPolicy::none(),
        })
    }

    /// Configure client from config
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        Ok(Self::with_timeout(
            config.parallel_api_key.clone(),
            Duration::from_secs(config.timeout_secs),
        )?
        .with_base_url(config.base_url.clone())
        .with_max_results(config.max_results)
        .with_retry_policy(RetryPolicy::none().with_max_attempts(config.max_attempts)))
    }

    /// Point the client at a different endpoint (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Search for medical literature about `query`.
    pub async fn search_medical_literature(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<RawResult>, SearchError> {
        if self.api_key.is_empty() {
            error!("Search attempted without an API key");
            return Err(SearchError::NotConfigured);
        }

        let payload = build_request(query, max_results);
        info!(query = %query, max_results, "Searching Parallel.ai for medical literature");

        let results = with_retry(&self.retry_policy, || self.send_request(&payload)).await?;

        info!(count = results.len(), "Found medical literature results");
        Ok(results)
    }

    /// Search a specific topic, optionally narrowed to a medical specialty.
    pub async fn search_topic(
        &self,
        topic: &str,
        specialty: &str,
    ) -> Result<Vec<RawResult>, SearchError> {
        self.search_medical_literature(&topic_query(topic, specialty), TOPIC_MAX_RESULTS)
            .await
    }

    async fn send_request(
        &self,
        payload: &ParallelSearchRequest,
    ) -> Result<Vec<RawResult>, SearchError> {
        debug!(url = %self.base_url, "Sending search request");

        let response = self
            .http_client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, timeout = e.is_timeout(), "Parallel.ai request error");
                SearchError::from(e)
            })?;

        let status = response.status();
        debug!(status = %status, "Received search response");

        match status {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED => return Err(SearchError::Unauthorized),
            StatusCode::TOO_MANY_REQUESTS => return Err(SearchError::RateLimited),
            other => {
                let body = response.text().await.unwrap_or_default();
                error!(status = other.as_u16(), body = %body, "Parallel.ai API error");
                return Err(SearchError::Service { status: other.as_u16() });
            }
        }

        let body = response.text().await.map_err(SearchError::from)?;
        let parsed: ParallelSearchResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Failed to parse search response");
            SearchError::InvalidResponse(e.to_string())
        })?;

        Ok(parsed.results.into_iter().filter_map(into_raw_result).collect())
    }
}

#[async_trait]
impl SearchProvider for ParallelSearchClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawResult>, SearchError> {
        self.search_medical_literature(query, max_results).await
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn default_max_results(&self) -> usize {
        self.max_results
    }
}

/// Query variants adding clinical context, most specific first.
pub fn query_variants(query: &str) -> Vec<String> {
    vec![
        format!("{} clinical evidence peer-reviewed", query),
        format!("{} medical research study", query),
        format!("{} treatment guidelines evidence", query),
        format!("{} diagnosis clinical practice", query),
    ]
}

pub fn build_request(query: &str, max_results: usize) -> ParallelSearchRequest {
    ParallelSearchRequest {
        objective: format!("Find evidence-based medical information about: {}", query),
        search_queries: query_variants(query)
            .into_iter()
            .take(MAX_QUERY_VARIANTS)
            .collect(),
        processor: PROCESSOR.to_string(),
        max_results,
        max_chars_per_result: MAX_CHARS_PER_RESULT,
    }
}

fn topic_query(topic: &str, specialty: &str) -> String {
    let specialty = specialty.trim();
    if specialty.is_empty() {
        format!("{} clinical evidence medical research", topic)
    } else {
        format!("{} {} clinical evidence medical research", topic, specialty)
    }
}

/// Reshape one provider record, or drop it if its content is too thin.
fn into_raw_result(record: ParallelResultRecord) -> Option<RawResult> {
    let content = match record.excerpts {
        Some(excerpts) if !excerpts.is_empty() => excerpts.join(" "),
        _ => record.content.unwrap_or_default(),
    };

    if content.trim().chars().count() <= MIN_CONTENT_CHARS {
        return None;
    }

    let url = record.url.unwrap_or_default();
    Some(RawResult {
        title: record.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        source_type: determine_source_type(&url).to_string(),
        url,
        content,
        publication_date: record
            .date
            .or(record.publication_date)
            .unwrap_or_else(|| DEFAULT_DATE.to_string()),
        relevance_score: record.score.unwrap_or(0.0),
    })
}
