//! Result Enrichment
//!
//! Turns a raw search hit into a clinical summary and a credibility label by
//! calling a language model. Enrichment is never fatal: every failure is
//! logged and replaced by one of the sentinel strings below, scoped to the
//! single result being processed.

pub mod client;
pub mod credibility;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::RawResult;

pub use client::EnrichmentClient;
pub use credibility::{format_credibility, CredibilityAssessment};

/// Returned by `summarize` when no language model is configured.
pub const SUMMARY_NOT_CONFIGURED: &str = "Summary unavailable - language model service not configured";
/// Returned by `summarize` when the model call fails.
pub const SUMMARY_FAILED: &str = "Summary unavailable due to processing error";
/// Returned by `summarize` when the model replies with nothing.
pub const SUMMARY_UNAVAILABLE: &str = "Summary unavailable";
/// Returned by `assess_credibility` on any failure.
pub const CREDIBILITY_UNAVAILABLE: &str = "Credibility assessment unavailable";

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("language model not configured")]
    NotConfigured,

    #[error("language model call failed: {0}")]
    Llm(String),

    #[error("language model returned an empty response")]
    EmptyResponse,

    #[error("malformed structured response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Per-result enrichment. Implementations must not fail: errors degrade to
/// sentinel values.
#[async_trait]
pub trait ResultEnricher: Send + Sync {
    async fn summarize(&self, content: &str, query_context: &str) -> String;

    async fn assess_credibility(&self, source: &RawResult) -> String;

    /// Clinical questions about a topic; empty on failure.
    async fn generate_questions(&self, topic: &str) -> Vec<String>;

    fn is_configured(&self) -> bool;
}
