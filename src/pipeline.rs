//! Enrichment Pipeline
//!
//! Runs summarization and credibility assessment for every search hit and
//! assembles the results for display:
//!
//! - Output order always matches input order.
//! - Results are enriched at most `concurrency` at a time. A result whose
//!   enrichment panics is kept with fallback values; the others are
//!   unaffected.
//! - Enrichment is owned by the caller's future, so dropping a request
//!   cancels its outstanding model calls.
//! - Display content is truncated here, after summarization, so the
//!   summarizer always sees the full text.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use futures::FutureExt;
use tracing::{debug, error, info};

use crate::enrichment::ResultEnricher;
use crate::models::{EnrichedResult, RawResult};

/// Summary used when enriching a result failed outright.
pub const FALLBACK_SUMMARY: &str = "Summary unavailable";
/// Credibility label used when enriching a result failed outright.
pub const FALLBACK_CREDIBILITY: &str = "Unknown";

/// Longest display excerpt, in characters, before the ellipsis.
pub const DISPLAY_CONTENT_CHARS: usize = 500;
pub const ELLIPSIS: &str = "...";

const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Clone)]
pub struct EnrichmentPipeline {
    enricher: Arc<dyn ResultEnricher>,
    concurrency: usize,
}

impl EnrichmentPipeline {
    pub fn new(enricher: Arc<dyn ResultEnricher>) -> Self {
        Self {
            enricher,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Results enriched at the same time; 0 is treated as 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Enrich `results` for `query`, keeping only the first `limit` when given.
    pub async fn enrich(
        &self,
        results: Vec<RawResult>,
        query: &str,
        limit: Option<usize>,
    ) -> Vec<EnrichedResult> {
        let limit = limit.unwrap_or(results.len());
        info!(
            total = results.len(),
            limit,
            concurrency = self.concurrency,
            "Enriching search results"
        );

        let tasks = results.into_iter().take(limit).enumerate().map(|(index, raw)| {
            let enricher = self.enricher.clone();
            let query = query.to_string();
            async move { enrich_one(enricher, raw, query, index).await }
        });

        stream::iter(tasks)
            .buffered(self.concurrency)
            .collect()
            .await
    }
}

async fn enrich_one(
    enricher: Arc<dyn ResultEnricher>,
    raw: RawResult,
    query: String,
    index: usize,
) -> EnrichedResult {
    let work = async {
        tokio::join!(
            enricher.summarize(&raw.content, &query),
            enricher.assess_credibility(&raw),
        )
    };

    let outcome = AssertUnwindSafe(work).catch_unwind().await;
    match outcome {
        Ok((summary, credibility)) => {
            debug!(index, url = %raw.url, "Result enriched");
            assemble(raw, summary, credibility)
        }
        Err(panic) => {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_default();
            error!(index, url = %raw.url, reason = %reason, "Error processing result");
            assemble(
                raw,
                FALLBACK_SUMMARY.to_string(),
                FALLBACK_CREDIBILITY.to_string(),
            )
        }
    }
}

fn assemble(raw: RawResult, summary: String, credibility_score: String) -> EnrichedResult {
    EnrichedResult {
        content: truncate_for_display(&raw.content),
        title: raw.title,
        url: raw.url,
        summary,
        credibility_score,
        source_type: raw.source_type,
        publication_date: raw.publication_date,
        relevance_score: raw.relevance_score,
    }
}

/// Cut `content` to [`DISPLAY_CONTENT_CHARS`] characters plus an ellipsis.
pub fn truncate_for_display(content: &str) -> String {
    match content.char_indices().nth(DISPLAY_CONTENT_CHARS) {
        Some((byte_index, _)) => format!("{}{}", &content[..byte_index], ELLIPSIS),
        None => content.to_string(),
    }
}
