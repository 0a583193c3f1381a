// MedLit Search - medical literature search with LLM enrichment

pub mod config;
pub mod models;
pub mod types;
pub mod llm;
pub mod search;      // Search API (Parallel.ai)
pub mod enrichment;  // Summaries, credibility, clinical questions
pub mod pipeline;
pub mod routes;
pub mod middleware;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
