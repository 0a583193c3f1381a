//! HTTP Routes
//!
//! - `/` - Search page
//! - `/search` - Form search, renders results
//! - `/api/search` - JSON search
//! - `/summarize` - Summarize arbitrary content
//! - `/api/questions` - Clinical questions for a topic
//! - `/api/health` - Health check

pub mod health;
pub mod search;
pub mod summarize;
pub mod ui;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::apply_cors;
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let origins = state.config.server.cors_allowed_origins.clone();

    let router = Router::new()
        .merge(ui::router())
        .merge(search::router(state.clone()))
        .merge(summarize::router(state.clone()))
        .merge(health::router(state))
        .fallback(ui::not_found)
        .layer(TraceLayer::new_for_http());

    apply_cors(router, &origins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::enrichment::ResultEnricher;
    use crate::models::RawResult;
    use crate::search::{SearchError, SearchProvider};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    enum FakeSearch {
        Results(Vec<RawResult>),
        RateLimited,
    }

    #[async_trait]
    impl SearchProvider for FakeSearch {
        async fn search(&self, _query: &str, max_results: usize) -> Result<Vec<RawResult>, SearchError> {
            match self {
                FakeSearch::Results(results) => Ok(results.iter().take(max_results).cloned().collect()),
                FakeSearch::RateLimited => Err(SearchError::RateLimited),
            }
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    struct EchoEnricher;

    #[async_trait]
    impl ResultEnricher for EchoEnricher {
        async fn summarize(&self, _content: &str, query_context: &str) -> String {
            format!("Summary for {}", query_context)
        }

        async fn assess_credibility(&self, source: &RawResult) -> String {
            format!("High ({})", source.source_type)
        }

        async fn generate_questions(&self, topic: &str) -> Vec<String> {
            vec![format!("How is {} treated?", topic)]
        }

        fn is_configured(&self) -> bool {
            false
        }
    }

    fn result(n: usize) -> RawResult {
        RawResult {
            title: format!("Result {}", n),
            url: format!("https://www.bmj.com/{}", n),
            content: "x".repeat(600),
            source_type: "BMJ".to_string(),
            publication_date: "2024".to_string(),
            relevance_score: 1.0,
        }
    }

    fn app(search: FakeSearch) -> Router {
        let config = Config::from_lookup(|_| None).unwrap();
        create_router(AppState::new(config, Arc::new(search), Arc::new(EchoEnricher)))
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn json_post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn form_post(query: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/search")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(format!("query={}", query)))
            .unwrap()
    }

    #[tokio::test]
    async fn test_index_page() {
        let response = app(FakeSearch::Results(vec![]))
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("<form"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404_page() {
        let response = app(FakeSearch::Results(vec![]))
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_string(response).await.contains("MedLit Search"));
    }

    #[tokio::test]
    async fn test_api_search_caps_results() {
        let response = app(FakeSearch::Results((0..8).map(result).collect()))
            .oneshot(json_post("/api/search", json!({"query": " asthma "})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["query"], "asthma");
        assert_eq!(body["total_results"], 5);
        assert_eq!(body["results"][0]["title"], "Result 0");
        assert_eq!(body["results"][0]["summary"], "Summary for asthma");
        assert_eq!(body["results"][0]["credibility_score"], "High (BMJ)");
        assert_eq!(body["results"][0]["content"].as_str().unwrap().len(), 503);
    }

    #[tokio::test]
    async fn test_api_search_empty_query() {
        let response = app(FakeSearch::Results(vec![]))
            .oneshot(json_post("/api/search", json!({"query": "   "})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"], "Query parameter is required");
    }

    #[tokio::test]
    async fn test_api_search_too_long_query() {
        let response = app(FakeSearch::Results(vec![]))
            .oneshot(json_post("/api/search", json!({"query": "a".repeat(201)})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_api_search_failure_is_503() {
        let response = app(FakeSearch::RateLimited)
            .oneshot(json_post("/api/search", json!({"query": "asthma"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"], "Search service temporarily unavailable");
    }

    #[tokio::test]
    async fn test_malformed_json_body_gets_json_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/search")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app(FakeSearch::Results(vec![])).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(body["error"].as_str().unwrap().contains("JSON"));
    }

    #[tokio::test]
    async fn test_missing_content_type_gets_json_error() {
        for uri in ["/api/search", "/summarize", "/api/questions"] {
            let request = Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::from(r#"{"query": "asthma"}"#))
                .unwrap();
            let response = app(FakeSearch::Results(vec![])).oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE, "{}", uri);
            let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
            assert!(body["error"].is_string(), "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_search_page_renders_all_results() {
        let response = app(FakeSearch::Results((0..7).map(result).collect()))
            .oneshot(form_post("diabetes+treatment"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("7 result(s)"));
        assert!(html.contains("Summary for diabetes treatment"));
    }

    #[tokio::test]
    async fn test_search_page_empty_query_warns() {
        let response = app(FakeSearch::Results(vec![]))
            .oneshot(form_post(""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.contains("Please enter a medical question"));
    }

    #[tokio::test]
    async fn test_search_page_failure_message() {
        let response = app(FakeSearch::RateLimited)
            .oneshot(form_post("asthma"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(body_string(response).await.contains("temporarily unavailable"));
    }

    #[tokio::test]
    async fn test_search_page_no_results() {
        let response = app(FakeSearch::Results(vec![]))
            .oneshot(form_post("asthma"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("No medical literature found"));
    }

    #[tokio::test]
    async fn test_summarize_endpoint() {
        let response = app(FakeSearch::Results(vec![]))
            .oneshot(json_post("/summarize", json!({"content": "text", "context": "asthma"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["summary"], "Summary for asthma");
        assert_eq!(body["status"], "success");
    }

    #[tokio::test]
    async fn test_summarize_requires_content() {
        let response = app(FakeSearch::Results(vec![]))
            .oneshot(json_post("/summarize", json!({"content": ""})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_questions_endpoint() {
        let response = app(FakeSearch::Results(vec![]))
            .oneshot(json_post("/api/questions", json!({"topic": "gout"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["questions"][0], "How is gout treated?");
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(FakeSearch::Results(vec![]))
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["search_configured"], true);
        assert_eq!(body["llm_configured"], false);
    }
}
