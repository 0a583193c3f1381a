use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};
use tracing::{error, info};

use super::ui::{self, Flash};
use crate::models::{AppState, QueryError, SearchForm, SearchQuery, SearchRequest, SearchResponse};
use crate::types::{AppError, AppResult};

const SEARCH_UNAVAILABLE: &str =
    "Search service is temporarily unavailable. Please try again with a simpler query.";
const NO_RESULTS: &str = "No medical literature found for your query. Please try different terms.";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search", post(search_page))
        .route("/api/search", post(api_search))
        .with_state(state)
}

/// POST /search - form flow, renders HTML
async fn search_page(State(state): State<AppState>, Form(form): Form<SearchForm>) -> Response {
    let query = match SearchQuery::parse(&form.query) {
        Ok(query) => query,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, ui::render_index(Some(&Flash::warning(e.to_string()))))
                .into_response();
        }
    };

    info!(query = %query, "Processing medical search query");

    let results = match state
        .search
        .search(query.as_str(), state.search.default_max_results())
        .await
    {
        Ok(results) => results,
        Err(e) => {
            error!(error = %e, "Search API error");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                ui::render_index(Some(&Flash::error(SEARCH_UNAVAILABLE))),
            )
                .into_response();
        }
    };

    if results.is_empty() {
        return ui::render_index(Some(&Flash::info(NO_RESULTS))).into_response();
    }

    let enriched = state.pipeline.enrich(results, query.as_str(), None).await;
    ui::render_results(&query, &enriched).into_response()
}

/// POST /api/search - JSON flow
async fn api_search(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> AppResult<Json<SearchResponse>> {
    let Json(request) = payload?;
    let query = SearchQuery::parse(&request.query).map_err(|e| match e {
        QueryError::Empty => AppError::InvalidRequest("Query parameter is required".to_string()),
        QueryError::TooLong => AppError::InvalidRequest(e.to_string()),
    })?;

    info!(query = %query, "Processing API search query");

    let results = state
        .search
        .search(query.as_str(), state.search.default_max_results())
        .await?;

    let enriched = state
        .pipeline
        .enrich(
            results,
            query.as_str(),
            Some(state.config.enrichment.api_result_limit),
        )
        .await;

    Ok(Json(SearchResponse {
        query: query.to_string(),
        total_results: enriched.len(),
        results: enriched,
    }))
}
