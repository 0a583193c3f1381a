use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::info;

use crate::models::{
    AppState, QuestionsRequest, QuestionsResponse, SummarizeRequest, SummarizeResponse,
};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/summarize", post(summarize))
        .route("/api/questions", post(clinical_questions))
        .with_state(state)
}

/// POST /summarize - summarize arbitrary content
async fn summarize(
    State(state): State<AppState>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> AppResult<Json<SummarizeResponse>> {
    let Json(request) = payload?;
    if request.content.trim().is_empty() {
        return Err(AppError::InvalidRequest("Content parameter is required".to_string()));
    }

    info!(content_len = request.content.len(), "Summarization request received");
    let summary = state
        .enricher
        .summarize(&request.content, &request.context)
        .await;

    Ok(Json(SummarizeResponse {
        summary,
        status: "success".to_string(),
    }))
}

/// POST /api/questions - clinical questions for a topic
async fn clinical_questions(
    State(state): State<AppState>,
    payload: Result<Json<QuestionsRequest>, JsonRejection>,
) -> AppResult<Json<QuestionsResponse>> {
    let Json(request) = payload?;
    let topic = request.topic.trim();
    if topic.is_empty() {
        return Err(AppError::InvalidRequest("Topic parameter is required".to_string()));
    }

    let questions = state.enricher.generate_questions(topic).await;
    info!(topic = %topic, count = questions.len(), "Generated clinical questions");

    Ok(Json(QuestionsResponse {
        topic: topic.to_string(),
        questions,
    }))
}
