//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the quiz JSON endpoints and the CSV export,
//! plus the master definition for the OpenAPI specification.

use crate::web::render::{attempts_csv, CSV_FILE_NAME};
use crate::web::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use quiz_tutor_core::domain::{EvaluationRequest, Learner, Verdict};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        start_quiz_handler,
        submit_answer_handler,
        download_records_handler,
    ),
    components(
        schemas(QuizRequest, StartQuizResponse, SubmitAnswerResponse, AnalysisBody)
    ),
    tags(
        (name = "Quiz Tutor API", description = "Endpoints for asking quiz questions and grading answers.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The payload sent by the quiz page for both starting a round and submitting an answer.
#[derive(Deserialize, ToSchema, Debug)]
pub struct QuizRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub topic: String,
    pub user_answer: Option<String>,
    pub mode: Option<String>,
}

impl QuizRequest {
    fn learner(&self) -> Learner {
        Learner::new(self.name.clone(), self.phone.clone())
    }
}

#[derive(Serialize, ToSchema)]
pub struct StartQuizResponse {
    pub question: String,
}

/// The grading result shown to the learner.
#[derive(Serialize, ToSchema)]
pub struct AnalysisBody {
    pub correct: bool,
    pub explanation: String,
    pub search_query: String,
}

impl From<Verdict> for AnalysisBody {
    fn from(verdict: Verdict) -> Self {
        Self {
            correct: verdict.correct,
            explanation: verdict.explanation,
            search_query: verdict.search_query,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct SubmitAnswerResponse {
    pub analysis: AnalysisBody,
    pub video_id: String,
}

fn require_topic(request: &QuizRequest) -> Result<String, (StatusCode, String)> {
    let topic = request.topic.trim();
    if topic.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "topic must not be empty".to_string()));
    }
    Ok(topic.to_string())
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Start a quiz round by asking the model for a question about the topic.
#[utoipa::path(
    post,
    path = "/api/start_quiz",
    request_body = QuizRequest,
    responses(
        (status = 200, description = "A question about the topic", body = StartQuizResponse),
        (status = 400, description = "The topic is missing or blank")
    )
)]
pub async fn start_quiz_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<QuizRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let topic = require_topic(&request)?;
    info!(
        "Starting quiz on '{}' for {} (mode: {}).",
        topic,
        request.learner().name,
        request.mode.as_deref().unwrap_or("unspecified")
    );

    let question = app_state.questions.ask(&topic).await;
    Ok(Json(StartQuizResponse { question }))
}

/// Grade an answer, record the attempt and suggest a video.
///
/// Model and video failures never surface here; they degrade to fallback values.
#[utoipa::path(
    post,
    path = "/api/submit_answer",
    request_body = QuizRequest,
    responses(
        (status = 200, description = "The verdict and a related video id", body = SubmitAnswerResponse),
        (status = 400, description = "The topic is missing or blank")
    )
)]
pub async fn submit_answer_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<QuizRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let topic = require_topic(&request)?;
    let learner = request.learner();
    info!(
        "Grading answer on '{}' for {} (mode: {}).",
        topic,
        learner.name,
        request.mode.as_deref().unwrap_or("unspecified")
    );
    let evaluation_request = EvaluationRequest {
        topic,
        user_answer: request.user_answer.unwrap_or_default(),
    };

    let evaluation = app_state
        .evaluator
        .evaluate(&evaluation_request, &learner)
        .await;

    Ok(Json(SubmitAnswerResponse {
        analysis: evaluation.verdict.into(),
        video_id: evaluation.video.id,
    }))
}

/// Download every recorded attempt as a CSV file.
#[utoipa::path(
    get,
    path = "/api/download_records",
    responses(
        (status = 200, description = "The attempt history as CSV", body = String, content_type = "text/csv"),
        (status = 500, description = "The attempt history could not be read or exported")
    )
)]
pub async fn download_records_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let attempts = app_state.store.list().await.map_err(|e| {
        error!("Failed to list attempts for export: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to read records".to_string(),
        )
    })?;
    let body = attempts_csv(&attempts).map_err(|e| {
        error!("Failed to write the attempts CSV: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to export records".to_string(),
        )
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", CSV_FILE_NAME),
            ),
        ],
        body,
    ))
}
