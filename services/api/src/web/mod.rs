pub mod pages;
pub mod render;
pub mod rest;
pub mod state;

pub use pages::{index_page, login_page, login_user_handler, teacher_view};
pub use rest::{download_records_handler, start_quiz_handler, submit_answer_handler};

use axum::{
    routing::{get, post},
    Router,
};
use state::AppState;
use std::sync::Arc;

/// All application routes, with the shared state attached.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(login_page))
        .route("/login-user", post(login_user_handler))
        .route("/index.html", get(index_page))
        .route("/teacher", get(teacher_view))
        .route("/api/start_quiz", post(start_quiz_handler))
        .route("/api/submit_answer", post(submit_answer_handler))
        .route("/api/download_records", get(download_records_handler))
        .with_state(app_state)
}
