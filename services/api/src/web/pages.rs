//! services/api/src/web/pages.rs
//!
//! HTML pages: the login form, the quiz page and the teacher's history view.
//! Pages are plain files read from the configured static directory.

use crate::web::render::teacher_page;
use crate::web::state::AppState;
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

/// The login form. Nothing is verified; the values are only carried to the quiz page.
#[derive(Deserialize, Debug)]
pub struct LoginForm {
    pub name: String,
    pub phone: String,
    pub mode: String,
}

async fn read_page(app_state: &AppState, file_name: &str) -> Result<String, (StatusCode, String)> {
    let path = app_state.config.static_dir.join(file_name);
    tokio::fs::read_to_string(&path).await.map_err(|e| {
        error!("Failed to read page {}: {}", path.display(), e);
        (StatusCode::NOT_FOUND, format!("{} is not available", file_name))
    })
}

/// GET / - the login page.
pub async fn login_page(
    State(app_state): State<Arc<AppState>>,
) -> Result<Html<String>, (StatusCode, String)> {
    read_page(&app_state, "login.html").await.map(Html)
}

/// POST /login-user - send the learner on to the quiz page.
pub async fn login_user_handler(Form(form): Form<LoginForm>) -> Redirect {
    let target = format!(
        "/index.html?mode={}&name={}&phone={}",
        urlencoding::encode(&form.mode),
        urlencoding::encode(&form.name),
        urlencoding::encode(&form.phone),
    );
    Redirect::to(&target)
}

/// GET /index.html - the quiz page.
pub async fn index_page(
    State(app_state): State<Arc<AppState>>,
) -> Result<Html<String>, (StatusCode, String)> {
    read_page(&app_state, "index.html").await.map(Html)
}

/// GET /teacher - every attempt, most recent first.
pub async fn teacher_view(
    State(app_state): State<Arc<AppState>>,
) -> Result<Html<String>, (StatusCode, String)> {
    let attempts = app_state.store.list().await.map_err(|e| {
        error!("Failed to list attempts for teacher view: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to read records".to_string(),
        )
    })?;
    let template = read_page(&app_state, "teacher.html").await?;
    Ok(Html(teacher_page(&template, &attempts)))
}
