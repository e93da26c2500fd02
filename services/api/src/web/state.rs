//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use quiz_tutor_core::ports::{AttemptStore, ModelClient, VideoLookup};
use quiz_tutor_core::{EvaluationService, QuestionService};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AttemptStore>,
    pub config: Arc<Config>,
    pub questions: QuestionService,
    pub evaluator: EvaluationService,
}

impl AppState {
    /// Wires the orchestrators to the given adapters.
    pub fn new(
        config: Arc<Config>,
        store: Arc<dyn AttemptStore>,
        model: Arc<dyn ModelClient>,
        videos: Arc<dyn VideoLookup>,
    ) -> Self {
        Self {
            questions: QuestionService::new(model.clone()),
            evaluator: EvaluationService::new(model, store.clone(), videos),
            store,
            config,
        }
    }
}
