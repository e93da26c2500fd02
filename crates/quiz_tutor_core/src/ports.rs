//! crates/quiz_tutor_core/src/ports.rs
//!
//! Defines the service contracts (traits) the quiz tutor depends on.
//! These traits form the boundary of the hexagonal architecture, keeping the
//! evaluation pipeline independent of the concrete model API, video search and
//! database.

use async_trait::async_trait;
use crate::domain::{Attempt, NewAttempt, VideoResult};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("Video lookup unavailable: {0}")]
    LookupUnavailable(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Sends a prompt to the generative model and returns its raw text.
    async fn generate(&self, prompt: &str) -> PortResult<String>;
}

#[async_trait]
pub trait VideoLookup: Send + Sync {
    /// Searches for videos matching `query`, returning at most `limit` results.
    async fn search(&self, query: &str, limit: usize) -> PortResult<Vec<VideoResult>>;
}

#[async_trait]
pub trait AttemptStore: Send + Sync {
    async fn insert(&self, attempt: NewAttempt) -> PortResult<Attempt>;

    /// All attempts, most recent first.
    async fn list(&self) -> PortResult<Vec<Attempt>>;
}
