//! crates/quiz_tutor_core/src/domain.rs
//!
//! Defines the pure, core data structures for the quiz tutor.
//! These structs are independent of any database or transport format.

use chrono::{DateTime, Utc};
use std::fmt;

/// Video id returned whenever the video lookup fails or finds nothing.
pub const PLACEHOLDER_VIDEO_ID: &str = "dQw4w9WgXcQ";

const DEFAULT_LEARNER_NAME: &str = "Student";
const DEFAULT_LEARNER_PHONE: &str = "Unknown";

/// The learner taking the quiz, as identified by the login form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Learner {
    pub name: String,
    pub phone: String,
}

impl Learner {
    /// Builds a learner from optional request fields, substituting the defaults
    /// for absent or blank values.
    pub fn new(name: Option<String>, phone: Option<String>) -> Self {
        Self {
            name: non_blank_or(name, DEFAULT_LEARNER_NAME),
            phone: non_blank_or(phone, DEFAULT_LEARNER_PHONE),
        }
    }
}

impl Default for Learner {
    fn default() -> Self {
        Self::new(None, None)
    }
}

fn non_blank_or(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default.to_string(),
    }
}

/// Input to one evaluation round.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub topic: String,
    pub user_answer: String,
}

/// The structured, always-total outcome of evaluating one learner answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub correct: bool,
    pub explanation: String,
    pub search_query: String,
}

impl Verdict {
    pub fn status(&self) -> AttemptStatus {
        if self.correct {
            AttemptStatus::Correct
        } else {
            AttemptStatus::NeedsReview
        }
    }
}

/// Whether a persisted attempt was judged correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStatus {
    Correct,
    NeedsReview,
}

impl AttemptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptStatus::Correct => "Correct",
            AttemptStatus::NeedsReview => "NeedsReview",
        }
    }

    /// Reads a stored status back. Rows written by older versions used
    /// "Needs Review"; anything that is not "Correct" needs review.
    pub fn from_stored(value: &str) -> Self {
        if value == "Correct" {
            AttemptStatus::Correct
        } else {
            AttemptStatus::NeedsReview
        }
    }
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An attempt that has been evaluated but not yet written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttempt {
    pub learner: Learner,
    pub topic: String,
    pub status: AttemptStatus,
    pub feedback: String,
}

impl NewAttempt {
    /// The only way an attempt is built: status and feedback always come from a verdict.
    pub fn from_verdict(learner: &Learner, topic: &str, verdict: &Verdict) -> Self {
        Self {
            learner: learner.clone(),
            topic: topic.to_string(),
            status: verdict.status(),
            feedback: verdict.explanation.clone(),
        }
    }
}

/// One persisted historical record of a learner's quiz round.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub id: i64,
    pub learner: Learner,
    pub topic: String,
    pub status: AttemptStatus,
    pub feedback: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoResult {
    pub id: String,
}

impl VideoResult {
    pub fn placeholder() -> Self {
        Self {
            id: PLACEHOLDER_VIDEO_ID.to_string(),
        }
    }
}

/// Everything one evaluation round hands back to the caller.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub verdict: Verdict,
    pub video: VideoResult,
    /// `None` only when the store rejected the write.
    pub attempt_id: Option<i64>,
}
