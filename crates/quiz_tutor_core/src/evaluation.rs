//! crates/quiz_tutor_core/src/evaluation.rs
//!
//! Drives one evaluation round: ask the model to grade the answer, turn its
//! text into a `Verdict`, record the attempt and find a companion video.
//! External failures never escape; each one degrades to a fixed fallback.

use crate::domain::{Evaluation, EvaluationRequest, Learner, NewAttempt, Verdict, VideoResult};
use crate::extract::extract_with_strategy;
use crate::normalize::normalize;
use crate::ports::{AttemptStore, ModelClient, VideoLookup};
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Builds the grading prompt for one answer.
pub fn evaluation_prompt(request: &EvaluationRequest) -> String {
    format!(
        "Analyze: Topic:{}, Ans:{}. \
         Return JSON: {{\"correct\": true, \"explanation\": \"SHORT feedback\", \"search_query\": \"topic keywords\"}}",
        request.topic, request.user_answer
    )
}

#[derive(Clone)]
pub struct EvaluationService {
    model: Arc<dyn ModelClient>,
    store: Arc<dyn AttemptStore>,
    videos: Arc<dyn VideoLookup>,
}

impl EvaluationService {
    pub fn new(
        model: Arc<dyn ModelClient>,
        store: Arc<dyn AttemptStore>,
        videos: Arc<dyn VideoLookup>,
    ) -> Self {
        Self {
            model,
            store,
            videos,
        }
    }

    /// Evaluates one answer. Always produces a verdict and a video id, and
    /// attempts exactly one store insert.
    pub async fn evaluate(&self, request: &EvaluationRequest, learner: &Learner) -> Evaluation {
        let span = info_span!("evaluate", topic = %request.topic);
        async move {
            let verdict = self.grade(request).await;

            let attempt = NewAttempt::from_verdict(learner, &request.topic, &verdict);
            let attempt_id = match self.store.insert(attempt).await {
                Ok(saved) => {
                    info!(attempt_id = saved.id, status = %saved.status, "Attempt recorded.");
                    Some(saved.id)
                }
                Err(e) => {
                    error!("Failed to record attempt for {}: {}", learner.name, e);
                    None
                }
            };

            let video = self.find_video(&verdict.search_query).await;

            Evaluation {
                verdict,
                video,
                attempt_id,
            }
        }
        .instrument(span)
        .await
    }

    async fn grade(&self, request: &EvaluationRequest) -> Verdict {
        let raw_text = match self.model.generate(&evaluation_prompt(request)).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Model call failed, using fallback verdict: {}", e);
                None
            }
        };

        let extracted = raw_text.as_deref().and_then(|text| match extract_with_strategy(text) {
            Some((strategy, object)) => {
                debug!(?strategy, "Recovered verdict object from model output.");
                Some(object)
            }
            None => {
                warn!("Model output contained no JSON object, using fallback verdict.");
                None
            }
        });

        normalize(extracted, &request.topic)
    }

    async fn find_video(&self, query: &str) -> VideoResult {
        match self.videos.search(query, 1).await {
            Ok(results) => results
                .into_iter()
                .find(|video| !video.id.trim().is_empty())
                .unwrap_or_else(|| {
                    info!("No video found for '{}', using placeholder.", query);
                    VideoResult::placeholder()
                }),
            Err(e) => {
                warn!("Video lookup failed, using placeholder: {}", e);
                VideoResult::placeholder()
            }
        }
    }
}
