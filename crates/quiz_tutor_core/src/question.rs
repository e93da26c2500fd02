//! crates/quiz_tutor_core/src/question.rs
//!
//! Asks the model for a new quiz question. The reply is free text, so there is
//! nothing to parse; any failure falls back to a fixed question.

use crate::ports::ModelClient;
use std::sync::Arc;
use tracing::warn;

pub fn question_prompt(topic: &str) -> String {
    format!("Ask one simple question about '{}' for a Class 10 student.", topic)
}

pub fn fallback_question(topic: &str) -> String {
    format!("Tell me what you know about {}.", topic)
}

#[derive(Clone)]
pub struct QuestionService {
    model: Arc<dyn ModelClient>,
}

impl QuestionService {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self { model }
    }

    /// Returns a question about `topic`. Never fails.
    pub async fn ask(&self, topic: &str) -> String {
        match self.model.generate(&question_prompt(topic)).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!("Model returned an empty question for '{}', using fallback.", topic);
                fallback_question(topic)
            }
            Err(e) => {
                warn!("Question generation failed for '{}': {}", topic, e);
                fallback_question(topic)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{PortError, PortResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct EchoModel {
        reply: PortResult<String>,
        last_prompt: Mutex<Option<String>>,
    }

    #[async_trait]
    impl ModelClient for EchoModel {
        async fn generate(&self, prompt: &str) -> PortResult<String> {
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(PortError::ModelUnavailable(e.to_string())),
            }
        }
    }

    fn service(reply: PortResult<String>) -> (QuestionService, Arc<EchoModel>) {
        let model = Arc::new(EchoModel {
            reply,
            last_prompt: Mutex::new(None),
        });
        (QuestionService::new(model.clone()), model)
    }

    #[tokio::test]
    async fn returns_model_text_verbatim() {
        let (service, model) = service(Ok("What is the SI unit of force?".to_string()));
        assert_eq!(service.ask("forces").await, "What is the SI unit of force?");
        assert_eq!(
            model.last_prompt.lock().unwrap().as_deref(),
            Some("Ask one simple question about 'forces' for a Class 10 student.")
        );
    }

    #[tokio::test]
    async fn failure_uses_the_templated_fallback() {
        let (service, _) = service(Err(PortError::ModelUnavailable("offline".to_string())));
        assert_eq!(service.ask("acids").await, "Tell me what you know about acids.");
    }

    #[tokio::test]
    async fn blank_reply_uses_the_templated_fallback() {
        let (service, _) = service(Ok("  \n".to_string()));
        assert_eq!(service.ask("acids").await, "Tell me what you know about acids.");
    }
}
