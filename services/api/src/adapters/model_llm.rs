//! services/api/src/adapters/model_llm.rs
//!
//! This module contains the adapter for the generative model used to write
//! questions and grade answers. It implements the `ModelClient` port from the
//! `core` crate against any OpenAI-compatible chat completion endpoint.

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client, error::OpenAIError,
};
use async_trait::async_trait;
use quiz_tutor_core::ports::{ModelClient, PortError, PortResult};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ModelClient` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiModelAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiModelAdapter {
    /// Creates a new `OpenAiModelAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// Builds a client for the given endpoint and key.
    pub fn client_for(api_base: &str, api_key: &str) -> Client<OpenAIConfig> {
        let config = OpenAIConfig::new()
            .with_api_base(api_base)
            .with_api_key(api_key);
        Client::with_config(config)
    }
}

//=========================================================================================
// `ModelClient` Trait Implementation
//=========================================================================================

#[async_trait]
impl ModelClient for OpenAiModelAdapter {
    /// Sends the prompt as a single user message and returns the first choice's text.
    async fn generate(&self, prompt: &str) -> PortResult<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| PortError::ModelUnavailable(e.to_string()))?
            .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::ModelUnavailable(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::ModelUnavailable(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::ModelUnavailable("Model response contained no text content.".to_string())
            })?;

        debug!("Model replied with {} characters.", content.len());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use serde_json::{json, Value};

    fn completion(choices: Value) -> Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1700000000,
            "model": "gemini-2.5-flash",
            "choices": choices
        })
    }

    async fn adapter_for(reply: Value) -> OpenAiModelAdapter {
        let app = Router::new().route(
            "/chat/completions",
            post(move |Json(request): Json<Value>| {
                let reply = reply.clone();
                async move {
                    assert_eq!(request["model"], "gemini-2.5-flash");
                    assert_eq!(request["messages"][0]["role"], "user");
                    Json(reply)
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = OpenAiModelAdapter::client_for(&format!("http://{}", addr), "test-key");
        OpenAiModelAdapter::new(client, "gemini-2.5-flash".to_string())
    }

    #[tokio::test]
    async fn returns_the_first_choice_text() {
        let adapter = adapter_for(completion(json!([{
            "index": 0,
            "message": {"role": "assistant", "content": "What is a cell?"},
            "finish_reason": "stop"
        }])))
        .await;

        assert_eq!(adapter.generate("Ask me").await.unwrap(), "What is a cell?");
    }

    #[tokio::test]
    async fn no_choices_is_model_unavailable() {
        let adapter = adapter_for(completion(json!([]))).await;

        let err = adapter.generate("Ask me").await.unwrap_err();
        assert!(matches!(err, PortError::ModelUnavailable(_)));
    }
}
