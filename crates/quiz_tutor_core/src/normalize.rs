//! crates/quiz_tutor_core/src/normalize.rs
//!
//! Turns whatever the extractor recovered (possibly nothing) into a total
//! `Verdict`. Every field of the result is present and non-empty.

use crate::domain::Verdict;
use crate::extract::StructuredObject;
use serde_json::Value;

/// Explanation used when no structured object, or only an empty one, was recovered.
pub const FALLBACK_EXPLANATION: &str = "Could not analyze answer. Please try again.";

/// Explanation used when an object was recovered but carried no usable explanation.
pub const MISSING_EXPLANATION: &str = "No explanation was provided.";

/// An empty object carries nothing to grade with and is treated like no object.
pub fn normalize(extracted: Option<StructuredObject>, fallback_topic: &str) -> Verdict {
    let Some(object) = extracted.filter(|object| !object.is_empty()) else {
        return fallback_verdict(fallback_topic);
    };

    let correct = matches!(object.get("correct"), Some(Value::Bool(true)));

    let explanation = object
        .get("explanation")
        .and_then(text_of)
        .unwrap_or_else(|| MISSING_EXPLANATION.to_string());

    let search_query = match object.get("search_query") {
        Some(Value::String(query)) if !query.trim().is_empty() => query.trim().to_string(),
        _ => fallback_topic.to_string(),
    };

    Verdict {
        correct,
        explanation,
        search_query,
    }
}

/// The verdict for a round whose model output was absent or unusable.
pub fn fallback_verdict(topic: &str) -> Verdict {
    Verdict {
        correct: false,
        explanation: FALLBACK_EXPLANATION.to_string(),
        search_query: topic.to_string(),
    }
}

fn text_of(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}
