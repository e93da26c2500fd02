//! crates/quiz_tutor_core/src/extract.rs
//!
//! Recovers a single JSON object from free-form model output. Models wrap their
//! JSON in prose or markdown fences, so extraction runs an ordered list of
//! strategies and stops at the first one that yields an object.

use serde_json::{Map, Value};

/// A JSON object recovered from model text.
pub type StructuredObject = Map<String, Value>;

/// One way of locating a JSON object inside model text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Everything from the first `{` to the last `}`, inclusive.
    BraceSpan,
    /// The whole text with code-fence markers removed.
    FenceStripped,
    /// The first balanced `{...}` group. Reached when the greedy span covers
    /// several separate objects and therefore fails to parse.
    FirstBalanced,
}

/// Strategies in priority order.
pub const STRATEGIES: [Strategy; 3] = [
    Strategy::BraceSpan,
    Strategy::FenceStripped,
    Strategy::FirstBalanced,
];

impl Strategy {
    pub fn apply(self, text: &str) -> Option<StructuredObject> {
        match self {
            Strategy::BraceSpan => brace_span(text),
            Strategy::FenceStripped => fence_stripped(text),
            Strategy::FirstBalanced => first_balanced(text),
        }
    }
}

/// Returns the first object any strategy recovers, or `None`.
pub fn extract(raw_text: &str) -> Option<StructuredObject> {
    extract_with_strategy(raw_text).map(|(_, object)| object)
}

/// Like [`extract`], but also reports which strategy succeeded.
pub fn extract_with_strategy(raw_text: &str) -> Option<(Strategy, StructuredObject)> {
    STRATEGIES
        .iter()
        .find_map(|strategy| strategy.apply(raw_text).map(|object| (*strategy, object)))
}

fn parse_object(candidate: &str) -> Option<StructuredObject> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

fn brace_span(text: &str) -> Option<StructuredObject> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    parse_object(&text[start..=end])
}

fn fence_stripped(text: &str) -> Option<StructuredObject> {
    let cleaned = text.replace("```json", "").replace("```", "");
    parse_object(cleaned.trim())
}

fn first_balanced(text: &str) -> Option<StructuredObject> {
    let mut search_from = 0;
    while let Some(offset) = text[search_from..].find('{') {
        let start = search_from + offset;
        if let Some(len) = balanced_len(&text[start..]) {
            if let Some(object) = parse_object(&text[start..start + len]) {
                return Some(object);
            }
        }
        search_from = start + 1;
    }
    None
}

/// Byte length of the balanced group opening at the start of `text`.
/// Braces inside JSON strings are ignored.
fn balanced_len(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recovers_object_wrapped_in_prose() {
        let raw = r#"Sure! {"correct": true, "explanation": "Good job", "search_query": "photosynthesis basics"} Hope that helps."#;
        let (strategy, object) = extract_with_strategy(raw).expect("object");
        assert_eq!(strategy, Strategy::BraceSpan);
        assert_eq!(object.get("correct"), Some(&json!(true)));
        assert_eq!(object.get("explanation"), Some(&json!("Good job")));
        assert_eq!(object.get("search_query"), Some(&json!("photosynthesis basics")));
    }

    #[test]
    fn fenced_json_is_recovered_by_the_brace_span() {
        let raw = "```json\n{\"correct\": false, \"explanation\": \"Check units\", \"search_query\": \"units conversion\"}\n```";
        let (strategy, object) = extract_with_strategy(raw).expect("object");
        assert_eq!(strategy, Strategy::BraceSpan);
        assert_eq!(object.get("correct"), Some(&json!(false)));
        assert_eq!(object.get("explanation"), Some(&json!("Check units")));
        assert_eq!(object.get("search_query"), Some(&json!("units conversion")));
    }

    #[test]
    fn text_without_structure_yields_nothing() {
        assert!(extract("I cannot help with that.").is_none());
        assert!(extract("").is_none());
        assert!(extract("```json\n```").is_none());
        assert!(extract("} backwards {").is_none());
    }

    #[test]
    fn malformed_object_yields_nothing() {
        assert!(extract(r#"{"correct": true, "explanation": }"#).is_none());
    }

    #[test]
    fn non_object_json_is_not_a_structured_object() {
        assert!(extract("[1, 2, 3]").is_none());
        assert!(extract("```json\n42\n```").is_none());
    }

    #[test]
    fn nested_objects_stay_inside_the_greedy_span() {
        let raw = r#"Result: {"correct": true, "meta": {"score": 1}}"#;
        let (strategy, object) = extract_with_strategy(raw).expect("object");
        assert_eq!(strategy, Strategy::BraceSpan);
        assert_eq!(object.get("meta"), Some(&json!({"score": 1})));
    }

    #[test]
    fn two_separate_objects_fall_through_to_the_first_balanced_one() {
        let raw = r#"{"correct": true, "explanation": "Right"} and also {"correct": false}"#;
        let (strategy, object) = extract_with_strategy(raw).expect("object");
        assert_eq!(strategy, Strategy::FirstBalanced);
        assert_eq!(object.get("correct"), Some(&json!(true)));
        assert_eq!(object.get("explanation"), Some(&json!("Right")));
    }

    #[test]
    fn braces_inside_strings_do_not_break_balancing() {
        let raw = r#"{"explanation": "use {curly} braces \" here", "correct": true} {"x": 1}"#;
        let (strategy, object) = extract_with_strategy(raw).expect("object");
        assert_eq!(strategy, Strategy::FirstBalanced);
        assert_eq!(object.get("explanation"), Some(&json!("use {curly} braces \" here")));
    }

    #[test]
    fn leading_stray_brace_is_skipped_when_balancing() {
        let raw = r#"oops { not json {"correct": true} trailing {"b": 2}"#;
        let object = extract(raw).expect("object");
        assert_eq!(object.get("correct"), Some(&json!(true)));
    }
}
