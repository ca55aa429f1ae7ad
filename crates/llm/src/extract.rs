//! Text extraction from loosely-shaped generation responses
//!
//! Backends disagree on where the generated text lives. The rules below are
//! tried in order and the last one always succeeds by rendering the body
//! back to JSON, so nothing the backend sent is silently dropped.

use serde_json::{Map, Value};

/// Which rule produced the extracted text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionRule {
    /// Top-level `response` string (Ollama)
    Response,
    /// `content` of the first choice/output
    ChoiceContent,
    /// `text` of the first choice/output
    ChoiceText,
    /// `message.content` of the first choice/output
    ChoiceMessageContent,
    /// First choice/output rendered as JSON
    ChoiceRendered,
    /// First choice/output was a bare scalar
    ChoiceScalar,
    /// Nothing matched, whole body rendered as JSON
    Rendered,
}

/// Extracted text and the rule that found it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub rule: ExtractionRule,
}

impl ExtractedText {
    fn new(text: impl Into<String>, rule: ExtractionRule) -> Self {
        Self {
            text: text.into(),
            rule,
        }
    }

    /// True when no known shape matched
    pub fn is_fallback(&self) -> bool {
        self.rule == ExtractionRule::Rendered
    }
}

/// Non-empty string field of a JSON object
fn non_empty_str<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Non-empty array field of a JSON object
/// Present and not null, false, zero or empty
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(list) => !list.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// First set value of `choices`, else of `outputs`
///
/// A set `choices` that is not a list shadows `outputs`.
fn choice_list(map: &Map<String, Value>) -> Option<&[Value]> {
    ["choices", "outputs"]
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|value| is_set(value))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
}

fn extract_from_choice(first: &Value) -> ExtractedText {
    match first {
        Value::Object(choice) => {
            if let Some(content) = non_empty_str(choice, "content") {
                return ExtractedText::new(content, ExtractionRule::ChoiceContent);
            }
            if let Some(text) = non_empty_str(choice, "text") {
                return ExtractedText::new(text, ExtractionRule::ChoiceText);
            }
            let message_content = choice
                .get("message")
                .and_then(Value::as_object)
                .and_then(|message| non_empty_str(message, "content"));
            if let Some(content) = message_content {
                return ExtractedText::new(content, ExtractionRule::ChoiceMessageContent);
            }
            ExtractedText::new(first.to_string(), ExtractionRule::ChoiceRendered)
        }
        Value::String(s) => ExtractedText::new(s.as_str(), ExtractionRule::ChoiceScalar),
        other => ExtractedText::new(other.to_string(), ExtractionRule::ChoiceScalar),
    }
}

/// Extract the generated text from a parsed response body
pub fn extract_response_text(body: &Value) -> ExtractedText {
    if let Value::Object(map) = body {
        if let Some(response) = non_empty_str(map, "response") {
            return ExtractedText::new(response, ExtractionRule::Response);
        }

        if let Some(first) = choice_list(map).and_then(|list| list.first()) {
            return extract_from_choice(first);
        }
    }

    ExtractedText::new(body.to_string(), ExtractionRule::Rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ollama_response_field() {
        let body = json!({"model": "llama2", "response": "A summary.", "done": true});
        let extracted = extract_response_text(&body);
        assert_eq!(extracted.text, "A summary.");
        assert_eq!(extracted.rule, ExtractionRule::Response);
    }

    #[test]
    fn test_empty_response_falls_through_to_choices() {
        let body = json!({"response": "", "choices": [{"text": "from choices"}]});
        let extracted = extract_response_text(&body);
        assert_eq!(extracted.text, "from choices");
        assert_eq!(extracted.rule, ExtractionRule::ChoiceText);
    }

    #[test]
    fn test_choice_field_priority() {
        let body = json!({"choices": [{"content": "c", "text": "t", "message": {"content": "m"}}]});
        assert_eq!(extract_response_text(&body).rule, ExtractionRule::ChoiceContent);

        let body = json!({"choices": [{"message": {"role": "assistant", "content": "m"}}]});
        let extracted = extract_response_text(&body);
        assert_eq!(extracted.text, "m");
        assert_eq!(extracted.rule, ExtractionRule::ChoiceMessageContent);
    }

    #[test]
    fn test_outputs_used_when_choices_empty() {
        let body = json!({"choices": [], "outputs": [{"text": "out"}]});
        assert_eq!(extract_response_text(&body).text, "out");
    }

    #[test]
    fn test_non_list_choices_shadow_outputs() {
        let body = json!({"choices": {"text": "x"}, "outputs": [{"text": "out"}]});
        let extracted = extract_response_text(&body);
        assert_eq!(extracted.rule, ExtractionRule::Rendered);
        let round_trip: Value = serde_json::from_str(&extracted.text).unwrap();
        assert_eq!(round_trip, body);

        // unset values still fall through to outputs
        for choices in [json!(null), json!(false), json!(0), json!(""), json!({})] {
            let body = json!({"choices": choices, "outputs": [{"text": "out"}]});
            assert_eq!(extract_response_text(&body).text, "out");
        }
    }

    #[test]
    fn test_unrecognized_choice_is_rendered() {
        let body = json!({"choices": [{"finish_reason": "stop"}]});
        let extracted = extract_response_text(&body);
        assert_eq!(extracted.rule, ExtractionRule::ChoiceRendered);
        assert_eq!(extracted.text, r#"{"finish_reason":"stop"}"#);
    }

    #[test]
    fn test_scalar_choice() {
        let body = json!({"outputs": ["plain text"]});
        assert_eq!(extract_response_text(&body).text, "plain text");

        let body = json!({"outputs": [42]});
        let extracted = extract_response_text(&body);
        assert_eq!(extracted.text, "42");
        assert_eq!(extracted.rule, ExtractionRule::ChoiceScalar);
    }

    #[test]
    fn test_unknown_shape_is_rendered_losslessly() {
        let body = json!({"done": true, "eval_count": 3});
        let extracted = extract_response_text(&body);
        assert!(extracted.is_fallback());
        let round_trip: Value = serde_json::from_str(&extracted.text).unwrap();
        assert_eq!(round_trip, body);

        let body = json!(["not", "a", "mapping"]);
        assert!(extract_response_text(&body).is_fallback());
    }
}
