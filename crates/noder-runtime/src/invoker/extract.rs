use serde_json::Value;

use crate::definition::NodeKind;
use crate::{WorkflowError, WorkflowResult};

/// Normalizes a raw provider output into the node's usable result.
///
/// Text models stream arrays of fragments that concatenate into one string;
/// media models return one URL or a list of URLs, of which the first is the
/// result. Plain strings pass through for every kind.
pub fn extract_result(output: &Value, kind: NodeKind) -> WorkflowResult<Value> {
    match output {
        Value::String(text) => Ok(Value::String(text.clone())),
        Value::Array(items) => extract_from_array(items, kind),
        Value::Null => Err(WorkflowError::UnexpectedOutput(
            "provider returned no output".to_owned(),
        )),
        other if kind.is_text() => Ok(Value::String(other.to_string())),
        other => Ok(other.clone()),
    }
}

fn extract_from_array(items: &[Value], kind: NodeKind) -> WorkflowResult<Value> {
    if kind.is_text() {
        let joined: String = items.iter().map(fragment_text).collect();
        return Ok(Value::String(joined));
    }

    match items.first() {
        Some(first) => Ok(first.clone()),
        None => Err(WorkflowError::UnexpectedOutput(
            "provider returned an empty output list".to_owned(),
        )),
    }
}

/// Renders one text fragment; non-string fragments are JSON-encoded.
fn fragment_text(fragment: &Value) -> String {
    match fragment {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_string_output_passes_through() {
        let result = extract_result(&json!("hello"), NodeKind::Text).unwrap();
        assert_eq!(result, json!("hello"));
    }

    #[test]
    fn test_text_array_concatenates_without_separator() {
        let output = json!(["The ", "quick ", "fox"]);
        let result = extract_result(&output, NodeKind::Text).unwrap();
        assert_eq!(result, json!("The quick fox"));
    }

    #[test]
    fn test_media_array_takes_first_element() {
        let output = json!(["https://a.example/1.png", "https://a.example/2.png"]);
        let result = extract_result(&output, NodeKind::Image).unwrap();
        assert_eq!(result, json!("https://a.example/1.png"));
    }

    #[test]
    fn test_empty_media_array_is_an_error() {
        let error = extract_result(&json!([]), NodeKind::Video).unwrap_err();
        assert!(matches!(error, WorkflowError::UnexpectedOutput(_)));
    }

    #[test]
    fn test_empty_text_array_yields_empty_string() {
        let result = extract_result(&json!([]), NodeKind::Text).unwrap();
        assert_eq!(result, json!(""));
    }

    #[test]
    fn test_null_output_is_an_error() {
        let error = extract_result(&Value::Null, NodeKind::Image).unwrap_err();
        assert!(matches!(error, WorkflowError::UnexpectedOutput(_)));
    }

    #[test]
    fn test_object_output_for_text_is_json_encoded() {
        let result = extract_result(&json!({"text": "hi"}), NodeKind::Text).unwrap();
        assert_eq!(result, json!(r#"{"text":"hi"}"#));
    }

    #[test]
    fn test_object_output_for_media_is_kept_raw() {
        let output = json!({"url": "https://a.example/1.mp4"});
        let result = extract_result(&output, NodeKind::Video).unwrap();
        assert_eq!(result, output);
    }
}
