use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Form values entered for a node in the editor.
///
/// Known fields are typed; anything else the editor stores lands in `extra`
/// and is forwarded to the provider verbatim.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    /// Model identifier, e.g. `black-forest-labs/flux-schnell` or `gpt-4o`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Primary prompt text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// System prompt for chat models.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Negative prompt for diffusion models.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    /// Output width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Output height in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Number of outputs to request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_outputs: Option<u32>,
    /// Clip duration in seconds, for video and audio models.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Frames per second, for video models.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,
    /// Sampling temperature for chat models.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Completion token cap for chat models.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Model-specific fields not covered above.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl FormState {
    /// Returns the trimmed model identifier, if one is set and non-empty.
    pub fn effective_model(&self) -> Option<&str> {
        self.model
            .as_deref()
            .map(str::trim)
            .filter(|model| !model.is_empty())
    }

    /// Returns the prompt, defaulting to an empty string.
    pub fn effective_prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_state_camel_case_fields() {
        let json = serde_json::json!({
            "model": "gpt-4o",
            "systemPrompt": "Be terse.",
            "maxTokens": 512,
            "aspect_ratio": "16:9",
        });

        let form: FormState = serde_json::from_value(json).unwrap();
        assert_eq!(form.effective_model(), Some("gpt-4o"));
        assert_eq!(form.system_prompt.as_deref(), Some("Be terse."));
        assert_eq!(form.max_tokens, Some(512));
        assert_eq!(
            form.extra.get("aspect_ratio"),
            Some(&Value::String("16:9".to_owned()))
        );
    }

    #[test]
    fn test_effective_model_rejects_blank() {
        let form = FormState {
            model: Some("   ".to_owned()),
            ..FormState::default()
        };
        assert_eq!(form.effective_model(), None);
    }
}
