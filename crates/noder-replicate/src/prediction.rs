//! Prediction and model wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// Lifecycle state of a prediction.
///
/// `starting` and `processing` are in-flight; the rest are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PredictionStatus {
    /// Queued, waiting for hardware.
    Starting,
    /// Running on the model.
    Processing,
    /// Finished with output.
    Succeeded,
    /// Finished with a provider-reported error.
    Failed,
    /// Canceled by the caller.
    Canceled,
}

impl PredictionStatus {
    /// Returns whether this status ends the poll loop.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

/// A prediction resource as returned by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Provider-assigned prediction id.
    pub id: String,
    /// Current lifecycle state.
    pub status: PredictionStatus,
    /// Model output, present once succeeded.
    #[serde(default)]
    pub output: Option<Value>,
    /// Provider-reported error, present when failed.
    #[serde(default)]
    pub error: Option<String>,
    /// Execution logs, when the provider returns them.
    #[serde(default)]
    pub logs: Option<String>,
    /// Runtime metrics, when the provider returns them.
    #[serde(default)]
    pub metrics: Option<Value>,
}

/// Model metadata, trimmed to the fields the engine consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplicateModel {
    /// Model owner (org or user).
    pub owner: String,
    /// Model name.
    pub name: String,
    /// Latest published version, carrying the OpenAPI input schema.
    #[serde(default)]
    pub latest_version: Option<Value>,
}

/// Parsed form of a model reference string.
///
/// Three forms are accepted, matching what the canvas lets users paste:
/// `owner/model` (official model endpoint), `owner/model:version` and a
/// bare version id (both via the generic predictions endpoint).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelRef {
    /// `owner/model` — resolved via the model-scoped predictions endpoint.
    Official {
        /// Model owner.
        owner: String,
        /// Model name.
        name: String,
    },
    /// An explicit version id, with or without the `owner/model:` prefix.
    Versioned {
        /// Version id to pass in the request body.
        version: String,
    },
}

impl ModelRef {
    /// Parses a model reference string.
    pub fn parse(model: &str) -> Self {
        if let Some((path, version)) = model.split_once(':') {
            // `owner/model:version` pins a version; the path part is only
            // informational once a version id is known.
            let _ = path;
            return Self::Versioned {
                version: version.to_string(),
            };
        }

        match model.split_once('/') {
            Some((owner, name)) => Self::Official {
                owner: owner.to_string(),
                name: name.to_string(),
            },
            None => Self::Versioned {
                version: model.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_terminality() {
        assert!(!PredictionStatus::Starting.is_terminal());
        assert!(!PredictionStatus::Processing.is_terminal());
        assert!(PredictionStatus::Succeeded.is_terminal());
        assert!(PredictionStatus::Failed.is_terminal());
        assert!(PredictionStatus::Canceled.is_terminal());
    }

    #[test]
    fn test_status_serde_roundtrip() {
        let json = serde_json::to_string(&PredictionStatus::Processing).unwrap();
        assert_eq!(json, r#""processing""#);
        let back: PredictionStatus = serde_json::from_str(r#""canceled""#).unwrap();
        assert_eq!(back, PredictionStatus::Canceled);
    }

    #[test]
    fn test_model_ref_official() {
        assert_eq!(
            ModelRef::parse("black-forest-labs/flux-schnell"),
            ModelRef::Official {
                owner: "black-forest-labs".into(),
                name: "flux-schnell".into(),
            }
        );
    }

    #[test]
    fn test_model_ref_pinned_version() {
        assert_eq!(
            ModelRef::parse("stability-ai/sdxl:39ed52f2"),
            ModelRef::Versioned {
                version: "39ed52f2".into()
            }
        );
    }

    #[test]
    fn test_model_ref_bare_version() {
        assert_eq!(
            ModelRef::parse("39ed52f2a73832fe7e7c1d587bd9ff"),
            ModelRef::Versioned {
                version: "39ed52f2a73832fe7e7c1d587bd9ff".into()
            }
        );
    }
}
