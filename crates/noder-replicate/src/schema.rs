//! Model input schema extraction.

use serde_json::{Map, Value};

use crate::prediction::ReplicateModel;

/// The accepted-input description of a model version.
///
/// Extracted from `latest_version.openapi_schema.components.schemas.Input`
/// of the model resource. Used to filter form-state fields down to what the
/// model actually accepts before creating a prediction.
#[derive(Debug, Clone, Default)]
pub struct InputSchema {
    properties: Map<String, Value>,
}

impl InputSchema {
    /// Extracts the input schema from model metadata, if present.
    pub fn from_model(model: &ReplicateModel) -> Option<Self> {
        let properties = model
            .latest_version
            .as_ref()?
            .pointer("/openapi_schema/components/schemas/Input/properties")?
            .as_object()?
            .clone();

        if properties.is_empty() {
            return None;
        }
        Some(Self { properties })
    }

    /// Returns whether the model accepts a field of this name.
    pub fn accepts(&self, field: &str) -> bool {
        self.properties.contains_key(field)
    }

    /// Returns an iterator over accepted field names.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Returns the default value declared for a field, if any.
    pub fn default_for(&self, field: &str) -> Option<&Value> {
        self.properties.get(field)?.get("default")
    }
}
