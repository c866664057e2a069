use serde_json::Value;

/// Behavior-pack entity, block and item files. Only the identifier under
/// `<root_key>.description` is read; the components are opaque here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BehaviorDefinition {
    identifier: Option<String>,
    format_version: Option<String>,
}

impl BehaviorDefinition {
    pub fn from_json(value: &Value, root_key: &str) -> Self {
        let identifier = value
            .get(root_key)
            .and_then(|body| body.get("description"))
            .and_then(|description| description.get("identifier"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        let format_version = value
            .get("format_version")
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            identifier,
            format_version,
        }
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn format_version(&self) -> Option<&str> {
        self.format_version.as_deref()
    }
}
