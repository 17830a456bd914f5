use serde_json::Value;
use thiserror::Error;

use super::merge::json_kind;
use super::model::{BrandingConfig, SECTION_KEYS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportPolicy {
    /// Every section present, nothing unknown.
    #[default]
    Strict,
    /// Any object that decodes. Missing sections take defaults.
    Lenient,
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("branding import must be a JSON object, got {kind}")]
    NotAnObject { kind: &'static str },
    #[error("branding import is missing sections: {}", .missing.join(", "))]
    MissingSections { missing: Vec<String> },
    #[error("branding import has unknown sections: {}", .unknown.join(", "))]
    UnknownSections { unknown: Vec<String> },
    #[error("branding import has the wrong shape: {0}")]
    Shape(#[source] serde_json::Error),
    #[error("failed to serialize branding config: {0}")]
    Serialize(#[source] serde_json::Error),
}

pub type TransferResult<T> = std::result::Result<T, TransferError>;

/// Pretty JSON of the whole aggregate.
pub fn export_config(config: &BrandingConfig) -> TransferResult<String> {
    serde_json::to_string_pretty(config).map_err(TransferError::Serialize)
}

/// Parses an exported document into a replacement aggregate.
pub fn import_config(text: &str, policy: ImportPolicy) -> TransferResult<BrandingConfig> {
    let value: Value = serde_json::from_str(text).map_err(TransferError::InvalidJson)?;
    let Value::Object(map) = &value else {
        return Err(TransferError::NotAnObject {
            kind: json_kind(&value),
        });
    };

    match policy {
        ImportPolicy::Strict => {
            let missing: Vec<String> = SECTION_KEYS
                .iter()
                .filter(|key| !map.contains_key(**key))
                .map(|key| key.to_string())
                .collect();
            if !missing.is_empty() {
                return Err(TransferError::MissingSections { missing });
            }
            let unknown: Vec<String> = map
                .keys()
                .filter(|key| !SECTION_KEYS.contains(&key.as_str()))
                .cloned()
                .collect();
            if !unknown.is_empty() {
                return Err(TransferError::UnknownSections { unknown });
            }
        }
        ImportPolicy::Lenient => {
            let dropped = map
                .keys()
                .filter(|key| !SECTION_KEYS.contains(&key.as_str()))
                .count();
            tracing::warn!(
                sections = map.len(),
                dropped,
                "importing branding without section validation"
            );
        }
    }

    serde_json::from_value(value).map_err(TransferError::Shape)
}
