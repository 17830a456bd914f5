use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const BACKGROUND_COLOR: &str = "backgroundColor";

/// Properties offered by the generic styling editor. Records may carry
/// names outside this list; they are stored and emitted unchanged.
pub const STYLE_PROPERTIES: &[&str] = &[
    "backgroundColor",
    "textColor",
    "borderColor",
    "borderRadius",
    "borderWidth",
    "borderStyle",
    "padding",
    "paddingTop",
    "paddingRight",
    "paddingBottom",
    "paddingLeft",
    "margin",
    "marginTop",
    "marginRight",
    "marginBottom",
    "marginLeft",
    "fontSize",
    "fontWeight",
    "fontFamily",
    "fontStyle",
    "lineHeight",
    "letterSpacing",
    "textAlign",
    "textTransform",
    "textDecoration",
    "width",
    "height",
    "minWidth",
    "maxWidth",
    "minHeight",
    "maxHeight",
    "opacity",
    "boxShadow",
    "outline",
    "outlineColor",
    "outlineWidth",
    "outlineOffset",
    "transform",
    "transition",
    "filter",
    "backdropFilter",
    "overflow",
    "cursor",
    "gap",
    "display",
    "zIndex",
    "iconColor",
    "placeholderColor",
];

pub fn is_known_property(name: &str) -> bool {
    STYLE_PROPERTIES.contains(&name)
}

/// Open set of css-like properties for one component in one mode.
///
/// Absent properties mean "inherit". Empty strings are stored as given but
/// count as unset for [`StyleRecord::is_set`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StyleRecord(BTreeMap<String, String>);

impl StyleRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0.get(property).map(String::as_str)
    }

    pub fn is_set(&self, property: &str) -> bool {
        self.get(property).is_some_and(|value| !value.is_empty())
    }

    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.0.insert(property.into(), value.into());
    }

    pub fn remove(&mut self, property: &str) -> Option<String> {
        self.0.remove(property)
    }

    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Properties of `overrides` replace those of `self`; the rest are kept.
    pub fn merged_with(&self, overrides: &StyleRecord) -> StyleRecord {
        let mut merged = self.clone();
        for (property, value) in overrides.iter() {
            merged.set(property, value);
        }
        merged
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StyleRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// Payloads written by older editors carry numbers (`"opacity": 0.5`) and
// explicit nulls for cleared fields.
impl<'de> Deserialize<'de> for StyleRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let mut record = StyleRecord::new();
        for (property, value) in raw {
            match value {
                Value::Null => {}
                Value::String(text) => record.set(property, text),
                Value::Number(number) => record.set(property, number.to_string()),
                Value::Bool(flag) => record.set(property, flag.to_string()),
                Value::Array(_) | Value::Object(_) => {
                    return Err(D::Error::custom(format!(
                        "style property `{property}` must be a string"
                    )));
                }
            }
        }
        Ok(record)
    }
}
