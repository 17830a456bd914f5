//! Data model and attribute definitions with client-side validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::{AdminApi, ApiError, ApiResult};
use crate::icons::AppIcon;
use crate::reorder::{move_and_renumber, reorder, ReorderError, Sortable};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("attribute key {0:?} must start with a letter and use only letters, digits and _")]
    InvalidKey(String),
    #[error("minLength {min} exceeds maxLength {max}")]
    LengthRange { min: u32, max: u32 },
    #[error("{data_type:?} attributes do not take length limits")]
    LengthNotSupported { data_type: DataType },
    #[error("{data_type:?} attributes need at least one option")]
    MissingOptions { data_type: DataType },
    #[error("duplicate option value {0:?}")]
    DuplicateOption(String),
    #[error("duplicate attribute key {0:?}")]
    DuplicateAttribute(String),
    #[error("auto increment is only supported on TEXT and NUMBER attributes")]
    AutoIncrementType,
    #[error("auto increment padding {padding} exceeds {max} digits")]
    PaddingTooLarge { padding: usize, max: usize },
    #[error(transparent)]
    Reorder(#[from] ReorderError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type SchemaResult<T> = std::result::Result<T, SchemaError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    Text,
    Email,
    Number,
    Date,
    Boolean,
    Select,
    MultiSelect,
    Textarea,
    Phone,
    Url,
    Json,
    DataEntity,
}

impl DataType {
    pub fn has_options(self) -> bool {
        matches!(self, Self::Select | Self::MultiSelect)
    }

    pub fn has_length(self) -> bool {
        matches!(
            self,
            Self::Text | Self::Email | Self::Textarea | Self::Phone | Self::Url
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    #[default]
    Internal,
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeOption {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Widest zero padding an auto-increment counter may ask for.
pub const MAX_AUTO_INCREMENT_PADDING: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoIncrement {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    pub start: u64,
    /// Zero-padded digit count.
    #[serde(default)]
    pub padding: usize,
}

impl AutoIncrement {
    /// Display value for sequence number `n`, e.g. `INV-0042`.
    pub fn format(&self, n: u64) -> String {
        format!(
            "{}{:0width$}{}",
            self.prefix,
            n,
            self.suffix,
            width = self.padding.min(MAX_AUTO_INCREMENT_PADDING)
        )
    }

    pub fn first(&self) -> String {
        self.format(self.start)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub display_name: String,
    pub data_type: DataType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub min_length: Option<u32>,
    #[serde(default)]
    pub max_length: Option<u32>,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub auto_increment: Option<AutoIncrement>,
    #[serde(default)]
    pub options: Vec<AttributeOption>,
}

fn is_attribute_key(key: &str) -> bool {
    let mut chars = key.chars();
    chars.next().is_some_and(|ch| ch.is_ascii_alphabetic())
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

impl Attribute {
    pub fn validate(&self) -> SchemaResult<()> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::Required { field: "name" });
        }
        if !is_attribute_key(&self.name) {
            return Err(SchemaError::InvalidKey(self.name.clone()));
        }
        if self.display_name.trim().is_empty() {
            return Err(SchemaError::Required {
                field: "displayName",
            });
        }
        if (self.min_length.is_some() || self.max_length.is_some()) && !self.data_type.has_length()
        {
            return Err(SchemaError::LengthNotSupported {
                data_type: self.data_type,
            });
        }
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(SchemaError::LengthRange { min, max });
            }
        }
        if self.data_type.has_options() {
            if self.options.is_empty() {
                return Err(SchemaError::MissingOptions {
                    data_type: self.data_type,
                });
            }
            let mut seen = std::collections::BTreeSet::new();
            for option in &self.options {
                if option.value.trim().is_empty() {
                    return Err(SchemaError::Required {
                        field: "option value",
                    });
                }
                if !seen.insert(option.value.as_str()) {
                    return Err(SchemaError::DuplicateOption(option.value.clone()));
                }
            }
        }
        if let Some(counter) = &self.auto_increment {
            if !matches!(self.data_type, DataType::Text | DataType::Number) {
                return Err(SchemaError::AutoIncrementType);
            }
            if counter.padding > MAX_AUTO_INCREMENT_PADDING {
                return Err(SchemaError::PaddingTooLarge {
                    padding: counter.padding,
                    max: MAX_AUTO_INCREMENT_PADDING,
                });
            }
        }
        Ok(())
    }

    /// Moves one select option; the caller persists the whole list.
    pub fn move_option(&mut self, from: usize, to: usize) -> SchemaResult<()> {
        Ok(reorder(&mut self.options, from, to)?)
    }

    /// Replaces the server's option list with this attribute's, in order.
    pub fn persist_options(&self, model_id: &str, api: &impl AdminApi) -> ApiResult<()> {
        let attribute_id = self
            .id
            .as_deref()
            .ok_or_else(|| ApiError::Request("attribute has not been saved yet".to_string()))?;
        api.replace_attribute_options(model_id, attribute_id, &self.options)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataModel {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<AppIcon>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub source_type: SourceType,
    #[serde(default)]
    pub spaces: Vec<String>,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl DataModel {
    pub fn validate(&self) -> SchemaResult<()> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::Required { field: "name" });
        }
        if self.slug.is_empty() || slugify(&self.slug) != self.slug {
            return Err(SchemaError::InvalidKey(self.slug.clone()));
        }
        let mut keys = std::collections::BTreeSet::new();
        for attribute in &self.attributes {
            attribute.validate()?;
            if !keys.insert(attribute.name.as_str()) {
                return Err(SchemaError::DuplicateAttribute(attribute.name.clone()));
            }
        }
        Ok(())
    }
}

impl Sortable for DataModel {
    fn id(&self) -> &str {
        &self.id
    }

    fn sort_order(&self) -> i64 {
        self.sort_order
    }

    fn set_sort_order(&mut self, sort_order: i64) {
        self.sort_order = sort_order;
    }
}

/// Moves one data model and sends the renumbered order as one batch.
///
/// `models` only changes once the server accepts the batch.
pub fn move_data_model(
    models: &mut [DataModel],
    from: usize,
    to: usize,
    api: &impl AdminApi,
) -> SchemaResult<()> {
    let mut next = models.to_vec();
    let batch = move_and_renumber(&mut next, from, to)?;
    api.reorder_data_models(&batch)?;
    models.swap_with_slice(&mut next);
    Ok(())
}

/// Lowercase, dash separated slug: `"Customer Orders"` -> `"customer-orders"`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
