//! Notification templates: `{{var}}` placeholder checks and a cached,
//! optimistically updated template book.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::{AdminApi, ApiError};
use crate::store::ResourceStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Email,
    Push,
    Sms,
    Webhook,
}

impl TemplateKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Push => "push",
            Self::Sms => "sms",
            Self::Webhook => "webhook",
        }
    }

    pub fn requires_subject(self) -> bool {
        matches!(self, Self::Email)
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationTemplate {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TemplateKind,
    #[serde(default)]
    pub subject: Option<String>,
    pub content: String,
    #[serde(default)]
    pub variables: Vec<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl NotificationTemplate {
    pub fn undeclared_placeholders(&self) -> Vec<String> {
        let mut text = self.content.clone();
        if let Some(subject) = &self.subject {
            text.push('\n');
            text.push_str(subject);
        }
        undeclared_placeholders(&text, &self.variables)
    }
}

/// Fields a client submits when creating or updating a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TemplateKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub content: String,
    pub variables: Vec<String>,
    pub is_active: bool,
}

impl TemplateDraft {
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.name.trim().is_empty() {
            return Err(DraftError::MissingName);
        }
        if self.content.trim().is_empty() {
            return Err(DraftError::MissingContent);
        }
        let subject = self.subject.as_deref().unwrap_or_default();
        if self.kind.requires_subject() && subject.trim().is_empty() {
            return Err(DraftError::MissingSubject);
        }
        let undeclared = undeclared_placeholders(&format!("{}\n{subject}", self.content), &self.variables);
        if !undeclared.is_empty() {
            return Err(DraftError::UndeclaredPlaceholders { names: undeclared });
        }
        Ok(())
    }
}

impl From<&NotificationTemplate> for TemplateDraft {
    fn from(template: &NotificationTemplate) -> Self {
        Self {
            name: template.name.clone(),
            kind: template.kind,
            subject: template.subject.clone(),
            content: template.content.clone(),
            variables: template.variables.clone(),
            is_active: template.is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("template name is required")]
    MissingName,
    #[error("template content is required")]
    MissingContent,
    #[error("email templates need a subject")]
    MissingSubject,
    #[error("placeholders not declared as variables: {}", .names.join(", "))]
    UndeclaredPlaceholders { names: Vec<String> },
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("unknown template: {0}")]
    UnknownTemplate(String),
}

pub type TemplateResult<T> = std::result::Result<T, TemplateError>;

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '.')
}

/// `{{ name }}` placeholders in order of first appearance.
pub fn placeholders(content: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut rest = content;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };
        // Triple braces ({{{name}}}) mark unescaped output.
        let name = after[..end].trim().trim_matches(['{', '}']).trim();
        if is_placeholder_name(name) && !found.iter().any(|seen: &String| seen == name) {
            found.push(name.to_string());
        }
        rest = &after[end + 2..];
    }
    found
}

pub fn undeclared_placeholders(content: &str, variables: &[String]) -> Vec<String> {
    let declared: BTreeSet<&str> = variables.iter().map(|v| v.trim()).collect();
    placeholders(content)
        .into_iter()
        .filter(|name| !declared.contains(name.as_str()))
        .collect()
}

/// Templates cached from the server, keyed by id.
pub struct TemplateBook<A: AdminApi> {
    api: A,
    store: ResourceStore<NotificationTemplate>,
}

impl<A: AdminApi> TemplateBook<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            store: ResourceStore::new(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&NotificationTemplate> {
        self.store.get(id)
    }

    pub fn templates(&self) -> impl Iterator<Item = &NotificationTemplate> {
        self.store.values()
    }

    pub fn refresh(&mut self) -> TemplateResult<usize> {
        let templates = self.api.list_templates()?;
        let count = templates.len();
        self.store.replace_all(
            templates
                .into_iter()
                .map(|template| (template.id.clone(), template)),
        );
        tracing::debug!(count, "notification templates refreshed");
        Ok(count)
    }

    pub fn create(&mut self, draft: &TemplateDraft) -> TemplateResult<&NotificationTemplate> {
        draft.validate()?;
        let created = self.api.create_template(draft)?;
        let id = created.id.clone();
        self.store.insert(id.clone(), created);
        self.store
            .get(&id)
            .ok_or(TemplateError::UnknownTemplate(id))
    }

    pub fn update(
        &mut self,
        id: &str,
        draft: &TemplateDraft,
    ) -> TemplateResult<&NotificationTemplate> {
        draft.validate()?;
        let updated = self.api.update_template(id, draft)?;
        self.store.insert(id, updated);
        self.store
            .get(id)
            .ok_or_else(|| TemplateError::UnknownTemplate(id.to_string()))
    }

    /// Flips `isActive` locally first and rolls back if the server refuses.
    pub fn set_active(&mut self, id: &str, active: bool) -> TemplateResult<()> {
        let mut optimistic = self
            .store
            .get(id)
            .cloned()
            .ok_or_else(|| TemplateError::UnknownTemplate(id.to_string()))?;
        optimistic.is_active = active;
        let rollback = self.store.write_optimistic(id, optimistic);

        match self.api.set_template_active(id, active) {
            Ok(confirmed) => {
                self.store.confirm(rollback, Some(confirmed));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(id, active, error = %err, "template toggle failed, rolling back");
                self.store.rollback(rollback);
                Err(err.into())
            }
        }
    }

    pub fn delete(&mut self, id: &str) -> TemplateResult<()> {
        self.api.delete_template(id)?;
        self.store.remove(id);
        Ok(())
    }
}
