//! REST back end seam.
//!
//! Everything that talks to the server goes through [`AdminApi`], so the
//! session and editors can be driven by a fake in tests.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::branding::BrandingConfig;
use crate::logo::LogoAsset;
use crate::reorder::ReorderBatch;
use crate::schema::AttributeOption;
use crate::settings::SystemSettings;
use crate::spaces::SpaceMenuItem;
use crate::templates::{NotificationTemplate, TemplateDraft};

mod http;

pub use http::HttpAdminApi;

const GENERIC_FAILURE: &str = "the server could not complete the request";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    #[error("http {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("invalid request: {0}")]
    Request(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// Builds a status error, taking the message from an `{"error": ...}`
    /// body when there is one.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .map(|body| body.error)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("{GENERIC_FAILURE} (status {status})"));
        Self::Status { status, message }
    }

    /// Text suitable for a notice shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => "could not reach the server".to_string(),
            Self::Timeout => "the server took too long to respond".to_string(),
            Self::Status { message, .. } => message.clone(),
            Self::Decode(_) => "the server sent an unexpected response".to_string(),
            Self::Request(message) => message.clone(),
        }
    }

    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout => true,
            Self::Status { status, .. } => (500..=599).contains(status),
            Self::Decode(_) | Self::Request(_) => false,
        }
    }
}

pub trait AdminApi {
    /// `GET /api/admin/branding`, raw so that it can be merged onto defaults.
    fn fetch_branding(&self) -> ApiResult<Value>;
    /// `PUT /api/admin/branding` with the whole aggregate.
    fn save_branding(&self, config: &BrandingConfig) -> ApiResult<()>;

    fn fetch_settings(&self) -> ApiResult<Value>;
    fn save_settings(&self, settings: &SystemSettings) -> ApiResult<()>;

    fn list_templates(&self) -> ApiResult<Vec<NotificationTemplate>>;
    fn create_template(&self, draft: &TemplateDraft) -> ApiResult<NotificationTemplate>;
    fn update_template(&self, id: &str, draft: &TemplateDraft)
        -> ApiResult<NotificationTemplate>;
    /// `PATCH` of `isActive` only.
    fn set_template_active(&self, id: &str, active: bool) -> ApiResult<NotificationTemplate>;
    fn delete_template(&self, id: &str) -> ApiResult<()>;

    fn replace_attribute_options(
        &self,
        model_id: &str,
        attribute_id: &str,
        options: &[AttributeOption],
    ) -> ApiResult<()>;
    fn reorder_data_models(&self, batch: &ReorderBatch) -> ApiResult<()>;
    fn replace_menu_items(&self, space_id: &str, items: &[SpaceMenuItem]) -> ApiResult<()>;

    /// Returns the stored logo's URL.
    fn upload_logo(&self, logo: &LogoAsset) -> ApiResult<String>;
}

impl<A: AdminApi + ?Sized> AdminApi for &A {
    fn fetch_branding(&self) -> ApiResult<Value> {
        (**self).fetch_branding()
    }

    fn save_branding(&self, config: &BrandingConfig) -> ApiResult<()> {
        (**self).save_branding(config)
    }

    fn fetch_settings(&self) -> ApiResult<Value> {
        (**self).fetch_settings()
    }

    fn save_settings(&self, settings: &SystemSettings) -> ApiResult<()> {
        (**self).save_settings(settings)
    }

    fn list_templates(&self) -> ApiResult<Vec<NotificationTemplate>> {
        (**self).list_templates()
    }

    fn create_template(&self, draft: &TemplateDraft) -> ApiResult<NotificationTemplate> {
        (**self).create_template(draft)
    }

    fn update_template(
        &self,
        id: &str,
        draft: &TemplateDraft,
    ) -> ApiResult<NotificationTemplate> {
        (**self).update_template(id, draft)
    }

    fn set_template_active(&self, id: &str, active: bool) -> ApiResult<NotificationTemplate> {
        (**self).set_template_active(id, active)
    }

    fn delete_template(&self, id: &str) -> ApiResult<()> {
        (**self).delete_template(id)
    }

    fn replace_attribute_options(
        &self,
        model_id: &str,
        attribute_id: &str,
        options: &[AttributeOption],
    ) -> ApiResult<()> {
        (**self).replace_attribute_options(model_id, attribute_id, options)
    }

    fn reorder_data_models(&self, batch: &ReorderBatch) -> ApiResult<()> {
        (**self).reorder_data_models(batch)
    }

    fn replace_menu_items(&self, space_id: &str, items: &[SpaceMenuItem]) -> ApiResult<()> {
        (**self).replace_menu_items(space_id, items)
    }

    fn upload_logo(&self, logo: &LogoAsset) -> ApiResult<String> {
        (**self).upload_logo(logo)
    }
}
