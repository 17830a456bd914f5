use std::time::Duration;

use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{AdminApi, ApiError, ApiResult};
use crate::branding::BrandingConfig;
use crate::config::AppConfig;
use crate::logo::LogoAsset;
use crate::reorder::ReorderBatch;
use crate::schema::AttributeOption;
use crate::settings::SystemSettings;
use crate::spaces::SpaceMenuItem;
use crate::templates::{NotificationTemplate, TemplateDraft};

const TEMPLATES_PATH: &str = "/api/admin/notification-templates";

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        ApiError::Transport(err.to_string())
    }
}

/// Ids are interpolated into request paths, so only plain segments pass.
fn path_segment<'a>(kind: &str, id: &'a str) -> ApiResult<&'a str> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_'));
    if valid {
        Ok(id)
    } else {
        Err(ApiError::Request(format!("invalid {kind} id {id:?}")))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TemplateListing {
    Bare(Vec<NotificationTemplate>),
    Wrapped { templates: Vec<NotificationTemplate> },
}

#[derive(Deserialize)]
struct UploadedLogo {
    url: String,
}

#[derive(Debug, Clone)]
pub struct HttpAdminApi {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpAdminApi {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> ApiResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::Request(format!(
                "api base url must be http(s): {base_url:?}"
            )));
        }
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("brandkit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(map_reqwest_error)?;
        Ok(Self {
            http,
            base_url,
            token: token.filter(|token| !token.is_empty()),
        })
    }

    pub fn from_config(config: &AppConfig) -> ApiResult<Self> {
        Self::new(
            config.api_base_url.clone(),
            config.api_token.clone(),
            config.request_timeout(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{path}", self.base_url));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder.send().map_err(map_reqwest_error)?;
        let status = response.status();
        tracing::debug!(status = status.as_u16(), url = %response.url(), "api response");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        let err = ApiError::from_status(status.as_u16(), &body);
        tracing::warn!(status = status.as_u16(), error = %err, "api request failed");
        Err(err)
    }

    fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        self.send(builder)?.json().map_err(map_reqwest_error)
    }

    fn send_empty(&self, builder: RequestBuilder) -> ApiResult<()> {
        self.send(builder).map(|_| ())
    }
}

impl AdminApi for HttpAdminApi {
    fn fetch_branding(&self) -> ApiResult<Value> {
        self.send_json(self.request(Method::GET, "/api/admin/branding"))
    }

    fn save_branding(&self, config: &BrandingConfig) -> ApiResult<()> {
        self.send_empty(self.request(Method::PUT, "/api/admin/branding").json(config))
    }

    fn fetch_settings(&self) -> ApiResult<Value> {
        self.send_json(self.request(Method::GET, "/api/settings"))
    }

    fn save_settings(&self, settings: &SystemSettings) -> ApiResult<()> {
        self.send_empty(self.request(Method::PUT, "/api/settings").json(settings))
    }

    fn list_templates(&self) -> ApiResult<Vec<NotificationTemplate>> {
        let listing: TemplateListing = self.send_json(self.request(Method::GET, TEMPLATES_PATH))?;
        Ok(match listing {
            TemplateListing::Bare(templates) | TemplateListing::Wrapped { templates } => templates,
        })
    }

    fn create_template(&self, draft: &TemplateDraft) -> ApiResult<NotificationTemplate> {
        self.send_json(self.request(Method::POST, TEMPLATES_PATH).json(draft))
    }

    fn update_template(
        &self,
        id: &str,
        draft: &TemplateDraft,
    ) -> ApiResult<NotificationTemplate> {
        let id = path_segment("template", id)?;
        self.send_json(
            self.request(Method::PUT, &format!("{TEMPLATES_PATH}/{id}"))
                .json(draft),
        )
    }

    fn set_template_active(&self, id: &str, active: bool) -> ApiResult<NotificationTemplate> {
        let id = path_segment("template", id)?;
        self.send_json(
            self.request(Method::PATCH, &format!("{TEMPLATES_PATH}/{id}"))
                .json(&json!({ "isActive": active })),
        )
    }

    fn delete_template(&self, id: &str) -> ApiResult<()> {
        let id = path_segment("template", id)?;
        self.send_empty(self.request(Method::DELETE, &format!("{TEMPLATES_PATH}/{id}")))
    }

    fn replace_attribute_options(
        &self,
        model_id: &str,
        attribute_id: &str,
        options: &[AttributeOption],
    ) -> ApiResult<()> {
        let model_id = path_segment("data model", model_id)?;
        let attribute_id = path_segment("attribute", attribute_id)?;
        let path = format!("/api/data-models/{model_id}/attributes/{attribute_id}/options");
        self.send_empty(self.request(Method::PUT, &path).json(options))
    }

    fn reorder_data_models(&self, batch: &ReorderBatch) -> ApiResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        self.send_empty(
            self.request(Method::PUT, "/api/data-models/reorder")
                .json(batch),
        )
    }

    fn replace_menu_items(&self, space_id: &str, items: &[SpaceMenuItem]) -> ApiResult<()> {
        let space_id = path_segment("space", space_id)?;
        self.send_empty(
            self.request(Method::PUT, &format!("/api/spaces/{space_id}/menu-items"))
                .json(items),
        )
    }

    fn upload_logo(&self, logo: &LogoAsset) -> ApiResult<String> {
        let part = multipart::Part::bytes(logo.bytes().to_vec())
            .file_name(logo.file_name())
            .mime_str(logo.mime())
            .map_err(|err| ApiError::Request(err.to_string()))?;
        let form = multipart::Form::new().part("file", part);
        let uploaded: UploadedLogo =
            self.send_json(self.request(Method::POST, "/api/upload/logo").multipart(form))?;
        Ok(uploaded.url)
    }
}
