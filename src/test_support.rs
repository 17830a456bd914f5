use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::api::{AdminApi, ApiError, ApiResult};
use crate::branding::BrandingConfig;
use crate::logo::LogoAsset;
use crate::notification::{Notice, Notifier};
use crate::reorder::ReorderBatch;
use crate::schema::AttributeOption;
use crate::settings::SystemSettings;
use crate::spaces::SpaceMenuItem;
use crate::templates::{NotificationTemplate, TemplateDraft, TemplateKind};

pub fn fixture_root() -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos());
    let pid = std::process::id();
    path.push(format!("brandkit-test-{pid}-{nanos}"));
    path
}

pub fn with_temp_root<F: FnOnce(&Path)>(f: F) {
    let root = fixture_root();
    fs::create_dir_all(&root).unwrap();
    f(&root);
    let _ = fs::remove_dir_all(&root);
}

pub fn sample_template(id: &str, active: bool) -> NotificationTemplate {
    NotificationTemplate {
        id: id.to_string(),
        name: format!("Template {id}"),
        kind: TemplateKind::Push,
        subject: None,
        content: "Hello {{name}}".to_string(),
        variables: vec!["name".to_string()],
        is_active: active,
        created_at: "2024-01-01T00:00:00Z".to_string(),
        updated_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    FetchBranding,
    SaveBranding,
    FetchSettings,
    SaveSettings,
    ListTemplates,
    CreateTemplate { name: String },
    UpdateTemplate { id: String },
    SetTemplateActive { id: String, active: bool },
    DeleteTemplate { id: String },
    ReplaceAttributeOptions {
        model_id: String,
        attribute_id: String,
        values: Vec<String>,
    },
    ReorderDataModels { orders: Vec<(String, i64)> },
    ReplaceMenuItems { space_id: String, ids: Vec<String> },
    UploadLogo { mime: String },
}

#[derive(Debug, Default)]
struct FakeState {
    branding: Option<Value>,
    saved_branding: Vec<BrandingConfig>,
    settings: Option<Value>,
    saved_settings: Vec<SystemSettings>,
    templates: BTreeMap<String, NotificationTemplate>,
    next_id: usize,
    calls: Vec<ApiCall>,
    fail_next: Option<ApiError>,
}

/// In-memory back end. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct FakeAdminApi {
    state: Rc<RefCell<FakeState>>,
}

impl FakeAdminApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_branding(&self, remote: Value) {
        self.state.borrow_mut().branding = Some(remote);
    }

    pub fn seed_settings(&self, remote: Value) {
        self.state.borrow_mut().settings = Some(remote);
    }

    pub fn seed_template(&self, template: NotificationTemplate) {
        self.state
            .borrow_mut()
            .templates
            .insert(template.id.clone(), template);
    }

    /// Makes the next call fail with `err`.
    pub fn fail_next(&self, err: ApiError) {
        self.state.borrow_mut().fail_next = Some(err);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.borrow().calls.clone()
    }

    pub fn saved_branding(&self) -> Vec<BrandingConfig> {
        self.state.borrow().saved_branding.clone()
    }

    pub fn saved_settings(&self) -> Vec<SystemSettings> {
        self.state.borrow().saved_settings.clone()
    }

    fn record(&self, call: ApiCall) -> ApiResult<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(call);
        match state.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn template_from_draft(&self, id: String, draft: &TemplateDraft) -> NotificationTemplate {
        NotificationTemplate {
            id,
            name: draft.name.clone(),
            kind: draft.kind,
            subject: draft.subject.clone(),
            content: draft.content.clone(),
            variables: draft.variables.clone(),
            is_active: draft.is_active,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn not_found() -> ApiError {
        ApiError::from_status(404, r#"{"error": "Template not found"}"#)
    }
}

impl AdminApi for FakeAdminApi {
    fn fetch_branding(&self) -> ApiResult<Value> {
        self.record(ApiCall::FetchBranding)?;
        Ok(self
            .state
            .borrow()
            .branding
            .clone()
            .unwrap_or_else(|| Value::Object(Map::new())))
    }

    fn save_branding(&self, config: &BrandingConfig) -> ApiResult<()> {
        self.record(ApiCall::SaveBranding)?;
        self.state.borrow_mut().saved_branding.push(config.clone());
        Ok(())
    }

    fn fetch_settings(&self) -> ApiResult<Value> {
        self.record(ApiCall::FetchSettings)?;
        Ok(self
            .state
            .borrow()
            .settings
            .clone()
            .unwrap_or_else(|| Value::Object(Map::new())))
    }

    fn save_settings(&self, settings: &SystemSettings) -> ApiResult<()> {
        self.record(ApiCall::SaveSettings)?;
        self.state.borrow_mut().saved_settings.push(settings.clone());
        Ok(())
    }

    fn list_templates(&self) -> ApiResult<Vec<NotificationTemplate>> {
        self.record(ApiCall::ListTemplates)?;
        Ok(self.state.borrow().templates.values().cloned().collect())
    }

    fn create_template(&self, draft: &TemplateDraft) -> ApiResult<NotificationTemplate> {
        self.record(ApiCall::CreateTemplate {
            name: draft.name.clone(),
        })?;
        let id = {
            let mut state = self.state.borrow_mut();
            state.next_id += 1;
            format!("created-{}", state.next_id)
        };
        let template = self.template_from_draft(id.clone(), draft);
        self.state
            .borrow_mut()
            .templates
            .insert(id, template.clone());
        Ok(template)
    }

    fn update_template(
        &self,
        id: &str,
        draft: &TemplateDraft,
    ) -> ApiResult<NotificationTemplate> {
        self.record(ApiCall::UpdateTemplate { id: id.to_string() })?;
        if !self.state.borrow().templates.contains_key(id) {
            return Err(Self::not_found());
        }
        let template = self.template_from_draft(id.to_string(), draft);
        self.state
            .borrow_mut()
            .templates
            .insert(id.to_string(), template.clone());
        Ok(template)
    }

    fn set_template_active(&self, id: &str, active: bool) -> ApiResult<NotificationTemplate> {
        self.record(ApiCall::SetTemplateActive {
            id: id.to_string(),
            active,
        })?;
        let mut state = self.state.borrow_mut();
        let template = state.templates.get_mut(id).ok_or_else(Self::not_found)?;
        template.is_active = active;
        Ok(template.clone())
    }

    fn delete_template(&self, id: &str) -> ApiResult<()> {
        self.record(ApiCall::DeleteTemplate { id: id.to_string() })?;
        self.state
            .borrow_mut()
            .templates
            .remove(id)
            .map(|_| ())
            .ok_or_else(Self::not_found)
    }

    fn replace_attribute_options(
        &self,
        model_id: &str,
        attribute_id: &str,
        options: &[AttributeOption],
    ) -> ApiResult<()> {
        self.record(ApiCall::ReplaceAttributeOptions {
            model_id: model_id.to_string(),
            attribute_id: attribute_id.to_string(),
            values: options.iter().map(|o| o.value.clone()).collect(),
        })
    }

    fn reorder_data_models(&self, batch: &ReorderBatch) -> ApiResult<()> {
        self.record(ApiCall::ReorderDataModels {
            orders: batch
                .items
                .iter()
                .map(|item| (item.id.clone(), item.sort_order))
                .collect(),
        })
    }

    fn replace_menu_items(&self, space_id: &str, items: &[SpaceMenuItem]) -> ApiResult<()> {
        self.record(ApiCall::ReplaceMenuItems {
            space_id: space_id.to_string(),
            ids: items.iter().map(|item| item.id.clone()).collect(),
        })
    }

    fn upload_logo(&self, logo: &LogoAsset) -> ApiResult<String> {
        self.record(ApiCall::UploadLogo {
            mime: logo.mime().to_string(),
        })?;
        Ok(format!("/uploads/{}", logo.file_name()))
    }
}

/// Notifier that keeps every notice. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Rc<RefCell<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices.borrow_mut().push(notice.clone());
    }
}
