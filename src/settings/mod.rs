//! System settings and their merge-on-load from the flat remote payload.
//!
//! The back end stores settings as loosely typed key/value pairs, so flags
//! may arrive as `"true"`/`"false"` and numbers as numeric strings. Loading
//! never fails on a bad value; the previous value is kept instead.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::api::{AdminApi, ApiError};
use crate::branding::merge::json_kind;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("remote settings payload must be a JSON object, got {kind}")]
    NotAnObject { kind: &'static str },
    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
    pub site_name: String,
    pub site_description: String,
    pub site_url: String,
    pub support_email: String,
    pub default_language: String,
    pub timezone: String,

    pub db_host: String,
    pub db_port: u16,
    pub db_name: String,
    pub db_user: String,
    pub db_password: String,
    pub db_ssl: bool,

    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: String,
    pub smtp_secure: bool,
    pub smtp_from: String,

    /// Minutes.
    pub session_timeout: u32,
    pub max_login_attempts: u32,
    pub password_min_length: u32,
    pub require_two_factor: bool,
    pub password_require_special: bool,

    pub enable_registration: bool,
    pub enable_notifications: bool,
    pub enable_audit_log: bool,
    pub maintenance_mode: bool,
    pub enable_api_access: bool,

    pub max_file_size_mb: u32,
    /// Comma separated extensions.
    pub allowed_file_types: String,
    pub storage_provider: String,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            site_name: "Spaces".to_string(),
            site_description: String::new(),
            site_url: "http://localhost:3000".to_string(),
            support_email: String::new(),
            default_language: "en".to_string(),
            timezone: "UTC".to_string(),
            db_host: "localhost".to_string(),
            db_port: 5432,
            db_name: "spaces".to_string(),
            db_user: "postgres".to_string(),
            db_password: String::new(),
            db_ssl: false,
            smtp_host: String::new(),
            smtp_port: 587,
            smtp_user: String::new(),
            smtp_password: String::new(),
            smtp_secure: true,
            smtp_from: String::new(),
            session_timeout: 30,
            max_login_attempts: 5,
            password_min_length: 8,
            require_two_factor: false,
            password_require_special: true,
            enable_registration: false,
            enable_notifications: true,
            enable_audit_log: true,
            maintenance_mode: false,
            enable_api_access: true,
            max_file_size_mb: 10,
            allowed_file_types: "jpg,jpeg,png,gif,pdf,doc,docx,xls,xlsx,csv".to_string(),
            storage_provider: "local".to_string(),
        }
    }
}

fn merge_text(target: &mut String, remote: Option<&Value>) {
    match remote {
        Some(Value::String(text)) => target.clone_from(text),
        Some(Value::Number(number)) => *target = number.to_string(),
        Some(Value::Bool(flag)) => *target = flag.to_string(),
        _ => {}
    }
}

fn merge_flag(target: &mut bool, remote: Option<&Value>) {
    match remote {
        Some(Value::Bool(flag)) => *target = *flag,
        Some(Value::String(text)) if text == "true" => *target = true,
        Some(Value::String(text)) if text == "false" => *target = false,
        _ => {}
    }
}

fn merge_number<N: FromStr>(target: &mut N, remote: Option<&Value>) {
    let parsed = match remote {
        Some(Value::Number(number)) => number.to_string().parse().ok(),
        Some(Value::String(text)) => text.trim().parse().ok(),
        _ => None,
    };
    if let Some(value) = parsed {
        *target = value;
    }
}

impl SystemSettings {
    /// One-level merge of a flat remote payload over `self`.
    pub fn merge_remote(&self, remote: &Map<String, Value>) -> Self {
        let mut next = self.clone();
        let get = |key: &str| remote.get(key);

        merge_text(&mut next.site_name, get("siteName"));
        merge_text(&mut next.site_description, get("siteDescription"));
        merge_text(&mut next.site_url, get("siteUrl"));
        merge_text(&mut next.support_email, get("supportEmail"));
        merge_text(&mut next.default_language, get("defaultLanguage"));
        merge_text(&mut next.timezone, get("timezone"));

        merge_text(&mut next.db_host, get("dbHost"));
        merge_number(&mut next.db_port, get("dbPort"));
        merge_text(&mut next.db_name, get("dbName"));
        merge_text(&mut next.db_user, get("dbUser"));
        merge_text(&mut next.db_password, get("dbPassword"));
        merge_flag(&mut next.db_ssl, get("dbSsl"));

        merge_text(&mut next.smtp_host, get("smtpHost"));
        merge_number(&mut next.smtp_port, get("smtpPort"));
        merge_text(&mut next.smtp_user, get("smtpUser"));
        merge_text(&mut next.smtp_password, get("smtpPassword"));
        merge_flag(&mut next.smtp_secure, get("smtpSecure"));
        merge_text(&mut next.smtp_from, get("smtpFrom"));

        merge_number(&mut next.session_timeout, get("sessionTimeout"));
        merge_number(&mut next.max_login_attempts, get("maxLoginAttempts"));
        merge_number(&mut next.password_min_length, get("passwordMinLength"));
        merge_flag(&mut next.require_two_factor, get("requireTwoFactor"));
        merge_flag(&mut next.password_require_special, get("passwordRequireSpecial"));

        merge_flag(&mut next.enable_registration, get("enableRegistration"));
        merge_flag(&mut next.enable_notifications, get("enableNotifications"));
        merge_flag(&mut next.enable_audit_log, get("enableAuditLog"));
        merge_flag(&mut next.maintenance_mode, get("maintenanceMode"));
        merge_flag(&mut next.enable_api_access, get("enableApiAccess"));

        merge_number(&mut next.max_file_size_mb, get("maxFileSizeMb"));
        merge_text(&mut next.allowed_file_types, get("allowedFileTypes"));
        merge_text(&mut next.storage_provider, get("storageProvider"));

        next
    }

    /// Checks run before the settings are sent.
    pub fn validate(&self) -> SettingsResult<()> {
        let invalid = |field: &'static str, reason: &str| {
            Err(SettingsError::Invalid {
                field,
                reason: reason.to_string(),
            })
        };
        if self.site_name.trim().is_empty() {
            return invalid("siteName", "must not be empty");
        }
        if !self.support_email.is_empty() && !self.support_email.contains('@') {
            return invalid("supportEmail", "must be an email address");
        }
        if self.db_port == 0 {
            return invalid("dbPort", "must be a port number");
        }
        if !self.smtp_host.is_empty() && self.smtp_port == 0 {
            return invalid("smtpPort", "must be a port number");
        }
        if self.password_min_length == 0 {
            return invalid("passwordMinLength", "must be at least 1");
        }
        if self.max_login_attempts == 0 {
            return invalid("maxLoginAttempts", "must be at least 1");
        }
        Ok(())
    }

    pub fn allowed_file_types(&self) -> impl Iterator<Item = &str> {
        self.allowed_file_types
            .split(',')
            .map(str::trim)
            .filter(|ext| !ext.is_empty())
    }

    pub fn to_remote(&self) -> SettingsResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Merges a fetched payload onto `previous`.
pub fn load_settings(previous: &SystemSettings, remote: &Value) -> SettingsResult<SystemSettings> {
    match remote {
        Value::Object(map) => {
            let merged = previous.merge_remote(map);
            tracing::debug!(keys = map.len(), "settings merged");
            Ok(merged)
        }
        other => Err(SettingsError::NotAnObject {
            kind: json_kind(other),
        }),
    }
}

/// Fetches the remote settings and merges them onto `previous`.
pub fn load_settings_from(
    previous: &SystemSettings,
    api: &impl AdminApi,
) -> SettingsResult<SystemSettings> {
    load_settings(previous, &api.fetch_settings()?)
}

/// Validates `settings` and sends them. Nothing is sent when validation fails.
pub fn save_settings(settings: &SystemSettings, api: &impl AdminApi) -> SettingsResult<()> {
    settings.validate()?;
    api.save_settings(settings)?;
    tracing::info!(site_name = %settings.site_name, "settings saved");
    Ok(())
}
