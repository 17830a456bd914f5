use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPathError {
    MissingHomeDirectory,
}

impl std::fmt::Display for ConfigPathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingHomeDirectory => f.write_str("missing HOME environment variable"),
        }
    }
}

impl std::error::Error for ConfigPathError {}

pub const APP_DIR: &str = "brandkit";
const APP_CONFIG_FILE: &str = "config.json";
const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_URL: &str = "BRANDKIT_API_URL";
pub const ENV_API_TOKEN: &str = "BRANDKIT_API_TOKEN";

/// Application-level settings from `config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
    pub export_dir: Option<PathBuf>,
    pub desktop_notifications: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_token: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            export_dir: None,
            desktop_notifications: false,
        }
    }
}

impl AppConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    fn with_env_overrides(mut self, overrides: &EnvOverrides) -> Self {
        if let Some(url) = overrides.api_url.as_ref().filter(|url| !url.is_empty()) {
            self.api_base_url.clone_from(url);
        }
        if let Some(token) = overrides.api_token.as_ref().filter(|token| !token.is_empty()) {
            self.api_token = Some(token.clone());
        }
        self
    }
}

#[derive(Debug, Clone, Default)]
struct EnvOverrides {
    api_url: Option<String>,
    api_token: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            api_url: std::env::var(ENV_API_URL).ok(),
            api_token: std::env::var(ENV_API_TOKEN).ok(),
        }
    }
}

pub fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
        .with_env_overrides(&EnvOverrides::from_env())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return AppConfig::default(),
    };
    if !path.exists() {
        return AppConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            AppConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            AppConfig::default()
        }
    }
}

pub fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub fn data_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = xdg_root(xdg_config_home, home, ".config")?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

/// `$XDG_DATA_HOME/<app_dir>`, falling back to `~/.local/share/<app_dir>`.
pub fn app_data_dir(
    app_dir: &str,
    xdg_data_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = xdg_root(xdg_data_home, home, ".local/share")?;
    path.push(app_dir);
    Ok(path)
}

fn xdg_root(
    xdg_home: Option<&Path>,
    home: Option<&Path>,
    home_relative: &str,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(home_relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::with_temp_root;

    #[test]
    fn app_config_path_prefers_xdg_config_home() {
        let path = app_config_path(
            "brandkit",
            "config.json",
            Some(Path::new("/tmp/config-root")),
            Some(Path::new("/tmp/home")),
        )
        .expect("path should resolve");

        assert_eq!(path, PathBuf::from("/tmp/config-root/brandkit/config.json"));
    }

    #[test]
    fn app_config_path_falls_back_to_home_dot_config() {
        let path = app_config_path("brandkit", "config.json", None, Some(Path::new("/tmp/home")))
            .expect("path should resolve");

        assert_eq!(path, PathBuf::from("/tmp/home/.config/brandkit/config.json"));
    }

    #[test]
    fn app_config_path_errors_when_home_missing_and_xdg_unset() {
        let error = app_config_path("brandkit", "config.json", None, None).unwrap_err();
        assert_eq!(error, ConfigPathError::MissingHomeDirectory);
    }

    #[test]
    fn app_data_dir_uses_local_share_fallback() {
        let path = app_data_dir("brandkit", Some(Path::new("")), Some(Path::new("/tmp/home")))
            .expect("path should resolve");
        assert_eq!(path, PathBuf::from("/tmp/home/.local/share/brandkit"));
    }

    #[test]
    fn missing_config_file_yields_defaults() {
        with_temp_root(|root| {
            let config = load_app_config_with(Some(root), None);
            assert_eq!(config, AppConfig::default());
            assert_eq!(config.request_timeout(), Duration::from_secs(30));
        });
    }

    #[test]
    fn partial_config_file_keeps_other_defaults() {
        with_temp_root(|root| {
            let dir = root.join(APP_DIR);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(
                dir.join(APP_CONFIG_FILE),
                r#"{"api_base_url": "https://admin.example.com", "request_timeout_secs": 5}"#,
            )
            .unwrap();

            let config = load_app_config_with(Some(root), None);
            assert_eq!(config.api_base_url, "https://admin.example.com");
            assert_eq!(config.request_timeout(), Duration::from_secs(5));
            assert_eq!(config.api_token, None);
        });
    }

    #[test]
    fn unparsable_config_file_yields_defaults() {
        with_temp_root(|root| {
            let dir = root.join(APP_DIR);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join(APP_CONFIG_FILE), "{ nope").unwrap();
            assert_eq!(load_app_config_with(Some(root), None), AppConfig::default());
        });
    }

    #[test]
    fn environment_overrides_win_over_the_file() {
        let config = AppConfig {
            api_token: Some("file-token".to_string()),
            ..AppConfig::default()
        };
        let overrides = EnvOverrides {
            api_url: Some("https://env.example.com".to_string()),
            api_token: Some(String::new()),
        };
        let config = config.with_env_overrides(&overrides);
        assert_eq!(config.api_base_url, "https://env.example.com");
        assert_eq!(config.api_token.as_deref(), Some("file-token"));
    }
}
