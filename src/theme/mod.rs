use serde::{Deserialize, Serialize};

const COLOR_SCHEME_ENV: &str = "BRANDKIT_COLOR_SCHEME";
const GTK_THEME_ENV: &str = "GTK_THEME";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub const ALL: [ThemeMode; 2] = [ThemeMode::Light, ThemeMode::Dark];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs used to pick the active mode, highest priority first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeSignals {
    /// Explicit light/dark toggle chosen in the editor.
    pub toggle: Option<ThemeMode>,
    /// Class attribute of the document root, e.g. `"app dark"`.
    pub document_class: Option<String>,
    /// Operating system dark-mode preference, when it could be read.
    pub os_prefers_dark: Option<bool>,
}

impl ModeSignals {
    pub fn from_system() -> Self {
        Self {
            os_prefers_dark: system_prefers_dark(),
            ..Self::default()
        }
    }

    pub fn with_toggle(mut self, mode: Option<ThemeMode>) -> Self {
        self.toggle = mode;
        self
    }

    pub fn with_document_class(mut self, classes: Option<String>) -> Self {
        self.document_class = classes;
        self
    }

    pub fn detect(&self) -> ThemeMode {
        if let Some(mode) = self.toggle {
            return mode;
        }
        if let Some(mode) = self
            .document_class
            .as_deref()
            .and_then(mode_from_document_class)
        {
            return mode;
        }
        match self.os_prefers_dark {
            Some(true) => ThemeMode::Dark,
            _ => ThemeMode::Light,
        }
    }
}

fn mode_from_document_class(classes: &str) -> Option<ThemeMode> {
    classes.split_whitespace().find_map(|class| match class {
        "dark" => Some(ThemeMode::Dark),
        "light" => Some(ThemeMode::Light),
        _ => None,
    })
}

/// Best-effort read of the desktop dark-mode preference.
pub fn system_prefers_dark() -> Option<bool> {
    system_prefers_dark_with(
        std::env::var(COLOR_SCHEME_ENV).ok().as_deref(),
        std::env::var(GTK_THEME_ENV).ok().as_deref(),
    )
}

fn system_prefers_dark_with(color_scheme: Option<&str>, gtk_theme: Option<&str>) -> Option<bool> {
    if let Some(mode) = color_scheme.and_then(ThemeMode::parse) {
        return Some(mode == ThemeMode::Dark);
    }
    let gtk_theme = gtk_theme.filter(|value| !value.is_empty())?;
    let lowered = gtk_theme.to_ascii_lowercase();
    Some(lowered.ends_with(":dark") || lowered.ends_with("-dark"))
}
