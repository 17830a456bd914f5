use serde::{Deserialize, Serialize};

use crate::styling::ComponentStyling;
use crate::theme::ThemeMode;

/// Top-level keys of the serialized aggregate, in declaration order.
pub const SECTION_KEYS: [&str; 13] = [
    "applicationName",
    "applicationLogo",
    "applicationLogoType",
    "applicationLogoIcon",
    "applicationLogoIconColor",
    "applicationLogoBackgroundColor",
    "lightMode",
    "darkMode",
    "loginBackground",
    "globalStyling",
    "componentStyling",
    "drawerOverlay",
    "googleFontsApiKey",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogoType {
    Image,
    #[default]
    Icon,
}

/// Branding for the whole application instance.
///
/// Missing top-level sections deserialize to their defaults; sections that
/// are present must be complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandingConfig {
    pub application_name: String,
    /// Data URI or URL of the uploaded logo.
    pub application_logo: Option<String>,
    pub application_logo_type: LogoType,
    pub application_logo_icon: Option<String>,
    pub application_logo_icon_color: Option<String>,
    pub application_logo_background_color: Option<String>,
    pub light_mode: ModePalette,
    pub dark_mode: ModePalette,
    pub login_background: LoginBackground,
    pub global_styling: GlobalStyling,
    pub component_styling: ComponentStyling,
    pub drawer_overlay: DrawerOverlay,
    pub google_fonts_api_key: Option<String>,
}

impl BrandingConfig {
    pub fn palette(&self, mode: ThemeMode) -> &ModePalette {
        match mode {
            ThemeMode::Light => &self.light_mode,
            ThemeMode::Dark => &self.dark_mode,
        }
    }

    pub fn palette_mut(&mut self, mode: ThemeMode) -> &mut ModePalette {
        match mode {
            ThemeMode::Light => &mut self.light_mode,
            ThemeMode::Dark => &mut self.dark_mode,
        }
    }
}

impl Default for BrandingConfig {
    fn default() -> Self {
        super::defaults::default_branding_config()
    }
}

/// Named color tokens for one theme mode. Light and dark share this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModePalette {
    pub primary_color: String,
    pub secondary_color: String,
    pub warning_color: String,
    pub danger_color: String,
    pub top_menu_background_color: String,
    pub top_menu_text_color: String,
    pub platform_sidebar_background_color: String,
    pub platform_sidebar_text_color: String,
    pub secondary_sidebar_background_color: String,
    pub secondary_sidebar_text_color: String,
    pub body_background_color: String,
}

impl ModePalette {
    pub fn tokens(&self) -> [(&'static str, &str); 11] {
        [
            ("primaryColor", self.primary_color.as_str()),
            ("secondaryColor", self.secondary_color.as_str()),
            ("warningColor", self.warning_color.as_str()),
            ("dangerColor", self.danger_color.as_str()),
            ("topMenuBackgroundColor", self.top_menu_background_color.as_str()),
            ("topMenuTextColor", self.top_menu_text_color.as_str()),
            (
                "platformSidebarBackgroundColor",
                self.platform_sidebar_background_color.as_str(),
            ),
            ("platformSidebarTextColor", self.platform_sidebar_text_color.as_str()),
            (
                "secondarySidebarBackgroundColor",
                self.secondary_sidebar_background_color.as_str(),
            ),
            (
                "secondarySidebarTextColor",
                self.secondary_sidebar_text_color.as_str(),
            ),
            ("bodyBackgroundColor", self.body_background_color.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    #[default]
    Color,
    Gradient,
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    pub from: String,
    pub to: String,
    /// Degrees.
    pub angle: f64,
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            from: "#1e40af".to_string(),
            to: "#3b82f6".to_string(),
            angle: 135.0,
        }
    }
}

/// Login page background. Only the field selected by `kind` is rendered;
/// the other two keep whatever they held before the last type switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginBackground {
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub gradient: Gradient,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStyling {
    pub button_border_radius: String,
    pub button_border_width: String,
    pub input_border_radius: String,
    pub input_border_width: String,
    pub select_border_radius: String,
    pub select_border_width: String,
    pub textarea_border_radius: String,
    pub textarea_border_width: String,
    pub shadow_xs: String,
    pub shadow_sm: String,
    pub shadow_md: String,
    pub shadow_lg: String,
    pub shadow_xl: String,
    pub transition_duration: String,
    pub transition_timing: String,
    pub font_family: String,
    pub mono_font_family: String,
}

impl GlobalStyling {
    pub fn tokens(&self) -> [(&'static str, &str); 17] {
        [
            ("buttonBorderRadius", self.button_border_radius.as_str()),
            ("buttonBorderWidth", self.button_border_width.as_str()),
            ("inputBorderRadius", self.input_border_radius.as_str()),
            ("inputBorderWidth", self.input_border_width.as_str()),
            ("selectBorderRadius", self.select_border_radius.as_str()),
            ("selectBorderWidth", self.select_border_width.as_str()),
            ("textareaBorderRadius", self.textarea_border_radius.as_str()),
            ("textareaBorderWidth", self.textarea_border_width.as_str()),
            ("shadowXs", self.shadow_xs.as_str()),
            ("shadowSm", self.shadow_sm.as_str()),
            ("shadowMd", self.shadow_md.as_str()),
            ("shadowLg", self.shadow_lg.as_str()),
            ("shadowXl", self.shadow_xl.as_str()),
            ("transitionDuration", self.transition_duration.as_str()),
            ("transitionTiming", self.transition_timing.as_str()),
            ("fontFamily", self.font_family.as_str()),
            ("monoFontFamily", self.mono_font_family.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawerOverlay {
    pub color: String,
    /// 0.0 (transparent) to 1.0 (opaque).
    pub opacity: f64,
    /// Backdrop blur in pixels.
    pub blur: f64,
}
