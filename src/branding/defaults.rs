use std::sync::Arc;

use super::model::{
    BackgroundKind, BrandingConfig, DrawerOverlay, GlobalStyling, Gradient, LoginBackground,
    LogoType, ModePalette,
};
use crate::styling::{ComponentId, ComponentStyle, ComponentStyling, StyleRecord};

pub const DEFAULT_APPLICATION_NAME: &str = "Spaces";
pub const DEFAULT_LOGO_ICON: &str = "Building2";

pub fn default_light_palette() -> ModePalette {
    ModePalette {
        primary_color: "#1e40af".to_string(),
        secondary_color: "#64748b".to_string(),
        warning_color: "#f59e0b".to_string(),
        danger_color: "#dc2626".to_string(),
        top_menu_background_color: "#ffffff".to_string(),
        top_menu_text_color: "#0f172a".to_string(),
        platform_sidebar_background_color: "#f8fafc".to_string(),
        platform_sidebar_text_color: "#0f172a".to_string(),
        secondary_sidebar_background_color: "#ffffff".to_string(),
        secondary_sidebar_text_color: "#334155".to_string(),
        body_background_color: "#ffffff".to_string(),
    }
}

pub fn default_dark_palette() -> ModePalette {
    ModePalette {
        primary_color: "#3b82f6".to_string(),
        secondary_color: "#94a3b8".to_string(),
        warning_color: "#fbbf24".to_string(),
        danger_color: "#f87171".to_string(),
        top_menu_background_color: "#0f172a".to_string(),
        top_menu_text_color: "#f8fafc".to_string(),
        platform_sidebar_background_color: "#020617".to_string(),
        platform_sidebar_text_color: "#e2e8f0".to_string(),
        secondary_sidebar_background_color: "#0f172a".to_string(),
        secondary_sidebar_text_color: "#cbd5e1".to_string(),
        body_background_color: "#020617".to_string(),
    }
}

pub fn default_global_styling() -> GlobalStyling {
    GlobalStyling {
        button_border_radius: "6px".to_string(),
        button_border_width: "1px".to_string(),
        input_border_radius: "6px".to_string(),
        input_border_width: "1px".to_string(),
        select_border_radius: "6px".to_string(),
        select_border_width: "1px".to_string(),
        textarea_border_radius: "6px".to_string(),
        textarea_border_width: "1px".to_string(),
        shadow_xs: "0 1px 2px 0 rgba(0, 0, 0, 0.05)".to_string(),
        shadow_sm: "0 1px 3px 0 rgba(0, 0, 0, 0.1), 0 1px 2px -1px rgba(0, 0, 0, 0.1)".to_string(),
        shadow_md: "0 4px 6px -1px rgba(0, 0, 0, 0.1), 0 2px 4px -2px rgba(0, 0, 0, 0.1)"
            .to_string(),
        shadow_lg: "0 10px 15px -3px rgba(0, 0, 0, 0.1), 0 4px 6px -4px rgba(0, 0, 0, 0.1)"
            .to_string(),
        shadow_xl: "0 20px 25px -5px rgba(0, 0, 0, 0.1), 0 8px 10px -6px rgba(0, 0, 0, 0.1)"
            .to_string(),
        transition_duration: "150ms".to_string(),
        transition_timing: "cubic-bezier(0.4, 0, 0.2, 1)".to_string(),
        font_family: "Roboto, sans-serif".to_string(),
        mono_font_family: "\"JetBrains Mono\", monospace".to_string(),
    }
}

fn default_component_styling() -> ComponentStyling {
    let mut styling = ComponentStyling::new();
    styling.insert(
        ComponentId::PlatformSidebarMenuActive.as_str().to_string(),
        Arc::new(ComponentStyle {
            light: StyleRecord::new()
                .with("backgroundColor", "#e0e7ff")
                .with("textColor", "#1e40af"),
            dark: StyleRecord::new()
                .with("backgroundColor", "#1e293b")
                .with("textColor", "#93c5fd"),
        }),
    );
    styling.insert(
        ComponentId::VerticalTabMenuActive.as_str().to_string(),
        Arc::new(ComponentStyle {
            light: StyleRecord::new()
                .with("borderColor", "#1e40af")
                .with("textColor", "#1e40af"),
            dark: StyleRecord::new()
                .with("borderColor", "#3b82f6")
                .with("textColor", "#93c5fd"),
        }),
    );
    styling
}

/// Compiled-in branding used before the first load and whenever it fails.
pub fn default_branding_config() -> BrandingConfig {
    BrandingConfig {
        application_name: DEFAULT_APPLICATION_NAME.to_string(),
        application_logo: None,
        application_logo_type: LogoType::Icon,
        application_logo_icon: Some(DEFAULT_LOGO_ICON.to_string()),
        application_logo_icon_color: Some("#ffffff".to_string()),
        application_logo_background_color: Some("#1e40af".to_string()),
        light_mode: default_light_palette(),
        dark_mode: default_dark_palette(),
        login_background: LoginBackground {
            kind: BackgroundKind::Gradient,
            color: "#1e40af".to_string(),
            gradient: Gradient::default(),
            image: String::new(),
        },
        global_styling: default_global_styling(),
        component_styling: default_component_styling(),
        drawer_overlay: DrawerOverlay {
            color: "#000000".to_string(),
            opacity: 0.5,
            blur: 4.0,
        },
        google_fonts_api_key: None,
    }
}
