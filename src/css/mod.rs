//! Stylesheet rendering for the branding aggregate.
//!
//! The stylesheet is split into independent sections so that an edit only
//! re-renders what it touched. See [`ApplyTracker`].

use std::fmt::{self, Write as _};

use crate::branding::{BackgroundKind, BrandingConfig, LogoType};
use crate::icons::resolve_icon;
use crate::styling::{ComponentId, StyleRecord};
use crate::theme::ThemeMode;

mod apply;

pub use apply::{
    ApplyTracker, FileSurface, MemorySurface, StyleSurface, SurfaceError, SurfaceResult,
};

/// Elements inside embedded space-module content keep their own styling.
pub const SPACE_MODULE_EXCLUSION: &str = ":not([data-space-module] *)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CssSection {
    Identity,
    Palette,
    LoginBackground,
    GlobalStyling,
    DrawerOverlay,
    Components,
}

impl CssSection {
    pub const ALL: [CssSection; 6] = [
        CssSection::Identity,
        CssSection::Palette,
        CssSection::LoginBackground,
        CssSection::GlobalStyling,
        CssSection::DrawerOverlay,
        CssSection::Components,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Palette => "palette",
            Self::LoginBackground => "login-background",
            Self::GlobalStyling => "global-styling",
            Self::DrawerOverlay => "drawer-overlay",
            Self::Components => "components",
        }
    }

    pub fn depends_on_mode(self) -> bool {
        matches!(self, Self::Palette | Self::Components)
    }
}

impl fmt::Display for CssSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `primaryColor` -> `primary-color`.
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Declaration name for a style record property, or `None` when the name
/// cannot be emitted.
pub fn css_property(name: &str) -> Option<String> {
    if name.is_empty() || !name.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        return None;
    }
    let property = match name {
        "textColor" => "color".to_string(),
        "iconColor" | "placeholderColor" => format!("--{}", kebab_case(name)),
        other => kebab_case(other),
    };
    Some(property)
}

pub fn is_safe_value(value: &str) -> bool {
    !value.contains([';', '{', '}', '<'])
}

fn push_declaration(out: &mut String, property: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    if !is_safe_value(value) {
        tracing::debug!(property, value, "skipping unsafe css value");
        return;
    }
    let _ = writeln!(out, "  {property}: {value};");
}

fn push_rule(out: &mut String, selector: &str, body: &str) {
    if body.is_empty() {
        return;
    }
    let _ = write!(out, "{selector} {{\n{body}}}\n");
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Declaration whose value embeds `text` as a quoted css string. Inside
/// quotes only markup and line breaks are refused.
fn push_quoted(
    out: &mut String,
    property: &str,
    text: &str,
    format_value: impl FnOnce(String) -> String,
) {
    if text.contains(['<', '\n', '\r']) {
        tracing::debug!(property, "skipping unsafe css string");
        return;
    }
    let _ = writeln!(out, "  {property}: {};", format_value(quoted(text)));
}

fn hex_to_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut digits = hex.chars().map(|ch| ch.to_string().repeat(2));
            let r = channel(&digits.next()?)?;
            let g = channel(&digits.next()?)?;
            let b = channel(&digits.next()?)?;
            Some((r, g, b))
        }
        6 => Some((
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

/// `color` at `opacity`. Hex colors become `rgba()`, anything else is mixed
/// with transparent.
pub fn with_opacity(color: &str, opacity: f64) -> String {
    let opacity = opacity.clamp(0.0, 1.0);
    match hex_to_rgb(color) {
        Some((r, g, b)) => format!("rgba({r}, {g}, {b}, {opacity})"),
        None => format!(
            "color-mix(in srgb, {color} {}%, transparent)",
            (opacity * 100.0).round()
        ),
    }
}

fn render_identity(config: &BrandingConfig) -> String {
    let mut body = String::new();
    push_quoted(&mut body, "--app-name", &config.application_name, |name| name);
    if let Some(color) = &config.application_logo_icon_color {
        push_declaration(&mut body, "--app-logo-icon-color", color);
    }
    if let Some(color) = &config.application_logo_background_color {
        push_declaration(&mut body, "--app-logo-background-color", color);
    }
    match config.application_logo_type {
        LogoType::Image => {
            if let Some(logo) = config.application_logo.as_deref().filter(|l| !l.is_empty()) {
                push_quoted(&mut body, "--app-logo-image", logo, |logo| format!("url({logo})"));
            }
        }
        LogoType::Icon => {
            let icon = resolve_icon(config.application_logo_icon.as_deref());
            push_quoted(&mut body, "--app-logo-icon", icon.lucide_name(), |name| name);
        }
    }

    let mut out = String::new();
    push_rule(&mut out, ":root", &body);
    out
}

fn render_palette(config: &BrandingConfig, mode: ThemeMode) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "  color-scheme: {mode};");
    for (name, value) in config.palette(mode).tokens() {
        push_declaration(&mut body, &format!("--{}", kebab_case(name)), value);
    }

    let mut out = String::new();
    push_rule(&mut out, ":root", &body);
    out
}

fn render_login_background(config: &BrandingConfig) -> String {
    let background = &config.login_background;
    let mut body = String::new();
    match background.kind {
        BackgroundKind::Color => {
            push_declaration(&mut body, "background", &background.color);
        }
        BackgroundKind::Gradient => {
            let gradient = &background.gradient;
            let value = format!(
                "linear-gradient({}deg, {}, {})",
                gradient.angle, gradient.from, gradient.to
            );
            push_declaration(&mut body, "background", &value);
        }
        BackgroundKind::Image if background.image.is_empty() => {}
        BackgroundKind::Image => {
            push_quoted(&mut body, "background", &background.image, |image| {
                format!("url({image}) center / cover no-repeat")
            });
        }
    }

    let mut out = String::new();
    push_rule(&mut out, "[data-login-background]", &body);
    out
}

fn render_global_styling(config: &BrandingConfig) -> String {
    let styling = &config.global_styling;
    let mut out = String::new();

    let mut tokens = String::new();
    for (name, value) in styling.tokens() {
        push_declaration(&mut tokens, &format!("--{}", kebab_case(name)), value);
    }
    push_rule(&mut out, ":root", &tokens);

    let controls: [(&str, &str, &str); 4] = [
        ("button", "button-border-radius", "button-border-width"),
        (
            "input:not([type=\"checkbox\"]):not([type=\"radio\"])",
            "input-border-radius",
            "input-border-width",
        ),
        ("select", "select-border-radius", "select-border-width"),
        ("textarea", "textarea-border-radius", "textarea-border-width"),
    ];
    for (element, radius, width) in controls {
        let body = format!(
            "  border-radius: var(--{radius});\n  border-width: var(--{width});\n  \
             transition-duration: var(--transition-duration);\n  \
             transition-timing-function: var(--transition-timing);\n"
        );
        push_rule(&mut out, &format!("{element}{SPACE_MODULE_EXCLUSION}"), &body);
    }

    push_rule(
        &mut out,
        &format!("body{SPACE_MODULE_EXCLUSION}"),
        "  font-family: var(--font-family);\n",
    );
    push_rule(
        &mut out,
        &format!(
            "code{SPACE_MODULE_EXCLUSION}, pre{SPACE_MODULE_EXCLUSION}, kbd{SPACE_MODULE_EXCLUSION}"
        ),
        "  font-family: var(--mono-font-family);\n",
    );
    out
}

fn render_drawer_overlay(config: &BrandingConfig) -> String {
    let overlay = &config.drawer_overlay;
    let mut body = String::new();
    push_declaration(
        &mut body,
        "background-color",
        &with_opacity(&overlay.color, overlay.opacity),
    );
    let blur = overlay.blur.max(0.0);
    let _ = writeln!(body, "  backdrop-filter: blur({blur}px);");

    let mut out = String::new();
    push_rule(&mut out, "[data-drawer-overlay]", &body);
    out
}

fn component_selector(id: &str) -> Option<String> {
    if let Some(known) = ComponentId::parse(id) {
        return Some(known.selector());
    }
    if !id.is_empty() && id.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-') {
        return Some(format!("[data-component=\"{id}\"]"));
    }
    tracing::debug!(component_id = id, "skipping component with unusable id");
    None
}

fn render_record(record: &StyleRecord) -> String {
    let mut body = String::new();
    for (name, value) in record.iter() {
        match css_property(name) {
            Some(property) => push_declaration(&mut body, &property, value),
            None => tracing::debug!(property = name, "skipping unusable property name"),
        }
    }
    body
}

fn render_components(config: &BrandingConfig, mode: ThemeMode) -> String {
    let mut out = String::new();
    for (id, style) in &config.component_styling {
        let Some(selector) = component_selector(id) else {
            continue;
        };
        push_rule(&mut out, &selector, &render_record(style.mode(mode)));
    }
    out
}

pub fn render_section(config: &BrandingConfig, section: CssSection, mode: ThemeMode) -> String {
    match section {
        CssSection::Identity => render_identity(config),
        CssSection::Palette => render_palette(config, mode),
        CssSection::LoginBackground => render_login_background(config),
        CssSection::GlobalStyling => render_global_styling(config),
        CssSection::DrawerOverlay => render_drawer_overlay(config),
        CssSection::Components => render_components(config, mode),
    }
}

/// The full stylesheet, sections in [`CssSection::ALL`] order.
pub fn render_stylesheet(config: &BrandingConfig, mode: ThemeMode) -> String {
    let mut out = String::new();
    for section in CssSection::ALL {
        let _ = writeln!(out, "/* brandkit: {section} */");
        out.push_str(&render_section(config, section, mode));
    }
    out
}
