use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Symbolic icons selectable for the application logo and data models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppIcon {
    #[default]
    Building2,
    Building,
    Home,
    Briefcase,
    Globe,
    Layers,
    LayoutDashboard,
    Rocket,
    Shield,
    Star,
    Zap,
    Box,
    Database,
    Users,
    Settings,
    Sparkles,
    Heart,
    Leaf,
    Cloud,
    Palette,
}

impl AppIcon {
    pub const ALL: [AppIcon; 20] = [
        AppIcon::Building2,
        AppIcon::Building,
        AppIcon::Home,
        AppIcon::Briefcase,
        AppIcon::Globe,
        AppIcon::Layers,
        AppIcon::LayoutDashboard,
        AppIcon::Rocket,
        AppIcon::Shield,
        AppIcon::Star,
        AppIcon::Zap,
        AppIcon::Box,
        AppIcon::Database,
        AppIcon::Users,
        AppIcon::Settings,
        AppIcon::Sparkles,
        AppIcon::Heart,
        AppIcon::Leaf,
        AppIcon::Cloud,
        AppIcon::Palette,
    ];

    /// Stored name, as written into `applicationLogoIcon`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Building2 => "Building2",
            Self::Building => "Building",
            Self::Home => "Home",
            Self::Briefcase => "Briefcase",
            Self::Globe => "Globe",
            Self::Layers => "Layers",
            Self::LayoutDashboard => "LayoutDashboard",
            Self::Rocket => "Rocket",
            Self::Shield => "Shield",
            Self::Star => "Star",
            Self::Zap => "Zap",
            Self::Box => "Box",
            Self::Database => "Database",
            Self::Users => "Users",
            Self::Settings => "Settings",
            Self::Sparkles => "Sparkles",
            Self::Heart => "Heart",
            Self::Leaf => "Leaf",
            Self::Cloud => "Cloud",
            Self::Palette => "Palette",
        }
    }

    /// Glyph name in the Lucide icon set.
    pub fn lucide_name(self) -> &'static str {
        match self {
            Self::Building2 => "building-2",
            Self::Building => "building",
            Self::Home => "house",
            Self::Briefcase => "briefcase",
            Self::Globe => "globe",
            Self::Layers => "layers",
            Self::LayoutDashboard => "layout-dashboard",
            Self::Rocket => "rocket",
            Self::Shield => "shield",
            Self::Star => "star",
            Self::Zap => "zap",
            Self::Box => "box",
            Self::Database => "database",
            Self::Users => "users",
            Self::Settings => "settings",
            Self::Sparkles => "sparkles",
            Self::Heart => "heart",
            Self::Leaf => "leaf",
            Self::Cloud => "cloud",
            Self::Palette => "palette",
        }
    }

    /// Case, `-`, `_` and spaces are ignored, so `building-2`, `Building2`
    /// and `building_2` all name the same icon.
    pub fn parse(value: &str) -> Option<Self> {
        let wanted = normalize(value);
        if wanted.is_empty() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|icon| normalize(icon.as_str()) == wanted || normalize(icon.lucide_name()) == wanted)
    }
}

fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !matches!(ch, '-' | '_' | ' '))
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

/// Icon for a stored name, falling back to [`AppIcon::default`].
pub fn resolve_icon(name: Option<&str>) -> AppIcon {
    match name {
        None => AppIcon::default(),
        Some(name) => AppIcon::parse(name).unwrap_or_else(|| {
            tracing::debug!(name, "unknown icon name, using fallback");
            AppIcon::default()
        }),
    }
}

impl fmt::Display for AppIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AppIcon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AppIcon {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(resolve_icon(Some(&name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ignores_case_and_separators() {
        assert_eq!(AppIcon::parse("Building2"), Some(AppIcon::Building2));
        assert_eq!(AppIcon::parse("building-2"), Some(AppIcon::Building2));
        assert_eq!(AppIcon::parse("layout_dashboard"), Some(AppIcon::LayoutDashboard));
        assert_eq!(AppIcon::parse("house"), Some(AppIcon::Home));
        assert_eq!(AppIcon::parse(""), None);
        assert_eq!(AppIcon::parse("Unicorn"), None);
    }

    #[test]
    fn unknown_names_fall_back_to_the_default_icon() {
        assert_eq!(resolve_icon(Some("Unicorn")), AppIcon::Building2);
        assert_eq!(resolve_icon(None), AppIcon::Building2);
        assert_eq!(resolve_icon(Some("Rocket")), AppIcon::Rocket);
    }

    #[test]
    fn every_icon_round_trips_through_its_names() {
        for icon in AppIcon::ALL {
            assert_eq!(AppIcon::parse(icon.as_str()), Some(icon));
            assert_eq!(AppIcon::parse(icon.lucide_name()), Some(icon));
        }
    }

    #[test]
    fn deserializing_an_unknown_icon_uses_the_fallback() {
        let icon: AppIcon = serde_json::from_str("\"NoSuchIcon\"").unwrap();
        assert_eq!(icon, AppIcon::default());
        assert_eq!(serde_json::to_string(&AppIcon::Zap).unwrap(), "\"Zap\"");
    }

    #[test]
    fn default_matches_the_default_branding_icon() {
        assert_eq!(
            AppIcon::default().as_str(),
            crate::branding::DEFAULT_LOGO_ICON
        );
    }
}
