use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown component id: {0}")]
pub struct UnknownComponentId(pub String);

/// Editor tab a component id is reachable from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StylingTab {
    /// Surfaces with bespoke editors.
    Elements,
    /// Controls edited with the generic property editor.
    Components,
}

impl StylingTab {
    pub fn members(self) -> &'static [ComponentId] {
        match self {
            Self::Elements => &ComponentId::ELEMENTS,
            Self::Components => &ComponentId::COMPONENTS,
        }
    }

    pub fn first(self) -> ComponentId {
        self.members()[0]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentId {
    ApplicationLogo,
    LoginBackground,
    Typography,
    TopMenuBar,
    PlatformSidebar,
    VerticalTabMenu,
    PlatformSidebarPrimary,
    PlatformSidebarSecondary,
    PlatformSidebarMenuNormal,
    PlatformSidebarMenuHover,
    PlatformSidebarMenuActive,
    VerticalTabMenuNormal,
    VerticalTabMenuHover,
    VerticalTabMenuActive,
    TextInput,
    Select,
    MultiSelect,
    Textarea,
    Button,
    Card,
    Checkbox,
    Radio,
    Switch,
}

impl ComponentId {
    pub const ELEMENTS: [ComponentId; 6] = [
        Self::ApplicationLogo,
        Self::LoginBackground,
        Self::Typography,
        Self::TopMenuBar,
        Self::PlatformSidebar,
        Self::VerticalTabMenu,
    ];

    pub const COMPONENTS: [ComponentId; 9] = [
        Self::TextInput,
        Self::Select,
        Self::MultiSelect,
        Self::Textarea,
        Self::Button,
        Self::Card,
        Self::Checkbox,
        Self::Radio,
        Self::Switch,
    ];

    pub const ALL: [ComponentId; 23] = [
        Self::ApplicationLogo,
        Self::LoginBackground,
        Self::Typography,
        Self::TopMenuBar,
        Self::PlatformSidebar,
        Self::VerticalTabMenu,
        Self::PlatformSidebarPrimary,
        Self::PlatformSidebarSecondary,
        Self::PlatformSidebarMenuNormal,
        Self::PlatformSidebarMenuHover,
        Self::PlatformSidebarMenuActive,
        Self::VerticalTabMenuNormal,
        Self::VerticalTabMenuHover,
        Self::VerticalTabMenuActive,
        Self::TextInput,
        Self::Select,
        Self::MultiSelect,
        Self::Textarea,
        Self::Button,
        Self::Card,
        Self::Checkbox,
        Self::Radio,
        Self::Switch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ApplicationLogo => "application-logo",
            Self::LoginBackground => "login-background",
            Self::Typography => "typography",
            Self::TopMenuBar => "top-menu-bar",
            Self::PlatformSidebar => "platform-sidebar",
            Self::VerticalTabMenu => "vertical-tab-menu",
            Self::PlatformSidebarPrimary => "platform-sidebar-primary",
            Self::PlatformSidebarSecondary => "platform-sidebar-secondary",
            Self::PlatformSidebarMenuNormal => "platform-sidebar-menu-normal",
            Self::PlatformSidebarMenuHover => "platform-sidebar-menu-hover",
            Self::PlatformSidebarMenuActive => "platform-sidebar-menu-active",
            Self::VerticalTabMenuNormal => "vertical-tab-menu-normal",
            Self::VerticalTabMenuHover => "vertical-tab-menu-hover",
            Self::VerticalTabMenuActive => "vertical-tab-menu-active",
            Self::TextInput => "text-input",
            Self::Select => "select",
            Self::MultiSelect => "multi-select",
            Self::Textarea => "textarea",
            Self::Button => "button",
            Self::Card => "card",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Switch => "switch",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == value)
    }

    /// Sub-ids a composite surface is edited through; empty for leaves.
    pub fn parts(self) -> &'static [ComponentId] {
        match self {
            Self::PlatformSidebar => &[
                Self::PlatformSidebarPrimary,
                Self::PlatformSidebarSecondary,
                Self::PlatformSidebarMenuNormal,
                Self::PlatformSidebarMenuHover,
                Self::PlatformSidebarMenuActive,
            ],
            Self::VerticalTabMenu => &[
                Self::VerticalTabMenuNormal,
                Self::VerticalTabMenuHover,
                Self::VerticalTabMenuActive,
            ],
            _ => &[],
        }
    }

    pub fn parent(self) -> Option<ComponentId> {
        match self {
            Self::PlatformSidebarPrimary
            | Self::PlatformSidebarSecondary
            | Self::PlatformSidebarMenuNormal
            | Self::PlatformSidebarMenuHover
            | Self::PlatformSidebarMenuActive => Some(Self::PlatformSidebar),
            Self::VerticalTabMenuNormal | Self::VerticalTabMenuHover | Self::VerticalTabMenuActive => {
                Some(Self::VerticalTabMenu)
            }
            _ => None,
        }
    }

    pub fn tab(self) -> StylingTab {
        let root = self.parent().unwrap_or(self);
        if Self::COMPONENTS.contains(&root) {
            StylingTab::Components
        } else {
            StylingTab::Elements
        }
    }

    /// Ids whose background falls back to the filled input look.
    pub fn is_input_like(self) -> bool {
        matches!(
            self,
            Self::TextInput | Self::Select | Self::MultiSelect | Self::Textarea
        )
    }

    /// CSS selector the apply step targets for this id.
    pub fn selector(self) -> String {
        const SIDEBAR_MENU: &str = "[data-component=\"platform-sidebar-menu\"]";
        const TAB_MENU: &str = "[data-component=\"vertical-tab-menu-item\"]";
        match self {
            Self::PlatformSidebarMenuNormal => SIDEBAR_MENU.to_string(),
            Self::PlatformSidebarMenuHover => format!("{SIDEBAR_MENU}:hover"),
            Self::PlatformSidebarMenuActive => {
                format!("{SIDEBAR_MENU}.active, {SIDEBAR_MENU}[aria-current=\"page\"]")
            }
            Self::VerticalTabMenuNormal => TAB_MENU.to_string(),
            Self::VerticalTabMenuHover => format!("{TAB_MENU}:hover"),
            Self::VerticalTabMenuActive => {
                format!("{TAB_MENU}.active, {TAB_MENU}[aria-selected=\"true\"]")
            }
            other => format!("[data-component=\"{}\"]", other.as_str()),
        }
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentId {
    type Err = UnknownComponentId;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| UnknownComponentId(value.to_string()))
    }
}

/// Tab plus active component of the branding editor.
///
/// The active id always belongs to the active tab: switching tabs or
/// selecting an id from the other tab falls back to the tab's first id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StylingSelection {
    tab: StylingTab,
    active: ComponentId,
}

impl StylingSelection {
    pub fn new() -> Self {
        Self {
            tab: StylingTab::Elements,
            active: StylingTab::Elements.first(),
        }
    }

    pub fn tab(&self) -> StylingTab {
        self.tab
    }

    pub fn active(&self) -> ComponentId {
        self.active
    }

    pub fn switch_tab(&mut self, tab: StylingTab) {
        self.tab = tab;
        if self.active.tab() != tab {
            self.active = tab.first();
        }
    }

    /// Returns `false` when `id` was rejected and the selection reset.
    pub fn select(&mut self, id: ComponentId) -> bool {
        if id.tab() == self.tab {
            self.active = id;
            return true;
        }
        tracing::debug!(
            requested = %id,
            tab = ?self.tab,
            "component is not on the active tab; resetting selection"
        );
        self.active = self.tab.first();
        false
    }
}

impl Default for StylingSelection {
    fn default() -> Self {
        Self::new()
    }
}
