//! Per-component, per-mode style overrides.
//!
//! The override map is keyed by component id string so that payloads naming
//! ids outside the built-in catalog survive a load/save cycle. Entries are
//! reference counted: [`update`] replaces one entry and shares the rest with
//! the previous config.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::theme::ThemeMode;

pub mod catalog;
pub mod record;
mod resolve;

pub use catalog::{ComponentId, StylingSelection, StylingTab, UnknownComponentId};
pub use record::{is_known_property, StyleRecord, BACKGROUND_COLOR, STYLE_PROPERTIES};
pub use resolve::{resolve, update, INPUT_BACKGROUND_DEFAULT};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentStyle {
    #[serde(default)]
    pub light: StyleRecord,
    #[serde(default)]
    pub dark: StyleRecord,
}

impl ComponentStyle {
    pub fn uniform(record: StyleRecord) -> Self {
        Self {
            light: record.clone(),
            dark: record,
        }
    }

    pub fn mode(&self, mode: ThemeMode) -> &StyleRecord {
        match mode {
            ThemeMode::Light => &self.light,
            ThemeMode::Dark => &self.dark,
        }
    }

    pub fn mode_mut(&mut self, mode: ThemeMode) -> &mut StyleRecord {
        match mode {
            ThemeMode::Light => &mut self.light,
            ThemeMode::Dark => &mut self.dark,
        }
    }
}

pub type ComponentStyling = BTreeMap<String, Arc<ComponentStyle>>;
