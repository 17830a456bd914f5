use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde_json::{json, Value};
use thiserror::Error;

use super::{render_section, CssSection};
use crate::branding::BrandingConfig;
use crate::storage::{write_atomic, StorageError};
use crate::theme::ThemeMode;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("stylesheet target is not a file path: {0}")]
    InvalidTarget(PathBuf),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type SurfaceResult<T> = std::result::Result<T, SurfaceError>;

/// Receives rendered stylesheet sections.
pub trait StyleSurface {
    fn apply_section(&mut self, section: CssSection, css: &str) -> SurfaceResult<()>;

    /// Called once after a batch of sections has been applied.
    fn commit(&mut self) -> SurfaceResult<()> {
        Ok(())
    }
}

fn section_input(config: &BrandingConfig, section: CssSection, mode: ThemeMode) -> Option<Value> {
    let value = match section {
        CssSection::Identity => json!({
            "name": config.application_name,
            "logo": config.application_logo,
            "logoType": config.application_logo_type,
            "icon": config.application_logo_icon,
            "iconColor": config.application_logo_icon_color,
            "backgroundColor": config.application_logo_background_color,
        }),
        CssSection::Palette => json!({
            "mode": mode,
            "palette": serde_json::to_value(config.palette(mode)).ok()?,
        }),
        CssSection::LoginBackground => serde_json::to_value(&config.login_background).ok()?,
        CssSection::GlobalStyling => serde_json::to_value(&config.global_styling).ok()?,
        CssSection::DrawerOverlay => serde_json::to_value(&config.drawer_overlay).ok()?,
        CssSection::Components => json!({
            "mode": mode,
            "styling": serde_json::to_value(&config.component_styling).ok()?,
        }),
    };
    Some(value)
}

/// Remembers the input each section was last rendered from.
#[derive(Debug, Default)]
pub struct ApplyTracker {
    applied: BTreeMap<CssSection, Value>,
}

impl ApplyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changed_sections(&self, config: &BrandingConfig, mode: ThemeMode) -> Vec<CssSection> {
        CssSection::ALL
            .into_iter()
            .filter(|section| {
                match (section_input(config, *section, mode), self.applied.get(section)) {
                    (Some(current), Some(previous)) => current != *previous,
                    _ => true,
                }
            })
            .collect()
    }

    /// Renders and applies the sections whose input changed since the last
    /// successful apply.
    pub fn apply(
        &mut self,
        config: &BrandingConfig,
        mode: ThemeMode,
        surface: &mut dyn StyleSurface,
    ) -> SurfaceResult<Vec<CssSection>> {
        let changed = self.changed_sections(config, mode);
        self.apply_sections(config, mode, surface, changed)
    }

    pub fn apply_all(
        &mut self,
        config: &BrandingConfig,
        mode: ThemeMode,
        surface: &mut dyn StyleSurface,
    ) -> SurfaceResult<Vec<CssSection>> {
        self.apply_sections(config, mode, surface, CssSection::ALL.to_vec())
    }

    pub fn reset(&mut self) {
        self.applied.clear();
    }

    fn apply_sections(
        &mut self,
        config: &BrandingConfig,
        mode: ThemeMode,
        surface: &mut dyn StyleSurface,
        sections: Vec<CssSection>,
    ) -> SurfaceResult<Vec<CssSection>> {
        if sections.is_empty() {
            tracing::trace!("stylesheet up to date");
            return Ok(sections);
        }
        for section in &sections {
            let css = render_section(config, *section, mode);
            surface.apply_section(*section, &css)?;
            match section_input(config, *section, mode) {
                Some(input) => {
                    self.applied.insert(*section, input);
                }
                None => {
                    self.applied.remove(section);
                }
            }
        }
        surface.commit()?;
        tracing::debug!(?sections, %mode, "applied stylesheet sections");
        Ok(sections)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    sections: BTreeMap<CssSection, String>,
    applied: Vec<CssSection>,
    commits: usize,
}

/// In-memory surface. Clones share the same state, so a caller can keep a
/// handle after boxing one into a session.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    state: Rc<RefCell<MemoryState>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self, section: CssSection) -> Option<String> {
        self.state.borrow().sections.get(&section).cloned()
    }

    /// Every section applied so far, in order, including repeats.
    pub fn applied(&self) -> Vec<CssSection> {
        self.state.borrow().applied.clone()
    }

    pub fn commits(&self) -> usize {
        self.state.borrow().commits
    }

    pub fn clear_log(&self) {
        self.state.borrow_mut().applied.clear();
    }
}

impl StyleSurface for MemorySurface {
    fn apply_section(&mut self, section: CssSection, css: &str) -> SurfaceResult<()> {
        let mut state = self.state.borrow_mut();
        state.sections.insert(section, css.to_string());
        state.applied.push(section);
        Ok(())
    }

    fn commit(&mut self) -> SurfaceResult<()> {
        self.state.borrow_mut().commits += 1;
        Ok(())
    }
}

/// Writes the assembled stylesheet to a file on every commit.
#[derive(Debug, Clone)]
pub struct FileSurface {
    path: PathBuf,
    sections: BTreeMap<CssSection, String>,
}

impl FileSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sections: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn assemble(&self) -> String {
        let mut out = String::new();
        for (section, css) in &self.sections {
            out.push_str(&format!("/* brandkit: {section} */\n"));
            out.push_str(css);
        }
        out
    }
}

impl StyleSurface for FileSurface {
    fn apply_section(&mut self, section: CssSection, css: &str) -> SurfaceResult<()> {
        self.sections.insert(section, css.to_string());
        Ok(())
    }

    fn commit(&mut self) -> SurfaceResult<()> {
        if self.path.file_name().is_none() {
            return Err(SurfaceError::InvalidTarget(self.path.clone()));
        }
        write_atomic(&self.path, &self.assemble())?;
        tracing::debug!(path = %self.path.display(), "wrote stylesheet");
        Ok(())
    }
}
