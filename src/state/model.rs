/// Lifecycle of a branding editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unloaded,
    Loading,
    /// In sync with the last load or save.
    Loaded,
    /// Local edits not yet saved.
    Editing,
    Saving,
}

impl SessionState {
    pub fn is_dirty(self) -> bool {
        matches!(self, Self::Editing)
    }
}
