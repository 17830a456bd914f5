//! Load, edit, save and apply for one branding editing session.
//!
//! The session owns the aggregate and drives the [`StateMachine`]. Every
//! edit re-applies only the stylesheet sections whose input changed; loads
//! and saves re-apply everything.

use thiserror::Error;

use super::merge::load_branding;
use super::model::{BrandingConfig, DrawerOverlay, GlobalStyling, LoginBackground, LogoType, ModePalette};
use super::transfer::{export_config, import_config, ImportPolicy, TransferError};
use super::DEFAULT_LOGO_ICON;
use crate::api::{AdminApi, ApiError, ApiResult};
use crate::css::{ApplyTracker, CssSection, StyleSurface, SurfaceError};
use crate::icons::AppIcon;
use crate::logo::LogoAsset;
use crate::notification::{Notice, Notifier};
use crate::state::{SessionEvent, SessionState, StateError, StateMachine, StateTransition};
use crate::storage::unix_now;
use crate::styling;
use crate::theme::{ModeSignals, ThemeMode};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error("a save is already in flight")]
    SaveInFlight,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Transfer(#[from] TransferError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Where the aggregate came from after [`BrandingSession::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Remote,
    Defaults,
}

/// Snapshot handed out by [`BrandingSession::begin_save`].
#[derive(Debug, Clone)]
#[must_use = "pass the ticket back to finish_save"]
pub struct SaveTicket {
    generation: u64,
    payload: BrandingConfig,
}

impl SaveTicket {
    pub fn payload(&self) -> &BrandingConfig {
        &self.payload
    }
}

pub struct BrandingSession<A: AdminApi> {
    api: A,
    surface: Box<dyn StyleSurface>,
    notifier: Box<dyn Notifier>,
    machine: StateMachine,
    config: BrandingConfig,
    mode_signals: ModeSignals,
    tracker: ApplyTracker,
    last_saved: Option<u64>,
    /// Bumped on every edit, compared against a ticket's snapshot.
    edit_generation: u64,
}

impl<A: AdminApi> BrandingSession<A> {
    pub fn new(api: A, surface: Box<dyn StyleSurface>, notifier: Box<dyn Notifier>) -> Self {
        Self {
            api,
            surface,
            notifier,
            machine: StateMachine::new(),
            config: BrandingConfig::default(),
            mode_signals: ModeSignals::default(),
            tracker: ApplyTracker::new(),
            last_saved: None,
            edit_generation: 0,
        }
    }

    pub fn with_mode_signals(mut self, signals: ModeSignals) -> Self {
        self.mode_signals = signals;
        self
    }

    pub fn config(&self) -> &BrandingConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.machine.state()
    }

    pub fn history(&self) -> &[StateTransition] {
        self.machine.history()
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode_signals.detect()
    }

    /// Unix seconds of the last successful save.
    pub fn last_saved(&self) -> Option<u64> {
        self.last_saved
    }

    pub fn is_dirty(&self) -> bool {
        self.machine.state().is_dirty()
    }

    /// Fetches and merges the remote branding. Any failure leaves the
    /// defaults in place and still ends in `Loaded`.
    pub fn load(&mut self) -> SessionResult<LoadSource> {
        self.machine.transition(SessionEvent::BeginLoad)?;

        let fetched = match self.api.fetch_branding() {
            Ok(remote) => load_branding(&remote).map_err(|err| err.to_string()),
            Err(err) => Err(err.user_message()),
        };
        let source = match fetched {
            Ok(config) => {
                self.config = config;
                self.machine.transition(SessionEvent::LoadSucceeded)?;
                tracing::info!("branding loaded");
                LoadSource::Remote
            }
            Err(reason) => {
                tracing::warn!(%reason, "branding load failed, using defaults");
                self.config = BrandingConfig::default();
                self.machine.transition(SessionEvent::LoadFailed)?;
                self.notifier.notify(&Notice::warning(format!(
                    "Could not load branding, showing defaults: {reason}"
                )));
                LoadSource::Defaults
            }
        };

        self.edit_generation = 0;
        self.tracker.reset();
        self.apply()?;
        Ok(source)
    }

    /// Applies `change` to the aggregate and re-applies what it touched.
    pub fn edit<F>(&mut self, change: F) -> SessionResult<Vec<CssSection>>
    where
        F: FnOnce(&mut BrandingConfig),
    {
        self.machine.transition(SessionEvent::Edit)?;
        change(&mut self.config);
        self.edit_generation += 1;
        let mode = self.mode();
        Ok(self
            .tracker
            .apply(&self.config, mode, self.surface.as_mut())?)
    }

    pub fn set_application_name(&mut self, name: &str) -> SessionResult<Vec<CssSection>> {
        let name = name.trim().to_string();
        self.edit(|config| config.application_name = name)
    }

    /// Switches to an uploaded or inlined image logo.
    pub fn set_logo_image(&mut self, logo: &LogoAsset) -> SessionResult<Vec<CssSection>> {
        let uri = logo.to_data_uri();
        self.edit(|config| {
            config.application_logo = Some(uri);
            config.application_logo_type = LogoType::Image;
        })
    }

    pub fn set_logo_icon(&mut self, icon: AppIcon) -> SessionResult<Vec<CssSection>> {
        self.edit(|config| {
            config.application_logo_icon = Some(icon.as_str().to_string());
            config.application_logo_type = LogoType::Icon;
        })
    }

    /// Drops any image logo and returns to the default icon.
    pub fn clear_logo(&mut self) -> SessionResult<Vec<CssSection>> {
        self.edit(|config| {
            config.application_logo = None;
            config.application_logo_type = LogoType::Icon;
            config.application_logo_icon = Some(DEFAULT_LOGO_ICON.to_string());
        })
    }

    pub fn set_palette(
        &mut self,
        mode: ThemeMode,
        palette: ModePalette,
    ) -> SessionResult<Vec<CssSection>> {
        self.edit(|config| *config.palette_mut(mode) = palette)
    }

    pub fn set_login_background(
        &mut self,
        background: LoginBackground,
    ) -> SessionResult<Vec<CssSection>> {
        self.edit(|config| config.login_background = background)
    }

    pub fn set_global_styling(&mut self, styling: GlobalStyling) -> SessionResult<Vec<CssSection>> {
        self.edit(|config| config.global_styling = styling)
    }

    pub fn set_drawer_overlay(&mut self, overlay: DrawerOverlay) -> SessionResult<Vec<CssSection>> {
        self.edit(|config| config.drawer_overlay = overlay)
    }

    pub fn update_component_style(
        &mut self,
        component_id: &str,
        mode: ThemeMode,
        field: &str,
        value: &str,
    ) -> SessionResult<Vec<CssSection>> {
        let next = styling::update(&self.config, component_id, mode, field, value);
        self.edit(|config| *config = next)
    }

    /// Replaces the aggregate with an imported document. A rejected import
    /// changes nothing.
    pub fn import(&mut self, text: &str, policy: ImportPolicy) -> SessionResult<Vec<CssSection>> {
        let imported = import_config(text, policy)?;
        tracing::info!(?policy, "branding imported");
        self.edit(|config| *config = imported)
    }

    pub fn export(&self) -> SessionResult<String> {
        Ok(export_config(&self.config)?)
    }

    /// Snapshots the aggregate for saving. Refuses while another save is
    /// pending.
    pub fn begin_save(&mut self) -> SessionResult<SaveTicket> {
        if self.machine.state() == SessionState::Saving {
            tracing::debug!("save requested while one is in flight");
            return Err(SessionError::SaveInFlight);
        }
        self.machine.transition(SessionEvent::BeginSave)?;
        Ok(SaveTicket {
            generation: self.edit_generation,
            payload: self.config.clone(),
        })
    }

    /// Records the outcome of the request made for `ticket`.
    pub fn finish_save(&mut self, ticket: SaveTicket, result: ApiResult<()>) -> SessionResult<()> {
        match result {
            Ok(()) => {
                self.machine.transition(SessionEvent::SaveSucceeded)?;
                self.last_saved = Some(unix_now());
                if self.edit_generation != ticket.generation {
                    self.machine.transition(SessionEvent::Edit)?;
                }
                tracing::info!(state = ?self.machine.state(), "branding saved");
                self.notifier.notify(&Notice::info("Branding saved"));
                self.apply()
            }
            Err(err) => {
                self.machine.transition(SessionEvent::SaveFailed)?;
                let transient = err.is_transient();
                tracing::warn!(error = %err, transient, "branding save failed");
                let retry = if transient { " (try again in a moment)" } else { "" };
                self.notifier.notify(&Notice::error(format!(
                    "Saving branding failed: {}{retry}",
                    err.user_message()
                )));
                Err(err.into())
            }
        }
    }

    /// Saves synchronously through the session's API.
    pub fn save(&mut self) -> SessionResult<()> {
        let ticket = self.begin_save()?;
        let result = self.api.save_branding(ticket.payload());
        self.finish_save(ticket, result)
    }

    /// Re-renders and re-applies every section.
    pub fn apply(&mut self) -> SessionResult<()> {
        let mode = self.mode();
        self.tracker
            .apply_all(&self.config, mode, self.surface.as_mut())?;
        Ok(())
    }

    /// Updates the mode inputs; re-applies mode-dependent sections when
    /// the detected mode changes.
    pub fn set_mode_signals(&mut self, signals: ModeSignals) -> SessionResult<Vec<CssSection>> {
        self.mode_signals = signals;
        let mode = self.mode();
        Ok(self
            .tracker
            .apply(&self.config, mode, self.surface.as_mut())?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::css::MemorySurface;
    use crate::notification::NoticeLevel;
    use crate::test_support::{ApiCall, FakeAdminApi, RecordingNotifier};

    struct Harness {
        api: FakeAdminApi,
        surface: MemorySurface,
        notices: RecordingNotifier,
        session: BrandingSession<FakeAdminApi>,
    }

    fn harness() -> Harness {
        let api = FakeAdminApi::new();
        let surface = MemorySurface::new();
        let notices = RecordingNotifier::default();
        let session = BrandingSession::new(
            api.clone(),
            Box::new(surface.clone()),
            Box::new(notices.clone()),
        );
        Harness {
            api,
            surface,
            notices,
            session,
        }
    }

    fn loaded() -> Harness {
        let mut h = harness();
        h.session.load().unwrap();
        h.surface.clear_log();
        h
    }

    #[test]
    fn load_merges_remote_onto_defaults_and_applies() {
        let mut h = harness();
        h.api
            .seed_branding(json!({ "darkMode": { "primaryColor": "#111" } }));

        assert_eq!(h.session.load().unwrap(), LoadSource::Remote);
        assert_eq!(h.session.state(), SessionState::Loaded);
        assert_eq!(h.session.config().dark_mode.primary_color, "#111");
        assert_eq!(
            h.session.config().light_mode,
            BrandingConfig::default().light_mode
        );
        assert_eq!(h.surface.applied(), CssSection::ALL.to_vec());
        assert!(h.notices.notices().is_empty());
    }

    #[test]
    fn failed_load_keeps_defaults_and_notifies() {
        let mut h = harness();
        h.api.fail_next(ApiError::Timeout);

        assert_eq!(h.session.load().unwrap(), LoadSource::Defaults);
        assert_eq!(h.session.state(), SessionState::Loaded);
        assert_eq!(h.session.config(), &BrandingConfig::default());
        let notices = h.notices.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert_eq!(h.surface.commits(), 1);
    }

    #[test]
    fn non_object_payload_falls_back_to_defaults() {
        let mut h = harness();
        h.api.seed_branding(json!([1, 2, 3]));
        assert_eq!(h.session.load().unwrap(), LoadSource::Defaults);
        assert_eq!(h.session.config(), &BrandingConfig::default());
    }

    #[test]
    fn edit_before_load_is_rejected() {
        let mut h = harness();
        let err = h.session.set_application_name("Acme").unwrap_err();
        assert!(matches!(err, SessionError::State(_)));
        assert_eq!(h.session.config().application_name, BrandingConfig::default().application_name);
    }

    #[test]
    fn edits_reapply_only_touched_sections() {
        let mut h = loaded();

        let applied = h.session.set_application_name("  Acme  ").unwrap();
        assert_eq!(applied, vec![CssSection::Identity]);
        assert_eq!(h.session.config().application_name, "Acme");
        assert_eq!(h.session.state(), SessionState::Editing);

        let applied = h
            .session
            .update_component_style("card", ThemeMode::Light, "padding", "24px")
            .unwrap();
        assert_eq!(applied, vec![CssSection::Components]);
        assert!(h.session.is_dirty());
    }

    #[test]
    fn dark_palette_edit_is_invisible_in_light_mode() {
        let mut h = loaded();
        let mut palette = h.session.config().dark_mode.clone();
        palette.primary_color = "#000000".to_string();

        let applied = h.session.set_palette(ThemeMode::Dark, palette).unwrap();
        assert!(applied.is_empty());

        let applied = h
            .session
            .set_mode_signals(ModeSignals::default().with_toggle(Some(ThemeMode::Dark)))
            .unwrap();
        assert_eq!(applied, vec![CssSection::Palette, CssSection::Components]);
        assert_eq!(h.session.mode(), ThemeMode::Dark);
    }

    #[test]
    fn save_success_records_time_and_returns_to_loaded() {
        let mut h = loaded();
        h.session.set_application_name("Acme").unwrap();

        h.session.save().unwrap();
        assert_eq!(h.session.state(), SessionState::Loaded);
        assert!(h.session.last_saved().is_some());
        let saved = h.api.saved_branding();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].application_name, "Acme");
        assert!(h.api.calls().contains(&ApiCall::SaveBranding));
        assert_eq!(h.notices.notices()[0].level, NoticeLevel::Info);
    }

    #[test]
    fn second_save_while_pending_is_refused() {
        let mut h = loaded();
        let ticket = h.session.begin_save().unwrap();
        assert!(matches!(
            h.session.begin_save(),
            Err(SessionError::SaveInFlight)
        ));
        h.session.finish_save(ticket, Ok(())).unwrap();
        assert_eq!(h.session.state(), SessionState::Loaded);
    }

    #[test]
    fn edits_during_save_leave_the_session_dirty() {
        let mut h = loaded();
        let ticket = h.session.begin_save().unwrap();
        h.session.set_application_name("Later").unwrap();
        assert_eq!(h.session.state(), SessionState::Saving);
        assert_eq!(ticket.payload().application_name, BrandingConfig::default().application_name);

        h.session.finish_save(ticket, Ok(())).unwrap();
        assert_eq!(h.session.state(), SessionState::Editing);
        assert_eq!(h.session.config().application_name, "Later");
    }

    #[test]
    fn failed_save_keeps_local_edits() {
        let mut h = loaded();
        h.session.set_application_name("Acme").unwrap();
        h.api.fail_next(ApiError::Status {
            status: 403,
            message: "Forbidden".to_string(),
        });

        let err = h.session.save().unwrap_err();
        assert!(matches!(err, SessionError::Api(ApiError::Status { status: 403, .. })));
        assert_eq!(h.session.state(), SessionState::Editing);
        assert_eq!(h.session.config().application_name, "Acme");
        assert_eq!(h.session.last_saved(), None);
        let notices = h.notices.notices();
        assert_eq!(notices.last().map(|n| n.level), Some(NoticeLevel::Error));
        assert!(notices[0].body.contains("Forbidden"));
        assert!(!notices[0].body.contains("try again"));
    }

    #[test]
    fn transient_save_failure_suggests_a_retry() {
        let mut h = loaded();
        h.session.set_application_name("Acme").unwrap();
        h.api.fail_next(ApiError::Status {
            status: 503,
            message: "Unavailable".to_string(),
        });

        assert!(h.session.save().is_err());
        let notices = h.notices.notices();
        assert!(notices[0].body.contains("Unavailable"));
        assert!(notices[0].body.contains("try again"));
    }

    #[test]
    fn rejected_import_changes_nothing() {
        let mut h = loaded();
        let before = h.session.config().clone();

        let err = h.session.import("{ not json", ImportPolicy::Strict).unwrap_err();
        assert!(matches!(err, SessionError::Transfer(TransferError::InvalidJson(_))));
        assert_eq!(h.session.config(), &before);
        assert_eq!(h.session.state(), SessionState::Loaded);
    }

    #[test]
    fn export_then_import_restores_the_aggregate() {
        let mut h = loaded();
        h.session.set_logo_icon(AppIcon::Rocket).unwrap();
        let exported = h.session.export().unwrap();

        h.session.clear_logo().unwrap();
        h.session.import(&exported, ImportPolicy::Strict).unwrap();
        assert_eq!(
            h.session.config().application_logo_icon.as_deref(),
            Some(AppIcon::Rocket.as_str())
        );
    }

    #[test]
    fn history_tracks_the_lifecycle() {
        let mut h = loaded();
        h.session.set_application_name("Acme").unwrap();
        h.session.save().unwrap();

        let events: Vec<SessionEvent> = h.session.history().iter().map(|t| t.event).collect();
        assert_eq!(
            events,
            [
                SessionEvent::BeginLoad,
                SessionEvent::LoadSucceeded,
                SessionEvent::Edit,
                SessionEvent::BeginSave,
                SessionEvent::SaveSucceeded,
            ]
        );
    }
}
