use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::api::{AdminApi, HttpAdminApi};
use crate::branding::{
    export_config, import_config, load_branding, BrandingConfig, BrandingSession, ImportPolicy,
    LoadSource,
};
use crate::config::AppConfig;
use crate::css::{render_stylesheet, ApplyTracker, FileSurface, MemorySurface, StyleSurface};
use crate::error::AppResult;
use crate::logo::LogoAsset;
use crate::notification::notifier_for;
use crate::settings::{load_settings, load_settings_from, save_settings, SystemSettings};
use crate::storage::{write_atomic, ExportStorage};
use crate::styling::{resolve, ComponentId};
use crate::templates::TemplateBook;
use crate::theme::{ModeSignals, ThemeMode};

const DEFAULT_PRUNE_AGE_HOURS: u64 = 24 * 30;

#[derive(Debug, Parser)]
#[command(name = "brandkit", version, about = "Branding, theming and settings for the admin console")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load branding from the API and write an export file
    Pull {
        /// Export target. Defaults to a timestamped file in the export directory.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Import an export file and save it to the API
    Push {
        file: PathBuf,
        /// Accept files with missing or unknown sections.
        #[arg(long, default_value_t = false)]
        lenient: bool,
        /// Also write the resulting stylesheet here.
        #[arg(long)]
        css: Option<PathBuf>,
    },
    /// Render the branding stylesheet
    Css {
        /// Read branding from an export file instead of the API.
        #[arg(long)]
        from: Option<PathBuf>,
        #[arg(long, value_parser = parse_mode)]
        mode: Option<ThemeMode>,
        /// Class attribute of the document root, e.g. "app dark".
        #[arg(long)]
        document_class: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the resolved light and dark style records of a component
    Resolve {
        id: String,
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Change one component style field in an export file
    SetStyle {
        file: PathBuf,
        id: String,
        #[arg(value_parser = parse_mode)]
        mode: ThemeMode,
        field: String,
        value: String,
    },
    /// Fetch system settings, merge them onto defaults and print them
    Settings {
        /// Merge this JSON file over the fetched settings and save the result.
        #[arg(long)]
        push: Option<PathBuf>,
    },
    /// Print a logo as a data URI, or upload it
    Logo {
        image: PathBuf,
        #[arg(long, default_value_t = false)]
        upload: bool,
    },
    /// Manage notification templates
    Templates {
        #[command(subcommand)]
        action: TemplateAction,
    },
    /// Delete old export files
    PruneExports {
        #[arg(long, default_value_t = DEFAULT_PRUNE_AGE_HOURS)]
        max_age_hours: u64,
    },
}

#[derive(Debug, Subcommand)]
pub enum TemplateAction {
    List,
    Enable { id: String },
    Disable { id: String },
}

fn parse_mode(value: &str) -> Result<ThemeMode, String> {
    ThemeMode::parse(value).ok_or_else(|| format!("unknown mode {value:?}, expected light or dark"))
}

pub fn execute(command: Command, config: &AppConfig) -> AppResult<()> {
    match command {
        Command::Pull { out } => pull(config, out.as_deref()),
        Command::Push { file, lenient, css } => {
            let policy = if lenient {
                ImportPolicy::Lenient
            } else {
                ImportPolicy::Strict
            };
            push(config, &file, policy, css)
        }
        Command::Css {
            from,
            mode,
            document_class,
            out,
        } => {
            let signals = ModeSignals::from_system()
                .with_toggle(mode)
                .with_document_class(document_class);
            css(config, from.as_deref(), &signals, out)
        }
        Command::Resolve { id, from } => resolve_component(config, &id, from.as_deref()),
        Command::SetStyle {
            file,
            id,
            mode,
            field,
            value,
        } => set_style(config, &file, &id, mode, &field, &value),
        Command::Settings { push } => settings(config, push.as_deref()),
        Command::Logo { image, upload } => logo(config, &image, upload),
        Command::Templates { action } => templates(config, action),
        Command::PruneExports { max_age_hours } => {
            let report = ExportStorage::from_config(config)?.prune_stale_exports(max_age_hours)?;
            println!("removed {} export file(s)", report.removed_files);
            Ok(())
        }
    }
}

fn read_config(config: &AppConfig, path: &Path, policy: ImportPolicy) -> AppResult<BrandingConfig> {
    let text = ExportStorage::from_config(config)?.read_import(path)?;
    Ok(import_config(&text, policy)?)
}

/// Session-backed load: an unreachable API yields the defaults with a notice.
fn branding_from_api(config: &AppConfig, signals: &ModeSignals) -> AppResult<BrandingConfig> {
    let api = HttpAdminApi::from_config(config)?;
    let mut session = BrandingSession::new(&api, Box::new(MemorySurface::new()), notifier_for(config))
        .with_mode_signals(signals.clone());
    session.load()?;
    Ok(session.config().clone())
}

fn pull(config: &AppConfig, out: Option<&Path>) -> AppResult<()> {
    let api = HttpAdminApi::from_config(config)?;
    let branding = load_branding(&api.fetch_branding()?)?;
    let path = ExportStorage::from_config(config)?.write_export(&export_config(&branding)?, out)?;
    println!("{}", path.display());
    Ok(())
}

fn push(
    config: &AppConfig,
    file: &Path,
    policy: ImportPolicy,
    css: Option<PathBuf>,
) -> AppResult<()> {
    let text = ExportStorage::from_config(config)?.read_import(file)?;
    let api = HttpAdminApi::from_config(config)?;
    let surface: Box<dyn StyleSurface> = match css {
        Some(path) => Box::new(FileSurface::new(path)),
        None => Box::new(MemorySurface::new()),
    };
    let mut session = BrandingSession::new(&api, surface, notifier_for(config))
        .with_mode_signals(ModeSignals::from_system());
    if session.load()? == LoadSource::Defaults {
        tracing::warn!("pushing over branding that could not be loaded");
    }
    session.import(&text, policy)?;
    session.save()?;
    println!("branding saved from {}", file.display());
    Ok(())
}

fn css(
    config: &AppConfig,
    from: Option<&Path>,
    signals: &ModeSignals,
    out: Option<PathBuf>,
) -> AppResult<()> {
    let branding = match from {
        Some(path) => read_config(config, path, ImportPolicy::Strict)?,
        None => branding_from_api(config, signals)?,
    };
    let mode = signals.detect();
    match out {
        Some(path) => {
            let mut surface = FileSurface::new(path);
            ApplyTracker::new().apply_all(&branding, mode, &mut surface)?;
            println!("{}", surface.path().display());
        }
        None => print!("{}", render_stylesheet(&branding, mode)),
    }
    Ok(())
}

fn resolve_component(config: &AppConfig, id: &str, from: Option<&Path>) -> AppResult<()> {
    if ComponentId::parse(id).is_none() {
        tracing::warn!(id, "component id is not in the built-in catalog");
    }
    let branding = match from {
        Some(path) => read_config(config, path, ImportPolicy::Strict)?,
        None => branding_from_api(config, &ModeSignals::default())?,
    };
    println!("{}", serde_json::to_string_pretty(&resolve(&branding, id))?);
    Ok(())
}

fn set_style(
    config: &AppConfig,
    file: &Path,
    id: &str,
    mode: ThemeMode,
    field: &str,
    value: &str,
) -> AppResult<()> {
    let branding = read_config(config, file, ImportPolicy::Strict)?;
    let updated = crate::styling::update(&branding, id, mode, field, value);
    write_atomic(file, &export_config(&updated)?)?;
    tracing::info!(id, %mode, field, path = %file.display(), "component style written");
    Ok(())
}

fn settings(config: &AppConfig, push: Option<&Path>) -> AppResult<()> {
    let api = HttpAdminApi::from_config(config)?;
    let mut settings = load_settings_from(&SystemSettings::default(), &api)?;
    match push {
        Some(path) => {
            let text = ExportStorage::from_config(config)?.read_import(path)?;
            settings = load_settings(&settings, &serde_json::from_str(&text)?)?;
            save_settings(&settings, &api)?;
        }
        None => {
            if let Err(err) = settings.validate() {
                tracing::warn!(error = %err, "remote settings do not validate");
            }
        }
    }
    println!("{}", serde_json::to_string_pretty(&settings.to_remote()?)?);
    Ok(())
}

fn logo(config: &AppConfig, image: &Path, upload: bool) -> AppResult<()> {
    let asset = LogoAsset::from_path(image)?;
    if upload {
        let api = HttpAdminApi::from_config(config)?;
        println!("{}", api.upload_logo(&asset)?);
    } else {
        println!("{}", asset.to_data_uri());
    }
    Ok(())
}

fn templates(config: &AppConfig, action: TemplateAction) -> AppResult<()> {
    let api = HttpAdminApi::from_config(config)?;
    let mut book = TemplateBook::new(&api);
    book.refresh()?;
    match action {
        TemplateAction::List => {
            for template in book.templates() {
                let status = if template.is_active { "active" } else { "inactive" };
                println!("{}\t{}\t{}\t{status}", template.id, template.kind, template.name);
            }
        }
        TemplateAction::Enable { id } => book.set_active(&id, true)?,
        TemplateAction::Disable { id } => book.set_active(&id, false)?,
    }
    Ok(())
}
