pub mod api;
pub mod branding;
pub mod cli;
pub mod config;
pub mod css;
pub mod error;
pub mod icons;
pub mod logging;
pub mod logo;
pub mod notification;
pub mod reorder;
pub mod schema;
pub mod settings;
pub mod spaces;
pub mod state;
pub mod storage;
pub mod store;
pub mod styling;
pub mod templates;
pub mod theme;
pub use error::{AppError, AppResult};

#[cfg(test)]
pub(crate) mod test_support;

/// Entrypoint used by the `brandkit` binary.
pub fn run(cli: cli::Cli) -> AppResult<()> {
    let config = config::load_app_config();
    tracing::debug!(api = %config.api_base_url, "configuration loaded");
    cli::execute(cli.command, &config)
}
