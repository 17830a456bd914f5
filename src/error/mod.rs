use crate::api::ApiError;
use crate::branding::{MergeError, SessionError, TransferError};
use crate::config::ConfigPathError;
use crate::css::SurfaceError;
use crate::logo::LogoError;
use crate::reorder::ReorderError;
use crate::schema::SchemaError;
use crate::settings::SettingsError;
use crate::state::StateError;
use crate::storage::StorageError;
use crate::templates::TemplateError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Merge(#[from] MergeError),
    #[error(transparent)]
    Transfer(#[from] TransferError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Reorder(#[from] ReorderError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Logo(#[from] LogoError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    ConfigPath(#[from] ConfigPathError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
