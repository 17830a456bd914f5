use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use thiserror::Error;

use crate::config::{app_data_dir, data_env_dirs, AppConfig, ConfigPathError, APP_DIR};

const EXPORT_PREFIX: &str = "branding_";
const EXPORT_EXTENSION: &str = "json";
const EXPORTS_SUBDIR: &str = "exports";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl From<ConfigPathError> for StorageError {
    fn from(err: ConfigPathError) -> Self {
        match err {
            ConfigPathError::MissingHomeDirectory => Self::MissingHomeDirectory,
        }
    }
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Default, Clone)]
pub struct PruneReport {
    pub removed_files: usize,
}

/// Directory of exported branding documents.
#[derive(Debug, Clone)]
pub struct ExportStorage {
    export_dir: PathBuf,
}

impl ExportStorage {
    pub const fn with_path(export_dir: PathBuf) -> Self {
        Self { export_dir }
    }

    /// `export_dir` from config, else the per-user data directory.
    pub fn from_config(config: &AppConfig) -> StorageResult<Self> {
        if let Some(dir) = &config.export_dir {
            return Ok(Self::with_path(dir.clone()));
        }
        let (xdg_data_home, home) = data_env_dirs();
        let mut dir = app_data_dir(APP_DIR, xdg_data_home.as_deref(), home.as_deref())?;
        dir.push(EXPORTS_SUBDIR);
        Ok(Self::with_path(dir))
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn export_path_at(&self, unix_secs: u64) -> PathBuf {
        let mut path = self.export_dir.clone();
        path.push(format!("{EXPORT_PREFIX}{unix_secs}.{EXPORT_EXTENSION}"));
        path
    }

    /// First free export name for `unix_secs`; later exports in the same
    /// second get a `_2`, `_3`, ... suffix.
    fn unused_export_path(&self, unix_secs: u64) -> PathBuf {
        let mut path = self.export_path_at(unix_secs);
        let mut suffix = 2u32;
        while path.exists() {
            path = self
                .export_dir
                .join(format!("{EXPORT_PREFIX}{unix_secs}_{suffix}.{EXPORT_EXTENSION}"));
            suffix += 1;
        }
        path
    }

    /// Writes `contents` to `target`, or to a fresh timestamped file in the
    /// export directory when no target is given.
    pub fn write_export(&self, contents: &str, target: Option<&Path>) -> StorageResult<PathBuf> {
        let path = match target {
            Some(path) => path.to_path_buf(),
            None => self.unused_export_path(unix_now()),
        };
        write_atomic(&path, contents)?;
        tracing::info!(path = %path.display(), bytes = contents.len(), "branding exported");
        Ok(path)
    }

    pub fn read_import(&self, path: &Path) -> StorageResult<String> {
        Ok(fs::read_to_string(path)?)
    }

    pub fn prune_stale_exports(&self, max_age_hours: u64) -> StorageResult<PruneReport> {
        let now = SystemTime::now();
        let mut report = PruneReport::default();
        let max_age = Duration::from_secs(max_age_hours.saturating_mul(60 * 60));

        if !self.export_dir.exists() {
            return Ok(report);
        }

        for entry in fs::read_dir(&self.export_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || !is_export_file(&path) {
                continue;
            }

            let metadata = fs::metadata(&path)?;
            let modified = metadata.modified()?;
            let age = now.duration_since(modified).unwrap_or(Duration::ZERO);

            if age > max_age {
                match fs::remove_file(&path) {
                    Ok(()) => {
                        report.removed_files += 1;
                    }
                    Err(err) => {
                        tracing::warn!(
                            path = %path.display(),
                            ?err,
                            "failed to remove stale export file"
                        );
                    }
                }
            }
        }

        Ok(report)
    }
}

fn is_export_file(path: &Path) -> bool {
    let has_prefix = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(EXPORT_PREFIX));
    let has_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == EXPORT_EXTENSION);
    has_prefix && has_extension
}

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

pub fn write_atomic(path: &Path, contents: &str) -> StorageResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::with_temp_root;

    #[test]
    fn export_path_is_timestamped_inside_the_export_dir() {
        let storage = ExportStorage::with_path(PathBuf::from("/tmp/exports"));
        assert_eq!(
            storage.export_path_at(1_700_000_000),
            PathBuf::from("/tmp/exports/branding_1700000000.json")
        );
    }

    #[test]
    fn configured_export_dir_wins() {
        let config = AppConfig {
            export_dir: Some(PathBuf::from("/srv/exports")),
            ..AppConfig::default()
        };
        let storage = ExportStorage::from_config(&config).unwrap();
        assert_eq!(storage.export_dir(), Path::new("/srv/exports"));
    }

    #[test]
    fn write_then_read_keeps_contents() {
        with_temp_root(|root| {
            let storage = ExportStorage::with_path(root.join("exports"));
            let path = storage.write_export("{\"a\":1}", None).unwrap();
            assert!(path.starts_with(root.join("exports")));
            assert!(is_export_file(&path));
            assert_eq!(storage.read_import(&path).unwrap(), "{\"a\":1}");

            let explicit = root.join("custom.json");
            storage.write_export("{}", Some(&explicit)).unwrap();
            assert_eq!(fs::read_to_string(explicit).unwrap(), "{}");
        });
    }

    #[test]
    fn exports_in_the_same_second_get_distinct_names() {
        with_temp_root(|root| {
            let storage = ExportStorage::with_path(root.join("exports"));
            let first = storage.unused_export_path(1_700_000_000);
            write_atomic(&first, "{\"n\":1}").unwrap();
            let second = storage.unused_export_path(1_700_000_000);
            write_atomic(&second, "{\"n\":2}").unwrap();

            assert_eq!(second, root.join("exports/branding_1700000000_2.json"));
            assert!(is_export_file(&second));
            assert_eq!(fs::read_to_string(&first).unwrap(), "{\"n\":1}");

            let a = storage.write_export("{}", None).unwrap();
            let b = storage.write_export("{}", None).unwrap();
            assert_ne!(a, b);
        });
    }

    #[test]
    fn prune_only_touches_export_files() {
        with_temp_root(|root| {
            let storage = ExportStorage::with_path(root.to_path_buf());
            fs::write(root.join("branding_1.json"), "{}").unwrap();
            fs::write(root.join("notes.json"), "{}").unwrap();
            fs::write(root.join("branding_2.txt"), "{}").unwrap();
            std::thread::sleep(Duration::from_millis(20));

            let report = storage.prune_stale_exports(0).unwrap();
            assert_eq!(report.removed_files, 1);
            assert!(!root.join("branding_1.json").exists());
            assert!(root.join("notes.json").exists());
            assert!(root.join("branding_2.txt").exists());
        });
    }

    #[test]
    fn prune_of_missing_dir_is_a_no_op() {
        let storage = ExportStorage::with_path(PathBuf::from("/nonexistent/brandkit-exports"));
        assert_eq!(storage.prune_stale_exports(1).unwrap().removed_files, 0);
    }
}
