//! Reading and first-run creation of `config.toml`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::app_config::AppConfig;

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no configuration directory on this platform")]
    ConfigDirNotFound,
    #[error("config file {path} has no parent directory")]
    NoParent { path: PathBuf },
    #[error("config io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode default config: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Locates the client's config file and turns it into an [`AppConfig`].
pub struct StorageManager {
    config_dir: PathBuf,
}

impl StorageManager {
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigDirNotFound` when the platform has no
    /// per-user config directory.
    pub fn new() -> Result<Self, ConfigError> {
        AppConfig::default_config_dir()
            .map(Self::with_dir)
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    #[must_use]
    pub const fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// The file `load_config` reads: `--config` when given, else `config.toml`
    /// in the config directory.
    #[must_use]
    pub fn config_path(&self, path_override: Option<&Path>) -> PathBuf {
        path_override.map_or_else(|| self.config_dir.join(CONFIG_FILE_NAME), Path::to_path_buf)
    }

    /// Loads the client configuration.
    ///
    /// First run writes the defaults so the user has a file to edit. A file
    /// that does not parse is left as is and the defaults are used.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or the defaults
    /// cannot be written.
    pub fn load_config(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let path = self.config_path(path_override);

        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)?;
            toml::from_str::<AppConfig>(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Config file is invalid, using defaults");
                AppConfig::default()
            })
        } else {
            info!(path = %path.display(), "Writing default config");
            let defaults = AppConfig::default();
            write_atomically(&path, &toml::to_string_pretty(&defaults)?)?;
            defaults
        };

        debug!(path = %path.display(), keybindings = config.keybindings.len(), "Config loaded");
        config.config = Some(path);
        Ok(config)
    }
}

/// Replaces `path` through a temp file in the same directory so readers
/// never see a half-written config.
fn write_atomically(path: &Path, content: &str) -> Result<(), ConfigError> {
    let dir = path.parent().ok_or_else(|| ConfigError::NoParent {
        path: path.to_path_buf(),
    })?;
    fs::create_dir_all(dir)?;

    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(content.as_bytes())?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::keybinding::Action;
    use tempfile::tempdir;

    #[test]
    fn test_first_run_writes_editable_defaults() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().join("termgram"));

        let config = manager.load_config(None).unwrap();

        let path = dir.path().join("termgram").join(CONFIG_FILE_NAME);
        assert_eq!(config.config.as_deref(), Some(path.as_path()));
        let written: AppConfig = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.backend.feed_url, config.backend.feed_url);
        assert!(written.notifications.show_preview);
    }

    #[test]
    fn test_invalid_file_is_kept_and_defaults_used() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().to_path_buf());
        let path = manager.config_path(None);
        fs::write(&path, "[ui]\nshow_typing = \"sometimes\"\n").unwrap();

        let config = manager.load_config(None).unwrap();

        assert!(config.ui.show_typing);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[ui]\nshow_typing = \"sometimes\"\n"
        );
    }

    #[test]
    fn test_partial_override_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().join("unused"));
        let custom = dir.path().join("work.toml");
        fs::write(
            &custom,
            "[notifications]\nshow_preview = false\n\n[keybindings]\n\"Ctrl+q\" = \"Quit\"\n",
        )
        .unwrap();

        let config = manager.load_config(Some(&custom)).unwrap();

        assert!(!config.notifications.show_preview);
        assert!(config.notifications.enabled);
        assert_eq!(config.keybindings.get("Ctrl+q"), Some(&Action::Quit));
        assert!(!dir.path().join("unused").exists());
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        write_atomically(&path, "log_level = \"debug\"\n").unwrap();
        write_atomically(&path, "log_level = \"warn\"\n").unwrap();

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "log_level = \"warn\"\n");
    }
}
