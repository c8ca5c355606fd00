use crate::core::config::data::{path_display, Config};
use directories::ProjectDirs;
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

const CONFIG_FILE_NAME: &str = "config.toml";
const FALLBACK_CONFIG_FILE: &str = "eve-client.toml";

/// Errors raised while reading or writing the settings file.
#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: io::Error },

    /// The file exists but is not valid TOML for [`Config`].
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Creating the directory, writing the temp file or renaming it failed.
    Write { path: PathBuf, source: io::Error },
}

impl ConfigError {
    fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Write { path, .. } => path,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self {
            ConfigError::Read { .. } => "read",
            ConfigError::Parse { .. } => "parse",
            ConfigError::Write { .. } => "write",
        };
        let path = path_display(self.path());
        match self {
            ConfigError::Read { source, .. } | ConfigError::Write { source, .. } => {
                write!(f, "Failed to {action} config at {path}: {source}")
            }
            ConfigError::Parse { source, .. } => {
                write!(f, "Failed to {action} config at {path}: {}", source.message())
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Read { source, .. } | ConfigError::Write { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

impl Config {
    /// Read settings from `config_path`. A missing file yields defaults.
    pub fn load_from_path(config_path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
        let contents = match fs::read_to_string(config_path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path_display(config_path), "no config file; using defaults");
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: config_path.to_path_buf(),
                    source,
                }
                .into())
            }
        };

        let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })?;
        debug!(path = %path_display(config_path), "loaded config");
        Ok(config)
    }

    /// Write through a temp file in the same directory, then rename over the
    /// target so readers never observe a half-written file.
    pub(crate) fn save_to_path(
        &self,
        config_path: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        let write_err = |source: io::Error| ConfigError::Write {
            path: config_path.to_path_buf(),
            source,
        };

        let parent = config_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());
        if let Some(dir) = parent {
            fs::create_dir_all(dir).map_err(write_err)?;
        }

        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir),
            None => NamedTempFile::new(),
        }
        .map_err(write_err)?;
        temp_file
            .write_all(contents.as_bytes())
            .map_err(write_err)?;
        temp_file.as_file_mut().sync_all().map_err(write_err)?;
        temp_file
            .persist(config_path)
            .map_err(|err| write_err(err.error))?;

        debug!(path = %path_display(config_path), "saved config");
        Ok(())
    }

    /// Falls back to the working directory when the platform reports no
    /// home directory.
    pub(crate) fn get_config_path() -> PathBuf {
        match ProjectDirs::from("org", "eve", "eve-client") {
            Some(dirs) => dirs.config_dir().join(CONFIG_FILE_NAME),
            None => PathBuf::from(FALLBACK_CONFIG_FILE),
        }
    }
}
