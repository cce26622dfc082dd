// User configuration
// Board parameters and display preferences, persisted as TOML

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::sl_board::validate_params;
use crate::sl_error::ConfigError;

/// Classic intermediate board
pub const DEFAULT_SIZE: usize = 16;
pub const DEFAULT_MINES: usize = 40;

/// User configuration
/// Persisted to disk as TOML
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    // Board parameters
    pub size: usize,
    pub mines: usize,

    // Display preferences
    pub ascii_icons: bool, // Use ASCII fallback icons
    pub language: String,  // Language code ("en" or "zh")
}

impl Default for Config {
    fn default() -> Self {
        // Auto-detect system language on first run
        let system_lang = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
        let lang = if system_lang.to_lowercase().starts_with("zh") {
            "zh"
        } else {
            "en"
        };

        Config {
            size: DEFAULT_SIZE,
            mines: DEFAULT_MINES,
            ascii_icons: false,
            language: lang.to_string(),
        }
    }
}

impl Config {
    /// Reject board parameters the engine cannot play
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_params(self.size, self.mines)?;
        Ok(())
    }

    pub fn from_toml(s: &str) -> Result<Config, ConfigError> {
        let cfg: Config = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "saolei", "saolei")
}

/// Get the configuration file path
/// Uses the platform config directory (e.g. ~/.config/saolei/saolei.toml on Linux)
/// Falls back to the current directory if ProjectDirs is unavailable
pub fn config_path() -> Result<PathBuf, ConfigError> {
    if let Some(proj) = project_dirs() {
        return Ok(proj.config_dir().join("saolei.toml"));
    }
    env::current_dir()
        .map(|dir| dir.join("saolei.toml"))
        .map_err(|_| ConfigError::NoConfigDir)
}

/// Directory for the log file, next to the config when no data dir exists
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    if let Some(proj) = project_dirs() {
        return Ok(proj.data_local_dir().to_path_buf());
    }
    config_path()?
        .parent()
        .map(Path::to_path_buf)
        .ok_or(ConfigError::NoConfigDir)
}

/// Read and validate the configuration at `path`
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Config::from_toml(&s)
}

/// Write the configuration to `path`, creating parent directories
pub fn write_config(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    let s = cfg.to_toml()?;
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, s).map_err(io_err)
}

/// Load configuration from disk, or create the default if not found.
/// An unreadable or invalid file is reported and replaced by defaults in memory.
pub fn load_or_create_config() -> Config {
    let path = match config_path() {
        Ok(path) => path,
        Err(e) => {
            warn!("Using default configuration: {}", e);
            return Config::default();
        }
    };

    if path.exists() {
        return match load_config(&path) {
            Ok(cfg) => {
                info!("Loaded configuration from {}", path.display());
                cfg
            }
            Err(e) => {
                warn!("Ignoring configuration at {}: {}", path.display(), e);
                Config::default()
            }
        };
    }

    let cfg = Config::default();
    match write_config(&path, &cfg) {
        Ok(()) => info!("Wrote default configuration to {}", path.display()),
        Err(e) => warn!("Could not write default configuration: {}", e),
    }
    cfg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sl_error::BoardError;

    #[test]
    fn defaults_to_intermediate() {
        let cfg = Config::default();
        assert_eq!((cfg.size, cfg.mines), (16, 40));
        assert!(cfg.language == "en" || cfg.language == "zh");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg = Config::from_toml("mines = 10\nascii_icons = true\n").unwrap();
        assert_eq!(cfg.size, DEFAULT_SIZE);
        assert_eq!(cfg.mines, 10);
        assert!(cfg.ascii_icons);
    }

    #[test]
    fn rejects_unplayable_boards() {
        let err = Config::from_toml("size = 4\nmines = 16\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Board(BoardError::InvalidConfiguration { size: 4, mines: 16 })
        ));
        assert!(matches!(
            Config::from_toml("size = 0\n").unwrap_err(),
            ConfigError::Board(_)
        ));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            Config::from_toml("size = \"big\"").unwrap_err(),
            ConfigError::Parse(_)
        ));
    }

    #[test]
    fn survives_a_toml_round_trip() {
        let cfg = Config {
            size: 9,
            mines: 10,
            ascii_icons: true,
            language: "zh".to_string(),
        };
        assert_eq!(Config::from_toml(&cfg.to_toml().unwrap()).unwrap(), cfg);
    }

    #[test]
    fn writes_and_reads_back_from_disk() {
        let dir = env::temp_dir().join(format!("saolei-config-{}", std::process::id()));
        let path = dir.join("nested").join("saolei.toml");
        let cfg = Config {
            size: 8,
            ..Config::default()
        };
        write_config(&path, &cfg).unwrap();
        assert_eq!(load_config(&path).unwrap(), cfg);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = env::temp_dir().join("saolei-does-not-exist").join("saolei.toml");
        assert!(matches!(load_config(&path).unwrap_err(), ConfigError::Io { .. }));
    }
}
