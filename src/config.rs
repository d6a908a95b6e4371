use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::library::DEFAULT_PRIORITY_LEVELS;

/// Application configuration loaded from TOML config file.
/// All fields have sensible defaults — the config file is optional.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Music directory to scan (used when `scan`/`rescan` has no CLI arg).
    pub music_dir: Option<PathBuf>,
    /// Custom library file path (overrides XDG default).
    pub library_path: Option<PathBuf>,
    /// Number of priority tiers for freshly created libraries.
    pub priority_levels: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            music_dir: None,
            library_path: None,
            priority_levels: DEFAULT_PRIORITY_LEVELS,
        }
    }
}

impl AppConfig {
    /// Load config from `~/.config/rotor/config.toml`.
    /// Returns default config if file doesn't exist.
    /// Logs a warning if the file exists but can't be parsed.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match config_path {
            Some(path) if path.exists() => match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", path.display());
                        config
                    }
                    Err(e) => {
                        log::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                        Self::default()
                    }
                },
                Err(e) => {
                    log::warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
                    Self::default()
                }
            },
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Get the config file path.
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Resolve the default library path using XDG data directory.
pub fn default_library_path() -> PathBuf {
    if let Some(dirs) = ProjectDirs::from("", "", crate::APP_NAME) {
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir).ok();
        data_dir.join("library.json")
    } else {
        // Fallback: current directory
        PathBuf::from("library.json")
    }
}
