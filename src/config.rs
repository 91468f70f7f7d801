//! Application configuration.
//!
//! Lives at `<config_dir>/padmap/config.toml`. Anything missing or broken
//! degrades to defaults so the frontend always starts.

use crate::mapping::direction::DEFAULT_PAD_CALIBRATION;
use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const APP_DIR: &str = "padmap";
const CONFIG_FILE: &str = "config.toml";

/// Root directory backing each storage medium.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct StorageRoots {
    pub sd: Option<PathBuf>,
    pub usb: Option<PathBuf>,
    /// Read-only, never chosen for saving.
    pub dvd: Option<PathBuf>,
    pub smb: Option<PathBuf>,
    pub mc_slot_a: Option<PathBuf>,
    pub mc_slot_b: Option<PathBuf>,
}

impl Default for StorageRoots {
    fn default() -> Self {
        let base = data_dir().join(APP_DIR);
        Self {
            sd: Some(base.join("sd")),
            usb: Some(base.join("usb")),
            dvd: None,
            smb: Some(base.join("smb")),
            mc_slot_a: Some(base.join("mc_a")),
            mc_slot_b: Some(base.join("mc_b")),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Dead-zone radius for every analog stick, raw units.
    pub pad_calibration: i32,
    pub frame_interval_ms: u64,
    /// Title used when none is given on the command line.
    pub title_code: Option<String>,
    pub storage: StorageRoots,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pad_calibration: DEFAULT_PAD_CALIBRATION,
            frame_interval_ms: 16,
            title_code: None,
            storage: StorageRoots::default(),
        }
    }
}

impl AppConfig {
    /// Default location of the config file.
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| {
            warn!("Could not determine config directory, using current directory");
            PathBuf::from(".")
        });
        path.push(APP_DIR);
        path.push(CONFIG_FILE);
        path
    }

    /// Reads the config, writing a default file first when none exists.
    pub async fn load_or_init(path: &Path) -> AppConfig {
        match tokio::fs::try_exists(path).await {
            Ok(true) => match Self::load(path).await {
                Ok(config) => {
                    info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("{}, using defaults", e);
                    AppConfig::default()
                }
            },
            Ok(false) => {
                let config = AppConfig::default();
                if let Err(e) = config.save(path).await {
                    warn!("{}", e);
                } else {
                    info!("Wrote default config to {}", path.display());
                }
                config
            }
            Err(e) => {
                warn!("Failed to check config file {}: {}, using defaults", path.display(), e);
                AppConfig::default()
            }
        }
    }

    pub async fn load(path: &Path) -> Result<AppConfig> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| eyre!("Failed to read config file: {}", e))?;
        let config: AppConfig =
            toml::from_str(&content).map_err(|e| eyre!("Failed to parse config file: {}", e))?;
        debug!("Config: {:?}", config);
        Ok(config)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| eyre!("Failed to create config directory: {}", e))?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| eyre!("Failed to serialize config: {}", e))?;
        tokio::fs::write(path, content)
            .await
            .map_err(|e| eyre!("Failed to write config file: {}", e))?;
        Ok(())
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| {
        warn!("Could not determine data directory, using current directory");
        PathBuf::from(".")
    })
}
