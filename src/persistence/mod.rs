//! # Persistence Module
//!
//! Frontend preferences, per-game palettes and the media they are stored on.
//!
//! ```text
//! Preferences + MappingStore ──► PrefsDocument (TOML) ──► Storage (SD, USB, MC, SMB)
//!                                                    ▲
//!                              PersistenceManager ───┘ (tokio worker)
//! ```
//!
//! Anything unreadable degrades to defaults: a broken or outdated settings
//! file never stops the frontend from starting.

pub mod palette;
pub mod persistence_worker;
pub mod prefs;
pub mod storage;

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use storage::StorageMethod;
use tracing::debug;

pub use palette::{GamePalette, PaletteBook};
pub use persistence_worker::{PersistenceManager, PrefsAction};
pub use prefs::{PrefsDocument, PrefsError};
pub use storage::{FsStorage, Storage, StorageError};

/// Settings document format version, "X.Y.Z".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormatVersion {
    pub major: u8,
    pub minor: u8,
    pub point: u8,
}

/// Version written into every document this build saves.
pub const CURRENT_VERSION: FormatVersion = FormatVersion {
    major: 2,
    minor: 1,
    point: 0,
};

/// Documents older than this predate the current controller layout.
pub const OLDEST_SUPPORTED_MAJOR: u8 = 2;

impl FormatVersion {
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.trim().split('.').map(|p| p.parse::<u8>().ok());
        let version = Self {
            major: parts.next()??,
            minor: parts.next()??,
            point: parts.next()??,
        };
        parts.next().is_none().then_some(version)
    }
}

impl Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.point)
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct FileSettings {
    pub auto_load: bool,
    pub auto_save: bool,
    pub load_method: StorageMethod,
    pub save_method: StorageMethod,
    pub load_folder: String,
    pub save_folder: String,
    /// Read memory-card saves back after writing them.
    pub verify_saves: bool,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            auto_load: true,
            auto_save: true,
            load_method: StorageMethod::Auto,
            save_method: StorageMethod::Auto,
            load_folder: "padmap/roms".to_string(),
            save_folder: "padmap/saves".to_string(),
            verify_saves: false,
        }
    }
}

/// Network share credentials.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct NetworkSettings {
    pub smb_ip: String,
    pub smb_share: String,
    pub smb_user: String,
    pub smb_password: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct VideoSettings {
    pub video_mode: i32,
    pub zoom_level: f32,
    pub render: i32,
    pub scaling: i32,
    pub xshift: i32,
    pub yshift: i32,
    /// Use the per-game palette for monochrome titles.
    pub colorize: bool,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            video_mode: 0,
            zoom_level: 1.0,
            render: 1,
            scaling: 1,
            xshift: 0,
            yshift: 0,
            colorize: false,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MenuSettings {
    pub wiimote_orientation: i32,
    pub exit_action: i32,
    pub music_volume: i32,
    pub sfx_volume: i32,
    pub rumble: bool,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            wiimote_orientation: 0,
            exit_action: 0,
            music_volume: 40,
            sfx_volume: 40,
            rumble: true,
        }
    }
}

/// Everything the frontend remembers apart from the padmaps.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Preferences {
    pub file: FileSettings,
    pub network: NetworkSettings,
    pub video: VideoSettings,
    pub menu: MenuSettings,
    /// Use the title-specific controls when a title has them.
    pub match_wii_game: bool,
}

impl Preferences {
    pub fn new() -> Self {
        Self {
            match_wii_game: true,
            ..Default::default()
        }
    }

    /// Pulls every out-of-range value back to something usable.
    pub fn fix_invalid(&mut self) {
        let video = &mut self.video;
        if !(0.5..=2.0).contains(&video.zoom_level) {
            debug!("Zoom level {} out of range, reset", video.zoom_level);
            video.zoom_level = 1.0;
        }
        if !(0..=4).contains(&video.video_mode) {
            video.video_mode = 0;
        }
        video.xshift = video.xshift.clamp(-50, 50);
        video.yshift = video.yshift.clamp(-50, 50);

        let menu = &mut self.menu;
        menu.music_volume = menu.music_volume.clamp(0, 100);
        menu.sfx_volume = menu.sfx_volume.clamp(0, 100);
    }
}
