//! Per-game colour palettes for monochrome titles.

use super::storage::{load_file, save_file, Storage, StorageError, StorageMethod, LOAD_ORDER, PALETTE_FILE};
use super::{FormatVersion, PrefsError, CURRENT_VERSION, OLDEST_SUPPORTED_MAJOR};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, info, warn};

/// Name of the palette used for titles without their own.
pub const DEFAULT_PALETTE: &str = "default";

/// 24-bit colour, written as `"0xRRGGBB"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u32);

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{:06X}", self.0 & 0xFF_FFFF))
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(&text);
        u32::from_str_radix(digits, 16)
            .map(|v| Rgb(v & 0xFF_FFFF))
            .map_err(|e| serde::de::Error::custom(format!("invalid colour '{}': {}", text, e)))
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct GamePalette {
    pub name: String,
    #[serde(default = "enabled")]
    pub use_palette: bool,
    pub bkgr: [Rgb; 4],
    pub wind: [Rgb; 4],
    pub obj0: [Rgb; 3],
    pub obj1: [Rgb; 3],
}

fn enabled() -> bool {
    true
}

impl GamePalette {
    /// Four-shade grey ramp, white to black.
    pub fn builtin() -> Self {
        const RAMP: [Rgb; 4] = [Rgb(0xFFFFFF), Rgb(0xAAAAAA), Rgb(0x555555), Rgb(0x000000)];
        Self {
            name: DEFAULT_PALETTE.to_string(),
            use_palette: true,
            bkgr: RAMP,
            wind: RAMP,
            obj0: [RAMP[1], RAMP[2], RAMP[3]],
            obj1: [RAMP[1], RAMP[2], RAMP[3]],
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct PaletteBook {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub palettes: Vec<GamePalette>,
}

impl Default for PaletteBook {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION.to_string(),
            palettes: Vec::new(),
        }
    }
}

impl PaletteBook {
    /// The game's own palette, else the book's default, else the built-in ramp.
    pub fn palette_for(&self, game: &str) -> GamePalette {
        self.find(game)
            .or_else(|| self.find(DEFAULT_PALETTE))
            .cloned()
            .unwrap_or_else(GamePalette::builtin)
    }

    fn find(&self, name: &str) -> Option<&GamePalette> {
        self.palettes.iter().find(|p| p.name == name)
    }

    /// Adds a palette. An existing entry of the same name is only replaced
    /// when `overwrite` is set. Returns whether the book changed.
    pub fn upsert(&mut self, palette: GamePalette, overwrite: bool) -> bool {
        match self.palettes.iter_mut().find(|p| p.name == palette.name) {
            Some(existing) if overwrite => {
                *existing = palette;
                true
            }
            Some(_) => false,
            None => {
                self.palettes.push(palette);
                true
            }
        }
    }

    pub fn encode(&self) -> Result<String, PrefsError> {
        let mut book = self.clone();
        book.version = CURRENT_VERSION.to_string();
        toml::to_string_pretty(&book).map_err(|e| PrefsError::Serialize(e.to_string()))
    }

    /// Newer books are read as far as this build understands them.
    pub fn decode(text: &str) -> Result<Self, PrefsError> {
        let book: PaletteBook = toml::from_str(text).map_err(|e| PrefsError::Parse(e.to_string()))?;
        let version = FormatVersion::parse(&book.version)
            .ok_or_else(|| PrefsError::Version(format!("'{}' is not a version", book.version)))?;
        if version.major < OLDEST_SUPPORTED_MAJOR {
            return Err(PrefsError::Version(format!("{} is too old", version)));
        }
        if version > CURRENT_VERSION {
            debug!("Palette book {} is newer than {}", version, CURRENT_VERSION);
        }
        Ok(book)
    }
}

/// First readable palette book in search order, or an empty one.
pub async fn load_palettes<S: Storage>(storage: &S) -> (Option<StorageMethod>, PaletteBook) {
    for method in LOAD_ORDER {
        if !storage.is_available(method) {
            continue;
        }
        match load_file(storage, method, &PALETTE_FILE).await {
            Ok(bytes) => match PaletteBook::decode(&String::from_utf8_lossy(&bytes)) {
                Ok(book) => {
                    info!("Loaded {} palettes from {}", book.palettes.len(), method);
                    return (Some(method), book);
                }
                Err(e) => warn!("Ignoring palettes on {}: {}", method, e),
            },
            Err(StorageError::NotFound(_)) => {}
            Err(e) => warn!("Failed to read palettes from {}: {}", method, e),
        }
    }
    (None, PaletteBook::default())
}

pub async fn save_palettes<S: Storage>(
    storage: &S,
    book: &PaletteBook,
    method: StorageMethod,
) -> Result<StorageMethod, PrefsError> {
    let text = book.encode()?;
    Ok(save_file(storage, method, &PALETTE_FILE, text.as_bytes()).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, shade: u32) -> GamePalette {
        GamePalette {
            name: name.to_string(),
            bkgr: [Rgb(shade); 4],
            ..GamePalette::builtin()
        }
    }

    #[test]
    fn lookup_falls_back_to_default_then_builtin() {
        let mut book = PaletteBook::default();
        assert_eq!(book.palette_for("ZELDA"), GamePalette::builtin());

        book.upsert(named(DEFAULT_PALETTE, 0x123456), false);
        book.upsert(named("ZELDA", 0x00FF00), false);
        assert_eq!(book.palette_for("ZELDA").bkgr[0], Rgb(0x00FF00));
        assert_eq!(book.palette_for("TETRIS").bkgr[0], Rgb(0x123456));
    }

    #[test]
    fn upsert_respects_overwrite() {
        let mut book = PaletteBook::default();
        assert!(book.upsert(named("ZELDA", 1), false));
        assert!(!book.upsert(named("ZELDA", 2), false));
        assert_eq!(book.palette_for("ZELDA").bkgr[0], Rgb(1));
        assert!(book.upsert(named("ZELDA", 2), true));
        assert_eq!(book.palette_for("ZELDA").bkgr[0], Rgb(2));
        assert_eq!(book.palettes.len(), 1);
    }

    #[test]
    fn colours_are_hex_strings() {
        let mut book = PaletteBook::default();
        book.upsert(named("ZELDA", 0xABCDEF), false);
        let text = book.encode().unwrap();
        assert!(text.contains("\"0xABCDEF\""));
        assert_eq!(PaletteBook::decode(&text).unwrap(), book);
    }

    #[test]
    fn newer_books_load_older_ones_do_not() {
        assert!(PaletteBook::decode("version = \"9.0.0\"").is_ok());
        assert!(matches!(
            PaletteBook::decode("version = \"1.2.0\""),
            Err(PrefsError::Version(_))
        ));
        assert!(matches!(PaletteBook::decode("palettes = []"), Err(PrefsError::Version(_))));
    }
}
