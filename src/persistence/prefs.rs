//! Settings document: frontend preferences plus one record per padmap.
//!
//! ```toml
//! app = "padmap"
//! version = "2.1.0"
//!
//! [menu]
//! rumble = true
//!
//! [controller]
//! match_wii_game = true
//!
//! [[controller.padmaps]]
//! name = "gcpadmap"
//! description = "GameCube Pad"
//!
//! [[controller.padmaps.buttons]]
//! number = 0
//! assignment = 512
//! ```
//!
//! Loading only touches what the file carries: a section with two keys
//! changes two settings, a record with one button rebinds one slot.

use super::storage::{load_file, save_file, Storage, StorageError, StorageMethod, LOAD_ORDER, PREFS_FILE};
use super::{FormatVersion, Preferences, CURRENT_VERSION, OLDEST_SUPPORTED_MAJOR};
use crate::controller::ControllerFamily;
use crate::mapping::mask::CanonicalSlot;
use crate::mapping::padmap::MappingStore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use toml::Table;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("Failed to parse document: {0}")]
    Parse(String),

    #[error("Failed to serialize document: {0}")]
    Serialize(String),

    #[error("Unsupported document version: {0}")]
    Version(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// One slot binding inside a controller record. Stored wide so that an
/// out-of-range entry is dropped on its own instead of failing the file.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ButtonRecord {
    pub number: i64,
    pub assignment: i64,
}

/// A padmap as stored: the family's record name and its slot bindings.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ControllerRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub buttons: Vec<ButtonRecord>,
}

impl ControllerRecord {
    pub fn capture(family: ControllerFamily, store: &MappingStore) -> Self {
        Self {
            name: family.record_name().to_string(),
            description: family.to_string(),
            buttons: store
                .resolve(family)
                .entries()
                .map(|(slot, code)| ButtonRecord {
                    number: slot.index() as i64,
                    assignment: i64::from(code),
                })
                .collect(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ControllerSection {
    pub match_wii_game: Option<bool>,
    #[serde(default)]
    pub padmaps: Vec<ControllerRecord>,
}

/// The whole settings file. Settings sections are kept as raw tables and
/// merged key by key into the current preferences.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct PrefsDocument {
    #[serde(default)]
    pub app: String,
    #[serde(default)]
    pub version: String,
    pub file: Option<Table>,
    pub network: Option<Table>,
    pub video: Option<Table>,
    pub menu: Option<Table>,
    pub controller: Option<ControllerSection>,
}

/// A binding that passed validation and is ready to go into the store.
type Binding = (ControllerFamily, CanonicalSlot, u32);

fn section<T: Serialize>(settings: &T) -> Result<Option<Table>, PrefsError> {
    Table::try_from(settings)
        .map(Some)
        .map_err(|e| PrefsError::Serialize(e.to_string()))
}

/// Writes every key of `patch` into `current`. A key whose value does not
/// fit its field is skipped and the field keeps its value.
fn overlay<T>(current: &mut T, patch: &Table, name: &str) -> Result<(), PrefsError>
where
    T: Serialize + DeserializeOwned,
{
    let mut merged = Table::try_from(&*current).map_err(|e| PrefsError::Serialize(e.to_string()))?;
    for (key, value) in patch {
        let mut candidate = merged.clone();
        candidate.insert(key.clone(), value.clone());
        let fits: Result<T, _> = candidate.clone().try_into();
        match fits {
            Ok(_) => merged = candidate,
            Err(e) => debug!("Skipping [{}] {}: {}", name, key, e),
        }
    }
    *current = merged.try_into().map_err(|e| PrefsError::Parse(e.to_string()))?;
    Ok(())
}

impl PrefsDocument {
    /// Snapshot of the current preferences and every padmap.
    pub fn capture(prefs: &Preferences, store: &MappingStore) -> Result<Self, PrefsError> {
        Ok(Self {
            app: env!("CARGO_PKG_NAME").to_string(),
            version: CURRENT_VERSION.to_string(),
            file: section(&prefs.file)?,
            network: section(&prefs.network)?,
            video: section(&prefs.video)?,
            menu: section(&prefs.menu)?,
            controller: Some(ControllerSection {
                match_wii_game: Some(prefs.match_wii_game),
                padmaps: ControllerFamily::ALL
                    .into_iter()
                    .map(|f| ControllerRecord::capture(f, store))
                    .collect(),
            }),
        })
    }

    pub fn encode(&self) -> Result<String, PrefsError> {
        toml::to_string_pretty(self).map_err(|e| PrefsError::Serialize(e.to_string()))
    }

    /// Parses a document and rejects versions this build cannot read.
    pub fn decode(text: &str) -> Result<Self, PrefsError> {
        let doc: PrefsDocument = toml::from_str(text).map_err(|e| PrefsError::Parse(e.to_string()))?;
        check_version(&doc.version)?;
        Ok(doc)
    }

    /// Bindings present in the document. Unknown records, slot numbers
    /// outside the ten canonical slots and codes that are not 32-bit are
    /// skipped one entry at a time.
    fn bindings(&self) -> Vec<Binding> {
        let Some(controller) = &self.controller else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for record in &controller.padmaps {
            let Some(family) = ControllerFamily::from_record_name(&record.name) else {
                debug!("Skipping unknown controller record {}", record.name);
                continue;
            };
            for button in &record.buttons {
                let slot = usize::try_from(button.number)
                    .ok()
                    .and_then(CanonicalSlot::from_index);
                let code = u32::try_from(button.assignment).ok();
                match (slot, code) {
                    (Some(slot), Some(code)) => out.push((family, slot, code)),
                    _ => debug!(
                        "Skipping {} entry {} = {}",
                        record.name, button.number, button.assignment
                    ),
                }
            }
        }
        out
    }

    /// Overwrites only what the document carries. Everything is merged into
    /// a copy first, so an error leaves `prefs` and `store` as they were.
    pub fn apply(&self, prefs: &mut Preferences, store: &mut MappingStore) -> Result<(), PrefsError> {
        let bindings = self.bindings();

        let mut next = prefs.clone();
        if let Some(file) = &self.file {
            overlay(&mut next.file, file, "file")?;
        }
        if let Some(network) = &self.network {
            overlay(&mut next.network, network, "network")?;
        }
        if let Some(video) = &self.video {
            overlay(&mut next.video, video, "video")?;
        }
        if let Some(menu) = &self.menu {
            overlay(&mut next.menu, menu, "menu")?;
        }
        if let Some(enabled) = self.controller.as_ref().and_then(|c| c.match_wii_game) {
            next.match_wii_game = enabled;
        }
        next.fix_invalid();
        *prefs = next;

        for (family, slot, code) in bindings {
            store.bind(family, slot, code);
        }
        Ok(())
    }
}

fn check_version(text: &str) -> Result<FormatVersion, PrefsError> {
    let version = FormatVersion::parse(text)
        .ok_or_else(|| PrefsError::Version(format!("'{}' is not a version", text)))?;
    if version.major < OLDEST_SUPPORTED_MAJOR {
        return Err(PrefsError::Version(format!("{} is too old", version)));
    }
    if version > CURRENT_VERSION {
        return Err(PrefsError::Version(format!(
            "{} is newer than {}",
            version, CURRENT_VERSION
        )));
    }
    Ok(version)
}

/// Parses a document and applies it. An unsupported version resets both the
/// preferences and every padmap to defaults. Any other failure leaves them
/// untouched.
pub fn load_into(text: &str, prefs: &mut Preferences, store: &mut MappingStore) -> Result<(), PrefsError> {
    match PrefsDocument::decode(text) {
        Ok(doc) => doc.apply(prefs, store),
        Err(e @ PrefsError::Version(_)) => {
            warn!("{}, reverting to default settings", e);
            *prefs = Preferences::new();
            store.reset_all();
            Err(e)
        }
        Err(e) => {
            warn!("{}, keeping current settings", e);
            Err(e)
        }
    }
}

/// Searches the media in order for the first readable, supported document.
pub async fn load_prefs<S: Storage>(storage: &S) -> Option<(StorageMethod, PrefsDocument)> {
    for method in LOAD_ORDER {
        if !storage.is_available(method) {
            continue;
        }
        let bytes = match load_file(storage, method, &PREFS_FILE).await {
            Ok(bytes) => bytes,
            Err(StorageError::NotFound(_)) => continue,
            Err(e) => {
                warn!("Failed to read preferences from {}: {}", method, e);
                continue;
            }
        };
        let text = String::from_utf8_lossy(&bytes);
        match PrefsDocument::decode(&text) {
            Ok(doc) => {
                info!("Loaded preferences from {}", method);
                return Some((method, doc));
            }
            Err(e) => warn!("Ignoring preferences on {}: {}", method, e),
        }
    }
    info!("No preferences found, using defaults");
    None
}

pub async fn save_prefs<S: Storage>(
    storage: &S,
    document: &PrefsDocument,
    method: StorageMethod,
) -> Result<StorageMethod, PrefsError> {
    let text = document.encode()?;
    Ok(save_file(storage, method, &PREFS_FILE, text.as_bytes()).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::codes::{gc, kb};

    fn document(version: &str) -> String {
        format!("app = \"padmap\"\nversion = \"{}\"\n", version)
    }

    #[test]
    fn version_gate() {
        assert!(PrefsDocument::decode(&document("2.0.0")).is_ok());
        assert!(PrefsDocument::decode(&document(&CURRENT_VERSION.to_string())).is_ok());
        for bad in ["1.9.9", "2.1.1", "3.0.0", "abc", ""] {
            assert!(
                matches!(PrefsDocument::decode(&document(bad)), Err(PrefsError::Version(_))),
                "{}",
                bad
            );
        }
        assert!(matches!(
            PrefsDocument::decode("app = \"padmap\""),
            Err(PrefsError::Version(_))
        ));
    }

    #[test]
    fn rejected_version_resets_everything() {
        let mut prefs = Preferences::new();
        prefs.menu.rumble = false;
        let mut store = MappingStore::new();
        store.bind(ControllerFamily::GameCube, CanonicalSlot::A, gc::PAD_BUTTON_Y);

        assert!(load_into(&document("1.0.9"), &mut prefs, &mut store).is_err());
        assert_eq!(prefs, Preferences::new());
        assert_eq!(store, MappingStore::new());
    }

    #[test]
    fn unreadable_document_keeps_everything() {
        let mut prefs = Preferences::new();
        prefs.menu.rumble = false;
        let mut store = MappingStore::new();
        store.bind(ControllerFamily::Keyboard, CanonicalSlot::A, 0x2C);
        let (prefs_before, store_before) = (prefs.clone(), store.clone());

        let broken = format!("{}\n[menu\nrumble = ", document("2.1.0"));
        assert!(matches!(
            load_into(&broken, &mut prefs, &mut store),
            Err(PrefsError::Parse(_))
        ));
        assert_eq!(prefs, prefs_before);
        assert_eq!(store, store_before);
    }

    #[test]
    fn capture_then_apply_reproduces_store() {
        let mut store = MappingStore::new();
        store.bind(ControllerFamily::Keyboard, CanonicalSlot::Start, 0x2C);
        store.bind(ControllerFamily::Classic, CanonicalSlot::R, 0);
        let mut prefs = Preferences::new();
        prefs.video.zoom_level = 1.5;
        prefs.match_wii_game = false;

        let text = PrefsDocument::capture(&prefs, &store).unwrap().encode().unwrap();
        let mut loaded_prefs = Preferences::new();
        let mut loaded_store = MappingStore::new();
        load_into(&text, &mut loaded_prefs, &mut loaded_store).unwrap();

        assert_eq!(loaded_store, store);
        assert_eq!(loaded_prefs, prefs);
    }

    #[test]
    fn partial_record_keeps_other_slots() {
        let text = format!(
            "{}\n[controller]\n\n[[controller.padmaps]]\nname = \"gcpadmap\"\n\n\
             [[controller.padmaps.buttons]]\nnumber = 1\nassignment = {}\n\n\
             [[controller.padmaps.buttons]]\nnumber = 42\nassignment = 7\n\n\
             [[controller.padmaps]]\nname = \"nopadmap\"\n",
            document("2.0.5"),
            gc::PAD_BUTTON_X
        );
        let mut store = MappingStore::new();
        store.bind(ControllerFamily::GameCube, CanonicalSlot::B, gc::PAD_BUTTON_Y);
        let mut prefs = Preferences::new();
        prefs.menu.sfx_volume = 70;

        load_into(&text, &mut prefs, &mut store).unwrap();

        let gc_map = store.resolve(ControllerFamily::GameCube);
        assert_eq!(gc_map.code(CanonicalSlot::A), gc::PAD_BUTTON_X);
        assert_eq!(gc_map.code(CanonicalSlot::B), gc::PAD_BUTTON_Y);
        assert_eq!(gc_map.code(CanonicalSlot::Start), gc::PAD_BUTTON_START);
        // sections not in the file stay as they were
        assert_eq!(prefs.menu.sfx_volume, 70);
    }

    #[test]
    fn out_of_range_entries_are_dropped_alone() {
        let text = format!(
            "{}\n[controller]\n\n[[controller.padmaps]]\nname = \"gcpadmap\"\n\n\
             [[controller.padmaps.buttons]]\nnumber = -1\nassignment = 5\n\n\
             [[controller.padmaps.buttons]]\nnumber = 0\nassignment = -3\n\n\
             [[controller.padmaps.buttons]]\nnumber = 3\nassignment = 8589934592\n\n\
             [[controller.padmaps.buttons]]\nnumber = 1\nassignment = {}\n",
            document("2.1.0"),
            gc::PAD_BUTTON_X
        );
        let mut store = MappingStore::new();
        store.bind(ControllerFamily::Keyboard, CanonicalSlot::A, kb::KEY_ENTER);
        let mut prefs = Preferences::new();

        load_into(&text, &mut prefs, &mut store).unwrap();

        let gc_map = store.resolve(ControllerFamily::GameCube);
        assert_eq!(gc_map.code(CanonicalSlot::A), gc::PAD_BUTTON_X);
        assert_eq!(gc_map.code(CanonicalSlot::B), gc::PAD_BUTTON_B);
        assert_eq!(gc_map.code(CanonicalSlot::Start), gc::PAD_BUTTON_START);
        assert_eq!(
            store.resolve(ControllerFamily::Keyboard).code(CanonicalSlot::A),
            kb::KEY_ENTER
        );
    }

    #[test]
    fn partial_section_keeps_missing_keys() {
        let mut prefs = Preferences::new();
        prefs.menu.sfx_volume = 70;
        prefs.match_wii_game = false;
        let text = format!("{}\n[menu]\nrumble = false\n\n[controller]\n", document("2.1.0"));

        load_into(&text, &mut prefs, &mut MappingStore::new()).unwrap();

        assert!(!prefs.menu.rumble);
        assert_eq!(prefs.menu.sfx_volume, 70);
        assert!(!prefs.match_wii_game);
    }

    #[test]
    fn mistyped_key_is_skipped() {
        let mut prefs = Preferences::new();
        prefs.menu.sfx_volume = 70;
        let text = format!(
            "{}\n[menu]\nsfx_volume = \"loud\"\nmusic_volume = 10\n",
            document("2.1.0")
        );

        load_into(&text, &mut prefs, &mut MappingStore::new()).unwrap();

        assert_eq!(prefs.menu.sfx_volume, 70);
        assert_eq!(prefs.menu.music_volume, 10);
    }

    #[test]
    fn loaded_settings_are_clamped() {
        let text = format!("{}\n[video]\nzoom_level = 9.0\nxshift = 99\n", document("2.1.0"));
        let mut prefs = Preferences::new();
        load_into(&text, &mut prefs, &mut MappingStore::new()).unwrap();
        assert_eq!(prefs.video.zoom_level, 1.0);
        assert_eq!(prefs.video.xshift, 50);
    }
}
