//! Storage media and the byte-level backend behind them.
//!
//! Preferences and palettes are looked up on every medium in a fixed order
//! and the first hit wins. Memory cards carry a 64-byte comment block in
//! front of the payload.

use crate::config::StorageRoots;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::future::Future;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Where a file is loaded from or saved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageMethod {
    Auto,
    Sd,
    Usb,
    Dvd,
    Smb,
    McSlotA,
    McSlotB,
}

impl StorageMethod {
    pub fn is_memory_card(self) -> bool {
        matches!(self, StorageMethod::McSlotA | StorageMethod::McSlotB)
    }
}

impl Display for StorageMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageMethod::Auto => "Auto",
            StorageMethod::Sd => "SD",
            StorageMethod::Usb => "USB",
            StorageMethod::Dvd => "DVD",
            StorageMethod::Smb => "Network",
            StorageMethod::McSlotA => "Memory Card A",
            StorageMethod::McSlotB => "Memory Card B",
        };
        write!(f, "{}", name)
    }
}

/// Order in which media are searched, and tried for `Auto` saves.
pub const LOAD_ORDER: [StorageMethod; 5] = [
    StorageMethod::Sd,
    StorageMethod::Usb,
    StorageMethod::McSlotA,
    StorageMethod::McSlotB,
    StorageMethod::Smb,
];

/// Size of the memory-card comment block.
pub const MC_COMMENT_LEN: usize = 64;
const MC_COMMENT_LINE: usize = MC_COMMENT_LEN / 2;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage medium unavailable: {0}")]
    Unavailable(StorageMethod),

    #[error("No storage medium available")]
    NoMedium,

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Corrupt memory card file: {0}")]
    Corrupt(String),

    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A file the frontend persists, with the comment shown on memory cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredFile {
    pub name: &'static str,
    pub comment: &'static str,
}

pub const PREFS_FILE: StoredFile = StoredFile {
    name: "settings.toml",
    comment: "Preferences",
};

pub const PALETTE_FILE: StoredFile = StoredFile {
    name: "palettes.toml",
    comment: "Palette",
};

/// Raw byte access to the mounted media. `Auto` is resolved before it gets here.
pub trait Storage: Send + Sync {
    fn is_available(&self, method: StorageMethod) -> bool;

    fn load_bytes(
        &self,
        method: StorageMethod,
        name: &str,
    ) -> impl Future<Output = Result<Vec<u8>, StorageError>> + Send;

    fn save_bytes(
        &self,
        method: StorageMethod,
        name: &str,
        bytes: &[u8],
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Every medium mapped onto a directory of the host filesystem.
#[derive(Debug, Clone, Default)]
pub struct FsStorage {
    roots: HashMap<StorageMethod, PathBuf>,
}

impl FsStorage {
    pub fn new(roots: &StorageRoots) -> Self {
        let mut storage = Self::default();
        let media = [
            (StorageMethod::Sd, &roots.sd),
            (StorageMethod::Usb, &roots.usb),
            (StorageMethod::Dvd, &roots.dvd),
            (StorageMethod::Smb, &roots.smb),
            (StorageMethod::McSlotA, &roots.mc_slot_a),
            (StorageMethod::McSlotB, &roots.mc_slot_b),
        ];
        for (method, root) in media {
            if let Some(root) = root {
                storage.mount(method, root.clone());
            }
        }
        storage
    }

    pub fn mount(&mut self, method: StorageMethod, root: PathBuf) {
        debug!("Mounting {} at {}", method, root.display());
        self.roots.insert(method, root);
    }

    fn root(&self, method: StorageMethod) -> Result<&PathBuf, StorageError> {
        self.roots.get(&method).ok_or(StorageError::Unavailable(method))
    }
}

impl Storage for FsStorage {
    fn is_available(&self, method: StorageMethod) -> bool {
        self.roots.contains_key(&method)
    }

    async fn load_bytes(&self, method: StorageMethod, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.root(method)?.join(name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save_bytes(&self, method: StorageMethod, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        if method == StorageMethod::Dvd {
            return Err(StorageError::Unavailable(method));
        }
        let root = self.root(method)?;
        tokio::fs::create_dir_all(root).await?;
        tokio::fs::write(root.join(name), bytes).await?;
        Ok(())
    }
}

/// Prefixes the memory-card comment block: two NUL-padded 32-byte lines.
pub fn wrap_memory_card(payload: &[u8], file: &StoredFile) -> Vec<u8> {
    let mut out = vec![0u8; MC_COMMENT_LEN];
    let title = format!("{} {}", env!("CARGO_PKG_NAME"), file.comment);
    for (line, text) in [title.as_str(), file.comment].into_iter().enumerate() {
        let bytes = text.as_bytes();
        // keep one NUL terminator per line
        let len = bytes.len().min(MC_COMMENT_LINE - 1);
        let start = line * MC_COMMENT_LINE;
        out[start..start + len].copy_from_slice(&bytes[..len]);
    }
    out.extend_from_slice(payload);
    out
}

pub fn unwrap_memory_card(bytes: &[u8]) -> Result<&[u8], StorageError> {
    bytes
        .get(MC_COMMENT_LEN..)
        .ok_or_else(|| StorageError::Corrupt(format!("{} bytes is shorter than the header", bytes.len())))
}

/// Medium a save should go to. `Auto` picks the first available medium.
pub fn resolve_save_method<S: Storage>(storage: &S, method: StorageMethod) -> Result<StorageMethod, StorageError> {
    match method {
        StorageMethod::Auto => LOAD_ORDER
            .into_iter()
            .find(|m| storage.is_available(*m))
            .ok_or(StorageError::NoMedium),
        m if storage.is_available(m) => Ok(m),
        m => Err(StorageError::Unavailable(m)),
    }
}

/// Reads one file, stripping the memory-card header where there is one.
pub async fn load_file<S: Storage>(
    storage: &S,
    method: StorageMethod,
    file: &StoredFile,
) -> Result<Vec<u8>, StorageError> {
    let bytes = storage.load_bytes(method, file.name).await?;
    if method.is_memory_card() {
        Ok(unwrap_memory_card(&bytes)?.to_vec())
    } else {
        Ok(bytes)
    }
}

/// Writes one file and returns the medium it ended up on.
pub async fn save_file<S: Storage>(
    storage: &S,
    method: StorageMethod,
    file: &StoredFile,
    payload: &[u8],
) -> Result<StorageMethod, StorageError> {
    let method = resolve_save_method(storage, method)?;
    if method.is_memory_card() {
        storage
            .save_bytes(method, file.name, &wrap_memory_card(payload, file))
            .await?;
    } else {
        storage.save_bytes(method, file.name, payload).await?;
    }
    info!("Saved {} to {}", file.name, method);
    Ok(method)
}

/// Media that are mounted right now, in search order.
pub fn available_media<S: Storage>(storage: &S) -> Vec<StorageMethod> {
    LOAD_ORDER
        .into_iter()
        .filter(|m| storage.is_available(*m))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_card_header_round_trip() {
        let wrapped = wrap_memory_card(b"payload", &PREFS_FILE);
        assert_eq!(wrapped.len(), MC_COMMENT_LEN + 7);
        assert!(wrapped[..MC_COMMENT_LINE].starts_with(b"padmap Preferences"));
        assert!(wrapped[MC_COMMENT_LINE..].starts_with(b"Preferences\0"));
        assert_eq!(unwrap_memory_card(&wrapped).unwrap(), b"payload");
    }

    #[test]
    fn short_memory_card_file_is_corrupt() {
        assert!(matches!(unwrap_memory_card(&[0u8; 10]), Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn auto_save_prefers_earliest_medium() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FsStorage::default();
        assert!(matches!(
            resolve_save_method(&storage, StorageMethod::Auto),
            Err(StorageError::NoMedium)
        ));
        storage.mount(StorageMethod::Smb, dir.path().join("smb"));
        storage.mount(StorageMethod::McSlotB, dir.path().join("mcb"));
        assert_eq!(
            resolve_save_method(&storage, StorageMethod::Auto).unwrap(),
            StorageMethod::McSlotB
        );
        assert!(matches!(
            resolve_save_method(&storage, StorageMethod::Usb),
            Err(StorageError::Unavailable(StorageMethod::Usb))
        ));
        assert_eq!(
            available_media(&storage),
            vec![StorageMethod::McSlotB, StorageMethod::Smb]
        );
    }

    #[tokio::test]
    async fn memory_card_files_are_wrapped_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FsStorage::default();
        storage.mount(StorageMethod::McSlotA, dir.path().to_path_buf());
        save_file(&storage, StorageMethod::McSlotA, &PALETTE_FILE, b"abc")
            .await
            .unwrap();

        let raw = tokio::fs::read(dir.path().join(PALETTE_FILE.name)).await.unwrap();
        assert_eq!(raw.len(), MC_COMMENT_LEN + 3);
        assert_eq!(
            load_file(&storage, StorageMethod::McSlotA, &PALETTE_FILE).await.unwrap(),
            b"abc"
        );
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FsStorage::default();
        storage.mount(StorageMethod::Sd, dir.path().to_path_buf());
        assert!(matches!(
            load_file(&storage, StorageMethod::Sd, &PREFS_FILE).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn dvd_is_never_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FsStorage::default();
        storage.mount(StorageMethod::Dvd, dir.path().to_path_buf());
        assert!(matches!(
            save_file(&storage, StorageMethod::Dvd, &PREFS_FILE, b"x").await,
            Err(StorageError::Unavailable(StorageMethod::Dvd))
        ));
        assert!(!dir.path().join(PREFS_FILE.name).exists());
    }
}
