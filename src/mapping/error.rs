//! Errors of the mapping layer

use thiserror::Error;

/// Failures outside the per-frame decode path, which never fails.
#[derive(Debug, Error)]
pub enum MappingError {
    /// Slot index outside the ten canonical slots
    #[error("Invalid slot index: {0}")]
    InvalidSlot(usize),

    /// Unknown controller record name
    #[error("Unknown controller family: {0}")]
    UnknownFamily(String),

    /// No decoder registered for the title code
    #[error("Unknown title code: {0}")]
    UnknownTitle(String),
}
