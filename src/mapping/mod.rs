//! Mapping layer: turns one frame of physical input into the emulated
//! system's button mask.
//!
//! ```text
//! FrameInputs ──► [Menu escape?] ──yes──► FrameOutcome::OpenMenu
//!                       │ no
//!                       ▼
//!          per-game decoder or composite decoder
//!          (direction + padmap + gestures)
//!                       │
//!                       ▼
//!               exclusion rules ──► FrameOutcome::Buttons(LogicalMask)
//! ```

pub mod decoder;
pub mod direction;
pub mod error;
pub mod games;
pub mod manager;
pub mod mask;
pub mod padmap;
pub mod strategy;

pub use decoder::{decode_frame, should_open_menu, turbo_gesture, BaselineDecoder};
pub use direction::{decode_direction, DirectionalZone};
pub use error::MappingError;
pub use games::GameRegistry;
pub use manager::{FrameOutcome, InputManager, Paused, Running};
pub use mask::{CanonicalSlot, LogicalMask};
pub use padmap::{ButtonMap, MappingStore};
pub use strategy::{AudioOutput, EmulatorMemory, GameDecoder, Haptics, SessionState};
