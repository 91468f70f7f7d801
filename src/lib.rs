//! Controller input decoding and remapping for a GBA/GB emulator frontend.
//!
//! [`controller`] samples physical devices, [`mapping`] turns each frame into
//! the emulated button mask, [`persistence`] keeps padmaps and preferences
//! across runs.

pub mod config;
pub mod controller;
pub mod mapping;
pub mod persistence;

pub use config::AppConfig;
pub use controller::{ControllerFamily, FrameInputs, InputSampler};
pub use mapping::{FrameOutcome, InputManager, LogicalMask};
