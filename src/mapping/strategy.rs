//! Per-game decoder capability and the collaborators it may touch.

use crate::controller::FrameInputs;
use crate::mapping::direction::DirectionalZone;
use crate::mapping::mask::LogicalMask;
use crate::mapping::padmap::MappingStore;
use tracing::trace;

/// Read access to emulated memory, plus the write/reset half of the core
/// interface that decoders never use.
pub trait EmulatorMemory {
    fn read_byte(&self, address: u32) -> u8;
    fn write_byte(&mut self, address: u32, value: u8);
    fn reset(&mut self);
}

/// Force-feedback output. Fire and forget.
pub trait Haptics {
    fn rumble(&mut self, strength: u8);
}

/// Audio output, stopped before the menu takes over.
pub trait AudioOutput {
    fn stop(&mut self);
}

/// Stand-in when no emulator core is attached. Every byte reads as zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedMemory;

impl EmulatorMemory for DetachedMemory {
    fn read_byte(&self, _address: u32) -> u8 {
        0
    }

    fn write_byte(&mut self, _address: u32, _value: u8) {}

    fn reset(&mut self) {}
}

/// Everything a decoder sees for one frame.
pub struct FrameContext<'a> {
    pub inputs: &'a FrameInputs,
    pub store: &'a MappingStore,
    pub zone: DirectionalZone,
    pub memory: &'a dyn EmulatorMemory,
    /// `None` when rumble is switched off.
    pub haptics: Option<&'a mut dyn Haptics>,
}

impl<'a> FrameContext<'a> {
    pub fn rumble(&mut self, strength: u8) {
        if let Some(haptics) = self.haptics.as_deref_mut() {
            trace!("Rumble strength {}", strength);
            haptics.rumble(strength);
        }
    }

    pub fn read_byte(&self, address: u32) -> u8 {
        self.memory.read_byte(address)
    }
}

/// Multi-frame memory for the active decoder. One instance per play
/// session, cleared on emulated reset.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub prev_mask: LogicalMask,
    pub prev_prev_mask: LogicalMask,
    pub old_health: u8,
    pub hold_count: u32,
    /// Last horizontal direction moved in.
    pub last_dir: LogicalMask,
    pub roll_wait: bool,
    pub crouched: bool,
    pub gun_raised: bool,
    /// Read by the video layer: rotate the screen for a sideways remote.
    pub tilt_sideways: bool,
    /// Read by the video layer: draw the IR pointer.
    pub cursor_visible: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            prev_mask: LogicalMask::empty(),
            prev_prev_mask: LogicalMask::empty(),
            old_health: 0,
            hold_count: 0,
            last_dir: LogicalMask::RIGHT,
            roll_wait: false,
            crouched: false,
            gun_raised: false,
            tilt_sideways: false,
            cursor_visible: false,
        }
    }
}

impl SessionState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Records this frame's health and reports whether it dropped.
    pub fn health_dropped(&mut self, health: u8) -> bool {
        let dropped = health < self.old_health;
        self.old_health = health;
        dropped
    }

    /// Remembers the final mask for edge detection on the next frames.
    pub fn push_mask(&mut self, mask: LogicalMask) {
        self.prev_prev_mask = self.prev_mask;
        self.prev_mask = mask;
    }

    pub fn track_last_dir(&mut self, mask: LogicalMask) {
        if let Some(dir) = mask.horizontal() {
            self.last_dir = dir;
        }
    }
}

/// Produces the logical mask for one frame of one title.
pub trait GameDecoder: Send {
    fn decode(&self, ctx: &mut FrameContext<'_>, state: &mut SessionState) -> LogicalMask;

    fn name(&self) -> &'static str;
}
