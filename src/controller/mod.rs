//! Controller subsystem: physical input snapshots and the gilrs sampler
//!
//! One [`FrameInputs`] is taken per emulated frame and handed to the
//! mapping layer:
//!
//! ```text
//! Gamepad ──► EventCollector ──► FrameInputs ──► InputManager ──► LogicalMask
//!             (gilrs)            (per frame)     (decoders)
//! ```
//!
//! Hardware that is not attached is simply `None` in the snapshot and
//! contributes nothing downstream.

pub mod codes;
pub mod event_collector;
pub mod stick;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display};

pub use stick::{GForce, Orientation, StickSample};

/// A class of physical input device with its own native code space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ControllerFamily {
    GameCube,
    Wiimote,
    Classic,
    Nunchuk,
    Keyboard,
}

impl ControllerFamily {
    pub const COUNT: usize = 5;

    pub const ALL: [ControllerFamily; Self::COUNT] = [
        ControllerFamily::GameCube,
        ControllerFamily::Wiimote,
        ControllerFamily::Classic,
        ControllerFamily::Nunchuk,
        ControllerFamily::Keyboard,
    ];

    pub fn index(self) -> usize {
        match self {
            ControllerFamily::GameCube => 0,
            ControllerFamily::Wiimote => 1,
            ControllerFamily::Classic => 2,
            ControllerFamily::Nunchuk => 3,
            ControllerFamily::Keyboard => 4,
        }
    }

    /// Record name used in the preferences document.
    pub fn record_name(self) -> &'static str {
        match self {
            ControllerFamily::GameCube => "gcpadmap",
            ControllerFamily::Wiimote => "wmpadmap",
            ControllerFamily::Classic => "ccpadmap",
            ControllerFamily::Nunchuk => "ncpadmap",
            ControllerFamily::Keyboard => "kbpadmap",
        }
    }

    pub fn from_record_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.record_name() == name)
    }
}

impl Display for ControllerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerFamily::GameCube => write!(f, "GameCube Pad"),
            ControllerFamily::Wiimote => write!(f, "Wiimote"),
            ControllerFamily::Classic => write!(f, "Classic Controller"),
            ControllerFamily::Nunchuk => write!(f, "Nunchuk"),
            ControllerFamily::Keyboard => write!(f, "Keyboard"),
        }
    }
}

/// Which accessory is plugged into the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpansionType {
    None,
    Nunchuk,
    Classic,
}

/// Accessory state, sampled together with the remote.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Expansion {
    #[default]
    None,
    Nunchuk {
        stick: StickSample,
        gforce: GForce,
        orient: Orientation,
    },
    Classic {
        left: StickSample,
        right: StickSample,
    },
}

impl Expansion {
    pub fn kind(&self) -> ExpansionType {
        match self {
            Expansion::None => ExpansionType::None,
            Expansion::Nunchuk { .. } => ExpansionType::Nunchuk,
            Expansion::Classic { .. } => ExpansionType::Classic,
        }
    }

    /// The stick that drives movement: nunchuk stick or classic left stick.
    pub fn movement_stick(&self) -> Option<StickSample> {
        match self {
            Expansion::None => None,
            Expansion::Nunchuk { stick, .. } => Some(*stick),
            Expansion::Classic { left, .. } => Some(*left),
        }
    }

    /// The classic controller's right stick, the only secondary stick on a remote.
    pub fn secondary_stick(&self) -> Option<StickSample> {
        match self {
            Expansion::Classic { right, .. } => Some(*right),
            _ => None,
        }
    }
}

/// GameCube pad state for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PadState {
    pub held: u32,
    pub pressed: u32,
    pub released: u32,
    pub stick: StickSample,
    pub substick: StickSample,
}

/// Motion remote state for one frame. Expansion buttons share the masks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RemoteState {
    pub held: u32,
    pub pressed: u32,
    pub released: u32,
    pub expansion: Expansion,
    pub gforce: GForce,
    pub orient: Orientation,
    /// IR pointer position in 640x480 screen space, when valid.
    pub cursor: Option<(f32, f32)>,
}

impl RemoteState {
    pub fn is_held(&self, code: u32) -> bool {
        self.held & code != 0
    }

    pub fn expansion_type(&self) -> ExpansionType {
        self.expansion.kind()
    }
}

/// Keys down on an attached USB keyboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardState {
    pub down: BTreeSet<u32>,
    pub pressed: BTreeSet<u32>,
}

impl KeyboardState {
    pub fn is_down(&self, key: u32) -> bool {
        self.down.contains(&key)
    }
}

/// Everything the physical controllers reported for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInputs {
    pub pad: Option<PadState>,
    pub remote: Option<RemoteState>,
    pub keyboard: Option<KeyboardState>,
}

impl FrameInputs {
    pub fn pad_held(&self) -> u32 {
        self.pad.map(|p| p.held).unwrap_or(0)
    }

    pub fn remote_held(&self) -> u32 {
        self.remote.as_ref().map(|r| r.held).unwrap_or(0)
    }

    pub fn expansion_type(&self) -> ExpansionType {
        self.remote
            .as_ref()
            .map(|r| r.expansion_type())
            .unwrap_or(ExpansionType::None)
    }

    pub fn key_down(&self, key: u32) -> bool {
        self.keyboard.as_ref().is_some_and(|k| k.is_down(key))
    }
}

/// Source of per-frame physical input.
pub trait InputSampler {
    fn sample(&mut self) -> FrameInputs;
}

/// Picks the native code the user just pressed on `family`, for the remap
/// prompt. Returns `None` when nothing new was pressed.
pub fn capture_binding(family: ControllerFamily, inputs: &FrameInputs) -> Option<u32> {
    let lowest_bit = |mask: u32| (mask != 0).then(|| 1u32 << mask.trailing_zeros());

    match family {
        ControllerFamily::GameCube => inputs.pad.and_then(|p| lowest_bit(p.pressed)),
        ControllerFamily::Wiimote => inputs
            .remote
            .as_ref()
            .and_then(|r| lowest_bit(r.pressed & 0xFFFF)),
        ControllerFamily::Classic => inputs
            .remote
            .as_ref()
            .filter(|r| r.expansion_type() == ExpansionType::Classic)
            .and_then(|r| lowest_bit(r.pressed)),
        ControllerFamily::Nunchuk => inputs
            .remote
            .as_ref()
            .filter(|r| r.expansion_type() == ExpansionType::Nunchuk)
            .and_then(|r| lowest_bit(r.pressed)),
        ControllerFamily::Keyboard => inputs
            .keyboard
            .as_ref()
            .and_then(|k| k.pressed.iter().next().copied()),
    }
}

#[cfg(test)]
mod tests {
    use super::codes::{gc, wpad};
    use super::*;

    #[test]
    fn record_names_round_trip() {
        for family in ControllerFamily::ALL {
            assert_eq!(ControllerFamily::from_record_name(family.record_name()), Some(family));
        }
        assert_eq!(ControllerFamily::from_record_name("bogus"), None);
    }

    #[test]
    fn capture_picks_lowest_new_press() {
        let inputs = FrameInputs {
            pad: Some(PadState {
                held: gc::PAD_BUTTON_A | gc::PAD_BUTTON_X,
                pressed: gc::PAD_BUTTON_X | gc::PAD_BUTTON_A,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(capture_binding(ControllerFamily::GameCube, &inputs), Some(gc::PAD_BUTTON_A));
    }

    #[test]
    fn capture_without_press_is_none() {
        let inputs = FrameInputs {
            remote: Some(RemoteState {
                held: wpad::BUTTON_A,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(capture_binding(ControllerFamily::Wiimote, &inputs), None);
        assert_eq!(capture_binding(ControllerFamily::Nunchuk, &inputs), None);
        assert_eq!(capture_binding(ControllerFamily::Keyboard, &inputs), None);
    }

    #[test]
    fn absent_hardware_reports_nothing() {
        let inputs = FrameInputs::default();
        assert_eq!(inputs.pad_held(), 0);
        assert_eq!(inputs.remote_held(), 0);
        assert_eq!(inputs.expansion_type(), ExpansionType::None);
        assert!(!inputs.key_down(codes::kb::KEY_A));
    }
}
