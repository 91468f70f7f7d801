//! Composite decoder: merges every attached controller into one mask.
//!
//! The building blocks here are also what the per-game decoders start from,
//! so each one is usable on its own:
//!
//! - movement from the analog sticks ([`standard_movement`])
//! - fixed d-pad layouts ([`standard_dpad`], [`standard_sideways`], ...)
//! - padmap-driven buttons per family ([`decode_gamecube`], ...)
//! - gestures: turbo ([`turbo_gesture`]) and menu escape ([`should_open_menu`])

use crate::controller::codes::{classic, gc, kb, wpad};
use crate::controller::{ControllerFamily, ExpansionType, FrameInputs, StickSample};
use crate::mapping::direction::DirectionalZone;
use crate::mapping::mask::LogicalMask;
use crate::mapping::padmap::{ButtonMap, MappingStore};
use crate::mapping::strategy::{FrameContext, GameDecoder, SessionState};
use tracing::trace;

/// Secondary-stick deflection that counts as a turbo (right) or menu (left) push.
pub const SECONDARY_STICK_THRESHOLD: i8 = 70;

fn mapped(held: u32, map: &ButtonMap) -> LogicalMask {
    map.entries()
        .filter(|(_, code)| held & code != 0)
        .fold(LogicalMask::empty(), |mask, (slot, _)| mask | slot.logical())
}

fn held_bits(held: u32, table: &[(u32, LogicalMask)]) -> LogicalMask {
    table
        .iter()
        .filter(|(code, _)| held & code != 0)
        .fold(LogicalMask::empty(), |mask, (_, bits)| mask | *bits)
}

/// Direction bits from the pad's main stick and the remote's movement stick.
pub fn standard_movement(inputs: &FrameInputs, zone: DirectionalZone) -> LogicalMask {
    let pad = inputs.pad.map(|p| zone.decode(p.stick)).unwrap_or_default();
    let remote = inputs
        .remote
        .as_ref()
        .and_then(|r| r.expansion.movement_stick())
        .map(|s| zone.decode(s))
        .unwrap_or_default();
    pad | remote
}

/// Remote d-pad held sideways: the pad's Up points right.
fn sideways_dpad(held: u32) -> LogicalMask {
    held_bits(
        held,
        &[
            (wpad::BUTTON_RIGHT, LogicalMask::UP),
            (wpad::BUTTON_LEFT, LogicalMask::DOWN),
            (wpad::BUTTON_UP, LogicalMask::LEFT),
            (wpad::BUTTON_DOWN, LogicalMask::RIGHT),
        ],
    )
}

fn upright_dpad(held: u32) -> LogicalMask {
    held_bits(
        held,
        &[
            (wpad::BUTTON_UP, LogicalMask::UP),
            (wpad::BUTTON_DOWN, LogicalMask::DOWN),
            (wpad::BUTTON_LEFT, LogicalMask::LEFT),
            (wpad::BUTTON_RIGHT, LogicalMask::RIGHT),
        ],
    )
}

fn classic_dpad(held: u32) -> LogicalMask {
    held_bits(
        held,
        &[
            (classic::BUTTON_UP, LogicalMask::UP),
            (classic::BUTTON_DOWN, LogicalMask::DOWN),
            (classic::BUTTON_LEFT, LogicalMask::LEFT),
            (classic::BUTTON_RIGHT, LogicalMask::RIGHT),
        ],
    )
}

fn gamecube_dpad(held: u32) -> LogicalMask {
    held_bits(
        held,
        &[
            (gc::PAD_BUTTON_UP, LogicalMask::UP),
            (gc::PAD_BUTTON_DOWN, LogicalMask::DOWN),
            (gc::PAD_BUTTON_LEFT, LogicalMask::LEFT),
            (gc::PAD_BUTTON_RIGHT, LogicalMask::RIGHT),
        ],
    )
}

/// Every d-pad as directions, independent of the padmaps. A bare remote is
/// read sideways, a remote with an expansion upright.
pub fn standard_dpad(inputs: &FrameInputs) -> LogicalMask {
    let mut bits = gamecube_dpad(inputs.pad_held());
    if let Some(remote) = &inputs.remote {
        bits |= match remote.expansion_type() {
            ExpansionType::None => sideways_dpad(remote.held),
            ExpansionType::Nunchuk => upright_dpad(remote.held),
            ExpansionType::Classic => upright_dpad(remote.held) | classic_dpad(remote.held),
        };
    }
    bits
}

/// Fixed layout for a bare remote held sideways.
pub fn standard_sideways(inputs: &FrameInputs) -> LogicalMask {
    let Some(remote) = &inputs.remote else {
        return LogicalMask::empty();
    };
    sideways_dpad(remote.held)
        | held_bits(
            remote.held,
            &[
                (wpad::BUTTON_2, LogicalMask::A),
                (wpad::BUTTON_1, LogicalMask::B),
                (wpad::BUTTON_MINUS, LogicalMask::SELECT),
                (wpad::BUTTON_PLUS, LogicalMask::START),
            ],
        )
}

/// Fixed classic controller layout.
pub fn standard_classic(inputs: &FrameInputs) -> LogicalMask {
    match &inputs.remote {
        Some(remote) if remote.expansion_type() == ExpansionType::Classic => held_bits(
            remote.held,
            &[
                (classic::BUTTON_A, LogicalMask::A),
                (classic::BUTTON_B, LogicalMask::B),
                (classic::BUTTON_MINUS, LogicalMask::SELECT),
                (classic::BUTTON_PLUS, LogicalMask::START),
                (classic::BUTTON_FULL_L | classic::BUTTON_ZL, LogicalMask::L),
                (classic::BUTTON_FULL_R | classic::BUTTON_ZR, LogicalMask::R),
            ],
        ),
        _ => LogicalMask::empty(),
    }
}

/// W/A/S/D as directions.
pub fn dpad_wasd(inputs: &FrameInputs) -> LogicalMask {
    keys_to_bits(
        inputs,
        &[
            (kb::KEY_W, LogicalMask::UP),
            (kb::KEY_S, LogicalMask::DOWN),
            (kb::KEY_A, LogicalMask::LEFT),
            (kb::KEY_D, LogicalMask::RIGHT),
        ],
    )
}

/// Arrow keys as directions.
pub fn dpad_arrow_keys(inputs: &FrameInputs) -> LogicalMask {
    keys_to_bits(
        inputs,
        &[
            (kb::KEY_UP, LogicalMask::UP),
            (kb::KEY_DOWN, LogicalMask::DOWN),
            (kb::KEY_LEFT, LogicalMask::LEFT),
            (kb::KEY_RIGHT, LogicalMask::RIGHT),
        ],
    )
}

pub(crate) fn keys_to_bits(inputs: &FrameInputs, table: &[(u32, LogicalMask)]) -> LogicalMask {
    table
        .iter()
        .filter(|(key, _)| inputs.key_down(*key))
        .fold(LogicalMask::empty(), |mask, (_, bits)| mask | *bits)
}

pub fn decode_gamecube(inputs: &FrameInputs, store: &MappingStore) -> LogicalMask {
    inputs
        .pad
        .map(|p| mapped(p.held, store.resolve(ControllerFamily::GameCube)))
        .unwrap_or_default()
}

/// The remote's own table only applies while nothing is plugged into it.
pub fn decode_wiimote(inputs: &FrameInputs, store: &MappingStore) -> LogicalMask {
    match &inputs.remote {
        Some(r) if r.expansion_type() == ExpansionType::None => {
            mapped(r.held, store.resolve(ControllerFamily::Wiimote))
        }
        _ => LogicalMask::empty(),
    }
}

pub fn decode_classic(inputs: &FrameInputs, store: &MappingStore) -> LogicalMask {
    match &inputs.remote {
        Some(r) if r.expansion_type() == ExpansionType::Classic => {
            mapped(r.held, store.resolve(ControllerFamily::Classic))
        }
        _ => LogicalMask::empty(),
    }
}

pub fn decode_nunchuk(inputs: &FrameInputs, store: &MappingStore) -> LogicalMask {
    match &inputs.remote {
        Some(r) if r.expansion_type() == ExpansionType::Nunchuk => {
            mapped(r.held, store.resolve(ControllerFamily::Nunchuk))
        }
        _ => LogicalMask::empty(),
    }
}

pub fn decode_keyboard(inputs: &FrameInputs, store: &MappingStore) -> LogicalMask {
    let Some(keyboard) = &inputs.keyboard else {
        return LogicalMask::empty();
    };
    store
        .resolve(ControllerFamily::Keyboard)
        .entries()
        .filter(|(_, key)| keyboard.is_down(*key))
        .fold(LogicalMask::empty(), |mask, (slot, _)| mask | slot.logical())
}

/// Padmap-driven buttons of every applicable family, ORed together.
pub fn mapped_buttons(inputs: &FrameInputs, store: &MappingStore) -> LogicalMask {
    decode_gamecube(inputs, store)
        | decode_wiimote(inputs, store)
        | decode_classic(inputs, store)
        | decode_nunchuk(inputs, store)
        | decode_keyboard(inputs, store)
}

fn secondary_sticks(inputs: &FrameInputs) -> impl Iterator<Item = StickSample> + '_ {
    inputs.pad.map(|p| p.substick).into_iter().chain(
        inputs
            .remote
            .as_ref()
            .and_then(|r| r.expansion.secondary_stick()),
    )
}

/// Substick or classic right stick pushed hard right, or remote A+B together.
pub fn turbo_gesture(inputs: &FrameInputs) -> bool {
    let stick = secondary_sticks(inputs).any(|s| s.x > SECONDARY_STICK_THRESHOLD);
    let chord = inputs
        .remote
        .as_ref()
        .is_some_and(|r| r.is_held(wpad::BUTTON_A) && r.is_held(wpad::BUTTON_B));
    stick || chord
}

/// Substick or classic right stick pushed hard left, or a home button.
pub fn should_open_menu(inputs: &FrameInputs) -> bool {
    let stick = secondary_sticks(inputs).any(|s| s.x < -SECONDARY_STICK_THRESHOLD);
    let home = inputs
        .remote
        .as_ref()
        .is_some_and(|r| r.is_held(wpad::BUTTON_HOME) || r.is_held(classic::BUTTON_HOME));
    stick || home
}

/// Baseline mask for one frame: sticks, mapped buttons and turbo, with the
/// exclusion rules applied.
pub fn decode_frame(inputs: &FrameInputs, store: &MappingStore, zone: DirectionalZone) -> LogicalMask {
    let mut mask = standard_movement(inputs, zone) | mapped_buttons(inputs, store);
    if turbo_gesture(inputs) {
        mask |= LogicalMask::SPEED;
    }
    let mask = mask.exclusive();
    trace!("Composite mask {:?}", mask);
    mask
}

/// The composite decoder as a [`GameDecoder`], used for titles without overrides.
#[derive(Debug, Default, Clone, Copy)]
pub struct BaselineDecoder;

impl GameDecoder for BaselineDecoder {
    fn decode(&self, ctx: &mut FrameContext<'_>, _state: &mut SessionState) -> LogicalMask {
        decode_frame(ctx.inputs, ctx.store, ctx.zone)
    }

    fn name(&self) -> &'static str {
        "Baseline"
    }
}
