//! Harry Potter titles, Game Boy Color and Advance.
//!
//! All of them share the remote layout (swing to cast, nunchuk Z to run),
//! the GBA games put the map screens on the remote d-pad, and the last two
//! add PC-style keyboard controls.

use super::{nunchuk_held, remote_or_idle};
use crate::controller::codes::{kb, wpad};
use crate::controller::RemoteState;
use crate::mapping::decoder::{
    decode_gamecube, dpad_arrow_keys, dpad_wasd, keys_to_bits, standard_dpad, standard_movement,
};
use crate::mapping::mask::LogicalMask;
use crate::mapping::strategy::{FrameContext, GameDecoder, SessionState};

const SPELL_SWING: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HpTitle {
    Gbc1,
    Gbc2,
    Stone,
    Chamber,
    Azkaban,
    Goblet,
    Phoenix,
}

#[derive(Debug, Clone, Copy)]
pub struct HarryPotter {
    title: HpTitle,
}

impl HarryPotter {
    pub fn new(title: HpTitle) -> Self {
        Self { title }
    }
}

fn bits_if(held: bool, bits: LogicalMask) -> LogicalMask {
    if held {
        bits
    } else {
        LogicalMask::empty()
    }
}

// d-pad navigates the map screens on the GBA games
fn map_dpad(wp: &RemoteState) -> LogicalMask {
    bits_if(wp.is_held(wpad::BUTTON_RIGHT), LogicalMask::R)
        | bits_if(wp.is_held(wpad::BUTTON_LEFT), LogicalMask::L)
        | bits_if(wp.is_held(wpad::BUTTON_UP), LogicalMask::UP)
        | bits_if(wp.is_held(wpad::BUTTON_DOWN), LogicalMask::DOWN)
}

fn menu_buttons(wp: &RemoteState) -> LogicalMask {
    bits_if(wp.is_held(wpad::BUTTON_PLUS), LogicalMask::START)
        | bits_if(wp.is_held(wpad::BUTTON_MINUS), LogicalMask::SELECT)
}

impl HarryPotter {
    fn baseline(&self, ctx: &FrameContext<'_>) -> LogicalMask {
        let inputs = ctx.inputs;
        let movement = standard_movement(inputs, ctx.zone) | decode_gamecube(inputs, ctx.store);
        match self.title {
            HpTitle::Gbc1 | HpTitle::Gbc2 => {
                movement | standard_dpad(inputs) | dpad_wasd(inputs) | dpad_arrow_keys(inputs)
            }
            HpTitle::Stone | HpTitle::Chamber | HpTitle::Azkaban => {
                movement | dpad_wasd(inputs) | dpad_arrow_keys(inputs)
            }
            HpTitle::Goblet => {
                movement
                    | dpad_arrow_keys(inputs)
                    | keys_to_bits(
                        inputs,
                        &[
                            (kb::KEY_A, LogicalMask::L),
                            (kb::KEY_D, LogicalMask::R),
                            (kb::KEY_ENTER, LogicalMask::A),
                            (kb::KEY_X, LogicalMask::A),
                            (kb::KEY_C, LogicalMask::B),
                            (kb::KEY_TAB, LogicalMask::SELECT),
                            (kb::KEY_SPACE, LogicalMask::START),
                            (kb::KEY_LSHIFT, LogicalMask::SPEED),
                            (kb::KEY_RSHIFT, LogicalMask::SPEED),
                        ],
                    )
            }
            HpTitle::Phoenix => {
                movement
                    | dpad_wasd(inputs)
                    | keys_to_bits(
                        inputs,
                        &[
                            (kb::KEY_LEFT, LogicalMask::L),
                            (kb::KEY_RIGHT, LogicalMask::R),
                            (kb::KEY_UP, LogicalMask::B),
                            (kb::KEY_DOWN, LogicalMask::B),
                            (kb::KEY_ENTER, LogicalMask::A),
                            (kb::KEY_TAB, LogicalMask::SELECT),
                            (kb::KEY_SPACE, LogicalMask::START),
                            (kb::KEY_LSHIFT, LogicalMask::SPEED),
                            (kb::KEY_RSHIFT, LogicalMask::SPEED),
                        ],
                    )
            }
        }
    }
}

impl GameDecoder for HarryPotter {
    fn decode(&self, ctx: &mut FrameContext<'_>, _state: &mut SessionState) -> LogicalMask {
        let mut j = self.baseline(ctx);
        let wp = remote_or_idle(ctx.inputs.remote.as_ref());
        let swing = wp.gforce.x.abs() > SPELL_SWING;
        let a = wp.is_held(wpad::BUTTON_A);
        let b = wp.is_held(wpad::BUTTON_B);
        let one = wp.is_held(wpad::BUTTON_1);
        let two = wp.is_held(wpad::BUTTON_2);
        let z = nunchuk_held(&wp, wpad::NUNCHUK_BUTTON_Z);
        let c = nunchuk_held(&wp, wpad::NUNCHUK_BUTTON_C);

        j |= menu_buttons(&wp);
        if self.title != HpTitle::Gbc1 && self.title != HpTitle::Gbc2 {
            j |= map_dpad(&wp);
        }

        j |= match self.title {
            HpTitle::Gbc1 | HpTitle::Gbc2 => {
                bits_if(a || swing, LogicalMask::A)
                    | bits_if(b, LogicalMask::B)
                    | bits_if(one, LogicalMask::L | LogicalMask::R)
                    | bits_if(z, LogicalMask::SPEED)
                    // camera
                    | bits_if(c, LogicalMask::SELECT)
            }
            HpTitle::Stone => {
                bits_if(a, LogicalMask::A)
                    | bits_if(b || swing, LogicalMask::B)
                    | bits_if(one || two, LogicalMask::R)
                    | bits_if(z, LogicalMask::SPEED)
                    // flute
                    | bits_if(c, LogicalMask::L)
            }
            HpTitle::Chamber => {
                bits_if(a, LogicalMask::B)
                    | bits_if(b || swing, LogicalMask::A)
                    | bits_if(one || two, LogicalMask::L)
                    // sneak, jump
                    | bits_if(z, LogicalMask::B)
                    | bits_if(c, LogicalMask::R)
            }
            HpTitle::Azkaban => {
                bits_if(a, LogicalMask::A)
                    | bits_if(b || swing, LogicalMask::B)
                    | bits_if(one, LogicalMask::L)
                    | bits_if(two, LogicalMask::R)
                    | bits_if(z, LogicalMask::SPEED)
            }
            HpTitle::Goblet => {
                bits_if(a || swing, LogicalMask::A)
                    | bits_if(b, LogicalMask::B)
                    | bits_if(one, LogicalMask::L)
                    | bits_if(two, LogicalMask::R)
                    | bits_if(z, LogicalMask::SPEED)
            }
            HpTitle::Phoenix => {
                bits_if(a, LogicalMask::A)
                    | bits_if(b, LogicalMask::B)
                    | bits_if(z, LogicalMask::SPEED)
            }
        };
        j
    }

    fn name(&self) -> &'static str {
        match self.title {
            HpTitle::Gbc1 => "Harry Potter GBC",
            HpTitle::Gbc2 => "Harry Potter 2 GBC",
            HpTitle::Stone => "Harry Potter 1",
            HpTitle::Chamber => "Harry Potter 2",
            HpTitle::Azkaban => "Harry Potter 3",
            HpTitle::Goblet => "Harry Potter 4",
            HpTitle::Phoenix => "Harry Potter 5",
        }
    }
}
