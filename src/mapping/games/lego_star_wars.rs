//! LEGO Star Wars I and II: swing the remote for the lightsaber.

use super::{nunchuk_held, remote_or_idle};
use crate::controller::codes::wpad;
use crate::controller::ExpansionType;
use crate::mapping::decoder::{
    decode_classic, decode_gamecube, decode_keyboard, decode_wiimote, standard_movement,
};
use crate::mapping::mask::LogicalMask;
use crate::mapping::strategy::{FrameContext, GameDecoder, SessionState};

const SABER_SWING: f32 = 1.5;
const GRAPPLE_SWING: f32 = 1.6;

#[derive(Debug, Clone, Copy)]
pub struct LegoStarWars {
    sequel: bool,
}

impl LegoStarWars {
    pub fn new(sequel: bool) -> Self {
        Self { sequel }
    }
}

impl GameDecoder for LegoStarWars {
    fn decode(&self, ctx: &mut FrameContext<'_>, _state: &mut SessionState) -> LogicalMask {
        let inputs = ctx.inputs;
        let mut j = standard_movement(inputs, ctx.zone)
            | decode_gamecube(inputs, ctx.store)
            | decode_keyboard(inputs, ctx.store);
        let wp = remote_or_idle(inputs.remote.as_ref());

        if wp.is_held(wpad::BUTTON_PLUS) {
            j |= LogicalMask::START;
        }

        match wp.expansion_type() {
            ExpansionType::None => j |= decode_wiimote(inputs, ctx.store),
            ExpansionType::Classic => j |= decode_classic(inputs, ctx.store),
            ExpansionType::Nunchuk => {
                // build / use the force
                if nunchuk_held(&wp, wpad::NUNCHUK_BUTTON_Z) {
                    j |= if self.sequel {
                        LogicalMask::R
                    } else {
                        LogicalMask::L
                    };
                }
                // change characters
                if nunchuk_held(&wp, wpad::NUNCHUK_BUTTON_C) {
                    j |= LogicalMask::SELECT;
                }
                if self.sequel && wp.is_held(wpad::BUTTON_1 | wpad::BUTTON_2) {
                    j |= LogicalMask::SELECT;
                }
                if self.sequel && wp.gforce.y.abs() > GRAPPLE_SWING {
                    j |= LogicalMask::R;
                }
                // jump
                if wp.is_held(wpad::BUTTON_A) {
                    j |= LogicalMask::A;
                }
                // shoot
                if wp.is_held(wpad::BUTTON_B) {
                    j |= LogicalMask::B;
                }
                if wp.gforce.x.abs() > SABER_SWING {
                    j |= LogicalMask::B;
                }
                // special ability
                if wp.is_held(wpad::BUTTON_MINUS) {
                    j |= if self.sequel {
                        LogicalMask::L
                    } else {
                        LogicalMask::R
                    };
                }
                if wp.is_held(wpad::BUTTON_1 | wpad::BUTTON_2) {
                    j |= LogicalMask::SPEED;
                }
            }
        }
        j
    }

    fn name(&self) -> &'static str {
        if self.sequel {
            "LEGO Star Wars II"
        } else {
            "LEGO Star Wars"
        }
    }
}
