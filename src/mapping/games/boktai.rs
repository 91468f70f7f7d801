//! Boktai 1 and 2. Pointing the remote at the ceiling stands in for holding
//! the cartridge's solar sensor up to the light.

use super::{nunchuk_held, remote_or_idle};
use crate::controller::codes::wpad;
use crate::controller::ExpansionType;
use crate::mapping::decoder::{
    decode_classic, decode_gamecube, decode_keyboard, standard_dpad, standard_movement,
};
use crate::mapping::mask::LogicalMask;
use crate::mapping::strategy::{FrameContext, GameDecoder, SessionState};

/// Raise above this many degrees of upward pitch, lower below the second.
const RAISE_PITCH: f32 = 45.0;
const LOWER_PITCH: f32 = 40.0;
const SWORD_SWING: f32 = 1.8;

#[derive(Debug, Clone, Copy)]
pub struct Boktai {
    sequel: bool,
}

impl Boktai {
    pub fn new(sequel: bool) -> Self {
        Self { sequel }
    }
}

impl GameDecoder for Boktai {
    fn decode(&self, ctx: &mut FrameContext<'_>, state: &mut SessionState) -> LogicalMask {
        let inputs = ctx.inputs;
        let mut j = standard_movement(inputs, ctx.zone)
            | standard_dpad(inputs)
            | decode_keyboard(inputs, ctx.store)
            | decode_gamecube(inputs, ctx.store)
            | decode_classic(inputs, ctx.store);
        let wp = remote_or_idle(inputs.remote.as_ref());

        // action
        if wp.is_held(wpad::BUTTON_A) {
            j |= LogicalMask::A;
        }
        let pitch_up = -wp.orient.pitch;
        if pitch_up > RAISE_PITCH {
            state.gun_raised = true;
        } else if pitch_up < LOWER_PITCH {
            state.gun_raised = false;
        }
        if state.gun_raised {
            j |= LogicalMask::A;
        }
        // fire
        if wp.is_held(wpad::BUTTON_B) {
            j |= LogicalMask::B;
        }
        if self.sequel && wp.gforce.x.abs() > SWORD_SWING {
            j |= LogicalMask::B;
        }
        // look around
        if wp.is_held(wpad::BUTTON_2) {
            j |= LogicalMask::R;
        }
        if wp.is_held(wpad::BUTTON_PLUS) {
            j |= LogicalMask::START;
        }
        if wp.is_held(wpad::BUTTON_MINUS) {
            j |= LogicalMask::SELECT;
        }

        if wp.expansion_type() == ExpansionType::Nunchuk {
            if nunchuk_held(&wp, wpad::NUNCHUK_BUTTON_C) {
                j |= LogicalMask::R;
            }
            // change element
            if nunchuk_held(&wp, wpad::NUNCHUK_BUTTON_Z) {
                j |= LogicalMask::L;
            }
            if wp.is_held(wpad::BUTTON_1) {
                j |= LogicalMask::SPEED;
            }
        } else if wp.is_held(wpad::BUTTON_1) {
            j |= LogicalMask::L;
        }
        j
    }

    fn name(&self) -> &'static str {
        if self.sequel {
            "Boktai 2"
        } else {
            "Boktai"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::controller::{FrameInputs, GForce, Orientation};

    fn tilted(pitch: f32) -> FrameInputs {
        let mut inputs = bare_remote(0);
        if let Some(remote) = inputs.remote.as_mut() {
            remote.orient = Orientation {
                pitch,
                roll: 0.0,
                yaw: 0.0,
            };
        }
        inputs
    }

    #[test]
    fn raising_the_remote_has_hysteresis() {
        let decoder = Boktai::new(false);
        let mut state = SessionState::default();
        assert!(run(&decoder, &tilted(-42.0), &mut state).is_empty());
        assert_eq!(run(&decoder, &tilted(-50.0), &mut state), LogicalMask::A);
        // still raised between the two limits
        assert_eq!(run(&decoder, &tilted(-42.0), &mut state), LogicalMask::A);
        assert!(run(&decoder, &tilted(-30.0), &mut state).is_empty());
        assert!(!state.gun_raised);
    }

    #[test]
    fn button_one_depends_on_expansion() {
        let decoder = Boktai::new(false);
        let mut state = SessionState::default();
        assert_eq!(run(&decoder, &bare_remote(wpad::BUTTON_1), &mut state), LogicalMask::L);
        assert_eq!(
            run(&decoder, &nunchuk_remote(wpad::BUTTON_1 | wpad::NUNCHUK_BUTTON_Z), &mut state),
            LogicalMask::SPEED | LogicalMask::L
        );
    }

    #[test]
    fn only_the_sequel_swings() {
        let mut inputs = bare_remote(0);
        if let Some(remote) = inputs.remote.as_mut() {
            remote.gforce = GForce {
                x: 2.0,
                y: 0.0,
                z: 0.0,
            };
        }
        let mut state = SessionState::default();
        assert!(run(&Boktai::new(false), &inputs, &mut state).is_empty());
        assert_eq!(run(&Boktai::new(true), &inputs, &mut state), LogicalMask::B);
    }
}
