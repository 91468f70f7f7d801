//! Gyro and tilt cartridges. The remote stands in for the cartridge sensor,
//! so both titles rotate the screen while a bare remote is held sideways.

use super::{nunchuk_held, remote_or_idle};
use crate::controller::codes::{classic, wpad};
use crate::controller::ExpansionType;
use crate::mapping::decoder::{
    decode_classic, decode_gamecube, decode_keyboard, standard_classic, standard_dpad,
    standard_movement, standard_sideways,
};
use crate::mapping::mask::LogicalMask;
use crate::mapping::strategy::{FrameContext, GameDecoder, SessionState};

#[derive(Debug, Clone, Copy, Default)]
pub struct WarioWareTwisted;

impl GameDecoder for WarioWareTwisted {
    fn decode(&self, ctx: &mut FrameContext<'_>, state: &mut SessionState) -> LogicalMask {
        let inputs = ctx.inputs;
        let mut j = standard_movement(inputs, ctx.zone)
            | decode_keyboard(inputs, ctx.store)
            | decode_gamecube(inputs, ctx.store);

        let Some(wp) = inputs.remote.as_ref() else {
            state.tilt_sideways = false;
            return j;
        };

        match wp.expansion_type() {
            ExpansionType::Nunchuk => {
                state.tilt_sideways = false;
                j |= standard_dpad(inputs);
                if wp.is_held(wpad::BUTTON_PLUS) {
                    j |= LogicalMask::START;
                }
                if wp.is_held(wpad::BUTTON_MINUS) {
                    j |= LogicalMask::SELECT;
                }
                if wp.is_held(wpad::BUTTON_1 | wpad::BUTTON_2) {
                    j |= LogicalMask::L | LogicalMask::SPEED;
                }
                if wp.is_held(wpad::BUTTON_A) {
                    j |= LogicalMask::A;
                }
                if wp.is_held(wpad::BUTTON_B) {
                    j |= LogicalMask::B;
                }
                if nunchuk_held(wp, wpad::NUNCHUK_BUTTON_Z) {
                    j |= LogicalMask::R;
                }
                if nunchuk_held(wp, wpad::NUNCHUK_BUTTON_C) {
                    j |= LogicalMask::SPEED;
                }
            }
            ExpansionType::Classic => {
                state.tilt_sideways = false;
                j |= standard_dpad(inputs) | standard_classic(inputs);
            }
            ExpansionType::None => {
                state.tilt_sideways = true;
                j |= standard_sideways(inputs);
                if wp.is_held(wpad::BUTTON_B) {
                    j |= LogicalMask::SPEED;
                }
            }
        }
        j
    }

    fn name(&self) -> &'static str {
        "WarioWare Twisted"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KirbyTiltNTumble;

impl GameDecoder for KirbyTiltNTumble {
    fn decode(&self, ctx: &mut FrameContext<'_>, state: &mut SessionState) -> LogicalMask {
        let inputs = ctx.inputs;
        let mut j = standard_movement(inputs, ctx.zone)
            | decode_gamecube(inputs, ctx.store)
            | decode_keyboard(inputs, ctx.store);
        let wp = remote_or_idle(inputs.remote.as_ref());

        match wp.expansion_type() {
            ExpansionType::Nunchuk => {
                state.tilt_sideways = false;
                j |= standard_dpad(inputs);
                if wp.is_held(wpad::BUTTON_PLUS) {
                    j |= LogicalMask::START;
                }
                if wp.is_held(wpad::BUTTON_MINUS) {
                    j |= LogicalMask::SELECT;
                }
                if wp.is_held(wpad::BUTTON_1) {
                    j |= LogicalMask::B;
                }
                if wp.is_held(wpad::BUTTON_2 | wpad::BUTTON_A) {
                    j |= LogicalMask::A;
                }
                if wp.is_held(wpad::BUTTON_B) {
                    j |= LogicalMask::B;
                }
                if nunchuk_held(&wp, wpad::NUNCHUK_BUTTON_C) {
                    j |= LogicalMask::SPEED;
                }
            }
            ExpansionType::Classic => {
                state.tilt_sideways = false;
                j |= standard_dpad(inputs) | decode_classic(inputs, ctx.store);
                if wp.is_held(classic::BUTTON_A) {
                    j |= LogicalMask::A;
                }
            }
            // sideways only when a remote is actually there
            ExpansionType::None if inputs.remote.is_some() => {
                state.tilt_sideways = true;
                j |= standard_sideways(inputs);
                if wp.is_held(wpad::BUTTON_A) {
                    j |= LogicalMask::A;
                }
                if wp.is_held(wpad::BUTTON_B) {
                    j |= LogicalMask::SPEED;
                }
            }
            ExpansionType::None => state.tilt_sideways = false,
        }
        j
    }

    fn name(&self) -> &'static str {
        "Kirby Tilt 'n' Tumble"
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    #[test]
    fn bare_remote_turns_screen_sideways() {
        let mut state = SessionState::default();
        let mask = run(&WarioWareTwisted, &bare_remote(wpad::BUTTON_2 | wpad::BUTTON_RIGHT), &mut state);
        assert!(state.tilt_sideways);
        assert_eq!(mask, LogicalMask::A | LogicalMask::UP);

        run(&WarioWareTwisted, &nunchuk_remote(0), &mut state);
        assert!(!state.tilt_sideways);
    }

    #[test]
    fn no_remote_keeps_screen_upright() {
        let mut state = SessionState {
            tilt_sideways: true,
            ..Default::default()
        };
        run(&WarioWareTwisted, &pad_stick(0, 0), &mut state);
        assert!(!state.tilt_sideways);

        state.tilt_sideways = true;
        run(&KirbyTiltNTumble, &pad_stick(0, 0), &mut state);
        assert!(!state.tilt_sideways);
    }

    #[test]
    fn twisted_b_is_speed_on_a_bare_remote() {
        let mut state = SessionState::default();
        assert_eq!(
            run(&WarioWareTwisted, &bare_remote(wpad::BUTTON_B), &mut state),
            LogicalMask::SPEED
        );
    }

    #[test]
    fn twisted_nunchuk_layout() {
        let mut state = SessionState::default();
        let mask = run(
            &WarioWareTwisted,
            &nunchuk_remote(wpad::BUTTON_1 | wpad::NUNCHUK_BUTTON_Z | wpad::BUTTON_UP),
            &mut state,
        );
        assert_eq!(mask, LogicalMask::L | LogicalMask::SPEED | LogicalMask::R | LogicalMask::UP);
    }

    #[test]
    fn kirby_sideways_a_jumps() {
        let mut state = SessionState::default();
        let mask = run(&KirbyTiltNTumble, &bare_remote(wpad::BUTTON_A | wpad::BUTTON_B), &mut state);
        assert!(state.tilt_sideways);
        assert_eq!(mask, LogicalMask::A | LogicalMask::SPEED);
    }

    #[test]
    fn kirby_classic_uses_padmap() {
        let mut state = SessionState::default();
        // default classic padmap: Y is GBA B, B is GBA A
        let mask = run(&KirbyTiltNTumble, &classic_remote(classic::BUTTON_A | classic::BUTTON_Y), &mut state);
        assert_eq!(mask, LogicalMask::A | LogicalMask::B);
        assert!(!state.tilt_sideways);
    }
}
