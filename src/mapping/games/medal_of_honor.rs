//! Medal of Honor: Infiltrator and Underground, first-person shooting with
//! the remote and nunchuk.

use super::{nunchuk_held, remote_or_idle};
use crate::controller::codes::wpad;
use crate::controller::{ExpansionType, RemoteState};
use crate::mapping::decoder::{
    decode_classic, decode_gamecube, decode_keyboard, decode_wiimote, standard_movement,
};
use crate::mapping::mask::LogicalMask;
use crate::mapping::strategy::{FrameContext, GameDecoder, SessionState};
use tracing::debug;

const RELOAD_SHAKE: f32 = 1.6;
/// Pointer x range, in 640-wide screen space, where Underground does not turn.
const TURN_DEAD_BAND: (f32, f32) = (280.0, 360.0);

fn reload_gesture(wp: &RemoteState) -> bool {
    wp.gforce.y.abs() > RELOAD_SHAKE || wp.is_held(wpad::BUTTON_UP | wpad::BUTTON_2)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MohInfiltrator;

impl GameDecoder for MohInfiltrator {
    fn decode(&self, ctx: &mut FrameContext<'_>, _state: &mut SessionState) -> LogicalMask {
        let inputs = ctx.inputs;
        let mut j = standard_movement(inputs, ctx.zone)
            | decode_gamecube(inputs, ctx.store)
            | decode_keyboard(inputs, ctx.store);
        let wp = remote_or_idle(inputs.remote.as_ref());

        match wp.expansion_type() {
            ExpansionType::None => j |= decode_wiimote(inputs, ctx.store),
            ExpansionType::Classic => j |= decode_classic(inputs, ctx.store),
            ExpansionType::Nunchuk => {
                if wp.is_held(wpad::BUTTON_PLUS) {
                    j |= LogicalMask::START;
                }
                // use
                if wp.is_held(wpad::BUTTON_MINUS) {
                    j |= LogicalMask::L;
                }
                if wp.is_held(wpad::BUTTON_A) {
                    j |= LogicalMask::A | LogicalMask::L;
                }
                // shoot
                if wp.is_held(wpad::BUTTON_B) {
                    j |= LogicalMask::A;
                }
                if reload_gesture(&wp) {
                    j |= LogicalMask::L;
                }
                // strafe
                if nunchuk_held(&wp, wpad::NUNCHUK_BUTTON_C) {
                    j |= LogicalMask::R;
                }
                // change weapon
                if wp.is_held(wpad::BUTTON_LEFT | wpad::BUTTON_RIGHT) {
                    j |= LogicalMask::B;
                }
                if wp.is_held(wpad::BUTTON_1) {
                    j |= LogicalMask::SPEED;
                }
            }
        }
        j
    }

    fn name(&self) -> &'static str {
        "Medal of Honor: Infiltrator"
    }
}

/// Underground turns with the pointer and strafes with the stick. Down on
/// the remote toggles a crouch that holds L+R until either is pressed.
#[derive(Debug, Clone, Copy, Default)]
pub struct MohUnderground;

impl GameDecoder for MohUnderground {
    fn decode(&self, ctx: &mut FrameContext<'_>, state: &mut SessionState) -> LogicalMask {
        let inputs = ctx.inputs;
        let mut j = standard_movement(inputs, ctx.zone)
            | decode_classic(inputs, ctx.store)
            | decode_wiimote(inputs, ctx.store)
            | decode_gamecube(inputs, ctx.store)
            | decode_keyboard(inputs, ctx.store);
        let wp = remote_or_idle(inputs.remote.as_ref());

        if wp.expansion_type() == ExpansionType::Nunchuk {
            // stick strafes
            if j.contains(LogicalMask::LEFT) {
                j |= LogicalMask::L;
            }
            if j.contains(LogicalMask::RIGHT) {
                j |= LogicalMask::R;
            }
            j -= LogicalMask::LEFT | LogicalMask::RIGHT;

            state.cursor_visible = true;
            if let Some((x, _)) = wp.cursor {
                if x < TURN_DEAD_BAND.0 {
                    j |= LogicalMask::LEFT;
                } else if x > TURN_DEAD_BAND.1 {
                    j |= LogicalMask::RIGHT;
                }
            }

            if wp.pressed & wpad::BUTTON_DOWN != 0 {
                state.crouched = !state.crouched;
                debug!("Crouched: {}", state.crouched);
            }
            if wp.is_held(wpad::BUTTON_PLUS) {
                j |= LogicalMask::START;
            }
            if wp.is_held(wpad::BUTTON_A | wpad::BUTTON_B) {
                j |= LogicalMask::A;
            }
            if reload_gesture(&wp) {
                j |= LogicalMask::SELECT;
            }
            if wp.is_held(wpad::BUTTON_LEFT | wpad::BUTTON_RIGHT) {
                j |= LogicalMask::B;
            }
            if wp.is_held(wpad::BUTTON_1) {
                j |= LogicalMask::SPEED;
            }
        } else {
            state.cursor_visible = false;
        }

        if state.crouched && !j.intersects(LogicalMask::L | LogicalMask::R) {
            j |= LogicalMask::L | LogicalMask::R;
        }
        j
    }

    fn name(&self) -> &'static str {
        "Medal of Honor: Underground"
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::controller::{Expansion, StickSample};

    fn pointing(x: f32, stick_x: i8, held: u32, pressed: u32) -> crate::controller::FrameInputs {
        let mut inputs = nunchuk_remote(held);
        if let Some(remote) = inputs.remote.as_mut() {
            remote.pressed = pressed;
            remote.cursor = Some((x, 240.0));
            if let Expansion::Nunchuk { stick, .. } = &mut remote.expansion {
                *stick = StickSample::new(stick_x, 0);
            }
        }
        inputs
    }

    #[test]
    fn infiltrator_nunchuk_layout() {
        let mut state = SessionState::default();
        let mask = run(
            &MohInfiltrator,
            &nunchuk_remote(wpad::BUTTON_B | wpad::NUNCHUK_BUTTON_C | wpad::BUTTON_RIGHT),
            &mut state,
        );
        assert_eq!(mask, LogicalMask::A | LogicalMask::R | LogicalMask::B);
    }

    #[test]
    fn infiltrator_bare_remote_uses_padmap() {
        let mut state = SessionState::default();
        assert_eq!(run(&MohInfiltrator, &bare_remote(wpad::BUTTON_1), &mut state), LogicalMask::B);
    }

    #[test]
    fn underground_stick_strafes_and_pointer_turns() {
        let mut state = SessionState::default();
        let mask = run(&MohUnderground, &pointing(100.0, 100, 0, 0), &mut state);
        assert_eq!(mask, LogicalMask::R | LogicalMask::LEFT);
        assert!(state.cursor_visible);

        let centred = run(&MohUnderground, &pointing(320.0, 0, 0, 0), &mut state);
        assert!(centred.is_empty());

        run(&MohUnderground, &bare_remote(0), &mut state);
        assert!(!state.cursor_visible);
    }

    #[test]
    fn crouch_toggles_on_press() {
        let mut state = SessionState::default();
        let press = pointing(320.0, 0, wpad::BUTTON_DOWN, wpad::BUTTON_DOWN);
        let hold = pointing(320.0, 0, wpad::BUTTON_DOWN, 0);

        assert_eq!(run(&MohUnderground, &press, &mut state), LogicalMask::L | LogicalMask::R);
        // holding does not flip it back
        assert_eq!(run(&MohUnderground, &hold, &mut state), LogicalMask::L | LogicalMask::R);
        assert!(state.crouched);

        // strafing right while crouched only reports R
        let strafe = pointing(320.0, 100, 0, 0);
        assert_eq!(run(&MohUnderground, &strafe, &mut state), LogicalMask::R);

        run(&MohUnderground, &press, &mut state);
        assert!(!state.crouched);
    }
}
