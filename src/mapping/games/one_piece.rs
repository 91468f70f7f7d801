//! One Piece. The nunchuk layout follows the Wii game and the GameCube
//! layout follows the GameCube one; the other controllers use their padmaps.

use super::{nunchuk_held, remote_or_idle};
use crate::controller::codes::{gc, wpad};
use crate::controller::ExpansionType;
use crate::mapping::decoder::{
    decode_classic, decode_keyboard, decode_wiimote, standard_dpad, standard_movement,
    SECONDARY_STICK_THRESHOLD,
};
use crate::mapping::mask::LogicalMask;
use crate::mapping::strategy::{FrameContext, GameDecoder, SessionState};

#[derive(Debug, Clone, Copy, Default)]
pub struct OnePiece;

#[derive(Debug, Default)]
struct Actions {
    jump: bool,
    attack: bool,
    attack_up: bool,
    character: bool,
    dash: bool,
    pause: bool,
    grab: bool,
    speed: bool,
    view: bool,
}

impl GameDecoder for OnePiece {
    fn decode(&self, ctx: &mut FrameContext<'_>, state: &mut SessionState) -> LogicalMask {
        let inputs = ctx.inputs;
        let mut j = standard_movement(inputs, ctx.zone)
            | decode_keyboard(inputs, ctx.store)
            | decode_wiimote(inputs, ctx.store)
            | decode_classic(inputs, ctx.store);
        let wp = remote_or_idle(inputs.remote.as_ref());
        let mut act = Actions::default();

        if wp.expansion_type() == ExpansionType::Nunchuk {
            j |= standard_dpad(inputs);
            act.jump = wp.is_held(wpad::BUTTON_B);
            act.attack = wp.is_held(wpad::BUTTON_A);
            act.character = wp.is_held(wpad::BUTTON_MINUS);
            act.pause = wp.is_held(wpad::BUTTON_PLUS);
            act.dash = nunchuk_held(&wp, wpad::NUNCHUK_BUTTON_C);
            act.grab = nunchuk_held(&wp, wpad::NUNCHUK_BUTTON_Z);
            act.view = wp.is_held(wpad::BUTTON_1);
            act.speed = wp.is_held(wpad::BUTTON_2);
        }

        if let Some(pad) = inputs.pad {
            if pad.substick.x > SECONDARY_STICK_THRESHOLD {
                j |= LogicalMask::SPEED;
            }
            let held = |code: u32| pad.held & code != 0;
            act.jump |= held(gc::PAD_BUTTON_Y);
            act.attack |= held(gc::PAD_BUTTON_A);
            act.grab |= held(gc::PAD_BUTTON_B);
            act.attack_up |= held(gc::PAD_BUTTON_X);
            act.dash |= held(gc::PAD_TRIGGER_L);
            act.pause |= held(gc::PAD_BUTTON_START);
            // block on the GameCube game, no equivalent here
            act.character |= held(gc::PAD_TRIGGER_R);
        }

        let outputs = [
            (act.jump, LogicalMask::A),
            (act.attack, LogicalMask::B),
            (act.attack_up, LogicalMask::UP | LogicalMask::B),
            (act.character, LogicalMask::L),
            (act.dash, state.last_dir),
            (act.pause, LogicalMask::START),
            (act.grab, LogicalMask::R),
            (act.speed, LogicalMask::SPEED),
            (act.view, LogicalMask::SELECT),
        ];
        for (on, bits) in outputs {
            if on {
                j |= bits;
            }
        }

        state.track_last_dir(j);
        j
    }

    fn name(&self) -> &'static str {
        "One Piece"
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::controller::{FrameInputs, PadState, StickSample};

    fn pad(held: u32) -> FrameInputs {
        FrameInputs {
            pad: Some(PadState {
                held,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn gamecube_layout() {
        let mut state = SessionState::default();
        assert_eq!(run(&OnePiece, &pad(gc::PAD_BUTTON_Y), &mut state), LogicalMask::A);
        assert_eq!(
            run(&OnePiece, &pad(gc::PAD_BUTTON_X), &mut state),
            LogicalMask::UP | LogicalMask::B
        );
        assert_eq!(run(&OnePiece, &pad(gc::PAD_BUTTON_B), &mut state), LogicalMask::R);
    }

    #[test]
    fn dash_uses_last_direction() {
        let mut state = SessionState::default();
        assert_eq!(run(&OnePiece, &pad(gc::PAD_TRIGGER_L), &mut state), LogicalMask::RIGHT);
        run(&OnePiece, &pad_stick(-100, 0), &mut state);
        assert_eq!(run(&OnePiece, &pad(gc::PAD_TRIGGER_L), &mut state), LogicalMask::LEFT);
    }

    #[test]
    fn substick_right_is_speed() {
        let inputs = FrameInputs {
            pad: Some(PadState {
                substick: StickSample::new(90, 0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut state = SessionState::default();
        assert_eq!(run(&OnePiece, &inputs, &mut state), LogicalMask::SPEED);
    }

    #[test]
    fn nunchuk_layout() {
        let mut state = SessionState::default();
        let mask = run(
            &OnePiece,
            &nunchuk_remote(wpad::BUTTON_B | wpad::NUNCHUK_BUTTON_Z | wpad::BUTTON_2),
            &mut state,
        );
        assert_eq!(mask, LogicalMask::A | LogicalMask::R | LogicalMask::SPEED);
    }
}
