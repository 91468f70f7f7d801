//! Teenage Mutant Ninja Turtles.
//!
//! Holding the swap button for more than 20 frames summons the whole
//! family instead of swapping turtles. Roll alternates the last horizontal
//! direction on and off to fake a double tap.

use super::{nunchuk_held, remote_or_idle};
use crate::controller::codes::{classic, gc, wpad};
use crate::controller::Expansion;
use crate::mapping::decoder::{
    decode_classic, decode_gamecube, decode_keyboard, standard_dpad, standard_movement,
};
use crate::mapping::mask::LogicalMask;
use crate::mapping::strategy::{FrameContext, GameDecoder, SessionState};

const SUMMON_HOLD_FRAMES: u32 = 20;

#[derive(Debug, Clone, Copy, Default)]
pub struct Tmnt;

#[derive(Debug, Default)]
struct Actions {
    jump: bool,
    attack: bool,
    spin_kick: bool,
    roll: bool,
    pause: bool,
    select: bool,
}

fn swap_held(state: &mut SessionState, j: &mut LogicalMask) {
    state.hold_count += 1;
    if state.hold_count > SUMMON_HOLD_FRAMES {
        *j |= LogicalMask::L | LogicalMask::R;
    }
}

fn swap_released(state: &mut SessionState, j: &mut LogicalMask) {
    if state.hold_count <= SUMMON_HOLD_FRAMES {
        *j |= LogicalMask::R;
    }
    state.hold_count = 0;
}

impl GameDecoder for Tmnt {
    fn decode(&self, ctx: &mut FrameContext<'_>, state: &mut SessionState) -> LogicalMask {
        let inputs = ctx.inputs;
        let mut j = standard_movement(inputs, ctx.zone)
            | standard_dpad(inputs)
            | decode_classic(inputs, ctx.store)
            | decode_keyboard(inputs, ctx.store)
            | decode_gamecube(inputs, ctx.store);
        let wp = remote_or_idle(inputs.remote.as_ref());
        let mut act = Actions::default();

        match wp.expansion {
            Expansion::Nunchuk { gforce, orient, .. } => {
                act.jump = wp.is_held(wpad::BUTTON_A);
                act.attack = wp.gforce.x.abs() > 1.5;
                act.spin_kick = gforce.x.abs() > 0.5;
                act.roll = nunchuk_held(&wp, wpad::NUNCHUK_BUTTON_Z | wpad::NUNCHUK_BUTTON_C);
                act.pause = wp.is_held(wpad::BUTTON_PLUS);
                act.select = wp.is_held(wpad::BUTTON_MINUS);
                if wp.is_held(wpad::BUTTON_B) {
                    j |= if orient.pitch < -35.0 && wp.orient.pitch < -35.0 {
                        LogicalMask::L | LogicalMask::R
                    } else {
                        LogicalMask::R
                    };
                }
            }
            Expansion::Classic { .. } => {
                act.jump = wp.is_held(classic::BUTTON_B);
                act.attack = wp.is_held(classic::BUTTON_A);
                act.spin_kick = wp.is_held(classic::BUTTON_X);
                act.pause = wp.is_held(classic::BUTTON_PLUS);
                act.select = wp.is_held(classic::BUTTON_MINUS);
                act.roll = wp.is_held(
                    classic::BUTTON_FULL_L
                        | classic::BUTTON_FULL_R
                        | classic::BUTTON_ZL
                        | classic::BUTTON_ZR,
                );
                if wp.is_held(classic::BUTTON_Y) {
                    swap_held(state, &mut j);
                }
                if wp.released & classic::BUTTON_Y != 0 {
                    swap_released(state, &mut j);
                }
            }
            Expansion::None => {
                act.jump = wp.is_held(wpad::BUTTON_A);
                act.attack = wp.gforce.x.abs() > 1.5;
                act.pause = wp.is_held(wpad::BUTTON_PLUS);
                act.select = wp.is_held(wpad::BUTTON_MINUS);
                if wp.is_held(wpad::BUTTON_B) {
                    j |= if wp.orient.pitch < -40.0 {
                        LogicalMask::L | LogicalMask::R
                    } else {
                        LogicalMask::R
                    };
                }
                act.spin_kick = wp.is_held(wpad::BUTTON_1);
                act.roll = wp.is_held(wpad::BUTTON_2);
            }
        }

        if let Some(pad) = inputs.pad {
            if pad.held & gc::PAD_BUTTON_A != 0 {
                j |= LogicalMask::A;
            }
            // swap turtles, hold for the family move
            if pad.held & gc::PAD_BUTTON_B != 0 {
                swap_held(state, &mut j);
            }
            if pad.released & gc::PAD_BUTTON_B != 0 {
                swap_released(state, &mut j);
            }
            act.attack |= pad.held & gc::PAD_BUTTON_X != 0;
            act.spin_kick |= pad.held & gc::PAD_BUTTON_Y != 0;
            act.pause |= pad.held & gc::PAD_BUTTON_START != 0;
            act.select |= pad.held & gc::PAD_TRIGGER_Z != 0;
            act.roll |= pad.held & (gc::PAD_TRIGGER_L | gc::PAD_TRIGGER_R) != 0;
        }

        if act.jump {
            j |= LogicalMask::A;
        }
        if act.attack {
            j |= LogicalMask::B;
        }
        if act.spin_kick {
            j |= LogicalMask::A | LogicalMask::B;
        }
        if act.pause {
            j |= LogicalMask::START;
        }
        if act.select {
            j |= LogicalMask::SELECT;
        }
        if act.roll {
            if !state.roll_wait {
                j |= state.last_dir;
                state.roll_wait = true;
            } else {
                state.roll_wait = false;
            }
        }

        state.track_last_dir(j);
        j
    }

    fn name(&self) -> &'static str {
        "TMNT"
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::controller::{FrameInputs, PadState};

    fn pad_buttons(held: u32, released: u32) -> FrameInputs {
        FrameInputs {
            pad: Some(PadState {
                held,
                released,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn short_press_swaps_turtle() {
        let mut state = SessionState::default();
        for _ in 0..5 {
            run(&Tmnt, &pad_buttons(gc::PAD_BUTTON_B, 0), &mut state);
        }
        let mask = run(&Tmnt, &pad_buttons(0, gc::PAD_BUTTON_B), &mut state);
        assert_eq!(mask, LogicalMask::R);
        assert_eq!(state.hold_count, 0);
    }

    #[test]
    fn long_hold_summons_family() {
        let mut state = SessionState::default();
        let mut last = LogicalMask::empty();
        for _ in 0..=SUMMON_HOLD_FRAMES {
            last = run(&Tmnt, &pad_buttons(gc::PAD_BUTTON_B, 0), &mut state);
        }
        // padmap B is bound to the pad's B as well
        assert_eq!(last, LogicalMask::B | LogicalMask::L | LogicalMask::R);
        let release = run(&Tmnt, &pad_buttons(0, gc::PAD_BUTTON_B), &mut state);
        assert!(!release.contains(LogicalMask::R));
    }

    #[test]
    fn roll_alternates_last_direction() {
        let mut state = SessionState::default();
        let roll = pad_buttons(gc::PAD_TRIGGER_L, 0);
        let first = run(&Tmnt, &roll, &mut state);
        let second = run(&Tmnt, &roll, &mut state);
        let third = run(&Tmnt, &roll, &mut state);
        assert!(first.contains(LogicalMask::RIGHT));
        assert!(!second.contains(LogicalMask::RIGHT));
        assert!(third.contains(LogicalMask::RIGHT));
    }

    #[test]
    fn roll_remembers_left() {
        let mut state = SessionState::default();
        run(&Tmnt, &pad_stick(-100, 0), &mut state);
        assert_eq!(state.last_dir, LogicalMask::LEFT);
        let mask = run(&Tmnt, &pad_buttons(gc::PAD_TRIGGER_R, 0), &mut state);
        assert!(mask.contains(LogicalMask::LEFT));
    }
}
