//! Mortal Kombat titles: punches and kicks on the remote d-pad, rumble on
//! damage, and a facing-aware throw on the later GBA games.

use super::{nunchuk_held, remote_or_idle};
use crate::controller::codes::wpad;
use crate::mapping::decoder::standard_movement;
use crate::mapping::mask::LogicalMask;
use crate::mapping::strategy::{FrameContext, GameDecoder, SessionState};
use tracing::debug;

const MK1_HEALTH: u32 = 0xC695;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MkTitle {
    Original,
    Four,
    Advance,
}

/// Mortal Kombat, Mortal Kombat 4 and Mortal Kombat Advance.
#[derive(Debug, Clone, Copy)]
pub struct MortalKombat {
    title: MkTitle,
}

impl MortalKombat {
    pub fn new(title: MkTitle) -> Self {
        Self { title }
    }
}

impl GameDecoder for MortalKombat {
    fn decode(&self, ctx: &mut FrameContext<'_>, state: &mut SessionState) -> LogicalMask {
        let mut j = standard_movement(ctx.inputs, ctx.zone);

        // only the Game Boy original exposes a known health byte
        if self.title == MkTitle::Original {
            let health = ctx.read_byte(MK1_HEALTH);
            if state.health_dropped(health) {
                ctx.rumble(5);
            }
        }

        let wp = remote_or_idle(ctx.inputs.remote.as_ref());

        // punch
        if wp.is_held(wpad::BUTTON_UP | wpad::BUTTON_LEFT) {
            j |= LogicalMask::B;
        }
        // kick
        if wp.is_held(wpad::BUTTON_DOWN | wpad::BUTTON_RIGHT) {
            j |= LogicalMask::A;
        }
        if nunchuk_held(&wp, wpad::NUNCHUK_BUTTON_Z) {
            j |= match self.title {
                MkTitle::Original => LogicalMask::A | LogicalMask::B,
                MkTitle::Four => LogicalMask::START,
                MkTitle::Advance => LogicalMask::R,
            };
        }
        if self.title == MkTitle::Advance && nunchuk_held(&wp, wpad::NUNCHUK_BUTTON_C) {
            j |= LogicalMask::L;
        }
        // throw, always towards the right
        if wp.is_held(wpad::BUTTON_A) {
            j |= match self.title {
                MkTitle::Advance => LogicalMask::RIGHT,
                _ => LogicalMask::B | LogicalMask::RIGHT,
            };
        }
        match self.title {
            MkTitle::Advance => {
                if wp.is_held(wpad::BUTTON_PLUS | wpad::BUTTON_MINUS) {
                    j |= LogicalMask::SELECT;
                }
            }
            _ => {
                if wp.is_held(wpad::BUTTON_MINUS) {
                    j |= LogicalMask::SELECT;
                }
                if wp.is_held(wpad::BUTTON_PLUS) {
                    j |= LogicalMask::START;
                }
            }
        }
        j
    }

    fn name(&self) -> &'static str {
        match self.title {
            MkTitle::Original => "Mortal Kombat",
            MkTitle::Four => "Mortal Kombat 4",
            MkTitle::Advance => "Mortal Kombat Advance",
        }
    }
}

/// Where the throw sequence stands, derived from the last two frames.
///
/// Holding the throw button plays forwards, neutral, forwards+A+B and then
/// keeps the full combination held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrowPhase {
    /// Tap forwards.
    Idle,
    /// Let go of forwards for a frame.
    Charging,
    /// Forwards with both attack buttons.
    Released,
}

impl ThrowPhase {
    pub fn from_history(prev: LogicalMask, prev_prev: LogicalMask, forwards: LogicalMask) -> Self {
        let combo = forwards | LogicalMask::A | LogicalMask::B;
        if prev.contains(combo) || (prev_prev.contains(forwards) && !prev.contains(forwards)) {
            ThrowPhase::Released
        } else if prev.contains(forwards) {
            ThrowPhase::Charging
        } else {
            ThrowPhase::Idle
        }
    }

    pub fn apply(self, mask: LogicalMask, forwards: LogicalMask) -> LogicalMask {
        let combo = forwards | LogicalMask::A | LogicalMask::B;
        match self {
            ThrowPhase::Idle => mask | forwards,
            ThrowPhase::Charging => mask - combo,
            ThrowPhase::Released => mask | combo,
        }
    }
}

/// Deadly Alliance and Tournament Edition share one engine but keep the
/// fighter state at different addresses.
#[derive(Debug, Clone, Copy)]
pub struct MortalKombatTournament {
    health_addr: u32,
    side_addr: u32,
}

impl MortalKombatTournament {
    pub fn new(deadly_alliance: bool) -> Self {
        if deadly_alliance {
            Self {
                health_addr: 0x0300_0760,
                side_addr: 0x0300_0747,
            }
        } else {
            Self {
                health_addr: 0x0300_0761,
                side_addr: 0x0300_0777,
            }
        }
    }
}

impl GameDecoder for MortalKombatTournament {
    fn decode(&self, ctx: &mut FrameContext<'_>, state: &mut SessionState) -> LogicalMask {
        let mut j = standard_movement(ctx.inputs, ctx.zone);
        let wp = remote_or_idle(ctx.inputs.remote.as_ref());

        let health = ctx.read_byte(self.health_addr);
        if state.health_dropped(health) {
            ctx.rumble(20);
        }
        let forwards = if ctx.read_byte(self.side_addr) == 0 {
            LogicalMask::RIGHT
        } else {
            LogicalMask::LEFT
        };

        // punch
        if wp.is_held(wpad::BUTTON_UP | wpad::BUTTON_LEFT) {
            j |= LogicalMask::B;
        }
        // kick
        if wp.is_held(wpad::BUTTON_DOWN | wpad::BUTTON_RIGHT) {
            j |= LogicalMask::A;
        }
        // block
        if nunchuk_held(&wp, wpad::NUNCHUK_BUTTON_Z) {
            j |= LogicalMask::R;
        }
        // change styles
        if nunchuk_held(&wp, wpad::NUNCHUK_BUTTON_C) {
            j |= LogicalMask::L;
        }
        if wp.is_held(wpad::BUTTON_A) {
            let phase = ThrowPhase::from_history(state.prev_mask, state.prev_prev_mask, forwards);
            debug!("Throw phase {:?}", phase);
            j = phase.apply(j, forwards);
        }
        if wp.is_held(wpad::BUTTON_MINUS) {
            j |= LogicalMask::SELECT;
        }
        if wp.is_held(wpad::BUTTON_PLUS) {
            j |= LogicalMask::START;
        }
        if wp.is_held(wpad::BUTTON_1 | wpad::BUTTON_2) {
            j |= LogicalMask::SPEED;
        }

        let j = j.exclusive();
        state.push_mask(j);
        j
    }

    fn name(&self) -> &'static str {
        "Mortal Kombat Tournament Edition"
    }
}
