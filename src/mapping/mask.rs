//! Logical button mask consumed by the emulator core.

use crate::mapping::error::MappingError;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

bitflags! {
    /// Emulated-machine button state. Twelve bits of a 32-bit word are used.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LogicalMask: u32 {
        const A = 1 << 0;
        const B = 1 << 1;
        const SELECT = 1 << 2;
        const START = 1 << 3;
        const RIGHT = 1 << 4;
        const LEFT = 1 << 5;
        const UP = 1 << 6;
        const DOWN = 1 << 7;
        const R = 1 << 8;
        const L = 1 << 9;
        const SPEED = 1 << 10;
        const CAPTURE = 1 << 11;

        const DIRECTIONS = Self::RIGHT.bits() | Self::LEFT.bits() | Self::UP.bits() | Self::DOWN.bits();
    }
}

impl Default for LogicalMask {
    fn default() -> Self {
        Self::empty()
    }
}

/// One pairwise exclusion rule: when both bits are set, `loser` is cleared.
#[derive(Debug, Clone, Copy)]
pub struct Exclusion {
    pub winner: LogicalMask,
    pub loser: LogicalMask,
}

/// Opposing directions that cannot be held together. Up beats Down, Left beats Right.
pub const EXCLUSIONS: [Exclusion; 2] = [
    Exclusion {
        winner: LogicalMask::UP,
        loser: LogicalMask::DOWN,
    },
    Exclusion {
        winner: LogicalMask::LEFT,
        loser: LogicalMask::RIGHT,
    },
];

impl LogicalMask {
    /// Applies [`EXCLUSIONS`] and returns the corrected mask.
    pub fn exclusive(self) -> Self {
        EXCLUSIONS.iter().fold(self, |mask, rule| {
            if mask.contains(rule.winner | rule.loser) {
                mask - rule.loser
            } else {
                mask
            }
        })
    }

    /// Horizontal direction component, if any.
    pub fn horizontal(self) -> Option<LogicalMask> {
        if self.contains(LogicalMask::RIGHT) {
            Some(LogicalMask::RIGHT)
        } else if self.contains(LogicalMask::LEFT) {
            Some(LogicalMask::LEFT)
        } else {
            None
        }
    }
}

/// The ten remappable emulated buttons, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalSlot {
    B,
    A,
    Select,
    Start,
    Up,
    Down,
    Left,
    Right,
    L,
    R,
}

impl CanonicalSlot {
    pub const COUNT: usize = 10;

    pub const ALL: [CanonicalSlot; Self::COUNT] = [
        CanonicalSlot::B,
        CanonicalSlot::A,
        CanonicalSlot::Select,
        CanonicalSlot::Start,
        CanonicalSlot::Up,
        CanonicalSlot::Down,
        CanonicalSlot::Left,
        CanonicalSlot::Right,
        CanonicalSlot::L,
        CanonicalSlot::R,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn logical(self) -> LogicalMask {
        match self {
            CanonicalSlot::B => LogicalMask::B,
            CanonicalSlot::A => LogicalMask::A,
            CanonicalSlot::Select => LogicalMask::SELECT,
            CanonicalSlot::Start => LogicalMask::START,
            CanonicalSlot::Up => LogicalMask::UP,
            CanonicalSlot::Down => LogicalMask::DOWN,
            CanonicalSlot::Left => LogicalMask::LEFT,
            CanonicalSlot::Right => LogicalMask::RIGHT,
            CanonicalSlot::L => LogicalMask::L,
            CanonicalSlot::R => LogicalMask::R,
        }
    }
}

impl TryFrom<usize> for CanonicalSlot {
    type Error = MappingError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or(MappingError::InvalidSlot(index))
    }
}

impl Display for CanonicalSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CanonicalSlot::B => "B",
            CanonicalSlot::A => "A",
            CanonicalSlot::Select => "SELECT",
            CanonicalSlot::Start => "START",
            CanonicalSlot::Up => "UP",
            CanonicalSlot::Down => "DOWN",
            CanonicalSlot::Left => "LEFT",
            CanonicalSlot::Right => "RIGHT",
            CanonicalSlot::L => "L",
            CanonicalSlot::R => "R",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_layout_matches_core() {
        assert_eq!(LogicalMask::A.bits(), 1);
        assert_eq!(LogicalMask::RIGHT.bits(), 16);
        assert_eq!(LogicalMask::LEFT.bits(), 32);
        assert_eq!(LogicalMask::UP.bits(), 64);
        assert_eq!(LogicalMask::DOWN.bits(), 128);
        assert_eq!(LogicalMask::SPEED.bits(), 1024);
        assert_eq!(LogicalMask::CAPTURE.bits(), 2048);
    }

    #[test]
    fn up_beats_down() {
        let m = (LogicalMask::UP | LogicalMask::DOWN | LogicalMask::A).exclusive();
        assert_eq!(m, LogicalMask::UP | LogicalMask::A);
    }

    #[test]
    fn left_beats_right() {
        let m = (LogicalMask::LEFT | LogicalMask::RIGHT).exclusive();
        assert_eq!(m, LogicalMask::LEFT);
    }

    #[test]
    fn exclusion_leaves_single_directions_alone() {
        for bits in 0..=0xFFFu32 {
            let m = LogicalMask::from_bits_truncate(bits);
            let out = m.exclusive();
            assert!(!out.contains(LogicalMask::UP | LogicalMask::DOWN));
            assert!(!out.contains(LogicalMask::LEFT | LogicalMask::RIGHT));
            if !m.contains(LogicalMask::UP | LogicalMask::DOWN)
                && !m.contains(LogicalMask::LEFT | LogicalMask::RIGHT)
            {
                assert_eq!(out, m);
            }
        }
    }

    #[test]
    fn slot_indices_follow_table_order() {
        for (i, slot) in CanonicalSlot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
            assert_eq!(CanonicalSlot::from_index(i), Some(*slot));
        }
        assert_eq!(CanonicalSlot::from_index(10), None);
    }
}
