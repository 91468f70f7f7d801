//! Analog stick to digital direction decoding.
//!
//! A sample inside the dead-zone circle yields nothing. Axis-aligned samples
//! yield one bit. Diagonal samples test each axis independently against the
//! slope window `[-tan(67.5°), tan(67.5°))`, so a push may produce one bit,
//! two bits, or, right on the boundary, none at all.

use crate::controller::StickSample;
use crate::mapping::mask::LogicalMask;

/// tan(67.5°), the slope beyond which a push no longer counts for the other axis.
pub const DIAGONAL_SLOPE_LIMIT: f64 = 2.41421356237;

/// Default dead-zone radius in raw stick units.
pub const DEFAULT_PAD_CALIBRATION: i32 = 50;

/// Dead-zone classifier for one analog source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionalZone {
    pub threshold: i32,
}

impl Default for DirectionalZone {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_PAD_CALIBRATION,
        }
    }
}

impl DirectionalZone {
    pub fn new(threshold: i32) -> Self {
        Self { threshold }
    }

    pub fn decode(&self, stick: StickSample) -> LogicalMask {
        decode_direction(stick.x, stick.y, self.threshold)
    }
}

fn within_window(ratio: f32) -> bool {
    let t = f64::from(ratio);
    t >= -DIAGONAL_SLOPE_LIMIT && t < DIAGONAL_SLOPE_LIMIT
}

/// Decodes one stick sample into direction bits.
pub fn decode_direction(x: i8, y: i8, threshold: i32) -> LogicalMask {
    let (x, y) = (i32::from(x), i32::from(y));
    let mut bits = LogicalMask::empty();

    // squared compare, no sqrt
    if x * x + y * y <= threshold * threshold {
        return bits;
    }

    match (x, y) {
        (x, 0) if x > 0 => bits |= LogicalMask::RIGHT,
        (x, 0) if x < 0 => bits |= LogicalMask::LEFT,
        (0, y) if y > 0 => bits |= LogicalMask::UP,
        (0, y) if y < 0 => bits |= LogicalMask::DOWN,
        (x, y) => {
            if within_window(y as f32 / x as f32) {
                bits |= if x >= 0 {
                    LogicalMask::RIGHT
                } else {
                    LogicalMask::LEFT
                };
            }
            if within_window(x as f32 / y as f32) {
                bits |= if y >= 0 {
                    LogicalMask::UP
                } else {
                    LogicalMask::DOWN
                };
            }
        }
    }

    bits
}
