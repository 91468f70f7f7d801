//! Analog stick samples and motion readings.

use serde::{Deserialize, Serialize};

/// One analog stick reading in raw signed-byte space. Positive y is up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickSample {
    pub x: i8,
    pub y: i8,
}

impl StickSample {
    pub const CENTER: Self = Self { x: 0, y: 0 };

    pub fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Converts a polar reading (magnitude in [-1, 1], angle in degrees
    /// clockwise from up) into raw byte coordinates.
    pub fn from_polar(magnitude: f32, angle_deg: f32) -> Self {
        let mag = magnitude.clamp(-1.0, 1.0);
        let rad = angle_deg.to_radians();
        Self {
            x: to_axis_byte(mag * rad.sin()),
            y: to_axis_byte(mag * rad.cos()),
        }
    }

    /// Converts normalized axis values in [-1, 1], as reported by desktop
    /// gamepad drivers, into raw byte coordinates.
    pub fn from_normalized(x: f32, y: f32) -> Self {
        Self {
            x: to_axis_byte(x.clamp(-1.0, 1.0)),
            y: to_axis_byte(y.clamp(-1.0, 1.0)),
        }
    }
}

// `as` saturates, so a full +1.0 deflection lands on 127 instead of wrapping.
fn to_axis_byte(value: f32) -> i8 {
    (value * 128.0) as i8
}

/// Accelerometer reading in g.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GForce {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Orientation in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub pitch: f32,
    pub roll: f32,
    pub yaw: f32,
}
