//! Native button-code spaces, one module per controller family.
//!
//! Codes are the raw bit values the hardware drivers report, so a held mask
//! can be tested with a plain `held & code != 0`. Keyboard codes are USB HID
//! usage ids and are matched against the set of keys down instead.

/// GameCube pad button bits.
pub mod gc {
    pub const PAD_BUTTON_LEFT: u32 = 0x0001;
    pub const PAD_BUTTON_RIGHT: u32 = 0x0002;
    pub const PAD_BUTTON_DOWN: u32 = 0x0004;
    pub const PAD_BUTTON_UP: u32 = 0x0008;
    pub const PAD_TRIGGER_Z: u32 = 0x0010;
    pub const PAD_TRIGGER_R: u32 = 0x0020;
    pub const PAD_TRIGGER_L: u32 = 0x0040;
    pub const PAD_BUTTON_A: u32 = 0x0100;
    pub const PAD_BUTTON_B: u32 = 0x0200;
    pub const PAD_BUTTON_X: u32 = 0x0400;
    pub const PAD_BUTTON_Y: u32 = 0x0800;
    pub const PAD_BUTTON_START: u32 = 0x1000;
}

/// Wii remote button bits, including the nunchuk buttons that share its mask.
pub mod wpad {
    pub const BUTTON_2: u32 = 0x0001;
    pub const BUTTON_1: u32 = 0x0002;
    pub const BUTTON_B: u32 = 0x0004;
    pub const BUTTON_A: u32 = 0x0008;
    pub const BUTTON_MINUS: u32 = 0x0010;
    pub const BUTTON_HOME: u32 = 0x0080;
    pub const BUTTON_LEFT: u32 = 0x0100;
    pub const BUTTON_RIGHT: u32 = 0x0200;
    pub const BUTTON_DOWN: u32 = 0x0400;
    pub const BUTTON_UP: u32 = 0x0800;
    pub const BUTTON_PLUS: u32 = 0x1000;

    pub const NUNCHUK_BUTTON_Z: u32 = 0x0001 << 16;
    pub const NUNCHUK_BUTTON_C: u32 = 0x0002 << 16;
}

/// Classic controller button bits, reported in the upper half of the remote mask.
pub mod classic {
    pub const BUTTON_UP: u32 = 0x0001 << 16;
    pub const BUTTON_LEFT: u32 = 0x0002 << 16;
    pub const BUTTON_ZR: u32 = 0x0004 << 16;
    pub const BUTTON_X: u32 = 0x0008 << 16;
    pub const BUTTON_A: u32 = 0x0010 << 16;
    pub const BUTTON_Y: u32 = 0x0020 << 16;
    pub const BUTTON_B: u32 = 0x0040 << 16;
    pub const BUTTON_ZL: u32 = 0x0080 << 16;
    pub const BUTTON_FULL_R: u32 = 0x0200 << 16;
    pub const BUTTON_PLUS: u32 = 0x0400 << 16;
    pub const BUTTON_HOME: u32 = 0x0800 << 16;
    pub const BUTTON_MINUS: u32 = 0x1000 << 16;
    pub const BUTTON_FULL_L: u32 = 0x2000 << 16;
    pub const BUTTON_DOWN: u32 = 0x4000 << 16;
    pub const BUTTON_RIGHT: u32 = 0x8000 << 16;
}

/// USB HID keyboard usage ids.
pub mod kb {
    pub const KEY_A: u32 = 0x04;
    pub const KEY_C: u32 = 0x06;
    pub const KEY_D: u32 = 0x07;
    pub const KEY_S: u32 = 0x16;
    pub const KEY_W: u32 = 0x1A;
    pub const KEY_X: u32 = 0x1B;
    pub const KEY_Z: u32 = 0x1D;
    pub const KEY_ENTER: u32 = 0x28;
    pub const KEY_BACKSPACE: u32 = 0x2A;
    pub const KEY_TAB: u32 = 0x2B;
    pub const KEY_SPACE: u32 = 0x2C;
    pub const KEY_RIGHT: u32 = 0x4F;
    pub const KEY_LEFT: u32 = 0x50;
    pub const KEY_DOWN: u32 = 0x51;
    pub const KEY_UP: u32 = 0x52;
    pub const KEY_LSHIFT: u32 = 0xE1;
    pub const KEY_RSHIFT: u32 = 0xE5;
}
