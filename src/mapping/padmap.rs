//! Per-family button tables ("padmaps").
//!
//! Each controller family owns one ordered table that binds the ten canonical
//! slots to a native code. The store is owned by the input manager and only
//! mutated while emulation is paused.

use crate::controller::codes::{classic, gc, kb, wpad};
use crate::controller::ControllerFamily;
use crate::mapping::mask::CanonicalSlot;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One family's table, indexed by [`CanonicalSlot::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonMap(pub [u32; CanonicalSlot::COUNT]);

impl ButtonMap {
    pub fn code(&self, slot: CanonicalSlot) -> u32 {
        self.0[slot.index()]
    }

    /// `(slot, code)` pairs in table order.
    pub fn entries(&self) -> impl Iterator<Item = (CanonicalSlot, u32)> + '_ {
        CanonicalSlot::ALL.into_iter().map(|slot| (slot, self.code(slot)))
    }

    /// Factory table for a family.
    pub fn defaults(family: ControllerFamily) -> Self {
        match family {
            ControllerFamily::GameCube => ButtonMap([
                gc::PAD_BUTTON_B,
                gc::PAD_BUTTON_A,
                gc::PAD_TRIGGER_Z,
                gc::PAD_BUTTON_START,
                gc::PAD_BUTTON_UP,
                gc::PAD_BUTTON_DOWN,
                gc::PAD_BUTTON_LEFT,
                gc::PAD_BUTTON_RIGHT,
                gc::PAD_TRIGGER_L,
                gc::PAD_TRIGGER_R,
            ]),
            // held sideways, so the d-pad is rotated
            ControllerFamily::Wiimote => ButtonMap([
                wpad::BUTTON_1,
                wpad::BUTTON_2,
                wpad::BUTTON_MINUS,
                wpad::BUTTON_PLUS,
                wpad::BUTTON_RIGHT,
                wpad::BUTTON_LEFT,
                wpad::BUTTON_UP,
                wpad::BUTTON_DOWN,
                wpad::BUTTON_B,
                wpad::BUTTON_A,
            ]),
            ControllerFamily::Classic => ButtonMap([
                classic::BUTTON_Y,
                classic::BUTTON_B,
                classic::BUTTON_MINUS,
                classic::BUTTON_PLUS,
                classic::BUTTON_UP,
                classic::BUTTON_DOWN,
                classic::BUTTON_LEFT,
                classic::BUTTON_RIGHT,
                classic::BUTTON_FULL_L,
                classic::BUTTON_FULL_R,
            ]),
            ControllerFamily::Nunchuk => ButtonMap([
                wpad::NUNCHUK_BUTTON_C,
                wpad::NUNCHUK_BUTTON_Z,
                wpad::BUTTON_MINUS,
                wpad::BUTTON_PLUS,
                wpad::BUTTON_UP,
                wpad::BUTTON_DOWN,
                wpad::BUTTON_LEFT,
                wpad::BUTTON_RIGHT,
                wpad::BUTTON_2,
                wpad::BUTTON_1,
            ]),
            ControllerFamily::Keyboard => ButtonMap([
                kb::KEY_X,
                kb::KEY_Z,
                kb::KEY_BACKSPACE,
                kb::KEY_ENTER,
                kb::KEY_UP,
                kb::KEY_DOWN,
                kb::KEY_LEFT,
                kb::KEY_RIGHT,
                kb::KEY_A,
                kb::KEY_S,
            ]),
        }
    }
}

/// Button tables for every controller family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingStore {
    maps: [ButtonMap; ControllerFamily::COUNT],
}

impl Default for MappingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingStore {
    /// A store holding the factory tables.
    pub fn new() -> Self {
        Self {
            maps: ControllerFamily::ALL.map(ButtonMap::defaults),
        }
    }

    /// Overwrites one binding. The code is not validated against the family.
    pub fn bind(&mut self, family: ControllerFamily, slot: CanonicalSlot, code: u32) {
        debug!("Binding {} slot {} to code {:#x}", family, slot, code);
        self.maps[family.index()].0[slot.index()] = code;
    }

    pub fn resolve(&self, family: ControllerFamily) -> &ButtonMap {
        &self.maps[family.index()]
    }

    pub fn reset_to_defaults(&mut self, family: ControllerFamily) {
        info!("Resetting {} bindings to defaults", family);
        self.maps[family.index()] = ButtonMap::defaults(family);
    }

    pub fn reset_all(&mut self) {
        for family in ControllerFamily::ALL {
            self.reset_to_defaults(family);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gamecube_slot_b_defaults_to_native_b() {
        let store = MappingStore::new();
        assert_eq!(
            store.resolve(ControllerFamily::GameCube).code(CanonicalSlot::B),
            gc::PAD_BUTTON_B
        );
    }

    #[test]
    fn bind_then_reset_restores_factory_code() {
        let mut store = MappingStore::new();
        store.bind(ControllerFamily::GameCube, CanonicalSlot::B, gc::PAD_BUTTON_Y);
        assert_eq!(
            store.resolve(ControllerFamily::GameCube).code(CanonicalSlot::B),
            gc::PAD_BUTTON_Y
        );
        store.reset_to_defaults(ControllerFamily::GameCube);
        assert_eq!(
            store.resolve(ControllerFamily::GameCube).code(CanonicalSlot::B),
            gc::PAD_BUTTON_B
        );
    }

    #[test]
    fn reset_only_touches_one_family() {
        let mut store = MappingStore::new();
        store.bind(ControllerFamily::Keyboard, CanonicalSlot::A, kb::KEY_SPACE);
        store.bind(ControllerFamily::Classic, CanonicalSlot::A, classic::BUTTON_A);
        store.reset_to_defaults(ControllerFamily::Keyboard);
        assert_eq!(store.resolve(ControllerFamily::Keyboard).code(CanonicalSlot::A), kb::KEY_Z);
        assert_eq!(
            store.resolve(ControllerFamily::Classic).code(CanonicalSlot::A),
            classic::BUTTON_A
        );
    }

    #[test]
    fn binding_a_full_table_resolves_to_it() {
        let table: [u32; 10] = [7, 1, 2, 3, 4, 5, 6, 0x8000, 9, 10];
        for family in ControllerFamily::ALL {
            let mut store = MappingStore::new();
            for (slot, code) in CanonicalSlot::ALL.into_iter().zip(table) {
                store.bind(family, slot, code);
            }
            assert_eq!(store.resolve(family), &ButtonMap(table));
        }
    }

    #[test]
    fn entries_follow_slot_order() {
        let map = ButtonMap::defaults(ControllerFamily::Wiimote);
        let slots: Vec<_> = map.entries().map(|(s, _)| s).collect();
        assert_eq!(slots, CanonicalSlot::ALL.to_vec());
        assert_eq!(map.entries().next(), Some((CanonicalSlot::B, wpad::BUTTON_1)));
    }
}
