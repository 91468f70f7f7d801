use padmap::controller::codes::{gc, wpad};
use padmap::controller::{capture_binding, ControllerFamily, FrameInputs, PadState, RemoteState, StickSample};
use padmap::mapping::strategy::DetachedMemory;
use padmap::mapping::{
    decode_direction, decode_frame, should_open_menu, AudioOutput, CanonicalSlot, DirectionalZone, FrameOutcome,
    Haptics, InputManager, LogicalMask, MappingStore,
};

struct NoHaptics;

impl Haptics for NoHaptics {
    fn rumble(&mut self, _strength: u8) {}
}

struct NoAudio;

impl AudioOutput for NoAudio {
    fn stop(&mut self) {}
}

fn pad(held: u32, stick: (i8, i8), substick: (i8, i8)) -> FrameInputs {
    FrameInputs {
        pad: Some(PadState {
            held,
            pressed: held,
            stick: StickSample::new(stick.0, stick.1),
            substick: StickSample::new(substick.0, substick.1),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn zone() -> DirectionalZone {
    DirectionalZone::new(15)
}

#[test]
fn stick_right_is_right_only() {
    let mask = decode_frame(&pad(0, (100, 0), (0, 0)), &MappingStore::new(), zone());
    assert_eq!(mask, LogicalMask::RIGHT);
}

#[test]
fn even_diagonal_sets_both_axes() {
    let mask = decode_frame(&pad(0, (80, 80), (0, 0)), &MappingStore::new(), zone());
    assert_eq!(mask, LogicalMask::RIGHT | LogicalMask::UP);
}

#[test]
fn inside_dead_zone_decodes_nothing() {
    for (x, y) in [(0, 0), (10, -10), (-14, 0), (0, 15)] {
        assert!(decode_direction(x, y, 15).is_empty(), "({}, {})", x, y);
    }
}

#[test]
fn rebinding_then_reset_restores_factory_code() {
    let mut store = MappingStore::new();
    let family = ControllerFamily::GameCube;
    assert_eq!(store.resolve(family).code(CanonicalSlot::B), gc::PAD_BUTTON_B);
    store.bind(family, CanonicalSlot::B, gc::PAD_BUTTON_Y);
    assert_eq!(store.resolve(family).code(CanonicalSlot::B), gc::PAD_BUTTON_Y);
    store.reset_to_defaults(family);
    assert_eq!(store.resolve(family).code(CanonicalSlot::B), gc::PAD_BUTTON_B);
}

#[test]
fn menu_gesture_ignores_other_buttons() {
    let everything = gc::PAD_BUTTON_A | gc::PAD_BUTTON_B | gc::PAD_BUTTON_START | gc::PAD_TRIGGER_L;
    assert!(should_open_menu(&pad(everything, (100, 100), (-100, 0))));
    assert!(should_open_menu(&pad(0, (0, 0), (-100, 0))));
    assert!(!should_open_menu(&pad(everything, (0, 0), (0, 0))));
}

#[test]
fn nothing_connected_is_zero_mask() {
    let mask = decode_frame(&FrameInputs::default(), &MappingStore::new(), zone());
    assert!(mask.is_empty());
}

#[test]
fn home_button_opens_menu_through_session() {
    let mut running = InputManager::create(zone()).resume();
    let inputs = FrameInputs {
        remote: Some(RemoteState {
            held: wpad::BUTTON_HOME,
            ..Default::default()
        }),
        ..Default::default()
    };
    assert_eq!(
        running.poll(&inputs, &DetachedMemory, &mut NoHaptics),
        FrameOutcome::OpenMenu
    );
}

#[test]
fn captured_binding_survives_pause_and_resume() {
    let mut manager = InputManager::create(zone());
    let press = pad(gc::PAD_BUTTON_X, (0, 0), (0, 0));
    let captured = capture_binding(ControllerFamily::GameCube, &press);
    assert_eq!(captured, Some(gc::PAD_BUTTON_X));
    assert!(manager.remap(ControllerFamily::GameCube, CanonicalSlot::Start, captured));

    let mut running = manager.resume();
    assert_eq!(
        running.poll(&press, &DetachedMemory, &mut NoHaptics),
        FrameOutcome::Buttons(LogicalMask::START)
    );

    let manager = running.pause(&mut NoAudio);
    assert_eq!(
        manager.store().resolve(ControllerFamily::GameCube).code(CanonicalSlot::Start),
        gc::PAD_BUTTON_X
    );
}

#[test]
fn opposing_directions_resolve_up_and_left() {
    let mut store = MappingStore::new();
    // Bind the pad's A onto Down so stick-up plus A asks for both
    store.bind(ControllerFamily::GameCube, CanonicalSlot::Down, gc::PAD_BUTTON_A);
    store.bind(ControllerFamily::GameCube, CanonicalSlot::Right, gc::PAD_BUTTON_B);
    let mask = decode_frame(&pad(gc::PAD_BUTTON_A | gc::PAD_BUTTON_B, (-100, 100), (0, 0)), &store, zone());
    assert!(mask.contains(LogicalMask::UP | LogicalMask::LEFT));
    assert!(!mask.intersects(LogicalMask::DOWN | LogicalMask::RIGHT));
}
