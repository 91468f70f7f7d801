//! gilrs-backed input sampler.
//!
//! Desktop gamepads are read as a GameCube pad: face buttons, shoulders and
//! both sticks land in the [`gc`] code space and edges are derived from the
//! previous frame.
//!
//! ```text
//! Initializing ──initialize()──► Collecting ──sample()──► FrameInputs
//! ```

use crate::controller::codes::gc;
use crate::controller::{FrameInputs, InputSampler, PadState, StickSample};
use chrono::{DateTime, Local};
use gilrs::{Axis, Button, Event, EventType, Gamepad, GamepadId, Gilrs};
use statum::{machine, state};
use tracing::{debug, error, info, warn};

const STATS_INTERVAL_SECS: i64 = 10;

// Collector errors
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("Failed to initialize collector: {0}")]
    InitializationError(String),
}

#[state]
#[derive(Debug, Clone)]
pub enum CollectionState {
    Initializing,
    Collecting,
}

/// Held-mask history for one pad, turning levels into edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeTracker {
    previous: u32,
}

impl EdgeTracker {
    /// Returns `(pressed, released)` for this frame's held mask.
    pub fn update(&mut self, held: u32) -> (u32, u32) {
        let pressed = held & !self.previous;
        let released = self.previous & !held;
        self.previous = held;
        (pressed, released)
    }

    pub fn clear(&mut self) {
        self.previous = 0;
    }
}

#[derive(Debug)]
struct SampleStats {
    frames: u64,
    events: u64,
    since: DateTime<Local>,
}

impl SampleStats {
    fn new() -> Self {
        Self {
            frames: 0,
            events: 0,
            since: Local::now(),
        }
    }

    fn tick(&mut self, events: u64) {
        self.frames += 1;
        self.events += events;
        let now = Local::now();
        let interval = chrono::Duration::seconds(STATS_INTERVAL_SECS);
        if now - self.since > interval {
            info!(
                "Sampler stats: {} frames, {} events in last {} seconds (avg {:.2} frames/sec)",
                self.frames,
                self.events,
                interval.num_seconds(),
                self.frames as f64 / interval.num_seconds() as f64
            );
            self.frames = 0;
            self.events = 0;
            self.since = now;
        }
    }
}

#[machine]
#[derive(Debug)]
pub struct EventCollector<S: CollectionState> {
    gilrs: Gilrs,
    active_gamepad: Option<GamepadId>,
    edges: EdgeTracker,
    stats: SampleStats,
}

impl<S: CollectionState> EventCollector<S> {
    pub fn active_gamepad(&self) -> Option<GamepadId> {
        self.active_gamepad
    }
}

impl EventCollector<Initializing> {
    pub fn create() -> Result<Self, CollectorError> {
        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(CollectorError::InitializationError(e.to_string()));
            }
        };

        Ok(Self::new(gilrs, None, EdgeTracker::default(), SampleStats::new()))
    }

    /// Picks the first connected gamepad. Without one the collector still
    /// starts and reports no pad until something is plugged in.
    pub fn initialize(mut self) -> Result<EventCollector<Collecting>, CollectorError> {
        let gamepads: Vec<(GamepadId, Gamepad<'_>)> = self.gilrs.gamepads().collect();

        if gamepads.is_empty() {
            warn!("No gamepad connected, continuing in idle mode");
        } else {
            info!("Found {} gamepads:", gamepads.len());
            for (idx, (id, gamepad)) in gamepads.iter().enumerate() {
                info!("  [{}] ID: {}, Name: {}", idx, id, gamepad.name());
            }
            let (id, gamepad) = &gamepads[0];
            self.active_gamepad = Some(*id);
            info!("Selected gamepad: {} ({})", gamepad.name(), id);
        }

        info!("Event Collector initialized, transitioning to Collecting state");
        Ok(self.transition())
    }
}

impl EventCollector<Collecting> {
    /// Drains pending gilrs events, following connects and disconnects.
    /// Returns how many events were seen.
    fn pump_events(&mut self) -> u64 {
        let mut count = 0;
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            count += 1;
            match event {
                EventType::Connected if self.active_gamepad.is_none() => {
                    info!("Controller {} connected, selecting it", id);
                    self.active_gamepad = Some(id);
                    self.edges.clear();
                }
                EventType::Disconnected if self.active_gamepad == Some(id) => {
                    warn!("Active controller {} disconnected", id);
                    self.active_gamepad = None;
                    self.edges.clear();
                }
                _ => debug!("gilrs event {:?} from {}", event, id),
            }
        }
        count
    }

    fn read_pad(&mut self, id: GamepadId) -> Option<PadState> {
        let gamepad = self.gilrs.connected_gamepad(id)?;
        let held = BUTTON_MAP
            .iter()
            .filter(|(button, _)| gamepad.is_pressed(*button))
            .fold(0, |mask, (_, code)| mask | code);
        let stick = StickSample::from_normalized(
            gamepad.value(Axis::LeftStickX),
            gamepad.value(Axis::LeftStickY),
        );
        let substick = StickSample::from_normalized(
            gamepad.value(Axis::RightStickX),
            gamepad.value(Axis::RightStickY),
        );
        let (pressed, released) = self.edges.update(held);
        Some(PadState {
            held,
            pressed,
            released,
            stick,
            substick,
        })
    }
}

impl InputSampler for EventCollector<Collecting> {
    fn sample(&mut self) -> FrameInputs {
        let events = self.pump_events();
        let pad = self.active_gamepad.and_then(|id| self.read_pad(id));
        self.stats.tick(events);
        FrameInputs {
            pad,
            ..Default::default()
        }
    }
}

/// Standard gamepad layout onto GameCube pad bits, by physical position.
const BUTTON_MAP: [(Button, u32); 14] = [
    (Button::South, gc::PAD_BUTTON_A),
    (Button::West, gc::PAD_BUTTON_B),
    (Button::East, gc::PAD_BUTTON_X),
    (Button::North, gc::PAD_BUTTON_Y),
    (Button::Start, gc::PAD_BUTTON_START),
    (Button::Select, gc::PAD_TRIGGER_Z),
    (Button::LeftTrigger, gc::PAD_TRIGGER_L),
    (Button::LeftTrigger2, gc::PAD_TRIGGER_L),
    (Button::RightTrigger, gc::PAD_TRIGGER_R),
    (Button::RightTrigger2, gc::PAD_TRIGGER_Z),
    (Button::DPadUp, gc::PAD_BUTTON_UP),
    (Button::DPadDown, gc::PAD_BUTTON_DOWN),
    (Button::DPadLeft, gc::PAD_BUTTON_LEFT),
    (Button::DPadRight, gc::PAD_BUTTON_RIGHT),
];
