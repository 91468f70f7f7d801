//! Input session with statum typestate.
//!
//! The mapping store can only change while the session is paused, so a
//! frame never sees a half-edited padmap.
//!
//! # State Machine
//!
//! ```text
//!            resume()
//!   Paused ───────────► Running
//!     ▲                    │
//!     └────────────────────┘
//!        pause(audio)        poll() ──► FrameOutcome
//! ```

use crate::controller::{ControllerFamily, FrameInputs};
use crate::mapping::decoder::{decode_frame, should_open_menu};
use crate::mapping::direction::DirectionalZone;
use crate::mapping::games::GameRegistry;
use crate::mapping::mask::{CanonicalSlot, LogicalMask};
use crate::mapping::padmap::MappingStore;
use crate::mapping::strategy::{
    AudioOutput, EmulatorMemory, FrameContext, GameDecoder, Haptics, SessionState,
};
use crate::persistence::Preferences;
use statum::{machine, state};
use tracing::{debug, info, warn};

#[state]
#[derive(Debug, Clone)]
pub enum SessionMode {
    Paused,  // Menu open, padmaps editable
    Running, // Emulation polling every frame
}

/// Result of polling one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Buttons the emulated system sees this frame.
    Buttons(LogicalMask),
    /// The user asked for the menu. The frame carries no input.
    OpenMenu,
}

#[machine]
pub struct InputManager<S: SessionMode> {
    store: MappingStore,
    registry: GameRegistry,
    decoder: Option<Box<dyn GameDecoder>>,
    title: Option<String>,
    session: SessionState,
    zone: DirectionalZone,
    match_game_controls: bool,
    rumble_enabled: bool,
}

impl<S: SessionMode> InputManager<S> {
    pub fn store(&self) -> &MappingStore {
        &self.store
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn zone(&self) -> DirectionalZone {
        self.zone
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Name of the title-specific decoder, if one was resolved.
    pub fn decoder_name(&self) -> Option<&'static str> {
        self.decoder.as_ref().map(|d| d.name())
    }
}

impl InputManager<Paused> {
    pub fn create(zone: DirectionalZone) -> Self {
        info!("Creating input session, dead zone {}", zone.threshold);
        Self::new(
            MappingStore::new(),
            GameRegistry::new(),
            None, // decoder
            None, // title
            SessionState::default(),
            zone,
            true, // match_game_controls
            true, // rumble_enabled
        )
    }

    /// Resolves the decoder for a freshly loaded ROM and starts a clean
    /// session. Unknown titles fall back to the composite decoder.
    pub fn load_title(&mut self, code: &str) {
        self.decoder = match self.registry.resolve(code) {
            Ok(decoder) => Some(decoder),
            Err(e) => {
                warn!("{}, using standard controls", e);
                None
            }
        };
        self.title = Some(code.to_string());
        self.session.reset();
    }

    /// Binds a captured native code. Returns `false` and leaves the store
    /// untouched when nothing was captured.
    pub fn remap(
        &mut self,
        family: ControllerFamily,
        slot: CanonicalSlot,
        captured: Option<u32>,
    ) -> bool {
        match captured {
            Some(code) => {
                self.store.bind(family, slot, code);
                true
            }
            None => {
                debug!("Remap of {} {} cancelled", family, slot);
                false
            }
        }
    }

    pub fn reset_family(&mut self, family: ControllerFamily) {
        self.store.reset_to_defaults(family);
    }

    pub fn reset_all(&mut self) {
        self.store.reset_all();
    }

    pub fn store_mut(&mut self) -> &mut MappingStore {
        &mut self.store
    }

    pub fn set_match_game_controls(&mut self, enabled: bool) {
        self.match_game_controls = enabled;
    }

    pub fn set_rumble(&mut self, enabled: bool) {
        self.rumble_enabled = enabled;
    }

    pub fn set_zone(&mut self, zone: DirectionalZone) {
        self.zone = zone;
    }

    /// Takes over the session switches stored in the preferences.
    pub fn apply_preferences(&mut self, prefs: &Preferences) {
        self.match_game_controls = prefs.match_wii_game;
        self.rumble_enabled = prefs.menu.rumble;
    }

    pub fn resume(self) -> InputManager<Running> {
        info!(
            "Resuming input session ({})",
            self.decoder_name().unwrap_or("standard controls")
        );
        self.transition()
    }
}

impl InputManager<Running> {
    /// Samples one frame into the emulated button mask.
    pub fn poll(
        &mut self,
        inputs: &FrameInputs,
        memory: &dyn EmulatorMemory,
        haptics: &mut dyn Haptics,
    ) -> FrameOutcome {
        if should_open_menu(inputs) {
            debug!("Menu gesture detected");
            return FrameOutcome::OpenMenu;
        }

        let mask = match self.decoder.as_ref() {
            Some(decoder) if self.match_game_controls => {
                let mut ctx = FrameContext {
                    inputs,
                    store: &self.store,
                    zone: self.zone,
                    memory,
                    haptics: if self.rumble_enabled {
                        Some(&mut *haptics)
                    } else {
                        None
                    },
                };
                decoder.decode(&mut ctx, &mut self.session)
            }
            _ => decode_frame(inputs, &self.store, self.zone),
        };
        FrameOutcome::Buttons(mask.exclusive())
    }

    /// Emulated reset: forget everything the decoders remembered.
    pub fn reset_session(&mut self) {
        debug!("Session state cleared");
        self.session.reset();
    }

    pub fn pause(self, audio: &mut dyn AudioOutput) -> InputManager<Paused> {
        audio.stop();
        info!("Input session paused");
        self.transition()
    }
}
