//! Title-specific decoders.
//!
//! Every decoder starts from the composite building blocks in
//! [`crate::mapping::decoder`] and layers the title's own controls on top.
//! Decoders are looked up once per loaded ROM by title code. Codes are the
//! three-character GBA game code (region letter stripped) or the Game Boy
//! header title.

pub mod boktai;
pub mod harry_potter;
pub mod lego_star_wars;
pub mod medal_of_honor;
pub mod mortal_kombat;
pub mod one_piece;
pub mod tilt;
pub mod tmnt;

use crate::controller::{ExpansionType, RemoteState};
use crate::mapping::error::MappingError;
use crate::mapping::strategy::GameDecoder;
use std::collections::HashMap;
use tracing::{debug, info};

use boktai::Boktai;
use harry_potter::{HarryPotter, HpTitle};
use lego_star_wars::LegoStarWars;
use medal_of_honor::{MohInfiltrator, MohUnderground};
use mortal_kombat::{MkTitle, MortalKombat, MortalKombatTournament};
use one_piece::OnePiece;
use tilt::{KirbyTiltNTumble, WarioWareTwisted};
use tmnt::Tmnt;

/// A registered title.
#[derive(Clone, Copy)]
pub struct GameEntry {
    pub code: &'static str,
    pub title: &'static str,
    factory: fn() -> Box<dyn GameDecoder>,
}

impl GameEntry {
    pub fn create(&self) -> Box<dyn GameDecoder> {
        (self.factory)()
    }
}

macro_rules! entry {
    ($code:expr, $title:expr, $make:expr) => {
        GameEntry {
            code: $code,
            title: $title,
            factory: || -> Box<dyn GameDecoder> { Box::new($make) },
        }
    };
}

const BUILTIN: &[GameEntry] = &[
    entry!("MORTAL KOMBAT", "Mortal Kombat", MortalKombat::new(MkTitle::Original)),
    entry!("MORTAL KOMBAT 4", "Mortal Kombat 4", MortalKombat::new(MkTitle::Four)),
    entry!("AMK", "Mortal Kombat Advance", MortalKombat::new(MkTitle::Advance)),
    entry!(
        "AW4",
        "Mortal Kombat: Deadly Alliance",
        MortalKombatTournament::new(true)
    ),
    entry!(
        "BW4",
        "Mortal Kombat: Tournament Edition",
        MortalKombatTournament::new(false)
    ),
    entry!("BLW", "LEGO Star Wars", LegoStarWars::new(false)),
    entry!("BL7", "LEGO Star Wars II", LegoStarWars::new(true)),
    entry!("BNT", "Teenage Mutant Ninja Turtles", Tmnt),
    entry!("HARRY POTTER", "Harry Potter (GBC)", HarryPotter::new(HpTitle::Gbc1)),
    entry!("HP CHAMBER", "Harry Potter 2 (GBC)", HarryPotter::new(HpTitle::Gbc2)),
    entry!("AHR", "Harry Potter and the Sorcerer's Stone", HarryPotter::new(HpTitle::Stone)),
    entry!("A7H", "Harry Potter and the Chamber of Secrets", HarryPotter::new(HpTitle::Chamber)),
    entry!("BHP", "Harry Potter and the Prisoner of Azkaban", HarryPotter::new(HpTitle::Azkaban)),
    entry!("BJX", "Harry Potter and the Goblet of Fire", HarryPotter::new(HpTitle::Goblet)),
    entry!("BJH", "Harry Potter and the Order of the Phoenix", HarryPotter::new(HpTitle::Phoenix)),
    entry!("RZW", "WarioWare: Twisted!", WarioWareTwisted),
    entry!("KIRBY TNT", "Kirby Tilt 'n' Tumble", KirbyTiltNTumble),
    entry!("BMH", "Medal of Honor: Infiltrator", MohInfiltrator),
    entry!("AUG", "Medal of Honor: Underground", MohUnderground),
    entry!("U3I", "Boktai: The Sun Is in Your Hand", Boktai::new(false)),
    entry!("U32", "Boktai 2: Solar Boy Django", Boktai::new(true)),
    entry!("BIP", "One Piece", OnePiece),
];

/// Normalizes a raw title code: trims, upper-cases and strips the region
/// letter from four-character GBA codes.
pub fn normalize_title_code(raw: &str) -> String {
    let code = raw.trim().to_ascii_uppercase();
    if code.len() == 4 && code.chars().all(|c| c.is_ascii_alphanumeric()) {
        code[..3].to_string()
    } else {
        code
    }
}

/// Title code to decoder lookup.
pub struct GameRegistry {
    entries: HashMap<&'static str, GameEntry>,
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRegistry {
    pub fn new() -> Self {
        let entries = BUILTIN.iter().map(|e| (e.code, *e)).collect();
        Self { entries }
    }

    pub fn get(&self, raw_code: &str) -> Option<&GameEntry> {
        self.entries.get(normalize_title_code(raw_code).as_str())
    }

    /// Builds the decoder for a title, or reports that it has no overrides.
    pub fn resolve(&self, raw_code: &str) -> Result<Box<dyn GameDecoder>, MappingError> {
        match self.get(raw_code) {
            Some(entry) => {
                info!("Using {} controls for {}", entry.title, raw_code);
                Ok(entry.create())
            }
            None => {
                debug!("No title-specific controls for {}", raw_code);
                Err(MappingError::UnknownTitle(raw_code.to_string()))
            }
        }
    }
}

/// The remote for this frame, or an idle one when none is attached.
pub(crate) fn remote_or_idle(remote: Option<&RemoteState>) -> RemoteState {
    remote.copied().unwrap_or_default()
}

/// Nunchuk and classic buttons share bits, so test the expansion first.
pub(crate) fn nunchuk_held(wp: &RemoteState, code: u32) -> bool {
    wp.expansion_type() == ExpansionType::Nunchuk && wp.is_held(code)
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::controller::{Expansion, FrameInputs, GForce, Orientation, PadState, RemoteState, StickSample};
    use crate::mapping::direction::DirectionalZone;
    use crate::mapping::mask::LogicalMask;
    use crate::mapping::padmap::MappingStore;
    use crate::mapping::strategy::{
        EmulatorMemory, FrameContext, GameDecoder, Haptics, SessionState,
    };
    use std::collections::HashMap;

    #[derive(Default)]
    pub struct FakeMemory(pub HashMap<u32, u8>);

    impl EmulatorMemory for FakeMemory {
        fn read_byte(&self, address: u32) -> u8 {
            self.0.get(&address).copied().unwrap_or(0)
        }
        fn write_byte(&mut self, address: u32, value: u8) {
            self.0.insert(address, value);
        }
        fn reset(&mut self) {
            self.0.clear();
        }
    }

    #[derive(Default)]
    pub struct RecordingHaptics(pub Vec<u8>);

    impl Haptics for RecordingHaptics {
        fn rumble(&mut self, strength: u8) {
            self.0.push(strength);
        }
    }

    pub fn run(decoder: &dyn GameDecoder, inputs: &FrameInputs, state: &mut SessionState) -> LogicalMask {
        run_with(decoder, inputs, state, &FakeMemory::default(), &mut RecordingHaptics::default())
    }

    pub fn run_with(
        decoder: &dyn GameDecoder,
        inputs: &FrameInputs,
        state: &mut SessionState,
        memory: &FakeMemory,
        haptics: &mut RecordingHaptics,
    ) -> LogicalMask {
        let store = MappingStore::new();
        let mut ctx = FrameContext {
            inputs,
            store: &store,
            zone: DirectionalZone::new(15),
            memory,
            haptics: Some(haptics),
        };
        decoder.decode(&mut ctx, state)
    }

    pub fn pad_stick(x: i8, y: i8) -> FrameInputs {
        FrameInputs {
            pad: Some(PadState {
                stick: StickSample::new(x, y),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn bare_remote(held: u32) -> FrameInputs {
        FrameInputs {
            remote: Some(RemoteState {
                held,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn nunchuk_remote(held: u32) -> FrameInputs {
        FrameInputs {
            remote: Some(RemoteState {
                held,
                expansion: Expansion::Nunchuk {
                    stick: StickSample::CENTER,
                    gforce: GForce::default(),
                    orient: Orientation::default(),
                },
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn classic_remote(held: u32) -> FrameInputs {
        FrameInputs {
            remote: Some(RemoteState {
                held,
                expansion: Expansion::Classic {
                    left: StickSample::CENTER,
                    right: StickSample::CENTER,
                },
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}
