//! Factory keying presets.
//!
//! Ten canned behavior profiles (V0-V9) covering the classic keyer families,
//! each a complete set of mode selections, memory window, and timing weights.
//! A preset plus a speed yields a ready [`KeyerConfig`]; operators wanting
//! full manual control construct the config directly instead.

use crate::types::{
    ConfigError, IambicMode, KeyerConfig, MemoryMode, SqueezeMode, TimingWeights,
};

/// Factory preset selections.
///
/// Families:
/// - V0-V2: SuperKeyer II/III. Tight 55-99% latch window, live squeeze
///   evaluation, slightly aggressive 2.8:1 weighting.
/// - V3-V5: Accukeyer. 60-99% window, live squeeze evaluation, standard
///   3:1 weighting. V3 is the customary default.
/// - V6-V8: Curtis "A". 60-99% window, snapshot squeeze evaluation, no
///   bonus element, slightly conservative 3.2:1 weighting.
/// - V9: no memory at all, straight-key-like paddle response.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyingPreset {
    SuperKeyerBoth,
    SuperKeyerDit,
    SuperKeyerDah,
    AccukeyerBoth,
    AccukeyerDit,
    AccukeyerDah,
    CurtisABoth,
    CurtisADit,
    CurtisADah,
    NoMemory,
}

/// Per-family parameter bundle.
struct PresetData {
    window_open_pct: f32,
    window_close_pct: f32,
    memory_mode: MemoryMode,
    iambic_mode: IambicMode,
    squeeze_mode: SqueezeMode,
    weights: (u8, u8, u8),
}

impl KeyingPreset {
    /// All presets in V0..V9 order.
    pub const ALL: [KeyingPreset; 10] = [
        KeyingPreset::SuperKeyerBoth,
        KeyingPreset::SuperKeyerDit,
        KeyingPreset::SuperKeyerDah,
        KeyingPreset::AccukeyerBoth,
        KeyingPreset::AccukeyerDit,
        KeyingPreset::AccukeyerDah,
        KeyingPreset::CurtisABoth,
        KeyingPreset::CurtisADit,
        KeyingPreset::CurtisADah,
        KeyingPreset::NoMemory,
    ];

    fn data(&self) -> PresetData {
        let super_keyer = |memory| PresetData {
            window_open_pct: 55.0,
            window_close_pct: 99.0,
            memory_mode: memory,
            iambic_mode: IambicMode::B,
            squeeze_mode: SqueezeMode::Live,
            weights: (28, 48, 52),
        };
        let accukeyer = |memory| PresetData {
            window_open_pct: 60.0,
            window_close_pct: 99.0,
            memory_mode: memory,
            iambic_mode: IambicMode::B,
            squeeze_mode: SqueezeMode::Live,
            weights: (30, 50, 50),
        };
        let curtis_a = |memory| PresetData {
            window_open_pct: 60.0,
            window_close_pct: 99.0,
            memory_mode: memory,
            iambic_mode: IambicMode::A,
            squeeze_mode: SqueezeMode::Snapshot,
            weights: (32, 52, 48),
        };

        match self {
            KeyingPreset::SuperKeyerBoth => super_keyer(MemoryMode::DotAndDah),
            KeyingPreset::SuperKeyerDit => super_keyer(MemoryMode::DotOnly),
            KeyingPreset::SuperKeyerDah => super_keyer(MemoryMode::DahOnly),
            KeyingPreset::AccukeyerBoth => accukeyer(MemoryMode::DotAndDah),
            KeyingPreset::AccukeyerDit => accukeyer(MemoryMode::DotOnly),
            KeyingPreset::AccukeyerDah => accukeyer(MemoryMode::DahOnly),
            KeyingPreset::CurtisABoth => curtis_a(MemoryMode::DotAndDah),
            KeyingPreset::CurtisADit => curtis_a(MemoryMode::DotOnly),
            KeyingPreset::CurtisADah => curtis_a(MemoryMode::DahOnly),
            KeyingPreset::NoMemory => PresetData {
                window_open_pct: 60.0,
                window_close_pct: 99.0,
                memory_mode: MemoryMode::None,
                iambic_mode: IambicMode::A,
                squeeze_mode: SqueezeMode::Snapshot,
                weights: (30, 50, 50),
            },
        }
    }

    /// Build a full configuration for this preset at the given speed.
    ///
    /// The preset's window is stated as open/close positions along the
    /// element and translated here into the config's dead-zone pair.
    pub fn config(&self, wpm: u32) -> Result<KeyerConfig, ConfigError> {
        let data = self.data();
        let (l, s, p) = data.weights;
        KeyerConfig::new(
            wpm,
            data.iambic_mode,
            data.memory_mode,
            data.squeeze_mode,
            data.window_open_pct,
            100.0 - data.window_close_pct,
        )?
        .with_weights(TimingWeights::new(l, s, p)?)
    }

    /// Short identifier, "V0" through "V9".
    pub fn name(&self) -> &'static str {
        match self {
            KeyingPreset::SuperKeyerBoth => "V0",
            KeyingPreset::SuperKeyerDit => "V1",
            KeyingPreset::SuperKeyerDah => "V2",
            KeyingPreset::AccukeyerBoth => "V3",
            KeyingPreset::AccukeyerDit => "V4",
            KeyingPreset::AccukeyerDah => "V5",
            KeyingPreset::CurtisABoth => "V6",
            KeyingPreset::CurtisADit => "V7",
            KeyingPreset::CurtisADah => "V8",
            KeyingPreset::NoMemory => "V9",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            KeyingPreset::SuperKeyerBoth => "SuperKeyer Both",
            KeyingPreset::SuperKeyerDit => "SuperKeyer Dit",
            KeyingPreset::SuperKeyerDah => "SuperKeyer Dah",
            KeyingPreset::AccukeyerBoth => "Accukeyer Both",
            KeyingPreset::AccukeyerDit => "Accukeyer Dit",
            KeyingPreset::AccukeyerDah => "Accukeyer Dah",
            KeyingPreset::CurtisABoth => "Curtis A Both",
            KeyingPreset::CurtisADit => "Curtis A Dit",
            KeyingPreset::CurtisADah => "Curtis A Dah",
            KeyingPreset::NoMemory => "No Memory",
        }
    }

    /// Parse a case-insensitive "V0".."V9" identifier.
    pub fn parse(name: &str) -> Option<KeyingPreset> {
        let name = name.trim();
        let mut chars = name.chars();
        let prefix = chars.next()?;
        if prefix != 'v' && prefix != 'V' {
            return None;
        }
        let digit = chars.next()?.to_digit(10)?;
        if chars.next().is_some() {
            return None;
        }
        KeyingPreset::ALL.get(digit as usize).copied()
    }
}
