//! Core data types: elements, behavioral modes, and the keyer configuration.

/// Morse keying elements.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Element {
    /// Dit (short element, one unit)
    Dit,
    /// Dah (long element, three units at standard weighting)
    Dah,
}

impl Element {
    /// Returns the opposite element (Dit <-> Dah)
    pub const fn opposite(&self) -> Element {
        match self {
            Element::Dit => Element::Dah,
            Element::Dah => Element::Dit,
        }
    }
}

/// Combination of the two paddle contacts at one instant.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PaddleCombo {
    /// Neither paddle pressed
    None,
    /// Only the dit paddle pressed
    DitOnly,
    /// Only the dah paddle pressed
    DahOnly,
    /// Both paddles pressed (squeeze)
    Both,
}

impl PaddleCombo {
    /// Classify the two raw paddle booleans.
    pub const fn from_paddles(dit: bool, dah: bool) -> Self {
        match (dit, dah) {
            (true, true) => PaddleCombo::Both,
            (true, false) => PaddleCombo::DitOnly,
            (false, true) => PaddleCombo::DahOnly,
            (false, false) => PaddleCombo::None,
        }
    }

    /// Returns true if at least one paddle is pressed
    pub const fn any_pressed(&self) -> bool {
        !matches!(self, PaddleCombo::None)
    }
}

/// Iambic operating modes.
///
/// Mode A finishes the element in flight when the squeeze is released.
/// Mode B additionally sends one opposite "bonus" element when a squeeze
/// was seen during the element and released before its completion.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IambicMode {
    A,
    B,
}

/// Which paddle requests may be latched while an element is in flight.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MemoryMode {
    /// No memory: only the live paddle state matters
    None,
    /// Only a dit request can be latched
    DotOnly,
    /// Only a dah request can be latched
    DahOnly,
    /// Both requests can be latched
    DotAndDah,
}

impl MemoryMode {
    /// Returns true if a dit request may be latched in this mode
    pub const fn allows_dit(&self) -> bool {
        matches!(self, MemoryMode::DotOnly | MemoryMode::DotAndDah)
    }

    /// Returns true if a dah request may be latched in this mode
    pub const fn allows_dah(&self) -> bool {
        matches!(self, MemoryMode::DahOnly | MemoryMode::DotAndDah)
    }
}

/// How the squeeze history used by the Mode B bonus decision is tracked.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SqueezeMode {
    /// The reference combo always mirrors the present paddle state
    Live,
    /// The reference combo is captured at each paddle transition,
    /// holding the combo as it was immediately before the change
    Snapshot,
}

/// States of the keyer state machine.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyerState {
    /// Nothing in flight, waiting for paddle input
    Idle,
    /// A dit element is keyed
    SendDit,
    /// A dah element is keyed
    SendDah,
    /// Silence between elements
    InterElementGap,
}

impl KeyerState {
    /// Returns true while an element is keyed (key line asserted)
    pub const fn is_sending(&self) -> bool {
        matches!(self, KeyerState::SendDit | KeyerState::SendDah)
    }
}

/// Element weighting parameters.
///
/// The triple scales the theoretical timing derived from WPM: `p` stretches
/// the dit itself, `l` sets the dah-to-dit ratio, `s` sets the gap-to-dit
/// ratio. The defaults (30-50-50) reproduce standard 3:1 / 1:1 timing, so a
/// config that never touches the weights keys exactly `1200/wpm` ms dits.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingWeights {
    /// Dah length: dah = dit_effective * (l / 10), valid 10-90
    pub l: u8,
    /// Gap space: gap = dit_effective * (s / 50), valid 0-99
    pub s: u8,
    /// Dit weight: dit_effective = (1200/wpm) * (p / 50), valid 10-99
    pub p: u8,
}

impl Default for TimingWeights {
    fn default() -> Self {
        Self { l: 30, s: 50, p: 50 }
    }
}

impl TimingWeights {
    /// Create a weight triple, validating each range.
    pub fn new(l: u8, s: u8, p: u8) -> Result<Self, ConfigError> {
        let weights = Self { l, s, p };
        weights.validate()?;
        Ok(weights)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(10..=90).contains(&self.l) || self.s > 99 || !(10..=99).contains(&self.p) {
            return Err(ConfigError::InvalidTimingWeights);
        }
        Ok(())
    }
}

/// Errors rejected at configuration time.
///
/// The state machine itself is total and infallible; every degenerate input
/// that could poison its timing is refused here instead.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Speed must be strictly positive
    ZeroWpm,
    /// Memory window percentages outside [0,100], or the dead zones
    /// overlap (start + end >= 100) leaving no valid capture window
    InvalidMemoryWindow,
    /// A timing weight is outside its valid range
    InvalidTimingWeights,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroWpm => write!(f, "wpm must be greater than zero"),
            ConfigError::InvalidMemoryWindow => {
                write!(f, "memory window dead zones are out of range or overlap")
            }
            ConfigError::InvalidTimingWeights => {
                write!(f, "timing weights out of range (l: 10-90, s: 0-99, p: 10-99)")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Immutable per-session keyer configuration.
///
/// Created once from externally validated parameters and bound to a
/// [`KeyerRuntime`](crate::fsm::KeyerRuntime) for its whole life; a
/// reconfiguration constructs a fresh config and a fresh runtime.
///
/// `mem_block_start_pct` and `mem_block_end_pct` are dead zones at the two
/// ends of an element: paddle changes latch only while element progress is
/// within `[start, 100 - end]` percent.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyerConfig {
    pub wpm: u32,
    pub iambic_mode: IambicMode,
    pub memory_mode: MemoryMode,
    pub squeeze_mode: SqueezeMode,
    pub mem_block_start_pct: f32,
    pub mem_block_end_pct: f32,
    pub weights: TimingWeights,
}

impl Default for KeyerConfig {
    fn default() -> Self {
        Self {
            wpm: 20,
            iambic_mode: IambicMode::B,
            memory_mode: MemoryMode::DotAndDah,
            squeeze_mode: SqueezeMode::Snapshot,
            mem_block_start_pct: 0.0,
            mem_block_end_pct: 0.0,
            weights: TimingWeights::default(),
        }
    }
}

impl KeyerConfig {
    /// Create a configuration with validation.
    ///
    /// Rejects `wpm == 0` and any memory window whose dead zones are out of
    /// range or sum to 100% or more (the capture window would be empty or
    /// inverted and every latch silently masked).
    pub fn new(
        wpm: u32,
        iambic_mode: IambicMode,
        memory_mode: MemoryMode,
        squeeze_mode: SqueezeMode,
        mem_block_start_pct: f32,
        mem_block_end_pct: f32,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            wpm,
            iambic_mode,
            memory_mode,
            squeeze_mode,
            mem_block_start_pct,
            mem_block_end_pct,
            weights: TimingWeights::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the timing weights, re-validating the result.
    pub fn with_weights(mut self, weights: TimingWeights) -> Result<Self, ConfigError> {
        self.weights = weights;
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.wpm == 0 {
            return Err(ConfigError::ZeroWpm);
        }
        let pct_ok = |pct: f32| (0.0..=100.0).contains(&pct);
        if !pct_ok(self.mem_block_start_pct) || !pct_ok(self.mem_block_end_pct) {
            return Err(ConfigError::InvalidMemoryWindow);
        }
        if self.mem_block_start_pct + self.mem_block_end_pct >= 100.0 {
            return Err(ConfigError::InvalidMemoryWindow);
        }
        self.weights.validate()
    }

    /// Effective dit duration in milliseconds: `(1200 / wpm) * (p / 50)`.
    pub fn dit_duration_ms(&self) -> f32 {
        let theoretical = 1200.0 / self.wpm as f32;
        theoretical * (self.weights.p as f32 / 50.0)
    }

    /// Dah duration in milliseconds: `dit_effective * (l / 10)`.
    pub fn dah_duration_ms(&self) -> f32 {
        self.dit_duration_ms() * (self.weights.l as f32 / 10.0)
    }

    /// Inter-element gap in milliseconds: `dit_effective * (s / 50)`.
    pub fn gap_duration_ms(&self) -> f32 {
        self.dit_duration_ms() * (self.weights.s as f32 / 50.0)
    }

    /// Duration of a given element in milliseconds.
    pub fn element_duration_ms(&self, element: Element) -> f32 {
        match element {
            Element::Dit => self.dit_duration_ms(),
            Element::Dah => self.dah_duration_ms(),
        }
    }

    /// Dah-to-dit ratio under the current weights (3.0 at defaults).
    pub fn dash_ratio(&self) -> f32 {
        self.weights.l as f32 / 10.0
    }

    /// Effective words per minute under the current weights, from the PARIS
    /// standard word: 10 dits, 4 dahs, 9 element gaps, 4 character gaps of
    /// 3 dits and one word gap of 7 dits.
    pub fn effective_wpm(&self) -> f32 {
        let dit = self.dit_duration_ms();
        let dah = self.dah_duration_ms();
        let gap = self.gap_duration_ms();
        let paris_ms = 10.0 * dit + 4.0 * dah + 9.0 * gap + 4.0 * 3.0 * dit + 7.0 * dit;
        60_000.0 / paris_ms
    }
}
