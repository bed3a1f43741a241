//! Key-line output seam.
//!
//! The decision core is pull-based: after each tick the host mirrors
//! [`KeyerRuntime::is_key_down`](crate::fsm::KeyerRuntime::is_key_down) onto
//! the transmitter key line and sidetone gate. [`KeyOutput`] is the trait
//! boundary for that line, [`EmbeddedHalKey`] adapts any `embedded-hal`
//! output pin, and [`KeyLine`] adds change detection so the pin is only
//! touched on key-down/key-up edges.

use embedded_hal::digital::OutputPin;

/// Errors from key-line hardware.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// GPIO operation failed
    Gpio,
}

impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::Gpio => write!(f, "GPIO operation failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// A key line the host can assert and release.
pub trait KeyOutput {
    type Error;

    /// Set key state (true = key down / line asserted).
    fn set_state(&mut self, key_down: bool) -> Result<(), Self::Error>;
}

/// Key output over an `embedded-hal` push-pull pin.
pub struct EmbeddedHalKey<P> {
    pin: P,
    inverted: bool,
}

impl<P> EmbeddedHalKey<P>
where
    P: OutputPin,
{
    /// `inverted` = true for active-low keying transistors.
    pub fn new(pin: P, inverted: bool) -> Self {
        Self { pin, inverted }
    }

    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P> KeyOutput for EmbeddedHalKey<P>
where
    P: OutputPin,
{
    type Error = HalError;

    fn set_state(&mut self, key_down: bool) -> Result<(), Self::Error> {
        let level_high = key_down != self.inverted;
        if level_high {
            self.pin.set_high().map_err(|_| HalError::Gpio)
        } else {
            self.pin.set_low().map_err(|_| HalError::Gpio)
        }
    }
}

/// Change-detecting wrapper around a [`KeyOutput`].
///
/// `drive` may be called every tick; the underlying output is only touched
/// when the key state actually changes. Assumes the physical line starts
/// released.
pub struct KeyLine<K: KeyOutput> {
    key: K,
    down: bool,
}

impl<K: KeyOutput> KeyLine<K> {
    pub fn new(key: K) -> Self {
        Self { key, down: false }
    }

    /// Mirror `key_down` onto the line, writing only on edges.
    pub fn drive(&mut self, key_down: bool) -> Result<(), K::Error> {
        if key_down != self.down {
            self.key.set_state(key_down)?;
            self.down = key_down;
        }
        Ok(())
    }

    /// Force the line up regardless of tracked state.
    pub fn release(&mut self) -> Result<(), K::Error> {
        self.down = false;
        self.key.set_state(false)
    }

    pub fn is_down(&self) -> bool {
        self.down
    }

    pub fn into_inner(self) -> K {
        self.key
    }
}

/// In-memory key output recording every edge, for tests and simulations.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockKey {
    state: bool,
    edges: heapless::Vec<bool, 32>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockKey {
    pub fn new() -> Self {
        Self {
            state: false,
            edges: heapless::Vec::new(),
        }
    }

    pub fn is_down(&self) -> bool {
        self.state
    }

    /// Sequence of states written so far.
    pub fn edges(&self) -> &[bool] {
        &self.edges
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for MockKey {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl KeyOutput for MockKey {
    type Error = HalError;

    fn set_state(&mut self, key_down: bool) -> Result<(), Self::Error> {
        self.state = key_down;
        self.edges.push(key_down).map_err(|_| HalError::Gpio)
    }
}
