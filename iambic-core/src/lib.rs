#![cfg_attr(not(feature = "std"), no_std)]

//! # iambic-core
//!
//! Decision engine for an iambic Morse paddle keyer. The core is a pure,
//! tick-driven state machine: the host feeds it paddle transitions and a
//! millisecond clock, and reads back which element is keyed at every
//! instant. Iambic Mode A/B, four memory-latch policies, and two
//! squeeze-evaluation policies are all independently configurable.
//!
//! The crate is `no_std` and performs no I/O of its own; the optional
//! `embassy-time` feature adds an async driver task for executor-based
//! hosts, and `test-utils` adds a deterministic scripting harness.

pub mod fsm;
pub mod hal;
pub mod paddle;
pub mod presets;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use fsm::*;
pub use hal::*;
pub use paddle::*;
pub use presets::KeyingPreset;
pub use types::*;

/// Keyer library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Customary configuration for general operating: Mode B, both memories,
/// full latch window, 20 WPM.
pub fn default_config() -> KeyerConfig {
    KeyerConfig::default()
}
