//! Lock-free paddle capture for interrupt-driven hosts.
//!
//! [`KeyerRuntime`](crate::fsm::KeyerRuntime) requires its two mutating
//! operations to be serialized. On targets where paddle edges arrive in a
//! GPIO interrupt while the tick runs elsewhere, [`PaddleInput`] is the
//! bridge: the ISR stores debounced contact state through `&self` atomics,
//! and the tick context drains the latest snapshot into the runtime once per
//! tick.

use portable_atomic::{AtomicBool, AtomicU32, Ordering};

use crate::fsm::KeyerRuntime;

/// Default contact debounce window in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u32 = 10;

/// One physical paddle contact.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Paddle {
    Dit,
    Dah,
}

/// Atomic paddle state, safe to update from interrupt context.
pub struct PaddleInput {
    dit_pressed: AtomicBool,
    dah_pressed: AtomicBool,
    dit_last_edge_ms: AtomicU32,
    dah_last_edge_ms: AtomicU32,
    debounce_ms: AtomicU32,
}

impl PaddleInput {
    pub const fn new() -> Self {
        Self {
            dit_pressed: AtomicBool::new(false),
            dah_pressed: AtomicBool::new(false),
            dit_last_edge_ms: AtomicU32::new(0),
            dah_last_edge_ms: AtomicU32::new(0),
            debounce_ms: AtomicU32::new(DEFAULT_DEBOUNCE_MS),
        }
    }

    /// Change the debounce window. A window of 0 accepts every edge.
    pub fn set_debounce_ms(&self, debounce_ms: u32) {
        self.debounce_ms.store(debounce_ms, Ordering::Relaxed);
    }

    /// Record a contact edge observed at `now_ms` (any monotonic millisecond
    /// counter). Edges closer together than the debounce window are treated
    /// as mechanical bounce and discarded.
    ///
    /// Returns true if the edge was accepted.
    pub fn update(&self, paddle: Paddle, pressed: bool, now_ms: u32) -> bool {
        let (state, last_edge) = match paddle {
            Paddle::Dit => (&self.dit_pressed, &self.dit_last_edge_ms),
            Paddle::Dah => (&self.dah_pressed, &self.dah_last_edge_ms),
        };
        let last = last_edge.load(Ordering::Relaxed);
        if now_ms.saturating_sub(last) < self.debounce_ms.load(Ordering::Relaxed) {
            return false;
        }
        state.store(pressed, Ordering::Relaxed);
        last_edge.store(now_ms, Ordering::Relaxed);
        true
    }

    /// Current dit contact state.
    pub fn dit(&self) -> bool {
        self.dit_pressed.load(Ordering::Relaxed)
    }

    /// Current dah contact state.
    pub fn dah(&self) -> bool {
        self.dah_pressed.load(Ordering::Relaxed)
    }

    pub fn both_pressed(&self) -> bool {
        self.dit() && self.dah()
    }

    pub fn both_released(&self) -> bool {
        !self.dit() && !self.dah()
    }

    /// Feed the current snapshot into a runtime. Call once per tick, before
    /// [`KeyerRuntime::tick`]; edges collapsed between two drains are
    /// observed as a single transition.
    pub fn drain_into(&self, runtime: &mut KeyerRuntime) {
        runtime.update_paddles(self.dit(), self.dah());
    }

    /// Release both contacts and forget edge history.
    pub fn reset(&self) {
        self.dit_pressed.store(false, Ordering::Relaxed);
        self.dah_pressed.store(false, Ordering::Relaxed);
        self.dit_last_edge_ms.store(0, Ordering::Relaxed);
        self.dah_last_edge_ms.store(0, Ordering::Relaxed);
    }
}

impl Default for PaddleInput {
    fn default() -> Self {
        Self::new()
    }
}
