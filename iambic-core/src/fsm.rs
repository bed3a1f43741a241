//! The keyer state machine: a tick-driven decision engine that turns paddle
//! state into a timed sequence of keyed elements.
//!
//! The runtime is purely synchronous. The host advances it with
//! [`KeyerRuntime::tick`] from its timing source (typically a ~1 ms hardware
//! timer) and feeds paddle transitions through
//! [`KeyerRuntime::update_paddles`]; after each tick it reads
//! [`KeyerRuntime::state`] and [`KeyerRuntime::is_key_down`] to drive the key
//! line and sidetone. The core emits no callbacks and performs no I/O.

use heapless::Deque;

use crate::types::{
    Element, IambicMode, KeyerConfig, KeyerState, MemoryMode, PaddleCombo, SqueezeMode,
};

/// Capacity of the pending-element FIFO.
///
/// Each element completion enqueues at most one latched request plus one
/// Mode B bonus, and every gap drains one entry, so no paddle sequence can
/// realistically hold more than two or three entries. Eight leaves generous
/// headroom; an overflow drops the element and increments
/// [`KeyerRuntime::overflow_count`].
pub const ELEMENT_QUEUE_DEPTH: usize = 8;

/// Mutable state of one keying session, bound to an immutable [`KeyerConfig`].
pub struct KeyerRuntime {
    config: KeyerConfig,
    state: KeyerState,
    current_element: Option<Element>,
    element_elapsed_ms: f32,
    element_total_ms: f32,
    gap_elapsed_ms: f32,
    gap_total_ms: f32,
    element_progress_pct: f32,
    queue: Deque<Element, ELEMENT_QUEUE_DEPTH>,
    dot_requested: bool,
    dah_requested: bool,
    dit_pressed: bool,
    dah_pressed: bool,
    squeeze_seen_this_element: bool,
    last_valid_combo: PaddleCombo,
    overflow_count: u32,
}

impl KeyerRuntime {
    /// Create an idle runtime bound to the given configuration.
    pub fn new(config: KeyerConfig) -> Self {
        Self {
            config,
            state: KeyerState::Idle,
            current_element: None,
            element_elapsed_ms: 0.0,
            element_total_ms: 0.0,
            gap_elapsed_ms: 0.0,
            gap_total_ms: 0.0,
            element_progress_pct: 0.0,
            queue: Deque::new(),
            dot_requested: false,
            dah_requested: false,
            dit_pressed: false,
            dah_pressed: false,
            squeeze_seen_this_element: false,
            last_valid_combo: PaddleCombo::None,
            overflow_count: 0,
        }
    }

    /// The configuration this runtime was constructed with.
    pub fn config(&self) -> &KeyerConfig {
        &self.config
    }

    /// Record a paddle transition and update the squeeze history.
    ///
    /// Call on every physical paddle change; calls may arrive zero or more
    /// times between ticks and extra calls with unchanged state are
    /// harmless. Each call feeds the squeeze history immediately, while
    /// memory latching observes only the paddle state current at the next
    /// tick. The caller must serialize this against [`Self::tick`]
    /// (see [`PaddleInput`](crate::paddle::PaddleInput) for a lock-free
    /// ISR-side bridge).
    pub fn update_paddles(&mut self, dit: bool, dah: bool) {
        let prev_combo = PaddleCombo::from_paddles(self.dit_pressed, self.dah_pressed);
        self.dit_pressed = dit;
        self.dah_pressed = dah;
        let new_combo = PaddleCombo::from_paddles(dit, dah);

        match self.config.squeeze_mode {
            // Snapshot: hold the combo as it was immediately before each
            // transition, so the bonus decision sees the pre-release state.
            SqueezeMode::Snapshot => {
                if prev_combo != new_combo {
                    self.last_valid_combo = prev_combo;
                }
            }
            SqueezeMode::Live => {
                self.last_valid_combo = new_combo;
            }
        }
    }

    /// Advance the state machine by `dt_ms` milliseconds.
    ///
    /// Negative or non-finite `dt_ms` is clamped to zero; a zero-length tick
    /// still evaluates pending state decisions (e.g. leaving IDLE on a
    /// freshly pressed paddle).
    pub fn tick(&mut self, dt_ms: f32) {
        let dt_ms = if dt_ms.is_finite() && dt_ms > 0.0 { dt_ms } else { 0.0 };

        match self.state {
            KeyerState::Idle => self.tick_idle(),
            KeyerState::SendDit | KeyerState::SendDah => self.tick_element(dt_ms),
            KeyerState::InterElementGap => self.tick_gap(dt_ms),
        }
    }

    fn tick_idle(&mut self) {
        // The queue is empty here by construction: it is drained at gap end
        // and defensively cleared on every IDLE entry.
        let next = match PaddleCombo::from_paddles(self.dit_pressed, self.dah_pressed) {
            PaddleCombo::DitOnly => Some(Element::Dit),
            PaddleCombo::DahOnly => Some(Element::Dah),
            // A squeeze initiated from rest always begins with a dit
            PaddleCombo::Both => Some(Element::Dit),
            PaddleCombo::None => None,
        };
        if let Some(element) = next {
            self.start_element(element);
        }
    }

    fn tick_element(&mut self, dt_ms: f32) {
        self.element_elapsed_ms += dt_ms;
        if self.element_elapsed_ms < self.element_total_ms {
            self.latch_memory();
        } else {
            self.complete_element();
        }
    }

    /// Memory latch evaluation, run once per tick while an element is in
    /// flight and unfinished.
    fn latch_memory(&mut self) {
        self.element_progress_pct = if self.element_total_ms > 0.0 {
            100.0 * self.element_elapsed_ms / self.element_total_ms
        } else {
            0.0
        };

        let combo = PaddleCombo::from_paddles(self.dit_pressed, self.dah_pressed);
        // Squeeze detection is window-independent; it feeds the Mode B
        // bonus decision, not the latches.
        if combo == PaddleCombo::Both {
            self.squeeze_seen_this_element = true;
        }

        if self.config.memory_mode == MemoryMode::None {
            return;
        }

        // Dead zones at both ends of the element mask paddle chatter around
        // the transitions; latching happens only inside the window.
        let progress = self.element_progress_pct;
        let left_ok = progress >= self.config.mem_block_start_pct;
        let right_ok = progress <= 100.0 - self.config.mem_block_end_pct;
        if !(left_ok && right_ok) {
            return;
        }

        match self.state {
            KeyerState::SendDit => {
                if matches!(combo, PaddleCombo::DahOnly | PaddleCombo::Both)
                    && self.config.memory_mode.allows_dah()
                {
                    self.dah_requested = true;
                }
            }
            KeyerState::SendDah => {
                if matches!(combo, PaddleCombo::DitOnly | PaddleCombo::Both)
                    && self.config.memory_mode.allows_dit()
                {
                    self.dot_requested = true;
                }
            }
            _ => {}
        }
    }

    /// Element completion: resolve the Mode B bonus, consume the latches in
    /// fixed order, and enter the inter-element gap.
    fn complete_element(&mut self) {
        let sent = match self.state {
            KeyerState::SendDit => Element::Dit,
            _ => Element::Dah,
        };
        self.element_progress_pct = 100.0;

        // Bonus decision happens before the latches are consumed; the two
        // are independent and may both enqueue the same opposite element.
        let bonus = match self.config.iambic_mode {
            IambicMode::A => None,
            IambicMode::B => {
                let reference = match self.config.squeeze_mode {
                    SqueezeMode::Live => {
                        PaddleCombo::from_paddles(self.dit_pressed, self.dah_pressed)
                    }
                    SqueezeMode::Snapshot => self.last_valid_combo,
                };
                if self.squeeze_seen_this_element && reference != PaddleCombo::Both {
                    Some(sent.opposite())
                } else {
                    None
                }
            }
        };

        // Fixed, observable enqueue order: dit latch, dah latch, bonus last.
        if self.dot_requested {
            self.enqueue(Element::Dit);
            self.dot_requested = false;
        }
        if self.dah_requested {
            self.enqueue(Element::Dah);
            self.dah_requested = false;
        }
        if let Some(element) = bonus {
            self.enqueue(element);
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("element finished: {}", sent);

        self.state = KeyerState::InterElementGap;
        self.gap_total_ms = self.config.gap_duration_ms();
        self.gap_elapsed_ms = 0.0;
    }

    fn tick_gap(&mut self, dt_ms: f32) {
        self.gap_elapsed_ms += dt_ms;
        if self.gap_elapsed_ms < self.gap_total_ms {
            return;
        }

        // Queued elements (latched requests, Mode B bonus) take priority
        // over the live paddle state.
        if let Some(element) = self.queue.pop_front() {
            self.start_element(element);
            return;
        }

        let next = match PaddleCombo::from_paddles(self.dit_pressed, self.dah_pressed) {
            PaddleCombo::DitOnly => Some(Element::Dit),
            PaddleCombo::DahOnly => Some(Element::Dah),
            // Held squeeze alternates against the element just completed
            PaddleCombo::Both => Some(self.current_element.map_or(Element::Dit, |e| e.opposite())),
            PaddleCombo::None => None,
        };

        match next {
            Some(element) => self.start_element(element),
            None => self.enter_idle(),
        }
    }

    fn start_element(&mut self, element: Element) {
        self.state = match element {
            Element::Dit => KeyerState::SendDit,
            Element::Dah => KeyerState::SendDah,
        };
        self.current_element = Some(element);
        self.element_total_ms = self.config.element_duration_ms(element);
        self.element_elapsed_ms = 0.0;
        self.element_progress_pct = 0.0;
        self.squeeze_seen_this_element = false;
        // dot_requested / dah_requested deliberately survive an element
        // start; they are consumed only at completion.

        #[cfg(feature = "defmt")]
        defmt::trace!("element start: {}", element);
    }

    /// Terminal transition: clear every transient field, including a
    /// defensive queue clear even though the queue is already empty on this
    /// path by construction.
    fn enter_idle(&mut self) {
        self.state = KeyerState::Idle;
        self.current_element = None;
        self.element_elapsed_ms = 0.0;
        self.element_total_ms = 0.0;
        self.gap_elapsed_ms = 0.0;
        self.gap_total_ms = 0.0;
        self.element_progress_pct = 0.0;
        self.squeeze_seen_this_element = false;
        self.queue.clear();

        #[cfg(feature = "defmt")]
        defmt::trace!("keyer idle");
    }

    fn enqueue(&mut self, element: Element) {
        if self.queue.push_back(element).is_err() {
            self.overflow_count = self.overflow_count.wrapping_add(1);
            #[cfg(feature = "defmt")]
            defmt::warn!("element queue full, dropping {}", element);
        }
    }

    /// Reset to the freshly-constructed state, dropping paddle state,
    /// latches, and squeeze history along with the transients.
    pub fn reset(&mut self) {
        self.enter_idle();
        self.dot_requested = false;
        self.dah_requested = false;
        self.dit_pressed = false;
        self.dah_pressed = false;
        self.last_valid_combo = PaddleCombo::None;
        self.overflow_count = 0;
    }

    /// Current state of the state machine.
    pub fn state(&self) -> KeyerState {
        self.state
    }

    /// Element currently in flight (or, during the gap, just completed).
    pub fn current_element(&self) -> Option<Element> {
        self.current_element
    }

    /// True while the key line should be asserted.
    pub fn is_key_down(&self) -> bool {
        self.state.is_sending()
    }

    /// Progress of the element in flight, 0-100.
    pub fn element_progress_pct(&self) -> f32 {
        self.element_progress_pct
    }

    /// Number of elements pending in the FIFO.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Number of elements dropped because the FIFO was full. Non-zero
    /// indicates a configuration or timing anomaly, never normal operation.
    pub fn overflow_count(&self) -> u32 {
        self.overflow_count
    }

    /// Raw paddle state as last reported through [`Self::update_paddles`].
    pub fn paddles(&self) -> (bool, bool) {
        (self.dit_pressed, self.dah_pressed)
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl KeyerRuntime {
    /// Pending memory latches `(dot_requested, dah_requested)`.
    pub fn memory_latches(&self) -> (bool, bool) {
        (self.dot_requested, self.dah_requested)
    }

    /// Squeeze-history combo as tracked for the bonus decision.
    pub fn last_valid_combo(&self) -> PaddleCombo {
        self.last_valid_combo
    }

    /// True if a squeeze has been observed during the element in flight.
    pub fn squeeze_seen_this_element(&self) -> bool {
        self.squeeze_seen_this_element
    }

    /// Elapsed milliseconds of the element in flight.
    pub fn element_elapsed_ms(&self) -> f32 {
        self.element_elapsed_ms
    }

    /// Elapsed milliseconds of the gap in flight.
    pub fn gap_elapsed_ms(&self) -> f32 {
        self.gap_elapsed_ms
    }
}

/// Periodic driver task: drains the paddle bridge, ticks the runtime, and
/// mirrors the key state onto the given output.
///
/// Hosts ticking from a hardware timer interrupt do not need this; it exists
/// for async executors where a timer task is the natural clock source.
#[cfg(feature = "embassy-time")]
pub async fn keyer_task<K: crate::hal::KeyOutput>(
    paddle: &crate::paddle::PaddleInput,
    config: KeyerConfig,
    key: K,
    period: embassy_time::Duration,
) {
    use embassy_time::Timer;

    let mut runtime = KeyerRuntime::new(config);
    let mut line = crate::hal::KeyLine::new(key);
    let dt_ms = period.as_micros() as f32 / 1000.0;

    loop {
        runtime.update_paddles(paddle.dit(), paddle.dah());
        runtime.tick(dt_ms);
        line.drive(runtime.is_key_down()).ok();
        Timer::after(period).await;
    }
}
