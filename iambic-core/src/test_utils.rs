//! Deterministic test harness for driving the keyer from paddle scripts.
//!
//! Everything here runs on synthetic time: the harness ticks the runtime at
//! a fixed cadence, applies scripted paddle transitions between ticks, and
//! captures key-line edges into a list of timed elements that tests can
//! assert against.

use std::vec::Vec;

use crate::fsm::KeyerRuntime;
use crate::types::{Element, KeyerConfig, KeyerState};

/// A scripted paddle transition at an absolute time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScriptEvent {
    pub at_ms: f32,
    pub dit: bool,
    pub dah: bool,
}

/// Ordered list of paddle transitions.
#[derive(Clone, Debug, Default)]
pub struct PaddleScript {
    events: Vec<ScriptEvent>,
}

impl PaddleScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transition; events must be added in time order.
    pub fn at(mut self, at_ms: f32, dit: bool, dah: bool) -> Self {
        debug_assert!(
            self.events.last().map_or(true, |last| last.at_ms <= at_ms),
            "script events must be in time order"
        );
        self.events.push(ScriptEvent { at_ms, dit, dah });
        self
    }

    pub fn events(&self) -> &[ScriptEvent] {
        &self.events
    }
}

/// One captured keyed element with its observed timing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KeyedElement {
    pub element: Element,
    pub start_ms: f32,
    pub duration_ms: f32,
}

/// Tick-driven harness around a [`KeyerRuntime`].
pub struct Harness {
    runtime: KeyerRuntime,
    tick_ms: f32,
    now_ms: f32,
    pending: Vec<ScriptEvent>,
    next_event: usize,
    captured: Vec<KeyedElement>,
    open: Option<(Element, f32)>,
}

impl Harness {
    /// Harness with a 1 ms tick, the cadence of a typical timer interrupt.
    pub fn new(config: KeyerConfig) -> Self {
        Self::with_tick(config, 1.0)
    }

    pub fn with_tick(config: KeyerConfig, tick_ms: f32) -> Self {
        assert!(tick_ms > 0.0);
        Self {
            runtime: KeyerRuntime::new(config),
            tick_ms,
            now_ms: 0.0,
            pending: Vec::new(),
            next_event: 0,
            captured: Vec::new(),
            open: None,
        }
    }

    /// Apply a paddle transition immediately.
    pub fn press(&mut self, dit: bool, dah: bool) {
        self.runtime.update_paddles(dit, dah);
    }

    /// Queue a script; its events fire as simulated time passes them.
    pub fn load_script(&mut self, script: PaddleScript) {
        self.pending = script.events().to_vec();
        self.next_event = 0;
    }

    /// Advance simulated time by `ms`, capturing key edges.
    pub fn run_for(&mut self, ms: f32) {
        let ticks = (ms / self.tick_ms).round() as u64;
        for _ in 0..ticks {
            self.step();
        }
    }

    /// Run until the runtime settles in IDLE, up to `max_ms`. Returns true
    /// if IDLE was reached.
    pub fn run_until_idle(&mut self, max_ms: f32) -> bool {
        let ticks = (max_ms / self.tick_ms).round() as u64;
        for _ in 0..ticks {
            self.step();
            if self.runtime.state() == KeyerState::Idle && self.next_event >= self.pending.len() {
                return true;
            }
        }
        self.runtime.state() == KeyerState::Idle
    }

    fn step(&mut self) {
        while let Some(event) = self.pending.get(self.next_event) {
            if event.at_ms > self.now_ms {
                break;
            }
            self.runtime.update_paddles(event.dit, event.dah);
            self.next_event += 1;
        }

        self.runtime.tick(self.tick_ms);
        self.now_ms += self.tick_ms;

        let tick_start = self.now_ms - self.tick_ms;
        match (self.open, self.runtime.is_key_down()) {
            (None, true) => {
                let element = self.runtime.current_element().expect("key down with element");
                self.open = Some((element, tick_start));
            }
            (Some((element, start_ms)), false) => {
                self.captured.push(KeyedElement {
                    element,
                    start_ms,
                    duration_ms: tick_start - start_ms,
                });
                self.open = None;
            }
            _ => {}
        }
    }

    /// Elements captured so far (completed key-down periods only).
    pub fn elements(&self) -> &[KeyedElement] {
        &self.captured
    }

    /// Captured elements as a dot/dash string, e.g. `".-."`.
    pub fn pattern(&self) -> String {
        self.captured
            .iter()
            .map(|e| match e.element {
                Element::Dit => '.',
                Element::Dah => '-',
            })
            .collect()
    }

    /// Silence between two consecutive captured elements.
    pub fn gap_between(&self, first: usize, second: usize) -> f32 {
        let a = &self.captured[first];
        let b = &self.captured[second];
        b.start_ms - (a.start_ms + a.duration_ms)
    }

    pub fn now_ms(&self) -> f32 {
        self.now_ms
    }

    pub fn runtime(&self) -> &KeyerRuntime {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut KeyerRuntime {
        &mut self.runtime
    }
}
