//! Latch dead-zone windows and memory-mode gating.

use iambic_core::test_utils::{Harness, PaddleScript};
use iambic_core::{IambicMode, KeyerConfig, MemoryMode, SqueezeMode};
use rstest::rstest;

use crate::common::config;

/// 20 WPM, 15% dead zones at both ends: the latch window spans 15%-85% of
/// the 60 ms dit, i.e. 9-51 ms.
fn windowed_config() -> KeyerConfig {
    KeyerConfig::new(
        20,
        IambicMode::A,
        MemoryMode::DotAndDah,
        SqueezeMode::Live,
        15.0,
        15.0,
    )
    .unwrap()
}

/// A dah press inside the window latches and is sent after the dit; a press
/// confined to either dead zone is ignored.
#[rstest]
#[case(6.0, ".")] // ~10% progress: before the window opens
#[case(30.0, ".-")] // 50%: inside the window
#[case(54.0, ".")] // ~90%: after the window closes
fn window_gates_the_latch(#[case] press_ms: f32, #[case] expected: &str) {
    let mut harness = Harness::new(windowed_config());
    harness.load_script(
        PaddleScript::new()
            .at(0.0, true, false)
            .at(press_ms, true, true)
            .at(press_ms + 2.0, true, false)
            .at(58.0, false, false),
    );
    assert!(harness.run_until_idle(2000.0));
    assert_eq!(harness.pattern(), expected);
}

#[test]
fn latch_state_is_visible_mid_element() {
    let mut harness = Harness::new(windowed_config());
    harness.load_script(
        PaddleScript::new()
            .at(0.0, true, false)
            .at(30.0, true, true)
            .at(32.0, true, false),
    );
    harness.run_for(40.0);
    assert_eq!(harness.runtime().memory_latches(), (false, true));
}

#[test]
fn dead_zone_press_sets_no_latch() {
    let mut harness = Harness::new(windowed_config());
    harness.load_script(
        PaddleScript::new()
            .at(0.0, true, false)
            .at(6.0, true, true)
            .at(8.0, true, false),
    );
    harness.run_for(20.0);
    assert_eq!(harness.runtime().memory_latches(), (false, false));
}

/// While a dit is keyed only the opposite (dah) request can latch, and only
/// when the memory mode permits it.
#[rstest]
#[case(MemoryMode::None, ".")]
#[case(MemoryMode::DotOnly, ".")]
#[case(MemoryMode::DahOnly, ".-")]
#[case(MemoryMode::DotAndDah, ".-")]
fn memory_mode_gates_dah_latch(#[case] memory: MemoryMode, #[case] expected: &str) {
    let mut harness = Harness::new(config(IambicMode::A, memory, SqueezeMode::Live));
    harness.load_script(
        PaddleScript::new()
            .at(0.0, true, false)
            .at(20.0, true, true)
            .at(40.0, false, false),
    );
    assert!(harness.run_until_idle(2000.0));
    assert_eq!(harness.pattern(), expected);
}

/// Symmetric gating for the dit latch while a dah is keyed.
#[rstest]
#[case(MemoryMode::None, "-")]
#[case(MemoryMode::DotOnly, "-.")]
#[case(MemoryMode::DahOnly, "-")]
#[case(MemoryMode::DotAndDah, "-.")]
fn memory_mode_gates_dit_latch(#[case] memory: MemoryMode, #[case] expected: &str) {
    let mut harness = Harness::new(config(IambicMode::A, memory, SqueezeMode::Live));
    harness.load_script(
        PaddleScript::new()
            .at(0.0, false, true)
            .at(60.0, true, true)
            .at(120.0, false, false),
    );
    assert!(harness.run_until_idle(2000.0));
    assert_eq!(harness.pattern(), expected);
}

/// Squeeze detection for the bonus decision is independent of the latch
/// window: a squeeze entirely inside a dead zone still marks the element.
#[test]
fn squeeze_detection_ignores_the_window() {
    let mut harness = Harness::new(KeyerConfig::new(
        20,
        IambicMode::B,
        MemoryMode::DotAndDah,
        SqueezeMode::Live,
        15.0,
        15.0,
    )
    .unwrap());
    harness.load_script(
        PaddleScript::new()
            .at(0.0, true, false)
            .at(6.0, true, true)
            .at(8.0, true, false),
    );
    harness.run_for(20.0);
    assert!(harness.runtime().squeeze_seen_this_element());
    assert_eq!(harness.runtime().memory_latches(), (false, false));
}
