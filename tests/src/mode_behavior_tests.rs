//! Mode A vs Mode B element sequences for the canonical paddle gestures.

use iambic_core::test_utils::{Harness, PaddleScript};
use iambic_core::{Element, IambicMode, MemoryMode, SqueezeMode};
use rstest::rstest;

use crate::common::{assert_close, config};

/// A squeeze seen mid-element and released before completion never produces
/// a bonus in Mode A, under either squeeze policy.
#[rstest]
#[case(SqueezeMode::Live)]
#[case(SqueezeMode::Snapshot)]
fn mode_a_never_appends_bonus(#[case] squeeze: SqueezeMode) {
    let mut harness = Harness::new(config(IambicMode::A, MemoryMode::None, squeeze));
    harness.load_script(
        PaddleScript::new()
            .at(0.0, true, false)
            .at(20.0, true, true)
            .at(45.0, false, false),
    );
    assert!(harness.run_until_idle(2000.0));
    assert_eq!(harness.pattern(), ".");
}

/// Mode B with live squeeze evaluation: squeeze during the dit, full release
/// before completion, exactly one opposite bonus element follows.
#[test]
fn mode_b_live_release_appends_exactly_one_bonus() {
    let mut harness = Harness::new(config(
        IambicMode::B,
        MemoryMode::None,
        SqueezeMode::Live,
    ));
    harness.load_script(
        PaddleScript::new()
            .at(0.0, true, false)
            .at(20.0, true, true)
            .at(45.0, false, false),
    );
    assert!(harness.run_until_idle(2000.0));
    assert_eq!(harness.pattern(), ".-");
    assert_close(harness.elements()[1].duration_ms, 180.0);
}

/// When a memory latch and a Mode B bonus qualify at the same completion,
/// both are enqueued, memory first. The two opposite elements are both sent.
#[test]
fn memory_element_precedes_bonus_element() {
    let mut harness = Harness::new(config(
        IambicMode::B,
        MemoryMode::DotAndDah,
        SqueezeMode::Live,
    ));
    harness.load_script(
        PaddleScript::new()
            .at(0.0, true, false)
            .at(20.0, true, true)
            // dah released: latch already armed, live reference is DIT_ONLY
            .at(45.0, true, false)
            .at(100.0, false, false),
    );
    assert!(harness.run_until_idle(3000.0));
    assert_eq!(harness.pattern(), ".--");
    assert_close(harness.elements()[1].duration_ms, 180.0);
    assert_close(harness.elements()[2].duration_ms, 180.0);
}

/// Holding both paddles from rest alternates DIT, DAH, DIT, DAH with exact
/// element durations and one-dit gaps, whether the alternation is driven by
/// memory latches or by the live combo at gap end.
#[rstest]
#[case(IambicMode::A, MemoryMode::DotAndDah, SqueezeMode::Live)]
#[case(IambicMode::B, MemoryMode::DotAndDah, SqueezeMode::Live)]
#[case(IambicMode::A, MemoryMode::None, SqueezeMode::Snapshot)]
fn continuous_squeeze_alternates(
    #[case] iambic: IambicMode,
    #[case] memory: MemoryMode,
    #[case] squeeze: SqueezeMode,
) {
    let mut harness = Harness::new(config(iambic, memory, squeeze));
    harness.press(true, true);
    // three full dit+gap+dah+gap cycles
    harness.run_for(1085.0);

    assert_eq!(harness.pattern(), ".-.-.-");
    for (i, element) in harness.elements().iter().enumerate() {
        let expected = match element.element {
            Element::Dit => 60.0,
            Element::Dah => 180.0,
        };
        assert_close(element.duration_ms, expected);
        if i > 0 {
            assert_close(harness.gap_between(i - 1, i), 60.0);
        }
    }
}

/// A lone paddle held down repeats its element with one-dit spacing.
#[rstest]
#[case(true, false, ".....", 60.0)]
#[case(false, true, "---", 180.0)]
fn held_single_paddle_repeats(
    #[case] dit: bool,
    #[case] dah: bool,
    #[case] expected: &str,
    #[case] duration: f32,
) {
    let mut harness = Harness::new(config(
        IambicMode::B,
        MemoryMode::DotAndDah,
        SqueezeMode::Live,
    ));
    harness.press(dit, dah);
    // five dit periods or three dah periods fit in the same span
    harness.run_for(entire_span(expected, duration));

    assert_eq!(harness.pattern(), expected);
    for element in harness.elements() {
        assert_close(element.duration_ms, duration);
    }
}

fn entire_span(pattern: &str, duration: f32) -> f32 {
    pattern.len() as f32 * (duration + 60.0) + 5.0
}
