//! Key-line adapter behavior against mocked hardware pins.

use embedded_hal_mock::eh1::pin::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};
use iambic_core::hal::{EmbeddedHalKey, KeyLine, MockKey};
use iambic_core::test_utils::{Harness, PaddleScript};
use iambic_core::KeyerConfig;

#[test]
fn key_line_touches_the_pin_only_on_edges() {
    let expectations = [
        PinTransaction::set(PinState::High),
        PinTransaction::set(PinState::Low),
    ];
    let pin = PinMock::new(&expectations);
    let mut line = KeyLine::new(EmbeddedHalKey::new(pin, false));

    line.drive(true).unwrap();
    line.drive(true).unwrap();
    line.drive(true).unwrap();
    line.drive(false).unwrap();
    line.drive(false).unwrap();

    line.into_inner().into_inner().done();
}

#[test]
fn inverted_key_drives_active_low() {
    let expectations = [
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
    ];
    let pin = PinMock::new(&expectations);
    let mut line = KeyLine::new(EmbeddedHalKey::new(pin, true));

    line.drive(true).unwrap();
    line.drive(false).unwrap();

    line.into_inner().into_inner().done();
}

/// Full pull-based integration: tick the runtime, mirror `is_key_down` onto
/// a key line, and check the line sees exactly one down/up pair per element.
#[test]
fn runtime_drives_one_edge_pair_per_element() {
    let mut harness = Harness::new(KeyerConfig::default());
    harness.load_script(
        PaddleScript::new()
            .at(0.0, false, true)
            .at(100.0, false, false),
    );

    let mut line = KeyLine::new(MockKey::new());
    // 180 ms dah + 60 ms gap, with margin
    for _ in 0..400 {
        harness.run_for(1.0);
        line.drive(harness.runtime().is_key_down()).unwrap();
    }

    assert_eq!(harness.pattern(), "-");
    assert_eq!(line.into_inner().edges(), &[true, false]);
}
