//! Mode state machine driving a real pattern scheduler over mock hardware.

use crate::mock_hw::{advance, shared_light};

use optipulse::app::ports::OneShotTimer;
use optipulse::drivers::led_patterns::Pattern;
use optipulse::fsm::{ModeEvent, ModeMachine, OperatingMode};

#[test]
fn request_operational_starts_the_burst() {
    let light = shared_light();
    let mut m = ModeMachine::new();
    m.start(&mut &light).unwrap();
    assert!(light.with(|s| s.pin().level), "Dev is steady ON");

    m.handle_event(ModeEvent::RequestOperational, &mut &light).unwrap();
    assert_eq!(m.current(), OperatingMode::Operational);
    assert_eq!(light.with(|s| s.current_pattern()), Some(Pattern::OperationalBurst));
    assert!(!light.with(|s| s.pin().level), "bursts start dark");
    assert_eq!(advance(&light, 100_000).len(), 10);
}

#[test]
fn rtv_timeout_restores_operational_burst_from_scratch() {
    let light = shared_light();
    let mut m = ModeMachine::new();
    m.start(&mut &light).unwrap();
    m.handle_event(ModeEvent::RequestOperational, &mut &light).unwrap();
    m.handle_event(ModeEvent::RtvOn, &mut &light).unwrap();
    advance(&light, 175_000);

    m.handle_event(ModeEvent::Timeout, &mut &light).unwrap();
    assert_eq!(m.current(), OperatingMode::Operational);
    let run = light.with(|s| s.state().run).unwrap();
    assert_eq!(run.cycles_completed, 0);
    assert_eq!(run.cycle_limit, 5);
}

#[test]
fn ignored_event_leaves_the_timeline_alone() {
    let light = shared_light();
    let mut m = ModeMachine::new();
    m.transition_to_state(OperatingMode::Tethered, &mut &light).unwrap();
    advance(&light, 1_200_000);
    let before = light.with(|s| *s.state());

    assert_eq!(m.handle_event(ModeEvent::RtvOn, &mut &light).unwrap(), None);
    assert_eq!(light.with(|s| *s.state()), before);
    assert!(light.with(|s| s.timer().is_pending()));
}

#[test]
fn halted_goes_dark_and_recovers_with_magic_key() {
    let light = shared_light();
    let mut m = ModeMachine::new();
    m.transition_to_state(OperatingMode::Halted, &mut &light).unwrap();
    advance(&light, 10_000_000);
    assert!(!light.with(|s| s.pin().level));
    assert!(!light.with(|s| s.timer().is_pending()));

    for event in [ModeEvent::RequestOperational, ModeEvent::Error, ModeEvent::Timeout] {
        assert_eq!(m.handle_event(event, &mut &light).unwrap(), None);
    }
    assert_eq!(m.current(), OperatingMode::Halted);

    m.handle_event(ModeEvent::MagicKeyEntered, &mut &light).unwrap();
    assert_eq!(m.current(), OperatingMode::Dev);
    assert!(light.with(|s| s.pin().level));
}

#[test]
fn unknown_mode_code_forces_pin_off() {
    let light = shared_light();
    let mut m = ModeMachine::new();
    m.start(&mut &light).unwrap();
    m.transition_to_code(42, &mut &light).unwrap();
    assert_eq!(m.current(), OperatingMode::Dev);
    assert!(!light.with(|s| s.pin().level));
    assert!(!light.with(|s| s.timer().is_pending()));
}

#[test]
fn transition_by_code_applies_mapped_pattern() {
    let light = shared_light();
    let mut m = ModeMachine::new();
    m.transition_to_code(OperatingMode::Untethered as u8, &mut &light).unwrap();
    assert_eq!(m.current(), OperatingMode::Untethered);
    assert_eq!(light.with(|s| s.current_pattern()), Some(Pattern::UntetheredBurst));
}
