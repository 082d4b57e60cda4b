//! Console lines through `StatusService` down to the pin.

use crate::mock_hw::{MockLight, VecSink, advance, shared_light};

use optipulse::app::commands::AppCommand;
use optipulse::app::events::AppEvent;
use optipulse::app::service::StatusService;
use optipulse::error::{Error, TimerError};
use optipulse::fsm::{ModeEvent, OperatingMode};

fn make_app() -> (StatusService, MockLight, VecSink) {
    let light = shared_light();
    let mut svc = StatusService::new();
    let mut sink = VecSink::default();
    svc.start(&mut &light, &mut sink).unwrap();
    (svc, light, sink)
}

fn run(svc: &mut StatusService, light: &MockLight, sink: &mut VecSink, line: &str) -> Result<(), Error> {
    let cmd = AppCommand::parse(line).unwrap();
    svc.handle_command(cmd, &mut &*light, sink)
}

#[test]
fn start_announces_dev_and_lights_steady() {
    let (svc, light, sink) = make_app();
    assert_eq!(svc.mode(), OperatingMode::Dev);
    assert_eq!(sink.events, vec![AppEvent::Started(OperatingMode::Dev)]);
    assert!(light.with(|s| s.pin().level));
}

#[test]
fn console_session_walks_the_modes() {
    let (mut svc, light, mut sink) = make_app();

    run(&mut svc, &light, &mut sink, "set_state operational").unwrap();
    run(&mut svc, &light, &mut sink, "rtv_on").unwrap();
    run(&mut svc, &light, &mut sink, "rtv_off").unwrap();
    run(&mut svc, &light, &mut sink, "transfer_complete").unwrap();
    run(&mut svc, &light, &mut sink, "get_state").unwrap();

    assert_eq!(
        sink.events[1..],
        [
            AppEvent::ModeChanged { from: OperatingMode::Dev, to: OperatingMode::Operational },
            AppEvent::ModeChanged { from: OperatingMode::Operational, to: OperatingMode::Rtv },
            AppEvent::ModeChanged { from: OperatingMode::Rtv, to: OperatingMode::Operational },
            AppEvent::ModeChanged { from: OperatingMode::Operational, to: OperatingMode::Untethered },
            AppEvent::ModeReport(OperatingMode::Untethered),
        ]
    );
}

#[test]
fn unhandled_console_event_is_reported_as_ignored() {
    let (mut svc, light, mut sink) = make_app();
    run(&mut svc, &light, &mut sink, "transfer_failed").unwrap();
    assert_eq!(
        sink.last(),
        Some(&AppEvent::EventIgnored {
            mode: OperatingMode::Dev,
            event: ModeEvent::TransferFailed
        })
    );
}

#[test]
fn unlock_needs_the_right_key() {
    let (mut svc, light, mut sink) = make_app();
    run(&mut svc, &light, &mut sink, "unlock swordfish").unwrap();
    assert_eq!(sink.last(), Some(&AppEvent::KeyRejected));

    run(&mut svc, &light, &mut sink, "unlock open-sesame").unwrap();
    assert_eq!(
        sink.last(),
        Some(&AppEvent::EventIgnored {
            mode: OperatingMode::Dev,
            event: ModeEvent::MagicKeyEntered
        })
    );
}

#[test]
fn custom_blink_from_console() {
    let (mut svc, light, mut sink) = make_app();
    run(&mut svc, &light, &mut sink, "blink 2 25").unwrap();
    let edges = advance(&light, 500_000);
    assert_eq!(edges.len(), 2);
    assert_eq!(edges[0].at_us, 125_000);
    assert_eq!(edges[1].at_us, 500_000);
    assert_eq!(svc.mode(), OperatingMode::Dev);
}

#[test]
fn invalid_blink_reports_fault_and_keeps_pattern() {
    let (mut svc, light, mut sink) = make_app();
    let err = run(&mut svc, &light, &mut sink, "blink 0 50");
    assert!(matches!(err, Err(Error::Config(_))));
    assert!(matches!(sink.last(), Some(AppEvent::LightFault(Error::Config(_)))));
    assert!(light.with(|s| s.pin().level));
}

#[test]
fn led_override_and_status_dump() {
    let (mut svc, light, mut sink) = make_app();
    run(&mut svc, &light, &mut sink, "led off").unwrap();
    assert!(!light.with(|s| s.pin().level));
    run(&mut svc, &light, &mut sink, "led_status").unwrap();
    assert_eq!(sink.events.len(), 1);

    run(&mut svc, &light, &mut sink, "set_state operational").unwrap();
    run(&mut svc, &light, &mut sink, "led_status").unwrap();
    assert_eq!(sink.last(), Some(&AppEvent::DebugDenied(OperatingMode::Operational)));
}

#[test]
fn light_failure_still_reports_the_mode_change() {
    let (mut svc, light, mut sink) = make_app();
    light.with(|s| s.timer_mut().fail_start = true);

    let err = run(&mut svc, &light, &mut sink, "set_state operational");
    assert_eq!(err, Err(Error::Timer(TimerError::StartFailed(-1))));
    assert_eq!(svc.mode(), OperatingMode::Operational);
    assert_eq!(
        sink.events[1..],
        [
            AppEvent::ModeChanged { from: OperatingMode::Dev, to: OperatingMode::Operational },
            AppEvent::LightFault(Error::Timer(TimerError::StartFailed(-1))),
        ]
    );
}
