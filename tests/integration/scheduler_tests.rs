//! Pattern scheduler timelines replayed in virtual time, plus failure
//! propagation from the pin and timer adapters.

use crate::mock_hw::{Edge, advance, scheduler, shared_light};

use optipulse::app::ports::{LightPort, OneShotTimer};
use optipulse::drivers::led_patterns::Pattern;
use optipulse::error::{Error, PinError, TimerError};

fn on(at_us: u64) -> Edge {
    Edge { at_us, on: true }
}

fn off(at_us: u64) -> Edge {
    Edge { at_us, on: false }
}

#[test]
fn operational_burst_timeline() {
    let light = shared_light();
    (&light).apply_pattern(Pattern::OperationalBurst).unwrap();

    let edges = advance(&light, 150_000);
    let expected: Vec<Edge> = (0..5u64)
        .flat_map(|i| [on(10_000 + i * 20_000), off(20_000 + i * 20_000)])
        .chain([on(150_000)])
        .collect();
    assert_eq!(edges, expected);
}

#[test]
fn operational_burst_resumes_lit_after_each_pause() {
    let light = shared_light();
    (&light).apply_pattern(Pattern::OperationalBurst).unwrap();

    // The first burst starts with a 10 ms dark lead; later bursts start
    // lit the moment the 50 ms pause ends, so they repeat every 140 ms.
    let edges = advance(&light, 450_000);
    let rising: Vec<u64> = edges.iter().filter(|e| e.on).map(|e| e.at_us).collect();
    assert_eq!(rising.len(), 17);
    assert_eq!(rising[5], 150_000);
    assert_eq!(rising[10], 290_000);
    assert_eq!(rising[15], 430_000);
    assert!(light.with(|s| s.timer().is_pending()));
}

#[test]
fn transfer_complete_is_a_slow_square_wave() {
    let light = shared_light();
    (&light).apply_pattern(Pattern::TransferComplete).unwrap();

    let edges = advance(&light, 3_000_000);
    assert_eq!(
        edges,
        vec![on(500_000), off(1_000_000), on(1_500_000), off(2_000_000), on(2_500_000), off(3_000_000)]
    );
}

#[test]
fn halted_entry_flashes_ten_times_then_stays_dark() {
    let light = shared_light();
    (&light).apply_pattern(Pattern::HaltedEntry).unwrap();

    let edges = advance(&light, 60_000_000);
    let rising = edges.iter().filter(|e| e.on).count();
    assert_eq!(rising, 10);
    assert_eq!(edges.last(), Some(&off(2_000_000)));
    assert!(!light.with(|s| s.timer().is_pending()));
    assert!(!light.with(|s| s.pin().level));
}

#[test]
fn untethered_burst_repeats_after_pause() {
    let light = shared_light();
    (&light).apply_pattern(Pattern::UntetheredBurst).unwrap();

    let edges = advance(&light, 11_000_000);
    let rising: Vec<u64> = edges.iter().filter(|e| e.on).map(|e| e.at_us).collect();
    assert_eq!(rising[0], 250_000);
    assert_eq!(rising[9], 4_750_000);
    // 10th OFF edge at 5.0 s, then a 500 ms pause.
    assert_eq!(rising[10], 5_500_000);
    assert_eq!(rising[20], 10_750_000);
    assert_eq!(light.with(|s| s.state().run.unwrap().cycle_limit), 10);
}

#[test]
fn custom_blink_starts_lit_without_waiting() {
    let light = shared_light();
    (&light).set_custom_blink(5.0, 50.0).unwrap();
    assert!(light.with(|s| s.pin().level));

    let edges = advance(&light, 400_000);
    assert_eq!(edges, vec![off(100_000), on(200_000), off(300_000), on(400_000)]);
}

#[test]
fn pattern_change_mid_burst_restarts_from_zero() {
    let light = shared_light();
    (&light).apply_pattern(Pattern::RtvBurst).unwrap();
    advance(&light, 175_000);
    assert!(light.with(|s| s.state().run.unwrap().cycles_completed) > 0);

    (&light).apply_pattern(Pattern::RtvBurst).unwrap();
    let edges = advance(&light, 550_000);
    let rising: Vec<u64> = edges.iter().filter(|e| e.on).map(|e| e.at_us).collect();
    assert_eq!(rising, vec![50_000, 150_000, 250_000, 350_000, 450_000]);
}

#[test]
fn static_override_stops_the_timeline() {
    let light = shared_light();
    (&light).apply_pattern(Pattern::Tethered).unwrap();
    (&light).set_static(true).unwrap();
    assert!(advance(&light, 10_000_000).is_empty());
    assert!(light.with(|s| s.pin().level));
}

#[test]
fn pin_write_failure_is_reported() {
    let mut s = scheduler();
    s.apply_pattern(Pattern::Tethered).unwrap();
    s.pin_mut().fail_writes = true;
    assert_eq!(
        s.apply_pattern(Pattern::DevStatic),
        Err(Error::Pin(PinError::WriteFailed))
    );
    assert!(!s.timer().is_pending());
}

#[test]
fn timer_start_failure_is_reported_and_retry_succeeds() {
    let mut s = scheduler();
    s.timer_mut().fail_start = true;
    assert_eq!(
        s.apply_pattern(Pattern::Tethered),
        Err(Error::Timer(TimerError::StartFailed(-1)))
    );
    assert!(!s.is_armed());

    s.timer_mut().fail_start = false;
    s.apply_pattern(Pattern::Tethered).unwrap();
    assert!(s.is_armed());
}

#[test]
fn deinitialize_twice_is_harmless() {
    let mut s = scheduler();
    s.apply_pattern(Pattern::UntetheredBurst).unwrap();
    s.deinitialize().unwrap();
    s.deinitialize().unwrap();
    assert!(!s.timer().allocated);
    assert_eq!(s.pin().writes.last(), Some(&false));

    s.initialize().unwrap();
    s.apply_pattern(Pattern::Tethered).unwrap();
    assert!(s.timer().is_pending());
}
