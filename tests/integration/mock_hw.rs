//! Mock hardware adapters for integration tests.
//!
//! `RecordingPin` keeps every level written to it; `ManualTimer` records
//! every arm and only "fires" when a test calls [`advance`].  Together they
//! let a test replay the light's timeline in virtual time.

use std::cell::Cell;

use embassy_time::Duration;
use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin, StatefulOutputPin};
use optipulse::app::events::AppEvent;
use optipulse::app::ports::{EventSink, OneShotTimer};
use optipulse::config::LightConfig;
use optipulse::drivers::light_scheduler::{PatternScheduler, SharedScheduler};
use optipulse::error::TimerError;

// ── Pin ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockPinError;

impl embedded_hal::digital::Error for MockPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Default)]
pub struct RecordingPin {
    pub level: bool,
    pub writes: Vec<bool>,
    /// When set, every write fails and the level is left unchanged.
    pub fail_writes: bool,
}

impl RecordingPin {
    fn write(&mut self, high: bool) -> Result<(), MockPinError> {
        if self.fail_writes {
            return Err(MockPinError);
        }
        self.level = high;
        self.writes.push(high);
        Ok(())
    }
}

impl ErrorType for RecordingPin {
    type Error = MockPinError;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), MockPinError> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), MockPinError> {
        self.write(true)
    }
}

impl StatefulOutputPin for RecordingPin {
    fn is_set_high(&mut self) -> Result<bool, MockPinError> {
        Ok(self.level)
    }

    fn is_set_low(&mut self) -> Result<bool, MockPinError> {
        Ok(!self.level)
    }
}

// ── Timer ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct ManualTimer {
    pub allocated: bool,
    pub pending: Cell<Option<Duration>>,
    pub arms: Vec<Duration>,
    pub cancels: usize,
    /// When set, `arm_once` fails with `StartFailed(-1)`.
    pub fail_start: bool,
}

impl ManualTimer {
    pub fn expire(&self) -> Option<Duration> {
        self.pending.take()
    }
}

impl OneShotTimer for ManualTimer {
    fn allocate(&mut self) -> Result<(), TimerError> {
        self.allocated = true;
        Ok(())
    }

    fn arm_once(&mut self, after: Duration) -> Result<(), TimerError> {
        if !self.allocated {
            return Err(TimerError::NotAllocated);
        }
        if self.fail_start {
            return Err(TimerError::StartFailed(-1));
        }
        self.pending.set(Some(after));
        self.arms.push(after);
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), TimerError> {
        self.cancels += 1;
        self.pending.set(None);
        Ok(())
    }

    fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }

    fn release(&mut self) -> Result<(), TimerError> {
        self.allocated = false;
        self.pending.set(None);
        Ok(())
    }
}

// ── Builders ──────────────────────────────────────────────────

pub type MockScheduler = PatternScheduler<RecordingPin, ManualTimer>;
pub type MockLight = SharedScheduler<RecordingPin, ManualTimer>;

pub fn scheduler() -> MockScheduler {
    let mut s = PatternScheduler::new(
        RecordingPin::default(),
        ManualTimer::default(),
        LightConfig::default(),
    )
    .unwrap();
    s.initialize().unwrap();
    s
}

pub fn shared_light() -> MockLight {
    SharedScheduler::new(scheduler())
}

/// One edge of the light's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub at_us: u64,
    pub on: bool,
}

/// Deliver firings until `budget_us` of virtual time has passed or the
/// timer goes idle.  Returns the pin edges produced, timestamped from the
/// start of the call.
pub fn advance(light: &MockLight, budget_us: u64) -> Vec<Edge> {
    let mut now = 0u64;
    let mut edges = Vec::new();
    loop {
        let next = light.with(|s| s.timer().pending.get());
        let Some(after) = next else { break };
        if now + after.as_micros() > budget_us {
            break;
        }
        now += after.as_micros();
        let before = light.with(|s| s.pin().writes.len());
        light.with(|s| s.timer().expire());
        light.on_timer_fire().unwrap();
        light.with(|s| {
            for &on in &s.pin().writes[before..] {
                edges.push(Edge { at_us: now, on });
            }
        });
    }
    edges
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct VecSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl VecSink {
    pub fn last(&self) -> Option<&AppEvent> {
        self.events.last()
    }
}

impl EventSink for VecSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
