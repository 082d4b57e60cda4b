//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Scheduler / ModeMachine (domain)
//! ```
//!
//! The pin capability is `embedded_hal::digital::{OutputPin, StatefulOutputPin}`;
//! the timer capability is [`OneShotTimer`].  The mode state machine only
//! ever sees the light through [`LightPort`], never the pin or timer.

use embassy_time::Duration;

use crate::drivers::led_patterns::Pattern;
use crate::error::{Result, TimerError};

// ───────────────────────────────────────────────────────────────
// Timer port (driven adapter: domain → esp_timer)
// ───────────────────────────────────────────────────────────────

/// A single one-shot timer client.
///
/// Exactly one wake-up may be outstanding: `arm_once` while armed
/// replaces the previous arm.  The adapter's firing callback must end up
/// in [`PatternScheduler::on_timer_fire`](crate::drivers::light_scheduler::PatternScheduler::on_timer_fire).
pub trait OneShotTimer {
    /// Acquire the underlying timer resource.  Called once by `initialize`.
    fn allocate(&mut self) -> core::result::Result<(), TimerError>;

    /// Schedule a single firing `after` from now.
    fn arm_once(&mut self, after: Duration) -> core::result::Result<(), TimerError>;

    /// Cancel the pending firing, if any.  Cancelling an idle timer is `Ok`.
    fn cancel(&mut self) -> core::result::Result<(), TimerError>;

    /// Whether an arm is still waiting to fire.
    fn is_pending(&self) -> bool;

    /// Release the underlying timer resource.  Called by `deinitialize`.
    fn release(&mut self) -> core::result::Result<(), TimerError>;
}

// ───────────────────────────────────────────────────────────────
// Light port (domain → pattern scheduler)
// ───────────────────────────────────────────────────────────────

/// What the mode state machine and the console are allowed to ask of the
/// status light.
pub trait LightPort {
    /// Fully reset the scheduler and start `pattern`.
    fn apply_pattern(&mut self, pattern: Pattern) -> Result<()>;

    /// ON-first custom square wave; runs until the next pattern request.
    fn set_custom_blink(&mut self, frequency_hz: f32, duty_cycle_percent: f32) -> Result<()>;

    /// Cancel timing and drive the pin directly.
    fn set_static(&mut self, on: bool) -> Result<()>;

    /// Dump scheduler state to the log.
    fn debug_status(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The service emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
