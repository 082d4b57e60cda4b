//! Pattern-driven status-light scheduler.
//!
//! Turns a [`Pattern`] into a self-rescheduling sequence of one-shot timer
//! firings.  Each firing toggles the pin and re-arms the timer for the
//! next phase, consulting the active [`LimitedRun`] to decide whether to
//! continue, pause, or stop.
//!
//! ```text
//!   apply_pattern ──▶ reset state ──▶ arm(off) ──▶ fire ──▶ toggle pin
//!                                         ▲                    │
//!                                         └── arm(on/off/pause)┘
//! ```
//!
//! ## First-edge policy
//!
//! Named blink patterns start dark: the first firing (after `off`) turns
//! the light ON.  Custom blink starts lit: the pin goes ON immediately and
//! the first firing (after `on`) turns it OFF.  Both are part of the
//! externally observed timing and are kept distinct on purpose.
//!
//! ## Limited runs
//!
//! Cycles are counted on OFF-phase toggles only (one cycle = ON + OFF).
//!
//! | Run kind         | On limit reached                                  |
//! |------------------|---------------------------------------------------|
//! | Burst            | clear run, arm pause, fresh run when pause fires  |
//! | HaltedEntry      | clear run, pin OFF, arm nothing (terminal)        |
//! | UntetheredBurst  | reset counter, arm pause, keep bursting           |
//!
//! ## Concurrency
//!
//! The timer callback and the caller thread both mutate the scheduler.
//! Share it through [`SharedScheduler`], which serialises every entry
//! point so cancel-then-rearm is never interleaved with a firing.  A
//! firing that lost that race is recognised and dropped in
//! [`PatternScheduler::on_timer_fire`].

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Duration;
use embedded_hal::digital::{PinState, StatefulOutputPin};
use log::{debug, info, warn};

use crate::app::ports::{LightPort, OneShotTimer};
use crate::config::LightConfig;
use crate::drivers::led_patterns::{LimitedRun, Pattern, PatternPlan, RunKind, Timing};
use crate::error::{Error, PinError, Result};

/// The scheduler's live, mutable record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleState {
    pub timing: Timing,
    pub led_is_on: bool,
    pub run: Option<LimitedRun>,
}

impl ScheduleState {
    const RESET: Self = Self {
        timing: Timing::ZERO,
        led_is_on: false,
        run: None,
    };
}

/// What an OFF-phase toggle decided about the active run.
enum CycleOutcome {
    Continue,
    Pause(Duration),
    Terminate,
}

/// Owns the status-light pin and its one-shot timer client.
pub struct PatternScheduler<P, T> {
    pin: P,
    timer: T,
    config: LightConfig,
    state: ScheduleState,
    pattern: Option<Pattern>,
    /// Burst template reinstalled when a burst pause fires.
    resume_run: Option<LimitedRun>,
    /// Whether the scheduler expects a firing.
    armed: bool,
    initialized: bool,
}

impl<P, T> PatternScheduler<P, T>
where
    P: StatefulOutputPin,
    T: OneShotTimer,
{
    /// Build a scheduler from a pin, a timer client, and validated timings.
    ///
    /// Does **not** touch hardware; call [`initialize`](Self::initialize) next.
    pub fn new(pin: P, timer: T, config: LightConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            pin,
            timer,
            config,
            state: ScheduleState::RESET,
            pattern: None,
            resume_run: None,
            armed: false,
            initialized: false,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the pin OFF and allocate the timer client.
    ///
    /// Safe to retry after a failure; a second call after success is a no-op.
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            debug!("light: already initialized");
            return Ok(());
        }
        info!("light: initializing");
        self.write_pin(false)?;
        self.timer.allocate()?;
        self.state = ScheduleState::RESET;
        self.initialized = true;
        Ok(())
    }

    /// Cancel any pending firing, release the timer client, and force the
    /// pin OFF.  Every step runs even if an earlier one fails; the first
    /// error is returned.
    pub fn deinitialize(&mut self) -> Result<()> {
        if !self.initialized {
            return self.write_pin(false);
        }
        info!("light: deinitializing");
        let cancelled = self.timer.cancel();
        let released = self.timer.release();
        let pin_off = self.write_pin(false);

        self.armed = false;
        self.initialized = false;
        self.pattern = None;
        self.resume_run = None;
        self.state = ScheduleState::RESET;

        cancelled?;
        released?;
        pin_off
    }

    // ── Pattern requests ──────────────────────────────────────

    /// Fully reset scheduling state and start `pattern`.
    pub fn apply_pattern(&mut self, pattern: Pattern) -> Result<()> {
        self.ensure_initialized()?;
        let plan = PatternPlan::resolve(pattern, &self.config)?;
        info!("light: applying pattern {}", pattern.name());

        self.cancel_pending()?;
        self.state = ScheduleState::RESET;
        self.resume_run = None;
        self.pattern = Some(pattern);

        match plan {
            PatternPlan::Steady => {
                self.write_pin(true)?;
                self.state.led_is_on = true;
                Ok(())
            }
            PatternPlan::Blink { timing, run } => {
                self.state.timing = timing;
                self.state.run = run;
                self.resume_run = run.filter(|r| r.kind == RunKind::Burst);
                self.write_pin(false)?;
                self.arm(timing.off)
            }
            PatternPlan::Custom { timing } => self.start_custom(timing),
        }
    }

    /// Apply a pattern by wire/console code.  Unknown codes fail safe:
    /// timer cancelled, state reset, pin OFF.
    pub fn apply_pattern_code(&mut self, code: u8) -> Result<()> {
        if let Some(pattern) = Pattern::from_code(code) {
            return self.apply_pattern(pattern);
        }
        self.ensure_initialized()?;
        warn!("light: unknown pattern code {}, turning LED OFF", code);
        self.cancel_pending()?;
        self.state = ScheduleState::RESET;
        self.resume_run = None;
        self.pattern = None;
        self.write_pin(false)
    }

    /// Blink at `frequency_hz` with `duty_cycle_percent` ON time, starting
    /// with the ON phase.  Runs until the next pattern request.
    pub fn set_custom_blink(&mut self, frequency_hz: f32, duty_cycle_percent: f32) -> Result<()> {
        self.ensure_initialized()?;
        let timing = Timing::from_frequency(frequency_hz, duty_cycle_percent)?;
        info!(
            "light: custom blink {}Hz @ {}% (period={}us on={}us off={}us)",
            frequency_hz,
            duty_cycle_percent,
            timing.period().as_micros(),
            timing.on.as_micros(),
            timing.off.as_micros()
        );
        self.cancel_pending()?;
        self.pattern = Some(Pattern::Custom {
            frequency_hz,
            duty_cycle_percent,
        });
        self.start_custom(timing)
    }

    /// Cancel timing and drive the pin directly.
    ///
    /// Leaves the limited-run bookkeeping as it was; only
    /// [`apply_pattern`](Self::apply_pattern) fully resets it.
    pub fn set_static(&mut self, on: bool) -> Result<()> {
        self.ensure_initialized()?;
        self.cancel_pending()?;
        self.write_pin(on)?;
        self.state.led_is_on = on;
        info!("light: static {}", if on { "ON" } else { "OFF" });
        Ok(())
    }

    // ── Timer callback ────────────────────────────────────────

    /// Handle one timer firing.  Invoked only from the timer adapter.
    ///
    /// Firings the scheduler no longer expects (cancelled, superseded by a
    /// newer arm, or after a terminal run) are dropped.
    pub fn on_timer_fire(&mut self) -> Result<()> {
        if !self.armed {
            debug!("light: firing with nothing armed, ignored");
            return Ok(());
        }
        if self.timer.is_pending() {
            debug!("light: superseded firing, ignored");
            return Ok(());
        }
        self.armed = false;

        if self.state.run.is_none() {
            if let Some(fresh) = self.resume_run {
                debug!("light: burst resumed after pause");
                self.state.run = Some(fresh);
            }
        }

        let on = !self.state.led_is_on;
        self.state.led_is_on = on;
        self.write_pin(on)?;
        let next = if on { self.state.timing.on } else { self.state.timing.off };

        if on {
            return self.arm(next);
        }

        match self.complete_cycle() {
            CycleOutcome::Continue => self.arm(next),
            CycleOutcome::Pause(pause) => self.arm(pause),
            CycleOutcome::Terminate => {
                self.write_pin(false)?;
                self.state.led_is_on = false;
                info!("light: halted entry done, holding LED OFF");
                Ok(())
            }
        }
    }

    // ── Diagnostics ───────────────────────────────────────────

    /// Log pin level, timing, run progress, and timer validity.
    pub fn debug_status(&mut self) {
        info!("=== LED DEBUG STATUS ===");
        match self.pin.is_set_high() {
            Ok(high) => info!("LED physical state: {}", if high { "ON" } else { "OFF" }),
            Err(_) => warn!("LED physical state: {}", PinError::ReadFailed),
        }
        info!(
            "Pattern: {} | timing ON={}us OFF={}us",
            self.pattern.map_or("NONE", |p| p.name()),
            self.state.timing.on.as_micros(),
            self.state.timing.off.as_micros()
        );
        match &self.state.run {
            Some(run) => info!(
                "Limited run {:?}: {} / {} cycles",
                run.kind, run.cycles_completed, run.cycle_limit
            ),
            None if self.pattern.is_some_and(|p| p.is_limited()) => {
                info!("Limited run: between bursts")
            }
            None => info!("Limited run: INACTIVE"),
        }
        if self.initialized {
            info!(
                "Timer: VALID ({})",
                if self.armed { "armed" } else { "idle" }
            );
        } else {
            warn!("Timer: not allocated (not initialized?)");
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn state(&self) -> &ScheduleState {
        &self.state
    }

    /// Last pattern applied, or `None` after a fail-safe/unknown request.
    pub fn current_pattern(&self) -> Option<Pattern> {
        self.pattern
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &LightConfig {
        &self.config
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    // ── Internal ──────────────────────────────────────────────

    fn start_custom(&mut self, timing: Timing) -> Result<()> {
        self.state.timing = timing;
        self.state.run = None;
        self.resume_run = None;
        self.write_pin(true)?;
        self.state.led_is_on = true;
        self.arm(timing.on)
    }

    /// Count the OFF toggle against the active run and apply its policy.
    fn complete_cycle(&mut self) -> CycleOutcome {
        let Some(run) = self.state.run.as_mut() else {
            return CycleOutcome::Continue;
        };
        run.cycles_completed = run.cycles_completed.saturating_add(1);
        if !run.limit_reached() {
            return CycleOutcome::Continue;
        }

        let pause = run.pause.unwrap_or(self.state.timing.off);
        let kind = run.kind;
        match kind {
            RunKind::Burst => {
                info!("light: burst complete, pausing {}us", pause.as_micros());
                self.state.run = None;
                CycleOutcome::Pause(pause)
            }
            RunKind::UntetheredBurst => {
                info!("light: untethered burst complete, pausing {}us", pause.as_micros());
                run.cycles_completed = 0;
                CycleOutcome::Pause(pause)
            }
            RunKind::HaltedEntry => {
                self.state.run = None;
                CycleOutcome::Terminate
            }
        }
    }

    fn arm(&mut self, after: Duration) -> Result<()> {
        self.timer.arm_once(after)?;
        self.armed = true;
        debug!("light: armed for {}us", after.as_micros());
        Ok(())
    }

    fn cancel_pending(&mut self) -> Result<()> {
        self.armed = false;
        self.timer.cancel()?;
        Ok(())
    }

    fn write_pin(&mut self, on: bool) -> Result<()> {
        self.pin
            .set_state(PinState::from(on))
            .map_err(|_| Error::Pin(PinError::WriteFailed))
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }
}

impl<P, T> LightPort for PatternScheduler<P, T>
where
    P: StatefulOutputPin,
    T: OneShotTimer,
{
    fn apply_pattern(&mut self, pattern: Pattern) -> Result<()> {
        PatternScheduler::apply_pattern(self, pattern)
    }

    fn set_custom_blink(&mut self, frequency_hz: f32, duty_cycle_percent: f32) -> Result<()> {
        PatternScheduler::set_custom_blink(self, frequency_hz, duty_cycle_percent)
    }

    fn set_static(&mut self, on: bool) -> Result<()> {
        PatternScheduler::set_static(self, on)
    }

    fn debug_status(&mut self) {
        PatternScheduler::debug_status(self);
    }
}

// ───────────────────────────────────────────────────────────────
// SharedScheduler
// ───────────────────────────────────────────────────────────────

/// A [`PatternScheduler`] behind a critical-section lock, shared between
/// the timer callback context and the caller thread.
pub struct SharedScheduler<P, T> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<PatternScheduler<P, T>>>,
}

impl<P, T> SharedScheduler<P, T>
where
    P: StatefulOutputPin,
    T: OneShotTimer,
{
    pub fn new(scheduler: PatternScheduler<P, T>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(scheduler)),
        }
    }

    /// Run `f` with exclusive access to the scheduler.
    pub fn with<R>(&self, f: impl FnOnce(&mut PatternScheduler<P, T>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Entry point for the timer adapter's callback.
    pub fn on_timer_fire(&self) -> Result<()> {
        self.with(PatternScheduler::on_timer_fire)
    }
}

impl<P, T> LightPort for &SharedScheduler<P, T>
where
    P: StatefulOutputPin,
    T: OneShotTimer,
{
    fn apply_pattern(&mut self, pattern: Pattern) -> Result<()> {
        self.with(|s| s.apply_pattern(pattern))
    }

    fn set_custom_blink(&mut self, frequency_hz: f32, duty_cycle_percent: f32) -> Result<()> {
        self.with(|s| s.set_custom_blink(frequency_hz, duty_cycle_percent))
    }

    fn set_static(&mut self, on: bool) -> Result<()> {
        self.with(|s| s.set_static(on))
    }

    fn debug_status(&mut self) {
        self.with(PatternScheduler::debug_status);
    }
}
