//! Status-light pattern definitions.
//!
//! A [`Pattern`] is consumed immediately to derive a [`Timing`] and,
//! for burst-like patterns, a [`LimitedRun`] template.  The scheduler
//! owns the live copies; nothing here holds state.
//!
//! ## Pattern table
//!
//! | Pattern           | Shape                                  | Limited run      |
//! |-------------------|----------------------------------------|------------------|
//! | DevStatic         | steady ON, no timer                    | none             |
//! | OperationalBurst  | 5 fast blinks, pause, repeat           | Burst            |
//! | RtvBurst          | 5 blinks, longer pause, repeat         | Burst            |
//! | HaltedEntry       | 10 blinks, then dark for good          | HaltedEntry      |
//! | TransferComplete  | 1 Hz square wave                       | none             |
//! | Tethered          | 0.5 Hz square wave                     | none             |
//! | UntetheredBurst   | 10 blinks, pause, repeat               | UntetheredBurst  |
//! | Custom            | caller frequency / duty cycle          | none             |

use embassy_time::Duration;

use crate::config::{BlinkTiming, BurstTiming, LightConfig};
use crate::error::{Error, Result};

/// A named or parametrised ON/OFF profile for the indicator light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pattern {
    DevStatic,
    OperationalBurst,
    RtvBurst,
    HaltedEntry,
    TransferComplete,
    Tethered,
    UntetheredBurst,
    Custom {
        frequency_hz: f32,
        duty_cycle_percent: f32,
    },
}

impl Pattern {
    /// Decode a wire/console pattern code.  Codes follow the declaration
    /// order of the named patterns; `Custom` has no code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::DevStatic),
            1 => Some(Self::OperationalBurst),
            2 => Some(Self::RtvBurst),
            3 => Some(Self::HaltedEntry),
            4 => Some(Self::TransferComplete),
            5 => Some(Self::Tethered),
            6 => Some(Self::UntetheredBurst),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::DevStatic => "DEV_STATIC",
            Self::OperationalBurst => "OPERATIONAL_BURST",
            Self::RtvBurst => "RTV_BURST",
            Self::HaltedEntry => "HALTED_ENTRY",
            Self::TransferComplete => "TRANSFER_COMPLETE",
            Self::Tethered => "TETHERED",
            Self::UntetheredBurst => "UNTETHERED_BURST",
            Self::Custom { .. } => "CUSTOM",
        }
    }

    /// Whether this pattern installs a [`LimitedRun`].
    pub fn is_limited(&self) -> bool {
        matches!(
            self,
            Self::OperationalBurst | Self::RtvBurst | Self::HaltedEntry | Self::UntetheredBurst
        )
    }
}

/// ON/OFF phase durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub on: Duration,
    pub off: Duration,
}

impl Timing {
    pub const ZERO: Self = Self {
        on: Duration::from_ticks(0),
        off: Duration::from_ticks(0),
    };

    pub fn from_micros(on_us: u32, off_us: u32) -> Self {
        Self {
            on: Duration::from_micros(u64::from(on_us)),
            off: Duration::from_micros(u64::from(off_us)),
        }
    }

    /// Derive timing from a frequency and duty cycle.
    ///
    /// `period = 1/frequency`, `on = period * duty/100`, `off = period - on`.
    /// Rejects non-positive or non-finite frequencies and duty cycles
    /// outside 0..=100 before any division happens.
    pub fn from_frequency(frequency_hz: f32, duty_cycle_percent: f32) -> Result<Self> {
        if !frequency_hz.is_finite() || frequency_hz <= 0.0 {
            return Err(Error::Config("blink frequency must be a positive number of Hz"));
        }
        if !duty_cycle_percent.is_finite() || !(0.0..=100.0).contains(&duty_cycle_percent) {
            return Err(Error::Config("duty cycle must be within 0..=100 percent"));
        }

        // u64 so sub-mHz frequencies keep their full period.
        let period_us = (1_000_000.0_f32 / frequency_hz) as u64;
        if period_us == 0 {
            return Err(Error::Config("blink frequency too high for 1us timer resolution"));
        }
        // f32 rounding can push `on` past a long period at 100% duty.
        let on_us = ((period_us as f32 * (duty_cycle_percent / 100.0)) as u64).min(period_us);
        let off_us = period_us - on_us;

        Ok(Self {
            on: Duration::from_micros(on_us),
            off: Duration::from_micros(off_us),
        })
    }

    pub fn period(&self) -> Duration {
        self.on + self.off
    }
}

impl From<BlinkTiming> for Timing {
    fn from(t: BlinkTiming) -> Self {
        Self::from_micros(t.on_us, t.off_us)
    }
}

impl From<BurstTiming> for Timing {
    fn from(t: BurstTiming) -> Self {
        Self::from_micros(t.on_us, t.off_us)
    }
}

/// What happens when a limited run reaches its cycle limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    /// Operational / RTV: clear the run, pause, then start a fresh burst.
    Burst,
    /// Terminal: force the light OFF and stop scheduling.
    HaltedEntry,
    /// Reset the counter in place, pause, keep bursting.
    UntetheredBurst,
}

/// Progress toward a cycle limit for a burst-like pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitedRun {
    pub kind: RunKind,
    pub cycles_completed: u16,
    pub cycle_limit: u16,
    pub pause: Option<Duration>,
}

impl LimitedRun {
    fn from_burst(kind: RunKind, t: BurstTiming) -> Self {
        Self {
            kind,
            cycles_completed: 0,
            cycle_limit: t.cycles,
            pause: t.pause_us.map(|us| Duration::from_micros(u64::from(us))),
        }
    }

    pub fn limit_reached(&self) -> bool {
        self.cycles_completed >= self.cycle_limit
    }
}

/// Everything the scheduler needs to start a pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatternPlan {
    /// Pin held ON, no timer.
    Steady,
    /// Repeating OFF-first square wave, optionally bounded by a run.
    Blink {
        timing: Timing,
        run: Option<LimitedRun>,
    },
    /// ON-first custom square wave.
    Custom { timing: Timing },
}

impl PatternPlan {
    /// Resolve a pattern against the configured timings.
    pub fn resolve(pattern: Pattern, config: &LightConfig) -> Result<Self> {
        let plan = match pattern {
            Pattern::DevStatic => Self::Steady,
            Pattern::OperationalBurst => Self::burst(RunKind::Burst, config.operational),
            Pattern::RtvBurst => Self::burst(RunKind::Burst, config.rtv),
            Pattern::HaltedEntry => Self::burst(RunKind::HaltedEntry, config.halted_entry),
            Pattern::UntetheredBurst => Self::burst(RunKind::UntetheredBurst, config.untethered),
            Pattern::TransferComplete => Self::Blink {
                timing: config.transfer_complete.into(),
                run: None,
            },
            Pattern::Tethered => Self::Blink {
                timing: config.tethered.into(),
                run: None,
            },
            Pattern::Custom {
                frequency_hz,
                duty_cycle_percent,
            } => Self::Custom {
                timing: Timing::from_frequency(frequency_hz, duty_cycle_percent)?,
            },
        };
        Ok(plan)
    }

    fn burst(kind: RunKind, t: BurstTiming) -> Self {
        Self::Blink {
            timing: t.into(),
            run: Some(LimitedRun::from_burst(kind, t)),
        }
    }
}
