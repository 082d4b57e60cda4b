//! Status-light configuration parameters.
//!
//! Pattern timings for every named light pattern.  Defaults match the
//! production firmware; a validated instance is handed to the
//! [`PatternScheduler`](crate::drivers::light_scheduler::PatternScheduler)
//! at construction.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Timing for one blinking pattern (microseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlinkTiming {
    pub on_us: u32,
    pub off_us: u32,
}

/// Timing plus burst bookkeeping for a limited-run pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurstTiming {
    pub on_us: u32,
    pub off_us: u32,
    /// ON+OFF cycles per burst.
    pub cycles: u16,
    /// Pause after a burst; `None` for runs that never resume.
    pub pause_us: Option<u32>,
}

/// Core status-light configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightConfig {
    pub operational: BurstTiming,
    pub rtv: BurstTiming,
    pub halted_entry: BurstTiming,
    pub untethered: BurstTiming,
    pub transfer_complete: BlinkTiming,
    pub tethered: BlinkTiming,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            // 5x 10ms blinks, 50ms pause
            operational: BurstTiming {
                on_us: 10_000,
                off_us: 10_000,
                cycles: 5,
                pause_us: Some(50_000),
            },
            // 5x 50ms blinks (10Hz), 500ms pause
            rtv: BurstTiming {
                on_us: 50_000,
                off_us: 50_000,
                cycles: 5,
                pause_us: Some(500_000),
            },
            // 5Hz for 2s, then dark for good
            halted_entry: BurstTiming {
                on_us: 100_000,
                off_us: 100_000,
                cycles: 10,
                pause_us: None,
            },
            // 10x 250ms blinks, 500ms pause
            untethered: BurstTiming {
                on_us: 250_000,
                off_us: 250_000,
                cycles: 10,
                pause_us: Some(500_000),
            },
            transfer_complete: BlinkTiming {
                on_us: 500_000,
                off_us: 500_000,
            },
            tethered: BlinkTiming {
                on_us: 1_000_000,
                off_us: 1_000_000,
            },
        }
    }
}

impl LightConfig {
    /// Reject configurations that would arm zero-length timers or never
    /// complete a burst.
    pub fn validate(&self) -> Result<()> {
        for burst in [&self.operational, &self.rtv, &self.halted_entry, &self.untethered] {
            if burst.on_us == 0 || burst.off_us == 0 {
                return Err(Error::Config("burst on/off durations must be > 0"));
            }
            if burst.cycles == 0 {
                return Err(Error::Config("burst cycle limit must be > 0"));
            }
            if burst.pause_us == Some(0) {
                return Err(Error::Config("burst pause must be > 0 when set"));
            }
        }
        if self.operational.pause_us.is_none()
            || self.rtv.pause_us.is_none()
            || self.untethered.pause_us.is_none()
        {
            return Err(Error::Config("repeating bursts need a pause duration"));
        }
        for blink in [&self.transfer_complete, &self.tethered] {
            if blink.on_us == 0 || blink.off_us == 0 {
                return Err(Error::Config("blink on/off durations must be > 0"));
            }
        }
        Ok(())
    }
}
