//! Fuzz target: `PatternScheduler` request / firing interleavings
//!
//! Each input byte pair picks an operation (pattern code, custom blink,
//! static, firing, stale firing).  Checks that the pin always mirrors the
//! scheduler's idea of the LED and that at most one firing is expected.
//!
//! cargo fuzz run fuzz_scheduler_ops

#![no_main]

use core::cell::Cell;
use core::convert::Infallible;

use embassy_time::Duration;
use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};
use libfuzzer_sys::fuzz_target;
use optipulse::app::ports::OneShotTimer;
use optipulse::config::LightConfig;
use optipulse::drivers::light_scheduler::PatternScheduler;
use optipulse::error::TimerError;

#[derive(Default)]
struct Pin(bool);

impl ErrorType for Pin {
    type Error = Infallible;
}

impl OutputPin for Pin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0 = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0 = true;
        Ok(())
    }
}

impl StatefulOutputPin for Pin {
    fn is_set_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0)
    }

    fn is_set_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0)
    }
}

#[derive(Default)]
struct Timer(Cell<Option<Duration>>);

impl OneShotTimer for Timer {
    fn allocate(&mut self) -> Result<(), TimerError> {
        Ok(())
    }

    fn arm_once(&mut self, after: Duration) -> Result<(), TimerError> {
        self.0.set(Some(after));
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), TimerError> {
        self.0.set(None);
        Ok(())
    }

    fn is_pending(&self) -> bool {
        self.0.get().is_some()
    }

    fn release(&mut self) -> Result<(), TimerError> {
        self.0.set(None);
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(mut s) = PatternScheduler::new(Pin::default(), Timer::default(), LightConfig::default())
    else {
        return;
    };
    s.initialize().unwrap();

    for pair in data.chunks_exact(2) {
        let (op, arg) = (pair[0] % 5, pair[1]);
        match op {
            0 => s.apply_pattern_code(arg).unwrap(),
            // Any frequency / duty; invalid ones must be rejected, not panic.
            1 => {
                let _ = s.set_custom_blink(f32::from(arg) / 4.0, f32::from(arg));
            }
            2 => s.set_static(arg & 1 == 1).unwrap(),
            3 => {
                if s.timer().0.take().is_some() {
                    s.on_timer_fire().unwrap();
                }
            }
            _ => s.on_timer_fire().unwrap(),
        }
        assert_eq!(s.pin().0, s.state().led_is_on);
        assert_eq!(s.is_armed(), s.timer().is_pending());
    }
});
