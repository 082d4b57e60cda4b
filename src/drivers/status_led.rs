//! Single-GPIO status LED driver.
//!
//! Implements the `embedded-hal` digital output traits so the
//! [`PatternScheduler`](super::light_scheduler::PatternScheduler) can drive
//! it like any other pin.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: `gpio_set_level` / `gpio_get_level` on the pin configured
//! by `hw_init`.  On host/test: tracks the level in memory only.

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin, StatefulOutputPin};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// ESP-IDF return code from a failed GPIO call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioError(pub i32);

impl embedded_hal::digital::Error for GpioError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub struct StatusLed {
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    gpio: i32,
    level: bool,
}

impl StatusLed {
    /// Wrap an already-configured output GPIO.
    pub fn new(gpio: i32) -> Self {
        Self { gpio, level: false }
    }

    #[cfg(target_os = "espidf")]
    fn drive(&mut self, high: bool) -> Result<(), GpioError> {
        // SAFETY: gpio_set_level writes to the pin configured as an output
        // in hw_init; callers are serialised by the scheduler lock.
        let ret = unsafe { gpio_set_level(self.gpio, u32::from(high)) };
        if ret != ESP_OK as i32 {
            return Err(GpioError(ret));
        }
        self.level = high;
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn drive(&mut self, high: bool) -> Result<(), GpioError> {
        self.level = high;
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn sense(&self) -> bool {
        // SAFETY: read-only register access; the pin has its input buffer
        // enabled (GPIO_MODE_INPUT_OUTPUT).
        (unsafe { gpio_get_level(self.gpio) }) != 0
    }

    #[cfg(not(target_os = "espidf"))]
    fn sense(&self) -> bool {
        self.level
    }
}

impl ErrorType for StatusLed {
    type Error = GpioError;
}

impl OutputPin for StatusLed {
    fn set_low(&mut self) -> Result<(), GpioError> {
        self.drive(false)
    }

    fn set_high(&mut self) -> Result<(), GpioError> {
        self.drive(true)
    }
}

impl StatefulOutputPin for StatusLed {
    fn is_set_high(&mut self) -> Result<bool, GpioError> {
        Ok(self.sense())
    }

    fn is_set_low(&mut self) -> Result<bool, GpioError> {
        Ok(!self.sense())
    }
}
