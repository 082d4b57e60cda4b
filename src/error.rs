//! Unified error types for the OptiPulse firmware.
//!
//! A single `Error` enum that every subsystem converts into.  All variants
//! are `Copy` so they can be returned from the timer callback path without
//! allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A request or configuration value was rejected before use.
    Config(&'static str),
    /// The status LED pin could not be driven or read.
    Pin(PinError),
    /// The one-shot timer could not be created, armed, or stopped.
    Timer(TimerError),
    /// A pattern was requested before `initialize()` succeeded.
    NotInitialized,
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Pin(e) => write!(f, "pin: {e}"),
            Self::Timer(e) => write!(f, "timer: {e}"),
            Self::NotInitialized => write!(f, "light scheduler not initialized"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Pin errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinError {
    /// GPIO set failed.
    WriteFailed,
    /// GPIO level could not be read back.
    ReadFailed,
}

impl fmt::Display for PinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteFailed => write!(f, "GPIO write failed"),
            Self::ReadFailed => write!(f, "GPIO read failed"),
        }
    }
}

impl From<PinError> for Error {
    fn from(e: PinError) -> Self {
        Self::Pin(e)
    }
}

// ---------------------------------------------------------------------------
// Timer errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// `esp_timer_create` returned an error code (out of timer slots, OOM).
    CreateFailed(i32),
    /// `esp_timer_start_once` returned an error code.
    StartFailed(i32),
    /// `esp_timer_stop` returned an unexpected error code.
    StopFailed(i32),
    /// The timer client was used before `allocate()` or after `release()`.
    NotAllocated,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateFailed(rc) => write!(f, "timer create failed (rc={rc})"),
            Self::StartFailed(rc) => write!(f, "timer start failed (rc={rc})"),
            Self::StopFailed(rc) => write!(f, "timer stop failed (rc={rc})"),
            Self::NotAllocated => write!(f, "timer not allocated"),
        }
    }
}

impl From<TimerError> for Error {
    fn from(e: TimerError) -> Self {
        Self::Timer(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
