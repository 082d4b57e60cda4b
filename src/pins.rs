//! GPIO assignments for the OptiPulse board.
//!
//! Single source of truth: drivers reference this module rather than
//! hard-coding pin numbers.

/// Digital output: status indicator LED (active HIGH, onboard blue LED).
pub const STATUS_LED_GPIO: i32 = 2;
