//! Status-light drivers, pattern scheduling, and hardware initialisation.

pub mod hw_init;
pub mod hw_timer;
pub mod led_patterns;
pub mod light_scheduler;
pub mod status_led;
