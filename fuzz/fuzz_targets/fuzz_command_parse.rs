//! Fuzz target: `AppCommand::parse`
//!
//! Arbitrary console lines must parse or fail cleanly, never panic.
//!
//! cargo fuzz run fuzz_command_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use optipulse::app::commands::{AppCommand, MAX_KEY_LEN};

fuzz_target!(|data: &[u8]| {
    let Ok(line) = core::str::from_utf8(data) else { return };
    if let Ok(AppCommand::Unlock(key)) = AppCommand::parse(line) {
        assert!(key.len() <= MAX_KEY_LEN);
        assert!(!key.is_empty());
    }
});
