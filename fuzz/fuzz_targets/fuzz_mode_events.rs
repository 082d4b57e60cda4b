//! Fuzz target: `ModeMachine::handle_event_code`
//!
//! Every byte is an event code.  The machine must never panic and the
//! last pattern shown must always belong to the current mode.
//!
//! cargo fuzz run fuzz_mode_events

#![no_main]

use libfuzzer_sys::fuzz_target;
use optipulse::app::ports::LightPort;
use optipulse::drivers::led_patterns::Pattern;
use optipulse::error::Result;
use optipulse::fsm::ModeMachine;
use optipulse::fsm::states::pattern_for;

#[derive(Default)]
struct LastPattern(Option<Pattern>);

impl LightPort for LastPattern {
    fn apply_pattern(&mut self, pattern: Pattern) -> Result<()> {
        self.0 = Some(pattern);
        Ok(())
    }

    fn set_custom_blink(&mut self, _: f32, _: f32) -> Result<()> {
        Ok(())
    }

    fn set_static(&mut self, _: bool) -> Result<()> {
        Ok(())
    }

    fn debug_status(&mut self) {}
}

fuzz_target!(|data: &[u8]| {
    let mut m = ModeMachine::new();
    let mut light = LastPattern::default();
    m.start(&mut light).unwrap();

    for &code in data {
        m.handle_event_code(code, &mut light).unwrap();
        assert_eq!(light.0, Some(pattern_for(m.current())));
    }
});
