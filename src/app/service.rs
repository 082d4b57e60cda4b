//! Application service: the hexagonal core.
//!
//! [`StatusService`] owns the mode state machine and the security stub.
//! The light and the event sink are injected at call sites, so the whole
//! service runs against mocks in tests.
//!
//! ```text
//!  AppCommand ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │     StatusService      │
//!   LightPort ◀── │  ModeMachine · Security│
//!                 └────────────────────────┘
//! ```

use log::{info, warn};

use crate::error::Result;
use crate::fsm::{ModeEvent, ModeMachine, OperatingMode};
use crate::security::Security;

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{EventSink, LightPort};

pub struct StatusService {
    machine: ModeMachine,
    security: Security,
}

impl StatusService {
    pub fn new() -> Self {
        Self {
            machine: ModeMachine::new(),
            security: Security::new(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Show the Dev pattern and announce the initial mode.
    pub fn start(&mut self, light: &mut impl LightPort, sink: &mut impl EventSink) -> Result<()> {
        if let Err(e) = self.machine.start(light) {
            sink.emit(&AppEvent::LightFault(e));
            return Err(e);
        }
        sink.emit(&AppEvent::Started(self.machine.current()));
        info!("StatusService started in {}", self.machine.current().name());
        Ok(())
    }

    // ── Events ────────────────────────────────────────────────

    /// Deliver one event to the mode state machine.
    ///
    /// A light failure after a transition still reports the mode change,
    /// followed by `LightFault`.
    pub fn handle_event(
        &mut self,
        event: ModeEvent,
        light: &mut impl LightPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let from = self.machine.current();
        match self.machine.handle_event(event, light) {
            Ok(Some(to)) => {
                sink.emit(&AppEvent::ModeChanged { from, to });
                Ok(())
            }
            Ok(None) => {
                sink.emit(&AppEvent::EventIgnored { mode: from, event });
                Ok(())
            }
            Err(e) => {
                let to = self.machine.current();
                if to != from {
                    sink.emit(&AppEvent::ModeChanged { from, to });
                }
                sink.emit(&AppEvent::LightFault(e));
                Err(e)
            }
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (console today).
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        light: &mut impl LightPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        match cmd {
            AppCommand::Event(event) => self.handle_event(event, light, sink),
            AppCommand::Unlock(key) => {
                if self.security.validate_key(&key) {
                    info!("Magic key accepted");
                    self.handle_event(ModeEvent::MagicKeyEntered, light, sink)
                } else {
                    warn!("Magic key rejected");
                    sink.emit(&AppEvent::KeyRejected);
                    Ok(())
                }
            }
            AppCommand::Blink {
                frequency_hz,
                duty_cycle_percent,
            } => report(light.set_custom_blink(frequency_hz, duty_cycle_percent), sink),
            AppCommand::Led(on) => report(light.set_static(on), sink),
            AppCommand::SetLevel(code) => {
                self.security.set_level(code)?;
                sink.emit(&AppEvent::LevelChanged(self.security.level()));
                Ok(())
            }
            AppCommand::GetState => {
                sink.emit(&AppEvent::ModeReport(self.machine.current()));
                Ok(())
            }
            AppCommand::LedStatus => {
                if self.machine.current() == OperatingMode::Dev {
                    light.debug_status();
                } else {
                    sink.emit(&AppEvent::DebugDenied(self.machine.current()));
                }
                Ok(())
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> OperatingMode {
        self.machine.current()
    }

    pub fn security(&self) -> &Security {
        &self.security
    }
}

impl Default for StatusService {
    fn default() -> Self {
        Self::new()
    }
}

fn report(result: Result<()>, sink: &mut impl EventSink) -> Result<()> {
    if let Err(e) = result {
        sink.emit(&AppEvent::LightFault(e));
    }
    result
}
