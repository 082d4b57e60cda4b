//! Operating-mode state machine.
//!
//! Table-driven: [`states::TRANSITIONS`] lists every `(mode, event) → mode`
//! edge.  Taking an edge updates the stored mode and then asks the light
//! to show that mode's pattern.
//!
//! ```text
//!            RequestOperational          RtvOn
//!   ┌─────┐ ───────────────────▶ ┌─────────────┐ ──────▶ ┌─────┐
//!   │ Dev │                      │ Operational │         │ Rtv │
//!   └─────┘ ◀─┐                  └─────────────┘ ◀────── └─────┘
//!             │ MagicKey          │   ▲   ▲    RtvOff / Timeout
//!   ┌────────┐│  TransferComplete │   │   │ TransferComplete
//!   │ Halted ├┘                   ▼   │   │
//!   └────────┘               ┌────────────┐  ┌──────────┐
//!                            │ Untethered │  │ Tethered │
//!                            └────────────┘  └──────────┘
//! ```
//!
//! Events with no edge from the current mode are ignored without error,
//! so callers can send events without checking the mode first.  The
//! machine never touches the pin or timer; it only talks to a
//! [`LightPort`].

pub mod states;

use log::{debug, info, warn};

use crate::app::ports::LightPort;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Mode identity
// ---------------------------------------------------------------------------

/// The device's high-level operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OperatingMode {
    /// Development: CLI tools, config, debug.
    Dev = 0,
    /// Normal operation.
    Operational = 1,
    /// Connected over USB OTG for transfer.
    Tethered = 2,
    /// Transferring over Wi-Fi.
    Untethered = 3,
    /// Real-time view session (live camera).
    Rtv = 4,
    /// Fatal error or intentional halt; recoverable with the magic key.
    Halted = 5,
}

impl OperatingMode {
    pub const COUNT: usize = 6;

    /// Decode a raw mode code; `None` for anything outside the known set.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Dev),
            1 => Some(Self::Operational),
            2 => Some(Self::Tethered),
            3 => Some(Self::Untethered),
            4 => Some(Self::Rtv),
            5 => Some(Self::Halted),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dev => "DEV",
            Self::Operational => "OPERATIONAL",
            Self::Tethered => "TETHERED",
            Self::Untethered => "UNTETHERED",
            Self::Rtv => "RTV",
            Self::Halted => "HALTED",
        }
    }
}

/// Discrete signals delivered to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ModeEvent {
    None = 0,
    MagicKeyEntered = 1,
    RequestOperational = 2,
    Timeout = 3,
    RtvOn = 4,
    RtvOff = 5,
    TransferComplete = 6,
    TransferFailed = 7,
    Error = 8,
}

impl ModeEvent {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::MagicKeyEntered),
            2 => Some(Self::RequestOperational),
            3 => Some(Self::Timeout),
            4 => Some(Self::RtvOn),
            5 => Some(Self::RtvOff),
            6 => Some(Self::TransferComplete),
            7 => Some(Self::TransferFailed),
            8 => Some(Self::Error),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

/// Owns the current operating mode.  Starts in [`OperatingMode::Dev`] on
/// every cold boot.
pub struct ModeMachine {
    current: OperatingMode,
}

impl ModeMachine {
    pub fn new() -> Self {
        info!("Mode machine initialized in DEV mode");
        Self {
            current: OperatingMode::Dev,
        }
    }

    pub fn current(&self) -> OperatingMode {
        self.current
    }

    /// Show the initial mode's pattern.  Call once after the light is
    /// initialized.
    pub fn start(&mut self, light: &mut impl LightPort) -> Result<()> {
        info!("Mode machine starting in {}", self.current.name());
        light.apply_pattern(states::pattern_for(self.current))
    }

    /// Look up `(current, event)` and take the edge if one exists.
    ///
    /// Returns the new mode, or `None` when the event was ignored.  If the
    /// light rejects the new pattern the mode has still changed and the
    /// error is returned for the caller to retry.
    pub fn handle_event(
        &mut self,
        event: ModeEvent,
        light: &mut impl LightPort,
    ) -> Result<Option<OperatingMode>> {
        match states::next_mode(self.current, event) {
            None => {
                debug!("Event {:?} ignored in {}", event, self.current.name());
                Ok(None)
            }
            Some(next) if next == self.current => {
                info!("Event {:?} in {}: already there, no-op", event, self.current.name());
                Ok(None)
            }
            Some(next) => {
                self.transition_to_state(next, light)?;
                Ok(Some(next))
            }
        }
    }

    /// Decode and handle a raw event code.  Unknown codes are ignored.
    pub fn handle_event_code(
        &mut self,
        code: u8,
        light: &mut impl LightPort,
    ) -> Result<Option<OperatingMode>> {
        match ModeEvent::from_code(code) {
            Some(event) => self.handle_event(event, light),
            None => {
                debug!("Unknown event code {} ignored", code);
                Ok(None)
            }
        }
    }

    /// The only mutator of the stored mode: log the edge, store `next`,
    /// then apply its pattern.
    pub fn transition_to_state(
        &mut self,
        next: OperatingMode,
        light: &mut impl LightPort,
    ) -> Result<()> {
        info!("State change: {} -> {}", self.current.name(), next.name());
        self.current = next;
        light.apply_pattern(states::pattern_for(next))
    }

    /// Transition by raw mode code.  Codes outside the known set leave the
    /// mode alone and force the light OFF.
    pub fn transition_to_code(&mut self, code: u8, light: &mut impl LightPort) -> Result<()> {
        match OperatingMode::from_code(code) {
            Some(next) => self.transition_to_state(next, light),
            None => {
                warn!("Unknown mode code {}, forcing LED OFF", code);
                light.set_static(false)
            }
        }
    }
}

impl Default for ModeMachine {
    fn default() -> Self {
        Self::new()
    }
}
