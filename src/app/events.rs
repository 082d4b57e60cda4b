//! Outbound application events.
//!
//! The [`StatusService`](super::service::StatusService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.

use crate::error::Error;
use crate::fsm::{ModeEvent, OperatingMode};
use crate::security::SecurityLevel;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries the initial mode).
    Started(OperatingMode),

    /// The mode state machine took a transition.
    ModeChanged { from: OperatingMode, to: OperatingMode },

    /// An event had no transition from the current mode.
    EventIgnored { mode: OperatingMode, event: ModeEvent },

    /// Answer to `GetState`.
    ModeReport(OperatingMode),

    /// An unlock attempt used the wrong key.
    KeyRejected,

    /// Security level changed.
    LevelChanged(SecurityLevel),

    /// A debug dump was requested outside Dev mode.
    DebugDenied(OperatingMode),

    /// A light request failed; the caller may retry.
    LightFault(Error),
}
