//! Transition table and mode → pattern mapping.
//!
//! Each row is `(from, event) → to`.  Pairs that are not listed have no
//! transition: the event is ignored in that mode.

use super::{ModeEvent, OperatingMode};
use crate::drivers::led_patterns::Pattern;

/// One row of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: OperatingMode,
    pub event: ModeEvent,
    pub to: OperatingMode,
}

const fn row(from: OperatingMode, event: ModeEvent, to: OperatingMode) -> Transition {
    Transition { from, event, to }
}

/// The complete transition table.
pub const TRANSITIONS: [Transition; 9] = [
    row(OperatingMode::Dev, ModeEvent::RequestOperational, OperatingMode::Operational),
    // Already unlocked; kept so the key entry is logged rather than ignored.
    row(OperatingMode::Dev, ModeEvent::MagicKeyEntered, OperatingMode::Dev),
    row(OperatingMode::Operational, ModeEvent::RtvOn, OperatingMode::Rtv),
    row(OperatingMode::Operational, ModeEvent::TransferComplete, OperatingMode::Untethered),
    row(OperatingMode::Rtv, ModeEvent::RtvOff, OperatingMode::Operational),
    row(OperatingMode::Rtv, ModeEvent::Timeout, OperatingMode::Operational),
    row(OperatingMode::Untethered, ModeEvent::TransferComplete, OperatingMode::Operational),
    row(OperatingMode::Tethered, ModeEvent::TransferComplete, OperatingMode::Operational),
    row(OperatingMode::Halted, ModeEvent::MagicKeyEntered, OperatingMode::Dev),
];

/// Look up the next mode for `(from, event)`.
pub fn next_mode(from: OperatingMode, event: ModeEvent) -> Option<OperatingMode> {
    TRANSITIONS
        .iter()
        .find(|t| t.from == from && t.event == event)
        .map(|t| t.to)
}

/// The light pattern shown in each mode.
pub fn pattern_for(mode: OperatingMode) -> Pattern {
    match mode {
        OperatingMode::Dev => Pattern::DevStatic,
        OperatingMode::Operational => Pattern::OperationalBurst,
        OperatingMode::Tethered => Pattern::Tethered,
        OperatingMode::Untethered => Pattern::UntetheredBurst,
        OperatingMode::Rtv => Pattern::RtvBurst,
        OperatingMode::Halted => Pattern::HaltedEntry,
    }
}
