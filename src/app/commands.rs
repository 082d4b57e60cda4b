//! Inbound commands to the application service.
//!
//! Parsed from console lines and interpreted by
//! [`StatusService`](super::service::StatusService).
//!
//! | Line                      | Command                                  |
//! |---------------------------|------------------------------------------|
//! | `set_state operational`   | `Event(RequestOperational)`              |
//! | `rtv_on` / `rtv_off`      | `Event(RtvOn)` / `Event(RtvOff)`         |
//! | `timeout`                 | `Event(Timeout)`                         |
//! | `transfer_complete`       | `Event(TransferComplete)`                |
//! | `transfer_failed`         | `Event(TransferFailed)`                  |
//! | `error`                   | `Event(Error)`                           |
//! | `unlock <key>`            | `Unlock(key)`                            |
//! | `blink <hz> <duty>`       | `Blink { .. }`                           |
//! | `led on` / `led off`      | `Led(bool)`                              |
//! | `level <0..=2>`           | `SetLevel(n)`                            |
//! | `get_state`               | `GetState`                               |
//! | `led_status`              | `LedStatus`                              |

use core::fmt;

use crate::fsm::ModeEvent;

/// Longest key accepted by `unlock`.
pub const MAX_KEY_LEN: usize = 32;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Feed an event straight into the mode state machine.
    Event(ModeEvent),

    /// Validate the key; on success deliver `MagicKeyEntered`.
    Unlock(heapless::String<MAX_KEY_LEN>),

    /// Start a custom ON-first blink.
    Blink {
        frequency_hz: f32,
        duty_cycle_percent: f32,
    },

    /// Cancel timing and drive the light directly.
    Led(bool),

    /// Change the security level (raw code, validated by the service).
    SetLevel(u8),

    /// Report the current mode.
    GetState,

    /// Dump the light scheduler state (Dev mode only).
    LedStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    Unknown,
    MissingArgument,
    InvalidArgument,
    KeyTooLong,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty command"),
            Self::Unknown => write!(f, "unknown command"),
            Self::MissingArgument => write!(f, "missing argument"),
            Self::InvalidArgument => write!(f, "invalid argument"),
            Self::KeyTooLong => write!(f, "key longer than {} bytes", MAX_KEY_LEN),
        }
    }
}

impl AppCommand {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(ParseError::Empty)?;
        let mut arg = || words.next().ok_or(ParseError::MissingArgument);

        let cmd = match name {
            "set_state" => match arg()? {
                "operational" => Self::Event(ModeEvent::RequestOperational),
                _ => return Err(ParseError::InvalidArgument),
            },
            "rtv_on" => Self::Event(ModeEvent::RtvOn),
            "rtv_off" => Self::Event(ModeEvent::RtvOff),
            "timeout" => Self::Event(ModeEvent::Timeout),
            "transfer_complete" => Self::Event(ModeEvent::TransferComplete),
            "transfer_failed" => Self::Event(ModeEvent::TransferFailed),
            "error" => Self::Event(ModeEvent::Error),
            "unlock" => {
                let key = heapless::String::try_from(arg()?).map_err(|_| ParseError::KeyTooLong)?;
                Self::Unlock(key)
            }
            "blink" => {
                let frequency_hz = parse_f32(arg()?)?;
                let duty_cycle_percent = parse_f32(arg()?)?;
                Self::Blink {
                    frequency_hz,
                    duty_cycle_percent,
                }
            }
            "led" => match arg()? {
                "on" => Self::Led(true),
                "off" => Self::Led(false),
                _ => return Err(ParseError::InvalidArgument),
            },
            "level" => Self::SetLevel(arg()?.parse().map_err(|_| ParseError::InvalidArgument)?),
            "get_state" => Self::GetState,
            "led_status" => Self::LedStatus,
            _ => return Err(ParseError::Unknown),
        };
        Ok(cmd)
    }
}

fn parse_f32(s: &str) -> Result<f32, ParseError> {
    s.parse().map_err(|_| ParseError::InvalidArgument)
}
