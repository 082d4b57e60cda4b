//! Access level and magic-key check.
//!
//! The key comparison hashes both sides with SHA-256 (`hmac-sha256`) and
//! folds the digests with XOR so the time taken does not depend on where
//! the first mismatching byte is.

use log::{info, warn};

use crate::error::{Error, Result};

const MAGIC_KEY: &str = "open-sesame";

/// Access level of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SecurityLevel {
    Open = 0,
    Protected = 1,
    Locked = 2,
}

impl SecurityLevel {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Open),
            1 => Some(Self::Protected),
            2 => Some(Self::Locked),
            _ => None,
        }
    }
}

pub struct Security {
    level: SecurityLevel,
    key_digest: [u8; 32],
}

impl Security {
    pub fn new() -> Self {
        let level = SecurityLevel::Open;
        info!("Security initialized at level {}", level as u8);
        Self {
            level,
            key_digest: hmac_sha256::Hash::hash(MAGIC_KEY.as_bytes()),
        }
    }

    pub fn level(&self) -> SecurityLevel {
        self.level
    }

    /// Set the level from its raw code.  Codes above 2 are rejected and the
    /// current level is kept.
    pub fn set_level(&mut self, code: u8) -> Result<()> {
        match SecurityLevel::from_code(code) {
            Some(level) => {
                self.level = level;
                info!("Security level set to {}", code);
                Ok(())
            }
            None => {
                warn!("Invalid security level: {}", code);
                Err(Error::Config("security level must be 0..=2"))
            }
        }
    }

    /// `true` if `input` is the magic unlock key.
    pub fn validate_key(&self, input: &str) -> bool {
        let digest = hmac_sha256::Hash::hash(input.as_bytes());
        let diff = digest
            .iter()
            .zip(self.key_digest.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));
        diff == 0
    }
}

impl Default for Security {
    fn default() -> Self {
        Self::new()
    }
}
