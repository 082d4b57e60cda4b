//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the ESP-IDF
//! logger (UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(mode) => {
                info!("START | initial_mode={}", mode.name());
            }
            AppEvent::ModeChanged { from, to } => {
                info!("MODE  | {} -> {}", from.name(), to.name());
            }
            AppEvent::EventIgnored { mode, event } => {
                info!("MODE  | {:?} ignored in {}", event, mode.name());
            }
            AppEvent::ModeReport(mode) => {
                info!("STATE | {}", mode.name());
            }
            AppEvent::KeyRejected => {
                warn!("AUTH  | key rejected");
            }
            AppEvent::LevelChanged(level) => {
                info!("AUTH  | level={:?}", level);
            }
            AppEvent::DebugDenied(mode) => {
                warn!("DEBUG | led_status only available in DEV (now {})", mode.name());
            }
            AppEvent::LightFault(e) => {
                warn!("LIGHT | {}", e);
            }
        }
    }
}
