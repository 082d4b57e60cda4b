//! OptiPulse Firmware — Main Entry Point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  StatusLed (GPIO)   EspOneShotTimer (esp_timer)  LogEventSink│
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ────────────────────    │
//! │                                                              │
//! │  ┌──────────────────────────┐    ┌────────────────────────┐  │
//! │  │ StatusService            │──▶ │ SharedScheduler        │  │
//! │  │ ModeMachine · Security   │    │ PatternScheduler       │  │
//! │  └──────────────────────────┘    └────────────────────────┘  │
//! │            ▲                                ▲                │
//! │      console lines                  esp_timer callback       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The scheduler lives in a process-lifetime `OnceLock` because the
//! esp_timer callback is a plain `fn()` with no captured state.
#![deny(unused_must_use)]

use std::io::BufRead;
use std::sync::OnceLock;

use anyhow::{Result, anyhow};
use log::{error, info, warn};

use optipulse::adapters::log_sink::LogEventSink;
use optipulse::app::commands::AppCommand;
use optipulse::app::service::StatusService;
use optipulse::config::LightConfig;
use optipulse::drivers::hw_init;
use optipulse::drivers::hw_timer::EspOneShotTimer;
use optipulse::drivers::light_scheduler::{PatternScheduler, SharedScheduler};
use optipulse::drivers::status_led::StatusLed;
use optipulse::error::Error;
use optipulse::pins;

type Light = SharedScheduler<StatusLed, EspOneShotTimer>;

static LIGHT: OnceLock<Light> = OnceLock::new();

/// esp_timer callback: one scheduler step.
fn on_light_timer() {
    if let Some(light) = LIGHT.get() {
        if let Err(e) = light.on_timer_fire() {
            warn!("light timer step failed: {}", e);
        }
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  OptiPulse v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        error!("HAL init failed: {}, halting", e);
        return Err(Error::from(e).into());
    }

    // ── 3. Light scheduler ────────────────────────────────────
    let led = StatusLed::new(pins::STATUS_LED_GPIO);
    let timer = EspOneShotTimer::new(on_light_timer);
    let mut scheduler = PatternScheduler::new(led, timer, LightConfig::default())?;
    scheduler.initialize()?;
    LIGHT
        .set(SharedScheduler::new(scheduler))
        .map_err(|_| anyhow!("light scheduler already installed"))?;
    let mut light: &Light = LIGHT
        .get()
        .ok_or_else(|| anyhow!("light scheduler missing"))?;

    // ── 4. Application service ────────────────────────────────
    let mut sink = LogEventSink::new();
    let mut service = StatusService::new();
    service.start(&mut light, &mut sink)?;

    // ── 5. Console loop ───────────────────────────────────────
    info!("Console ready. Type a command (e.g. `set_state operational`).");
    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!("console read failed: {}", e);
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match AppCommand::parse(&line) {
            Ok(cmd) => {
                if let Err(e) = service.handle_command(cmd, &mut light, &mut sink) {
                    warn!("command `{}` failed: {}", line.trim(), e);
                }
            }
            Err(e) => warn!("`{}`: {}", line.trim(), e),
        }
    }

    info!("Console closed; status light keeps running");
    loop {
        std::thread::park();
    }
}
