//! Digital fightstick controller firmware for the RP2040.
//!
//! The firmware reads a rectangle-layout button board over GPIO, runs the
//! platform-independent pipeline from [`crossbox_core`], and speaks one of
//! several protocols on the other side:
//!
//! 1. GameCube or N64 over the Joybus single-wire bus (console detected
//!    at power-on by probing the data line)
//! 2. USB HID as an Xbox-style, DirectInput or Switch gamepad
//!
//! # Hardware Configuration
//!
//! | Function    | GPIO  | Description                        |
//! |-------------|-------|------------------------------------|
//! | Buttons     | var.  | See [`gpio_input::PIN_MAPPINGS`]   |
//! | Joybus data | 28    | Console data line (3.3V, ext pull) |
//! | I2C0 SDA    | 8     | Status display                     |
//! | I2C0 SCL    | 9     | Status display                     |
//! | LED         | 25    | On-board LED (alive indicator)     |
//!
//! # Architecture
//!
//! Core 0 runs the timing-critical path: input polling, SOCD cleaning,
//! game-mode mapping and the active protocol backend. Core 1 runs the
//! best-effort path: the SSD1306 status display. The cores communicate
//! through an embassy-sync [`Watch`](embassy_sync::watch::Watch) carrying
//! [`DiagnosticState`], with "latest value wins" semantics so a slow
//! display can never stall a report.
//!
//! # Features
//!
//! - **`dev-panic`** (default): panic-probe for development (prints panic info via RTT)
//! - **`prod-panic`**: panic-reset for production (silent reset)

#![no_std]

#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("Cannot enable both `dev-panic` and `prod-panic` features");

use crossbox_core::{CycleFrame, ModeId, PrimaryBackend};

pub mod display;
pub mod gpio_input;
pub mod joybus;
pub mod usb;
pub mod viewer;

pub use gpio_input::{GpioInput, PIN_MAPPINGS};

/// Snapshot published from core 0 to the best-effort consumers after
/// every pipeline cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
pub struct DiagnosticState {
    pub backend: PrimaryBackend,
    pub mode: ModeId,
    pub frame: CycleFrame,
}
