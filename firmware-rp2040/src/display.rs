//! SSD1306 status display, driven from core 1.
//!
//! Shows the active backend, game mode and stick state. Runs entirely
//! off the diagnostic watch: every redraw renders the latest published
//! snapshot, and however long a redraw takes, core 0 never waits.

use core::fmt::Write;

use crate::DiagnosticState;
use crossbox_core::{ModeId, PrimaryBackend, UsbVariant};
use defmt::warn;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::watch::Receiver;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use heapless::String;
use ssd1306::mode::DisplayConfig;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};

fn backend_label(backend: PrimaryBackend) -> &'static str {
    match backend {
        PrimaryBackend::GameCube => "GameCube",
        PrimaryBackend::N64 => "N64",
        PrimaryBackend::Usb(UsbVariant::XInput) => "USB XInput",
        PrimaryBackend::Usb(UsbVariant::DInput) => "USB DInput",
        PrimaryBackend::Usb(UsbVariant::Switch) => "USB Switch",
    }
}

fn mode_label(mode: ModeId) -> &'static str {
    match mode {
        ModeId::Melee => "Melee",
        ModeId::Ultimate => "Ultimate",
    }
}

/// Drive the status display until the firmware resets.
///
/// A missing or failing display disables itself: this is the best-effort
/// core, so errors are logged and the task simply stops redrawing.
pub async fn run(
    i2c: I2c<'static, I2C0, Blocking>,
    mut diag: Receiver<'static, CriticalSectionRawMutex, DiagnosticState, 2>,
) {
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x32, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    if display.init().is_err() {
        warn!("display: init failed, status display disabled");
        return;
    }

    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

    loop {
        let state = diag.changed().await;

        let mut line1: String<24> = String::new();
        let mut line2: String<24> = String::new();
        let _ = write!(line1, "{} {}", backend_label(state.backend), mode_label(state.mode));
        let frame = &state.frame;
        let _ = write!(
            line2,
            "A {:03},{:03} C {:03},{:03}",
            frame.output.stick_x, frame.output.stick_y, frame.output.cstick_x, frame.output.cstick_y,
        );

        display.clear_buffer();
        let l1 = Text::with_baseline(&line1, Point::new(0, 0), style, Baseline::Top)
            .draw(&mut display);
        let l2 = Text::with_baseline(&line2, Point::new(0, 12), style, Baseline::Top)
            .draw(&mut display);
        if l1.is_err() || l2.is_err() || display.flush().is_err() {
            warn!("display: draw failed, status display disabled");
            return;
        }
    }
}
