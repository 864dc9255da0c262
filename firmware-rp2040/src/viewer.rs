//! Auxiliary input viewer over USB CDC-ACM.
//!
//! Streams one ASCII line per pipeline cycle so desktop overlay tools
//! can show the live button state. Strictly best-effort: it reads from
//! the diagnostic watch, so a slow or absent reader only ever misses
//! frames, it can never back-pressure the report path.

use core::fmt::Write;

use crate::DiagnosticState;
use defmt::info;
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::watch::Receiver;
use embassy_usb::class::cdc_acm::CdcAcmClass;
use heapless::String;

/// One viewer line. Fits a single full-speed packet so a write is never
/// split.
fn format_line(state: &DiagnosticState) -> String<64> {
    let mut line = String::new();
    let mode = match state.mode {
        crossbox_core::ModeId::Melee => "melee",
        crossbox_core::ModeId::Ultimate => "ult",
    };
    let frame = &state.frame;
    // A formatting error on a heapless string means truncation; the
    // capacity is sized for the longest possible line, so ignore it.
    let _ = write!(
        line,
        "{} {:06x} {:03} {:03} {:03} {:03}\r\n",
        mode,
        frame.raw.0,
        frame.output.stick_x,
        frame.output.stick_y,
        frame.output.cstick_x,
        frame.output.cstick_y,
    );
    line
}

/// Drive the viewer: wait for a terminal, then stream state lines until
/// it disconnects.
pub async fn run(
    mut class: CdcAcmClass<'static, Driver<'static, USB>>,
    mut diag: Receiver<'static, CriticalSectionRawMutex, DiagnosticState, 2>,
) -> ! {
    loop {
        class.wait_connection().await;
        info!("viewer: terminal connected");
        loop {
            let state = diag.changed().await;
            let line = format_line(&state);
            if class.write_packet(line.as_bytes()).await.is_err() {
                break;
            }
        }
        info!("viewer: terminal disconnected");
    }
}
