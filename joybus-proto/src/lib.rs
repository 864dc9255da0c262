//! Joybus protocol types, command decoding, and report encoding.
//!
//! Joybus is the single-wire, half-duplex serial protocol spoken by the
//! GameCube and the N64 to their controllers. The console is always the
//! initiator: it transmits a command frame, releases the line, and expects
//! the controller's response to begin within a few microseconds of the
//! command's stop bit.
//!
//! This crate provides everything above the physical line:
//!
//! - [`types`]: wire report layouts ([`GcReport`], [`N64Report`]) and the
//!   boot-time detection result ([`ConnectedConsole`])
//! - [`command`]: command frame decoding ([`GcCommand`], [`N64Command`])
//! - [`bits`]: bit-cell timing, pulse classification, and TX word packing
//! - [`detect`]: console idle-signature classification
//!
//! # Wire format
//!
//! Every bit occupies a 4 µs cell that starts with a falling edge:
//!
//! ```text
//! '1': 1 µs low, 3 µs high
//! '0': 3 µs low, 1 µs high
//! ```
//!
//! Bytes are transmitted most-significant-bit first, and every frame ends
//! with a single stop bit (1 µs low). Both consoles use the same bit cell;
//! they differ in command bytes and report layouts.
//!
//! # Example
//!
//! ```
//! use joybus_proto::{parse_gc_command, GcCommand, GcReport};
//!
//! // A GameCube poll command requests an 8-byte report.
//! let cmd = parse_gc_command(&[0x40, 0x03, 0x02]).unwrap();
//! assert!(matches!(cmd, GcCommand::Poll { rumble: false, .. }));
//!
//! let mut report = GcReport::default();
//! report.a = true;
//! let bytes = report.as_bytes();
//! assert_eq!(bytes[0] & 0x01, 0x01);
//! ```
//!
//! # No-std support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.
//! The **`std`** feature enables standard library support for host
//! testing; **`defmt`** enables defmt formatting for embedded logging.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod bits;
pub mod command;
pub mod detect;
pub mod types;

// Re-export main types at crate root
pub use bits::{classify_low_pulse, pack_words, TxFrame, BIT_PERIOD_US, MAX_REPLY_BYTES};
pub use command::{
    gc_command_len, n64_command_len, parse_gc_command, parse_n64_command, CommandError, GcCommand,
    N64Command,
};
pub use detect::{classify_line, ConnectedConsole, DETECT_WINDOW_US};
pub use types::{GcOrigin, GcReport, N64Report, GC_IDENTITY, N64_IDENTITY};
