//! Platform-independent controller brain: raw input snapshots in,
//! logical controller frames out.
//!
//! The crate is `no_std` by default so the firmware can link it
//! directly; the `std` feature exists for host-side tests. Everything
//! here is deterministic and allocation-free: the firmware drives a
//! [`backend::Pipeline`] from its timing-critical loop and hands the
//! resulting [`backend::CycleFrame`] to whichever protocol sink the
//! boot-time [`backend::BootPlan`] selected.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod backend;
pub mod inputs;
pub mod mode;
pub mod output;
pub mod socd;
pub mod source;

pub use backend::{select_backends, BootPlan, CycleFrame, Pipeline, PrimaryBackend, UsbVariant};
pub use inputs::{validate_mappings, ConfigError, Inputs, PinMapping};
pub use mode::{ActiveMode, GameMode, MeleeConfig, MeleeMode, ModeId, UltimateMode};
pub use output::{ControllerOutput, OutputButtons, AXIS_CENTER};
pub use socd::{SocdCleaner, SocdPolicy};
pub use source::{Aggregate, InputSource};
