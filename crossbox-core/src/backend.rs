//! Per-cycle pipeline driver and boot-time backend selection.
//!
//! A [`Pipeline`] owns the input source and the active game mode and runs
//! the raw-poll → SOCD → mode-map chain once per cycle; the protocol sink
//! (Joybus engine, USB HID writer, input viewer) is a separate strategy
//! object that consumes the resulting frame. Mode replacement is a value
//! swap applied between cycles, never during one.

use crate::inputs::Inputs;
use crate::mode::{mode_from_combo, ActiveMode, GameMode, ModeId};
use crate::output::ControllerOutput;
use crate::source::InputSource;
use joybus_proto::ConnectedConsole;

/// One pipeline cycle's products.
///
/// `raw` feeds diagnostics (viewer backend, status display); `output` is
/// consumed by exactly one primary protocol sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleFrame {
    pub raw: Inputs,
    pub output: ControllerOutput,
}

/// Input-to-output pipeline: input source(s) plus the active game mode.
pub struct Pipeline<S> {
    source: S,
    mode: ActiveMode,
}

impl<S: InputSource> Pipeline<S> {
    #[must_use]
    pub fn new(source: S, mode: ActiveMode) -> Self {
        Self { source, mode }
    }

    /// Run one full cycle: poll, clean, map.
    pub fn cycle(&mut self) -> CycleFrame {
        let raw = self.source.poll();
        let output = self.mode.frame(raw);
        CycleFrame { raw, output }
    }

    /// Check the mode-select combo and replace the active mode if it
    /// requests a different profile.
    ///
    /// Called between cycles only; the replacement mode starts with
    /// fresh internal state.
    pub fn check_mode_switch(&mut self, raw: Inputs) {
        if let Some(id) = mode_from_combo(raw) {
            if id != self.mode.id() {
                self.mode = ActiveMode::from_id(id);
            }
        }
    }

    /// Replace the active mode outright.
    pub fn set_mode(&mut self, mode: ActiveMode) {
        self.mode = mode;
    }

    /// Identify the active game profile.
    #[must_use]
    pub fn mode_id(&self) -> ModeId {
        self.mode.id()
    }

    /// Get a mutable reference to the input source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

/// USB device personality for host-attached operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsbVariant {
    /// Xbox-style gamepad; the default when nothing else is selected.
    XInput,
    /// Generic DirectInput gamepad.
    DInput,
    /// Switch Pro-Controller-like gamepad.
    Switch,
}

/// The primary protocol backend chosen at boot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PrimaryBackend {
    GameCube,
    N64,
    Usb(UsbVariant),
}

/// Boot-time backend plan: which primary backend to construct, whether
/// the auxiliary input viewer runs alongside it, and the default mode.
///
/// Invariant: exactly one primary backend. Console-attached operation
/// never gets a viewer, because the Joybus timing budget is not shared
/// with non-essential work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootPlan {
    pub primary: PrimaryBackend,
    pub viewer: bool,
    pub default_mode: ModeId,
}

/// Select the backend set from the detection result and the boot-time
/// button holds.
///
/// Hold table with no console detected: X → Switch, Z → DInput,
/// otherwise XInput. The Switch backend runs without the viewer (its
/// host polls tighter than the other USB variants); XInput and DInput
/// run with it.
#[must_use]
pub fn select_backends(console: ConnectedConsole, holds: Inputs) -> BootPlan {
    match console {
        ConnectedConsole::GameCube => BootPlan {
            primary: PrimaryBackend::GameCube,
            viewer: false,
            default_mode: ModeId::Melee,
        },
        ConnectedConsole::N64 => BootPlan {
            primary: PrimaryBackend::N64,
            viewer: false,
            default_mode: ModeId::Melee,
        },
        ConnectedConsole::None => {
            if holds.contains(Inputs::X) {
                BootPlan {
                    primary: PrimaryBackend::Usb(UsbVariant::Switch),
                    viewer: false,
                    default_mode: ModeId::Ultimate,
                }
            } else if holds.contains(Inputs::Z) {
                BootPlan {
                    primary: PrimaryBackend::Usb(UsbVariant::DInput),
                    viewer: true,
                    default_mode: ModeId::Melee,
                }
            } else {
                BootPlan {
                    primary: PrimaryBackend::Usb(UsbVariant::XInput),
                    viewer: true,
                    default_mode: ModeId::Melee,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::{MeleeConfig, MeleeMode};
    use crate::output::{OutputButtons, AXIS_CENTER};
    use crate::socd::SocdPolicy;

    /// Scripted input source for pipeline tests.
    struct Script {
        steps: &'static [Inputs],
        index: usize,
    }

    impl Script {
        fn new(steps: &'static [Inputs]) -> Self {
            Self { steps, index: 0 }
        }
    }

    impl InputSource for Script {
        fn poll(&mut self) -> Inputs {
            let raw = self.steps[self.index.min(self.steps.len() - 1)];
            self.index += 1;
            raw
        }
    }

    #[test]
    fn neutral_policy_end_to_end() {
        // Left and right both pressed, policy = neutral: the frame
        // reports neither direction.
        static STEPS: [Inputs; 1] = [Inputs(Inputs::LEFT.0 | Inputs::RIGHT.0)];
        let mode = ActiveMode::Melee(MeleeMode::new(
            SocdPolicy::Neutral,
            MeleeConfig::default(),
        ));
        let mut pipeline = Pipeline::new(Script::new(&STEPS), mode);
        let frame = pipeline.cycle();
        assert_eq!(frame.output.stick_x, AXIS_CENTER);
    }

    #[test]
    fn unconflicted_direction_end_to_end() {
        static STEPS: [Inputs; 1] = [Inputs::UP];
        let mut pipeline = Pipeline::new(
            Script::new(&STEPS),
            ActiveMode::from_id(ModeId::Melee),
        );
        let frame = pipeline.cycle();
        assert_eq!(frame.output.stick_y, AXIS_CENTER + 100);
        assert_eq!(frame.output.stick_x, AXIS_CENTER);
    }

    #[test]
    fn mode_switch_between_cycles() {
        static STEPS: [Inputs; 2] = [Inputs::A, Inputs::A];
        let mut pipeline = Pipeline::new(
            Script::new(&STEPS),
            ActiveMode::from_id(ModeId::Melee),
        );
        assert_eq!(pipeline.mode_id(), ModeId::Melee);

        pipeline.check_mode_switch(Inputs::MOD_X | Inputs::START | Inputs::B);
        assert_eq!(pipeline.mode_id(), ModeId::Ultimate);

        // The combo for the already-active mode leaves it untouched.
        pipeline.check_mode_switch(Inputs::MOD_X | Inputs::START | Inputs::B);
        assert_eq!(pipeline.mode_id(), ModeId::Ultimate);

        let frame = pipeline.cycle();
        assert!(frame.output.buttons.contains(OutputButtons::A));
    }

    #[test]
    fn boot_with_console_builds_single_backend() {
        let plan = select_backends(ConnectedConsole::GameCube, Inputs::NONE);
        assert_eq!(plan.primary, PrimaryBackend::GameCube);
        assert!(!plan.viewer);
        assert_eq!(plan.default_mode, ModeId::Melee);

        // Holds are ignored when a console is attached.
        let plan = select_backends(ConnectedConsole::N64, Inputs::X | Inputs::Z);
        assert_eq!(plan.primary, PrimaryBackend::N64);
        assert!(!plan.viewer);
    }

    #[test]
    fn boot_without_console_selects_usb_variant_by_hold() {
        let plan = select_backends(ConnectedConsole::None, Inputs::NONE);
        assert_eq!(plan.primary, PrimaryBackend::Usb(UsbVariant::XInput));
        assert!(plan.viewer);

        let plan = select_backends(ConnectedConsole::None, Inputs::Z);
        assert_eq!(plan.primary, PrimaryBackend::Usb(UsbVariant::DInput));
        assert!(plan.viewer);

        let plan = select_backends(ConnectedConsole::None, Inputs::X);
        assert_eq!(plan.primary, PrimaryBackend::Usb(UsbVariant::Switch));
        assert!(!plan.viewer);
        assert_eq!(plan.default_mode, ModeId::Ultimate);
    }
}
