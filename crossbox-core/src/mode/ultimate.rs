//! Ultimate game profile: tilt-modifier analog mapping.
//!
//! Simpler than the Melee profile: MOD_X slows the stick to walk/tilt
//! speed, MOD_Y to the slowest usable deflection, and the C buttons
//! always drive the C stick. SOCD policy is plain second-input priority,
//! which is what that game's own controllers are expected to do.

use crate::inputs::Inputs;
use crate::mode::GameMode;
use crate::output::{ControllerOutput, OutputButtons, AXIS_CENTER};
use crate::socd::{SocdCleaner, SocdPolicy};

/// Full cardinal deflection from center.
const FULL: u8 = 100;

/// Deflection with MOD_X held (walk / tilt attacks).
const MOD_X_MAG: u8 = 51;

/// Deflection with MOD_Y held (slow walk).
const MOD_Y_MAG: u8 = 33;

/// Ultimate remapping state machine.
pub struct UltimateMode {
    socd: SocdCleaner,
}

impl UltimateMode {
    /// The profile's standard SOCD policy.
    pub const SOCD: SocdPolicy = SocdPolicy::SecondInputPriority;

    #[must_use]
    pub const fn new(policy: SocdPolicy) -> Self {
        Self {
            socd: SocdCleaner::new(policy),
        }
    }

    #[inline]
    fn axis(negative: bool, positive: bool, magnitude: u8) -> u8 {
        match (negative, positive) {
            (true, false) => AXIS_CENTER - magnitude,
            (false, true) => AXIS_CENTER + magnitude,
            _ => AXIS_CENTER,
        }
    }
}

impl Default for UltimateMode {
    fn default() -> Self {
        Self::new(Self::SOCD)
    }
}

impl GameMode for UltimateMode {
    fn frame(&mut self, raw: Inputs) -> ControllerOutput {
        let cleaned = self.socd.clean(raw);

        let mut out = ControllerOutput::neutral();
        let b = &mut out.buttons;
        b.set(OutputButtons::A, cleaned.contains(Inputs::A));
        b.set(OutputButtons::B, cleaned.contains(Inputs::B));
        b.set(OutputButtons::X, cleaned.contains(Inputs::X));
        b.set(OutputButtons::Y, cleaned.contains(Inputs::Y));
        b.set(OutputButtons::Z, cleaned.contains(Inputs::Z));
        b.set(OutputButtons::L, cleaned.contains(Inputs::L));
        b.set(
            OutputButtons::R,
            cleaned.intersects(Inputs::R | Inputs::LIGHT_SHIELD | Inputs::MID_SHIELD),
        );
        b.set(OutputButtons::START, cleaned.contains(Inputs::START));
        b.set(OutputButtons::SELECT, cleaned.contains(Inputs::SELECT));
        b.set(OutputButtons::HOME, cleaned.contains(Inputs::HOME));

        let magnitude = if cleaned.contains(Inputs::MOD_X) {
            MOD_X_MAG
        } else if cleaned.contains(Inputs::MOD_Y) {
            MOD_Y_MAG
        } else {
            FULL
        };
        out.stick_x = Self::axis(
            cleaned.contains(Inputs::LEFT),
            cleaned.contains(Inputs::RIGHT),
            magnitude,
        );
        out.stick_y = Self::axis(
            cleaned.contains(Inputs::DOWN),
            cleaned.contains(Inputs::UP),
            magnitude,
        );
        out.cstick_x = Self::axis(
            cleaned.contains(Inputs::C_LEFT),
            cleaned.contains(Inputs::C_RIGHT),
            FULL,
        );
        out.cstick_y = Self::axis(
            cleaned.contains(Inputs::C_DOWN),
            cleaned.contains(Inputs::C_UP),
            FULL,
        );

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_and_modified_deflection() {
        let mut mode = UltimateMode::default();
        let frame = mode.frame(Inputs::RIGHT);
        assert_eq!(frame.stick_x, AXIS_CENTER + FULL);

        let frame = mode.frame(Inputs::RIGHT | Inputs::MOD_X);
        assert_eq!(frame.stick_x, AXIS_CENTER + MOD_X_MAG);

        let frame = mode.frame(Inputs::RIGHT | Inputs::MOD_Y);
        assert_eq!(frame.stick_x, AXIS_CENTER + MOD_Y_MAG);
    }

    #[test]
    fn second_input_priority_reactivates() {
        let mut mode = UltimateMode::default();
        mode.frame(Inputs::LEFT);
        let frame = mode.frame(Inputs::LEFT | Inputs::RIGHT);
        assert_eq!(frame.stick_x, AXIS_CENTER + FULL);
        // Plain 2IP: releasing the winner re-activates the older press.
        let frame = mode.frame(Inputs::LEFT);
        assert_eq!(frame.stick_x, AXIS_CENTER - FULL);
    }

    #[test]
    fn shields_are_plain_r_presses() {
        let mut mode = UltimateMode::default();
        let frame = mode.frame(Inputs::LIGHT_SHIELD);
        assert!(frame.buttons.contains(OutputButtons::R));
        assert_eq!(frame.trigger_r, 0);
    }

    #[test]
    fn c_buttons_drive_c_stick() {
        let mut mode = UltimateMode::default();
        let frame = mode.frame(Inputs::C_UP);
        assert_eq!(frame.cstick_y, AXIS_CENTER + FULL);
        assert_eq!(frame.cstick_x, AXIS_CENTER);
    }
}
