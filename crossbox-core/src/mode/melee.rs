//! Melee game profile: modifier-based analog coordinate mapping for a
//! 20-button box layout.
//!
//! The direction buttons deflect the control stick fully; the MOD_X and
//! MOD_Y buttons rescale the deflection to the profile's walk/tilt and
//! shallow/steep angle magnitudes. Holding both modifiers activates a
//! d-pad layer on the C buttons, and MOD_X+MOD_Y+SELECT latches that
//! layer until toggled again (profile-local modal state). Light- and
//! mid-shield buttons drive the analog R trigger.

use crate::inputs::Inputs;
use crate::mode::GameMode;
use crate::output::{ControllerOutput, OutputButtons, AXIS_CENTER};
use crate::socd::{SocdCleaner, SocdPolicy};

/// Full cardinal deflection from center.
const FULL: u8 = 100;

/// Horizontal deflection with MOD_X held (walk / shallow wavedash).
const MOD_X_H: u8 = 53;

/// Vertical deflection with MOD_X held.
const MOD_X_V: u8 = 40;

/// Horizontal deflection with MOD_Y held.
const MOD_Y_H: u8 = 27;

/// Vertical deflection with MOD_Y held (steep angles, shield drop).
const MOD_Y_V: u8 = 59;

/// Down deflection for the crouch-walk option select: shallow enough to
/// keep a crouch-walk instead of a dash-back on down-diagonals.
const CROUCH_WALK_V: u8 = 65;

/// Analog R value for light shield.
const LIGHT_SHIELD_R: u8 = 49;

/// Analog R value for mid shield.
const MID_SHIELD_R: u8 = 94;

/// Per-profile tunables, immutable once the mode is constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MeleeConfig {
    /// Enable the crouch-walk option select on down-diagonals.
    pub crouch_walk_os: bool,
}

impl Default for MeleeConfig {
    fn default() -> Self {
        Self {
            crouch_walk_os: false,
        }
    }
}

/// Melee remapping state machine.
pub struct MeleeMode {
    config: MeleeConfig,
    socd: SocdCleaner,
    /// Modal toggle: d-pad layer latched on.
    dpad_locked: bool,
    /// Previous state of the latch chord, for edge detection.
    prev_lock_chord: bool,
}

impl MeleeMode {
    /// The profile's standard SOCD policy.
    pub const SOCD: SocdPolicy = SocdPolicy::SecondInputPriorityNoReactivation;

    #[must_use]
    pub const fn new(policy: SocdPolicy, config: MeleeConfig) -> Self {
        Self {
            config,
            socd: SocdCleaner::new(policy),
            dpad_locked: false,
            prev_lock_chord: false,
        }
    }

    /// Apply a signed offset to a centered axis.
    #[inline]
    fn axis(direction: i8, magnitude: u8) -> u8 {
        match direction {
            1 => AXIS_CENTER + magnitude,
            -1 => AXIS_CENTER - magnitude,
            _ => AXIS_CENTER,
        }
    }

    fn stick(&self, cleaned: Inputs, dpad_layer: bool) -> (u8, u8) {
        let h: i8 = match (cleaned.contains(Inputs::LEFT), cleaned.contains(Inputs::RIGHT)) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        };
        let v: i8 = match (cleaned.contains(Inputs::DOWN), cleaned.contains(Inputs::UP)) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        };

        let mod_x = cleaned.contains(Inputs::MOD_X) && !dpad_layer;
        let mod_y = cleaned.contains(Inputs::MOD_Y) && !dpad_layer;

        let h_mag = if mod_x {
            MOD_X_H
        } else if mod_y {
            MOD_Y_H
        } else {
            FULL
        };
        let mut v_mag = if mod_x {
            MOD_X_V
        } else if mod_y {
            MOD_Y_V
        } else {
            FULL
        };

        // Crouch-walk option select: unmodified down-diagonals use a
        // shallower down deflection so the character keeps crouch-walking.
        if self.config.crouch_walk_os && !mod_x && !mod_y && v == -1 && h != 0 {
            v_mag = CROUCH_WALK_V;
        }

        (Self::axis(h, h_mag), Self::axis(v, v_mag))
    }

    fn cstick(cleaned: Inputs) -> (u8, u8) {
        let h: i8 = match (
            cleaned.contains(Inputs::C_LEFT),
            cleaned.contains(Inputs::C_RIGHT),
        ) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        };
        let v: i8 = match (
            cleaned.contains(Inputs::C_DOWN),
            cleaned.contains(Inputs::C_UP),
        ) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        };
        (Self::axis(h, FULL), Self::axis(v, FULL))
    }
}

impl Default for MeleeMode {
    fn default() -> Self {
        Self::new(Self::SOCD, MeleeConfig::default())
    }
}

impl GameMode for MeleeMode {
    fn frame(&mut self, raw: Inputs) -> ControllerOutput {
        let cleaned = self.socd.clean(raw);

        // D-pad layer latch: MOD_X+MOD_Y+SELECT toggles on the chord's
        // rising edge.
        let lock_chord = cleaned.contains(Inputs::MOD_X | Inputs::MOD_Y | Inputs::SELECT);
        if lock_chord && !self.prev_lock_chord {
            self.dpad_locked = !self.dpad_locked;
        }
        self.prev_lock_chord = lock_chord;

        let dpad_layer =
            self.dpad_locked || cleaned.contains(Inputs::MOD_X | Inputs::MOD_Y);

        let mut out = ControllerOutput::neutral();
        let b = &mut out.buttons;
        b.set(OutputButtons::A, cleaned.contains(Inputs::A));
        b.set(OutputButtons::B, cleaned.contains(Inputs::B));
        b.set(OutputButtons::X, cleaned.contains(Inputs::X));
        b.set(OutputButtons::Y, cleaned.contains(Inputs::Y));
        b.set(OutputButtons::Z, cleaned.contains(Inputs::Z));
        b.set(OutputButtons::L, cleaned.contains(Inputs::L));
        b.set(OutputButtons::R, cleaned.contains(Inputs::R));
        b.set(OutputButtons::START, cleaned.contains(Inputs::START));
        b.set(OutputButtons::SELECT, cleaned.contains(Inputs::SELECT));
        b.set(OutputButtons::HOME, cleaned.contains(Inputs::HOME));

        if dpad_layer {
            // C buttons report as d-pad; the C stick stays neutral.
            b.set(OutputButtons::DPAD_UP, cleaned.contains(Inputs::C_UP));
            b.set(OutputButtons::DPAD_DOWN, cleaned.contains(Inputs::C_DOWN));
            b.set(OutputButtons::DPAD_LEFT, cleaned.contains(Inputs::C_LEFT));
            b.set(OutputButtons::DPAD_RIGHT, cleaned.contains(Inputs::C_RIGHT));
        } else {
            let (cx, cy) = Self::cstick(cleaned);
            out.cstick_x = cx;
            out.cstick_y = cy;
        }

        let (x, y) = self.stick(cleaned, dpad_layer);
        out.stick_x = x;
        out.stick_y = y;

        // Shield analogs on the R trigger; mid shield wins if both held.
        if cleaned.contains(Inputs::MID_SHIELD) {
            out.trigger_r = MID_SHIELD_R;
        } else if cleaned.contains(Inputs::LIGHT_SHIELD) {
            out.trigger_r = LIGHT_SHIELD_R;
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn melee() -> MeleeMode {
        MeleeMode::default()
    }

    #[test]
    fn cardinal_directions_deflect_fully() {
        let mut mode = melee();
        let frame = mode.frame(Inputs::RIGHT);
        assert_eq!(frame.stick_x, AXIS_CENTER + FULL);
        assert_eq!(frame.stick_y, AXIS_CENTER);

        let frame = mode.frame(Inputs::UP);
        assert_eq!(frame.stick_y, AXIS_CENTER + FULL);
    }

    #[test]
    fn mod_x_rescales_deflection() {
        let mut mode = melee();
        let frame = mode.frame(Inputs::RIGHT | Inputs::MOD_X);
        assert_eq!(frame.stick_x, AXIS_CENTER + MOD_X_H);

        let frame = mode.frame(Inputs::UP | Inputs::MOD_X);
        assert_eq!(frame.stick_y, AXIS_CENTER + MOD_X_V);
    }

    #[test]
    fn mod_y_rescales_deflection() {
        let mut mode = melee();
        let frame = mode.frame(Inputs::LEFT | Inputs::MOD_Y);
        assert_eq!(frame.stick_x, AXIS_CENTER - MOD_Y_H);

        let frame = mode.frame(Inputs::DOWN | Inputs::MOD_Y);
        assert_eq!(frame.stick_y, AXIS_CENTER - MOD_Y_V);
    }

    #[test]
    fn socd_conflict_resolves_before_mapping() {
        let mut mode = melee();
        mode.frame(Inputs::LEFT);
        // Right pressed while left held: second input wins.
        let frame = mode.frame(Inputs::LEFT | Inputs::RIGHT);
        assert_eq!(frame.stick_x, AXIS_CENTER + FULL);
        // Right released: no-reactivation keeps the stick neutral.
        let frame = mode.frame(Inputs::LEFT);
        assert_eq!(frame.stick_x, AXIS_CENTER);
    }

    #[test]
    fn crouch_walk_option_select() {
        let mut with_os = MeleeMode::new(
            MeleeMode::SOCD,
            MeleeConfig {
                crouch_walk_os: true,
            },
        );
        let frame = with_os.frame(Inputs::DOWN | Inputs::RIGHT);
        assert_eq!(frame.stick_y, AXIS_CENTER - CROUCH_WALK_V);
        assert_eq!(frame.stick_x, AXIS_CENTER + FULL);

        // Disabled (default): full down-diagonal.
        let mut without = melee();
        let frame = without.frame(Inputs::DOWN | Inputs::RIGHT);
        assert_eq!(frame.stick_y, AXIS_CENTER - FULL);

        // Straight down is unaffected either way.
        let frame = with_os.frame(Inputs::DOWN);
        assert_eq!(frame.stick_y, AXIS_CENTER - FULL);
    }

    #[test]
    fn dpad_layer_while_both_modifiers_held() {
        let mut mode = melee();
        let frame = mode.frame(Inputs::MOD_X | Inputs::MOD_Y | Inputs::C_LEFT);
        assert!(frame.buttons.contains(OutputButtons::DPAD_LEFT));
        assert_eq!(frame.cstick_x, AXIS_CENTER);
        // Modifiers do not rescale the stick while the layer is active.
        let frame = mode.frame(Inputs::MOD_X | Inputs::MOD_Y | Inputs::RIGHT);
        assert_eq!(frame.stick_x, AXIS_CENTER + FULL);
    }

    #[test]
    fn dpad_lock_toggle_latches_and_clears() {
        let mut mode = melee();
        mode.frame(Inputs::MOD_X | Inputs::MOD_Y | Inputs::SELECT);
        mode.frame(Inputs::NONE);
        // Layer stays active without the modifiers.
        let frame = mode.frame(Inputs::C_DOWN);
        assert!(frame.buttons.contains(OutputButtons::DPAD_DOWN));

        // Toggle off again.
        mode.frame(Inputs::MOD_X | Inputs::MOD_Y | Inputs::SELECT);
        mode.frame(Inputs::NONE);
        let frame = mode.frame(Inputs::C_DOWN);
        assert!(!frame.buttons.contains(OutputButtons::DPAD_DOWN));
        assert_eq!(frame.cstick_y, AXIS_CENTER - FULL);
    }

    #[test]
    fn shield_analogs() {
        let mut mode = melee();
        let frame = mode.frame(Inputs::LIGHT_SHIELD);
        assert_eq!(frame.trigger_r, LIGHT_SHIELD_R);
        let frame = mode.frame(Inputs::MID_SHIELD | Inputs::LIGHT_SHIELD);
        assert_eq!(frame.trigger_r, MID_SHIELD_R);
    }

    #[test]
    fn buttons_pass_through() {
        let mut mode = melee();
        let frame = mode.frame(Inputs::A | Inputs::Z | Inputs::START);
        assert!(frame.buttons.contains(OutputButtons::A));
        assert!(frame.buttons.contains(OutputButtons::Z));
        assert!(frame.buttons.contains(OutputButtons::START));
        assert!(!frame.buttons.contains(OutputButtons::B));
    }
}
