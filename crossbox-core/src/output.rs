//! Protocol-agnostic logical output frame.

use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

/// Stick/trigger axis center value (GameCube convention, 128-centered).
pub const AXIS_CENTER: u8 = 128;

/// Logical digital button states as a bitfield.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputButtons(pub u16);

impl OutputButtons {
    pub const A: Self = Self(1 << 0);
    pub const B: Self = Self(1 << 1);
    pub const X: Self = Self(1 << 2);
    pub const Y: Self = Self(1 << 3);
    pub const Z: Self = Self(1 << 4);
    pub const L: Self = Self(1 << 5);
    pub const R: Self = Self(1 << 6);
    pub const START: Self = Self(1 << 7);
    pub const SELECT: Self = Self(1 << 8);
    pub const HOME: Self = Self(1 << 9);
    pub const DPAD_UP: Self = Self(1 << 10);
    pub const DPAD_DOWN: Self = Self(1 << 11);
    pub const DPAD_LEFT: Self = Self(1 << 12);
    pub const DPAD_RIGHT: Self = Self(1 << 13);

    /// No buttons pressed.
    pub const NONE: Self = Self(0);

    /// Check if the given button(s) are pressed.
    #[inline]
    #[must_use]
    pub const fn contains(self, buttons: OutputButtons) -> bool {
        (self.0 & buttons.0) == buttons.0
    }

    /// Set or clear button(s).
    #[inline]
    pub fn set(&mut self, buttons: OutputButtons, pressed: bool) {
        if pressed {
            self.0 |= buttons.0;
        } else {
            self.0 &= !buttons.0;
        }
    }
}

impl BitOr for OutputButtons {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for OutputButtons {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for OutputButtons {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for OutputButtons {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl Not for OutputButtons {
    type Output = Self;

    #[inline]
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

/// Protocol-agnostic representation of what the controller currently
/// reports: digital buttons plus 128-centered analog axes.
///
/// Produced by a game mode from a cleaned snapshot; consumed by exactly
/// one protocol sink per cycle. Every protocol codec (Joybus, USB HID
/// variants, input viewer) translates from this frame alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerOutput {
    pub buttons: OutputButtons,
    pub stick_x: u8,
    pub stick_y: u8,
    pub cstick_x: u8,
    pub cstick_y: u8,
    pub trigger_l: u8,
    pub trigger_r: u8,
}

impl ControllerOutput {
    /// Neutral frame: no buttons pressed, sticks centered, triggers released.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            buttons: OutputButtons::NONE,
            stick_x: AXIS_CENTER,
            stick_y: AXIS_CENTER,
            cstick_x: AXIS_CENTER,
            cstick_y: AXIS_CENTER,
            trigger_l: 0,
            trigger_r: 0,
        }
    }

    /// Stick X as a signed offset from center (N64/HID convention).
    #[inline]
    #[must_use]
    pub const fn stick_x_signed(&self) -> i8 {
        (self.stick_x as i16 - AXIS_CENTER as i16) as i8
    }

    /// Stick Y as a signed offset from center.
    #[inline]
    #[must_use]
    pub const fn stick_y_signed(&self) -> i8 {
        (self.stick_y as i16 - AXIS_CENTER as i16) as i8
    }

    /// C-stick X as a signed offset from center.
    #[inline]
    #[must_use]
    pub const fn cstick_x_signed(&self) -> i8 {
        (self.cstick_x as i16 - AXIS_CENTER as i16) as i8
    }

    /// C-stick Y as a signed offset from center.
    #[inline]
    #[must_use]
    pub const fn cstick_y_signed(&self) -> i8 {
        (self.cstick_y as i16 - AXIS_CENTER as i16) as i8
    }
}

impl Default for ControllerOutput {
    fn default() -> Self {
        Self::neutral()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_frame_is_centered() {
        let frame = ControllerOutput::neutral();
        assert_eq!(frame.buttons, OutputButtons::NONE);
        assert_eq!(frame.stick_x, AXIS_CENTER);
        assert_eq!(frame.stick_x_signed(), 0);
        assert_eq!(frame.trigger_l, 0);
    }

    #[test]
    fn signed_axis_conversion() {
        let mut frame = ControllerOutput::neutral();
        frame.stick_x = 228;
        frame.stick_y = 28;
        assert_eq!(frame.stick_x_signed(), 100);
        assert_eq!(frame.stick_y_signed(), -100);
    }
}
