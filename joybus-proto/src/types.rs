//! Wire report layouts for GameCube and N64 controllers.
//!
//! Both layouts are fixed-size, MSB-first byte images. The structs here
//! keep one named field per wire bit so game logic never has to reason
//! about bit positions; packing happens in one place per console.

/// Identity bytes returned to a GameCube probe (`0x00`) or reset (`0xFF`).
///
/// `0x09 0x00` identifies a standard wired controller; the third byte
/// carries status flags and is zero for a freshly powered controller.
pub const GC_IDENTITY: [u8; 3] = [0x09, 0x00, 0x03];

/// Identity bytes returned to an N64 info (`0x00`) or reset (`0xFF`)
/// command. `0x05 0x00` is a standard controller; `0x02` means no
/// controller pak is inserted.
pub const N64_IDENTITY: [u8; 3] = [0x05, 0x00, 0x02];

/// GameCube controller poll report (8 bytes).
///
/// Byte layout (see the standard controller documentation):
///
/// ```text
/// byte 0: 0 0 0 START Y X B A
/// byte 1: 1 L R Z D-UP D-DOWN D-RIGHT D-LEFT
/// byte 2: stick X        byte 3: stick Y
/// byte 4: C-stick X      byte 5: C-stick Y
/// byte 6: L analog       byte 7: R analog
/// ```
///
/// Axes are unsigned with 128 as center.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GcReport {
    pub a: bool,
    pub b: bool,
    pub x: bool,
    pub y: bool,
    pub start: bool,
    pub dpad_left: bool,
    pub dpad_right: bool,
    pub dpad_down: bool,
    pub dpad_up: bool,
    pub z: bool,
    pub r: bool,
    pub l: bool,
    pub stick_x: u8,
    pub stick_y: u8,
    pub cstick_x: u8,
    pub cstick_y: u8,
    pub trigger_l: u8,
    pub trigger_r: u8,
}

impl Default for GcReport {
    fn default() -> Self {
        Self::neutral()
    }
}

impl GcReport {
    /// Size of the poll report in bytes.
    pub const SIZE: usize = 8;

    /// Neutral report: no buttons pressed, sticks centered, triggers released.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            a: false,
            b: false,
            x: false,
            y: false,
            start: false,
            dpad_left: false,
            dpad_right: false,
            dpad_down: false,
            dpad_up: false,
            z: false,
            r: false,
            l: false,
            stick_x: 128,
            stick_y: 128,
            cstick_x: 128,
            cstick_y: 128,
            trigger_l: 0,
            trigger_r: 0,
        }
    }

    /// Pack the report into its 8-byte wire image.
    #[must_use]
    pub fn as_bytes(&self) -> [u8; Self::SIZE] {
        let byte0 = (self.a as u8)
            | (self.b as u8) << 1
            | (self.x as u8) << 2
            | (self.y as u8) << 3
            | (self.start as u8) << 4;
        // Bit 7 of byte 1 is always set on the wire.
        let byte1 = 0x80
            | (self.dpad_left as u8)
            | (self.dpad_right as u8) << 1
            | (self.dpad_down as u8) << 2
            | (self.dpad_up as u8) << 3
            | (self.z as u8) << 4
            | (self.r as u8) << 5
            | (self.l as u8) << 6;
        [
            byte0,
            byte1,
            self.stick_x,
            self.stick_y,
            self.cstick_x,
            self.cstick_y,
            self.trigger_l,
            self.trigger_r,
        ]
    }
}

/// GameCube origin report (10 bytes), returned to `0x41`/`0x42`.
///
/// The console uses it to calibrate stick centers. It is the neutral poll
/// report followed by two analog-button bytes (zero on a digital pad).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GcOrigin {
    pub report: GcReport,
}

impl GcOrigin {
    /// Size of the origin report in bytes.
    pub const SIZE: usize = 10;

    #[must_use]
    pub const fn new() -> Self {
        Self {
            report: GcReport::neutral(),
        }
    }

    /// Pack the origin report into its 10-byte wire image.
    #[must_use]
    pub fn as_bytes(&self) -> [u8; Self::SIZE] {
        let r = self.report.as_bytes();
        [r[0], r[1], r[2], r[3], r[4], r[5], r[6], r[7], 0x00, 0x00]
    }
}

impl Default for GcOrigin {
    fn default() -> Self {
        Self::new()
    }
}

/// N64 controller poll report (4 bytes).
///
/// Byte layout (n64brew "Standard Controller"):
///
/// ```text
/// byte 0: A B Z START D-UP D-DOWN D-LEFT D-RIGHT
/// byte 1: RESET 0 L R C-UP C-DOWN C-LEFT C-RIGHT
/// byte 2: stick X (signed)   byte 3: stick Y (signed)
/// ```
///
/// The reset bit reports the L+R+START recalibration chord; the console
/// expects the stick axes to read zero while it is set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct N64Report {
    pub a: bool,
    pub b: bool,
    pub z: bool,
    pub start: bool,
    pub dpad_up: bool,
    pub dpad_down: bool,
    pub dpad_left: bool,
    pub dpad_right: bool,
    pub reset: bool,
    pub l: bool,
    pub r: bool,
    pub c_up: bool,
    pub c_down: bool,
    pub c_left: bool,
    pub c_right: bool,
    pub stick_x: i8,
    pub stick_y: i8,
}

impl N64Report {
    /// Size of the poll report in bytes.
    pub const SIZE: usize = 4;

    /// Neutral report: no buttons pressed, stick centered.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            a: false,
            b: false,
            z: false,
            start: false,
            dpad_up: false,
            dpad_down: false,
            dpad_left: false,
            dpad_right: false,
            reset: false,
            l: false,
            r: false,
            c_up: false,
            c_down: false,
            c_left: false,
            c_right: false,
            stick_x: 0,
            stick_y: 0,
        }
    }

    /// Pack the report into its 4-byte wire image.
    ///
    /// Opposing d-pad directions are never reported simultaneously on
    /// real hardware; SOCD cleaning upstream guarantees that here. The
    /// reset chord (L+R+START) sets the reset bit and zeroes the stick,
    /// matching original controller behavior.
    #[must_use]
    pub fn as_bytes(&self) -> [u8; Self::SIZE] {
        let reset = self.reset || (self.l && self.r && self.start);
        let byte0 = (self.dpad_right as u8)
            | (self.dpad_left as u8) << 1
            | (self.dpad_down as u8) << 2
            | (self.dpad_up as u8) << 3
            | (self.start as u8) << 4
            | (self.z as u8) << 5
            | (self.b as u8) << 6
            | (self.a as u8) << 7;
        let byte1 = (self.c_right as u8)
            | (self.c_left as u8) << 1
            | (self.c_down as u8) << 2
            | (self.c_up as u8) << 3
            | (self.r as u8) << 4
            | (self.l as u8) << 5
            | (reset as u8) << 7;
        let (x, y) = if reset { (0, 0) } else { (self.stick_x, self.stick_y) };
        [byte0, byte1, x as u8, y as u8]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gc_neutral_report_bytes() {
        let bytes = GcReport::neutral().as_bytes();
        // No buttons, byte 1 bit 7 set, centered axes, released triggers.
        assert_eq!(bytes, [0x00, 0x80, 128, 128, 128, 128, 0, 0]);
    }

    #[test]
    fn gc_button_bit_positions() {
        let mut report = GcReport::neutral();
        report.a = true;
        report.start = true;
        report.l = true;
        report.dpad_left = true;
        let bytes = report.as_bytes();
        assert_eq!(bytes[0], 0x11); // A | START
        assert_eq!(bytes[1], 0x80 | 0x40 | 0x01); // always-set | L | D-LEFT
    }

    #[test]
    fn gc_origin_is_neutral_report_plus_padding() {
        let bytes = GcOrigin::new().as_bytes();
        assert_eq!(&bytes[..8], &GcReport::neutral().as_bytes());
        assert_eq!(&bytes[8..], &[0x00, 0x00]);
    }

    #[test]
    fn n64_button_bit_positions() {
        let mut report = N64Report::neutral();
        report.a = true;
        report.z = true;
        report.dpad_up = true;
        report.c_left = true;
        report.stick_x = -128;
        report.stick_y = 127;
        let bytes = report.as_bytes();
        assert_eq!(bytes[0], 0x80 | 0x20 | 0x08); // A | Z | D-UP
        assert_eq!(bytes[1], 0x02); // C-LEFT
        assert_eq!(bytes[2], 0x80);
        assert_eq!(bytes[3], 0x7F);
    }

    #[test]
    fn n64_reset_chord_sets_reset_and_zeroes_stick() {
        let mut report = N64Report::neutral();
        report.l = true;
        report.r = true;
        report.start = true;
        report.stick_x = 50;
        report.stick_y = -50;
        let bytes = report.as_bytes();
        assert_eq!(bytes[1] & 0x80, 0x80);
        assert_eq!(bytes[2], 0);
        assert_eq!(bytes[3], 0);
    }
}
