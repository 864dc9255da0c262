//! Raw input snapshot and pin-mapping configuration.

use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

/// Raw input snapshot represented as a bitfield.
///
/// One bit per physical control of the box layout. A snapshot is produced
/// once per poll cycle by an input source and is immutable afterwards;
/// cleaning and mapping produce new values instead of mutating it.
///
/// # Example
///
/// ```
/// use crossbox_core::Inputs;
///
/// let raw = Inputs::LEFT | Inputs::MOD_X;
/// assert!(raw.contains(Inputs::LEFT));
/// assert!(!raw.contains(Inputs::RIGHT));
/// ```
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Inputs(pub u32);

impl Inputs {
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
    pub const LEFT: Self = Self(1 << 10);
    pub const RIGHT: Self = Self(1 << 11);
    pub const DOWN: Self = Self(1 << 12);
    pub const UP: Self = Self(1 << 13);
    pub const MOD_X: Self = Self(1 << 14);
    pub const MOD_Y: Self = Self(1 << 15);
    pub const C_UP: Self = Self(1 << 16);
    pub const C_DOWN: Self = Self(1 << 17);
    pub const C_LEFT: Self = Self(1 << 18);
    pub const C_RIGHT: Self = Self(1 << 19);
    pub const LIGHT_SHIELD: Self = Self(1 << 20);
    pub const MID_SHIELD: Self = Self(1 << 21);

    /// No inputs pressed.
    pub const NONE: Self = Self(0);

    /// Check if all of the given input bit(s) are pressed.
    #[inline]
    #[must_use]
    pub const fn contains(self, inputs: Inputs) -> bool {
        (self.0 & inputs.0) == inputs.0
    }

    /// Check if any of the given input bit(s) are pressed.
    #[inline]
    #[must_use]
    pub const fn intersects(self, inputs: Inputs) -> bool {
        (self.0 & inputs.0) != 0
    }

    /// Set or clear input bit(s).
    #[inline]
    pub fn set(&mut self, inputs: Inputs, pressed: bool) {
        if pressed {
            self.0 |= inputs.0;
        } else {
            self.0 &= !inputs.0;
        }
    }

    /// Check if no inputs are pressed.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Inputs {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Inputs {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Inputs {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for Inputs {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl Not for Inputs {
    type Output = Self;

    #[inline]
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

/// Association between one physical input line and one snapshot bit.
///
/// Boards define a `const` table of these; the table is validated once at
/// initialization and never mutated afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinMapping {
    pub input: Inputs,
    pub pin: u8,
}

impl PinMapping {
    #[must_use]
    pub const fn new(input: Inputs, pin: u8) -> Self {
        Self { input, pin }
    }
}

/// Error type for configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The mapping table is empty.
    Empty,
    /// Two mappings claim the same physical pin.
    DuplicatePin(u8),
    /// Two mappings claim the same input bit.
    DuplicateInput(Inputs),
}

/// Validate a pin-mapping table before entering the input loop.
///
/// Any defect here is unrecoverable at runtime, so initialization must
/// fail before the time-critical loop starts.
pub fn validate_mappings(mappings: &[PinMapping]) -> Result<(), ConfigError> {
    if mappings.is_empty() {
        return Err(ConfigError::Empty);
    }
    for (i, m) in mappings.iter().enumerate() {
        for other in &mappings[i + 1..] {
            if m.pin == other.pin {
                return Err(ConfigError::DuplicatePin(m.pin));
            }
            if m.input == other.input {
                return Err(ConfigError::DuplicateInput(m.input));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitwise_ops() {
        let mut inputs = Inputs::LEFT | Inputs::MOD_X;
        assert!(inputs.contains(Inputs::LEFT));
        assert!(inputs.contains(Inputs::LEFT | Inputs::MOD_X));
        assert!(!inputs.contains(Inputs::LEFT | Inputs::RIGHT));
        assert!(inputs.intersects(Inputs::LEFT | Inputs::RIGHT));

        inputs.set(Inputs::LEFT, false);
        assert!(!inputs.contains(Inputs::LEFT));
        assert!(!inputs.is_empty());
    }

    #[test]
    fn valid_mapping_table() {
        let mappings = [
            PinMapping::new(Inputs::A, 14),
            PinMapping::new(Inputs::B, 26),
            PinMapping::new(Inputs::LEFT, 4),
        ];
        assert_eq!(validate_mappings(&mappings), Ok(()));
    }

    #[test]
    fn empty_table_rejected() {
        assert_eq!(validate_mappings(&[]), Err(ConfigError::Empty));
    }

    #[test]
    fn duplicate_pin_rejected() {
        let mappings = [
            PinMapping::new(Inputs::A, 14),
            PinMapping::new(Inputs::B, 14),
        ];
        assert_eq!(validate_mappings(&mappings), Err(ConfigError::DuplicatePin(14)));
    }

    #[test]
    fn duplicate_input_rejected() {
        let mappings = [
            PinMapping::new(Inputs::A, 14),
            PinMapping::new(Inputs::A, 15),
        ];
        assert_eq!(
            validate_mappings(&mappings),
            Err(ConfigError::DuplicateInput(Inputs::A))
        );
    }
}
