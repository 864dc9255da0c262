//! Mode selection from a hold combo on the primary backend's inputs.
//!
//! The combo is checked once per cycle, before the pipeline runs, so a
//! switch always takes effect between cycles and never mid-frame.

use crate::inputs::Inputs;
use crate::mode::ModeId;

/// Map a raw snapshot to a requested game mode, if the snapshot holds a
/// mode-select combo.
///
/// Combo table (MOD_X + START + ...):
///
/// | Held button | Mode     |
/// |-------------|----------|
/// | A           | Melee    |
/// | B           | Ultimate |
#[must_use]
pub fn mode_from_combo(raw: Inputs) -> Option<ModeId> {
    if !raw.contains(Inputs::MOD_X | Inputs::START) {
        return None;
    }
    if raw.contains(Inputs::A) {
        Some(ModeId::Melee)
    } else if raw.contains(Inputs::B) {
        Some(ModeId::Ultimate)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combo_requires_modx_and_start() {
        assert_eq!(mode_from_combo(Inputs::A), None);
        assert_eq!(mode_from_combo(Inputs::MOD_X | Inputs::A), None);
        assert_eq!(mode_from_combo(Inputs::START | Inputs::B), None);
    }

    #[test]
    fn combo_selects_mode() {
        assert_eq!(
            mode_from_combo(Inputs::MOD_X | Inputs::START | Inputs::A),
            Some(ModeId::Melee)
        );
        assert_eq!(
            mode_from_combo(Inputs::MOD_X | Inputs::START | Inputs::B),
            Some(ModeId::Ultimate)
        );
    }

    #[test]
    fn bare_combo_selects_nothing() {
        assert_eq!(mode_from_combo(Inputs::MOD_X | Inputs::START), None);
    }
}
