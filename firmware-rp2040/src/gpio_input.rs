//! GPIO button board input source.
//!
//! Each button is one GPIO with the internal pull-up enabled, switched to
//! ground. Debouncing is two-sample agreement: a button changes state
//! only when the current read matches the previous one, so a single
//! bouncy sample at the protocol rate can never flip an output bit.

use crossbox_core::{InputSource, Inputs, PinMapping};
use embassy_rp::gpio::Input;
use heapless::Vec;

/// GPIO the console data line is wired to.
pub const JOYBUS_DATA_PIN: u8 = 28;

/// The board's button-to-GPIO assignment.
pub const PIN_MAPPINGS: [PinMapping; 22] = [
    PinMapping { input: Inputs::L, pin: 5 },
    PinMapping { input: Inputs::LEFT, pin: 4 },
    PinMapping { input: Inputs::DOWN, pin: 3 },
    PinMapping { input: Inputs::RIGHT, pin: 2 },
    PinMapping { input: Inputs::MOD_X, pin: 6 },
    PinMapping { input: Inputs::MOD_Y, pin: 7 },
    PinMapping { input: Inputs::SELECT, pin: 10 },
    PinMapping { input: Inputs::START, pin: 0 },
    PinMapping { input: Inputs::HOME, pin: 11 },
    PinMapping { input: Inputs::C_LEFT, pin: 13 },
    PinMapping { input: Inputs::C_UP, pin: 12 },
    PinMapping { input: Inputs::C_DOWN, pin: 15 },
    PinMapping { input: Inputs::A, pin: 14 },
    PinMapping { input: Inputs::C_RIGHT, pin: 16 },
    PinMapping { input: Inputs::B, pin: 26 },
    PinMapping { input: Inputs::X, pin: 21 },
    PinMapping { input: Inputs::Z, pin: 19 },
    PinMapping { input: Inputs::UP, pin: 17 },
    PinMapping { input: Inputs::R, pin: 27 },
    PinMapping { input: Inputs::Y, pin: 22 },
    PinMapping { input: Inputs::LIGHT_SHIELD, pin: 20 },
    PinMapping { input: Inputs::MID_SHIELD, pin: 18 },
];

/// Button board input source over GPIO.
///
/// Buttons are active-low. The pin set is fixed at construction; the
/// mapping itself is validated against
/// [`validate_mappings`](crossbox_core::validate_mappings) before any
/// pins are claimed.
pub struct GpioInput {
    buttons: Vec<(Inputs, Input<'static>), { PIN_MAPPINGS.len() }>,
    prev_raw: Inputs,
    stable: Inputs,
}

impl GpioInput {
    #[must_use]
    pub fn new(buttons: Vec<(Inputs, Input<'static>), { PIN_MAPPINGS.len() }>) -> Self {
        Self {
            buttons,
            prev_raw: Inputs::NONE,
            stable: Inputs::NONE,
        }
    }

    fn read_raw(&self) -> Inputs {
        let mut snapshot = Inputs::NONE;
        for (input, pin) in &self.buttons {
            if pin.is_low() {
                snapshot |= *input;
            }
        }
        snapshot
    }
}

impl InputSource for GpioInput {
    fn poll(&mut self) -> Inputs {
        let raw = self.read_raw();
        // Per bit: press on two consecutive 1s, release on two
        // consecutive 0s, hold the stable value while the reads disagree.
        self.stable = (raw & self.prev_raw) | (self.stable & (raw | self.prev_raw));
        self.prev_raw = raw;
        self.stable
    }
}
