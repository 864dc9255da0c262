//! Bit-cell timing, RX pulse classification, and TX word packing.
//!
//! A joybus bit occupies a [`BIT_PERIOD_US`] cell beginning with a falling
//! edge; the width of the low pulse encodes the bit value. The receiver
//! therefore only needs to measure low-pulse widths, and the transmitter
//! only needs the raw bit sequence plus fixed per-bit timing, which a PIO
//! state machine provides from MSB-first-packed FIFO words.

/// Duration of one bit cell in microseconds.
pub const BIT_PERIOD_US: u32 = 4;

/// Low-pulse width of a `1` bit in microseconds.
pub const ONE_LOW_US: u32 = 1;

/// Low-pulse width of a `0` bit in microseconds.
pub const ZERO_LOW_US: u32 = 3;

/// Largest reply any command produces ([`crate::GcOrigin::SIZE`]).
pub const MAX_REPLY_BYTES: usize = 10;

/// FIFO words needed for the largest reply (80 bits).
pub const MAX_REPLY_WORDS: usize = (MAX_REPLY_BYTES * 8).div_ceil(32);

/// Classify a measured low-pulse width as a bit value.
///
/// Tolerates one microsecond of jitter in either direction: widths up to
/// 2 µs read as `1`, widths of 3-4 µs read as `0`. Anything wider is line
/// noise or a desynchronized frame and yields `None`, prompting the
/// receiver to resynchronize.
#[inline]
#[must_use]
pub const fn classify_low_pulse(width_us: u32) -> Option<bool> {
    match width_us {
        1..=2 => Some(true),
        3..=4 => Some(false),
        _ => None,
    }
}

/// A reply packed for a left-shifting PIO TX FIFO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxFrame {
    /// MSB-first packed bits, left-aligned within each word.
    pub words: [u32; MAX_REPLY_WORDS],
    /// Number of words holding data.
    pub word_count: usize,
    /// Total number of data bits (excluding the stop bit, which the
    /// transmitter appends itself).
    pub bit_count: u32,
}

/// Pack reply bytes MSB-first into left-aligned FIFO words.
///
/// A PIO program shifting out of the OSR to the left consumes the words
/// directly: the first wire bit is bit 31 of the first word, and a
/// partial final word carries its bits in the most significant positions.
///
/// # Panics
///
/// Panics if `bytes` is longer than [`MAX_REPLY_BYTES`]; reply sizes are
/// fixed by the protocol, so this is a programming error.
#[must_use]
pub fn pack_words(bytes: &[u8]) -> TxFrame {
    assert!(bytes.len() <= MAX_REPLY_BYTES, "reply longer than protocol maximum");

    let mut words = [0u32; MAX_REPLY_WORDS];
    for (i, &byte) in bytes.iter().enumerate() {
        let shift = 24 - 8 * (i % 4);
        words[i / 4] |= (byte as u32) << shift;
    }

    TxFrame {
        words,
        word_count: bytes.len().div_ceil(4),
        bit_count: bytes.len() as u32 * 8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_classification_with_jitter() {
        assert_eq!(classify_low_pulse(1), Some(true));
        assert_eq!(classify_low_pulse(2), Some(true));
        assert_eq!(classify_low_pulse(3), Some(false));
        assert_eq!(classify_low_pulse(4), Some(false));
        assert_eq!(classify_low_pulse(0), None);
        assert_eq!(classify_low_pulse(5), None);
        assert_eq!(classify_low_pulse(100), None);
    }

    #[test]
    fn pack_single_byte_left_aligned() {
        let frame = pack_words(&[0xA5]);
        assert_eq!(frame.word_count, 1);
        assert_eq!(frame.bit_count, 8);
        assert_eq!(frame.words[0], 0xA500_0000);
    }

    #[test]
    fn pack_identity_reply() {
        let frame = pack_words(&[0x09, 0x00, 0x03]);
        assert_eq!(frame.word_count, 1);
        assert_eq!(frame.bit_count, 24);
        assert_eq!(frame.words[0], 0x0900_0300);
    }

    #[test]
    fn pack_full_poll_report() {
        let frame = pack_words(&[0x00, 0x80, 128, 128, 128, 128, 0, 0]);
        assert_eq!(frame.word_count, 2);
        assert_eq!(frame.bit_count, 64);
        assert_eq!(frame.words[0], 0x0080_8080);
        assert_eq!(frame.words[1], 0x8080_0000);
    }

    #[test]
    fn pack_origin_report_spills_into_third_word() {
        let bytes = [0u8; 10];
        let frame = pack_words(&bytes);
        assert_eq!(frame.word_count, 3);
        assert_eq!(frame.bit_count, 80);
    }
}
