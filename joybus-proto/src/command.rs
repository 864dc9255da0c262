//! Command frame decoding for both console dialects.
//!
//! The first byte of a frame determines the command and, with it, the
//! total frame length. A receiver reads one byte, looks the length up via
//! [`gc_command_len`]/[`n64_command_len`], reads the remainder, and parses
//! the complete frame. Unknown first bytes are reported as
//! [`CommandError::Unknown`] so the engine can ignore the frame and wait
//! for the next one, as the protocol requires.

/// Error type for command decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// First byte is not a command this controller understands.
    Unknown,
    /// Frame length does not match the command's expected length.
    Length,
}

/// Decoded GameCube console command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GcCommand {
    /// `0x00` / `0xFF`: identify yourself. Response: [`crate::GC_IDENTITY`].
    Probe,
    /// `0x41`: report stick origins. Response: [`crate::GcOrigin`].
    Origin,
    /// `0x42`: recalibrate. Answered like [`GcCommand::Origin`].
    Recalibrate,
    /// `0x40 <mode> <motor>`: poll inputs. Response: [`crate::GcReport`].
    Poll {
        /// Analog reporting mode requested by the console (0-7).
        mode: u8,
        /// Rumble motor on/off (bit 0 of the motor byte).
        rumble: bool,
    },
}

/// Decoded N64 console command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum N64Command {
    /// `0x00` / `0xFF`: identify yourself. Response: [`crate::N64_IDENTITY`].
    Probe,
    /// `0x01`: poll inputs. Response: [`crate::N64Report`].
    Poll,
    /// `0x02 <addr hi> <addr lo>`: controller pak read. Unsupported here;
    /// the engine ignores it and waits for the next command.
    PakRead,
    /// `0x03 <addr hi> <addr lo> <32 data bytes>`: controller pak write.
    /// Unsupported, ignored.
    PakWrite,
}

/// Expected total frame length for a GameCube command, from its first byte.
///
/// Returns `None` for bytes that are not GameCube commands.
#[must_use]
pub const fn gc_command_len(first: u8) -> Option<usize> {
    match first {
        0x00 | 0xFF | 0x41 | 0x42 => Some(1),
        0x40 => Some(3),
        _ => None,
    }
}

/// Expected total frame length for an N64 command, from its first byte.
///
/// Returns `None` for bytes that are not N64 commands.
#[must_use]
pub const fn n64_command_len(first: u8) -> Option<usize> {
    match first {
        0x00 | 0xFF | 0x01 => Some(1),
        0x02 => Some(3),
        0x03 => Some(35),
        _ => None,
    }
}

/// Parse a complete GameCube command frame.
pub fn parse_gc_command(frame: &[u8]) -> Result<GcCommand, CommandError> {
    let first = *frame.first().ok_or(CommandError::Length)?;
    let expected = gc_command_len(first).ok_or(CommandError::Unknown)?;
    if frame.len() != expected {
        return Err(CommandError::Length);
    }
    match first {
        0x00 | 0xFF => Ok(GcCommand::Probe),
        0x41 => Ok(GcCommand::Origin),
        0x42 => Ok(GcCommand::Recalibrate),
        0x40 => Ok(GcCommand::Poll {
            mode: frame[1] & 0x07,
            rumble: frame[2] & 0x01 != 0,
        }),
        _ => Err(CommandError::Unknown),
    }
}

/// Parse a complete N64 command frame.
pub fn parse_n64_command(frame: &[u8]) -> Result<N64Command, CommandError> {
    let first = *frame.first().ok_or(CommandError::Length)?;
    let expected = n64_command_len(first).ok_or(CommandError::Unknown)?;
    if frame.len() != expected {
        return Err(CommandError::Length);
    }
    match first {
        0x00 | 0xFF => Ok(N64Command::Probe),
        0x01 => Ok(N64Command::Poll),
        0x02 => Ok(N64Command::PakRead),
        0x03 => Ok(N64Command::PakWrite),
        _ => Err(CommandError::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gc_poll_command() {
        // The standard poll the console sends every frame.
        let cmd = parse_gc_command(&[0x40, 0x03, 0x02]).unwrap();
        assert_eq!(
            cmd,
            GcCommand::Poll {
                mode: 3,
                rumble: false
            }
        );

        let cmd = parse_gc_command(&[0x40, 0x03, 0x01]).unwrap();
        assert_eq!(
            cmd,
            GcCommand::Poll {
                mode: 3,
                rumble: true
            }
        );
    }

    #[test]
    fn gc_single_byte_commands() {
        assert_eq!(parse_gc_command(&[0x00]).unwrap(), GcCommand::Probe);
        assert_eq!(parse_gc_command(&[0xFF]).unwrap(), GcCommand::Probe);
        assert_eq!(parse_gc_command(&[0x41]).unwrap(), GcCommand::Origin);
        assert_eq!(parse_gc_command(&[0x42]).unwrap(), GcCommand::Recalibrate);
    }

    #[test]
    fn gc_unknown_and_short_frames() {
        assert_eq!(parse_gc_command(&[0x12]), Err(CommandError::Unknown));
        assert_eq!(parse_gc_command(&[0x40, 0x03]), Err(CommandError::Length));
        assert_eq!(parse_gc_command(&[]), Err(CommandError::Length));
    }

    #[test]
    fn n64_commands() {
        assert_eq!(parse_n64_command(&[0x00]).unwrap(), N64Command::Probe);
        assert_eq!(parse_n64_command(&[0xFF]).unwrap(), N64Command::Probe);
        assert_eq!(parse_n64_command(&[0x01]).unwrap(), N64Command::Poll);
        assert_eq!(
            parse_n64_command(&[0x02, 0x80, 0x01]).unwrap(),
            N64Command::PakRead
        );
    }

    #[test]
    fn n64_pak_write_length() {
        assert_eq!(n64_command_len(0x03), Some(35));
        let mut frame = [0u8; 35];
        frame[0] = 0x03;
        assert_eq!(parse_n64_command(&frame).unwrap(), N64Command::PakWrite);
        assert_eq!(
            parse_n64_command(&frame[..10]),
            Err(CommandError::Length)
        );
    }

    #[test]
    fn command_length_tables_cover_parse() {
        for first in 0..=255u8 {
            if gc_command_len(first).is_none() {
                assert_eq!(parse_gc_command(&[first]), Err(CommandError::Unknown));
            }
            if n64_command_len(first).is_none() {
                assert_eq!(parse_n64_command(&[first]), Err(CommandError::Unknown));
            }
        }
    }
}
