//! Boot-time console detection from the data line's idle signature.
//!
//! Both consoles pull the data line to logic high and, while no controller
//! answers, repeatedly transmit a probe command (a short burst of low
//! pulses). The signatures differ in cadence, not content:
//!
//! - The **N64** boot ROM rescans its controller ports continuously, so
//!   probe bursts repeat with a short period (well under
//!   [`N64_REPROBE_MAX_US`]).
//! - A **GameCube** re-probes an unanswered port slowly, several
//!   milliseconds apart, so a capture window of [`DETECT_WINDOW_US`] sees
//!   at most a couple of widely spaced bursts.
//! - With **no console** attached the line is either not pulled high at
//!   all or pulled high with no traffic.
//!
//! The firmware samples the line once at boot, records falling-edge
//! timestamps for one window, and feeds them to [`classify_line`]. The
//! classifier is pure so the three signatures can be verified with
//! synthetic fixtures.

/// Which console, if any, was detected on the joybus data line at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectedConsole {
    /// Neither known idle signature present; fall through to USB mode.
    None,
    GameCube,
    N64,
}

/// Length of the boot-time capture window in microseconds.
///
/// Long enough to contain at least one GameCube probe burst and several
/// N64 rescans.
pub const DETECT_WINDOW_US: u32 = 12_000;

/// Gap between falling edges that separates two command bursts.
///
/// Edges within one command frame are at most one bit cell apart; 200 µs
/// is far beyond any frame-internal gap and far below either console's
/// re-probe period.
pub const BURST_GAP_US: u32 = 200;

/// Maximum burst start-to-start interval still attributed to an N64.
pub const N64_REPROBE_MAX_US: u32 = 2_000;

/// Classify a boot-time line capture.
///
/// `pulled_high` reports whether the line read high outside of bursts
/// (i.e. a console-side pull-up is present). `falling_edges_us` holds the
/// timestamps, in microseconds from capture start and in ascending order,
/// of every falling edge seen during the window.
#[must_use]
pub fn classify_line(pulled_high: bool, falling_edges_us: &[u32]) -> ConnectedConsole {
    if !pulled_high || falling_edges_us.is_empty() {
        return ConnectedConsole::None;
    }

    // Reduce the edge timeline to burst start times.
    let mut prev_edge = falling_edges_us[0];
    let mut prev_burst_start = falling_edges_us[0];
    let mut min_interval: Option<u32> = None;
    for &edge in &falling_edges_us[1..] {
        if edge - prev_edge > BURST_GAP_US {
            let interval = edge - prev_burst_start;
            min_interval = Some(match min_interval {
                Some(m) if m < interval => m,
                _ => interval,
            });
            prev_burst_start = edge;
        }
        prev_edge = edge;
    }

    match min_interval {
        // Multiple bursts, tightly spaced: the N64 port rescan loop.
        Some(interval) if interval <= N64_REPROBE_MAX_US => ConnectedConsole::N64,
        // A lone burst, or bursts several milliseconds apart.
        _ => ConnectedConsole::GameCube,
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::bits::BIT_PERIOD_US;
    use std::vec::Vec;

    /// Falling edges of one 0x00 probe burst starting at `t`: eight `0`
    /// bits plus a stop bit, one edge per 4 µs cell.
    fn probe_burst(t: u32) -> impl Iterator<Item = u32> {
        (0..9).map(move |bit| t + bit * BIT_PERIOD_US)
    }

    #[test]
    fn silent_line_is_no_console() {
        assert_eq!(classify_line(false, &[]), ConnectedConsole::None);
        // Pulled high by something, but no traffic: still no console.
        assert_eq!(classify_line(true, &[]), ConnectedConsole::None);
    }

    #[test]
    fn floating_line_with_noise_is_no_console() {
        // Edges without a pull-up are noise on a floating line.
        assert_eq!(classify_line(false, &[10, 500, 3000]), ConnectedConsole::None);
    }

    #[test]
    fn n64_rescan_cadence() {
        // Probe bursts every 500 µs, as the boot ROM cycles its ports.
        let mut edges = Vec::new();
        for burst in 0..20 {
            edges.extend(probe_burst(burst * 500));
        }
        assert_eq!(classify_line(true, &edges), ConnectedConsole::N64);
    }

    #[test]
    fn gamecube_single_burst() {
        let edges: Vec<u32> = probe_burst(3_000).collect();
        assert_eq!(classify_line(true, &edges), ConnectedConsole::GameCube);
    }

    #[test]
    fn gamecube_slow_reprobe() {
        // Two bursts 8 ms apart within the window.
        let mut edges: Vec<u32> = probe_burst(1_000).collect();
        edges.extend(probe_burst(9_000));
        assert_eq!(classify_line(true, &edges), ConnectedConsole::GameCube);
    }

    #[test]
    fn boundary_interval_counts_as_n64() {
        let mut edges: Vec<u32> = probe_burst(0).collect();
        edges.extend(probe_burst(N64_REPROBE_MAX_US));
        assert_eq!(classify_line(true, &edges), ConnectedConsole::N64);
    }
}
