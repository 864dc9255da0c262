//! Joybus device engine: console detection plus the PIO-driven wire
//! protocol for GameCube and N64.
//!
//! The data line is open-collector with the console's pull-up. Two PIO
//! state machines share the pin: one samples incoming command bits, one
//! drives replies by switching the pin direction (output-low to pull the
//! line down, input to release it). Both run at 8 MHz, 32 cycles per 4 µs
//! bit cell, which leaves the loop overhead inside the delay slots.
//!
//! The engine is strictly command-driven: it never transmits except in
//! reply, and a malformed or timed-out frame resynchronizes the receiver
//! and waits for the console to retry.

use crossbox_core::ControllerOutput;
use defmt::warn;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::{Input, Level, Pull};
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::{Common, Config, Direction, ShiftDirection, StateMachine};
use embassy_rp::Peri;
use embassy_time::{Duration, Instant, Timer};
use fixed::traits::ToFixed;
use heapless::Vec;
use joybus_proto::{
    classify_line, pack_words, ConnectedConsole, GcCommand, GcReport, N64Command, N64Report,
    BIT_PERIOD_US, DETECT_WINDOW_US,
};

/// Longest command frame either dialect defines (N64 pak write).
pub const MAX_COMMAND_BYTES: usize = 35;

/// Gap after which a partially received frame is abandoned. Command
/// bytes on the wire are contiguous (32 µs each), so anything near three
/// byte-times of silence means we lost the frame boundary.
const INTER_BYTE_TIMEOUT_US: u64 = 100;

/// Engine-level receive errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum EngineError {
    /// The frame stopped arriving mid-command.
    Timeout,
    /// First byte is not a command in the active dialect.
    UnknownCommand(u8),
}

/// Watch the data line at power-on and classify what is driving it.
///
/// Samples the idle level first (no console means no pull-up, the line
/// floats low), then records falling-edge timestamps for the full
/// detection window and hands them to the burst classifier.
pub async fn detect_console(line: &mut Input<'_>) -> ConnectedConsole {
    let pulled_high = line.is_high();

    let mut edges: Vec<u32, 128> = Vec::new();
    let start = Instant::now();
    let deadline = start + Duration::from_micros(DETECT_WINDOW_US as u64);
    loop {
        match select(line.wait_for_falling_edge(), Timer::at(deadline)).await {
            Either::First(()) => {
                let t = start.elapsed().as_micros() as u32;
                if edges.push(t).is_err() {
                    break;
                }
            }
            Either::Second(()) => break,
        }
    }

    classify_line(pulled_high, &edges)
}

/// The PIO half of the Joybus device.
///
/// `sm_rx` runs a sampler: wait for a falling edge, delay to the middle
/// of the low window, read the pin, wait for the release. Eight sampled
/// bits autopush one command byte. `sm_tx` runs the reply serializer: it
/// pulls a bit count and then streams MSB-first words, timing each bit
/// cell with `set pindirs` against the external pull-up, and appends the
/// stop bit itself.
pub struct JoybusEngine<'d> {
    sm_rx: StateMachine<'d, PIO0, 0>,
    sm_tx: StateMachine<'d, PIO0, 1>,
}

impl<'d> JoybusEngine<'d> {
    pub fn new(
        common: &mut Common<'d, PIO0>,
        mut sm_rx: StateMachine<'d, PIO0, 0>,
        mut sm_tx: StateMachine<'d, PIO0, 1>,
        pin: Peri<'d, embassy_rp::peripherals::PIN_28>,
    ) -> Self {
        let mut data = common.make_pio_pin(pin);
        data.set_pull(Pull::Up);

        let rx_src = pio::pio_asm!(
            ".wrap_target",
            "wait 0 pin 0",     // falling edge: a bit cell begins
            "nop [14]",         // delay to ~2us, past a 1's release, inside a 0's low
            "in pins, 1",       // 1 reads high here, 0 reads low
            "wait 1 pin 0",     // wait for the line to release
            ".wrap",
        );
        let rx_prog = common.load_program(&rx_src.program);
        let mut rx_cfg = Config::default();
        rx_cfg.use_program(&rx_prog, &[]);
        rx_cfg.set_in_pins(&[&data]);
        rx_cfg.clock_divider = (125_000_000.0 / 8_000_000.0).to_fixed();
        rx_cfg.shift_in.auto_fill = true;
        rx_cfg.shift_in.threshold = 8;
        rx_cfg.shift_in.direction = ShiftDirection::Left;
        sm_rx.set_config(&rx_cfg);
        sm_rx.set_pin_dirs(Direction::In, &[&data]);

        // Delay slots absorb the loop overhead so both bit shapes close
        // their 32-cycle cell exactly (the word-boundary refill adds two
        // cycles of jitter once per 32 bits, well inside tolerance).
        let tx_src = pio::pio_asm!(
            ".wrap_target",
            "pull block",            // word 0: bit count - 1
            "out x, 32",
            "pull block",            // first data word
            "bitloop:",
            "out y, 1",
            "jmp !y do_zero",
            "do_one:",               // 1us low, released for the rest of the cell
            "set pindirs, 1 [7]",
            "set pindirs, 0 [18]",
            "jmp next_bit",
            "do_zero:",              // 3us low, 1us released
            "set pindirs, 1 [23]",
            "set pindirs, 0 [3]",
            "next_bit:",
            "jmp x-- more_bits",
            "jmp stop_bit",
            "more_bits:",
            "jmp !osre bitloop",
            "pull block",            // refill on a word boundary
            "jmp bitloop",
            "stop_bit:",             // stop bit is a 1
            "set pindirs, 1 [7]",
            "set pindirs, 0",
            ".wrap",                 // next pull discards any partial-word residue
        );
        let tx_prog = common.load_program(&tx_src.program);
        let mut tx_cfg = Config::default();
        tx_cfg.use_program(&tx_prog, &[]);
        tx_cfg.set_set_pins(&[&data]);
        tx_cfg.set_out_pins(&[&data]);
        tx_cfg.clock_divider = (125_000_000.0 / 8_000_000.0).to_fixed();
        tx_cfg.shift_out.auto_fill = false;
        tx_cfg.shift_out.direction = ShiftDirection::Left;
        sm_tx.set_config(&tx_cfg);
        // Output register preloaded low: "set pindirs, 1" then pulls the
        // line down, "set pindirs, 0" releases it to the pull-up.
        sm_tx.set_pins(Level::Low, &[&data]);
        sm_tx.set_pin_dirs(Direction::In, &[&data]);

        sm_rx.set_enable(true);
        sm_tx.set_enable(true);

        Self { sm_rx, sm_tx }
    }

    /// Block until the console sends the first byte of a command.
    async fn recv_first_byte(&mut self) -> u8 {
        self.sm_rx.rx().wait_pull().await as u8
    }

    /// Receive a subsequent command byte, bounded by the inter-byte gap.
    async fn recv_next_byte(&mut self) -> Result<u8, EngineError> {
        let timeout = Timer::after_micros(INTER_BYTE_TIMEOUT_US);
        match select(self.sm_rx.rx().wait_pull(), timeout).await {
            Either::First(word) => Ok(word as u8),
            Either::Second(()) => Err(EngineError::Timeout),
        }
    }

    /// Receive one complete command frame, with the dialect's first-byte
    /// length table deciding how many bytes to expect.
    async fn recv_frame(
        &mut self,
        len_of: fn(u8) -> Option<usize>,
        buf: &mut [u8; MAX_COMMAND_BYTES],
    ) -> Result<usize, EngineError> {
        let first = self.recv_first_byte().await;
        let len = len_of(first).ok_or(EngineError::UnknownCommand(first))?;
        buf[0] = first;
        for slot in &mut buf[1..len] {
            *slot = self.recv_next_byte().await?;
        }
        Ok(len)
    }

    /// Receive and decode a GameCube command.
    pub async fn recv_gc(&mut self) -> Result<GcCommand, EngineError> {
        let mut buf = [0u8; MAX_COMMAND_BYTES];
        let len = self.recv_frame(joybus_proto::gc_command_len, &mut buf).await?;
        // Length is taken from the same table the parser checks against.
        joybus_proto::parse_gc_command(&buf[..len])
            .map_err(|_| EngineError::UnknownCommand(buf[0]))
    }

    /// Receive and decode an N64 command.
    pub async fn recv_n64(&mut self) -> Result<N64Command, EngineError> {
        let mut buf = [0u8; MAX_COMMAND_BYTES];
        let len = self.recv_frame(joybus_proto::n64_command_len, &mut buf).await?;
        joybus_proto::parse_n64_command(&buf[..len])
            .map_err(|_| EngineError::UnknownCommand(buf[0]))
    }

    /// Transmit a reply and clean up the echo.
    ///
    /// The sampler hears our own transmission, so after the reply has
    /// left the wire the receiver is resynchronized wholesale; that also
    /// discards any partial byte a noise edge may have left behind.
    pub async fn send(&mut self, bytes: &[u8]) {
        let frame = pack_words(bytes);
        self.sm_tx.tx().wait_push(frame.bit_count - 1).await;
        for &word in &frame.words[..frame.word_count] {
            self.sm_tx.tx().wait_push(word).await;
        }

        // Reply duration plus the stop bit, then a cell of slack.
        let wire_us = u64::from((frame.bit_count + 2) * BIT_PERIOD_US);
        Timer::after_micros(wire_us).await;
        self.resync();
    }

    /// Drop any partial receive state and start clean on the next edge.
    pub fn resync(&mut self) {
        self.sm_rx.clear_fifos();
        self.sm_rx.restart();
    }

    /// Log and recover from a receive error.
    pub fn recover(&mut self, err: EngineError) {
        match err {
            EngineError::Timeout => warn!("joybus: frame timeout, resyncing"),
            EngineError::UnknownCommand(byte) => {
                warn!("joybus: unknown command {=u8:#04x}, resyncing", byte);
            }
        }
        self.resync();
    }
}

/// Map a logical output frame onto the GameCube wire report.
#[must_use]
pub fn gc_report_from(output: &ControllerOutput) -> GcReport {
    use crossbox_core::OutputButtons as B;
    let buttons = output.buttons;
    GcReport {
        a: buttons.contains(B::A),
        b: buttons.contains(B::B),
        x: buttons.contains(B::X),
        y: buttons.contains(B::Y),
        start: buttons.contains(B::START),
        dpad_left: buttons.contains(B::DPAD_LEFT),
        dpad_right: buttons.contains(B::DPAD_RIGHT),
        dpad_down: buttons.contains(B::DPAD_DOWN),
        dpad_up: buttons.contains(B::DPAD_UP),
        z: buttons.contains(B::Z),
        r: buttons.contains(B::R),
        l: buttons.contains(B::L),
        stick_x: output.stick_x,
        stick_y: output.stick_y,
        cstick_x: output.cstick_x,
        cstick_y: output.cstick_y,
        trigger_l: output.trigger_l,
        trigger_r: output.trigger_r,
    }
}

/// Map a logical output frame onto the N64 wire report.
///
/// The C stick collapses to the four C buttons and the analog triggers
/// have no N64 counterpart, so only full L/R presses carry over.
#[must_use]
pub fn n64_report_from(output: &ControllerOutput) -> N64Report {
    use crossbox_core::OutputButtons as B;
    let buttons = output.buttons;
    N64Report {
        a: buttons.contains(B::A),
        b: buttons.contains(B::B),
        z: buttons.contains(B::Z),
        start: buttons.contains(B::START),
        dpad_up: buttons.contains(B::DPAD_UP),
        dpad_down: buttons.contains(B::DPAD_DOWN),
        dpad_left: buttons.contains(B::DPAD_LEFT),
        dpad_right: buttons.contains(B::DPAD_RIGHT),
        reset: false,
        l: buttons.contains(B::L),
        r: buttons.contains(B::R),
        c_up: output.cstick_y > crossbox_core::AXIS_CENTER,
        c_down: output.cstick_y < crossbox_core::AXIS_CENTER,
        c_left: output.cstick_x < crossbox_core::AXIS_CENTER,
        c_right: output.cstick_x > crossbox_core::AXIS_CENTER,
        stick_x: (output.stick_x as i16 - 128) as i8,
        stick_y: (output.stick_y as i16 - 128) as i8,
    }
}
