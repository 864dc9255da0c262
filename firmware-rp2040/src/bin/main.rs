#![no_std]
#![no_main]

use crossbox_rp2040::joybus::{self, gc_report_from, n64_report_from, JoybusEngine};
use crossbox_rp2040::{display, usb, viewer, DiagnosticState, GpioInput, PIN_MAPPINGS};
use crossbox_core::{
    select_backends, validate_mappings, ActiveMode, InputSource, Inputs, Pipeline, PrimaryBackend,
};
use defmt::{info, panic, warn};
use defmt_rtt as _;
use embassy_executor::{Executor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::I2c;
use embassy_rp::multicore::{spawn_core1, Stack};
use embassy_rp::peripherals::{PIO0, USB};
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::usb::{Driver, InterruptHandler as UsbInterruptHandler};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::watch::{Sender, Watch};
use embassy_time::{with_timeout, Duration, Ticker, Timer};
use embassy_usb::class::cdc_acm::CdcAcmClass;
use embassy_usb::class::hid::State as HidState;
use embassy_usb::Builder;
use joybus_proto::{GcCommand, GcOrigin, N64Command, GC_IDENTITY, N64_IDENTITY};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => UsbInterruptHandler<USB>;
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

/// Diagnostic handoff from the timing-critical loop on core 0 to the
/// best-effort consumers (display on core 1, viewer on core 0). A watch
/// gives "latest value wins": slow readers skip frames, never block the
/// sender.
static DIAG: Watch<CriticalSectionRawMutex, DiagnosticState, 2> = Watch::new();

type DiagSender = Sender<'static, CriticalSectionRawMutex, DiagnosticState, 2>;

/// USB descriptor buffers.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static HID_STATE: StaticCell<HidState> = StaticCell::new();
static CDC_STATE: StaticCell<embassy_usb::class::cdc_acm::State> = StaticCell::new();

/// Core 1 executor and stack.
static CORE1_STACK: StaticCell<Stack<4096>> = StaticCell::new();
static EXECUTOR1: StaticCell<Executor> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("crossbox starting...");

    let mut p = embassy_rp::init(embassy_rp::config::Config::default());

    if let Err(err) = validate_mappings(&PIN_MAPPINGS) {
        panic!("invalid button mapping: {}", err);
    }

    let mut buttons = heapless::Vec::new();
    // The board's wiring, in PIN_MAPPINGS order.
    let _ = buttons.push((Inputs::L, Input::new(p.PIN_5, Pull::Up)));
    let _ = buttons.push((Inputs::LEFT, Input::new(p.PIN_4, Pull::Up)));
    let _ = buttons.push((Inputs::DOWN, Input::new(p.PIN_3, Pull::Up)));
    let _ = buttons.push((Inputs::RIGHT, Input::new(p.PIN_2, Pull::Up)));
    let _ = buttons.push((Inputs::MOD_X, Input::new(p.PIN_6, Pull::Up)));
    let _ = buttons.push((Inputs::MOD_Y, Input::new(p.PIN_7, Pull::Up)));
    let _ = buttons.push((Inputs::SELECT, Input::new(p.PIN_10, Pull::Up)));
    let _ = buttons.push((Inputs::START, Input::new(p.PIN_0, Pull::Up)));
    let _ = buttons.push((Inputs::HOME, Input::new(p.PIN_11, Pull::Up)));
    let _ = buttons.push((Inputs::C_LEFT, Input::new(p.PIN_13, Pull::Up)));
    let _ = buttons.push((Inputs::C_UP, Input::new(p.PIN_12, Pull::Up)));
    let _ = buttons.push((Inputs::C_DOWN, Input::new(p.PIN_15, Pull::Up)));
    let _ = buttons.push((Inputs::A, Input::new(p.PIN_14, Pull::Up)));
    let _ = buttons.push((Inputs::C_RIGHT, Input::new(p.PIN_16, Pull::Up)));
    let _ = buttons.push((Inputs::B, Input::new(p.PIN_26, Pull::Up)));
    let _ = buttons.push((Inputs::X, Input::new(p.PIN_21, Pull::Up)));
    let _ = buttons.push((Inputs::Z, Input::new(p.PIN_19, Pull::Up)));
    let _ = buttons.push((Inputs::UP, Input::new(p.PIN_17, Pull::Up)));
    let _ = buttons.push((Inputs::R, Input::new(p.PIN_27, Pull::Up)));
    let _ = buttons.push((Inputs::Y, Input::new(p.PIN_22, Pull::Up)));
    let _ = buttons.push((Inputs::LIGHT_SHIELD, Input::new(p.PIN_20, Pull::Up)));
    let _ = buttons.push((Inputs::MID_SHIELD, Input::new(p.PIN_18, Pull::Up)));
    let mut input = GpioInput::new(buttons);

    // Boot-time holds decide the flash mode and the USB personality.
    // One throwaway poll first: the debouncer needs two agreeing reads,
    // and the pull-ups a moment to settle.
    input.poll();
    Timer::after_millis(1).await;
    let holds = input.poll();
    if holds.contains(Inputs::START) {
        info!("start held at boot, rebooting to BOOTSEL");
        embassy_rp::rom_data::reset_to_usb_boot(0, 0);
        loop {
            cortex_m::asm::wfe();
        }
    }

    // On-board LED as an alive indicator.
    let _led = Output::new(p.PIN_25, Level::High);

    let console = {
        let mut line = Input::new(p.PIN_28.reborrow(), Pull::None);
        joybus::detect_console(&mut line).await
    };
    info!("console detection: {}", console);

    let plan = select_backends(console, holds);
    info!("boot plan: {}", plan);

    let mut pipeline = Pipeline::new(input, ActiveMode::from_id(plan.default_mode));
    let diag = DIAG.sender();

    // Core 1 owns the best-effort display loop.
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_9, p.PIN_8, embassy_rp::i2c::Config::default());
    let display_diag = DIAG.receiver().expect("watch receiver available");
    let stack = CORE1_STACK.init(Stack::new());
    spawn_core1(p.CORE1, stack, move || {
        let executor1 = EXECUTOR1.init(Executor::new());
        executor1.run(|spawner| spawner.must_spawn(display_task(i2c, display_diag)));
    });

    match plan.primary {
        PrimaryBackend::GameCube => {
            let Pio {
                mut common, sm0, sm1, ..
            } = Pio::new(p.PIO0, Irqs);
            let engine = JoybusEngine::new(&mut common, sm0, sm1, p.PIN_28);
            run_gamecube(engine, pipeline, diag).await
        }
        PrimaryBackend::N64 => {
            let Pio {
                mut common, sm0, sm1, ..
            } = Pio::new(p.PIO0, Irqs);
            let engine = JoybusEngine::new(&mut common, sm0, sm1, p.PIN_28);
            run_n64(engine, pipeline, diag).await
        }
        PrimaryBackend::Usb(variant) => {
            let usb_driver = Driver::new(p.USB, Irqs);
            let mut builder = Builder::new(
                usb_driver,
                usb::usb_device_config(variant),
                CONFIG_DESCRIPTOR.init([0; 256]),
                BOS_DESCRIPTOR.init([0; 256]),
                MSOS_DESCRIPTOR.init([0; 256]),
                CONTROL_BUF.init([0; 64]),
            );

            let hid_state = HID_STATE.init(HidState::new());
            let hid_writer = usb::configure_usb_hid(&mut builder, hid_state, variant);

            if plan.viewer {
                let cdc_state = CDC_STATE.init(embassy_usb::class::cdc_acm::State::new());
                let class = CdcAcmClass::new(&mut builder, cdc_state, 64);
                let viewer_diag = DIAG.receiver().expect("watch receiver available");
                spawner.must_spawn(viewer_task(class, viewer_diag));
            }

            spawner.must_spawn(usb_task(builder.build()));

            let sink = usb::UsbHidSink::new(hid_writer, variant);
            run_usb(sink, pipeline, diag, plan.primary).await
        }
    }
}

/// A bus this silent means the console was powered off or unplugged.
/// Reset and let the boot path run detection again.
const BUS_SILENCE_LIMIT: Duration = Duration::from_secs(3);

fn redetect_after_silence() -> ! {
    info!("joybus: bus silent, resetting to re-run detection");
    cortex_m::peripheral::SCB::sys_reset();
}

/// GameCube device loop: reply to every console command, run one
/// pipeline cycle per poll.
async fn run_gamecube(
    mut engine: JoybusEngine<'_>,
    mut pipeline: Pipeline<GpioInput>,
    diag: DiagSender,
) -> ! {
    info!("gamecube backend running");
    loop {
        let Ok(command) = with_timeout(BUS_SILENCE_LIMIT, engine.recv_gc()).await else {
            redetect_after_silence();
        };
        match command {
            Ok(GcCommand::Probe) => engine.send(&GC_IDENTITY).await,
            Ok(GcCommand::Origin | GcCommand::Recalibrate) => {
                engine.send(&GcOrigin::new().as_bytes()).await;
            }
            // No rumble motor fitted, so the poll's motor byte is moot.
            Ok(GcCommand::Poll { .. }) => {
                let frame = pipeline.cycle();
                let report = gc_report_from(&frame.output);
                engine.send(&report.as_bytes()).await;
                // Everything below happens after the reply is on the
                // wire, outside the response window.
                pipeline.check_mode_switch(frame.raw);
                diag.send(DiagnosticState {
                    backend: PrimaryBackend::GameCube,
                    mode: pipeline.mode_id(),
                    frame,
                });
            }
            Err(err) => engine.recover(err),
        }
    }
}

/// N64 device loop. Controller pak commands are received in full and
/// ignored: the console treats that as "no pak inserted".
async fn run_n64(
    mut engine: JoybusEngine<'_>,
    mut pipeline: Pipeline<GpioInput>,
    diag: DiagSender,
) -> ! {
    info!("n64 backend running");
    loop {
        let Ok(command) = with_timeout(BUS_SILENCE_LIMIT, engine.recv_n64()).await else {
            redetect_after_silence();
        };
        match command {
            Ok(N64Command::Probe) => engine.send(&N64_IDENTITY).await,
            Ok(N64Command::Poll) => {
                let frame = pipeline.cycle();
                let report = n64_report_from(&frame.output);
                engine.send(&report.as_bytes()).await;
                pipeline.check_mode_switch(frame.raw);
                diag.send(DiagnosticState {
                    backend: PrimaryBackend::N64,
                    mode: pipeline.mode_id(),
                    frame,
                });
            }
            Ok(N64Command::PakRead | N64Command::PakWrite) => {
                engine.resync();
            }
            Err(err) => engine.recover(err),
        }
    }
}

/// USB device loop: self-paced at 1 kHz, the HID interrupt endpoint
/// carries whatever the last completed cycle produced.
async fn run_usb(
    mut sink: usb::UsbHidSink<'static>,
    mut pipeline: Pipeline<GpioInput>,
    diag: DiagSender,
    backend: PrimaryBackend,
) -> ! {
    sink.wait_ready().await;
    info!("usb backend running");

    let mut ticker = Ticker::every(Duration::from_millis(1));
    loop {
        ticker.next().await;
        let frame = pipeline.cycle();
        if let Err(err) = sink.send(&frame.output).await {
            warn!("usb: report dropped: {}", err);
        }
        pipeline.check_mode_switch(frame.raw);
        diag.send(DiagnosticState {
            backend,
            mode: pipeline.mode_id(),
            frame,
        });
    }
}

/// USB device task - runs the USB stack.
#[embassy_executor::task]
async fn usb_task(mut device: embassy_usb::UsbDevice<'static, Driver<'static, USB>>) {
    device.run().await;
}

/// Input viewer task - streams ASCII state lines over CDC-ACM.
#[embassy_executor::task]
async fn viewer_task(
    class: CdcAcmClass<'static, Driver<'static, USB>>,
    diag: embassy_sync::watch::Receiver<'static, CriticalSectionRawMutex, DiagnosticState, 2>,
) {
    viewer::run(class, diag).await
}

/// Status display task - core 1's only job.
#[embassy_executor::task]
async fn display_task(
    i2c: I2c<'static, embassy_rp::peripherals::I2C0, embassy_rp::i2c::Blocking>,
    diag: embassy_sync::watch::Receiver<'static, CriticalSectionRawMutex, DiagnosticState, 2>,
) {
    display::run(i2c, diag).await
}
