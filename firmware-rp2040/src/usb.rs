//! USB HID gamepad output with a boot-time-selected device personality.
//!
//! All three variants share one embassy-usb HID writer; the variant
//! decides the device identity, the report descriptor and how a
//! [`ControllerOutput`] packs into report bytes. The variant is fixed for
//! the lifetime of the device, changing it means re-enumerating, so it is
//! chosen once from the boot plan.

use crossbox_core::{ControllerOutput, OutputButtons, UsbVariant};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, State};
use embassy_usb::{Builder, Config as UsbConfig};

/// Largest report any variant produces (the Xbox-style layout).
pub const MAX_REPORT_BYTES: usize = 12;

/// Xbox-style gamepad: 16 buttons, 16-bit stick axes, 8-bit triggers.
/// Y axes follow the Xbox convention (up is positive).
const XINPUT_STYLE_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x05, // Usage (Gamepad)
    0xA1, 0x01, // Collection (Application)
    0xA1, 0x00, //   Collection (Physical)
    //
    0x05, 0x09, //     Usage Page (Button)
    0x19, 0x01, //     Usage Minimum (Button 1)
    0x29, 0x10, //     Usage Maximum (Button 16)
    0x15, 0x00, //     Logical Minimum (0)
    0x25, 0x01, //     Logical Maximum (1)
    0x95, 0x10, //     Report Count (16)
    0x75, 0x01, //     Report Size (1)
    0x81, 0x02, //     Input (Data, Variable, Absolute)
    //
    0x05, 0x01, //     Usage Page (Generic Desktop)
    0x09, 0x30, //     Usage (X)
    0x09, 0x31, //     Usage (Y)
    0x09, 0x32, //     Usage (Z)
    0x09, 0x35, //     Usage (Rz)
    0x16, 0x01, 0x80, // Logical Minimum (-32767)
    0x26, 0xFF, 0x7F, // Logical Maximum (32767)
    0x95, 0x04, //     Report Count (4)
    0x75, 0x10, //     Report Size (16)
    0x81, 0x02, //     Input (Data, Variable, Absolute)
    //
    0x09, 0x33, //     Usage (Rx) - Left trigger
    0x09, 0x34, //     Usage (Ry) - Right trigger
    0x15, 0x00, //     Logical Minimum (0)
    0x26, 0xFF, 0x00, // Logical Maximum (255)
    0x95, 0x02, //     Report Count (2)
    0x75, 0x08, //     Report Size (8)
    0x81, 0x02, //     Input (Data, Variable, Absolute)
    //
    0xC0, //   End Collection
    0xC0, // End Collection
];

/// Generic DirectInput gamepad: 16 buttons, 8-bit axes, 8-bit triggers.
const DINPUT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x05, // Usage (Gamepad)
    0xA1, 0x01, // Collection (Application)
    //
    0x05, 0x09, //   Usage Page (Button)
    0x19, 0x01, //   Usage Minimum (Button 1)
    0x29, 0x10, //   Usage Maximum (Button 16)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x95, 0x10, //   Report Count (16)
    0x75, 0x01, //   Report Size (1)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    0x05, 0x01, //   Usage Page (Generic Desktop)
    0x09, 0x30, //   Usage (X)
    0x09, 0x31, //   Usage (Y)
    0x09, 0x32, //   Usage (Z)
    0x09, 0x35, //   Usage (Rz)
    0x15, 0x81, //   Logical Minimum (-127)
    0x25, 0x7F, //   Logical Maximum (127)
    0x95, 0x04, //   Report Count (4)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    0x09, 0x33, //   Usage (Rx) - Left trigger
    0x09, 0x34, //   Usage (Ry) - Right trigger
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x00, // Logical Maximum (255)
    0x95, 0x02, //   Report Count (2)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    0xC0, // End Collection
];

/// Switch-compatible gamepad: 16 buttons, a hat switch, 8-bit axes and a
/// vendor padding byte, in the layout Switch-compatible pads report.
const SWITCH_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x05, // Usage (Gamepad)
    0xA1, 0x01, // Collection (Application)
    //
    0x05, 0x09, //   Usage Page (Button)
    0x19, 0x01, //   Usage Minimum (Button 1)
    0x29, 0x10, //   Usage Maximum (Button 16)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x95, 0x10, //   Report Count (16)
    0x75, 0x01, //   Report Size (1)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    0x05, 0x01, //   Usage Page (Generic Desktop)
    0x09, 0x39, //   Usage (Hat Switch)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x07, //   Logical Maximum (7)
    0x35, 0x00, //   Physical Minimum (0)
    0x46, 0x3B, 0x01, // Physical Maximum (315)
    0x65, 0x14, //   Unit (Degrees)
    0x95, 0x01, //   Report Count (1)
    0x75, 0x04, //   Report Size (4)
    0x81, 0x42, //   Input (Data, Variable, Absolute, Null State)
    //
    0x75, 0x04, //   Report Size (4) - padding nibble
    0x81, 0x01, //   Input (Constant)
    //
    0x09, 0x30, //   Usage (X)
    0x09, 0x31, //   Usage (Y)
    0x09, 0x32, //   Usage (Z)
    0x09, 0x35, //   Usage (Rz)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x00, // Logical Maximum (255)
    0x95, 0x04, //   Report Count (4)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    0x75, 0x08, //   Report Size (8) - vendor byte
    0x81, 0x01, //   Input (Constant)
    //
    0xC0, // End Collection
];

/// Device identity and descriptor for a personality.
#[must_use]
pub fn usb_device_config(variant: UsbVariant) -> UsbConfig<'static> {
    let (vid, pid, product) = match variant {
        // pid.codes test allocations for the generic personalities.
        UsbVariant::XInput => (0x1209, 0x2882, "Crossbox (Xbox layout)"),
        UsbVariant::DInput => (0x1209, 0x2883, "Crossbox (DirectInput)"),
        // HORIPAD identity, the one Switch-compatible hosts accept.
        UsbVariant::Switch => (0x0F0D, 0x0092, "Crossbox (Switch)"),
    };
    let mut config = UsbConfig::new(vid, pid);
    config.manufacturer = Some("Crossbox");
    config.product = Some(product);
    config.serial_number = Some("001");
    config.max_power = 100;
    config.max_packet_size_0 = 64;
    config
}

fn report_descriptor(variant: UsbVariant) -> &'static [u8] {
    match variant {
        UsbVariant::XInput => XINPUT_STYLE_DESCRIPTOR,
        UsbVariant::DInput => DINPUT_DESCRIPTOR,
        UsbVariant::Switch => SWITCH_DESCRIPTOR,
    }
}

/// Configure the USB HID class in the USB builder for the selected
/// personality. Returns the HID writer for use by the output task.
pub fn configure_usb_hid<'d>(
    builder: &mut Builder<'d, Driver<'d, USB>>,
    state: &'d mut State<'d>,
    variant: UsbVariant,
) -> HidWriter<'d, Driver<'d, USB>, MAX_REPORT_BYTES> {
    let config = HidConfig {
        report_descriptor: report_descriptor(variant),
        request_handler: None,
        poll_ms: 1,
        max_packet_size: 64,
        hid_subclass: embassy_usb::class::hid::HidSubclass::No,
        hid_boot_protocol: embassy_usb::class::hid::HidBootProtocol::None,
    };
    HidWriter::new(builder, state, config)
}

/// Shared button order for the Xbox-style and DirectInput layouts.
fn generic_buttons(buttons: OutputButtons) -> u16 {
    (buttons.contains(OutputButtons::A) as u16)
        | (buttons.contains(OutputButtons::B) as u16) << 1
        | (buttons.contains(OutputButtons::X) as u16) << 2
        | (buttons.contains(OutputButtons::Y) as u16) << 3
        | (buttons.contains(OutputButtons::Z) as u16) << 4
        | (buttons.contains(OutputButtons::L) as u16) << 5
        | (buttons.contains(OutputButtons::R) as u16) << 6
        | (buttons.contains(OutputButtons::START) as u16) << 7
        | (buttons.contains(OutputButtons::SELECT) as u16) << 8
        | (buttons.contains(OutputButtons::HOME) as u16) << 9
        | (buttons.contains(OutputButtons::DPAD_UP) as u16) << 10
        | (buttons.contains(OutputButtons::DPAD_DOWN) as u16) << 11
        | (buttons.contains(OutputButtons::DPAD_LEFT) as u16) << 12
        | (buttons.contains(OutputButtons::DPAD_RIGHT) as u16) << 13
}

/// Switch button order: Y B A X L R ZL ZR minus plus LS RS home capture.
fn switch_buttons(buttons: OutputButtons) -> u16 {
    (buttons.contains(OutputButtons::Y) as u16)
        | (buttons.contains(OutputButtons::B) as u16) << 1
        | (buttons.contains(OutputButtons::A) as u16) << 2
        | (buttons.contains(OutputButtons::X) as u16) << 3
        | (buttons.contains(OutputButtons::R) as u16) << 5
        | (buttons.contains(OutputButtons::L) as u16) << 6 // ZL
        | (buttons.contains(OutputButtons::Z) as u16) << 7 // ZR
        | (buttons.contains(OutputButtons::SELECT) as u16) << 8
        | (buttons.contains(OutputButtons::START) as u16) << 9
        | (buttons.contains(OutputButtons::HOME) as u16) << 12
}

/// Encode the d-pad as an 8-way hat value, 0x08 when released.
fn hat_from_dpad(buttons: OutputButtons) -> u8 {
    let up = buttons.contains(OutputButtons::DPAD_UP);
    let down = buttons.contains(OutputButtons::DPAD_DOWN);
    let left = buttons.contains(OutputButtons::DPAD_LEFT);
    let right = buttons.contains(OutputButtons::DPAD_RIGHT);
    match (up, down, left, right) {
        (true, false, false, false) => 0,
        (true, false, false, true) => 1,
        (false, false, false, true) => 2,
        (false, true, false, true) => 3,
        (false, true, false, false) => 4,
        (false, true, true, false) => 5,
        (false, false, true, false) => 6,
        (true, false, true, false) => 7,
        _ => 8,
    }
}

/// Pack a logical output frame for the selected personality.
///
/// Returns the report bytes and their length; the writer sends exactly
/// that many.
#[must_use]
pub fn pack_report(
    variant: UsbVariant,
    output: &ControllerOutput,
) -> ([u8; MAX_REPORT_BYTES], usize) {
    let mut report = [0u8; MAX_REPORT_BYTES];
    match variant {
        UsbVariant::XInput => {
            let buttons = generic_buttons(output.buttons).to_le_bytes();
            // Widen to the 16-bit range; Y stays up-positive here.
            let lx = ((output.stick_x_signed() as i16) << 8).to_le_bytes();
            let ly = ((output.stick_y_signed() as i16) << 8).to_le_bytes();
            let rx = ((output.cstick_x_signed() as i16) << 8).to_le_bytes();
            let ry = ((output.cstick_y_signed() as i16) << 8).to_le_bytes();
            report[0] = buttons[0];
            report[1] = buttons[1];
            report[2..4].copy_from_slice(&lx);
            report[4..6].copy_from_slice(&ly);
            report[6..8].copy_from_slice(&rx);
            report[8..10].copy_from_slice(&ry);
            report[10] = output.trigger_l;
            report[11] = output.trigger_r;
            (report, 12)
        }
        UsbVariant::DInput => {
            let buttons = generic_buttons(output.buttons).to_le_bytes();
            report[0] = buttons[0];
            report[1] = buttons[1];
            report[2] = output.stick_x_signed() as u8;
            // HID Y is down-positive.
            report[3] = output.stick_y_signed().saturating_neg() as u8;
            report[4] = output.cstick_x_signed() as u8;
            report[5] = output.cstick_y_signed().saturating_neg() as u8;
            report[6] = output.trigger_l;
            report[7] = output.trigger_r;
            (report, 8)
        }
        UsbVariant::Switch => {
            let buttons = switch_buttons(output.buttons).to_le_bytes();
            report[0] = buttons[0];
            report[1] = buttons[1];
            report[2] = hat_from_dpad(output.buttons);
            report[3] = output.stick_x;
            // Switch axes are unsigned with 0 at the top.
            report[4] = 255 - output.stick_y;
            report[5] = output.cstick_x;
            report[6] = 255 - output.cstick_y;
            report[7] = 0x00;
            (report, 8)
        }
    }
}

/// USB HID gamepad output.
///
/// Wraps an embassy-usb HID writer and packs frames for the personality
/// chosen at boot.
pub struct UsbHidSink<'d> {
    writer: HidWriter<'d, Driver<'d, USB>, MAX_REPORT_BYTES>,
    variant: UsbVariant,
}

impl<'d> UsbHidSink<'d> {
    pub fn new(writer: HidWriter<'d, Driver<'d, USB>, MAX_REPORT_BYTES>, variant: UsbVariant) -> Self {
        Self { writer, variant }
    }

    /// Wait until the device has enumerated.
    pub async fn wait_ready(&mut self) {
        self.writer.ready().await;
    }

    /// Pack and send one report.
    pub async fn send(
        &mut self,
        output: &ControllerOutput,
    ) -> Result<(), embassy_usb::driver::EndpointError> {
        let (report, len) = pack_report(self.variant, output);
        self.writer.write(&report[..len]).await
    }
}
