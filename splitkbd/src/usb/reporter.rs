use usb_device::{
    class_prelude::{UsbBus, UsbBusAllocator},
    device::{StringDescriptors, UsbDevice, UsbDeviceBuilder, UsbDeviceState, UsbVidPid},
    LangID, UsbError,
};
use usbd_hid::{
    descriptor::{MediaKeyboardReport, MouseReport, SerializedDescriptor},
    hid_class::HIDClass,
};

use crate::keyboard::{Key, Leds, Reporter};

use super::{hid_report::HidKeyboardReport, DeviceInfo};

/// USB HID reporter with keyboard, consumer-control and mouse endpoints.
pub struct UsbReporter<'a, B: UsbBus> {
    usb_device: UsbDevice<'a, B>,
    keyboard_hid: HIDClass<'a, B>,
    media_hid: HIDClass<'a, B>,
    mouse_hid: HIDClass<'a, B>,
    leds: Leds,
}

impl<'a, B: UsbBus> UsbReporter<'a, B> {
    const NUM_ROLLOVER: usize = 6;
    /// Cursor step per report while a movement key is held.
    const POINTER_STEP: i8 = 6;

    pub fn new(device_info: DeviceInfo, usb_bus_alloc: &'a UsbBusAllocator<B>) -> UsbReporter<'a, B> {
        let keyboard_hid = HIDClass::new(usb_bus_alloc, HidKeyboardReport::desc(), 10);
        let media_hid = HIDClass::new(usb_bus_alloc, MediaKeyboardReport::desc(), 10);
        let mouse_hid = HIDClass::new(usb_bus_alloc, MouseReport::desc(), 10);
        let descriptors = StringDescriptors::new(LangID::EN_US)
            .manufacturer(device_info.manufacturer)
            .serial_number(device_info.serial_number)
            .product(device_info.product_name);
        let usb_device = UsbDeviceBuilder::new(
            usb_bus_alloc,
            UsbVidPid(device_info.vendor_id, device_info.product_id),
        )
        .strings(&[descriptors])
        .expect("Failed to create string descriptors")
        .device_class(0)
        .build();

        UsbReporter {
            usb_device,
            keyboard_hid,
            media_hid,
            mouse_hid,
            leds: Leds::default(),
        }
    }

    pub fn poll(&mut self) {
        self.usb_device.poll(&mut [
            &mut self.keyboard_hid,
            &mut self.media_hid,
            &mut self.mouse_hid,
        ]);
        let mut report = [0u8; 8];
        if let Ok(n) = self.keyboard_hid.pull_raw_output(&mut report) {
            if n > 0 {
                self.leds = Leds::from(report[0]);
            }
        }
    }
}

impl<'a, B: UsbBus> Reporter for UsbReporter<'a, B> {
    type Error = UsbError;

    fn is_ready(&self) -> bool {
        self.usb_device.state() == UsbDeviceState::Configured
    }

    fn send(&mut self, keys: &[Key]) -> Result<(), UsbError> {
        self.keyboard_hid
            .push_input(&keyboard_report(keys, Self::NUM_ROLLOVER))?;
        self.media_hid.push_input(&media_report(keys))?;
        self.mouse_hid
            .push_input(&mouse_report(keys, Self::POINTER_STEP))?;
        Ok(())
    }

    fn leds(&self) -> Leds {
        self.leds
    }
}

fn keyboard_report(keys: &[Key], rollover: usize) -> HidKeyboardReport {
    let mut report = HidKeyboardReport::empty();
    report.modifier = keys
        .iter()
        .map(|key| key.modifier_key_flag())
        .fold(0x00_u8, |acc, flag| acc | flag);
    keys.iter()
        .filter_map(|key| key.key_code())
        .take(rollover)
        .enumerate()
        .for_each(|(i, code)| report.key_codes[i] = code);
    report
}

fn media_report(keys: &[Key]) -> MediaKeyboardReport {
    let usage_id = keys
        .iter()
        .find(|key| key.is_media_key())
        .map(|key| key.media_usage_id())
        .unwrap_or(0);
    MediaKeyboardReport { usage_id }
}

fn mouse_report(keys: &[Key], step: i8) -> MouseReport {
    let mut report = MouseReport {
        buttons: 0,
        x: 0,
        y: 0,
        wheel: 0,
        pan: 0,
    };
    for key in keys.iter().filter(|key| key.is_mouse_key()) {
        match key {
            Key::MouseUp => report.y = report.y.saturating_sub(step),
            Key::MouseDown => report.y = report.y.saturating_add(step),
            Key::MouseLeft => report.x = report.x.saturating_sub(step),
            Key::MouseRight => report.x = report.x.saturating_add(step),
            Key::MouseWheelUp => report.wheel = 1,
            Key::MouseWheelDown => report.wheel = -1,
            _ => report.buttons |= key.mouse_button_mask(),
        }
    }
    report
}
