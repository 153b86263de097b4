mod device_info;
mod hid_report;
mod reporter;

pub use device_info::DeviceInfo;
pub use reporter::UsbReporter;
