use rp_pico::hal::uart::{Enabled, ReadErrorType, UartDevice, UartPeripheral, ValidUartPinout};
use splitkbd::split::Connection;

/// The UART joining the two halves.
pub struct UartLink<D: UartDevice, P: ValidUartPinout<D>>(pub UartPeripheral<Enabled, D, P>);

impl<D: UartDevice, P: ValidUartPinout<D>> Connection for UartLink<D, P> {
    type Error = UartReadError;

    fn read_raw(&self, buffer: &mut [u8]) -> nb::Result<usize, UartReadError> {
        self.0
            .read_raw(buffer)
            .map_err(|e| e.map(|e| UartReadError(e.err_type)))
    }

    fn write(&self, data: &[u8]) {
        self.0.write_full_blocking(data);
    }

    fn read(&self, buffer: &mut [u8]) -> Result<(), UartReadError> {
        self.0.read_full_blocking(buffer).map_err(UartReadError)
    }
}

#[derive(Debug)]
pub struct UartReadError(pub ReadErrorType);

impl defmt::Format for UartReadError {
    fn format(&self, fmt: defmt::Formatter) {
        match self.0 {
            ReadErrorType::Overrun => defmt::write!(fmt, "uart overrun"),
            ReadErrorType::Break => defmt::write!(fmt, "uart break"),
            ReadErrorType::Parity => defmt::write!(fmt, "uart parity error"),
            ReadErrorType::Framing => defmt::write!(fmt, "uart framing error"),
        }
    }
}
