#![no_std]
#![no_main]

use core::{
    cell::RefCell,
    sync::atomic::{AtomicUsize, Ordering},
};

use cortex_m::{delay::Delay, interrupt::Mutex};
use defmt_rtt as _;
use embedded_hal::spi::MODE_0;
use embedded_hal_0_2::digital::v2::InputPin as _;
use euclid36::{
    drawing,
    key_matrix::KeyMatrix,
    layout::Layout,
    rotary_encoder::RotaryEncoder,
    scanner::Scanner,
};
use fugit::{ExtU32, ExtU64, RateExtU32};
use panic_probe as _;
use rp_pico::{
    entry,
    hal::{
        self,
        gpio::{
            bank0::{Gpio0, Gpio1},
            DynPinId, FunctionSioInput, FunctionSioOutput, FunctionSpi, FunctionUart, Pin,
            PullDown, PullUp,
        },
        multicore::{Multicore, Stack},
        sio::Spinlock0,
        timer::{Alarm, CountDown},
        uart::{DataBits, StopBits, UartConfig, UartPeripheral},
        usb::UsbBus,
        Clock, Sio, Spi, Timer, Watchdog,
    },
    pac::{self, interrupt, UART0},
};
use splitkbd::{
    keyboard::Controller,
    split::{SplitKeySwitches, SplitState},
    usb::{DeviceInfo, UsbReporter},
};
use ssd1306::{
    prelude::{DisplayConfig, SPIInterface},
    rotation::DisplayRotation,
    size::DisplaySize128x32,
    Ssd1306,
};
use uart_connection::UartLink;
use usb_device::class_prelude::UsbBusAllocator;

mod uart_connection;

type MatrixInput = Pin<DynPinId, FunctionSioInput, PullDown>;
type MatrixOutput = Pin<DynPinId, FunctionSioOutput, PullDown>;
type EncoderPin = Pin<DynPinId, FunctionSioInput, PullUp>;
type UartPins = (
    Pin<Gpio0, FunctionUart, PullDown>,
    Pin<Gpio1, FunctionUart, PullDown>,
);
type HalfScanner =
    Scanner<MatrixInput, MatrixOutput, Delay, EncoderPin, EncoderPin, CountDown<'static>>;
type KeyboardType = Controller<
    3,
    16,
    UsbReporter<'static, UsbBus>,
    SplitKeySwitches<2, 16, UartLink<UART0, UartPins>, HalfScanner, CountDown<'static>>,
    Layout,
>;

static mut KEYBOARD: Mutex<RefCell<Option<KeyboardType>>> = Mutex::new(RefCell::new(None));
static mut ALARM: Mutex<RefCell<Option<hal::timer::Alarm0>>> = Mutex::new(RefCell::new(None));
static mut CORE1_STACK: Stack<4096> = Stack::new();

const USB_SEND_INTERVAL_MICROS: u32 = 10_000;
const SPLIT_READ_TIMEOUT_MICROS: u64 = 10_000;
/// Longer than one USB report interval, so no detent pulse is missed.
const ENCODER_PULSE_MICROS: u64 = 15_000;
const ENCODER_GAP_MICROS: u64 = 8_000;

#[entry]
fn main() -> ! {
    // These must be static due to lifetime constraints
    static mut TIMER: Option<Timer> = None;
    static mut USB_BUS: Option<UsbBusAllocator<hal::usb::UsbBus>> = None;

    defmt::info!("Launching euclid36");

    let mut pac = pac::Peripherals::take().unwrap();
    let core = pac::CorePeripherals::take().unwrap();
    let mut sio = Sio::new(pac.SIO);
    let pins = rp_pico::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );
    // The watchdog is only used as the clock setup helper requires one.
    let mut watchdog = Watchdog::new(pac.WATCHDOG);
    let clocks = hal::clocks::init_clocks_and_plls(
        rp_pico::XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();
    let mut delay = Delay::new(core.SYST, clocks.system_clock.freq().to_Hz());
    *TIMER = Some(Timer::new(pac.TIMER, &mut pac.RESETS, &clocks));

    let mut alarm = TIMER.as_mut().unwrap().alarm_0().unwrap();
    alarm.schedule(USB_SEND_INTERVAL_MICROS.micros()).unwrap();
    alarm.enable_interrupt();
    cortex_m::interrupt::free(|cs| unsafe {
        ALARM.borrow(cs).replace(Some(alarm));
    });

    let mut mc = Multicore::new(&mut pac.PSM, &mut pac.PPB, &mut sio.fifo);
    let cores = mc.cores();
    let core1 = &mut cores[1];

    let usb_bus = UsbBusAllocator::new(hal::usb::UsbBus::new(
        pac.USBCTRL_REGS,
        pac.USBCTRL_DPRAM,
        clocks.usb_clock,
        true,
        &mut pac.RESETS,
    ));
    *USB_BUS = Some(usb_bus);

    let uart_pins: UartPins = (
        pins.gpio0.into_function::<FunctionUart>(),
        pins.gpio1.into_function::<FunctionUart>(),
    );
    let mut uart = UartPeripheral::new(pac.UART0, uart_pins, &mut pac.RESETS)
        .enable(
            UartConfig::new(9600.Hz(), DataBits::Eight, None, StopBits::One),
            clocks.peripheral_clock.freq(),
        )
        .unwrap();
    uart.enable_rx_interrupt();
    let link = UartLink(uart);

    // The display controller needs a moment after power-up before init.
    delay.delay_ms(100);

    let spi_sclk = pins.gpio6.into_function::<FunctionSpi>();
    let spi_mosi = pins.gpio7.into_function::<FunctionSpi>();
    let spi = Spi::<_, _, _, 8>::new(pac.SPI0, (spi_mosi, spi_sclk)).init(
        &mut pac.RESETS,
        clocks.peripheral_clock.freq(),
        16u32.MHz(),
        MODE_0,
    );
    let interface = SPIInterface::new(
        spi,
        pins.gpio4.into_push_pull_output(),
        pins.gpio5.into_push_pull_output(),
    );
    let mut display = Ssd1306::new(interface, DisplaySize128x32, DisplayRotation::Rotate180)
        .into_buffered_graphics_mode();
    display.init().ok();

    // Strapped low on the left half.
    let side = pins.gpio22.into_pull_up_input();
    let is_left = side.is_low().unwrap();

    let rows: [MatrixInput; 4] = [
        pins.gpio16.into_pull_down_input().into_dyn_pin(),
        pins.gpio17.into_pull_down_input().into_dyn_pin(),
        pins.gpio18.into_pull_down_input().into_dyn_pin(),
        pins.gpio19.into_pull_down_input().into_dyn_pin(),
    ];
    let cols: [MatrixOutput; 5] = [
        pins.gpio10.into_push_pull_output().into_dyn_pin(),
        pins.gpio11.into_push_pull_output().into_dyn_pin(),
        pins.gpio12.into_push_pull_output().into_dyn_pin(),
        pins.gpio13.into_push_pull_output().into_dyn_pin(),
        pins.gpio14.into_push_pull_output().into_dyn_pin(),
    ];
    let matrix = KeyMatrix::new(rows, cols, delay);
    let encoder = RotaryEncoder::new(
        pins.gpio20.into_pull_up_input().into_dyn_pin(),
        pins.gpio21.into_pull_up_input().into_dyn_pin(),
        if is_left { 0 } else { 1 },
        TIMER.as_ref().unwrap().count_down(),
        ENCODER_PULSE_MICROS.micros(),
        ENCODER_GAP_MICROS.micros(),
    );

    let key_switches = SplitKeySwitches::new(
        Scanner::new(matrix, encoder),
        link,
        TIMER.as_ref().unwrap().count_down(),
        SPLIT_READ_TIMEOUT_MICROS.micros(),
        is_left,
    );
    let device_info = DeviceInfo {
        manufacturer: "ffkeebs",
        vendor_id: 0xfeed,
        product_id: 0x0036,
        product_name: "euclid36",
        serial_number: "36",
    };
    let reporter = UsbReporter::new(device_info, USB_BUS.as_ref().unwrap());
    let keyboard = Controller::new(reporter, key_switches, Layout::default());
    cortex_m::interrupt::free(|cs| unsafe {
        KEYBOARD.borrow(cs).replace(Some(keyboard));
    });

    unsafe {
        pac::NVIC::unmask(hal::pac::Interrupt::USBCTRL_IRQ);
        pac::NVIC::unmask(hal::pac::Interrupt::UART0_IRQ);
        pac::NVIC::unmask(hal::pac::Interrupt::TIMER_IRQ_0);
    }

    static COUNT: AtomicUsize = AtomicUsize::new(0);
    defmt::timestamp!("{=usize}", {
        // NOTE(no-CAS) `timestamp` runs with interrupts disabled
        let n = COUNT.load(Ordering::Relaxed);
        COUNT.store(n + 1, Ordering::Relaxed);
        n
    });

    core1
        .spawn(unsafe { &mut CORE1_STACK.mem }, move || loop {
            let (state, split_state) = cortex_m::interrupt::free(|cs| unsafe {
                let _lock = Spinlock0::claim();
                let keyboard = KEYBOARD.borrow(cs).borrow();
                let keyboard = keyboard.as_ref().unwrap();
                (keyboard.get_state(), keyboard.key_switches.state())
            });
            match split_state {
                SplitState::Controller => drawing::draw_status(&mut display, &state),
                _ => drawing::draw_logo(&mut display),
            }
            display.flush().ok();
        })
        .unwrap();

    loop {
        cortex_m::interrupt::free(|cs| unsafe {
            let _lock = Spinlock0::claim();
            KEYBOARD
                .borrow(cs)
                .borrow_mut()
                .as_mut()
                .map(Controller::main_loop);
        });
    }
}

#[allow(non_snake_case)]
#[interrupt]
fn USBCTRL_IRQ() {
    cortex_m::interrupt::free(|cs| unsafe {
        let _lock = Spinlock0::claim();
        KEYBOARD
            .borrow(cs)
            .borrow_mut()
            .as_mut()
            .map(|keyboard| keyboard.reporter.poll());
    });
}

#[allow(non_snake_case)]
#[interrupt]
fn UART0_IRQ() {
    cortex_m::interrupt::free(|cs| unsafe {
        let _lock = Spinlock0::claim();
        KEYBOARD
            .borrow(cs)
            .borrow_mut()
            .as_mut()
            .map(|keyboard| keyboard.key_switches.poll());
    });
    cortex_m::asm::sev();
}

#[allow(non_snake_case)]
#[interrupt]
fn TIMER_IRQ_0() {
    cortex_m::interrupt::free(|cs| unsafe {
        let mut alarm = ALARM.borrow(cs).borrow_mut();
        let alarm = alarm.as_mut().unwrap();
        alarm.clear_interrupt();
        alarm.schedule(USB_SEND_INTERVAL_MICROS.micros()).unwrap();
        let _lock = Spinlock0::claim();
        alarm.enable_interrupt();
        if let Some(Err(e)) = KEYBOARD
            .borrow(cs)
            .borrow_mut()
            .as_mut()
            .map(Controller::send_keys)
        {
            defmt::warn!("UsbError: {}", defmt::Debug2Format(&e));
        }
    });
}
