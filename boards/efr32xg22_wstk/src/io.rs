// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2023.

use core::panic::PanicInfo;
use core::ptr::addr_of_mut;

use efr32xg22::cmu::{Clock, PeripheralClock, CMU_BASE};
use efr32xg22::console::Console;
use efr32xg22::gpio::{GpioPin, PinId, GPIO_BASE};
use efr32xg22::usart::{UartPins, Usart, USART1_BASE};
use kernel::debug;
use kernel::hil::clock::ClockInterface;
use kernel::hil::gpio::Configure;

/// WSTK virtual COM port, routed through the board controller.
const VCOM_PINS: UartPins = UartPins {
    tx: PinId::PA05,
    rx: PinId::PA06,
};
/// Must be driven high for the board controller to pass VCOM traffic.
const VCOM_ENABLE: PinId = PinId::PD04;
const VCOM_BAUD: u32 = 115_200;

/// Global static for debug writer
pub static mut WRITER: Console = Console::new(
    Usart::new(
        USART1_BASE,
        1,
        PeripheralClock::new(CMU_BASE, Clock::Usart1),
        GPIO_BASE,
    ),
    PeripheralClock::new(CMU_BASE, Clock::Gpio),
    GPIO_BASE,
    VCOM_PINS,
    Some(VCOM_ENABLE),
    VCOM_BAUD,
);

/// Make the virtual COM port the `debug!` sink and return it, for release
/// before EM4.
///
/// The port is brought up by the first write, which the sequencer only makes
/// after it has initialized the DC-DC and released the previous EM4 latch.
pub unsafe fn init_console() -> &'static Console {
    debug::set_debug_writer(&mut *addr_of_mut!(WRITER));
    &*addr_of_mut!(WRITER)
}

/// Panic handler.
///
/// Prints the panic on the virtual COM port and blinks LED0 (PD02).
#[cfg(not(test))]
#[panic_handler]
pub unsafe fn panic_fmt(pi: &PanicInfo) -> ! {
    PeripheralClock::new(CMU_BASE, Clock::Gpio).enable();
    let led = &GpioPin::new(GPIO_BASE, PinId::PD02);
    led.make_output();
    let writer = &mut *addr_of_mut!(WRITER);
    debug::panic(&[led], writer, pi, &cortexm::support::nop)
}
