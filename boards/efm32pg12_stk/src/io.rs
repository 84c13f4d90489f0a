// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2023.

use core::fmt::Write;
use core::panic::PanicInfo;
use core::ptr::addr_of_mut;

use cortex_m_semihosting::hprint;
use efm32pg12::cmu::{HfBusClock, PeripheralClock, CMU_BASE};
use efm32pg12::gpio::{GpioPin, PinId, Port, GPIO_BASE};
use kernel::debug::{self, IoWrite};
use kernel::hil::clock::ClockInterface;
use kernel::hil::gpio::Configure;

/// Writer is used by kernel::debug to print the panic message to the
/// debugger through semihosting.
///
/// Semihosting halts the core if no debugger is attached, so it is only used
/// on the panic path and never registered as the `debug!` sink.
pub struct Writer {}

/// Global static for debug writer
pub static mut WRITER: Writer = Writer {};

impl Write for Writer {
    fn write_str(&mut self, s: &str) -> ::core::fmt::Result {
        self.write(s.as_bytes());
        Ok(())
    }
}

impl IoWrite for Writer {
    fn write(&mut self, buf: &[u8]) -> usize {
        for &c in buf {
            hprint!("{}", c as char).unwrap_or_else(|_| {});
        }
        buf.len()
    }
}

/// Panic handler.
///
/// Prints the panic through semihosting and blinks LED0 (PF4).
#[cfg(not(test))]
#[panic_handler]
pub unsafe fn panic_fmt(pi: &PanicInfo) -> ! {
    PeripheralClock::new(CMU_BASE, HfBusClock::Gpio).enable();
    let led = &GpioPin::new(GPIO_BASE, PinId::new(Port::F, 4));
    led.make_output();
    let writer = &mut *addr_of_mut!(WRITER);
    debug::panic(&[led], writer, pi, &cortexm::support::nop)
}
