// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2023.

//! Board file for the EFM32 Pearl Gecko PG12 Starter Kit (SLSTK3402A).
//!
//! Outputs the LFRCO (32.768 kHz) on PA0 through CMU CLKOUT1, route
//! location 0, then idles. PA0 is on pin 3 of the kit's expansion header.
//!
//! - <https://www.silabs.com/development-tools/mcu/32-bit/efm32pg12-starter-kit>

#![no_std]
#![no_main]
#![deny(missing_docs)]

use capsules_core::clock_output::ClockOutputConfigurator;
use efm32pg12::chip::Efm32pg12DefaultPeripherals;
use efm32pg12::cmu::{ClockOut, ClockOutSource, Lfrco, PeripheralClock};
use efm32pg12::gpio::{GpioPin, PinId, Port};
use kernel::static_init;

/// Support routines for debugging I/O.
pub mod io;

/// CLKOUT1 location 0 is PA0.
const CLKOUT_PIN: PinId = PinId::new(Port::A, 0);
const CLKOUT_LOCATION: u8 = 0;

/// Dummy buffer that causes the linker to reserve enough space for the stack.
#[no_mangle]
#[link_section = ".stack_buffer"]
pub static mut STACK_MEMORY: [u8; 0x1000] = [0; 0x1000];

type ClockOutputDemo = ClockOutputConfigurator<'static, PeripheralClock, GpioPin, Lfrco, ClockOut>;

/// Main function called after RAM is initialized.
///
/// # Safety
/// Entered once, from the reset vector.
#[no_mangle]
pub unsafe extern "C" fn reset_handler() {
    efm32pg12::init();

    let peripherals = static_init!(
        Efm32pg12DefaultPeripherals,
        Efm32pg12DefaultPeripherals::new()
    );
    peripherals.clkout1.set_location(CLKOUT_LOCATION);

    let clock_output = static_init!(
        ClockOutputDemo,
        ClockOutputConfigurator::new(
            &peripherals.gpio_clock,
            &peripherals.gpio_ports[CLKOUT_PIN],
            &peripherals.lfrco,
            &peripherals.clkout1,
            ClockOutSource::Lfrco,
        )
    );

    clock_output.run();
}
