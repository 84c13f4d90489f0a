// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2023.

//! Board file for an EFR32xG22 radio board (BRD4182A) on the Wireless
//! Starter Kit mainboard.
//!
//! Puts the chip into EM4 with push button 1 (PB01) armed as the wakeup
//! source. After the wakeup reset LED0 blinks. Hold push button 0 (PB00)
//! during reset to stop at a breakpoint before EM4 is entered, which is the
//! only way to reconnect a debugger to a board that keeps going back to
//! sleep.
//!
//! Debug output goes to the kit's virtual COM port at 115200 baud.

#![no_std]
#![no_main]
#![deny(missing_docs)]

use capsules_core::em4_wakeup::{Em4Wakeup, Em4WakeupPins};
use capsules_core::mx25r::Mx25r;
use efr32xg22::chip::{CoreDelay, Cpu, Efr32xg22DefaultPeripherals};
use efr32xg22::cmu::PeripheralClock;
use efr32xg22::dcdc::Dcdc;
use efr32xg22::emu::Emu;
use efr32xg22::gpio::{GpioPin, PinId};
use efr32xg22::usart::{SpiPins, Usart};
use kernel::static_init;

/// Support routines for debugging I/O.
pub mod io;

const ESCAPE_BUTTON: PinId = PinId::PB00;
/// EM4WU line 3.
const WAKEUP_BUTTON: PinId = PinId::PB01;
const LED0: PinId = PinId::PD02;
const LED1: PinId = PinId::PD03;

/// MX25R8035F on USART0.
const FLASH_PINS: SpiPins = SpiPins {
    mosi: PinId::PC00,
    miso: PinId::PC01,
    sclk: PinId::PC02,
    cs: PinId::PC04,
};
/// Upper bound; the USART rounds down to 4.75 MHz from the 19 MHz clock.
const FLASH_SPI_HZ: u32 = 8_000_000;

const BLINK_DELAY_US: u32 = 250_000;

/// Dummy buffer that causes the linker to reserve enough space for the stack.
#[no_mangle]
#[link_section = ".stack_buffer"]
pub static mut STACK_MEMORY: [u8; 0x1000] = [0; 0x1000];

type Flash = Mx25r<'static, Usart>;
type Em4Demo = Em4Wakeup<'static, GpioPin, PeripheralClock, Dcdc, Emu, Usart, Cpu, CoreDelay>;

/// Main function called after RAM is initialized.
///
/// # Safety
/// Entered once, from the reset vector.
#[no_mangle]
pub unsafe extern "C" fn reset_handler() {
    efr32xg22::init();

    let peripherals = static_init!(
        Efr32xg22DefaultPeripherals,
        Efr32xg22DefaultPeripherals::new()
    );

    let console = io::init_console();

    peripherals.usart0.set_spi_pins(FLASH_PINS);
    let flash = static_init!(Flash, Mx25r::new(&peripherals.usart0, FLASH_SPI_HZ));

    let ports = &peripherals.gpio_ports;
    let em4 = static_init!(
        Em4Demo,
        Em4Wakeup::new(
            Em4WakeupPins {
                escape: &ports[ESCAPE_BUTTON],
                wakeup: &ports[WAKEUP_BUTTON],
                led0: &ports[LED0],
                led1: &ports[LED1],
            },
            &peripherals.gpio_clock,
            &peripherals.dcdc,
            &peripherals.emu,
            flash,
            &peripherals.cpu,
            &peripherals.delay,
            BLINK_DELAY_US,
        )
    );

    em4.set_deep_sleep_client(console);

    em4.run();
}
