// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Peripherals of the EFR32xG22 used by the boards, and the core helpers
//! that go with them.

use kernel::hil::cpu::Breakpoint;
use kernel::hil::time::BusyWait;
use kernel::utilities::StaticRef;

use crate::cmu::{self, Clock, CmuRegisters, PeripheralClock};
use crate::dcdc::{self, Dcdc, DcdcRegisters};
use crate::emu::{self, Emu, EmuRegisters};
use crate::gpio::{self, GpioPorts, GpioRegisters};
use crate::usart::{self, Usart, UsartRegisters};

/// Core clock after reset: HFRCODPLL at 19 MHz.
pub const CORE_CLOCK_HZ: u32 = 19_000_000;

/// Debug access to the Cortex-M33 core.
pub struct Cpu;

impl Breakpoint for Cpu {
    fn breakpoint(&self) {
        cortexm::support::bkpt();
    }
}

/// Busy-wait on the core clock.
pub struct CoreDelay {
    core_hz: u32,
}

impl CoreDelay {
    pub const fn new(core_hz: u32) -> Self {
        Self { core_hz }
    }
}

impl BusyWait for CoreDelay {
    fn busy_wait_us(&self, us: u32) {
        cortexm::support::delay_cycles(cortexm::support::cycles_for_us(self.core_hz, us));
    }
}

pub struct Efr32xg22DefaultPeripherals {
    pub gpio_clock: PeripheralClock,
    pub gpio_ports: GpioPorts,
    pub emu: Emu,
    pub dcdc: Dcdc,
    /// Wired to the radio board's SPI flash.
    pub usart0: Usart,
    pub cpu: Cpu,
    pub delay: CoreDelay,
}

impl Efr32xg22DefaultPeripherals {
    pub fn new() -> Self {
        Self::with_registers(
            cmu::CMU_BASE,
            gpio::GPIO_BASE,
            emu::EMU_BASE,
            dcdc::DCDC_BASE,
            usart::USART0_BASE,
        )
    }

    fn with_registers(
        cmu: StaticRef<CmuRegisters>,
        gpio: StaticRef<GpioRegisters>,
        emu: StaticRef<EmuRegisters>,
        dcdc: StaticRef<DcdcRegisters>,
        usart0: StaticRef<UsartRegisters>,
    ) -> Self {
        Self {
            gpio_clock: PeripheralClock::new(cmu, Clock::Gpio),
            gpio_ports: GpioPorts::new(gpio),
            emu: Emu::new(emu),
            dcdc: Dcdc::new(dcdc, PeripheralClock::new(cmu, Clock::Dcdc)),
            usart0: Usart::new(usart0, 0, PeripheralClock::new(cmu, Clock::Usart0), gpio),
            cpu: Cpu,
            delay: CoreDelay::new(CORE_CLOCK_HZ),
        }
    }
}
