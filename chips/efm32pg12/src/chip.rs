// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Peripherals of the EFM32PG12 used by the boards.

use kernel::utilities::StaticRef;

use crate::cmu::{self, ClockOut, ClockOutChannel, CmuRegisters, HfBusClock, Lfrco, PeripheralClock};
use crate::gpio::{self, GpioPorts, GpioRegisters};

/// Core clock after reset: HFRCO at 19 MHz.
pub const CORE_CLOCK_HZ: u32 = 19_000_000;

pub struct Efm32pg12DefaultPeripherals {
    pub gpio_clock: PeripheralClock,
    pub lfrco: Lfrco,
    pub clkout0: ClockOut,
    pub clkout1: ClockOut,
    pub gpio_ports: GpioPorts,
}

impl Efm32pg12DefaultPeripherals {
    pub fn new() -> Self {
        Self::with_registers(cmu::CMU_BASE, gpio::GPIO_BASE)
    }

    fn with_registers(cmu: StaticRef<CmuRegisters>, gpio: StaticRef<GpioRegisters>) -> Self {
        Self {
            gpio_clock: PeripheralClock::new(cmu, HfBusClock::Gpio),
            lfrco: Lfrco::new(cmu),
            clkout0: ClockOut::new(cmu, ClockOutChannel::ClkOut0),
            clkout1: ClockOut::new(cmu, ClockOutChannel::ClkOut1),
            gpio_ports: GpioPorts::new(gpio),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Efm32pg12DefaultPeripherals;
    use crate::cmu::tests::{fake_cmu, set_status};
    use crate::cmu::ClockOutSource;
    use crate::gpio::tests::fake_gpio;
    use crate::gpio::{Mode, PinId, Port};
    use capsules_core::clock_output::ClockOutputConfigurator;
    use kernel::utilities::registers::interfaces::Readable;

    #[test]
    fn lfrco_reaches_pa0() {
        let cmu = fake_cmu();
        let gpio = fake_gpio();
        // LFRCO enabled and ready.
        set_status(&cmu, (1 << 6) | (1 << 7));

        let peripherals = Efm32pg12DefaultPeripherals::with_registers(cmu, gpio);
        let pa0 = &peripherals.gpio_ports[PinId::new(Port::A, 0)];
        peripherals.clkout1.set_location(0);
        ClockOutputConfigurator::new(
            &peripherals.gpio_clock,
            pa0,
            &peripherals.lfrco,
            &peripherals.clkout1,
            ClockOutSource::Lfrco,
        )
        .configure();

        assert_eq!(pa0.mode(), Mode::PushPull);
        assert_eq!(gpio.ports[0].dout.get() & 1, 0);
        // CTRL.CLKOUTSEL1 = LFRCO
        assert_eq!((cmu.ctrl.get() >> 5) & 0xF, 2);
        // ROUTEPEN.CLKOUT1PEN, ROUTELOC0.CLKOUT1LOC = 0
        assert_eq!(cmu.routepen.get(), 1 << 1);
        assert_eq!((cmu.routeloc0.get() >> 8) & 0x3F, 0);
        // HFBUSCLKEN0.GPIO
        assert_eq!(cmu.hfbusclken0.get(), 1 << 3);
    }
}
