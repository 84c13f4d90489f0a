// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Clock Management Unit (CMU), Series 2.
//!
//! Series 2 parts gate every peripheral clock individually through CLKEN0
//! and CLKEN1. The clock tree itself is left in its reset configuration
//! (HFRCODPLL at 19 MHz feeding HCLK and PCLK).

use kernel::hil::clock::ClockInterface;
use kernel::utilities::registers::interfaces::{ReadWriteable, Readable};
use kernel::utilities::registers::{register_bitfields, register_structs, ReadWrite};
use kernel::utilities::StaticRef;

register_structs! {
    pub CmuRegisters {
        (0x000 => _reserved0),
        /// Clock Enable Register 0
        (0x064 => pub(crate) clken0: ReadWrite<u32, CLKEN0::Register>),
        (0x068 => @END),
    }
}

register_bitfields![u32,
    CLKEN0 [
        LDMA 0,
        LDMAXBAR 1,
        RADIOAES 2,
        GPCRC 3,
        TIMER0 4,
        TIMER1 5,
        TIMER2 6,
        TIMER3 7,
        USART0 8,
        USART1 9,
        IADC0 10,
        AMUXCP0 11,
        LETIMER0 12,
        WDOG0 13,
        I2C0 14,
        I2C1 15,
        SYSCFG 16,
        DPLL0 17,
        HFRCO0 18,
        HFXO0 19,
        FSRCO 20,
        LFRCO 21,
        LFXO 22,
        ULFRCO 23,
        EUART0 24,
        PDM 25,
        GPIO 26,
        PRS 27,
        BURAM 28,
        BURTC 29,
        RTCC 30,
        DCDC 31
    ]
];

pub const CMU_BASE: StaticRef<CmuRegisters> =
    unsafe { StaticRef::new(0x4000_8000 as *const CmuRegisters) };

/// Peripheral clock after reset, in Hz.
pub const PCLK_HZ: u32 = 19_000_000;

/// Peripheral clocks gated in CLKEN0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Clock {
    Usart0,
    Usart1,
    Gpio,
    Dcdc,
}

/// Clock gate of one peripheral.
pub struct PeripheralClock {
    registers: StaticRef<CmuRegisters>,
    clock: Clock,
}

impl PeripheralClock {
    pub const fn new(registers: StaticRef<CmuRegisters>, clock: Clock) -> Self {
        Self { registers, clock }
    }
}

impl ClockInterface for PeripheralClock {
    fn is_enabled(&self) -> bool {
        let en = &self.registers.clken0;
        match self.clock {
            Clock::Usart0 => en.is_set(CLKEN0::USART0),
            Clock::Usart1 => en.is_set(CLKEN0::USART1),
            Clock::Gpio => en.is_set(CLKEN0::GPIO),
            Clock::Dcdc => en.is_set(CLKEN0::DCDC),
        }
    }

    fn enable(&self) {
        let en = &self.registers.clken0;
        match self.clock {
            Clock::Usart0 => en.modify(CLKEN0::USART0::SET),
            Clock::Usart1 => en.modify(CLKEN0::USART1::SET),
            Clock::Gpio => en.modify(CLKEN0::GPIO::SET),
            Clock::Dcdc => en.modify(CLKEN0::DCDC::SET),
        }
    }

    fn disable(&self) {
        let en = &self.registers.clken0;
        match self.clock {
            Clock::Usart0 => en.modify(CLKEN0::USART0::CLEAR),
            Clock::Usart1 => en.modify(CLKEN0::USART1::CLEAR),
            Clock::Gpio => en.modify(CLKEN0::GPIO::CLEAR),
            Clock::Dcdc => en.modify(CLKEN0::DCDC::CLEAR),
        }
    }
}
