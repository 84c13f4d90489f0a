// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Clock Management Unit (CMU)
//!
//! Only the parts needed to gate the GPIO clock, run the LFRCO, and drive a
//! clock onto the CLKOUT pins are modeled here.

use core::cell::Cell;

use kernel::hil::clock::{ClockInterface, ClockOutput, Oscillator};
use kernel::utilities::registers::interfaces::{ReadWriteable, Readable, Writeable};
use kernel::utilities::registers::{register_bitfields, register_structs, ReadOnly, ReadWrite, WriteOnly};
use kernel::utilities::StaticRef;

register_structs! {
    pub CmuRegisters {
        /// CMU Control Register
        (0x000 => pub(crate) ctrl: ReadWrite<u32, CTRL::Register>),
        (0x004 => _reserved0),
        /// Oscillator Enable/Disable Command Register
        (0x060 => oscencmd: WriteOnly<u32, OSCENCMD::Register>),
        (0x064 => _reserved1),
        /// Status Register
        (0x090 => pub(crate) status: ReadOnly<u32, STATUS::Register>),
        (0x094 => _reserved2),
        /// High Frequency Bus Clock Enable Register 0
        (0x0B0 => pub(crate) hfbusclken0: ReadWrite<u32, HFBUSCLKEN0::Register>),
        (0x0B4 => _reserved3),
        /// I/O Routing Pin Enable Register
        (0x110 => pub(crate) routepen: ReadWrite<u32, ROUTEPEN::Register>),
        /// I/O Routing Location Register 0
        (0x114 => pub(crate) routeloc0: ReadWrite<u32, ROUTELOC0::Register>),
        (0x118 => @END),
    }
}

register_bitfields![u32,
    CTRL [
        /// Clock Output Select 0
        CLKOUTSEL0 OFFSET(0) NUMBITS(4) [],
        /// Clock Output Select 1
        CLKOUTSEL1 OFFSET(5) NUMBITS(4) []
    ],
    OSCENCMD [
        HFRCOEN 0,
        HFRCODIS 1,
        HFXOEN 2,
        HFXODIS 3,
        AUXHFRCOEN 4,
        AUXHFRCODIS 5,
        LFRCOEN 6,
        LFRCODIS 7,
        LFXOEN 8,
        LFXODIS 9
    ],
    STATUS [
        HFRCOENS 0,
        HFRCORDY 1,
        HFXOENS 2,
        HFXORDY 3,
        AUXHFRCOENS 4,
        AUXHFRCORDY 5,
        LFRCOENS 6,
        LFRCORDY 7,
        LFXOENS 8,
        LFXORDY 9
    ],
    HFBUSCLKEN0 [
        CRYPTO0 0,
        CRYPTO1 1,
        LE 2,
        GPIO 3,
        PRS 4,
        LDMA 5,
        GPCRC 6
    ],
    ROUTEPEN [
        CLKOUT0PEN 0,
        CLKOUT1PEN 1,
        CLKIN0PEN 31
    ],
    ROUTELOC0 [
        CLKOUT0LOC OFFSET(0) NUMBITS(6) [],
        CLKOUT1LOC OFFSET(8) NUMBITS(6) [],
        CLKIN0LOC OFFSET(24) NUMBITS(6) []
    ]
];

pub const CMU_BASE: StaticRef<CmuRegisters> =
    unsafe { StaticRef::new(0x400E_4000 as *const CmuRegisters) };

/// Clocks that can be driven onto a CLKOUT pin.
///
/// The `*Q` variants are the qualified (gated once stable) versions of the
/// oscillator outputs.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(u32)]
pub enum ClockOutSource {
    Ulfrco = 1,
    Lfrco = 2,
    Lfxo = 3,
    Hfxo = 6,
    Hfexpclk = 7,
    UlfrcoQ = 9,
    LfrcoQ = 10,
    LfxoQ = 11,
    HfrcoQ = 12,
    AuxhfrcoQ = 13,
    HfxoQ = 14,
    Hfsrcclk = 15,
}

impl ClockOutSource {
    fn from_sel(sel: u32) -> Option<Self> {
        match sel {
            1 => Some(Self::Ulfrco),
            2 => Some(Self::Lfrco),
            3 => Some(Self::Lfxo),
            6 => Some(Self::Hfxo),
            7 => Some(Self::Hfexpclk),
            9 => Some(Self::UlfrcoQ),
            10 => Some(Self::LfrcoQ),
            11 => Some(Self::LfxoQ),
            12 => Some(Self::HfrcoQ),
            13 => Some(Self::AuxhfrcoQ),
            14 => Some(Self::HfxoQ),
            15 => Some(Self::Hfsrcclk),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HfBusClock {
    Le,
    Gpio,
    Prs,
    Ldma,
    Gpcrc,
}

/// Clock gate of a peripheral on the HF bus.
pub struct PeripheralClock {
    registers: StaticRef<CmuRegisters>,
    clock: HfBusClock,
}

impl PeripheralClock {
    pub const fn new(registers: StaticRef<CmuRegisters>, clock: HfBusClock) -> Self {
        Self { registers, clock }
    }
}

impl ClockInterface for PeripheralClock {
    fn is_enabled(&self) -> bool {
        let en = &self.registers.hfbusclken0;
        match self.clock {
            HfBusClock::Le => en.is_set(HFBUSCLKEN0::LE),
            HfBusClock::Gpio => en.is_set(HFBUSCLKEN0::GPIO),
            HfBusClock::Prs => en.is_set(HFBUSCLKEN0::PRS),
            HfBusClock::Ldma => en.is_set(HFBUSCLKEN0::LDMA),
            HfBusClock::Gpcrc => en.is_set(HFBUSCLKEN0::GPCRC),
        }
    }

    fn enable(&self) {
        let en = &self.registers.hfbusclken0;
        match self.clock {
            HfBusClock::Le => en.modify(HFBUSCLKEN0::LE::SET),
            HfBusClock::Gpio => en.modify(HFBUSCLKEN0::GPIO::SET),
            HfBusClock::Prs => en.modify(HFBUSCLKEN0::PRS::SET),
            HfBusClock::Ldma => en.modify(HFBUSCLKEN0::LDMA::SET),
            HfBusClock::Gpcrc => en.modify(HFBUSCLKEN0::GPCRC::SET),
        }
    }

    fn disable(&self) {
        let en = &self.registers.hfbusclken0;
        match self.clock {
            HfBusClock::Le => en.modify(HFBUSCLKEN0::LE::CLEAR),
            HfBusClock::Gpio => en.modify(HFBUSCLKEN0::GPIO::CLEAR),
            HfBusClock::Prs => en.modify(HFBUSCLKEN0::PRS::CLEAR),
            HfBusClock::Ldma => en.modify(HFBUSCLKEN0::LDMA::CLEAR),
            HfBusClock::Gpcrc => en.modify(HFBUSCLKEN0::GPCRC::CLEAR),
        }
    }
}

/// Low Frequency RC Oscillator, 32.768 kHz.
pub struct Lfrco {
    registers: StaticRef<CmuRegisters>,
}

impl Lfrco {
    pub const fn new(registers: StaticRef<CmuRegisters>) -> Self {
        Self { registers }
    }
}

impl Oscillator for Lfrco {
    fn enable(&self) {
        self.registers.oscencmd.write(OSCENCMD::LFRCOEN::SET);
    }

    fn disable(&self) {
        self.registers.oscencmd.write(OSCENCMD::LFRCODIS::SET);
    }

    fn is_enabled(&self) -> bool {
        self.registers.status.is_set(STATUS::LFRCOENS)
    }

    fn is_ready(&self) -> bool {
        self.registers.status.is_set(STATUS::LFRCORDY)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClockOutChannel {
    ClkOut0,
    ClkOut1,
}

/// One CLKOUT channel.
///
/// Pin locations are listed in the device datasheet; CLKOUT1 location 0 is
/// PA0.
pub struct ClockOut {
    registers: StaticRef<CmuRegisters>,
    channel: ClockOutChannel,
    location: Cell<u8>,
}

impl ClockOut {
    pub const fn new(registers: StaticRef<CmuRegisters>, channel: ClockOutChannel) -> Self {
        Self {
            registers,
            channel,
            location: Cell::new(0),
        }
    }

    /// Pin location used by the next `enable_route`.
    pub fn set_location(&self, location: u8) {
        self.location.set(location & 0x3F);
    }
}

impl ClockOutput for ClockOut {
    type Source = ClockOutSource;

    fn set_source(&self, source: ClockOutSource) {
        let sel = source as u32;
        match self.channel {
            ClockOutChannel::ClkOut0 => self.registers.ctrl.modify(CTRL::CLKOUTSEL0.val(sel)),
            ClockOutChannel::ClkOut1 => self.registers.ctrl.modify(CTRL::CLKOUTSEL1.val(sel)),
        }
    }

    fn source(&self) -> Option<ClockOutSource> {
        let sel = match self.channel {
            ClockOutChannel::ClkOut0 => self.registers.ctrl.read(CTRL::CLKOUTSEL0),
            ClockOutChannel::ClkOut1 => self.registers.ctrl.read(CTRL::CLKOUTSEL1),
        };
        ClockOutSource::from_sel(sel)
    }

    fn enable_route(&self) {
        let loc = self.location.get() as u32;
        match self.channel {
            ClockOutChannel::ClkOut0 => {
                self.registers.routepen.modify(ROUTEPEN::CLKOUT0PEN::SET);
                self.registers.routeloc0.modify(ROUTELOC0::CLKOUT0LOC.val(loc));
            }
            ClockOutChannel::ClkOut1 => {
                self.registers.routepen.modify(ROUTEPEN::CLKOUT1PEN::SET);
                self.registers.routeloc0.modify(ROUTELOC0::CLKOUT1LOC.val(loc));
            }
        }
    }

    fn disable_route(&self) {
        match self.channel {
            ClockOutChannel::ClkOut0 => self.registers.routepen.modify(ROUTEPEN::CLKOUT0PEN::CLEAR),
            ClockOutChannel::ClkOut1 => self.registers.routepen.modify(ROUTEPEN::CLKOUT1PEN::CLEAR),
        }
    }

    fn is_routed(&self) -> bool {
        match self.channel {
            ClockOutChannel::ClkOut0 => self.registers.routepen.is_set(ROUTEPEN::CLKOUT0PEN),
            ClockOutChannel::ClkOut1 => self.registers.routepen.is_set(ROUTEPEN::CLKOUT1PEN),
        }
    }
}
