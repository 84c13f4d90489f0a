// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! DC-DC buck converter.
//!
//! In regulation mode the converter supplies DVDD efficiently in EM0-EM3.
//! It does not operate in EM4, where the supply must be in bypass.

use kernel::hil::clock::ClockInterface;
use kernel::hil::power::{Regulator, RegulatorMode};
use kernel::utilities::registers::interfaces::{ReadWriteable, Readable};
use kernel::utilities::registers::{register_bitfields, register_structs, ReadOnly, ReadWrite};
use kernel::utilities::StaticRef;

use crate::cmu::PeripheralClock;

register_structs! {
    pub DcdcRegisters {
        (0x000 => _reserved0),
        /// Enable
        (0x004 => pub(crate) en: ReadWrite<u32, EN::Register>),
        /// Control
        (0x008 => pub(crate) ctrl: ReadWrite<u32, CTRL::Register>),
        (0x00C => _reserved1),
        /// Status
        (0x030 => pub(crate) status: ReadOnly<u32, STATUS::Register>),
        (0x034 => @END),
    }
}

register_bitfields![u32,
    EN [
        EN 0
    ],
    CTRL [
        MODE OFFSET(0) NUMBITS(1) [
            Bypass = 0,
            Regulation = 1
        ]
    ],
    STATUS [
        /// Bypass switch closed
        BYPSW 0,
        /// Converter running in regulation mode
        RUNNING 2
    ]
];

pub const DCDC_BASE: StaticRef<DcdcRegisters> =
    unsafe { StaticRef::new(0x4009_4000 as *const DcdcRegisters) };

pub struct Dcdc {
    registers: StaticRef<DcdcRegisters>,
    clock: PeripheralClock,
}

impl Dcdc {
    pub const fn new(registers: StaticRef<DcdcRegisters>, clock: PeripheralClock) -> Self {
        Self { registers, clock }
    }
}

impl Regulator for Dcdc {
    fn init(&self) {
        self.clock.enable();
        self.registers.en.modify(EN::EN::SET);
        self.set_mode(RegulatorMode::Regulation);
    }

    fn set_mode(&self, mode: RegulatorMode) {
        let regs = &self.registers;
        match mode {
            RegulatorMode::Bypass => {
                regs.ctrl.modify(CTRL::MODE::Bypass);
                while !regs.status.is_set(STATUS::BYPSW) {}
            }
            RegulatorMode::Regulation => {
                regs.ctrl.modify(CTRL::MODE::Regulation);
                while !regs.status.is_set(STATUS::RUNNING) {}
            }
        }
    }

    fn mode(&self) -> RegulatorMode {
        match self.registers.ctrl.read_as_enum(CTRL::MODE) {
            Some(CTRL::MODE::Value::Regulation) => RegulatorMode::Regulation,
            _ => RegulatorMode::Bypass,
        }
    }
}
