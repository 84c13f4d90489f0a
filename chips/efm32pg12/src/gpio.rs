// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! General Purpose Input/Output driver, Series 1 register layout.
//!
//! Each pin has a 4-bit mode field in MODEL (pins 0-7) or MODEH (pins 8-15).
//! In the input modes the DOUT bit is reused: it enables the glitch filter
//! in plain `Input` mode and selects pull-up (1) or pull-down (0) in the
//! `InputPull*` modes.

use core::cell::Cell;
use core::ops::Index;

use kernel::hil;
use kernel::hil::gpio::{Configuration, FloatingState};
use kernel::utilities::registers::interfaces::{ReadWriteable, Readable, Writeable};
use kernel::utilities::registers::{register_bitfields, register_structs, Field, ReadOnly, ReadWrite};
use kernel::utilities::StaticRef;

register_structs! {
    pub PortRegisters {
        (0x00 => _reserved0),
        /// Port Pin Mode Low Register
        (0x04 => model: ReadWrite<u32, MODE::Register>),
        /// Port Pin Mode High Register
        (0x08 => modeh: ReadWrite<u32, MODE::Register>),
        /// Port Data Out Register
        (0x0C => pub(crate) dout: ReadWrite<u32>),
        (0x10 => _reserved1),
        /// Port Data Out Toggle Register
        (0x18 => douttgl: ReadWrite<u32>),
        /// Port Data In Register
        (0x1C => din: ReadOnly<u32>),
        (0x20 => _reserved2),
        (0x30 => @END),
    },

    pub GpioRegisters {
        (0x000 => pub(crate) ports: [PortRegisters; 12]),
        (0x240 => @END),
    }
}

register_bitfields![u32,
    MODE [
        MODE0 OFFSET(0) NUMBITS(4) [],
        MODE1 OFFSET(4) NUMBITS(4) [],
        MODE2 OFFSET(8) NUMBITS(4) [],
        MODE3 OFFSET(12) NUMBITS(4) [],
        MODE4 OFFSET(16) NUMBITS(4) [],
        MODE5 OFFSET(20) NUMBITS(4) [],
        MODE6 OFFSET(24) NUMBITS(4) [],
        MODE7 OFFSET(28) NUMBITS(4) []
    ]
];

pub const GPIO_BASE: StaticRef<GpioRegisters> =
    unsafe { StaticRef::new(0x4000_A000 as *const GpioRegisters) };

/// Pin mode encodings shared by all ports.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(u32)]
pub enum Mode {
    Disabled = 0,
    Input = 1,
    InputPull = 2,
    InputPullFilter = 3,
    PushPull = 4,
    PushPullAlternate = 5,
    WiredOr = 6,
    WiredOrPullDown = 7,
    WiredAnd = 8,
    WiredAndFilter = 9,
    WiredAndPullUp = 10,
    WiredAndPullUpFilter = 11,
    WiredAndAlternate = 12,
    WiredAndAlternateFilter = 13,
    WiredAndAlternatePullUp = 14,
    WiredAndAlternatePullUpFilter = 15,
}

impl Mode {
    fn from_bits(bits: u32) -> Mode {
        match bits & 0xF {
            0 => Mode::Disabled,
            1 => Mode::Input,
            2 => Mode::InputPull,
            3 => Mode::InputPullFilter,
            4 => Mode::PushPull,
            5 => Mode::PushPullAlternate,
            6 => Mode::WiredOr,
            7 => Mode::WiredOrPullDown,
            8 => Mode::WiredAnd,
            9 => Mode::WiredAndFilter,
            10 => Mode::WiredAndPullUp,
            11 => Mode::WiredAndPullUpFilter,
            12 => Mode::WiredAndAlternate,
            13 => Mode::WiredAndAlternateFilter,
            14 => Mode::WiredAndAlternatePullUp,
            _ => Mode::WiredAndAlternatePullUpFilter,
        }
    }
}

/// GPIO ports bonded out on the EFM32PG12 packages.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(u8)]
pub enum Port {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    F = 5,
    I = 8,
    J = 9,
    K = 10,
}

const PORTS: [Port; 8] = [
    Port::A,
    Port::B,
    Port::C,
    Port::D,
    Port::F,
    Port::I,
    Port::J,
    Port::K,
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinId {
    port: Port,
    number: u8,
}

impl PinId {
    pub const fn new(port: Port, number: u8) -> PinId {
        assert!(number < 16);
        PinId { port, number }
    }

    pub fn port(&self) -> Port {
        self.port
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    fn slot(&self) -> usize {
        let port = match self.port {
            Port::A => 0,
            Port::B => 1,
            Port::C => 2,
            Port::D => 3,
            Port::F => 4,
            Port::I => 5,
            Port::J => 6,
            Port::K => 7,
        };
        port * 16 + self.number as usize
    }
}

pub struct GpioPin {
    registers: StaticRef<GpioRegisters>,
    id: PinId,
    floating: Cell<FloatingState>,
    filter: Cell<bool>,
}

impl GpioPin {
    pub const fn new(registers: StaticRef<GpioRegisters>, id: PinId) -> GpioPin {
        GpioPin {
            registers,
            id,
            floating: Cell::new(FloatingState::PullNone),
            filter: Cell::new(false),
        }
    }

    fn port(&self) -> &PortRegisters {
        &self.registers.ports[self.id.port as usize]
    }

    fn mask(&self) -> u32 {
        1 << self.id.number
    }

    fn mode_field(&self) -> Field<u32, MODE::Register> {
        Field::new(0xF, (self.id.number as usize % 8) * 4)
    }

    fn mode_register(&self) -> &ReadWrite<u32, MODE::Register> {
        if self.id.number < 8 {
            &self.port().model
        } else {
            &self.port().modeh
        }
    }

    pub fn mode(&self) -> Mode {
        Mode::from_bits(self.mode_register().read(self.mode_field()))
    }

    /// Set the pin mode and its DOUT bit together, the way the mode table
    /// defines them.
    pub fn set_mode(&self, mode: Mode, dout: bool) {
        // DOUT first so an output never glitches to the wrong level.
        self.write_dout(dout);
        self.mode_register()
            .modify(self.mode_field().val(mode as u32));
    }

    fn write_dout(&self, high: bool) {
        let dout = &self.port().dout;
        if high {
            dout.set(dout.get() | self.mask());
        } else {
            dout.set(dout.get() & !self.mask());
        }
    }

    fn dout(&self) -> bool {
        self.port().dout.get() & self.mask() != 0
    }

    fn apply_input_mode(&self) {
        let filter = self.filter.get();
        match self.floating.get() {
            FloatingState::PullNone => self.set_mode(Mode::Input, filter),
            FloatingState::PullUp if filter => self.set_mode(Mode::InputPullFilter, true),
            FloatingState::PullUp => self.set_mode(Mode::InputPull, true),
            FloatingState::PullDown if filter => self.set_mode(Mode::InputPullFilter, false),
            FloatingState::PullDown => self.set_mode(Mode::InputPull, false),
        }
    }
}

impl hil::gpio::Configure for GpioPin {
    fn configuration(&self) -> Configuration {
        match self.mode() {
            Mode::Disabled => Configuration::LowPower,
            Mode::Input | Mode::InputPull | Mode::InputPullFilter => Configuration::Input,
            Mode::PushPull => Configuration::Output,
            _ => Configuration::Function,
        }
    }

    fn make_output(&self) -> Configuration {
        self.mode_register()
            .modify(self.mode_field().val(Mode::PushPull as u32));
        Configuration::Output
    }

    fn make_input(&self) -> Configuration {
        self.apply_input_mode();
        Configuration::Input
    }

    fn deactivate_to_low_power(&self) {
        // Disabled with DOUT set would enable the pull-up.
        self.set_mode(Mode::Disabled, false);
    }

    fn set_floating_state(&self, state: FloatingState) {
        self.floating.set(state);
        if hil::gpio::Configure::is_input(self) {
            self.apply_input_mode();
        }
    }

    fn floating_state(&self) -> FloatingState {
        self.floating.get()
    }
}

impl hil::gpio::InputFilter for GpioPin {
    fn set_input_filter(&self, enabled: bool) {
        self.filter.set(enabled);
        if hil::gpio::Configure::is_input(self) {
            self.apply_input_mode();
        }
    }
}

impl hil::gpio::Output for GpioPin {
    fn set(&self) {
        self.write_dout(true);
    }

    fn clear(&self) {
        self.write_dout(false);
    }

    fn toggle(&self) -> bool {
        let level = !self.dout();
        self.port().douttgl.set(self.mask());
        level
    }
}

impl hil::gpio::Input for GpioPin {
    fn read(&self) -> bool {
        self.port().din.get() & self.mask() != 0
    }
}

/// Every pin of every bonded port.
pub struct GpioPorts {
    pins: [GpioPin; 16 * PORTS.len()],
}

impl GpioPorts {
    pub fn new(registers: StaticRef<GpioRegisters>) -> Self {
        Self {
            pins: core::array::from_fn(|i| {
                GpioPin::new(registers, PinId::new(PORTS[i / 16], (i % 16) as u8))
            }),
        }
    }
}

impl Index<PinId> for GpioPorts {
    type Output = GpioPin;

    fn index(&self, id: PinId) -> &GpioPin {
        &self.pins[id.slot()]
    }
}
