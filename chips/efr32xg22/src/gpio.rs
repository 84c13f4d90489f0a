// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! General Purpose Input/Output driver, Series 2 register layout.
//!
//! Pin modes use the same encoding as Series 1: a 4-bit field per pin in
//! MODEL/MODEH, with DOUT selecting the filter (plain input) or the pull
//! direction (pulled inputs). Series 2 adds the EM4 wakeup lines and moves
//! peripheral pin routing from the peripherals into the GPIO block.

use core::cell::Cell;
use core::ops::Index;

use kernel::hil;
use kernel::hil::gpio::{Configuration, FloatingState, WakeupLevel};
use kernel::utilities::registers::interfaces::{ReadWriteable, Readable, Writeable};
use kernel::utilities::registers::{register_bitfields, register_structs, Field, ReadOnly, ReadWrite};
use kernel::utilities::StaticRef;
use kernel::ErrorCode;

register_structs! {
    pub PortRegisters {
        (0x00 => _reserved0),
        /// Mode low
        (0x04 => model: ReadWrite<u32, MODE::Register>),
        (0x08 => _reserved1),
        /// Mode high
        (0x0C => modeh: ReadWrite<u32, MODE::Register>),
        /// Data out
        (0x10 => pub(crate) dout: ReadWrite<u32>),
        /// Data in
        (0x14 => din: ReadOnly<u32>),
        (0x18 => _reserved2),
        (0x30 => @END),
    },

    pub UsartRouteRegisters {
        /// USART pin enable
        (0x00 => routeen: ReadWrite<u32, ROUTEEN::Register>),
        /// CS port/pin select
        (0x04 => csroute: ReadWrite<u32, ROUTE::Register>),
        (0x08 => _reserved0),
        /// RX port/pin select
        (0x10 => rxroute: ReadWrite<u32, ROUTE::Register>),
        /// TX port/pin select
        (0x14 => txroute: ReadWrite<u32, ROUTE::Register>),
        /// CLK port/pin select
        (0x18 => clkroute: ReadWrite<u32, ROUTE::Register>),
        (0x1C => _reserved1),
        (0x20 => @END),
    },

    pub GpioRegisters {
        (0x000 => _reserved0),
        (0x030 => pub(crate) ports: [PortRegisters; 4]),
        (0x0F0 => _reserved1),
        /// EM4 wakeup enable
        (0x42C => pub(crate) em4wuen: ReadWrite<u32, EM4WU::Register>),
        /// EM4 wakeup polarity
        (0x430 => pub(crate) em4wupol: ReadWrite<u32, EM4WU::Register>),
        (0x434 => _reserved2),
        /// USART0 and USART1 routes
        (0x5E0 => pub(crate) usartroute: [UsartRouteRegisters; 2]),
        (0x620 => @END),
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
    ],
    EM4WU [
        /// One bit per EM4WU line
        LINES OFFSET(16) NUMBITS(12) []
    ],
    ROUTEEN [
        CSPEN 0,
        RXPEN 2,
        CLKPEN 3,
        TXPEN 4
    ],
    ROUTE [
        PORT OFFSET(0) NUMBITS(2) [],
        PIN OFFSET(16) NUMBITS(4) []
    ]
];

pub const GPIO_BASE: StaticRef<GpioRegisters> =
    unsafe { StaticRef::new(0x4003_C000 as *const GpioRegisters) };

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

#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(u8)]
pub enum Port {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
}

/// Pins available on the xG22 packages. The discriminant is
/// `port << 4 | pin`.
#[rustfmt::skip]
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(u8)]
pub enum PinId {
    PA00 = 0x00, PA01 = 0x01, PA02 = 0x02, PA03 = 0x03, PA04 = 0x04,
    PA05 = 0x05, PA06 = 0x06, PA07 = 0x07, PA08 = 0x08,

    PB00 = 0x10, PB01 = 0x11, PB02 = 0x12, PB03 = 0x13, PB04 = 0x14,

    PC00 = 0x20, PC01 = 0x21, PC02 = 0x22, PC03 = 0x23, PC04 = 0x24,
    PC05 = 0x25, PC06 = 0x26, PC07 = 0x27,

    PD00 = 0x30, PD01 = 0x31, PD02 = 0x32, PD03 = 0x33, PD04 = 0x34,
    PD05 = 0x35,
}

#[rustfmt::skip]
const PINS: [PinId; 28] = [
    PinId::PA00, PinId::PA01, PinId::PA02, PinId::PA03, PinId::PA04,
    PinId::PA05, PinId::PA06, PinId::PA07, PinId::PA08,
    PinId::PB00, PinId::PB01, PinId::PB02, PinId::PB03, PinId::PB04,
    PinId::PC00, PinId::PC01, PinId::PC02, PinId::PC03, PinId::PC04,
    PinId::PC05, PinId::PC06, PinId::PC07,
    PinId::PD00, PinId::PD01, PinId::PD02, PinId::PD03, PinId::PD04,
    PinId::PD05,
];

impl PinId {
    pub fn port(&self) -> Port {
        match *self as u8 >> 4 {
            0 => Port::A,
            1 => Port::B,
            2 => Port::C,
            _ => Port::D,
        }
    }

    pub fn number(&self) -> u8 {
        *self as u8 & 0xF
    }

    /// Position in the dense pin table.
    fn slot(&self) -> usize {
        let first = match self.port() {
            Port::A => 0,
            Port::B => 9,
            Port::C => 14,
            Port::D => 22,
        };
        first + self.number() as usize
    }

    /// EM4 wakeup line connected to this pin, if any.
    pub fn em4_wakeup_line(&self) -> Option<u8> {
        match self {
            PinId::PA05 => Some(0),
            PinId::PB01 => Some(3),
            PinId::PB03 => Some(4),
            PinId::PC00 => Some(6),
            PinId::PC05 => Some(7),
            PinId::PC07 => Some(8),
            PinId::PD02 => Some(9),
            _ => None,
        }
    }
}

/// USART signals that can be routed to a pin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UsartSignal {
    Tx,
    Rx,
    Clk,
    Cs,
}

impl GpioRegisters {
    /// Connect `signal` of USART `usart` to `pin` and enable the route.
    pub(crate) fn route_usart(&self, usart: usize, signal: UsartSignal, pin: PinId) {
        let route = &self.usartroute[usart];
        let select = ROUTE::PORT.val(pin.port() as u32) + ROUTE::PIN.val(pin.number() as u32);
        match signal {
            UsartSignal::Tx => {
                route.txroute.write(select);
                route.routeen.modify(ROUTEEN::TXPEN::SET);
            }
            UsartSignal::Rx => {
                route.rxroute.write(select);
                route.routeen.modify(ROUTEEN::RXPEN::SET);
            }
            UsartSignal::Clk => {
                route.clkroute.write(select);
                route.routeen.modify(ROUTEEN::CLKPEN::SET);
            }
            UsartSignal::Cs => {
                route.csroute.write(select);
                route.routeen.modify(ROUTEEN::CSPEN::SET);
            }
        }
    }

    /// Disconnect every signal of USART `usart`.
    pub(crate) fn unroute_usart(&self, usart: usize) {
        self.usartroute[usart].routeen.set(0);
    }

    /// Enabled routes of USART `usart`, as the raw ROUTEEN value.
    pub(crate) fn usart_routes(&self, usart: usize) -> u32 {
        self.usartroute[usart].routeen.get()
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

    pub fn id(&self) -> PinId {
        self.id
    }

    fn port(&self) -> &PortRegisters {
        &self.registers.ports[self.id.port() as usize]
    }

    fn mask(&self) -> u32 {
        1 << self.id.number()
    }

    fn mode_field(&self) -> Field<u32, MODE::Register> {
        Field::new(0xF, (self.id.number() as usize % 8) * 4)
    }

    fn mode_register(&self) -> &ReadWrite<u32, MODE::Register> {
        if self.id.number() < 8 {
            &self.port().model
        } else {
            &self.port().modeh
        }
    }

    pub fn mode(&self) -> Mode {
        Mode::from_bits(self.mode_register().read(self.mode_field()))
    }

    /// Set the pin mode and its DOUT bit together.
    pub fn set_mode(&self, mode: Mode, dout: bool) {
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
        self.write_dout(level);
        level
    }
}

impl hil::gpio::Input for GpioPin {
    fn read(&self) -> bool {
        self.port().din.get() & self.mask() != 0
    }
}

impl hil::gpio::DeepSleepWakeup for GpioPin {
    fn enable_deep_sleep_wakeup(&self, level: WakeupLevel) -> Result<(), ErrorCode> {
        let line = self.id.em4_wakeup_line().ok_or(ErrorCode::NOSUPPORT)?;
        let bit = 1 << line;
        let regs = &self.registers;
        let polarity = regs.em4wupol.read(EM4WU::LINES);
        match level {
            WakeupLevel::High => regs.em4wupol.modify(EM4WU::LINES.val(polarity | bit)),
            WakeupLevel::Low => regs.em4wupol.modify(EM4WU::LINES.val(polarity & !bit)),
        }
        let enabled = regs.em4wuen.read(EM4WU::LINES);
        regs.em4wuen.modify(EM4WU::LINES.val(enabled | bit));
        Ok(())
    }

    fn disable_deep_sleep_wakeup(&self) {
        if let Some(line) = self.id.em4_wakeup_line() {
            let enabled = self.registers.em4wuen.read(EM4WU::LINES);
            self.registers
                .em4wuen
                .modify(EM4WU::LINES.val(enabled & !(1 << line)));
        }
    }
}

pub struct GpioPorts {
    pins: [GpioPin; PINS.len()],
}

impl GpioPorts {
    pub fn new(registers: StaticRef<GpioRegisters>) -> Self {
        Self {
            pins: core::array::from_fn(|i| GpioPin::new(registers, PINS[i])),
        }
    }
}

impl Index<PinId> for GpioPorts {
    type Output = GpioPin;

    fn index(&self, id: PinId) -> &GpioPin {
        &self.pins[id.slot()]
    }
}
