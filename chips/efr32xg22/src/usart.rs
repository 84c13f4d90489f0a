// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Universal Synchronous/Asynchronous Receiver/Transmitter (USART), Series 2.
//!
//! Two uses are supported, both polled:
//!
//! - synchronous master (SPI mode 0, MSB first) with a GPIO chip select, as
//!   used for the radio board's serial flash on USART0;
//! - asynchronous transmit at a fixed baud rate, as used for the debug
//!   console on the kit's virtual COM port on USART1.

use core::cell::Cell;

use kernel::hil;
use kernel::hil::clock::ClockInterface;
use kernel::hil::gpio::{Configure, Output};
use kernel::utilities::registers::interfaces::{ReadWriteable, Readable, Writeable};
use kernel::utilities::registers::{register_bitfields, register_structs, ReadOnly, ReadWrite, WriteOnly};
use kernel::utilities::StaticRef;
use kernel::ErrorCode;

use crate::cmu::{PeripheralClock, PCLK_HZ};
use crate::gpio::{GpioPin, GpioRegisters, PinId, UsartSignal};

register_structs! {
    pub UsartRegisters {
        (0x000 => _reserved0),
        /// Enable
        (0x004 => pub(crate) en: ReadWrite<u32, EN::Register>),
        /// Control
        (0x008 => pub(crate) ctrl: ReadWrite<u32, CTRL::Register>),
        /// Frame format
        (0x00C => pub(crate) frame: ReadWrite<u32, FRAME::Register>),
        (0x010 => _reserved1),
        /// Command
        (0x014 => pub(crate) cmd: WriteOnly<u32, CMD::Register>),
        /// Status
        (0x018 => pub(crate) status: ReadOnly<u32, STATUS::Register>),
        /// Clock control
        (0x01C => pub(crate) clkdiv: ReadWrite<u32, CLKDIV::Register>),
        (0x020 => _reserved2),
        /// RX buffer data
        (0x024 => pub(crate) rxdata: ReadOnly<u32>),
        (0x028 => _reserved3),
        /// TX buffer data
        (0x03C => pub(crate) txdata: WriteOnly<u32>),
        (0x040 => @END),
    }
}

register_bitfields![u32,
    EN [
        EN 0
    ],
    CTRL [
        /// Synchronous mode
        SYNC OFFSET(0) NUMBITS(1) [],
        /// Oversampling, asynchronous mode only
        OVS OFFSET(5) NUMBITS(2) [
            X16 = 0,
            X8 = 1,
            X6 = 2,
            X4 = 3
        ],
        /// Clock idles high
        CLKPOL OFFSET(8) NUMBITS(1) [],
        /// Sample on the trailing edge
        CLKPHA OFFSET(9) NUMBITS(1) [],
        /// Most significant bit first
        MSBF OFFSET(10) NUMBITS(1) []
    ],
    FRAME [
        DATABITS OFFSET(0) NUMBITS(4) [
            Eight = 5
        ],
        PARITY OFFSET(8) NUMBITS(2) [
            None = 0,
            Even = 2,
            Odd = 3
        ],
        STOPBITS OFFSET(12) NUMBITS(2) [
            Half = 0,
            One = 1,
            OneAndHalf = 2,
            Two = 3
        ]
    ],
    CMD [
        RXEN 0,
        RXDIS 1,
        TXEN 2,
        TXDIS 3,
        MASTEREN 4,
        MASTERDIS 5,
        CLEARTX 10,
        CLEARRX 11
    ],
    STATUS [
        RXENS 0,
        TXENS 1,
        MASTER 2,
        /// Transmission complete
        TXC 5,
        /// TX buffer level
        TXBL 6,
        /// RX data valid
        RXDATAV 7
    ],
    CLKDIV [
        /// Fractional clock divider, 1/256 steps. The low three bits of the
        /// fraction are not implemented.
        DIV OFFSET(3) NUMBITS(20) []
    ]
];

pub const USART0_BASE: StaticRef<UsartRegisters> =
    unsafe { StaticRef::new(0x4005_C000 as *const UsartRegisters) };
pub const USART1_BASE: StaticRef<UsartRegisters> =
    unsafe { StaticRef::new(0x4006_0000 as *const UsartRegisters) };

/// Largest value CLKDIV can hold, in 1/256 units.
const CLKDIV_MAX: u64 = 0xF_FFFF << 3;
/// Largest integral part of CLKDIV (bits 22:8).
const CLKDIV_INT_MAX: u32 = 0x7FFF;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Oversampling {
    /// Synchronous mode: the bus clock is half the divided clock.
    Sync = 2,
    /// Asynchronous 16x oversampling.
    Async16 = 16,
}

/// Asynchronous CLKDIV value, in 1/256 units, for `baud` from `fclk`. The
/// fraction is truncated, so the resulting rate is at or slightly above
/// `baud`.
fn clock_divider(fclk: u32, baud: u32, ovs: Oversampling) -> Result<u32, ErrorCode> {
    if baud == 0 {
        return Err(ErrorCode::INVAL);
    }
    let scaled = (256 * fclk as u64) / (ovs as u64 * baud as u64);
    if scaled < 256 {
        // Faster than the undivided clock allows.
        return Err(ErrorCode::INVAL);
    }
    let div = scaled - 256;
    if div > CLKDIV_MAX {
        return Err(ErrorCode::INVAL);
    }
    Ok(div as u32 & !0x7)
}

/// Synchronous CLKDIV value, in 1/256 units, for a bus clock of at most
/// `rate`.
///
/// Synchronous mode ignores the fractional bits, so only the integral part
/// is set, rounded up. A `rate` above `fclk / 2` yields the fastest clock,
/// `fclk / 2`.
fn sync_clock_divider(fclk: u32, rate: u32) -> Result<u32, ErrorCode> {
    if rate == 0 {
        return Err(ErrorCode::INVAL);
    }
    let int = (fclk.saturating_sub(1) as u64 / (2 * rate as u64)) as u32;
    if int > CLKDIV_INT_MAX {
        return Err(ErrorCode::INVAL);
    }
    Ok(int << 8)
}

/// Rate produced by a CLKDIV value.
fn divided_rate(fclk: u32, div: u32, ovs: Oversampling) -> u32 {
    ((256 * fclk as u64) / (ovs as u64 * (256 + div as u64))) as u32
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpiPins {
    pub mosi: PinId,
    pub miso: PinId,
    pub sclk: PinId,
    pub cs: PinId,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UartPins {
    pub tx: PinId,
    pub rx: PinId,
}

pub struct Usart {
    registers: StaticRef<UsartRegisters>,
    index: usize,
    clock: PeripheralClock,
    gpio: StaticRef<GpioRegisters>,
    spi_pins: Cell<Option<SpiPins>>,
}

impl Usart {
    /// `index` is the USART number, used to pick its GPIO route registers.
    pub const fn new(
        registers: StaticRef<UsartRegisters>,
        index: usize,
        clock: PeripheralClock,
        gpio: StaticRef<GpioRegisters>,
    ) -> Self {
        Self {
            registers,
            index,
            clock,
            gpio,
            spi_pins: Cell::new(None),
        }
    }

    /// Pins used in SPI mode. Must be set before `init`.
    pub fn set_spi_pins(&self, pins: SpiPins) {
        self.spi_pins.set(Some(pins));
    }

    fn pin(&self, id: PinId) -> GpioPin {
        GpioPin::new(self.gpio, id)
    }

    fn reset(&self) {
        let regs = &self.registers;
        regs.en.write(EN::EN::SET);
        regs.cmd.write(
            CMD::RXDIS::SET + CMD::TXDIS::SET + CMD::MASTERDIS::SET + CMD::CLEARRX::SET + CMD::CLEARTX::SET,
        );
    }

    /// Set up 8N1 transmit and receive at `baud`.
    pub fn configure_uart(&self, baud: u32, pins: UartPins) -> Result<u32, ErrorCode> {
        let div = clock_divider(PCLK_HZ, baud, Oversampling::Async16)?;
        self.clock.enable();

        // TX idles high.
        let tx = self.pin(pins.tx);
        tx.set();
        tx.make_output();
        self.pin(pins.rx).make_input();

        self.reset();
        let regs = &self.registers;
        regs.ctrl.write(CTRL::OVS::X16);
        regs.frame
            .write(FRAME::DATABITS::Eight + FRAME::PARITY::None + FRAME::STOPBITS::One);
        regs.clkdiv.write(CLKDIV::DIV.val(div >> 3));

        self.gpio.route_usart(self.index, UsartSignal::Tx, pins.tx);
        self.gpio.route_usart(self.index, UsartSignal::Rx, pins.rx);
        regs.cmd.write(CMD::TXEN::SET + CMD::RXEN::SET);

        Ok(divided_rate(PCLK_HZ, div, Oversampling::Async16))
    }

    /// Undo `configure_uart`: stop the peripheral, drop its routes, gate its
    /// clock and put both pins into `Disabled`.
    pub fn release_uart(&self, pins: UartPins) {
        self.shut_down(&[pins.tx, pins.rx]);
    }

    fn shut_down(&self, pins: &[PinId]) {
        let regs = &self.registers;
        regs.cmd
            .write(CMD::RXDIS::SET + CMD::TXDIS::SET + CMD::MASTERDIS::SET);
        regs.en.modify(EN::EN::CLEAR);
        self.gpio.unroute_usart(self.index);
        for &id in pins {
            self.pin(id).deactivate_to_low_power();
        }
        self.clock.disable();
    }

    /// Queue one byte, waiting for room in the TX buffer.
    pub fn send_byte(&self, byte: u8) {
        while !self.registers.status.is_set(STATUS::TXBL) {}
        self.registers.txdata.set(byte as u32);
    }

    /// Wait until every queued byte has left the shift register.
    pub fn flush(&self) {
        while !self.registers.status.is_set(STATUS::TXC) {}
    }
}

impl hil::spi::SpiMaster for Usart {
    fn init(&self) {
        self.clock.enable();

        if let Some(pins) = self.spi_pins.get() {
            let cs = self.pin(pins.cs);
            cs.set();
            cs.make_output();
            for id in [pins.mosi, pins.sclk] {
                let pin = self.pin(id);
                pin.clear();
                pin.make_output();
            }
            self.pin(pins.miso).make_input();

            self.gpio.route_usart(self.index, UsartSignal::Tx, pins.mosi);
            self.gpio.route_usart(self.index, UsartSignal::Rx, pins.miso);
            self.gpio.route_usart(self.index, UsartSignal::Clk, pins.sclk);
        }

        self.reset();
        let regs = &self.registers;
        // Mode 0: clock idles low, sample on the leading edge.
        regs.ctrl.write(CTRL::SYNC::SET + CTRL::MSBF::SET);
        regs.frame.write(FRAME::DATABITS::Eight);
        regs.cmd
            .write(CMD::MASTEREN::SET + CMD::TXEN::SET + CMD::RXEN::SET);
    }

    fn deinit(&self) {
        match self.spi_pins.get() {
            Some(pins) => self.shut_down(&[pins.mosi, pins.miso, pins.sclk, pins.cs]),
            None => self.shut_down(&[]),
        }
    }

    fn set_rate(&self, rate: u32) -> Result<u32, ErrorCode> {
        let div = sync_clock_divider(PCLK_HZ, rate)?;
        self.registers.clkdiv.write(CLKDIV::DIV.val(div >> 3));
        Ok(divided_rate(PCLK_HZ, div, Oversampling::Sync))
    }

    fn select(&self) {
        if let Some(pins) = self.spi_pins.get() {
            self.pin(pins.cs).clear();
        }
    }

    fn deselect(&self) {
        if let Some(pins) = self.spi_pins.get() {
            self.pin(pins.cs).set();
        }
    }

    fn read_write_byte(&self, val: u8) -> u8 {
        let regs = &self.registers;
        while !regs.status.is_set(STATUS::TXBL) {}
        regs.txdata.set(val as u32);
        while !regs.status.is_set(STATUS::RXDATAV) {}
        regs.rxdata.get() as u8
    }
}
