// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2023.

//! Power management for the Macronix MX25R SPI flash.
//!
//! Radio boards carry an MX25R serial flash that draws several microamps
//! unless it is put into deep power-down. Boards that sleep need to send it
//! there first. This driver only implements the commands that sequence
//! needs.
//!
//! <https://www.macronix.com/Lists/Datasheet/Attachments/7913/MX25R8035F,%20Wide%20Range,%208Mb,%20v1.6.pdf>

use kernel::debug;
use kernel::hil::spi::SpiMaster;

/// MX25R command opcodes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(u8)]
pub enum Opcode {
    /// Read status register
    RDSR = 0x05,
    /// Reset enable
    RSTEN = 0x66,
    /// Reset memory
    RST = 0x99,
    /// Deep power-down
    DP = 0xB9,
}

/// Write in progress bit of the status register.
const STATUS_WIP: u8 = 1 << 0;

pub struct Mx25r<'a, S: SpiMaster> {
    spi: &'a S,
    rate_hz: u32,
}

impl<'a, S: SpiMaster> Mx25r<'a, S> {
    pub fn new(spi: &'a S, rate_hz: u32) -> Self {
        Self { spi, rate_hz }
    }

    fn command(&self, opcode: Opcode) {
        self.spi.select();
        self.spi.read_write_byte(opcode as u8);
        self.spi.deselect();
    }

    /// Read the status register. The bus must be initialized.
    pub fn read_status(&self) -> u8 {
        self.spi.select();
        self.spi.read_write_byte(Opcode::RDSR as u8);
        let status = self.spi.read_write_byte(0);
        self.spi.deselect();
        status
    }

    /// Spin until the device has finished its current internal operation.
    pub fn wait_ready(&self) {
        while self.read_status() & STATUS_WIP != 0 {}
    }

    /// Software reset. Blocks until the device is ready again.
    pub fn reset(&self) {
        self.command(Opcode::RSTEN);
        self.command(Opcode::RST);
        self.wait_ready();
    }

    /// Reset the device and put it into deep power-down, then release the
    /// bus.
    pub fn power_down(&self) {
        self.spi.init();
        if let Err(e) = self.spi.set_rate(self.rate_hz) {
            debug!("mx25r: rate {} rejected: {:?}", self.rate_hz, e);
        }
        self.reset();
        self.command(Opcode::DP);
        self.spi.deinit();
    }
}
