// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Interface for a blocking SPI bus master with one chip select.

use crate::ErrorCode;

/// Blocking SPI master.
///
/// Transfers happen one byte at a time with the CPU waiting on the bus. The
/// chip select is driven explicitly so that a multi-byte command can be
/// framed by `select`/`deselect`.
pub trait SpiMaster {
    /// Configure pins and enable the peripheral.
    fn init(&self);

    /// Disable the peripheral and return its pins to their reset state.
    fn deinit(&self);

    /// Set the bus clock. Returns the rate actually achieved.
    fn set_rate(&self, rate: u32) -> Result<u32, ErrorCode>;

    /// Assert the chip select.
    fn select(&self);

    /// Release the chip select.
    fn deselect(&self);

    /// Shift one byte out and return the byte shifted in.
    fn read_write_byte(&self, val: u8) -> u8;

    /// Shift out `bytes`, discarding what comes back.
    fn write_bytes(&self, bytes: &[u8]) {
        for byte in bytes {
            self.read_write_byte(*byte);
        }
    }
}
