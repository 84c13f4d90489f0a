// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2023.

//! Hardware-independent boot sequences and device drivers.
//!
//! Capsules are generic over the HIL traits in `kernel::hil`; the chip crates
//! provide the implementations and the board crates wire the two together.

#![forbid(unsafe_code)]
#![no_std]

pub mod clock_output;
pub mod em4_wakeup;
pub mod mx25r;

#[cfg(test)]
mod mock;
