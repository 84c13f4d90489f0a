// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Core support crate for the EFM32/EFR32 demo firmware.
//!
//! The kernel crate holds the code shared by chips, capsules, and boards:
//! the Hardware Interface Layer (HIL) traits, the debug output machinery,
//! compile-time configuration, and the register utilities. It has no
//! scheduler; each board runs one boot sequence to completion.
//!
//! Most `unsafe` code is in this kernel crate and the chip crates.

#![no_std]

pub mod config;
pub mod debug;
pub mod errorcode;
pub mod hil;
pub mod utilities;

pub use crate::errorcode::ErrorCode;
