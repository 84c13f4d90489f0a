// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Public traits for interfaces between capsules and chips.
//!
//! All operations here are synchronous: the boot sequences built on top of
//! them run once, without a scheduler, and block on hardware where needed.

pub mod clock;
pub mod cpu;
pub mod gpio;
pub mod power;
pub mod reset;
pub mod spi;
pub mod time;
