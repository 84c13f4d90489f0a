// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Interface for blocking delays.

/// Delay by spinning the CPU.
pub trait BusyWait {
    /// Spin for at least `us` microseconds.
    fn busy_wait_us(&self, us: u32);
}
