// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Interface for reading the cause of the last reset.

use core::fmt::Debug;

/// How the chip came out of reset, as far as boot code cares.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BootKind {
    WokeFromDeepSleep,
    NormalBoot,
}

pub trait Reset {
    /// Chip-specific reset cause value.
    type Cause: Copy + Debug;

    /// Read the accumulated reset cause.
    fn reset_cause(&self) -> Self::Cause;

    /// Clear the reset cause so the next reset reports only its own cause.
    fn clear_reset_cause(&self);

    /// Decode a reset cause.
    fn boot_kind(&self, cause: Self::Cause) -> BootKind;

    /// Read then clear the reset cause. The value is only meaningful once
    /// per boot, so boot code should use this rather than `reset_cause`.
    fn take_reset_cause(&self) -> Self::Cause {
        let cause = self.reset_cause();
        self.clear_reset_cause();
        cause
    }
}
