// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Cortex-M NVIC
//!
//! Nothing here services peripheral interrupts: waking from EM4 is a reset.
//! The NVIC is only put into a known state at boot, covering the interrupt
//! lines the chip actually wires up.

use kernel::utilities::registers::interfaces::Writeable;
use kernel::utilities::registers::{register_structs, WriteOnly};
use kernel::utilities::StaticRef;

register_structs! {
    NvicRegisters {
        (0x000 => _reserved0),
        /// Interrupt Clear-Enable Registers
        (0x180 => icer: [WriteOnly<u32>; 16]),
        (0x1c0 => _reserved1),
        /// Interrupt Clear-Pending Registers
        (0x280 => icpr: [WriteOnly<u32>; 16]),
        (0x2c0 => @END),
    }
}

const NVIC: StaticRef<NvicRegisters> =
    unsafe { StaticRef::new(0xE000E000 as *const NvicRegisters) };

/// Number of 32-line ICER/ICPR words covering `irqs` interrupt lines.
pub const fn register_words(irqs: usize) -> usize {
    let words = irqs.div_ceil(32);
    if words > 16 {
        16
    } else {
        words
    }
}

/// Clear the pending state of the first `irqs` interrupt lines.
pub unsafe fn clear_all_pending(irqs: usize) {
    for icpr in NVIC.icpr.iter().take(register_words(irqs)) {
        icpr.set(!0)
    }
}

/// Disable the first `irqs` interrupt lines.
pub unsafe fn disable_all(irqs: usize) {
    for icer in NVIC.icer.iter().take(register_words(irqs)) {
        icer.set(!0)
    }
}

#[cfg(test)]
mod tests {
    use super::register_words;

    #[test]
    fn words_cover_every_line() {
        assert_eq!(register_words(0), 0);
        assert_eq!(register_words(32), 1);
        // EFM32PG12
        assert_eq!(register_words(51), 2);
        // EFR32xG22
        assert_eq!(register_words(60), 2);
        assert_eq!(register_words(1000), 16);
    }
}
