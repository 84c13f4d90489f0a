// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Peripheral implementations for the Silicon Labs EFM32PG12 (Pearl Gecko,
//! Series 1) MCU.
//!
//! Reference manual: EFM32PG12 Reference Manual, rev. 1.2.

#![no_std]

pub mod chip;
pub mod cmu;
pub mod gpio;

/// Peripheral interrupt lines.
pub const NUM_IRQS: usize = 51;

#[cfg(all(target_arch = "arm", target_os = "none"))]
mod vectors {
    use cortexm::{hard_fault_handler, unhandled_interrupt};

    extern "C" {
        // _estack is not really a function, but it makes the types work
        // You should never actually invoke it!!
        fn _estack();

        // Defined by platform
        fn reset_handler();
    }

    #[link_section = ".vectors"]
    // used Ensures that the symbol is kept until the final binary
    #[used]
    pub static BASE_VECTORS: [unsafe extern "C" fn(); 16] = [
        _estack,
        reset_handler,
        unhandled_interrupt, // NMI
        hard_fault_handler,  // Hard Fault
        unhandled_interrupt, // MemManage
        unhandled_interrupt, // BusFault
        unhandled_interrupt, // UsageFault
        unhandled_interrupt,
        unhandled_interrupt,
        unhandled_interrupt,
        unhandled_interrupt,
        unhandled_interrupt, // SVC
        unhandled_interrupt, // DebugMon
        unhandled_interrupt,
        unhandled_interrupt, // PendSV
        unhandled_interrupt, // SysTick
    ];

    // No peripheral interrupt is ever enabled.
    #[link_section = ".irqs"]
    #[used]
    pub static IRQS: [unsafe extern "C" fn(); super::NUM_IRQS] = [unhandled_interrupt; super::NUM_IRQS];
}

#[cfg(all(target_arch = "arm", target_os = "none"))]
extern "C" {
    static mut _szero: u32;
    static mut _ezero: u32;
    static mut _etext: u32;
    static mut _srelocate: u32;
    static mut _erelocate: u32;
}

/// Set up RAM and the vector table.
///
/// Must run first thing in the reset handler.
#[cfg(all(target_arch = "arm", target_os = "none"))]
pub unsafe fn init() {
    use core::ptr::{addr_of, addr_of_mut};

    cortexm::rt0::init_data(
        addr_of!(_etext),
        addr_of_mut!(_srelocate),
        addr_of_mut!(_erelocate),
    );
    cortexm::rt0::zero_bss(addr_of_mut!(_szero), addr_of_mut!(_ezero));
    cortexm::scb::set_vector_table_offset(vectors::BASE_VECTORS.as_ptr().cast::<()>());
    cortexm::nvic::disable_all(NUM_IRQS);
    cortexm::nvic::clear_all_pending(NUM_IRQS);
}
