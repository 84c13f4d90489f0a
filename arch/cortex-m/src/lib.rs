// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Generic support for the Cortex-M cores used on EFM32 and EFR32 parts.
//!
//! The Series 1 parts are Cortex-M4 cores, the Series 2 parts are Cortex-M33
//! cores. Everything in this crate only touches the parts of the System
//! Control Space that both of them share.

#![no_std]

pub mod nvic;
pub mod rt0;
pub mod scb;
pub mod support;

/// Default handler for every exception and interrupt the firmware does not
/// expect to take.
#[cfg(any(doc, all(target_arch = "arm", target_os = "none")))]
pub unsafe extern "C" fn unhandled_interrupt() {
    let mut interrupt_number: u32;

    // IPSR[8:0] holds the currently active interrupt
    core::arch::asm!(
        "mrs r0, ipsr",
        out("r0") interrupt_number,
        options(nomem, nostack, preserves_flags),
    );

    interrupt_number &= 0x1ff;

    panic!("Unhandled Interrupt. ISR {} is active.", interrupt_number);
}

#[cfg(not(any(doc, all(target_arch = "arm", target_os = "none"))))]
pub unsafe extern "C" fn unhandled_interrupt() {
    unimplemented!()
}

/// Hard fault handler. None of the demos install a fault recovery path, so a
/// hard fault is reported through the panic handler.
#[cfg(any(doc, all(target_arch = "arm", target_os = "none")))]
pub unsafe extern "C" fn hard_fault_handler() {
    let (hfsr, cfsr) = scb::fault_status();
    panic!("HardFault. HFSR: {:#010x} CFSR: {:#010x}", hfsr, cfsr);
}

#[cfg(not(any(doc, all(target_arch = "arm", target_os = "none"))))]
pub unsafe extern "C" fn hard_fault_handler() {
    unimplemented!()
}
