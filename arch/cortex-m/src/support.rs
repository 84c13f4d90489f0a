// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Helper functions for the Cortex-M architecture.

/// NOP instruction
#[cfg(any(doc, all(target_arch = "arm", target_os = "none")))]
#[inline(always)]
pub fn nop() {
    use core::arch::asm;
    unsafe {
        asm!("nop", options(nomem, nostack, preserves_flags));
    }
}

/// WFI instruction
#[cfg(any(doc, all(target_arch = "arm", target_os = "none")))]
#[inline(always)]
pub unsafe fn wfi() {
    use core::arch::asm;
    asm!("wfi", options(nomem, preserves_flags));
}

/// BKPT instruction.
///
/// With a debugger attached the core halts here until the probe resumes it.
/// Without one the instruction escalates to a HardFault.
#[cfg(any(doc, all(target_arch = "arm", target_os = "none")))]
#[inline(always)]
pub fn bkpt() {
    use core::arch::asm;
    unsafe {
        asm!("bkpt #0", options(nomem, nostack, preserves_flags));
    }
}

/// Data and instruction synchronization barriers.
#[cfg(any(doc, all(target_arch = "arm", target_os = "none")))]
#[inline(always)]
pub fn dsb_isb() {
    use core::arch::asm;
    unsafe {
        asm!("dsb", "isb", options(nomem, nostack, preserves_flags));
    }
}

/// Spin for at least `cycles` core clock cycles.
///
/// Each loop iteration is a `subs`/`bne` pair plus a `nop`, which takes at
/// least four cycles on both the M4 and the M33 pipelines.
#[cfg(any(doc, all(target_arch = "arm", target_os = "none")))]
#[inline(always)]
pub fn delay_cycles(cycles: u32) {
    use core::arch::asm;
    let iterations = (cycles / 4).max(1);
    unsafe {
        asm!(
            "1:",
            "nop",
            "subs {0}, #1",
            "bne 1b",
            inout(reg) iterations => _,
            options(nomem, nostack),
        );
    }
}

/// NOP instruction (mock)
// Mock implementations for tests on the host.
#[cfg(not(any(doc, all(target_arch = "arm", target_os = "none"))))]
pub fn nop() {
    unimplemented!()
}

/// WFI instruction (mock)
#[cfg(not(any(doc, all(target_arch = "arm", target_os = "none"))))]
pub unsafe fn wfi() {
    unimplemented!()
}

/// BKPT instruction (mock)
#[cfg(not(any(doc, all(target_arch = "arm", target_os = "none"))))]
pub fn bkpt() {
    unimplemented!()
}

/// Barriers (mock)
#[cfg(not(any(doc, all(target_arch = "arm", target_os = "none"))))]
pub fn dsb_isb() {
    unimplemented!()
}

/// Busy wait (mock)
#[cfg(not(any(doc, all(target_arch = "arm", target_os = "none"))))]
pub fn delay_cycles(_cycles: u32) {
    unimplemented!()
}

/// Number of core clock cycles needed to spin for `us` microseconds at
/// `core_hz`, saturating at `u32::MAX`.
pub const fn cycles_for_us(core_hz: u32, us: u32) -> u32 {
    let cycles = (core_hz as u64 * us as u64) / 1_000_000;
    if cycles > u32::MAX as u64 {
        u32::MAX
    } else {
        cycles as u32
    }
}
