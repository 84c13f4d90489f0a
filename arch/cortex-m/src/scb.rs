// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! ARM System Control Block
//!
//! Only the registers the firmware touches are described. They sit at the
//! same offsets on ARMv7-M (EFM32 Series 1) and ARMv8-M mainline (EFR32
//! Series 2).
//!
//! <https://developer.arm.com/documentation/dui0553/latest/>

use kernel::utilities::registers::interfaces::{ReadWriteable, Readable, Writeable};
use kernel::utilities::registers::{register_bitfields, register_structs, ReadOnly, ReadWrite};
use kernel::utilities::StaticRef;

register_structs! {
    ScbRegisters {
        (0x00 => _reserved0),
        /// Vector Table Offset Register
        (0x08 => vtor: ReadWrite<u32, VectorTableOffset::Register>),
        (0x0c => _reserved1),
        /// System Control Register
        (0x10 => scr: ReadWrite<u32, SystemControl::Register>),
        (0x14 => _reserved2),
        /// Configurable Fault Status Register
        (0x28 => cfsr: ReadOnly<u32>),
        /// HardFault Status Register
        (0x2c => hfsr: ReadOnly<u32>),
        (0x30 => @END),
    }
}

register_bitfields![u32,
    VectorTableOffset [
        /// Bits [31:7] of the vector table address
        /// n.b. bits [6:0] are always 0.
        TBLOFF          OFFSET(7)   NUMBITS(25)
    ],

    SystemControl [
        /// Selects the EMU-controlled sleep modes (EM2 and below) on WFI.
        SLEEPDEEP       OFFSET(2)   NUMBITS(1)
    ]
];

const SCB: StaticRef<ScbRegisters> = unsafe { StaticRef::new(0xE000ED00 as *const ScbRegisters) };

/// Allow the core to go into deep sleep on WFI.
///
/// On EFM32/EFR32 parts the EMU then decides between EM2, EM3 and EM4.
pub unsafe fn set_sleepdeep() {
    SCB.scr.modify(SystemControl::SLEEPDEEP::SET);
}

/// Point the core at a vector table. The table must be 128-byte aligned.
pub unsafe fn set_vector_table_offset(table: *const ()) {
    SCB.vtor.set(table as u32);
}

/// Raw HFSR and CFSR, in that order.
pub unsafe fn fault_status() -> (u32, u32) {
    (SCB.hfsr.get(), SCB.cfsr.get())
}
