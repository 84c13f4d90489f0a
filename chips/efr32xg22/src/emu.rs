// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Energy Management Unit (EMU), Series 2.
//!
//! Covers EM4 (shutoff) entry, EM4 pin retention, and the reset cause
//! register, which on Series 2 lives in the EMU rather than in an RMU.

use core::fmt;

use kernel::hil::power::{DeepSleep, DeepSleepConfig, PinRetention};
use kernel::hil::reset::{BootKind, Reset};
use kernel::utilities::registers::interfaces::{ReadWriteable, Readable, Writeable};
use kernel::utilities::registers::{register_bitfields, register_structs, ReadOnly, ReadWrite, WriteOnly};
use kernel::utilities::StaticRef;

register_structs! {
    pub EmuRegisters {
        (0x000 => _reserved0),
        /// EM4 Control
        (0x060 => pub(crate) em4ctrl: ReadWrite<u32, EM4CTRL::Register>),
        (0x064 => _reserved1),
        /// EMU Command
        (0x070 => pub(crate) cmd: WriteOnly<u32, CMD::Register>),
        (0x074 => _reserved2),
        /// Reset Cause
        (0x094 => pub(crate) rstcause: ReadOnly<u32, RSTCAUSE::Register>),
        (0x098 => @END),
    }
}

register_bitfields![u32,
    EM4CTRL [
        /// Write the entry sequence here to enter EM4
        EM4ENTRY OFFSET(0) NUMBITS(2) [],
        /// Pin retention in EM4
        EM4IORETMODE OFFSET(4) NUMBITS(2) [
            Disable = 0,
            Em4Exit = 1,
            SwUnlatch = 2
        ],
        /// Brown-out detection on AVDD/IOVDD in EM4
        BOD3SENSE OFFSET(8) NUMBITS(1) []
    ],
    CMD [
        /// Release pins latched by EM4 retention
        EM4UNLATCH 1,
        TEMPAVGREQ 4,
        EM01VSCALE1 9,
        EM01VSCALE2 10,
        /// Clear RSTCAUSE
        RSTCAUSECLR 17
    ],
    RSTCAUSE [
        POR 0,
        PIN 1,
        EM4 2,
        WDOG0 3,
        WDOG1 4,
        LOCKUP 5,
        SYSREQ 6,
        DVDDBOD 7,
        DVDDLEBOD 8,
        DECBOD 9,
        AVDDBOD 10,
        IOVDD0BOD 11,
        TAMPER 13,
        M0SYSREQ 14,
        M0LOCKUP 15,
        VREGIN 31
    ]
];

pub const EMU_BASE: StaticRef<EmuRegisters> =
    unsafe { StaticRef::new(0x4000_4000 as *const EmuRegisters) };

/// EM4ENTRY values of the unlock sequence.
const EM4_ENTRY_SEQ2: u32 = 2;
const EM4_ENTRY_SEQ3: u32 = 3;

/// Raw RSTCAUSE value. Several causes can be set at once.
#[derive(Clone, Copy, PartialEq)]
pub struct ResetCause(u32);

impl ResetCause {
    pub const POWER_ON: ResetCause = ResetCause(1 << 0);
    pub const PIN: ResetCause = ResetCause(1 << 1);
    pub const EM4: ResetCause = ResetCause(1 << 2);
    pub const WATCHDOG0: ResetCause = ResetCause(1 << 3);
    pub const LOCKUP: ResetCause = ResetCause(1 << 5);
    pub const SYSREQ: ResetCause = ResetCause(1 << 6);

    pub const fn from_raw(raw: u32) -> ResetCause {
        ResetCause(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, other: ResetCause) -> bool {
        self.0 & other.0 == other.0
    }
}

impl fmt::Debug for ResetCause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const NAMES: [(u32, &str); 16] = [
            (0, "POR"),
            (1, "PIN"),
            (2, "EM4"),
            (3, "WDOG0"),
            (4, "WDOG1"),
            (5, "LOCKUP"),
            (6, "SYSREQ"),
            (7, "DVDDBOD"),
            (8, "DVDDLEBOD"),
            (9, "DECBOD"),
            (10, "AVDDBOD"),
            (11, "IOVDD0BOD"),
            (13, "TAMPER"),
            (14, "M0SYSREQ"),
            (15, "M0LOCKUP"),
            (31, "VREGIN"),
        ];
        write!(f, "ResetCause(")?;
        let mut first = true;
        for (bit, name) in NAMES {
            if self.0 & (1 << bit) != 0 {
                if !first {
                    write!(f, " | ")?;
                }
                write!(f, "{}", name)?;
                first = false;
            }
        }
        write!(f, ")")
    }
}

pub struct Emu {
    registers: StaticRef<EmuRegisters>,
}

impl Emu {
    pub const fn new(registers: StaticRef<EmuRegisters>) -> Self {
        Self { registers }
    }

    /// Write the EM4 entry unlock sequence. The core enters EM4 on the next
    /// WFI with SLEEPDEEP set.
    fn write_em4_entry_sequence(&self) {
        let em4ctrl = &self.registers.em4ctrl;
        for _ in 0..4 {
            em4ctrl.modify(EM4CTRL::EM4ENTRY.val(EM4_ENTRY_SEQ2));
            em4ctrl.modify(EM4CTRL::EM4ENTRY.val(EM4_ENTRY_SEQ3));
        }
        em4ctrl.modify(EM4CTRL::EM4ENTRY.val(EM4_ENTRY_SEQ2));
    }
}

impl DeepSleep for Emu {
    fn unlatch_pin_retention(&self) {
        self.registers.cmd.write(CMD::EM4UNLATCH::SET);
    }

    fn configure_deep_sleep(&self, config: DeepSleepConfig) {
        let mode = match config.pin_retention {
            PinRetention::Disabled => EM4CTRL::EM4IORETMODE::Disable,
            PinRetention::Em4Exit => EM4CTRL::EM4IORETMODE::Em4Exit,
            PinRetention::Latch => EM4CTRL::EM4IORETMODE::SwUnlatch,
        };
        self.registers.em4ctrl.modify(mode);
    }

    fn enter_deep_sleep(&self) {
        unsafe {
            cortexm::scb::set_sleepdeep();
        }
        self.write_em4_entry_sequence();
        cortexm::support::dsb_isb();
        unsafe {
            cortexm::support::wfi();
        }
    }
}

impl Reset for Emu {
    type Cause = ResetCause;

    fn reset_cause(&self) -> ResetCause {
        ResetCause(self.registers.rstcause.get())
    }

    fn clear_reset_cause(&self) {
        self.registers.cmd.write(CMD::RSTCAUSECLR::SET);
    }

    fn boot_kind(&self, cause: ResetCause) -> BootKind {
        if cause.contains(ResetCause::EM4) {
            BootKind::WokeFromDeepSleep
        } else {
            BootKind::NormalBoot
        }
    }
}
