// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Interfaces for the supply regulator and deep-sleep entry.

/// Operating mode of a switching regulator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RegulatorMode {
    /// The converter is off and the supply is passed straight through.
    Bypass,
    /// The converter regulates the supply.
    Regulation,
}

pub trait Regulator {
    /// Bring the regulator up in regulation mode. Blocks until it runs.
    fn init(&self);

    /// Switch mode. Blocks until the switch is complete.
    fn set_mode(&self, mode: RegulatorMode);

    fn mode(&self) -> RegulatorMode;
}

/// What happens to pin state while in, and after leaving, deep sleep.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PinRetention {
    /// Pins are not retained.
    #[default]
    Disabled,
    /// Pins are retained in deep sleep and released on wakeup.
    Em4Exit,
    /// Pins stay latched after wakeup until software unlatches them.
    Latch,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DeepSleepConfig {
    pub pin_retention: PinRetention,
}

/// Entry into the deepest sleep mode. Wakeup from it is a reset.
pub trait DeepSleep {
    /// Release pins latched by a previous deep sleep.
    fn unlatch_pin_retention(&self);

    fn configure_deep_sleep(&self, config: DeepSleepConfig);

    /// Enter deep sleep. On hardware this only returns if entry failed.
    fn enter_deep_sleep(&self);
}

/// Told once deep sleep is imminent, before pin retention is configured.
///
/// Anything the client still drives at that point is latched into deep
/// sleep, so it releases its pins here.
pub trait DeepSleepClient {
    fn prepare_for_deep_sleep(&self);
}
