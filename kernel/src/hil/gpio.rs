// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Interfaces for General Purpose Input/Output pins.

use crate::ErrorCode;

/// Enum for configuring any pull-up or pull-down resistors on the GPIO pin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FloatingState {
    PullUp,
    PullDown,
    PullNone,
}

/// Enum for which state the pin is in. `Function` means the pin has been
/// configured to a special function; which function is outside the scope of
/// the HIL and is handled by the chip-specific API.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Configuration {
    /// Input and output buffers off, lowest power draw.
    LowPower,
    Input,
    Output,
    Function,
    Unknown,
}

/// The Pin trait allows a pin to be used as either input or output and to be
/// configured.
pub trait Pin: Input + Output + Configure {}

impl<T: Input + Output + Configure> Pin for T {}

pub trait Configure {
    /// Return the current pin configuration.
    fn configuration(&self) -> Configuration;

    /// Make the pin a push-pull output. The output level is whatever was
    /// last written with `set`/`clear`, so call `clear` first for a pin that
    /// must come up low.
    fn make_output(&self) -> Configuration;

    /// Make the pin an input. The floating state is left unchanged.
    fn make_input(&self) -> Configuration;

    /// Disable the pin and put it into its lowest power state. Re-enabling
    /// the pin requires reconfiguring it.
    fn deactivate_to_low_power(&self);

    fn set_floating_state(&self, state: FloatingState);
    fn floating_state(&self) -> FloatingState;

    fn is_input(&self) -> bool {
        self.configuration() == Configuration::Input
    }

    fn is_output(&self) -> bool {
        self.configuration() == Configuration::Output
    }
}

pub trait Output {
    /// Set the GPIO pin high.
    fn set(&self);

    /// Set the GPIO pin low.
    fn clear(&self);

    /// Toggle the GPIO pin. Return the new value of the pin.
    fn toggle(&self) -> bool;
}

pub trait Input {
    /// Get the current state of an input GPIO pin. For an output pin, return
    /// the output; for disabled or function pins the value is undefined.
    fn read(&self) -> bool;
}

/// Glitch filter on the input path of a pin.
pub trait InputFilter {
    fn set_input_filter(&self, enabled: bool);
}

/// Pin level that wakes the chip from deep sleep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WakeupLevel {
    Low,
    High,
}

/// Pins that can wake the chip from its deepest sleep mode.
pub trait DeepSleepWakeup {
    /// Arm this pin as a deep-sleep wakeup source.
    ///
    /// Returns `NOSUPPORT` if the pin is not connected to a wakeup line.
    fn enable_deep_sleep_wakeup(&self, level: WakeupLevel) -> Result<(), ErrorCode>;

    fn disable_deep_sleep_wakeup(&self);
}
