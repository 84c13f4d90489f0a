// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Interfaces for peripheral clock gates, oscillators, and clock output
//! routes.

/// Generic operations that clock-gated peripherals should support.
pub trait ClockInterface {
    fn is_enabled(&self) -> bool;
    fn enable(&self);
    fn disable(&self);
}

/// An oscillator that needs time to stabilize after being started.
pub trait Oscillator {
    /// Start the oscillator. Does not wait for it to stabilize.
    fn enable(&self);
    fn disable(&self);
    fn is_enabled(&self) -> bool;

    /// Whether the oscillator output is stable and may be used.
    fn is_ready(&self) -> bool;
}

/// A clock output channel that drives an internal clock onto a pin.
pub trait ClockOutput {
    /// Chip-specific set of clocks this channel can output.
    type Source: Copy;

    /// Select the clock driven by this channel.
    fn set_source(&self, source: Self::Source);

    /// The selected clock, or `None` if the channel is disabled.
    fn source(&self) -> Option<Self::Source>;

    /// Connect the channel to its pin.
    fn enable_route(&self);
    fn disable_route(&self);
    fn is_routed(&self) -> bool;
}
