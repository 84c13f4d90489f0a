// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Data structure for storing compile-time configuration options.
//!
//! Configuration lives in a typed `const` object rather than in `#[cfg]`
//! attributes scattered through the code. All code paths are type-checked by
//! the compiler, even those that end up disabled, and the compiler folds the
//! constants so that a disabled option costs nothing in the final binary.

/// Data structure holding compile-time configuration options.
///
/// To change the configuration, enable the matching cargo feature of the
/// kernel crate from the board crate.
pub struct Config {
    /// Whether the panic handler should print the panic location and message
    /// to the debug writer before blinking the panic LED.
    ///
    /// Disabling this removes the formatting machinery from the panic path,
    /// which noticeably shrinks small images.
    pub debug_panics: bool,

    /// Whether capsules that drive a power-mode state machine should print
    /// every state transition to the debug output.
    pub trace_power_transitions: bool,
}

/// A unique instance of `Config` where compile-time configuration options are
/// defined. This is the only location where `#[cfg(x)]` is used to configure
/// code based on Cargo features.
pub const CONFIG: Config = Config {
    debug_panics: !cfg!(feature = "no_debug_panics"),
    trace_power_transitions: cfg!(feature = "trace_power_transitions"),
};
