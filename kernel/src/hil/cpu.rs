// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Interface to CPU debug features.

pub trait Breakpoint {
    /// Halt the core for an attached debugger. Execution resumes after this
    /// call when the debugger continues.
    fn breakpoint(&self);
}
