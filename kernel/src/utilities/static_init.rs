// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Support for statically initializing objects in memory.

/// Allocates a statically-sized global region of memory for data structures
/// but does not initialize the memory. Checks that the buffer is not aliased
/// and is only used once.
///
/// This macro creates the static buffer, and returns a
/// `&'static mut MaybeUninit<$T>`. Each expansion can only be evaluated once;
/// evaluating it again panics.
#[macro_export]
macro_rules! static_buf {
    ($T:ty $(,)?) => {{
        static mut BUF: (core::mem::MaybeUninit<$T>, bool) =
            (core::mem::MaybeUninit::uninit(), false);
        let buf = &mut *core::ptr::addr_of_mut!(BUF);
        if buf.1 {
            panic!(
                "Error! Single static_buf! called twice for type {}",
                core::any::type_name::<$T>()
            );
        }
        buf.1 = true;
        &mut buf.0
    }};
}

/// Allocates and initializes a statically-sized global region of memory for
/// data structures, returning a `&'static mut $T`.
///
/// The macro must be used inside an `unsafe` block because it touches a
/// `static mut`. The board `main` functions are the only callers.
#[macro_export]
macro_rules! static_init {
    ($T:ty, $e:expr $(,)?) => {{
        let buf = $crate::static_buf!($T);
        buf.write($e)
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn initializes_once() {
        fn make() -> &'static mut u32 {
            unsafe { crate::static_init!(u32, 41) }
        }
        let value = make();
        *value += 1;
        assert_eq!(*value, 42);
    }
}
