// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Support for debug output and for reporting panics.
//!
//! Usage
//! -----
//!
//! ```rust,ignore
//! let dcdc_ready = true;
//! debug!("dcdc ready: {}", dcdc_ready);
//! ```
//!
//! Boards register a synchronous [`IoWrite`] sink once during boot with
//! [`set_debug_writer`]. Every `debug!` call then writes one line, prefixed
//! with the calling source location, straight to that sink. Before a sink is
//! registered (or on boards that never register one) the output is dropped.
//!
//! The panic path does not go through the registered sink: the board's panic
//! handler passes its own writer to [`panic`], which prints the panic message
//! and then blinks the given LEDs forever.

use core::fmt::{self, Write};
use core::panic::PanicInfo;
use core::ptr::addr_of_mut;

use crate::config::CONFIG;
use crate::hil;

/// Synchronous byte sink used by the debug machinery.
pub trait IoWrite {
    /// Write all of `buf`, blocking until done. Returns the number of bytes
    /// written.
    fn write(&mut self, buf: &[u8]) -> usize;
}

static mut DEBUG_WRITER: Option<&'static mut dyn IoWrite> = None;

/// Register the sink that `debug!` writes to.
///
/// Must be called before any other code runs concurrently with `debug!`,
/// normally right after the board has configured its console pins.
pub unsafe fn set_debug_writer(writer: &'static mut dyn IoWrite) {
    *addr_of_mut!(DEBUG_WRITER) = Some(writer);
}

struct WriterAdapter<'a> {
    inner: &'a mut dyn IoWrite,
}

impl Write for WriterAdapter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.inner.write(s.as_bytes());
        Ok(())
    }
}

/// Write one formatted line to the registered debug sink.
///
/// Prefer the [`debug!`](crate::debug!) macro, which fills in the location.
pub fn debug_println(args: fmt::Arguments, file_line: &(&'static str, u32)) {
    // SAFETY: single-threaded; the writer is only replaced during boot.
    let writer = unsafe { (*addr_of_mut!(DEBUG_WRITER)).as_deref_mut() };
    if let Some(inner) = writer {
        let mut adapter = WriterAdapter { inner };
        let (file, line) = *file_line;
        let _ = write!(adapter, "{}:{}: ", file, line);
        let _ = adapter.write_fmt(args);
        let _ = adapter.write_str("\r\n");
    }
}

/// In-kernel `println()` debugging.
#[macro_export]
macro_rules! debug {
    () => ({
        $crate::debug!("")
    });
    ($msg:expr $(,)?) => ({
        $crate::debug::debug_println(format_args!($msg), &(file!(), line!()))
    });
    ($fmt:expr, $($arg:tt)+) => ({
        $crate::debug::debug_println(format_args!($fmt, $($arg)+), &(file!(), line!()))
    });
}

/// Tock default panic routine.
///
/// **NOTE:** The supplied `writer` must be synchronous.
///
/// This prints the panic message to `writer` (unless the kernel was built
/// with the `no_debug_panics` feature) and then blinks `leds` forever. `nop`
/// is called in the blink delay loop so that the loop is not optimized
/// away.
pub unsafe fn panic<W: Write>(
    leds: &[&dyn hil::gpio::Output],
    writer: &mut W,
    panic_info: &PanicInfo,
    nop: &dyn Fn(),
) -> ! {
    if CONFIG.debug_panics {
        let _ = writer.write_fmt(format_args!("\r\n{}\r\n", panic_info));
    }
    panic_blink_forever(leds, nop)
}

/// Blinks a recognizable pattern forever.
///
/// If a multi-color LED is used for the panic pattern, it is advised to turn
/// off other LEDs before calling this method.
///
/// Generally, boards should use red LEDs to indicate a panic if possible.
pub fn panic_blink_forever(leds: &[&dyn hil::gpio::Output], nop: &dyn Fn()) -> ! {
    leds.iter().for_each(|led| led.set());
    loop {
        for _ in 0..1_000_000 {
            nop();
        }
        leds.iter().for_each(|led| {
            led.toggle();
        });
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{debug_println, set_debug_writer, IoWrite};
    use std::boxed::Box;
    use std::string::String;
    use std::sync::Mutex;
    use std::vec::Vec;

    static CAPTURED: Mutex<Vec<u8>> = Mutex::new(Vec::new());

    struct Capture;

    impl IoWrite for Capture {
        fn write(&mut self, buf: &[u8]) -> usize {
            CAPTURED.lock().unwrap().extend_from_slice(buf);
            buf.len()
        }
    }

    #[test]
    fn lines_carry_location_and_crlf() {
        unsafe { set_debug_writer(Box::leak(Box::new(Capture))) };
        debug_println(format_args!("state {}", 3), &("board.rs", 12));
        crate::debug!("done");

        let text = String::from_utf8(CAPTURED.lock().unwrap().clone()).unwrap();
        assert!(text.starts_with("board.rs:12: state 3\r\n"));
        assert!(text.ends_with("done\r\n"));
        assert!(text.contains("debug.rs:"));
    }
}
