// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2023.

//! Drive a low-frequency oscillator onto a GPIO pin.
//!
//! The configurator brings up the oscillator and routes it through one of the
//! chip's clock output channels so the waveform can be probed on the pin.
//! Once configured there is nothing left to do and the core idles.
//!
//! Usage
//! -----
//!
//! ```rust,ignore
//! let clkout = static_init!(
//!     ClockOutputConfigurator<'static, PeripheralClock, GpioPin, Lfrco, ClockOut>,
//!     ClockOutputConfigurator::new(
//!         &peripherals.gpio_clock,
//!         &peripherals.gpio_ports[PinId::new(Port::A, 0)],
//!         &peripherals.lfrco,
//!         &peripherals.clkout1,
//!         ClockOutSource::Lfrco,
//!     )
//! );
//! clkout.run();
//! ```

use kernel::debug;
use kernel::hil::clock::{ClockInterface, ClockOutput, Oscillator};
use kernel::hil::gpio::Pin;

pub struct ClockOutputConfigurator<'a, G: ClockInterface, P: Pin, O: Oscillator, K: ClockOutput> {
    gpio_clock: &'a G,
    pin: &'a P,
    oscillator: &'a O,
    output: &'a K,
    source: K::Source,
}

impl<'a, G: ClockInterface, P: Pin, O: Oscillator, K: ClockOutput>
    ClockOutputConfigurator<'a, G, P, O, K>
{
    pub fn new(
        gpio_clock: &'a G,
        pin: &'a P,
        oscillator: &'a O,
        output: &'a K,
        source: K::Source,
    ) -> Self {
        Self {
            gpio_clock,
            pin,
            oscillator,
            output,
            source,
        }
    }

    /// Bring up the oscillator and route it to the pin.
    ///
    /// Blocks until the oscillator reports ready, forever if it never does.
    pub fn configure(&self) {
        // GPIO registers are only writable once their clock runs.
        self.gpio_clock.enable();

        self.pin.clear();
        self.pin.make_output();

        self.oscillator.enable();
        while !self.oscillator.is_ready() {}

        self.output.set_source(self.source);
        self.output.enable_route();

        debug!("clock output routed");
    }

    pub fn run(&self) -> ! {
        self.configure();
        loop {}
    }
}
