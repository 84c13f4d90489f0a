// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2023.

//! Polled debug console on a USART in asynchronous mode.
//!
//! The port is brought up by the first write rather than at construction,
//! so a board can register it as the `debug!` sink before the DC-DC and
//! the EM4 pin latch have been dealt with. Before EM4 it hands every pin it
//! drives back as `Disabled`, so nothing console related is latched into
//! deep sleep.

use core::cell::Cell;
use core::fmt::Write;

use kernel::debug::IoWrite;
use kernel::hil::clock::ClockInterface;
use kernel::hil::gpio::{Configure, Output};
use kernel::hil::power::DeepSleepClient;
use kernel::utilities::StaticRef;
use kernel::ErrorCode;

use crate::cmu::PeripheralClock;
use crate::gpio::{GpioPin, GpioRegisters, PinId};
use crate::usart::{UartPins, Usart};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConsoleState {
    /// Nothing configured yet.
    Off,
    On,
    /// The USART refused the baud rate. Output is dropped.
    Failed(ErrorCode),
    /// Pins handed back before deep sleep. Output is dropped.
    Released,
}

pub struct Console {
    usart: Usart,
    gpio_clock: PeripheralClock,
    gpio: StaticRef<GpioRegisters>,
    pins: UartPins,
    /// Driven high while the console is on, e.g. a level shifter or a
    /// board controller pass-through.
    enable: Option<PinId>,
    baud: u32,
    state: Cell<ConsoleState>,
}

impl Console {
    pub const fn new(
        usart: Usart,
        gpio_clock: PeripheralClock,
        gpio: StaticRef<GpioRegisters>,
        pins: UartPins,
        enable: Option<PinId>,
        baud: u32,
    ) -> Self {
        Self {
            usart,
            gpio_clock,
            gpio,
            pins,
            enable,
            baud,
            state: Cell::new(ConsoleState::Off),
        }
    }

    pub fn state(&self) -> ConsoleState {
        self.state.get()
    }

    fn enable_pin(&self) -> Option<GpioPin> {
        self.enable.map(|id| GpioPin::new(self.gpio, id))
    }

    /// Bring the port up on first use. Returns whether output can go out.
    fn ensure_on(&self) -> bool {
        if self.state.get() == ConsoleState::Off {
            self.gpio_clock.enable();
            if let Some(enable) = self.enable_pin() {
                enable.set();
                enable.make_output();
            }
            match self.usart.configure_uart(self.baud, self.pins) {
                Ok(_) => self.state.set(ConsoleState::On),
                Err(e) => {
                    if let Some(enable) = self.enable_pin() {
                        enable.deactivate_to_low_power();
                    }
                    self.state.set(ConsoleState::Failed(e));
                }
            }
        }
        self.state.get() == ConsoleState::On
    }

    /// Send `buf` and wait for it to leave the shift register. Returns the
    /// number of bytes sent, 0 if the console cannot send.
    pub fn write_bytes(&self, buf: &[u8]) -> usize {
        if !self.ensure_on() {
            return 0;
        }
        for &c in buf {
            self.usart.send_byte(c);
        }
        self.usart.flush();
        buf.len()
    }
}

impl IoWrite for Console {
    fn write(&mut self, buf: &[u8]) -> usize {
        self.write_bytes(buf)
    }
}

impl Write for Console {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.write_bytes(s.as_bytes());
        Ok(())
    }
}

impl DeepSleepClient for Console {
    fn prepare_for_deep_sleep(&self) {
        if self.state.get() == ConsoleState::On {
            self.usart.flush();
            self.usart.release_uart(self.pins);
        }
        if let Some(enable) = self.enable_pin() {
            enable.deactivate_to_low_power();
        }
        self.state.set(ConsoleState::Released);
    }
}

#[cfg(test)]
mod tests {
    use super::{Console, ConsoleState};
    use crate::cmu::tests::fake_cmu;
    use crate::cmu::{Clock, CmuRegisters, PeripheralClock};
    use crate::gpio::tests::fake_gpio;
    use crate::gpio::{GpioPin, GpioRegisters, Mode, PinId};
    use crate::usart::tests::{fake_usart, last_tx, set_idle};
    use crate::usart::{UartPins, Usart, UsartRegisters};
    use kernel::hil::power::DeepSleepClient;
    use kernel::utilities::registers::interfaces::Readable;
    use kernel::utilities::StaticRef;
    use kernel::ErrorCode;

    const VCOM: UartPins = UartPins {
        tx: PinId::PA05,
        rx: PinId::PA06,
    };

    struct Fixture {
        cmu: StaticRef<CmuRegisters>,
        gpio: StaticRef<GpioRegisters>,
        usart: StaticRef<UsartRegisters>,
        console: Console,
    }

    fn fixture(baud: u32) -> Fixture {
        let cmu = fake_cmu();
        let gpio = fake_gpio();
        let usart = fake_usart();
        set_idle(&usart, 0);
        let console = Console::new(
            Usart::new(usart, 1, PeripheralClock::new(cmu, Clock::Usart1), gpio),
            PeripheralClock::new(cmu, Clock::Gpio),
            gpio,
            VCOM,
            Some(PinId::PD04),
            baud,
        );
        Fixture {
            cmu,
            gpio,
            usart,
            console,
        }
    }

    fn mode(gpio: StaticRef<GpioRegisters>, id: PinId) -> Mode {
        GpioPin::new(gpio, id).mode()
    }

    #[test]
    fn nothing_driven_until_first_write() {
        let f = fixture(115_200);
        assert_eq!(f.console.state(), ConsoleState::Off);
        assert_eq!(f.cmu.clken0.get(), 0);
        assert_eq!(mode(f.gpio, PinId::PD04), Mode::Disabled);

        assert_eq!(f.console.write_bytes(b"ok"), 2);

        assert_eq!(f.console.state(), ConsoleState::On);
        assert_eq!(last_tx(&f.usart), b'k' as u32);
        assert_eq!(mode(f.gpio, PinId::PA05), Mode::PushPull);
        assert_eq!(mode(f.gpio, PinId::PD04), Mode::PushPull);
        assert_eq!(f.gpio.ports[3].dout.get(), 1 << 4);
    }

    #[test]
    fn deep_sleep_leaves_console_pins_disabled() {
        let f = fixture(115_200);
        f.console.write_bytes(b"sleeping\r\n");

        f.console.prepare_for_deep_sleep();

        assert_eq!(f.console.state(), ConsoleState::Released);
        for id in [PinId::PA05, PinId::PA06, PinId::PD04] {
            assert_eq!(mode(f.gpio, id), Mode::Disabled);
        }
        assert_eq!(f.gpio.ports[0].dout.get(), 0);
        assert_eq!(f.gpio.ports[3].dout.get(), 0);
        assert_eq!(f.gpio.usart_routes(1), 0);
        assert_eq!(f.usart.en.get(), 0);
        // GPIO stays clocked for the retention latch; USART1 does not.
        assert_eq!(f.cmu.clken0.get(), 1 << 26);

        // Late log lines must not bring the port back.
        assert_eq!(f.console.write_bytes(b"late"), 0);
        assert_eq!(mode(f.gpio, PinId::PA05), Mode::Disabled);
    }

    #[test]
    fn release_without_any_output() {
        let f = fixture(115_200);
        f.console.prepare_for_deep_sleep();

        assert_eq!(f.console.state(), ConsoleState::Released);
        assert_eq!(f.cmu.clken0.get(), 0);
        assert_eq!(mode(f.gpio, PinId::PD04), Mode::Disabled);
    }

    #[test]
    fn bad_baud_rate_is_recorded() {
        let f = fixture(1);

        assert_eq!(f.console.write_bytes(b"lost"), 0);

        assert_eq!(f.console.state(), ConsoleState::Failed(ErrorCode::INVAL));
        assert_eq!(mode(f.gpio, PinId::PD04), Mode::Disabled);
        assert_eq!(f.usart.en.get(), 0);
    }
}
