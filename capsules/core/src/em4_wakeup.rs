// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2023.

//! EM4 deep sleep with GPIO wakeup.
//!
//! On a normal boot the sequencer parks everything that draws current (the
//! external flash, the DC-DC converter) and puts the chip into EM4, its
//! deepest sleep mode, with one button armed as a wakeup source. Wakeup from
//! EM4 is a reset, so the sequencer runs again from the start, recognizes
//! the EM4 reset cause, and blinks an LED instead of sleeping.
//!
//! A device stuck in EM4 cannot be reached by a debugger. Holding the escape
//! button during reset stops the boot at a breakpoint before EM4 is entered.
//!
//! ```text
//!          Boot
//!           |
//!    button held? --yes--> DebugHalt (LED1 on, breakpoint)
//!           |                     |
//!           +<--------------------+
//!           |
//!   reset cause EM4? --yes--> WokeFromDeepSleep (blink LED0 forever)
//!           |
//!    EnteringDeepSleep (flash off, DC-DC bypass, pins latched, EM4)
//! ```

use core::cell::Cell;

use kernel::config::CONFIG;
use kernel::debug;
use kernel::hil::clock::ClockInterface;
use kernel::hil::cpu::Breakpoint;
use kernel::hil::gpio::{DeepSleepWakeup, FloatingState, InputFilter, Pin, WakeupLevel};
use kernel::hil::power::{
    DeepSleep, DeepSleepClient, DeepSleepConfig, PinRetention, Regulator, RegulatorMode,
};
use kernel::hil::reset::{BootKind, Reset};
use kernel::hil::spi::SpiMaster;
use kernel::hil::time::BusyWait;

use crate::mx25r::Mx25r;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum State {
    Boot,
    DebugHalt,
    WokeFromDeepSleep,
    EnteringDeepSleep,
}

/// The board pins the sequence drives.
pub struct Em4WakeupPins<'a, P: Pin + InputFilter + DeepSleepWakeup> {
    /// Held low during reset to stop at a breakpoint.
    pub escape: &'a P,
    /// Pressed (low) to wake from EM4.
    pub wakeup: &'a P,
    /// Blinks after an EM4 wakeup.
    pub led0: &'a P,
    /// Lit while halted for the debugger.
    pub led1: &'a P,
}

pub struct Em4Wakeup<'a, P, G, R, E, S, C, D>
where
    P: Pin + InputFilter + DeepSleepWakeup,
    G: ClockInterface,
    R: Regulator,
    E: DeepSleep + Reset,
    S: SpiMaster,
    C: Breakpoint,
    D: BusyWait,
{
    pins: Em4WakeupPins<'a, P>,
    gpio_clock: &'a G,
    regulator: &'a R,
    emu: &'a E,
    flash: &'a Mx25r<'a, S>,
    cpu: &'a C,
    delay: &'a D,
    blink_delay_us: u32,
    state: Cell<State>,
    deep_sleep_client: Cell<Option<&'a dyn DeepSleepClient>>,
}

impl<'a, P, G, R, E, S, C, D> Em4Wakeup<'a, P, G, R, E, S, C, D>
where
    P: Pin + InputFilter + DeepSleepWakeup,
    G: ClockInterface,
    R: Regulator,
    E: DeepSleep + Reset,
    S: SpiMaster,
    C: Breakpoint,
    D: BusyWait,
{
    pub fn new(
        pins: Em4WakeupPins<'a, P>,
        gpio_clock: &'a G,
        regulator: &'a R,
        emu: &'a E,
        flash: &'a Mx25r<'a, S>,
        cpu: &'a C,
        delay: &'a D,
        blink_delay_us: u32,
    ) -> Self {
        Self {
            pins,
            gpio_clock,
            regulator,
            emu,
            flash,
            cpu,
            delay,
            blink_delay_us,
            state: Cell::new(State::Boot),
            deep_sleep_client: Cell::new(None),
        }
    }

    /// Register board code that must let go of its pins before EM4.
    pub fn set_deep_sleep_client(&self, client: &'a dyn DeepSleepClient) {
        self.deep_sleep_client.set(Some(client));
    }

    pub fn state(&self) -> State {
        self.state.get()
    }

    fn transition(&self, next: State) {
        self.state.set(next);
        if CONFIG.trace_power_transitions {
            debug!("em4: {:?}", next);
        }
    }

    fn init_gpio(&self) {
        self.gpio_clock.enable();

        let escape = self.pins.escape;
        escape.make_input();
        escape.set_input_filter(true);

        let wakeup = self.pins.wakeup;
        wakeup.make_input();
        wakeup.set_floating_state(FloatingState::PullUp);
        wakeup.set_input_filter(true);
        if let Err(e) = wakeup.enable_deep_sleep_wakeup(WakeupLevel::Low) {
            debug!("em4: wakeup pin not armed: {:?}", e);
        }

        for led in [self.pins.led0, self.pins.led1] {
            led.clear();
            led.make_output();
        }
    }

    fn enter_deep_sleep(&self) {
        self.transition(State::EnteringDeepSleep);
        self.flash.power_down();
        self.regulator.set_mode(RegulatorMode::Bypass);
        if let Some(client) = self.deep_sleep_client.get() {
            client.prepare_for_deep_sleep();
        }
        self.emu.configure_deep_sleep(DeepSleepConfig {
            pin_retention: PinRetention::Latch,
        });
        self.emu.enter_deep_sleep();
    }

    /// Run the boot sequence and return the state it settles in.
    ///
    /// On hardware this only returns in `WokeFromDeepSleep`, or in
    /// `EnteringDeepSleep` if EM4 entry failed.
    pub fn boot(&self) -> State {
        self.state.set(State::Boot);
        self.regulator.init();
        // Pins latched by the previous EM4 stay frozen until released.
        self.emu.unlatch_pin_retention();
        self.init_gpio();

        if !self.pins.escape.read() {
            self.transition(State::DebugHalt);
            self.pins.led1.set();
            self.cpu.breakpoint();
        } else {
            self.pins.escape.deactivate_to_low_power();
        }

        let cause = self.emu.take_reset_cause();
        match self.emu.boot_kind(cause) {
            BootKind::WokeFromDeepSleep => self.transition(State::WokeFromDeepSleep),
            BootKind::NormalBoot => self.enter_deep_sleep(),
        }
        self.state.get()
    }

    /// One half-period of the wakeup blink.
    pub fn blink_once(&self) {
        self.pins.led0.toggle();
        self.delay.busy_wait_us(self.blink_delay_us);
    }

    pub fn run(&self) -> ! {
        if self.boot() == State::WokeFromDeepSleep {
            loop {
                self.blink_once();
            }
        }
        // EM4 entry returned.
        loop {}
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{Em4Wakeup, Em4WakeupPins, State};
    use crate::mock::{
        Event, Log, MockClock, MockCpu, MockDelay, MockEmu, MockPin, MockPinSetup,
        MockRegulator, MockSpi, EM4_CAUSE, POR_CAUSE,
    };
    use crate::mx25r::Mx25r;
    use kernel::hil::gpio::{Configuration, Configure, Output, WakeupLevel};
    use kernel::hil::power::{DeepSleepClient, DeepSleepConfig, PinRetention, RegulatorMode};
    use kernel::hil::reset::Reset;
    use std::vec::Vec;

    struct Board<'a> {
        escape: MockPin<'a>,
        wakeup: MockPin<'a>,
        led0: MockPin<'a>,
        led1: MockPin<'a>,
        clock: MockClock<'a>,
        regulator: MockRegulator<'a>,
        emu: MockEmu<'a>,
        spi: MockSpi<'a>,
        cpu: MockCpu<'a>,
        delay: MockDelay<'a>,
    }

    impl<'a> Board<'a> {
        fn new(log: &'a Log, escape_held: bool, cause: u32) -> Self {
            Board {
                escape: MockPin::new(
                    log,
                    "escape",
                    MockPinSetup {
                        input_level: !escape_held,
                        ..MockPinSetup::default()
                    },
                ),
                wakeup: MockPin::new(
                    log,
                    "wakeup",
                    MockPinSetup {
                        input_level: true,
                        wakeup_line: true,
                    },
                ),
                led0: MockPin::new(log, "led0", MockPinSetup::default()),
                led1: MockPin::new(log, "led1", MockPinSetup::default()),
                clock: MockClock::new(log, "gpio"),
                regulator: MockRegulator::new(log),
                emu: MockEmu::new(log, cause),
                spi: MockSpi::new(log, 1),
                cpu: MockCpu::new(log),
                delay: MockDelay::new(log),
            }
        }
    }

    /// Stands in for a board console that drives two pins while awake.
    struct Console<'a> {
        tx: MockPin<'a>,
        enable: MockPin<'a>,
    }

    impl<'a> Console<'a> {
        fn new(log: &'a Log) -> Self {
            let console = Console {
                tx: MockPin::new(log, "console_tx", MockPinSetup::default()),
                enable: MockPin::new(log, "console_enable", MockPinSetup::default()),
            };
            for pin in [&console.tx, &console.enable] {
                pin.set();
                pin.make_output();
            }
            console
        }
    }

    impl DeepSleepClient for Console<'_> {
        fn prepare_for_deep_sleep(&self) {
            self.tx.deactivate_to_low_power();
            self.enable.deactivate_to_low_power();
        }
    }

    fn boot(board: &Board) -> State {
        boot_with_client(board, None)
    }

    fn boot_with_client(board: &Board, client: Option<&dyn DeepSleepClient>) -> State {
        let flash = Mx25r::new(&board.spi, 1_000_000);
        let sequencer = Em4Wakeup::new(
            Em4WakeupPins {
                escape: &board.escape,
                wakeup: &board.wakeup,
                led0: &board.led0,
                led1: &board.led1,
            },
            &board.clock,
            &board.regulator,
            &board.emu,
            &flash,
            &board.cpu,
            &board.delay,
            250_000,
        );
        if let Some(client) = client {
            sequencer.set_deep_sleep_client(client);
        }
        let state = sequencer.boot();
        assert_eq!(sequencer.state(), state);
        if state == State::WokeFromDeepSleep {
            sequencer.blink_once();
            sequencer.blink_once();
        }
        state
    }

    fn spi_bytes(events: &[Event]) -> Vec<u8> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::SpiByte(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn cold_boot_parks_peripherals_and_sleeps() {
        let log = Log::new();
        let board = Board::new(&log, false, POR_CAUSE);

        assert_eq!(boot(&board), State::EnteringDeepSleep);

        let events = log.events();
        // Only the commands of the power-down sequence reach the flash.
        let commands: Vec<u8> = spi_bytes(&events)
            .into_iter()
            .filter(|b| *b != 0x05 && *b != 0x00)
            .collect();
        assert_eq!(commands, [0x66, 0x99, 0xB9]);

        let tail = &events[events.len() - 4..];
        assert_eq!(
            tail,
            [
                Event::SpiDeinit,
                Event::RegulatorMode(RegulatorMode::Bypass),
                Event::DeepSleepConfig(DeepSleepConfig {
                    pin_retention: PinRetention::Latch,
                }),
                Event::EnterDeepSleep,
            ]
        );
        assert!(events.contains(&Event::PinLowPower("escape")));
        assert!(!events.contains(&Event::Breakpoint));
        assert!(!events.iter().any(|e| matches!(e, Event::PinToggle(_))));
    }

    #[test]
    fn boot_prepares_regulator_and_pins_first() {
        let log = Log::new();
        let board = Board::new(&log, false, POR_CAUSE);
        boot(&board);

        let events = log.events();
        assert_eq!(events[0], Event::RegulatorInit);
        assert_eq!(events[1], Event::Unlatch);
        assert_eq!(events[2], Event::ClockEnable("gpio"));

        let pos = |event: Event| events.iter().position(|e| *e == event).unwrap();
        assert!(pos(Event::PinWakeup("wakeup", WakeupLevel::Low)) < pos(Event::SpiInit));
        assert!(pos(Event::PinInputFilter("escape", true)) < pos(Event::PinRead("escape")));
        assert!(board.wakeup.is_pulled_up());
        assert!(board.led0.is_output_low());
        assert!(board.led1.is_output_low());
    }

    #[test]
    fn held_escape_button_stops_before_flash_or_blink() {
        let log = Log::new();
        let board = Board::new(&log, true, POR_CAUSE);
        boot(&board);

        let events = log.events();
        let halt = events
            .iter()
            .position(|e| *e == Event::Breakpoint)
            .expect("breakpoint reached");
        let before = &events[..halt];
        assert!(spi_bytes(before).is_empty());
        assert!(!before.iter().any(|e| matches!(e, Event::PinToggle(_))));
        assert_eq!(before.last(), Some(&Event::PinSet("led1")));
        assert!(!events.contains(&Event::PinLowPower("escape")));
    }

    #[test]
    fn em4_wakeup_clears_cause_and_blinks() {
        let log = Log::new();
        let board = Board::new(&log, false, EM4_CAUSE);

        assert_eq!(boot(&board), State::WokeFromDeepSleep);

        let events = log.events();
        assert!(spi_bytes(&events).is_empty());
        assert!(!events.contains(&Event::EnterDeepSleep));
        assert!(!events.contains(&Event::RegulatorMode(RegulatorMode::Bypass)));
        assert_eq!(board.emu.reset_cause(), 0);

        let read = events.iter().position(|e| *e == Event::ResetCauseRead).unwrap();
        assert_eq!(events[read + 1], Event::ResetCauseClear);
        assert_eq!(
            &events[events.len() - 4..],
            [
                Event::PinToggle("led0"),
                Event::Delay(250_000),
                Event::PinToggle("led0"),
                Event::Delay(250_000),
            ]
        );
    }

    #[test]
    fn second_take_sees_no_cause() {
        let log = Log::new();
        let emu = MockEmu::new(&log, EM4_CAUSE);

        assert_eq!(emu.take_reset_cause(), EM4_CAUSE);
        assert_eq!(emu.take_reset_cause(), 0);
    }

    #[test]
    fn unarmed_wakeup_pin_does_not_stop_boot() {
        let log = Log::new();
        let mut board = Board::new(&log, false, POR_CAUSE);
        board.wakeup = MockPin::new(
            &log,
            "wakeup",
            MockPinSetup {
                input_level: true,
                wakeup_line: false,
            },
        );

        assert_eq!(boot(&board), State::EnteringDeepSleep);
        assert!(!log
            .events()
            .iter()
            .any(|e| matches!(e, Event::PinWakeup(..))));
    }

    #[test]
    fn console_pins_released_before_retention_latches() {
        let log = Log::new();
        let board = Board::new(&log, false, POR_CAUSE);
        let console = Console::new(&log);

        assert_eq!(
            boot_with_client(&board, Some(&console)),
            State::EnteringDeepSleep
        );

        let events = log.events();
        assert_eq!(
            &events[events.len() - 5..],
            [
                Event::RegulatorMode(RegulatorMode::Bypass),
                Event::PinLowPower("console_tx"),
                Event::PinLowPower("console_enable"),
                Event::DeepSleepConfig(DeepSleepConfig {
                    pin_retention: PinRetention::Latch,
                }),
                Event::EnterDeepSleep,
            ]
        );
        assert_eq!(console.tx.configuration(), Configuration::LowPower);
        assert_eq!(console.enable.configuration(), Configuration::LowPower);
    }

    #[test]
    fn console_kept_after_em4_wakeup() {
        let log = Log::new();
        let board = Board::new(&log, false, EM4_CAUSE);
        let console = Console::new(&log);

        assert_eq!(
            boot_with_client(&board, Some(&console)),
            State::WokeFromDeepSleep
        );
        assert!(!log
            .events()
            .iter()
            .any(|e| matches!(e, Event::PinLowPower("console_tx" | "console_enable"))));
        assert_eq!(console.tx.configuration(), Configuration::Output);
    }
}
