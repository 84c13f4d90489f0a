// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2023.

//! Recording HIL implementations for host tests.
//!
//! Every mock appends to a shared [`Log`], so a test can assert on the order
//! in which a capsule touched the hardware.

extern crate std;

use core::cell::{Cell, RefCell};
use std::vec::Vec;

use kernel::hil::clock::{ClockInterface, ClockOutput, Oscillator};
use kernel::hil::cpu::Breakpoint;
use kernel::hil::gpio::{
    Configuration, Configure, DeepSleepWakeup, FloatingState, Input, InputFilter, Output,
    WakeupLevel,
};
use kernel::hil::power::{DeepSleep, DeepSleepConfig, Regulator, RegulatorMode};
use kernel::hil::reset::{BootKind, Reset};
use kernel::hil::spi::SpiMaster;
use kernel::hil::time::BusyWait;
use kernel::ErrorCode;

pub const POR_CAUSE: u32 = 1 << 0;
pub const EM4_CAUSE: u32 = 1 << 2;

const RDSR: u8 = 0x05;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    ClockEnable(&'static str),
    ClockDisable(&'static str),
    PinSet(&'static str),
    PinClear(&'static str),
    PinToggle(&'static str),
    PinRead(&'static str),
    PinOutput(&'static str),
    PinInput(&'static str),
    PinLowPower(&'static str),
    PinFloating(&'static str, FloatingState),
    PinInputFilter(&'static str, bool),
    PinWakeup(&'static str, WakeupLevel),
    PinWakeupDisable(&'static str),
    OscillatorEnable,
    OscillatorDisable,
    OscillatorPoll(bool),
    ClockOutputSource(u8),
    ClockOutputRoute,
    ClockOutputUnroute,
    RegulatorInit,
    RegulatorMode(RegulatorMode),
    Unlatch,
    DeepSleepConfig(DeepSleepConfig),
    EnterDeepSleep,
    ResetCauseRead,
    ResetCauseClear,
    SpiInit,
    SpiDeinit,
    SpiRate(u32),
    SpiSelect,
    SpiDeselect,
    SpiByte(u8),
    Breakpoint,
    Delay(u32),
}

pub struct Log {
    events: RefCell<Vec<Event>>,
}

impl Log {
    pub fn new() -> Self {
        Log {
            events: RefCell::new(Vec::new()),
        }
    }

    fn push(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }
}

pub struct MockClock<'a> {
    log: &'a Log,
    name: &'static str,
    enabled: Cell<bool>,
}

impl<'a> MockClock<'a> {
    pub fn new(log: &'a Log, name: &'static str) -> Self {
        MockClock {
            log,
            name,
            enabled: Cell::new(false),
        }
    }
}

impl ClockInterface for MockClock<'_> {
    fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    fn enable(&self) {
        self.enabled.set(true);
        self.log.push(Event::ClockEnable(self.name));
    }

    fn disable(&self) {
        self.enabled.set(false);
        self.log.push(Event::ClockDisable(self.name));
    }
}

#[derive(Clone, Copy)]
pub struct MockPinSetup {
    /// Level seen by `read` while the pin is an input.
    pub input_level: bool,
    /// Whether the pin has a deep-sleep wakeup line.
    pub wakeup_line: bool,
}

impl Default for MockPinSetup {
    fn default() -> Self {
        MockPinSetup {
            input_level: true,
            wakeup_line: false,
        }
    }
}

pub struct MockPin<'a> {
    log: &'a Log,
    name: &'static str,
    setup: MockPinSetup,
    output_level: Cell<bool>,
    configuration: Cell<Configuration>,
    floating: Cell<FloatingState>,
}

impl<'a> MockPin<'a> {
    pub fn new(log: &'a Log, name: &'static str, setup: MockPinSetup) -> Self {
        MockPin {
            log,
            name,
            setup,
            output_level: Cell::new(false),
            configuration: Cell::new(Configuration::LowPower),
            floating: Cell::new(FloatingState::PullNone),
        }
    }

    pub fn is_output_low(&self) -> bool {
        self.configuration.get() == Configuration::Output && !self.output_level.get()
    }

    pub fn is_pulled_up(&self) -> bool {
        self.configuration.get() == Configuration::Input
            && self.floating.get() == FloatingState::PullUp
    }
}

impl Output for MockPin<'_> {
    fn set(&self) {
        self.output_level.set(true);
        self.log.push(Event::PinSet(self.name));
    }

    fn clear(&self) {
        self.output_level.set(false);
        self.log.push(Event::PinClear(self.name));
    }

    fn toggle(&self) -> bool {
        let level = !self.output_level.get();
        self.output_level.set(level);
        self.log.push(Event::PinToggle(self.name));
        level
    }
}

impl Input for MockPin<'_> {
    fn read(&self) -> bool {
        self.log.push(Event::PinRead(self.name));
        match self.configuration.get() {
            Configuration::Output => self.output_level.get(),
            _ => self.setup.input_level,
        }
    }
}

impl Configure for MockPin<'_> {
    fn configuration(&self) -> Configuration {
        self.configuration.get()
    }

    fn make_output(&self) -> Configuration {
        self.configuration.set(Configuration::Output);
        self.log.push(Event::PinOutput(self.name));
        Configuration::Output
    }

    fn make_input(&self) -> Configuration {
        self.configuration.set(Configuration::Input);
        self.log.push(Event::PinInput(self.name));
        Configuration::Input
    }

    fn deactivate_to_low_power(&self) {
        self.configuration.set(Configuration::LowPower);
        self.log.push(Event::PinLowPower(self.name));
    }

    fn set_floating_state(&self, state: FloatingState) {
        self.floating.set(state);
        self.log.push(Event::PinFloating(self.name, state));
    }

    fn floating_state(&self) -> FloatingState {
        self.floating.get()
    }
}

impl InputFilter for MockPin<'_> {
    fn set_input_filter(&self, enabled: bool) {
        self.log.push(Event::PinInputFilter(self.name, enabled));
    }
}

impl DeepSleepWakeup for MockPin<'_> {
    fn enable_deep_sleep_wakeup(&self, level: WakeupLevel) -> Result<(), ErrorCode> {
        if !self.setup.wakeup_line {
            return Err(ErrorCode::NOSUPPORT);
        }
        self.log.push(Event::PinWakeup(self.name, level));
        Ok(())
    }

    fn disable_deep_sleep_wakeup(&self) {
        self.log.push(Event::PinWakeupDisable(self.name));
    }
}

pub struct MockOscillator<'a> {
    log: &'a Log,
    enabled: Cell<bool>,
    polls_until_ready: Cell<u32>,
}

impl<'a> MockOscillator<'a> {
    pub fn new(log: &'a Log, polls_until_ready: u32) -> Self {
        MockOscillator {
            log,
            enabled: Cell::new(false),
            polls_until_ready: Cell::new(polls_until_ready),
        }
    }
}

impl Oscillator for MockOscillator<'_> {
    fn enable(&self) {
        self.enabled.set(true);
        self.log.push(Event::OscillatorEnable);
    }

    fn disable(&self) {
        self.enabled.set(false);
        self.log.push(Event::OscillatorDisable);
    }

    fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    fn is_ready(&self) -> bool {
        let remaining = self.polls_until_ready.get();
        let ready = self.enabled.get() && remaining == 0;
        if !ready {
            self.polls_until_ready.set(remaining.saturating_sub(1));
        }
        self.log.push(Event::OscillatorPoll(ready));
        ready
    }
}

pub struct MockClockOutput<'a> {
    log: &'a Log,
    source: Cell<Option<u8>>,
    routed: Cell<bool>,
}

impl<'a> MockClockOutput<'a> {
    pub fn new(log: &'a Log) -> Self {
        MockClockOutput {
            log,
            source: Cell::new(None),
            routed: Cell::new(false),
        }
    }
}

impl ClockOutput for MockClockOutput<'_> {
    type Source = u8;

    fn set_source(&self, source: u8) {
        self.source.set(Some(source));
        self.log.push(Event::ClockOutputSource(source));
    }

    fn source(&self) -> Option<u8> {
        self.source.get()
    }

    fn enable_route(&self) {
        self.routed.set(true);
        self.log.push(Event::ClockOutputRoute);
    }

    fn disable_route(&self) {
        self.routed.set(false);
        self.log.push(Event::ClockOutputUnroute);
    }

    fn is_routed(&self) -> bool {
        self.routed.get()
    }
}

pub struct MockRegulator<'a> {
    log: &'a Log,
    mode: Cell<RegulatorMode>,
}

impl<'a> MockRegulator<'a> {
    pub fn new(log: &'a Log) -> Self {
        MockRegulator {
            log,
            mode: Cell::new(RegulatorMode::Bypass),
        }
    }
}

impl Regulator for MockRegulator<'_> {
    fn init(&self) {
        self.mode.set(RegulatorMode::Regulation);
        self.log.push(Event::RegulatorInit);
    }

    fn set_mode(&self, mode: RegulatorMode) {
        self.mode.set(mode);
        self.log.push(Event::RegulatorMode(mode));
    }

    fn mode(&self) -> RegulatorMode {
        self.mode.get()
    }
}

/// Energy management unit: deep sleep entry and the reset cause register.
pub struct MockEmu<'a> {
    log: &'a Log,
    cause: Cell<u32>,
}

impl<'a> MockEmu<'a> {
    pub fn new(log: &'a Log, cause: u32) -> Self {
        MockEmu {
            log,
            cause: Cell::new(cause),
        }
    }
}

impl DeepSleep for MockEmu<'_> {
    fn unlatch_pin_retention(&self) {
        self.log.push(Event::Unlatch);
    }

    fn configure_deep_sleep(&self, config: DeepSleepConfig) {
        self.log.push(Event::DeepSleepConfig(config));
    }

    fn enter_deep_sleep(&self) {
        self.log.push(Event::EnterDeepSleep);
    }
}

impl Reset for MockEmu<'_> {
    type Cause = u32;

    fn reset_cause(&self) -> u32 {
        self.log.push(Event::ResetCauseRead);
        self.cause.get()
    }

    fn clear_reset_cause(&self) {
        self.cause.set(0);
        self.log.push(Event::ResetCauseClear);
    }

    fn boot_kind(&self, cause: u32) -> BootKind {
        if cause & EM4_CAUSE != 0 {
            BootKind::WokeFromDeepSleep
        } else {
            BootKind::NormalBoot
        }
    }
}

/// SPI bus with a flash on the other end that reports busy for a number of
/// status reads.
pub struct MockSpi<'a> {
    log: &'a Log,
    busy_polls: Cell<u32>,
    previous: Cell<Option<u8>>,
}

impl<'a> MockSpi<'a> {
    pub fn new(log: &'a Log, busy_polls: u32) -> Self {
        MockSpi {
            log,
            busy_polls: Cell::new(busy_polls),
            previous: Cell::new(None),
        }
    }
}

impl SpiMaster for MockSpi<'_> {
    fn init(&self) {
        self.log.push(Event::SpiInit);
    }

    fn deinit(&self) {
        self.log.push(Event::SpiDeinit);
    }

    fn set_rate(&self, rate: u32) -> Result<u32, ErrorCode> {
        self.log.push(Event::SpiRate(rate));
        Ok(rate)
    }

    fn select(&self) {
        self.previous.set(None);
        self.log.push(Event::SpiSelect);
    }

    fn deselect(&self) {
        self.log.push(Event::SpiDeselect);
    }

    fn read_write_byte(&self, val: u8) -> u8 {
        self.log.push(Event::SpiByte(val));
        let reply = match self.previous.get() {
            Some(RDSR) => {
                let busy = self.busy_polls.get();
                if busy > 0 {
                    self.busy_polls.set(busy - 1);
                    0x01
                } else {
                    0x00
                }
            }
            _ => 0xFF,
        };
        self.previous.set(Some(val));
        reply
    }
}

pub struct MockCpu<'a> {
    log: &'a Log,
}

impl<'a> MockCpu<'a> {
    pub fn new(log: &'a Log) -> Self {
        MockCpu { log }
    }
}

impl Breakpoint for MockCpu<'_> {
    fn breakpoint(&self) {
        self.log.push(Event::Breakpoint);
    }
}

pub struct MockDelay<'a> {
    log: &'a Log,
}

impl<'a> MockDelay<'a> {
    pub fn new(log: &'a Log) -> Self {
        MockDelay { log }
    }
}

impl BusyWait for MockDelay<'_> {
    fn busy_wait_us(&self, us: u32) {
        self.log.push(Event::Delay(us));
    }
}
