//! Shared test infrastructure for strobe-core integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use strobe_core::{
    ButtonState, MemoryStore, MemoryStoreError, PeriodicTimer, Prescaler, PulseControl,
    SettingsStore, Slot, StrobeOutput, TimeDuration, TimeInstant, TimeSource, TimerConfig,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given number of milliseconds
    pub fn advance(&self, millis: u64) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + millis));
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Timers and Strobe Output
// ============================================================================

/// Calls made on a mock timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Configure(Prescaler, u16),
    Start,
    Stop,
    Restart,
}

/// Mock periodic timer that records every call into a shared log
#[derive(Clone, Default)]
pub struct MockTimer {
    events: Rc<RefCell<Vec<TimerEvent>>>,
}

impl MockTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TimerEvent> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl PeriodicTimer for MockTimer {
    fn configure(&mut self, prescaler: Prescaler, target: u16) {
        self.events
            .borrow_mut()
            .push(TimerEvent::Configure(prescaler, target));
    }

    fn start(&mut self) {
        self.events.borrow_mut().push(TimerEvent::Start);
    }

    fn stop(&mut self) {
        self.events.borrow_mut().push(TimerEvent::Stop);
    }

    fn restart(&mut self) {
        self.events.borrow_mut().push(TimerEvent::Restart);
    }
}

/// Mock strobe output that records every level change
#[derive(Clone, Default)]
pub struct MockOutput {
    levels: Rc<RefCell<Vec<bool>>>,
}

impl MockOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn levels(&self) -> Vec<bool> {
        self.levels.borrow().clone()
    }

    pub fn is_active(&self) -> bool {
        self.levels.borrow().last().copied().unwrap_or(false)
    }
}

impl StrobeOutput for MockOutput {
    fn set_active(&mut self, active: bool) {
        self.levels.borrow_mut().push(active);
    }
}

/// Mock pulse control that records every reprogram request
#[derive(Default)]
pub struct MockPulse {
    pub configs: Vec<TimerConfig>,
}

impl MockPulse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<TimerConfig> {
        self.configs.last().copied()
    }
}

impl PulseControl for MockPulse {
    fn reprogram(&mut self, config: TimerConfig) {
        self.configs.push(config);
    }
}

// ============================================================================
// Mock Settings Store
// ============================================================================

/// Settings store that records every write and can be made to fail
#[derive(Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    pub writes: Vec<(Slot, u64)>,
    pub fail_writes: bool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the given raw slot values
    pub fn with(frequency: u64, step: u64, unit: u64) -> Self {
        let mut store = Self::new();
        store.inner.write(Slot::Frequency, frequency).unwrap();
        store.inner.write(Slot::Step, step).unwrap();
        store.inner.write(Slot::Unit, unit).unwrap();
        store
    }

    pub fn written_slots(&self) -> Vec<Slot> {
        self.writes.iter().map(|(slot, _)| *slot).collect()
    }
}

impl SettingsStore for RecordingStore {
    type Error = MemoryStoreError;

    fn read(&mut self, slot: Slot) -> Result<u64, Self::Error> {
        self.inner.read(slot)
    }

    fn write(&mut self, slot: Slot, value: u64) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(MemoryStoreError::Full);
        }
        self.writes.push((slot, value));
        self.inner.write(slot, value)
    }
}

// ============================================================================
// Mock Pins and Delay
// ============================================================================

/// Mock pin sharing one log of `(pin id, level)` writes with its siblings
#[derive(Clone)]
pub struct RecordingPin {
    id: usize,
    log: Rc<RefCell<Vec<(usize, bool)>>>,
    input_low: Rc<Cell<bool>>,
}

impl RecordingPin {
    pub fn new(id: usize, log: &Rc<RefCell<Vec<(usize, bool)>>>) -> Self {
        Self {
            id,
            log: Rc::clone(log),
            input_low: Rc::new(Cell::new(false)),
        }
    }

    /// Sets the level the pin reads as an input
    pub fn set_input_low(&self, low: bool) {
        self.input_low.set(low);
    }
}

impl embedded_hal::digital::ErrorType for RecordingPin {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push((self.id, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push((self.id, true));
        Ok(())
    }
}

impl embedded_hal::digital::InputPin for RecordingPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.input_low.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.input_low.get())
    }
}

/// Delay that only accumulates the requested time
#[derive(Clone, Default)]
pub struct RecordingDelay {
    pub total_ns: Rc<Cell<u64>>,
}

impl embedded_hal::delay::DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns.set(self.total_ns.get() + u64::from(ns));
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Button state with nothing pressed
pub const RELEASED: ButtonState = ButtonState::RELEASED;
