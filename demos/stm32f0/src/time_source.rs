use core::cell::Cell;
use critical_section::Mutex;
use strobe_core::{TimeDuration, TimeInstant, TimeSource};

/// Global millisecond counter incremented by SysTick interrupt
///
/// Wraps after ~49.7 days of continuous operation.
static MILLIS_COUNTER: Mutex<Cell<u32>> = Mutex::new(Cell::new(0));

/// Increments the global millisecond counter.
///
/// Call from the SysTick interrupt handler every 1ms.
pub fn tick() {
    critical_section::with(|cs| {
        let counter = MILLIS_COUNTER.borrow(cs);
        counter.set(counter.get().wrapping_add(1));
    });
}

/// Duration type using milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HalDuration(pub u64);

impl TimeDuration for HalDuration {
    const ZERO: Self = HalDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        HalDuration(millis)
    }
}

/// Milliseconds since startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HalInstant(u32);

impl TimeInstant for HalInstant {
    type Duration = HalDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        // Press timing survives a counter wrap
        HalDuration(u64::from(self.0.wrapping_sub(earlier.0)))
    }
}

/// Time source reading the SysTick millisecond counter
pub struct HalTimeSource;

impl HalTimeSource {
    pub fn new() -> Self {
        Self
    }
}

impl TimeSource<HalInstant> for HalTimeSource {
    fn now(&self) -> HalInstant {
        critical_section::with(|cs| HalInstant(MILLIS_COUNTER.borrow(cs).get()))
    }
}
