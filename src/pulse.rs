//! Strobe pulse generation from two periodic hardware timers.
//!
//! The rate timer fires once per flash: it drives the strobe output active and
//! restarts the pulse-width timer from zero. The pulse-width timer runs with a
//! short fixed period and drives the output inactive when it fires. Both
//! callbacks run from interrupt context, independent of the control loop.
//!
//! If the rate period is shorter than the pulse width, the width timer is
//! restarted before it fires and consecutive pulses merge.

use crate::timer::{Prescaler, TimerConfig};
use core::cell::RefCell;
use critical_section::Mutex;

/// Trait for abstracting a periodic compare-match timer.
///
/// Implement this for each hardware timer driving the strobe. The timer fires
/// its interrupt every time the counter reaches `target` and then restarts
/// counting from zero.
pub trait PeriodicTimer {
    /// Loads the clock divider and count target. Does not start the timer.
    fn configure(&mut self, prescaler: Prescaler, target: u16);

    /// Starts counting.
    fn start(&mut self);

    /// Stops counting.
    fn stop(&mut self);

    /// Resets the counter to zero and discards any pending trigger.
    fn restart(&mut self);
}

/// Trait for abstracting the strobe output line.
pub trait StrobeOutput {
    /// Drives the strobe active (flash on) or inactive.
    ///
    /// Called from interrupt context. Handle any hardware errors internally -
    /// this method cannot fail.
    fn set_active(&mut self, active: bool);
}

/// Seam used by the control loop to reprogram the rate timer.
pub trait PulseControl {
    /// Applies a new rate timer configuration.
    fn reprogram(&mut self, config: TimerConfig);
}

/// Which timer fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseTrigger {
    /// Rate timer: begin a pulse.
    Rate,
    /// Pulse-width timer: end the pulse.
    Width,
}

/// Fixed pulse width as a divider and count on the pulse-width timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseWidth {
    pub prescaler: Prescaler,
    pub count: u16,
}

impl PulseWidth {
    /// 100 µs at 16 MHz: divisor 32 (8-bit timer select code 3), 50 counts.
    pub const DEFAULT: Self = PulseWidth::new(Prescaler::new(32, 0b011), 50);

    pub const fn new(prescaler: Prescaler, count: u16) -> Self {
        Self { prescaler, count }
    }

    /// Width in base clock ticks.
    pub fn ticks(&self) -> u32 {
        u32::from(self.prescaler.divisor) * u32::from(self.count)
    }
}

impl Default for PulseWidth {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Drives the strobe output from a rate timer and a pulse-width timer.
///
/// # Type Parameters
/// * `R` - Rate timer
/// * `W` - Pulse-width timer
/// * `O` - Strobe output line
pub struct PulseGenerator<R: PeriodicTimer, W: PeriodicTimer, O: StrobeOutput> {
    rate_timer: R,
    width_timer: W,
    output: O,
    config: Option<TimerConfig>,
    active: bool,
}

impl<R: PeriodicTimer, W: PeriodicTimer, O: StrobeOutput> PulseGenerator<R, W, O> {
    /// Creates a generator with the output inactive.
    ///
    /// The pulse-width timer is configured and started immediately. The rate
    /// timer stays stopped until the first [`PulseGenerator::program`].
    pub fn new(mut rate_timer: R, mut width_timer: W, mut output: O, width: PulseWidth) -> Self {
        output.set_active(false);

        rate_timer.stop();
        width_timer.stop();
        width_timer.configure(width.prescaler, width.count);
        width_timer.start();

        Self {
            rate_timer,
            width_timer,
            output,
            config: None,
            active: false,
        }
    }

    /// Loads a new rate configuration and (re)starts the rate timer.
    ///
    /// Must not be interleaved with [`PulseGenerator::on_trigger`]; use
    /// [`SharedPulseGenerator`] when the triggers run from interrupts.
    pub fn program(&mut self, config: TimerConfig) {
        self.rate_timer.stop();
        self.rate_timer
            .configure(config.prescaler, config.count_target);
        self.rate_timer.start();
        self.config = Some(config);
    }

    /// Handles a timer interrupt.
    pub fn on_trigger(&mut self, trigger: PulseTrigger) {
        match trigger {
            PulseTrigger::Rate => {
                self.width_timer.restart();
                self.output.set_active(true);
                self.active = true;
            }
            PulseTrigger::Width => {
                self.output.set_active(false);
                self.active = false;
            }
        }
    }

    /// Whether the output is currently driven active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Rate configuration currently loaded, if any.
    #[inline]
    pub fn config(&self) -> Option<TimerConfig> {
        self.config
    }

    /// Stops both timers, drives the output inactive and returns the hardware.
    pub fn release(mut self) -> (R, W, O) {
        self.rate_timer.stop();
        self.width_timer.stop();
        self.output.set_active(false);
        (self.rate_timer, self.width_timer, self.output)
    }
}

impl<R: PeriodicTimer, W: PeriodicTimer, O: StrobeOutput> PulseControl
    for PulseGenerator<R, W, O>
{
    fn reprogram(&mut self, config: TimerConfig) {
        self.program(config);
    }
}

/// A [`PulseGenerator`] shared between interrupt handlers and the control loop.
///
/// Meant to live in a `static`. Every access runs inside a critical section,
/// so a trigger never observes a half-applied configuration.
pub struct SharedPulseGenerator<R: PeriodicTimer, W: PeriodicTimer, O: StrobeOutput> {
    inner: Mutex<RefCell<Option<PulseGenerator<R, W, O>>>>,
}

impl<R: PeriodicTimer, W: PeriodicTimer, O: StrobeOutput> SharedPulseGenerator<R, W, O> {
    /// Creates an empty slot.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Installs the generator, returning any previously installed one.
    pub fn install(&self, generator: PulseGenerator<R, W, O>) -> Option<PulseGenerator<R, W, O>> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).replace(generator))
    }

    /// Removes the installed generator.
    pub fn take(&self) -> Option<PulseGenerator<R, W, O>> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).take())
    }

    /// Dispatches a timer interrupt. Does nothing before [`Self::install`].
    pub fn on_trigger(&self, trigger: PulseTrigger) {
        critical_section::with(|cs| {
            if let Some(generator) = self.inner.borrow_ref_mut(cs).as_mut() {
                generator.on_trigger(trigger);
            }
        });
    }

    /// Runs `f` with the installed generator inside a critical section.
    pub fn with<T>(&self, f: impl FnOnce(&mut PulseGenerator<R, W, O>) -> T) -> Option<T> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).as_mut().map(f))
    }
}

impl<R: PeriodicTimer, W: PeriodicTimer, O: StrobeOutput> Default for SharedPulseGenerator<R, W, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: PeriodicTimer, W: PeriodicTimer, O: StrobeOutput> PulseControl
    for &SharedPulseGenerator<R, W, O>
{
    fn reprogram(&mut self, config: TimerConfig) {
        if self.with(|generator| generator.program(config)).is_none() {
            warn!("reprogram before pulse generator installed");
        }
    }
}
