//! Tunable timing constants and the configuration bundle.

use crate::pulse::PulseWidth;
use crate::timer::{PRESCALERS, PRESCALER_COUNT, Prescaler};

/// Action cooldown after increase/decrease, in loop ticks.
pub const SHORT_COOLDOWN_TICKS: u16 = 40;

/// Action cooldown after halve/double/step/unit, in loop ticks.
pub const MEDIUM_COOLDOWN_TICKS: u16 = 100;

/// How long a step or unit display stays up, in loop ticks.
pub const TRANSIENT_HOLD_TICKS: u16 = 1000;

/// Loop ticks between scroll window advances.
pub const SCROLL_INTERVAL_TICKS: u16 = 250;

/// Presses held longer than this toggle the unit.
pub const LONG_PRESS_MS: u64 = 200;

/// Base clock of the rate timer.
pub const DEFAULT_TICK_RATE_HZ: u32 = 16_000_000;

/// Time each display digit stays lit per frame.
pub const DIGIT_HOLD_US: u32 = 1_000;

/// Analog button levels below this count as pressed (10-bit ADC).
pub const BUTTON_THRESHOLD: u16 = 512;

/// Configuration for a [`StrobeController`](crate::StrobeController).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StrobeConfig {
    pub short_cooldown: u16,
    pub medium_cooldown: u16,
    pub transient_hold: u16,
    pub scroll_interval: u16,
    pub long_press_ms: u64,
    pub tick_rate_hz: u32,
    pub prescalers: [Prescaler; PRESCALER_COUNT],
    pub pulse_width: PulseWidth,
    pub digit_hold_us: u32,
    pub button_threshold: u16,
}

impl StrobeConfig {
    pub const fn new() -> Self {
        Self {
            short_cooldown: SHORT_COOLDOWN_TICKS,
            medium_cooldown: MEDIUM_COOLDOWN_TICKS,
            transient_hold: TRANSIENT_HOLD_TICKS,
            scroll_interval: SCROLL_INTERVAL_TICKS,
            long_press_ms: LONG_PRESS_MS,
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
            prescalers: PRESCALERS,
            pulse_width: PulseWidth::DEFAULT,
            digit_hold_us: DIGIT_HOLD_US,
            button_threshold: BUTTON_THRESHOLD,
        }
    }

    /// Sets the base clock of the rate timer.
    pub const fn with_tick_rate(mut self, tick_rate_hz: u32) -> Self {
        self.tick_rate_hz = tick_rate_hz;
        self
    }

    /// Replaces the prescaler table. Entries must be ascending by divisor.
    pub const fn with_prescalers(mut self, prescalers: [Prescaler; PRESCALER_COUNT]) -> Self {
        self.prescalers = prescalers;
        self
    }

    pub const fn with_pulse_width(mut self, pulse_width: PulseWidth) -> Self {
        self.pulse_width = pulse_width;
        self
    }

    pub const fn with_long_press_ms(mut self, long_press_ms: u64) -> Self {
        self.long_press_ms = long_press_ms;
        self
    }

    pub const fn with_digit_hold_us(mut self, digit_hold_us: u32) -> Self {
        self.digit_hold_us = digit_hold_us;
        self
    }

    pub const fn with_button_threshold(mut self, button_threshold: u16) -> Self {
        self.button_threshold = button_threshold;
        self
    }
}

impl Default for StrobeConfig {
    fn default() -> Self {
        Self::new()
    }
}
