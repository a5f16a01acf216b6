#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`RateModel`**: Target flash rate, step increment and display unit
//! - **`Frequency`**: Fixed-point flash rate (1/60 centihertz resolution)
//! - **`program`**: Maps a frequency onto a prescaler and 16-bit count target
//! - **`PulseGenerator`**: Rate and pulse-width timers producing fixed-width strobe pulses
//! - **`SharedPulseGenerator`**: Interrupt-safe wrapper for use from timer interrupt handlers
//! - **`InputController`**: Priority-ordered button handling with short/long press discrimination
//! - **`DisplayEngine`**: Digit decomposition and scroll window for a four-digit display
//! - **`Multiplexer`**: Drives a time-multiplexed seven-segment display from `embedded-hal` pins
//! - **`SettingsStore`**: Trait to implement for your persistent storage
//! - **`StrobeController`**: One control-loop iteration tying all of the above together
//!
//! Hardware is reached only through traits (`PeriodicTimer`, `StrobeOutput`,
//! `SettingsStore`, `ByteStorage`, `TimeSource` and the `embedded-hal` pin and
//! delay traits), so the whole control core can be exercised on a host.

#[macro_use]
mod log;

pub mod time;
pub mod types;
pub mod rate;
pub mod timer;
pub mod pulse;
pub mod cooldown;
pub mod input;
pub mod display;
pub mod persist;
pub mod config;
pub mod controller;

pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use types::{DisplayUnit, Frequency, RateError, Step};
pub use rate::RateModel;
pub use timer::{PRESCALERS, Prescaler, TimerConfig, program};
pub use pulse::{
    PeriodicTimer, PulseControl, PulseGenerator, PulseTrigger, PulseWidth, SharedPulseGenerator,
    StrobeOutput,
};
pub use cooldown::{Cooldown, Cooldowns};
pub use input::{Button, ButtonPins, ButtonState, Buttons, InputAction, InputController};
pub use display::{Cell, DigitBuffer, DigitPins, DisplayEngine, Frame, Glyph, Multiplexer, SegmentPins, decompose};
pub use persist::{ByteStorage, EepromStore, MemoryStore, MemoryStoreError, SettingsStore, Slot, load_rate, save_rate};
pub use config::StrobeConfig;
pub use controller::StrobeController;
