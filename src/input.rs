//! Button sampling and action resolution.
//!
//! Buttons are evaluated in a fixed priority order (increase, decrease, halve,
//! double, step/unit) and only the first pressed one acts. The step/unit button
//! is timed: a short press cycles the step size, a long press toggles the
//! display unit. Timing is a non-blocking state machine evaluated once per
//! loop tick, so the display keeps refreshing while the button is held.

use crate::config::StrobeConfig;
use crate::cooldown::Cooldowns;
use crate::rate::RateModel;
use crate::time::{TimeDuration, TimeInstant};
use crate::types::{DisplayUnit, Step};
use embedded_hal::digital::InputPin;

/// The five front-panel buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Increase,
    Decrease,
    Halve,
    Double,
    StepUnit,
}

impl Button {
    /// All buttons, highest priority first.
    pub const PRIORITY: [Button; 5] = [
        Button::Increase,
        Button::Decrease,
        Button::Halve,
        Button::Double,
        Button::StepUnit,
    ];
}

/// One value per button, with named fields.
///
/// Used both for pin configuration ([`ButtonPins`]) and sampled state
/// ([`ButtonState`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Buttons<T> {
    pub increase: T,
    pub decrease: T,
    pub halve: T,
    pub double: T,
    pub step_unit: T,
}

impl<T> Buttons<T> {
    pub fn get(&self, button: Button) -> &T {
        match button {
            Button::Increase => &self.increase,
            Button::Decrease => &self.decrease,
            Button::Halve => &self.halve,
            Button::Double => &self.double,
            Button::StepUnit => &self.step_unit,
        }
    }

    /// Values in priority order.
    pub fn as_array(&self) -> [&T; 5] {
        [
            &self.increase,
            &self.decrease,
            &self.halve,
            &self.double,
            &self.step_unit,
        ]
    }

    /// Mutable values in priority order.
    pub fn as_mut_array(&mut self) -> [&mut T; 5] {
        [
            &mut self.increase,
            &mut self.decrease,
            &mut self.halve,
            &mut self.double,
            &mut self.step_unit,
        ]
    }
}

/// Which buttons are held during one loop tick.
pub type ButtonState = Buttons<bool>;

/// Button input pins, active low with pull-ups.
pub type ButtonPins<P> = Buttons<P>;

impl ButtonState {
    /// No button pressed.
    pub const RELEASED: Self = Buttons {
        increase: false,
        decrease: false,
        halve: false,
        double: false,
        step_unit: false,
    };

    /// State with exactly `button` pressed.
    pub fn only(button: Button) -> Self {
        let mut state = Self::RELEASED;
        state.set(button, true);
        state
    }

    pub fn set(&mut self, button: Button, pressed: bool) {
        let slot = match button {
            Button::Increase => &mut self.increase,
            Button::Decrease => &mut self.decrease,
            Button::Halve => &mut self.halve,
            Button::Double => &mut self.double,
            Button::StepUnit => &mut self.step_unit,
        };
        *slot = pressed;
    }

    /// Builds state from analog levels in priority order.
    ///
    /// A button counts as pressed when its level is below `threshold`.
    pub fn from_levels(levels: [u16; 5], threshold: u16) -> Self {
        let mut state = Self::RELEASED;
        for (slot, level) in state.as_mut_array().into_iter().zip(levels) {
            *slot = level < threshold;
        }
        state
    }

    #[inline]
    pub fn is_pressed(&self, button: Button) -> bool {
        *self.get(button)
    }

    /// Highest-priority pressed button.
    pub fn first_pressed(&self) -> Option<Button> {
        Button::PRIORITY
            .into_iter()
            .find(|button| self.is_pressed(*button))
    }
}

impl<P: InputPin> Buttons<P> {
    /// Samples all five pins. A low level means pressed.
    pub fn sample(&mut self) -> Result<ButtonState, P::Error> {
        Ok(Buttons {
            increase: self.increase.is_low()?,
            decrease: self.decrease.is_low()?,
            halve: self.halve.is_low()?,
            double: self.double.is_low()?,
            step_unit: self.step_unit.is_low()?,
        })
    }
}

/// What a resolved button action did to the rate model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputAction {
    Increased,
    Decreased,
    Halved,
    Doubled,
    /// Short step/unit press: new step size.
    StepCycled(Step),
    /// Long step/unit press: new display unit.
    UnitToggled(DisplayUnit),
}

impl InputAction {
    /// Whether the action changed the display unit.
    pub fn changes_unit(&self) -> bool {
        matches!(self, InputAction::UnitToggled(_))
    }
}

/// Press timing for the step/unit button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressTracker<I> {
    Idle,
    Held {
        since: I,
    },
}

/// Resolves button presses into rate model changes.
pub struct InputController<I: TimeInstant> {
    tracker: PressTracker<I>,
}

impl<I: TimeInstant> InputController<I> {
    pub const fn new() -> Self {
        Self {
            tracker: PressTracker::Idle,
        }
    }

    /// Whether the step/unit button is currently being timed.
    pub fn is_timing_press(&self) -> bool {
        matches!(self.tracker, PressTracker::Held { .. })
    }

    /// Evaluates one loop tick of button state.
    ///
    /// Does nothing while the action cooldown runs. Otherwise acts on the
    /// highest-priority pressed button, arms the matching cooldowns and
    /// returns what changed. While the step/unit button is held no other
    /// button is resolved; its action fires on release.
    pub fn update(
        &mut self,
        buttons: &ButtonState,
        now: I,
        rate: &mut RateModel,
        cooldowns: &mut Cooldowns,
        config: &StrobeConfig,
    ) -> Option<InputAction> {
        if !cooldowns.action.is_ready() {
            return None;
        }

        if let PressTracker::Held { since } = self.tracker {
            if buttons.step_unit {
                return None;
            }
            self.tracker = PressTracker::Idle;

            let held = now.duration_since(since);
            let long_press = held.as_millis() > config.long_press_ms;
            debug!("step/unit released after {} ms", held.as_millis());

            let action = if long_press {
                InputAction::UnitToggled(rate.toggle_unit())
            } else {
                InputAction::StepCycled(rate.cycle_step())
            };
            cooldowns.action.arm(config.medium_cooldown);
            cooldowns.transient.arm(config.transient_hold);
            return Some(action);
        }

        let action = match buttons.first_pressed()? {
            Button::Increase => {
                rate.increase();
                cooldowns.action.arm(config.short_cooldown);
                InputAction::Increased
            }
            Button::Decrease => {
                rate.decrease();
                cooldowns.action.arm(config.short_cooldown);
                InputAction::Decreased
            }
            Button::Halve => {
                rate.halve();
                cooldowns.action.arm(config.medium_cooldown);
                InputAction::Halved
            }
            Button::Double => {
                rate.double();
                cooldowns.action.arm(config.medium_cooldown);
                InputAction::Doubled
            }
            Button::StepUnit => {
                self.tracker = PressTracker::Held { since: now };
                return None;
            }
        };
        cooldowns.transient.clear();

        Some(action)
    }
}

impl<I: TimeInstant> Default for InputController<I> {
    fn default() -> Self {
        Self::new()
    }
}
