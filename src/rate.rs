//! Flash rate state adjusted by the buttons.

use crate::types::{DisplayUnit, Frequency, RateError, Step};

/// Current flash rate, adjustment step and display unit.
///
/// Frequency never drops below [`Frequency::MIN`]; every adjustment clamps
/// rather than wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RateModel {
    frequency: Frequency,
    step: Step,
    unit: DisplayUnit,
}

impl RateModel {
    /// Creates a rate model from already validated parts.
    pub const fn new(frequency: Frequency, step: Step, unit: DisplayUnit) -> Self {
        Self {
            frequency,
            step,
            unit,
        }
    }

    /// Creates a rate model from stored values, frequency in centihertz.
    pub fn from_stored(frequency: u64, step: u64, unit: u64) -> Result<Self, RateError> {
        if !Frequency::is_storable(frequency) {
            return Err(RateError::FrequencyOutOfRange(frequency));
        }
        let step = Step::new(step)?;
        let unit = DisplayUnit::from_code(unit).ok_or(RateError::UnknownUnit(unit))?;

        Ok(Self::new(Frequency::from_centihertz(frequency), step, unit))
    }

    #[inline]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    #[inline]
    pub fn step(&self) -> Step {
        self.step
    }

    #[inline]
    pub fn unit(&self) -> DisplayUnit {
        self.unit
    }

    /// Magnitude shown on the display, in hundredths of the current unit.
    pub fn displayed_value(&self) -> u64 {
        self.frequency.displayed(self.unit)
    }

    /// Adds one step, measured in the displayed unit.
    pub fn increase(&mut self) {
        self.frequency = self.frequency.saturating_add(self.step_units());
    }

    /// Subtracts one step, clamped to the minimum.
    pub fn decrease(&mut self) {
        self.frequency = self.frequency.saturating_sub(self.step_units());
    }

    pub fn halve(&mut self) {
        self.frequency = self.frequency.halved();
    }

    pub fn double(&mut self) {
        self.frequency = self.frequency.doubled();
    }

    /// Advances to the next step size and returns it.
    pub fn cycle_step(&mut self) -> Step {
        self.step = self.step.next();
        self.step
    }

    /// Switches display unit and returns the new one.
    ///
    /// Switching to cycles per second rounds the frequency to the nearest
    /// whole centihertz.
    pub fn toggle_unit(&mut self) -> DisplayUnit {
        self.unit = self.unit.toggled();
        if self.unit == DisplayUnit::CyclesPerSecond {
            self.frequency = self.frequency.rounded();
        }
        self.unit
    }

    fn step_units(&self) -> u64 {
        u64::from(self.step.value()).saturating_mul(self.unit.units_per_hundredth())
    }
}
