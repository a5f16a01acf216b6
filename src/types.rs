//! Core value types for the rate model.

/// Internal frequency units per centihertz.
///
/// One unit is a hundredth of a cycle per minute, so adjustments made while
/// the display shows cycles per minute stay exact.
pub const UNITS_PER_CENTIHERTZ: u64 = 60;

/// Largest frequency accepted from persistent storage, in centihertz.
pub const MAX_STORED_CENTIHERTZ: u64 = 10_000_000;

/// Flash rate in fixed point.
///
/// Stored in 1/60 centihertz and never below one centihertz. All arithmetic
/// saturates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frequency(u64);

impl Frequency {
    /// One hundredth of a hertz.
    pub const MIN: Self = Frequency(UNITS_PER_CENTIHERTZ);

    /// 1.00 Hz, used when storage holds nothing valid.
    pub const DEFAULT: Self = Frequency(100 * UNITS_PER_CENTIHERTZ);

    /// Creates a frequency from centihertz, clamped to [`Frequency::MIN`].
    pub const fn from_centihertz(centihertz: u64) -> Self {
        Self::from_raw(centihertz.saturating_mul(UNITS_PER_CENTIHERTZ))
    }

    /// Creates a frequency from internal units, clamped to [`Frequency::MIN`].
    pub const fn from_raw(raw: u64) -> Self {
        if raw < UNITS_PER_CENTIHERTZ {
            Self::MIN
        } else {
            Frequency(raw)
        }
    }

    /// Returns the value in internal units (1/60 centihertz).
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Returns the value in whole centihertz, truncating.
    #[inline]
    pub const fn centihertz(self) -> u64 {
        self.0 / UNITS_PER_CENTIHERTZ
    }

    /// Returns the displayed magnitude in hundredths of `unit`, truncating.
    pub const fn displayed(self, unit: DisplayUnit) -> u64 {
        self.0.saturating_mul(unit.scalar()) / UNITS_PER_CENTIHERTZ
    }

    /// Whether a stored centihertz value lies in the range accepted at boot.
    pub const fn is_storable(centihertz: u64) -> bool {
        centihertz >= 1 && centihertz <= MAX_STORED_CENTIHERTZ
    }

    /// Rounds to the nearest whole centihertz, halves away from zero.
    pub const fn rounded(self) -> Self {
        let whole = self.0.saturating_add(UNITS_PER_CENTIHERTZ / 2) / UNITS_PER_CENTIHERTZ;
        Self::from_centihertz(whole)
    }

    pub(crate) const fn saturating_add(self, raw: u64) -> Self {
        Self::from_raw(self.0.saturating_add(raw))
    }

    pub(crate) const fn saturating_sub(self, raw: u64) -> Self {
        Self::from_raw(self.0.saturating_sub(raw))
    }

    pub(crate) const fn halved(self) -> Self {
        Self::from_raw(self.0 / 2)
    }

    pub(crate) const fn doubled(self) -> Self {
        Self::from_raw(self.0.saturating_mul(2))
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Unit the display shows the frequency in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayUnit {
    /// Hertz.
    #[default]
    CyclesPerSecond,

    /// Revolutions (flashes) per minute.
    CyclesPerMinute,
}

impl DisplayUnit {
    /// Multiplier from hertz to this unit.
    #[inline]
    pub const fn scalar(self) -> u64 {
        match self {
            DisplayUnit::CyclesPerSecond => 1,
            DisplayUnit::CyclesPerMinute => 60,
        }
    }

    /// Code written to persistent storage (equal to the scalar).
    #[inline]
    pub const fn code(self) -> u64 {
        self.scalar()
    }

    /// Parses a stored unit code.
    pub const fn from_code(code: u64) -> Option<Self> {
        match code {
            1 => Some(DisplayUnit::CyclesPerSecond),
            60 => Some(DisplayUnit::CyclesPerMinute),
            _ => None,
        }
    }

    /// Returns the other unit.
    pub const fn toggled(self) -> Self {
        match self {
            DisplayUnit::CyclesPerSecond => DisplayUnit::CyclesPerMinute,
            DisplayUnit::CyclesPerMinute => DisplayUnit::CyclesPerSecond,
        }
    }

    /// Internal frequency units covered by one displayed hundredth.
    #[inline]
    pub(crate) const fn units_per_hundredth(self) -> u64 {
        UNITS_PER_CENTIHERTZ / self.scalar()
    }
}

/// Adjustment increment in hundredths of the displayed unit.
///
/// Always a power of ten between [`Step::MIN`] and [`Step::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step(u32);

impl Step {
    /// 0.01 of the displayed unit.
    pub const MIN: Self = Step(1);

    /// 100000.00 of the displayed unit.
    pub const MAX: Self = Step(10_000_000);

    /// Creates a step, validating range and power of ten.
    pub fn new(value: u64) -> Result<Self, RateError> {
        if value < Self::MIN.0 as u64 || value > Self::MAX.0 as u64 {
            return Err(RateError::InvalidStep(value));
        }

        let mut rest = value;
        while rest % 10 == 0 {
            rest /= 10;
        }
        if rest != 1 {
            return Err(RateError::InvalidStep(value));
        }

        Ok(Step(value as u32))
    }

    /// Returns the increment in hundredths of the displayed unit.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Next step in the cycle 1, 10, ..., 10_000_000, 1.
    ///
    /// 10_000_000 is itself a reachable step; only the step after it wraps.
    pub const fn next(self) -> Self {
        if self.0 >= Self::MAX.0 {
            Self::MIN
        } else {
            Step(self.0 * 10)
        }
    }
}

impl Default for Step {
    fn default() -> Self {
        Self::MIN
    }
}

/// Validation errors for rate model values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RateError {
    /// Frequency outside the storable range.
    FrequencyOutOfRange(u64),

    /// Step not a power of ten in range.
    InvalidStep(u64),

    /// Unit code is neither cycles per second nor cycles per minute.
    UnknownUnit(u64),
}

impl core::fmt::Display for RateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RateError::FrequencyOutOfRange(centihertz) => {
                write!(
                    f,
                    "frequency {} cHz outside 1..={} cHz",
                    centihertz, MAX_STORED_CENTIHERTZ
                )
            }
            RateError::InvalidStep(step) => {
                write!(f, "step {} is not a power of ten in 1..=10000000", step)
            }
            RateError::UnknownUnit(code) => {
                write!(f, "unknown display unit code {}", code)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RateError {}
