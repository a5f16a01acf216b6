//! Frequency to hardware counter mapping.
//!
//! Picks the smallest clock divider for which the count target of a 16-bit
//! compare-match counter fits, trading resolution for range only as far as
//! needed.

use crate::types::{Frequency, UNITS_PER_CENTIHERTZ};
use core::fmt::Write;
use heapless::String;

/// Capacity of [`TimerConfig::diagnostic_line`].
pub const DIAGNOSTIC_LINE_LEN: usize = 48;

/// Largest count target a 16-bit counter can hold.
pub const COUNTER_MAX: u64 = u16::MAX as u64;

/// Number of entries in a prescaler table.
pub const PRESCALER_COUNT: usize = 5;

/// A clock divider and the code that selects it in hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Prescaler {
    /// Factor the base tick rate is divided by.
    pub divisor: u16,

    /// Opaque hardware select value (clock-select bits, PSC register, ...).
    pub select: u16,
}

impl Prescaler {
    pub const fn new(divisor: u16, select: u16) -> Self {
        Self { divisor, select }
    }
}

/// Clock-select table of a classic AVR 16-bit timer, ascending by divisor.
pub const PRESCALERS: [Prescaler; PRESCALER_COUNT] = [
    Prescaler::new(1, 0b001),
    Prescaler::new(8, 0b010),
    Prescaler::new(64, 0b011),
    Prescaler::new(256, 0b100),
    Prescaler::new(1024, 0b101),
];

/// Result of [`program`]: what to load into the rate counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerConfig {
    pub prescaler: Prescaler,
    pub count_target: u16,

    /// `false` when even the largest divisor overflowed and the count target
    /// was truncated to 16 bits. The resulting rate is inaccurate.
    pub exact: bool,
}

impl TimerConfig {
    /// Counter period in base clock ticks.
    pub fn period_ticks(&self) -> u32 {
        u32::from(self.prescaler.divisor) * u32::from(self.count_target)
    }

    /// One line of diagnostic text, e.g. `prescaler=8 count=40000`.
    ///
    /// # Errors
    /// `fmt::Error` if the line exceeds [`DIAGNOSTIC_LINE_LEN`], which no
    /// 16-bit divisor and count can reach.
    pub fn diagnostic_line(&self) -> Result<String<DIAGNOSTIC_LINE_LEN>, core::fmt::Error> {
        let mut line = String::new();
        write!(line, "{}", self)?;
        Ok(line)
    }
}

impl core::fmt::Display for TimerConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "prescaler={} count={}",
            self.prescaler.divisor, self.count_target
        )?;
        if !self.exact {
            write!(f, " (overflow)")?;
        }
        Ok(())
    }
}

/// Computes the prescaler and count target for `frequency`.
///
/// Tries divisors in table order and returns the first whose count target
/// fits in 16 bits, rounded to the nearest count. If none fits, the last
/// (largest) divisor is used anyway and the count is truncated.
pub fn program(
    frequency: Frequency,
    tick_rate_hz: u32,
    prescalers: &[Prescaler; PRESCALER_COUNT],
) -> TimerConfig {
    for prescaler in prescalers {
        let count = count_target(frequency, tick_rate_hz, prescaler.divisor);
        if count <= COUNTER_MAX {
            return TimerConfig {
                prescaler: *prescaler,
                count_target: count as u16,
                exact: true,
            };
        }
    }

    let prescaler = prescalers[PRESCALER_COUNT - 1];
    let count = count_target(frequency, tick_rate_hz, prescaler.divisor);
    warn!("count target {} overflows 16 bits", count);

    TimerConfig {
        prescaler,
        count_target: count as u16,
        exact: false,
    }
}

/// `(tick_rate / divisor) / hertz`, rounded to nearest.
fn count_target(frequency: Frequency, tick_rate_hz: u32, divisor: u16) -> u64 {
    // hertz = raw / (100 * 60)
    let numerator = u128::from(tick_rate_hz) * 100 * u128::from(UNITS_PER_CENTIHERTZ);
    let denominator = u128::from(divisor.max(1)) * u128::from(frequency.raw());
    let rounded = (numerator + denominator / 2) / denominator;
    rounded.min(u128::from(u64::MAX)) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hertz_at_sixteen_megahertz_uses_divisor_256() {
        let config = program(Frequency::DEFAULT, 16_000_000, &PRESCALERS);
        assert_eq!(config.prescaler.divisor, 256);
        assert_eq!(config.count_target, 62_500);
        assert!(config.exact);
    }

    #[test]
    fn diagnostic_line_names_divisor_and_count() {
        let config = program(Frequency::DEFAULT, 16_000_000, &PRESCALERS);
        assert_eq!(
            config.diagnostic_line().as_deref(),
            Ok("prescaler=256 count=62500")
        );
    }

    #[test]
    fn longest_diagnostic_line_fits() {
        let config = TimerConfig {
            prescaler: Prescaler::new(u16::MAX, 0),
            count_target: u16::MAX,
            exact: false,
        };
        assert_eq!(
            config.diagnostic_line().as_deref(),
            Ok("prescaler=65535 count=65535 (overflow)")
        );
    }
}
