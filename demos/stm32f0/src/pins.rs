use core::convert::Infallible;
use embedded_hal::digital::v2::{InputPin as InputPinV2, OutputPin as OutputPinV2};
use strobe_core::StrobeOutput;

/// Wraps an `embedded-hal` 0.2 pin so it implements the 1.0 digital traits
pub struct Eh1Pin<P> {
    pin: P,
}

impl<P> Eh1Pin<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P> embedded_hal_1::digital::ErrorType for Eh1Pin<P> {
    type Error = Infallible;
}

impl<P: OutputPinV2<Error = Infallible>> embedded_hal_1::digital::OutputPin for Eh1Pin<P> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high()
    }
}

impl<P: InputPinV2<Error = Infallible>> embedded_hal_1::digital::InputPin for Eh1Pin<P> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_high()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_low()
    }
}

/// Strobe lamp driver on a plain GPIO
///
/// `active_high` selects which level fires the lamp.
pub struct StrobePin<P> {
    pin: P,
    active_high: bool,
}

impl<P: OutputPinV2<Error = Infallible>> StrobePin<P> {
    pub fn new(pin: P, active_high: bool) -> Self {
        Self { pin, active_high }
    }
}

impl<P: OutputPinV2<Error = Infallible>> StrobeOutput for StrobePin<P> {
    fn set_active(&mut self, active: bool) {
        let _ = if active == self.active_high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
    }
}

/// Busy-wait delay counting core cycles
pub struct CycleDelay {
    cycles_per_us: u32,
}

impl CycleDelay {
    pub fn new(sysclk_hz: u32) -> Self {
        Self {
            cycles_per_us: (sysclk_hz / 1_000_000).max(1),
        }
    }
}

impl embedded_hal_1::delay::DelayNs for CycleDelay {
    fn delay_ns(&mut self, ns: u32) {
        let us = ns.div_ceil(1_000);
        cortex_m::asm::delay(us.saturating_mul(self.cycles_per_us));
    }
}
