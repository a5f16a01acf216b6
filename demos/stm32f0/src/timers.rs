use stm32f0xx_hal::pac;
use strobe_core::timer::PRESCALER_COUNT;
use strobe_core::{PeriodicTimer, Prescaler};

/// Prescaler table for the general purpose timers. The select value is the
/// PSC register content, which divides by `PSC + 1`.
pub const STM32_PRESCALERS: [Prescaler; PRESCALER_COUNT] = [
    Prescaler::new(1, 0),
    Prescaler::new(8, 7),
    Prescaler::new(64, 63),
    Prescaler::new(256, 255),
    Prescaler::new(1024, 1023),
];

/// A general purpose timer used as a periodic interrupt source
///
/// Raises its update interrupt every `target` prescaled ticks while running.
pub struct UpdateTimer<TIM> {
    tim: TIM,
}

impl<TIM> UpdateTimer<TIM> {
    pub fn new(tim: TIM) -> Self {
        Self { tim }
    }
}

macro_rules! update_timers {
    ($($TIM:ident,)+) => {
        $(
            impl PeriodicTimer for UpdateTimer<pac::$TIM> {
                fn configure(&mut self, prescaler: Prescaler, target: u16) {
                    self.tim.psc.write(|w| w.psc().bits(prescaler.select));
                    self.tim.arr.write(|w| unsafe { w.bits(u32::from(target)) });
                    // Latch PSC/ARR without raising an interrupt
                    self.tim.cr1.modify(|_, w| w.urs().set_bit());
                    self.tim.egr.write(|w| w.ug().set_bit());
                    self.tim.sr.modify(|_, w| w.uif().clear_bit());
                }

                fn start(&mut self) {
                    self.tim.cnt.reset();
                    self.tim.dier.modify(|_, w| w.uie().set_bit());
                    self.tim.cr1.modify(|_, w| w.cen().set_bit());
                }

                fn stop(&mut self) {
                    self.tim.cr1.modify(|_, w| w.cen().clear_bit());
                    self.tim.dier.modify(|_, w| w.uie().clear_bit());
                    self.tim.sr.modify(|_, w| w.uif().clear_bit());
                }

                fn restart(&mut self) {
                    self.tim.cnt.reset();
                    self.tim.sr.modify(|_, w| w.uif().clear_bit());
                    self.tim.cr1.modify(|_, w| w.cen().set_bit());
                }
            }
        )+

        /// Acknowledges a pending update interrupt.
        ///
        /// Call first thing in the timer's interrupt handler.
        pub fn acknowledge(interrupt: pac::Interrupt) {
            match interrupt {
                $(
                    pac::Interrupt::$TIM => unsafe {
                        (*pac::$TIM::ptr()).sr.modify(|_, w| w.uif().clear_bit());
                    },
                )+
                _ => {}
            }
        }
    };
}

update_timers! {
    TIM2,
    TIM3,
}
