use cortex_m::peripheral::{NVIC, SYST};
use rtt_target::rprintln;
use stm32f0xx_hal::{
    gpio::{gpioa, Input, Output, Pin, PullUp, PushPull},
    pac,
    prelude::*,
};

use stm32f0_examples::pins::{CycleDelay, Eh1Pin, StrobePin};
use stm32f0_examples::timers::UpdateTimer;

use strobe_core::{
    ButtonPins, DigitPins, Multiplexer, PulseGenerator, SegmentPins, SharedPulseGenerator,
    StrobeConfig,
};

/// Type alias for display and button pins
pub type OutPin = Eh1Pin<Pin<Output<PushPull>>>;
pub type InPin = Eh1Pin<Pin<Input<PullUp>>>;

/// Strobe lamp on PA5 (onboard LED)
pub type Lamp = StrobePin<gpioa::PA5<Output<PushPull>>>;

pub type Display = Multiplexer<OutPin, CycleDelay>;

pub type Pulse = SharedPulseGenerator<UpdateTimer<pac::TIM2>, UpdateTimer<pac::TIM3>, Lamp>;

/// Pulse generator shared with the TIM2 (rate) and TIM3 (width) interrupts
pub static PULSE: Pulse = SharedPulseGenerator::new();

/// Container for all initialized hardware peripherals
pub struct HardwareContext {
    pub buttons: ButtonPins<InPin>,
    pub display: Display,
    pub timer_clock_hz: u32,
}

/// Initialize all hardware peripherals
///
/// - System clock configuration (8 MHz HSI)
/// - SysTick timer setup (1ms interrupts)
/// - TIM2/TIM3 pulse generator, installed into [`PULSE`]
/// - Display segment and digit pins on port B
/// - Buttons on PC0-PC4 with pull-ups
///
/// # Arguments
/// * `config` - Strobe configuration providing the pulse width
pub fn init_hardware(config: &StrobeConfig) -> HardwareContext {
    let mut dp = pac::Peripherals::take().unwrap();
    let mut cp = cortex_m::Peripherals::take().unwrap();

    dp.RCC
        .apb1enr
        .modify(|_, w| w.tim2en().set_bit().tim3en().set_bit());

    let mut rcc = configure_clock(&mut dp.FLASH, dp.RCC);
    configure_systick(&rcc, &mut cp.SYST);

    let gpioa = dp.GPIOA.split(&mut rcc);
    let gpiob = dp.GPIOB.split(&mut rcc);
    let gpioc = dp.GPIOC.split(&mut rcc);

    let lamp = cortex_m::interrupt::free(|cs| gpioa.pa5.into_push_pull_output(cs));
    setup_pulse_generator(dp.TIM2, dp.TIM3, StrobePin::new(lamp, true), config);

    let (segments, digits) = cortex_m::interrupt::free(|cs| {
        let out = |pin: Pin<Output<PushPull>>| Eh1Pin::new(pin);
        let segments = SegmentPins {
            a: out(gpiob.pb0.into_push_pull_output(cs).downgrade()),
            b: out(gpiob.pb1.into_push_pull_output(cs).downgrade()),
            c: out(gpiob.pb2.into_push_pull_output(cs).downgrade()),
            d: out(gpiob.pb3.into_push_pull_output(cs).downgrade()),
            e: out(gpiob.pb4.into_push_pull_output(cs).downgrade()),
            f: out(gpiob.pb5.into_push_pull_output(cs).downgrade()),
            g: out(gpiob.pb6.into_push_pull_output(cs).downgrade()),
            dp: out(gpiob.pb7.into_push_pull_output(cs).downgrade()),
        };
        let digits = DigitPins {
            d1: out(gpiob.pb8.into_push_pull_output(cs).downgrade()),
            d2: out(gpiob.pb9.into_push_pull_output(cs).downgrade()),
            d3: out(gpiob.pb10.into_push_pull_output(cs).downgrade()),
            d4: out(gpiob.pb11.into_push_pull_output(cs).downgrade()),
        };
        (segments, digits)
    });

    let delay = CycleDelay::new(rcc.clocks.sysclk().0);
    let display = match Multiplexer::new(segments, digits, delay, config.digit_hold_us, false) {
        Ok(display) => display,
        Err(never) => match never {},
    };
    rprintln!("Display configured on PB0-PB11 (common cathode)");

    let buttons = cortex_m::interrupt::free(|cs| ButtonPins {
        increase: Eh1Pin::new(gpioc.pc0.into_pull_up_input(cs).downgrade()),
        decrease: Eh1Pin::new(gpioc.pc1.into_pull_up_input(cs).downgrade()),
        halve: Eh1Pin::new(gpioc.pc2.into_pull_up_input(cs).downgrade()),
        double: Eh1Pin::new(gpioc.pc3.into_pull_up_input(cs).downgrade()),
        step_unit: Eh1Pin::new(gpioc.pc4.into_pull_up_input(cs).downgrade()),
    });
    rprintln!("Buttons configured on PC0-PC4");

    HardwareContext {
        buttons,
        display,
        timer_clock_hz: rcc.clocks.pclk().0,
    }
}

/// Configure the system clock
///
/// # Returns
/// The configured RCC (Reset and Clock Control) peripheral
fn configure_clock(flash: &mut pac::FLASH, rcc: pac::RCC) -> stm32f0xx_hal::rcc::Rcc {
    let rcc = rcc.configure().freeze(flash);

    let sysclk_freq = rcc.clocks.sysclk();
    rprintln!("System clock configured: {} Hz", sysclk_freq.0);

    rcc
}

/// Configure SysTick timer for 1ms interrupts
///
/// The SysTick interrupt handler increments a global millisecond counter
/// used for press timing.
fn configure_systick(rcc: &stm32f0xx_hal::rcc::Rcc, syst: &mut SYST) {
    let sysclk_freq = rcc.clocks.sysclk();

    syst.set_clock_source(cortex_m::peripheral::syst::SystClkSource::Core);
    syst.set_reload((sysclk_freq.0 / 1_000) - 1);
    syst.clear_current();
    syst.enable_counter();
    syst.enable_interrupt();

    rprintln!("SysTick configured for 1ms interrupts");
}

/// Install the pulse generator and unmask its timer interrupts
///
/// TIM2 paces the flashes, TIM3 ends each pulse.
fn setup_pulse_generator(tim2: pac::TIM2, tim3: pac::TIM3, lamp: Lamp, config: &StrobeConfig) {
    let generator = PulseGenerator::new(
        UpdateTimer::new(tim2),
        UpdateTimer::new(tim3),
        lamp,
        config.pulse_width,
    );
    PULSE.install(generator);

    unsafe {
        NVIC::unmask(pac::Interrupt::TIM2);
        NVIC::unmask(pac::Interrupt::TIM3);
    }

    rprintln!("Pulse generator configured on TIM2/TIM3, lamp on PA5");
}
