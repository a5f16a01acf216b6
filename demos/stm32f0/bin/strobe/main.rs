#![no_std]
#![no_main]

use cortex_m_rt::entry;
use panic_halt as _;
use rtt_target::{rprintln, rtt_init_print};
use stm32f0xx_hal::pac::{self, interrupt};

use stm32f0_examples::time_source::HalTimeSource;
use stm32f0_examples::timers::{self, STM32_PRESCALERS};

use strobe_core::{
    MemoryStore, Prescaler, PulseTrigger, PulseWidth, StrobeConfig, StrobeController,
};

mod hardware_setup;

use hardware_setup::PULSE;

/// 100 us pulses from the 8 MHz timer clock
const PULSE_WIDTH: PulseWidth = PulseWidth::new(Prescaler::new(16, 15), 50);

/// SysTick interrupt handler - called every 1ms
#[cortex_m_rt::exception]
fn SysTick() {
    stm32f0_examples::time_source::tick();
}

/// Rate timer: start a flash
#[interrupt]
fn TIM2() {
    timers::acknowledge(pac::Interrupt::TIM2);
    PULSE.on_trigger(PulseTrigger::Rate);
}

/// Width timer: end the flash
#[interrupt]
fn TIM3() {
    timers::acknowledge(pac::Interrupt::TIM3);
    PULSE.on_trigger(PulseTrigger::Width);
}

#[entry]
fn main() -> ! {
    rtt_init_print!();
    rprintln!("=== Strobe Example ===");
    rprintln!("Starting initialization...");

    let config = StrobeConfig::new()
        .with_prescalers(STM32_PRESCALERS)
        .with_pulse_width(PULSE_WIDTH);

    let mut hw = hardware_setup::init_hardware(&config);
    let config = config.with_tick_rate(hw.timer_clock_hz);
    rprintln!("Hardware initialized successfully");

    let time_source = HalTimeSource::new();

    // No EEPROM on this board; settings last until reset
    let mut controller = StrobeController::new(MemoryStore::new(), &time_source, config);
    controller.start(&mut &PULSE);
    rprintln!("Flashing: {}", controller.timer_config());

    rprintln!("=== System Ready ===");
    rprintln!("PC0 +step  PC1 -step  PC2 halve  PC3 double  PC4 step (hold: unit)");

    let mut last_config = controller.timer_config();
    loop {
        let buttons = match hw.buttons.sample() {
            Ok(buttons) => buttons,
            Err(never) => match never {},
        };

        let frame = controller.tick(&buttons, &mut &PULSE);
        if controller.timer_config() != last_config {
            last_config = controller.timer_config();
            rprintln!("{}", last_config);
        }

        let _ = hw.display.show(&frame);
    }
}
