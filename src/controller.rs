//! The strobe control loop.
//!
//! Provides [`StrobeController`], which runs one iteration of the
//! single-threaded control loop per call to [`StrobeController::tick`]:
//! cooldowns, button resolution, persistence, timer reprogramming and the
//! display render tick. Pulse generation itself runs from timer interrupts
//! and is only touched through [`PulseControl::reprogram`].

use crate::config::StrobeConfig;
use crate::cooldown::Cooldowns;
use crate::display::{DisplayEngine, Frame};
use crate::input::{ButtonState, InputAction, InputController};
use crate::persist::{SettingsStore, load_rate, save_rate};
use crate::pulse::PulseControl;
use crate::rate::RateModel;
use crate::time::{TimeInstant, TimeSource};
use crate::timer::{TimerConfig, program};

/// Owns the rate model and drives input, display and persistence.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `T` - Time source implementation type
/// * `S` - Settings store
pub struct StrobeController<'t, I: TimeInstant, T: TimeSource<I>, S: SettingsStore> {
    rate: RateModel,
    input: InputController<I>,
    display: DisplayEngine,
    cooldowns: Cooldowns,
    store: S,
    time_source: &'t T,
    config: StrobeConfig,
    timer_config: TimerConfig,
}

impl<'t, I: TimeInstant, T: TimeSource<I>, S: SettingsStore> StrobeController<'t, I, T, S> {
    /// Loads settings from `store` and computes the initial timer configuration.
    ///
    /// Call [`StrobeController::start`] to load that configuration into the
    /// pulse generator.
    pub fn new(mut store: S, time_source: &'t T, config: StrobeConfig) -> Self {
        let rate = load_rate(&mut store);
        let timer_config = program(rate.frequency(), config.tick_rate_hz, &config.prescalers);

        let mut display = DisplayEngine::new(config.scroll_interval);
        display.show_value(rate.displayed_value());

        Self {
            rate,
            input: InputController::new(),
            display,
            cooldowns: Cooldowns::new(),
            store,
            time_source,
            config,
            timer_config,
        }
    }

    /// Programs the pulse generator for the loaded rate.
    pub fn start<P: PulseControl>(&self, pulse: &mut P) {
        debug!("starting at {}", self.timer_config);
        pulse.reprogram(self.timer_config);
    }

    /// Runs one control-loop iteration with freshly sampled buttons.
    ///
    /// Returns the frame to multiplex for this iteration.
    pub fn tick<P: PulseControl>(&mut self, buttons: &ButtonState, pulse: &mut P) -> Frame {
        self.cooldowns.tick();

        let now = self.time_source.now();
        if let Some(action) =
            self.input
                .update(buttons, now, &mut self.rate, &mut self.cooldowns, &self.config)
        {
            match action {
                InputAction::StepCycled(step) => self.display.show_step(step),
                InputAction::UnitToggled(unit) => {
                    self.display.show_unit_label(unit, &mut self.cooldowns)
                }
                _ => {}
            }
            self.commit(action, pulse);
        }

        self.display.render(&self.rate, &mut self.cooldowns)
    }

    #[inline]
    pub fn rate(&self) -> &RateModel {
        &self.rate
    }

    /// Configuration most recently sent to the pulse generator.
    #[inline]
    pub fn timer_config(&self) -> TimerConfig {
        self.timer_config
    }

    #[inline]
    pub fn cooldowns(&self) -> &Cooldowns {
        &self.cooldowns
    }

    #[inline]
    pub fn display(&self) -> &DisplayEngine {
        &self.display
    }

    #[inline]
    pub fn config(&self) -> &StrobeConfig {
        &self.config
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether the step/unit button is being held and timed.
    #[inline]
    pub fn is_timing_press(&self) -> bool {
        self.input.is_timing_press()
    }

    #[cfg_attr(not(feature = "defmt"), allow(unused_variables))]
    fn commit<P: PulseControl>(&mut self, action: InputAction, pulse: &mut P) {
        if let Err(error) = save_rate(&mut self.store, &self.rate, action.changes_unit()) {
            warn!("settings write failed: {}", defmt::Debug2Format(&error));
        }

        self.timer_config = program(
            self.rate.frequency(),
            self.config.tick_rate_hz,
            &self.config.prescalers,
        );
        debug!("{} -> {}", action, self.timer_config);
        pulse.reprogram(self.timer_config);
    }
}
