//! Control-loop tick counters.

/// Counts down once per control-loop iteration and saturates at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cooldown(u16);

impl Cooldown {
    pub const fn new() -> Self {
        Cooldown(0)
    }

    #[inline]
    pub fn tick(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }

    #[inline]
    pub fn arm(&mut self, ticks: u16) {
        self.0 = ticks;
    }

    #[inline]
    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// True once the counter has run out.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn remaining(&self) -> u16 {
        self.0
    }
}

/// The three cooldowns of the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cooldowns {
    /// Gates acceptance of button actions.
    pub action: Cooldown,

    /// Gates advancing the display scroll window.
    pub scroll: Cooldown,

    /// Keeps a step or unit display up before the frequency returns.
    pub transient: Cooldown,
}

impl Cooldowns {
    pub const fn new() -> Self {
        Self {
            action: Cooldown::new(),
            scroll: Cooldown::new(),
            transient: Cooldown::new(),
        }
    }

    /// Decrements all three counters.
    pub fn tick(&mut self) {
        self.action.tick();
        self.scroll.tick();
        self.transient.tick();
    }
}
