//! Persistent settings: storage traits and load/save of the rate model.
//!
//! Values that fail validation at boot are replaced with safe defaults; no
//! storage error ever reaches the user.

use crate::rate::RateModel;
use crate::types::{DisplayUnit, Frequency, Step};
use heapless::LinearMap;

/// A named persistent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    /// Frequency in centihertz, rounded to the nearest whole centihertz.
    Frequency,
    /// Step in hundredths of the displayed unit.
    Step,
    /// Display unit code (1 or 60).
    Unit,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Frequency, Slot::Step, Slot::Unit];

    /// Byte address in an [`EepromStore`].
    pub const fn address(self) -> u16 {
        match self {
            Slot::Frequency => 0,
            Slot::Step => 10,
            Slot::Unit => 20,
        }
    }

    /// Stored width in bytes in an [`EepromStore`].
    pub const fn width(self) -> usize {
        match self {
            Slot::Frequency => 8,
            Slot::Step => 4,
            Slot::Unit => 2,
        }
    }
}

/// Trait for abstracting a key/value settings store.
pub trait SettingsStore {
    type Error: core::fmt::Debug;

    /// Reads a slot. Errors are treated as corrupted contents.
    fn read(&mut self, slot: Slot) -> Result<u64, Self::Error>;

    /// Writes a slot.
    fn write(&mut self, slot: Slot, value: u64) -> Result<(), Self::Error>;
}

/// Errors from [`MemoryStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MemoryStoreError {
    /// The slot was never written.
    Empty(Slot),

    /// No room for another slot.
    Full,
}

impl core::fmt::Display for MemoryStoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MemoryStoreError::Empty(slot) => write!(f, "slot {:?} was never written", slot),
            MemoryStoreError::Full => write!(f, "memory store is full"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MemoryStoreError {}

/// Settings held in RAM. For boards without non-volatile memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: LinearMap<Slot, u64, 3>,
}

impl MemoryStore {
    pub const fn new() -> Self {
        Self {
            slots: LinearMap::new(),
        }
    }

    /// Current value of `slot`, if written.
    pub fn get(&self, slot: Slot) -> Option<u64> {
        self.slots.get(&slot).copied()
    }
}

impl SettingsStore for MemoryStore {
    type Error = MemoryStoreError;

    fn read(&mut self, slot: Slot) -> Result<u64, Self::Error> {
        self.get(slot).ok_or(MemoryStoreError::Empty(slot))
    }

    fn write(&mut self, slot: Slot, value: u64) -> Result<(), Self::Error> {
        self.slots
            .insert(slot, value)
            .map(|_| ())
            .map_err(|_| MemoryStoreError::Full)
    }
}

/// Trait for abstracting byte-addressable non-volatile memory (EEPROM).
pub trait ByteStorage {
    type Error: core::fmt::Debug;

    fn read(&mut self, address: u16, buffer: &mut [u8]) -> Result<(), Self::Error>;

    fn write(&mut self, address: u16, data: &[u8]) -> Result<(), Self::Error>;
}

/// [`SettingsStore`] over byte storage with a fixed little-endian layout.
///
/// | Slot      | Address | Bytes |
/// |-----------|---------|-------|
/// | frequency | 0       | 8     |
/// | step      | 10      | 4     |
/// | unit      | 20      | 2     |
pub struct EepromStore<B: ByteStorage> {
    storage: B,
}

impl<B: ByteStorage> EepromStore<B> {
    pub fn new(storage: B) -> Self {
        Self { storage }
    }

    pub fn release(self) -> B {
        self.storage
    }
}

impl<B: ByteStorage> SettingsStore for EepromStore<B> {
    type Error = B::Error;

    fn read(&mut self, slot: Slot) -> Result<u64, Self::Error> {
        let mut bytes = [0u8; 8];
        self.storage
            .read(slot.address(), &mut bytes[..slot.width()])?;
        Ok(u64::from_le_bytes(bytes))
    }

    fn write(&mut self, slot: Slot, value: u64) -> Result<(), Self::Error> {
        let bytes = value.to_le_bytes();
        self.storage.write(slot.address(), &bytes[..slot.width()])
    }
}

/// Loads the rate model, replacing each invalid or unreadable slot with its
/// default.
pub fn load_rate<S: SettingsStore>(store: &mut S) -> RateModel {
    let frequency = match store.read(Slot::Frequency) {
        Ok(centihertz) if Frequency::is_storable(centihertz) => {
            Frequency::from_centihertz(centihertz)
        }
        _ => {
            warn!("stored frequency invalid, using default");
            Frequency::DEFAULT
        }
    };

    let step = match store.read(Slot::Step).map(Step::new) {
        Ok(Ok(step)) => step,
        _ => {
            warn!("stored step invalid, using default");
            Step::MIN
        }
    };

    let unit = match store.read(Slot::Unit).map(DisplayUnit::from_code) {
        Ok(Some(unit)) => unit,
        _ => {
            warn!("stored unit invalid, using default");
            DisplayUnit::CyclesPerSecond
        }
    };

    debug!("loaded rate {}", frequency.centihertz());
    RateModel::new(frequency, step, unit)
}

/// Writes frequency and step, and the unit when `unit_changed`.
///
/// The frequency is stored in whole centihertz, so a cycles-per-minute
/// fraction below one centihertz is rounded away. Stops at the first failing
/// write.
pub fn save_rate<S: SettingsStore>(
    store: &mut S,
    rate: &RateModel,
    unit_changed: bool,
) -> Result<(), S::Error> {
    store.write(Slot::Frequency, rate.frequency().rounded().centihertz())?;
    store.write(Slot::Step, u64::from(rate.step().value()))?;
    if unit_changed {
        store.write(Slot::Unit, rate.unit().code())?;
    }
    Ok(())
}
