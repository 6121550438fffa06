//! Power Monitoring
//!
//! Battery voltage sensing for the single-cell supply. The ADC sits behind
//! a 2:1 divider, so full scale maps to twice the reference voltage; all
//! conversions work in integer millivolts.

use crate::config::{ADC_MAX_COUNT, BATTERY_SCALE_MV, VREF_MV};

/// Capability interface for reading the battery voltage.
///
/// Keeps peripheral access out of the signal path; the application hands an
/// implementation to whichever task reports supply health.
pub trait BatterySense {
    /// Sample the battery rail
    fn read(&mut self) -> BatteryVoltage;
}

/// Battery voltage reading
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatteryVoltage {
    millivolts: u32,
}

impl BatteryVoltage {
    /// Convert a raw divider-channel count to a reading
    #[must_use]
    pub const fn from_count(raw: u16) -> Self {
        Self {
            millivolts: raw as u32 * BATTERY_SCALE_MV / (ADC_MAX_COUNT as u32 + 1),
        }
    }

    /// Wrap an already-converted millivolt value
    #[must_use]
    pub const fn from_millivolts(millivolts: u32) -> Self {
        Self { millivolts }
    }

    /// Battery voltage in millivolts
    #[must_use]
    pub const fn millivolts(&self) -> u32 {
        self.millivolts
    }

    /// Battery voltage in volts
    #[must_use]
    pub fn volts(&self) -> f32 {
        self.millivolts as f32 / 1000.0
    }

    /// Charge percentage for a single LiPo cell (3.0-4.2 V window)
    #[must_use]
    pub const fn percentage(&self) -> u8 {
        if self.millivolts >= 4200 {
            100
        } else if self.millivolts <= 3000 {
            0
        } else {
            ((self.millivolts - 3000) * 100 / 1200) as u8
        }
    }

    /// Below the recommended operating voltage
    #[must_use]
    pub const fn is_low(&self) -> bool {
        self.millivolts < 3300
    }

    /// Close to the cell's damage threshold
    #[must_use]
    pub const fn is_critical(&self) -> bool {
        self.millivolts < 3100
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for BatteryVoltage {
    fn format(&self, f: defmt::Formatter) {
        let whole = self.millivolts / 1000;
        let frac = (self.millivolts % 1000) / 10;
        defmt::write!(f, "{}.{:02}V", whole, frac);
    }
}

/// Convert a raw internal-reference count to the supply voltage in
/// millivolts, rounded to nearest
#[must_use]
pub const fn reference_millivolts(raw: u16) -> u32 {
    (raw as u32 * VREF_MV + ADC_MAX_COUNT as u32 / 2) / ADC_MAX_COUNT as u32
}
