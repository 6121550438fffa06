//! Carrier Detector
//!
//! Decides whether a modulated signal is present by watching the smoothed
//! error-vector magnitude. Clean symbols pull the metric toward zero; noise
//! pins it near the inner-level distance. Separate lock and unlock levels
//! give the decision hysteresis so it cannot chatter at the boundary.

use crate::config::{DCD_LOCK_LEVEL, DCD_UNLOCK_LEVEL, EVM_A, EVM_B};
use crate::dsp::filter::SmoothingIir;

/// EVM-driven data carrier detect
pub struct CarrierDetect {
    filter: SmoothingIir,
    level: f32,
    locked: bool,
}

impl CarrierDetect {
    /// Create a detector with the carrier lost
    #[must_use]
    pub fn new() -> Self {
        Self {
            filter: SmoothingIir::new(EVM_B, EVM_A),
            level: 0.0,
            locked: false,
        }
    }

    /// Fold in one instantaneous EVM value and return the lock decision
    pub fn update(&mut self, evm: f32) -> bool {
        self.level = self.filter.process(evm.abs());
        if self.locked {
            if self.level > DCD_UNLOCK_LEVEL {
                self.locked = false;
            }
        } else if self.level < DCD_LOCK_LEVEL {
            self.locked = true;
        }
        self.locked
    }

    /// Current lock decision
    #[must_use]
    pub const fn locked(&self) -> bool {
        self.locked
    }

    /// Smoothed EVM level, for telemetry
    #[must_use]
    pub const fn level(&self) -> f32 {
        self.level
    }

    /// Drop lock and clear the quality filter
    pub fn reset(&mut self) {
        self.filter.reset();
        self.level = 0.0;
        self.locked = false;
    }
}

impl Default for CarrierDetect {
    fn default() -> Self {
        Self::new()
    }
}
