//! Symbol Decision and Error Vector Tracking
//!
//! Slices a conditioned sample into one of the four symbol levels, emits
//! the matching soft log-likelihood pair, and maintains the error-vector
//! magnitude that the carrier detector and telemetry consume.

use crate::config::{DECISION_BOUNDARY, EVM_A, EVM_B, IDEAL_DT, LEVEL_OUTER, LLR_SCALE};
use crate::dsp::filter::SmoothingIir;
use crate::types::{SoftDibit, Symbol};

/// Phase-error estimate from a conditioned three-sample window: the local
/// slope in level units per symbol period
#[must_use]
pub fn phase_estimate(window: &[f32; 3]) -> f32 {
    (window[2] - window[0]) / (2.0 * IDEAL_DT)
}

/// Symbol slicer with EVM tracking
pub struct SymbolDecoder {
    filter: SmoothingIir,
    evm: f32,
    evm_avg: f32,
}

impl SymbolDecoder {
    /// Create a decoder with worst-case quality metrics
    #[must_use]
    pub fn new() -> Self {
        Self {
            filter: SmoothingIir::new(EVM_B, EVM_A),
            evm: 0.0,
            evm_avg: 0.0,
        }
    }

    /// Decide the symbol for a conditioned center sample.
    ///
    /// Updates the error-vector state as a side effect: the distance from
    /// the decided level, normalized by the outer level for outer symbols
    /// so both rings contribute on the same scale.
    pub fn decide(&mut self, center: f32) -> (Symbol, SoftDibit) {
        let symbol = if center >= DECISION_BOUNDARY {
            Symbol::PlusThree
        } else if center >= 0.0 {
            Symbol::PlusOne
        } else if center >= -DECISION_BOUNDARY {
            Symbol::MinusOne
        } else {
            Symbol::MinusThree
        };

        let mut evm = center - symbol.level();
        if symbol.is_outer() {
            evm /= LEVEL_OUTER;
        }
        self.evm = evm;
        self.evm_avg = self.filter.process(evm);

        (symbol, Self::llr(center))
    }

    /// Soft log-likelihood pair for a conditioned center sample.
    ///
    /// The first bit is the sign bit, the second the magnitude bit;
    /// positive values favor a one. Confidence saturates at the scaled
    /// distance of one full inner level.
    fn llr(center: f32) -> SoftDibit {
        let first = (-center * LLR_SCALE).clamp(f32::from(i8::MIN), f32::from(i8::MAX));
        let second = ((center.abs() - DECISION_BOUNDARY) * LLR_SCALE)
            .clamp(f32::from(i8::MIN), f32::from(i8::MAX));
        SoftDibit::new(first as i8, second as i8)
    }

    /// Instantaneous error vector of the last decision
    #[must_use]
    pub const fn evm(&self) -> f32 {
        self.evm
    }

    /// Smoothed error vector, for telemetry
    #[must_use]
    pub const fn evm_average(&self) -> f32 {
        self.evm_avg
    }

    /// Clear the quality metrics
    pub fn reset(&mut self) {
        self.filter.reset();
        self.evm = 0.0;
        self.evm_avg = 0.0;
    }
}

impl Default for SymbolDecoder {
    fn default() -> Self {
        Self::new()
    }
}
