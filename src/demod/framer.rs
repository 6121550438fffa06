//! Soft-Bit Framer
//!
//! Accumulates the soft dibits that follow a sync word until one full
//! frame of type-4 bits is on hand.

use crate::config::FRAME_SOFT_BITS;
use crate::types::SoftDibit;

/// Frame accumulator
pub struct Framer {
    bits: [i8; FRAME_SOFT_BITS],
    index: usize,
}

impl Framer {
    /// Create an empty framer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bits: [0; FRAME_SOFT_BITS],
            index: 0,
        }
    }

    /// Append one soft dibit; true exactly on the call that completes the
    /// frame. Once full, further dibits are dropped until [`Self::reset`].
    pub fn extend(&mut self, dibit: SoftDibit) -> bool {
        if self.index + 1 >= FRAME_SOFT_BITS {
            return false;
        }
        self.bits[self.index] = dibit.first;
        self.bits[self.index + 1] = dibit.second;
        self.index += 2;
        self.index == FRAME_SOFT_BITS
    }

    /// The accumulated frame; meaningful only after `extend` returned true
    #[must_use]
    pub const fn frame(&self) -> &[i8; FRAME_SOFT_BITS] {
        &self.bits
    }

    /// Discard any partial accumulation
    pub fn reset(&mut self) {
        self.index = 0;
    }
}

impl Default for Framer {
    fn default() -> Self {
        Self::new()
    }
}
