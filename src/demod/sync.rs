//! Sync Word Correlation
//!
//! Slides received dibits through a 16-bit register and compares against
//! the fixed sync pattern. A bounded Hamming distance stands in for exact
//! matching so a single corrupted bit cannot make the receiver miss a
//! frame boundary.
//!
//! The register resets to the pattern itself, never to zero. A zero fill
//! sits only four bits from the sync word after two dibits, inside the
//! frame-sync tolerance, so an empty register would fire six dibits early
//! at every frame boundary. Priming with the pattern keeps every partial
//! fill at least six bits away.

use crate::config::SYNC_WORD;

/// Shift-register correlator for one sync word
pub struct SyncDetector {
    pattern: u16,
    tolerance: u32,
    register: u16,
}

impl SyncDetector {
    /// Detector for `pattern` accepting up to `tolerance` mismatched bits
    #[must_use]
    pub const fn new(tolerance: u32) -> Self {
        Self {
            pattern: SYNC_WORD,
            tolerance,
            register: SYNC_WORD,
        }
    }

    /// Shift in one hard dibit; true when the register matches
    pub fn push(&mut self, dibit: u8) -> bool {
        self.register = (self.register << 2) | u16::from(dibit & 0b11);
        (self.register ^ self.pattern).count_ones() <= self.tolerance
    }

    /// Prime the register with the pattern, discarding correlation history
    pub fn reset(&mut self) {
        self.register = self.pattern;
    }
}
