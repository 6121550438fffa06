//! CRC-16 Frame Check Sequence
//!
//! Polynomial 0x5935, initial value 0xFFFF, no reflection, no final XOR.
//! The transmitter appends the checksum big-endian after the payload.

/// Streaming CRC-16 calculator
#[derive(Clone, Copy, Debug)]
pub struct Crc16 {
    value: u16,
}

impl Crc16 {
    /// Generator polynomial
    const POLY: u16 = 0x5935;

    /// Create a calculator in its initial state
    #[must_use]
    pub const fn new() -> Self {
        Self { value: 0xFFFF }
    }

    /// Fold one byte into the running checksum
    pub fn update(&mut self, byte: u8) {
        self.value ^= u16::from(byte) << 8;
        for _ in 0..8 {
            if self.value & 0x8000 != 0 {
                self.value = (self.value << 1) ^ Self::POLY;
            } else {
                self.value <<= 1;
            }
        }
    }

    /// Current checksum value
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.value
    }

    /// Checksum of a complete message
    #[must_use]
    pub fn checksum(data: &[u8]) -> u16 {
        let mut crc = Self::new();
        for &byte in data {
            crc.update(byte);
        }
        crc.value
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}
