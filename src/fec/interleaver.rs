//! Quadratic Permutation Interleaver
//!
//! Spreads burst errors across a frame so the convolutional decoder sees
//! them as isolated bit errors. The permutation is the quadratic polynomial
//! pi(x) = (45x + 92x^2) mod 368, which is a bijection on the frame width.
//!
//! The transmitter writes bit `i` to position `pi(i)`; the receiver reads
//! position `pi(i)` back into slot `i`. Both directions use the same table.

use crate::config::FRAME_SOFT_BITS;

/// Bit positions after permutation, indexed by source position
const PERMUTATION: [u16; FRAME_SOFT_BITS] = build_permutation();

const fn build_permutation() -> [u16; FRAME_SOFT_BITS] {
    let mut table = [0u16; FRAME_SOFT_BITS];
    let mut i = 0;
    while i < FRAME_SOFT_BITS {
        let x = i as u32;
        table[i] = ((45 * x + 92 * x * x) % FRAME_SOFT_BITS as u32) as u16;
        i += 1;
    }
    table
}

/// Apply the transmit-side permutation to a frame of soft bits
#[must_use]
pub fn interleave(bits: &[i8; FRAME_SOFT_BITS]) -> [i8; FRAME_SOFT_BITS] {
    let mut out = [0i8; FRAME_SOFT_BITS];
    for (i, &bit) in bits.iter().enumerate() {
        out[PERMUTATION[i] as usize] = bit;
    }
    out
}

/// Undo the permutation on a received frame of soft bits
#[must_use]
pub fn deinterleave(bits: &[i8; FRAME_SOFT_BITS]) -> [i8; FRAME_SOFT_BITS] {
    let mut out = [0i8; FRAME_SOFT_BITS];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = bits[PERMUTATION[i] as usize];
    }
    out
}
