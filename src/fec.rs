//! Forward Error Correction
//!
//! Bit-domain codec for the link layer: CRC-16 integrity check, quadratic
//! permutation interleaving, and the rate-1/2 convolutional code with its
//! soft-decision Viterbi decoder.

pub mod convolutional;
pub mod crc;
pub mod interleaver;
