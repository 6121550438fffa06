//! Digital Signal Processing
//!
//! Provides the numeric building blocks for the baseband receive path:
//! - Q1.15 FIR filtering with a root-raised-cosine designer
//! - small IIR / moving-average smoothers for the demodulator's estimators

pub mod filter;
