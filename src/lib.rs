//! M17 TNC Firmware Library
//!
//! This library implements the receive side of an M17 terminal node
//! controller on an STM32G474: a real-time 4FSK demodulator that turns
//! 48 kHz audio samples into validated link-layer frames.
//!
//! # Architecture
//!
//! The firmware is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │  Sampling Task  │  Frame Consumer  │  Battery Monitor        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    PIPELINE LAYER                            │
//! │  Conditioner → Timing → Slicer → Sync/Framer → Decoder       │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     CODEC LAYER                              │
//! │  Interleaver  │  Viterbi  │  CRC  │  Frame Pool              │
//! ├─────────────────────────────────────────────────────────────┤
//! │                  HAL / RTOS LAYER                            │
//! │  ADC  │  GPIO  │  embassy-rs (async/await executor)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Immutable-by-default**: state transitions return new instances
//! - **Type-driven design**: custom types enforce invariants at compile time
//! - **No unsafe in application code**: all unsafe isolated in HAL/FFI layers
//! - **Functional core, imperative shell**: pure logic separated from I/O
//! - **Explicit error handling**: all fallible operations return `Result`
//! - **Zero allocation**: every buffer is fixed-size and owned up front

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// Safe abstractions over the STM32G474 peripherals the TNC uses.
#[cfg(feature = "embedded")]
pub mod hal;

/// Digital Signal Processing
///
/// Fixed-point filtering and the small smoothers behind the estimators.
pub mod dsp;

/// 4FSK Demodulation Pipeline
///
/// Sample conditioning, symbol recovery, acquisition, and framing.
pub mod demod;

/// Forward Error Correction
///
/// Interleaving, convolutional coding, and frame checksums.
pub mod fec;

/// Frame Management
///
/// The shared frame pool and the soft-bit frame decoder.
pub mod frame;

/// Power Monitoring
///
/// Battery voltage sensing behind a capability interface.
pub mod power;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    // Common traits
    pub use embedded_hal::digital::OutputPin;

    // Embassy
    pub use embassy_time::{Duration, Instant, Timer};

    // Error handling
    pub use core::result::Result;

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
