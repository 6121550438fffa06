//! 4FSK Demodulation Pipeline
//!
//! Every stage between raw ADC samples and completed soft-bit frames:
//!
//! - [`conditioner`]: matched filter plus deviation/frequency loops
//! - [`timing`]: closed-loop symbol clock
//! - [`symbol`]: level slicing, soft bits, error-vector tracking
//! - [`carrier`]: EVM-driven carrier detect with hysteresis
//! - [`sync`]: sync word correlation
//! - [`framer`]: soft-bit frame accumulation
//! - [`state`]: acquisition state machine
//! - [`demodulator`]: the pipeline driver tying the stages together

pub mod carrier;
pub mod conditioner;
pub mod demodulator;
pub mod framer;
pub mod state;
pub mod symbol;
pub mod sync;
pub mod timing;

pub use demodulator::{DemodStatus, Demodulator};
pub use state::DemodState;
