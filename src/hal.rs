//! Hardware Abstraction Layer
//!
//! Safe wrappers around the STM32G474 peripherals the receiver touches.
//! The audio path samples the discriminator output on ADC1 and the
//! battery divider on ADC2; LEDs and timing go through embassy-stm32
//! directly from the application tasks.

pub mod adc;

pub use adc::{AdcReading, AudioInput, BatteryMonitor};
