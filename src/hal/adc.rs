//! ADC Driver
//!
//! Audio sampling of the discriminator output on ADC1 and battery
//! voltage sensing on ADC2. Conversion pacing comes from the sampling
//! task; the wrappers here only own the peripherals and the raw-count
//! conversions.

use embassy_stm32::adc::{Adc, AdcChannel, SampleTime};
use embassy_stm32::peripherals::{ADC1, ADC2};

use crate::config::ADC_BLOCK_SIZE;
use crate::power::{BatterySense, BatteryVoltage};

/// ADC reading result
#[derive(Clone, Copy, Debug)]
pub struct AdcReading {
    /// Raw 12-bit ADC value (0-4095)
    raw: u16,
}

impl AdcReading {
    /// Create a new ADC reading from raw value
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self { raw }
    }

    /// Get the raw 12-bit value
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.raw
    }

    /// Convert to a signed 16-bit audio sample centered on mid-scale
    #[must_use]
    pub fn as_i16(self) -> i16 {
        // 12-bit unipolar count widened to the full i16 range.
        ((i32::from(self.raw) - 2048) * 16) as i16
    }
}

impl defmt::Format for AdcReading {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ADC({})", self.raw);
    }
}

/// Audio ADC driver sampling the discriminator output
pub struct AudioInput<'d> {
    adc: Adc<'d, ADC1>,
}

impl AudioInput<'_> {
    /// Create a new audio input driver
    #[must_use]
    pub fn new(adc: ADC1) -> Self {
        let adc = Adc::new(adc);
        Self { adc }
    }

    /// Configure the ADC for audio sampling
    pub fn configure(&mut self) {
        self.adc.set_sample_time(SampleTime::CYCLES247_5);
    }

    /// Read a single audio sample
    pub fn read<T: AdcChannel<ADC1>>(&mut self, channel: &mut T) -> AdcReading {
        let raw = self.adc.blocking_read(channel);
        AdcReading::from_raw(raw)
    }

    /// Fill one demodulator block with centered signed samples
    pub fn read_block<T: AdcChannel<ADC1>>(
        &mut self,
        channel: &mut T,
        block: &mut [i16; ADC_BLOCK_SIZE],
    ) {
        for slot in block.iter_mut() {
            *slot = self.read(channel).as_i16();
        }
    }
}

/// Battery voltage monitor on the auxiliary ADC
pub struct BatteryMonitor<'d, C: AdcChannel<ADC2>> {
    adc: Adc<'d, ADC2>,
    channel: C,
}

impl<C: AdcChannel<ADC2>> BatteryMonitor<'_, C> {
    /// Create a new battery monitor owning its sense channel
    #[must_use]
    pub fn new(adc: ADC2, channel: C) -> Self {
        let mut adc = Adc::new(adc);
        adc.set_sample_time(SampleTime::CYCLES247_5);
        Self { adc, channel }
    }
}

impl<C: AdcChannel<ADC2>> BatterySense for BatteryMonitor<'_, C> {
    fn read(&mut self) -> BatteryVoltage {
        let raw = self.adc.blocking_read(&mut self.channel);
        BatteryVoltage::from_count(raw)
    }
}
