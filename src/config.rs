//! System configuration and demodulator constants
//!
//! This module defines compile-time constants for the M17 TNC firmware.
//! Sample rates, pin mappings and every tuning value of the demodulation
//! pipeline are centralized here. Several of these encode calibration
//! decisions inherited from the deployed hardware; their values are load
//! bearing and must not be "simplified".

/// System clock frequency (STM32G474 @ 170MHz)
pub const SYSTEM_CLOCK_HZ: u32 = 170_000_000;

/// ADC sample rate for the discriminator audio input (Hz)
pub const SAMPLE_RATE: u32 = 48_000;

/// M17 symbol rate (4FSK baud)
pub const SYMBOL_RATE: u32 = 4_800;

/// Samples per symbol at the nominal rates
pub const SAMPLES_PER_SYMBOL: u32 = SAMPLE_RATE / SYMBOL_RATE;

/// Samples delivered per ADC block (one block every 4 ms)
pub const ADC_BLOCK_SIZE: usize = 192;

/// Number of taps in the root-raised-cosine receive filter (must be even)
pub const RRC_TAP_COUNT: usize = 80;

/// Excess-bandwidth factor of the RRC filter
pub const RRC_ROLL_OFF: f32 = 0.5;

/// Scale from Q1.15 full swing to discriminator units.
///
/// Full-scale ADC input maps to ±20.0 so that a transmitter at nominal
/// deviation lands the outer 4FSK symbols near ±3.0, the level grid the
/// slicer and both estimators are calibrated against.
pub const SAMPLE_SCALE: f32 = 20.0;

/// Ideal fraction of a symbol period advanced per sample (symbol rate /
/// sample rate)
pub const IDEAL_DT: f32 = 0.1;

/// Lower clamp on the symbol clock increment (−5% pull-in bound)
pub const DT_MIN: f32 = 0.095;

/// Upper clamp on the symbol clock increment (+5% pull-in bound)
pub const DT_MAX: f32 = 0.105;

/// Timing loop gain while hunting for carrier
pub const TIMING_GAIN_UNLOCKED: f32 = 0.01;

/// Timing loop gain once carrier lock is declared
pub const TIMING_GAIN_LOCKED: f32 = 0.002;

/// Timing loop gain before the first lock decision
pub const TIMING_GAIN_INITIAL: f32 = 0.005;

/// Numerator of the shared smoothing filter (2nd-order Butterworth
/// low-pass, cutoff 0.05 x update rate), used for EVM tracking, the
/// carrier detector and the frequency estimator
pub const EVM_B: [f32; 3] = [0.020_083_37, 0.040_166_73, 0.020_083_37];

/// Denominator of the shared smoothing filter (a0 = 1 implied first)
pub const EVM_A: [f32; 3] = [1.0, -1.561_018_08, 0.641_351_54];

/// Smoothed EVM below which the carrier detector declares lock
pub const DCD_LOCK_LEVEL: f32 = 0.01;

/// Smoothed EVM above which the carrier detector drops lock
pub const DCD_UNLOCK_LEVEL: f32 = 0.75;

/// Depth of the frequency-offset moving average, in samples
pub const FREQ_AVG_LEN: usize = 32;

/// Samples with |level| above this feed the frequency estimator; the
/// outer rails give a clean DC reading where inner symbols would conflate
/// deviation error
pub const FREQ_OUTER_BOUNDARY: f32 = 2.0;

/// Outer symbol level on the normalized grid
pub const LEVEL_OUTER: f32 = 3.0;

/// Slicer boundary between inner and outer symbols
pub const DECISION_BOUNDARY: f32 = 2.0;

/// Attack coefficient of the deviation envelope followers (per sample)
pub const DEVIATION_ATTACK: f32 = 0.05;

/// Decay coefficient of the deviation envelope followers (per sample).
///
/// Must sit well under the attack: the envelopes settle short of the true
/// span by the decay/attack ratio, and that residual reads as error vector
/// even on a clean signal. At 1/500 the floor stays a factor of two inside
/// [`DCD_LOCK_LEVEL`]; a run of inner symbols still barely moves the span.
pub const DEVIATION_DECAY: f32 = 0.000_1;

/// Expected peak-to-peak span of the conditioned signal (−3..+3)
pub const DEVIATION_SPAN: f32 = 6.0;

/// Smallest deviation correction gain ever applied
pub const DEVIATION_GAIN_MIN: f32 = 0.1;

/// Largest deviation correction gain ever applied (bounds noise blow-up
/// when no carrier is present)
pub const DEVIATION_GAIN_MAX: f32 = 10.0;

/// LLR slope: soft-bit counts per unit of level distance
pub const LLR_SCALE: f32 = 32.0;

/// Soft bits per link frame (192 symbols minus the 8-symbol sync word,
/// times 2 bits per symbol)
pub const FRAME_SOFT_BITS: usize = 368;

/// 16-bit synchronization pattern preceding every frame
pub const SYNC_WORD: u16 = 0x3243;

/// Allowed sync-word bit errors while hunting from `Sync`
pub const STREAM_SYNC_TOLERANCE: u32 = 1;

/// Allowed sync-word bit errors when re-acquiring at a frame boundary
pub const FRAME_SYNC_TOLERANCE: u32 = 4;

/// Consecutive frame-sync misses tolerated before regressing to
/// `Unlocked`
pub const MAX_SYNC_MISSES: u8 = 8;

/// Processed symbols between telemetry log lines
pub const TELEMETRY_DECIMATION: u32 = 192;

/// Payload bytes carried by a decoded link frame
pub const FRAME_PAYLOAD_BYTES: usize = 20;

/// Total bytes in a decoded link frame (payload + CRC-16)
pub const LINK_FRAME_BYTES: usize = FRAME_PAYLOAD_BYTES + 2;

/// Payload bytes per pool segment
pub const SEGMENT_SIZE: usize = 48;

/// Segments in the static frame-pool arena
pub const SEGMENT_COUNT: usize = 16;

/// Full-scale count of the 12-bit ADC
pub const ADC_MAX_COUNT: u16 = 4095;

/// Battery divider scale: ADC counts to millivolts through the 2:1
/// divider at a 3.3 V reference (2 x 3300)
pub const BATTERY_SCALE_MV: u32 = 6600;

/// Internal reference rail in millivolts
pub const VREF_MV: u32 = 3300;

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments matching the schematic

    /// Status LED (directly on MCU)
    pub const LED_STATUS: &str = "PA5";

    /// Carrier-lock indicator LED
    pub const LED_LOCK: &str = "PB0";

    /// Discriminator audio ADC input
    pub const AUDIO_ADC: &str = "PA0";

    /// Battery voltage sense (through the 2:1 divider)
    pub const BATTERY_ADC: &str = "PA1";
}

/// Timer assignments
pub mod timers {
    //! Hardware timer assignments

    /// Audio sample rate timer (ADC trigger)
    pub const AUDIO_SAMPLE: u8 = 2;

    /// General purpose timer for delays
    pub const GENERAL: u8 = 6;
}
