//! Signal Conditioner
//!
//! Per-sample front end of the receive pipeline. Raw ADC words pass through
//! the root-raised-cosine matched filter, then through two closed-loop
//! corrections: amplitude normalization against the estimated transmitter
//! deviation, and removal of the slowly drifting frequency offset.
//!
//! Corrections apply to every sample; the estimators themselves update only
//! at symbol decision instants, where the conditioned value sits on a
//! nominal level and measures the loop errors cleanly.

use crate::config::{
    DEVIATION_ATTACK, DEVIATION_DECAY, DEVIATION_GAIN_MAX, DEVIATION_GAIN_MIN, DEVIATION_SPAN,
    EVM_A, EVM_B, FREQ_AVG_LEN, FREQ_OUTER_BOUNDARY, LEVEL_OUTER, RRC_ROLL_OFF, RRC_TAP_COUNT,
    SAMPLES_PER_SYMBOL, SAMPLE_SCALE,
};
use crate::dsp::filter::{from_adc, from_sample, FirCoefficients, FirFilter, MovingAverage, SmoothingIir};

/// Deviation tracker built from an attack/decay envelope pair.
///
/// The positive and negative envelopes follow symbol-center values; their
/// span estimates the received eye opening, and the inverse gain maps it
/// back onto the nominal four-level grid.
pub struct DeviationEstimator {
    envelope_max: f32,
    envelope_min: f32,
}

impl DeviationEstimator {
    /// Create an estimator with collapsed envelopes
    #[must_use]
    pub const fn new() -> Self {
        Self {
            envelope_max: 0.0,
            envelope_min: 0.0,
        }
    }

    /// Track one symbol-center value
    pub fn update(&mut self, center: f32) {
        let up = if center > self.envelope_max {
            DEVIATION_ATTACK
        } else {
            DEVIATION_DECAY
        };
        self.envelope_max += (center - self.envelope_max) * up;

        let down = if center < self.envelope_min {
            DEVIATION_ATTACK
        } else {
            DEVIATION_DECAY
        };
        self.envelope_min += (center - self.envelope_min) * down;
    }

    /// Estimated eye span between the outer levels
    #[must_use]
    pub fn span(&self) -> f32 {
        self.envelope_max - self.envelope_min
    }

    /// Inverse deviation gain applied to incoming samples
    #[must_use]
    pub fn idev(&self) -> f32 {
        let span = self.span();
        if span < f32::EPSILON {
            1.0
        } else {
            (DEVIATION_SPAN / span).clamp(DEVIATION_GAIN_MIN, DEVIATION_GAIN_MAX)
        }
    }

    /// Collapse both envelopes
    pub fn reset(&mut self) {
        self.envelope_max = 0.0;
        self.envelope_min = 0.0;
    }
}

impl Default for DeviationEstimator {
    fn default() -> Self {
        Self::new()
    }
}

/// Frequency-offset tracker.
///
/// Outer symbols anchor the loop: their distance from the nominal outer
/// level, averaged and low-pass filtered, is the carrier offset expressed
/// in symbol-level units.
pub struct FrequencyEstimator {
    average: MovingAverage<FREQ_AVG_LEN>,
    filter: SmoothingIir,
    offset: f32,
}

impl FrequencyEstimator {
    /// Create an estimator with zero offset
    #[must_use]
    pub fn new() -> Self {
        Self {
            average: MovingAverage::new(),
            filter: SmoothingIir::new(EVM_B, EVM_A),
            offset: 0.0,
        }
    }

    /// Track one normalized symbol-center value
    pub fn update(&mut self, center: f32) {
        if center.abs() > FREQ_OUTER_BOUNDARY {
            let anchor = if center > 0.0 { LEVEL_OUTER } else { -LEVEL_OUTER };
            self.offset = self.filter.process(self.average.process(center - anchor));
        }
    }

    /// Current offset estimate in symbol-level units
    #[must_use]
    pub const fn offset(&self) -> f32 {
        self.offset
    }

    /// Clear the averager and forget the offset
    pub fn reset(&mut self) {
        self.average.reset();
        self.filter.reset();
        self.offset = 0.0;
    }
}

/// Receive front end: matched filter plus the two correction loops
pub struct Conditioner {
    rrc: FirFilter<RRC_TAP_COUNT>,
    /// Matched-filtered samples before loop corrections, newest last
    raw: [f32; 3],
    deviation: DeviationEstimator,
    frequency: FrequencyEstimator,
}

impl Conditioner {
    /// Create a conditioner with freshly computed matched-filter taps
    #[must_use]
    pub fn new() -> Self {
        Self {
            rrc: FirFilter::new(FirCoefficients::root_raised_cosine(
                SAMPLES_PER_SYMBOL as f32,
                RRC_ROLL_OFF,
            )),
            raw: [0.0; 3],
            deviation: DeviationEstimator::new(),
            frequency: FrequencyEstimator::new(),
        }
    }

    /// Filter one raw sample and return the conditioned three-sample window,
    /// newest last
    pub fn push(&mut self, sample: i16) -> [f32; 3] {
        let filtered = from_sample(self.rrc.process(from_adc(sample))) * SAMPLE_SCALE;
        self.raw = [self.raw[1], self.raw[2], filtered];

        let idev = self.deviation.idev();
        let offset = self.frequency.offset();
        [
            self.raw[0] * idev - offset,
            self.raw[1] * idev - offset,
            self.raw[2] * idev - offset,
        ]
    }

    /// Feed the correction loops at a symbol decision instant.
    ///
    /// The deviation loop sees the uncorrected center; the frequency loop
    /// sees it after amplitude normalization, so offset is measured on the
    /// nominal level grid.
    pub fn symbol_update(&mut self) {
        let center = self.raw[1];
        let normalized = center * self.deviation.idev();
        self.deviation.update(center);
        self.frequency.update(normalized);
    }

    /// Estimated eye span, for telemetry
    #[must_use]
    pub fn deviation_span(&self) -> f32 {
        self.deviation.span()
    }

    /// Estimated frequency offset, for telemetry
    #[must_use]
    pub const fn frequency_offset(&self) -> f32 {
        self.frequency.offset()
    }

    /// Clear the filter history and both estimators
    pub fn reset(&mut self) {
        self.rrc.reset();
        self.raw = [0.0; 3];
        self.deviation.reset();
        self.frequency.reset();
    }
}

impl Default for Conditioner {
    fn default() -> Self {
        Self::new()
    }
}
