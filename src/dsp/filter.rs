//! Digital Filters
//!
//! Provides the fixed-point receive filter and the small floating-point
//! smoothing filters used by the demodulator's estimators.

use fixed::types::I1F15;
#[cfg(feature = "embedded")]
use micromath::F32Ext;

/// Fixed-point sample type (Q1.15 format)
pub type Sample = I1F15;

/// Convert f32 to fixed-point sample
#[must_use]
pub fn to_sample(value: f32) -> Sample {
    Sample::from_num(value.clamp(-1.0, 0.99997))
}

/// Convert fixed-point sample to f32
#[must_use]
pub fn from_sample(sample: Sample) -> f32 {
    sample.to_num::<f32>()
}

/// Reinterpret a raw ADC word as a Q1.15 sample
#[must_use]
pub const fn from_adc(raw: i16) -> Sample {
    Sample::from_bits(raw)
}

/// FIR filter coefficients
#[derive(Clone)]
pub struct FirCoefficients<const N: usize> {
    /// Filter coefficients (symmetric for linear phase)
    taps: [Sample; N],
}

impl<const N: usize> FirCoefficients<N> {
    /// Create coefficients from f32 array
    #[must_use]
    pub fn from_f32(coeffs: &[f32; N]) -> Self {
        let mut taps = [Sample::from_num(0); N];
        for (i, &c) in coeffs.iter().enumerate() {
            taps[i] = to_sample(c);
        }
        Self { taps }
    }

    /// Get coefficient at index
    #[must_use]
    pub fn get(&self, index: usize) -> Sample {
        self.taps.get(index).copied().unwrap_or(Sample::from_num(0))
    }

    /// Generate root-raised-cosine matched-filter coefficients.
    ///
    /// `samples_per_symbol` is the oversampling ratio, `roll_off` the
    /// excess-bandwidth factor. Taps are normalized to unity DC gain, so a
    /// matched transmit/receive pair reproduces the symbol levels at the
    /// composite pulse centers.
    #[must_use]
    pub fn root_raised_cosine(samples_per_symbol: f32, roll_off: f32) -> Self {
        let mut coeffs = [0.0f32; N];
        let m = N - 1;
        let beta = roll_off.clamp(0.01, 1.0);
        let pi = core::f32::consts::PI;

        for (i, c) in coeffs.iter_mut().enumerate() {
            // Tap instant in symbol periods, centered on the filter
            let t = (i as f32 - m as f32 / 2.0) / samples_per_symbol;

            if t.abs() < 0.0001 {
                *c = 1.0 - beta + 4.0 * beta / pi;
            } else if (1.0 - (4.0 * beta * t) * (4.0 * beta * t)).abs() < 0.0001 {
                // Removable singularity at |t| = 1/(4*beta)
                let x = pi / (4.0 * beta);
                *c = (beta / core::f32::consts::SQRT_2)
                    * ((1.0 + 2.0 / pi) * x.sin() + (1.0 - 2.0 / pi) * x.cos());
            } else {
                let num = (pi * t * (1.0 - beta)).sin()
                    + 4.0 * beta * t * (pi * t * (1.0 + beta)).cos();
                let den = pi * t * (1.0 - (4.0 * beta * t) * (4.0 * beta * t));
                *c = num / den;
            }
        }

        // Normalize
        let sum: f32 = coeffs.iter().sum();
        if sum.abs() > 0.0001 {
            for c in &mut coeffs {
                *c /= sum;
            }
        }

        Self::from_f32(&coeffs)
    }
}

/// FIR filter state
pub struct FirFilter<const N: usize> {
    /// Filter coefficients
    coeffs: FirCoefficients<N>,
    /// Delay line (circular buffer)
    delay: [Sample; N],
    /// Current position in delay line
    pos: usize,
}

impl<const N: usize> FirFilter<N> {
    /// Create a new FIR filter with given coefficients
    #[must_use]
    pub fn new(coeffs: FirCoefficients<N>) -> Self {
        Self {
            coeffs,
            delay: [Sample::from_num(0); N],
            pos: 0,
        }
    }

    /// Process a single sample
    pub fn process(&mut self, input: Sample) -> Sample {
        // Store input in delay line
        self.delay[self.pos] = input;

        // Compute convolution
        let mut acc = Sample::from_num(0);
        let mut idx = self.pos;

        for i in 0..N {
            // Use saturating arithmetic to prevent overflow
            let product = self.delay[idx].saturating_mul(self.coeffs.get(i));
            acc = acc.saturating_add(product);

            if idx == 0 {
                idx = N - 1;
            } else {
                idx -= 1;
            }
        }

        // Advance position
        self.pos = (self.pos + 1) % N;

        acc
    }

    /// Process a block of samples in-place
    pub fn process_block(&mut self, samples: &mut [Sample]) {
        for sample in samples.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Reset filter state
    pub fn reset(&mut self) {
        self.delay.fill(Sample::from_num(0));
        self.pos = 0;
    }
}

/// Second-order IIR smoothing filter with fixed coefficients.
///
/// Direct Form II Transposed. Coefficient arrays follow the usual
/// convention: three numerator taps `b`, three denominator taps `a` with
/// `a[0]` the normalizer.
#[derive(Clone, Copy, Debug)]
pub struct SmoothingIir {
    b: [f32; 3],
    a: [f32; 2],
    /// State variables
    z: [f32; 2],
}

impl SmoothingIir {
    /// Create a filter from coefficient arrays
    #[must_use]
    pub fn new(b: [f32; 3], a: [f32; 3]) -> Self {
        Self {
            b: [b[0] / a[0], b[1] / a[0], b[2] / a[0]],
            a: [a[1] / a[0], a[2] / a[0]],
            z: [0.0; 2],
        }
    }

    /// Process a single sample
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b[0] * input + self.z[0];
        self.z[0] = self.b[1] * input - self.a[0] * output + self.z[1];
        self.z[1] = self.b[2] * input - self.a[1] * output;

        output
    }

    /// Reset filter state
    pub fn reset(&mut self) {
        self.z = [0.0; 2];
    }
}

/// Moving average filter for smoothing
#[derive(Clone)]
pub struct MovingAverage<const N: usize> {
    buffer: [f32; N],
    sum: f32,
    pos: usize,
}

impl<const N: usize> MovingAverage<N> {
    /// Create a new moving average filter
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: [0.0; N],
            sum: 0.0,
            pos: 0,
        }
    }

    /// Process a single sample
    pub fn process(&mut self, input: f32) -> f32 {
        self.sum -= self.buffer[self.pos];
        self.sum += input;
        self.buffer[self.pos] = input;
        self.pos = (self.pos + 1) % N;
        self.sum / N as f32
    }

    /// Get current average
    #[must_use]
    pub fn average(&self) -> f32 {
        self.sum / N as f32
    }

    /// Reset filter state
    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.sum = 0.0;
        self.pos = 0;
    }
}

impl<const N: usize> Default for MovingAverage<N> {
    fn default() -> Self {
        Self::new()
    }
}
