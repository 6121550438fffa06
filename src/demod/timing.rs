//! Symbol Timing Recovery
//!
//! Maintains the fractional symbol clock. Each incoming sample advances the
//! phase accumulator by `dt`; a wrap past 1.0 marks a symbol decision
//! instant. The sampling interval is steered by the phase-error estimate so
//! decisions settle onto the zero-slope point of the matched-filter output.

use crate::config::{DT_MAX, DT_MIN, IDEAL_DT, TIMING_GAIN_INITIAL};

/// Closed-loop symbol clock
pub struct TimingRecovery {
    /// Phase accumulator in symbol periods
    t: f32,
    /// Per-sample phase increment
    dt: f32,
    /// Loop gain for interval adjustment
    gain: f32,
}

impl TimingRecovery {
    /// Create a loop at the nominal rate with acquisition gain
    #[must_use]
    pub const fn new() -> Self {
        Self {
            t: 0.0,
            dt: IDEAL_DT,
            gain: TIMING_GAIN_INITIAL,
        }
    }

    /// Advance the clock by one sample; true when a symbol is due
    pub fn advance(&mut self) -> bool {
        self.t += self.dt;
        if self.t >= 1.0 {
            self.t -= 1.0;
            true
        } else {
            false
        }
    }

    /// Steer the interval from the phase-error estimate.
    ///
    /// The error sign follows the center sample's polarity; a positive
    /// slope means the decision fired early, so the interval shrinks and
    /// later decisions drift toward the pulse peak. The interval is
    /// recomputed from the nominal rate every symbol, so a zero error
    /// snaps it straight back to ideal, and it is hard clamped to a ±5%
    /// pull-in range.
    pub fn adjust(&mut self, slope: f32, center: f32) {
        let error = if center < 0.0 { -slope } else { slope };
        self.dt = (IDEAL_DT - self.gain * error).clamp(DT_MIN, DT_MAX);
    }

    /// Set the loop gain; tighter once the receiver is locked
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    /// Current sampling interval, for telemetry
    #[must_use]
    pub const fn dt(&self) -> f32 {
        self.dt
    }

    /// Return to the nominal rate and acquisition gain
    pub fn reset(&mut self) {
        self.t = 0.0;
        self.dt = IDEAL_DT;
        self.gain = TIMING_GAIN_INITIAL;
    }
}

impl Default for TimingRecovery {
    fn default() -> Self {
        Self::new()
    }
}
