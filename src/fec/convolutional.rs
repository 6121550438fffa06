//! Rate-1/2 Convolutional Codec
//!
//! Constraint length 5, generator polynomials G1 = 0x19 (1 + D^3 + D^4) and
//! G2 = 0x17 (1 + D + D^2 + D^4). Polynomial masks address bit 0 as the
//! current input and bit k as the k-sample delay.
//!
//! Frames are zero-terminated: the last four message bits flush the encoder
//! back to state zero, so the decoder tracebacks from a known end state.

use crate::config::FRAME_SOFT_BITS;

/// Trellis steps per frame (one message bit each)
pub const FRAME_STEPS: usize = FRAME_SOFT_BITS / 2;
/// Decoded message bytes per frame, including pad and flush bits
pub const MESSAGE_BYTES: usize = FRAME_STEPS / 8;
/// Encoded bytes per frame
pub const CODED_BYTES: usize = FRAME_SOFT_BITS / 8;

const STATE_COUNT: usize = 16;
const G1: u8 = 0x19;
const G2: u8 = 0x17;
const UNREACHABLE: i32 = i32::MAX / 4;

/// Expected output pair for a state/input branch
const fn branch_output(state: u8, input: u8) -> (bool, bool) {
    let combined = ((state << 1) | input) & 0x1F;
    (
        (combined & G1).count_ones() & 1 == 1,
        (combined & G2).count_ones() & 1 == 1,
    )
}

/// Convolutional encoder with a four-bit state register
#[derive(Clone, Copy, Debug, Default)]
pub struct ConvolutionalEncoder {
    state: u8,
}

impl ConvolutionalEncoder {
    /// Create an encoder in the all-zero state
    #[must_use]
    pub const fn new() -> Self {
        Self { state: 0 }
    }

    /// Encode one bit, producing the G1 and G2 output bits
    pub fn encode_bit(&mut self, input: bool) -> (bool, bool) {
        let bit = u8::from(input);
        let output = branch_output(self.state, bit);
        self.state = ((self.state << 1) | bit) & 0x0F;
        output
    }

    /// Return to the all-zero state
    pub fn reset(&mut self) {
        self.state = 0;
    }

    /// Encode a full message, most significant bit first.
    ///
    /// The final four message bits must be zero so the returned stream is
    /// properly terminated.
    #[must_use]
    pub fn encode_frame(message: &[u8; MESSAGE_BYTES]) -> [u8; CODED_BYTES] {
        let mut encoder = Self::new();
        let mut coded = [0u8; CODED_BYTES];

        for step in 0..FRAME_STEPS {
            let bit = message[step / 8] & (0x80 >> (step % 8)) != 0;
            let (out1, out2) = encoder.encode_bit(bit);
            if out1 {
                coded[step / 4] |= 0x80 >> (2 * step % 8);
            }
            if out2 {
                coded[step / 4] |= 0x40 >> (2 * step % 8);
            }
        }

        coded
    }
}

/// Soft-decision Viterbi decoder sized for one frame.
///
/// Soft inputs follow the log-likelihood convention used on the wire:
/// positive values favor a one bit, magnitude carries confidence.
pub struct ViterbiDecoder {
    /// Survivor decisions, one bit per state per trellis step
    decisions: [u16; FRAME_STEPS],
}

impl ViterbiDecoder {
    /// Create a decoder with cleared survivor memory
    #[must_use]
    pub const fn new() -> Self {
        Self {
            decisions: [0; FRAME_STEPS],
        }
    }

    /// Clear survivor memory
    pub fn reset(&mut self) {
        self.decisions = [0; FRAME_STEPS];
    }

    /// Decode one frame of soft bits.
    ///
    /// Returns the decoded message and the Hamming distance between the
    /// re-encoded survivor path and the received hard decisions, which
    /// estimates the channel bit errors the decoder absorbed.
    pub fn decode(&mut self, soft: &[i8; FRAME_SOFT_BITS]) -> ([u8; MESSAGE_BYTES], u32) {
        let mut metrics = [UNREACHABLE; STATE_COUNT];
        metrics[0] = 0;

        // Forward pass: accumulate path metrics, record survivor choices
        for step in 0..FRAME_STEPS {
            let s1 = i32::from(soft[2 * step]);
            let s2 = i32::from(soft[2 * step + 1]);
            let mut next = [UNREACHABLE; STATE_COUNT];
            let mut decisions = 0u16;

            for state in 0..STATE_COUNT {
                let input = (state & 1) as u8;
                let low = state >> 1;
                let high = low | 0x8;
                let m_low = metrics[low] + Self::branch_cost(low as u8, input, s1, s2);
                let m_high = metrics[high] + Self::branch_cost(high as u8, input, s1, s2);

                if m_high < m_low {
                    next[state] = m_high;
                    decisions |= 1 << state;
                } else {
                    next[state] = m_low;
                }
            }

            metrics = next;
            self.decisions[step] = decisions;
        }

        // Traceback from the terminated end state
        let mut message = [0u8; MESSAGE_BYTES];
        let mut state = 0u8;
        for step in (0..FRAME_STEPS).rev() {
            if state & 1 != 0 {
                message[step / 8] |= 0x80 >> (step % 8);
            }
            let survivor = (self.decisions[step] >> state) & 1;
            state = (state >> 1) | ((survivor as u8) << 3);
        }

        (message, Self::count_errors(&message, soft))
    }

    /// Cost of one branch against a received soft pair; lower agrees more
    fn branch_cost(state: u8, input: u8, s1: i32, s2: i32) -> i32 {
        let (out1, out2) = branch_output(state, input);
        let c1 = if out1 { -s1 } else { s1 };
        let c2 = if out2 { -s2 } else { s2 };
        c1 + c2
    }

    /// Hamming distance between the re-encoded message and the hard decisions
    fn count_errors(message: &[u8; MESSAGE_BYTES], soft: &[i8; FRAME_SOFT_BITS]) -> u32 {
        let coded = ConvolutionalEncoder::encode_frame(message);
        let mut errors = 0;
        for (i, &value) in soft.iter().enumerate() {
            let received = value >= 0;
            let expected = coded[i / 8] & (0x80 >> (i % 8)) != 0;
            if received != expected {
                errors += 1;
            }
        }
        errors
    }
}

impl Default for ViterbiDecoder {
    fn default() -> Self {
        Self::new()
    }
}
