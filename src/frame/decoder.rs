//! Link Frame Decoder
//!
//! Turns one frame of received soft bits into payload bytes: undo the
//! transmit interleaving, run the Viterbi decoder, then check the frame
//! checksum. Validity and the corrected-error estimate travel with the
//! payload so the caller can decide what to forward.

use heapless::Vec;

use crate::config::{FRAME_PAYLOAD_BYTES, FRAME_SOFT_BITS, LINK_FRAME_BYTES};
use crate::fec::convolutional::ViterbiDecoder;
use crate::fec::crc::Crc16;
use crate::fec::interleaver;

/// One decoded link frame
pub struct Decoded {
    /// Checksum verified
    pub valid: bool,
    /// Channel bit errors absorbed by the convolutional decoder
    pub ber: u32,
    /// Payload plus trailing checksum bytes
    pub frame: Vec<u8, LINK_FRAME_BYTES>,
}

/// Frame decode pipeline
pub struct FrameDecoder {
    viterbi: ViterbiDecoder,
}

impl FrameDecoder {
    /// Create a decoder
    #[must_use]
    pub const fn new() -> Self {
        Self {
            viterbi: ViterbiDecoder::new(),
        }
    }

    /// Clear survivor memory ahead of a fresh reception
    pub fn reset(&mut self) {
        self.viterbi.reset();
    }

    /// Decode one frame of soft bits
    pub fn decode(&mut self, soft: &[i8; FRAME_SOFT_BITS]) -> Decoded {
        let deinterleaved = interleaver::deinterleave(soft);
        let (message, ber) = self.viterbi.decode(&deinterleaved);

        let mut frame = Vec::new();
        // Message tail beyond the link frame is pad and flush bits
        let _ = frame.extend_from_slice(&message[..LINK_FRAME_BYTES]);

        let received = u16::from_be_bytes([
            frame[FRAME_PAYLOAD_BYTES],
            frame[FRAME_PAYLOAD_BYTES + 1],
        ]);
        let valid = Crc16::checksum(&frame[..FRAME_PAYLOAD_BYTES]) == received;

        Decoded { valid, ber, frame }
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}
