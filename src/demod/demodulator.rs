//! Demodulator Pipeline
//!
//! Owns every stage of the receive path and drives them per ADC block:
//! conditioning, symbol timing, slicing, carrier detection, sync hunting,
//! framing, and frame decode. One block is 4 ms of audio; everything here
//! must finish well inside that budget.

use crate::config::{
    ADC_BLOCK_SIZE, FRAME_SYNC_TOLERANCE, STREAM_SYNC_TOLERANCE, TIMING_GAIN_LOCKED,
    TIMING_GAIN_UNLOCKED,
};
use crate::demod::carrier::CarrierDetect;
use crate::demod::conditioner::Conditioner;
use crate::demod::framer::Framer;
use crate::demod::state::{apply_event, Action, DemodState, SyncEvent};
use crate::demod::symbol::{phase_estimate, SymbolDecoder};
use crate::demod::sync::SyncDetector;
use crate::demod::timing::TimingRecovery;
use crate::frame::{FrameDecoder, FramePool, OwnedFrame};

/// Snapshot of the pipeline's estimator and lock state
#[derive(Clone, Copy, Debug)]
pub struct DemodStatus {
    /// Acquisition state
    pub state: DemodState,
    /// Current sampling interval in symbol periods
    pub dt: f32,
    /// Instantaneous error vector of the last symbol
    pub evm: f32,
    /// Smoothed error vector
    pub evm_average: f32,
    /// Estimated eye span between outer levels
    pub deviation: f32,
    /// Estimated frequency offset in level units
    pub frequency_offset: f32,
    /// Framing lock flag
    pub locked: bool,
    /// Bit errors absorbed in the last frame, -1 before any frame
    pub ber: i32,
}

#[cfg(feature = "embedded")]
impl defmt::Format for DemodStatus {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "demod[{}] dt={}e-4 evm={}e-3/{}e-3 dev={}e-3 freq={}e-3 locked={} ber={}",
            self.state,
            (self.dt * 10_000.0) as i32,
            (self.evm * 1_000.0) as i32,
            (self.evm_average * 1_000.0) as i32,
            (self.deviation * 1_000.0) as i32,
            (self.frequency_offset * 1_000.0) as i32,
            self.locked,
            self.ber,
        );
    }
}

/// Complete 4FSK receive pipeline
pub struct Demodulator {
    conditioner: Conditioner,
    timing: TimingRecovery,
    symbols: SymbolDecoder,
    carrier: CarrierDetect,
    stream_sync: SyncDetector,
    frame_sync: SyncDetector,
    framer: Framer,
    decoder: FrameDecoder,
    state: DemodState,
    /// Framing lock: true from the first matched sync word until sync
    /// timeout or carrier loss
    locked: bool,
    /// Forward frames that fail the checksum instead of dropping them
    passall: bool,
    running: bool,
    ber: i32,
    symbol_count: u32,
}

impl Demodulator {
    /// Create a stopped demodulator in the unlocked state
    #[must_use]
    pub fn new() -> Self {
        Self {
            conditioner: Conditioner::new(),
            timing: TimingRecovery::new(),
            symbols: SymbolDecoder::new(),
            carrier: CarrierDetect::new(),
            stream_sync: SyncDetector::new(STREAM_SYNC_TOLERANCE),
            frame_sync: SyncDetector::new(FRAME_SYNC_TOLERANCE),
            framer: Framer::new(),
            decoder: FrameDecoder::new(),
            state: DemodState::Unlocked,
            locked: false,
            passall: false,
            running: false,
            ber: -1,
            symbol_count: 0,
        }
    }

    /// Reset every stage and begin processing blocks
    pub fn start(&mut self) {
        self.reset_pipeline();
        self.running = true;
    }

    /// Stop processing and drop any acquisition in progress; subsequent
    /// blocks are ignored until [`Self::start`]
    pub fn stop(&mut self) {
        self.reset_pipeline();
        self.running = false;
    }

    /// Return every stage, the lock flag, and the state machine to the
    /// clean unlocked state
    fn reset_pipeline(&mut self) {
        self.conditioner.reset();
        self.timing.reset();
        self.symbols.reset();
        self.carrier.reset();
        self.stream_sync.reset();
        self.frame_sync.reset();
        self.framer.reset();
        self.decoder.reset();
        self.state = DemodState::Unlocked;
        self.locked = false;
        self.ber = -1;
        self.symbol_count = 0;
    }

    /// Whether the pipeline is processing blocks
    #[must_use]
    pub const fn running(&self) -> bool {
        self.running
    }

    /// Framing lock flag
    #[must_use]
    pub const fn locked(&self) -> bool {
        self.locked
    }

    /// Forward checksum-failed frames instead of dropping them
    pub fn set_passall(&mut self, passall: bool) {
        self.passall = passall;
    }

    /// Current acquisition state
    #[must_use]
    pub const fn state(&self) -> DemodState {
        self.state
    }

    /// Samples consumed per call to [`Self::demod_block`]
    #[must_use]
    pub const fn block_size(&self) -> usize {
        ADC_BLOCK_SIZE
    }

    /// Estimator and lock snapshot
    #[must_use]
    pub fn status(&self) -> DemodStatus {
        DemodStatus {
            state: self.state,
            dt: self.timing.dt(),
            evm: self.symbols.evm(),
            evm_average: self.symbols.evm_average(),
            deviation: self.conditioner.deviation_span(),
            frequency_offset: self.conditioner.frequency_offset(),
            locked: self.locked,
            ber: self.ber,
        }
    }

    /// Process one ADC block, returning a decoded frame when one completes
    /// within this block.
    ///
    /// At most one frame can complete per block: a frame spans ten blocks
    /// of samples, so completions are at least that far apart.
    pub fn demod_block<'p>(
        &mut self,
        pool: &'p FramePool,
        block: &[i16; ADC_BLOCK_SIZE],
    ) -> Option<OwnedFrame<'p>> {
        if !self.running {
            return None;
        }

        let mut result = None;
        for &sample in block {
            let window = self.conditioner.push(sample);
            if !self.timing.advance() {
                continue;
            }
            if let Some(frame) = self.process_symbol(pool, &window) {
                result = Some(frame);
            }
        }
        result
    }

    /// Run one symbol decision and the acquisition policy around it
    fn process_symbol<'p>(
        &mut self,
        pool: &'p FramePool,
        window: &[f32; 3],
    ) -> Option<OwnedFrame<'p>> {
        let center = window[1];
        let slope = phase_estimate(window);
        self.timing.adjust(slope, center);
        self.conditioner.symbol_update();

        let (_symbol, dibit) = self.symbols.decide(center);
        let carrier = self.carrier.update(self.symbols.evm());
        // Tighten the timing loop as soon as the carrier is present; the
        // adjust above ran with the previous symbol's gain
        self.timing.set_gain(if carrier {
            TIMING_GAIN_LOCKED
        } else {
            TIMING_GAIN_UNLOCKED
        });

        let mut completed = None;
        let event = match self.state {
            DemodState::Unlocked => {
                if carrier {
                    Some(SyncEvent::CarrierFound)
                } else {
                    None
                }
            }
            DemodState::Sync => {
                if carrier {
                    self.stream_sync
                        .push(dibit.hard())
                        .then_some(SyncEvent::SyncMatched)
                } else {
                    Some(SyncEvent::CarrierLost)
                }
            }
            DemodState::FrameSync { .. } => {
                if carrier {
                    if self.frame_sync.push(dibit.hard()) {
                        Some(SyncEvent::SyncMatched)
                    } else {
                        Some(SyncEvent::SyncMissed)
                    }
                } else {
                    Some(SyncEvent::CarrierLost)
                }
            }
            DemodState::Framing => {
                if self.framer.extend(dibit) {
                    completed = Some(self.finish_frame(pool));
                    Some(SyncEvent::FrameComplete)
                } else {
                    None
                }
            }
        };

        if let Some(event) = event {
            let (next, action) = apply_event(self.state, event);
            self.state = next;
            self.perform(action);
        }

        self.emit_telemetry();
        completed.flatten()
    }

    /// Decode the completed frame and stage it for the caller
    fn finish_frame<'p>(&mut self, pool: &'p FramePool) -> Option<OwnedFrame<'p>> {
        let decoded = self.decoder.decode(self.framer.frame());
        self.framer.reset();
        self.frame_sync.reset();
        self.ber = i32::try_from(decoded.ber).unwrap_or(i32::MAX);

        if !decoded.valid && !self.passall {
            #[cfg(feature = "embedded")]
            defmt::warn!("frame check failed, ber={}", decoded.ber);
            return None;
        }

        match pool.acquire() {
            Ok(mut frame) => match frame.extend(&decoded.frame) {
                Ok(()) => Some(frame),
                Err(_e) => {
                    #[cfg(feature = "embedded")]
                    defmt::warn!("frame store failed: {}", _e);
                    None
                }
            },
            Err(_e) => {
                #[cfg(feature = "embedded")]
                defmt::warn!("frame dropped: {}", _e);
                None
            }
        }
    }

    /// Execute the side effect requested by the state machine
    fn perform(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::ResetReceiver => {
                self.stream_sync.reset();
                self.frame_sync.reset();
                self.framer.reset();
                self.decoder.reset();
            }
            Action::StartFrame => {
                self.framer.reset();
                self.locked = true;
            }
            Action::DropLock => {
                self.locked = false;
                #[cfg(feature = "embedded")]
                defmt::info!("sync lost: {}", self.status());
            }
        }
    }

    /// Periodic estimator report at a fixed symbol decimation
    fn emit_telemetry(&mut self) {
        #[cfg(feature = "embedded")]
        if self.symbol_count % crate::config::TELEMETRY_DECIMATION == 0 {
            defmt::info!("{}", self.status());
        }
        self.symbol_count = self.symbol_count.wrapping_add(1);
    }
}

impl Default for Demodulator {
    fn default() -> Self {
        Self::new()
    }
}
