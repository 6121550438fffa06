//! Acquisition State Machine
//!
//! Tracks the receiver's progress from idle hunting to frame reception.
//! Transitions are pure: an event applied to a state yields the next state
//! plus the side effect the caller must perform, which keeps the policy
//! testable without any signal processing attached.

use crate::config::MAX_SYNC_MISSES;

/// Receiver acquisition state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DemodState {
    /// No carrier; waiting for the detector to report signal
    Unlocked,
    /// Carrier present; hunting for a stream sync word
    Sync,
    /// Between frames; expecting the next sync word shortly
    FrameSync {
        /// Symbols seen since the frame boundary without a sync match
        misses: u8,
    },
    /// Collecting soft bits into the current frame
    Framing,
}

impl DemodState {
    /// Whether this state accumulates frame data
    #[must_use]
    pub const fn is_framing(&self) -> bool {
        matches!(self, Self::Framing)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for DemodState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Unlocked => defmt::write!(f, "UNLOCKED"),
            Self::Sync => defmt::write!(f, "SYNC"),
            Self::FrameSync { misses } => defmt::write!(f, "FRAME-SYNC({})", misses),
            Self::Framing => defmt::write!(f, "FRAMING"),
        }
    }
}

/// Per-symbol observation driving a transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncEvent {
    /// Carrier detector reports lock
    CarrierFound,
    /// Carrier detector reports loss
    CarrierLost,
    /// A synchronizer matched its sync word
    SyncMatched,
    /// The frame synchronizer saw a symbol without matching
    SyncMissed,
    /// The framer completed a full frame
    FrameComplete,
}

#[cfg(feature = "embedded")]
impl defmt::Format for SyncEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::CarrierFound => defmt::write!(f, "carrier-found"),
            Self::CarrierLost => defmt::write!(f, "carrier-lost"),
            Self::SyncMatched => defmt::write!(f, "sync-matched"),
            Self::SyncMissed => defmt::write!(f, "sync-missed"),
            Self::FrameComplete => defmt::write!(f, "frame-complete"),
        }
    }
}

/// Side effect the caller must perform alongside a transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Nothing beyond the state change
    None,
    /// Clear framer, decoder, and both synchronizers for a fresh acquisition
    ResetReceiver,
    /// Begin collecting the frame that follows the matched sync word
    StartFrame,
    /// Clear the framing-lock flag and report the loss
    DropLock,
}

/// Apply an event to the current state, returning the next state and the
/// action to perform
#[must_use]
pub fn apply_event(state: DemodState, event: SyncEvent) -> (DemodState, Action) {
    match (state, event) {
        (DemodState::Unlocked, SyncEvent::CarrierFound) => {
            (DemodState::Sync, Action::ResetReceiver)
        }
        (DemodState::Sync, SyncEvent::CarrierLost) => (DemodState::Unlocked, Action::None),
        (DemodState::Sync, SyncEvent::SyncMatched) => (DemodState::Framing, Action::StartFrame),
        (DemodState::FrameSync { .. }, SyncEvent::CarrierLost) => {
            (DemodState::Unlocked, Action::DropLock)
        }
        (DemodState::FrameSync { .. }, SyncEvent::SyncMatched) => {
            (DemodState::Framing, Action::StartFrame)
        }
        (DemodState::FrameSync { misses }, SyncEvent::SyncMissed) => {
            if misses >= MAX_SYNC_MISSES {
                (DemodState::Unlocked, Action::DropLock)
            } else {
                (DemodState::FrameSync { misses: misses + 1 }, Action::None)
            }
        }
        (DemodState::Framing, SyncEvent::FrameComplete) => {
            (DemodState::FrameSync { misses: 0 }, Action::None)
        }
        // Everything else leaves the state untouched
        (state, _) => (state, Action::None),
    }
}
