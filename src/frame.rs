//! Frame Management
//!
//! Link-layer frame handling: a fixed-segment buffer pool shared between
//! interrupt and task context, and the decoder that turns a frame of soft
//! bits into checked payload bytes.

pub mod decoder;
pub mod pool;

pub use decoder::{Decoded, FrameDecoder};
pub use pool::{FramePool, OwnedFrame, PoolError};
