//! Frame Pool Tests
//!
//! These tests run on the host with std feature enabled.
//! Run with: cargo test --no-default-features --features std

use m17_tnc::config::{SEGMENT_COUNT, SEGMENT_SIZE};
use m17_tnc::frame::{FramePool, PoolError};

// =============================================================================
// Accounting Tests
// =============================================================================

#[test]
fn test_fresh_pool_is_fully_available() {
    let pool = FramePool::new();
    assert_eq!(pool.capacity(), SEGMENT_COUNT);
    assert_eq!(pool.available(), SEGMENT_COUNT);
}

#[test]
fn test_acquire_decrements_available() {
    let pool = FramePool::new();
    let frame = pool.acquire().unwrap();
    assert_eq!(pool.available(), SEGMENT_COUNT - 1);
    drop(frame);
    assert_eq!(pool.available(), SEGMENT_COUNT);
}

#[test]
fn test_explicit_release_returns_segment() {
    let pool = FramePool::new();
    let frame = pool.acquire().unwrap();
    frame.release();
    assert_eq!(pool.available(), SEGMENT_COUNT);
}

#[test]
fn test_exhaustion_reports_error() {
    let pool = FramePool::new();
    let mut held = Vec::new();
    for _ in 0..SEGMENT_COUNT {
        held.push(pool.acquire().unwrap());
    }
    assert_eq!(pool.available(), 0);
    assert_eq!(pool.acquire().err(), Some(PoolError::Exhausted));

    // Releasing one segment makes acquisition possible again
    held.pop();
    assert_eq!(pool.available(), 1);
    assert!(pool.acquire().is_ok());
}

#[test]
fn test_interleaved_acquire_release() {
    let pool = FramePool::new();
    for _ in 0..100 {
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        drop(a);
        let c = pool.acquire().unwrap();
        drop(b);
        drop(c);
    }
    assert_eq!(pool.available(), SEGMENT_COUNT);
}

// =============================================================================
// Data Tests
// =============================================================================

#[test]
fn test_extend_and_copy_roundtrip() {
    let pool = FramePool::new();
    let mut frame = pool.acquire().unwrap();

    let data = [0xDE, 0xAD, 0xBE, 0xEF];
    frame.extend(&data).unwrap();
    assert_eq!(frame.len(), 4);
    assert!(!frame.is_empty());

    let mut out = [0u8; 8];
    let n = frame.copy_to(&mut out);
    assert_eq!(n, 4);
    assert_eq!(&out[..4], &data);
}

#[test]
fn test_incremental_extend_appends() {
    let pool = FramePool::new();
    let mut frame = pool.acquire().unwrap();

    frame.extend(&[1, 2]).unwrap();
    frame.extend(&[3, 4, 5]).unwrap();
    assert_eq!(frame.len(), 5);

    let mut out = [0u8; 5];
    frame.copy_to(&mut out);
    assert_eq!(out, [1, 2, 3, 4, 5]);
}

#[test]
fn test_fresh_frame_is_empty() {
    let pool = FramePool::new();
    let frame = pool.acquire().unwrap();
    assert_eq!(frame.len(), 0);
    assert!(frame.is_empty());
}

#[test]
fn test_frames_hold_independent_data() {
    let pool = FramePool::new();
    let mut a = pool.acquire().unwrap();
    let mut b = pool.acquire().unwrap();

    a.extend(&[0x11; 8]).unwrap();
    b.extend(&[0x22; 8]).unwrap();

    let mut out_a = [0u8; 8];
    let mut out_b = [0u8; 8];
    a.copy_to(&mut out_a);
    b.copy_to(&mut out_b);
    assert_eq!(out_a, [0x11; 8]);
    assert_eq!(out_b, [0x22; 8]);
}

#[test]
fn test_copy_to_truncates_to_target() {
    let pool = FramePool::new();
    let mut frame = pool.acquire().unwrap();
    frame.extend(&[9, 8, 7, 6]).unwrap();

    let mut small = [0u8; 2];
    let n = frame.copy_to(&mut small);
    assert_eq!(n, 2);
    assert_eq!(small, [9, 8]);
}

// =============================================================================
// Segment Chaining Tests
// =============================================================================

#[test]
fn test_extend_chains_across_segments() {
    let pool = FramePool::new();
    let mut frame = pool.acquire().unwrap();

    let mut data = [0u8; SEGMENT_SIZE + 10];
    for (i, b) in data.iter_mut().enumerate() {
        *b = i as u8;
    }
    frame.extend(&data).unwrap();
    assert_eq!(frame.len(), SEGMENT_SIZE + 10);
    // Head plus one chained segment
    assert_eq!(pool.available(), SEGMENT_COUNT - 2);

    let mut out = [0u8; SEGMENT_SIZE + 10];
    assert_eq!(frame.copy_to(&mut out), SEGMENT_SIZE + 10);
    assert_eq!(out, data);
}

#[test]
fn test_incremental_extend_spans_a_boundary() {
    let pool = FramePool::new();
    let mut frame = pool.acquire().unwrap();

    frame.extend(&[0x11; SEGMENT_SIZE - 4]).unwrap();
    frame.extend(&[0x22; 8]).unwrap();
    assert_eq!(frame.len(), SEGMENT_SIZE + 4);

    let mut out = [0u8; SEGMENT_SIZE + 4];
    frame.copy_to(&mut out);
    assert!(out[..SEGMENT_SIZE - 4].iter().all(|&b| b == 0x11));
    assert!(out[SEGMENT_SIZE - 4..].iter().all(|&b| b == 0x22));
}

#[test]
fn test_segment_allocation_is_lazy_at_the_boundary() {
    let pool = FramePool::new();
    let mut frame = pool.acquire().unwrap();

    // An exactly full tail does not reserve the next segment yet
    frame.extend(&[0u8; SEGMENT_SIZE]).unwrap();
    assert_eq!(pool.available(), SEGMENT_COUNT - 1);

    frame.extend(&[1]).unwrap();
    assert_eq!(pool.available(), SEGMENT_COUNT - 2);
}

#[test]
fn test_capacity_tracks_the_chain() {
    let pool = FramePool::new();
    let mut frame = pool.acquire().unwrap();
    assert_eq!(frame.capacity(), SEGMENT_SIZE);

    frame.extend(&[0u8; SEGMENT_SIZE]).unwrap();
    assert_eq!(frame.capacity(), SEGMENT_SIZE);

    frame.extend(&[1]).unwrap();
    assert_eq!(frame.capacity(), 2 * SEGMENT_SIZE);
}

#[test]
fn test_chained_frame_releases_every_segment() {
    let pool = FramePool::new();
    let mut frame = pool.acquire().unwrap();
    frame.extend(&[0x5A; 3 * SEGMENT_SIZE]).unwrap();
    assert_eq!(pool.available(), SEGMENT_COUNT - 3);

    frame.release();
    assert_eq!(pool.available(), SEGMENT_COUNT);
}

#[test]
fn test_exhaustion_mid_extend_keeps_the_partial_frame() {
    let pool = FramePool::new();
    let mut held = Vec::new();
    for _ in 0..SEGMENT_COUNT - 1 {
        held.push(pool.acquire().unwrap());
    }

    let mut frame = pool.acquire().unwrap();
    assert_eq!(pool.available(), 0);

    // Only one segment's worth can land before the chain fails to grow
    let data = [0xC3u8; 2 * SEGMENT_SIZE];
    assert_eq!(frame.extend(&data), Err(PoolError::Exhausted));
    assert_eq!(frame.len(), SEGMENT_SIZE);

    let mut out = [0u8; SEGMENT_SIZE];
    assert_eq!(frame.copy_to(&mut out), SEGMENT_SIZE);
    assert!(out.iter().all(|&b| b == 0xC3));

    // The partial frame still releases cleanly
    frame.release();
    assert_eq!(pool.available(), 1);
}

#[test]
fn test_recycled_segment_starts_empty() {
    let pool = FramePool::new();
    let mut frame = pool.acquire().unwrap();
    frame.extend(&[0xFF; 16]).unwrap();
    frame.release();

    // The recycled segment may keep old bytes, but the handle must not
    // expose them
    let frame = pool.acquire().unwrap();
    assert_eq!(frame.len(), 0);
    let mut out = [0u8; 16];
    assert_eq!(frame.copy_to(&mut out), 0);
}
