//! Fixed-Segment Frame Pool
//!
//! Decoded frames are handed from the sample-rate processing context to
//! consumer tasks without copying the pool itself. A frame is a chain of
//! fixed-size segments loaned out as an [`OwnedFrame`] handle; the chain
//! grows as bytes are appended, and dropping the handle returns every
//! segment at once, so a segment cannot be released twice or leaked while
//! a handle lives.
//!
//! All arena access happens inside critical sections, which makes the pool
//! safe to share between interrupt handlers and thread-mode code.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::config::{SEGMENT_COUNT, SEGMENT_SIZE};

/// Link value marking the end of a chain
const NONE: u8 = u8::MAX;

/// Pool operation failures
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// No free segment available
    Exhausted,
}

#[cfg(feature = "embedded")]
impl defmt::Format for PoolError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Exhausted => defmt::write!(fmt, "pool exhausted"),
        }
    }
}

struct Arena {
    segments: [[u8; SEGMENT_SIZE]; SEGMENT_COUNT],
    /// Forward links, threading both the free list and live frame chains
    next: [u8; SEGMENT_COUNT],
    in_use: [bool; SEGMENT_COUNT],
    free_head: u8,
    free_count: usize,
}

impl Arena {
    fn allocate(&mut self) -> Result<u8, PoolError> {
        if self.free_head == NONE {
            return Err(PoolError::Exhausted);
        }
        let index = self.free_head;
        self.free_head = self.next[usize::from(index)];
        self.next[usize::from(index)] = NONE;
        self.in_use[usize::from(index)] = true;
        self.free_count -= 1;
        Ok(index)
    }

    fn free(&mut self, index: u8) {
        debug_assert!(
            self.in_use[usize::from(index)],
            "segment {} freed while not in use",
            index
        );
        self.in_use[usize::from(index)] = false;
        self.next[usize::from(index)] = self.free_head;
        self.free_head = index;
        self.free_count += 1;
    }
}

/// Pool of fixed-size frame segments
pub struct FramePool {
    arena: Mutex<RefCell<Arena>>,
}

impl FramePool {
    /// Create a pool with every segment free
    #[must_use]
    pub const fn new() -> Self {
        let mut next = [NONE; SEGMENT_COUNT];
        let mut i = 0;
        while i + 1 < SEGMENT_COUNT {
            next[i] = (i + 1) as u8;
            i += 1;
        }
        Self {
            arena: Mutex::new(RefCell::new(Arena {
                segments: [[0; SEGMENT_SIZE]; SEGMENT_COUNT],
                next,
                in_use: [false; SEGMENT_COUNT],
                free_head: 0,
                free_count: SEGMENT_COUNT,
            })),
        }
    }

    /// Start a frame on one free segment
    pub fn acquire(&self) -> Result<OwnedFrame<'_>, PoolError> {
        critical_section::with(|cs| {
            let index = self.arena.borrow_ref_mut(cs).allocate()?;
            Ok(OwnedFrame {
                pool: self,
                head: index,
                tail: index,
                len: 0,
            })
        })
    }

    /// Number of segments currently free
    #[must_use]
    pub fn available(&self) -> usize {
        critical_section::with(|cs| self.arena.borrow_ref(cs).free_count)
    }

    /// Total number of segments
    #[must_use]
    pub const fn capacity(&self) -> usize {
        SEGMENT_COUNT
    }
}

impl Default for FramePool {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive handle to one chain of pool segments.
///
/// The handle is move-only. Dropping it returns the whole chain to the
/// pool, so every acquired segment is released exactly once.
pub struct OwnedFrame<'a> {
    pool: &'a FramePool,
    head: u8,
    tail: u8,
    len: u16,
}

impl OwnedFrame<'_> {
    /// Append bytes, chaining further segments as the current tail fills.
    ///
    /// On exhaustion the bytes that fit are kept; the partial frame stays
    /// valid and releasable.
    pub fn extend(&mut self, data: &[u8]) -> Result<(), PoolError> {
        critical_section::with(|cs| {
            let mut arena = self.pool.arena.borrow_ref_mut(cs);
            let mut remaining = data;
            while !remaining.is_empty() {
                let mut used = usize::from(self.len) % SEGMENT_SIZE;
                if self.len != 0 && used == 0 {
                    // Tail is exactly full; grow the chain
                    let index = arena.allocate()?;
                    arena.next[usize::from(self.tail)] = index;
                    self.tail = index;
                    used = 0;
                }
                let take = remaining.len().min(SEGMENT_SIZE - used);
                let segment = &mut arena.segments[usize::from(self.tail)];
                segment[used..used + take].copy_from_slice(&remaining[..take]);
                self.len += take as u16;
                remaining = &remaining[take..];
            }
            Ok(())
        })
    }

    /// Copy the frame contents into `out`, returning the bytes copied
    pub fn copy_to(&self, out: &mut [u8]) -> usize {
        let n = usize::from(self.len).min(out.len());
        critical_section::with(|cs| {
            let arena = self.pool.arena.borrow_ref(cs);
            let mut index = self.head;
            let mut copied = 0;
            while copied < n {
                let take = (n - copied).min(SEGMENT_SIZE);
                out[copied..copied + take]
                    .copy_from_slice(&arena.segments[usize::from(index)][..take]);
                copied += take;
                index = arena.next[usize::from(index)];
            }
        });
        n
    }

    /// Bytes currently stored
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    /// Whether the frame holds no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes the chain can hold before it has to grow again
    #[must_use]
    pub const fn capacity(&self) -> usize {
        let filled = self.len as usize;
        let segments = if filled == 0 {
            1
        } else {
            filled.div_ceil(SEGMENT_SIZE)
        };
        segments * SEGMENT_SIZE
    }

    /// Return the chain to the pool
    pub fn release(self) {
        // Drop does the work
    }
}

impl Drop for OwnedFrame<'_> {
    fn drop(&mut self) {
        critical_section::with(|cs| {
            let mut arena = self.pool.arena.borrow_ref_mut(cs);
            let mut index = self.head;
            while index != NONE {
                let following = arena.next[usize::from(index)];
                arena.free(index);
                index = following;
            }
        });
    }
}
