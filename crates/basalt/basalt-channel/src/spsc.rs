//! Lock-free single-producer/single-consumer token ring.
//!
//! This is the synchronization primitive of the parallel scheduler: one
//! worker thread pushes, one worker thread pops, and no other cross-thread
//! state exists between them.
//!
//! # Protocol
//!
//! **Producer (`push`):**
//! 1. Load its own `end` cursor (Relaxed — nobody else writes it)
//! 2. Load `start` with Acquire and assert the ring is not full
//! 3. Write the token payload with plain stores
//! 4. Publish the advanced `end` with Release
//!
//! **Consumer (`pop`):**
//! 1. Load its own `start` cursor (Relaxed)
//! 2. Load `end` with Acquire and assert the ring is not empty
//! 3. Copy the token payload out with plain loads
//! 4. Publish the advanced `start` with Release
//!
//! # Memory Ordering
//!
//! The consumer's Acquire load of `end` synchronizes with the producer's
//! Release store, so every payload byte written before the publish is visible
//! before it is read. Symmetrically, the producer's Acquire load of `start`
//! guarantees the consumer has finished reading a slot before it is reused.
//! Each side mutates only its own cursor, which is what makes the plain
//! payload accesses race-free.

use crate::fifo::{ChannelOverflow, TokenFifo, ring_occupancy};
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Token ring shared by exactly one producer thread and one consumer thread.
///
/// The storage is a flat `UnsafeCell` byte slab; the cursor protocol above is
/// the only thing that makes the unsynchronized payload copies sound, so the
/// one-thread-per-side requirement is a hard contract, not a suggestion.
/// Fan-out never shares a ring: each extra destination gets its own channel.
pub struct SpscChannel {
    token_size: usize,
    /// Ring slots, one reserved: holds at most `capacity - 1` tokens.
    capacity: usize,
    /// Consumer cursor: index of the oldest buffered token.
    start: AtomicUsize,
    /// Producer cursor: index one past the newest buffered token.
    end: AtomicUsize,
    tokens: Box<[UnsafeCell<u8>]>,
}

// SAFETY: the cursor protocol partitions the slab — slots in [start, end) are
// read only by the consumer, slots outside it are written only by the
// producer, and the Acquire/Release pair on each cursor orders the handover.
unsafe impl Send for SpscChannel {}
unsafe impl Sync for SpscChannel {}

impl SpscChannel {
    #[inline]
    fn slot_ptr(&self, index: usize) -> *mut u8 {
        debug_assert!(index < self.capacity);
        self.tokens[index * self.token_size].get()
    }
}

impl TokenFifo for SpscChannel {
    fn with_capacity(token_size: usize, capacity: usize) -> Self {
        assert!(capacity >= 2, "ring needs a data slot plus the reserved slot");
        let tokens = (0..capacity * token_size)
            .map(|_| UnsafeCell::new(0u8))
            .collect();
        Self {
            token_size,
            capacity,
            start: AtomicUsize::new(0),
            end: AtomicUsize::new(0),
            tokens,
        }
    }

    fn push(&self, token: &[u8]) -> Result<(), ChannelOverflow> {
        debug_assert_eq!(token.len(), self.token_size);
        let end = self.end.load(Ordering::Relaxed);
        let next = (end + 1) % self.capacity;
        // Acquire pairs with the consumer's Release in pop: once we observe
        // start has moved past a slot, the consumer is done reading it.
        if next == self.start.load(Ordering::Acquire) {
            return Err(ChannelOverflow);
        }
        // SAFETY: slot `end` is outside [start, end), so only this producer
        // thread touches it until the Release store below publishes it.
        unsafe {
            std::ptr::copy_nonoverlapping(token.as_ptr(), self.slot_ptr(end), self.token_size);
        }
        self.end.store(next, Ordering::Release);
        Ok(())
    }

    fn pop(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), self.token_size);
        let start = self.start.load(Ordering::Relaxed);
        // Acquire pairs with the producer's Release publish of `end`,
        // making the payload written before it visible to this thread.
        let end = self.end.load(Ordering::Acquire);
        assert!(start != end, "pop from empty channel");
        // SAFETY: slot `start` is inside [start, end), so only this consumer
        // thread touches it until the Release store below returns it.
        unsafe {
            std::ptr::copy_nonoverlapping(self.slot_ptr(start), out.as_mut_ptr(), self.token_size);
        }
        self.start.store((start + 1) % self.capacity, Ordering::Release);
    }

    fn occupancy(&self) -> usize {
        let start = self.start.load(Ordering::Acquire);
        let end = self.end.load(Ordering::Acquire);
        ring_occupancy(start, end, self.capacity)
    }

    fn token_size(&self) -> usize {
        self.token_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn fifo_order_single_thread() {
        let channel = SpscChannel::with_capacity(8, 5);
        let mut out = [0u8; 8];

        for value in 0u64..20 {
            channel.push(&value.to_ne_bytes()).unwrap();
            channel.push(&(value * 3).to_ne_bytes()).unwrap();
            channel.pop(&mut out);
            assert_eq!(u64::from_ne_bytes(out), value);
            channel.pop(&mut out);
            assert_eq!(u64::from_ne_bytes(out), value * 3);
        }
        assert_eq!(channel.occupancy(), 0);
    }

    #[test]
    fn full_ring_rejects_push() {
        let channel = SpscChannel::with_capacity(2, 3);
        channel.push(&[1, 1]).unwrap();
        channel.push(&[2, 2]).unwrap();
        assert_eq!(channel.push(&[3, 3]), Err(ChannelOverflow));
    }

    /// Streams 100k tokens through a deliberately small ring while both
    /// sides run concurrently. Any publication bug shows up as a torn or
    /// out-of-order value; any cursor bug shows up as a lost token.
    #[test]
    fn concurrent_stream_preserves_order_and_payload() {
        const TOKENS: u64 = 100_000;
        let channel = Arc::new(SpscChannel::with_capacity(8, 16));

        let producer = {
            let channel = Arc::clone(&channel);
            std::thread::spawn(move || {
                for value in 0..TOKENS {
                    loop {
                        match channel.push(&value.to_ne_bytes()) {
                            Ok(()) => break,
                            Err(ChannelOverflow) => std::hint::spin_loop(),
                        }
                    }
                }
            })
        };

        let consumer = {
            let channel = Arc::clone(&channel);
            std::thread::spawn(move || {
                let mut out = [0u8; 8];
                for expected in 0..TOKENS {
                    while channel.occupancy() == 0 {
                        std::hint::spin_loop();
                    }
                    channel.pop(&mut out);
                    assert_eq!(u64::from_ne_bytes(out), expected);
                }
            })
        };

        producer.join().unwrap();
        consumer.join().unwrap();
        assert_eq!(channel.occupancy(), 0);
    }
}
