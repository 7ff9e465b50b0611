//! Unsynchronized ring buffer for the single-threaded scheduler.

use crate::fifo::{ChannelOverflow, TokenFifo, ring_occupancy};
use std::cell::{Cell, RefCell};

/// Token ring with plain cursors and no synchronization.
///
/// `Cell`/`RefCell` give the `&self` interface the shared contract requires
/// while keeping the type `!Sync`, so handing one of these to another thread
/// is a compile error rather than a data race found in production.
pub struct SequentialChannel {
    token_size: usize,
    /// Ring slots, one reserved: holds at most `capacity - 1` tokens.
    capacity: usize,
    /// Index of the oldest buffered token.
    start: Cell<usize>,
    /// Index one past the newest buffered token.
    end: Cell<usize>,
    tokens: RefCell<Box<[u8]>>,
}

impl TokenFifo for SequentialChannel {
    fn with_capacity(token_size: usize, capacity: usize) -> Self {
        assert!(capacity >= 2, "ring needs a data slot plus the reserved slot");
        Self {
            token_size,
            capacity,
            start: Cell::new(0),
            end: Cell::new(0),
            tokens: RefCell::new(vec![0u8; capacity * token_size].into_boxed_slice()),
        }
    }

    fn push(&self, token: &[u8]) -> Result<(), ChannelOverflow> {
        debug_assert_eq!(token.len(), self.token_size);
        let end = self.end.get();
        let next = (end + 1) % self.capacity;
        if next == self.start.get() {
            return Err(ChannelOverflow);
        }
        let offset = end * self.token_size;
        self.tokens.borrow_mut()[offset..offset + self.token_size].copy_from_slice(token);
        self.end.set(next);
        Ok(())
    }

    fn pop(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), self.token_size);
        let start = self.start.get();
        assert!(start != self.end.get(), "pop from empty channel");
        let offset = start * self.token_size;
        out.copy_from_slice(&self.tokens.borrow()[offset..offset + self.token_size]);
        self.start.set((start + 1) % self.capacity);
    }

    fn occupancy(&self) -> usize {
        ring_occupancy(self.start.get(), self.end.get(), self.capacity)
    }

    fn token_size(&self) -> usize {
        self.token_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order_with_wraparound() {
        let channel = SequentialChannel::with_capacity(4, 4); // 3 data slots
        let mut out = [0u8; 4];

        for round in 0u32..10 {
            channel.push(&round.to_ne_bytes()).unwrap();
            channel.push(&(round + 100).to_ne_bytes()).unwrap();
            assert_eq!(channel.occupancy(), 2);

            channel.pop(&mut out);
            assert_eq!(u32::from_ne_bytes(out), round);
            channel.pop(&mut out);
            assert_eq!(u32::from_ne_bytes(out), round + 100);
            assert_eq!(channel.occupancy(), 0);
        }
    }

    #[test]
    fn full_ring_rejects_push() {
        let channel = SequentialChannel::with_capacity(1, 3); // 2 data slots
        channel.push(&[1]).unwrap();
        channel.push(&[2]).unwrap();
        assert_eq!(channel.push(&[3]), Err(ChannelOverflow));
        assert_eq!(channel.occupancy(), 2);

        // Draining one slot makes room again.
        let mut out = [0u8; 1];
        channel.pop(&mut out);
        assert_eq!(out, [1]);
        channel.push(&[3]).unwrap();
    }

    #[test]
    #[should_panic(expected = "pop from empty channel")]
    fn empty_pop_is_a_protocol_violation() {
        let channel = SequentialChannel::with_capacity(1, 3);
        let mut out = [0u8; 1];
        channel.pop(&mut out);
    }
}
