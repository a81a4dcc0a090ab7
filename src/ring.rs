//! Fixed-capacity byte ring shared between normal and interrupt context.
//!
//! The ring itself carries no synchronization; every access happens inside
//! a critical section owned by the caller (see [`crate::channel`]). Only
//! `head` and `tail` track occupancy: `head == tail` means empty, which
//! also means a completely full ring is indistinguishable from an empty
//! one. [`RingBuffer::push`] therefore never checks for space (that is
//! the legacy overrun contract) while [`RingBuffer::try_push`] refuses
//! the write that would alias, capping the tracked occupancy at `N - 1`.

pub(crate) struct RingBuffer<const N: usize> {
    data: [u8; N],
    /// Next write position.
    head: usize,
    /// Next read position.
    tail: usize,
}

impl<const N: usize> RingBuffer<N> {
    pub(crate) const fn new() -> Self {
        Self {
            data: [0; N],
            head: 0,
            tail: 0,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Number of buffered bytes, assuming no overrun has occurred.
    pub(crate) fn len(&self) -> usize {
        (self.head + N - self.tail) % N
    }

    /// Number of bytes that can still be pushed without aliasing.
    pub(crate) fn free(&self) -> usize {
        N - 1 - self.len()
    }

    /// Write at `head` and advance it, wrapping at the capacity boundary.
    ///
    /// Does not check for space: pushing into a ring with no free slots
    /// silently overwrites the oldest unread byte and leaves the ring
    /// looking empty.
    pub(crate) fn push(&mut self, byte: u8) {
        self.data[self.head] = byte;
        self.head = (self.head + 1) % N;
    }

    /// Like [`push`](Self::push), but fails instead of aliasing.
    pub(crate) fn try_push(&mut self, byte: u8) -> bool {
        if self.free() == 0 {
            return false;
        }
        self.push(byte);
        true
    }

    /// Read at `tail` and advance it, or `None` when the ring is empty.
    pub(crate) fn pop(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let byte = self.data[self.tail];
        self.tail = (self.tail + 1) % N;
        Some(byte)
    }
}
