//! Byte accumulator that grows like a dynamic array until `max_size` and then
//! behaves like a circular buffer, overwriting the oldest bytes.
//!
//! # Invariants
//! - `buf.len() <= max_size`; `buf.len()` is the allocated capacity.
//! - `Mode::Growing`: logical content is `buf[..pos]`.
//! - `Mode::Wrapping`: `buf.len() == max_size` and logical content is
//!   `buf[pos..] ++ buf[..pos]`, so `pos` is the oldest retained byte.
//! - `written` only grows, saturating at `u64::MAX`.

use std::io;

use crate::error::RingError;

/// Growing factor of the underlying storage.
const EXPANSION_FACTOR: usize = 2;

/// Write behaviour of a [`RingBuffer`].
///
/// The transition is one-way: once the storage has been filled to
/// `max_size` the buffer stays in `Wrapping` until [`RingBuffer::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Growing,
    Wrapping,
}

/// Variable-sized byte buffer with a maximum size.
///
/// Memory is only allocated as content arrives, doubling each time, and never
/// beyond `max_size`. After the limit is reached it retains only the last
/// `max_size` bytes written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingBuffer {
    buf: Vec<u8>,
    pos: usize,
    written: u64,
    mode: Mode,
    max_size: usize,
}

impl RingBuffer {
    /// Creates a buffer with `initial_size` bytes pre-allocated.
    ///
    /// `initial_size` is clamped to `max_size`.
    pub fn new(initial_size: usize, max_size: usize) -> Self {
        Self {
            buf: vec![0u8; initial_size.min(max_size)],
            pos: 0,
            written: 0,
            mode: Mode::Growing,
            max_size,
        }
    }

    /// Like [`RingBuffer::new`], but reports a failed initial allocation
    /// instead of aborting.
    pub fn try_new(initial_size: usize, max_size: usize) -> Result<Self, RingError> {
        let mut ring = Self {
            buf: Vec::new(),
            pos: 0,
            written: 0,
            mode: Mode::Growing,
            max_size,
        };
        ring.resize_storage(initial_size.min(max_size))?;
        Ok(ring)
    }

    /// Bytes currently allocated for the storage. Never above `max_size`.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn max_capacity(&self) -> usize {
        self.max_size
    }

    /// Total bytes ever submitted, including the ones already overwritten.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_wrapped(&self) -> bool {
        self.mode == Mode::Wrapping
    }

    /// Length of the logical content.
    pub fn len(&self) -> usize {
        match self.mode {
            Mode::Growing => self.pos,
            Mode::Wrapping => self.buf.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends `p`, growing the storage as needed.
    ///
    /// Always accepts the whole input and returns `p.len()`. The only failure
    /// is an allocation error while growing, in which case nothing is written.
    pub fn write(&mut self, p: &[u8]) -> Result<usize, RingError> {
        if p.is_empty() {
            return Ok(0);
        }
        match self.mode {
            Mode::Growing => self.write_linear(p),
            Mode::Wrapping => Ok(self.write_ring(p)),
        }
    }

    /// Copies `p` at `pos`, expanding the storage when it does not fit.
    ///
    /// If the storage is capped below what `p` needs, the buffer switches to
    /// ring mode and the whole write is handed to `write_ring`.
    fn write_linear(&mut self, p: &[u8]) -> Result<usize, RingError> {
        let end = self.pos.saturating_add(p.len());
        if self.buf.len() < end {
            self.grow(end)?;
        }

        if self.buf.len() >= end {
            self.buf[self.pos..end].copy_from_slice(p);
            self.pos = end;
            self.add_written(p.len());
            if self.pos == self.max_size {
                self.enter_wrapping();
                self.pos = 0;
            }
            return Ok(p.len());
        }

        self.enter_wrapping();
        Ok(self.write_ring(p))
    }

    /// Copies `p` from `pos` to the end of the storage and wraps the
    /// remainder to the start, overwriting the oldest content.
    fn write_ring(&mut self, p: &[u8]) -> usize {
        let size = self.buf.len();

        // Everything before the last `size` bytes would be overwritten anyway.
        if p.len() > size {
            self.buf.copy_from_slice(&p[p.len() - size..]);
            self.pos = 0;
            self.add_written(p.len());
            return p.len();
        }

        let pos = self.pos;
        let head = (size - pos).min(p.len());
        self.buf[pos..pos + head].copy_from_slice(&p[..head]);

        let rest = &p[head..];
        self.buf[..rest.len()].copy_from_slice(rest);

        self.pos = if rest.is_empty() { pos + head } else { rest.len() };
        if self.pos == size {
            self.pos = 0;
        }
        self.add_written(p.len());
        p.len()
    }

    /// Expands the storage so it can hold at least `size` bytes.
    ///
    /// The current size (or 1 when empty) is doubled until it reaches `size`,
    /// then clamped to `max_size`. Existing content keeps its position.
    ///
    /// Calling this is never required. It is useful when the expected volume
    /// is known up front, to avoid repeated grow-and-copy on writes.
    pub fn grow(&mut self, size: usize) -> Result<(), RingError> {
        let current = self.buf.len();
        let mut new_size = current.max(1);
        while new_size < size && new_size < self.max_size {
            new_size = new_size.saturating_mul(EXPANSION_FACTOR);
        }
        if new_size >= self.max_size {
            new_size = self.max_size;
        }
        if new_size <= current {
            return Ok(());
        }

        self.resize_storage(new_size)?;
        tracing::debug!(
            from = current,
            to = new_size,
            max = self.max_size,
            "ring storage grown"
        );
        Ok(())
    }

    fn resize_storage(&mut self, new_size: usize) -> Result<(), RingError> {
        let additional = new_size.saturating_sub(self.buf.len());
        if let Err(e) = self.buf.try_reserve_exact(additional) {
            tracing::warn!(requested = new_size, "ring storage allocation failed: {}", e);
            return Err(RingError::alloc(new_size, e));
        }
        self.buf.resize(new_size, 0);
        Ok(())
    }

    fn enter_wrapping(&mut self) {
        tracing::debug!(
            max = self.max_size,
            written = self.written,
            "ring buffer full, overwriting oldest content"
        );
        self.mode = Mode::Wrapping;
    }

    fn add_written(&mut self, n: usize) {
        self.written = self.written.saturating_add(n as u64);
    }

    /// Logical content as two slices, oldest first.
    ///
    /// The second slice is empty unless the content wraps around the end of
    /// the storage.
    pub fn as_slices(&self) -> (&[u8], &[u8]) {
        match self.mode {
            Mode::Growing => (&self.buf[..self.pos], &[]),
            Mode::Wrapping => (&self.buf[self.pos..], &self.buf[..self.pos]),
        }
    }

    /// Copies the logical content, oldest first, into a new vector.
    pub fn bytes(&self) -> Vec<u8> {
        let (front, back) = self.as_slices();
        let mut out = Vec::with_capacity(front.len() + back.len());
        out.extend_from_slice(front);
        out.extend_from_slice(back);
        out
    }

    /// Streams the logical content into `w` without materializing it.
    pub fn copy_to<W: io::Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        let (front, back) = self.as_slices();
        w.write_all(front)?;
        w.write_all(back)
    }

    /// Drops the content but keeps the allocated storage for reuse.
    pub fn reset(&mut self) {
        tracing::trace!(capacity = self.buf.len(), "ring buffer reset");
        self.pos = 0;
        self.written = 0;
        self.mode = Mode::Growing;
    }

    /// Frees the storage and zeroes every field, including `max_size`.
    ///
    /// The buffer must not be used afterwards.
    pub fn close(&mut self) {
        tracing::trace!(capacity = self.buf.len(), "ring buffer closed");
        self.buf = Vec::new();
        self.pos = 0;
        self.written = 0;
        self.mode = Mode::Growing;
        self.max_size = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ring(buf: &[u8], pos: usize, written: u64, mode: Mode, max_size: usize) -> RingBuffer {
        RingBuffer {
            buf: buf.to_vec(),
            pos,
            written,
            mode,
            max_size,
        }
    }

    #[test]
    fn test_new() {
        assert_eq!(
            RingBuffer::new(10, 20),
            ring(&[0; 10], 0, 0, Mode::Growing, 20)
        );
    }

    #[test]
    fn test_new_clamps_initial_size() {
        assert_eq!(
            RingBuffer::new(20, 10),
            ring(&[0; 10], 0, 0, Mode::Growing, 10)
        );
        assert_eq!(RingBuffer::try_new(20, 10).unwrap(), RingBuffer::new(20, 10));
    }

    #[test]
    fn test_try_new_reports_failed_initial_allocation() {
        let err = RingBuffer::try_new(usize::MAX, usize::MAX).unwrap_err();
        assert!(matches!(err, RingError::Alloc { requested, .. } if requested == usize::MAX));
    }

    #[test]
    fn test_write_table() {
        let cases: &[(&str, &[u8], RingBuffer)] = &[
            ("empty slice", b"", ring(&[0, 0, 0], 0, 0, Mode::Growing, 7)),
            ("less than size", b"a", ring(b"a\0\0", 1, 1, Mode::Growing, 7)),
            ("fill length, no grow", b"abc", ring(b"abc", 3, 3, Mode::Growing, 7)),
            (
                "more than size, grow double",
                b"abcde",
                ring(b"abcde\0", 5, 5, Mode::Growing, 7),
            ),
            (
                "fill cap, grow at max",
                b"abcdefg",
                ring(b"abcdefg", 0, 7, Mode::Wrapping, 7),
            ),
            (
                "exceed cap, grow at max",
                b"abcdefghijk",
                ring(b"efghijk", 0, 11, Mode::Wrapping, 7),
            ),
            (
                "exceed cap many times",
                b"abcdefghijklmnopqrstuvwxyz",
                ring(b"tuvwxyz", 0, 26, Mode::Wrapping, 7),
            ),
        ];

        for (name, input, want) in cases {
            let mut got = RingBuffer::new(3, 7);
            let n = got.write(input).unwrap();
            assert_eq!(n, input.len(), "{name}");
            assert_eq!(&got, want, "{name}");
        }
    }

    #[test]
    fn test_transition_write_wraps_from_cursor() {
        // 4 bytes held, room capped at 7: the write fills and overflows at once.
        let mut r = RingBuffer::new(4, 7);
        r.write(b"abcd").unwrap();
        r.write(b"12345").unwrap();

        assert_eq!(r, ring(b"45cd123", 2, 9, Mode::Wrapping, 7));
        assert_eq!(r.bytes(), b"cd12345");
    }

    #[test]
    fn test_wrapped_write_without_wrap_around() {
        let mut r = ring(b"abcdefg", 2, 9, Mode::Wrapping, 7);
        assert_eq!(r.write(b"123").unwrap(), 3);

        assert_eq!(r, ring(b"ab123fg", 5, 12, Mode::Wrapping, 7));
        assert_eq!(r.bytes(), b"fgab123");
    }

    #[test]
    fn test_wrapped_write_ending_at_storage_end() {
        let mut r = ring(b"abcdefg", 5, 7, Mode::Wrapping, 7);
        r.write(b"XY").unwrap();

        assert_eq!(r.pos, 0);
        assert_eq!(r.bytes(), b"abcdeXY");
    }

    #[test]
    fn test_wrapped_write_exactly_max() {
        let mut r = ring(b"abcdefg", 3, 7, Mode::Wrapping, 7);
        r.write(b"hijklmn").unwrap();

        assert_eq!(r.bytes(), b"hijklmn");
        assert_eq!(r.written, 14);
    }

    #[test]
    fn test_grow_schedule() {
        let mut r = RingBuffer::new(0, 100);
        r.grow(5).unwrap();
        assert_eq!(r.capacity(), 8);
        r.grow(9).unwrap();
        assert_eq!(r.capacity(), 16);
        r.grow(3).unwrap();
        assert_eq!(r.capacity(), 16);
        r.grow(65).unwrap();
        assert_eq!(r.capacity(), 100);
        r.grow(1000).unwrap();
        assert_eq!(r.capacity(), 100);
    }

    #[test]
    fn test_grow_keeps_prefix() {
        let mut r = RingBuffer::new(2, 50);
        r.write(b"hi").unwrap();
        r.grow(20).unwrap();

        assert_eq!(&r.buf[..2], b"hi");
        assert_eq!(r.capacity(), 32);
        assert_eq!(r.bytes(), b"hi");
    }

    #[test]
    fn test_grow_allocation_failure_leaves_state() {
        let mut r = RingBuffer::new(4, usize::MAX);
        r.write(b"abc").unwrap();
        let before = r.clone();

        let err = r.grow(usize::MAX).unwrap_err();
        assert!(matches!(err, RingError::Alloc { requested, .. } if requested == usize::MAX));
        assert_eq!(r, before);
    }

    #[test]
    fn test_zero_max_size_counts_only() {
        let mut r = RingBuffer::new(5, 0);
        assert_eq!(r.write(b"abc").unwrap(), 3);

        assert_eq!(r.capacity(), 0);
        assert_eq!(r.written(), 3);
        assert!(r.is_wrapped());
        assert!(r.bytes().is_empty());
    }

    #[test]
    fn test_written_saturates() {
        let mut r = ring(b"abc", 0, u64::MAX - 1, Mode::Wrapping, 3);
        r.write(b"xyz").unwrap();
        assert_eq!(r.written(), u64::MAX);
    }

    #[test]
    fn test_reset_and_close() {
        let mut r = RingBuffer::new(3, 7);
        r.write(b"abcdefghij").unwrap();

        r.reset();
        assert_eq!(r, ring(b"defghij", 0, 0, Mode::Growing, 7));

        r.close();
        assert_eq!(r, ring(b"", 0, 0, Mode::Growing, 0));
        r.close();
        assert_eq!(r, ring(b"", 0, 0, Mode::Growing, 0));
    }
}
