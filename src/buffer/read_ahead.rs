//! Adaptive read-ahead buffer with line reassembly.

use std::io;

use bytes::{Buf, Bytes, BytesMut};

use crate::config::BufferConfig;
use crate::stream::RawStream;
use crate::util::find_line_end;

/// Outcome of a single raw read into the buffer's free tail.
#[derive(Debug, Clone, Copy)]
struct Filled {
    read: usize,
    offered: usize,
}

impl Filled {
    /// A read that returned less than the space offered hit end-of-stream.
    fn exhausted(&self) -> bool {
        self.read < self.offered
    }
}

/// Doubles `current`, saturating at `max` (also on overflow).
fn doubled_capacity(current: usize, max: usize) -> usize {
    current.checked_mul(2).map_or(max, |c| c.min(max))
}

/// A growable sliding window over a raw stream.
///
/// Valid bytes live in `storage[read_cursor..write_cursor]`; everything
/// outside that range is stale and never handed out.
///
/// # Invariants
///
/// `0 <= read_cursor <= write_cursor <= capacity <= max_capacity`, where
/// `capacity == storage.len()`.
///
/// Storage is allocated on the first fill, doubles (capped at
/// `max_capacity`) while a line does not fit, and never shrinks.
/// [`invalidate`](Self::invalidate) discards buffered bytes without
/// releasing memory.
///
/// A record longer than `max_capacity` is gathered in `pending` outside the
/// window. If a raw read fails part way, the gathered bytes stay there and
/// the next [`next_line`](Self::next_line) carries on from them.
#[derive(Debug)]
pub struct ReadAheadBuffer {
    storage: Vec<u8>,
    pending: BytesMut,
    initial_capacity: usize,
    max_capacity: usize,
    read_cursor: usize,
    write_cursor: usize,
}

impl ReadAheadBuffer {
    /// Creates an empty buffer. No memory is allocated until the first fill.
    pub fn new(config: BufferConfig) -> Self {
        Self {
            storage: Vec::new(),
            pending: BytesMut::new(),
            initial_capacity: config.initial_capacity(),
            max_capacity: config.max_capacity(),
            read_cursor: 0,
            write_cursor: 0,
        }
    }

    /// Current capacity in bytes (zero before the first fill).
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Capacity allocated by the first fill.
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Upper bound on capacity.
    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// Number of buffered, unconsumed bytes, including a partially
    /// gathered record.
    pub fn remaining(&self) -> usize {
        self.pending.len() + self.window_len()
    }

    /// Returns true if there are no buffered bytes.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn window_len(&self) -> usize {
        self.write_cursor - self.read_cursor
    }

    /// The unconsumed bytes in the read-ahead window.
    ///
    /// Excludes a partially gathered over-long record.
    pub fn buffered(&self) -> &[u8] {
        &self.storage[self.read_cursor..self.write_cursor]
    }

    /// Bytes of an over-long record gathered before a failed raw read.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Discards buffered bytes, keeping the allocation.
    pub fn invalidate(&mut self) {
        self.pending.clear();
        self.read_cursor = 0;
        self.write_cursor = 0;
    }

    /// Copies up to `dest.len()` buffered bytes into `dest` and consumes them,
    /// oldest first.
    pub fn drain(&mut self, dest: &mut [u8]) -> usize {
        let from_pending = dest.len().min(self.pending.len());
        dest[..from_pending].copy_from_slice(&self.pending[..from_pending]);
        self.pending.advance(from_pending);

        let dest = &mut dest[from_pending..];
        let n = dest.len().min(self.window_len());
        dest[..n].copy_from_slice(&self.storage[self.read_cursor..self.read_cursor + n]);
        self.read_cursor += n;
        from_pending + n
    }

    /// Shifts the unconsumed bytes to the start of storage.
    fn compact(&mut self) {
        if self.read_cursor > 0 {
            let len = self.window_len();
            self.storage
                .copy_within(self.read_cursor..self.write_cursor, 0);
            self.read_cursor = 0;
            self.write_cursor = len;
        }
    }

    fn fill_inner<S: RawStream + ?Sized>(&mut self, stream: &mut S) -> io::Result<Filled> {
        if self.storage.is_empty() {
            self.storage = vec![0; self.initial_capacity];
        } else {
            self.compact();
        }

        let offered = self.storage.len() - self.write_cursor;
        if offered == 0 {
            return Ok(Filled { read: 0, offered });
        }

        let read = stream.read_raw(&mut self.storage[self.write_cursor..])?;
        debug_assert!(read <= offered);
        self.write_cursor += read;
        log::trace!("filled {} of {} free bytes", read, offered);
        Ok(Filled { read, offered })
    }

    /// Compacts, then issues one raw read into the free tail.
    ///
    /// Returns the bytes read. Zero means end-of-stream, or that the buffer
    /// is full of unconsumed bytes (in which case no raw read is issued).
    pub fn fill<S: RawStream + ?Sized>(&mut self, stream: &mut S) -> io::Result<usize> {
        self.fill_inner(stream).map(|f| f.read)
    }

    /// Moves the backlog into storage of twice the capacity (capped at
    /// `max_capacity`). A no-op before the first fill or at the cap.
    fn grow(&mut self) {
        let capacity = self.capacity();
        if capacity == 0 || capacity >= self.max_capacity {
            return;
        }

        let new_capacity = doubled_capacity(capacity, self.max_capacity);
        let len = self.window_len();
        let mut storage = vec![0; new_capacity];
        storage[..len].copy_from_slice(self.buffered());

        self.storage = storage;
        self.read_cursor = 0;
        self.write_cursor = len;
        log::trace!("grew buffer from {} to {} bytes", capacity, new_capacity);
    }

    fn grow_and_fill_inner<S: RawStream + ?Sized>(
        &mut self,
        stream: &mut S,
    ) -> io::Result<Filled> {
        self.grow();
        self.fill_inner(stream)
    }

    /// Grows the buffer if below `max_capacity`, then fills it.
    ///
    /// The fill happens whether or not growth did.
    pub fn grow_and_fill<S: RawStream + ?Sized>(&mut self, stream: &mut S) -> io::Result<usize> {
        self.grow_and_fill_inner(stream).map(|f| f.read)
    }

    /// Consumes and returns the next `len` buffered bytes.
    fn take(&mut self, len: usize) -> Bytes {
        let line = Bytes::copy_from_slice(&self.storage[self.read_cursor..self.read_cursor + len]);
        self.read_cursor += len;
        line
    }

    /// Looks for a line end past the first `scanned` buffered bytes, which
    /// are already known not to hold one.
    fn take_line_after(&mut self, scanned: usize, filled: Filled) -> Option<Bytes> {
        let start = self.read_cursor + scanned;
        match find_line_end(&self.storage[start..self.write_cursor]) {
            Some(end) => Some(self.take(scanned + end)),
            None if filled.exhausted() => Some(self.take(self.window_len())),
            None => None,
        }
    }

    /// Returns the next record, including its `'\n'`.
    ///
    /// The final record is returned without a terminator if the stream
    /// lacks one. An empty result means the stream is exhausted.
    ///
    /// Search escalates so no byte is scanned twice:
    /// 1. the current backlog;
    /// 2. one fill, scanning only the new bytes;
    /// 3. grow-and-fill until `max_capacity`;
    /// 4. unbounded accumulation outside the buffer.
    ///
    /// On error no consumed byte is lost: the window keeps its backlog and a
    /// partially gathered record is resumed by the next call.
    pub fn next_line<S: RawStream + ?Sized>(&mut self, stream: &mut S) -> io::Result<Bytes> {
        if !self.pending.is_empty() {
            if let Some(end) = find_line_end(self.buffered()) {
                return Ok(self.finish_pending(end));
            }
            return self.accumulate_line(stream);
        }

        if let Some(end) = find_line_end(self.buffered()) {
            return Ok(self.take(end));
        }

        let scanned = self.window_len();
        let filled = self.fill_inner(stream)?;
        if let Some(line) = self.take_line_after(scanned, filled) {
            return Ok(line);
        }

        while self.capacity() < self.max_capacity {
            let scanned = self.window_len();
            let filled = self.grow_and_fill_inner(stream)?;
            if let Some(line) = self.take_line_after(scanned, filled) {
                return Ok(line);
            }
        }

        self.accumulate_line(stream)
    }

    /// Moves the window into `pending` and refills until a terminator or
    /// end-of-stream.
    fn accumulate_line<S: RawStream + ?Sized>(&mut self, stream: &mut S) -> io::Result<Bytes> {
        if self.pending.is_empty() {
            log::debug!(
                "line exceeds {} byte buffer, accumulating",
                self.max_capacity
            );
        }

        loop {
            let start = self.read_cursor;
            self.pending
                .extend_from_slice(&self.storage[start..self.write_cursor]);
            self.read_cursor = self.write_cursor;

            let filled = self.fill_inner(stream)?;
            let end = match find_line_end(self.buffered()) {
                Some(end) => end,
                None if filled.exhausted() => self.window_len(),
                None => continue,
            };
            return Ok(self.finish_pending(end));
        }
    }

    /// Appends the next `len` window bytes to `pending` and returns the record.
    fn finish_pending(&mut self, len: usize) -> Bytes {
        self.pending
            .extend_from_slice(&self.storage[self.read_cursor..self.read_cursor + len]);
        self.read_cursor += len;
        self.pending.split().freeze()
    }

    /// Reads up to `dest.len()` bytes, buffered bytes first.
    ///
    /// - Backlog covers the request: served from the buffer, no raw read.
    /// - Backlog covers part of it: the backlog is drained and one raw read
    ///   goes straight into the rest of `dest`. The buffer is not refilled.
    /// - No backlog: one raw read straight into `dest`.
    ///
    /// Bytes of a partially gathered record count as backlog and come first.
    /// If the raw read fails, drained bytes stay in `dest` and are not
    /// returned to the buffer.
    pub fn read<S: RawStream + ?Sized>(
        &mut self,
        stream: &mut S,
        dest: &mut [u8],
    ) -> io::Result<usize> {
        if self.remaining() >= dest.len() {
            return Ok(self.drain(dest));
        }

        let drained = self.drain(dest);
        let read = stream.read_raw(&mut dest[drained..])?;
        Ok(drained + read)
    }
}

impl Default for ReadAheadBuffer {
    fn default() -> Self {
        Self::new(BufferConfig::default())
    }
}
