//! The raw, unbuffered byte-stream capability a [`File`](crate::File) sits on.
//!
//! - [`RawStream`] - Single-attempt read/write/seek/truncate
//! - [`FdStream`] - A Unix file descriptor
//!
//! `RawStream` is also implemented for `std::io::Cursor<Vec<u8>>`, which
//! behaves like a regular file held in memory.

mod fd;

use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use crate::mode::Origin;

pub use fd::FdStream;

/// Direct, unbuffered operations on a sequential byte stream.
///
/// Every method performs at most one underlying call and never retries.
/// A read that returns fewer bytes than requested, including zero, signals
/// end-of-stream; it is not an error. A write may likewise be short.
pub trait RawStream {
    /// Reads up to `buf.len()` bytes, returning how many were read.
    fn read_raw(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Writes up to `buf.len()` bytes, returning how many were written.
    fn write_raw(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Moves the stream cursor and returns the new absolute position.
    fn seek_raw(&mut self, origin: Origin, offset: i64) -> io::Result<u64>;

    /// Sets the stream length to `size`, zero-filling if it grows.
    fn truncate_raw(&mut self, size: u64) -> io::Result<()>;

    /// Returns the current absolute position.
    fn position_raw(&mut self) -> io::Result<u64> {
        self.seek_raw(Origin::Current, 0)
    }

    /// Releases the stream. Failures are ignored.
    fn close_raw(self)
    where
        Self: Sized,
    {
    }
}

fn invalid_input(message: &'static str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}

impl RawStream for Cursor<Vec<u8>> {
    fn read_raw(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read(buf)
    }

    fn write_raw(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write(buf)
    }

    fn seek_raw(&mut self, origin: Origin, offset: i64) -> io::Result<u64> {
        let pos = match origin {
            Origin::Start => SeekFrom::Start(
                u64::try_from(offset).map_err(|_| invalid_input("negative seek position"))?,
            ),
            Origin::Current => SeekFrom::Current(offset),
            Origin::End => SeekFrom::End(offset),
        };
        self.seek(pos)
    }

    fn truncate_raw(&mut self, size: u64) -> io::Result<()> {
        let size = usize::try_from(size).map_err(|_| invalid_input("size out of range"))?;
        self.get_mut().resize(size, 0);
        Ok(())
    }
}
