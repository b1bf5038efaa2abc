//! Iterators over a [`File`]'s remaining content.
//!
//! - [`Lines`] - One record per item, via the read-ahead buffer
//! - [`Chunks`] - Fixed-size reads, the last one possibly short
//!
//! Both stop for good after yielding an error.

use bytes::Bytes;

use super::File;
use crate::error::FileError;
use crate::stream::RawStream;

/// An iterator over the records of a [`File`].
///
/// Yields each record with its `'\n'` (the last one may lack it) and ends at
/// the empty end-of-stream sentinel.
///
/// # Example
///
/// ```
/// use lineio::{BufferConfig, File};
/// use std::io::Cursor;
///
/// let mut file = File::from_stream(
///     Cursor::new(b"alpha\nbeta\n".to_vec()),
///     None,
///     BufferConfig::default(),
/// );
///
/// let lines: Vec<_> = file.lines().collect::<Result<_, _>>()?;
/// assert_eq!(lines, vec![&b"alpha\n"[..], &b"beta\n"[..]]);
/// # Ok::<(), lineio::FileError>(())
/// ```
pub struct Lines<'a, S: RawStream> {
    file: &'a mut File<S>,
    finished: bool,
}

impl<'a, S: RawStream> Lines<'a, S> {
    pub(super) fn new(file: &'a mut File<S>) -> Self {
        Self {
            file,
            finished: false,
        }
    }
}

impl<S: RawStream> Iterator for Lines<'_, S> {
    type Item = Result<Bytes, FileError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.file.read_line() {
            Ok(line) if line.is_empty() => {
                self.finished = true;
                None
            }
            Ok(line) => Some(Ok(line)),
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// An iterator over a [`File`] in fixed-size reads.
///
/// Every item but the last is exactly `size` bytes; a read returning fewer
/// bytes ends the iteration after yielding them.
pub struct Chunks<'a, S: RawStream> {
    file: &'a mut File<S>,
    buf: Vec<u8>,
    finished: bool,
}

impl<'a, S: RawStream> Chunks<'a, S> {
    pub(super) fn new(file: &'a mut File<S>, size: usize) -> Self {
        Self {
            file,
            buf: vec![0u8; size],
            finished: false,
        }
    }
}

impl<S: RawStream> Iterator for Chunks<'_, S> {
    type Item = Result<Bytes, FileError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.file.read(&mut self.buf) {
            Ok(0) => {
                self.finished = true;
                None
            }
            Ok(n) => {
                if n < self.buf.len() {
                    self.finished = true;
                }
                Some(Ok(Bytes::copy_from_slice(&self.buf[..n])))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
