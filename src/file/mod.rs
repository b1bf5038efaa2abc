//! The stream handle: a raw stream plus its read-ahead buffer.
//!
//! - [`File`] - Owned handle with direct reads/writes and line iteration
//! - [`Lines`] - Iterator over records, from [`File::lines`]
//! - [`Chunks`] - Iterator over fixed-size reads, from [`File::chunks`]

mod iter;

use std::io;
use std::path::Path;

use bytes::Bytes;

use crate::buffer::ReadAheadBuffer;
use crate::config::{BufferConfig, FileOptions};
use crate::error::{FileError, Result};
use crate::mode::Origin;
use crate::stream::{FdStream, RawStream};

pub use iter::{Chunks, Lines};

/// An owned handle on a raw byte stream with line-oriented reads.
///
/// Fixed-size reads drain buffered bytes first and then go straight to the
/// stream; line reads go through the [`ReadAheadBuffer`]. Any write, seek or
/// truncate discards the buffer, since its bytes no longer follow the
/// stream's cursor.
///
/// The handle is move-only. The stream is released exactly once, by
/// [`close`](File::close) or on drop, whichever comes first; any operation
/// after that fails with `EBADF`.
///
/// # Example
///
/// ```no_run
/// use lineio::File;
///
/// let mut file = File::open("notes.txt")?;
/// file.write(b"first\nsecond\n")?;
/// file.seek(lineio::Origin::Start, 0)?;
///
/// loop {
///     let line = file.read_line()?;
///     if line.is_empty() {
///         break;
///     }
///     print!("{}", String::from_utf8_lossy(&line));
/// }
/// # Ok::<(), lineio::FileError>(())
/// ```
#[derive(Debug)]
pub struct File<S: RawStream = FdStream> {
    stream: Option<S>,
    name: Option<String>,
    buffer: ReadAheadBuffer,
}

impl File<FdStream> {
    /// Opens `path` with the default [`FileOptions`]: create-or-open,
    /// read-write.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        FileOptions::default().open(path)
    }

    /// Starts a [`FileOptions`] builder.
    pub fn options() -> FileOptions {
        FileOptions::default()
    }

    /// Removes the file at `path`.
    pub fn remove<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        std::fs::remove_file(path)
            .map_err(|e| FileError::io("removing", Some(&path.to_string_lossy()), e))
    }
}

impl<S: RawStream> File<S> {
    /// Wraps an already-open stream.
    ///
    /// `name` only appears in error messages.
    pub fn from_stream(stream: S, name: Option<String>, config: BufferConfig) -> Self {
        Self {
            stream: Some(stream),
            name,
            buffer: ReadAheadBuffer::new(config),
        }
    }

    /// Returns the display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns true until the stream has been closed.
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Number of bytes read ahead but not yet consumed.
    pub fn buffered_len(&self) -> usize {
        self.buffer.remaining()
    }

    /// Returns the underlying stream, or `None` once closed.
    pub fn stream(&self) -> Option<&S> {
        self.stream.as_ref()
    }

    fn stream_mut(&mut self, action: &'static str) -> Result<&mut S> {
        match self.stream.as_mut() {
            Some(stream) => Ok(stream),
            None => Err(FileError::closed(action, self.name.as_deref())),
        }
    }

    fn wrap(&self, action: &'static str) -> impl FnOnce(io::Error) -> FileError + '_ {
        move |e| FileError::io(action, self.name.as_deref(), e)
    }

    /// Returns the stream's absolute cursor position.
    ///
    /// This is where the next raw read would start. It does not account for
    /// bytes held in the read-ahead buffer, and it leaves the buffer intact.
    pub fn position(&mut self) -> Result<u64> {
        const ACTION: &str = "reading position from";
        let pos = self.stream_mut(ACTION)?.position_raw();
        pos.map_err(self.wrap(ACTION))
    }

    /// Reads up to `buf.len()` bytes.
    ///
    /// Buffered bytes are returned first; any remainder comes from at most
    /// one raw read. A short count means end-of-stream was reached.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        const ACTION: &str = "reading";
        let Some(stream) = self.stream.as_mut() else {
            return Err(FileError::closed(ACTION, self.name.as_deref()));
        };
        let n = self.buffer.read(stream, buf);
        n.map_err(self.wrap(ACTION))
    }

    /// Writes `buf` with a single raw write and discards the read-ahead
    /// buffer.
    ///
    /// Returns the count the raw write reported, which may be short. The
    /// remainder is not retried.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        const ACTION: &str = "writing";
        let n = self.stream_mut(ACTION)?.write_raw(buf);
        let n = n.map_err(self.wrap(ACTION))?;
        self.buffer.invalidate();
        Ok(n)
    }

    /// Moves the stream cursor and discards the read-ahead buffer.
    ///
    /// Offsets are always applied to the stream itself, never to buffered
    /// bytes, even when the target lies inside the buffered range. Returns
    /// the new absolute position.
    pub fn seek(&mut self, origin: Origin, offset: i64) -> Result<u64> {
        const ACTION: &str = "seeking in";
        let pos = self.stream_mut(ACTION)?.seek_raw(origin, offset);
        let pos = pos.map_err(self.wrap(ACTION))?;
        self.buffer.invalidate();
        Ok(pos)
    }

    /// Sets the stream length to `size` and discards the read-ahead buffer.
    pub fn truncate(&mut self, size: u64) -> Result<()> {
        const ACTION: &str = "truncating";
        let res = self.stream_mut(ACTION)?.truncate_raw(size);
        res.map_err(self.wrap(ACTION))?;
        self.buffer.invalidate();
        Ok(())
    }

    /// Releases the stream. Safe to call more than once; failures are
    /// ignored.
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            log::debug!("closing {}", self.name.as_deref().unwrap_or("file"));
            self.buffer.invalidate();
            stream.close_raw();
        }
    }

    /// Reads the next record, including its trailing `'\n'`.
    ///
    /// The last record is returned without a terminator if the stream has
    /// none. An empty result means the stream is exhausted.
    pub fn read_line(&mut self) -> Result<Bytes> {
        const ACTION: &str = "reading";
        let Some(stream) = self.stream.as_mut() else {
            return Err(FileError::closed(ACTION, self.name.as_deref()));
        };
        let line = self.buffer.next_line(stream);
        line.map_err(self.wrap(ACTION))
    }

    /// Reads every remaining record.
    pub fn read_lines(&mut self) -> Result<Vec<Bytes>> {
        self.lines().collect()
    }

    /// Calls `f` with every remaining record, in order.
    pub fn for_each_line<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(Bytes),
    {
        loop {
            let line = self.read_line()?;
            if line.is_empty() {
                return Ok(());
            }
            f(line);
        }
    }

    /// Reads the rest of the stream in `size`-byte reads, calling `f` with
    /// each full chunk and then with any shorter final chunk.
    ///
    /// # Errors
    ///
    /// [`FileError::InvalidArgument`] if `size` is zero, otherwise any read
    /// failure.
    pub fn for_each_chunk<F>(&mut self, size: usize, mut f: F) -> Result<()>
    where
        F: FnMut(&[u8]),
    {
        if size == 0 {
            return Err(FileError::InvalidArgument {
                message: "chunk size must be non-zero",
            });
        }

        let mut buf = vec![0u8; size];
        loop {
            let n = self.read(&mut buf)?;
            if n > 0 {
                f(&buf[..n]);
            }
            if n < size {
                return Ok(());
            }
        }
    }

    /// Iterator over the remaining records.
    pub fn lines(&mut self) -> Lines<'_, S> {
        Lines::new(self)
    }

    /// Iterator over the rest of the stream in `size`-byte chunks.
    ///
    /// # Errors
    ///
    /// [`FileError::InvalidArgument`] if `size` is zero.
    pub fn chunks(&mut self, size: usize) -> Result<Chunks<'_, S>> {
        if size == 0 {
            return Err(FileError::InvalidArgument {
                message: "chunk size must be non-zero",
            });
        }
        Ok(Chunks::new(self, size))
    }
}

impl<S: RawStream> Drop for File<S> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<S: RawStream> io::Read for File<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        File::read(self, buf).map_err(io::Error::from)
    }
}

impl<S: RawStream> io::Write for File<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        File::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
