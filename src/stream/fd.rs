//! Descriptor-backed raw stream.
//!
//! Each operation is exactly one system call. Interrupted calls surface as
//! errors instead of being retried.

#![allow(unsafe_code)]

use std::ffi::CString;
use std::io;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, FromRawFd, OwnedFd, RawFd};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use libc::{c_int, off_t};

use super::RawStream;
use crate::mode::Origin;

/// A raw stream over an owned Unix file descriptor.
///
/// The descriptor is closed when the stream is dropped or passed to
/// [`RawStream::close_raw`]; close errors are ignored.
#[derive(Debug)]
pub struct FdStream {
    fd: OwnedFd,
}

impl FdStream {
    /// Opens `path` with `open(2)`.
    ///
    /// `flags` is the combined `O_*` set and `mode` the permission bits for
    /// a newly created file.
    // Not `std::fs::OpenOptions`: it retries on EINTR, and open is a single attempt here.
    pub fn open(path: &Path, flags: c_int, mode: u32) -> io::Result<Self> {
        let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "path contains an interior nul byte",
            )
        })?;

        // SAFETY: `c_path` is a valid nul-terminated string for the duration of the call.
        let fd = unsafe { libc::open(c_path.as_ptr(), flags, mode as libc::c_uint) };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }

        // SAFETY: `open` just returned this descriptor and nothing else owns it.
        let fd = unsafe { OwnedFd::from_raw_fd(fd) };
        Ok(Self { fd })
    }
}

fn to_off_t<T>(value: T) -> io::Result<off_t>
where
    off_t: TryFrom<T>,
{
    off_t::try_from(value)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "offset out of range"))
}

impl RawStream for FdStream {
    fn read_raw(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        // SAFETY: `buf` is valid for writes of `buf.len()` bytes.
        let n = unsafe { libc::read(self.fd.as_raw_fd(), buf.as_mut_ptr().cast(), buf.len()) };
        if n < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(n as usize)
    }

    fn write_raw(&mut self, buf: &[u8]) -> io::Result<usize> {
        // SAFETY: `buf` is valid for reads of `buf.len()` bytes.
        let n = unsafe { libc::write(self.fd.as_raw_fd(), buf.as_ptr().cast(), buf.len()) };
        if n < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(n as usize)
    }

    fn seek_raw(&mut self, origin: Origin, offset: i64) -> io::Result<u64> {
        let offset = to_off_t(offset)?;
        // SAFETY: plain syscall on a descriptor we own.
        let pos = unsafe { libc::lseek(self.fd.as_raw_fd(), offset, origin.whence()) };
        if pos < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(pos as u64)
    }

    fn truncate_raw(&mut self, size: u64) -> io::Result<()> {
        let size = to_off_t(size)?;
        // SAFETY: plain syscall on a descriptor we own.
        if unsafe { libc::ftruncate(self.fd.as_raw_fd(), size) } < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn close_raw(self) {
        drop(self.fd);
    }
}

impl From<OwnedFd> for FdStream {
    fn from(fd: OwnedFd) -> Self {
        Self { fd }
    }
}

impl From<std::fs::File> for FdStream {
    fn from(file: std::fs::File) -> Self {
        Self { fd: file.into() }
    }
}

impl AsFd for FdStream {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl AsRawFd for FdStream {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}
