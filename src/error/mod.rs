//! Error types for lineio.

use std::io;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FileError>;

/// Errors that can occur while opening or operating on a [`File`](crate::File).
///
/// End-of-stream is never reported through this type: a short or empty read
/// is an ordinary return value.
#[derive(Error, Debug)]
pub enum FileError {
    /// A raw stream operation failed.
    #[error("error {} {}: {}", .action, .target.as_deref().unwrap_or("file"), .source)]
    Io {
        /// What was being attempted, e.g. `"reading"` or `"seeking in"`.
        action: &'static str,
        /// Display name of the stream, if it has one.
        target: Option<String>,
        /// The underlying OS error.
        source: io::Error,
    },

    /// Invalid buffer configuration.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// Invalid argument passed to a handle operation.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of what was invalid.
        message: &'static str,
    },
}

impl FileError {
    pub(crate) fn io(action: &'static str, target: Option<&str>, source: io::Error) -> Self {
        FileError::Io {
            action,
            target: target.map(str::to_owned),
            source,
        }
    }

    /// Error for an operation attempted after the descriptor was released.
    pub(crate) fn closed(action: &'static str, target: Option<&str>) -> Self {
        Self::io(action, target, io::Error::from_raw_os_error(libc::EBADF))
    }

    /// Returns the OS error code, if this is an I/O failure that carries one.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            FileError::Io { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }

    /// Returns the [`io::ErrorKind`] this error corresponds to.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            FileError::Io { source, .. } => source.kind(),
            FileError::InvalidConfig { .. } | FileError::InvalidArgument { .. } => {
                io::ErrorKind::InvalidInput
            }
        }
    }
}

impl From<FileError> for io::Error {
    fn from(e: FileError) -> Self {
        match e {
            FileError::Io { source, .. } => source,
            other => io::Error::new(io::ErrorKind::InvalidInput, other),
        }
    }
}
