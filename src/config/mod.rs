//! Configuration for opening files and sizing their read-ahead buffer.
//!
//! - [`BufferConfig`] - Initial and maximum read-ahead capacity
//! - [`FileOptions`] - Everything needed to open a [`File`]
//!
//! # Example
//!
//! ```no_run
//! use lineio::{AccessMode, BufferConfig, CreationMode, File};
//!
//! let mut file = File::options()
//!     .with_creation(CreationMode::OpenOnly)
//!     .with_access(AccessMode::ReadOnly)
//!     .with_buffer(BufferConfig::new(4096, 1024 * 1024)?)
//!     .open("access.log")?;
//!
//! for line in file.lines() {
//!     let line = line?;
//!     print!("{}", String::from_utf8_lossy(&line));
//! }
//! # Ok::<(), lineio::FileError>(())
//! ```

use std::path::Path;

use crate::error::{FileError, Result};
use crate::file::File;
use crate::mode::{AccessMode, CreationMode, OpenFlags, Permissions};
use crate::stream::FdStream;

/// Default initial buffer capacity (1 KiB).
pub const DEFAULT_INITIAL_CAPACITY: usize = 1024;

/// Default maximum buffer capacity (128 MiB).
pub const DEFAULT_MAX_CAPACITY: usize = 128 * 1024 * 1024;

/// Capacity bounds for a [`ReadAheadBuffer`](crate::ReadAheadBuffer).
///
/// The buffer starts at `initial_capacity` on its first fill and doubles up
/// to `max_capacity` while a line does not fit. Lines longer than
/// `max_capacity` are still returned whole, through a slower accumulation
/// path.
///
/// Constraints: both sizes non-zero, `initial_capacity <= max_capacity`.
/// Unlike chunk sizes, neither needs to be a power of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferConfig {
    initial_capacity: usize,
    max_capacity: usize,
}

impl BufferConfig {
    /// Creates a new configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::InvalidConfig`] if either size is zero or
    /// `initial_capacity > max_capacity`.
    ///
    /// # Example
    ///
    /// ```
    /// use lineio::BufferConfig;
    ///
    /// let config = BufferConfig::new(12, 96)?;
    /// assert_eq!(config.initial_capacity(), 12);
    /// assert!(BufferConfig::new(96, 12).is_err());
    /// # Ok::<(), lineio::FileError>(())
    /// ```
    pub fn new(initial_capacity: usize, max_capacity: usize) -> Result<Self> {
        if initial_capacity == 0 || max_capacity == 0 {
            return Err(FileError::InvalidConfig {
                message: "buffer capacities must be non-zero",
            });
        }

        if initial_capacity > max_capacity {
            return Err(FileError::InvalidConfig {
                message: "initial_capacity cannot be greater than max_capacity",
            });
        }

        Ok(Self {
            initial_capacity,
            max_capacity,
        })
    }

    /// Sets the initial capacity.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`BufferConfig::validate`] to check it.
    pub fn with_initial_capacity(mut self, size: usize) -> Self {
        self.initial_capacity = size;
        self
    }

    /// Sets the maximum capacity.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`BufferConfig::validate`] to check it.
    pub fn with_max_capacity(mut self, size: usize) -> Self {
        self.max_capacity = size;
        self
    }

    /// Returns the initial capacity.
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Returns the maximum capacity.
    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<()> {
        Self::new(self.initial_capacity, self.max_capacity).map(|_| ())
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

/// Options used to open a [`File`].
///
/// Defaults: create-or-open, read-write, no extra flags, `rw-rw-rw-`
/// (before the process umask), default [`BufferConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileOptions {
    creation: CreationMode,
    access: AccessMode,
    flags: OpenFlags,
    permissions: Permissions,
    buffer: BufferConfig,
}

impl FileOptions {
    /// Creates options with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the creation mode.
    pub fn with_creation(mut self, creation: CreationMode) -> Self {
        self.creation = creation;
        self
    }

    /// Sets the access mode.
    pub fn with_access(mut self, access: AccessMode) -> Self {
        self.access = access;
        self
    }

    /// Sets the option flags.
    pub fn with_flags(mut self, flags: OpenFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the permission bits used if the file is created.
    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    /// Sets the buffer configuration.
    pub fn with_buffer(mut self, buffer: BufferConfig) -> Self {
        self.buffer = buffer;
        self
    }

    /// Returns the creation mode.
    pub fn creation(&self) -> CreationMode {
        self.creation
    }

    /// Returns the access mode.
    pub fn access(&self) -> AccessMode {
        self.access
    }

    /// Returns the option flags.
    pub fn flags(&self) -> OpenFlags {
        self.flags
    }

    /// Returns the permission bits.
    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    /// Returns the buffer configuration.
    pub fn buffer(&self) -> &BufferConfig {
        &self.buffer
    }

    /// Combined `open(2)` flag bits.
    pub(crate) fn open_flags(&self) -> libc::c_int {
        self.creation.flags() | self.access.flags() | self.flags.bits()
    }

    /// Opens `path` with these options.
    ///
    /// The open is a single attempt; a missing or inaccessible path fails
    /// immediately with [`FileError::Io`].
    pub fn open<P: AsRef<Path>>(&self, path: P) -> Result<File<FdStream>> {
        self.buffer.validate()?;
        let path = path.as_ref();
        let name = path.to_string_lossy().into_owned();

        let stream = FdStream::open(path, self.open_flags(), self.permissions.bits())
            .map_err(|e| FileError::io("opening", Some(&name), e))?;

        log::debug!(
            "opened {} (flags {:#o}, mode {})",
            name,
            self.open_flags(),
            self.permissions
        );
        Ok(File::from_stream(stream, Some(name), self.buffer))
    }
}

impl Default for FileOptions {
    fn default() -> Self {
        Self {
            creation: CreationMode::CreateOrOpen,
            access: AccessMode::ReadWrite,
            flags: OpenFlags::NONE,
            permissions: Permissions::ALL_RW,
            buffer: BufferConfig::default(),
        }
    }
}
