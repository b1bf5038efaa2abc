//! lineio
//!
//! Buffered, line-oriented reads over a raw byte stream.
//!
//! `lineio` wraps a file descriptor (or any [`RawStream`]) in a [`File`]
//! handle with an adaptive read-ahead buffer that:
//!
//! - serves fixed-size reads from buffered bytes, then straight from the stream
//! - reassembles `'\n'`-terminated records that span several raw reads
//! - doubles its capacity, up to a cap, while a record does not fit
//! - still returns records larger than the cap, by accumulating them
//!
//! The crate intentionally:
//! - does NOT decode text (bytes are opaque except for `'\n'`)
//! - does NOT do async I/O
//! - does NOT seek within buffered data (every seek goes to the stream)
//!
//! # Lines
//!
//! ```no_run
//! use lineio::{AccessMode, CreationMode, File, FileError};
//!
//! fn main() -> Result<(), FileError> {
//!     let mut file = File::options()
//!         .with_creation(CreationMode::OpenOnly)
//!         .with_access(AccessMode::ReadOnly)
//!         .open("data.txt")?;
//!
//!     for line in file.lines() {
//!         let line = line?;
//!         println!("record of {} bytes", line.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Mixing lines and raw reads
//!
//! ```
//! use lineio::{BufferConfig, File};
//! use std::io::Cursor;
//!
//! let mut file = File::from_stream(
//!     Cursor::new(b"HEADER\n\x01\x02\x03\x04".to_vec()),
//!     None,
//!     BufferConfig::default(),
//! );
//!
//! assert_eq!(file.read_line()?, &b"HEADER\n"[..]);
//!
//! let mut body = [0u8; 4];
//! assert_eq!(file.read(&mut body)?, 4);
//! assert_eq!(body, [1, 2, 3, 4]);
//! # Ok::<(), lineio::FileError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod config;
mod error;
mod file;
mod mode;
mod stream;

mod util; // internal newline search

//
// Public surface
//

pub use buffer::ReadAheadBuffer;
pub use config::{BufferConfig, DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_CAPACITY, FileOptions};
pub use error::{FileError, Result};
pub use file::{Chunks, File, Lines};
pub use mode::{AccessMode, CreationMode, OpenFlags, Origin, Permissions};
pub use stream::{FdStream, RawStream};
