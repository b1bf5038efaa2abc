//! Read-ahead buffering between a [`File`](crate::File) and its raw stream.
//!
//! The buffer is the only place bytes are held between raw reads, and the
//! only component that decides when a raw read is issued.

mod read_ahead;

pub use read_ahead::ReadAheadBuffer;
