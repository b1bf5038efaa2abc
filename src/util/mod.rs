//! Internal utility functions and helpers.
//!
//! This module contains small helper functions used throughout the crate.
//! It is an implementation detail and not part of the public API.

/// Record terminator.
pub(crate) const NEWLINE: u8 = b'\n';

/// Returns the index one past the first newline in `data`, if any.
pub(crate) fn find_line_end(data: &[u8]) -> Option<usize> {
    data.iter().position(|&b| b == NEWLINE).map(|i| i + 1)
}
