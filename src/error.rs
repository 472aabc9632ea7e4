use std::io::{self, SeekFrom};
use std::path::PathBuf;

use thiserror::Error;

/// Result type used by every fallible operation in this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Error type shared by [`BinaryReader`](crate::BinaryReader),
/// [`BinaryWriter`](crate::BinaryWriter) and the [`Backend`](crate::Backend) implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The file could not be opened. Constructors report this immediately; it is never deferred
    /// to the first read or write.
    #[error("failed to open {}: {source}", path.display())]
    Open {
        /// Path that was passed to the constructor.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Any other I/O failure reported by the operating system.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A read or write on a memory backend would cross the end of its fixed-size region.
    /// No bytes were transferred and the cursor did not move.
    #[error("access of {len} bytes at offset {position} exceeds capacity of {capacity} bytes")]
    OutOfRange {
        /// Cursor position at the time of the access.
        position: u64,
        /// Number of bytes requested.
        len: u64,
        /// Fixed capacity of the region.
        capacity: u64,
    },

    /// The seek target is negative or lies outside a memory region.
    #[error("seek {0:?} is outside the addressable range")]
    InvalidSeek(SeekFrom),

    /// A relative seek distance does not fit in a signed 64-bit offset.
    #[error("seek distance {offset} is too large")]
    SeekOverflow {
        /// Requested distance.
        offset: u64,
    },

    /// A file-backed read returned fewer bytes than the value being decoded requires.
    ///
    /// The cursor has advanced past the bytes that were actually read.
    #[error("expected {expected} bytes at offset {position}, but only {actual} were available")]
    UnexpectedEnd {
        /// Cursor position before the read.
        position: u64,
        /// Number of bytes requested.
        expected: usize,
        /// Number of bytes the source delivered before reaching its end.
        actual: usize,
    },

    /// The source ran out of data before a NUL terminator was found.
    #[error("string starting at offset {position} has no terminator")]
    Unterminated {
        /// Offset of the first character of the string.
        position: u64,
    },

    /// A write was attempted on a memory region that was borrowed immutably.
    #[error("memory region is read-only")]
    ReadOnly,

    /// A single-byte string is not well-formed UTF-8.
    #[error("string at offset {position} is not valid UTF-8")]
    InvalidUtf8 {
        /// Offset of the first byte of the string.
        position: u64,
    },

    /// A wide string contains unpaired surrogates.
    #[error("string at offset {position} is not valid UTF-16")]
    InvalidUtf16 {
        /// Offset of the first code unit of the string.
        position: u64,
    },
}
