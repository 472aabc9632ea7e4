//! Typed, position-aware binary readers and writers.
//!
//! [`BinaryReader`] and [`BinaryWriter`] decode and encode primitive values, strings, and
//! fixed-layout records at a cursor. Both sit on a [`Backend`], which is either a file on disk
//! ([`FileBackend`]) or a fixed-size region of memory ([`MemoryBackend`]). Format-specific
//! parsers are built on top of these types.
//!
//! All values use the native byte order of the host. No byte swapping is done.
//!
//! ```
//! use binary_tools::{BinaryReader, BinaryWriter};
//!
//! let mut w = BinaryWriter::with_capacity(16);
//! w.write_u32(8000).unwrap();
//! w.write_null_terminated_string("hello").unwrap();
//! let data = w.into_inner().into_vec();
//!
//! let mut r = BinaryReader::from_slice(&data);
//! assert_eq!(r.read_u32().unwrap(), 8000);
//! assert_eq!(r.read_null_terminated_string().unwrap(), "hello");
//! assert_eq!(r.position().unwrap(), 10);
//! ```

#![forbid(unsafe_code)]
#![forbid(unused_must_use)]
#![warn(missing_docs)]

mod align;
mod backend;
mod error;
mod file;
mod memory;
mod reader;
mod writer;


pub use align::{calc_align, DEFAULT_ALIGNMENT};
pub use backend::Backend;
pub use error::{Error, Result};
pub use file::{FileBackend, WriteOptions};
pub use memory::MemoryBackend;
pub use reader::BinaryReader;
pub use writer::BinaryWriter;
