use std::io::SeekFrom;
use std::path::Path;

use tracing::trace;
use zerocopy::{Immutable, IntoBytes};

use crate::backend::forward;
use crate::{calc_align, Backend, Error, FileBackend, MemoryBackend, Result, WriteOptions};

/// Zero bytes written by `write_null_bytes`, one chunk at a time.
static ZEROS: [u8; 512] = [0; 512];

/// Writes typed values to a [`Backend`].
///
/// Fixed-size values are written as their in-memory byte representation in the native byte
/// order of the host.
///
/// A writer owns its backend. For files, dropping the writer closes the handle. There is no
/// user-space buffering, so nothing is lost at that point.
pub struct BinaryWriter<B> {
    backend: B,
}

impl BinaryWriter<FileBackend> {
    /// Creates or truncates the file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, WriteOptions::default())
    }

    /// Opens the file at `path` for writing, following `options`. Fails with
    /// [`Error::Open`](crate::Error::Open) if it cannot be opened.
    pub fn open_with(path: impl AsRef<Path>, options: WriteOptions) -> Result<Self> {
        Ok(Self::new(FileBackend::create(path, options)?))
    }
}

impl<'a> BinaryWriter<MemoryBackend<'a>> {
    /// Writes into `data`, a region whose capacity is fixed at `data.len()`.
    pub fn from_slice(data: &'a mut [u8]) -> Self {
        Self::new(MemoryBackend::from_mut_slice(data))
    }
}

impl BinaryWriter<MemoryBackend<'static>> {
    /// Writes into a zero-filled region of `capacity` bytes, owned by the writer.
    ///
    /// Use [`into_inner`](BinaryWriter::into_inner) to get the region back.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(MemoryBackend::with_capacity(capacity))
    }
}

impl<B: Backend> BinaryWriter<B> {
    /// Constructor
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Extracts the backend
    pub fn into_inner(self) -> B {
        self.backend
    }

    /// Pushes buffered bytes to the underlying storage without closing it.
    pub fn flush(&mut self) -> Result<()> {
        self.backend.flush()
    }

    /// Writes `bytes` to the output.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.backend.write(bytes)
    }

    /// Writes a raw region of memory. Same as [`write_bytes`](Self::write_bytes).
    pub fn write_from_memory(&mut self, data: &[u8]) -> Result<()> {
        self.write_bytes(data)
    }

    /// Writes a small, fixed-size array of bytes.
    #[inline(always)]
    pub fn write_cbytes<const N: usize>(&mut self, value: [u8; N]) -> Result<()> {
        self.write_bytes(&value)
    }

    /// Writes a single `u8` value
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_cbytes([value])
    }

    /// Writes a single `u16` value
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.write_cbytes(value.to_ne_bytes())
    }

    /// Writes a single `u32` value
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.write_cbytes(value.to_ne_bytes())
    }

    /// Writes a single `u64` value
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.write_cbytes(value.to_ne_bytes())
    }

    /// Writes a single `i8` value
    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.write_cbytes(value.to_ne_bytes())
    }

    /// Writes a single `i16` value
    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.write_cbytes(value.to_ne_bytes())
    }

    /// Writes a single `i32` value
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.write_cbytes(value.to_ne_bytes())
    }

    /// Writes a single `i64` value
    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.write_cbytes(value.to_ne_bytes())
    }

    /// Writes an `f32` value using its 4-byte native representation.
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.write_cbytes(value.to_ne_bytes())
    }

    /// Writes an `f64` value using its 8-byte native representation.
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.write_cbytes(value.to_ne_bytes())
    }

    /// Writes a `bool` value. True is encoded as 1. False is encoded as 0.
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(value as u8)
    }

    /// Writes a single byte.
    pub fn write_byte(&mut self, value: u8) -> Result<()> {
        self.write_u8(value)
    }

    /// Writes a single-byte character unit.
    pub fn write_char(&mut self, value: u8) -> Result<()> {
        self.write_u8(value)
    }

    /// Writes a 2-byte wide character unit.
    pub fn write_char_wide(&mut self, value: u16) -> Result<()> {
        self.write_u16(value)
    }

    /// Writes the bytes of `value` followed by a single NUL byte.
    ///
    /// The string and its terminator are written together, so a memory backend without room
    /// for both writes neither.
    pub fn write_null_terminated_string(&mut self, value: &str) -> Result<()> {
        let mut bytes = Vec::with_capacity(value.len() + 1);
        bytes.extend_from_slice(value.as_bytes());
        bytes.push(0);
        self.write_bytes(&bytes)
    }

    /// Writes the bytes of `value` with no terminator.
    pub fn write_fixed_length_string(&mut self, value: &str) -> Result<()> {
        self.write_bytes(value.as_bytes())
    }

    /// Writes `value` as UTF-16 code units followed by a `0x0000` unit.
    pub fn write_null_terminated_string_wide(&mut self, value: &str) -> Result<()> {
        let wchars: Vec<u16> = value.encode_utf16().chain([0]).collect();
        self.write_array(&wchars)
    }

    /// Writes `value` as UTF-16 code units with no terminator.
    pub fn write_fixed_length_string_wide(&mut self, value: &str) -> Result<()> {
        let wchars: Vec<u16> = value.encode_utf16().collect();
        self.write_array(&wchars)
    }

    /// Writes the raw bytes of `value`.
    ///
    /// References and raw pointers do not implement [`IntoBytes`], so this always writes the
    /// pointee and never an address:
    ///
    /// ```compile_fail
    /// let mut w = binary_tools::BinaryWriter::with_capacity(16);
    /// let x = 5u32;
    /// let r: &u32 = &x;
    /// w.write(&r).unwrap();
    /// ```
    pub fn write<T: IntoBytes + Immutable + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.write_bytes(value.as_bytes())
    }

    /// Writes the raw bytes of every element of `values`, in order.
    pub fn write_array<T: IntoBytes + Immutable>(&mut self, values: &[T]) -> Result<()> {
        self.write(values)
    }

    /// Writes `count` zero bytes.
    ///
    /// If any chunk fails, the cursor is moved back to where it was before the call.
    pub fn write_null_bytes(&mut self, count: u64) -> Result<()> {
        let position = self.position()?;
        let mut remaining = count;
        while remaining > 0 {
            let n = remaining.min(ZEROS.len() as u64) as usize;
            if let Err(e) = self.write_bytes(&ZEROS[..n]) {
                self.seek_beg(position)?;
                return Err(e);
            }
            remaining -= n as u64;
        }
        Ok(())
    }

    /// Moves the cursor to `offset` bytes from the start.
    ///
    /// Seeking a file past its end does not fill the gap. Use [`skip`](Self::skip) for that.
    pub fn seek_beg(&mut self, offset: u64) -> Result<u64> {
        self.backend.seek(SeekFrom::Start(offset))
    }

    /// Moves the cursor forward by `offset` bytes.
    pub fn seek_cur(&mut self, offset: u64) -> Result<u64> {
        let delta = forward(offset)?;
        self.backend.seek(SeekFrom::Current(delta))
    }

    /// Moves the cursor to `offset` bytes past the end.
    pub fn seek_end(&mut self, offset: u64) -> Result<u64> {
        let delta = forward(offset)?;
        self.backend.seek(SeekFrom::End(delta))
    }

    /// Moves the cursor backward by `offset` bytes. Stops at the start instead of going
    /// below offset 0.
    pub fn seek_reverse(&mut self, offset: u64) -> Result<u64> {
        let position = self.position()?;
        self.seek_beg(position - offset.min(position))
    }

    /// Moves the cursor forward by `count` bytes.
    ///
    /// If that would move past the end of the existing content, every byte from the old end up
    /// to the new position is written as zero, so the output never has an unwritten gap. A
    /// memory backend fails with [`Error::OutOfRange`](crate::Error::OutOfRange) if the new
    /// position would exceed its capacity, and the cursor is left where it was.
    pub fn skip(&mut self, count: u64) -> Result<u64> {
        let position = self.position()?;
        let length = self.length()?;
        let target = position
            .checked_add(count)
            .ok_or(Error::SeekOverflow { offset: count })?;

        if target <= length {
            return self.seek_cur(count);
        }

        trace!(position, length, target, "backfilling skipped bytes");
        self.seek_beg(length)?;
        if let Err(e) = self.write_null_bytes(target - length) {
            self.seek_beg(position)?;
            return Err(e);
        }
        Ok(target)
    }

    /// Pads with [`skip`](Self::skip) to the next multiple of `alignment`, and returns the number
    /// of padding bytes. [`DEFAULT_ALIGNMENT`](crate::DEFAULT_ALIGNMENT) is the usual argument.
    pub fn align(&mut self, alignment: u64) -> Result<u64> {
        let padding = calc_align(self.position()?, alignment);
        self.skip(padding)?;
        Ok(padding)
    }

    /// Returns the padding [`align`](Self::align) would produce at `position`. Does no I/O.
    pub const fn calc_align(position: u64, alignment: u64) -> u64 {
        calc_align(position, alignment)
    }

    /// The current absolute offset.
    pub fn position(&mut self) -> Result<u64> {
        self.backend.tell()
    }

    /// The total size of the output in bytes. For memory backends this is the fixed capacity.
    /// Does not move the cursor.
    pub fn length(&mut self) -> Result<u64> {
        self.backend.length()
    }
}
