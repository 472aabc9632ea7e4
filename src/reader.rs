use std::io::SeekFrom;
use std::path::Path;

use tracing::debug;
use zerocopy::{FromBytes, IntoBytes};

use crate::backend::forward;
use crate::{calc_align, Backend, Error, FileBackend, MemoryBackend, Result};

/// Reads typed values from a [`Backend`].
///
/// Fixed-size values are decoded from their in-memory byte representation in the native byte
/// order of the host, with no conversion. Data produced on a host with a different byte order
/// will decode to different values.
///
/// Every read either transfers exactly the number of bytes the value needs or fails. Reads
/// advance the cursor by the number of bytes consumed; the `peek_*` methods restore it.
///
/// A reader owns its backend. For files, the handle is closed when the reader is dropped.
pub struct BinaryReader<B> {
    backend: B,
}

impl BinaryReader<FileBackend> {
    /// Opens the file at `path` for reading. Fails with [`Error::Open`] if it cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(FileBackend::open(path)?))
    }
}

impl<'a> BinaryReader<MemoryBackend<'a>> {
    /// Reads from `data` without copying it.
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self::new(MemoryBackend::from_slice(data))
    }
}

impl BinaryReader<MemoryBackend<'static>> {
    /// Reads from a buffer that the reader takes ownership of.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self::new(MemoryBackend::from_vec(data))
    }
}

impl<B: Backend> BinaryReader<B> {
    /// Constructor
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Fills `dst` completely, or fails.
    ///
    /// This is the raw form of [`read_to_memory`](Self::read_to_memory).
    pub fn read_into(&mut self, dst: &mut [u8]) -> Result<()> {
        let actual = self.backend.read(dst)?;
        if actual != dst.len() {
            return Err(Error::UnexpectedEnd {
                position: self.backend.tell()? - actual as u64,
                expected: dst.len(),
                actual,
            });
        }
        Ok(())
    }

    /// Reads a small array of bytes, with a constant length.
    #[inline(always)]
    pub fn read_cbytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut bytes = [0u8; N];
        self.read_into(&mut bytes)?;
        Ok(bytes)
    }

    /// Reads exactly `count` raw bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; count];
        self.read_into(&mut bytes)?;
        Ok(bytes)
    }

    /// Reads a single `u8` value.
    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(u8::from_ne_bytes(self.read_cbytes()?))
    }

    /// Reads a `u16` in native byte order.
    #[inline(always)]
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_ne_bytes(self.read_cbytes()?))
    }

    /// Reads a `u32` in native byte order.
    #[inline(always)]
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_ne_bytes(self.read_cbytes()?))
    }

    /// Reads a `u64` in native byte order.
    #[inline(always)]
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_ne_bytes(self.read_cbytes()?))
    }

    /// Reads a single `i8` value.
    #[inline(always)]
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_ne_bytes(self.read_cbytes()?))
    }

    /// Reads a `i16` in native byte order.
    #[inline(always)]
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_ne_bytes(self.read_cbytes()?))
    }

    /// Reads a `i32` in native byte order.
    #[inline(always)]
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_ne_bytes(self.read_cbytes()?))
    }

    /// Reads a `i64` in native byte order.
    #[inline(always)]
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_ne_bytes(self.read_cbytes()?))
    }

    /// Reads an `f32` from its 4-byte native representation. NaN payloads are preserved.
    #[inline(always)]
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_ne_bytes(self.read_cbytes()?))
    }

    /// Reads an `f64` from its 8-byte native representation. NaN payloads are preserved.
    #[inline(always)]
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_ne_bytes(self.read_cbytes()?))
    }

    /// Reads a `bool`. Any non-zero byte is `true`.
    #[inline(always)]
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Reads a single byte. Same as [`read_u8`](Self::read_u8).
    #[inline(always)]
    pub fn read_byte(&mut self) -> Result<u8> {
        self.read_u8()
    }

    /// Reads a single-byte character unit.
    #[inline(always)]
    pub fn read_char(&mut self) -> Result<u8> {
        self.read_u8()
    }

    /// Reads a 2-byte wide character unit in native byte order.
    #[inline(always)]
    pub fn read_char_wide(&mut self) -> Result<u16> {
        self.read_u16()
    }

    /// Reads `length` single-byte characters and validates them as UTF-8. No terminator is
    /// expected or removed.
    pub fn read_fixed_length_string(&mut self, length: usize) -> Result<String> {
        let position = self.position()?;
        let bytes = self.read_bytes(length)?;
        String::from_utf8(bytes).map_err(|_| Error::InvalidUtf8 { position })
    }

    /// Reads `length` single-byte characters without validating them.
    #[cfg(feature = "bstr")]
    pub fn read_fixed_length_bstr(&mut self, length: usize) -> Result<bstr::BString> {
        Ok(bstr::BString::from(self.read_bytes(length)?))
    }

    /// Reads `length` 2-byte character units.
    pub fn read_fixed_length_wchars(&mut self, length: usize) -> Result<Vec<u16>> {
        self.read_array(length)
    }

    /// Reads `length` 2-byte character units and decodes them as UTF-16.
    pub fn read_fixed_length_string_wide(&mut self, length: usize) -> Result<String> {
        let position = self.position()?;
        let wchars = self.read_fixed_length_wchars(length)?;
        String::from_utf16(&wchars).map_err(|_| Error::InvalidUtf16 { position })
    }

    /// Reads bytes up to and including the next NUL byte, and returns the bytes before it.
    ///
    /// The cursor is left immediately past the terminator. If the source ends before a NUL
    /// byte is found, this fails with [`Error::Unterminated`].
    pub fn read_null_terminated_bytes(&mut self) -> Result<Vec<u8>> {
        let start = self.position()?;
        let mut bytes = Vec::new();
        loop {
            match self.read_u8() {
                Ok(0) => return Ok(bytes),
                Ok(b) => bytes.push(b),
                Err(e) => return Err(unterminated(e, start)),
            }
        }
    }

    /// Reads a NUL-terminated string and validates it as UTF-8.
    pub fn read_null_terminated_string(&mut self) -> Result<String> {
        let position = self.position()?;
        let bytes = self.read_null_terminated_bytes()?;
        String::from_utf8(bytes).map_err(|_| Error::InvalidUtf8 { position })
    }

    /// Reads a NUL-terminated string without validating it.
    #[cfg(feature = "bstr")]
    pub fn read_null_terminated_bstr(&mut self) -> Result<bstr::BString> {
        Ok(bstr::BString::from(self.read_null_terminated_bytes()?))
    }

    /// Reads 2-byte units up to and including the next `0x0000` unit, and returns the units
    /// before it.
    pub fn read_null_terminated_wchars(&mut self) -> Result<Vec<u16>> {
        let start = self.position()?;
        let mut wchars = Vec::new();
        loop {
            match self.read_u16() {
                Ok(0) => return Ok(wchars),
                Ok(c) => wchars.push(c),
                Err(e) => return Err(unterminated(e, start)),
            }
        }
    }

    /// Reads a NUL-terminated wide string and decodes it as UTF-16.
    pub fn read_null_terminated_string_wide(&mut self) -> Result<String> {
        let position = self.position()?;
        let wchars = self.read_null_terminated_wchars()?;
        String::from_utf16(&wchars).map_err(|_| Error::InvalidUtf16 { position })
    }

    /// Reads NUL-terminated strings back to back until `list_size` bytes, counted from the
    /// current position, have been consumed.
    ///
    /// Extra NUL bytes after a string are skipped, which handles producers that pad each entry
    /// to an alignment boundary. If `list_size` is 0, nothing is read.
    pub fn read_sized_string_list(&mut self, list_size: usize) -> Result<Vec<String>> {
        let mut strings = Vec::new();
        if list_size == 0 {
            return Ok(strings);
        }

        let list_size = list_size as u64;
        let start = self.position()?;
        while self.position()? - start < list_size {
            strings.push(self.read_null_terminated_string()?);
            while self.position()? - start < list_size {
                if self.peek_char()? == 0 {
                    self.skip(1)?;
                } else {
                    break;
                }
            }
        }

        Ok(strings)
    }

    /// Returns the next byte without consuming it.
    pub fn peek_char(&mut self) -> Result<u8> {
        let value = self.read_char()?;
        self.seek_reverse(1)?;
        Ok(value)
    }

    /// Returns the next 2-byte wide character without consuming it.
    pub fn peek_char_wide(&mut self) -> Result<u16> {
        let value = self.read_char_wide()?;
        self.seek_reverse(2)?;
        Ok(value)
    }

    /// Returns the next `u32` without consuming it.
    pub fn peek_u32(&mut self) -> Result<u32> {
        let value = self.read_u32()?;
        self.seek_reverse(4)?;
        Ok(value)
    }

    /// Fills `dst` with raw bytes from the source.
    ///
    /// `dst` can be a single fixed-layout record or a slice of them. The bytes are copied as
    /// they are, so the source must match `T`'s layout and the host's byte order.
    pub fn read_to_memory<T: FromBytes + IntoBytes + ?Sized>(&mut self, dst: &mut T) -> Result<()> {
        self.read_into(dst.as_mut_bytes())
    }

    /// Reads one fixed-layout record.
    pub fn read_pod<T: FromBytes + IntoBytes>(&mut self) -> Result<T> {
        let mut value = T::new_zeroed();
        self.read_to_memory(&mut value)?;
        Ok(value)
    }

    /// Reads `count` consecutive fixed-layout records.
    pub fn read_array<T: FromBytes + IntoBytes>(&mut self, count: usize) -> Result<Vec<T>> {
        let mut values: Vec<T> = core::iter::repeat_with(T::new_zeroed).take(count).collect();
        self.read_to_memory(values.as_mut_slice())?;
        Ok(values)
    }

    /// Moves the cursor to `offset` bytes from the start.
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

    /// Moves the cursor forward by `count` bytes without reading them.
    pub fn skip(&mut self, count: u64) -> Result<u64> {
        self.seek_cur(count)
    }

    /// Skips forward to the next multiple of `alignment` and returns the number of bytes
    /// skipped. [`DEFAULT_ALIGNMENT`](crate::DEFAULT_ALIGNMENT) is the usual argument.
    pub fn align(&mut self, alignment: u64) -> Result<u64> {
        let padding = calc_align(self.position()?, alignment);
        self.skip(padding)?;
        Ok(padding)
    }

    /// The current absolute offset.
    pub fn position(&mut self) -> Result<u64> {
        self.backend.tell()
    }

    /// The total size of the source in bytes. Does not move the cursor.
    pub fn length(&mut self) -> Result<u64> {
        self.backend.length()
    }
}

fn unterminated(e: Error, position: u64) -> Error {
    match e {
        Error::UnexpectedEnd { .. } | Error::OutOfRange { .. } => {
            debug!(position, "source ended before string terminator");
            Error::Unterminated { position }
        }
        e => e,
    }
}
