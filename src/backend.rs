use std::io::SeekFrom;

use crate::{Error, Result};

/// Byte storage underneath a [`BinaryReader`](crate::BinaryReader) or
/// [`BinaryWriter`](crate::BinaryWriter).
///
/// Every typed operation on the reader and writer is expressed in terms of these primitives.
/// The two implementations in this crate are [`FileBackend`](crate::FileBackend), whose cursor is
/// the OS file cursor, and [`MemoryBackend`](crate::MemoryBackend), which is a bounded cursor over
/// a fixed-size region.
///
/// Positions are always unsigned offsets from the start of the storage.
pub trait Backend {
    /// Copies up to `dst.len()` bytes from the current position into `dst` and advances the
    /// position by the number of bytes copied.
    ///
    /// A file backend returns a short count only at end of file. A memory backend never reads
    /// past its capacity; a request that would do so fails with
    /// [`Error::OutOfRange`](crate::Error::OutOfRange) and copies nothing.
    fn read(&mut self, dst: &mut [u8]) -> Result<usize>;

    /// Writes all of `src` at the current position and advances the position by `src.len()`.
    ///
    /// Files grow when written past their current length. Memory regions never grow.
    fn write(&mut self, src: &[u8]) -> Result<()>;

    /// Repositions the cursor and returns the new absolute offset.
    fn seek(&mut self, pos: SeekFrom) -> Result<u64>;

    /// Returns the current absolute offset.
    fn tell(&mut self) -> Result<u64>;

    /// Pushes any buffered bytes to the underlying storage.
    fn flush(&mut self) -> Result<()>;

    /// Returns the total size of the storage in bytes.
    ///
    /// The default implementation saves the position, seeks to the end, then restores the saved
    /// position. The position observed after this call is always the one observed before it.
    fn length(&mut self) -> Result<u64> {
        let position = self.tell()?;
        let end = self.seek(SeekFrom::End(0))?;
        if end != position {
            self.seek(SeekFrom::Start(position))?;
        }
        Ok(end)
    }
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn read(&mut self, dst: &mut [u8]) -> Result<usize> {
        (**self).read(dst)
    }

    fn write(&mut self, src: &[u8]) -> Result<()> {
        (**self).write(src)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        (**self).seek(pos)
    }

    fn tell(&mut self) -> Result<u64> {
        (**self).tell()
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn length(&mut self) -> Result<u64> {
        (**self).length()
    }
}

/// Converts a forward distance into a relative seek offset.
pub(crate) fn forward(offset: u64) -> Result<i64> {
    i64::try_from(offset).map_err(|_| Error::SeekOverflow { offset })
}
