use std::io::SeekFrom;

use crate::{Backend, Error, Result};

enum Region<'a> {
    Shared(&'a [u8]),
    Exclusive(&'a mut [u8]),
    Owned(Box<[u8]>),
}

/// A [`Backend`] over a fixed-size region of memory.
///
/// The region is either borrowed from the caller or owned by the backend. Its capacity is fixed
/// at construction and never grows: any read or write that would cross the end of the region
/// fails with [`Error::OutOfRange`] without transferring any bytes. The cursor is always in
/// `0..=capacity`.
pub struct MemoryBackend<'a> {
    region: Region<'a>,
    cursor: usize,
}

impl<'a> MemoryBackend<'a> {
    /// Borrows `data` for reading. Writes fail with [`Error::ReadOnly`].
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self {
            region: Region::Shared(data),
            cursor: 0,
        }
    }

    /// Borrows `data` for reading and writing.
    pub fn from_mut_slice(data: &'a mut [u8]) -> Self {
        Self {
            region: Region::Exclusive(data),
            cursor: 0,
        }
    }

    /// The full contents of the region, independent of the cursor.
    pub fn as_slice(&self) -> &[u8] {
        match &self.region {
            Region::Shared(data) => data,
            Region::Exclusive(data) => data,
            Region::Owned(data) => data,
        }
    }

    /// The fixed size of the region in bytes.
    pub fn capacity(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns the contents of the region. Borrowed regions are copied.
    pub fn into_vec(self) -> Vec<u8> {
        match self.region {
            Region::Shared(data) => data.to_vec(),
            Region::Exclusive(data) => data.to_vec(),
            Region::Owned(data) => data.into_vec(),
        }
    }

    fn check_range(&self, len: usize) -> Result<core::ops::Range<usize>> {
        let capacity = self.capacity();
        match self.cursor.checked_add(len) {
            Some(end) if end <= capacity => Ok(self.cursor..end),
            _ => Err(Error::OutOfRange {
                position: self.cursor as u64,
                len: len as u64,
                capacity: capacity as u64,
            }),
        }
    }
}

impl MemoryBackend<'static> {
    /// Takes ownership of `data`. The capacity is `data.len()`, not `data.capacity()`.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            region: Region::Owned(data.into_boxed_slice()),
            cursor: 0,
        }
    }

    /// Allocates a zero-filled region of `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_vec(vec![0; capacity])
    }
}

impl Backend for MemoryBackend<'_> {
    fn read(&mut self, dst: &mut [u8]) -> Result<usize> {
        let range = self.check_range(dst.len())?;
        dst.copy_from_slice(&self.as_slice()[range.clone()]);
        self.cursor = range.end;
        Ok(dst.len())
    }

    fn write(&mut self, src: &[u8]) -> Result<()> {
        let range = self.check_range(src.len())?;
        let data: &mut [u8] = match &mut self.region {
            Region::Shared(_) => return Err(Error::ReadOnly),
            Region::Exclusive(data) => data,
            Region::Owned(data) => data,
        };
        data[range.clone()].copy_from_slice(src);
        self.cursor = range.end;
        Ok(())
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let capacity = self.capacity() as i128;
        let target = match pos {
            SeekFrom::Start(offset) => offset as i128,
            SeekFrom::Current(delta) => self.cursor as i128 + delta as i128,
            SeekFrom::End(delta) => capacity + delta as i128,
        };
        if !(0..=capacity).contains(&target) {
            return Err(Error::InvalidSeek(pos));
        }
        self.cursor = target as usize;
        Ok(self.cursor as u64)
    }

    fn tell(&mut self) -> Result<u64> {
        Ok(self.cursor as u64)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl core::fmt::Debug for MemoryBackend<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let kind = match self.region {
            Region::Shared(_) => "shared",
            Region::Exclusive(_) => "exclusive",
            Region::Owned(_) => "owned",
        };
        f.debug_struct("MemoryBackend")
            .field("region", &kind)
            .field("capacity", &self.capacity())
            .field("cursor", &self.cursor)
            .finish()
    }
}
