use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::debug;

use crate::{Backend, Error, Result};

/// Options controlling how [`BinaryWriter::open_with`](crate::BinaryWriter::open_with) opens its
/// file.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct WriteOptions {
    /// If `true`, any existing file contents are discarded when the file is opened.
    ///
    /// If `false`, the file is opened for reading and writing and is created first if it does
    /// not exist. Existing bytes are kept, so bytes beyond whatever the writer touches persist.
    /// This is the mode used to patch a file in place. In both modes the cursor starts at
    /// offset 0.
    pub truncate: bool,
}

impl WriteOptions {
    /// Returns the default options, which truncate.
    pub fn new() -> Self {
        Self { truncate: true }
    }

    /// Sets the `truncate` flag.
    pub fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A [`Backend`] over an open file.
///
/// The file is not buffered in user space. The position is the OS file cursor, so
/// [`Backend::flush`] only forwards to [`File::flush`]. The handle is closed when the backend is
/// dropped.
#[derive(Debug)]
pub struct FileBackend {
    file: File,
}

impl FileBackend {
    /// Wraps a file that the caller has already opened.
    pub fn new(file: File) -> Self {
        Self { file }
    }

    /// Opens `path` for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened file for reading");
        Ok(Self { file })
    }

    /// Opens `path` for writing, following `options`.
    pub fn create(path: impl AsRef<Path>, options: WriteOptions) -> Result<Self> {
        let path = path.as_ref();
        let mut open = OpenOptions::new();
        open.read(true).write(true).create(true).truncate(options.truncate);
        let file = open.open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            path = %path.display(),
            truncate = options.truncate,
            "opened file for writing"
        );
        Ok(Self { file })
    }

    /// Unwraps the file handle.
    pub fn into_file(self) -> File {
        self.file
    }
}

impl Backend for FileBackend {
    fn read(&mut self, dst: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < dst.len() {
            match self.file.read(&mut dst[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }

    fn write(&mut self, src: &[u8]) -> Result<()> {
        self.file.write_all(src)?;
        Ok(())
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        self.file.seek(pos).map_err(|e| match e.kind() {
            ErrorKind::InvalidInput => Error::InvalidSeek(pos),
            _ => Error::Io(e),
        })
    }

    fn tell(&mut self) -> Result<u64> {
        Ok(self.file.stream_position()?)
    }

    fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }
}
