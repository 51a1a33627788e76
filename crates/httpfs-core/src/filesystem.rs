//! Generic filesystem contract and the caller-owned read stream.

use std::fmt;
use std::io::{self, Read};

use crate::attributes::{FileAttributes, Visibility};
use crate::error::FsError;

/// Storage backend contract.
///
/// Implementations are shared across threads; every method takes `&self`.
pub trait FilesystemAdapter: Send + Sync {
    /// Whether a file exists at `path`. Never fails.
    fn file_exists(&self, path: &str) -> bool;

    fn directory_exists(&self, path: &str) -> Result<bool, FsError>;

    fn write(&self, path: &str, contents: &[u8]) -> Result<(), FsError>;

    fn write_stream(&self, path: &str, contents: &mut dyn Read) -> Result<(), FsError>;

    /// Entire file contents.
    fn read(&self, path: &str) -> Result<Vec<u8>, FsError>;

    /// Streaming read. The caller owns the stream and must [`FileStream::close`] it.
    fn read_stream(&self, path: &str) -> Result<FileStream, FsError>;

    fn delete(&self, path: &str) -> Result<(), FsError>;

    fn delete_directory(&self, path: &str) -> Result<(), FsError>;

    fn create_directory(&self, path: &str) -> Result<(), FsError>;

    fn set_visibility(&self, path: &str, visibility: Visibility) -> Result<(), FsError>;

    fn visibility(&self, path: &str) -> Result<FileAttributes, FsError>;

    fn mime_type(&self, path: &str) -> Result<FileAttributes, FsError>;

    fn last_modified(&self, path: &str) -> Result<FileAttributes, FsError>;

    fn file_size(&self, path: &str) -> Result<FileAttributes, FsError>;

    fn list_contents(&self, path: &str, deep: bool) -> Result<Vec<FileAttributes>, FsError>;

    fn move_file(&self, source: &str, destination: &str) -> Result<(), FsError>;

    fn copy(&self, source: &str, destination: &str) -> Result<(), FsError>;
}

/// Byte source behind a [`FileStream`].
pub trait StreamSource: Read + Send {
    /// Releases the underlying transfer. Called once, from [`FileStream::close`].
    fn release(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl StreamSource for io::Cursor<Vec<u8>> {}

impl StreamSource for io::Empty {}

impl StreamSource for reqwest::blocking::Response {}

/// Response body handed to the caller.
///
/// Yields bytes lazily through [`Read`]. Call [`close`](Self::close) when done:
/// it also reports a transfer failure the reader has not run into yet.
/// Dropping the stream aborts the transfer but swallows any error.
pub struct FileStream {
    source: Box<dyn StreamSource>,
}

impl FileStream {
    pub fn new(source: impl StreamSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    pub fn empty() -> Self {
        Self::new(io::empty())
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(io::Cursor::new(bytes.into()))
    }

    pub fn close(mut self) -> io::Result<()> {
        self.source.release()
    }
}

impl Read for FileStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.source.read(buf)
    }
}

impl fmt::Debug for FileStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStream").finish_non_exhaustive()
    }
}
