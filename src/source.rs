//! Line sources.
//!
//! A source turns a path into the ordered lines of that file. Lines are raw
//! bytes without their `\n` terminator; nothing else is stripped.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::SourceError;

/// One line of input, terminator removed.
pub type Line = Vec<u8>;

/// Produces the lines of a file.
pub trait LineSource {
    /// Read every line of `path`, top to bottom.
    fn read_lines(&self, path: &Path) -> Result<Vec<Line>, SourceError>;

    /// Key identifying the file behind `path`, used to detect cycles.
    ///
    /// Two spellings of the same file should map to the same key.
    fn identity(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }
}

/// Build a path from the raw bytes of an include directive.
///
/// On unix the bytes are used as-is, so names in any encoding resolve.
#[cfg(unix)]
pub fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    PathBuf::from(OsStr::from_bytes(bytes))
}

/// Build a path from the raw bytes of an include directive.
#[cfg(not(unix))]
pub fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

/// Split a reader on `\n`.
///
/// A last line without terminator is kept; a terminator at the very end
/// does not produce an extra empty line.
pub fn split_lines<R: BufRead>(reader: R) -> io::Result<Vec<Line>> {
    reader.split(b'\n').collect()
}

/// Reads files from the filesystem, paths taken verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLineSource;

impl LineSource for FsLineSource {
    fn read_lines(&self, path: &Path) -> Result<Vec<Line>, SourceError> {
        let file = File::open(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        split_lines(BufReader::new(file)).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    fn identity(&self, path: &Path) -> PathBuf {
        fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }
}

/// In-memory files keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), contents.into());
    }

    /// Builder form of [`MemorySource::insert`].
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }
}

impl LineSource for MemorySource {
    fn read_lines(&self, path: &Path) -> Result<Vec<Line>, SourceError> {
        let contents = self.files.get(path).ok_or_else(|| SourceError::Open {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        })?;

        split_lines(contents.as_slice()).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })
    }
}
