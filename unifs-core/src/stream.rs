//! Byte-stream access to file content

use std::io::{Read, Seek, Write};

use serde::{Deserialize, Serialize};

use crate::error::FsResult;

/// How an existing or missing file is treated on open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileMode {
    /// Create a new file; fail if the path already exists
    CreateNew,
    /// Create a new file, truncating any existing one
    Create,
    /// Open an existing file; fail if the path is absent
    Open,
    /// Open an existing file or create an empty one
    OpenOrCreate,
    /// Open an existing file and discard its content
    Truncate,
    /// Open or create, positioned at the end for writing
    Append,
}

impl FileMode {
    /// Modes other than `Open` mutate the store and need a writable mount
    pub fn requires_write(self) -> bool {
        !matches!(self, FileMode::Open)
    }
}

/// Access requested on an open stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileAccess {
    Read,
    Write,
    ReadWrite,
}

impl FileAccess {
    pub fn can_read(self) -> bool {
        matches!(self, FileAccess::Read | FileAccess::ReadWrite)
    }

    pub fn can_write(self) -> bool {
        matches!(self, FileAccess::Write | FileAccess::ReadWrite)
    }
}

/// Seekable stream over one file's content
///
/// Position is per-handle. The handle must not outlive the instance that
/// opened it, which the borrow on [`ByteStream`] enforces.
pub trait FileStream: Read + Write + Seek + Send {
    /// Current file length in bytes
    fn length(&self) -> FsResult<u64>;

    /// Grow (zero-filled) or shrink the file to `length` bytes
    fn set_length(&mut self, length: u64) -> FsResult<()>;
}

/// Stream handle returned by `open_file`, tied to the owning instance
pub type ByteStream<'a> = Box<dyn FileStream + 'a>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_requires_write() {
        assert!(!FileMode::Open.requires_write());
        for mode in [
            FileMode::CreateNew,
            FileMode::Create,
            FileMode::OpenOrCreate,
            FileMode::Truncate,
            FileMode::Append,
        ] {
            assert!(mode.requires_write(), "{:?}", mode);
        }
    }

    #[test]
    fn test_access_flags() {
        assert!(FileAccess::Read.can_read());
        assert!(!FileAccess::Read.can_write());
        assert!(FileAccess::Write.can_write());
        assert!(!FileAccess::Write.can_read());
        assert!(FileAccess::ReadWrite.can_read());
        assert!(FileAccess::ReadWrite.can_write());
    }
}
