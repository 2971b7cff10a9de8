//! Stream handles over in-memory file content

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::sync::Arc;

use parking_lot::RwLock;
use unifs_core::{
    error::{FsError, FsResult},
    stream::{FileAccess, FileStream},
};

/// Seekable view of one file's bytes; position is per-handle
pub(crate) struct RamStream {
    content: Arc<RwLock<Vec<u8>>>,
    pos: u64,
    access: FileAccess,
}

impl RamStream {
    pub(crate) fn new(content: Arc<RwLock<Vec<u8>>>, pos: u64, access: FileAccess) -> Self {
        Self {
            content,
            pos,
            access,
        }
    }
}

impl Read for RamStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.access.can_read() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "stream opened without read access",
            ));
        }
        let data = self.content.read();
        let start = (self.pos.min(data.len() as u64)) as usize;
        let n = buf.len().min(data.len() - start);
        buf[..n].copy_from_slice(&data[start..start + n]);
        self.pos += n as u64;
        Ok(n)
    }
}

impl Write for RamStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.access.can_write() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "stream opened without write access",
            ));
        }
        let mut data = self.content.write();
        let start = self.pos as usize;
        // Sparse seek past the end fills with zeros on the first write.
        if start > data.len() {
            data.resize(start, 0);
        }
        let overlap = (data.len() - start).min(buf.len());
        data[start..start + overlap].copy_from_slice(&buf[..overlap]);
        data.extend_from_slice(&buf[overlap..]);
        self.pos += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for RamStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let len = self.content.read().len() as i64;
        let target = match pos {
            SeekFrom::Start(offset) => offset as i64,
            SeekFrom::End(offset) => len + offset,
            SeekFrom::Current(offset) => self.pos as i64 + offset,
        };
        if target < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before the start of the stream",
            ));
        }
        self.pos = target as u64;
        Ok(self.pos)
    }
}

impl FileStream for RamStream {
    fn length(&self) -> FsResult<u64> {
        Ok(self.content.read().len() as u64)
    }

    fn set_length(&mut self, length: u64) -> FsResult<()> {
        if !self.access.can_write() {
            return Err(FsError::AccessDenied(
                "stream opened without write access".into(),
            ));
        }
        self.content.write().resize(length as usize, 0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(initial: &[u8], access: FileAccess) -> RamStream {
        RamStream::new(Arc::new(RwLock::new(initial.to_vec())), 0, access)
    }

    #[test]
    fn test_read_write_round_trip() {
        let mut s = stream(b"", FileAccess::ReadWrite);
        s.write_all(b"hello").unwrap();
        s.seek(SeekFrom::Start(0)).unwrap();
        let mut buf = String::new();
        s.read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "hello");
    }

    #[test]
    fn test_overwrite_middle() {
        let mut s = stream(b"abcdef", FileAccess::ReadWrite);
        s.seek(SeekFrom::Start(2)).unwrap();
        s.write_all(b"XY").unwrap();
        assert_eq!(*s.content.read(), b"abXYef");
    }

    #[test]
    fn test_write_past_end_zero_fills() {
        let mut s = stream(b"ab", FileAccess::ReadWrite);
        s.seek(SeekFrom::Start(4)).unwrap();
        s.write_all(b"z").unwrap();
        assert_eq!(*s.content.read(), b"ab\0\0z");
    }

    #[test]
    fn test_read_denied_without_access() {
        let mut s = stream(b"data", FileAccess::Write);
        let mut buf = [0u8; 4];
        assert_eq!(
            s.read(&mut buf).unwrap_err().kind(),
            io::ErrorKind::PermissionDenied
        );
    }

    #[test]
    fn test_write_denied_without_access() {
        let mut s = stream(b"", FileAccess::Read);
        assert_eq!(
            s.write(b"x").unwrap_err().kind(),
            io::ErrorKind::PermissionDenied
        );
    }

    #[test]
    fn test_seek_before_start_rejected() {
        let mut s = stream(b"abc", FileAccess::Read);
        assert!(s.seek(SeekFrom::End(-10)).is_err());
        assert_eq!(s.seek(SeekFrom::End(-1)).unwrap(), 2);
    }

    #[test]
    fn test_set_length_truncates_and_grows() {
        let mut s = stream(b"abcdef", FileAccess::ReadWrite);
        s.set_length(3).unwrap();
        assert_eq!(*s.content.read(), b"abc");
        s.set_length(5).unwrap();
        assert_eq!(*s.content.read(), b"abc\0\0");
    }

    #[test]
    fn test_shared_content_between_handles() {
        let content = Arc::new(RwLock::new(b"one".to_vec()));
        let mut w = RamStream::new(Arc::clone(&content), 0, FileAccess::Write);
        let mut r = RamStream::new(content, 0, FileAccess::Read);
        w.write_all(b"two").unwrap();
        let mut buf = String::new();
        r.read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "two");
    }
}
