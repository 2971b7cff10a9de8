//! Entry facades
//!
//! Lightweight handles pairing an owning instance with a path string. They
//! cache nothing: every accessor re-queries the owner, so changes made
//! through other handles are immediately visible, and constructing one never
//! touches the underlying store. It is fine to build a facade for a path
//! that does not exist; existence matters only once a real operation runs.
//!
//! Attribute and timestamp accessors live on [`EntryInfo`]; the file and
//! directory facades expose them through [`FileInfo::entry`] and
//! [`DirectoryInfo::entry`].

use std::fmt;

use chrono::{DateTime, Local, Utc};

use crate::{
    attributes::FileAttributes,
    contract::FileSystem,
    error::FsResult,
    operations::{CopyOptions, MoveOptions},
    path,
    stream::{ByteStream, FileAccess, FileMode},
};

/// Facade for a path of unknown kind
pub struct EntryInfo<'fs, F: ?Sized> {
    fs: &'fs F,
    path: String,
}

impl<'fs, F: FileSystem + ?Sized> EntryInfo<'fs, F> {
    pub fn new(fs: &'fs F, path: &str) -> Self {
        Self {
            fs,
            path: path::normalize(path),
        }
    }

    /// The owning instance
    pub fn file_system(&self) -> &'fs F {
        self.fs
    }

    /// Canonical path of this entry; empty for the root
    pub fn full_path(&self) -> &str {
        &self.path
    }

    /// Final path segment; empty for the root
    pub fn name(&self) -> &str {
        path::file_name(&self.path)
    }

    pub fn extension(&self) -> Option<&str> {
        path::extension(&self.path)
    }

    pub fn parent(&self) -> Option<DirectoryInfo<'fs, F>> {
        path::parent_of(&self.path).map(|p| DirectoryInfo::new(self.fs, &p))
    }

    pub fn exists(&self) -> FsResult<bool> {
        self.fs.exists(&self.path)
    }

    pub fn attributes(&self) -> FsResult<FileAttributes> {
        self.fs.attributes(&self.path)
    }

    pub fn set_attributes(&self, attributes: FileAttributes) -> FsResult<()> {
        self.fs.set_attributes(&self.path, attributes)
    }

    pub fn creation_time_utc(&self) -> FsResult<DateTime<Utc>> {
        self.fs.creation_time_utc(&self.path)
    }

    pub fn set_creation_time_utc(&self, time: DateTime<Utc>) -> FsResult<()> {
        self.fs.set_creation_time_utc(&self.path, time)
    }

    pub fn last_access_time_utc(&self) -> FsResult<DateTime<Utc>> {
        self.fs.last_access_time_utc(&self.path)
    }

    pub fn set_last_access_time_utc(&self, time: DateTime<Utc>) -> FsResult<()> {
        self.fs.set_last_access_time_utc(&self.path, time)
    }

    pub fn last_write_time_utc(&self) -> FsResult<DateTime<Utc>> {
        self.fs.last_write_time_utc(&self.path)
    }

    pub fn set_last_write_time_utc(&self, time: DateTime<Utc>) -> FsResult<()> {
        self.fs.set_last_write_time_utc(&self.path, time)
    }

    pub fn creation_time(&self) -> FsResult<DateTime<Local>> {
        self.fs.creation_time(&self.path)
    }

    pub fn set_creation_time(&self, time: DateTime<Local>) -> FsResult<()> {
        self.fs.set_creation_time(&self.path, time)
    }

    pub fn last_access_time(&self) -> FsResult<DateTime<Local>> {
        self.fs.last_access_time(&self.path)
    }

    pub fn set_last_access_time(&self, time: DateTime<Local>) -> FsResult<()> {
        self.fs.set_last_access_time(&self.path, time)
    }

    pub fn last_write_time(&self) -> FsResult<DateTime<Local>> {
        self.fs.last_write_time(&self.path)
    }

    pub fn set_last_write_time(&self, time: DateTime<Local>) -> FsResult<()> {
        self.fs.set_last_write_time(&self.path, time)
    }

    /// Delete whatever is at this path, file or empty directory
    pub fn delete(&self) -> FsResult<()> {
        if self.fs.directory_exists(&self.path)? {
            self.fs.delete_directory(&self.path)
        } else {
            self.fs.delete_file(&self.path)
        }
    }
}

impl<'fs, F: ?Sized> Clone for EntryInfo<'fs, F> {
    fn clone(&self) -> Self {
        Self {
            fs: self.fs,
            path: self.path.clone(),
        }
    }
}

impl<'fs, F: ?Sized> PartialEq for EntryInfo<'fs, F> {
    /// Same owning instance and same canonical path; facades have no
    /// identity of their own
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.fs, other.fs) && self.path == other.path
    }
}

impl<'fs, F: ?Sized> Eq for EntryInfo<'fs, F> {}

impl<'fs, F: ?Sized> fmt::Debug for EntryInfo<'fs, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryInfo")
            .field("path", &path::display(&self.path))
            .finish()
    }
}

/// Facade for a file path
pub struct FileInfo<'fs, F: ?Sized> {
    entry: EntryInfo<'fs, F>,
}

impl<'fs, F: FileSystem + ?Sized> FileInfo<'fs, F> {
    pub fn new(fs: &'fs F, path: &str) -> Self {
        Self {
            entry: EntryInfo::new(fs, path),
        }
    }

    /// Shared entry surface (attributes, timestamps, parent)
    pub fn entry(&self) -> &EntryInfo<'fs, F> {
        &self.entry
    }

    pub fn into_entry(self) -> EntryInfo<'fs, F> {
        self.entry
    }

    pub fn full_path(&self) -> &str {
        self.entry.full_path()
    }

    pub fn name(&self) -> &str {
        self.entry.name()
    }

    pub fn extension(&self) -> Option<&str> {
        self.entry.extension()
    }

    /// Directory containing this file
    pub fn directory(&self) -> Option<DirectoryInfo<'fs, F>> {
        self.entry.parent()
    }

    /// Whether a file exists at this path
    pub fn exists(&self) -> FsResult<bool> {
        self.entry.fs.file_exists(&self.entry.path)
    }

    pub fn length(&self) -> FsResult<u64> {
        self.entry.fs.file_length(&self.entry.path)
    }

    /// Open with read-write access
    pub fn open(&self, mode: FileMode) -> FsResult<ByteStream<'fs>> {
        self.entry.fs.open(&self.entry.path, mode)
    }

    pub fn open_with(&self, mode: FileMode, access: FileAccess) -> FsResult<ByteStream<'fs>> {
        self.entry.fs.open_file(&self.entry.path, mode, access)
    }

    /// Copy to `destination`, never overwriting
    pub fn copy_to(&self, destination: &str) -> FsResult<()> {
        self.copy_to_with(destination, &CopyOptions::default())
    }

    pub fn copy_to_with(&self, destination: &str, options: &CopyOptions) -> FsResult<()> {
        self.entry.fs.copy_file(&self.entry.path, destination, options)
    }

    /// Move to `destination`, never overwriting
    pub fn move_to(&self, destination: &str) -> FsResult<()> {
        self.move_to_with(destination, &MoveOptions::default())
    }

    pub fn move_to_with(&self, destination: &str, options: &MoveOptions) -> FsResult<()> {
        self.entry.fs.move_file(&self.entry.path, destination, options)
    }

    pub fn delete(&self) -> FsResult<()> {
        self.entry.fs.delete_file(&self.entry.path)
    }
}

impl<'fs, F: ?Sized> Clone for FileInfo<'fs, F> {
    fn clone(&self) -> Self {
        Self {
            entry: self.entry.clone(),
        }
    }
}

impl<'fs, F: ?Sized> PartialEq for FileInfo<'fs, F> {
    fn eq(&self, other: &Self) -> bool {
        self.entry == other.entry
    }
}

impl<'fs, F: ?Sized> Eq for FileInfo<'fs, F> {}

impl<'fs, F: ?Sized> fmt::Debug for FileInfo<'fs, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileInfo")
            .field("path", &path::display(&self.entry.path))
            .finish()
    }
}

/// Facade for a directory path
pub struct DirectoryInfo<'fs, F: ?Sized> {
    entry: EntryInfo<'fs, F>,
}

impl<'fs, F: FileSystem + ?Sized> DirectoryInfo<'fs, F> {
    pub fn new(fs: &'fs F, path: &str) -> Self {
        Self {
            entry: EntryInfo::new(fs, path),
        }
    }

    /// Shared entry surface (attributes, timestamps, parent)
    pub fn entry(&self) -> &EntryInfo<'fs, F> {
        &self.entry
    }

    pub fn into_entry(self) -> EntryInfo<'fs, F> {
        self.entry
    }

    pub fn full_path(&self) -> &str {
        self.entry.full_path()
    }

    pub fn name(&self) -> &str {
        self.entry.name()
    }

    pub fn is_root(&self) -> bool {
        self.entry.path.is_empty()
    }

    pub fn parent(&self) -> Option<DirectoryInfo<'fs, F>> {
        self.entry.parent()
    }

    /// Whether a directory exists at this path
    pub fn exists(&self) -> FsResult<bool> {
        self.entry.fs.directory_exists(&self.entry.path)
    }

    pub fn create(&self) -> FsResult<()> {
        self.entry.fs.create_directory(&self.entry.path)
    }

    /// Delete this directory; `recursive` removes the whole subtree,
    /// children before parents
    pub fn delete(&self, recursive: bool) -> FsResult<()> {
        if recursive {
            self.entry.fs.delete_directory_recursive(&self.entry.path)
        } else {
            self.entry.fs.delete_directory(&self.entry.path)
        }
    }

    pub fn move_to(&self, destination: &str) -> FsResult<()> {
        self.entry.fs.move_directory(&self.entry.path, destination)
    }

    pub fn files(&self) -> FsResult<Vec<FileInfo<'fs, F>>> {
        self.files_matching(crate::pattern::MATCH_ALL)
    }

    pub fn files_matching(&self, pattern: &str) -> FsResult<Vec<FileInfo<'fs, F>>> {
        let fs = self.entry.fs;
        Ok(fs
            .files_matching(&self.entry.path, pattern)?
            .iter()
            .map(|p| FileInfo::new(fs, p))
            .collect())
    }

    pub fn directories(&self) -> FsResult<Vec<DirectoryInfo<'fs, F>>> {
        self.directories_matching(crate::pattern::MATCH_ALL)
    }

    pub fn directories_matching(&self, pattern: &str) -> FsResult<Vec<DirectoryInfo<'fs, F>>> {
        let fs = self.entry.fs;
        Ok(fs
            .directories_matching(&self.entry.path, pattern)?
            .iter()
            .map(|p| DirectoryInfo::new(fs, p))
            .collect())
    }

    pub fn entries(&self) -> FsResult<Vec<EntryInfo<'fs, F>>> {
        self.entries_matching(crate::pattern::MATCH_ALL)
    }

    pub fn entries_matching(&self, pattern: &str) -> FsResult<Vec<EntryInfo<'fs, F>>> {
        let fs = self.entry.fs;
        Ok(fs
            .entries_matching(&self.entry.path, pattern)?
            .iter()
            .map(|p| EntryInfo::new(fs, p))
            .collect())
    }
}

impl<'fs, F: ?Sized> Clone for DirectoryInfo<'fs, F> {
    fn clone(&self) -> Self {
        Self {
            entry: self.entry.clone(),
        }
    }
}

impl<'fs, F: ?Sized> PartialEq for DirectoryInfo<'fs, F> {
    fn eq(&self, other: &Self) -> bool {
        self.entry == other.entry
    }
}

impl<'fs, F: ?Sized> Eq for DirectoryInfo<'fs, F> {}

impl<'fs, F: ?Sized> fmt::Debug for DirectoryInfo<'fs, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryInfo")
            .field("path", &path::display(&self.entry.path))
            .finish()
    }
}
