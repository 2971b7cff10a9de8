//! The driver contract
//!
//! [`FileSystem`] is the whole surface a format driver has to provide:
//! capability queries plus the mandatory primitives. Every method with a
//! default body is a derived operation composed purely from primitives, so a
//! driver inherits the full caller-facing API by implementing the required
//! set and nothing else.

use bytes::Bytes;
use chrono::{DateTime, Local, Utc};

use crate::{
    attributes::FileAttributes,
    error::FsResult,
    info::{DirectoryInfo, EntryInfo, FileInfo},
    lifecycle::LifecycleGuard,
    operations::{CopyOptions, MoveOptions, SearchScope},
    options::FileSystemOptions,
    pattern::MATCH_ALL,
    stream::{ByteStream, FileAccess, FileMode},
    times,
};

/// Uniform contract over one mounted volume
///
/// Paths are caller-supplied `/`-separated strings and are not pre-validated
/// here; validation and error policy for malformed paths belong to drivers.
/// Search results are full paths from the volume root, materialized and
/// deterministic per call given unchanged state.
///
/// Implementations are `Send + Sync` so instances can be shared, but callers
/// must still serialize mutating operations unless [`is_thread_safe`] is
/// truthfully reported as `true`.
///
/// [`is_thread_safe`]: FileSystem::is_thread_safe
pub trait FileSystem: Send + Sync {
    // ---- capability queries ----

    /// Human-readable driver/format name, e.g. `"RAM file system"`
    fn friendly_name(&self) -> &str;

    /// Volume label, empty if the format has none
    fn volume_label(&self) -> FsResult<String>;

    /// Fixed at construction; `false` for read-only mounts
    fn can_write(&self) -> bool;

    /// Whether concurrent mutating calls are safe without caller locking
    fn is_thread_safe(&self) -> bool;

    /// Snapshot of the mutable options record
    fn options(&self) -> FileSystemOptions;

    /// Total capacity of the volume in bytes
    fn size(&self) -> FsResult<u64>;

    /// Bytes in use. `used_space + available_space` need not equal `size`;
    /// formats may report overhead discrepancies.
    fn used_space(&self) -> FsResult<u64>;

    /// Bytes still available
    fn available_space(&self) -> FsResult<u64>;

    // ---- mandatory primitives ----

    /// Copy file content and driver-defined metadata.
    ///
    /// Fails `NotFound` if the source is absent and `AlreadyExists` if the
    /// destination exists while `options.overwrite` is false, in which case
    /// the destination is left untouched. No atomicity is imposed here;
    /// a driver may provide it.
    fn copy_file(&self, source: &str, destination: &str, options: &CopyOptions) -> FsResult<()>;

    /// Create a directory.
    ///
    /// Not guaranteed idempotent: drivers may fail `AlreadyExists` for an
    /// existing directory, and must fail `InvalidPath` when an ancestor
    /// segment exists as a non-directory.
    fn create_directory(&self, path: &str) -> FsResult<()>;

    /// Delete an empty directory; fails `NotEmpty` when populated.
    ///
    /// See [`delete_directory_recursive`] for the derived recursive variant.
    ///
    /// [`delete_directory_recursive`]: FileSystem::delete_directory_recursive
    fn delete_directory(&self, path: &str) -> FsResult<()>;

    /// Delete a file; fails `NotFound` if absent
    fn delete_file(&self, path: &str) -> FsResult<()>;

    /// Whether a directory exists at `path`. Never fails for mere absence,
    /// though drivers may fail `Io` for malformed paths.
    fn directory_exists(&self, path: &str) -> FsResult<bool>;

    /// Whether a file exists at `path`. Same failure policy as
    /// [`directory_exists`].
    ///
    /// [`directory_exists`]: FileSystem::directory_exists
    fn file_exists(&self, path: &str) -> FsResult<bool>;

    /// Full paths of subdirectories of `path` whose names match `pattern`
    fn get_directories(
        &self,
        path: &str,
        pattern: &str,
        scope: SearchScope,
    ) -> FsResult<Vec<String>>;

    /// Full paths of files under `path` whose names match `pattern`
    fn get_files(&self, path: &str, pattern: &str, scope: SearchScope) -> FsResult<Vec<String>>;

    /// Full paths of all entries under `path` whose names match `pattern`
    fn get_entries(&self, path: &str, pattern: &str, scope: SearchScope) -> FsResult<Vec<String>>;

    /// Move a directory and everything beneath it.
    ///
    /// Fails `AlreadyExists` if the destination exists. Drivers spanning
    /// instances signal `CrossFileSystem` for a foreign destination.
    fn move_directory(&self, source: &str, destination: &str) -> FsResult<()>;

    /// Move a file; overwrite semantics as [`copy_file`]
    ///
    /// [`copy_file`]: FileSystem::copy_file
    fn move_file(&self, source: &str, destination: &str, options: &MoveOptions) -> FsResult<()>;

    /// Open a seekable byte stream over one file.
    ///
    /// Fails `AccessDenied` when `access` requests writing on a read-only
    /// mount. The handle's position is independent of the instance, but the
    /// handle must not outlive it.
    fn open_file(&self, path: &str, mode: FileMode, access: FileAccess)
        -> FsResult<ByteStream<'_>>;

    /// Attribute mask of the entry at `path`
    fn attributes(&self, path: &str) -> FsResult<FileAttributes>;

    /// Replace the attribute mask; nothing is recomputed implicitly
    fn set_attributes(&self, path: &str, attributes: FileAttributes) -> FsResult<()>;

    fn creation_time_utc(&self, path: &str) -> FsResult<DateTime<Utc>>;

    fn set_creation_time_utc(&self, path: &str, time: DateTime<Utc>) -> FsResult<()>;

    fn last_access_time_utc(&self, path: &str) -> FsResult<DateTime<Utc>>;

    fn set_last_access_time_utc(&self, path: &str, time: DateTime<Utc>) -> FsResult<()>;

    fn last_write_time_utc(&self, path: &str) -> FsResult<DateTime<Utc>>;

    fn set_last_write_time_utc(&self, path: &str, time: DateTime<Utc>) -> FsResult<()>;

    /// Length of a file in bytes; fails `NotFound` for absent or non-file paths
    fn file_length(&self, path: &str) -> FsResult<u64>;

    // ---- lifecycle ----

    /// The release gate shared by [`dispose`] and the driver's `Drop` impl
    ///
    /// [`dispose`]: FileSystem::dispose
    fn lifecycle(&self) -> &LifecycleGuard;

    /// Release hook, run at most once per instance.
    ///
    /// The guard already guarantees single invocation, but implementations
    /// should still tolerate a repeat call without fault.
    fn release_resources(&self) -> FsResult<()> {
        Ok(())
    }

    // ---- derived operations ----

    /// Explicit release. The first call runs [`release_resources`]; later
    /// calls (and a later `Drop`) are no-ops. After disposal drivers fail
    /// further operations rather than silently ignoring them.
    ///
    /// [`release_resources`]: FileSystem::release_resources
    fn dispose(&self) -> FsResult<()> {
        if self.lifecycle().begin_release() {
            self.release_resources()
        } else {
            Ok(())
        }
    }

    /// Whether anything exists at `path`
    fn exists(&self, path: &str) -> FsResult<bool> {
        Ok(self.file_exists(path)? || self.directory_exists(path)?)
    }

    /// Delete a directory tree, children before parents.
    ///
    /// Subdirectories are fully removed first, then immediate files, then the
    /// directory itself. Siblings go in enumeration order; the first child
    /// failure aborts the walk and surfaces unchanged, leaving already-deleted
    /// children gone and the rest intact. There is no rollback.
    fn delete_directory_recursive(&self, path: &str) -> FsResult<()> {
        for dir in self.get_directories(path, MATCH_ALL, SearchScope::ThisLevel)? {
            self.delete_directory_recursive(&dir)?;
        }
        for file in self.get_files(path, MATCH_ALL, SearchScope::ThisLevel)? {
            self.delete_file(&file)?;
        }
        self.delete_directory(path)
    }

    /// Immediate subdirectories, default pattern
    fn directories_in(&self, path: &str) -> FsResult<Vec<String>> {
        self.get_directories(path, MATCH_ALL, SearchScope::ThisLevel)
    }

    /// Immediate subdirectories matching `pattern`
    fn directories_matching(&self, path: &str, pattern: &str) -> FsResult<Vec<String>> {
        self.get_directories(path, pattern, SearchScope::ThisLevel)
    }

    /// Immediate files, default pattern
    fn files_in(&self, path: &str) -> FsResult<Vec<String>> {
        self.get_files(path, MATCH_ALL, SearchScope::ThisLevel)
    }

    /// Immediate files matching `pattern`
    fn files_matching(&self, path: &str, pattern: &str) -> FsResult<Vec<String>> {
        self.get_files(path, pattern, SearchScope::ThisLevel)
    }

    /// Immediate entries of any kind, default pattern
    fn entries_in(&self, path: &str) -> FsResult<Vec<String>> {
        self.get_entries(path, MATCH_ALL, SearchScope::ThisLevel)
    }

    /// Immediate entries of any kind matching `pattern`
    fn entries_matching(&self, path: &str, pattern: &str) -> FsResult<Vec<String>> {
        self.get_entries(path, pattern, SearchScope::ThisLevel)
    }

    /// Open with read-write access
    fn open(&self, path: &str, mode: FileMode) -> FsResult<ByteStream<'_>> {
        self.open_file(path, mode, FileAccess::ReadWrite)
    }

    fn creation_time(&self, path: &str) -> FsResult<DateTime<Local>> {
        Ok(times::to_local(self.creation_time_utc(path)?))
    }

    fn set_creation_time(&self, path: &str, time: DateTime<Local>) -> FsResult<()> {
        self.set_creation_time_utc(path, times::to_utc(time))
    }

    fn last_access_time(&self, path: &str) -> FsResult<DateTime<Local>> {
        Ok(times::to_local(self.last_access_time_utc(path)?))
    }

    fn set_last_access_time(&self, path: &str, time: DateTime<Local>) -> FsResult<()> {
        self.set_last_access_time_utc(path, times::to_utc(time))
    }

    fn last_write_time(&self, path: &str) -> FsResult<DateTime<Local>> {
        Ok(times::to_local(self.last_write_time_utc(path)?))
    }

    fn set_last_write_time(&self, path: &str, time: DateTime<Local>) -> FsResult<()> {
        self.set_last_write_time_utc(path, times::to_utc(time))
    }

    /// Boot-sector bytes for formats that carry them; `None` by default
    fn read_boot_code(&self) -> FsResult<Option<Bytes>> {
        Ok(None)
    }

    /// Facade for a file path, valid whether or not the path exists
    fn file_info(&self, path: &str) -> FileInfo<'_, Self>
    where
        Self: Sized,
    {
        FileInfo::new(self, path)
    }

    /// Facade for a directory path, valid whether or not the path exists
    fn directory_info(&self, path: &str) -> DirectoryInfo<'_, Self>
    where
        Self: Sized,
    {
        DirectoryInfo::new(self, path)
    }

    /// Facade for a path of unknown kind, valid whether or not it exists
    fn entry_info(&self, path: &str) -> EntryInfo<'_, Self>
    where
        Self: Sized,
    {
        EntryInfo::new(self, path)
    }
}
