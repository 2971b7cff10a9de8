//! Contract-level behavior driven through the RAM driver
//!
//! Everything here exercises derived operations and facades, so it holds for
//! any driver that implements the mandatory primitives correctly.

use std::io::{Read, Seek, SeekFrom, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use unifs_core::{
    attributes::FileAttributes,
    contract::FileSystem,
    error::{FsError, FsResult},
    lifecycle::LifecycleGuard,
    operations::{CopyOptions, MoveOptions, SearchScope},
    options::FileSystemOptions,
    stream::{ByteStream, FileAccess, FileMode},
    times,
};
use unifs_mem::RamFileSystem;

fn sample_tree() -> RamFileSystem {
    let fs = RamFileSystem::new("sample");
    fs.create_directory("a/b").unwrap();
    write_file(&fs, "a/f1.txt", b"first");
    write_file(&fs, "a/f2.txt", b"second");
    write_file(&fs, "a/b/f3.txt", b"third");
    fs
}

fn write_file(fs: &impl FileSystem, path: &str, content: &[u8]) {
    let mut stream = fs.open(path, FileMode::Create).unwrap();
    stream.write_all(content).unwrap();
}

fn read_file(fs: &impl FileSystem, path: &str) -> Vec<u8> {
    let mut stream = fs
        .open_file(path, FileMode::Open, FileAccess::Read)
        .unwrap();
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).unwrap();
    buf
}

#[test]
fn exists_is_file_or_directory() {
    let fs = sample_tree();
    for path in ["", "a", "a/b", "a/f1.txt", "a/b/f3.txt", "nope", "a/nope"] {
        assert_eq!(
            fs.exists(path).unwrap(),
            fs.file_exists(path).unwrap() || fs.directory_exists(path).unwrap(),
            "path {:?}",
            path
        );
    }
}

#[test]
fn file_and_directory_existence_never_overlap() {
    let fs = sample_tree();
    for path in ["", "a", "a/f1.txt"] {
        assert!(!(fs.file_exists(path).unwrap() && fs.directory_exists(path).unwrap()));
    }
}

#[test]
fn local_time_accessors_round_trip() {
    let fs = sample_tree();
    let original = Utc.with_ymd_and_hms(2003, 7, 14, 8, 30, 15).unwrap();
    fs.set_creation_time_utc("a/f1.txt", original).unwrap();

    // Converting through the local accessor and back must reproduce the
    // stored UTC instant exactly.
    let local = fs.creation_time("a/f1.txt").unwrap();
    fs.set_creation_time("a/f1.txt", local).unwrap();
    assert_eq!(fs.creation_time_utc("a/f1.txt").unwrap(), original);

    let t = Utc.with_ymd_and_hms(1985, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(times::to_utc(times::to_local(t)), t);
}

#[test]
fn recursive_delete_removes_the_whole_tree() {
    let fs = sample_tree();

    // The non-recursive primitive refuses a populated directory, so a
    // successful recursive delete proves children went before parents.
    assert!(matches!(fs.delete_directory("a"), Err(FsError::NotEmpty(_))));

    fs.delete_directory_recursive("a").unwrap();
    for path in ["a", "a/b", "a/f1.txt", "a/f2.txt", "a/b/f3.txt"] {
        assert!(!fs.exists(path).unwrap(), "{:?} survived", path);
    }
}

#[test]
fn non_overwrite_copy_leaves_destination_untouched() {
    let fs = sample_tree();
    let err = fs
        .copy_file("a/f1.txt", "a/f2.txt", &CopyOptions::default())
        .unwrap_err();
    assert!(matches!(err, FsError::AlreadyExists(_)));
    assert_eq!(read_file(&fs, "a/f2.txt"), b"second");

    fs.copy_file("a/f1.txt", "a/f2.txt", &CopyOptions { overwrite: true })
        .unwrap();
    assert_eq!(read_file(&fs, "a/f2.txt"), b"first");
}

#[test]
fn non_overwrite_move_leaves_destination_untouched() {
    let fs = sample_tree();
    let err = fs
        .move_file("a/f1.txt", "a/f2.txt", &MoveOptions::default())
        .unwrap_err();
    assert!(matches!(err, FsError::AlreadyExists(_)));
    assert_eq!(read_file(&fs, "a/f2.txt"), b"second");
    assert!(fs.file_exists("a/f1.txt").unwrap());
}

#[test]
fn default_search_equals_match_all_this_level() {
    let fs = sample_tree();
    assert_eq!(
        fs.files_in("a").unwrap(),
        fs.get_files("a", "*.*", SearchScope::ThisLevel).unwrap()
    );
    assert_eq!(
        fs.directories_in("a").unwrap(),
        fs.get_directories("a", "*.*", SearchScope::ThisLevel).unwrap()
    );
    assert_eq!(fs.files_matching("a", "*.txt").unwrap().len(), 2);
}

#[test]
fn entries_cover_files_and_directories() {
    let fs = sample_tree();
    let entries = fs.entries_in("a").unwrap();
    assert_eq!(entries, vec!["a/b", "a/f1.txt", "a/f2.txt"]);
}

#[test]
fn facade_for_missing_path_is_cheap() {
    let fs = RamFileSystem::new("v");
    let info = fs.file_info("/nope");
    assert_eq!(info.full_path(), "nope");
    assert_eq!(info.name(), "nope");
    assert!(!info.exists().unwrap());
    assert!(info.length().unwrap_err().is_not_found());
}

#[test]
fn facade_construction_touches_nothing() {
    let fs = RamFileSystem::new("v");
    fs.dispose().unwrap();

    // Construction still succeeds after disposal; only the first real
    // operation reaches the driver and fails.
    let info = fs.entry_info("somewhere/deep");
    assert_eq!(info.name(), "deep");
    assert!(matches!(info.exists(), Err(FsError::Disposed)));
}

#[test]
fn facades_are_interchangeable_by_path() {
    let fs = RamFileSystem::new("v");
    let a = fs.file_info("/a//b/c.txt");
    let b = fs.file_info("a/b/c.txt");
    assert_eq!(a, b);
    assert_ne!(fs.file_info("a/b/c.txt"), fs.file_info("a/b/d.txt"));

    let other = RamFileSystem::new("v");
    assert_ne!(fs.file_info("a"), other.file_info("a"));
}

#[test]
fn facades_see_external_changes() {
    let fs = sample_tree();
    let info = fs.file_info("a/f1.txt");
    assert!(info.exists().unwrap());
    fs.delete_file("a/f1.txt").unwrap();
    assert!(!info.exists().unwrap());
}

#[test]
fn file_facade_operations() {
    let fs = sample_tree();
    let info = fs.file_info("a/f1.txt");
    assert_eq!(info.length().unwrap(), 5);
    assert_eq!(info.extension(), Some("txt"));
    assert_eq!(info.directory().unwrap().full_path(), "a");

    let mut stream = info.open(FileMode::Open).unwrap();
    stream.seek(SeekFrom::End(0)).unwrap();
    stream.write_all(b"!").unwrap();
    drop(stream);
    assert_eq!(info.length().unwrap(), 6);

    info.copy_to("a/copied.txt").unwrap();
    assert!(fs.file_exists("a/copied.txt").unwrap());
    info.move_to("a/renamed.txt").unwrap();
    assert!(!info.exists().unwrap());
    assert!(fs.file_exists("a/renamed.txt").unwrap());
}

#[test]
fn directory_facade_operations() {
    let fs = sample_tree();
    let dir = fs.directory_info("a");
    assert!(dir.exists().unwrap());
    assert!(dir.parent().unwrap().is_root());

    let files = dir.files().unwrap();
    let names: Vec<&str> = files.iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["f1.txt", "f2.txt"]);

    let subdirs = dir.directories().unwrap();
    assert_eq!(subdirs.len(), 1);
    assert_eq!(subdirs[0].full_path(), "a/b");

    let fresh = fs.directory_info("newdir");
    assert!(!fresh.exists().unwrap());
    fresh.create().unwrap();
    assert!(fresh.exists().unwrap());

    dir.delete(true).unwrap();
    assert!(!dir.exists().unwrap());
}

#[test]
fn entry_facade_attributes_and_times() {
    let fs = sample_tree();
    let entry = fs.entry_info("a/f1.txt");
    entry.set_attributes(FileAttributes::HIDDEN).unwrap();
    assert!(entry.attributes().unwrap().is_hidden());

    let t = Utc.with_ymd_and_hms(2010, 5, 4, 3, 2, 1).unwrap();
    entry.set_last_write_time_utc(t).unwrap();
    assert_eq!(entry.last_write_time_utc().unwrap(), t);
    assert_eq!(times::to_utc(entry.last_write_time().unwrap()), t);
}

#[test]
fn capability_queries() {
    let fs = RamFileSystem::new("volume-1");
    assert_eq!(fs.friendly_name(), "RAM File System");
    assert_eq!(fs.volume_label().unwrap(), "volume-1");
    assert!(fs.can_write());
    assert!(fs.is_thread_safe());
    assert!(fs.options().case_sensitive());

    let frozen = RamFileSystem::read_only("frozen");
    assert!(!frozen.can_write());
}

#[test]
fn dispose_is_idempotent() {
    let fs = RamFileSystem::new("v");
    fs.dispose().unwrap();
    fs.dispose().unwrap();
    assert_eq!(fs.release_calls(), 1);
    assert!(matches!(fs.file_exists("x"), Err(FsError::Disposed)));
}

// A layered driver: delegates to an inner volume, optionally failing
// deletion of one path, and counts release-hook runs through an external
// handle so the count stays observable after the instance is dropped.
struct ObservedFs {
    inner: RamFileSystem,
    poisoned: Option<String>,
    hook_runs: Arc<AtomicUsize>,
}

impl ObservedFs {
    fn new(inner: RamFileSystem, hook_runs: Arc<AtomicUsize>) -> Self {
        Self {
            inner,
            poisoned: None,
            hook_runs,
        }
    }

    fn poison(mut self, path: &str) -> Self {
        self.poisoned = Some(path.to_string());
        self
    }
}

impl FileSystem for ObservedFs {
    fn friendly_name(&self) -> &str {
        self.inner.friendly_name()
    }

    fn volume_label(&self) -> FsResult<String> {
        self.inner.volume_label()
    }

    fn can_write(&self) -> bool {
        self.inner.can_write()
    }

    fn is_thread_safe(&self) -> bool {
        self.inner.is_thread_safe()
    }

    fn options(&self) -> FileSystemOptions {
        self.inner.options()
    }

    fn size(&self) -> FsResult<u64> {
        self.inner.size()
    }

    fn used_space(&self) -> FsResult<u64> {
        self.inner.used_space()
    }

    fn available_space(&self) -> FsResult<u64> {
        self.inner.available_space()
    }

    fn copy_file(&self, source: &str, destination: &str, options: &CopyOptions) -> FsResult<()> {
        self.inner.copy_file(source, destination, options)
    }

    fn create_directory(&self, path: &str) -> FsResult<()> {
        self.inner.create_directory(path)
    }

    fn delete_directory(&self, path: &str) -> FsResult<()> {
        self.inner.delete_directory(path)
    }

    fn delete_file(&self, path: &str) -> FsResult<()> {
        if self.poisoned.as_deref() == Some(path) {
            return Err(FsError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "simulated medium fault",
            )));
        }
        self.inner.delete_file(path)
    }

    fn directory_exists(&self, path: &str) -> FsResult<bool> {
        self.inner.directory_exists(path)
    }

    fn file_exists(&self, path: &str) -> FsResult<bool> {
        self.inner.file_exists(path)
    }

    fn get_directories(
        &self,
        path: &str,
        pattern: &str,
        scope: SearchScope,
    ) -> FsResult<Vec<String>> {
        self.inner.get_directories(path, pattern, scope)
    }

    fn get_files(&self, path: &str, pattern: &str, scope: SearchScope) -> FsResult<Vec<String>> {
        self.inner.get_files(path, pattern, scope)
    }

    fn get_entries(&self, path: &str, pattern: &str, scope: SearchScope) -> FsResult<Vec<String>> {
        self.inner.get_entries(path, pattern, scope)
    }

    fn move_directory(&self, source: &str, destination: &str) -> FsResult<()> {
        self.inner.move_directory(source, destination)
    }

    fn move_file(&self, source: &str, destination: &str, options: &MoveOptions) -> FsResult<()> {
        self.inner.move_file(source, destination, options)
    }

    fn open_file(
        &self,
        path: &str,
        mode: FileMode,
        access: FileAccess,
    ) -> FsResult<ByteStream<'_>> {
        self.inner.open_file(path, mode, access)
    }

    fn attributes(&self, path: &str) -> FsResult<FileAttributes> {
        self.inner.attributes(path)
    }

    fn set_attributes(&self, path: &str, attributes: FileAttributes) -> FsResult<()> {
        self.inner.set_attributes(path, attributes)
    }

    fn creation_time_utc(&self, path: &str) -> FsResult<DateTime<Utc>> {
        self.inner.creation_time_utc(path)
    }

    fn set_creation_time_utc(&self, path: &str, time: DateTime<Utc>) -> FsResult<()> {
        self.inner.set_creation_time_utc(path, time)
    }

    fn last_access_time_utc(&self, path: &str) -> FsResult<DateTime<Utc>> {
        self.inner.last_access_time_utc(path)
    }

    fn set_last_access_time_utc(&self, path: &str, time: DateTime<Utc>) -> FsResult<()> {
        self.inner.set_last_access_time_utc(path, time)
    }

    fn last_write_time_utc(&self, path: &str) -> FsResult<DateTime<Utc>> {
        self.inner.last_write_time_utc(path)
    }

    fn set_last_write_time_utc(&self, path: &str, time: DateTime<Utc>) -> FsResult<()> {
        self.inner.set_last_write_time_utc(path, time)
    }

    fn file_length(&self, path: &str) -> FsResult<u64> {
        self.inner.file_length(path)
    }

    fn lifecycle(&self) -> &LifecycleGuard {
        self.inner.lifecycle()
    }

    fn release_resources(&self) -> FsResult<()> {
        self.hook_runs.fetch_add(1, Ordering::AcqRel);
        self.inner.release_resources()
    }
}

impl Drop for ObservedFs {
    fn drop(&mut self) {
        if self.lifecycle().begin_release() {
            let _ = self.release_resources();
        }
    }
}

#[test]
fn recursive_delete_aborts_at_first_failure_without_rollback() {
    let hook_runs = Arc::new(AtomicUsize::new(0));
    let fs = ObservedFs::new(sample_tree(), hook_runs).poison("a/f1.txt");

    let err = fs.delete_directory_recursive("a").unwrap_err();
    assert!(matches!(err, FsError::Io(_)));

    // Subdirectories were handled first, so a/b is already gone; the failed
    // file, its later sibling, and the parent all survive untouched.
    assert!(!fs.exists("a/b").unwrap());
    assert!(!fs.exists("a/b/f3.txt").unwrap());
    assert!(fs.file_exists("a/f1.txt").unwrap());
    assert!(fs.file_exists("a/f2.txt").unwrap());
    assert!(fs.directory_exists("a").unwrap());
}

#[test]
fn release_hook_runs_once_across_dispose_and_drop() {
    let hook_runs = Arc::new(AtomicUsize::new(0));
    {
        let fs = ObservedFs::new(RamFileSystem::new("v"), Arc::clone(&hook_runs));
        fs.dispose().unwrap();
        fs.dispose().unwrap();
        assert_eq!(hook_runs.load(Ordering::Acquire), 1);
    }
    // Drop after explicit disposal must not re-run the hook.
    assert_eq!(hook_runs.load(Ordering::Acquire), 1);

    let hook_runs = Arc::new(AtomicUsize::new(0));
    {
        let _fs = ObservedFs::new(RamFileSystem::new("v"), Arc::clone(&hook_runs));
        // Never disposed explicitly; the safety net takes over.
    }
    assert_eq!(hook_runs.load(Ordering::Acquire), 1);
}
