//! RAM-backed volume

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use unifs_core::{
    attributes::FileAttributes,
    contract::FileSystem,
    error::{FsError, FsResult},
    lifecycle::LifecycleGuard,
    operations::{CopyOptions, MoveOptions, SearchScope},
    options::FileSystemOptions,
    path,
    pattern::SearchPattern,
    stream::{ByteStream, FileAccess, FileMode},
    times::FileTimes,
};

use crate::stream::RamStream;

const DEFAULT_CAPACITY: u64 = 64 * 1024 * 1024;

#[derive(Debug)]
struct FileNode {
    content: Arc<RwLock<Vec<u8>>>,
    attributes: FileAttributes,
    times: FileTimes,
}

#[derive(Debug)]
struct DirNode {
    attributes: FileAttributes,
    times: FileTimes,
}

#[derive(Debug)]
enum Node {
    File(FileNode),
    Dir(DirNode),
}

impl Node {
    fn dir(at: DateTime<Utc>) -> Self {
        Node::Dir(DirNode {
            attributes: FileAttributes::empty(),
            times: FileTimes::all_at(at),
        })
    }

    fn file(attributes: FileAttributes, at: DateTime<Utc>) -> Self {
        Node::File(FileNode {
            content: Arc::new(RwLock::new(Vec::new())),
            attributes,
            times: FileTimes::all_at(at),
        })
    }

    fn is_dir(&self) -> bool {
        matches!(self, Node::Dir(_))
    }

    fn is_file(&self) -> bool {
        matches!(self, Node::File(_))
    }

    fn times(&self) -> &FileTimes {
        match self {
            Node::File(f) => &f.times,
            Node::Dir(d) => &d.times,
        }
    }

    fn times_mut(&mut self) -> &mut FileTimes {
        match self {
            Node::File(f) => &mut f.times,
            Node::Dir(d) => &mut d.times,
        }
    }

    fn attributes(&self) -> FileAttributes {
        match self {
            Node::File(f) => f.attributes,
            Node::Dir(d) => d.attributes | FileAttributes::DIRECTORY,
        }
    }

    fn set_attributes(&mut self, attributes: FileAttributes) {
        // DIRECTORY is derived from the node kind, never stored.
        let stored = attributes & !FileAttributes::DIRECTORY;
        match self {
            Node::File(f) => f.attributes = stored,
            Node::Dir(d) => d.attributes = stored,
        }
    }
}

/// Entry kinds a search keeps
#[derive(Clone, Copy)]
enum Want {
    Directories,
    Files,
    Entries,
}

/// The node table, keyed by canonical path; the root is the empty key
#[derive(Debug, Default)]
struct Volume {
    nodes: BTreeMap<String, Node>,
}

impl Volume {
    fn node(&self, path: &str) -> Option<&Node> {
        self.nodes.get(path)
    }

    fn is_dir(&self, path: &str) -> bool {
        self.node(path).is_some_and(Node::is_dir)
    }

    fn is_file(&self, path: &str) -> bool {
        self.node(path).is_some_and(Node::is_file)
    }

    fn file(&self, path: &str) -> FsResult<&FileNode> {
        match self.node(path) {
            Some(Node::File(f)) => Ok(f),
            _ => Err(FsError::NotFound(path::display(path))),
        }
    }
}

/// A writable (or read-only) volume living entirely in memory
///
/// Implements the mandatory primitives of [`FileSystem`] and nothing else;
/// recursive deletion, default searches, local-time accessors, and the
/// facades all arrive through the contract's derived layer.
pub struct RamFileSystem {
    label: String,
    writable: bool,
    capacity: u64,
    volume: RwLock<Volume>,
    options: RwLock<FileSystemOptions>,
    boot_code: Option<Bytes>,
    guard: LifecycleGuard,
    release_calls: AtomicUsize,
}

impl RamFileSystem {
    /// Writable volume with the default capacity
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_capacity(label, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(label: impl Into<String>, capacity: u64) -> Self {
        Self::mount(label.into(), capacity, true)
    }

    /// Read-only mount; every mutating operation fails `AccessDenied`
    pub fn read_only(label: impl Into<String>) -> Self {
        Self::mount(label.into(), DEFAULT_CAPACITY, false)
    }

    fn mount(label: String, capacity: u64, writable: bool) -> Self {
        let mut volume = Volume::default();
        volume.nodes.insert(String::new(), Node::dir(Utc::now()));
        tracing::debug!("mounted ram volume {:?} ({} bytes)", label, capacity);
        Self {
            label,
            writable,
            capacity,
            volume: RwLock::new(volume),
            options: RwLock::new(FileSystemOptions::default()),
            boot_code: None,
            guard: LifecycleGuard::new(),
            release_calls: AtomicUsize::new(0),
        }
    }

    /// Attach boot-sector bytes reported through `read_boot_code`
    pub fn with_boot_code(mut self, code: Bytes) -> Self {
        self.boot_code = Some(code);
        self
    }

    /// Mutate the live options record in place
    pub fn update_options(&self, f: impl FnOnce(&mut FileSystemOptions)) {
        f(&mut self.options.write());
    }

    /// How many times the release hook has run; at most 1 however the
    /// instance goes out of use
    pub fn release_calls(&self) -> usize {
        self.release_calls.load(Ordering::Acquire)
    }

    fn check_writable(&self) -> FsResult<()> {
        if self.writable {
            Ok(())
        } else {
            Err(FsError::AccessDenied("read-only file system".into()))
        }
    }

    /// Parent of `path` must exist as a directory before anything is created
    /// or moved there
    fn check_parent_dir(volume: &Volume, path: &str) -> FsResult<()> {
        match path::parent_of(path) {
            Some(parent) if volume.is_dir(&parent) => Ok(()),
            Some(parent) => Err(FsError::InvalidPath(format!(
                "{} is not a directory",
                path::display(&parent)
            ))),
            None => Err(FsError::InvalidPath("/".into())),
        }
    }

    fn find_matches(
        &self,
        path: &str,
        pattern: &str,
        scope: SearchScope,
        want: Want,
    ) -> FsResult<Vec<String>> {
        self.guard.ensure_live()?;
        let start = path::normalize(path);
        let matcher = SearchPattern::compile(pattern, self.options.read().case_sensitive())?;
        let volume = self.volume.read();
        if !volume.is_dir(&start) {
            return Err(FsError::NotFound(path::display(&start)));
        }

        let prefix = if start.is_empty() {
            String::new()
        } else {
            format!("{}/", start)
        };
        let mut matches = Vec::new();
        for (key, node) in &volume.nodes {
            if key.is_empty() {
                continue;
            }
            let in_scope = match scope {
                SearchScope::ThisLevel => {
                    path::parent_of(key).as_deref() == Some(start.as_str())
                }
                SearchScope::AllLevels => key.starts_with(&prefix),
            };
            if !in_scope {
                continue;
            }
            let wanted = match want {
                Want::Directories => node.is_dir(),
                Want::Files => node.is_file(),
                Want::Entries => true,
            };
            if wanted && matcher.matches(path::file_name(key)) {
                matches.push(key.clone());
            }
        }
        Ok(matches)
    }

    fn with_node<T>(
        &self,
        path: &str,
        f: impl FnOnce(&Node) -> T,
    ) -> FsResult<T> {
        self.guard.ensure_live()?;
        let canonical = path::normalize(path);
        let volume = self.volume.read();
        match volume.node(&canonical) {
            Some(node) => Ok(f(node)),
            None => Err(FsError::NotFound(path::display(&canonical))),
        }
    }

    fn with_node_mut<T>(
        &self,
        path: &str,
        f: impl FnOnce(&mut Node) -> T,
    ) -> FsResult<T> {
        self.guard.ensure_live()?;
        self.check_writable()?;
        let canonical = path::normalize(path);
        let mut volume = self.volume.write();
        match volume.nodes.get_mut(&canonical) {
            Some(node) => Ok(f(node)),
            None => Err(FsError::NotFound(path::display(&canonical))),
        }
    }
}

impl FileSystem for RamFileSystem {
    fn friendly_name(&self) -> &str {
        "RAM File System"
    }

    fn volume_label(&self) -> FsResult<String> {
        self.guard.ensure_live()?;
        Ok(self.label.clone())
    }

    fn can_write(&self) -> bool {
        self.writable
    }

    fn is_thread_safe(&self) -> bool {
        true
    }

    fn options(&self) -> FileSystemOptions {
        self.options.read().clone()
    }

    fn size(&self) -> FsResult<u64> {
        self.guard.ensure_live()?;
        Ok(self.capacity)
    }

    fn used_space(&self) -> FsResult<u64> {
        self.guard.ensure_live()?;
        let volume = self.volume.read();
        Ok(volume
            .nodes
            .values()
            .map(|node| match node {
                Node::File(f) => f.content.read().len() as u64,
                Node::Dir(_) => 0,
            })
            .sum())
    }

    fn available_space(&self) -> FsResult<u64> {
        Ok(self.capacity.saturating_sub(self.used_space()?))
    }

    fn copy_file(&self, source: &str, destination: &str, options: &CopyOptions) -> FsResult<()> {
        self.guard.ensure_live()?;
        self.check_writable()?;
        let src = path::normalize(source);
        let dst = path::normalize(destination);
        let mut volume = self.volume.write();

        let copied = {
            let node = volume.file(&src)?;
            FileNode {
                content: Arc::new(RwLock::new(node.content.read().clone())),
                attributes: node.attributes,
                times: node.times,
            }
        };
        if volume.is_dir(&dst) || (volume.is_file(&dst) && !options.overwrite) {
            return Err(FsError::AlreadyExists(path::display(&dst)));
        }
        Self::check_parent_dir(&volume, &dst)?;
        volume.nodes.insert(dst, Node::File(copied));
        Ok(())
    }

    fn create_directory(&self, path: &str) -> FsResult<()> {
        self.guard.ensure_live()?;
        self.check_writable()?;
        let canonical = path::normalize(path);
        if canonical.is_empty() {
            return Err(FsError::AlreadyExists("/".into()));
        }
        let mut volume = self.volume.write();
        if volume.is_dir(&canonical) || volume.is_file(&canonical) {
            return Err(FsError::AlreadyExists(path::display(&canonical)));
        }

        // Ancestors come into existence with the leaf, as long as none of
        // them is occupied by a file.
        let now = Utc::now();
        let mut ancestor = String::new();
        for segment in path::segments(&canonical) {
            ancestor = path::combine(&ancestor, segment);
            if volume.is_file(&ancestor) {
                return Err(FsError::InvalidPath(format!(
                    "{} is not a directory",
                    path::display(&ancestor)
                )));
            }
            volume
                .nodes
                .entry(ancestor.clone())
                .or_insert_with(|| Node::dir(now));
        }
        Ok(())
    }

    fn delete_directory(&self, path: &str) -> FsResult<()> {
        self.guard.ensure_live()?;
        self.check_writable()?;
        let canonical = path::normalize(path);
        if canonical.is_empty() {
            return Err(FsError::InvalidPath(
                "the volume root cannot be deleted".into(),
            ));
        }
        let mut volume = self.volume.write();
        if !volume.is_dir(&canonical) {
            return Err(FsError::NotFound(path::display(&canonical)));
        }
        let prefix = format!("{}/", canonical);
        if volume.nodes.keys().any(|k| k.starts_with(&prefix)) {
            return Err(FsError::NotEmpty(path::display(&canonical)));
        }
        volume.nodes.remove(&canonical);
        Ok(())
    }

    fn delete_file(&self, path: &str) -> FsResult<()> {
        self.guard.ensure_live()?;
        self.check_writable()?;
        let canonical = path::normalize(path);
        let mut volume = self.volume.write();
        if !volume.is_file(&canonical) {
            return Err(FsError::NotFound(path::display(&canonical)));
        }
        volume.nodes.remove(&canonical);
        Ok(())
    }

    fn directory_exists(&self, path: &str) -> FsResult<bool> {
        self.guard.ensure_live()?;
        Ok(self.volume.read().is_dir(&path::normalize(path)))
    }

    fn file_exists(&self, path: &str) -> FsResult<bool> {
        self.guard.ensure_live()?;
        Ok(self.volume.read().is_file(&path::normalize(path)))
    }

    fn get_directories(
        &self,
        path: &str,
        pattern: &str,
        scope: SearchScope,
    ) -> FsResult<Vec<String>> {
        self.find_matches(path, pattern, scope, Want::Directories)
    }

    fn get_files(&self, path: &str, pattern: &str, scope: SearchScope) -> FsResult<Vec<String>> {
        self.find_matches(path, pattern, scope, Want::Files)
    }

    fn get_entries(&self, path: &str, pattern: &str, scope: SearchScope) -> FsResult<Vec<String>> {
        self.find_matches(path, pattern, scope, Want::Entries)
    }

    fn move_directory(&self, source: &str, destination: &str) -> FsResult<()> {
        self.guard.ensure_live()?;
        self.check_writable()?;
        let src = path::normalize(source);
        let dst = path::normalize(destination);
        if src.is_empty() {
            return Err(FsError::InvalidPath(
                "the volume root cannot be moved".into(),
            ));
        }
        let mut volume = self.volume.write();
        if !volume.is_dir(&src) {
            return Err(FsError::NotFound(path::display(&src)));
        }
        if volume.node(&dst).is_some() {
            return Err(FsError::AlreadyExists(path::display(&dst)));
        }
        let src_prefix = format!("{}/", src);
        if dst == src || dst.starts_with(&src_prefix) {
            return Err(FsError::InvalidPath(
                "destination lies inside the source".into(),
            ));
        }
        Self::check_parent_dir(&volume, &dst)?;

        let moved: Vec<String> = volume
            .nodes
            .keys()
            .filter(|k| k.as_str() == src || k.starts_with(&src_prefix))
            .cloned()
            .collect();
        for key in moved {
            if let Some(node) = volume.nodes.remove(&key) {
                let relocated = format!("{}{}", dst, &key[src.len()..]);
                volume.nodes.insert(relocated, node);
            }
        }
        Ok(())
    }

    fn move_file(&self, source: &str, destination: &str, options: &MoveOptions) -> FsResult<()> {
        self.guard.ensure_live()?;
        self.check_writable()?;
        let src = path::normalize(source);
        let dst = path::normalize(destination);
        let mut volume = self.volume.write();
        if !volume.is_file(&src) {
            return Err(FsError::NotFound(path::display(&src)));
        }
        if src == dst {
            return Ok(());
        }
        if volume.is_dir(&dst) || (volume.is_file(&dst) && !options.overwrite) {
            return Err(FsError::AlreadyExists(path::display(&dst)));
        }
        Self::check_parent_dir(&volume, &dst)?;
        if let Some(node) = volume.nodes.remove(&src) {
            volume.nodes.insert(dst, node);
        }
        Ok(())
    }

    fn open_file(
        &self,
        path: &str,
        mode: FileMode,
        access: FileAccess,
    ) -> FsResult<ByteStream<'_>> {
        self.guard.ensure_live()?;
        if access.can_write() {
            self.check_writable()?;
        }
        if mode.requires_write() && mode != FileMode::OpenOrCreate && !access.can_write() {
            return Err(FsError::AccessDenied(format!(
                "{:?} requires write access",
                mode
            )));
        }
        let canonical = path::normalize(path);
        let mut volume = self.volume.write();
        if volume.is_dir(&canonical) {
            return Err(FsError::InvalidPath(format!(
                "{} is a directory",
                path::display(&canonical)
            )));
        }

        let now = Utc::now();
        let exists = volume.is_file(&canonical);
        match mode {
            FileMode::Open | FileMode::Truncate if !exists => {
                return Err(FsError::NotFound(path::display(&canonical)));
            }
            FileMode::CreateNew if exists => {
                return Err(FsError::AlreadyExists(path::display(&canonical)));
            }
            _ => {}
        }
        if !exists {
            // OpenOrCreate with read-only access still creates the entry.
            self.check_writable()?;
            Self::check_parent_dir(&volume, &canonical)?;
            let attributes = self.options.read().default_file_attributes();
            volume
                .nodes
                .insert(canonical.clone(), Node::file(attributes, now));
        }

        let file = match volume.nodes.get_mut(&canonical) {
            Some(Node::File(f)) => f,
            _ => return Err(FsError::NotFound(path::display(&canonical))),
        };
        if exists && matches!(mode, FileMode::Create | FileMode::Truncate) {
            file.content.write().clear();
            file.times.last_write = now;
        }
        let position = match mode {
            FileMode::Append => file.content.read().len() as u64,
            _ => 0,
        };
        Ok(Box::new(RamStream::new(
            Arc::clone(&file.content),
            position,
            access,
        )))
    }

    fn attributes(&self, path: &str) -> FsResult<FileAttributes> {
        self.with_node(path, Node::attributes)
    }

    fn set_attributes(&self, path: &str, attributes: FileAttributes) -> FsResult<()> {
        self.with_node_mut(path, |node| node.set_attributes(attributes))
    }

    fn creation_time_utc(&self, path: &str) -> FsResult<DateTime<Utc>> {
        self.with_node(path, |node| node.times().creation)
    }

    fn set_creation_time_utc(&self, path: &str, time: DateTime<Utc>) -> FsResult<()> {
        self.with_node_mut(path, |node| node.times_mut().creation = time)
    }

    fn last_access_time_utc(&self, path: &str) -> FsResult<DateTime<Utc>> {
        self.with_node(path, |node| node.times().last_access)
    }

    fn set_last_access_time_utc(&self, path: &str, time: DateTime<Utc>) -> FsResult<()> {
        self.with_node_mut(path, |node| node.times_mut().last_access = time)
    }

    fn last_write_time_utc(&self, path: &str) -> FsResult<DateTime<Utc>> {
        self.with_node(path, |node| node.times().last_write)
    }

    fn set_last_write_time_utc(&self, path: &str, time: DateTime<Utc>) -> FsResult<()> {
        self.with_node_mut(path, |node| node.times_mut().last_write = time)
    }

    fn file_length(&self, path: &str) -> FsResult<u64> {
        self.guard.ensure_live()?;
        let canonical = path::normalize(path);
        let volume = self.volume.read();
        let file = volume.file(&canonical)?;
        let len = file.content.read().len() as u64;
        Ok(len)
    }

    fn lifecycle(&self) -> &LifecycleGuard {
        &self.guard
    }

    fn release_resources(&self) -> FsResult<()> {
        self.release_calls.fetch_add(1, Ordering::AcqRel);
        self.volume.write().nodes.clear();
        tracing::debug!("released ram volume {:?}", self.label);
        Ok(())
    }

    fn read_boot_code(&self) -> FsResult<Option<Bytes>> {
        self.guard.ensure_live()?;
        Ok(self.boot_code.clone())
    }
}

impl Drop for RamFileSystem {
    fn drop(&mut self) {
        // Safety net for instances never disposed explicitly; the guard
        // keeps the hook from running a second time.
        if self.guard.begin_release() {
            if let Err(err) = self.release_resources() {
                tracing::warn!("release of ram volume {:?} failed: {}", self.label, err);
            }
        }
    }
}
