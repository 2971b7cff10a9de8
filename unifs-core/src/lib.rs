//! unifs Core
//!
//! Contract traits, derived operations, and facades for the uniform
//! file-system interface. Format drivers implement the mandatory primitives
//! of [`FileSystem`]; everything else here is derived from them.

pub mod attributes;
pub mod contract;
pub mod error;
pub mod info;
pub mod lifecycle;
pub mod operations;
pub mod options;
pub mod path;
pub mod pattern;
pub mod stream;
pub mod times;

pub use attributes::FileAttributes;
pub use contract::FileSystem;
pub use error::{FsError, FsResult};
pub use info::{DirectoryInfo, EntryInfo, FileInfo};
pub use lifecycle::LifecycleGuard;
pub use operations::{CopyOptions, MoveOptions, SearchScope};
pub use options::FileSystemOptions;
pub use pattern::SearchPattern;
pub use stream::{ByteStream, FileAccess, FileMode, FileStream};
pub use times::FileTimes;
