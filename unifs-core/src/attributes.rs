//! Entry attribute bitmask

use bitflags::bitflags;

bitflags! {
    /// Attribute flags carried by every entry
    ///
    /// Drivers store the raw mask; nothing here is recomputed implicitly.
    /// `DIRECTORY` is reported by drivers for directory entries and is not
    /// meaningful to set through [`set_attributes`].
    ///
    /// [`set_attributes`]: crate::contract::FileSystem::set_attributes
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
    pub struct FileAttributes: u32 {
        const READ_ONLY = 0x0001;
        const HIDDEN    = 0x0002;
        const SYSTEM    = 0x0004;
        const DIRECTORY = 0x0010;
        const ARCHIVE   = 0x0020;
        const NORMAL    = 0x0080;
        const TEMPORARY = 0x0100;
    }
}

impl FileAttributes {
    pub fn is_read_only(self) -> bool {
        self.contains(FileAttributes::READ_ONLY)
    }

    pub fn is_hidden(self) -> bool {
        self.contains(FileAttributes::HIDDEN)
    }

    pub fn is_directory(self) -> bool {
        self.contains(FileAttributes::DIRECTORY)
    }
}
