//! Per-mount configuration

use serde::{Deserialize, Serialize};

use crate::attributes::FileAttributes;

/// Mutable options record held by a mounted instance
///
/// Passed at construction and mutated only through the setters here; drivers
/// expose the live record through [`options`] as a snapshot.
///
/// [`options`]: crate::contract::FileSystem::options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSystemOptions {
    case_sensitive: bool,
    default_file_attributes: FileAttributes,
}

impl FileSystemOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether searches and name comparisons distinguish case
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.case_sensitive = case_sensitive;
    }

    /// Attributes stamped onto files the driver creates
    pub fn default_file_attributes(&self) -> FileAttributes {
        self.default_file_attributes
    }

    pub fn set_default_file_attributes(&mut self, attributes: FileAttributes) {
        self.default_file_attributes = attributes;
    }
}

impl Default for FileSystemOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            default_file_attributes: FileAttributes::ARCHIVE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = FileSystemOptions::default();
        assert!(opts.case_sensitive());
        assert_eq!(opts.default_file_attributes(), FileAttributes::ARCHIVE);
    }

    #[test]
    fn test_setters() {
        let mut opts = FileSystemOptions::new();
        opts.set_case_sensitive(false);
        opts.set_default_file_attributes(FileAttributes::NORMAL);
        assert!(!opts.case_sensitive());
        assert_eq!(opts.default_file_attributes(), FileAttributes::NORMAL);
    }
}
