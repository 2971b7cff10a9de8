//! Operation options

use serde::{Deserialize, Serialize};

/// Whether a search considers only immediate children or all descendants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchScope {
    ThisLevel,
    AllLevels,
}

/// Options for file copies; the default never overwrites
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CopyOptions {
    pub overwrite: bool,
}

/// Options for file moves; the default never overwrites
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MoveOptions {
    pub overwrite: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrite_defaults_off() {
        assert!(!CopyOptions::default().overwrite);
        assert!(!MoveOptions::default().overwrite);
    }
}
