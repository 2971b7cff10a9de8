//! Wildcard search patterns
//!
//! Patterns support `*` (any sequence, including empty) and `?` (any single
//! character). `*.*` is the historical match-everything spelling and matches
//! names without a dot as well.

use regex::RegexBuilder;

use crate::error::{FsError, FsResult};

/// Pattern used by searches when the caller gives none
pub const MATCH_ALL: &str = "*.*";

/// A compiled search pattern, matched against entry names
#[derive(Debug, Clone)]
pub struct SearchPattern {
    regex: regex::Regex,
}

impl SearchPattern {
    /// Compile a wildcard pattern
    ///
    /// Case folding follows the owning instance's options, so the same
    /// pattern can behave differently on two mounts.
    pub fn compile(pattern: &str, case_sensitive: bool) -> FsResult<Self> {
        let pattern = if pattern.is_empty() || pattern == MATCH_ALL {
            "*"
        } else {
            pattern
        };

        let mut source = String::with_capacity(pattern.len() + 2);
        source.push('^');
        let mut buf = [0u8; 4];
        for ch in pattern.chars() {
            match ch {
                '*' => source.push_str(".*"),
                '?' => source.push('.'),
                _ => source.push_str(&regex::escape(ch.encode_utf8(&mut buf))),
            }
        }
        source.push('$');

        let regex = RegexBuilder::new(&source)
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| FsError::InvalidPath(format!("search pattern: {e}")))?;
        Ok(Self { regex })
    }

    /// Test a single entry name (not a full path) against the pattern
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_all_spellings() {
        for pattern in ["*", "*.*", ""] {
            let p = SearchPattern::compile(pattern, true).unwrap();
            assert!(p.matches("file.txt"), "pattern {:?}", pattern);
            assert!(p.matches("no-extension"), "pattern {:?}", pattern);
            assert!(p.matches(""), "pattern {:?}", pattern);
        }
    }

    #[test]
    fn test_star_matches_any_sequence() {
        let p = SearchPattern::compile("*.txt", true).unwrap();
        assert!(p.matches("a.txt"));
        assert!(p.matches(".txt"));
        assert!(!p.matches("a.txt.bak"));
        assert!(!p.matches("a.TXT"));
    }

    #[test]
    fn test_question_mark_matches_one_char() {
        let p = SearchPattern::compile("file?.log", true).unwrap();
        assert!(p.matches("file1.log"));
        assert!(p.matches("fileX.log"));
        assert!(!p.matches("file.log"));
        assert!(!p.matches("file12.log"));
    }

    #[test]
    fn test_case_insensitive() {
        let p = SearchPattern::compile("*.TXT", false).unwrap();
        assert!(p.matches("notes.txt"));
        assert!(p.matches("NOTES.TXT"));
    }

    #[test]
    fn test_literal_chars_are_escaped() {
        let p = SearchPattern::compile("a+b.txt", true).unwrap();
        assert!(p.matches("a+b.txt"));
        assert!(!p.matches("aab.txt"));

        let p = SearchPattern::compile("(1)", true).unwrap();
        assert!(p.matches("(1)"));
    }
}
