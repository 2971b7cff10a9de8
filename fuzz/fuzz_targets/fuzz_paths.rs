// SPDX-License-Identifier: AGPL-3.0-or-later
//! Fuzz target for path normalization and search-pattern compilation

#![no_main]

use libfuzzer_sys::fuzz_target;
use unifs_core::{path, pattern::SearchPattern};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Normalization must be total and idempotent
        let canonical = path::normalize(input);
        assert_eq!(path::normalize(&canonical), canonical);

        let _ = path::parent_of(input);
        let _ = path::file_name(input);
        let _ = path::extension(input);
        let _ = path::is_root(input);
        let _ = path::display(input);

        if let Some(prefix) = input.get(..input.len().min(10)) {
            let _ = path::combine(&canonical, prefix);
        }

        // Every input must either compile or fail cleanly, and a compiled
        // pattern must be callable
        for case_sensitive in [true, false] {
            if let Ok(p) = SearchPattern::compile(input, case_sensitive) {
                let _ = p.matches(path::file_name(input));
            }
        }
    }
});
