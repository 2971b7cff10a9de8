//! Path string helpers
//!
//! Paths are opaque `/`-separated strings. The canonical form has no leading
//! or trailing separator and no empty segments; the root is the empty string.
//! Two strings naming the same entry normalize to the same canonical form, so
//! facades can compare paths without asking the driver.

/// Path separator used across every driver
pub const SEPARATOR: char = '/';

/// Iterate the non-empty segments of a path
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty())
}

/// Reduce a path to canonical form
///
/// `.` segments are dropped and `..` pops the previous segment, matching how
/// relative steps resolve against a join point.
pub fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in segments(path) {
        if part == ".." {
            parts.pop();
        } else if part != "." {
            parts.push(part);
        }
    }
    parts.join("/")
}

/// Join a name onto a base path, normalizing the result
pub fn combine(base: &str, name: &str) -> String {
    if base.is_empty() {
        normalize(name)
    } else {
        normalize(&format!("{}/{}", base, name))
    }
}

/// Canonical path of the parent, or `None` for the root
pub fn parent_of(path: &str) -> Option<String> {
    let canonical = normalize(path);
    if canonical.is_empty() {
        return None;
    }
    match canonical.rfind(SEPARATOR) {
        Some(idx) => Some(canonical[..idx].to_string()),
        None => Some(String::new()),
    }
}

/// Final segment of a path; empty for the root
pub fn file_name(path: &str) -> &str {
    path.trim_end_matches(SEPARATOR)
        .rsplit(SEPARATOR)
        .find(|s| !s.is_empty())
        .unwrap_or("")
}

/// Extension of the final segment, without the dot
pub fn extension(path: &str) -> Option<&str> {
    let name = file_name(path);
    name.rsplit_once('.')
        .and_then(|(stem, ext)| if stem.is_empty() { None } else { Some(ext) })
}

/// True when the path denotes the volume root
pub fn is_root(path: &str) -> bool {
    segments(path).next().is_none()
}

/// Render a canonical path for display, with the root shown as `/`
pub fn display(path: &str) -> String {
    let canonical = normalize(path);
    if canonical.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", canonical)
    }
}
