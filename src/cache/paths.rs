// Cache path utilities.
// Maps cache keys onto files under the on-disk cache root.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Get the base cache directory (~/.cache/hubgate on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "hubgate").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Directory holding gateway entries under `root`.
pub fn entries_dir(root: &Path) -> PathBuf {
    root.join("entries")
}

/// Path to the file backing `key`.
pub fn entry_path(root: &Path, key: &str) -> PathBuf {
    entries_dir(root).join(format!("{}.json", escape_name(key)))
}

/// Escape a name for use as a single path component.
/// Problematic characters, `.` and `%` become `%XX`, so the mapping is reversible
/// and the result can never be `.`, `..` or contain a separator.
fn escape_name(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        let hostile = matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '.' | '%');
        if hostile || c.is_ascii_control() {
            escaped.push_str(&format!("%{:02X}", c as u32));
        } else {
            escaped.push(c);
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_name() {
        assert_eq!(escape_name("issues_acme_widgets"), "issues_acme_widgets");
        assert_eq!(escape_name("with/slash"), "with%2Fslash");
        assert_eq!(escape_name("../escape"), "%2E%2E%2Fescape");
        assert_eq!(escape_name("100%"), "100%25");
    }

    #[test]
    fn test_dot_and_underscore_names_stay_distinct() {
        assert_eq!(escape_name("labels_acme_site.io"), "labels_acme_site%2Eio");
        assert_ne!(
            escape_name("labels_acme_site.io"),
            escape_name("labels_acme_site_io")
        );
        assert_ne!(escape_name("a%2Eb"), escape_name("a.b"));
    }

    #[test]
    fn test_entry_path_stays_inside_entries_dir() {
        let root = Path::new("/tmp/hubgate");
        for key in ["..", ".", "../../etc/passwd", "labels_acme_.."] {
            let path = entry_path(root, key);
            assert_eq!(path.parent(), Some(entries_dir(root).as_path()), "{}", key);
        }
    }

    #[test]
    fn test_entry_paths() {
        let root = Path::new("/tmp/hubgate");
        let path = entry_path(root, "issue_acme_widgets_42");
        assert!(path.ends_with("entries/issue_acme_widgets_42.json"));
        assert!(path.starts_with(root));
    }
}
