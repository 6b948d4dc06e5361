//! Directory provisioning for slash-delimited paths.

use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::debug;

/// Create every missing prefix directory of `path`, shallowest first.
///
/// Empty segments (leading, doubled, or trailing `/`) are skipped; a leading
/// `/` keeps the path absolute. Returns the number of directories created, so
/// a second call on the same path returns 0.
pub fn ensure_path(path: &str) -> io::Result<usize> {
    let mut current = if path.starts_with('/') {
        PathBuf::from("/")
    } else {
        PathBuf::new()
    };
    let mut created = 0;

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        current.push(segment);
        if current.is_dir() {
            continue;
        }
        fs::create_dir(&current)?;
        debug!(path = %current.display(), "Created directory");
        created += 1;
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn slash_path(dir: &TempDir, rel: &str) -> String {
        format!("{}/{}", dir.path().display(), rel)
    }

    #[test]
    fn creates_nested_directories_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let target = slash_path(&temp_dir, "a/b/c");

        let created = ensure_path(&target).unwrap();

        assert_eq!(created, 3);
        assert!(temp_dir.path().join("a").is_dir());
        assert!(temp_dir.path().join("a/b/c").is_dir());
    }

    #[test]
    fn second_call_is_a_noop() {
        let temp_dir = TempDir::new().unwrap();
        let target = slash_path(&temp_dir, "out/reports");

        assert_eq!(ensure_path(&target).unwrap(), 2);
        assert_eq!(ensure_path(&target).unwrap(), 0);
    }

    #[test]
    fn skips_empty_segments() {
        let temp_dir = TempDir::new().unwrap();
        let target = slash_path(&temp_dir, "x//y/");

        assert_eq!(ensure_path(&target).unwrap(), 2);
        assert!(temp_dir.path().join("x/y").is_dir());
    }

    #[test]
    fn file_in_the_way_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("blocker"), b"").unwrap();

        let result = ensure_path(&slash_path(&temp_dir, "blocker/inner"));
        assert!(result.is_err());
    }
}
