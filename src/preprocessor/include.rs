//! Locating and reading included files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads sources for the preprocessor.
pub trait SourceLoader: Send + Sync {
    fn load(&self, path: &Path) -> io::Result<String>;

    /// Whether `path` exists and is not a directory.
    fn is_file(&self, path: &Path) -> bool;

    /// Stable identity of a path, used to detect include cycles.
    fn canonicalize(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }
}

/// Loads sources from the filesystem.
///
/// Bytes that are not valid UTF-8 become U+FFFD instead of failing the load.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn load(&self, path: &Path) -> io::Result<String> {
        let bytes = fs::read(path)?;
        Ok(String::from_utf8(bytes).unwrap_or_else(|error| {
            debug!(path = %path.display(), "invalid UTF-8 replaced");
            String::from_utf8_lossy(error.as_bytes()).into_owned()
        }))
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn canonicalize(&self, path: &Path) -> PathBuf {
        fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }
}

/// The file name inside a string-literal token.
pub(crate) fn unquote(text: &str) -> &str {
    let mut chars = text.chars();
    match chars.next() {
        Some(quote @ ('"' | '\'')) => {
            let inner = chars.as_str();
            inner.strip_suffix(quote).unwrap_or(inner)
        }
        _ => text,
    }
}

/// `#include "name"`: next to the including file first, then as given.
pub(crate) fn quoted_candidates(name: &str, including: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(2);
    if let Some(dir) = including.and_then(Path::parent) {
        candidates.push(dir.join(name));
    }
    candidates.push(PathBuf::from(name));
    candidates.dedup();
    candidates
}

/// `#include <name>`: each search directory in order. Without any, the name
/// is tried as given.
pub(crate) fn angle_candidates(name: &str, include_paths: &[PathBuf]) -> Vec<PathBuf> {
    if include_paths.is_empty() {
        return vec![PathBuf::from(name)];
    }
    include_paths.iter().map(|dir| dir.join(name)).collect()
}

/// First candidate that exists and is not a directory.
pub(crate) fn resolve(loader: &dyn SourceLoader, candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|path| loader.is_file(path)).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MemoryLoader(HashMap<PathBuf, String>);

    impl SourceLoader for MemoryLoader {
        fn load(&self, path: &Path) -> io::Result<String> {
            self.0
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
        }

        fn is_file(&self, path: &Path) -> bool {
            self.0.contains_key(path)
        }
    }

    #[test]
    fn unquote_strips_matching_quotes() {
        assert_eq!(unquote("\"a.h\""), "a.h");
        assert_eq!(unquote("'a.h'"), "a.h");
        assert_eq!(unquote("\"open.h"), "open.h");
        assert_eq!(unquote("bare"), "bare");
    }

    #[test]
    fn quoted_include_prefers_the_including_directory() {
        let candidates = quoted_candidates("a.h", Some(Path::new("src/main.c")));
        assert_eq!(
            candidates,
            vec![PathBuf::from("src/a.h"), PathBuf::from("a.h")]
        );

        let candidates = quoted_candidates("a.h", None);
        assert_eq!(candidates, vec![PathBuf::from("a.h")]);
    }

    #[test]
    fn angle_include_searches_in_order() {
        let paths = [PathBuf::from("/one"), PathBuf::from("/two")];
        let loader = MemoryLoader(HashMap::from([
            (PathBuf::from("/two/x.h"), String::new()),
            (PathBuf::from("x.h"), String::new()),
        ]));

        let candidates = angle_candidates("x.h", &paths);
        assert_eq!(resolve(&loader, &candidates), Some(PathBuf::from("/two/x.h")));
        assert_eq!(
            resolve(&loader, &angle_candidates("x.h", &[])),
            Some(PathBuf::from("x.h"))
        );
        assert_eq!(resolve(&loader, &angle_candidates("y.h", &paths)), None);
    }

    #[test]
    fn fs_loader_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.h");
        fs::write(&file, "int a;").unwrap();

        assert!(FsLoader.is_file(&file));
        assert!(!FsLoader.is_file(dir.path()));
        assert_eq!(FsLoader.load(&file).unwrap(), "int a;");
    }

    #[test]
    fn fs_loader_replaces_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("latin1.h");
        fs::write(&file, b"int a; /* caf\xe9 */").unwrap();

        assert_eq!(FsLoader.load(&file).unwrap(), "int a; /* caf\u{fffd} */");
    }
}
