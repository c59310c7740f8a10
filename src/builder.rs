//! Fluent builder API for quarry.
//!
//! A thin configuration layer over the walker and dump modules for library
//! callers.

use std::path::{Path, PathBuf};

use crate::errors::QuarryError;
use crate::output::{dump_file_to_string, dump_to_string, DumpOptions};
use crate::tree::FileNode;
use crate::walker::{build_tree_with_options, WalkOptions};

/// Builder for dumping a repository to prompt text.
///
/// # Examples
///
/// ```no_run
/// use quarry::Quarry;
///
/// let prompt = Quarry::new("./my-project")
///     .interfaces_only(true)
///     .dump()
///     .unwrap();
/// print!("{prompt}");
/// ```
pub struct Quarry {
    root: PathBuf,
    dump_options: DumpOptions,
    walk_options: WalkOptions,
}

impl Quarry {
    /// Create a new builder for the given root path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dump_options: DumpOptions::default(),
            walk_options: WalkOptions::default(),
        }
    }

    /// Replace Python file contents with their interfaces-only rendering.
    pub fn interfaces_only(mut self, yes: bool) -> Self {
        self.dump_options.interfaces_only = yes;
        self
    }

    /// Include hidden files and directories.
    pub fn include_hidden(mut self, yes: bool) -> Self {
        self.walk_options.include_hidden = yes;
        self
    }

    /// Set maximum directory depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.walk_options.max_depth = Some(depth);
        self
    }

    /// Dump the whole repository to the aggregate prompt format.
    pub fn dump(self) -> Result<String, QuarryError> {
        dump_to_string(&self.root, &self.walk_options, &self.dump_options)
    }

    /// Dump a single file's fenced block, or `None` when the path is not
    /// among the walked files.
    pub fn dump_file(self, relative: impl AsRef<Path>) -> Result<Option<String>, QuarryError> {
        dump_file_to_string(
            &self.root,
            relative.as_ref(),
            &self.walk_options,
            &self.dump_options,
        )
    }

    /// Build the file tree only (no file contents).
    pub fn tree(self) -> Result<FileNode, QuarryError> {
        build_tree_with_options(&self.root, &self.walk_options).map_err(QuarryError::Walk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_project() -> TempDir {
        let dir = TempDir::new().unwrap();

        fs::create_dir_all(dir.path().join("pkg")).unwrap();
        fs::write(
            dir.path().join("pkg/api.py"),
            "def handle(request) -> str:\n    return \"ok\"\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.md"), "# notes\n").unwrap();

        dir
    }

    #[test]
    fn test_dump_contains_tree_and_sources() {
        let dir = create_test_project();

        let prompt = Quarry::new(dir.path()).dump().unwrap();

        assert!(prompt.starts_with("* Folder tree *\n"));
        assert!(prompt.contains("* Sources *\n"));
        assert!(prompt.contains("|-- notes.md"));
        assert!(prompt.contains("```python\ndef handle(request) -> str:\n    return \"ok\"\n"));
    }

    #[test]
    fn test_interfaces_only_dump() {
        let dir = create_test_project();

        let prompt = Quarry::new(dir.path()).interfaces_only(true).dump().unwrap();

        assert!(prompt.contains("def handle(request) -> str:"));
        assert!(!prompt.contains("return \"ok\""));
    }

    #[test]
    fn test_tree_only() {
        let dir = create_test_project();

        let tree = Quarry::new(dir.path()).tree().unwrap();

        assert!(tree.is_directory());
        assert_eq!(tree.file_count(), 2);
    }

    #[test]
    fn test_dump_file() {
        let dir = create_test_project();

        let block = Quarry::new(dir.path())
            .dump_file("pkg/api.py")
            .unwrap()
            .expect("file should be found");

        assert!(block.starts_with("** FILE: "));
        assert!(block.contains("/pkg/api.py **\n```python\n"));
    }

    #[test]
    fn test_missing_root_fails_with_walk_error() {
        let result = Quarry::new("/no/such/project").dump();
        assert!(matches!(result, Err(QuarryError::Walk(_))));
    }
}
