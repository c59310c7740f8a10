//! Directory traversal with gitignore support.
//!
//! Uses the `ignore` crate to walk directories while respecting
//! .gitignore, .git/info/exclude, global gitignore, and a root-level
//! .quarryignore.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use thiserror::Error;

use crate::tree::FileNode;

/// Errors that can occur during directory walking.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("path not found: {path}")]
    NotFound { path: PathBuf },

    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Options for directory walking.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Maximum depth to recurse (None = unlimited).
    pub max_depth: Option<usize>,
    /// Follow symbolic links.
    pub follow_symlinks: bool,
    /// Include hidden files and directories.
    pub include_hidden: bool,
    /// Respect .gitignore patterns.
    pub respect_gitignore: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            follow_symlinks: false,
            include_hidden: false,
            respect_gitignore: true,
        }
    }
}

impl WalkOptions {
    /// Create options that include hidden files.
    pub fn with_hidden() -> Self {
        Self {
            include_hidden: true,
            ..Default::default()
        }
    }

    /// Set maximum depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }
}

/// Entry from directory walk.
#[derive(Debug, Clone)]
pub struct WalkEntry {
    /// Path to the entry.
    pub path: PathBuf,
    /// Depth from root (root = 0).
    pub depth: usize,
    /// Whether this is a file or directory.
    pub is_file: bool,
}

/// Walk a directory tree, yielding entries.
///
/// Respects .gitignore and .quarryignore patterns automatically.
pub fn walk(root: &Path) -> impl Iterator<Item = Result<WalkEntry, WalkError>> {
    walk_with_options(root, &WalkOptions::default())
}

/// Walk a directory tree with custom options.
pub fn walk_with_options(
    root: &Path,
    options: &WalkOptions,
) -> impl Iterator<Item = Result<WalkEntry, WalkError>> {
    let root = root.to_path_buf();

    if !root.exists() {
        return itertools_lite::Either::Left(std::iter::once(Err(WalkError::NotFound {
            path: root,
        })));
    }

    let mut builder = WalkBuilder::new(&root);

    builder
        .hidden(!options.include_hidden)
        .git_ignore(options.respect_gitignore)
        .git_global(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .follow_links(options.follow_symlinks);

    if let Some(depth) = options.max_depth {
        builder.max_depth(Some(depth));
    }

    // The tool's own ignore file is read from the root only.
    let quarryignore = root.join(".quarryignore");
    if quarryignore.exists() {
        builder.add_ignore(&quarryignore);
    }

    let walker = builder.build();

    itertools_lite::Either::Right(walker.filter_map(move |result| {
        match result {
            Ok(entry) => {
                let path = entry.path().to_path_buf();
                let depth = entry.depth();
                let is_file = entry.file_type().is_some_and(|ft| ft.is_file());

                Some(Ok(WalkEntry {
                    path,
                    depth,
                    is_file,
                }))
            }
            Err(e) => match e {
                ignore::Error::Io(io_err) => {
                    let path = PathBuf::from("<walk error>");
                    if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                        Some(Err(WalkError::PermissionDenied { path }))
                    } else {
                        Some(Err(WalkError::Io {
                            path,
                            source: io_err,
                        }))
                    }
                }
                // Skip non-IO errors (like gitignore parse errors)
                _ => None,
            },
        }
    }))
}

/// Build a complete file tree from a directory, children sorted by name.
pub fn build_tree(root: &Path) -> Result<FileNode, WalkError> {
    build_tree_with_options(root, &WalkOptions::default())
}

/// Build a complete file tree with custom options.
pub fn build_tree_with_options(root: &Path, options: &WalkOptions) -> Result<FileNode, WalkError> {
    if !root.exists() {
        return Err(WalkError::NotFound {
            path: root.to_path_buf(),
        });
    }

    let metadata = root.metadata().map_err(|e| WalkError::Io {
        path: root.to_path_buf(),
        source: e,
    })?;

    if !metadata.is_dir() {
        return Err(WalkError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let name = root.file_name().map_or_else(
        || root.to_string_lossy().into_owned(),
        |n| n.to_string_lossy().into_owned(),
    );

    let mut node_map: std::collections::HashMap<PathBuf, FileNode> =
        std::collections::HashMap::new();

    let root_node = FileNode::directory(&name, root.to_path_buf());
    node_map.insert(root.to_path_buf(), root_node);

    // Collect entries (skipping the root itself)
    let mut entries: Vec<WalkEntry> = walk_with_options(root, options)
        .filter_map(|r| r.ok())
        .filter(|e| e.path != root)
        .collect();

    for entry in &entries {
        let entry_name = entry
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let node = if entry.is_file {
            FileNode::file(&entry_name, &entry.path)
        } else {
            FileNode::directory(&entry_name, &entry.path)
        };

        node_map.insert(entry.path.clone(), node);
    }

    // Build parent-child relationships, deepest first so children are added
    // before their parents are moved.
    entries.sort_by(|a, b| b.depth.cmp(&a.depth));

    for entry in &entries {
        if let Some(parent_path) = entry.path.parent() {
            let parent_path = parent_path.to_path_buf();
            if let Some(child) = node_map.remove(&entry.path) {
                if let Some(parent) = node_map.get_mut(&parent_path) {
                    parent.add_child(child);
                }
            }
        }
    }

    let mut result = node_map
        .remove(&root.to_path_buf())
        .ok_or_else(|| WalkError::Io {
            path: root.to_path_buf(),
            source: std::io::Error::other("failed to build tree"),
        })?;

    result.sort_children();
    Ok(result)
}

/// Simple Either type to avoid adding an itertools dependency.
mod itertools_lite {
    pub enum Either<L, R> {
        Left(L),
        Right(R),
    }

    impl<L, R, T> Iterator for Either<L, R>
    where
        L: Iterator<Item = T>,
        R: Iterator<Item = T>,
    {
        type Item = T;

        fn next(&mut self) -> Option<Self::Item> {
            match self {
                Either::Left(l) => l.next(),
                Either::Right(r) => r.next(),
            }
        }
    }
}
