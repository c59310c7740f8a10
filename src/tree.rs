//! File tree representation and rendering.
//!
//! Provides types for representing directory structures and a renderer
//! producing the dump's tree listing.

use std::path::{Path, PathBuf};

/// The type of a filesystem node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    File,
}

impl NodeKind {
    /// Check if this is a directory.
    pub fn is_directory(&self) -> bool {
        matches!(self, NodeKind::Directory)
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File)
    }
}

/// A node in the file tree.
#[derive(Debug, Clone)]
pub struct FileNode {
    /// File or directory name (not full path).
    pub name: String,
    /// Full path from root.
    pub path: PathBuf,
    /// Type of node (file or directory).
    pub kind: NodeKind,
    /// Child nodes (empty for files).
    children: Vec<FileNode>,
}

impl FileNode {
    /// Create a new directory node.
    pub fn directory(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Directory,
            children: Vec::new(),
        }
    }

    /// Create a new file node.
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::File,
            children: Vec::new(),
        }
    }

    /// Check if this is a directory.
    pub fn is_directory(&self) -> bool {
        self.kind.is_directory()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Add a child node. Only valid for directories.
    pub fn add_child(&mut self, child: FileNode) {
        self.children.push(child);
    }

    /// Get child nodes.
    pub fn children(&self) -> &[FileNode] {
        &self.children
    }

    /// Sort children lexicographically by name, files and directories
    /// interleaved.
    pub fn sort_children(&mut self) {
        self.children.sort_by(|a, b| a.name.cmp(&b.name));

        for child in &mut self.children {
            child.sort_children();
        }
    }

    /// Count total files in this tree.
    pub fn file_count(&self) -> usize {
        match self.kind {
            NodeKind::File => 1,
            NodeKind::Directory => self.children.iter().map(|c| c.file_count()).sum(),
        }
    }

    /// This node's path relative to the given root.
    pub fn relative_to<'a>(&'a self, root: &Path) -> &'a Path {
        self.path.strip_prefix(root).unwrap_or(&self.path)
    }
}

/// Connectors for tree rendering.
const BRANCH: &str = "|-- ";
const LAST_BRANCH: &str = "`-- ";
const VERTICAL: &str = "|   ";
const SPACE: &str = "    ";

/// Render a file tree to a string.
///
/// The root is rendered as `<name>/`; each entry below it gets a `|-- ` or
/// `` `-- `` connector, with directories recursed before the next sibling.
///
/// # Examples
///
/// ```
/// use quarry::tree::{render_tree, FileNode};
///
/// let mut root = FileNode::directory("project", "project");
/// root.add_child(FileNode::file("main.py", "project/main.py"));
/// root.sort_children();
///
/// assert_eq!(render_tree(&root), "project/\n`-- main.py\n");
/// ```
pub fn render_tree(root: &FileNode) -> String {
    let mut output = String::with_capacity(4096);
    output.push_str(&root.name);
    output.push_str("/\n");
    render_children(&mut output, root, "");
    output
}

fn render_children(output: &mut String, node: &FileNode, prefix: &str) {
    let child_count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let is_last = i == child_count - 1;

        output.push_str(prefix);
        output.push_str(if is_last { LAST_BRANCH } else { BRANCH });
        output.push_str(&child.name);
        output.push('\n');

        if child.is_directory() {
            let continuation = if is_last { SPACE } else { VERTICAL };
            let child_prefix = format!("{prefix}{continuation}");
            render_children(output, child, &child_prefix);
        }
    }
}

/// The tree's files in the order the renderer encounters them.
pub fn source_files(root: &FileNode) -> Vec<&FileNode> {
    let mut files = Vec::new();
    collect_files(root, &mut files);
    files
}

fn collect_files<'a>(node: &'a FileNode, out: &mut Vec<&'a FileNode>) {
    for child in node.children() {
        if child.is_directory() {
            collect_files(child, out);
        } else {
            out.push(child);
        }
    }
}
