//! Aggregate dump formatting.
//!
//! Assembles the tree listing and every non-ignored file's contents into a
//! single prompt blob. File reading happens here, never in the extraction
//! engine; reads are parallelized per file since each block is an
//! independent pure computation.

use std::fs;
use std::path::Path;

use rayon::prelude::*;

use crate::errors::QuarryError;
use crate::interfaces::extract_interfaces;
use crate::language::{tag_for_path, Language};
use crate::tree::{render_tree, source_files, FileNode};
use crate::walker::{build_tree_with_options, WalkOptions};

/// Substituted for a file's contents when it cannot be read.
pub const READ_ERROR: &str = "[Error reading file]";

/// Options controlling the dump.
#[derive(Debug, Clone, Copy, Default)]
pub struct DumpOptions {
    /// Replace Python file contents with their interfaces-only rendering.
    pub interfaces_only: bool,
}

/// Read a file as text. Invalid UTF-8 is replaced character-by-character;
/// a failed read yields the [`READ_ERROR`] sentinel instead of an error.
pub fn read_file_lossy(path: &Path) -> String {
    match fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => READ_ERROR.to_string(),
    }
}

/// Dump a directory to the aggregate prompt format.
///
/// The output is the tree listing under a `* Folder tree *` header followed
/// by a `* Sources *` section with one fenced block per file, in the order
/// the tree renderer encounters them.
pub fn dump_to_string(
    root: &Path,
    walk_options: &WalkOptions,
    options: &DumpOptions,
) -> Result<String, QuarryError> {
    let tree = build_tree_with_options(root, walk_options)?;
    dump_tree_to_string(root, &tree, options)
}

/// Dump an already-built tree to the aggregate prompt format.
pub fn dump_tree_to_string(
    root: &Path,
    tree: &FileNode,
    options: &DumpOptions,
) -> Result<String, QuarryError> {
    let files = source_files(tree);

    let blocks: Vec<String> = files
        .par_iter()
        .map(|file| file_block(root, &tree.name, file, options))
        .collect::<Result<_, QuarryError>>()?;

    let mut output = String::with_capacity(8192);
    output.push_str("* Folder tree *\n\n");
    output.push_str(&render_tree(tree));
    output.push_str("\n\n* Sources *\n");
    for block in &blocks {
        output.push('\n');
        output.push_str(block);
    }
    Ok(output)
}

/// Dump a single file of the walked tree as its fenced block, or `None`
/// when the relative path is not among the walked files.
pub fn dump_file_to_string(
    root: &Path,
    relative: &Path,
    walk_options: &WalkOptions,
    options: &DumpOptions,
) -> Result<Option<String>, QuarryError> {
    let tree = build_tree_with_options(root, walk_options)?;

    for file in source_files(&tree) {
        if file.relative_to(root) == relative {
            return file_block(root, &tree.name, file, options).map(Some);
        }
    }
    Ok(None)
}

fn file_block(
    root: &Path,
    root_name: &str,
    file: &FileNode,
    options: &DumpOptions,
) -> Result<String, QuarryError> {
    let tag = tag_for_path(&file.path);
    let mut text = read_file_lossy(&file.path);

    if options.interfaces_only && tag == Language::Python.tag() && text != READ_ERROR {
        text = extract_interfaces(&text).map_err(|source| QuarryError::Parse {
            path: file.path.clone(),
            source,
        })?;
    }

    let relative = file.relative_to(root);
    Ok(format!(
        "** FILE: {root_name}/{} **\n```{tag}\n{text}\n```\n",
        relative.display()
    ))
}
