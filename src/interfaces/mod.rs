//! Declaration extraction using tree-sitter.
//!
//! Parses a source file and rebuilds a signature-only view of it: classes,
//! functions, decorators, annotated fields, and docstrings survive;
//! implementation bodies are dropped.

mod python;
mod render;

use std::cell::RefCell;

use smallvec::SmallVec;
use thiserror::Error;
use tree_sitter::{Node, Parser};

// Thread-local parser caching to avoid re-initialization overhead.
//
// No panics here: parser initialization can fail (grammar load) and library
// code stays panic-free.
thread_local! {
    static PYTHON_PARSER: RefCell<Option<Parser>> = const { RefCell::new(None) };
}

fn init_python_parser() -> Result<Parser, ()> {
    let mut p = Parser::new();
    p.set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|_| ())?;
    Ok(p)
}

/// Execute a function with a cached Python parser.
pub(crate) fn with_python_parser<F, R>(f: F) -> Result<R, ParseError>
where
    F: FnOnce(&mut Parser) -> R,
{
    PYTHON_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(init_python_parser().map_err(|()| ParseError::ParserInit)?);
        }

        let parser = slot.as_mut().ok_or(ParseError::ParserInit)?;
        Ok(f(parser))
    })
}

/// Find a child node by kind.
pub(crate) fn find_child_by_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    node.children(&mut node.walk()).find(|c| c.kind() == kind)
}

/// Extract node text from content.
pub(crate) fn node_text(node: Node, content: &str) -> String {
    content[node.byte_range()].to_string()
}

/// Errors during declaration extraction.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to initialize python parser")]
    ParserInit,

    #[error("syntax error near line {line}")]
    Syntax { line: usize },
}

/// A declaration extracted from source code, stripped of its body.
///
/// Decorators, base classes, annotations, parameter lists, and default
/// values are carried as verbatim source text, never as structured trees.
/// Each node owns its children; the whole structure is a strict tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// A `class` definition with its declaration-only body.
    Class {
        name: String,
        indent: usize,
        decorators: SmallVec<[String; 4]>,
        bases: SmallVec<[String; 4]>,
        docstring: Option<String>,
        children: Vec<Declaration>,
    },
    /// A `def` (or `async def`) with its full signature. Bodies are never
    /// descended into beyond the leading docstring, so there are no children.
    Function {
        name: String,
        indent: usize,
        decorators: SmallVec<[String; 4]>,
        signature: String,
        docstring: Option<String>,
    },
    /// A type-annotated assignment such as `title: str = "x"`.
    Field {
        target: String,
        annotation: String,
        value: Option<String>,
        indent: usize,
    },
}

impl Declaration {
    /// Get the name of this declaration (the target expression for fields).
    pub fn name(&self) -> &str {
        match self {
            Declaration::Class { name, .. } => name,
            Declaration::Function { name, .. } => name,
            Declaration::Field { target, .. } => target,
        }
    }

    /// Depth of this declaration in the nesting hierarchy.
    pub fn indent(&self) -> usize {
        match self {
            Declaration::Class { indent, .. } => *indent,
            Declaration::Function { indent, .. } => *indent,
            Declaration::Field { indent, .. } => *indent,
        }
    }

    /// Count declarations including nested class members.
    pub fn count(&self) -> usize {
        match self {
            Declaration::Class { children, .. } => {
                1 + children.iter().map(Declaration::count).sum::<usize>()
            }
            _ => 1,
        }
    }
}

/// Parse Python source into its top-level declarations, in source order.
///
/// Fails with [`ParseError::Syntax`] when the text is not syntactically
/// valid; no partial tree is produced.
pub fn parse_declarations(code: &str) -> Result<Vec<Declaration>, ParseError> {
    python::parse(code)
}

/// Extract the interfaces-only rendering of Python source.
///
/// Composes [`parse_declarations`] and [`render_declarations`]. Pure and
/// deterministic: the same input always yields byte-identical output.
///
/// # Examples
///
/// ```
/// let out = quarry::interfaces::extract_interfaces("def f():\n    pass\n").unwrap();
/// assert_eq!(out, "def f():");
/// ```
pub fn extract_interfaces(code: &str) -> Result<String, ParseError> {
    let declarations = python::parse(code)?;
    Ok(render::render(&declarations))
}

/// Render declarations to the interfaces-only text block.
pub fn render_declarations(declarations: &[Declaration]) -> String {
    render::render(declarations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_name() {
        let func = Declaration::Function {
            name: "run".into(),
            indent: 0,
            decorators: SmallVec::new(),
            signature: "def run()".into(),
            docstring: None,
        };
        assert_eq!(func.name(), "run");
        assert_eq!(func.indent(), 0);
    }

    #[test]
    fn test_field_name_is_target() {
        let field = Declaration::Field {
            target: "title".into(),
            annotation: "str".into(),
            value: None,
            indent: 1,
        };
        assert_eq!(field.name(), "title");
    }

    #[test]
    fn test_count_nested() {
        let class = Declaration::Class {
            name: "C".into(),
            indent: 0,
            decorators: SmallVec::new(),
            bases: SmallVec::new(),
            docstring: None,
            children: vec![
                Declaration::Function {
                    name: "m".into(),
                    indent: 1,
                    decorators: SmallVec::new(),
                    signature: "def m(self)".into(),
                    docstring: None,
                },
                Declaration::Field {
                    target: "x".into(),
                    annotation: "int".into(),
                    value: Some("1".into()),
                    indent: 1,
                },
            ],
        };
        assert_eq!(class.count(), 3);
    }

    #[test]
    fn test_extract_is_deterministic() {
        let code = "class A:\n    def f(self):\n        return 1\n";
        let first = extract_interfaces(code).unwrap();
        let second = extract_interfaces(code).unwrap();
        assert_eq!(first, second);
    }
}
