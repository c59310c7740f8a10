//! Python declaration parsing using tree-sitter.
//!
//! Walks the syntax tree applying a three-way classification: class
//! definitions, function definitions, and type-annotated assignments are
//! kept; every other statement kind is silently dropped. Class bodies are
//! recursed into one level deeper; function bodies are only inspected for a
//! leading docstring.

use smallvec::SmallVec;
use tree_sitter::Node;

use super::{find_child_by_kind, node_text, with_python_parser, Declaration, ParseError};

/// Parse Python source into its top-level declarations, in source order.
pub(super) fn parse(code: &str) -> Result<Vec<Declaration>, ParseError> {
    with_python_parser(|parser| {
        let tree = parser
            .parse(code, None)
            .ok_or(ParseError::Syntax { line: 1 })?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(ParseError::Syntax {
                line: first_error_line(root),
            });
        }

        let mut declarations = Vec::new();
        collect_block(root, code, 0, &mut declarations);
        Ok(declarations)
    })?
}

/// 1-indexed line of the first error or missing node in the tree.
fn first_error_line(node: Node) -> usize {
    if node.is_error() || node.is_missing() {
        return node.start_position().row + 1;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() || child.is_missing() {
            return first_error_line(child);
        }
    }
    node.start_position().row + 1
}

/// Classify every statement of a module or class body.
fn collect_block(node: Node, code: &str, level: usize, out: &mut Vec<Declaration>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "class_definition" => {
                if let Some(class) = class_declaration(child, code, level, SmallVec::new()) {
                    out.push(class);
                }
            }
            "function_definition" => {
                if let Some(func) = function_declaration(child, code, level, SmallVec::new()) {
                    out.push(func);
                }
            }
            "decorated_definition" => {
                collect_decorated(child, code, level, out);
            }
            "expression_statement" => {
                if let Some(field) = field_declaration(child, code, level) {
                    out.push(field);
                }
            }
            _ => {}
        }
    }
}

/// Gather decorator expressions, then classify the adorned definition.
fn collect_decorated(node: Node, code: &str, level: usize, out: &mut Vec<Declaration>) {
    let mut decorators: SmallVec<[String; 4]> = SmallVec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "decorator" => {
                if let Some(expr) = child.named_child(0) {
                    decorators.push(collapse_onto_one_line(&node_text(expr, code)));
                }
            }
            "class_definition" => {
                if let Some(class) =
                    class_declaration(child, code, level, std::mem::take(&mut decorators))
                {
                    out.push(class);
                }
            }
            "function_definition" => {
                if let Some(func) =
                    function_declaration(child, code, level, std::mem::take(&mut decorators))
                {
                    out.push(func);
                }
            }
            _ => {}
        }
    }
}

fn class_declaration(
    node: Node,
    code: &str,
    level: usize,
    decorators: SmallVec<[String; 4]>,
) -> Option<Declaration> {
    let name = node.child_by_field_name("name").map(|n| node_text(n, code))?;

    // Keyword arguments (metaclass=...) are not base classes.
    let mut bases: SmallVec<[String; 4]> = SmallVec::new();
    if let Some(superclasses) = node.child_by_field_name("superclasses") {
        let mut cursor = superclasses.walk();
        for argument in superclasses.named_children(&mut cursor) {
            match argument.kind() {
                "keyword_argument" | "comment" => {}
                _ => bases.push(collapse_onto_one_line(&node_text(argument, code))),
            }
        }
    }

    let body = node.child_by_field_name("body");
    let docstring = body.and_then(|b| block_docstring(b, code));

    let mut children = Vec::new();
    if let Some(body) = body {
        collect_block(body, code, level + 1, &mut children);
    }

    Some(Declaration::Class {
        name,
        indent: level,
        decorators,
        bases,
        docstring,
        children,
    })
}

fn function_declaration(
    node: Node,
    code: &str,
    level: usize,
    decorators: SmallVec<[String; 4]>,
) -> Option<Declaration> {
    let name = node.child_by_field_name("name").map(|n| node_text(n, code))?;

    let is_async = node
        .children(&mut node.walk())
        .any(|c| c.kind() == "async");

    let mut signature = String::new();
    if is_async {
        signature.push_str("async ");
    }
    signature.push_str("def ");
    signature.push_str(&name);

    if let Some(params) = node.child_by_field_name("parameters") {
        signature.push_str(&collapse_onto_one_line(&node_text(params, code)));
    }

    if let Some(ret) = node.child_by_field_name("return_type") {
        signature.push_str(" -> ");
        signature.push_str(&collapse_onto_one_line(&node_text(ret, code)));
    }

    let docstring = node
        .child_by_field_name("body")
        .and_then(|b| block_docstring(b, code));

    Some(Declaration::Function {
        name,
        indent: level,
        decorators,
        signature,
        docstring,
    })
}

/// A type-annotated assignment: `target: annotation` or
/// `target: annotation = value`. Assignments without an annotation are not
/// declarations.
fn field_declaration(node: Node, code: &str, level: usize) -> Option<Declaration> {
    let assignment = find_child_by_kind(node, "assignment")?;
    let annotation = assignment.child_by_field_name("type")?;
    let target = assignment.child_by_field_name("left")?;
    let value = assignment.child_by_field_name("right");

    Some(Declaration::Field {
        target: collapse_onto_one_line(&node_text(target, code)),
        annotation: collapse_onto_one_line(&node_text(annotation, code)),
        value: value.map(|v| collapse_onto_one_line(&node_text(v, code))),
        indent: level,
    })
}

/// The raw docstring of a block: a leading statement whose sole content is a
/// bare string literal. f-strings are expressions, not documentation.
fn block_docstring(block: Node, code: &str) -> Option<String> {
    let mut cursor = block.walk();
    let first = block
        .named_children(&mut cursor)
        .find(|c| c.kind() != "comment")?;

    if first.kind() != "expression_statement" || first.named_child_count() != 1 {
        return None;
    }

    let string = first.named_child(0)?;
    if string.kind() != "string" {
        return None;
    }

    let mut content = String::new();
    let mut cursor = string.walk();
    for part in string.named_children(&mut cursor) {
        match part.kind() {
            "string_content" | "escape_sequence" => content.push_str(&node_text(part, code)),
            "interpolation" => return None,
            _ => {}
        }
    }
    Some(content)
}

/// Collapse a source expression spanning several lines onto one line.
fn collapse_onto_one_line(text: &str) -> String {
    if text.contains('\n') {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_function() {
        let code = "def greet(name: str) -> str:\n    \"\"\"Say hello.\"\"\"\n    return name\n";
        let decls = parse(code).unwrap();
        assert_eq!(decls.len(), 1);

        match &decls[0] {
            Declaration::Function {
                name,
                signature,
                docstring,
                ..
            } => {
                assert_eq!(name, "greet");
                assert_eq!(signature, "def greet(name: str) -> str");
                assert_eq!(docstring.as_deref(), Some("Say hello."));
            }
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_class_with_members() {
        let code = r#"
class Handler(Base):
    """Handle requests."""

    retries: int = 3

    def handle(self, request) -> None:
        self.request = request
"#;
        let decls = parse(code).unwrap();
        assert_eq!(decls.len(), 1);

        match &decls[0] {
            Declaration::Class {
                name,
                bases,
                docstring,
                children,
                ..
            } => {
                assert_eq!(name, "Handler");
                assert_eq!(bases.as_slice(), ["Base".to_string()]);
                assert_eq!(docstring.as_deref(), Some("Handle requests."));
                assert_eq!(children.len(), 2);
                assert_eq!(children[0].name(), "retries");
                assert_eq!(children[1].name(), "handle");
                assert_eq!(children[1].indent(), 1);
            }
            other => panic!("expected class, got {:?}", other),
        }
    }

    #[test]
    fn test_decorators_verbatim_in_source_order() {
        let code = "@app.route(\"/x\", methods=[\"GET\"])\n@cached\ndef view():\n    pass\n";
        let decls = parse(code).unwrap();

        match &decls[0] {
            Declaration::Function { decorators, .. } => {
                assert_eq!(
                    decorators.as_slice(),
                    [
                        "app.route(\"/x\", methods=[\"GET\"])".to_string(),
                        "cached".to_string()
                    ]
                );
            }
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_async_function_signature() {
        let code = "async def fetch(url: str) -> bytes:\n    pass\n";
        let decls = parse(code).unwrap();

        match &decls[0] {
            Declaration::Function { signature, .. } => {
                assert_eq!(signature, "async def fetch(url: str) -> bytes");
            }
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_non_declarations_are_dropped() {
        let code = r#"
import os
from typing import List

x = 1

for i in range(3):
    print(i)

def kept():
    pass

if x:
    y = 2
"#;
        let decls = parse(code).unwrap();
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name(), "kept");
    }

    #[test]
    fn test_module_level_annotated_field() {
        let code = "VERSION: str = \"1.0\"\ncount: int\n";
        let decls = parse(code).unwrap();
        assert_eq!(decls.len(), 2);

        match &decls[0] {
            Declaration::Field { target, annotation, value, .. } => {
                assert_eq!(target, "VERSION");
                assert_eq!(annotation, "str");
                assert_eq!(value.as_deref(), Some("\"1.0\""));
            }
            other => panic!("expected field, got {:?}", other),
        }
        match &decls[1] {
            Declaration::Field { value, .. } => assert!(value.is_none()),
            other => panic!("expected field, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_assignment_is_not_a_field() {
        let decls = parse("x = 1\n").unwrap();
        assert!(decls.is_empty());
    }

    #[test]
    fn test_function_body_never_recursed() {
        let code = r#"
def outer():
    class Hidden:
        pass

    def inner():
        pass

    value: int = 1
"#;
        let decls = parse(code).unwrap();
        assert_eq!(decls.len(), 1);
        assert!(matches!(decls[0], Declaration::Function { .. }));
    }

    #[test]
    fn test_nested_classes_recurse() {
        let code = r#"
class Outer:
    class Inner:
        def method(self):
            pass
"#;
        let decls = parse(code).unwrap();
        match &decls[0] {
            Declaration::Class { children, .. } => match &children[0] {
                Declaration::Class {
                    name,
                    indent,
                    children,
                    ..
                } => {
                    assert_eq!(name, "Inner");
                    assert_eq!(*indent, 1);
                    assert_eq!(children[0].indent(), 2);
                }
                other => panic!("expected inner class, got {:?}", other),
            },
            other => panic!("expected class, got {:?}", other),
        }
    }

    #[test]
    fn test_metaclass_keyword_is_not_a_base() {
        let code = "class C(A, metaclass=Meta):\n    pass\n";
        let decls = parse(code).unwrap();
        match &decls[0] {
            Declaration::Class { bases, .. } => {
                assert_eq!(bases.as_slice(), ["A".to_string()]);
            }
            other => panic!("expected class, got {:?}", other),
        }
    }

    #[test]
    fn test_multiline_signature_collapsed() {
        let code = "def f(a: int,\n      b: str = \"x\") -> bool:\n    pass\n";
        let decls = parse(code).unwrap();
        match &decls[0] {
            Declaration::Function { signature, .. } => {
                assert_eq!(signature, "def f(a: int, b: str = \"x\") -> bool");
            }
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_fstring_is_not_a_docstring() {
        let code = "def f():\n    f\"\"\"not {documentation}\"\"\"\n";
        let decls = parse(code).unwrap();
        match &decls[0] {
            Declaration::Function { docstring, .. } => assert!(docstring.is_none()),
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_syntax_error_fails_with_no_partial_output() {
        let result = parse("def broken(:\n    pass\n");
        assert!(matches!(result, Err(ParseError::Syntax { .. })));

        let result = parse("class C(\n");
        assert!(matches!(result, Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn test_sibling_order_preserved() {
        let code = "def b():\n    pass\n\nclass A:\n    pass\n\ndef c():\n    pass\n";
        let decls = parse(code).unwrap();
        let names: Vec<&str> = decls.iter().map(|d| d.name()).collect();
        assert_eq!(names, ["b", "A", "c"]);
    }
}
