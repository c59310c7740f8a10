//! Rendering declarations to the interfaces-only text block.
//!
//! Indentation is a fixed four-space unit per nesting level, a formatting
//! convention of the output rather than anything read from the source.

use super::Declaration;

const INDENT: &str = "    ";

/// Render declarations, in order, joined with newlines.
pub(super) fn render(declarations: &[Declaration]) -> String {
    let mut lines = Vec::new();
    for declaration in declarations {
        render_declaration(declaration, &mut lines);
    }
    lines.join("\n")
}

fn render_declaration(declaration: &Declaration, lines: &mut Vec<String>) {
    match declaration {
        Declaration::Class {
            name,
            indent,
            decorators,
            bases,
            docstring,
            children,
        } => {
            let pad = INDENT.repeat(*indent);
            for decorator in decorators {
                lines.push(format!("{pad}@{decorator}"));
            }
            if bases.is_empty() {
                lines.push(format!("{pad}class {name}:"));
            } else {
                lines.push(format!("{pad}class {name}({}):", bases.join(", ")));
            }
            if let Some(doc) = docstring {
                lines.push(format_docstring(doc, indent + 1));
            }
            for child in children {
                render_declaration(child, lines);
            }
        }
        Declaration::Function {
            indent,
            decorators,
            signature,
            docstring,
            ..
        } => {
            let pad = INDENT.repeat(*indent);
            for decorator in decorators {
                lines.push(format!("{pad}@{decorator}"));
            }
            lines.push(format!("{pad}{signature}:"));
            if let Some(doc) = docstring {
                lines.push(format_docstring(doc, indent + 1));
            }
        }
        Declaration::Field {
            target,
            annotation,
            value,
            indent,
        } => {
            let pad = INDENT.repeat(*indent);
            match value {
                Some(value) => lines.push(format!("{pad}{target}: {annotation} = {value}")),
                None => lines.push(format!("{pad}{target}: {annotation}")),
            }
        }
    }
}

/// A triple-quoted block: the docstring text dedented, then re-indented at
/// the given level. Blank lines stay unindented.
fn format_docstring(doc: &str, level: usize) -> String {
    let pad = INDENT.repeat(level);
    let indented = dedent(doc)
        .split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("{pad}\"\"\"\n{indented}\n{pad}\"\"\"")
}

/// Remove the longest whitespace prefix common to all non-blank lines.
/// Whitespace-only lines are normalized to empty.
fn dedent(text: &str) -> String {
    let mut margin: Option<&str> = None;
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let prefix = &line[..line.len() - line.trim_start().len()];
        margin = Some(match margin {
            None => prefix,
            Some(current) => common_prefix(current, prefix),
        });
    }

    let margin = margin.unwrap_or("");
    text.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                line.strip_prefix(margin).unwrap_or(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let shared = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    &a[..shared]
}
