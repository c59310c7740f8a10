//! Language classification by file extension.
//!
//! The tag is used as the label on each dumped code fence; `Python` is the
//! one language that additionally gates the interfaces extraction engine.

use std::path::Path;

/// A recognized source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    Json,
    JavaScript,
    TypeScript,
    Html,
    Css,
    Java,
    C,
    Cpp,
    CSharp,
    Ruby,
    Php,
    Go,
    Rust,
    Bash,
    Batch,
    PowerShell,
    Yaml,
    Xml,
    Markdown,
    Text,
}

impl Language {
    /// All recognized languages.
    pub fn all() -> &'static [Language] {
        &[
            Language::Python,
            Language::Json,
            Language::JavaScript,
            Language::TypeScript,
            Language::Html,
            Language::Css,
            Language::Java,
            Language::C,
            Language::Cpp,
            Language::CSharp,
            Language::Ruby,
            Language::Php,
            Language::Go,
            Language::Rust,
            Language::Bash,
            Language::Batch,
            Language::PowerShell,
            Language::Yaml,
            Language::Xml,
            Language::Markdown,
            Language::Text,
        ]
    }

    /// Classify a filename by its extension. Unmapped extensions yield `None`.
    pub fn from_path(path: &Path) -> Option<Language> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        let language = match extension.as_str() {
            "py" => Language::Python,
            "json" => Language::Json,
            "js" => Language::JavaScript,
            "ts" => Language::TypeScript,
            "html" => Language::Html,
            "css" => Language::Css,
            "java" => Language::Java,
            "c" => Language::C,
            "cpp" | "h" => Language::Cpp,
            "cs" => Language::CSharp,
            "rb" => Language::Ruby,
            "php" => Language::Php,
            "go" => Language::Go,
            "rs" => Language::Rust,
            "sh" => Language::Bash,
            "bat" => Language::Batch,
            "ps1" => Language::PowerShell,
            "yaml" | "yml" => Language::Yaml,
            "xml" => Language::Xml,
            "md" => Language::Markdown,
            "txt" => Language::Text,
            _ => return None,
        };
        Some(language)
    }

    /// The fence tag for this language.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Json => "json",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Html => "html",
            Language::Css => "css",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "csharp",
            Language::Ruby => "ruby",
            Language::Php => "php",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Bash => "bash",
            Language::Batch => "batch",
            Language::PowerShell => "powershell",
            Language::Yaml => "yaml",
            Language::Xml => "xml",
            Language::Markdown => "markdown",
            Language::Text => "text",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// The fence tag for a path: the language tag, or empty when unmapped.
pub fn tag_for_path(path: &Path) -> &'static str {
    Language::from_path(path).map_or("", |language| language.tag())
}
