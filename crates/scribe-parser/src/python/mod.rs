//! Owned statement model of a Python module.
//!
//! The ast-grep tree borrows its source, so modules are converted once into
//! this small owned model. Only the shapes the loader and the attribute
//! scanner care about are kept; everything else is [`StmtKind::Other`].

use std::path::Path;

use scribe_core::ParameterKind;

use crate::error::ParserError;
use crate::parser::parse_python;

pub mod literals;
mod statements;

#[cfg(test)]
mod tests;

/// A parsed Python source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyModule {
    pub source: String,
    pub body: Vec<Stmt>,
}

impl PyModule {
    /// Parse a module, rejecting sources the grammar cannot recover.
    ///
    /// # Errors
    ///
    /// Returns [`ParserError::Syntax`] when the tree contains an error or missing node.
    pub fn parse(source: &str) -> Result<Self, ParserError> {
        let tree = parse_python(source);
        let root = tree.root();
        if let Some(line) = statements::first_error_line(&root) {
            let snippet = source
                .lines()
                .nth(line.saturating_sub(1))
                .unwrap_or_default()
                .trim()
                .to_string();
            tracing::debug!(line, %snippet, "python source does not parse");
            return Err(ParserError::Syntax { line, snippet });
        }
        Ok(Self {
            source: source.to_string(),
            body: statements::convert_block(&root),
        })
    }

    /// Read and parse a source file.
    ///
    /// # Errors
    ///
    /// Returns [`ParserError::Io`] when the file cannot be read, or
    /// [`ParserError::Syntax`] when it does not parse.
    pub fn from_path(path: &Path) -> Result<Self, ParserError> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }

    /// The raw (uncleaned) module docstring.
    #[must_use]
    pub fn docstring(&self) -> Option<&str> {
        docstring_of(&self.body)
    }

    /// Full source lines `start..=end` (1-based), with a trailing newline.
    #[must_use]
    pub fn lines(&self, start: usize, end: usize) -> String {
        let mut out: String = self
            .source
            .split_inclusive('\n')
            .skip(start.saturating_sub(1))
            .take((end + 1).saturating_sub(start.max(1)))
            .collect();
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    }
}

/// A statement with its 1-based line span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub line_start: usize,
    pub line_end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StmtKind {
    /// A bare expression; `string` holds the decoded value of a lone string literal.
    Expr { string: Option<String> },
    /// Plain, chained or annotated assignment.
    Assign {
        targets: Vec<Target>,
        annotation: Option<String>,
        value: Option<String>,
    },
    ClassDef(ClassDef),
    FunctionDef(FunctionDef),
    /// `if` / `try` / `with`: every nested body in source order.
    Compound { bodies: Vec<Vec<Stmt>> },
    Import(Vec<ImportAlias>),
    ImportFrom(ImportFrom),
    Other,
}

/// An assignment target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Name(String),
    /// Exactly `self.<name>`.
    SelfAttribute(String),
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    pub name: String,
    pub bases: Vec<String>,
    pub decorators: Vec<String>,
    pub body: Vec<Stmt>,
}

impl ClassDef {
    #[must_use]
    pub fn docstring(&self) -> Option<&str> {
        docstring_of(&self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    pub name: String,
    pub decorators: Vec<String>,
    pub parameters: Vec<Param>,
    pub returns: Option<String>,
    pub is_async: bool,
    pub body: Vec<Stmt>,
}

impl FunctionDef {
    #[must_use]
    pub fn docstring(&self) -> Option<&str> {
        docstring_of(&self.body)
    }

    /// Whether a decorator's final dotted segment is `name`.
    #[must_use]
    pub fn has_decorator(&self, name: &str) -> bool {
        decorator_matches(&self.decorators, name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub kind: ParameterKind,
    pub annotation: Option<String>,
    pub default: Option<String>,
}

/// `name [as asname]` in an import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportAlias {
    pub name: String,
    pub asname: Option<String>,
}

impl ImportAlias {
    /// The name bound in the importing namespace.
    #[must_use]
    pub fn bound_name(&self) -> &str {
        self.asname
            .as_deref()
            .unwrap_or_else(|| self.name.split('.').next().unwrap_or(&self.name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFrom {
    /// Module text after the leading dots; may be empty for `from . import x`.
    pub module: String,
    /// Number of leading dots.
    pub level: usize,
    pub names: Vec<ImportAlias>,
    pub star: bool,
}

/// Whether any decorator (ignoring call arguments) ends with `name`.
#[must_use]
pub fn decorator_matches(decorators: &[String], name: &str) -> bool {
    decorators.iter().any(|decorator| {
        let base = decorator.split('(').next().unwrap_or(decorator).trim();
        base == name || base.rsplit('.').next() == Some(name)
    })
}

fn docstring_of(body: &[Stmt]) -> Option<&str> {
    match &body.first()?.kind {
        StmtKind::Expr { string } => string.as_deref(),
        _ => None,
    }
}
