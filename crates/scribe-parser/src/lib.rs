//! # scribe-parser
//!
//! ast-grep-based Python source parsing for scribe.
//!
//! - [`python`]: an owned statement model of a module (definitions, assignments,
//!   imports, compound bodies), built once per file from the tree-sitter tree
//! - [`attributes`]: attribute docstrings paired from `assignment` + string
//!   literal statements, plus `self.<name>` constructor attributes
//! - [`docstrings`]: Google, reStructuredText, Numpy and Markdown docstring
//!   parsers sharing one `parse(text, context)` contract
//!
//! Parsing never aborts on malformed docstrings: problems come back as
//! diagnostics next to the sections that could be recovered.

pub mod attributes;
pub mod docstring;
pub mod docstrings;
pub mod error;
pub mod parser;
pub mod python;

pub use attributes::{AttributeInfo, AttributeTable, documented_attributes, instance_attributes};
pub use docstring::cleandoc;
pub use docstrings::{DocstringParser, ParseContext, parser_for};
pub use error::ParserError;
pub use parser::{is_python_file, parse_python};
pub use python::{
    ClassDef, FunctionDef, ImportAlias, ImportFrom, Param, PyModule, Stmt, StmtKind, Target, decorator_matches,
};
