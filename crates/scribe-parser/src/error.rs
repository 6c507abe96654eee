//! Parser error types for scribe-parser.

/// Errors that can occur while turning Python source into the statement model.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("invalid syntax at line {line}: {snippet}")]
    Syntax { line: usize, snippet: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
