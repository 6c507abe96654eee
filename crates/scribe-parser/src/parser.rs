//! ast-grep wrapper for Python sources.

use ast_grep_core::tree_sitter::StrDoc;
use ast_grep_language::SupportLang;

/// The concrete AST tree type returned by [`parse_python`].
pub type AstTree = ast_grep_core::AstGrep<StrDoc<SupportLang>>;

/// Whether a file path names a Python source file.
#[must_use]
pub fn is_python_file(file_path: &str) -> bool {
    matches!(file_path.rsplit('.').next(), Some("py" | "pyi"))
}

/// Parse Python source code into an ast-grep tree.
#[must_use]
pub fn parse_python(source: &str) -> AstTree {
    use ast_grep_language::LanguageExt;
    SupportLang::Python.ast_grep(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_python_sources() {
        assert!(is_python_file("pkg/mod.py"));
        assert!(is_python_file("pkg/stubs.pyi"));
        assert!(!is_python_file("pkg/data.json"));
        assert!(!is_python_file("Makefile"));
    }

    #[test]
    fn parses_module_root() {
        let tree = parse_python("x = 1\n");
        assert_eq!(tree.root().kind().as_ref(), "module");
    }
}
