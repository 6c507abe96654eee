//! Attribute docstrings recovered from source.
//!
//! Python keeps no docstring for attributes, but the convention of writing a
//! string literal right after an assignment is common:
//!
//! ```python
//! TIMEOUT: int = 30
//! """Seconds before giving up."""
//! ```
//!
//! The scanner pairs such statements, recursing into `if`/`try`/`with` bodies.

use crate::docstring::cleandoc;
use crate::python::{Stmt, StmtKind, Target};

/// What is known about one attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeInfo {
    pub annotation: Option<String>,
    pub docstring: Option<String>,
    /// 1-based line span of the assignment.
    pub lines: Option<(usize, usize)>,
}

/// Attributes keyed by name, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeTable {
    entries: Vec<(String, AttributeInfo)>,
}

impl AttributeTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeInfo> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, info)| info)
    }

    /// Insert or replace an entry, keeping its original position.
    pub fn insert(&mut self, name: impl Into<String>, info: AttributeInfo) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = info,
            None => self.entries.push((name, info)),
        }
    }

    /// Merge `extra` key-wise: present values overwrite, absent ones never do.
    pub fn merge(&mut self, extra: Self) {
        for (name, info) in extra.entries {
            match self.entries.iter_mut().find(|(key, _)| *key == name) {
                Some((_, existing)) => {
                    if info.annotation.is_some() {
                        existing.annotation = info.annotation;
                    }
                    if info.docstring.is_some() {
                        existing.docstring = info.docstring;
                    }
                    if existing.lines.is_none() {
                        existing.lines = info.lines;
                    }
                }
                None => self.entries.push((name, info)),
            }
        }
    }

    /// Overlay resolved type hints on textual annotations.
    #[must_use]
    pub fn with_type_hints(mut self, hints: &[(String, String)]) -> Self {
        let hinted = hints
            .iter()
            .map(|(name, annotation)| {
                (
                    name.clone(),
                    AttributeInfo {
                        annotation: Some(annotation.clone()),
                        ..AttributeInfo::default()
                    },
                )
            })
            .collect();
        self.merge(Self { entries: hinted });
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeInfo)> {
        self.entries.iter().map(|(name, info)| (name.as_str(), info))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for AttributeTable {
    type Item = (String, AttributeInfo);
    type IntoIter = std::vec::IntoIter<(String, AttributeInfo)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Documented module or class attributes of a statement list.
///
/// Only assignments immediately followed by a string literal are kept; every
/// plain name bound by the assignment is recorded. Class bodies are not entered.
#[must_use]
pub fn documented_attributes(body: &[Stmt]) -> AttributeTable {
    let mut table = AttributeTable::new();
    for (assignment, docstring) in pairs(body) {
        let Some(docstring) = docstring else {
            continue;
        };
        let StmtKind::Assign {
            targets, annotation, ..
        } = &assignment.kind
        else {
            continue;
        };
        for target in targets {
            if let Target::Name(name) = target {
                table.insert(
                    name.clone(),
                    AttributeInfo {
                        annotation: annotation.clone(),
                        docstring: Some(cleandoc(docstring)),
                        lines: Some((assignment.line_start, assignment.line_end)),
                    },
                );
            }
        }
    }
    table
}

/// `self.<name>` assignments in a constructor body.
///
/// An annotated assignment contributes its annotation; a plain one needs a
/// following docstring to be kept.
#[must_use]
pub fn instance_attributes(body: &[Stmt]) -> AttributeTable {
    let mut table = AttributeTable::new();
    for (assignment, docstring) in pairs(body) {
        let StmtKind::Assign {
            targets, annotation, ..
        } = &assignment.kind
        else {
            continue;
        };
        let annotation = annotation.as_deref().map(strip_enclosing_parens);
        if docstring.is_none() && annotation.is_none() {
            continue;
        }
        for target in targets {
            if let Target::SelfAttribute(name) = target {
                table.insert(
                    name.clone(),
                    AttributeInfo {
                        annotation: annotation.clone(),
                        docstring: docstring.map(cleandoc),
                        lines: Some((assignment.line_start, assignment.line_end)),
                    },
                );
            }
        }
    }
    table
}

/// Assignments paired with the string literal that directly follows them.
fn pairs(body: &[Stmt]) -> Vec<(&Stmt, Option<&str>)> {
    let mut out = Vec::new();
    collect_pairs(body, &mut out);
    out
}

fn collect_pairs<'a>(body: &'a [Stmt], out: &mut Vec<(&'a Stmt, Option<&'a str>)>) {
    let mut index = 0;
    while index < body.len() {
        let stmt = &body[index];
        match &stmt.kind {
            StmtKind::Assign { .. } => {
                let docstring = body.get(index + 1).and_then(|next| match &next.kind {
                    StmtKind::Expr { string } => string.as_deref(),
                    _ => None,
                });
                out.push((stmt, docstring));
                index += if docstring.is_some() { 2 } else { 1 };
                continue;
            }
            StmtKind::Compound { bodies } => {
                for nested in bodies {
                    collect_pairs(nested, out);
                }
            }
            _ => {}
        }
        index += 1;
    }
}

fn strip_enclosing_parens(annotation: &str) -> String {
    let mut text = annotation.trim();
    while let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        text = inner.trim();
    }
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::python::PyModule;
    use pretty_assertions::assert_eq;

    fn module(source: &str) -> PyModule {
        PyModule::parse(source).unwrap()
    }

    #[test]
    fn annotated_assignment_with_docstring_is_documented() {
        let table = documented_attributes(&module("X: int = 0\n\"\"\"doc\"\"\"\n").body);
        let info = table.get("X").unwrap();
        assert_eq!(info.annotation.as_deref(), Some("int"));
        assert_eq!(info.docstring.as_deref(), Some("doc"));
        assert_eq!(info.lines, Some((1, 1)));
    }

    #[test]
    fn assignment_without_docstring_is_absent() {
        let table = documented_attributes(&module("X = 0\n").body);
        assert!(table.get("X").is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn multiple_targets_share_the_docstring() {
        let table = documented_attributes(&module("a = b = 1\n'''Both.'''\nc, d = 1, 2\n'''Pair.'''\n").body);
        let names: Vec<&str> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
        assert_eq!(table.get("d").unwrap().docstring.as_deref(), Some("Pair."));
    }

    #[test]
    fn conditional_and_exception_bodies_are_scanned() {
        let source = "\
try:
    A = 1
    \"\"\"In try.\"\"\"
except ImportError:
    B = 2
    \"\"\"In except.\"\"\"
finally:
    C = 3
    \"\"\"In finally.\"\"\"

if True:
    D = 4
    \"\"\"In if.\"\"\"
else:
    E = 5
    \"\"\"In else.\"\"\"
";
        let table = documented_attributes(&module(source).body);
        let names: Vec<&str> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn docstrings_are_cleaned() {
        let source = "X = 1\n\"\"\"\n    Summary.\n\n    More.\n\"\"\"\n";
        let table = documented_attributes(&module(source).body);
        assert_eq!(table.get("X").unwrap().docstring.as_deref(), Some("Summary.\n\nMore."));
    }

    #[test]
    fn instance_attributes_need_self_target() {
        let source = "\
def __init__(self):
    self.a: (int) = 1
    self.b = 2
    \"\"\"B doc.\"\"\"
    self.c = 3
    self.d.other = 4
    \"\"\"Ignored.\"\"\"
    other.e = 5
    \"\"\"Ignored too.\"\"\"
";
        let module = module(source);
        let StmtKind::FunctionDef(init) = &module.body[0].kind else {
            panic!("expected function");
        };
        let table = instance_attributes(&init.body);
        let names: Vec<&str> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(table.get("a").unwrap().annotation.as_deref(), Some("int"));
        assert_eq!(table.get("a").unwrap().docstring, None);
        assert_eq!(table.get("b").unwrap().docstring.as_deref(), Some("B doc."));
    }

    #[test]
    fn type_hints_win_over_textual_annotations() {
        let mut table = AttributeTable::new();
        table.insert(
            "X",
            AttributeInfo {
                annotation: Some("'int'".into()),
                docstring: Some("doc".into()),
                lines: Some((1, 1)),
            },
        );
        let table = table.with_type_hints(&[("X".into(), "int".into()), ("Y".into(), "str".into())]);
        assert_eq!(table.get("X").unwrap().annotation.as_deref(), Some("int"));
        assert_eq!(table.get("X").unwrap().docstring.as_deref(), Some("doc"));
        assert_eq!(table.get("Y").unwrap().annotation.as_deref(), Some("str"));
        assert_eq!(table.get("Y").unwrap().docstring, None);
    }

    #[test]
    fn merge_never_erases_present_values() {
        let mut base = AttributeTable::new();
        base.insert(
            "x",
            AttributeInfo {
                annotation: Some("int".into()),
                docstring: Some("Doc.".into()),
                lines: None,
            },
        );
        let mut extra = AttributeTable::new();
        extra.insert("x", AttributeInfo::default());
        base.merge(extra);
        assert_eq!(base.get("x").unwrap().annotation.as_deref(), Some("int"));
        assert_eq!(base.get("x").unwrap().docstring.as_deref(), Some("Doc."));
    }
}
