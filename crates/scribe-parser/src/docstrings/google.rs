//! Google-style docstrings.
//!
//! ```text
//! Summary line.
//!
//! Args:
//!     x (int): The first value.
//!     y: The second value, typed by the signature.
//!
//! Returns:
//!     int: The sum.
//! ```

use scribe_core::{AnnotatedObject, AttributeItem, DocstringOptions, Parameter, ParameterKind, Section};

use super::blocks::{read_block, read_block_items, scan_sections};
use super::examples::split_examples;
use super::{Diagnostics, DocstringParser, ParseContext, merge_with_signature};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    Parameters,
    KeywordArgs,
    Exceptions,
    Return,
    Yield,
    Examples,
    Attributes,
}

const TITLES: &[(&str, SectionKind)] = &[
    ("args:", SectionKind::Parameters),
    ("arguments:", SectionKind::Parameters),
    ("params:", SectionKind::Parameters),
    ("parameters:", SectionKind::Parameters),
    ("keyword args:", SectionKind::KeywordArgs),
    ("keyword arguments:", SectionKind::KeywordArgs),
    ("raise:", SectionKind::Exceptions),
    ("raises:", SectionKind::Exceptions),
    ("except:", SectionKind::Exceptions),
    ("exceptions:", SectionKind::Exceptions),
    ("return:", SectionKind::Return),
    ("returns:", SectionKind::Return),
    ("yield:", SectionKind::Yield),
    ("yields:", SectionKind::Yield),
    ("example:", SectionKind::Examples),
    ("examples:", SectionKind::Examples),
    ("attribute:", SectionKind::Attributes),
    ("attributes:", SectionKind::Attributes),
];

/// Parser for Google-style docstrings.
#[derive(Debug, Clone, Default)]
pub struct Google {
    options: DocstringOptions,
}

impl Google {
    #[must_use]
    pub const fn new(options: DocstringOptions) -> Self {
        Self { options }
    }
}

impl DocstringParser for Google {
    fn parse(&self, docstring: &str, context: &ParseContext<'_>) -> (Vec<Section>, Vec<String>) {
        let mut diagnostics = Diagnostics::new(context.object_path);
        let sections = scan_sections(
            docstring,
            TITLES,
            self.options.replace_admonitions,
            |kind, lines, start| {
                let mut reader = SectionReader {
                    context,
                    diagnostics: &mut diagnostics,
                    trim_doctest_flags: self.options.trim_doctest_flags,
                };
                reader.read(kind, lines, start)
            },
        );
        (sections, diagnostics.into_messages())
    }
}

struct SectionReader<'c, 'd, 'p> {
    context: &'c ParseContext<'p>,
    diagnostics: &'d mut Diagnostics<'p>,
    trim_doctest_flags: bool,
}

impl SectionReader<'_, '_, '_> {
    fn read(&mut self, kind: SectionKind, lines: &[String], start: usize) -> (Option<Section>, usize) {
        match kind {
            SectionKind::Parameters => {
                let (parameters, last) = self.read_parameters(lines, start, true);
                if parameters.is_empty() {
                    self.diagnostics
                        .error(format_args!("Empty parameters section at line {start}"));
                    return (None, last);
                }
                (Some(Section::Parameters(parameters)), last)
            }
            SectionKind::KeywordArgs => {
                let (mut parameters, last) = self.read_parameters(lines, start, false);
                if parameters.is_empty() {
                    self.diagnostics
                        .error(format_args!("Empty keyword arguments section at line {start}"));
                    return (None, last);
                }
                for parameter in &mut parameters {
                    parameter.kind = Some(ParameterKind::KeywordOnly);
                }
                (Some(Section::KeywordArgs(parameters)), last)
            }
            SectionKind::Exceptions => self.read_exceptions(lines, start),
            SectionKind::Return => {
                let (value, last) = self.read_returned(lines, start, "return");
                (value.map(Section::Return), last)
            }
            SectionKind::Yield => {
                let (value, last) = self.read_returned(lines, start, "yield");
                (value.map(Section::Yield), last)
            }
            SectionKind::Examples => self.read_examples(lines, start),
            SectionKind::Attributes => self.read_attributes(lines, start),
        }
    }

    fn read_parameters(
        &mut self,
        lines: &[String],
        start: usize,
        require_match: bool,
    ) -> (Vec<Parameter>, usize) {
        let (items, last) = read_block_items(lines, start, self.diagnostics);
        let mut parameters = Vec::new();
        for item in items {
            let Some((name_with_type, description)) = item.split_once(':') else {
                self.diagnostics
                    .error(format_args!("Failed to get 'name: description' pair from '{item}'"));
                continue;
            };
            let (name, documented_type) = split_name_and_type(name_with_type);
            parameters.push(merge_with_signature(
                name,
                &documented_type,
                description.trim_start().to_string(),
                self.context,
                self.diagnostics,
                require_match,
            ));
        }
        (parameters, last)
    }

    fn read_attributes(&mut self, lines: &[String], start: usize) -> (Option<Section>, usize) {
        let (items, last) = read_block_items(lines, start, self.diagnostics);
        let mut attributes = Vec::new();
        for item in items {
            let Some((name_with_type, description)) = item.split_once(':') else {
                self.diagnostics
                    .error(format_args!("Failed to get 'name: description' pair from '{item}'"));
                continue;
            };
            let (name, mut annotation) = split_name_and_type(name_with_type);
            if annotation.is_empty() {
                annotation = self.context.attributes.get(name).cloned().unwrap_or_default();
            }
            attributes.push(AttributeItem {
                name: name.to_string(),
                annotation,
                description: description.trim_start().to_string(),
            });
        }
        if attributes.is_empty() {
            self.diagnostics
                .error(format_args!("Empty attributes section at line {start}"));
            return (None, last);
        }
        (Some(Section::Attributes(attributes)), last)
    }

    fn read_exceptions(&mut self, lines: &[String], start: usize) -> (Option<Section>, usize) {
        let (items, last) = read_block_items(lines, start, self.diagnostics);
        let mut exceptions = Vec::new();
        for item in items {
            match item.split_once(": ") {
                Some((annotation, description)) => {
                    exceptions.push(AnnotatedObject::new(annotation, description.trim_start()));
                }
                None => self.diagnostics.error(format_args!(
                    "Failed to get 'exception: description' pair from '{item}'"
                )),
            }
        }
        if exceptions.is_empty() {
            self.diagnostics
                .error(format_args!("Empty exceptions section at line {start}"));
            return (None, last);
        }
        (Some(Section::Exceptions(exceptions)), last)
    }

    /// Shared by Returns and Yields; `what` only changes the diagnostics.
    fn read_returned(
        &mut self,
        lines: &[String],
        start: usize,
        what: &str,
    ) -> (Option<AnnotatedObject>, usize) {
        let (text, last) = read_block(lines, start);
        if text.is_empty() {
            self.diagnostics
                .error(format_args!("Empty {what} section at line {start}"));
            return (None, last);
        }

        let (documented_type, description) = match split_type_prefix(&text) {
            Some((annotation, description)) => (Some(annotation), description.to_string()),
            None => (None, text.clone()),
        };
        let annotation = self
            .context
            .return_annotation()
            .or(documented_type)
            .or_else(|| self.context.annotation());
        if annotation.is_none() {
            self.diagnostics
                .error(format_args!("No {what} type/annotation in docstring/signature"));
        }
        (
            Some(AnnotatedObject::new(annotation.unwrap_or_default(), description)),
            last,
        )
    }

    fn read_examples(&mut self, lines: &[String], start: usize) -> (Option<Section>, usize) {
        let (text, last) = read_block(lines, start);
        let sub_sections = if text.is_empty() {
            Vec::new()
        } else {
            split_examples(&text, self.trim_doctest_flags)
        };
        if sub_sections.is_empty() {
            self.diagnostics
                .error(format_args!("Empty examples section at line {start}"));
            return (None, last);
        }
        (Some(Section::Examples(sub_sections)), last)
    }
}

/// `x (int, optional)` gives `("x", "int")`; a bare `x` gives an empty type.
fn split_name_and_type(name_with_type: &str) -> (&str, String) {
    let name_with_type = name_with_type.trim();
    let Some((name, documented_type)) = name_with_type.split_once(' ') else {
        return (name_with_type, String::new());
    };
    let mut documented_type = documented_type.trim();
    if let Some(inner) = documented_type
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        documented_type = inner;
    }
    let documented_type = documented_type
        .strip_suffix(", optional")
        .unwrap_or(documented_type);
    (name, documented_type.trim().to_string())
}

/// Split `type: description` off the first line of a block.
///
/// The type may contain spaces only inside brackets, so prose containing a
/// colon is left alone.
fn split_type_prefix(text: &str) -> Option<(&str, &str)> {
    let first_line = text.split('\n').next().unwrap_or(text);
    let colon = first_line.find(':')?;
    let candidate = first_line[..colon].trim();
    if candidate.is_empty() || has_whitespace_outside_brackets(candidate) {
        return None;
    }
    Some((candidate, text[colon + 1..].trim_start()))
}

fn has_whitespace_outside_brackets(text: &str) -> bool {
    let mut depth = 0usize;
    for character in text.chars() {
        match character {
            '[' | '(' | '{' => depth += 1,
            ']' | ')' | '}' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => return true,
            _ => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("x", ("x", ""))]
    #[case("x (int)", ("x", "int"))]
    #[case("x (int, optional)", ("x", "int"))]
    #[case("x int", ("x", "int"))]
    #[case("*args (str)", ("*args", "str"))]
    fn names_and_types(#[case] input: &str, #[case] expected: (&str, &str)) {
        let (name, documented_type) = split_name_and_type(input);
        assert_eq!((name, documented_type.as_str()), expected);
    }

    #[rstest]
    #[case("int: The value.", Some(("int", "The value.")))]
    #[case("Dict[str, int]: Mapping.", Some(("Dict[str, int]", "Mapping.")))]
    #[case("The value: always positive.", None)]
    #[case("Sum.", None)]
    fn return_type_prefix(#[case] input: &str, #[case] expected: Option<(&str, &str)>) {
        assert_eq!(split_type_prefix(input), expected);
    }
}
