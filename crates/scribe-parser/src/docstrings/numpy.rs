//! Numpy-style docstrings.
//!
//! Sections are introduced by a title underlined with dashes:
//!
//! ```text
//! Parameters
//! ----------
//! x : int, optional
//!     The value.
//! ```
//!
//! Underlined titles that are not recognized stay in the Markdown text.

use scribe_core::{AnnotatedObject, AttributeItem, Parameter, Section};

use super::blocks::is_empty_line;
use super::examples::split_examples;
use super::{Diagnostics, DocstringParser, ParseContext, merge_with_signature};
use crate::docstring::dedent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    Parameters,
    Attributes,
    Returns,
    Yields,
    Raises,
    Examples,
}

const TITLES: &[(&str, SectionKind)] = &[
    ("parameters", SectionKind::Parameters),
    ("other parameters", SectionKind::Parameters),
    ("attributes", SectionKind::Attributes),
    ("returns", SectionKind::Returns),
    ("yields", SectionKind::Yields),
    ("raises", SectionKind::Raises),
    ("examples", SectionKind::Examples),
];

/// One `name : type` header with its indented description.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Item {
    name: String,
    annotation: String,
    description: String,
}

/// Parser for Numpy-style docstrings.
#[derive(Debug, Clone, Copy)]
pub struct Numpy {
    trim_doctest_flags: bool,
}

impl Numpy {
    #[must_use]
    pub const fn new(trim_doctest_flags: bool) -> Self {
        Self { trim_doctest_flags }
    }
}

impl Default for Numpy {
    fn default() -> Self {
        Self::new(true)
    }
}

/// A docstring cut at its underlined titles.
#[derive(Debug, Default)]
struct Split<'a> {
    markdown: Vec<&'a str>,
    sections: Vec<(SectionKind, Vec<&'a str>)>,
}

fn is_underline(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && line.chars().all(|c| c == '-')
}

fn split_sections(docstring: &str) -> Split<'_> {
    let lines: Vec<&str> = docstring.split('\n').collect();
    let mut split = Split::default();
    let mut current: Option<usize> = None;

    let mut index = 0;
    while index < lines.len() {
        let line = lines[index];
        let underlined = !is_empty_line(line) && lines.get(index + 1).is_some_and(|next| is_underline(next));
        if underlined {
            let title = line.trim().to_lowercase();
            match TITLES.iter().find(|(name, _)| *name == title) {
                Some(&(_, kind)) => {
                    split.sections.push((kind, Vec::new()));
                    current = Some(split.sections.len() - 1);
                    index += 2;
                    continue;
                }
                None => current = None,
            }
        }
        match current {
            Some(position) => split.sections[position].1.push(line),
            None => split.markdown.push(line),
        }
        index += 1;
    }
    split
}

/// Items of a section body: unindented lines are headers, deeper lines describe them.
fn read_items(body: &[&str]) -> Vec<(String, String)> {
    let text = dedent(&body.join("\n"));
    let mut items: Vec<(String, Vec<&str>)> = Vec::new();
    for line in text.split('\n') {
        if !is_empty_line(line) && !line.starts_with(char::is_whitespace) {
            items.push((line.trim().to_string(), Vec::new()));
        } else if let Some((_, description)) = items.last_mut() {
            description.push(line);
        }
    }
    items
        .into_iter()
        .map(|(header, description)| (header, dedent(&description.join("\n")).trim().to_string()))
        .collect()
}

/// `name : type, optional` parts of a header.
fn typed_item(header: String, description: String) -> Item {
    let (name, annotation) = match header.split_once(':') {
        Some((name, annotation)) => {
            let annotation = annotation.trim();
            let annotation = annotation.strip_suffix(", optional").unwrap_or(annotation);
            (name.trim().to_string(), annotation.trim().to_string())
        }
        None => (header, String::new()),
    };
    Item {
        name,
        annotation,
        description,
    }
}

/// A Returns/Yields header is a type, or `name : type`.
fn returned_item(header: String, description: String) -> Item {
    match header.split_once(':') {
        Some((name, annotation)) => Item {
            name: name.trim().to_string(),
            annotation: annotation.trim().to_string(),
            description,
        },
        None => Item {
            name: String::new(),
            annotation: header,
            description,
        },
    }
}

impl DocstringParser for Numpy {
    fn parse(&self, docstring: &str, context: &ParseContext<'_>) -> (Vec<Section>, Vec<String>) {
        let mut diagnostics = Diagnostics::new(context.object_path);
        let split = split_sections(docstring);

        let mut parameters = Vec::new();
        let mut attributes = Vec::new();
        let mut exceptions = Vec::new();
        let mut returns = Vec::new();
        let mut yields = Vec::new();
        let mut examples = Vec::new();
        let mut seen: Vec<SectionKind> = Vec::new();

        for (kind, body) in &split.sections {
            seen.push(*kind);
            match kind {
                SectionKind::Parameters => parameters.extend(
                    read_items(body)
                        .into_iter()
                        .map(|(header, description)| typed_item(header, description)),
                ),
                SectionKind::Attributes => attributes.extend(
                    read_items(body)
                        .into_iter()
                        .map(|(header, description)| typed_item(header, description)),
                ),
                SectionKind::Raises => exceptions.extend(read_items(body)),
                SectionKind::Returns => returns.extend(
                    read_items(body)
                        .into_iter()
                        .map(|(header, description)| returned_item(header, description)),
                ),
                SectionKind::Yields => yields.extend(
                    read_items(body)
                        .into_iter()
                        .map(|(header, description)| returned_item(header, description)),
                ),
                SectionKind::Examples => {
                    let text = dedent(&body.join("\n"));
                    let text = text.trim();
                    if !text.is_empty() {
                        examples.extend(split_examples(text, self.trim_doctest_flags));
                    }
                }
            }
        }
        let mentioned = |kind: SectionKind| seen.contains(&kind);

        let mut sections = Vec::new();
        let markdown = split.markdown.join("\n");
        let markdown = markdown.trim();
        if !markdown.is_empty() {
            sections.push(Section::Markdown(markdown.to_string()));
        }

        if !parameters.is_empty() {
            let parameters: Vec<Parameter> = parameters
                .into_iter()
                .map(|item| {
                    if item.description.is_empty() {
                        diagnostics.error(format_args!("No description for parameter '{}'", item.name));
                    }
                    merge_with_signature(
                        &item.name,
                        &item.annotation,
                        item.description,
                        context,
                        &mut diagnostics,
                        true,
                    )
                })
                .collect();
            sections.push(Section::Parameters(parameters));
        } else if mentioned(SectionKind::Parameters) {
            diagnostics.error("Empty parameter section");
        }

        if !exceptions.is_empty() {
            let exceptions = exceptions
                .into_iter()
                .map(|(annotation, description)| {
                    if description.is_empty() {
                        diagnostics.error(format_args!("No description for exception '{annotation}'"));
                    }
                    AnnotatedObject::new(annotation, description)
                })
                .collect();
            sections.push(Section::Exceptions(exceptions));
        } else if mentioned(SectionKind::Raises) {
            diagnostics.error("Empty exceptions section");
        }

        if !examples.is_empty() {
            sections.push(Section::Examples(examples));
        } else if mentioned(SectionKind::Examples) {
            diagnostics.error("Empty examples section");
        }

        if !attributes.is_empty() {
            let attributes = attributes
                .into_iter()
                .map(|item| {
                    if item.description.is_empty() {
                        diagnostics.error(format_args!("No description for attribute '{}'", item.name));
                    }
                    let annotation = if item.annotation.is_empty() {
                        context.attributes.get(&item.name).cloned().unwrap_or_default()
                    } else {
                        item.annotation
                    };
                    AttributeItem {
                        name: item.name,
                        annotation,
                        description: item.description,
                    }
                })
                .collect();
            sections.push(Section::Attributes(attributes));
        } else if mentioned(SectionKind::Attributes) {
            diagnostics.error("Empty attributes section");
        }

        if let Some(item) = returns.into_iter().next() {
            sections.extend(returned(item, context, &mut diagnostics, "return").map(Section::Return));
        }
        if let Some(item) = yields.into_iter().next() {
            sections.extend(returned(item, context, &mut diagnostics, "yield").map(Section::Yield));
        }

        (sections, diagnostics.into_messages())
    }
}

/// Signature annotation first, then the declared type, then the documented one.
fn returned(
    item: Item,
    context: &ParseContext<'_>,
    diagnostics: &mut Diagnostics<'_>,
    what: &str,
) -> Option<AnnotatedObject> {
    if item.description.is_empty() {
        diagnostics.error(format_args!("Empty {what} description"));
    }
    let annotation = context
        .return_annotation()
        .or_else(|| context.annotation())
        .unwrap_or(item.annotation.as_str())
        .to_string();
    if annotation.is_empty() {
        diagnostics.error(format_args!("No {what} type annotation"));
    }
    (!annotation.is_empty() || !item.description.is_empty())
        .then(|| AnnotatedObject::new(annotation, item.description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_underlined_sections_stay_in_markdown() {
        let split = split_sections("Summary.\n\nNotes\n-----\nA note.\n\nParameters\n----------\nx : int\n");
        assert_eq!(split.markdown, vec!["Summary.", "", "Notes", "-----", "A note.", ""]);
        assert_eq!(split.sections.len(), 1);
        assert_eq!(split.sections[0].0, SectionKind::Parameters);
    }

    #[test]
    fn items_collect_indented_descriptions() {
        let body = ["x : int, optional", "    First line.", "    Second line.", "y", "    Other."];
        let items: Vec<Item> = read_items(&body)
            .into_iter()
            .map(|(header, description)| typed_item(header, description))
            .collect();
        assert_eq!(
            items,
            vec![
                Item {
                    name: "x".into(),
                    annotation: "int".into(),
                    description: "First line.\nSecond line.".into(),
                },
                Item {
                    name: "y".into(),
                    annotation: String::new(),
                    description: "Other.".into(),
                },
            ]
        );
    }

    #[test]
    fn return_headers_may_be_named() {
        let item = returned_item("total : float".into(), String::new());
        assert_eq!(item.name, "total");
        assert_eq!(item.annotation, "float");
        let item = returned_item("float".into(), String::new());
        assert_eq!(item.annotation, "float");
    }
}
