//! Docstring parsers.
//!
//! Every dialect implements [`DocstringParser`]: it turns a cleaned docstring
//! plus what is known about the documented object into typed [`Section`]s and
//! diagnostics. Diagnostics never abort parsing; they are prefixed with the
//! object path so they can be traced back.

use std::collections::BTreeMap;
use std::fmt::Display;

use scribe_core::{DocstringOptions, DocstringStyle, Parameter, Section, Signature};

mod blocks;
mod examples;
pub mod google;
pub mod markdown;
pub mod numpy;
pub mod restructured_text;

#[cfg(test)]
mod tests;

pub use google::Google;
pub use markdown::Markdown;
pub use numpy::Numpy;
pub use restructured_text::RestructuredText;

/// What the parser knows about the object owning the docstring.
#[derive(Debug, Clone, Default)]
pub struct ParseContext<'a> {
    pub object_path: &'a str,
    pub signature: Option<&'a Signature>,
    /// Declared type of an attribute or property.
    pub annotation: Option<&'a str>,
    /// Known attribute annotations, by attribute name.
    pub attributes: BTreeMap<String, String>,
}

impl<'a> ParseContext<'a> {
    #[must_use]
    pub fn new(object_path: &'a str) -> Self {
        Self {
            object_path,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_signature(mut self, signature: Option<&'a Signature>) -> Self {
        self.signature = signature;
        self
    }

    #[must_use]
    pub const fn with_annotation(mut self, annotation: Option<&'a str>) -> Self {
        self.annotation = annotation;
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: BTreeMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// The declared type, when present and non-empty.
    #[must_use]
    pub fn annotation(&self) -> Option<&'a str> {
        self.annotation.filter(|annotation| !annotation.is_empty())
    }

    /// The signature's return annotation, when present and non-empty.
    #[must_use]
    pub fn return_annotation(&self) -> Option<&'a str> {
        self.signature.and_then(Signature::return_annotation)
    }
}

/// A docstring dialect.
pub trait DocstringParser {
    /// Parse `docstring` into sections and diagnostics.
    ///
    /// Calls share no state: parsing the same input twice gives equal results.
    fn parse(&self, docstring: &str, context: &ParseContext<'_>) -> (Vec<Section>, Vec<String>);
}

/// Build the parser for a configured style.
#[must_use]
pub fn parser_for(style: DocstringStyle, options: &DocstringOptions) -> Box<dyn DocstringParser> {
    match style {
        DocstringStyle::Google => Box::new(Google::new(options.clone())),
        DocstringStyle::RestructuredText => Box::new(RestructuredText),
        DocstringStyle::Numpy => Box::new(Numpy::new(options.trim_doctest_flags)),
        DocstringStyle::Markdown => Box::new(Markdown::new(options.replace_admonitions)),
    }
}

/// Merge a documented parameter with its signature entry.
///
/// Signature annotations win over the documented type; kind and default only
/// come from the signature. `*`/`**` markers are ignored when matching.
pub(crate) fn merge_with_signature(
    name: &str,
    documented_type: &str,
    description: String,
    context: &ParseContext<'_>,
    diagnostics: &mut Diagnostics<'_>,
    require_match: bool,
) -> Parameter {
    let mut parameter = Parameter {
        name: name.to_string(),
        annotation: documented_type.to_string(),
        description,
        kind: None,
        default: None,
    };
    if let Some(signature) = context.signature {
        match signature.parameter(name.trim_start_matches('*')) {
            Some(found) => {
                if !found.annotation_str().is_empty() {
                    parameter.annotation = found.annotation_str().to_string();
                }
                parameter.kind = Some(found.kind);
                parameter.default.clone_from(&found.default);
            }
            None if require_match => {
                diagnostics.error(format_args!("No matching parameter for '{name}'"));
            }
            None => {}
        }
    }
    if parameter.annotation.is_empty() {
        diagnostics.error(format_args!("No type annotation for parameter '{name}'"));
    }
    parameter
}

/// Diagnostics of one `parse` call, prefixed with the object path.
#[derive(Debug)]
pub(crate) struct Diagnostics<'a> {
    prefix: &'a str,
    messages: Vec<String>,
}

impl<'a> Diagnostics<'a> {
    pub(crate) const fn new(prefix: &'a str) -> Self {
        Self {
            prefix,
            messages: Vec::new(),
        }
    }

    pub(crate) fn error(&mut self, message: impl Display) {
        self.messages.push(format!("{}: {message}", self.prefix));
    }

    pub(crate) fn into_messages(self) -> Vec<String> {
        self.messages
    }
}
