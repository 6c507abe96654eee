//! reStructuredText field lists.
//!
//! ```text
//! Summary.
//!
//! :param int x: The value.
//! :type y: str or None
//! :param y: Optional label.
//! :raises ValueError: When negative.
//! :returns: The result.
//! :rtype: float
//! ```
//!
//! Types written in the docstring win over signature annotations.

use scribe_core::{AnnotatedObject, AttributeItem, Parameter, Section};

use super::blocks::is_empty_line;
use super::{Diagnostics, DocstringParser, ParseContext};

const PARAM_NAMES: &[&str] = &["param", "parameter", "arg", "argument", "key", "keyword"];
const PARAM_TYPE_NAMES: &[&str] = &["type"];
const ATTRIBUTE_NAMES: &[&str] = &["var", "ivar", "cvar"];
const ATTRIBUTE_TYPE_NAMES: &[&str] = &["vartype"];
const EXCEPTION_NAMES: &[&str] = &["raises", "raise", "except", "exception"];
const RETURN_NAMES: &[&str] = &["returns", "return"];
const RETURN_TYPE_NAMES: &[&str] = &["rtype"];

#[derive(Debug, Clone, Copy, Default)]
pub struct RestructuredText;

/// `:directive parts: value`, continuation lines included.
#[derive(Debug)]
struct Field {
    line: String,
    parts: Vec<String>,
    value: String,
}

#[derive(Debug)]
struct DocumentedParameter {
    name: String,
    inline_type: Option<String>,
    description: String,
}

/// Everything collected in one pass; types are resolved once all fields are known.
#[derive(Debug, Default)]
struct Collected {
    description: Vec<String>,
    parameters: Vec<DocumentedParameter>,
    parameter_types: Vec<(String, String)>,
    attributes: Vec<(String, String)>,
    attribute_types: Vec<(String, String)>,
    exceptions: Vec<AnnotatedObject>,
    returns: Option<String>,
    return_type: Option<String>,
}

impl DocstringParser for RestructuredText {
    fn parse(&self, docstring: &str, context: &ParseContext<'_>) -> (Vec<Section>, Vec<String>) {
        let mut diagnostics = Diagnostics::new(context.object_path);
        let lines: Vec<&str> = docstring.split('\n').collect();
        let mut collected = Collected::default();

        let mut index = 0;
        while index < lines.len() {
            let line = lines[index];
            if !line.starts_with(':') {
                collected.description.push(line.to_string());
                index += 1;
                continue;
            }
            let (text, last) = consolidate_continuation_lines(&lines, index);
            index = last + 1;
            let Some(field) = parse_field(&text) else {
                diagnostics.error(format_args!("Failed to get ':directive: value' pair from '{text}'"));
                continue;
            };
            collect_field(field, &mut collected, &mut diagnostics);
        }

        let sections = into_sections(collected, context, &mut diagnostics);
        (sections, diagnostics.into_messages())
    }
}

/// Join a field with its following lines, up to the next field or blank line.
fn consolidate_continuation_lines(lines: &[&str], start: usize) -> (String, usize) {
    let mut block = vec![lines[start].trim_start()];
    let mut index = start + 1;
    while index < lines.len() && !lines[index].starts_with(':') && !is_empty_line(lines[index]) {
        block.push(lines[index].trim());
        index += 1;
    }
    (block.join(" ").trim_end().to_string(), index - 1)
}

fn parse_field(line: &str) -> Option<Field> {
    let rest = line.strip_prefix(':')?;
    let (directive, value) = rest.split_once(':')?;
    let parts = directive.split_whitespace().map(str::to_string).collect();
    let value = value.trim().to_string();
    Some(Field {
        line: line.to_string(),
        parts,
        value,
    })
}

fn collect_field(field: Field, collected: &mut Collected, diagnostics: &mut Diagnostics<'_>) {
    let Some(directive) = field.parts.first().map(String::as_str) else {
        diagnostics.error(format_args!("Failed to parse field directive from '{}'", field.line));
        return;
    };

    if PARAM_TYPE_NAMES.contains(&directive) {
        match field.parts.as_slice() {
            [_, name] => collected
                .parameter_types
                .push((name.clone(), consolidate_descriptive_type(&field.value))),
            _ => diagnostics.error(format_args!("Failed to get parameter name from '{}'", field.line)),
        }
    } else if PARAM_NAMES.contains(&directive) {
        let (name, inline_type) = match field.parts.as_slice() {
            [_, name] => (name.clone(), None),
            [_, inline_type, name] => (name.clone(), Some(inline_type.clone())),
            _ => {
                diagnostics.error(format_args!("Failed to parse field directive from '{}'", field.line));
                return;
            }
        };
        if collected.parameters.iter().any(|parameter| parameter.name == name) {
            diagnostics.error(format_args!("Duplicate parameter entry for '{name}'"));
            return;
        }
        collected.parameters.push(DocumentedParameter {
            name,
            inline_type,
            description: field.value,
        });
    } else if ATTRIBUTE_TYPE_NAMES.contains(&directive) {
        match field.parts.as_slice() {
            [_, name] => {
                if collected.attribute_types.iter().any(|(known, _)| known == name) {
                    diagnostics.error(format_args!("Duplicate attribute information for '{name}'"));
                    return;
                }
                collected
                    .attribute_types
                    .push((name.clone(), consolidate_descriptive_type(&field.value)));
            }
            _ => diagnostics.error(format_args!("Failed to get attribute name from '{}'", field.line)),
        }
    } else if ATTRIBUTE_NAMES.contains(&directive) {
        match field.parts.as_slice() {
            [_, name] => {
                if collected.attributes.iter().any(|(known, _)| known == name) {
                    diagnostics.error(format_args!("Duplicate attribute entry for '{name}'"));
                    return;
                }
                collected.attributes.push((name.clone(), field.value));
            }
            _ => diagnostics.error(format_args!("Failed to parse field directive from '{}'", field.line)),
        }
    } else if EXCEPTION_NAMES.contains(&directive) {
        match field.parts.as_slice() {
            [_, exception] => collected
                .exceptions
                .push(AnnotatedObject::new(exception.clone(), field.value)),
            _ => diagnostics.error(format_args!("Failed to parse exception directive from '{}'", field.line)),
        }
    } else if RETURN_NAMES.contains(&directive) {
        collected.returns = Some(field.value);
    } else if RETURN_TYPE_NAMES.contains(&directive) {
        if collected.return_type.is_some() {
            diagnostics.error("Duplicate type information for return");
            return;
        }
        collected.return_type = Some(consolidate_descriptive_type(&field.value));
    } else {
        collected.description.push(field.line);
    }
}

fn into_sections(
    collected: Collected,
    context: &ParseContext<'_>,
    diagnostics: &mut Diagnostics<'_>,
) -> Vec<Section> {
    let mut sections = Vec::new();

    let markdown = strip_blank_lines(&collected.description).join("\n");
    if !markdown.is_empty() {
        sections.push(Section::Markdown(markdown));
    }

    if !collected.parameters.is_empty() {
        let parameters = collected
            .parameters
            .into_iter()
            .map(|documented| {
                let typed = collected
                    .parameter_types
                    .iter()
                    .rev()
                    .find(|(name, _)| *name == documented.name)
                    .map(|(_, annotation)| annotation.clone());
                if documented.inline_type.is_some() && typed.is_some() {
                    diagnostics.error(format_args!(
                        "Duplicate parameter information for '{}'",
                        documented.name
                    ));
                }
                let found = context
                    .signature
                    .map(|signature| signature.parameter(documented.name.trim_start_matches('*')));
                if matches!(found, Some(None)) {
                    diagnostics.error(format_args!("No matching parameter for '{}'", documented.name));
                }
                let found = found.flatten();
                let annotation = documented
                    .inline_type
                    .or(typed)
                    .or_else(|| {
                        found
                            .map(|parameter| parameter.annotation_str().to_string())
                            .filter(|annotation| !annotation.is_empty())
                    })
                    .unwrap_or_default();
                Parameter {
                    name: documented.name,
                    annotation,
                    description: documented.description,
                    kind: found.map(|parameter| parameter.kind),
                    default: found.and_then(|parameter| parameter.default.clone()),
                }
            })
            .collect();
        sections.push(Section::Parameters(parameters));
    }

    if !collected.attributes.is_empty() {
        let attributes = collected
            .attributes
            .into_iter()
            .map(|(name, description)| {
                let annotation = collected
                    .attribute_types
                    .iter()
                    .find(|(known, _)| *known == name)
                    .map(|(_, annotation)| annotation.clone())
                    .or_else(|| context.attributes.get(&name).cloned())
                    .unwrap_or_default();
                AttributeItem {
                    name,
                    annotation,
                    description,
                }
            })
            .collect();
        sections.push(Section::Attributes(attributes));
    }

    if let Some(description) = collected.returns {
        let annotation = collected
            .return_type
            .or_else(|| context.return_annotation().map(str::to_string))
            .or_else(|| context.annotation().map(str::to_string))
            .unwrap_or_default();
        sections.push(Section::Return(AnnotatedObject::new(annotation, description)));
    }

    if !collected.exceptions.is_empty() {
        sections.push(Section::Exceptions(collected.exceptions));
    }

    sections
}

/// `x or None` becomes `Optional[x]`; longer alternatives become a `Union`.
fn consolidate_descriptive_type(descriptive_type: &str) -> String {
    let types: Vec<&str> = descriptive_type.split(" or ").map(str::trim).collect();
    match types.as_slice() {
        [single] => (*single).to_string(),
        ["None", other] | [other, "None"] => format!("Optional[{other}]"),
        _ => format!("Union[{}]", types.join(", ")),
    }
}

fn strip_blank_lines(lines: &[String]) -> &[String] {
    let Some(first) = lines.iter().position(|line| !is_empty_line(line)) else {
        return &[];
    };
    let last = lines.iter().rposition(|line| !is_empty_line(line)).unwrap_or(first);
    &lines[first..=last]
}
