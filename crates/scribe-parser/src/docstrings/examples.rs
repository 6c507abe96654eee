//! Splitting of examples blocks into prose and doctest sub-blocks.

use std::sync::LazyLock;

use regex::Regex;
use scribe_core::ExampleKind;

use super::blocks::is_empty_line;

static DOCTEST_FLAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\s*#\s*doctest:.+)$").expect("doctest flags pattern is valid"));

static DOCTEST_BLANKLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*<BLANKLINE>\s*$").expect("blankline pattern is valid"));

/// Split a dedented examples block.
///
/// A `>>>` line opens a doctest that runs until the next blank line; fenced
/// code stays in the prose around it.
pub(super) fn split_examples(text: &str, trim_doctest_flags: bool) -> Vec<(ExampleKind, String)> {
    let mut sub_sections = Vec::new();
    let mut in_example = false;
    let mut in_code_block = false;
    let mut prose: Vec<String> = Vec::new();
    let mut example: Vec<String> = Vec::new();

    for line in text.split('\n') {
        if is_empty_line(line) {
            if in_example {
                if !example.is_empty() {
                    sub_sections.push((ExampleKind::Examples, example.join("\n")));
                    example.clear();
                }
                in_example = false;
            } else {
                prose.push(line.to_string());
            }
        } else if in_example {
            example.push(if trim_doctest_flags {
                trim_example_line(line)
            } else {
                line.to_string()
            });
        } else if line.starts_with("```") {
            in_code_block = !in_code_block;
            prose.push(line.to_string());
        } else if in_code_block {
            prose.push(line.to_string());
        } else if line.starts_with(">>>") {
            if !prose.is_empty() {
                sub_sections.push((ExampleKind::Markdown, prose.join("\n")));
                prose.clear();
            }
            in_example = true;
            example.push(if trim_doctest_flags {
                DOCTEST_FLAGS.replace(line, "").into_owned()
            } else {
                line.to_string()
            });
        } else {
            prose.push(line.to_string());
        }
    }

    if !prose.is_empty() {
        sub_sections.push((ExampleKind::Markdown, prose.join("\n")));
    }
    if !example.is_empty() {
        sub_sections.push((ExampleKind::Examples, example.join("\n")));
    }
    sub_sections
}

fn trim_example_line(line: &str) -> String {
    let line = DOCTEST_FLAGS.replace(line, "");
    DOCTEST_BLANKLINE.replace(&line, "").into_owned()
}
