//! Line-oriented building blocks shared by the indentation-based dialects.

use std::sync::LazyLock;

use regex::Regex;
use scribe_core::Section;

use super::Diagnostics;

static ADMONITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<indent>\s*)(?P<type>[\w-]+):(?:\s+(?P<title>.+))?$")
        .expect("admonition pattern is valid")
});

pub(super) fn is_empty_line(line: &str) -> bool {
    line.trim().is_empty()
}

/// Number of leading whitespace characters.
pub(super) fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// `line` without its first `count` characters.
pub(super) fn skip_chars(line: &str, count: usize) -> &str {
    line.char_indices()
        .nth(count)
        .map_or("", |(index, _)| &line[index..])
}

/// Scan a docstring for titled sections.
///
/// Plain lines accumulate into Markdown sections. A line whose lowercased,
/// trimmed text is in `vocabulary` flushes the buffer and hands the following
/// lines to `read_section`, which returns the parsed section (if any) and the
/// index of the last line it consumed. Fenced code blocks are copied verbatim.
pub(super) fn scan_sections<K: Copy>(
    docstring: &str,
    vocabulary: &[(&str, K)],
    replace_admonitions: bool,
    mut read_section: impl FnMut(K, &[String], usize) -> (Option<Section>, usize),
) -> Vec<Section> {
    let mut lines: Vec<String> = docstring.split('\n').map(str::to_string).collect();
    let mut sections = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut in_code_block = false;

    let mut index = 0;
    while index < lines.len() {
        let title = lines[index].trim().to_lowercase();

        if in_code_block {
            if lines[index].trim_start().starts_with("```") {
                in_code_block = false;
            }
            current.push(lines[index].clone());
        } else if let Some(&(_, kind)) = vocabulary.iter().find(|(name, _)| *name == title) {
            flush_markdown(&mut sections, &mut current);
            let (section, last) = read_section(kind, &lines, index + 1);
            sections.extend(section);
            index = last;
        } else if lines[index].trim_start().starts_with("```") {
            in_code_block = true;
            current.push(lines[index].clone());
        } else {
            if replace_admonitions && index + 1 < lines.len() {
                if let Some(rewritten) = rewrite_admonition(&lines[index], &lines[index + 1]) {
                    lines[index] = rewritten;
                }
            }
            current.push(lines[index].clone());
        }
        index += 1;
    }

    if !current.is_empty() {
        sections.push(Section::Markdown(current.join("\n")));
    }
    sections
}

fn flush_markdown(sections: &mut Vec<Section>, current: &mut Vec<String>) {
    if current.iter().any(|line| !line.is_empty()) {
        sections.push(Section::Markdown(current.join("\n")));
    }
    current.clear();
}

/// `Note: title` followed by a deeper-indented line becomes `!!! note "title"`.
fn rewrite_admonition(line: &str, next: &str) -> Option<String> {
    let captures = ADMONITION.captures(line)?;
    let indent = captures.name("indent").map_or("", |m| m.as_str());
    if !next.starts_with(&format!("{indent}    ")) {
        return None;
    }
    let kind = captures.name("type").map_or("", |m| m.as_str()).to_lowercase();
    let mut rewritten = format!("{indent}!!! {kind}");
    if let Some(title) = captures.name("title") {
        rewritten.push_str(&format!(" \"{}\"", title.as_str()));
    }
    Some(rewritten)
}

/// Read an indented block as a list of items.
///
/// The first non-blank line fixes the reference indentation. Lines at that
/// indentation start new items, lines at twice that indentation continue the
/// current item, and anything in between continues it with a diagnostic. A
/// shallower line ends the block. Returns the items and the index of the last
/// line consumed.
pub(super) fn read_block_items(
    lines: &[String],
    start: usize,
    diagnostics: &mut Diagnostics<'_>,
) -> (Vec<String>, usize) {
    if start >= lines.len() {
        return (Vec::new(), start);
    }
    let mut index = start;
    while index < lines.len() && is_empty_line(&lines[index]) {
        index += 1;
    }
    if index >= lines.len() {
        return (Vec::new(), lines.len() - 1);
    }

    let indent = indentation(&lines[index]);
    if indent == 0 {
        return (Vec::new(), index - 1);
    }
    let continuation = " ".repeat(indent * 2);
    let deeper = " ".repeat(indent + 1);
    let same = " ".repeat(indent);

    let mut items = Vec::new();
    let mut current = vec![skip_chars(&lines[index], indent).to_string()];
    index += 1;

    while index < lines.len() {
        let line = &lines[index];
        if is_empty_line(line) {
            current.push(String::new());
        } else if line.starts_with(&continuation) {
            current.push(skip_chars(line, indent * 2).to_string());
        } else if line.starts_with(&deeper) {
            let found = indentation(line);
            current.push(skip_chars(line, found).to_string());
            diagnostics.error(format!(
                "Confusing indentation for continuation line {} in docstring, \
                 should be {indent} * 2 = {} spaces, not {found}",
                index + 1,
                indent * 2
            ));
        } else if line.starts_with(&same) {
            items.push(join_item(&current));
            current = vec![skip_chars(line, indent).to_string()];
        } else {
            break;
        }
        index += 1;
    }
    items.push(join_item(&current));

    (items, index - 1)
}

/// Continuation lines join with a space; blank lines are kept as paragraph breaks.
fn join_item(parts: &[String]) -> String {
    let mut text = String::new();
    let mut previous_blank = false;
    for (position, part) in parts.iter().enumerate() {
        let blank = part.trim().is_empty();
        if position > 0 {
            text.push(if blank || previous_blank { '\n' } else { ' ' });
        }
        if !blank {
            text.push_str(part);
        }
        previous_blank = blank;
    }
    text.trim_end_matches('\n').to_string()
}

/// Read an indented block as one text, dedented by its first line.
pub(super) fn read_block(lines: &[String], start: usize) -> (String, usize) {
    if start >= lines.len() {
        return (String::new(), start);
    }
    let mut index = start;
    while index < lines.len() && is_empty_line(&lines[index]) {
        index += 1;
    }
    if index >= lines.len() {
        return (String::new(), lines.len() - 1);
    }

    let indent = indentation(&lines[index]);
    if indent == 0 {
        return (String::new(), index - 1);
    }
    let prefix = " ".repeat(indent);

    let mut block = vec![lines[index].trim_start().to_string()];
    index += 1;
    while index < lines.len() && (lines[index].starts_with(&prefix) || is_empty_line(&lines[index])) {
        block.push(skip_chars(&lines[index], indent).to_string());
        index += 1;
    }

    (block.join("\n").trim_end_matches('\n').to_string(), index - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(text: &str) -> Vec<String> {
        text.split('\n').map(str::to_string).collect()
    }

    #[test]
    fn items_split_on_reference_indentation() {
        let lines = lines("Args:\n    x: First.\n        More about x.\n    y: Second.\nAfter.");
        let mut diagnostics = Diagnostics::new("obj");
        let (items, last) = read_block_items(&lines, 1, &mut diagnostics);
        assert_eq!(items, vec!["x: First. More about x.", "y: Second."]);
        assert_eq!(last, 3);
        assert!(diagnostics.into_messages().is_empty());
    }

    #[test]
    fn confusing_indentation_is_reported() {
        let lines = lines("Args:\n    x: First.\n      more.\n");
        let mut diagnostics = Diagnostics::new("obj");
        let (items, _) = read_block_items(&lines, 1, &mut diagnostics);
        assert_eq!(items, vec!["x: First. more."]);
        assert_eq!(
            diagnostics.into_messages(),
            vec![
                "obj: Confusing indentation for continuation line 3 in docstring, \
                 should be 4 * 2 = 8 spaces, not 6"
                    .to_string()
            ]
        );
    }

    #[test]
    fn blank_lines_stay_inside_items() {
        let lines = lines("Args:\n    x: First.\n\n        Second paragraph.\n");
        let mut diagnostics = Diagnostics::new("obj");
        let (items, _) = read_block_items(&lines, 1, &mut diagnostics);
        assert_eq!(items, vec!["x: First.\n\nSecond paragraph."]);
    }

    #[test]
    fn unindented_block_is_empty() {
        let lines = lines("Returns:\nNot indented.");
        let (text, last) = read_block(&lines, 1);
        assert_eq!(text, "");
        assert_eq!(last, 0);
    }

    #[test]
    fn block_is_dedented_by_first_line() {
        let lines = lines("Returns:\n    int: The value.\n      Indented.\n\nDone.");
        let (text, last) = read_block(&lines, 1);
        assert_eq!(text, "int: The value.\n  Indented.");
        assert_eq!(last, 3);
    }

    #[test]
    fn admonitions_need_an_indented_body() {
        assert_eq!(
            rewrite_admonition("Note: Be careful", "    body"),
            Some("!!! note \"Be careful\"".to_string())
        );
        assert_eq!(rewrite_admonition("  Warning:", "      body"), Some("  !!! warning".to_string()));
        assert_eq!(rewrite_admonition("Note: inline", "not indented"), None);
    }
}
