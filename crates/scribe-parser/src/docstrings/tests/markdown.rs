use pretty_assertions::assert_eq;

use super::*;

#[test]
fn everything_is_markdown() {
    let docstring = "Summary.\n\nArgs:\n    x: not a section.";
    let (sections, errors) = parse_with(&Markdown::new(false), docstring, None);
    assert_eq!(sections, vec![Section::Markdown(docstring.to_string())]);
    assert!(errors.is_empty());
}

#[test]
fn admonitions_with_titles() {
    let docstring = "Text.\n\nWarning: Heads up\n    Body.\n";
    let (sections, _) = parse_with(&Markdown::default(), docstring, None);
    assert_eq!(
        sections,
        vec![Section::Markdown("Text.\n\n!!! warning \"Heads up\"\n    Body.\n".to_string())]
    );
}
