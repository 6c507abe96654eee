use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

#[test]
fn module_docstring_is_first_string() {
    let module = parse("\"\"\"Module doc.\"\"\"\n\nX = 1\n");
    assert_eq!(module.docstring(), Some("Module doc."));
}

#[test]
fn comment_before_docstring_is_skipped() {
    let module = parse("# header\n'''Doc.'''\n");
    assert_eq!(module.docstring(), Some("Doc."));
}

#[test]
fn annotated_assignment_keeps_annotation_and_value() {
    let module = parse("X: int = 0\n\"\"\"doc\"\"\"\n");
    assert_eq!(
        module.body[0].kind,
        StmtKind::Assign {
            targets: vec![Target::Name("X".into())],
            annotation: Some("int".into()),
            value: Some("0".into()),
        }
    );
    assert_eq!(
        module.body[1].kind,
        StmtKind::Expr {
            string: Some("doc".into())
        }
    );
}

#[test]
fn chained_and_tuple_targets_are_flattened() {
    let module = parse("a = b = 1\nc, (d, e) = 1, (2, 3)\n");
    let StmtKind::Assign { targets, .. } = &module.body[0].kind else {
        panic!("expected assignment");
    };
    assert_eq!(targets, &vec![Target::Name("a".into()), Target::Name("b".into())]);

    let StmtKind::Assign { targets, .. } = &module.body[1].kind else {
        panic!("expected assignment");
    };
    let names: Vec<_> = targets
        .iter()
        .filter_map(|t| match t {
            Target::Name(n) => Some(n.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["c", "d", "e"]);
}

#[test]
fn only_direct_self_attributes_are_recognised() {
    let module = parse(
        "def __init__(self):\n    self.a = 1\n    self.d.other = 2\n    other.b = 3\n    self[0] = 4\n",
    );
    let init = function(&module.body, "__init__");
    let targets: Vec<&Target> = init
        .body
        .iter()
        .filter_map(|stmt| match &stmt.kind {
            StmtKind::Assign { targets, .. } => targets.first(),
            _ => None,
        })
        .collect();
    assert_eq!(
        targets,
        vec![
            &Target::SelfAttribute("a".into()),
            &Target::Other,
            &Target::Other,
            &Target::Other,
        ]
    );
}

#[test]
fn compound_statements_expose_every_body() {
    let module = parse(
        "try:\n    A = 1\nexcept ImportError:\n    A = 2\nelse:\n    B = 3\nfinally:\n    C = 4\n\nif x:\n    D = 1\nelif y:\n    D = 2\nelse:\n    D = 3\n",
    );
    let StmtKind::Compound { bodies } = &module.body[0].kind else {
        panic!("expected try");
    };
    assert_eq!(bodies.len(), 4);
    let StmtKind::Compound { bodies } = &module.body[1].kind else {
        panic!("expected if");
    };
    assert_eq!(bodies.len(), 3);
}

#[test]
fn line_spans_are_one_based() {
    let module = parse("\n\ndef f():\n    pass\n\nX = 1\n");
    assert_eq!((module.body[0].line_start, module.body[0].line_end), (3, 4));
    assert_eq!((module.body[1].line_start, module.body[1].line_end), (6, 6));
    assert_eq!(module.lines(3, 4), "def f():\n    pass\n");
}

#[test]
fn syntax_errors_are_reported() {
    let err = PyModule::parse("def broken(:\n    pass\n").unwrap_err();
    assert!(matches!(err, crate::error::ParserError::Syntax { .. }), "{err}");
}

#[rstest]
#[case::missing_paren("def broken(:\n    pass\n", 1)]
#[case::unclosed_call("x = 1\ny = f(\n", 2)]
#[case::error_node("x = (\n", 1)]
fn recovered_parses_are_still_syntax_errors(#[case] source: &str, #[case] expected_line: usize) {
    let err = PyModule::parse(source).unwrap_err();
    let crate::error::ParserError::Syntax { line, .. } = err else {
        panic!("expected a syntax error, got {err}");
    };
    assert!(line >= expected_line, "{line}");
}
