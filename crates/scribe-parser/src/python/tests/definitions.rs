use pretty_assertions::assert_eq;

use super::*;

#[test]
fn parameter_kinds_follow_separators() {
    let module = parse("def f(a, /, b: int, *args, c=1, **kwargs) -> str:\n    pass\n");
    let f = function(&module.body, "f");
    let kinds: Vec<(&str, ParameterKind)> =
        f.parameters.iter().map(|p| (p.name.as_str(), p.kind)).collect();
    assert_eq!(
        kinds,
        vec![
            ("a", ParameterKind::PositionalOnly),
            ("b", ParameterKind::PositionalOrKeyword),
            ("args", ParameterKind::VarPositional),
            ("c", ParameterKind::KeywordOnly),
            ("kwargs", ParameterKind::VarKeyword),
        ]
    );
    assert_eq!(f.parameters[1].annotation.as_deref(), Some("int"));
    assert_eq!(f.parameters[3].default.as_deref(), Some("1"));
    assert_eq!(f.returns.as_deref(), Some("str"));
}

#[test]
fn bare_star_makes_keyword_only() {
    let module = parse("def f(*, key: str = 'x'):\n    pass\n");
    let f = function(&module.body, "f");
    assert_eq!(f.parameters.len(), 1);
    assert_eq!(f.parameters[0].kind, ParameterKind::KeywordOnly);
    assert_eq!(f.parameters[0].default.as_deref(), Some("'x'"));
}

#[test]
fn stringized_annotations_are_unquoted() {
    let module = parse("def f(x: \"Node\") -> 'Node':\n    pass\n");
    let f = function(&module.body, "f");
    assert_eq!(f.parameters[0].annotation.as_deref(), Some("Node"));
    assert_eq!(f.returns.as_deref(), Some("Node"));
}

#[test]
fn decorators_and_async_are_captured() {
    let module = parse(
        "class C(Base, metaclass=Meta):\n    \"\"\"Doc.\"\"\"\n\n    @staticmethod\n    async def run():\n        pass\n\n    @name.setter\n    def name(self, value):\n        pass\n",
    );
    let class = class(&module, "C");
    assert_eq!(class.bases, vec!["Base".to_string()]);
    assert_eq!(class.docstring(), Some("Doc."));

    let run = function(&class.body, "run");
    assert!(run.is_async);
    assert!(run.has_decorator("staticmethod"));

    let setter = function(&class.body, "name");
    assert!(setter.has_decorator("setter"));
}

#[test]
fn decorated_definition_starts_at_decorator() {
    let module = parse("@dataclass\nclass Point:\n    x: int\n");
    assert_eq!(module.body[0].line_start, 1);
    assert_eq!(class(&module, "Point").decorators, vec!["dataclass".to_string()]);
}
