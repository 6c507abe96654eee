//! Conversion from the ast-grep tree to the owned statement model.

use ast_grep_core::{Doc, Node};
use scribe_core::ParameterKind;

use super::literals::decode_string_literal;
use super::{
    ClassDef, FunctionDef, ImportAlias, ImportFrom, Param, Stmt, StmtKind, Target,
};

const PUNCTUATION: &[&str] = &["(", ")", "[", "]", ",", ":"];

/// 1-based line of the first `ERROR` or MISSING node, if any.
///
/// Tree-sitter recovers from some errors by inserting a zero-width MISSING
/// token instead of an `ERROR` node (`def broken(:` misses its `)`).
pub(super) fn first_error_line<D: Doc>(node: &Node<D>) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_pos().line() + 1);
    }
    node.children().find_map(|child| first_error_line(&child))
}

/// Convert the statements directly under a `module` or `block` node.
pub(super) fn convert_block<D: Doc>(node: &Node<D>) -> Vec<Stmt> {
    node.children()
        .filter_map(|child| convert_statement(&child))
        .collect()
}

fn convert_statement<D: Doc>(node: &Node<D>) -> Option<Stmt> {
    let kind = match node.kind().as_ref() {
        "comment" | ";" => return None,
        "expression_statement" => convert_expression_statement(node),
        "class_definition" => convert_class(node, Vec::new()).map_or(StmtKind::Other, StmtKind::ClassDef),
        "function_definition" => {
            convert_function(node, Vec::new()).map_or(StmtKind::Other, StmtKind::FunctionDef)
        }
        "decorated_definition" => convert_decorated(node),
        "if_statement" | "try_statement" | "with_statement" => StmtKind::Compound {
            bodies: compound_bodies(node),
        },
        "import_statement" => StmtKind::Import(
            node.children().filter_map(|child| import_alias(&child)).collect(),
        ),
        "import_from_statement" => StmtKind::ImportFrom(convert_import_from(node)),
        _ => StmtKind::Other,
    };
    let line_start = node.start_pos().line() + 1;
    let text = node.text();
    let line_end = line_start + text.trim_end().matches('\n').count();
    Some(Stmt {
        kind,
        line_start,
        line_end,
    })
}

fn convert_expression_statement<D: Doc>(node: &Node<D>) -> StmtKind {
    let Some(expression) = node.children().next() else {
        return StmtKind::Other;
    };
    match expression.kind().as_ref() {
        "assignment" => convert_assignment(&expression),
        "string" | "concatenated_string" => StmtKind::Expr {
            string: string_value(&expression),
        },
        _ => StmtKind::Expr { string: None },
    }
}

fn string_value<D: Doc>(node: &Node<D>) -> Option<String> {
    if node.kind().as_ref() == "concatenated_string" {
        return node
            .children()
            .filter(|child| child.kind().as_ref() == "string")
            .map(|child| decode_string_literal(&child.text()))
            .collect();
    }
    decode_string_literal(&node.text())
}

fn convert_assignment<D: Doc>(node: &Node<D>) -> StmtKind {
    let annotation = node.field("type").map(|ty| annotation_text(&ty));
    let mut targets = Vec::new();
    let mut current = node.clone();
    let value = loop {
        if let Some(left) = current.field("left") {
            collect_targets(&left, &mut targets);
        }
        match current.field("right") {
            Some(right) if right.kind().as_ref() == "assignment" => current = right,
            Some(right) => break Some(right.text().to_string()),
            None => break None,
        }
    };
    StmtKind::Assign {
        targets,
        annotation,
        value,
    }
}

fn collect_targets<D: Doc>(node: &Node<D>, targets: &mut Vec<Target>) {
    match node.kind().as_ref() {
        "identifier" => targets.push(Target::Name(node.text().to_string())),
        "attribute" => {
            let is_self = node
                .field("object")
                .is_some_and(|object| object.kind().as_ref() == "identifier" && object.text() == "self");
            match node.field("attribute") {
                Some(attribute) if is_self => {
                    targets.push(Target::SelfAttribute(attribute.text().to_string()));
                }
                _ => targets.push(Target::Other),
            }
        }
        "pattern_list" | "tuple_pattern" | "list_pattern" => {
            for child in node.children() {
                if !PUNCTUATION.contains(&child.kind().as_ref()) {
                    collect_targets(&child, targets);
                }
            }
        }
        _ => targets.push(Target::Other),
    }
}

/// Annotation source text; stringized annotations are unquoted.
fn annotation_text<D: Doc>(node: &Node<D>) -> String {
    let text = node.text();
    let text = text.trim();
    decode_string_literal(text).unwrap_or_else(|| text.to_string())
}

fn convert_decorated<D: Doc>(node: &Node<D>) -> StmtKind {
    let decorators: Vec<String> = node
        .children()
        .filter(|child| child.kind().as_ref() == "decorator")
        .map(|child| child.text().trim_start_matches('@').trim().to_string())
        .collect();
    let Some(definition) = node.field("definition") else {
        return StmtKind::Other;
    };
    match definition.kind().as_ref() {
        "class_definition" => {
            convert_class(&definition, decorators).map_or(StmtKind::Other, StmtKind::ClassDef)
        }
        "function_definition" => {
            convert_function(&definition, decorators).map_or(StmtKind::Other, StmtKind::FunctionDef)
        }
        _ => StmtKind::Other,
    }
}

fn convert_class<D: Doc>(node: &Node<D>, decorators: Vec<String>) -> Option<ClassDef> {
    let name = node.field("name")?.text().to_string();
    let bases = node
        .field("superclasses")
        .map(|arguments| {
            arguments
                .children()
                .filter(|child| {
                    let kind = child.kind();
                    !PUNCTUATION.contains(&kind.as_ref())
                        && kind.as_ref() != "keyword_argument"
                        && kind.as_ref() != "comment"
                })
                .map(|child| child.text().to_string())
                .collect()
        })
        .unwrap_or_default();
    let body = node
        .field("body")
        .map(|body| convert_block(&body))
        .unwrap_or_default();
    Some(ClassDef {
        name,
        bases,
        decorators,
        body,
    })
}

fn convert_function<D: Doc>(node: &Node<D>, decorators: Vec<String>) -> Option<FunctionDef> {
    let name = node.field("name")?.text().to_string();
    let is_async = node.text().trim_start().starts_with("async");
    let parameters = node
        .field("parameters")
        .map(|parameters| convert_parameters(&parameters))
        .unwrap_or_default();
    let returns = node.field("return_type").map(|ty| annotation_text(&ty));
    let body = node
        .field("body")
        .map(|body| convert_block(&body))
        .unwrap_or_default();
    Some(FunctionDef {
        name,
        decorators,
        parameters,
        returns,
        is_async,
        body,
    })
}

fn convert_parameters<D: Doc>(node: &Node<D>) -> Vec<Param> {
    let mut params: Vec<Param> = Vec::new();
    let mut keyword_only = false;
    let plain_kind = |keyword_only: bool| {
        if keyword_only {
            ParameterKind::KeywordOnly
        } else {
            ParameterKind::PositionalOrKeyword
        }
    };

    for child in node.children() {
        let kind = child.kind();
        match kind.as_ref() {
            "positional_separator" => {
                for param in &mut params {
                    if param.kind == ParameterKind::PositionalOrKeyword {
                        param.kind = ParameterKind::PositionalOnly;
                    }
                }
            }
            "keyword_separator" => keyword_only = true,
            "identifier" => params.push(Param {
                name: child.text().to_string(),
                kind: plain_kind(keyword_only),
                annotation: None,
                default: None,
            }),
            "list_splat_pattern" | "dictionary_splat_pattern" => {
                let param = splat_param(&child, None);
                keyword_only |= param.kind == ParameterKind::VarPositional;
                params.push(param);
            }
            "typed_parameter" => {
                let annotation = child.field("type").map(|ty| annotation_text(&ty));
                let Some(inner) = child.children().find(|inner| {
                    matches!(
                        inner.kind().as_ref(),
                        "identifier" | "list_splat_pattern" | "dictionary_splat_pattern"
                    )
                }) else {
                    continue;
                };
                if inner.kind().as_ref() == "identifier" {
                    params.push(Param {
                        name: inner.text().to_string(),
                        kind: plain_kind(keyword_only),
                        annotation,
                        default: None,
                    });
                } else {
                    let param = splat_param(&inner, annotation);
                    keyword_only |= param.kind == ParameterKind::VarPositional;
                    params.push(param);
                }
            }
            "default_parameter" | "typed_default_parameter" => {
                let Some(name) = child.field("name") else {
                    continue;
                };
                params.push(Param {
                    name: name.text().to_string(),
                    kind: plain_kind(keyword_only),
                    annotation: child.field("type").map(|ty| annotation_text(&ty)),
                    default: child.field("value").map(|value| value.text().to_string()),
                });
            }
            _ => {}
        }
    }
    params
}

fn splat_param<D: Doc>(node: &Node<D>, annotation: Option<String>) -> Param {
    let kind = if node.kind().as_ref() == "dictionary_splat_pattern" {
        ParameterKind::VarKeyword
    } else {
        ParameterKind::VarPositional
    };
    Param {
        name: node.text().trim_start_matches('*').trim().to_string(),
        kind,
        annotation,
        default: None,
    }
}

/// Every nested body of an `if` / `try` / `with`, clauses included.
fn compound_bodies<D: Doc>(node: &Node<D>) -> Vec<Vec<Stmt>> {
    let mut bodies = Vec::new();
    for child in node.children() {
        let kind = child.kind();
        if kind.as_ref() == "block" {
            bodies.push(convert_block(&child));
        } else if kind.as_ref().ends_with("_clause") {
            bodies.extend(
                child
                    .children()
                    .filter(|grandchild| grandchild.kind().as_ref() == "block")
                    .map(|block| convert_block(&block)),
            );
        }
    }
    bodies
}

fn import_alias<D: Doc>(node: &Node<D>) -> Option<ImportAlias> {
    match node.kind().as_ref() {
        "dotted_name" => Some(ImportAlias {
            name: node.text().to_string(),
            asname: None,
        }),
        "aliased_import" => Some(ImportAlias {
            name: node.field("name")?.text().to_string(),
            asname: node.field("alias").map(|alias| alias.text().to_string()),
        }),
        _ => None,
    }
}

fn convert_import_from<D: Doc>(node: &Node<D>) -> ImportFrom {
    let mut import = ImportFrom {
        module: String::new(),
        level: 0,
        names: Vec::new(),
        star: false,
    };
    let mut seen_import = false;
    for child in node.children() {
        let kind = child.kind();
        match kind.as_ref() {
            "import" => seen_import = true,
            "wildcard_import" => import.star = true,
            "relative_import" if !seen_import => {
                let text = child.text();
                import.level = text.chars().take_while(|&c| c == '.').count();
                import.module = text[import.level..].trim().to_string();
            }
            "dotted_name" if !seen_import => import.module = child.text().to_string(),
            _ if seen_import => import.names.extend(import_alias(&child)),
            _ => {}
        }
    }
    import
}
