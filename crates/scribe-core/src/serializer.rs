//! Flatten an [`ObjectTree`] into the JSON shape consumed by renderers.

use serde_json::{Map, Value, json};

use crate::objects::{ObjectCategory, ObjectId, ObjectKind, ObjectTree};
use crate::responses::Response;

/// Serialize the subtree rooted at `id`.
#[must_use]
pub fn serialize_object(tree: &ObjectTree, id: ObjectId) -> Value {
    let object = tree.get(id);

    let children: Map<String, Value> = object
        .children()
        .iter()
        .map(|&child| (tree.get(child).path.clone(), serialize_object(tree, child)))
        .collect();
    let paths = |category: ObjectCategory| -> Vec<&str> {
        object
            .children_of(category)
            .iter()
            .map(|&child| tree.get(child).path.as_str())
            .collect()
    };
    let source = object
        .source
        .as_ref()
        .map_or_else(|| json!({}), |source| json!(source));

    let mut serialized = json!({
        "name": object.name,
        "path": object.path,
        "category": object.category(),
        "file_path": object.file_path,
        "relative_file_path": object.relative_file_path,
        "properties": object.all_properties(),
        "parent_path": object.parent_path(),
        "has_contents": tree.has_contents(id),
        "docstring": object.docstring,
        "docstring_sections": object.docstring_sections,
        "source": source,
        "children": children,
        "attributes": paths(ObjectCategory::Attribute),
        "methods": paths(ObjectCategory::Method),
        "functions": paths(ObjectCategory::Function),
        "modules": paths(ObjectCategory::Module),
        "classes": paths(ObjectCategory::Class),
    });

    if let Value::Object(map) = &mut serialized {
        match &object.kind {
            ObjectKind::Attribute { type_annotation } => {
                map.insert("type".into(), json!(type_annotation));
            }
            ObjectKind::Function { signature } | ObjectKind::Method { signature } => {
                let signature = signature
                    .as_ref()
                    .map_or_else(|| json!({}), |signature| json!(signature));
                map.insert("signature".into(), signature);
            }
            ObjectKind::Module | ObjectKind::Class => {}
        }
    }
    serialized
}

/// Gather the docstring diagnostics of every object below `id`.
pub fn collect_parsing_errors(tree: &ObjectTree, id: ObjectId, response: &mut Response) {
    for node in tree.post_order(id) {
        let object = tree.get(node);
        response.add_parsing_errors(&object.path, &object.docstring_errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{DocumentedObject, Source};
    use crate::sections::Section;
    use crate::signature::{ParameterKind, Signature, SignatureParameter};
    use pretty_assertions::assert_eq;

    fn sample_tree() -> (ObjectTree, ObjectId) {
        let mut tree = ObjectTree::new();
        let root = tree.insert(
            DocumentedObject::new("pkg", "pkg", "/src/pkg/__init__.py", ObjectKind::Module)
                .with_docstring("Package."),
        );
        tree.set_root(root);
        let mut function = DocumentedObject::new(
            "f",
            "pkg.f",
            "/src/pkg/__init__.py",
            ObjectKind::Function {
                signature: Some(Signature {
                    parameters: vec![
                        SignatureParameter::new("x", ParameterKind::PositionalOrKeyword)
                            .with_annotation("int"),
                    ],
                    return_annotation: Some("int".into()),
                }),
            },
        )
        .with_source(Some(Source {
            code: "def f(x: int) -> int:\n    return x\n".into(),
            line_start: 3,
        }));
        function.docstring_sections = vec![Section::Markdown("Adds.".into())];
        function.docstring_errors = vec!["pkg.f: something".into()];
        let function = tree.insert(function);
        let attribute = tree.insert(DocumentedObject::new(
            "_X",
            "pkg._X",
            "/src/pkg/__init__.py",
            ObjectKind::Attribute {
                type_annotation: "int".into(),
            },
        ));
        tree.add_child(root, function);
        tree.add_child(root, attribute);
        (tree, root)
    }

    #[test]
    fn serializes_nested_children_by_path() {
        let (tree, root) = sample_tree();
        let value = serialize_object(&tree, root);

        assert_eq!(value["category"], "module");
        assert_eq!(value["properties"], json!(["special"]));
        assert_eq!(value["source"], json!({}));
        assert_eq!(value["functions"], json!(["pkg.f"]));
        assert_eq!(value["attributes"], json!(["pkg._X"]));
        assert!(value.get("signature").is_none());

        let function = &value["children"]["pkg.f"];
        assert_eq!(function["parent_path"], "pkg");
        assert_eq!(function["source"], json!({"code": "def f(x: int) -> int:\n    return x\n", "line_start": 3}));
        assert_eq!(function["signature"]["return_annotation"], "int");
        assert_eq!(function["docstring_sections"], json!([{"type": "markdown", "value": "Adds."}]));
        assert_eq!(function["has_contents"], false);

        let attribute = &value["children"]["pkg._X"];
        assert_eq!(attribute["type"], "int");
        assert_eq!(attribute["properties"], json!(["private"]));
    }

    #[test]
    fn collects_diagnostics_recursively() {
        let (tree, root) = sample_tree();
        let mut response = Response::default();
        collect_parsing_errors(&tree, root, &mut response);
        assert_eq!(response.parsing_errors.len(), 1);
        assert_eq!(response.parsing_errors["pkg.f"], vec!["pkg.f: something".to_string()]);
    }
}
