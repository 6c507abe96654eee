use std::path::PathBuf;

use pretty_assertions::assert_eq;
use scribe_core::{
    DocumentedObject, LoaderOptions, Members, ObjectCategory, ObjectId, ObjectKind, ObjectTree, Section,
};
use scribe_loader::{LoadError, Loader, ModuleFinder};

fn loader(options: LoaderOptions) -> Loader {
    let fixtures = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    Loader::new(ModuleFinder::new([fixtures]).unwrap(), options).unwrap()
}

fn document(path: &str) -> (ObjectTree, Vec<String>) {
    let mut loader = loader(LoaderOptions::default());
    let tree = loader.get_object_documentation(path).unwrap();
    (tree, loader.take_errors())
}

fn root(tree: &ObjectTree) -> &DocumentedObject {
    tree.get(tree.root().unwrap())
}

fn names(tree: &ObjectTree, ids: &[ObjectId]) -> Vec<String> {
    ids.iter().map(|&id| tree.get(id).name.clone()).collect()
}

fn child<'t>(tree: &'t ObjectTree, parent: &DocumentedObject, name: &str) -> &'t DocumentedObject {
    parent
        .children()
        .iter()
        .map(|&id| tree.get(id))
        .find(|object| object.name == name)
        .unwrap_or_else(|| panic!("no child named {name}"))
}

#[test]
fn function_is_documented_end_to_end() {
    let (tree, errors) = document("shapes.adds.adds");
    assert!(errors.is_empty(), "{errors:?}");

    let adds = root(&tree);
    assert_eq!(adds.path, "shapes.adds.adds");
    assert_eq!(adds.category(), ObjectCategory::Function);
    assert_eq!(adds.relative_file_path, "shapes/adds.py");
    assert!(adds.file_path.ends_with("shapes/adds.py"));
    assert_eq!(adds.source.as_ref().unwrap().line_start, 7);

    let signature = adds.signature().unwrap();
    assert_eq!(signature.return_annotation(), Some("int"));
    assert_eq!(signature.parameter("b").unwrap().default.as_deref(), Some("1"));

    assert_eq!(adds.docstring_sections.len(), 3);
    assert!(adds.docstring_errors.is_empty(), "{:?}", adds.docstring_errors);
    // The blank line closing the summary stays in the Markdown block.
    assert_eq!(adds.docstring_sections[0], Section::Markdown("Add two numbers.\n".into()));
    let Section::Parameters(parameters) = &adds.docstring_sections[1] else {
        panic!("expected parameters, got {:?}", adds.docstring_sections[1]);
    };
    let annotations: Vec<&str> = parameters.iter().map(|parameter| parameter.annotation.as_str()).collect();
    assert_eq!(annotations, vec!["int", "int"]);
    let Section::Return(returned) = &adds.docstring_sections[2] else {
        panic!("expected a return section");
    };
    assert_eq!(returned.annotation, "int");
    assert_eq!(returned.description, "The sum.");
}

#[test]
fn docstring_diagnostics_stay_on_the_object() {
    let (tree, _) = document("shapes.adds.scale");
    let scale = root(&tree);
    assert!(
        scale
            .docstring_errors
            .contains(&"shapes.adds.scale: No matching parameter for 'y'".to_string()),
        "{:?}",
        scale.docstring_errors
    );
}

#[test]
fn async_functions_are_tagged() {
    let (tree, _) = document("shapes.adds.fetch");
    assert_eq!(root(&tree).properties, vec!["async"]);
}

#[test]
fn module_members_and_attributes() {
    let (tree, errors) = document("shapes.adds");
    assert!(errors.is_empty(), "{errors:?}");
    let module = root(&tree);
    assert_eq!(module.docstring, "Arithmetic helpers.");
    assert_eq!(
        names(&tree, module.children_of(ObjectCategory::Function)),
        vec!["adds", "fetch", "scale"]
    );
    assert_eq!(names(&tree, module.children_of(ObjectCategory::Attribute)), vec!["LIMIT"]);

    let limit = child(&tree, module, "LIMIT");
    assert_eq!(limit.type_annotation(), Some("int"));
    assert_eq!(limit.docstring, "Upper bound.");
    assert_eq!(limit.docstring_sections, vec![Section::Markdown("Upper bound.".into())]);
}

#[test]
fn attribute_paths_document_the_attribute() {
    let (tree, _) = document("shapes.adds.LIMIT");
    let limit = root(&tree);
    assert_eq!(limit.kind, ObjectKind::Attribute { type_annotation: "int".into() });
    assert_eq!(limit.relative_file_path, "shapes/adds.py");
}

#[test]
fn members_false_documents_the_leaf_only() {
    let mut loader = loader(LoaderOptions {
        members: Some(Members::Enabled(false)),
        ..LoaderOptions::default()
    });
    let tree = loader.get_object_documentation("shapes.adds").unwrap();
    assert!(root(&tree).children().is_empty());
}

#[test]
fn explicit_member_names() {
    let mut loader = loader(LoaderOptions {
        members: Some(Members::Names(vec!["adds".into()])),
        ..LoaderOptions::default()
    });
    let tree = loader.get_object_documentation("shapes.adds").unwrap();
    let module = root(&tree);
    assert_eq!(names(&tree, module.children()), vec!["adds"]);
}

#[test]
fn re_exported_class_is_documented_where_defined() {
    let (tree, errors) = document("shapes.Shape");
    assert!(errors.is_empty(), "{errors:?}");
    let shape = root(&tree);
    assert_eq!(shape.path, "shapes.figures.Shape");
    assert_eq!(shape.relative_file_path, "shapes/figures.py");
    assert_eq!(shape.docstring, "A shape.");
}

#[test]
fn class_members() {
    let (tree, _) = document("shapes.figures.Shape");
    let shape = root(&tree);

    assert_eq!(child(&tree, shape, "__init__").docstring, "");
    assert_eq!(child(&tree, shape, "__eq__").docstring, "");
    assert_eq!(child(&tree, shape, "__repr__").docstring, "Readable form.");
    assert_eq!(child(&tree, shape, "unit").properties, vec!["classmethod"]);
    assert_eq!(child(&tree, shape, "count").properties, vec!["staticmethod"]);

    let area = child(&tree, shape, "area");
    assert_eq!(area.properties, vec!["property", "readonly"]);
    assert_eq!(area.type_annotation(), Some("float"));
    assert_eq!(area.docstring, "Surface.");
    assert_eq!(child(&tree, shape, "label").properties, vec!["property", "writable"]);

    let sides = child(&tree, shape, "sides");
    assert_eq!(sides.docstring, "Number of sides.");
    assert_eq!(sides.type_annotation(), Some("int"));
    assert_eq!(child(&tree, shape, "name").docstring, "Display name.");
}

#[test]
fn dataclasses_and_pydantic_models_are_tagged() {
    let (tree, _) = document("shapes.figures");
    let module = root(&tree);
    assert_eq!(
        names(&tree, module.children_of(ObjectCategory::Class)),
        vec!["Point", "Settings", "Shape"]
    );

    let point = child(&tree, module, "Point");
    assert_eq!(point.properties, vec!["dataclass"]);
    assert_eq!(names(&tree, point.children_of(ObjectCategory::Attribute)), vec!["x", "y"]);
    assert_eq!(child(&tree, module, "Settings").properties, vec!["pydantic-model"]);
}

#[test]
fn filters_hide_matching_members() {
    let mut loader = loader(LoaderOptions {
        filters: vec!["!^_".into()],
        ..LoaderOptions::default()
    });
    let tree = loader.get_object_documentation("shapes.figures.Shape").unwrap();
    let shape = root(&tree);
    assert!(
        names(&tree, shape.children())
            .iter()
            .all(|name| !name.starts_with('_'))
    );
    assert!(names(&tree, shape.children()).contains(&"name".to_string()));
}

#[test]
fn invalid_filter_is_rejected() {
    let fixtures = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let options = LoaderOptions {
        filters: vec!["(".into()],
        ..LoaderOptions::default()
    };
    let result = Loader::new(ModuleFinder::new([fixtures]).unwrap(), options);
    assert!(matches!(result, Err(LoadError::InvalidFilter { .. })));
}

#[test]
fn packages_list_submodules_but_not_re_exports() {
    let (tree, _) = document("shapes");
    let package = root(&tree);
    assert_eq!(package.relative_file_path, "shapes/__init__.py");
    assert_eq!(
        names(&tree, package.children_of(ObjectCategory::Module)),
        vec!["adds", "figures"]
    );
    assert!(package.children_of(ObjectCategory::Class).is_empty());
    assert!(tree.lookup("shapes.figures.Shape.area").is_some());
}

#[test]
fn namespace_packages_have_no_source() {
    let mut loader = loader(LoaderOptions::default());
    let tree = loader.get_object_documentation("nspace").unwrap();
    let errors = loader.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Couldn't read source for 'nspace': "), "{errors:?}");
    assert_eq!(loader.take_errors().len(), 1);
    assert!(loader.errors().is_empty());

    let package = root(&tree);
    assert!(package.source.is_none());
    assert_eq!(package.relative_file_path, "");
    let tools = child(&tree, package, "tools");
    assert_eq!(tools.relative_file_path, "nspace/tools.py");
    assert_eq!(names(&tree, tools.children()), vec!["run"]);
}

#[test]
fn missing_attribute_is_an_error() {
    let mut loader = loader(LoaderOptions::default());
    let error = loader.get_object_documentation("shapes.missing").unwrap_err();
    assert!(matches!(error, LoadError::Attribute { .. }), "{error}");
}

#[test]
fn colon_paths_to_submodules_match_dotted_paths() {
    let (dotted, _) = document("shapes.adds");
    let (colon, errors) = document("shapes:adds");
    assert!(errors.is_empty(), "{errors:?}");

    let module = root(&colon);
    assert_eq!(module.path, "shapes.adds");
    assert_eq!(names(&colon, module.children()), names(&dotted, root(&dotted).children()));
    let limit = colon.lookup("shapes.adds.LIMIT").map(|id| colon.get(id)).unwrap();
    assert_eq!(limit.docstring, "Upper bound.");
}
