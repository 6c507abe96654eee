//! The documented-object tree.
//!
//! Objects live in an arena ([`ObjectTree`]) and refer to each other by
//! [`ObjectId`]. A child is attached only when its parent path equals the
//! parent's path, which is also how statically-discovered attributes are
//! re-attached after the main traversal.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::properties::{NameRule, name_properties};
use crate::sections::Section;
use crate::signature::Signature;

/// Index of an object inside its [`ObjectTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

impl ObjectId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectCategory {
    Module,
    Class,
    Function,
    Method,
    Attribute,
}

impl ObjectCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Class => "class",
            Self::Function => "function",
            Self::Method => "method",
            Self::Attribute => "attribute",
        }
    }

    /// Name-shape rules checked for this category, in tag order.
    #[must_use]
    pub const fn name_rules(self) -> &'static [NameRule] {
        match self {
            Self::Module | Self::Method => &[NameRule::Special, NameRule::Private],
            Self::Class | Self::Function => &[NameRule::Private],
            Self::Attribute => &[NameRule::Special, NameRule::ClassPrivate, NameRule::Private],
        }
    }
}

impl std::fmt::Display for ObjectCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category-specific payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectKind {
    Module,
    Class,
    Function { signature: Option<Signature> },
    Method { signature: Option<Signature> },
    Attribute { type_annotation: String },
}

impl ObjectKind {
    #[must_use]
    pub const fn category(&self) -> ObjectCategory {
        match self {
            Self::Module => ObjectCategory::Module,
            Self::Class => ObjectCategory::Class,
            Self::Function { .. } => ObjectCategory::Function,
            Self::Method { .. } => ObjectCategory::Method,
            Self::Attribute { .. } => ObjectCategory::Attribute,
        }
    }
}

/// Source code of an object and the line it starts on (1-based).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub code: String,
    pub line_start: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentedObject {
    pub name: String,
    pub path: String,
    pub file_path: String,
    pub relative_file_path: String,
    pub docstring: String,
    pub kind: ObjectKind,
    /// Structural tags (`classmethod`, `property`, `readonly`, ...).
    pub properties: Vec<String>,
    pub source: Option<Source>,
    pub docstring_sections: Vec<Section>,
    pub docstring_errors: Vec<String>,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
    modules: Vec<ObjectId>,
    classes: Vec<ObjectId>,
    functions: Vec<ObjectId>,
    methods: Vec<ObjectId>,
    attributes: Vec<ObjectId>,
}

impl DocumentedObject {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        file_path: impl Into<String>,
        kind: ObjectKind,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            file_path: file_path.into(),
            relative_file_path: String::new(),
            docstring: String::new(),
            kind,
            properties: Vec::new(),
            source: None,
            docstring_sections: Vec::new(),
            docstring_errors: Vec::new(),
            parent: None,
            children: Vec::new(),
            modules: Vec::new(),
            classes: Vec::new(),
            functions: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_docstring(mut self, docstring: impl Into<String>) -> Self {
        self.docstring = docstring.into();
        self
    }

    #[must_use]
    pub fn with_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties.extend(properties.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: Option<Source>) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub const fn category(&self) -> ObjectCategory {
        self.kind.category()
    }

    /// The path with its last dotted segment stripped.
    #[must_use]
    pub fn parent_path(&self) -> &str {
        self.path
            .rsplit_once('.')
            .map_or(self.path.as_str(), |(parent, _)| parent)
    }

    #[must_use]
    pub const fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    /// Children of one category, in insertion order.
    #[must_use]
    pub fn children_of(&self, category: ObjectCategory) -> &[ObjectId] {
        match category {
            ObjectCategory::Module => &self.modules,
            ObjectCategory::Class => &self.classes,
            ObjectCategory::Function => &self.functions,
            ObjectCategory::Method => &self.methods,
            ObjectCategory::Attribute => &self.attributes,
        }
    }

    #[must_use]
    pub const fn signature(&self) -> Option<&Signature> {
        match &self.kind {
            ObjectKind::Function { signature } | ObjectKind::Method { signature } => {
                signature.as_ref()
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn type_annotation(&self) -> Option<&str> {
        match &self.kind {
            ObjectKind::Attribute { type_annotation } => Some(type_annotation),
            _ => None,
        }
    }

    /// Modules are judged by their file name so `__init__` packages read as special.
    #[must_use]
    pub fn name_to_check(&self) -> &str {
        if self.category() == ObjectCategory::Module {
            Path::new(&self.file_path)
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or(&self.name)
        } else {
            &self.name
        }
    }

    #[must_use]
    pub fn name_properties(&self) -> Vec<&'static str> {
        name_properties(self.category().name_rules(), self.name_to_check())
    }

    /// Structural and name-derived tags, sorted and deduplicated.
    #[must_use]
    pub fn all_properties(&self) -> Vec<String> {
        let mut all: Vec<String> = self
            .properties
            .iter()
            .cloned()
            .chain(self.name_properties().into_iter().map(str::to_string))
            .collect();
        all.sort();
        all.dedup();
        all
    }
}

/// Arena holding a documented-object tree.
#[derive(Debug, Default)]
pub struct ObjectTree {
    nodes: Vec<DocumentedObject>,
    root: Option<ObjectId>,
    path_map: HashMap<String, ObjectId>,
    contents: OnceCell<Vec<bool>>,
}

impl ObjectTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a detached object.
    pub fn insert(&mut self, object: DocumentedObject) -> ObjectId {
        let id = ObjectId(self.nodes.len());
        self.nodes.push(object);
        self.contents.take();
        id
    }

    /// Make `id` the root and register every object reachable from it by path.
    pub fn set_root(&mut self, id: ObjectId) {
        self.root = Some(id);
        self.register(id);
        self.contents.take();
    }

    #[must_use]
    pub const fn root(&self) -> Option<ObjectId> {
        self.root
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ObjectId) -> &DocumentedObject {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: ObjectId) -> &mut DocumentedObject {
        self.contents.take();
        &mut self.nodes[id.0]
    }

    /// Find a registered object by its path.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<ObjectId> {
        self.path_map.get(path).copied()
    }

    /// Attach `child` under `parent`.
    ///
    /// Returns `false` and leaves both untouched when the child's parent path
    /// is not the parent's path, or when the child is already attached.
    pub fn add_child(&mut self, parent: ObjectId, child: ObjectId) -> bool {
        if parent == child || self.nodes[child.0].parent.is_some() {
            return false;
        }
        if self.nodes[child.0].parent_path() != self.nodes[parent.0].path {
            return false;
        }
        let category = self.nodes[child.0].category();
        let node = &mut self.nodes[parent.0];
        node.children.push(child);
        match category {
            ObjectCategory::Module => node.modules.push(child),
            ObjectCategory::Class => node.classes.push(child),
            ObjectCategory::Function => node.functions.push(child),
            ObjectCategory::Method => node.methods.push(child),
            ObjectCategory::Attribute => node.attributes.push(child),
        }
        self.nodes[child.0].parent = Some(parent);
        if self.path_map.get(&self.nodes[parent.0].path) == Some(&parent) {
            self.register(child);
        }
        self.contents.take();
        true
    }

    /// Whether the object, or anything below it, carries documentation.
    ///
    /// An object without a parent always has contents.
    #[must_use]
    pub fn has_contents(&self, id: ObjectId) -> bool {
        self.contents.get_or_init(|| self.compute_contents())[id.0]
    }

    /// Ids of the subtree rooted at `id`, children before parents.
    #[must_use]
    pub fn post_order(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut out = Vec::new();
        self.collect_post_order(id, &mut out);
        out
    }

    fn collect_post_order(&self, id: ObjectId, out: &mut Vec<ObjectId>) {
        for &child in &self.nodes[id.0].children {
            self.collect_post_order(child, out);
        }
        out.push(id);
    }

    fn register(&mut self, id: ObjectId) {
        for node in self.post_order(id) {
            let path = self.nodes[node.0].path.clone();
            self.path_map.insert(path, node);
        }
    }

    fn compute_contents(&self) -> Vec<bool> {
        let mut memo: Vec<Option<bool>> = vec![None; self.nodes.len()];
        (0..self.nodes.len())
            .map(|index| self.contents_of(ObjectId(index), &mut memo))
            .collect()
    }

    fn contents_of(&self, id: ObjectId, memo: &mut [Option<bool>]) -> bool {
        if let Some(known) = memo[id.0] {
            return known;
        }
        let node = &self.nodes[id.0];
        let mut result = node.parent.is_none() || !node.docstring.is_empty();
        for &child in &node.children {
            // Every child is visited so its own flag is memoized.
            result |= self.contents_of(child, memo);
        }
        memo[id.0] = Some(result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn module(path: &str) -> DocumentedObject {
        let name = path.rsplit('.').next().unwrap_or(path);
        DocumentedObject::new(name, path, format!("/src/{name}.py"), ObjectKind::Module)
    }

    fn attribute(path: &str) -> DocumentedObject {
        let name = path.rsplit('.').next().unwrap_or(path);
        DocumentedObject::new(
            name,
            path,
            "/src/pkg.py",
            ObjectKind::Attribute {
                type_annotation: String::new(),
            },
        )
    }

    #[test]
    fn child_with_foreign_parent_path_is_rejected() {
        let mut tree = ObjectTree::new();
        let root = tree.insert(module("pkg"));
        let stray = tree.insert(attribute("other.X"));
        tree.set_root(root);

        assert!(!tree.add_child(root, stray));
        assert!(tree.get(root).children().is_empty());
        assert!(tree.get(stray).parent().is_none());
        assert!(tree.lookup("other.X").is_none());
    }

    #[test]
    fn child_lands_in_exactly_one_category_list() {
        let mut tree = ObjectTree::new();
        let root = tree.insert(module("pkg"));
        tree.set_root(root);
        let sub = tree.insert(module("pkg.sub"));
        let attr = tree.insert(attribute("pkg.X"));

        assert!(tree.add_child(root, sub));
        assert!(tree.add_child(root, attr));
        assert!(!tree.add_child(root, attr), "attaching twice is refused");

        let node = tree.get(root);
        assert_eq!(node.children(), &[sub, attr]);
        assert_eq!(node.children_of(ObjectCategory::Module), &[sub]);
        assert_eq!(node.children_of(ObjectCategory::Attribute), &[attr]);
        assert!(node.children_of(ObjectCategory::Class).is_empty());
        assert_eq!(tree.get(attr).parent(), Some(root));
        assert_eq!(tree.lookup("pkg.X"), Some(attr));
    }

    #[test]
    fn subtree_built_before_attachment_is_registered() {
        let mut tree = ObjectTree::new();
        let root = tree.insert(module("pkg"));
        tree.set_root(root);
        let sub = tree.insert(module("pkg.sub"));
        let deep = tree.insert(attribute("pkg.sub.Y"));
        assert!(tree.add_child(sub, deep));
        assert!(tree.lookup("pkg.sub.Y").is_none());

        assert!(tree.add_child(root, sub));
        assert_eq!(tree.lookup("pkg.sub"), Some(sub));
        assert_eq!(tree.lookup("pkg.sub.Y"), Some(deep));
    }

    #[test]
    fn has_contents_is_true_for_bare_root_only() {
        let mut tree = ObjectTree::new();
        let root = tree.insert(module("pkg"));
        tree.set_root(root);
        let leaf = tree.insert(attribute("pkg.X"));
        tree.add_child(root, leaf);

        assert!(tree.has_contents(root));
        assert!(!tree.has_contents(leaf));
    }

    #[test]
    fn has_contents_propagates_up_from_documented_descendants() {
        let mut tree = ObjectTree::new();
        let root = tree.insert(module("pkg"));
        tree.set_root(root);
        let sub = tree.insert(module("pkg.sub"));
        let attr = tree.insert(attribute("pkg.sub.X"));
        tree.add_child(root, sub);
        tree.add_child(sub, attr);
        assert!(!tree.has_contents(sub));

        tree.get_mut(attr).docstring = "Documented.".into();
        assert!(tree.has_contents(sub));
        assert!(tree.has_contents(attr));
    }

    #[test]
    fn parent_path_strips_last_segment() {
        assert_eq!(attribute("a.b.c").parent_path(), "a.b");
        assert_eq!(module("a").parent_path(), "a");
    }

    #[test]
    fn module_name_properties_use_file_stem() {
        let package = DocumentedObject::new("pkg", "pkg", "/src/pkg/__init__.py", ObjectKind::Module);
        assert_eq!(package.name_properties(), vec!["special"]);

        let private = DocumentedObject::new("_impl", "pkg._impl", "/src/pkg/_impl.py", ObjectKind::Module);
        assert_eq!(private.name_properties(), vec!["private"]);
    }

    #[test]
    fn all_properties_are_sorted_and_unique() {
        let method = DocumentedObject::new(
            "__eq__",
            "pkg.C.__eq__",
            "/src/pkg.py",
            ObjectKind::Method { signature: None },
        )
        .with_properties(["staticmethod", "async"]);
        assert_eq!(method.all_properties(), vec!["async", "special", "staticmethod"]);
    }
}
