//! Building documented-object trees.
//!
//! [`Loader::get_object_documentation`] resolves a path, documents the object
//! it leads to and, member selection permitting, everything below it:
//!
//! 1. the path becomes a [`NodeChain`](crate::node::NodeChain) re-rooted at
//!    the module that defines the object
//! 2. the leaf is documented as a module, class, method, function or
//!    property, recursing into members
//! 3. statically discovered attributes are attached under their parent paths
//! 4. every docstring is parsed, children first
//!
//! Failures to read a member's source or signature are not fatal: they are
//! collected in [`Loader::errors`] and the field is left empty.

use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

use scribe_core::properties::is_special;
use scribe_core::{
    DocumentedObject, LoaderOptions, MemberSelection, ObjectCategory, ObjectId, ObjectKind, ObjectTree,
    Signature, Source,
};
use scribe_parser::{DocstringParser, ParseContext, decorator_matches, parser_for};

use crate::attributes::AttributeScanner;
use crate::error::LoadError;
use crate::filters::Filters;
use crate::finder::ModuleFinder;
use crate::node::{NodeChain, get_object_tree};
use crate::runtime::{
    ClassData, ClassRef, FunctionData, FunctionKind, ImportFailure, ModuleData, PropertyData, PyObject,
    Runtime,
};

/// Documents Python objects found on a search path.
///
/// One loader serves one request: its caches and its error list live as long
/// as it does.
pub struct Loader {
    runtime: Runtime,
    options: LoaderOptions,
    filters: Filters,
    parser: Box<dyn DocstringParser>,
    attributes: AttributeScanner,
    errors: Vec<String>,
}

impl Loader {
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidFilter`] when a filter does not compile.
    pub fn new(finder: ModuleFinder, options: LoaderOptions) -> Result<Self, LoadError> {
        let filters = Filters::new(&options.filters)?;
        let parser = parser_for(options.docstring_style, &options.docstring_options);
        Ok(Self {
            runtime: Runtime::new(finder),
            options,
            filters,
            parser,
            attributes: AttributeScanner::new(),
            errors: Vec::new(),
        })
    }

    /// Non-fatal problems met so far.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<String> {
        std::mem::take(&mut self.errors)
    }

    /// Document the object at `path` and, following the member selection,
    /// its children.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] when the path does not resolve, or resolves to
    /// something that is neither documentable nor a known attribute.
    pub fn get_object_documentation(&mut self, path: &str) -> Result<ObjectTree, LoadError> {
        let chain = get_object_tree(&self.runtime, path, self.options.new_path_syntax)?;
        let selection = self.options.member_selection();
        let attributes = self.attributes.module_attributes(&self.runtime, chain.root());
        let mut tree = ObjectTree::new();

        let Some(root) = self.document(&mut tree, &chain, &selection) else {
            let dotted_path = chain.dotted_path();
            let attribute = attributes
                .iter()
                .find(|attribute| attribute.path == dotted_path)
                .cloned()
                .ok_or_else(|| LoadError::NotSupported {
                    path: path.to_string(),
                    kind: chain.leaf().type_name(),
                })?;
            let root = tree.insert(attribute);
            tree.set_root(root);
            self.finish(&mut tree, root);
            return Ok(tree);
        };
        tree.set_root(root);

        if selection != MemberSelection::Nothing {
            let root_path = tree.get(root).path.clone();
            for attribute in attributes.iter() {
                let keep = if attribute.parent_path() == root_path {
                    self.filters.select(&attribute.name, &selection)
                } else {
                    self.filters.keep(&attribute.name)
                };
                if keep {
                    attach_attribute(&mut tree, attribute.clone());
                }
            }
        }

        self.finish(&mut tree, root);
        Ok(tree)
    }

    fn error(&mut self, message: String) {
        tracing::warn!(%message, "loading error");
        self.errors.push(message);
    }

    /// Classify the leaf and document it; `None` when it is none of the
    /// documentable kinds.
    fn document(&mut self, tree: &mut ObjectTree, chain: &NodeChain, selection: &MemberSelection) -> Option<ObjectId> {
        let id = match chain.leaf() {
            PyObject::Module(module) => self.module_documentation(tree, &module, selection),
            PyObject::Class(class) => self.class_documentation(tree, chain, &class, selection),
            PyObject::Function(function) => match function.kind {
                FunctionKind::StaticMethod => self.method_documentation(tree, chain, &function, &["staticmethod"]),
                FunctionKind::ClassMethod => self.method_documentation(tree, chain, &function, &["classmethod"]),
                FunctionKind::Plain if matches!(chain.parent(), Some(PyObject::Class(_))) => {
                    self.regular_method_documentation(tree, chain, &function)
                }
                FunctionKind::Plain => self.function_documentation(tree, chain, &function),
            },
            PyObject::Property(property) => self.property_documentation(tree, chain, &property),
            PyObject::Variable(_) | PyObject::External(_) => return None,
        };
        Some(id)
    }

    fn module_documentation(
        &mut self,
        tree: &mut ObjectTree,
        module: &Rc<ModuleData>,
        selection: &MemberSelection,
    ) -> ObjectId {
        let chain = NodeChain::new(Rc::clone(module));
        let path = chain.dotted_path();
        let object = PyObject::Module(Rc::clone(module));
        let source = if module.file().is_some() && module.ast.source.is_empty() {
            None
        } else {
            self.source_or_error(&object, &path, "read")
        };
        let documented = DocumentedObject::new(chain.name(), &path, chain.file_path(), ObjectKind::Module)
            .with_docstring(self.runtime.getdoc(&object))
            .with_source(source);
        let id = tree.insert(documented);
        if *selection == MemberSelection::Nothing {
            return id;
        }

        for (name, member) in self.runtime.members(module) {
            if !self.filters.select(&name, selection) {
                continue;
            }
            if self.runtime.getmodule(&member).as_deref() != Some(module.name()) {
                continue;
            }
            let child_chain = chain.child(name, member.clone());
            let child = match &member {
                PyObject::Class(class) => {
                    self.class_documentation(tree, &child_chain, class, &MemberSelection::Filtered)
                }
                PyObject::Function(function) if function.kind == FunctionKind::Plain => {
                    self.function_documentation(tree, &child_chain, function)
                }
                _ => continue,
            };
            tree.add_child(id, child);
        }

        for name in self.runtime.iter_submodules(module) {
            if !self.filters.select(&name, selection) {
                continue;
            }
            let submodule_path = format!("{path}.{name}");
            match self.runtime.import_module(&submodule_path) {
                Ok(submodule) => {
                    let child = self.module_documentation(tree, &submodule, &MemberSelection::Filtered);
                    tree.add_child(id, child);
                }
                Err(failure @ ImportFailure::Broken(_)) => {
                    self.error(format!("Couldn't import '{submodule_path}': {failure}"));
                }
                Err(ImportFailure::NotFound) => {
                    tracing::debug!(module = %submodule_path, "listed submodule vanished");
                }
            }
        }
        id
    }

    fn class_documentation(
        &mut self,
        tree: &mut ObjectTree,
        chain: &NodeChain,
        class: &Rc<ClassData>,
        selection: &MemberSelection,
    ) -> ObjectId {
        let path = chain.dotted_path();
        let object = PyObject::Class(Rc::clone(class));
        let source = self.source_or_error(&object, &path, "read");
        let mut properties = Vec::new();
        if decorator_matches(&class.def.decorators, "dataclass") {
            properties.push("dataclass");
        }
        if self.is_pydantic_model(class) {
            properties.push("pydantic-model");
        }
        let documented = DocumentedObject::new(chain.name(), &path, chain.file_path(), ObjectKind::Class)
            .with_docstring(self.runtime.getdoc(&object))
            .with_properties(properties)
            .with_source(source);
        let id = tree.insert(documented);
        if *selection == MemberSelection::Nothing {
            return id;
        }

        for (name, member) in self.runtime.class_dict(class) {
            if !self.filters.select(&name, selection) {
                continue;
            }
            let child_chain = chain.child(name, member.clone());
            let child = match &member {
                PyObject::Class(nested) => {
                    self.class_documentation(tree, &child_chain, nested, &MemberSelection::Filtered)
                }
                PyObject::Function(function) => match function.kind {
                    FunctionKind::ClassMethod => {
                        self.method_documentation(tree, &child_chain, function, &["classmethod"])
                    }
                    FunctionKind::StaticMethod => {
                        self.method_documentation(tree, &child_chain, function, &["staticmethod"])
                    }
                    FunctionKind::Plain => self.regular_method_documentation(tree, &child_chain, function),
                },
                PyObject::Property(property) => self.property_documentation(tree, &child_chain, property),
                _ => continue,
            };
            tree.add_child(id, child);
        }
        id
    }

    fn is_pydantic_model(&self, class: &Rc<ClassData>) -> bool {
        self.runtime.mro(class).iter().skip(1).any(|base| match base {
            ClassRef::Class(base) => base.name() == "BaseModel",
            ClassRef::External(name) => name == "BaseModel" || name.ends_with(".BaseModel"),
            ClassRef::Object => false,
        })
    }

    fn function_documentation(&mut self, tree: &mut ObjectTree, chain: &NodeChain, function: &Rc<FunctionData>) -> ObjectId {
        let path = chain.dotted_path();
        let object = PyObject::Function(Rc::clone(function));
        let signature = self.signature_or_error(&object, &path);
        let source = self.source_or_error(&object, &path, "read");
        let documented = DocumentedObject::new(
            chain.name(),
            &path,
            chain.file_path(),
            ObjectKind::Function { signature },
        )
        .with_docstring(self.runtime.getdoc(&object))
        .with_properties(function.def.is_async.then_some("async"))
        .with_source(source);
        tree.insert(documented)
    }

    fn method_object(
        &mut self,
        chain: &NodeChain,
        function: &Rc<FunctionData>,
        properties: &[&str],
    ) -> DocumentedObject {
        let path = chain.dotted_path();
        let object = PyObject::Function(Rc::clone(function));
        let signature = self.signature_or_error(&object, &path);
        let source = self.source_or_error(&object, &path, "read");
        DocumentedObject::new(chain.name(), &path, chain.file_path(), ObjectKind::Method { signature })
            .with_docstring(self.runtime.getdoc(&object))
            .with_properties(properties.iter().copied())
            .with_properties(function.def.is_async.then_some("async"))
            .with_source(source)
    }

    fn method_documentation(
        &mut self,
        tree: &mut ObjectTree,
        chain: &NodeChain,
        function: &Rc<FunctionData>,
        properties: &[&str],
    ) -> ObjectId {
        let documented = self.method_object(chain, function, properties);
        tree.insert(documented)
    }

    /// Special methods whose docstring is the one of the first ancestor
    /// defining them (`object.__init__`'s, typically) get no docstring.
    fn regular_method_documentation(
        &mut self,
        tree: &mut ObjectTree,
        chain: &NodeChain,
        function: &Rc<FunctionData>,
    ) -> ObjectId {
        let mut documented = self.method_object(chain, function, &[]);
        if is_special(&documented.name)
            && let Some(PyObject::Class(class)) = chain.parent()
            && let Some(inherited) = self.runtime.inherited_member(&class, &documented.name)
            && documented.docstring == self.runtime.getdoc(&inherited)
        {
            tracing::debug!(path = %documented.path, "dropped inherited docstring");
            documented.docstring.clear();
        }
        tree.insert(documented)
    }

    fn property_documentation(&mut self, tree: &mut ObjectTree, chain: &NodeChain, property: &Rc<PropertyData>) -> ObjectId {
        let path = chain.dotted_path();
        let fget = PyObject::Function(Rc::clone(&property.fget));
        let type_annotation = self
            .signature_or_error(&fget, &path)
            .and_then(|signature| signature.return_annotation)
            .unwrap_or_default();
        let source = self.source_or_error(&fget, &path, "get");
        let access = if property.has_setter { "writable" } else { "readonly" };
        let documented = DocumentedObject::new(
            chain.name(),
            &path,
            chain.file_path(),
            ObjectKind::Attribute { type_annotation },
        )
        .with_docstring(self.runtime.getdoc(&fget))
        .with_properties(["property", access])
        .with_source(source);
        tree.insert(documented)
    }

    fn signature_or_error(&mut self, object: &PyObject, path: &str) -> Option<Signature> {
        match self.runtime.signature(object) {
            Ok(signature) => Some(signature),
            Err(reason) => {
                self.error(format!("Couldn't get signature for '{path}': {reason}"));
                None
            }
        }
    }

    /// `verb` is part of the message: "read" for most objects, "get" for properties.
    fn source_or_error(&mut self, object: &PyObject, path: &str, verb: &str) -> Option<Source> {
        match self.runtime.getsource(object) {
            Ok(source) => Some(source),
            Err(reason) => {
                self.error(format!("Couldn't {verb} source for '{path}': {reason}"));
                None
            }
        }
    }

    /// Parse docstrings bottom-up and fill in relative file paths.
    fn finish(&self, tree: &mut ObjectTree, root: ObjectId) {
        for id in tree.post_order(root) {
            let object = tree.get(id);
            let relative = relative_file_path(&self.runtime, &object.path, &object.file_path);
            let parsed = (!object.docstring.is_empty()).then(|| {
                let attributes: BTreeMap<String, String> = object
                    .children_of(ObjectCategory::Attribute)
                    .iter()
                    .map(|&child| tree.get(child))
                    .filter_map(|child| {
                        let annotation = child.type_annotation()?;
                        (!annotation.is_empty()).then(|| (child.name.clone(), annotation.to_string()))
                    })
                    .collect();
                let context = ParseContext::new(&object.path)
                    .with_signature(object.signature())
                    .with_annotation(object.type_annotation())
                    .with_attributes(attributes);
                self.parser.parse(&object.docstring, &context)
            });

            let object = tree.get_mut(id);
            object.relative_file_path = relative;
            if let Some((sections, errors)) = parsed {
                if !errors.is_empty() {
                    tracing::debug!(path = %object.path, count = errors.len(), "docstring diagnostics");
                }
                object.docstring_sections = sections;
                object.docstring_errors = errors;
            }
        }
    }
}

/// Attach a statically discovered attribute under its parent.
///
/// Paths already in the tree win; attributes without a documented parent
/// are dropped.
fn attach_attribute(tree: &mut ObjectTree, attribute: DocumentedObject) {
    if tree.lookup(&attribute.path).is_some() {
        return;
    }
    let Some(parent) = tree.lookup(attribute.parent_path()) else {
        tracing::debug!(path = %attribute.path, "attribute without a documented parent");
        return;
    };
    let id = tree.insert(attribute);
    tree.add_child(parent, id);
}

/// `file_path` relative to the directory holding the top-level package of
/// `path`; namespace packages are skipped on the way down. Empty when it
/// cannot be determined.
#[must_use]
pub fn relative_file_path(runtime: &Runtime, path: &str, file_path: &str) -> String {
    let parts: Vec<&str> = path.split('.').collect();
    for length in 1..=parts.len() {
        let Ok(module) = runtime.import_module(&parts[..length].join(".")) else {
            return String::new();
        };
        let Some(file) = module.file() else {
            continue;
        };
        let Some(base) = file.parent().and_then(Path::parent) else {
            return String::new();
        };
        return Path::new(file_path)
            .strip_prefix(base)
            .map(|relative| relative.display().to_string())
            .unwrap_or_default();
    }
    String::new()
}
