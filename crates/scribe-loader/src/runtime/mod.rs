//! A static stand-in for the Python runtime.
//!
//! The loader asks the questions it would ask a live interpreter (import
//! this, get that attribute, where is this defined, what is its docstring)
//! and [`Runtime`] answers them from source files on the search path. Modules
//! are parsed once per runtime; lookups that would loop through import cycles
//! give up instead.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use scribe_core::{Signature, SignatureParameter, Source};
use scribe_parser::{FunctionDef, PyModule, cleandoc};

pub mod builtins;
mod classes;
mod hints;
mod namespace;
pub mod objects;


pub use objects::{
    ClassData, ClassRef, FunctionData, FunctionKind, ModuleData, PropertyData, PyObject, VariableData,
};

use crate::finder::ModuleFinder;
use builtins::{is_builtin_name, object_member_doc};
use namespace::Binding;

/// Why a module could not be imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportFailure {
    /// Nothing on the search path has that name.
    NotFound,
    /// The module exists but cannot be read or parsed.
    Broken(String),
}

impl fmt::Display for ImportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("module not found"),
            Self::Broken(reason) => f.write_str(reason),
        }
    }
}

#[derive(Debug)]
pub struct Runtime {
    finder: ModuleFinder,
    modules: RefCell<HashMap<String, Rc<ModuleData>>>,
    failures: RefCell<HashMap<String, ImportFailure>>,
    mros: RefCell<HashMap<String, Rc<[ClassRef]>>>,
    /// Lookups in progress, to break import and inheritance cycles.
    resolving: RefCell<Vec<String>>,
}

/// Pops its key off the resolution stack when dropped.
struct ResolveGuard<'a> {
    stack: &'a RefCell<Vec<String>>,
}

impl Drop for ResolveGuard<'_> {
    fn drop(&mut self) {
        self.stack.borrow_mut().pop();
    }
}

impl Runtime {
    #[must_use]
    pub fn new(finder: ModuleFinder) -> Self {
        Self {
            finder,
            modules: RefCell::new(HashMap::new()),
            failures: RefCell::new(HashMap::new()),
            mros: RefCell::new(HashMap::new()),
            resolving: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub const fn finder(&self) -> &ModuleFinder {
        &self.finder
    }

    fn guard(&self, key: String) -> Option<ResolveGuard<'_>> {
        let mut stack = self.resolving.borrow_mut();
        if stack.contains(&key) {
            tracing::debug!(%key, "cyclic lookup abandoned");
            return None;
        }
        stack.push(key);
        Some(ResolveGuard {
            stack: &self.resolving,
        })
    }

    /// Import a module by its full dotted name, parents first.
    ///
    /// # Errors
    ///
    /// [`ImportFailure::NotFound`] when no search path holds the module,
    /// [`ImportFailure::Broken`] when it or one of its parent packages cannot
    /// be read or parsed.
    pub fn import_module(&self, name: &str) -> Result<Rc<ModuleData>, ImportFailure> {
        if let Some(module) = self.modules.borrow().get(name) {
            return Ok(Rc::clone(module));
        }
        if let Some(failure) = self.failures.borrow().get(name) {
            return Err(failure.clone());
        }
        let result = self.load_module(name);
        match &result {
            Ok(module) => {
                tracing::debug!(module = name, file = %module.file_path(), "imported module");
                self.modules
                    .borrow_mut()
                    .insert(name.to_string(), Rc::clone(module));
            }
            Err(failure) => {
                tracing::debug!(module = name, %failure, "import failed");
                self.failures
                    .borrow_mut()
                    .insert(name.to_string(), failure.clone());
            }
        }
        result
    }

    fn load_module(&self, name: &str) -> Result<Rc<ModuleData>, ImportFailure> {
        if let Some((parent, _)) = name.rsplit_once('.') {
            self.import_module(parent)?;
        }
        let location = self.finder.find(name).ok_or(ImportFailure::NotFound)?;
        let ast = match &location.file {
            Some(file) => PyModule::from_path(file)
                .map_err(|error| ImportFailure::Broken(format!("{}: {error}", file.display())))?,
            None => PyModule {
                source: String::new(),
                body: Vec::new(),
            },
        };
        Ok(Rc::new(ModuleData::new(location, ast)))
    }

    /// Attribute lookup on a module or a class.
    #[must_use]
    pub fn getattr(&self, object: &PyObject, name: &str) -> Option<PyObject> {
        match object {
            PyObject::Module(module) => self.module_attribute(module, name),
            PyObject::Class(class) => self.class_attribute(class, name),
            _ => None,
        }
    }

    /// Namespace bindings, then star imports, then submodules.
    fn module_attribute(&self, module: &ModuleData, name: &str) -> Option<PyObject> {
        let namespace = module.namespace();
        if let Some(binding) = namespace.get(name) {
            return self.resolve_binding(module, name, binding);
        }
        if !name.starts_with('_') {
            for star in &namespace.stars {
                let Some(_guard) = self.guard(format!("{star}.*")) else {
                    continue;
                };
                if let Ok(source) = self.import_module(star)
                    && let Some(object) = self.module_attribute(&source, name)
                {
                    return Some(object);
                }
            }
        }
        self.import_module(&format!("{}.{name}", module.name()))
            .ok()
            .map(PyObject::Module)
    }

    fn resolve_binding(&self, module: &ModuleData, name: &str, binding: &Binding) -> Option<PyObject> {
        let _guard = self.guard(format!("{}.{name}", module.name()))?;
        let object = match binding {
            Binding::Class(class) => PyObject::Class(Rc::clone(class)),
            Binding::Function(function) => PyObject::Function(Rc::clone(function)),
            Binding::Value { variable, alias } => alias
                .as_deref()
                .and_then(|dotted| self.resolve_dotted(module, dotted))
                .filter(|object| {
                    matches!(
                        object,
                        PyObject::Module(_) | PyObject::Class(_) | PyObject::Function(_)
                    )
                })
                .unwrap_or_else(|| PyObject::Variable(Rc::clone(variable))),
            Binding::Import(target) => self
                .import_module(target)
                .map_or_else(|_| PyObject::External(target.clone()), PyObject::Module),
            Binding::From {
                module: source,
                name: attribute,
            } => self
                .import_module(source)
                .ok()
                .and_then(|source| self.module_attribute(&source, attribute))
                .unwrap_or_else(|| PyObject::External(format!("{source}.{attribute}"))),
        };
        Some(object)
    }

    /// Resolve a dotted expression as written in `module`.
    ///
    /// Unknown builtin names come back as [`PyObject::External`].
    pub(crate) fn resolve_dotted(&self, module: &ModuleData, dotted: &str) -> Option<PyObject> {
        let mut segments = dotted.split('.');
        let first = segments.next()?;
        let mut current = self
            .module_attribute(module, first)
            .or_else(|| is_builtin_name(first).then(|| PyObject::External(first.to_string())))?;
        for segment in segments {
            current = self.getattr(&current, segment)?;
        }
        Some(current)
    }

    /// Name of the module an object is defined in.
    ///
    /// `None` for plain values and for objects the runtime cannot see into.
    #[must_use]
    pub fn getmodule(&self, object: &PyObject) -> Option<String> {
        match object {
            PyObject::Module(module) => Some(module.name().to_string()),
            PyObject::Class(class) => Some(class.module.clone()),
            PyObject::Function(function) => Some(function.module.clone()),
            PyObject::Property(property) => Some(property.fget.module.clone()),
            PyObject::Variable(_) | PyObject::External(_) => None,
        }
    }

    /// The cleaned docstring of an object, or `""`.
    ///
    /// Methods without a docstring inherit the one of the first class in the
    /// MRO whose attribute of the same name has one.
    #[must_use]
    pub fn getdoc(&self, object: &PyObject) -> String {
        match object {
            PyObject::Module(module) => module.ast.docstring().map(cleandoc).unwrap_or_default(),
            PyObject::Class(class) => class.def.docstring().map(cleandoc).unwrap_or_default(),
            PyObject::Function(function) => self.function_doc(function),
            PyObject::Property(property) => self.function_doc(&property.fget),
            PyObject::External(name) => name
                .strip_prefix("object.")
                .and_then(object_member_doc)
                .map(str::to_string)
                .unwrap_or_default(),
            PyObject::Variable(_) => String::new(),
        }
    }

    fn function_doc(&self, function: &FunctionData) -> String {
        if let Some(docstring) = function.def.docstring() {
            return cleandoc(docstring);
        }
        let Some(owner) = &function.owner else {
            return String::new();
        };
        for base in self.mro(owner).iter().skip(1) {
            let inherited = match base {
                ClassRef::Class(class) => self
                    .own_member(class, function.name())
                    .and_then(|member| match member {
                        PyObject::Function(function) => function.def.docstring().map(cleandoc),
                        PyObject::Property(property) => property.fget.def.docstring().map(cleandoc),
                        _ => None,
                    }),
                ClassRef::Object => object_member_doc(function.name()).map(str::to_string),
                ClassRef::External(_) => None,
            };
            if let Some(docstring) = inherited {
                return docstring;
            }
        }
        String::new()
    }

    /// The signature of a function; class methods lose their bound parameter.
    ///
    /// # Errors
    ///
    /// Returns a description of the object when it is not callable.
    pub fn signature(&self, object: &PyObject) -> Result<Signature, String> {
        match object {
            PyObject::Function(function) => {
                let signature = signature_of(&function.def);
                Ok(if function.kind == FunctionKind::ClassMethod {
                    signature.without_first()
                } else {
                    signature
                })
            }
            PyObject::Property(property) => Ok(signature_of(&property.fget.def)),
            other => Err(format!("no signature found for {}", other.type_name())),
        }
    }

    /// Source text of a definition, decorators included, or a whole module.
    ///
    /// # Errors
    ///
    /// Returns a reason when the object has no source file.
    pub fn getsource(&self, object: &PyObject) -> Result<Source, String> {
        match object {
            PyObject::Module(module) => {
                if module.file().is_none() {
                    return Err("namespace packages have no source file".into());
                }
                if module.ast.source.is_empty() {
                    return Err("could not get source code".into());
                }
                Ok(Source {
                    code: module.ast.source.clone(),
                    line_start: 1,
                })
            }
            PyObject::Class(class) => self.source_lines(&class.module, class.lines),
            PyObject::Function(function) => self.source_lines(&function.module, function.lines),
            PyObject::Property(property) => self.source_lines(&property.fget.module, property.fget.lines),
            other => Err(format!("could not find source of {}", other.type_name())),
        }
    }

    fn source_lines(&self, module: &str, (start, end): (usize, usize)) -> Result<Source, String> {
        let module = self
            .import_module(module)
            .map_err(|failure| format!("module '{module}' is unavailable: {failure}"))?;
        Ok(Source {
            code: module.ast.lines(start, end),
            line_start: start,
        })
    }

    /// Every name in a module namespace with its value, sorted by name.
    ///
    /// Star-imported public names are included; submodules only when a
    /// statement binds them.
    #[must_use]
    pub fn members(&self, module: &ModuleData) -> Vec<(String, PyObject)> {
        let namespace = module.namespace();
        let mut names: Vec<String> = namespace.names().map(str::to_string).collect();
        if let Some(_guard) = self.guard(format!("{}.*", module.name())) {
            for star in &namespace.stars {
                if let Ok(source) = self.import_module(star) {
                    names.extend(
                        self.members(&source)
                            .into_iter()
                            .map(|(name, _)| name)
                            .filter(|name| !name.starts_with('_')),
                    );
                }
            }
        }
        names.sort();
        names.dedup();
        names
            .into_iter()
            .filter_map(|name| {
                let object = self.module_attribute(module, &name)?;
                Some((name, object))
            })
            .collect()
    }

    /// Names of a package's direct submodules, sorted.
    #[must_use]
    pub fn iter_submodules(&self, module: &ModuleData) -> Vec<String> {
        if module.is_package() {
            self.finder.submodules(&module.location)
        } else {
            Vec::new()
        }
    }
}

fn signature_of(def: &FunctionDef) -> Signature {
    Signature {
        parameters: def
            .parameters
            .iter()
            .map(|param| SignatureParameter {
                kind: param.kind,
                name: param.name.clone(),
                annotation: param.annotation.clone(),
                default: param.default.clone(),
            })
            .collect(),
        return_annotation: def.returns.clone(),
    }
}
