//! Values handed out by the runtime.
//!
//! Everything is reference counted: a class or function found twice (through
//! a re-export, say) is the same definition, compared by its defining module
//! and qualified name.

use std::cell::OnceCell;
use std::path::Path;
use std::rc::Rc;

use scribe_parser::{ClassDef, FunctionDef, PyModule};

use super::namespace::Namespace;
use crate::finder::ModuleLocation;

/// An imported module.
#[derive(Debug)]
pub struct ModuleData {
    pub location: ModuleLocation,
    pub ast: PyModule,
    namespace: OnceCell<Namespace>,
}

impl ModuleData {
    pub(super) const fn new(location: ModuleLocation, ast: PyModule) -> Self {
        Self {
            location,
            ast,
            namespace: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.location.name
    }

    pub(super) fn namespace(&self) -> &Namespace {
        self.namespace.get_or_init(|| Namespace::build(self))
    }

    #[must_use]
    pub fn file(&self) -> Option<&Path> {
        self.location.file.as_deref()
    }

    /// The file path as a string; empty for namespace packages.
    #[must_use]
    pub fn file_path(&self) -> String {
        self.file()
            .map(|file| file.display().to_string())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_package(&self) -> bool {
        self.location.is_package()
    }

    /// The package relative imports start from.
    #[must_use]
    pub fn package(&self) -> &str {
        if self.is_package() {
            self.name()
        } else {
            self.name().rsplit_once('.').map_or("", |(parent, _)| parent)
        }
    }
}

/// A class definition.
#[derive(Debug)]
pub struct ClassData {
    /// Defining module.
    pub module: String,
    /// Dotted name inside the module (`Outer.Inner`).
    pub qualname: String,
    pub def: ClassDef,
    pub lines: (usize, usize),
}

impl ClassData {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.def.name
    }

    #[must_use]
    pub fn key(&self) -> String {
        format!("{}:{}", self.module, self.qualname)
    }
}

/// How a function was wrapped in its class body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Plain,
    StaticMethod,
    ClassMethod,
}

/// A function or method definition.
#[derive(Debug)]
pub struct FunctionData {
    pub module: String,
    pub qualname: String,
    pub def: FunctionDef,
    pub kind: FunctionKind,
    pub lines: (usize, usize),
    /// The class whose body defines the function.
    pub owner: Option<Rc<ClassData>>,
}

impl FunctionData {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.def.name
    }
}

#[derive(Debug)]
pub struct PropertyData {
    pub fget: Rc<FunctionData>,
    pub has_setter: bool,
}

/// A name bound to a plain value.
#[derive(Debug)]
pub struct VariableData {
    pub name: String,
    pub module: String,
    pub annotation: Option<String>,
    pub value: Option<String>,
}

/// What a lookup can produce.
#[derive(Debug, Clone)]
pub enum PyObject {
    Module(Rc<ModuleData>),
    Class(Rc<ClassData>),
    Function(Rc<FunctionData>),
    Property(Rc<PropertyData>),
    Variable(Rc<VariableData>),
    /// A dotted name the runtime cannot see into: builtins, or code that is
    /// not on the search path.
    External(String),
}

impl PyObject {
    /// Short description of the object's type, for error messages.
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            Self::Module(_) => "module".into(),
            Self::Class(_) => "class".into(),
            Self::Function(function) => match function.kind {
                FunctionKind::Plain => "function".into(),
                FunctionKind::StaticMethod => "staticmethod".into(),
                FunctionKind::ClassMethod => "classmethod".into(),
            },
            Self::Property(_) => "property".into(),
            Self::Variable(variable) => match &variable.annotation {
                Some(annotation) => format!("variable of type '{annotation}'"),
                None => "variable".into(),
            },
            Self::External(name) => format!("external object '{name}'"),
        }
    }
}

/// One entry of a method resolution order.
#[derive(Debug, Clone)]
pub enum ClassRef {
    Class(Rc<ClassData>),
    /// The builtin `object`, last in every MRO.
    Object,
    /// A base the runtime cannot see into.
    External(String),
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Class(left), Self::Class(right)) => {
                left.module == right.module && left.qualname == right.qualname
            }
            (Self::Object, Self::Object) => true,
            (Self::External(left), Self::External(right)) => left == right,
            _ => false,
        }
    }
}

impl Eq for ClassRef {}
