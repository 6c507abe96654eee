//! Resolving a dotted path into a chain of runtime objects.

use std::rc::Rc;

use crate::error::LoadError;
use crate::runtime::{ImportFailure, ModuleData, PyObject, Runtime};

/// One attribute step below the root module.
#[derive(Debug, Clone)]
pub struct ObjectNode {
    pub name: String,
    pub object: PyObject,
}

/// A module followed by the attributes leading to an object.
#[derive(Debug, Clone)]
pub struct NodeChain {
    root: Rc<ModuleData>,
    nodes: Vec<ObjectNode>,
}

impl NodeChain {
    #[must_use]
    pub const fn new(root: Rc<ModuleData>) -> Self {
        Self {
            root,
            nodes: Vec::new(),
        }
    }

    #[must_use]
    pub const fn root(&self) -> &Rc<ModuleData> {
        &self.root
    }

    /// The chain extended by one attribute.
    #[must_use]
    pub fn child(&self, name: impl Into<String>, object: PyObject) -> Self {
        let mut chain = self.clone();
        chain.nodes.push(ObjectNode {
            name: name.into(),
            object,
        });
        chain
    }

    #[must_use]
    pub fn leaf(&self) -> PyObject {
        self.nodes
            .last()
            .map_or_else(|| PyObject::Module(Rc::clone(&self.root)), |node| node.object.clone())
    }

    /// The object holding the leaf; `None` for a bare module.
    #[must_use]
    pub fn parent(&self) -> Option<PyObject> {
        match self.nodes.len() {
            0 => None,
            1 => Some(PyObject::Module(Rc::clone(&self.root))),
            len => Some(self.nodes[len - 2].object.clone()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.nodes.last().map_or_else(
            || {
                let name = self.root.name();
                name.rsplit_once('.').map_or(name, |(_, last)| last)
            },
            |node| node.name.as_str(),
        )
    }

    #[must_use]
    pub fn dotted_path(&self) -> String {
        let mut path = self.root.name().to_string();
        for node in &self.nodes {
            path.push('.');
            path.push_str(&node.name);
        }
        path
    }

    /// File of the root module; empty for namespace packages.
    #[must_use]
    pub fn file_path(&self) -> String {
        self.root.file_path()
    }

    /// Point the chain at the module that really defines its leaf.
    ///
    /// Walking up from the leaf, the first object with a known defining
    /// module decides; at the first step whose parent is a module, that
    /// module is replaced when it is not the defining one. Modules along the
    /// chain do not count as definitions.
    fn reconcile(&mut self, runtime: &Runtime) {
        let mut real_module: Option<String> = None;
        for index in (0..self.nodes.len()).rev() {
            if real_module.is_none() && !matches!(self.nodes[index].object, PyObject::Module(_)) {
                real_module = runtime.getmodule(&self.nodes[index].object);
            }
            let parent_module = match index {
                0 => Some(Rc::clone(&self.root)),
                _ => match &self.nodes[index - 1].object {
                    PyObject::Module(module) => Some(Rc::clone(module)),
                    _ => None,
                },
            };
            let Some(parent_module) = parent_module else {
                continue;
            };
            if let Some(real) = real_module.as_deref()
                && real != parent_module.name()
            {
                match runtime.import_module(real) {
                    Ok(module) => {
                        tracing::debug!(from = parent_module.name(), to = %real, "re-rooted at defining module");
                        self.root = module;
                        self.nodes.drain(..index);
                    }
                    Err(failure) => {
                        tracing::debug!(module = %real, %failure, "defining module not importable");
                    }
                }
            }
            break;
        }
    }
}

/// Resolve `path` to a node chain.
///
/// Paths containing `:` (or every path, with `new_path_syntax`) are split
/// into `module:attribute.path`. Other paths import the longest importable
/// prefix, dropping one trailing segment at a time. Either way the chain is
/// rooted at the last module met, so `pkg:sub` and `pkg.sub` agree.
///
/// # Errors
///
/// [`LoadError::InvalidPath`] for empty paths, [`LoadError::Import`] when no
/// module can be imported, [`LoadError::Attribute`] when a segment is missing.
pub fn get_object_tree(runtime: &Runtime, path: &str, new_path_syntax: bool) -> Result<NodeChain, LoadError> {
    if path.is_empty() {
        return Err(LoadError::InvalidPath(path.to_string()));
    }

    let (module, attributes): (Rc<ModuleData>, Vec<&str>) = if new_path_syntax || path.contains(':') {
        let (module_path, object_path) = path.split_once(':').unwrap_or((path, ""));
        if module_path.is_empty() {
            return Err(LoadError::InvalidPath(path.to_string()));
        }
        let module = runtime
            .import_module(module_path)
            .map_err(|failure| import_error(module_path, &failure))?;
        let attributes = object_path.split('.').filter(|segment| !segment.is_empty()).collect();
        (module, attributes)
    } else {
        let mut segments: Vec<&str> = path.split('.').collect();
        let mut rest = Vec::new();
        loop {
            let candidate = segments.join(".");
            match runtime.import_module(&candidate) {
                Ok(module) => {
                    rest.reverse();
                    break (module, rest);
                }
                Err(ImportFailure::NotFound) if segments.len() > 1 => {
                    rest.extend(segments.pop());
                }
                Err(failure) => return Err(import_error(&candidate, &failure)),
            }
        }
    };

    let mut chain = NodeChain::new(module);
    for name in attributes {
        let object = runtime
            .getattr(&chain.leaf(), name)
            .ok_or_else(|| LoadError::Attribute {
                parent: chain.dotted_path(),
                name: name.to_string(),
            })?;
        chain = match object {
            PyObject::Module(module) => NodeChain::new(module),
            object => chain.child(name, object),
        };
    }
    chain.reconcile(runtime);
    Ok(chain)
}

fn import_error(module: &str, failure: &ImportFailure) -> LoadError {
    let reason = match failure {
        ImportFailure::NotFound => format!("No module named '{module}'"),
        ImportFailure::Broken(reason) => reason.clone(),
    };
    LoadError::Import {
        module: module.to_string(),
        reason,
    }
}
