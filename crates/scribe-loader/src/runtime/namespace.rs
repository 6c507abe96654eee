//! Module namespaces: what each top-level name is bound to.
//!
//! Definitions become runtime objects right away; imports stay unresolved
//! until looked up so that import cycles cost nothing here. In `if`/`try`/
//! `with` statements the first body is assumed to run: its names are bound
//! as usual, and the other bodies only add names that are still missing.

use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;
use scribe_parser::{Stmt, StmtKind, Target};

use super::objects::{ClassData, FunctionData, FunctionKind, ModuleData, VariableData};

static DOTTED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("dotted name pattern should compile")
});

#[derive(Debug, Clone)]
pub(super) enum Binding {
    Class(Rc<ClassData>),
    Function(Rc<FunctionData>),
    /// `alias` holds the right-hand side when it is a plain dotted name,
    /// which may turn out to be another class, function or module.
    Value {
        variable: Rc<VariableData>,
        alias: Option<String>,
    },
    /// `import a.b` binds `a` to module `a`; `import a.b as c` binds `c` to `a.b`.
    Import(String),
    /// `from module import name`, with `module` made absolute.
    From { module: String, name: String },
}

#[derive(Debug, Default)]
pub(super) struct Namespace {
    bindings: Vec<(String, Binding)>,
    /// Absolute names of star-imported modules, in import order.
    pub(super) stars: Vec<String>,
}

impl Namespace {
    pub(super) fn build(module: &ModuleData) -> Self {
        let mut namespace = Self::default();
        namespace.collect(module, &module.ast.body, true);
        namespace
    }

    pub(super) fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings
            .iter()
            .find(|(bound, _)| bound == name)
            .map(|(_, binding)| binding)
    }

    pub(super) fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|(name, _)| name.as_str())
    }

    fn bind(&mut self, name: &str, binding: Binding, overwrite: bool) {
        match self.bindings.iter_mut().find(|(bound, _)| bound == name) {
            Some((_, existing)) if overwrite => *existing = binding,
            Some(_) => {}
            None => self.bindings.push((name.to_string(), binding)),
        }
    }

    fn collect(&mut self, module: &ModuleData, body: &[Stmt], overwrite: bool) {
        for stmt in body {
            let lines = (stmt.line_start, stmt.line_end);
            match &stmt.kind {
                StmtKind::ClassDef(def) => {
                    let class = ClassData {
                        module: module.name().to_string(),
                        qualname: def.name.clone(),
                        def: def.clone(),
                        lines,
                    };
                    self.bind(&def.name, Binding::Class(Rc::new(class)), overwrite);
                }
                StmtKind::FunctionDef(def) => {
                    let function = FunctionData {
                        module: module.name().to_string(),
                        qualname: def.name.clone(),
                        def: def.clone(),
                        kind: FunctionKind::Plain,
                        lines,
                        owner: None,
                    };
                    self.bind(&def.name, Binding::Function(Rc::new(function)), overwrite);
                }
                StmtKind::Assign {
                    targets,
                    annotation,
                    value: Some(value),
                } => {
                    for target in targets {
                        let Target::Name(name) = target else {
                            continue;
                        };
                        let variable = VariableData {
                            name: name.clone(),
                            module: module.name().to_string(),
                            annotation: annotation.clone(),
                            value: Some(value.clone()),
                        };
                        let alias = is_dotted_name(value).then(|| value.clone());
                        self.bind(
                            name,
                            Binding::Value {
                                variable: Rc::new(variable),
                                alias,
                            },
                            overwrite,
                        );
                    }
                }
                StmtKind::Import(aliases) => {
                    for alias in aliases {
                        let module_name = match &alias.asname {
                            Some(_) => alias.name.clone(),
                            None => alias.bound_name().to_string(),
                        };
                        self.bind(alias.bound_name(), Binding::Import(module_name), overwrite);
                    }
                }
                StmtKind::ImportFrom(import) => {
                    let Some(source) = absolute_module(module.package(), &import.module, import.level) else {
                        tracing::debug!(module = module.name(), "relative import beyond top-level package");
                        continue;
                    };
                    if import.star {
                        if !self.stars.contains(&source) {
                            self.stars.push(source);
                        }
                        continue;
                    }
                    for alias in &import.names {
                        let binding = Binding::From {
                            module: source.clone(),
                            name: alias.name.clone(),
                        };
                        self.bind(alias.bound_name(), binding, overwrite);
                    }
                }
                StmtKind::Compound { bodies } => {
                    for (index, nested) in bodies.iter().enumerate() {
                        self.collect(module, nested, overwrite && index == 0);
                    }
                }
                StmtKind::Assign { .. } | StmtKind::Expr { .. } | StmtKind::Other => {}
            }
        }
    }
}

/// Whether an assigned value may be another name for an object.
fn is_dotted_name(value: &str) -> bool {
    !matches!(value, "None" | "True" | "False") && DOTTED_NAME.is_match(value)
}

/// Resolve `from <dots><module> import ...` against the importing package.
pub(super) fn absolute_module(package: &str, module: &str, level: usize) -> Option<String> {
    if level == 0 {
        return Some(module.to_string());
    }
    let mut parts: Vec<&str> = if package.is_empty() {
        Vec::new()
    } else {
        package.split('.').collect()
    };
    for _ in 1..level {
        parts.pop()?;
    }
    if parts.is_empty() {
        return None;
    }
    if !module.is_empty() {
        parts.push(module);
    }
    Some(parts.join("."))
}
