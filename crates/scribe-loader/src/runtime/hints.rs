//! Type hints of modules and classes.
//!
//! Hints are the annotations of annotated assignments, as written. Like
//! `typing.get_type_hints`, a lookup fails as a whole when an annotation
//! names something that is not defined: callers then carry on without hints.

use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;
use scribe_parser::{Stmt, StmtKind, Target};

use super::builtins::is_builtin_name;
use super::objects::{ClassData, ClassRef, ModuleData};
use super::Runtime;

static QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""[^"]*"|'[^']*'"#).expect("quoted string pattern should compile")
});

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]*").expect("identifier pattern should compile"));

impl Runtime {
    /// Annotated module-level names.
    #[must_use]
    pub fn module_type_hints(&self, module: &ModuleData) -> Option<Vec<(String, String)>> {
        let mut hints = Vec::new();
        collect_annotations(&module.ast.body, &mut hints);
        for (name, annotation) in &hints {
            if !self.annotation_resolves(module, None, annotation) {
                tracing::debug!(module = module.name(), %name, %annotation, "unresolvable type hint");
                return None;
            }
        }
        Some(hints)
    }

    /// Annotated class-level names across the MRO; subclasses override.
    #[must_use]
    pub fn class_type_hints(&self, class: &Rc<ClassData>) -> Option<Vec<(String, String)>> {
        let mut merged: Vec<(String, String)> = Vec::new();
        for base in self.mro(class).iter().rev() {
            let ClassRef::Class(base) = base else {
                continue;
            };
            let module = self.import_module(&base.module).ok()?;
            let mut own = Vec::new();
            collect_annotations(&base.def.body, &mut own);
            for (name, annotation) in own {
                if !self.annotation_resolves(&module, Some(base), &annotation) {
                    tracing::debug!(class = %base.key(), %name, %annotation, "unresolvable type hint");
                    return None;
                }
                upsert(&mut merged, name, annotation);
            }
        }
        Some(merged)
    }

    /// Whether every leading name in `annotation` is defined.
    ///
    /// Names after a dot are attributes and are not checked; string literals
    /// inside the annotation (`Literal["a"]`) are skipped.
    fn annotation_resolves(&self, module: &ModuleData, class: Option<&Rc<ClassData>>, annotation: &str) -> bool {
        let stripped = QUOTED.replace_all(annotation, "");
        IDENTIFIER.find_iter(&stripped).all(|found| {
            if stripped[..found.start()].trim_end().ends_with('.') {
                return true;
            }
            let name = found.as_str();
            is_builtin_name(name)
                || self.module_attribute(module, name).is_some()
                || class.is_some_and(|class| self.own_member(class, name).is_some())
        })
    }
}

fn collect_annotations(body: &[Stmt], hints: &mut Vec<(String, String)>) {
    for stmt in body {
        match &stmt.kind {
            StmtKind::Assign {
                targets,
                annotation: Some(annotation),
                ..
            } => {
                for target in targets {
                    if let Target::Name(name) = target {
                        upsert(hints, name.clone(), annotation.clone());
                    }
                }
            }
            StmtKind::Compound { bodies } => {
                for nested in bodies {
                    collect_annotations(nested, hints);
                }
            }
            _ => {}
        }
    }
}

fn upsert(hints: &mut Vec<(String, String)>, name: String, annotation: String) {
    match hints.iter_mut().find(|(known, _)| *known == name) {
        Some((_, existing)) => *existing = annotation,
        None => hints.push((name, annotation)),
    }
}
