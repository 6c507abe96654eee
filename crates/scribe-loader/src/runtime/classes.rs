//! Class bodies and method resolution order.

use std::rc::Rc;

use scribe_parser::{FunctionDef, Stmt, StmtKind, Target, decorator_matches};

use super::builtins::object_member_doc;
use super::objects::{
    ClassData, ClassRef, FunctionData, FunctionKind, PropertyData, PyObject, VariableData,
};
use super::Runtime;

impl Runtime {
    /// A class's own namespace in declaration order.
    ///
    /// Decorators decide what a `def` becomes: `staticmethod`, `classmethod`,
    /// or a property for `property` and `cached_property`. Setter and deleter
    /// definitions extend the property declared before them.
    #[must_use]
    pub fn class_dict(&self, class: &Rc<ClassData>) -> Vec<(String, PyObject)> {
        let mut members = Vec::new();
        collect_members(class, &class.def.body, &class.def.body, true, &mut members);
        members
    }

    pub(super) fn own_member(&self, class: &Rc<ClassData>, name: &str) -> Option<PyObject> {
        self.class_dict(class)
            .into_iter()
            .find(|(member, _)| member == name)
            .map(|(_, object)| object)
    }

    /// Own namespace first, then the bases in MRO order.
    pub(super) fn class_attribute(&self, class: &Rc<ClassData>, name: &str) -> Option<PyObject> {
        self.mro(class).iter().find_map(|base| self.defined_in(base, name))
    }

    /// The attribute `name` as defined by one MRO entry, if it defines it.
    fn defined_in(&self, base: &ClassRef, name: &str) -> Option<PyObject> {
        match base {
            ClassRef::Class(class) => self.own_member(class, name),
            ClassRef::Object => {
                object_member_doc(name).map(|_| PyObject::External(format!("object.{name}")))
            }
            ClassRef::External(_) => None,
        }
    }

    /// The first class after `class` in its MRO that defines `name`, with
    /// that definition.
    #[must_use]
    pub fn inherited_member(&self, class: &Rc<ClassData>, name: &str) -> Option<PyObject> {
        self.mro(class)
            .iter()
            .skip(1)
            .find_map(|base| self.defined_in(base, name))
    }

    /// C3 linearization of a class and its bases, ending with `object`.
    ///
    /// Bases the runtime cannot see into are kept as opaque entries; an
    /// inconsistent hierarchy falls back to depth-first order.
    #[must_use]
    pub fn mro(&self, class: &Rc<ClassData>) -> Rc<[ClassRef]> {
        let key = class.key();
        if let Some(mro) = self.mros.borrow().get(&key) {
            return Rc::clone(mro);
        }
        let Some(guard) = self.guard(format!("mro:{key}")) else {
            return Rc::from(vec![ClassRef::Class(Rc::clone(class)), ClassRef::Object]);
        };

        let bases = self.bases(class);
        let mut sequences: Vec<Vec<ClassRef>> = bases
            .iter()
            .map(|base| match base {
                ClassRef::Class(base) => self.mro(base).to_vec(),
                ClassRef::Object => vec![ClassRef::Object],
                ClassRef::External(name) => vec![ClassRef::External(name.clone()), ClassRef::Object],
            })
            .collect();
        sequences.push(bases);

        let mut mro = vec![ClassRef::Class(Rc::clone(class))];
        match c3_merge(sequences.clone()) {
            Some(rest) => mro.extend(rest),
            None => {
                tracing::debug!(class = %key, "inconsistent hierarchy, using depth-first order");
                for entry in sequences.into_iter().flatten() {
                    if entry != ClassRef::Object && !mro.contains(&entry) {
                        mro.push(entry);
                    }
                }
                mro.push(ClassRef::Object);
            }
        }
        drop(guard);

        let mro: Rc<[ClassRef]> = Rc::from(mro);
        self.mros.borrow_mut().insert(key, Rc::clone(&mro));
        mro
    }

    /// Resolved bases; subscripts (`Generic[T]`) are dropped, and a class
    /// without bases derives from `object`.
    fn bases(&self, class: &ClassData) -> Vec<ClassRef> {
        let module = self.import_module(&class.module).ok();
        let bases: Vec<ClassRef> = class
            .def
            .bases
            .iter()
            .map(|base| {
                let dotted = base.split('[').next().unwrap_or(base).trim();
                if dotted == "object" {
                    return ClassRef::Object;
                }
                match module
                    .as_ref()
                    .and_then(|module| self.resolve_dotted(module, dotted))
                {
                    Some(PyObject::Class(base)) => ClassRef::Class(base),
                    Some(PyObject::External(name)) if name == "object" => ClassRef::Object,
                    Some(PyObject::External(name)) => ClassRef::External(name),
                    _ => ClassRef::External(dotted.to_string()),
                }
            })
            .collect();
        if bases.is_empty() {
            vec![ClassRef::Object]
        } else {
            bases
        }
    }
}

fn c3_merge(mut sequences: Vec<Vec<ClassRef>>) -> Option<Vec<ClassRef>> {
    let mut merged = Vec::new();
    loop {
        sequences.retain(|sequence| !sequence.is_empty());
        if sequences.is_empty() {
            return Some(merged);
        }
        let head = sequences
            .iter()
            .map(|sequence| &sequence[0])
            .find(|candidate| {
                !sequences
                    .iter()
                    .any(|sequence| sequence[1..].contains(candidate))
            })?
            .clone();
        for sequence in &mut sequences {
            if sequence[0] == head {
                sequence.remove(0);
            }
        }
        merged.push(head);
    }
}

fn collect_members(
    class: &Rc<ClassData>,
    class_body: &[Stmt],
    body: &[Stmt],
    overwrite: bool,
    members: &mut Vec<(String, PyObject)>,
) {
    for stmt in body {
        let lines = (stmt.line_start, stmt.line_end);
        match &stmt.kind {
            StmtKind::FunctionDef(def) => {
                if is_accessor(def) {
                    continue;
                }
                let kind = if def.has_decorator("staticmethod") {
                    FunctionKind::StaticMethod
                } else if def.has_decorator("classmethod") {
                    FunctionKind::ClassMethod
                } else {
                    FunctionKind::Plain
                };
                let function = Rc::new(FunctionData {
                    module: class.module.clone(),
                    qualname: format!("{}.{}", class.qualname, def.name),
                    def: def.clone(),
                    kind,
                    lines,
                    owner: Some(Rc::clone(class)),
                });
                let object = if def.has_decorator("property") || def.has_decorator("cached_property") {
                    PyObject::Property(Rc::new(PropertyData {
                        has_setter: has_setter(class_body, &def.name),
                        fget: function,
                    }))
                } else {
                    PyObject::Function(function)
                };
                insert(members, &def.name, object, overwrite);
            }
            StmtKind::ClassDef(def) => {
                let nested = ClassData {
                    module: class.module.clone(),
                    qualname: format!("{}.{}", class.qualname, def.name),
                    def: def.clone(),
                    lines,
                };
                insert(members, &def.name, PyObject::Class(Rc::new(nested)), overwrite);
            }
            StmtKind::Assign {
                targets,
                annotation,
                value: Some(value),
            } => {
                for target in targets {
                    if let Target::Name(name) = target {
                        let variable = VariableData {
                            name: name.clone(),
                            module: class.module.clone(),
                            annotation: annotation.clone(),
                            value: Some(value.clone()),
                        };
                        insert(members, name, PyObject::Variable(Rc::new(variable)), overwrite);
                    }
                }
            }
            StmtKind::Compound { bodies } => {
                for (index, nested) in bodies.iter().enumerate() {
                    collect_members(class, class_body, nested, overwrite && index == 0, members);
                }
            }
            _ => {}
        }
    }
}

/// Replace in place, keeping the first position like a Python dict.
fn insert(members: &mut Vec<(String, PyObject)>, name: &str, object: PyObject, overwrite: bool) {
    match members.iter_mut().find(|(member, _)| member == name) {
        Some((_, existing)) if overwrite => *existing = object,
        Some(_) => {}
        None => members.push((name.to_string(), object)),
    }
}

/// `@x.setter` / `@x.deleter` on a `def x`.
fn is_accessor(def: &FunctionDef) -> bool {
    decorator_matches(&def.decorators, "setter") || decorator_matches(&def.decorators, "deleter")
}

fn has_setter(class_body: &[Stmt], name: &str) -> bool {
    let setter = format!("{name}.setter");
    class_body.iter().any(|stmt| match &stmt.kind {
        StmtKind::FunctionDef(def) => def.decorators.iter().any(|decorator| *decorator == setter),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn external(name: &str) -> ClassRef {
        ClassRef::External(name.into())
    }

    #[test]
    fn c3_merges_diamonds() {
        // class B(A), class C(A), class D(B, C)
        let (a, b, c) = (external("A"), external("B"), external("C"));
        let merged = c3_merge(vec![
            vec![b.clone(), a.clone(), ClassRef::Object],
            vec![c.clone(), a.clone(), ClassRef::Object],
            vec![b.clone(), c.clone()],
        ])
        .unwrap();
        assert_eq!(merged, vec![b, c, a, ClassRef::Object]);
    }

    #[test]
    fn c3_rejects_inconsistent_orders() {
        let (a, b) = (external("A"), external("B"));
        assert!(c3_merge(vec![vec![a.clone(), b.clone()], vec![b, a]]).is_none());
    }
}
