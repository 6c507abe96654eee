//! Statically discovered attributes of a module and its classes.
//!
//! Documented assignments and type hints are combined per module and per
//! class (instance attributes of `__init__` included), and turned into
//! attribute objects carrying their own dotted paths. The loader later hangs
//! them under whatever node has their parent path.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use scribe_core::{DocumentedObject, ObjectKind, Source};
use scribe_parser::{AttributeTable, StmtKind, documented_attributes, instance_attributes};

use crate::runtime::{ClassData, ModuleData, PyObject, Runtime};

/// Memoized attribute scans, keyed by module name.
#[derive(Debug, Default)]
pub struct AttributeScanner {
    scans: RefCell<HashMap<String, Rc<[DocumentedObject]>>>,
}

impl AttributeScanner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes of `module` and of every class it defines, nested ones included.
    pub fn module_attributes(&self, runtime: &Runtime, module: &Rc<ModuleData>) -> Rc<[DocumentedObject]> {
        if let Some(scan) = self.scans.borrow().get(module.name()) {
            return Rc::clone(scan);
        }
        let mut found = Vec::new();
        let mut table = documented_attributes(&module.ast.body);
        if let Some(hints) = runtime.module_type_hints(module) {
            table = table.with_type_hints(&hints);
        }
        push_attributes(&mut found, module, module.name(), table);

        for (name, object) in runtime.members(module) {
            if let PyObject::Class(class) = object
                && class.module == module.name()
                && class.qualname == name
            {
                scan_class(runtime, module, &class, &mut found);
            }
        }
        tracing::debug!(module = module.name(), count = found.len(), "scanned attributes");

        let scan: Rc<[DocumentedObject]> = Rc::from(found);
        self.scans
            .borrow_mut()
            .insert(module.name().to_string(), Rc::clone(&scan));
        scan
    }
}

fn scan_class(runtime: &Runtime, module: &ModuleData, class: &Rc<ClassData>, found: &mut Vec<DocumentedObject>) {
    let mut table = documented_attributes(&class.def.body);
    if let Some(hints) = runtime.class_type_hints(class) {
        table = table.with_type_hints(&hints);
    }
    let init = class.def.body.iter().find_map(|stmt| match &stmt.kind {
        StmtKind::FunctionDef(def) if def.name == "__init__" => Some(def),
        _ => None,
    });
    if let Some(init) = init {
        table.merge(instance_attributes(&init.body));
    }
    let prefix = format!("{}.{}", module.name(), class.qualname);
    push_attributes(found, module, &prefix, table);

    for (_, member) in runtime.class_dict(class) {
        if let PyObject::Class(nested) = member {
            scan_class(runtime, module, &nested, found);
        }
    }
}

fn push_attributes(found: &mut Vec<DocumentedObject>, module: &ModuleData, prefix: &str, table: AttributeTable) {
    for (name, info) in table {
        let source = info.lines.map(|(start, end)| Source {
            code: module.ast.lines(start, end),
            line_start: start,
        });
        let attribute = DocumentedObject::new(
            name.clone(),
            format!("{prefix}.{name}"),
            module.file_path(),
            ObjectKind::Attribute {
                type_annotation: info.annotation.unwrap_or_default(),
            },
        )
        .with_docstring(info.docstring.unwrap_or_default())
        .with_source(source);
        found.push(attribute);
    }
}
