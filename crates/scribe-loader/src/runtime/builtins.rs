//! What the runtime knows about `builtins` without a source file.

/// Members of `object` with their (already cleaned) docstrings.
const OBJECT_MEMBERS: &[(&str, &str)] = &[
    ("__class__", "type(object) -> the object's type\ntype(name, bases, dict, **kwds) -> a new type"),
    ("__delattr__", "Implement delattr(self, name)."),
    ("__dir__", "Default dir() implementation."),
    ("__eq__", "Return self==value."),
    ("__format__", "Default object formatter.\n\nReturn str(self) if format_spec is empty. Raise TypeError otherwise."),
    ("__ge__", "Return self>=value."),
    ("__getattribute__", "Return getattr(self, name)."),
    ("__getstate__", "Helper for pickle."),
    ("__gt__", "Return self>value."),
    ("__hash__", "Return hash(self)."),
    ("__init__", "Initialize self.  See help(type(self)) for accurate signature."),
    (
        "__init_subclass__",
        "This method is called when a class is subclassed.\n\nThe default implementation does nothing. It may be\noverridden to extend subclasses.",
    ),
    ("__le__", "Return self<=value."),
    ("__lt__", "Return self<value."),
    ("__ne__", "Return self!=value."),
    ("__new__", "Create and return a new object.  See help(type) for accurate signature."),
    ("__reduce__", "Helper for pickle."),
    ("__reduce_ex__", "Helper for pickle."),
    ("__repr__", "Return repr(self)."),
    ("__setattr__", "Implement setattr(self, name, value)."),
    ("__sizeof__", "Size of object in memory, in bytes."),
    ("__str__", "Return str(self)."),
    (
        "__subclasshook__",
        "Abstract classes can override this to customize issubclass().\n\nThis is invoked early on by abc.ABCMeta.__subclasscheck__().\nIt should return True, False or NotImplemented.  If it returns\nNotImplemented, the normal algorithm is used.  Otherwise, it\noverrides the normal algorithm (and the outcome is cached).",
    ),
];

/// Names always resolvable in annotations and base lists.
const BUILTIN_NAMES: &[&str] = &[
    "None", "True", "False", "Ellipsis", "NotImplemented", "object", "type", "int", "float",
    "complex", "bool", "str", "bytes", "bytearray", "memoryview", "list", "tuple", "dict", "set",
    "frozenset", "range", "slice", "property", "staticmethod", "classmethod", "super", "callable",
    "BaseException", "Exception", "ArithmeticError", "AttributeError", "ImportError",
    "IndexError", "KeyError", "LookupError", "NotImplementedError", "OSError", "RuntimeError",
    "StopIteration", "TypeError", "ValueError", "ZeroDivisionError",
];

/// Docstring of a member of the builtin `object`.
#[must_use]
pub fn object_member_doc(name: &str) -> Option<&'static str> {
    OBJECT_MEMBERS
        .iter()
        .find(|(member, _)| *member == name)
        .map(|(_, doc)| *doc)
}

#[must_use]
pub fn is_builtin_name(name: &str) -> bool {
    BUILTIN_NAMES.contains(&name)
}
