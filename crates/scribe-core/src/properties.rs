//! Name-shape properties.
//!
//! Python naming conventions carry meaning: `_name` is private, `__name` is
//! class-private (mangled), and `__name__` is special (a protocol hook).
//! These pure predicates map an identifier to those tags.

/// Tag for `__dunder__` names.
pub const SPECIAL: &str = "special";
/// Tag for `__mangled` names.
pub const CLASS_PRIVATE: &str = "class-private";
/// Tag for `_private` names.
pub const PRIVATE: &str = "private";

/// Exactly two leading and two trailing underscores, with at least one
/// non-underscore character right after the prefix and right before the suffix.
#[must_use]
pub fn is_special(name: &str) -> bool {
    let Some(inner) = name
        .strip_prefix("__")
        .and_then(|rest| rest.strip_suffix("__"))
    else {
        return false;
    };
    !inner.is_empty() && !inner.starts_with('_') && !inner.ends_with('_') && is_word(inner)
}

/// At least two leading underscores and at most one trailing underscore.
#[must_use]
pub fn is_class_private(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("__") else {
        return false;
    };
    let body = rest.strip_suffix('_').unwrap_or(rest);
    !body.is_empty() && !body.ends_with('_') && is_word(rest)
}

/// One leading underscore followed by a non-underscore.
#[must_use]
pub fn is_private(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next() == Some('_')
        && chars.next().is_some_and(|c| c != '_' && is_word_char(c))
        && chars.all(is_word_char)
}

/// Which name predicates apply to an object category, in tag order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRule {
    Special,
    ClassPrivate,
    Private,
}

impl NameRule {
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Special => SPECIAL,
            Self::ClassPrivate => CLASS_PRIVATE,
            Self::Private => PRIVATE,
        }
    }

    #[must_use]
    pub fn applies_to(self, name: &str) -> bool {
        match self {
            Self::Special => is_special(name),
            Self::ClassPrivate => is_class_private(name),
            Self::Private => is_private(name),
        }
    }
}

/// Collect the tags of every rule matching `name`.
#[must_use]
pub fn name_properties(rules: &[NameRule], name: &str) -> Vec<&'static str> {
    rules
        .iter()
        .filter(|rule| rule.applies_to(name))
        .map(|rule| rule.tag())
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_word(s: &str) -> bool {
    s.chars().all(is_word_char)
}
