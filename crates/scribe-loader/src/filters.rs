//! Member selection.

use std::cell::RefCell;
use std::collections::HashMap;

use regex::Regex;
use scribe_core::MemberSelection;

use crate::error::LoadError;

/// Ordered name filters; `!pattern` excludes what `pattern` matches.
///
/// The last filter matching a name decides, and names no filter matches are
/// kept. Patterns match anywhere in the name, so anchor them when needed.
/// Decisions are cached per name for the life of the value.
#[derive(Debug, Default)]
pub struct Filters {
    filters: Vec<(bool, Regex)>,
    decisions: RefCell<HashMap<String, bool>>,
}

impl Filters {
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidFilter`] for the first pattern that does
    /// not compile.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, LoadError> {
        let filters = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                let (negated, body) = pattern
                    .strip_prefix('!')
                    .map_or((false, pattern), |rest| (true, rest));
                Regex::new(body)
                    .map(|regex| (negated, regex))
                    .map_err(|source| LoadError::InvalidFilter {
                        pattern: pattern.to_string(),
                        source,
                    })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self {
            filters,
            decisions: RefCell::new(HashMap::new()),
        })
    }

    /// Whether the filters keep `name`.
    #[must_use]
    pub fn keep(&self, name: &str) -> bool {
        if let Some(&keep) = self.decisions.borrow().get(name) {
            return keep;
        }
        let keep = self
            .filters
            .iter()
            .fold(true, |keep, (negated, regex)| {
                if regex.is_match(name) { !negated } else { keep }
            });
        self.decisions.borrow_mut().insert(name.to_string(), keep);
        keep
    }

    /// Apply a member selection: explicit names are exact, otherwise filters decide.
    #[must_use]
    pub fn select(&self, name: &str, selection: &MemberSelection) -> bool {
        match selection {
            MemberSelection::Names(names) => names.contains(name),
            MemberSelection::Filtered => self.keep(name),
            MemberSelection::Nothing => false,
        }
    }
}
