use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::CoreError;

/// Docstring dialect used to parse every docstring of a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocstringStyle {
    #[default]
    Google,
    #[serde(alias = "rst")]
    RestructuredText,
    Numpy,
    Markdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocstringOptions {
    /// Rewrite `Note:` style lines followed by an indented block into `!!! note`.
    pub replace_admonitions: bool,
    /// Strip `# doctest: +FLAG` comments and `<BLANKLINE>` markers from examples.
    pub trim_doctest_flags: bool,
}

impl Default for DocstringOptions {
    fn default() -> Self {
        Self {
            replace_admonitions: true,
            trim_doctest_flags: true,
        }
    }
}

/// The `members` option as written in a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Members {
    Enabled(bool),
    Names(Vec<String>),
}

/// How the children of the requested object are selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberSelection {
    /// Filters decide.
    Filtered,
    /// Leaf only.
    Nothing,
    /// Exact membership.
    Names(HashSet<String>),
}

impl MemberSelection {
    #[must_use]
    pub fn from_members(members: Option<&Members>) -> Self {
        match members {
            None | Some(Members::Enabled(true)) => Self::Filtered,
            Some(Members::Enabled(false)) => Self::Nothing,
            Some(Members::Names(names)) if names.is_empty() => Self::Filtered,
            Some(Members::Names(names)) => Self::Names(names.iter().cloned().collect()),
        }
    }
}

/// Options driving one loader run, after config merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    /// Ordered regex filters; a leading `!` negates.
    pub filters: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Members>,
    pub docstring_style: DocstringStyle,
    pub docstring_options: DocstringOptions,
    /// Require `module:attr.path` syntax instead of import-retry resolution.
    pub new_path_syntax: bool,
}

impl LoaderOptions {
    #[must_use]
    pub fn member_selection(&self) -> MemberSelection {
        MemberSelection::from_members(self.members.as_ref())
    }
}

/// One requested object.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObjectRequest {
    pub path: String,
    #[serde(default)]
    pub config: Map<String, Value>,
}

/// A batch request, one JSON document per input line.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Request {
    #[serde(default)]
    pub global_config: Map<String, Value>,
    pub objects: Vec<ObjectRequest>,
}

impl Request {
    /// # Errors
    ///
    /// Returns `CoreError::Json` for malformed documents.
    pub fn from_json(input: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(input)?)
    }
}
