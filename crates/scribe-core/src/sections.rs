use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::signature::ParameterKind;

/// An annotation paired with prose, used for exceptions and return values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedObject {
    pub description: String,
    /// Annotation text; empty when unknown.
    pub annotation: String,
}

impl AnnotatedObject {
    #[must_use]
    pub fn new(annotation: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            annotation: annotation.into(),
        }
    }
}

/// A documented parameter, merged from docstring text and the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub annotation: String,
    pub description: String,
    /// `None` when the parameter was not found in the signature.
    pub kind: Option<ParameterKind>,
    /// Default value source text; `None` when the parameter is required.
    pub default: Option<String>,
}

impl Parameter {
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.default.is_some()
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        !self.is_optional()
    }

    #[must_use]
    pub fn is_args(&self) -> bool {
        self.kind == Some(ParameterKind::VarPositional)
    }

    #[must_use]
    pub fn is_kwargs(&self) -> bool {
        self.kind == Some(ParameterKind::VarKeyword)
    }

    #[must_use]
    pub fn default_string(&self) -> String {
        if self.is_kwargs() {
            "{}".to_string()
        } else if self.is_args() {
            "()".to_string()
        } else {
            self.default.clone().unwrap_or_default()
        }
    }
}

impl Serialize for Parameter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Parameter", 9)?;
        state.serialize_field("description", &self.description)?;
        state.serialize_field("annotation", &self.annotation)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("default", &self.default_string())?;
        state.serialize_field("is_optional", &self.is_optional())?;
        state.serialize_field("is_required", &self.is_required())?;
        state.serialize_field("is_args", &self.is_args())?;
        state.serialize_field("is_kwargs", &self.is_kwargs())?;
        state.end()
    }
}

/// One entry of an Attributes section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeItem {
    pub name: String,
    pub annotation: String,
    pub description: String,
}

/// Sub-block kind inside an Examples section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExampleKind {
    /// Prose between doctests.
    Markdown,
    /// A `>>>` doctest block.
    Examples,
}

/// A typed chunk of a parsed docstring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Section {
    Markdown(String),
    Parameters(Vec<Parameter>),
    KeywordArgs(Vec<Parameter>),
    Exceptions(Vec<AnnotatedObject>),
    Return(AnnotatedObject),
    Yield(AnnotatedObject),
    Attributes(Vec<AttributeItem>),
    Examples(Vec<(ExampleKind, String)>),
}

impl Section {
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Markdown(_) => "markdown",
            Self::Parameters(_) => "parameters",
            Self::KeywordArgs(_) => "keyword_args",
            Self::Exceptions(_) => "exceptions",
            Self::Return(_) => "return",
            Self::Yield(_) => "yield",
            Self::Attributes(_) => "attributes",
            Self::Examples(_) => "examples",
        }
    }
}
