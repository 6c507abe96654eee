use serde::{Deserialize, Serialize};

/// How an argument binds to a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterKind {
    PositionalOnly,
    PositionalOrKeyword,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

impl ParameterKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PositionalOnly => "POSITIONAL_ONLY",
            Self::PositionalOrKeyword => "POSITIONAL_OR_KEYWORD",
            Self::VarPositional => "VAR_POSITIONAL",
            Self::KeywordOnly => "KEYWORD_ONLY",
            Self::VarKeyword => "VAR_KEYWORD",
        }
    }
}

impl std::fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parameter of a callable signature.
///
/// `annotation` and `default` are source text; `None` means the parameter
/// has no annotation or is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureParameter {
    pub kind: ParameterKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl SignatureParameter {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            kind,
            name: name.into(),
            annotation: None,
            default: None,
        }
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Annotation text, or `""` when absent.
    #[must_use]
    pub fn annotation_str(&self) -> &str {
        self.annotation.as_deref().unwrap_or_default()
    }
}

/// A callable's parameters and return annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub parameters: Vec<SignatureParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_annotation: Option<String>,
}

impl Signature {
    /// Look up a parameter by its bare name (no `*` / `**` prefix).
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&SignatureParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// The return annotation when present and non-empty.
    #[must_use]
    pub fn return_annotation(&self) -> Option<&str> {
        self.return_annotation.as_deref().filter(|a| !a.is_empty())
    }

    /// Drop the leading bound parameter (`self` / `cls`).
    #[must_use]
    pub fn without_first(mut self) -> Self {
        if !self.parameters.is_empty() {
            self.parameters.remove(0);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn serializes_like_inspect_parameters() {
        let sig = Signature {
            parameters: vec![
                SignatureParameter::new("x", ParameterKind::PositionalOrKeyword)
                    .with_annotation("int"),
                SignatureParameter::new("rest", ParameterKind::VarKeyword),
                SignatureParameter::new("y", ParameterKind::KeywordOnly).with_default("1"),
            ],
            return_annotation: Some("int".into()),
        };
        let json = serde_json::to_value(&sig).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "parameters": [
                    {"kind": "POSITIONAL_OR_KEYWORD", "name": "x", "annotation": "int"},
                    {"kind": "VAR_KEYWORD", "name": "rest"},
                    {"kind": "KEYWORD_ONLY", "name": "y", "default": "1"},
                ],
                "return_annotation": "int",
            })
        );
    }

    #[test]
    fn empty_return_annotation_is_absent() {
        let sig = Signature {
            parameters: vec![],
            return_annotation: Some(String::new()),
        };
        assert!(sig.return_annotation().is_none());
    }

    #[test]
    fn without_first_drops_bound_parameter() {
        let sig = Signature {
            parameters: vec![
                SignatureParameter::new("cls", ParameterKind::PositionalOrKeyword),
                SignatureParameter::new("value", ParameterKind::PositionalOrKeyword),
            ],
            return_annotation: None,
        };
        let sig = sig.without_first();
        assert_eq!(sig.parameters.len(), 1);
        assert_eq!(sig.parameters[0].name, "value");
    }
}
