use scribe_core::{ParameterKind, Signature, SignatureParameter};

use super::*;

mod markdown;

const PATH: &str = "pkg.module.f";

/// `(x: int, y: int) -> int`
fn add_signature() -> Signature {
    Signature {
        parameters: vec![
            SignatureParameter::new("x", ParameterKind::PositionalOrKeyword).with_annotation("int"),
            SignatureParameter::new("y", ParameterKind::PositionalOrKeyword).with_annotation("int"),
        ],
        return_annotation: Some("int".to_string()),
    }
}

/// `(a, *args, flag: bool = False, **kwargs)` without a return annotation.
fn loose_signature() -> Signature {
    Signature {
        parameters: vec![
            SignatureParameter::new("a", ParameterKind::PositionalOrKeyword),
            SignatureParameter::new("args", ParameterKind::VarPositional),
            SignatureParameter::new("flag", ParameterKind::KeywordOnly)
                .with_annotation("bool")
                .with_default("False"),
            SignatureParameter::new("kwargs", ParameterKind::VarKeyword),
        ],
        return_annotation: None,
    }
}

fn parse_with(parser: &dyn DocstringParser, docstring: &str, signature: Option<&Signature>) -> (Vec<Section>, Vec<String>) {
    parser.parse(docstring, &ParseContext::new(PATH).with_signature(signature))
}
