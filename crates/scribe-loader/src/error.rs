//! Loader error types for scribe-loader.

/// Fatal conditions: the requested object cannot be documented at all.
///
/// Problems with one member of an otherwise loadable tree are not errors;
/// they end up in [`Loader::errors`](crate::Loader::errors).
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Empty path, or a colon path with an empty module part.
    #[error("path must be a valid Python path, not '{0}'")]
    InvalidPath(String),

    /// No prefix of the path could be imported, or the module does not parse.
    #[error("could not import '{module}': {reason}")]
    Import { module: String, reason: String },

    /// A segment after the imported module is missing.
    #[error("'{parent}' has no attribute '{name}'")]
    Attribute { parent: String, name: String },

    /// The path resolved to something that is neither documentable nor a
    /// known attribute.
    #[error("{path}: {kind} not yet supported")]
    NotSupported { path: String, kind: String },

    /// A member filter is not a valid regular expression.
    #[error("invalid filter '{pattern}': {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A search path cannot be made absolute.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
