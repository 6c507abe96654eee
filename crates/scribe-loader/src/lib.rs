//! # scribe-loader
//!
//! Documents Python objects without running Python.
//!
//! - [`finder`]: locates modules and packages on the search paths
//! - [`runtime`]: a static stand-in for the interpreter (imports, attribute
//!   lookup, MRO, docstrings, signatures, source) over parsed modules
//! - [`node`]: resolves a dotted or `module:attr` path into a chain of
//!   objects rooted at the defining module
//! - [`filters`]: member-name filters
//! - [`attributes`]: statically discovered attributes with their docstrings
//! - [`loader`]: builds the documented-object tree and parses its docstrings

pub mod attributes;
pub mod error;
pub mod filters;
pub mod finder;
pub mod loader;
pub mod node;
pub mod runtime;

pub use error::LoadError;
pub use filters::Filters;
pub use finder::ModuleFinder;
pub use loader::Loader;
pub use node::{NodeChain, get_object_tree};
pub use runtime::Runtime;
