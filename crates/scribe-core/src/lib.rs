//! # scribe-core
//!
//! Core types and error types for scribe.
//!
//! This crate provides the foundational types shared across all scribe crates:
//! - The documented-object tree (modules, classes, functions, methods, attributes)
//! - Parsed docstring sections and their building blocks
//! - Callable signatures
//! - Name-shape properties (`private`, `class-private`, `special`)
//! - Request and response documents exchanged with callers
//! - The serializer flattening a tree into its JSON contract

pub mod errors;
pub mod objects;
pub mod properties;
pub mod request;
pub mod responses;
pub mod sections;
pub mod serializer;
pub mod signature;

pub use errors::CoreError;
pub use objects::{DocumentedObject, ObjectCategory, ObjectId, ObjectKind, ObjectTree, Source};
pub use request::{
    DocstringOptions, DocstringStyle, LoaderOptions, MemberSelection, Members, ObjectRequest, Request,
};
pub use responses::{ErrorResponse, Response};
pub use sections::{AnnotatedObject, AttributeItem, ExampleKind, Parameter, Section};
pub use signature::{ParameterKind, Signature, SignatureParameter};
