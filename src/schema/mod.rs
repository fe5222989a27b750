//! JSON Schema validation of documents.
//!
//! A [`SchemaDocument`] is the schema plus the URI that relative `$ref`s are
//! resolved against. Inline schemas have no such URI; schemas loaded from
//! a file use the file's own `file://` URI. [`SchemaValidator`] delegates the
//! actual schema semantics to the `jsonschema` crate and reports every
//! violation it finds.

pub mod document;
pub mod validator;

pub use document::SchemaDocument;
pub use validator::{FileRetriever, SchemaValidator, Violation};
