//! Parsed JSON documents.
//!
//! A [`JsonDocument`] is built once per step from the captured response body
//! and never changes afterwards.

pub mod tree;

pub use tree::JsonDocument;
