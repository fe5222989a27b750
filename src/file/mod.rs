//! File I/O for response bodies and schemas.
//!
//! Captured bodies and schema files may be stored gzip-compressed; the loader
//! decompresses `.gz` files transparently.

pub mod loader;
