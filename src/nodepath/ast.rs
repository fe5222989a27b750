//! Abstract syntax tree types for node paths.

use std::fmt;

/// A segment in a node path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Named object member (`name`)
    Member(String),
    /// Zero-based array position (`[0]`)
    Index(usize),
}

/// A complete node path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePath {
    /// Segments that make up the path.
    pub segments: Vec<PathSegment>,
}

impl NodePath {
    /// Creates a new node path with the given segments.
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Member(name) if i == 0 => write!(f, "{}", name)?,
                PathSegment::Member(name) => write!(f, ".{}", name)?,
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}
