use serde_json::Value;

use super::ast::{NodePath, PathSegment};

/// Name under which a path may address the document itself.
pub const ROOT_ALIAS: &str = "root";

pub struct PathEvaluator<'a> {
    root: &'a Value,
}

impl<'a> PathEvaluator<'a> {
    pub fn new(root: &'a Value) -> Self {
        PathEvaluator { root }
    }

    /// Walks the path from the root and returns the addressed value, or
    /// `None` as soon as a segment does not resolve.
    ///
    /// Only an object or array root can be walked. A scalar document
    /// resolves nothing, not even `root`.
    pub fn resolve(&self, path: &NodePath) -> Option<&'a Value> {
        if !(self.root.is_object() || self.root.is_array()) {
            return None;
        }

        let mut segments = path.segments.as_slice();
        if let Some(PathSegment::Member(name)) = segments.first() {
            if name == ROOT_ALIAS && self.root.get(ROOT_ALIAS).is_none() {
                segments = &segments[1..];
            }
        }

        let mut current = self.root;
        for segment in segments {
            current = match segment {
                PathSegment::Member(name) => self.find_member(current, name)?,
                PathSegment::Index(idx) => self.get_array_element(current, *idx)?,
            };
        }
        Some(current)
    }

    fn find_member(&self, node: &'a Value, name: &str) -> Option<&'a Value> {
        match node {
            Value::Object(members) => members.get(name),
            _ => None,
        }
    }

    fn get_array_element(&self, node: &'a Value, idx: usize) -> Option<&'a Value> {
        match node {
            Value::Array(items) => items.get(idx),
            _ => None,
        }
    }
}
