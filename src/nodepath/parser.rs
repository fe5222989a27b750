//! Node path string parser.

use super::ast::{NodePath, PathSegment};
use super::error::NodePathError;

/// Parser for node path strings.
pub struct Parser {
    input: Vec<char>,
    position: usize,
}

impl Parser {
    /// Creates a new parser for the given path string.
    pub fn new(path: &str) -> Self {
        Self {
            input: path.trim().chars().collect(),
            position: 0,
        }
    }

    /// Parses the path string into a NodePath.
    pub fn parse(path: &str) -> Result<NodePath, NodePathError> {
        let mut parser = Parser::new(path);
        parser.parse_path()
    }

    fn parse_path(&mut self) -> Result<NodePath, NodePathError> {
        if self.is_eof() {
            return Err(NodePathError::Empty);
        }

        let mut segments = Vec::new();
        self.parse_token(&mut segments)?;

        while let Some(ch) = self.peek() {
            if ch != '.' {
                return Err(self.unexpected(ch, "'.' or '['"));
            }
            self.next();
            self.parse_token(&mut segments)?;
        }

        Ok(NodePath::new(segments))
    }

    /// Parses `identifier ("[" integer "]")*`.
    fn parse_token(&mut self, segments: &mut Vec<PathSegment>) -> Result<(), NodePathError> {
        let name = self.parse_identifier()?;
        segments.push(PathSegment::Member(name));

        while self.peek() == Some('[') {
            self.next();
            let idx = self.parse_index()?;
            self.expect_close()?;
            segments.push(PathSegment::Index(idx));
        }
        Ok(())
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        Some(ch)
    }

    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Error for `found` at the current position.
    fn unexpected(&self, found: char, expected: &'static str) -> NodePathError {
        NodePathError::UnexpectedChar {
            column: self.position + 1,
            found,
            expected,
        }
    }

    /// Error for whatever is at the current position, or for running out.
    fn missing(&self, expected: &'static str) -> NodePathError {
        match self.peek() {
            Some(ch) => self.unexpected(ch, expected),
            None => NodePathError::Truncated { expected },
        }
    }

    fn expect_close(&mut self) -> Result<(), NodePathError> {
        if self.peek() == Some(']') {
            self.next();
            Ok(())
        } else {
            Err(self.missing("a closing ']'"))
        }
    }

    fn parse_identifier(&mut self) -> Result<String, NodePathError> {
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || matches!(ch, '_' | '-' | '$' | '@') {
                name.push(ch);
                self.next();
            } else {
                break;
            }
        }
        if name.is_empty() {
            return Err(self.missing("a member name"));
        }
        Ok(name)
    }

    /// Parses the digits of a non-negative index inside brackets.
    fn parse_index(&mut self) -> Result<usize, NodePathError> {
        let mut digits = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                self.next();
            } else {
                break;
            }
        }
        if digits.is_empty() {
            return Err(self.missing("an array index"));
        }
        digits
            .parse::<usize>()
            .map_err(|_| NodePathError::IndexOverflow { digits })
    }
}
