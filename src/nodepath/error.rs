use std::fmt;

/// Why a node path could not be parsed.
///
/// Columns are 1-based and count characters of the trimmed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodePathError {
    Empty,
    /// A character that cannot appear where it was found.
    UnexpectedChar {
        column: usize,
        found: char,
        expected: &'static str,
    },
    /// The path stops in the middle of a segment, e.g. `a.` or `a[1`.
    Truncated { expected: &'static str },
    IndexOverflow { digits: String },
}

impl fmt::Display for NodePathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodePathError::Empty => f.write_str("the node path is empty"),
            NodePathError::UnexpectedChar {
                column,
                found,
                expected,
            } => write!(
                f,
                "'{}' at column {} of the node path, expected {}",
                found, column, expected
            ),
            NodePathError::Truncated { expected } => {
                write!(f, "the node path ends where {} should follow", expected)
            }
            NodePathError::IndexOverflow { digits } => {
                write!(f, "array index [{}] is too large", digits)
            }
        }
    }
}

impl std::error::Error for NodePathError {}
