//! Negation of steps.

use crate::error::{Error, Result};

/// Runs `check` and inverts its outcome.
///
/// * `check` failed with an error `is_expected` accepts: success.
/// * `check` passed: fails with [`Error::AssertionMismatch`] carrying
///   `message`, which should describe what the positive check found.
/// * `check` failed any other way: that error is returned unchanged, so an
///   invalid body or a broken schema still fails the negated step.
///
/// ```
/// use jsonsteps::steps::invert;
/// use jsonsteps::{Error, Result};
///
/// let missing = || -> Result<()> { Err(Error::NodeNotFound { node: "a".into() }) };
/// assert!(invert(missing, Error::is_node_not_found, "The node 'a' exists.").is_ok());
///
/// let present = || -> Result<()> { Ok(()) };
/// let err = invert(present, Error::is_node_not_found, "The node 'a' exists.").unwrap_err();
/// assert_eq!(err.to_string(), "The node 'a' exists.");
/// ```
pub fn invert<T, F, P>(check: F, is_expected: P, message: impl Into<String>) -> Result<()>
where
    F: FnOnce() -> Result<T>,
    P: Fn(&Error) -> bool,
{
    match check() {
        Ok(_) => Err(Error::AssertionMismatch(message.into())),
        Err(e) if is_expected(&e) => {
            log::debug!("negated step passed: {}", e);
            Ok(())
        }
        Err(e) => Err(e),
    }
}
