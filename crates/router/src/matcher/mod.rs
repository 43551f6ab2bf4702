//! Path matching consumed by the router.
//!
//! Pattern syntax:
//! - a literal segment matches exactly
//! - `:name` matches any single non-empty segment and binds it to `name`
//! - a trailing `*` matches the rest of the path (zero or more segments, joined by `/`)
//!   and binds it to the key `*`
//!
//! When several patterns could match a path, the most specific one wins: static segments
//! beat parameters, and parameters beat the wildcard.
//!
//! # Example
//! ```
//! use http::Method;
//! use micro_router::matcher::{MethodMatcher, PathMatcher};
//!
//! let mut matcher = MethodMatcher::new();
//! matcher.register(Method::GET, "/foo/:bar/*", "files").unwrap();
//!
//! let matched = matcher.find(&Method::GET, "/foo/x/aa/bb").unwrap();
//! assert_eq!(*matched.payload(), "files");
//! assert_eq!(matched.params().get("bar"), Some("x"));
//! assert_eq!(matched.params().get("*"), Some("aa/bb"));
//! ```

mod pattern;
mod tree;

pub use pattern::join_path;
pub use pattern::normalize_path;
pub use tree::PathTree;

use crate::error::PatternError;
use crate::request::PathParams;
use http::Method;
use std::collections::HashMap;

/// The contract between the router and whatever maps `(method, path)` to a payload.
pub trait PathMatcher<T> {
    /// Registers `payload` for `method` and `pattern`, replacing any previous payload
    /// registered for the same pair.
    ///
    /// # Errors
    /// Fails when `pattern` is malformed.
    fn register(&mut self, method: Method, pattern: &str, payload: T) -> Result<(), PatternError>;

    /// Returns the best match for `method` and `path` together with the bound parameters.
    fn find(&self, method: &Method, path: &str) -> Option<Matched<'_, T>>;
}

/// A successful lookup: the registered payload and the parameters extracted from the path.
#[derive(Debug)]
pub struct Matched<'m, T> {
    payload: &'m T,
    params: PathParams,
}

impl<'m, T> Matched<'m, T> {
    pub(crate) fn new(payload: &'m T, params: PathParams) -> Self {
        Self { payload, params }
    }

    pub fn payload(&self) -> &'m T {
        self.payload
    }

    pub fn params(&self) -> &PathParams {
        &self.params
    }

    pub fn into_params(self) -> PathParams {
        self.params
    }
}

/// One [`PathTree`] per HTTP method.
#[derive(Debug)]
pub struct MethodMatcher<T> {
    trees: HashMap<Method, PathTree<T>>,
}

impl<T> MethodMatcher<T> {
    pub fn new() -> Self {
        Self { trees: HashMap::new() }
    }
}

impl<T> Default for MethodMatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PathMatcher<T> for MethodMatcher<T> {
    fn register(&mut self, method: Method, pattern: &str, payload: T) -> Result<(), PatternError> {
        self.trees.entry(method).or_default().insert(pattern, payload).map(|_replaced| ())
    }

    fn find(&self, method: &Method, path: &str) -> Option<Matched<'_, T>> {
        self.trees.get(method)?.at(path)
    }
}

#[cfg(test)]
mod tests {
    use super::{MethodMatcher, PathMatcher};
    use http::Method;

    #[test]
    fn test_methods_are_independent() {
        let mut matcher = MethodMatcher::new();
        matcher.register(Method::GET, "/", "get").unwrap();
        matcher.register(Method::POST, "/", "post").unwrap();

        assert_eq!(*matcher.find(&Method::GET, "/").unwrap().payload(), "get");
        assert_eq!(*matcher.find(&Method::POST, "/").unwrap().payload(), "post");
        assert!(matcher.find(&Method::PUT, "/").is_none());
    }

    #[test]
    fn test_last_registration_wins() {
        let mut matcher = MethodMatcher::new();
        matcher.register(Method::GET, "/a", 1).unwrap();
        matcher.register(Method::GET, "/a/", 2).unwrap();

        assert_eq!(*matcher.find(&Method::GET, "/a").unwrap().payload(), 2);
    }

    #[test]
    fn test_register_rejects_malformed() {
        let mut matcher = MethodMatcher::new();
        assert!(matcher.register(Method::GET, "/:/x", ()).is_err());
        assert!(matcher.find(&Method::GET, "/a/x").is_none());
    }
}
