//! Request-side types handed to middleware and handlers:
//! - `Request`: the immutable incoming request, as produced by the transport
//! - `PathParams`: parameters extracted from the request path

use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;

/// The incoming request. Whoever owns the listener builds it and passes it to
/// [`Router::handle`](crate::Router::handle).
pub type Request = http::Request<Bytes>;

/// Represents path parameters extracted from the URL path of an HTTP request.
///
/// For the pattern `/users/:id` and the path `/users/42`, `id` maps to `"42"`. A trailing
/// `*` binds the rest of the path to the key `*`.
///
/// Cloning is cheap; the map is shared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    inner: Arc<HashMap<String, String>>,
}

impl PathParams {
    /// Creates an empty PathParams instance with no parameters
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if there are no path parameters
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of path parameters
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Gets the value of a path parameter by its name
    #[inline]
    pub fn get(&self, key: impl AsRef<str>) -> Option<&str> {
        self.inner.get(key.as_ref()).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.inner
    }
}

impl From<HashMap<String, String>> for PathParams {
    fn from(params: HashMap<String, String>) -> Self {
        Self { inner: Arc::new(params) }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for PathParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().map(|(key, value)| (key.into(), value.into())).collect::<HashMap<_, _>>().into()
    }
}

#[cfg(test)]
mod tests {
    use super::PathParams;

    #[test]
    fn test_empty() {
        let params = PathParams::empty();
        assert!(params.is_empty());
        assert_eq!(params.len(), 0);
        assert_eq!(params.get("id"), None);
    }

    #[test]
    fn test_from_pairs() {
        let params = PathParams::from([("a", "aa"), ("b", "bb")]);
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("a"), Some("aa"));
        assert_eq!(params, PathParams::from([("b", "bb"), ("a", "aa")]));
    }
}
