//! The value threaded through the middleware chain.
//!
//! A [`Context`] is created fresh for every step: the request, the matched route and the
//! path parameters are carried over, while the locals are whatever the previous step
//! passed to [`Next::run`](crate::middleware::Next::run). Nothing in it is shared with
//! other in-flight requests.

use crate::locals::Locals;
use crate::request::{PathParams, Request};
use http::{HeaderMap, Method, Uri, Version};
use serde::Deserialize;
use std::sync::Arc;

/// Represents the context of an HTTP request as seen by one middleware or the handler.
#[derive(Debug)]
pub struct Context<L = Locals> {
    request: Arc<Request>,
    matched_route: Option<Arc<str>>,
    locals: L,
    params: PathParams,
}

impl<L> Context<L> {
    pub(crate) fn new(request: Arc<Request>, matched_route: Option<Arc<str>>, locals: L, params: PathParams) -> Self {
        Self { request, matched_route, locals, params }
    }

    /// Returns a reference to the underlying request
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Returns the HTTP method of the request
    pub fn method(&self) -> &Method {
        self.request.method()
    }

    /// Returns the URI of the request
    pub fn uri(&self) -> &Uri {
        self.request.uri()
    }

    /// Returns the HTTP version of the request
    pub fn version(&self) -> Version {
        self.request.version()
    }

    /// Returns the HTTP headers of the request
    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    /// The pattern of the route that matched, as it was registered, or `None` when the
    /// request is being dispatched to the not-found fallback.
    pub fn matched_route(&self) -> Option<&str> {
        self.matched_route.as_deref()
    }

    pub fn locals(&self) -> &L {
        &self.locals
    }

    pub fn into_locals(self) -> L {
        self.locals
    }

    /// Returns the path parameters.
    ///
    /// Before the handler runs these come from the base path of the router node that
    /// supplied the middleware; the handler sees the parameters of its own route.
    pub fn params(&self) -> &PathParams {
        &self.params
    }

    /// Shortcut for `self.params().get(name)`
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Deserializes the URL query string. A request without one is treated as having an
    /// empty query string.
    ///
    /// # Errors
    /// Returns the `serde_qs` error when the query does not fit `T`.
    pub fn query<T>(&self) -> Result<T, serde_qs::Error>
    where
        T: for<'de> Deserialize<'de>,
    {
        serde_qs::from_str::<T>(self.uri().query().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::Context;
    use crate::request::PathParams;
    use crate::Locals;
    use bytes::Bytes;
    use http::Request;
    use serde::Deserialize;
    use std::sync::Arc;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Paging {
        page: u32,
        size: Option<u32>,
    }

    fn context(uri: &str) -> Context {
        let request = Request::get(uri).body(Bytes::new()).unwrap();
        Context::new(Arc::new(request), Some(Arc::from("/users/:id")), Locals::new(), PathParams::from([("id", "42")]))
    }

    #[test]
    fn test_accessors() {
        let ctx = context("/users/42?page=2");

        assert_eq!(ctx.method(), &http::Method::GET);
        assert_eq!(ctx.uri().path(), "/users/42");
        assert_eq!(ctx.matched_route(), Some("/users/:id"));
        assert_eq!(ctx.param("id"), Some("42"));
        assert!(ctx.locals().is_empty());
    }

    #[test]
    fn test_query() {
        let ctx = context("/users/42?page=2&size=10");
        assert_eq!(ctx.query::<Paging>().unwrap(), Paging { page: 2, size: Some(10) });

        let ctx = context("/users/42");
        assert!(ctx.query::<Paging>().is_err());
    }
}
