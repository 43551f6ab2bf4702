mod builder;

pub use builder::RouterBuilder;
pub use builder::Scope;

use crate::error::{DispatchError, ResponseResult};
use crate::handler::RequestHandler;
use crate::locals::Locals;
use crate::matcher::{normalize_path, Matched, MethodMatcher, PathMatcher, PathTree};
use crate::middleware::{Endpoint, Next, Stack};
use crate::request::{PathParams, Request};
use futures::future::{self, BoxFuture};
use http::Method;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

/// Dispatches requests to routes, running each route's middleware around its handler.
///
/// Built by [`RouterBuilder`]; once built it is immutable and can serve any number of
/// concurrent requests.
pub struct Router<L: Send + 'static = Locals> {
    routes: MethodMatcher<Arc<Route<L>>>,
    scopes: PathTree<Stack<L>>,
    fallback: Option<Arc<dyn RequestHandler<L>>>,
}

/// A registered route: its pattern as written, the middleware in effect when it was
/// registered, and its handler.
pub(crate) struct Route<L: Send + 'static = Locals> {
    pattern: Arc<str>,
    stack: Stack<L>,
    handler: Arc<dyn RequestHandler<L>>,
}

/// Result of looking up a route without dispatching to it.
#[derive(Debug)]
pub struct RouteResult<'router> {
    pattern: &'router str,
    middleware_len: usize,
    params: PathParams,
}

impl Router {
    /// Creates a new router builder using [`Locals`]. Use [`RouterBuilder::new`] for
    /// other locals types.
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }
}

impl<L: Send + 'static> Router<L> {
    fn new(
        routes: MethodMatcher<Arc<Route<L>>>,
        scopes: PathTree<Stack<L>>,
        fallback: Option<Arc<dyn RequestHandler<L>>>,
    ) -> Self {
        Self { routes, scopes, fallback }
    }

    /// Looks up the route `method` and `path` would dispatch to.
    pub fn at(&self, method: &Method, path: &str) -> Option<RouteResult<'_>> {
        let matched = self.routes.find(method, &normalize_path(path))?;
        let route = matched.payload();
        Some(RouteResult { pattern: &route.pattern, middleware_len: route.stack.len(), params: matched.into_params() })
    }
}

impl<L: Default + Send + 'static> Router<L> {
    /// Turns one request into one response.
    ///
    /// The matched route's middleware runs around its handler. When no route matches,
    /// the middleware of the most specific router node mounted above the path runs around
    /// the fallback, which by default answers `404 {"message":"Not found"}`.
    ///
    /// Errors from middleware or handlers are returned as they are.
    pub fn handle(&self, request: Request) -> BoxFuture<'static, ResponseResult> {
        let path = normalize_path(request.uri().path());
        let route = self.routes.find(request.method(), &path);
        let scope = self.scopes.at(&path);

        let stack = match (&route, &scope) {
            (Some(route), _) => Arc::clone(&route.payload().stack),
            (None, Some(scope)) => Arc::clone(scope.payload()),
            (None, None) => {
                error!(method = %request.method(), path, "no middleware stack for path, the router tree is broken");
                return Box::pin(future::ready(Err(DispatchError::MissingScope { path }.into())));
            }
        };
        let params = scope.map(Matched::into_params).unwrap_or_default();

        let (matched_route, endpoint) = match route {
            Some(matched) => {
                let route = matched.payload();
                debug!(method = %request.method(), path, route = %route.pattern, "route matched");

                let endpoint = Endpoint::Route { handler: Arc::clone(&route.handler), params: matched.into_params() };
                (Some(Arc::clone(&route.pattern)), endpoint)
            }
            None => {
                debug!(method = %request.method(), path, "no route matched");

                let endpoint = self.fallback.as_ref().map_or(Endpoint::NotFound, |handler| Endpoint::Fallback(Arc::clone(handler)));
                (None, endpoint)
            }
        };

        Next::new(stack, Arc::new(request), matched_route, params, endpoint).run(L::default())
    }
}

impl<'router> RouteResult<'router> {
    /// The matched route's pattern, as registered
    pub fn pattern(&self) -> &'router str {
        self.pattern
    }

    /// Number of middleware captured when the route was registered.
    pub fn middleware_len(&self) -> usize {
        self.middleware_len
    }

    /// Gets the path parameters from the matched route
    pub fn params(&self) -> &PathParams {
        &self.params
    }
}

impl<L: Send + 'static> fmt::Debug for Route<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route").field("pattern", &self.pattern).field("middleware", &self.stack.len()).finish_non_exhaustive()
    }
}

impl<L: Send + 'static> fmt::Debug for Router<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router").field("routes", &self.routes).field("has_fallback", &self.fallback.is_some()).finish_non_exhaustive()
    }
}
