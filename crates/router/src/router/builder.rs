use super::{Route, Router};
use crate::error::{DispatchError, PatternError};
use crate::handler::RequestHandler;
use crate::locals::Locals;
use crate::matcher::{join_path, normalize_path, MethodMatcher, PathMatcher, PathTree};
use crate::middleware::{Middleware, Stack};
use http::Method;
use std::fmt;
use std::mem;
use std::sync::Arc;
use tracing::{debug, warn};

/// Everything registered by one builder tree. Exactly one node owns it at any time.
pub(crate) struct RouteTable<L: Send + 'static> {
    routes: MethodMatcher<Arc<Route<L>>>,
    slots: Vec<ScopeSlot<L>>,
    error: Option<DispatchError>,
}

/// A node's base-path registration, reserved when the node is created and filled in when
/// it is sealed. Slots are applied in creation order, so a child mounted at the same path
/// as one of its ancestors takes over that path.
struct ScopeSlot<L: Send + 'static> {
    base_path: String,
    stack: Option<Stack<L>>,
}

impl<L: Send + 'static> Default for RouteTable<L> {
    fn default() -> Self {
        Self { routes: MethodMatcher::new(), slots: Vec::new(), error: None }
    }
}

impl<L: Send + 'static> RouteTable<L> {
    /// Keeps the first registration error; `build()` reports it.
    fn record(&mut self, pattern: &str, result: Result<(), PatternError>) {
        if let Err(source) = result {
            warn!(pattern, cause = %source, "invalid route pattern");
            if self.error.is_none() {
                self.error = Some(DispatchError::InvalidPattern { pattern: pattern.to_owned(), source });
            }
        }
    }

    fn reserve(&mut self, base_path: &str) -> usize {
        self.slots.push(ScopeSlot { base_path: base_path.to_owned(), stack: None });
        self.slots.len() - 1
    }

    /// Registers every sealed node's stack for its base path and everything below it, so
    /// requests that match no route still run the right middleware.
    fn scopes(&mut self) -> PathTree<Stack<L>> {
        let mut scopes = PathTree::new();
        for ScopeSlot { base_path, stack } in mem::take(&mut self.slots) {
            let Some(stack) = stack else { continue };

            debug!(base_path = %normalize_path(&base_path), middleware = stack.len(), "register scope");
            for pattern in [normalize_path(&base_path), normalize_path(&join_path(&base_path, "*"))] {
                let result = scopes.insert(&pattern, Arc::clone(&stack)).map(|_replaced| ());
                self.record(&pattern, result);
            }
        }
        scopes
    }
}

/// The per-node part of a builder: where it is mounted, its scope slot and its working
/// middleware stack.
struct ScopeState<L: Send + 'static> {
    base_path: String,
    slot: usize,
    stack: Vec<Arc<dyn Middleware<L>>>,
}

impl<L: Send + 'static> ScopeState<L> {
    fn root(table: &mut RouteTable<L>) -> Self {
        Self { base_path: String::new(), slot: table.reserve(""), stack: Vec::new() }
    }

    fn snapshot(&self) -> Stack<L> {
        Arc::from(self.stack.as_slice())
    }

    fn add_route(&self, table: &mut RouteTable<L>, method: Method, path: &str, handler: Arc<dyn RequestHandler<L>>) {
        let pattern = join_path(&self.base_path, path);
        let normalized = normalize_path(&pattern);

        debug!(%method, pattern = %pattern, middleware = self.stack.len(), "register route");
        let route = Route { pattern: Arc::from(pattern.as_str()), stack: self.snapshot(), handler };
        let result = table.routes.register(method, &normalized, Arc::new(route));
        table.record(&pattern, result);
    }

    /// The child starts with a copy of this node's stack, not a view of it, and reserves its
    /// scope slot before anything is registered inside it.
    fn fork(&self, table: &mut RouteTable<L>, path: &str) -> Self {
        let base_path = join_path(&self.base_path, path);
        Self { slot: table.reserve(&base_path), base_path, stack: self.stack.clone() }
    }

    /// Fills this node's reserved slot with its final stack.
    fn seal(self, table: &mut RouteTable<L>) {
        if let Some(slot) = table.slots.get_mut(self.slot) {
            slot.stack = Some(self.snapshot());
        }
    }
}

macro_rules! method_route {
    ($($method:ident => $upper_case_method:ident),* $(,)?) => {
        $(
            #[doc = concat!("Registers `handler` for HTTP ", stringify!($upper_case_method), " requests at `path`, below this node's base path.")]
            pub fn $method<H: RequestHandler<L> + 'static>(self, path: &str, handler: H) -> Self {
                self.on(Method::$upper_case_method, path, handler)
            }
        )*
    };
}

macro_rules! node_methods {
    () => {
        /// Appends `middleware` to this node's stack.
        ///
        /// Only routes and sub-routers registered on this node afterwards see it.
        pub fn middleware<M: Middleware<L> + 'static>(mut self, middleware: M) -> Self {
            self.scope.stack.push(Arc::new(middleware));
            self
        }

        /// Registers `handler` for `method` at `path`, capturing the current middleware stack.
        ///
        /// Registering the same method and path again replaces the earlier route.
        pub fn on<H: RequestHandler<L> + 'static>(mut self, method: Method, path: &str, handler: H) -> Self {
            self.scope.add_route(&mut self.table, method, path, Arc::new(handler));
            self
        }

        /// Mounts a sub-router at `path`.
        ///
        /// `configure` receives a [`Scope`] starting from a copy of this node's current
        /// middleware stack and registers into the same route table. Middleware added inside
        /// it stays inside it; middleware added here afterwards does not reach it.
        pub fn route<F>(mut self, path: &str, configure: F) -> Self
        where
            F: FnOnce(Scope<L>) -> Scope<L>,
        {
            let scope = self.scope.fork(&mut self.table, path);
            let child = Scope { table: mem::take(&mut self.table), scope };
            let Scope { mut table, scope } = configure(child);
            scope.seal(&mut table);
            self.table = table;
            self
        }

        method_route! {
            get => GET,
            post => POST,
            put => PUT,
            patch => PATCH,
            delete => DELETE,
            head => HEAD,
            connect => CONNECT,
            options => OPTIONS,
            trace => TRACE,
        }
    };
}

/// Root node of a router tree.
///
/// # Example
/// ```
/// use micro_router::middleware::extend_locals;
/// use micro_router::{handler_fn, BoxError, Context, Json, Locals, Router};
///
/// async fn show(ctx: Context) -> Result<Json<Locals>, BoxError> {
///     Ok(Json(ctx.into_locals()))
/// }
///
/// let router = Router::builder()
///     .middleware(extend_locals(|_| Locals::new().with("a", 1)))
///     .get("/", handler_fn(show))
///     .route("/foo", |foo| foo.middleware(extend_locals(|_| Locals::new().with("b", 2))).get("/", handler_fn(show)))
///     .build()
///     .unwrap();
///
/// assert_eq!(router.at(&http::Method::GET, "/foo").unwrap().pattern(), "/foo/");
/// ```
pub struct RouterBuilder<L: Send + 'static = Locals> {
    table: RouteTable<L>,
    scope: ScopeState<L>,
    fallback: Option<Arc<dyn RequestHandler<L>>>,
}

impl<L: Send + 'static> RouterBuilder<L> {
    pub fn new() -> Self {
        let mut table = RouteTable::default();
        let scope = ScopeState::root(&mut table);
        Self { table, scope, fallback: None }
    }

    node_methods!();

    /// Replaces the built-in `404 {"message":"Not found"}` response for unmatched requests.
    ///
    /// The fallback still runs inside the middleware of the closest mounted node.
    pub fn fallback<H: RequestHandler<L> + 'static>(mut self, handler: H) -> Self {
        self.fallback = Some(Arc::new(handler));
        self
    }

    /// Finishes the tree.
    ///
    /// # Errors
    /// Returns the first malformed pattern that was registered.
    pub fn build(self) -> Result<Router<L>, DispatchError> {
        let Self { mut table, scope, fallback } = self;
        scope.seal(&mut table);

        let scopes = table.scopes();
        let RouteTable { routes, error, .. } = table;
        if let Some(error) = error {
            return Err(error);
        }
        Ok(Router::new(routes, scopes, fallback))
    }
}

impl<L: Send + 'static> Default for RouterBuilder<L> {
    fn default() -> Self {
        Self::new()
    }
}

/// A sub-router node created by `route`.
pub struct Scope<L: Send + 'static = Locals> {
    table: RouteTable<L>,
    scope: ScopeState<L>,
}

impl<L: Send + 'static> Scope<L> {
    node_methods!();
}

impl<L: Send + 'static> fmt::Debug for RouterBuilder<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterBuilder")
            .field("middleware", &self.scope.stack.len())
            .field("has_fallback", &self.fallback.is_some())
            .finish_non_exhaustive()
    }
}

impl<L: Send + 'static> fmt::Debug for Scope<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("base_path", &self.scope.base_path)
            .field("middleware", &self.scope.stack.len())
            .finish_non_exhaustive()
    }
}
