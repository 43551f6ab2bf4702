//! The middleware chain.
//!
//! A route's middleware runs as nested continuations around its handler ("onion"
//! order): the code a middleware runs before [`Next::run`] executes outer to inner, in
//! registration order, and the code after it resumes inner to outer, once everything
//! deeper (including the handler) has finished.
//!
//! - Every step hands the *complete* next locals value to [`Next::run`]; the chain never
//!   merges or inspects locals. It always starts from `L::default()`.
//! - A middleware that drops its [`Next`] without running it ends the chain: nothing
//!   deeper runs and its own response is the final one.
//! - Errors travel back up unchanged until some middleware chooses to handle them; see
//!   [`recover_fn`].
//!
//! # Example
//! ```
//! use micro_router::middleware::{middleware_fn, Next};
//! use micro_router::{Context, Locals};
//!
//! let auth = middleware_fn(|ctx: Context, next: Next| async move {
//!     let user = ctx.headers().get("x-user").and_then(|value| value.to_str().ok()).map(str::to_owned);
//!     next.run(ctx.into_locals().with("user", user)).await
//! });
//! # let _ = auth;
//! ```

mod from_fn;
mod recover;
mod trace;

pub use from_fn::extend_locals;
pub use from_fn::locals_fn;
pub use from_fn::middleware_fn;
pub use from_fn::ExtendLocals;
pub use from_fn::FnMiddleware;
pub use from_fn::LocalsFn;
pub use recover::recover_fn;
pub use recover::Recover;
pub use trace::RequestTrace;

use crate::context::Context;
use crate::error::ResponseResult;
use crate::handler::RequestHandler;
use crate::locals::Locals;
use crate::request::{PathParams, Request};
use crate::responder::not_found;
use futures::future::{self, BoxFuture};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// One layer of the chain.
///
/// Implementations that need no asynchronous work of their own can return
/// `next.run(..)` directly instead of wrapping it in an `async` block.
pub trait Middleware<L: Send + 'static = Locals>: Send + Sync {
    fn call(&self, ctx: Context<L>, next: Next<L>) -> BoxFuture<'_, ResponseResult>;
}

/// An immutable snapshot of middleware, shared by every request that uses it.
pub(crate) type Stack<L> = Arc<[Arc<dyn Middleware<L>>]>;

/// What runs once the cursor has passed the last middleware.
pub(crate) enum Endpoint<L: Send + 'static> {
    Route { handler: Arc<dyn RequestHandler<L>>, params: PathParams },
    Fallback(Arc<dyn RequestHandler<L>>),
    NotFound,
}

/// The rest of the chain, handed to each middleware.
///
/// Running it consumes it, so the rest of the chain runs at most once per middleware.
pub struct Next<L: Send + 'static = Locals> {
    stack: Stack<L>,
    cursor: usize,
    request: Arc<Request>,
    matched_route: Option<Arc<str>>,
    params: PathParams,
    endpoint: Endpoint<L>,
}

impl<L: Send + 'static> Next<L> {
    pub(crate) fn new(
        stack: Stack<L>,
        request: Arc<Request>,
        matched_route: Option<Arc<str>>,
        params: PathParams,
        endpoint: Endpoint<L>,
    ) -> Self {
        Self { stack, cursor: 0, request, matched_route, params, endpoint }
    }

    /// Runs the next middleware with `locals` as its `ctx.locals()`, or the terminal step
    /// once the stack is exhausted.
    pub fn run(mut self, locals: L) -> BoxFuture<'static, ResponseResult> {
        let Some(middleware) = self.stack.get(self.cursor).map(Arc::clone) else {
            return self.finish(locals);
        };

        self.cursor += 1;
        trace!(depth = self.cursor, of = self.stack.len(), "enter middleware");

        let ctx = Context::new(Arc::clone(&self.request), self.matched_route.clone(), locals, self.params.clone());
        Box::pin(async move { middleware.call(ctx, self).await })
    }

    /// Number of middleware still ahead of this continuation.
    pub fn remaining(&self) -> usize {
        self.stack.len() - self.cursor
    }

    fn finish(self, locals: L) -> BoxFuture<'static, ResponseResult> {
        let Self { request, matched_route, params, endpoint, .. } = self;

        match endpoint {
            Endpoint::Route { handler, params } => {
                trace!("invoke route handler");
                Box::pin(async move { handler.invoke(Context::new(request, matched_route, locals, params)).await })
            }
            Endpoint::Fallback(handler) => {
                trace!("invoke fallback handler");
                Box::pin(async move { handler.invoke(Context::new(request, None, locals, params)).await })
            }
            Endpoint::NotFound => Box::pin(future::ready(Ok(not_found()))),
        }
    }
}

impl<L: Send + 'static> fmt::Debug for Next<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("cursor", &self.cursor)
            .field("stack_len", &self.stack.len())
            .field("matched_route", &self.matched_route)
            .finish_non_exhaustive()
    }
}
