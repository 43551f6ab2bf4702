use super::{Middleware, Next};
use crate::context::Context;
use crate::error::{BoxError, ResponseResult};
use crate::responder::Responder;
use futures::future::BoxFuture;
use std::fmt;

/// Middleware turning errors raised deeper in the chain into responses.
pub struct Recover<F> {
    f: F,
}

/// Creates a middleware that runs the rest of the chain and maps an `Err` to `f(error)`.
///
/// Only errors from middleware registered after it, and from the handler, are seen.
///
/// # Example
/// ```
/// use http::StatusCode;
/// use micro_router::middleware::recover_fn;
/// use micro_router::Router;
///
/// let builder = Router::builder()
///     .middleware(recover_fn(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())));
/// # let _ = builder;
/// ```
pub fn recover_fn<F, R>(f: F) -> Recover<F>
where
    F: Fn(BoxError) -> R + Send + Sync,
    R: Responder + 'static,
{
    Recover { f }
}

impl<L, F, R> Middleware<L> for Recover<F>
where
    L: Send + 'static,
    F: Fn(BoxError) -> R + Send + Sync,
    R: Responder + 'static,
{
    fn call(&self, ctx: Context<L>, next: Next<L>) -> BoxFuture<'_, ResponseResult> {
        let rest = next.run(ctx.into_locals());
        Box::pin(async move { rest.await.or_else(|e| Ok((self.f)(e).response_to())) })
    }
}

impl<F> fmt::Debug for Recover<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recover").finish_non_exhaustive()
    }
}
