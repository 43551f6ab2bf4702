use crate::context::Context;
use crate::error::{BoxError, ResponseResult};
use crate::locals::Locals;
use crate::responder::Responder;
use async_trait::async_trait;
use std::fmt;
use std::future::Future;

/// The terminal step of a route: turns the final [`Context`] into a response.
///
/// An `Err` is not converted into a response here; it travels back up through every
/// middleware and out of [`Router::handle`](crate::Router::handle) unless a middleware
/// catches it.
#[async_trait]
pub trait RequestHandler<L: Send + 'static = Locals>: Send + Sync {
    async fn invoke(&self, ctx: Context<L>) -> ResponseResult;
}

/// Adapts an async fn taking a [`Context`] into a [`RequestHandler`].
pub struct FnHandler<F> {
    f: F,
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}

/// Wraps `f` as a handler. `f` returns `Result<impl Responder, impl Into<BoxError>>`.
///
/// # Example
/// ```
/// use micro_router::{handler_fn, BoxError, Context, Json};
/// use serde_json::{json, Value};
///
/// async fn show_user(ctx: Context) -> Result<Json<Value>, BoxError> {
///     Ok(Json(json!({ "id": ctx.param("id") })))
/// }
///
/// let _handler = handler_fn(show_user);
/// ```
pub fn handler_fn<F>(f: F) -> FnHandler<F> {
    FnHandler { f }
}

#[async_trait]
impl<L, F, Fut, R, E> RequestHandler<L> for FnHandler<F>
where
    L: Send + 'static,
    F: Fn(Context<L>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: Responder + 'static,
    E: Into<BoxError> + 'static,
{
    async fn invoke(&self, ctx: Context<L>) -> ResponseResult {
        (self.f)(ctx).await.map(Responder::response_to).map_err(Into::into)
    }
}
