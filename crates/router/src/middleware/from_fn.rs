use super::{Middleware, Next};
use crate::context::Context;
use crate::error::ResponseResult;
use crate::locals::Locals;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;

/// Middleware built from an async closure receiving the context and the rest of the chain.
pub struct FnMiddleware<F> {
    f: F,
}

/// Creates a middleware from `f`. Calling `next.run(..)` continues the chain; not calling
/// it ends the chain with whatever `f` returns.
pub fn middleware_fn<L, F, Fut>(f: F) -> FnMiddleware<F>
where
    L: Send + 'static,
    F: Fn(Context<L>, Next<L>) -> Fut + Send + Sync,
    Fut: Future<Output = ResponseResult> + Send + 'static,
{
    FnMiddleware { f }
}

impl<L, F, Fut> Middleware<L> for FnMiddleware<F>
where
    L: Send + 'static,
    F: Fn(Context<L>, Next<L>) -> Fut + Send + Sync,
    Fut: Future<Output = ResponseResult> + Send + 'static,
{
    fn call(&self, ctx: Context<L>, next: Next<L>) -> BoxFuture<'_, ResponseResult> {
        Box::pin((self.f)(ctx, next))
    }
}

/// Synchronous middleware computing the complete next locals from the current context.
pub struct LocalsFn<F> {
    f: F,
}

/// Creates a middleware that replaces the locals with `f(&ctx)` and continues.
///
/// `f` receives the previous locals through `ctx.locals()` and is responsible for
/// carrying over whatever it wants to keep.
pub fn locals_fn<L, F>(f: F) -> LocalsFn<F>
where
    L: Send + 'static,
    F: Fn(&Context<L>) -> L + Send + Sync,
{
    LocalsFn { f }
}

impl<L, F> Middleware<L> for LocalsFn<F>
where
    L: Send + 'static,
    F: Fn(&Context<L>) -> L + Send + Sync,
{
    fn call(&self, ctx: Context<L>, next: Next<L>) -> BoxFuture<'_, ResponseResult> {
        let locals = (self.f)(&ctx);
        next.run(locals)
    }
}

/// Synchronous middleware adding keys to [`Locals`].
pub struct ExtendLocals<F> {
    f: F,
}

/// Creates a middleware that merges `f(&ctx)` into the previous [`Locals`] and continues.
///
/// # Example
/// ```
/// use micro_router::middleware::extend_locals;
/// use micro_router::{Locals, Router};
///
/// let builder = Router::builder().middleware(extend_locals(|ctx| Locals::new().with("path", ctx.uri().path())));
/// # let _ = builder;
/// ```
pub fn extend_locals<F>(f: F) -> ExtendLocals<F>
where
    F: Fn(&Context<Locals>) -> Locals + Send + Sync,
{
    ExtendLocals { f }
}

impl<F> Middleware<Locals> for ExtendLocals<F>
where
    F: Fn(&Context<Locals>) -> Locals + Send + Sync,
{
    fn call(&self, ctx: Context<Locals>, next: Next<Locals>) -> BoxFuture<'_, ResponseResult> {
        let added = (self.f)(&ctx);
        next.run(ctx.into_locals().merge(added))
    }
}

macro_rules! opaque_debug {
    ($($name:ident),*) => {
        $(
            impl<F> fmt::Debug for $name<F> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.debug_struct(stringify!($name)).finish_non_exhaustive()
                }
            }
        )*
    };
}

opaque_debug!(FnMiddleware, LocalsFn, ExtendLocals);

#[cfg(test)]
mod tests {
    use super::{extend_locals, locals_fn};
    use crate::handler::handler_fn;
    use crate::{BoxError, Context, Json, Locals, Router};
    use bytes::Bytes;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};

    async fn echo_locals(ctx: Context) -> Result<Json<Locals>, BoxError> {
        Ok(Json(ctx.into_locals()))
    }

    async fn locals_for(router: &Router) -> Value {
        let request = http::Request::get("/").body(Bytes::new()).unwrap();
        let response = router.handle(request).await.unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_extend_keeps_previous_keys() {
        let router = Router::builder()
            .middleware(extend_locals(|_| Locals::new().with("a", 1)))
            .middleware(extend_locals(|_| Locals::new().with("b", 2)))
            .get("/", handler_fn(echo_locals))
            .build()
            .unwrap();

        assert_eq!(locals_for(&router).await, json!({ "a": 1, "b": 2 }));
    }

    #[tokio::test]
    async fn test_locals_fn_replaces() {
        let router = Router::builder()
            .middleware(extend_locals(|_| Locals::new().with("a", 1)))
            .middleware(locals_fn(|ctx: &Context| Locals::new().with("had_a", ctx.locals().contains_key("a"))))
            .get("/", handler_fn(echo_locals))
            .build()
            .unwrap();

        assert_eq!(locals_for(&router).await, json!({ "had_a": true }));
    }
}
