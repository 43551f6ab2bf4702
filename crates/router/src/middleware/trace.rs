use super::{Middleware, Next};
use crate::context::Context;
use crate::error::ResponseResult;
use futures::future::BoxFuture;
use std::time::Instant;
use tracing::{info, warn};

/// Logs every request passing through it: method, path, matched route, status and the
/// time spent in the rest of the chain.
///
/// Errors are logged and then returned unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestTrace;

impl<L: Send + 'static> Middleware<L> for RequestTrace {
    fn call(&self, ctx: Context<L>, next: Next<L>) -> BoxFuture<'_, ResponseResult> {
        let method = ctx.method().clone();
        let path = ctx.uri().path().to_owned();
        let route = ctx.matched_route().map(str::to_owned);
        let start = Instant::now();

        let rest = next.run(ctx.into_locals());
        Box::pin(async move {
            let result = rest.await;
            let elapsed = start.elapsed();
            let route = route.as_deref().unwrap_or("-");

            match &result {
                Ok(response) => {
                    info!(%method, %path, route, status = response.status().as_u16(), ?elapsed, "request dispatched");
                }
                Err(e) => warn!(%method, %path, route, cause = %e, ?elapsed, "request failed"),
            }
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::RequestTrace;
    use crate::handler::handler_fn;
    use crate::{BoxError, Context, Router};
    use bytes::Bytes;
    use http::StatusCode;

    async fn ok(_ctx: Context) -> Result<&'static str, BoxError> {
        Ok("ok")
    }

    async fn fail(_ctx: Context) -> Result<&'static str, BoxError> {
        Err("nope".into())
    }

    #[tokio::test]
    async fn test_passes_results_through() {
        let router = Router::builder()
            .middleware(RequestTrace)
            .get("/ok", handler_fn(ok))
            .get("/fail", handler_fn(fail))
            .build()
            .unwrap();

        let ok = router.handle(http::Request::get("/ok").body(Bytes::new()).unwrap()).await.unwrap();
        assert_eq!(ok.status(), StatusCode::OK);

        let missing = router.handle(http::Request::get("/missing").body(Bytes::new()).unwrap()).await.unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let error = router.handle(http::Request::get("/fail").body(Bytes::new()).unwrap()).await.unwrap_err();
        assert_eq!(error.to_string(), "nope");
    }
}
