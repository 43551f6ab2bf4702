use bytes::Bytes;
use http::{Method, StatusCode};
use http_body_util::BodyExt;
use micro_router::middleware::{extend_locals, recover_fn, RequestTrace};
use micro_router::{handler_fn, BoxError, Context, Json, Locals, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Deserialize, Debug)]
struct Paging {
    page: Option<u32>,
}

async fn index(ctx: Context) -> Result<Json<Locals>, BoxError> {
    Ok(Json(ctx.into_locals()))
}

async fn list_posts(ctx: Context) -> Result<Json<Value>, BoxError> {
    let paging: Paging = ctx.query()?;
    Ok(Json(json!({
        "user": ctx.param("id"),
        "page": paging.page.unwrap_or(1),
        "locals": ctx.locals(),
    })))
}

async fn boom(_ctx: Context) -> Result<&'static str, BoxError> {
    Err("something broke".into())
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let router = Router::builder()
        .middleware(RequestTrace)
        .middleware(recover_fn(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())))
        .middleware(extend_locals(|_| Locals::new().with("app", "getting_started")))
        .get("/", handler_fn(index))
        .get("/boom", handler_fn(boom))
        .route("/users/:id", |users| {
            users
                .middleware(extend_locals(|ctx| Locals::new().with("user_scope", ctx.params().get("id").is_some())))
                .get("/posts", handler_fn(list_posts))
        })
        .build();

    let router = match router {
        Ok(router) => router,
        Err(e) => {
            error!(cause = %e, "build router error");
            return;
        }
    };

    for (method, uri) in
        [(Method::GET, "/"), (Method::GET, "/users/42/posts?page=3"), (Method::GET, "/boom"), (Method::POST, "/")]
    {
        let request = http::Request::builder().method(method).uri(uri).body(Bytes::new()).expect("valid request");
        let response = match router.handle(request).await {
            Ok(response) => response,
            Err(e) => {
                error!(cause = %e, "dispatch error");
                continue;
            }
        };

        let status = response.status();
        let body = response.into_body().collect().await.map(|collected| collected.to_bytes()).unwrap_or_default();
        info!(uri, %status, body = %String::from_utf8_lossy(&body), "response");
    }
}
