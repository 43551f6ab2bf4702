//! Response handling module that converts handler results into HTTP responses.
//!
//! This module provides the [`Responder`] trait which defines how different types
//! can be converted into HTTP responses. It includes implementations for common types
//! like String, tuples with a status code, and JSON via [`Json`].
//!
//! Errors are deliberately not responders: a handler returns `Result<impl Responder, E>`
//! and the error travels up the middleware chain untouched.

use crate::body::ResponseBody;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Response, StatusCode};
use mime::Mime;
use serde::Serialize;
use std::convert::Infallible;
use tracing::error;

/// A trait for types that can be converted into HTTP responses.
pub trait Responder {
    fn response_to(self) -> Response<ResponseBody>;
}

/// Serializes the wrapped value as an `application/json` response.
///
/// # Example
/// ```
/// use micro_router::Json;
/// use micro_router::responder::Responder;
/// use serde_json::json;
///
/// let response = Json(json!({ "ok": true })).response_to();
/// assert_eq!(response.headers()["content-type"], "application/json");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

/// The response produced when no route matches: `404` with `{"message":"Not found"}`.
pub fn not_found() -> Response<ResponseBody> {
    (StatusCode::NOT_FOUND, Json(serde_json::json!({ "message": "Not found" }))).response_to()
}

fn with_content_type(body: ResponseBody, mime: &Mime) -> Response<ResponseBody> {
    let mut response = Response::new(body);
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        response.headers_mut().insert(CONTENT_TYPE, value);
    }
    response
}

impl<T: Serialize> Responder for Json<T> {
    fn response_to(self) -> Response<ResponseBody> {
        match serde_json::to_vec(&self.0) {
            Ok(bytes) => with_content_type(ResponseBody::from(bytes), &mime::APPLICATION_JSON),
            Err(e) => {
                error!(cause = %e, "serialize json response error");
                (StatusCode::INTERNAL_SERVER_ERROR, ()).response_to()
            }
        }
    }
}

/// Implementation for Response allows passing through pre-built responses.
impl<B> Responder for Response<B>
where
    B: Into<ResponseBody>,
{
    fn response_to(self) -> Response<ResponseBody> {
        self.map(Into::into)
    }
}

/// Implementation for (StatusCode, T) tuple allows setting a status code
/// along with the response content.
impl<T: Responder> Responder for (StatusCode, T) {
    fn response_to(self) -> Response<ResponseBody> {
        let (status, responder) = self;
        let mut response = responder.response_to();
        *response.status_mut() = status;
        response
    }
}

/// Same as above but with reversed order.
impl<T: Responder> Responder for (T, StatusCode) {
    fn response_to(self) -> Response<ResponseBody> {
        let (responder, status) = self;
        (status, responder).response_to()
    }
}

impl<T: Responder> Responder for Box<T> {
    fn response_to(self) -> Response<ResponseBody> {
        (*self).response_to()
    }
}

/// Implementation for unit type () returns an empty response.
impl Responder for () {
    fn response_to(self) -> Response<ResponseBody> {
        Response::new(ResponseBody::empty())
    }
}

impl Responder for &'static str {
    fn response_to(self) -> Response<ResponseBody> {
        with_content_type(ResponseBody::from(self), &mime::TEXT_PLAIN_UTF_8)
    }
}

impl Responder for String {
    fn response_to(self) -> Response<ResponseBody> {
        with_content_type(ResponseBody::from(self), &mime::TEXT_PLAIN_UTF_8)
    }
}

impl Responder for Infallible {
    fn response_to(self) -> Response<ResponseBody> {
        match self {}
    }
}

#[cfg(test)]
mod tests {
    use super::{not_found, Json, Responder};
    use http::StatusCode;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_not_found_body() {
        let response = not_found();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[http::header::CONTENT_TYPE], "application/json");

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "message": "Not found" }));
    }

    #[test]
    fn test_status_tuples() {
        assert_eq!((StatusCode::CREATED, "done").response_to().status(), StatusCode::CREATED);
        assert_eq!(("done", StatusCode::ACCEPTED).response_to().status(), StatusCode::ACCEPTED);
        assert_eq!(().response_to().status(), StatusCode::OK);
    }

    #[test]
    fn test_text_content_type() {
        let response = String::from("hello").response_to();
        assert_eq!(response.headers()[http::header::CONTENT_TYPE], "text/plain; charset=utf-8");
    }

    #[test]
    fn test_json_content_type() {
        let response = Json(vec![1, 2, 3]).response_to();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[http::header::CONTENT_TYPE], "application/json");
    }
}
