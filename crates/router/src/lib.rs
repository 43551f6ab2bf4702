//! An in-process HTTP dispatcher.
//!
//! A [`Router`] turns one [`Request`] into one response by matching the request's method
//! and path against registered routes and running the route's middleware around its
//! handler. Routers can be nested with [`RouterBuilder::route`]: a sub-router starts with a
//! copy of its parent's middleware, and middleware added inside it stays inside it.
//!
//! Middleware hands an explicit locals value (by default [`Locals`], a JSON object) down
//! the chain; handlers read it from their [`Context`] together with the request, the
//! matched route pattern and the path parameters.
//!
//! Transport is not part of this crate: requests are built and dispatched in-process.

mod body;
mod context;
mod error;
mod handler;
mod locals;
mod request;

pub mod matcher;
pub mod middleware;
pub mod responder;
pub mod router;

pub use body::ResponseBody;
pub use context::Context;
pub use error::BoxError;
pub use error::DispatchError;
pub use error::PatternError;
pub use error::ResponseResult;
pub use handler::handler_fn;
pub use handler::FnHandler;
pub use handler::RequestHandler;
pub use locals::Locals;
pub use middleware::Middleware;
pub use middleware::Next;
pub use request::PathParams;
pub use request::Request;
pub use responder::Json;
pub use router::RouteResult;
pub use router::Router;
pub use router::RouterBuilder;
pub use router::Scope;
