use crate::body::ResponseBody;
use http::Response;
use std::error::Error;
use thiserror::Error;

/// Type-erased error flowing out of handlers and middleware.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// What every step of the dispatch pipeline produces.
pub type ResponseResult = Result<Response<ResponseBody>, BoxError>;

/// Errors raised by the router itself, as opposed to errors raised by user handlers.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("invalid route pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: PatternError,
    },

    /// Every router node registers its own base path, so reaching this means the tree was
    /// assembled incorrectly. It is never turned into a 404.
    #[error("no middleware stack registered for path '{path}'")]
    MissingScope { path: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("parameter segment at position {position} has an empty name")]
    EmptyParamName { position: usize },
    #[error("wildcard segment at position {position} must be the last segment")]
    WildcardNotLast { position: usize },
}
