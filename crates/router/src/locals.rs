use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The default request-scoped record threaded through the middleware chain.
///
/// The router never looks inside it: every step hands the complete next value to
/// [`Next::run`](crate::middleware::Next::run). `with` and `merge` implement the usual
/// "previous keys plus new keys" convention.
///
/// # Example
/// ```
/// use micro_router::Locals;
/// use serde_json::json;
///
/// let locals = Locals::new().with("a", 1).with("b", "two");
/// assert_eq!(locals.to_value(), json!({ "a": 1, "b": "two" }));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locals {
    inner: Map<String, Value>,
}

impl Locals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns these locals plus `key`, overwriting an existing value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inner.insert(key.into(), value.into());
        self
    }

    /// Returns these locals plus every key of `other`; `other` wins on conflicts.
    #[must_use]
    pub fn merge(mut self, other: Locals) -> Self {
        self.inner.extend(other.inner);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.inner.clone())
    }
}

impl From<Map<String, Value>> for Locals {
    fn from(inner: Map<String, Value>) -> Self {
        Self { inner }
    }
}

impl From<Locals> for Value {
    fn from(locals: Locals) -> Self {
        Value::Object(locals.inner)
    }
}
