//! External document resolution.
//!
//! The library performs no I/O: every external document comes through a
//! caller-supplied [`Resolve`] implementation, consulted only while
//! compiling. The bundled meta-schemas are served before any caller
//! resolver, and the first resolver returning a document wins.
use serde_json::Value;

/// Maps an absolute document URI to its JSON, or `None` for "not found".
pub trait Resolve: Send + Sync {
    fn resolve(&self, uri: &str) -> Option<Value>;
}

impl<F> Resolve for F
where
    F: Fn(&str) -> Option<Value> + Send + Sync,
{
    fn resolve(&self, uri: &str) -> Option<Value> {
        self(uri)
    }
}
