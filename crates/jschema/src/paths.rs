//! Locations on both sides of a validation: schema locations are absolute
//! URIs built once at compile time; instance locations are lazy linked-list
//! paths rendered to JSON Pointers only when a message is actually emitted.
use std::fmt;
use std::sync::Arc;

use jschema_scope::uri::{append_pointer_token, escape_pointer_token};

/// Absolute URI of a schema location, fragment included.
///
/// Cheap to clone; every keyword validator carries one for error reporting.
#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) struct SchemaLocation(Arc<str>);

impl SchemaLocation {
    pub(crate) fn new(uri: impl Into<Arc<str>>) -> SchemaLocation {
        SchemaLocation(uri.into())
    }

    /// Appends a keyword name as a JSON Pointer token on the fragment.
    pub(crate) fn join(&self, token: &str) -> SchemaLocation {
        SchemaLocation(Arc::from(append_pointer_token(&self.0, token)))
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SchemaLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

/// JSON Pointer inside one schema document, kept separate from the base URI
/// while building so that `$id` can reset it.
#[derive(Clone, Default, PartialEq, Eq)]
pub(crate) struct PointerPath(String);

impl PointerPath {
    pub(crate) fn root() -> PointerPath {
        PointerPath(String::new())
    }

    pub(crate) fn from_pointer(pointer: &str) -> PointerPath {
        PointerPath(pointer.to_owned())
    }

    pub(crate) fn push(&self, token: &str) -> PointerPath {
        let mut next = String::with_capacity(self.0.len() + token.len() + 1);
        next.push_str(&self.0);
        next.push('/');
        next.push_str(&escape_pointer_token(token));
        PointerPath(next)
    }

    pub(crate) fn push_index(&self, index: usize) -> PointerPath {
        PointerPath(format!("{}/{index}", self.0))
    }

    pub(crate) fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

/// Segment of an instance path.
#[derive(Clone, Copy)]
pub(crate) enum PathChunk<'a> {
    Property(&'a str),
    Index(usize),
}

/// Lazily rendered instance location.
///
/// Each evaluation frame stacks one chunk onto its parent; the full pointer is
/// materialised only when an error or trace record needs it.
#[derive(Clone, Copy)]
pub(crate) struct InstancePath<'a> {
    parent: Option<&'a InstancePath<'a>>,
    chunk: Option<PathChunk<'a>>,
}

impl<'a> InstancePath<'a> {
    pub(crate) fn root() -> InstancePath<'a> {
        InstancePath {
            parent: None,
            chunk: None,
        }
    }

    #[must_use]
    pub(crate) fn push_property(&'a self, name: &'a str) -> InstancePath<'a> {
        InstancePath {
            parent: Some(self),
            chunk: Some(PathChunk::Property(name)),
        }
    }

    #[must_use]
    pub(crate) fn push_index(&'a self, index: usize) -> InstancePath<'a> {
        InstancePath {
            parent: Some(self),
            chunk: Some(PathChunk::Index(index)),
        }
    }

    /// Renders the path as a JSON Pointer string.
    pub(crate) fn to_pointer(&self) -> String {
        let mut chunks = Vec::new();
        let mut current = Some(self);
        while let Some(path) = current {
            if let Some(chunk) = path.chunk {
                chunks.push(chunk);
            }
            current = path.parent;
        }
        let mut out = String::new();
        for chunk in chunks.iter().rev() {
            out.push('/');
            match chunk {
                PathChunk::Property(name) => out.push_str(&escape_pointer_token(name)),
                PathChunk::Index(index) => {
                    out.push_str(&index.to_string());
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{InstancePath, PointerPath, SchemaLocation};

    #[test]
    fn schema_location_join() {
        let location = SchemaLocation::new("https://example.com/schema.json");
        assert_eq!(
            location.join("properties").join("a/b").as_str(),
            "https://example.com/schema.json#/properties/a~1b"
        );
    }

    #[test]
    fn instance_pointer_rendering() {
        let root = InstancePath::root();
        assert_eq!(root.to_pointer(), "");
        let vegetables = root.push_property("vegetables");
        let first = vegetables.push_index(1);
        let like = first.push_property("veggieLike");
        assert_eq!(like.to_pointer(), "/vegetables/1/veggieLike");
        let odd = root.push_property("a~/b");
        assert_eq!(odd.to_pointer(), "/a~0~1b");
    }

    #[test]
    fn pointer_path_push() {
        let path = PointerPath::root();
        assert!(path.is_root());
        assert_eq!(path.push("items").push_index(3).as_str(), "/items/3");
    }
}
