//! Immutable compilation context.
//!
//! A context is a snapshot of the current base URI, the draft in force, and
//! the keyword path from the base. The builder never mutates one; it derives
//! a child and threads it through the recursion.
use std::sync::Arc;

use jschema_scope::{uri, Draft, Uri};

use crate::error::SchemaError;
use crate::paths::{PointerPath, SchemaLocation};

#[derive(Clone)]
pub(crate) struct BuildContext {
    base: Arc<Uri<String>>,
    draft: Draft,
    path: PointerPath,
}

impl BuildContext {
    pub(crate) fn root(base: Uri<String>, draft: Draft) -> BuildContext {
        BuildContext {
            base: Arc::new(base),
            draft,
            path: PointerPath::root(),
        }
    }

    /// Context for a subtree addressed by `uri` (a promoted unknown-keyword
    /// location): document part becomes the base, pointer fragment the path.
    pub(crate) fn at_pointer(
        base: Uri<String>,
        pointer: &str,
        draft: Draft,
    ) -> BuildContext {
        BuildContext {
            base: Arc::new(base),
            draft,
            path: PointerPath::from_pointer(pointer),
        }
    }

    /// Pushes a new base established by `$id`; the keyword path restarts at
    /// the new resource root.
    pub(crate) fn with_base(&self, base: Uri<String>) -> BuildContext {
        BuildContext {
            base: Arc::new(base),
            draft: self.draft,
            path: PointerPath::root(),
        }
    }

    pub(crate) fn with_keyword(&self, keyword: &str) -> BuildContext {
        BuildContext {
            base: Arc::clone(&self.base),
            draft: self.draft,
            path: self.path.push(keyword),
        }
    }

    pub(crate) fn with_index(&self, index: usize) -> BuildContext {
        BuildContext {
            base: Arc::clone(&self.base),
            draft: self.draft,
            path: self.path.push_index(index),
        }
    }

    pub(crate) fn draft(&self) -> Draft {
        self.draft
    }

    /// A node built at an empty keyword path is the root of its resource
    /// (document root or freshly `$id`-rebased).
    pub(crate) fn is_resource_root(&self) -> bool {
        self.path.is_root()
    }

    pub(crate) fn base_str(&self) -> &str {
        self.base.as_str()
    }

    /// The canonical identifier of the current location: the base URI plus
    /// the keyword path as a JSON Pointer fragment.
    pub(crate) fn absolute_uri(&self) -> String {
        if self.path.is_root() {
            self.base.as_str().to_owned()
        } else {
            let mut out = self.base.as_str().to_owned();
            out.push('#');
            out.push_str(&uri::encode_fragment(self.path.as_str()));
            out
        }
    }

    pub(crate) fn schema_location(&self) -> SchemaLocation {
        SchemaLocation::new(self.absolute_uri())
    }

    /// Schema path of a keyword at this location, for error reporting.
    pub(crate) fn keyword_location(&self, keyword: &str) -> SchemaLocation {
        self.with_keyword(keyword).schema_location()
    }

    /// Resolves a reference against the current base.
    pub(crate) fn resolve(&self, reference: &str) -> Result<Uri<String>, SchemaError> {
        Ok(uri::resolve_against(&self.base, reference)?)
    }
}
