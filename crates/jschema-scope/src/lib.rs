//! # jschema-scope
//!
//! Support crate for the `jschema` validator: URI scoping and normalisation,
//! fragment classification, JSON Schema draft identity, and the bundled
//! meta-schema documents for the five supported drafts.
mod draft;
pub mod meta;
pub mod uri;

pub use draft::Draft;
pub use fluent_uri::{Uri, UriRef};
pub use uri::{Fragment, UriError, DEFAULT_BASE_URI};
