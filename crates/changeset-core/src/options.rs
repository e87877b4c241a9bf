use std::fmt;
use std::sync::Arc;

use crate::Document;

/// The reserved mapping key used for identity matching by default.
pub const DEFAULT_IDENTITY_KEY: &str = "_id";

type IdentityFn = dyn for<'a> Fn(&'a Document) -> Option<&'a Document> + Send + Sync;

/// Configuration knobs passed to diff operations.
///
/// The only knob is the identity extractor used during array
/// reconciliation: given an array element, it returns the value that
/// identifies the element across the source and target arrays, or `None`
/// when the element has no identity and must be matched by content hash.
///
/// The identity-field convention is structural, not built in, so the
/// extractor is pluggable: a reserved key lookup by default, a custom key
/// via [`with_identity_key`](Self::with_identity_key), or an arbitrary
/// function via [`with_identity_fn`](Self::with_identity_fn).
#[derive(Clone)]
pub struct DiffOptions {
    identity: Arc<IdentityFn>,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self::keyed(DEFAULT_IDENTITY_KEY.to_owned())
    }
}

impl DiffOptions {
    fn keyed(key: String) -> Self {
        Self {
            identity: Arc::new(move |value| match value {
                Document::Object(map) => map.get(&key),
                _ => None,
            }),
        }
    }

    /// Matches array elements on the given reserved mapping key.
    ///
    /// ```
    /// # use changeset_core::{DiffOptions, Document};
    /// let opts = DiffOptions::default().with_identity_key("uuid");
    /// let doc = Document::from_json_str("{\"uuid\":7}").unwrap();
    /// # let _ = (opts, doc);
    /// ```
    #[must_use]
    pub fn with_identity_key<S>(self, key: S) -> Self
    where
        S: Into<String>,
    {
        Self::keyed(key.into())
    }

    /// Installs an arbitrary identity extractor.
    ///
    /// ```
    /// # use changeset_core::{DiffOptions, Document};
    /// let opts = DiffOptions::default().with_identity_fn(|doc| match doc {
    ///     Document::Object(map) => map.get("name"),
    ///     _ => None,
    /// });
    /// # let _ = opts;
    /// ```
    #[must_use]
    pub fn with_identity_fn<F>(mut self, extractor: F) -> Self
    where
        F: for<'a> Fn(&'a Document) -> Option<&'a Document> + Send + Sync + 'static,
    {
        self.identity = Arc::new(extractor);
        self
    }

    pub(crate) fn identity_of<'a>(&self, value: &'a Document) -> Option<&'a Document> {
        (self.identity)(value)
    }
}

impl fmt::Debug for DiffOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiffOptions").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_extracts_reserved_key() {
        let opts = DiffOptions::default();
        let doc = Document::from_json_str("{\"_id\":1,\"name\":\"a\"}").unwrap();
        let id = opts.identity_of(&doc).expect("identity present");
        assert_eq!(id, &Document::from_json_str("1").unwrap());
    }

    #[test]
    fn scalars_have_no_identity() {
        let opts = DiffOptions::default();
        assert!(opts.identity_of(&Document::String("a".to_owned())).is_none());
        assert!(opts.identity_of(&Document::Null).is_none());
    }

    #[test]
    fn custom_key_overrides_default() {
        let opts = DiffOptions::default().with_identity_key("uuid");
        let doc = Document::from_json_str("{\"_id\":1,\"uuid\":2}").unwrap();
        let id = opts.identity_of(&doc).expect("identity present");
        assert_eq!(id, &Document::from_json_str("2").unwrap());
    }

    #[test]
    fn custom_extractor_wins() {
        let opts = DiffOptions::default().with_identity_fn(|doc| match doc {
            Document::String(_) => Some(doc),
            _ => None,
        });
        let doc = Document::String("self".to_owned());
        assert_eq!(opts.identity_of(&doc), Some(&doc));
        assert!(opts.identity_of(&Document::Null).is_none());
    }
}
