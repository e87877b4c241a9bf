//! Patch application engine.
//!
//! Changes are applied strictly in changeset order, each against the
//! result of all previous applications. The engine always works on a deep
//! copy of the input document; any validation failure aborts the whole
//! call and the caller's document is untouched. Clone isolation is the
//! only rollback guarantee — there is no partial-application recovery.

use thiserror::Error;

use crate::{
    diff::{Location, Segment},
    Change, Changeset, Document,
};

/// Errors raised while applying a changeset.
///
/// Every variant carries the serialised location of the failing change so
/// callers can diagnose which part of the document rejected the patch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatchError {
    /// An `add` targeted a key that already holds a value.
    #[error("add conflict at '{location}': value {existing} already present")]
    ValueConflict {
        /// Serialised location of the key being added.
        location: String,
        /// Rendering of the value already stored under the key.
        existing: String,
    },
    /// A location failed to resolve: a `remove` of an absent key, a
    /// `move` index outside the sequence, or a path segment that does not
    /// exist in the document being patched.
    #[error("nothing to patch at '{location}'")]
    NotFound {
        /// Serialised location that failed to resolve.
        location: String,
    },
    /// A `remove` or `delete` found a value different from the one the
    /// change recorded.
    #[error("value mismatch at '{location}': expected {expected} but found {actual}")]
    ValueMismatch {
        /// Serialised location of the mismatching value.
        location: String,
        /// Rendering of the value the change expected.
        expected: String,
        /// Rendering of the value actually present.
        actual: String,
    },
}

impl PatchError {
    fn not_found(location: &Location) -> Self {
        Self::NotFound { location: location.to_string() }
    }
}

/// Applies `changeset` to a deep copy of `document`.
///
/// An empty changeset returns an unchanged, independent copy.
///
/// ```
/// # use changeset_core::{apply, Changeset, Document};
/// let doc = Document::from_json_str("{\"foo\":\"bar\"}")?;
/// let copy = apply(&doc, &Changeset::empty())?;
/// assert_eq!(copy, doc);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn apply(document: &Document, changeset: &Changeset) -> Result<Document, PatchError> {
    let mut working = document.clone();
    for change in changeset {
        apply_change(&mut working, change)?;
    }
    Ok(working)
}

/// Walks every segment of `location` down to the addressed node.
fn resolve_mut<'a>(
    document: &'a mut Document,
    location: &Location,
) -> Result<&'a mut Document, PatchError> {
    let mut current = document;
    for segment in location {
        current = match segment {
            Segment::Key(key) => match current {
                Document::Object(map) => {
                    map.get_mut(key).ok_or_else(|| PatchError::not_found(location))?
                }
                _ => return Err(PatchError::not_found(location)),
            },
            Segment::Index(index) => match current {
                Document::Array(items) => {
                    items.get_mut(*index).ok_or_else(|| PatchError::not_found(location))?
                }
                _ => return Err(PatchError::not_found(location)),
            },
        };
    }
    Ok(current)
}

fn apply_change(document: &mut Document, change: &Change) -> Result<(), PatchError> {
    match change {
        Change::Add { location, name, value } => {
            let node = resolve_mut(document, location)?;
            let Document::Object(map) = node else {
                return Err(PatchError::not_found(location));
            };
            if let Some(existing) = map.get(name) {
                return Err(PatchError::ValueConflict {
                    location: keyed(location, name),
                    existing: document_json(existing),
                });
            }
            map.insert(name.clone(), value.clone());
        }
        Change::Remove { location, name, value } => {
            let node = resolve_mut(document, location)?;
            let Document::Object(map) = node else {
                return Err(PatchError::not_found(location));
            };
            match map.get(name) {
                None => {
                    return Err(PatchError::NotFound { location: keyed(location, name) });
                }
                Some(current) if current != value => {
                    return Err(PatchError::ValueMismatch {
                        location: keyed(location, name),
                        expected: document_json(value),
                        actual: document_json(current),
                    });
                }
                Some(_) => {
                    map.shift_remove(name);
                }
            }
        }
        Change::Insert { location, index, value } => {
            let node = resolve_mut(document, location)?;
            let Document::Array(items) = node else {
                return Err(PatchError::not_found(location));
            };
            // Splice semantics: out-of-range indices clamp to the end.
            let slot = (*index).min(items.len());
            items.insert(slot, value.clone());
        }
        Change::Delete { location, index, value } => {
            let node = resolve_mut(document, location)?;
            let Document::Array(items) = node else {
                return Err(PatchError::not_found(location));
            };
            match items.get(*index) {
                None => {
                    return Err(PatchError::ValueMismatch {
                        location: indexed(location, *index),
                        expected: document_json(value),
                        actual: "nothing".to_owned(),
                    });
                }
                Some(current) if current != value => {
                    return Err(PatchError::ValueMismatch {
                        location: indexed(location, *index),
                        expected: document_json(value),
                        actual: document_json(current),
                    });
                }
                Some(_) => {
                    items.remove(*index);
                }
            }
        }
        Change::Move { location, index, offset } => {
            let node = resolve_mut(document, location)?;
            let Document::Array(items) = node else {
                return Err(PatchError::not_found(location));
            };
            if *index >= items.len() {
                return Err(PatchError::NotFound { location: indexed(location, *index) });
            }
            let element = items.remove(*index);
            let destination = (*index as i64 + offset).clamp(0, items.len() as i64) as usize;
            items.insert(destination, element);
        }
        Change::InsertText { location, index, value } => {
            let node = resolve_mut(document, location)?;
            let Document::String(text) = node else {
                return Err(PatchError::not_found(location));
            };
            let at = byte_offset(text, *index);
            text.insert_str(at, value);
        }
        Change::DeleteText { location, index, value } => {
            let node = resolve_mut(document, location)?;
            let Document::String(text) = node else {
                return Err(PatchError::not_found(location));
            };
            let start = byte_offset(text, *index);
            let end = byte_offset(text, *index + value.chars().count());
            text.replace_range(start..end, "");
        }
    }
    Ok(())
}

fn keyed(location: &Location, name: &str) -> String {
    location.clone().with_segment(Segment::key(name)).to_string()
}

fn indexed(location: &Location, index: usize) -> String {
    location.clone().with_segment(Segment::index(index)).to_string()
}

/// Maps a character position to a byte offset, clamping past-the-end
/// positions to the end of the string.
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(at, _)| at)
}

fn document_json(document: &Document) -> String {
    serde_json::to_string(&document.to_json_value()).unwrap_or_default()
}
