//! Changeset data structures and the differencing algorithm.
//!
//! The module defines the wire-format changeset representation along with
//! the recursive property comparison that drives object and array
//! diffing. The differencer never mutates its inputs and cannot fail
//! below the top-level argument shape check.

mod array;
mod location;
mod object;

pub use location::{Location, Segment};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DiffOptions, Document, DocumentKind};

/// A primitive edit operation.
///
/// Changes are interpreted against the document state produced by all
/// preceding changes in the same changeset, not the original document.
/// Values embedded in a change are independent copies of the document
/// nodes they were derived from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Change {
    /// Insert a new key under the mapping at `location`.
    Add {
        /// Address of the enclosing mapping.
        location: Location,
        /// Key to insert; must be absent when the change is applied.
        name: String,
        /// Value to associate with the key.
        value: Document,
    },
    /// Delete a key from the mapping at `location`.
    Remove {
        /// Address of the enclosing mapping.
        location: Location,
        /// Key to delete.
        name: String,
        /// Expected prior value; validated before the key is deleted.
        value: Document,
    },
    /// Insert a value into the sequence at `location`.
    Insert {
        /// Address of the sequence.
        location: Location,
        /// Position at which to insert.
        index: usize,
        /// Value to insert.
        value: Document,
    },
    /// Remove an element from the sequence at `location`.
    Delete {
        /// Address of the sequence.
        location: Location,
        /// Position of the element to remove.
        index: usize,
        /// Expected prior value; validated before the element is removed.
        value: Document,
    },
    /// Relocate an element of the sequence at `location` by a relative
    /// offset (negative = toward the front).
    Move {
        /// Address of the sequence.
        location: Location,
        /// Current position of the element.
        index: usize,
        /// Relative displacement to apply.
        offset: i64,
    },
    /// Splice text into the string at `location`.
    InsertText {
        /// Address of the string.
        location: Location,
        /// Character position at which to splice.
        index: usize,
        /// Text to insert.
        value: String,
    },
    /// Remove `value.chars().count()` characters from the string at
    /// `location`, starting at `index`.
    DeleteText {
        /// Address of the string.
        location: Location,
        /// Character position at which removal starts.
        index: usize,
        /// The text expected to be removed.
        value: String,
    },
}

/// An ordered sequence of [`Change`]s describing the transformation of one
/// document into another.
///
/// A changeset is immutable once produced: the patcher and the reverser
/// borrow it and never modify it. It serializes directly as a JSON array
/// of tagged records with no additional envelope.
///
/// ```
/// # use changeset_core::Changeset;
/// let changeset: Changeset = serde_json::from_str(
///     "[{\"op\":\"insert\",\"location\":[\"arr\"],\"index\":0,\"value\":1}]",
/// ).unwrap();
/// assert_eq!(changeset.len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Changeset {
    changes: Vec<Change>,
}

impl Changeset {
    /// Constructs an empty changeset.
    #[must_use]
    pub fn empty() -> Self {
        Self { changes: Vec::new() }
    }

    /// Builds a changeset from the provided changes.
    #[must_use]
    pub fn from_changes(changes: Vec<Change>) -> Self {
        Self { changes }
    }

    /// Returns the number of changes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Indicates whether the changeset is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Returns an iterator over the changes.
    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }

    /// Consumes the changeset and returns the owned changes.
    #[must_use]
    pub fn into_changes(self) -> Vec<Change> {
        self.changes
    }

    /// Produces the structural inverse of this changeset.
    ///
    /// ```
    /// # use changeset_core::{Changeset, DiffOptions, Document};
    /// let source = Document::from_json_str("{\"a\":1}")?;
    /// let target = Document::from_json_str("{\"a\":1,\"b\":2}")?;
    /// let changeset = source.diff(&target, &DiffOptions::default())?;
    /// let undo = changeset.reverse();
    /// assert_eq!(target.apply_changeset(&undo)?, source);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[must_use]
    pub fn reverse(&self) -> Self {
        crate::reverse::reverse(self)
    }
}

impl<'a> IntoIterator for &'a Changeset {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

impl IntoIterator for Changeset {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl From<Vec<Change>> for Changeset {
    fn from(changes: Vec<Change>) -> Self {
        Self::from_changes(changes)
    }
}

/// Errors raised by the differencer's top-level argument check.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiffError {
    /// One of the arguments was not a mapping at the top level.
    #[error("argument mismatch, {argument} should be a mapping but found {found} instead")]
    ArgumentType {
        /// Which argument failed the check (`source` or `target`).
        argument: &'static str,
        /// The shape that was found instead.
        found: DocumentKind,
    },
}

/// Computes the changeset transforming `source` into `target`.
///
/// Fails with [`DiffError::ArgumentType`] when either document is not a
/// mapping at the top level. Neither input is mutated.
///
/// ```
/// # use changeset_core::{diff, DiffOptions, Document};
/// let source = Document::from_json_str("{}")?;
/// let target = Document::from_json_str("{\"foo\":\"bar\"}")?;
/// let changeset = diff(&source, &target, &DiffOptions::default())?;
/// assert_eq!(changeset.len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn diff(
    source: &Document,
    target: &Document,
    options: &DiffOptions,
) -> Result<Changeset, DiffError> {
    let Document::Object(source_map) = source else {
        return Err(DiffError::ArgumentType { argument: "source", found: source.kind() });
    };
    let Document::Object(target_map) = target else {
        return Err(DiffError::ArgumentType { argument: "target", found: target.kind() });
    };

    let mut changes = Vec::new();
    object::diff_objects(source_map, target_map, &Location::new(), options, &mut changes);
    Ok(Changeset::from_changes(changes))
}

/// Dispatches on the runtime shapes of a paired property value.
///
/// Shared containers recurse; unequal strings become a whole-value text
/// replacement; any other inequality becomes remove-then-add at the
/// enclosing mapping.
pub(crate) fn diff_properties(
    source: &Document,
    target: &Document,
    location: &Location,
    name: &str,
    options: &DiffOptions,
    changes: &mut Vec<Change>,
) {
    match (source, target) {
        (Document::Array(source_items), Document::Array(target_items)) => {
            let child = location.clone().with_segment(Segment::key(name));
            array::diff_arrays(source_items, target_items, &child, options, changes);
        }
        (Document::Object(source_map), Document::Object(target_map)) => {
            let child = location.clone().with_segment(Segment::key(name));
            object::diff_objects(source_map, target_map, &child, options, changes);
        }
        (Document::String(source_text), Document::String(target_text)) => {
            if source_text != target_text {
                let affected = location.clone().with_segment(Segment::key(name));
                changes.push(Change::DeleteText {
                    location: affected.clone(),
                    index: 0,
                    value: source_text.clone(),
                });
                changes.push(Change::InsertText {
                    location: affected,
                    index: 0,
                    value: target_text.clone(),
                });
            }
        }
        _ => {
            if source != target {
                changes.push(Change::Remove {
                    location: location.clone(),
                    name: name.to_owned(),
                    value: source.clone(),
                });
                changes.push(Change::Add {
                    location: location.clone(),
                    name: name.to_owned(),
                    value: target.clone(),
                });
            }
        }
    }
}
