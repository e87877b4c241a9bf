//! Changeset reversal.
//!
//! Each change maps to its structural inverse and the overall order is
//! reversed: later changes' indices were computed assuming earlier
//! changes had already executed, so undoing must proceed last-to-first.

use crate::{Change, Changeset};

/// Produces the changeset that undoes `changeset`.
///
/// The input is never mutated, and `reverse(reverse(c)) == c`.
///
/// ```
/// # use changeset_core::{reverse, Changeset};
/// let changeset = Changeset::empty();
/// assert!(reverse(&changeset).is_empty());
/// ```
#[must_use]
pub fn reverse(changeset: &Changeset) -> Changeset {
    let changes = changeset.iter().rev().map(reverse_change).collect();
    Changeset::from_changes(changes)
}

fn reverse_change(change: &Change) -> Change {
    match change {
        Change::Add { location, name, value } => Change::Remove {
            location: location.clone(),
            name: name.clone(),
            value: value.clone(),
        },
        Change::Remove { location, name, value } => Change::Add {
            location: location.clone(),
            name: name.clone(),
            value: value.clone(),
        },
        Change::Insert { location, index, value } => Change::Delete {
            location: location.clone(),
            index: *index,
            value: value.clone(),
        },
        Change::Delete { location, index, value } => Change::Insert {
            location: location.clone(),
            index: *index,
            value: value.clone(),
        },
        // A move relocated the element from `index` to `index + offset`;
        // the inverse picks it up there and pushes it back.
        Change::Move { location, index, offset } => Change::Move {
            location: location.clone(),
            index: index.saturating_add_signed(*offset as isize),
            offset: -offset,
        },
        Change::InsertText { location, index, value } => Change::DeleteText {
            location: location.clone(),
            index: *index,
            value: value.clone(),
        },
        Change::DeleteText { location, index, value } => Change::InsertText {
            location: location.clone(),
            index: *index,
            value: value.clone(),
        },
    }
}
