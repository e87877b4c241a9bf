//! Array reconciliation with identity/content matching and move detection.
//!
//! A single-pass greedy heuristic over two index queues. It detects pure
//! rotations and backward shifts as compact sequences of `move` ops;
//! elements moving forward relative to the source may instead be emitted
//! as several single-step moves. That asymmetry is an intentional,
//! documented limitation of the heuristic.

use std::collections::VecDeque;

use super::{object, Change, Location, Segment};
use crate::hash::HashCode;
use crate::{DiffOptions, Document};

/// Transient per-element matching metadata.
///
/// The content hash is computed only when the element has no identity, so
/// two identity-bearing elements always compare equal under hash matching.
/// Head-to-head comparisons never take that path (both heads carrying an
/// identity selects identity matching), but searches deeper into the
/// opposite queue can; the resulting spurious match only costs an extra
/// move, never a wrong reconstruction.
struct ElementMeta<'a> {
    identity: Option<&'a Document>,
    hash: Option<HashCode>,
    value: &'a Document,
}

fn compute_metadata<'a>(values: &'a [Document], options: &DiffOptions) -> Vec<ElementMeta<'a>> {
    values
        .iter()
        .map(|value| {
            let identity = options.identity_of(value);
            let hash = if identity.is_none() { Some(value.hash_code()) } else { None };
            ElementMeta { identity, hash, value }
        })
        .collect()
}

fn matched(a: &ElementMeta<'_>, b: &ElementMeta<'_>, by_identity: bool) -> bool {
    if by_identity {
        a.identity == b.identity
    } else {
        a.hash == b.hash
    }
}

pub(super) fn diff_arrays(
    source: &[Document],
    target: &[Document],
    location: &Location,
    options: &DiffOptions,
    changes: &mut Vec<Change>,
) {
    let source_meta = compute_metadata(source, options);
    let target_meta = compute_metadata(target, options);

    let mut source_queue: VecDeque<usize> = (0..source_meta.len()).collect();
    let mut target_queue: VecDeque<usize> = (0..target_meta.len()).collect();

    // Index already emitted into the reconciled prefix.
    let mut i = 0usize;

    while let (Some(&s), Some(&t)) = (source_queue.front(), target_queue.front()) {
        // The matching rule is chosen per comparison from the two current
        // heads: identity equality when both carry one, content hash
        // otherwise.
        let by_identity =
            source_meta[s].identity.is_some() && target_meta[t].identity.is_some();

        if matched(&target_meta[t], &source_meta[s], by_identity) {
            // Same logical element, possibly internally modified.
            diff_matched(source_meta[s].value, target_meta[t].value, location, i, options, changes);
            source_queue.pop_front();
            target_queue.pop_front();
            i += 1;
            continue;
        }

        let source_head_survives = target_queue
            .iter()
            .any(|&candidate| matched(&target_meta[candidate], &source_meta[s], by_identity));

        if !source_head_survives {
            // No counterpart anywhere in the target: the element is gone.
            // Later elements shift down to fill the gap, so `i` stays put.
            changes.push(Change::Delete {
                location: location.clone(),
                index: i,
                value: source_meta[s].value.clone(),
            });
            source_queue.pop_front();
            continue;
        }

        let target_head_origin = source_queue
            .iter()
            .position(|&candidate| matched(&source_meta[candidate], &target_meta[t], by_identity));

        match target_head_origin {
            None => {
                // The target head is new material.
                changes.push(Change::Insert {
                    location: location.clone(),
                    index: i,
                    value: target_meta[t].value.clone(),
                });
                target_queue.pop_front();
                i += 1;
            }
            Some(distance) => {
                // Both elements exist later in the other queue: reorder.
                // The target head currently sits `distance` positions ahead
                // of the comparison point; pull it to the front of the
                // remaining window and re-examine the heads.
                changes.push(Change::Move {
                    location: location.clone(),
                    index: i + distance,
                    offset: -(distance as i64),
                });
                if let Some(moved) = source_queue.remove(distance) {
                    source_queue.push_front(moved);
                }
            }
        }
    }

    // Everything left in the source queue is a trailing deletion. Each
    // deletion shifts its successors down to position `i`, so every one is
    // emitted at the same index.
    for &s in &source_queue {
        changes.push(Change::Delete {
            location: location.clone(),
            index: i,
            value: source_meta[s].value.clone(),
        });
    }

    for (j, &t) in target_queue.iter().enumerate() {
        changes.push(Change::Insert {
            location: location.clone(),
            index: i + j,
            value: target_meta[t].value.clone(),
        });
    }
}

/// Recurses into a pair of matched array elements at `location[index]`.
///
/// Identity-matched mappings may differ internally; hash-matched values
/// are content-equal, so non-container pairs need no further changes.
fn diff_matched(
    source: &Document,
    target: &Document,
    location: &Location,
    index: usize,
    options: &DiffOptions,
    changes: &mut Vec<Change>,
) {
    let child = location.clone().with_segment(Segment::index(index));
    match (source, target) {
        (Document::Object(source_map), Document::Object(target_map)) => {
            object::diff_objects(source_map, target_map, &child, options, changes);
        }
        (Document::Array(source_items), Document::Array(target_items)) => {
            diff_arrays(source_items, target_items, &child, options, changes);
        }
        _ => {}
    }
}
