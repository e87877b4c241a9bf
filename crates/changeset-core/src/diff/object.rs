use indexmap::IndexMap;

use super::{Change, Location};
use crate::{DiffOptions, Document};

/// Compares two mappings key by key.
///
/// Source keys are visited in their stored order: keys absent from the
/// target become removals, retained keys recurse through the property
/// dispatch. Target-only keys are then visited in their stored order and
/// become additions. At any one mapping level this places all removals
/// and in-place changes before all pure additions.
pub(super) fn diff_objects(
    source: &IndexMap<String, Document>,
    target: &IndexMap<String, Document>,
    location: &Location,
    options: &DiffOptions,
    changes: &mut Vec<Change>,
) {
    for (name, source_value) in source {
        match target.get(name) {
            Some(target_value) => {
                super::diff_properties(source_value, target_value, location, name, options, changes);
            }
            None => {
                changes.push(Change::Remove {
                    location: location.clone(),
                    name: name.clone(),
                    value: source_value.clone(),
                });
            }
        }
    }

    for (name, target_value) in target {
        if !source.contains_key(name) {
            changes.push(Change::Add {
                location: location.clone(),
                name: name.clone(),
                value: target_value.clone(),
            });
        }
    }
}
