//! Structural diff, patch, and reversal for tree-shaped documents.
//!
//! `changeset-core` computes the difference between two documents (nested
//! mappings, sequences, and scalars) as an ordered changeset of primitive
//! edit operations, applies a changeset to reconstruct the target from
//! the source, and inverts a changeset to produce its undo. Array
//! reconciliation matches elements by a pluggable identity field when one
//! is present and by content hash otherwise, and detects reorderings as
//! `move` operations.
//!
//! ```
//! use changeset_core::{DiffOptions, Document};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = Document::from_json_str("{\"name\":\"a\",\"tags\":[\"x\",\"y\"]}")?;
//!     let target = Document::from_json_str("{\"name\":\"b\",\"tags\":[\"y\",\"x\"]}")?;
//!
//!     let changeset = source.diff(&target, &DiffOptions::default())?;
//!     let patched = source.apply_changeset(&changeset)?;
//!     assert_eq!(patched, target);
//!
//!     let undo = changeset.reverse();
//!     assert_eq!(patched.apply_changeset(&undo)?, source);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod diff;
mod document;
mod error;
mod hash;
mod number;
mod options;
mod patch;
mod reverse;

pub use diff::{diff, Change, Changeset, DiffError, Location, Segment};
pub use document::{Document, DocumentKind};
pub use error::DocumentError;
pub use hash::{combine, hash_bytes, HashCode};
pub use number::Number;
pub use options::{DiffOptions, DEFAULT_IDENTITY_KEY};
pub use patch::{apply, PatchError};
pub use reverse::reverse;

/// Returns the semantic version of the `changeset-core` crate.
///
/// ```
/// assert!(!changeset_core::version().is_empty());
/// ```
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
