//! Canonical data model shared by every normalizer and the store.
//!
//! Whatever the input format, components are reduced to a
//! [`CanonicalRecord`]. The store persists those records under a
//! per-project [`SbomFile`] header and answers queries with the row types
//! defined alongside it.

mod record;
mod rows;

pub use record::*;
pub use rows::*;
