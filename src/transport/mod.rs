//! Filesystem collaborators for report ingestion.

/// Report listing, file-stem helpers, and tree flattening.
pub mod fs;
