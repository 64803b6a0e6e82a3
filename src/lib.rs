#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Directory compilation into rectangular activity tables.
pub mod compile;
/// Grammar and table-format constants shared across modules.
pub mod constants;
/// Metadata tables and identifier-translation joins.
pub mod metadata;
/// Report text parsing into per-file probability tables.
pub mod report;
/// Filesystem collaborators (report listing, tree flattening).
pub mod transport;
/// Shared type aliases.
pub mod types;
/// Label normalization helpers.
pub mod utils;

mod errors;

pub use compile::{ActivityTable, Cell, ClassifierChoice, TableCompiler, TableRow};
pub use errors::ActivityError;
pub use metadata::{
    assign_metadata, clean_sample_id, parse_correspondence, parse_metadata, BgcMetadata,
    MetadataLookup,
};
pub use report::{parse_report, ReportTable};
pub use types::{ActivityName, ClassifierName, NewId, OldId, Probability, SampleId};
