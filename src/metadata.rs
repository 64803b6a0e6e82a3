//! Metadata tables and identifier-translation joins for scored samples.
//!
//! The scoring pipeline renames samples, so metadata lookups go through a
//! two-column translation table: pipeline ids are cleaned of their region
//! suffix, translated back to the metadata table's ids, and resolved.
//! Identifiers that cannot be resolved stay in the output as explicit
//! not-found entries; the join never fails on them.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::tables::{FIELD_DELIMITER, REGION_DELIMITER};
use crate::errors::ActivityError;
use crate::types::{NewId, OldId};

/// External annotation for one biosynthetic gene cluster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BgcMetadata {
    /// Predicted product function.
    pub function: String,
    /// Source organism taxonomy.
    pub taxonomy: String,
    /// Novelty score relative to characterized clusters.
    pub novelty: f64,
    /// Gene cluster family identifier.
    pub gcf_id: i64,
}

/// Join result for one looked-up identifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MetadataLookup {
    /// Metadata resolved through the correspondence table.
    Found(BgcMetadata),
    /// No correspondence or metadata entry exists for the identifier.
    NotFound,
}

impl MetadataLookup {
    /// The resolved record, if any.
    pub fn record(&self) -> Option<&BgcMetadata> {
        match self {
            Self::Found(record) => Some(record),
            Self::NotFound => None,
        }
    }
}

/// Load a tab-separated metadata table keyed by old identifier.
///
/// The first line is a header and is skipped; blank lines are tolerated.
/// Each remaining line needs at least five fields in order: id, function,
/// taxonomy, novelty (float), gcf id (integer); extra fields are ignored.
pub fn parse_metadata(path: &Path) -> Result<IndexMap<OldId, BgcMetadata>, ActivityError> {
    let text = fs::read_to_string(path)?;
    let mut metadata = IndexMap::new();
    for (idx, line) in text.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        if fields.len() < 5 {
            return Err(malformed_line(
                path,
                idx,
                format!("expected 5 tab-separated fields, found {}", fields.len()),
            ));
        }
        let novelty = fields[3]
            .trim()
            .parse()
            .map_err(|_| malformed_line(path, idx, format!("bad novelty score '{}'", fields[3])))?;
        let gcf_id = fields[4]
            .trim()
            .parse()
            .map_err(|_| malformed_line(path, idx, format!("bad gcf id '{}'", fields[4])))?;
        metadata.insert(
            fields[0].to_string(),
            BgcMetadata {
                function: fields[1].to_string(),
                taxonomy: fields[2].to_string(),
                novelty,
                gcf_id,
            },
        );
    }
    debug!(path = %path.display(), records = metadata.len(), "metadata table loaded");
    Ok(metadata)
}

/// Load a two-column tab-separated old→new identifier translation table.
///
/// No header line; blank lines are tolerated. A repeated old id keeps the
/// later line's translation.
pub fn parse_correspondence(path: &Path) -> Result<IndexMap<OldId, NewId>, ActivityError> {
    let text = fs::read_to_string(path)?;
    let mut correspondence = IndexMap::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((old_id, new_id)) = line.split_once(FIELD_DELIMITER) else {
            return Err(malformed_line(
                path,
                idx,
                "expected 2 tab-separated fields".to_string(),
            ));
        };
        correspondence.insert(old_id.to_string(), new_id.trim().to_string());
    }
    debug!(path = %path.display(), entries = correspondence.len(), "correspondence table loaded");
    Ok(correspondence)
}

/// Strip the region suffix from a pipeline identifier: everything from the
/// first `.` onward (`BGC0001.region001` → `BGC0001`).
pub fn clean_sample_id(id: &str) -> NewId {
    id.split_once(REGION_DELIMITER)
        .map(|(head, _)| head)
        .unwrap_or(id)
        .to_string()
}

/// Attach metadata to scored samples through the identifier translation table.
///
/// The correspondence table is inverted to map new ids back to old ids; when
/// two old ids translate to the same new id, the later entry wins the inverse
/// lookup (a known data-quality hazard in the tables, preserved as-is).
/// Each input id is cleaned with [`clean_sample_id`] before lookup, and the
/// output is keyed by cleaned id: a cleaned id appearing twice keeps the last
/// occurrence. Unresolvable ids map to [`MetadataLookup::NotFound`].
pub fn assign_metadata<I, S>(
    ids: I,
    metadata: &IndexMap<OldId, BgcMetadata>,
    correspondence: &IndexMap<OldId, NewId>,
) -> IndexMap<NewId, MetadataLookup>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut inverse: IndexMap<&str, &str> = IndexMap::new();
    for (old_id, new_id) in correspondence {
        inverse.insert(new_id.as_str(), old_id.as_str());
    }
    let mut joined = IndexMap::new();
    for id in ids {
        let cleaned = clean_sample_id(id.as_ref());
        let lookup = inverse
            .get(cleaned.as_str())
            .and_then(|old_id| metadata.get(*old_id))
            .map(|record| MetadataLookup::Found(record.clone()))
            .unwrap_or(MetadataLookup::NotFound);
        joined.insert(cleaned, lookup);
    }
    joined
}

fn malformed_line(path: &Path, idx: usize, reason: String) -> ActivityError {
    ActivityError::MalformedTableLine {
        table: path.display().to_string(),
        line: idx + 1,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn sample_record(function: &str) -> BgcMetadata {
        BgcMetadata {
            function: function.to_string(),
            taxonomy: "Actinobacteria".to_string(),
            novelty: 0.42,
            gcf_id: 17,
        }
    }

    #[test]
    fn clean_sample_id_strips_from_first_dot() {
        assert_eq!(clean_sample_id("BGC0001.region001"), "BGC0001");
        assert_eq!(clean_sample_id("BGC0001.region001.gbk"), "BGC0001");
        assert_eq!(clean_sample_id("BGC0001"), "BGC0001");
    }

    #[test]
    fn resolves_metadata_through_correspondence() {
        let metadata = IndexMap::from([("old1".to_string(), sample_record("antibiotic"))]);
        let correspondence = IndexMap::from([("old1".to_string(), "BGC0001".to_string())]);
        let joined = assign_metadata(["BGC0001.region001"], &metadata, &correspondence);
        assert_eq!(
            joined.get("BGC0001"),
            Some(&MetadataLookup::Found(sample_record("antibiotic")))
        );
    }

    #[test]
    fn unresolvable_ids_are_kept_as_not_found() {
        let metadata = IndexMap::from([("old1".to_string(), sample_record("antibiotic"))]);
        let correspondence = IndexMap::from([("old1".to_string(), "BGC0001".to_string())]);
        // No correspondence entry at all.
        let joined = assign_metadata(["BGC9999.region001"], &metadata, &correspondence);
        assert_eq!(joined.get("BGC9999"), Some(&MetadataLookup::NotFound));
        // Correspondence resolves but metadata lacks the old id.
        let thin_metadata: IndexMap<OldId, BgcMetadata> = IndexMap::new();
        let joined = assign_metadata(["BGC0001.region001"], &thin_metadata, &correspondence);
        assert_eq!(joined.get("BGC0001"), Some(&MetadataLookup::NotFound));
    }

    #[test]
    fn later_correspondence_entry_wins_duplicate_new_id() {
        let metadata = IndexMap::from([
            ("old1".to_string(), sample_record("antibiotic")),
            ("old2".to_string(), sample_record("siderophore")),
        ]);
        let correspondence = IndexMap::from([
            ("old1".to_string(), "BGC0001".to_string()),
            ("old2".to_string(), "BGC0001".to_string()),
        ]);
        let joined = assign_metadata(["BGC0001.region001"], &metadata, &correspondence);
        assert_eq!(
            joined.get("BGC0001"),
            Some(&MetadataLookup::Found(sample_record("siderophore")))
        );
    }

    #[test]
    fn duplicate_input_ids_keep_last_occurrence() {
        let metadata = IndexMap::from([("old1".to_string(), sample_record("antibiotic"))]);
        let correspondence = IndexMap::from([("old1".to_string(), "BGC0001".to_string())]);
        let joined = assign_metadata(
            ["BGC0001.region001", "BGC0001.region002"],
            &metadata,
            &correspondence,
        );
        assert_eq!(joined.len(), 1);
        assert!(joined.get("BGC0001").and_then(MetadataLookup::record).is_some());
    }

    #[test]
    fn parses_metadata_table_skipping_header() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("metadata.tsv");
        fs::write(
            &path,
            "id\tfunction\ttaxonomy\tnovelty\tgcf_id\n\
             old1\tantibiotic\tActinobacteria\t0.42\t17\n\
             \n\
             old2\tsiderophore\tFirmicutes\t0.10\t3\n",
        )
        .unwrap();
        let metadata = parse_metadata(&path).unwrap();
        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata.get("old1"), Some(&sample_record("antibiotic")));
        assert_eq!(metadata.get("old2").map(|r| r.gcf_id), Some(3));
    }

    #[test]
    fn malformed_metadata_line_is_reported_with_position() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("metadata.tsv");
        fs::write(
            &path,
            "id\tfunction\ttaxonomy\tnovelty\tgcf_id\n\
             old1\tantibiotic\tActinobacteria\tnot_a_number\t17\n",
        )
        .unwrap();
        let err = parse_metadata(&path).unwrap_err();
        match err {
            ActivityError::MalformedTableLine { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("novelty"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parses_correspondence_with_later_lines_overriding() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("correspondence.tsv");
        fs::write(&path, "old1\tBGC0001\nold2\tBGC0002\nold1\tBGC0003\n").unwrap();
        let correspondence = parse_correspondence(&path).unwrap();
        assert_eq!(correspondence.len(), 2);
        assert_eq!(correspondence.get("old1").map(String::as_str), Some("BGC0003"));
    }

    #[test]
    fn correspondence_line_without_tab_is_malformed() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("correspondence.tsv");
        fs::write(&path, "old1 BGC0001\n").unwrap();
        let err = parse_correspondence(&path).unwrap_err();
        assert!(matches!(err, ActivityError::MalformedTableLine { line: 1, .. }));
    }
}
