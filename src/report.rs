//! Parser for free-text classifier probability reports.
//!
//! A report holds one or more activity blocks, each introduced by a header
//! of the form `probabilities of <phrase> activity:` and followed by
//! free-form `<classifier>: <number>` entries until the next header or the
//! end of the text.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::report::{ACTIVITY_HEADER_PATTERN, CLASSIFIER_ENTRY_PATTERN};
use crate::errors::ActivityError;
use crate::types::{ActivityName, ClassifierName, Probability};
use crate::utils::normalize_label;

static ACTIVITY_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(ACTIVITY_HEADER_PATTERN).expect("activity header pattern compiles")
});

static CLASSIFIER_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(CLASSIFIER_ENTRY_PATTERN).expect("classifier entry pattern compiles")
});

/// Per-report probability table: classifier column → activity → probability.
///
/// Classifier and activity sets vary between reports; consumers must not
/// assume any particular column is present.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportTable {
    columns: IndexMap<ClassifierName, IndexMap<ActivityName, Probability>>,
}

impl ReportTable {
    /// True when the report produced no classifier entries at all.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Classifier columns in first-seen order.
    pub fn columns(&self) -> &IndexMap<ClassifierName, IndexMap<ActivityName, Probability>> {
        &self.columns
    }

    /// Probability one classifier assigned to one activity, if present.
    pub fn probability(&self, classifier: &str, activity: &str) -> Option<Probability> {
        self.columns.get(classifier)?.get(activity).copied()
    }

    /// Owned copy of one classifier's activity probabilities.
    ///
    /// Empty when the report lacks that classifier; a compiled row built from
    /// it then carries only missing cells.
    pub fn column(&self, classifier: &str) -> IndexMap<ActivityName, Probability> {
        self.columns.get(classifier).cloned().unwrap_or_default()
    }

    /// Mean probability per activity across every classifier that scored it.
    ///
    /// Classifiers without a value for an activity are excluded from that
    /// activity's mean rather than counted as zero.
    pub fn mean_column(&self) -> IndexMap<ActivityName, Probability> {
        let mut sums: IndexMap<ActivityName, (f64, usize)> = IndexMap::new();
        for values in self.columns.values() {
            for (activity, probability) in values {
                let entry = sums.entry(activity.clone()).or_insert((0.0, 0));
                entry.0 += probability;
                entry.1 += 1;
            }
        }
        sums.into_iter()
            .map(|(activity, (sum, count))| (activity, sum / count as f64))
            .collect()
    }

    /// Record one entry; a repeated (classifier, activity) pair overwrites
    /// the earlier value (last write wins).
    fn insert(
        &mut self,
        classifier: ClassifierName,
        activity: ActivityName,
        probability: Probability,
    ) {
        self.columns
            .entry(classifier)
            .or_default()
            .insert(activity, probability);
    }
}

/// Parse one report into a per-report probability table.
///
/// Text before the first activity header is ignored. Fails with
/// [`ActivityError::NoActivityHeader`] when the text contains no header and
/// [`ActivityError::MalformedProbability`] when a probability token does not
/// parse as a number.
pub fn parse_report(text: &str) -> Result<ReportTable, ActivityError> {
    // (normalized activity, header start, body start) per block; the body
    // runs to the next header's start or the end of the text.
    let mut blocks: Vec<(ActivityName, usize, usize)> = Vec::new();
    for caps in ACTIVITY_HEADER.captures_iter(text) {
        let (Some(whole), Some(phrase)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        blocks.push((normalize_label(phrase.as_str()), whole.start(), whole.end()));
    }
    if blocks.is_empty() {
        return Err(ActivityError::NoActivityHeader);
    }

    let mut table = ReportTable::default();
    for (idx, (activity, _, body_start)) in blocks.iter().enumerate() {
        let body_end = blocks
            .get(idx + 1)
            .map(|(_, next_start, _)| *next_start)
            .unwrap_or(text.len());
        let body = &text[*body_start..body_end];
        for caps in CLASSIFIER_ENTRY.captures_iter(body) {
            let (Some(phrase), Some(token)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let classifier = normalize_label(phrase.as_str());
            let probability: Probability =
                token
                    .as_str()
                    .parse()
                    .map_err(|_| ActivityError::MalformedProbability {
                        classifier: classifier.clone(),
                        value: token.as_str().to_string(),
                    })?;
            table.insert(classifier, activity.clone(), probability);
        }
    }
    Ok(table)
}
