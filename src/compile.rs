//! Directory-level compilation of classifier reports into one activity table.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::report::{CLASSIFIER_COLUMN_SUFFIX, REPORT_EXTENSION};
use crate::constants::tables::MISSING_MARKER;
use crate::errors::ActivityError;
use crate::report::parse_report;
use crate::transport::fs::{file_stem_string, report_files};
use crate::types::{ActivityName, ClassifierName, Probability, SampleId};

/// Classifier column used when compiling a directory of reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassifierChoice {
    /// Decision-tree classifier column.
    Tree,
    /// Logistic-regression classifier column.
    LogisticRegression,
    /// Support-vector-machine classifier column.
    Svm,
    /// Arithmetic mean across every classifier that scored an activity.
    Mean,
}

impl ClassifierChoice {
    /// Canonical names accepted by [`FromStr`], in declaration order.
    pub const NAMES: [&'static str; 4] = ["tree", "logistic_regression", "svm", "mean"];

    /// Report column key for a named classifier; `None` for [`Self::Mean`],
    /// which aggregates instead of selecting.
    pub fn column_name(&self) -> Option<ClassifierName> {
        match self {
            Self::Mean => None,
            _ => Some(format!("{}{}", self, CLASSIFIER_COLUMN_SUFFIX)),
        }
    }
}

impl fmt::Display for ClassifierChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Tree => "tree",
            Self::LogisticRegression => "logistic_regression",
            Self::Svm => "svm",
            Self::Mean => "mean",
        };
        f.write_str(name)
    }
}

impl FromStr for ClassifierChoice {
    type Err = ActivityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tree" => Ok(Self::Tree),
            "logistic_regression" => Ok(Self::LogisticRegression),
            "svm" => Ok(Self::Svm),
            "mean" => Ok(Self::Mean),
            other => Err(ActivityError::InvalidClassifier(other.to_string())),
        }
    }
}

/// One cell of a compiled activity table.
///
/// Absent sample/activity combinations stay [`Cell::Missing`] through every
/// transformation; they are never coerced to zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// No probability was reported for this sample/activity combination.
    Missing,
    /// Continuous probability, as selected or averaged from a report.
    Probability(Probability),
    /// Binary presence call produced by a cutoff.
    Call(u8),
}

impl Cell {
    /// True for [`Cell::Missing`].
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Numeric view of a present cell; `None` when missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Missing => None,
            Self::Probability(p) => Some(*p),
            Self::Call(call) => Some(f64::from(*call)),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str(MISSING_MARKER),
            Self::Probability(p) => write!(f, "{p}"),
            Self::Call(call) => write!(f, "{call}"),
        }
    }
}

/// One sample row of an [`ActivityTable`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Sample identifier (report file stem).
    pub sample: SampleId,
    /// Cells aligned with the table's activity columns.
    pub cells: Vec<Cell>,
}

/// Rectangular table of activity values with one row per report file.
///
/// Columns are the sorted union of activity names observed across the
/// selected per-file columns; rows follow sorted file-name order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivityTable {
    activities: Vec<ActivityName>,
    rows: Vec<TableRow>,
}

impl ActivityTable {
    /// Assemble a rectangular table from per-sample activity columns.
    ///
    /// Row order follows the map's insertion order; activity columns are the
    /// sorted union across all samples, with absent entries kept missing.
    fn from_columns(columns: IndexMap<SampleId, IndexMap<ActivityName, Probability>>) -> Self {
        let mut activities: Vec<ActivityName> = columns
            .values()
            .flat_map(|values| values.keys().cloned())
            .collect();
        activities.sort();
        activities.dedup();
        let rows = columns
            .into_iter()
            .map(|(sample, values)| TableRow {
                cells: activities
                    .iter()
                    .map(|activity| match values.get(activity) {
                        Some(probability) => Cell::Probability(*probability),
                        None => Cell::Missing,
                    })
                    .collect(),
                sample,
            })
            .collect();
        Self { activities, rows }
    }

    /// Activity column names, sorted.
    pub fn activities(&self) -> &[ActivityName] {
        &self.activities
    }

    /// Sample rows in sorted file-name order.
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Number of sample rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell for one sample/activity combination; `None` when either the
    /// sample or the activity is not part of the table at all.
    pub fn get(&self, sample: &str, activity: &str) -> Option<Cell> {
        let column = self.activities.iter().position(|name| name == activity)?;
        self.rows
            .iter()
            .find(|row| row.sample == sample)
            .and_then(|row| row.cells.get(column))
            .copied()
    }

    /// Binarize present cells against `cutoff`: 1 when the value is at least
    /// the cutoff, 0 otherwise. Missing cells stay missing; already-binary
    /// cells are left as they are.
    pub fn binarized(&self, cutoff: f64) -> ActivityTable {
        let rows = self
            .rows
            .iter()
            .map(|row| TableRow {
                sample: row.sample.clone(),
                cells: row
                    .cells
                    .iter()
                    .map(|cell| match cell {
                        Cell::Probability(p) => Cell::Call(u8::from(*p >= cutoff)),
                        other => *other,
                    })
                    .collect(),
            })
            .collect();
        ActivityTable {
            activities: self.activities.clone(),
            rows,
        }
    }

    /// Samples carrying at least one positive presence call.
    ///
    /// Meaningful after binarization; the result feeds the metadata join.
    pub fn samples_with_positive_call(&self) -> Vec<SampleId> {
        self.rows
            .iter()
            .filter(|row| {
                row.cells
                    .iter()
                    .any(|cell| matches!(cell, Cell::Call(call) if *call == 1))
            })
            .map(|row| row.sample.clone())
            .collect()
    }

    /// Render as tab-separated text with a leading sample column and
    /// [`MISSING_MARKER`](crate::constants::tables::MISSING_MARKER) for
    /// missing cells.
    pub fn to_tsv(&self) -> String {
        let mut out = String::new();
        out.push_str("sample");
        for activity in &self.activities {
            out.push('\t');
            out.push_str(activity);
        }
        out.push('\n');
        for row in &self.rows {
            out.push_str(&row.sample);
            for cell in &row.cells {
                out.push('\t');
                out.push_str(&cell.to_string());
            }
            out.push('\n');
        }
        out
    }
}

/// Compiles every report under a directory into one [`ActivityTable`].
///
/// Files are enumerated non-recursively and processed in sorted file-name
/// order so compiled row order is reproducible. Reports that fail to parse
/// are logged and kept as all-missing rows; I/O failures abort the compile.
pub struct TableCompiler {
    root: PathBuf,
    choice: ClassifierChoice,
    cutoff: Option<f64>,
    extension: String,
}

impl TableCompiler {
    /// Create a compiler for the reports directly under `root`.
    pub fn new(root: impl Into<PathBuf>, choice: ClassifierChoice) -> Self {
        Self {
            root: root.into(),
            choice,
            cutoff: None,
            extension: REPORT_EXTENSION.to_string(),
        }
    }

    /// Binarize present cells against `cutoff` after assembly.
    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }

    /// Override the report file extension (default `txt`, matched
    /// case-insensitively, without the dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Compile the directory into a rectangular table, one row per report.
    pub fn compile(&self) -> Result<ActivityTable, ActivityError> {
        let files = report_files(&self.root, &self.extension)?;
        let mut columns: IndexMap<SampleId, IndexMap<ActivityName, Probability>> = IndexMap::new();
        for path in &files {
            let text = fs::read_to_string(path)?;
            let sample = file_stem_string(path);
            let selected = match parse_report(&text) {
                Ok(report) => match self.choice.column_name() {
                    Some(column) => report.column(&column),
                    None => report.mean_column(),
                },
                Err(err) if err.is_parse_failure() => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "skipping unparseable report, row kept as all-missing"
                    );
                    IndexMap::new()
                }
                Err(err) => return Err(err),
            };
            debug!(
                sample = %sample,
                activities = selected.len(),
                "report column selected"
            );
            columns.insert(sample, selected);
        }
        let table = ActivityTable::from_columns(columns);
        Ok(match self.cutoff {
            Some(cutoff) => table.binarized(cutoff),
            None => table,
        })
    }
}
