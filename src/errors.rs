use std::io;

use thiserror::Error;

use crate::types::ClassifierName;

/// Error type for report parsing, table compilation, and table loading failures.
#[derive(Debug, Error)]
pub enum ActivityError {
    /// The requested classifier is not one of the recognized choices.
    #[error("invalid classifier choice '{0}', must be one of: tree, logistic_regression, svm, mean")]
    InvalidClassifier(String),
    /// The report text contains no recognizable activity header.
    #[error("no activity header found in report text")]
    NoActivityHeader,
    /// A probability token matched the grammar but is not a valid number.
    #[error("malformed probability '{value}' for classifier '{classifier}'")]
    MalformedProbability {
        /// Classifier whose entry carried the bad token.
        classifier: ClassifierName,
        /// The offending token as it appeared in the report.
        value: String,
    },
    /// A metadata or correspondence table line does not match its format.
    #[error("malformed line {line} in {table}: {reason}")]
    MalformedTableLine {
        /// Path of the table file, for reporting.
        table: String,
        /// 1-based line number of the offending line.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },
    /// Underlying filesystem failure, fatal for the operation.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ActivityError {
    /// True for per-report parse failures that directory compilation degrades
    /// to an all-missing row instead of aborting on.
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            Self::NoActivityHeader | Self::MalformedProbability { .. }
        )
    }
}
