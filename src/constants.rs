/// Constants describing the classifier report grammar.
pub mod report {
    /// Header marking the start of one activity block; captures the activity phrase.
    pub const ACTIVITY_HEADER_PATTERN: &str = r"probabilities of ([\w\s-]+) activity:";
    /// Entry pattern capturing a classifier phrase and its probability token.
    ///
    /// Phrases are one or more words of letters; whitespace between words may
    /// include line breaks, so entries are extracted independently of layout.
    pub const CLASSIFIER_ENTRY_PATTERN: &str = r"([A-Za-z]+(?:\s+[A-Za-z]+)*):\s*([0-9.]+)";
    /// Default file extension for report files (without the dot).
    pub const REPORT_EXTENSION: &str = "txt";
    /// Suffix joining a classifier choice name to its report column key.
    pub const CLASSIFIER_COLUMN_SUFFIX: &str = "_classifier";
    /// Separator joining words in canonical activity/classifier keys.
    pub const LABEL_SEPARATOR: &str = "_";
    /// Connector word treated as a separator inside activity phrases.
    pub const LABEL_CONNECTOR: &str = "or";
}

/// Constants describing the metadata and correspondence table formats.
pub mod tables {
    /// Field separator for metadata and correspondence files.
    pub const FIELD_DELIMITER: char = '\t';
    /// Delimiter starting the region suffix in pipeline identifiers.
    pub const REGION_DELIMITER: char = '.';
    /// Marker rendered for missing cells in tab-separated output.
    pub const MISSING_MARKER: &str = "NA";
}
