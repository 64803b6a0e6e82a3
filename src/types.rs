/// Canonical activity category key after normalization.
/// Examples: `antibacterial`, `cytotoxic_antitumor`
pub type ActivityName = String;
/// Canonical classifier column key after normalization.
/// Examples: `tree_classifier`, `logistic_regression_classifier`
pub type ClassifierName = String;
/// Sample identifier derived from a report file stem.
/// Example: `BGC0000001`
pub type SampleId = String;
/// Identifier keying the external metadata table (pre-renaming).
/// Example: `ctg1_orf00042`
pub type OldId = String;
/// Identifier used by the scoring pipeline, cleaned of its region suffix.
/// Example: `BGC0000001` (from `BGC0000001.region001`)
pub type NewId = String;
/// Probability a classifier assigns to one activity.
pub type Probability = f64;
