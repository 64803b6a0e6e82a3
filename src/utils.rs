//! Label normalization shared by activity and classifier names.

use crate::constants::report::{LABEL_CONNECTOR, LABEL_SEPARATOR};

/// Normalize a free-text activity or classifier phrase into its canonical key.
///
/// Lowercases, drops the standalone connector word "or", and joins the
/// remaining whitespace-separated words with underscores. Leading and
/// trailing whitespace and runs of interior whitespace collapse to a single
/// separator. Idempotent: a canonical key normalizes to itself.
pub fn normalize_label<T: AsRef<str>>(label: T) -> String {
    label
        .as_ref()
        .to_lowercase()
        .split_whitespace()
        .filter(|word| *word != LABEL_CONNECTOR)
        .collect::<Vec<_>>()
        .join(LABEL_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_joins_words() {
        assert_eq!(normalize_label("Tree Classifier"), "tree_classifier");
        assert_eq!(normalize_label("antibacterial"), "antibacterial");
    }

    #[test]
    fn connector_word_becomes_separator() {
        assert_eq!(
            normalize_label("cytotoxic or antitumor"),
            "cytotoxic_antitumor"
        );
        // Only the standalone word is dropped, not substrings.
        assert_eq!(normalize_label("organic extract"), "organic_extract");
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(normalize_label("  gram   negative\t"), "gram_negative");
        assert_eq!(normalize_label("a\nb"), "a_b");
    }

    #[test]
    fn hyphens_and_digits_survive() {
        assert_eq!(normalize_label("anti-MRSA 2"), "anti-mrsa_2");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["Cytotoxic or Antitumor", "tree classifier", "anti-MRSA"] {
            let once = normalize_label(raw);
            assert_eq!(normalize_label(&once), once);
        }
    }
}
