//! Recipient substring filter.
//!
//! # Responsibility
//! - Normalize a user search term into an optional recipient filter.
//! - Own the case folding shared by the SQLite store and in-process matching.
//!
//! # Invariants
//! - Blank terms produce no filter (`Some("")` behaves like `None`).
//! - Matching is a Unicode case-insensitive substring test; `%`, `_` and `\`
//!   are ordinary characters.
//! - `matches` and the store predicate fold case through the same function.

/// SQL scalar function registered on every store connection; applies
/// `fold_case` to its argument.
pub const FOLD_CASE_SQL_FN: &str = "unsent_fold_case";

/// Unicode lowercase folding used on both sides of a recipient match.
pub fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

/// Case-insensitive "recipient contains" filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientFilter {
    term: String,
    folded: String,
}

impl RecipientFilter {
    /// Returns `None` for absent or blank terms.
    pub fn parse(term: Option<&str>) -> Option<Self> {
        let term = term?.trim();
        if term.is_empty() {
            return None;
        }
        Some(Self {
            term: term.to_string(),
            folded: fold_case(term),
        })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// Case-folded term bound into the store query.
    pub fn folded_term(&self) -> &str {
        &self.folded
    }

    /// In-process equivalent of the store predicate.
    pub fn matches(&self, recipient: &str) -> bool {
        fold_case(recipient).contains(self.folded.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::RecipientFilter;

    #[test]
    fn blank_terms_produce_no_filter() {
        assert_eq!(RecipientFilter::parse(None), None);
        assert_eq!(RecipientFilter::parse(Some("")), None);
        assert_eq!(RecipientFilter::parse(Some("   ")), None);
    }

    #[test]
    fn folded_term_is_trimmed_and_lowercased() {
        let filter = RecipientFilter::parse(Some("  ÉLO ")).unwrap();
        assert_eq!(filter.term(), "ÉLO");
        assert_eq!(filter.folded_term(), "élo");
    }

    #[test]
    fn matches_is_case_insensitive_substring() {
        let filter = RecipientFilter::parse(Some("ana")).unwrap();
        assert!(filter.matches("Ana"));
        assert!(filter.matches("banana"));
        assert!(filter.matches("ANA"));
        assert!(!filter.matches("Anna"));
    }

    #[test]
    fn matches_folds_non_ascii_letters() {
        let filter = RecipientFilter::parse(Some("élodie")).unwrap();
        assert!(filter.matches("Élodie"));
        assert!(filter.matches("ÉLODIE"));
        assert!(!filter.matches("Elodie"));
    }

    #[test]
    fn wildcard_characters_are_literal() {
        let filter = RecipientFilter::parse(Some("50%")).unwrap();
        assert!(filter.matches("50% of me"));
        assert!(!filter.matches("500 of me"));
    }
}
