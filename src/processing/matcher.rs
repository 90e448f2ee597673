use crate::models::MrzFieldSet;

/// MatchEvaluator scores a detected field set against the expected one.
pub struct MatchEvaluator;

impl MatchEvaluator {
    /// A record matches only when the expected document number parsed at
    /// all and every field is exactly equal. The guard keeps a double
    /// extraction failure (both sides all-null) from counting as a match.
    pub fn is_match(expected: &MrzFieldSet, detected: &MrzFieldSet) -> bool {
        if expected.document_number.is_none() {
            return false;
        }
        expected.document_number == detected.document_number
            && expected.date_of_birth == detected.date_of_birth
            && expected.expiration_date == detected.expiration_date
    }
}
