//! Human-facing item identifier value object.

use serde::{Deserialize, Serialize};

use gearbase_core::{DomainError, DomainResult, ValueObject};

const MAX_LEN: usize = 50;
/// Width of the generated numeric suffix (`BASE-0001`).
const SEQ_WIDTH: usize = 4;
const MAX_SEQ: u32 = 9999;

/// Normalized, validated item code (e.g. `ROPE-0001`, `TENT/4P`).
///
/// Constructed only through [`ItemIdentifier::parse`] or
/// [`ItemIdentifier::generate_unique`]; the inner representation stays
/// private so no invalid instance can exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemIdentifier(String);

impl ItemIdentifier {
    /// Validating factory: trims, uppercases, checks length and charset.
    /// Returns every violated constraint instead of panicking.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let normalized: String = raw.trim().chars().flat_map(char::to_uppercase).collect();

        let mut violations = Vec::new();
        if normalized.is_empty() {
            violations.push("identifier cannot be empty".to_string());
        }
        if normalized.chars().count() > MAX_LEN {
            violations.push(format!("identifier must be at most {MAX_LEN} characters"));
        }
        if let Some(bad) = normalized
            .chars()
            .find(|c| !(c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.' | '/')))
        {
            violations.push(format!("identifier contains invalid character '{bad}'"));
        }
        if !violations.is_empty() {
            return Err(DomainError::validations(violations));
        }

        Ok(Self(normalized))
    }

    /// Produce the `index`-th member of a generated sequence: `BASE-0001`.
    /// `index` is 1-based and capped at four digits.
    pub fn generate_unique(base: &str, index: u32) -> DomainResult<Self> {
        if index == 0 || index > MAX_SEQ {
            return Err(DomainError::validation(format!(
                "sequence index must be between 1 and {MAX_SEQ}, got {index}"
            )));
        }
        let base = Self::parse(base)?;
        Self::parse(&format!("{}-{index:04}", base.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this identifier ends in the exact generated-sequence shape
    /// (`-` followed by exactly four digits). Anything else is unnumbered.
    pub fn has_numbering(&self) -> bool {
        self.number().is_some()
    }

    /// The identifier without its sequence suffix; the whole identifier when
    /// unnumbered.
    pub fn base(&self) -> &str {
        match self.number() {
            Some(_) => &self.0[..self.0.len() - SEQ_WIDTH - 1],
            None => &self.0,
        }
    }

    /// The sequence number, when the identifier has the generated shape.
    pub fn number(&self) -> Option<u32> {
        let bytes = self.0.as_bytes();
        if bytes.len() <= SEQ_WIDTH + 1 {
            return None;
        }
        let (head, tail) = self.0.split_at(bytes.len() - SEQ_WIDTH);
        if !head.ends_with('-') {
            return None;
        }
        if !tail.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        tail.parse().ok()
    }
}

impl ValueObject for ItemIdentifier {}

impl core::fmt::Display for ItemIdentifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_uppercases() {
        let id = ItemIdentifier::parse("  rope-1 ").unwrap();
        assert_eq!(id.as_str(), "ROPE-1");
    }

    #[test]
    fn parse_reports_all_violations_at_once() {
        let raw = format!("{}é", "x".repeat(60));
        let err = ItemIdentifier::parse(&raw).unwrap_err();
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn parse_rejects_interior_whitespace() {
        let err = ItemIdentifier::parse("ROPE 1").unwrap_err();
        assert!(err.violations()[0].contains("invalid character"));
    }

    #[test]
    fn generate_unique_pads_to_four_digits() {
        let id = ItemIdentifier::generate_unique("rope", 7).unwrap();
        assert_eq!(id.as_str(), "ROPE-0007");
        assert!(id.has_numbering());
        assert_eq!(id.base(), "ROPE");
        assert_eq!(id.number(), Some(7));
    }

    #[test]
    fn generate_unique_rejects_out_of_range_indexes() {
        assert!(ItemIdentifier::generate_unique("ROPE", 0).is_err());
        assert!(ItemIdentifier::generate_unique("ROPE", 10_000).is_err());
        assert!(ItemIdentifier::generate_unique("ROPE", 9999).is_ok());
    }

    #[test]
    fn only_exact_four_digit_suffixes_count_as_numbered() {
        let cases = [
            ("ROPE-0001", true),
            ("ROPE-001", false),
            ("ROPE-12345", false),
            ("ROPE1234", false),
            ("ROPE-ABCD", false),
            ("-0001", false),
            ("A-0001", true),
        ];
        for (raw, numbered) in cases {
            let id = ItemIdentifier::parse(raw).unwrap();
            assert_eq!(id.has_numbering(), numbered, "{raw}");
        }
    }

    #[test]
    fn nested_sequences_peel_one_suffix() {
        let id = ItemIdentifier::parse("AB-0001-0002").unwrap();
        assert_eq!(id.base(), "AB-0001");
        assert_eq!(id.number(), Some(2));
    }

    #[test]
    fn unnumbered_base_is_the_whole_identifier() {
        let id = ItemIdentifier::parse("TENT/4P").unwrap();
        assert!(!id.has_numbering());
        assert_eq!(id.base(), "TENT/4P");
        assert_eq!(id.number(), None);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: re-parsing a parsed identifier yields the same value.
            #[test]
            fn parse_is_idempotent(raw in "[a-zA-Z0-9._/-]{1,50}") {
                if let Ok(once) = ItemIdentifier::parse(&raw) {
                    let twice = ItemIdentifier::parse(once.as_str()).unwrap();
                    prop_assert_eq!(once, twice);
                }
            }

            /// Property: generated members always round-trip base and number.
            #[test]
            fn generated_members_round_trip(base in "[A-Z]{1,10}", index in 1u32..=9999) {
                let id = ItemIdentifier::generate_unique(&base, index).unwrap();
                prop_assert!(id.has_numbering());
                prop_assert_eq!(id.base(), base.as_str());
                prop_assert_eq!(id.number(), Some(index));
            }
        }
    }
}
