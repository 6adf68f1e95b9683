//! Category display name value object.

use serde::{Deserialize, Serialize};

use gearbase_core::{DomainError, DomainResult, ValueObject};

const MIN_LEN: usize = 2;
const MAX_LEN: usize = 60;

/// Normalized, validated category display label.
///
/// Constructed only through [`CategoryName::parse`], which trims, collapses
/// inner whitespace and title-cases the input, returning every violated
/// constraint instead of panicking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryName(String);

impl CategoryName {
    /// Validating factory. Normalizes to title case ("cuerdas dinámicas" →
    /// "Cuerdas Dinámicas").
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

        let mut violations = Vec::new();
        let len = collapsed.chars().count();
        if len < MIN_LEN {
            violations.push(format!("name must be at least {MIN_LEN} characters"));
        }
        if len > MAX_LEN {
            violations.push(format!("name must be at most {MAX_LEN} characters"));
        }
        if !violations.is_empty() {
            return Err(DomainError::validations(violations));
        }

        Ok(Self(title_case(&collapsed)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URL-safe slug: lowercased, diacritics stripped, hyphen-separated.
    pub fn to_slug(&self) -> String {
        let mut slug = String::with_capacity(self.0.len());
        let mut last_hyphen = true;
        for c in self.0.chars().flat_map(char::to_lowercase) {
            let c = strip_diacritic(c);
            if c.is_ascii_alphanumeric() {
                slug.push(c);
                last_hyphen = false;
            } else if !last_hyphen {
                slug.push('-');
                last_hyphen = true;
            }
        }
        slug.trim_end_matches('-').to_string()
    }
}

impl ValueObject for CategoryName {}

impl core::fmt::Display for CategoryName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

fn title_case(input: &str) -> String {
    input
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_to_title_case() {
        let name = CategoryName::parse("  cuerdas   DINÁMICAS ").unwrap();
        assert_eq!(name.as_str(), "Cuerdas Dinámicas");
    }

    #[test]
    fn parse_rejects_too_short_names() {
        let err = CategoryName::parse(" a ").unwrap_err();
        assert_eq!(err.violations().len(), 1);
    }

    #[test]
    fn parse_rejects_too_long_names() {
        let raw = "x".repeat(61);
        let err = CategoryName::parse(&raw).unwrap_err();
        assert!(err.violations()[0].contains("at most"));
    }

    #[test]
    fn slug_strips_diacritics_and_hyphenates() {
        let name = CategoryName::parse("Cuerdas Dinámicas 9.8mm").unwrap();
        assert_eq!(name.to_slug(), "cuerdas-dinamicas-9-8mm");
    }

    #[test]
    fn slug_has_no_leading_or_trailing_hyphens() {
        let name = CategoryName::parse("¡Tiendas!").unwrap();
        assert_eq!(name.to_slug(), "tiendas");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: parsing an already-parsed name is idempotent.
            #[test]
            fn parse_is_idempotent(raw in "[a-zA-Z]{2,20}( [a-zA-Z]{1,20}){0,2}") {
                let once = CategoryName::parse(&raw).unwrap();
                let twice = CategoryName::parse(once.as_str()).unwrap();
                prop_assert_eq!(once, twice);
            }

            /// Property: slugs only contain lowercase ascii alphanumerics and hyphens.
            #[test]
            fn slug_charset_is_closed(raw in "[a-zA-Záéíóúñ]{2,20}( [a-zA-Z0-9]{1,10}){0,2}") {
                let name = CategoryName::parse(&raw).unwrap();
                let slug = name.to_slug();
                prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            }
        }
    }
}
