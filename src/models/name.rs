//! Natural-key helpers: normalization and free-text names

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Normalized form used for every natural-key comparison: trimmed and lower-cased.
///
/// Lower-casing is Unicode case mapping without locale rules. `lower()` in the
/// unique indexes does the same on a database with a UTF-8 ctype, so both
/// backends treat "ÉMILE" and "émile" as one key there. A database created
/// with the `C` ctype only folds ASCII.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// True when both values are equal after normalization
pub fn same_key(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Trim a required text field, rejecting blank input
pub fn require_text(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} cannot be empty", field)));
    }
    Ok(trimmed.to_string())
}

/// A first/last name pair as entered by a client (authors and reviewers)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub first_name: String,
    pub last_name: String,
}

impl PersonName {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Trimmed copy of the name. `role` prefixes the error message ("Author", "Reviewer").
    pub fn trimmed(&self, role: &str) -> AppResult<PersonName> {
        Ok(PersonName {
            first_name: require_text(&format!("{} first name", role), &self.first_name)?,
            last_name: require_text(&format!("{} last name", role), &self.last_name)?,
        })
    }

    pub fn matches(&self, first_name: &str, last_name: &str) -> bool {
        same_key(&self.first_name, first_name) && same_key(&self.last_name, last_name)
    }

    /// Build a name from two independently optional fields.
    ///
    /// Both absent is `None`; exactly one present is a validation error.
    pub fn from_pair(
        role: &str,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> AppResult<Option<PersonName>> {
        match (first_name, last_name) {
            (None, None) => Ok(None),
            (Some(first), Some(last)) => Ok(Some(PersonName::new(first, last))),
            _ => Err(AppError::Validation(format!(
                "{} first name and last name must be supplied together",
                role
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Dune "), "dune");
        assert_eq!(normalize("SCIENCE Fiction"), "science fiction");
        assert!(same_key(" dune", "DUNE  "));
        assert!(!same_key("Dune", "Dune Messiah"));
    }

    #[test]
    fn test_normalize_non_ascii() {
        assert_eq!(normalize("  ÉMILE "), "émile");
        assert!(same_key("Zoë Ödön", "ZOË ÖDÖN"));
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("Title", "  Dune ").unwrap(), "Dune");
        assert!(matches!(require_text("Title", "   "), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_person_name_trimmed_keeps_case() {
        let name = PersonName::new("  Frank ", "HERBERT").trimmed("Author").unwrap();
        assert_eq!(name, PersonName::new("Frank", "HERBERT"));
        assert!(name.matches("frank", " herbert"));
    }

    #[test]
    fn test_person_name_from_pair() {
        assert_eq!(PersonName::from_pair("Reviewer", None, None).unwrap(), None);
        assert!(PersonName::from_pair("Reviewer", Some("Ann".into()), Some("Lee".into()))
            .unwrap()
            .is_some());
        assert!(matches!(
            PersonName::from_pair("Reviewer", Some("Ann".into()), None),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            PersonName::from_pair("Reviewer", None, Some("Lee".into())),
            Err(AppError::Validation(_))
        ));
    }
}
