//! Categories and genres: slug-addressed reference data for titles.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::Error;

/// Maximum length of a category or genre name.
pub const CATALOGUE_NAME_MAX: usize = 255;
/// Maximum length of a slug.
pub const SLUG_MAX: usize = 50;

/// Which reference table an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogueKind {
    Category,
    Genre,
}

impl CatalogueKind {
    /// Singular noun used in messages.
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Genre => "genre",
        }
    }
}

/// Validation errors for catalogue entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogueValidationError {
    EmptyName,
    NameTooLong { max: usize },
    EmptySlug,
    SlugTooLong { max: usize },
    SlugInvalidCharacters,
}

impl CatalogueValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::EmptySlug | Self::SlugTooLong { .. } | Self::SlugInvalidCharacters => "slug",
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyName => "empty_name",
            Self::NameTooLong { .. } => "name_too_long",
            Self::EmptySlug => "empty_slug",
            Self::SlugTooLong { .. } => "slug_too_long",
            Self::SlugInvalidCharacters => "slug_invalid_characters",
        }
    }
}

impl fmt::Display for CatalogueValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::EmptySlug => write!(f, "slug must not be empty"),
            Self::SlugTooLong { max } => write!(f, "slug must be at most {max} characters"),
            Self::SlugInvalidCharacters => write!(
                f,
                "slug may only contain letters, digits, hyphens and underscores"
            ),
        }
    }
}

impl std::error::Error for CatalogueValidationError {}

impl From<CatalogueValidationError> for Error {
    fn from(value: CatalogueValidationError) -> Self {
        Error::invalid_field(value.field(), value.code(), value.to_string())
    }
}

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_regex() -> &'static Regex {
    SLUG_RE.get_or_init(|| {
        Regex::new("^[-a-zA-Z0-9_]+$")
            .unwrap_or_else(|error| panic!("slug regex failed to compile: {error}"))
    })
}

/// URL-safe unique key of a category or genre.
///
/// # Examples
/// ```
/// use yamdb::domain::Slug;
///
/// assert!(Slug::new("sci-fi").is_ok());
/// assert!(Slug::new("sci fi").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slug(String);

impl Slug {
    /// Validate and construct a [`Slug`].
    pub fn new(raw: impl Into<String>) -> Result<Self, CatalogueValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(CatalogueValidationError::EmptySlug);
        }
        if raw.chars().count() > SLUG_MAX {
            return Err(CatalogueValidationError::SlugTooLong { max: SLUG_MAX });
        }
        if !slug_regex().is_match(&raw) {
            return Err(CatalogueValidationError::SlugInvalidCharacters);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A category or genre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueEntry {
    pub name: String,
    pub slug: Slug,
}

impl CatalogueEntry {
    /// Validate raw name and slug.
    pub fn try_from_parts(name: &str, slug: &str) -> Result<Self, CatalogueValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CatalogueValidationError::EmptyName);
        }
        if trimmed.chars().count() > CATALOGUE_NAME_MAX {
            return Err(CatalogueValidationError::NameTooLong {
                max: CATALOGUE_NAME_MAX,
            });
        }
        Ok(Self {
            name: trimmed.to_owned(),
            slug: Slug::new(slug)?,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "ok", CatalogueValidationError::EmptyName)]
    #[case("Drama", "", CatalogueValidationError::EmptySlug)]
    #[case("Drama", "dra ma", CatalogueValidationError::SlugInvalidCharacters)]
    #[case("Drama", "драма", CatalogueValidationError::SlugInvalidCharacters)]
    fn invalid_entries(#[case] name: &str, #[case] slug: &str, #[case] expected: CatalogueValidationError) {
        assert_eq!(CatalogueEntry::try_from_parts(name, slug), Err(expected));
    }

    #[rstest]
    fn long_values_are_rejected() {
        let long_name = "n".repeat(CATALOGUE_NAME_MAX + 1);
        let long_slug = "s".repeat(SLUG_MAX + 1);
        assert_eq!(
            CatalogueEntry::try_from_parts(&long_name, "ok"),
            Err(CatalogueValidationError::NameTooLong { max: CATALOGUE_NAME_MAX })
        );
        assert_eq!(
            Slug::new(long_slug),
            Err(CatalogueValidationError::SlugTooLong { max: SLUG_MAX })
        );
    }

    #[rstest]
    fn name_is_trimmed() {
        let entry = CatalogueEntry::try_from_parts("  Rock  ", "rock").expect("valid");
        assert_eq!(entry.name, "Rock");
        assert_eq!(entry.slug.as_ref(), "rock");
    }

    #[rstest]
    fn slug_error_names_field() {
        let err: Error = CatalogueValidationError::SlugInvalidCharacters.into();
        assert_eq!(
            err.details(),
            Some(&serde_json::json!({"field": "slug", "code": "slug_invalid_characters"}))
        );
    }
}
