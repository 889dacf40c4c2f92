//! Titles: reviewable works with a category, genres and a derived rating.

use std::fmt;

use crate::domain::{CatalogueEntry, Error, Slug};

/// Maximum length of a title name.
pub const TITLE_NAME_MAX: usize = 255;

/// Database identifier of a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TitleId(i64);

impl TitleId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors for title payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleValidationError {
    Missing { field: &'static str },
    EmptyName,
    NameTooLong { max: usize },
    YearOutOfRange { current: i32 },
    InvalidSlug { field: &'static str, slug: String },
}

impl TitleValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field } | Self::InvalidSlug { field, .. } => field,
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::YearOutOfRange { .. } => "year",
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "missing_field",
            Self::EmptyName => "empty_name",
            Self::NameTooLong { .. } => "name_too_long",
            Self::YearOutOfRange { .. } => "year_out_of_range",
            Self::InvalidSlug { .. } => "invalid_slug",
        }
    }
}

impl fmt::Display for TitleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "{field} is required"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::YearOutOfRange { current } => write!(
                f,
                "year must be greater than 0 and earlier than {current}"
            ),
            Self::InvalidSlug { field, slug } => write!(f, "{field} `{slug}` is not a valid slug"),
        }
    }
}

impl std::error::Error for TitleValidationError {}

impl From<TitleValidationError> for Error {
    fn from(value: TitleValidationError) -> Self {
        Error::invalid_field(value.field(), value.code(), value.to_string())
    }
}

/// Check that a release year lies strictly between 0 and `current_year`.
///
/// # Examples
/// ```
/// use yamdb::domain::validate_year;
///
/// assert!(validate_year(1999, 2024).is_ok());
/// assert!(validate_year(0, 2024).is_err());
/// assert!(validate_year(2024, 2024).is_err());
/// ```
pub fn validate_year(year: i32, current_year: i32) -> Result<i32, TitleValidationError> {
    if 0 < year && year < current_year {
        Ok(year)
    } else {
        Err(TitleValidationError::YearOutOfRange {
            current: current_year,
        })
    }
}

fn validate_name(raw: &str) -> Result<String, TitleValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TitleValidationError::EmptyName);
    }
    if trimmed.chars().count() > TITLE_NAME_MAX {
        return Err(TitleValidationError::NameTooLong {
            max: TITLE_NAME_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

fn parse_slug(field: &'static str, raw: String) -> Result<Slug, TitleValidationError> {
    Slug::new(raw.clone()).map_err(|_| TitleValidationError::InvalidSlug { field, slug: raw })
}

fn parse_slugs(field: &'static str, raw: Vec<String>) -> Result<Vec<Slug>, TitleValidationError> {
    raw.into_iter().map(|slug| parse_slug(field, slug)).collect()
}

/// Unvalidated title fields as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleInput {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genres: Option<Vec<String>>,
}

/// Complete, validated title ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleDraft {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category: Slug,
    pub genres: Vec<Slug>,
}

impl TitleDraft {
    /// Validate a create payload; every field but `description` is required.
    pub fn from_input(input: TitleInput, current_year: i32) -> Result<Self, TitleValidationError> {
        let TitleInput {
            name,
            year,
            description,
            category,
            genres,
        } = input;
        let name = name.ok_or(TitleValidationError::Missing { field: "name" })?;
        let year = year.ok_or(TitleValidationError::Missing { field: "year" })?;
        let category = category.ok_or(TitleValidationError::Missing { field: "category" })?;
        let genres = genres.ok_or(TitleValidationError::Missing { field: "genre" })?;
        Ok(Self {
            name: validate_name(&name)?,
            year: validate_year(year, current_year)?,
            description,
            category: parse_slug("category", category)?,
            genres: parse_slugs("genre", genres)?,
        })
    }
}

/// Validated partial update of a title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleChanges {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category: Option<Slug>,
    pub genres: Option<Vec<Slug>>,
}

impl TitleChanges {
    /// Validate whichever fields a PATCH payload carries.
    pub fn from_input(input: TitleInput, current_year: i32) -> Result<Self, TitleValidationError> {
        Ok(Self {
            name: input.name.as_deref().map(validate_name).transpose()?,
            year: input
                .year
                .map(|year| validate_year(year, current_year))
                .transpose()?,
            description: input.description,
            category: input
                .category
                .map(|slug| parse_slug("category", slug))
                .transpose()?,
            genres: input
                .genres
                .map(|slugs| parse_slugs("genre", slugs))
                .transpose()?,
        })
    }
}

/// Average review score derived from score totals.
///
/// # Examples
/// ```
/// use yamdb::domain::Rating;
///
/// let rating = Rating::from_scores([7, 8]).unwrap();
/// assert_eq!(rating.truncated(), 7);
/// assert!((rating.mean() - 7.5).abs() < f64::EPSILON);
/// assert!(Rating::from_scores([]).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating {
    total: i64,
    count: i64,
}

impl Rating {
    /// Build from a score sum and review count; `None` when there are no reviews.
    pub fn from_totals(total: i64, count: i64) -> Option<Self> {
        (count > 0).then_some(Self { total, count })
    }

    /// Fold individual scores.
    pub fn from_scores<I>(scores: I) -> Option<Self>
    where
        I: IntoIterator<Item = i16>,
    {
        let (total, count) = scores
            .into_iter()
            .fold((0_i64, 0_i64), |(total, count), score| {
                (total + i64::from(score), count + 1)
            });
        Self::from_totals(total, count)
    }

    /// Arithmetic mean of the scores.
    pub fn mean(self) -> f64 {
        self.total as f64 / self.count as f64
    }

    /// Mean truncated towards zero, as exposed by the API.
    pub fn truncated(self) -> i64 {
        self.total / self.count
    }
}

/// Read model of a title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    pub id: TitleId,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category: Option<CatalogueEntry>,
    pub genres: Vec<CatalogueEntry>,
    pub rating: Option<Rating>,
}

/// Filters accepted by the title listing.
///
/// Slug and name filters match substrings; `year` matches exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleFilter {
    pub genre: Option<String>,
    pub category: Option<String>,
    pub name: Option<String>,
    pub year: Option<i32>,
}

impl TitleFilter {
    /// Whether `title` passes every supplied filter.
    pub fn matches(&self, title: &Title) -> bool {
        let genre_ok = self.genre.as_deref().is_none_or(|needle| {
            title
                .genres
                .iter()
                .any(|genre| genre.slug.as_ref().contains(needle))
        });
        let category_ok = self.category.as_deref().is_none_or(|needle| {
            title
                .category
                .as_ref()
                .is_some_and(|category| category.slug.as_ref().contains(needle))
        });
        let name_ok = self
            .name
            .as_deref()
            .is_none_or(|needle| title.name.contains(needle));
        let year_ok = self.year.is_none_or(|year| title.year == year);
        genre_ok && category_ok && name_ok && year_ok
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    const CURRENT_YEAR: i32 = 2024;

    #[rstest]
    #[case(0, false)]
    #[case(-5, false)]
    #[case(1, true)]
    #[case(CURRENT_YEAR - 1, true)]
    #[case(CURRENT_YEAR, false)]
    #[case(CURRENT_YEAR + 3, false)]
    fn year_must_be_strictly_between_zero_and_now(#[case] year: i32, #[case] accepted: bool) {
        assert_eq!(validate_year(year, CURRENT_YEAR).is_ok(), accepted);
    }

    #[fixture]
    fn complete_input() -> TitleInput {
        TitleInput {
            name: Some("Solaris".to_owned()),
            year: Some(1972),
            description: None,
            category: Some("film".to_owned()),
            genres: Some(vec!["sci-fi".to_owned(), "drama".to_owned()]),
        }
    }

    #[rstest]
    fn draft_accepts_complete_input(complete_input: TitleInput) {
        let draft = TitleDraft::from_input(complete_input, CURRENT_YEAR).expect("valid draft");
        assert_eq!(draft.category.as_ref(), "film");
        assert_eq!(draft.genres.len(), 2);
    }

    #[rstest]
    fn draft_requires_category(complete_input: TitleInput) {
        let input = TitleInput {
            category: None,
            ..complete_input
        };
        assert_eq!(
            TitleDraft::from_input(input, CURRENT_YEAR),
            Err(TitleValidationError::Missing { field: "category" })
        );
    }

    #[rstest]
    fn draft_rejects_future_year(complete_input: TitleInput) {
        let input = TitleInput {
            year: Some(CURRENT_YEAR),
            ..complete_input
        };
        let err: Error = TitleDraft::from_input(input, CURRENT_YEAR)
            .expect_err("future year")
            .into();
        assert_eq!(
            err.details(),
            Some(&serde_json::json!({"field": "year", "code": "year_out_of_range"}))
        );
    }

    #[rstest]
    fn changes_validate_only_present_fields() {
        let changes = TitleChanges::from_input(
            TitleInput {
                year: Some(1990),
                ..TitleInput::default()
            },
            CURRENT_YEAR,
        )
        .expect("valid patch");
        assert_eq!(changes.year, Some(1990));
        assert!(changes.name.is_none());
        assert!(changes.genres.is_none());
    }

    #[rstest]
    fn changes_reject_bad_genre_slug() {
        let result = TitleChanges::from_input(
            TitleInput {
                genres: Some(vec!["no spaces".to_owned()]),
                ..TitleInput::default()
            },
            CURRENT_YEAR,
        );
        assert!(matches!(
            result,
            Err(TitleValidationError::InvalidSlug { field: "genre", .. })
        ));
    }

    #[rstest]
    #[case(vec![], None)]
    #[case(vec![10], Some(10))]
    #[case(vec![1, 2], Some(1))]
    #[case(vec![5, 6, 10], Some(7))]
    fn rating_truncates_mean(#[case] scores: Vec<i16>, #[case] expected: Option<i64>) {
        assert_eq!(Rating::from_scores(scores).map(Rating::truncated), expected);
    }

    #[rstest]
    fn rating_mean_is_exact() {
        let rating = Rating::from_scores([3, 4]).expect("has reviews");
        assert!((rating.mean() - 3.5).abs() < f64::EPSILON);
    }

    fn entry(slug: &str) -> CatalogueEntry {
        CatalogueEntry::try_from_parts(slug, slug).expect("valid entry")
    }

    #[fixture]
    fn solaris() -> Title {
        Title {
            id: TitleId::new(1),
            name: "Solaris".to_owned(),
            year: 1972,
            description: None,
            category: Some(entry("film")),
            genres: vec![entry("sci-fi"), entry("drama")],
            rating: None,
        }
    }

    #[rstest]
    #[case(TitleFilter::default(), true)]
    #[case(TitleFilter { genre: Some("sci".to_owned()), ..TitleFilter::default() }, true)]
    #[case(TitleFilter { genre: Some("comedy".to_owned()), ..TitleFilter::default() }, false)]
    #[case(TitleFilter { category: Some("fil".to_owned()), ..TitleFilter::default() }, true)]
    #[case(TitleFilter { name: Some("Sola".to_owned()), year: Some(1972), ..TitleFilter::default() }, true)]
    #[case(TitleFilter { year: Some(1973), ..TitleFilter::default() }, false)]
    fn filter_matching(solaris: Title, #[case] filter: TitleFilter, #[case] expected: bool) {
        assert_eq!(filter.matches(&solaris), expected);
    }
}
