//! Reviews of titles and the comments left on them.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::{Error, TitleId, UserId, Username};

/// Lowest accepted review score.
pub const SCORE_MIN: i16 = 1;
/// Highest accepted review score.
pub const SCORE_MAX: i16 = 10;

/// Database identifier of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReviewId(i64);

impl ReviewId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

/// Database identifier of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommentId(i64);

impl CommentId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

/// Validation errors for review and comment payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewValidationError {
    MissingText,
    EmptyText,
    MissingScore,
    ScoreOutOfRange { min: i16, max: i16 },
}

impl ReviewValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingText | Self::EmptyText => "text",
            Self::MissingScore | Self::ScoreOutOfRange { .. } => "score",
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingText | Self::MissingScore => "missing_field",
            Self::EmptyText => "empty_text",
            Self::ScoreOutOfRange { .. } => "score_out_of_range",
        }
    }
}

impl fmt::Display for ReviewValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingText => write!(f, "text is required"),
            Self::EmptyText => write!(f, "text must not be empty"),
            Self::MissingScore => write!(f, "score is required"),
            Self::ScoreOutOfRange { min, max } => {
                write!(f, "score must be between {min} and {max}")
            }
        }
    }
}

impl std::error::Error for ReviewValidationError {}

impl From<ReviewValidationError> for Error {
    fn from(value: ReviewValidationError) -> Self {
        Error::invalid_field(value.field(), value.code(), value.to_string())
    }
}

/// Review score in `1..=10`.
///
/// # Examples
/// ```
/// use yamdb::domain::Score;
///
/// assert_eq!(Score::new(10).unwrap().get(), 10);
/// assert!(Score::new(11).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score(i16);

impl Score {
    /// Validate and construct a [`Score`].
    pub fn new(raw: i64) -> Result<Self, ReviewValidationError> {
        i16::try_from(raw)
            .ok()
            .filter(|value| (SCORE_MIN..=SCORE_MAX).contains(value))
            .map(Self)
            .ok_or(ReviewValidationError::ScoreOutOfRange {
                min: SCORE_MIN,
                max: SCORE_MAX,
            })
    }

    /// Raw score value.
    pub const fn get(self) -> i16 {
        self.0
    }
}

fn validate_text(raw: Option<String>) -> Result<String, ReviewValidationError> {
    let text = raw.ok_or(ReviewValidationError::MissingText)?;
    if text.trim().is_empty() {
        return Err(ReviewValidationError::EmptyText);
    }
    Ok(text)
}

/// Unvalidated review fields as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewInput {
    pub text: Option<String>,
    pub score: Option<i64>,
}

/// Validated new review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub text: String,
    pub score: Score,
}

impl ReviewDraft {
    /// Validate a create payload; both fields are required.
    pub fn from_input(input: ReviewInput) -> Result<Self, ReviewValidationError> {
        let score = input.score.ok_or(ReviewValidationError::MissingScore)?;
        Ok(Self {
            text: validate_text(input.text)?,
            score: Score::new(score)?,
        })
    }
}

/// Validated partial update of a review.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewChanges {
    pub text: Option<String>,
    pub score: Option<Score>,
}

impl ReviewChanges {
    /// Validate whichever fields a PATCH payload carries.
    pub fn from_input(input: ReviewInput) -> Result<Self, ReviewValidationError> {
        Ok(Self {
            text: input.text.map(|text| validate_text(Some(text))).transpose()?,
            score: input.score.map(Score::new).transpose()?,
        })
    }
}

/// Validated comment body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentText(String);

impl CommentText {
    /// Validate a comment body; it is required and must not be blank.
    pub fn new(raw: Option<String>) -> Result<Self, ReviewValidationError> {
        validate_text(raw).map(Self)
    }
}

impl AsRef<str> for CommentText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<CommentText> for String {
    fn from(value: CommentText) -> Self {
        value.0
    }
}

/// A user's review of a title.
///
/// ## Invariants
/// - One review per `(author, title_id)` pair.
/// - `pub_date` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: ReviewId,
    pub title_id: TitleId,
    pub author: UserId,
    pub author_username: Username,
    pub text: String,
    pub score: Score,
    pub pub_date: DateTime<Utc>,
}

impl Review {
    /// Apply a partial update in place; `pub_date` is left untouched.
    pub fn apply(&mut self, changes: ReviewChanges) {
        if let Some(text) = changes.text {
            self.text = text;
        }
        if let Some(score) = changes.score {
            self.score = score;
        }
    }
}

/// A comment left on a review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub review_id: ReviewId,
    pub author: UserId,
    pub author_username: Username,
    pub text: String,
    pub pub_date: DateTime<Utc>,
}
