//! Response domain model.
//!
//! # Responsibility
//! - Define the per-day journal response record.
//! - Keep the mood rating bounds in one place.
//!
//! # Invariants
//! - At most one response exists per `(user_id, response_date)` pair;
//!   the storage layer enforces this with a unique constraint.
//! - `word_count` is derived from `content` at write time and never
//!   trusted from callers.
//! - `mood_rating`, when present, is in `1..=10`.

use crate::model::question::QuestionId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage rowid of a response.
pub type ResponseId = i64;

/// Inclusive mood rating bounds.
pub const MOOD_RATING_MIN: u8 = 1;
/// Inclusive mood rating bounds.
pub const MOOD_RATING_MAX: u8 = 10;

/// Returns whether a mood rating value is inside the accepted range.
pub fn mood_rating_in_range(value: u8) -> bool {
    (MOOD_RATING_MIN..=MOOD_RATING_MAX).contains(&value)
}

/// Validation failure for response records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseValidationError {
    /// Content is empty or whitespace-only after trimming.
    EmptyContent,
    /// Mood rating outside `1..=10`.
    MoodRatingOutOfRange(u8),
}

impl Display for ResponseValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "response content must not be empty"),
            Self::MoodRatingOutOfRange(value) => write!(
                f,
                "mood rating {value} outside accepted range {MOOD_RATING_MIN}..={MOOD_RATING_MAX}"
            ),
        }
    }
}

impl Error for ResponseValidationError {}

/// One user's answer for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Storage rowid, assigned on insert.
    pub id: ResponseId,
    /// Opaque owner identifier supplied by the authentication collaborator.
    pub user_id: String,
    /// Question this response answers.
    pub question_id: QuestionId,
    /// Trimmed free-text content. Never empty for a persisted row.
    pub content: String,
    /// Whitespace-delimited token count, derived from `content`.
    pub word_count: u32,
    /// Optional self-reported mood, `1..=10`.
    pub mood_rating: Option<u8>,
    /// Canonical day key this response answers.
    pub response_date: NaiveDate,
    /// Creation timestamp in epoch milliseconds, set by storage.
    pub created_at: i64,
    /// Last-modified timestamp in epoch milliseconds, set by storage.
    pub updated_at: i64,
}

impl Response {
    /// Checks response invariants before persistence.
    pub fn validate(&self) -> Result<(), ResponseValidationError> {
        if self.content.trim().is_empty() {
            return Err(ResponseValidationError::EmptyContent);
        }
        if let Some(rating) = self.mood_rating {
            if !mood_rating_in_range(rating) {
                return Err(ResponseValidationError::MoodRatingOutOfRange(rating));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{mood_rating_in_range, ResponseValidationError};

    #[test]
    fn mood_rating_bounds_are_inclusive() {
        assert!(mood_rating_in_range(1));
        assert!(mood_rating_in_range(10));
        assert!(!mood_rating_in_range(0));
        assert!(!mood_rating_in_range(11));
    }

    #[test]
    fn validation_error_messages_name_the_field() {
        assert!(ResponseValidationError::EmptyContent
            .to_string()
            .contains("content"));
        assert!(ResponseValidationError::MoodRatingOutOfRange(11)
            .to_string()
            .contains("11"));
    }
}
