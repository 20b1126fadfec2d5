//! Response write use-case service.
//!
//! # Responsibility
//! - Provide create/update/delete entry points for daily responses.
//! - Validate content and mood rating before any store call.
//! - Derive word counts server-side; caller-supplied counts are never
//!   trusted.
//!
//! # Invariants
//! - Content is trimmed; empty content never reaches storage.
//! - Mood ratings outside `1..=10` never reach storage.
//! - The one-response-per-day race is arbitrated by the store's unique
//!   index, not by a read before the insert.

use crate::model::question::QuestionId;
use crate::model::response::{mood_rating_in_range, Response, ResponseId};
use crate::repo::response_repo::{NewResponse, ResponseRepository};
use crate::repo::RepoError;
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for response write use-cases.
#[derive(Debug)]
pub enum ResponseServiceError {
    /// Content is empty or whitespace-only after trimming.
    InvalidContent,
    /// Mood rating outside `1..=10`.
    InvalidMoodRating(u8),
    /// The user already answered this date; callers should offer an
    /// edit of the existing response instead.
    AlreadyAnswered(NaiveDate),
    /// No response with this id is owned by the requesting user.
    NotFound(ResponseId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ResponseServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidContent => write!(f, "response content must not be empty"),
            Self::InvalidMoodRating(value) => {
                write!(f, "mood rating {value} outside accepted range 1..=10")
            }
            Self::AlreadyAnswered(date) => {
                write!(f, "a response for {date} already exists")
            }
            Self::NotFound(id) => write!(f, "response not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent response state: {details}")
            }
        }
    }
}

impl Error for ResponseServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ResponseServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateResponse { date } => Self::AlreadyAnswered(date),
            RepoError::ResponseNotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Counts whitespace-delimited tokens in already-trimmed content.
///
/// Empty input yields zero; derivation is deterministic so stored word
/// counts can be recomputed from content at any time.
pub fn count_words(content: &str) -> u32 {
    content.split_whitespace().count() as u32
}

/// Use-case service for response writes.
pub struct ResponseService<R: ResponseRepository> {
    repo: R,
}

impl<R: ResponseRepository> ResponseService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates the response for one (user, date) pair.
    ///
    /// # Contract
    /// - Content/mood validation failures are reported before any store
    ///   call is made.
    /// - A second create for the same date fails with `AlreadyAnswered`;
    ///   under concurrent double-submit exactly one call succeeds.
    pub fn create_response(
        &self,
        user_id: &str,
        question_id: QuestionId,
        date: NaiveDate,
        content: &str,
        mood_rating: Option<u8>,
    ) -> Result<Response, ResponseServiceError> {
        let (content, word_count) = validate_content(content)?;
        validate_mood(mood_rating)?;

        let id = self
            .repo
            .insert_response(&NewResponse {
                user_id: user_id.to_string(),
                question_id,
                content,
                word_count,
                mood_rating,
                response_date: date,
            })
            .map_err(|err| {
                warn!(
                    "event=response_create module=response status=error date={date} error={err}"
                );
                ResponseServiceError::from(err)
            })?;

        info!(
            "event=response_create module=response status=ok date={date} response_id={id} word_count={word_count}"
        );
        self.repo
            .get_response(user_id, id)?
            .ok_or(ResponseServiceError::InconsistentState(
                "created response not found in read-back",
            ))
    }

    /// Replaces content and mood for an owned response.
    ///
    /// Identity and date are preserved; the word count is recomputed
    /// from the new content.
    pub fn update_response(
        &self,
        user_id: &str,
        id: ResponseId,
        content: &str,
        mood_rating: Option<u8>,
    ) -> Result<Response, ResponseServiceError> {
        let (content, word_count) = validate_content(content)?;
        validate_mood(mood_rating)?;

        self.repo
            .update_response(user_id, id, content.as_str(), word_count, mood_rating)
            .map_err(|err| {
                warn!(
                    "event=response_update module=response status=error response_id={id} error={err}"
                );
                ResponseServiceError::from(err)
            })?;

        info!(
            "event=response_update module=response status=ok response_id={id} word_count={word_count}"
        );
        self.repo
            .get_response(user_id, id)?
            .ok_or(ResponseServiceError::InconsistentState(
                "updated response not found in read-back",
            ))
    }

    /// Deletes an owned response, removing it from future aggregations.
    ///
    /// Deleting an already-deleted (or never-owned) id reports
    /// `NotFound`; the predicate never reveals rows owned by other
    /// users.
    pub fn delete_response(
        &self,
        user_id: &str,
        id: ResponseId,
    ) -> Result<(), ResponseServiceError> {
        self.repo.delete_response(user_id, id).map_err(|err| {
            warn!(
                "event=response_delete module=response status=error response_id={id} error={err}"
            );
            ResponseServiceError::from(err)
        })?;

        info!("event=response_delete module=response status=ok response_id={id}");
        Ok(())
    }

    /// Gets the owned response for one calendar date, if any.
    pub fn get_response_for_date(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<Response>, ResponseServiceError> {
        Ok(self.repo.get_response_for_date(user_id, date)?)
    }
}

fn validate_content(content: &str) -> Result<(String, u32), ResponseServiceError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ResponseServiceError::InvalidContent);
    }
    Ok((trimmed.to_string(), count_words(trimmed)))
}

fn validate_mood(mood_rating: Option<u8>) -> Result<(), ResponseServiceError> {
    if let Some(rating) = mood_rating {
        if !mood_rating_in_range(rating) {
            return Err(ResponseServiceError::InvalidMoodRating(rating));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::count_words;

    #[test]
    fn counts_whitespace_delimited_tokens() {
        assert_eq!(count_words("a b c"), 3);
        assert_eq!(count_words("one"), 1);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn treats_runs_of_whitespace_as_one_delimiter() {
        assert_eq!(count_words("spread   out\twords\nacross lines"), 5);
    }
}
