//! Per-day summary view model.
//!
//! # Responsibility
//! - Define the canonical joined row (assignment + question + response)
//!   consumed by the UI layer and by statistics aggregation.
//!
//! # Invariants
//! - Never persisted; always recomputed from the three owning tables.
//! - Response fields are `None` when the user has not answered the date;
//!   absence of a response is a regular state, not a fault.

use crate::model::question::{QuestionCategory, QuestionId};
use crate::model::response::ResponseId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Joined per-day row for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    /// Canonical day key.
    pub assigned_date: NaiveDate,
    /// Assigned question.
    pub question_id: QuestionId,
    /// Prompt text of the assigned question.
    pub question_text: String,
    /// Category of the assigned question.
    pub category: QuestionCategory,
    /// Response rowid, when the user has answered.
    pub response_id: Option<ResponseId>,
    /// Response content, when the user has answered.
    pub response_content: Option<String>,
    /// Derived word count of the response.
    pub word_count: Option<u32>,
    /// Self-reported mood of the response.
    pub mood_rating: Option<u8>,
    /// Response creation timestamp in epoch milliseconds.
    pub responded_at: Option<i64>,
}

impl DailySummary {
    /// Returns whether this date has a completed (non-empty) response.
    pub fn is_completed(&self) -> bool {
        self.response_content
            .as_deref()
            .is_some_and(|content| !content.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::DailySummary;
    use crate::model::question::QuestionCategory;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn summary(content: Option<&str>) -> DailySummary {
        DailySummary {
            assigned_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            question_id: Uuid::new_v4(),
            question_text: "What did you notice today?".to_string(),
            category: QuestionCategory::Reflection,
            response_id: content.map(|_| 1),
            response_content: content.map(str::to_string),
            word_count: content.map(|text| text.split_whitespace().count() as u32),
            mood_rating: None,
            responded_at: content.map(|_| 1_700_000_000_000),
        }
    }

    #[test]
    fn completed_requires_non_empty_content() {
        assert!(summary(Some("an answer")).is_completed());
        assert!(!summary(Some("")).is_completed());
        assert!(!summary(None).is_completed());
    }
}
