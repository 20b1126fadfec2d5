//! Question catalog and daily assignment models.
//!
//! # Responsibility
//! - Define the immutable question catalog entry shape.
//! - Define the one-question-per-calendar-date assignment record.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another question.
//! - A calendar date maps to at most one assignment (storage-enforced).
//! - Questions are created by seeding/scheduling callers; the engine
//!   never mutates catalog entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a question catalog entry.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type QuestionId = Uuid;

/// Fixed question category set.
///
/// Variant order is the canonical tie-break order used by aggregation
/// when two categories have equal counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    PersonalGrowth,
    Relationships,
    Goals,
    Creativity,
    Reflection,
    Gratitude,
}

impl QuestionCategory {
    /// All categories in canonical order.
    pub const ALL: [Self; 6] = [
        Self::PersonalGrowth,
        Self::Relationships,
        Self::Goals,
        Self::Creativity,
        Self::Reflection,
        Self::Gratitude,
    ];

    /// Storage representation, matching the external schema naming.
    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::PersonalGrowth => "personal_growth",
            Self::Relationships => "relationships",
            Self::Goals => "goals",
            Self::Creativity => "creativity",
            Self::Reflection => "reflection",
            Self::Gratitude => "gratitude",
        }
    }

    /// Parses the storage representation.
    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "personal_growth" => Some(Self::PersonalGrowth),
            "relationships" => Some(Self::Relationships),
            "goals" => Some(Self::Goals),
            "creativity" => Some(Self::Creativity),
            "reflection" => Some(Self::Reflection),
            "gratitude" => Some(Self::Gratitude),
            _ => None,
        }
    }
}

/// Question difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

/// Validation failure for question catalog entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionValidationError {
    /// Question text is empty or whitespace-only.
    EmptyText,
}

impl Display for QuestionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "question text must not be empty"),
        }
    }
}

impl Error for QuestionValidationError {}

/// Immutable question catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Stable global ID used by assignments and responses.
    pub uuid: QuestionId,
    /// Prompt text shown to the user.
    pub text: String,
    /// Fixed category used by aggregation.
    pub category: QuestionCategory,
    /// Difficulty tier.
    pub difficulty: Difficulty,
    /// Inactive questions are excluded from catalog listings.
    pub is_active: bool,
}

impl Question {
    /// Creates a new catalog entry with a generated stable ID.
    pub fn new(
        text: impl Into<String>,
        category: QuestionCategory,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            text: text.into(),
            category,
            difficulty,
            is_active: true,
        }
    }

    /// Checks catalog entry invariants before persistence.
    pub fn validate(&self) -> Result<(), QuestionValidationError> {
        if self.text.trim().is_empty() {
            return Err(QuestionValidationError::EmptyText);
        }
        Ok(())
    }
}

/// One question assigned to one calendar date.
///
/// Created by the external scheduling process; read-only to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAssignment {
    /// Canonical day key, timezone-normalized by the caller.
    pub assigned_date: NaiveDate,
    /// Question assigned to that date.
    pub question_id: QuestionId,
}

#[cfg(test)]
mod tests {
    use super::{Question, QuestionCategory, QuestionValidationError};

    #[test]
    fn category_db_roundtrip() {
        for category in QuestionCategory::ALL {
            assert_eq!(
                QuestionCategory::from_db_str(category.as_db_str()),
                Some(category)
            );
        }
        assert_eq!(QuestionCategory::from_db_str("unknown"), None);
    }

    #[test]
    fn blank_text_fails_validation() {
        let question = Question::new(
            "   ",
            QuestionCategory::Reflection,
            super::Difficulty::Easy,
        );
        assert_eq!(
            question.validate(),
            Err(QuestionValidationError::EmptyText)
        );
    }
}
