//! Core domain logic for the daily question journal.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod stats;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::question::{
    DailyAssignment, Difficulty, Question, QuestionCategory, QuestionId, QuestionValidationError,
};
pub use model::response::{
    mood_rating_in_range, Response, ResponseId, ResponseValidationError, MOOD_RATING_MAX,
    MOOD_RATING_MIN,
};
pub use model::summary::DailySummary;
pub use repo::question_repo::{QuestionRepository, SqliteQuestionRepository};
pub use repo::response_repo::{
    NewResponse, ResponseRepository, SortOrder, SqliteResponseRepository, SummaryQuery,
};
pub use repo::{RepoError, RepoResult};
pub use service::assignment::AssignmentService;
pub use service::response::{count_words, ResponseService, ResponseServiceError};
pub use stats::{
    category_stats, current_streak, longest_streak, monthly_stats, mood_trend, overall_summary,
    weekly_activity, CategoryStat, MonthlyStat, MoodTrendPoint, OverallSummary, WeeklyStat,
    DEFAULT_MONTHLY_WINDOW, DEFAULT_TREND_WINDOW_DAYS, DEFAULT_WEEKLY_WINDOW,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
