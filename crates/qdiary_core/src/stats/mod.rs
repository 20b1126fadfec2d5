//! Read-only statistics over response history.
//!
//! # Responsibility
//! - Transform a per-day summary slice into trend, breakdown, rollup
//!   and streak views.
//!
//! # Invariants
//! - Every function here is pure: no store access, no side effects, no
//!   clock reads. The caller fetches the history slice and threads the
//!   canonical reference date through explicitly.
//! - Empty input yields empty output, never an error.

pub mod aggregate;
pub mod streak;

pub use aggregate::{
    category_stats, monthly_stats, mood_trend, overall_summary, weekly_activity, CategoryStat,
    MonthlyStat, MoodTrendPoint, OverallSummary, WeeklyStat, DEFAULT_MONTHLY_WINDOW,
    DEFAULT_TREND_WINDOW_DAYS, DEFAULT_WEEKLY_WINDOW,
};
pub use streak::{current_streak, longest_streak};
