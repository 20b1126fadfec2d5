//! Aggregation shapes over response history.
//!
//! # Responsibility
//! - Mood trend, category breakdown, monthly rollup, weekly activity
//!   and the overall summary.
//!
//! # Invariants
//! - Mood means are rounded to one decimal; word-count means to whole
//!   numbers.
//! - Groups with no rated responses report an explicit `0.0` mean, not
//!   an absent value.
//! - Dates with a response but no mood rating are excluded from the
//!   mood trend series yet still count toward all other aggregates.

use crate::model::question::QuestionCategory;
use crate::model::summary::DailySummary;
use crate::stats::streak::{current_streak, longest_streak};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Default mood trend window, in days.
pub const DEFAULT_TREND_WINDOW_DAYS: u32 = 30;
/// Default monthly rollup window, in months.
pub const DEFAULT_MONTHLY_WINDOW: usize = 12;
/// Default weekly activity window, in weeks.
pub const DEFAULT_WEEKLY_WINDOW: u32 = 12;

/// Mean mood for one calendar date inside the trend window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodTrendPoint {
    /// Calendar date of the point.
    pub date: NaiveDate,
    /// Mean mood across rated responses on that date, one decimal.
    pub avg_mood: f64,
    /// Number of rated responses on that date.
    pub rated_count: u32,
}

/// Completed-response breakdown for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStat {
    pub category: QuestionCategory,
    /// Completed responses in this category.
    pub count: u32,
    /// Mean mood across rated responses; `0.0` when none are rated.
    pub avg_mood: f64,
}

/// Rollup for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyStat {
    pub year: i32,
    /// 1-based calendar month.
    pub month: u32,
    pub total_responses: u32,
    /// Mean mood across rated responses; `0.0` when none are rated.
    pub avg_mood: f64,
    /// Mean word count, whole number; `0` when no counts are present.
    pub avg_word_count: u32,
}

/// Activity rollup for one week (weeks start on Monday).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyStat {
    /// Monday of the week.
    pub week_start: NaiveDate,
    pub total_responses: u32,
    /// Mean mood across rated responses; `0.0` when none are rated.
    pub avg_mood: f64,
}

/// Whole-history summary, including streaks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallSummary {
    /// Completed responses across the whole history.
    pub total_responses: u32,
    /// Completed responses carrying a mood rating.
    pub rated_responses: u32,
    /// Mean mood across rated responses; `0.0` when none are rated.
    pub avg_mood_rating: f64,
    /// Mean word count across completed responses, whole number.
    pub avg_word_count: u32,
    /// Exact count of consecutive completed days ending at or just
    /// before the reference date.
    pub current_streak: u32,
    /// True longest consecutive-day run anywhere in the history.
    pub longest_streak: u32,
}

/// Per-date mean mood over the trailing window ending at `end_date`.
///
/// The window covers `window_days` calendar days inclusive of
/// `end_date`. Only dates with at least one rated completed response
/// appear; the series is ordered by ascending date.
pub fn mood_trend(
    history: &[DailySummary],
    end_date: NaiveDate,
    window_days: u32,
) -> Vec<MoodTrendPoint> {
    if window_days == 0 {
        return Vec::new();
    }
    let window_start = end_date.checked_sub_days(Days::new(u64::from(window_days) - 1));

    let mut grouped: BTreeMap<NaiveDate, (u32, u32)> = BTreeMap::new();
    for row in history {
        if !row.is_completed() || row.assigned_date > end_date {
            continue;
        }
        if window_start.is_some_and(|start| row.assigned_date < start) {
            continue;
        }
        let Some(mood) = row.mood_rating else {
            continue;
        };
        let entry = grouped.entry(row.assigned_date).or_insert((0, 0));
        entry.0 += u32::from(mood);
        entry.1 += 1;
    }

    grouped
        .into_iter()
        .map(|(date, (sum, count))| MoodTrendPoint {
            date,
            avg_mood: round_one_decimal(f64::from(sum) / f64::from(count)),
            rated_count: count,
        })
        .collect()
}

/// Completed responses grouped by category.
///
/// Ordered by descending count; ties keep the canonical category order.
pub fn category_stats(history: &[DailySummary]) -> Vec<CategoryStat> {
    let mut grouped: BTreeMap<QuestionCategory, (u32, u32, u32)> = BTreeMap::new();
    for row in history {
        if !row.is_completed() {
            continue;
        }
        let entry = grouped.entry(row.category).or_insert((0, 0, 0));
        entry.0 += 1;
        if let Some(mood) = row.mood_rating {
            entry.1 += u32::from(mood);
            entry.2 += 1;
        }
    }

    let mut stats: Vec<CategoryStat> = grouped
        .into_iter()
        .map(|(category, (count, mood_sum, rated))| CategoryStat {
            category,
            count,
            avg_mood: mean_or_zero(mood_sum, rated),
        })
        .collect();
    // BTreeMap iteration yields canonical category order; the stable
    // sort preserves it for equal counts.
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

/// Completed responses rolled up by calendar month.
///
/// Keeps the most recent `months` months, sorted descending by month.
pub fn monthly_stats(history: &[DailySummary], months: usize) -> Vec<MonthlyStat> {
    let mut grouped: BTreeMap<(i32, u32), MonthlyAccumulator> = BTreeMap::new();
    for row in history {
        if !row.is_completed() {
            continue;
        }
        let key = (row.assigned_date.year(), row.assigned_date.month());
        let entry = grouped.entry(key).or_default();
        entry.count += 1;
        if let Some(mood) = row.mood_rating {
            entry.mood_sum += u32::from(mood);
            entry.rated += 1;
        }
        if let Some(words) = row.word_count {
            entry.word_sum += words;
            entry.counted += 1;
        }
    }

    grouped
        .into_iter()
        .rev()
        .take(months)
        .map(|((year, month), acc)| MonthlyStat {
            year,
            month,
            total_responses: acc.count,
            avg_mood: mean_or_zero(acc.mood_sum, acc.rated),
            avg_word_count: whole_mean_or_zero(acc.word_sum, acc.counted),
        })
        .collect()
}

/// Completed responses rolled up by week over a trailing window.
///
/// Weeks start on Monday; the window covers `weeks` weeks ending with
/// the week containing `end_date`. Ordered by ascending week start.
pub fn weekly_activity(
    history: &[DailySummary],
    end_date: NaiveDate,
    weeks: u32,
) -> Vec<WeeklyStat> {
    if weeks == 0 {
        return Vec::new();
    }
    let window_start =
        week_start(end_date).and_then(|monday| monday.checked_sub_days(Days::new(7 * (u64::from(weeks) - 1))));

    let mut grouped: BTreeMap<NaiveDate, (u32, u32, u32)> = BTreeMap::new();
    for row in history {
        if !row.is_completed() || row.assigned_date > end_date {
            continue;
        }
        let Some(monday) = week_start(row.assigned_date) else {
            continue;
        };
        if window_start.is_some_and(|start| monday < start) {
            continue;
        }
        let entry = grouped.entry(monday).or_insert((0, 0, 0));
        entry.0 += 1;
        if let Some(mood) = row.mood_rating {
            entry.1 += u32::from(mood);
            entry.2 += 1;
        }
    }

    grouped
        .into_iter()
        .map(|(week_start, (count, mood_sum, rated))| WeeklyStat {
            week_start,
            total_responses: count,
            avg_mood: mean_or_zero(mood_sum, rated),
        })
        .collect()
}

/// Whole-history summary, including current and longest streak.
pub fn overall_summary(history: &[DailySummary], reference_date: NaiveDate) -> OverallSummary {
    let mut total = 0u32;
    let mut rated = 0u32;
    let mut mood_sum = 0u32;
    let mut word_sum = 0u32;
    for row in history {
        if !row.is_completed() {
            continue;
        }
        total += 1;
        word_sum += row.word_count.unwrap_or(0);
        if let Some(mood) = row.mood_rating {
            mood_sum += u32::from(mood);
            rated += 1;
        }
    }

    OverallSummary {
        total_responses: total,
        rated_responses: rated,
        avg_mood_rating: mean_or_zero(mood_sum, rated),
        avg_word_count: whole_mean_or_zero(word_sum, total),
        current_streak: current_streak(history, reference_date),
        longest_streak: longest_streak(history),
    }
}

#[derive(Debug, Default)]
struct MonthlyAccumulator {
    count: u32,
    mood_sum: u32,
    rated: u32,
    word_sum: u32,
    counted: u32,
}

/// Monday of the week containing `date`.
fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn mean_or_zero(sum: u32, count: u32) -> f64 {
    if count == 0 {
        0.0
    } else {
        round_one_decimal(f64::from(sum) / f64::from(count))
    }
}

fn whole_mean_or_zero(sum: u32, count: u32) -> u32 {
    if count == 0 {
        0
    } else {
        (f64::from(sum) / f64::from(count)).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::{round_one_decimal, week_start, whole_mean_or_zero};
    use chrono::NaiveDate;

    #[test]
    fn rounding_keeps_one_decimal() {
        assert_eq!(round_one_decimal(8.0), 8.0);
        assert_eq!(round_one_decimal(7.25), 7.3);
        assert_eq!(round_one_decimal(6.666_666), 6.7);
    }

    #[test]
    fn week_start_is_monday() {
        // 2024-03-10 is a Sunday.
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(week_start(sunday), Some(monday));
        assert_eq!(week_start(monday), Some(monday));
    }

    #[test]
    fn whole_mean_rounds_to_nearest() {
        assert_eq!(whole_mean_or_zero(0, 0), 0);
        assert_eq!(whole_mean_or_zero(10, 4), 3);
        assert_eq!(whole_mean_or_zero(10, 3), 3);
        assert_eq!(whole_mean_or_zero(11, 2), 6);
    }
}
