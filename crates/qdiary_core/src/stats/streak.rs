//! Consecutive-day streak computation.
//!
//! # Invariants
//! - Current streak is exact: it counts consecutive completed days
//!   walking backward from the reference date, stopping at the first
//!   gap. A missing reference date does not zero out a run ending the
//!   day before; it just does not count.
//! - Only completed responses participate; duplicate dates cannot occur
//!   (storage enforces one response per day) but are collapsed anyway.

use crate::model::summary::DailySummary;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Counts consecutive completed days ending at or just before
/// `reference_date`.
///
/// If `reference_date` itself has no completed response, the walk
/// starts from the previous day, so an unanswered "today" still shows
/// the run built up through yesterday.
pub fn current_streak(history: &[DailySummary], reference_date: NaiveDate) -> u32 {
    let dates = completed_dates(history);
    if dates.is_empty() {
        return 0;
    }

    let mut cursor = if dates.contains(&reference_date) {
        reference_date
    } else {
        match reference_date.pred_opt() {
            Some(previous) => previous,
            None => return 0,
        }
    };

    let mut streak = 0;
    while dates.contains(&cursor) {
        streak += 1;
        match cursor.pred_opt() {
            Some(previous) => cursor = previous,
            None => break,
        }
    }
    streak
}

/// Length of the longest run of consecutive completed days anywhere in
/// the history.
pub fn longest_streak(history: &[DailySummary]) -> u32 {
    let dates = completed_dates(history);

    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;
    for date in dates {
        run = match previous {
            Some(prev) if prev.succ_opt() == Some(date) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(date);
    }
    longest
}

fn completed_dates(history: &[DailySummary]) -> BTreeSet<NaiveDate> {
    history
        .iter()
        .filter(|row| row.is_completed())
        .map(|row| row.assigned_date)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{current_streak, longest_streak};
    use crate::model::question::QuestionCategory;
    use crate::model::summary::DailySummary;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn completed(date: NaiveDate) -> DailySummary {
        DailySummary {
            assigned_date: date,
            question_id: Uuid::new_v4(),
            question_text: "prompt".to_string(),
            category: QuestionCategory::Reflection,
            response_id: Some(1),
            response_content: Some("answered".to_string()),
            word_count: Some(1),
            mood_rating: None,
            responded_at: Some(0),
        }
    }

    fn unanswered(date: NaiveDate) -> DailySummary {
        DailySummary {
            response_id: None,
            response_content: None,
            word_count: None,
            responded_at: None,
            ..completed(date)
        }
    }

    #[test]
    fn counts_run_including_reference_date() {
        let today = day(2024, 3, 10);
        let history = vec![
            completed(day(2024, 3, 10)),
            completed(day(2024, 3, 9)),
            completed(day(2024, 3, 8)),
            // gap on 3/7
            completed(day(2024, 3, 6)),
        ];
        assert_eq!(current_streak(&history, today), 3);
    }

    #[test]
    fn missing_today_starts_from_yesterday() {
        let today = day(2024, 3, 10);
        let history = vec![completed(day(2024, 3, 9)), completed(day(2024, 3, 8))];
        assert_eq!(current_streak(&history, today), 2);
    }

    #[test]
    fn gap_at_yesterday_means_zero() {
        let today = day(2024, 3, 10);
        let history = vec![completed(day(2024, 3, 7))];
        assert_eq!(current_streak(&history, today), 0);
    }

    #[test]
    fn empty_history_is_zero_not_an_error() {
        assert_eq!(current_streak(&[], day(2024, 3, 10)), 0);
        assert_eq!(longest_streak(&[]), 0);
    }

    #[test]
    fn unanswered_assignments_break_the_run() {
        let today = day(2024, 3, 10);
        let history = vec![
            completed(day(2024, 3, 10)),
            unanswered(day(2024, 3, 9)),
            completed(day(2024, 3, 8)),
        ];
        assert_eq!(current_streak(&history, today), 1);
    }

    #[test]
    fn longest_run_found_anywhere_in_history() {
        let history = vec![
            completed(day(2024, 1, 1)),
            completed(day(2024, 1, 2)),
            completed(day(2024, 1, 3)),
            completed(day(2024, 1, 4)),
            // gap
            completed(day(2024, 1, 10)),
            completed(day(2024, 1, 11)),
        ];
        assert_eq!(longest_streak(&history), 4);
    }

    #[test]
    fn unsorted_input_does_not_change_the_result() {
        let history = vec![
            completed(day(2024, 1, 3)),
            completed(day(2024, 1, 1)),
            completed(day(2024, 1, 2)),
        ];
        assert_eq!(longest_streak(&history), 3);
        assert_eq!(current_streak(&history, day(2024, 1, 3)), 3);
    }
}
