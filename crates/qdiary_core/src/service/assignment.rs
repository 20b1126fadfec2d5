//! Question assignment use-case service.
//!
//! # Responsibility
//! - Resolve "the question for a given day" together with the user's
//!   response state for that day.
//! - Serve catalog listings for administrative callers.
//!
//! # Invariants
//! - `resolve_today` is a pure read; calling it repeatedly with no
//!   intervening writes returns identical values.
//! - An unassigned date resolves to `Ok(None)`, a regular state rather
//!   than an error.

use crate::model::question::Question;
use crate::model::summary::DailySummary;
use crate::repo::question_repo::QuestionRepository;
use crate::repo::response_repo::ResponseRepository;
use crate::repo::RepoResult;
use chrono::NaiveDate;
use log::debug;

/// Use-case service resolving daily assignments for one user.
pub struct AssignmentService<Q: QuestionRepository, R: ResponseRepository> {
    questions: Q,
    responses: R,
}

impl<Q: QuestionRepository, R: ResponseRepository> AssignmentService<Q, R> {
    /// Creates a service using the provided repository implementations.
    pub fn new(questions: Q, responses: R) -> Self {
        Self {
            questions,
            responses,
        }
    }

    /// Resolves the assigned question and response state for one date.
    ///
    /// # Contract
    /// - `reference_date` is the caller's canonical "today", normalized
    ///   to the system reference timezone before it gets here.
    /// - Returns `Ok(None)` when no question is assigned to the date.
    /// - Returns a summary with empty response fields when the user has
    ///   not answered yet; absence of a response is not a fault.
    pub fn resolve_today(
        &self,
        user_id: &str,
        reference_date: NaiveDate,
    ) -> RepoResult<Option<DailySummary>> {
        let summary = self.responses.get_summary(user_id, reference_date)?;
        debug!(
            "event=resolve_today module=assignment status=ok date={} assigned={} answered={}",
            reference_date,
            summary.is_some(),
            summary.as_ref().is_some_and(DailySummary::is_completed)
        );
        Ok(summary)
    }

    /// Lists active catalog questions, newest first.
    pub fn list_active_questions(
        &self,
        limit: Option<u32>,
        offset: u32,
    ) -> RepoResult<Vec<Question>> {
        self.questions.list_active_questions(limit, offset)
    }
}
