//! Response repository and per-day summary queries.
//!
//! # Responsibility
//! - Persist responses and serve the joined per-day summary rows.
//! - Keep the uniqueness and ownership invariants inside single SQL
//!   statements.
//!
//! # Invariants
//! - Insert relies on the `(user_id, response_date)` unique index; a
//!   conflict is translated to `DuplicateResponse`, so two concurrent
//!   creates resolve to exactly one success.
//! - Update/delete are conditioned on `id AND user_id` in one statement;
//!   a non-owned or missing row reports `ResponseNotFound` without
//!   leaking whether the row exists for another user.
//! - Summary rows are always recomputed from the join; they are never
//!   persisted.

use crate::model::question::{QuestionCategory, QuestionId};
use crate::model::response::{mood_rating_in_range, Response, ResponseId};
use crate::model::summary::DailySummary;
use crate::repo::{
    date_to_db, ensure_connection_ready, is_foreign_key_violation, is_unique_violation,
    parse_db_date, RepoError, RepoResult,
};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const RESPONSE_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    question_id,
    content,
    word_count,
    mood_rating,
    response_date,
    created_at,
    updated_at
FROM responses";

const SUMMARY_SELECT_SQL: &str = "SELECT
    dq.assigned_date,
    q.uuid AS question_id,
    q.text AS question_text,
    q.category,
    r.id AS response_id,
    r.content AS response_content,
    r.word_count,
    r.mood_rating,
    r.created_at AS responded_at
FROM daily_questions dq
INNER JOIN questions q ON q.uuid = dq.question_id
LEFT JOIN responses r
    ON r.response_date = dq.assigned_date
    AND r.user_id = ?1";

const SUMMARY_COUNT_SQL: &str = "SELECT COUNT(*)
FROM daily_questions dq
INNER JOIN questions q ON q.uuid = dq.question_id
LEFT JOIN responses r
    ON r.response_date = dq.assigned_date
    AND r.user_id = ?1";

/// Insert model for a new response.
///
/// `content` is expected pre-trimmed and `word_count` pre-derived by the
/// service layer; the repository persists them as given after model
/// validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResponse {
    pub user_id: String,
    pub question_id: QuestionId,
    pub content: String,
    pub word_count: u32,
    pub mood_rating: Option<u8>,
    pub response_date: NaiveDate,
}

/// Sort direction for summary listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Oldest date first.
    #[default]
    Ascending,
    /// Newest date first.
    Descending,
}

/// Query options for per-day summary listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryQuery {
    /// Inclusive lower date bound.
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub to: Option<NaiveDate>,
    /// Restrict to one question category.
    pub category: Option<QuestionCategory>,
    /// Keep only dates the user has answered.
    pub completed_only: bool,
    /// Date ordering of the result.
    pub order: SortOrder,
    /// Maximum rows to return. `None` returns all matching rows.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

/// Repository interface for response persistence and summary reads.
pub trait ResponseRepository {
    /// Inserts one response. The unique `(user, date)` index arbitrates
    /// concurrent duplicates.
    fn insert_response(&self, response: &NewResponse) -> RepoResult<ResponseId>;
    /// Replaces content/word count/mood for an owned response.
    fn update_response(
        &self,
        user_id: &str,
        id: ResponseId,
        content: &str,
        word_count: u32,
        mood_rating: Option<u8>,
    ) -> RepoResult<()>;
    /// Deletes an owned response. A second delete reports `ResponseNotFound`.
    fn delete_response(&self, user_id: &str, id: ResponseId) -> RepoResult<()>;
    /// Gets one owned response by id.
    fn get_response(&self, user_id: &str, id: ResponseId) -> RepoResult<Option<Response>>;
    /// Gets the owned response for a calendar date, if any.
    fn get_response_for_date(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> RepoResult<Option<Response>>;
    /// Gets the joined per-day summary row for one date, if assigned.
    fn get_summary(&self, user_id: &str, date: NaiveDate) -> RepoResult<Option<DailySummary>>;
    /// Lists joined per-day summary rows for one user.
    fn list_summaries(&self, user_id: &str, query: &SummaryQuery)
        -> RepoResult<Vec<DailySummary>>;
    /// Counts summary rows matching the query filters, ignoring
    /// pagination, so paged callers can tell whether more rows remain.
    fn count_summaries(&self, user_id: &str, query: &SummaryQuery) -> RepoResult<u64>;
}

/// SQLite-backed response repository.
pub struct SqliteResponseRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteResponseRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[
                (
                    "responses",
                    &[
                        "id",
                        "user_id",
                        "question_id",
                        "content",
                        "word_count",
                        "mood_rating",
                        "response_date",
                    ],
                ),
                ("daily_questions", &["question_id", "assigned_date"]),
                ("questions", &["uuid", "text", "category"]),
            ],
        )?;
        Ok(Self { conn })
    }
}

impl ResponseRepository for SqliteResponseRepository<'_> {
    fn insert_response(&self, response: &NewResponse) -> RepoResult<ResponseId> {
        validate_new_response(response)?;

        let result = self.conn.execute(
            "INSERT INTO responses (
                user_id,
                question_id,
                content,
                word_count,
                mood_rating,
                response_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                response.user_id.as_str(),
                response.question_id.to_string(),
                response.content.as_str(),
                i64::from(response.word_count),
                response.mood_rating.map(i64::from),
                date_to_db(response.response_date),
            ],
        );

        match result {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(err) if is_unique_violation(&err) => Err(RepoError::DuplicateResponse {
                date: response.response_date,
            }),
            Err(err) if is_foreign_key_violation(&err) => {
                Err(RepoError::QuestionNotFound(response.question_id))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn update_response(
        &self,
        user_id: &str,
        id: ResponseId,
        content: &str,
        word_count: u32,
        mood_rating: Option<u8>,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE responses
             SET
                content = ?3,
                word_count = ?4,
                mood_rating = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1
               AND user_id = ?2;",
            params![
                id,
                user_id,
                content,
                i64::from(word_count),
                mood_rating.map(i64::from),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::ResponseNotFound(id));
        }

        Ok(())
    }

    fn delete_response(&self, user_id: &str, id: ResponseId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM responses WHERE id = ?1 AND user_id = ?2;",
            params![id, user_id],
        )?;

        if changed == 0 {
            return Err(RepoError::ResponseNotFound(id));
        }

        Ok(())
    }

    fn get_response(&self, user_id: &str, id: ResponseId) -> RepoResult<Option<Response>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RESPONSE_SELECT_SQL} WHERE id = ?1 AND user_id = ?2;"
        ))?;

        let mut rows = stmt.query(params![id, user_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_response_row(row)?));
        }
        Ok(None)
    }

    fn get_response_for_date(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> RepoResult<Option<Response>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RESPONSE_SELECT_SQL} WHERE user_id = ?1 AND response_date = ?2;"
        ))?;

        let mut rows = stmt.query(params![user_id, date_to_db(date)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_response_row(row)?));
        }
        Ok(None)
    }

    fn get_summary(&self, user_id: &str, date: NaiveDate) -> RepoResult<Option<DailySummary>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SUMMARY_SELECT_SQL} WHERE dq.assigned_date = ?2;"))?;

        let mut rows = stmt.query(params![user_id, date_to_db(date)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_summary_row(row)?));
        }
        Ok(None)
    }

    fn list_summaries(
        &self,
        user_id: &str,
        query: &SummaryQuery,
    ) -> RepoResult<Vec<DailySummary>> {
        let mut sql = format!("{SUMMARY_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = vec![Value::Text(user_id.to_string())];
        push_summary_filters(&mut sql, &mut bind_values, query);

        match query.order {
            SortOrder::Ascending => sql.push_str(" ORDER BY dq.assigned_date ASC"),
            SortOrder::Descending => sql.push_str(" ORDER BY dq.assigned_date DESC"),
        }

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut summaries = Vec::new();
        while let Some(row) = rows.next()? {
            summaries.push(parse_summary_row(row)?);
        }
        Ok(summaries)
    }

    fn count_summaries(&self, user_id: &str, query: &SummaryQuery) -> RepoResult<u64> {
        let mut sql = format!("{SUMMARY_COUNT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = vec![Value::Text(user_id.to_string())];
        push_summary_filters(&mut sql, &mut bind_values, query);

        let mut stmt = self.conn.prepare(&sql)?;
        let count: i64 = stmt.query_row(params_from_iter(bind_values), |row| row.get(0))?;
        u64::try_from(count).map_err(|_| {
            RepoError::InvalidData(format!("negative summary count `{count}` from COUNT(*)"))
        })
    }
}

// Filter clauses shared by the listing and counting queries; pagination
// and ordering stay out so both run against the same row set.
fn push_summary_filters(sql: &mut String, bind_values: &mut Vec<Value>, query: &SummaryQuery) {
    if let Some(from) = query.from {
        sql.push_str(" AND dq.assigned_date >= ?");
        bind_values.push(Value::Text(date_to_db(from)));
    }
    if let Some(to) = query.to {
        sql.push_str(" AND dq.assigned_date <= ?");
        bind_values.push(Value::Text(date_to_db(to)));
    }
    if let Some(category) = query.category {
        sql.push_str(" AND q.category = ?");
        bind_values.push(Value::Text(category.as_db_str().to_string()));
    }
    if query.completed_only {
        sql.push_str(" AND r.id IS NOT NULL");
    }
}

fn validate_new_response(response: &NewResponse) -> RepoResult<()> {
    use crate::model::response::ResponseValidationError;

    if response.content.trim().is_empty() {
        return Err(ResponseValidationError::EmptyContent.into());
    }
    if let Some(rating) = response.mood_rating {
        if !mood_rating_in_range(rating) {
            return Err(ResponseValidationError::MoodRatingOutOfRange(rating).into());
        }
    }
    Ok(())
}

fn parse_response_row(row: &Row<'_>) -> RepoResult<Response> {
    let question_id_text: String = row.get("question_id")?;
    let question_id = Uuid::parse_str(&question_id_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{question_id_text}` in responses.question_id"
        ))
    })?;

    let date_text: String = row.get("response_date")?;
    let response_date = parse_db_date(&date_text, "responses.response_date")?;

    Ok(Response {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        question_id,
        content: row.get("content")?,
        word_count: parse_word_count(row.get("word_count")?)?,
        mood_rating: parse_mood(row.get("mood_rating")?)?,
        response_date,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_summary_row(row: &Row<'_>) -> RepoResult<DailySummary> {
    let date_text: String = row.get("assigned_date")?;
    let assigned_date = parse_db_date(&date_text, "daily_questions.assigned_date")?;

    let question_id_text: String = row.get("question_id")?;
    let question_id = Uuid::parse_str(&question_id_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{question_id_text}` in questions.uuid"
        ))
    })?;

    let category_text: String = row.get("category")?;
    let category = QuestionCategory::from_db_str(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in questions.category"
        ))
    })?;

    let word_count = match row.get::<_, Option<i64>>("word_count")? {
        Some(value) => Some(parse_word_count(value)?),
        None => None,
    };

    Ok(DailySummary {
        assigned_date,
        question_id,
        question_text: row.get("question_text")?,
        category,
        response_id: row.get("response_id")?,
        response_content: row.get("response_content")?,
        word_count,
        mood_rating: parse_mood(row.get("mood_rating")?)?,
        responded_at: row.get("responded_at")?,
    })
}

fn parse_word_count(value: i64) -> RepoResult<u32> {
    u32::try_from(value).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid word_count value `{value}` in responses.word_count"
        ))
    })
}

fn parse_mood(value: Option<i64>) -> RepoResult<Option<u8>> {
    match value {
        None => Ok(None),
        Some(raw) => {
            let rating = u8::try_from(raw)
                .ok()
                .filter(|rating| mood_rating_in_range(*rating))
                .ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "invalid mood_rating value `{raw}` in responses.mood_rating"
                    ))
                })?;
            Ok(Some(rating))
        }
    }
}
