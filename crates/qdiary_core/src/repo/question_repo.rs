//! Question catalog and assignment repository.
//!
//! # Responsibility
//! - Persist and look up question catalog entries.
//! - Persist and look up the one-question-per-date assignment map.
//!
//! # Invariants
//! - `daily_questions.assigned_date` is unique; a conflicting insert is
//!   reported as `DuplicateAssignment`, resolved by the store itself.
//! - Catalog listings return active questions only, newest first.

use crate::model::question::{DailyAssignment, Difficulty, Question, QuestionCategory, QuestionId};
use crate::repo::{
    date_to_db, ensure_connection_ready, is_unique_violation, parse_db_date, RepoError, RepoResult,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const QUESTION_SELECT_SQL: &str = "SELECT
    uuid,
    text,
    category,
    difficulty,
    is_active
FROM questions";

const CATALOG_DEFAULT_LIMIT: u32 = 10;

/// Repository interface for the question catalog and daily assignments.
pub trait QuestionRepository {
    /// Inserts one catalog entry. Used by seeding callers and tests.
    fn insert_question(&self, question: &Question) -> RepoResult<QuestionId>;
    /// Gets one catalog entry by id.
    fn get_question(&self, id: QuestionId) -> RepoResult<Option<Question>>;
    /// Lists active catalog entries, newest first, with pagination.
    fn list_active_questions(&self, limit: Option<u32>, offset: u32)
        -> RepoResult<Vec<Question>>;
    /// Assigns a question to a date. At most one assignment per date.
    fn assign_question(&self, date: NaiveDate, question_id: QuestionId) -> RepoResult<()>;
    /// Gets the assignment for a date, if any.
    fn get_assignment(&self, date: NaiveDate) -> RepoResult<Option<DailyAssignment>>;
}

/// SQLite-backed question/assignment repository.
pub struct SqliteQuestionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteQuestionRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[
                (
                    "questions",
                    &["uuid", "text", "category", "difficulty", "is_active"],
                ),
                ("daily_questions", &["question_id", "assigned_date"]),
            ],
        )?;
        Ok(Self { conn })
    }
}

impl QuestionRepository for SqliteQuestionRepository<'_> {
    fn insert_question(&self, question: &Question) -> RepoResult<QuestionId> {
        question.validate()?;

        self.conn.execute(
            "INSERT INTO questions (uuid, text, category, difficulty, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                question.uuid.to_string(),
                question.text.as_str(),
                question.category.as_db_str(),
                question.difficulty.as_db_str(),
                i64::from(question.is_active),
            ],
        )?;

        Ok(question.uuid)
    }

    fn get_question(&self, id: QuestionId) -> RepoResult<Option<Question>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{QUESTION_SELECT_SQL} WHERE uuid = ?1;"))?;
        let question = stmt
            .query_row([id.to_string()], |row| Ok(parse_question_row(row)))
            .optional()?
            .transpose()?;
        Ok(question)
    }

    fn list_active_questions(
        &self,
        limit: Option<u32>,
        offset: u32,
    ) -> RepoResult<Vec<Question>> {
        let mut stmt = self.conn.prepare(&format!(
            "{QUESTION_SELECT_SQL}
             WHERE is_active = 1
             ORDER BY created_at DESC, uuid ASC
             LIMIT ?1 OFFSET ?2;"
        ))?;

        let limit = limit.unwrap_or(CATALOG_DEFAULT_LIMIT);
        let mut rows = stmt.query(params![i64::from(limit), i64::from(offset)])?;
        let mut questions = Vec::new();
        while let Some(row) = rows.next()? {
            questions.push(parse_question_row(row)?);
        }
        Ok(questions)
    }

    fn assign_question(&self, date: NaiveDate, question_id: QuestionId) -> RepoResult<()> {
        let result = self.conn.execute(
            "INSERT INTO daily_questions (question_id, assigned_date)
             VALUES (?1, ?2);",
            params![question_id.to_string(), date_to_db(date)],
        );

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(RepoError::DuplicateAssignment { date })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn get_assignment(&self, date: NaiveDate) -> RepoResult<Option<DailyAssignment>> {
        let mut stmt = self.conn.prepare(
            "SELECT question_id, assigned_date
             FROM daily_questions
             WHERE assigned_date = ?1;",
        )?;

        let row = stmt
            .query_row([date_to_db(date)], |row| {
                Ok((
                    row.get::<_, String>("question_id")?,
                    row.get::<_, String>("assigned_date")?,
                ))
            })
            .optional()?;

        match row {
            Some((question_id, assigned_date)) => Ok(Some(DailyAssignment {
                question_id: parse_question_id(&question_id)?,
                assigned_date: parse_db_date(&assigned_date, "daily_questions.assigned_date")?,
            })),
            None => Ok(None),
        }
    }
}

fn parse_question_row(row: &Row<'_>) -> RepoResult<Question> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_question_id(&uuid_text)?;

    let category_text: String = row.get("category")?;
    let category = QuestionCategory::from_db_str(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in questions.category"
        ))
    })?;

    let difficulty_text: String = row.get("difficulty")?;
    let difficulty = Difficulty::from_db_str(&difficulty_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid difficulty `{difficulty_text}` in questions.difficulty"
        ))
    })?;

    let is_active = match row.get::<_, i64>("is_active")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_active value `{other}` in questions.is_active"
            )));
        }
    };

    Ok(Question {
        uuid,
        text: row.get("text")?,
        category,
        difficulty,
        is_active,
    })
}

fn parse_question_id(value: &str) -> RepoResult<QuestionId> {
    Uuid::parse_str(value).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{value}` in questions.uuid"))
    })
}
