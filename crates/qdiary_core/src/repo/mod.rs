//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes enforce model validation before SQL mutations.
//! - Uniqueness and ownership invariants are enforced by the store
//!   itself (unique indexes, predicate-scoped writes), never by
//!   check-then-act sequences in application code.
//! - Native constraint conflicts are translated to semantic errors
//!   (`DuplicateResponse`, `DuplicateAssignment`) before they reach
//!   callers.

use crate::db::{migrations::latest_version, DbError};
use crate::model::question::{QuestionId, QuestionValidationError};
use crate::model::response::{ResponseId, ResponseValidationError};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod question_repo;
pub mod response_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Question model invariant violated before persistence.
    QuestionValidation(QuestionValidationError),
    /// Response model invariant violated before persistence.
    ResponseValidation(ResponseValidationError),
    /// Transport/storage failure.
    Db(DbError),
    /// A response already exists for this (user, date) pair.
    DuplicateResponse { date: NaiveDate },
    /// A question is already assigned to this date.
    DuplicateAssignment { date: NaiveDate },
    /// No question with this id.
    QuestionNotFound(QuestionId),
    /// No response with this id owned by the requesting user.
    ResponseNotFound(ResponseId),
    /// Persisted state failed to parse back into the domain model.
    InvalidData(String),
    /// Store stayed busy/locked past the busy timeout. Retry policy is
    /// left to the caller; only reads are safe to retry automatically.
    StoreBusy,
    /// Connection schema version does not match this binary.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Connection is missing a required table.
    MissingRequiredTable(&'static str),
    /// Connection is missing a required column.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuestionValidation(err) => write!(f, "{err}"),
            Self::ResponseValidation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateResponse { date } => {
                write!(f, "a response already exists for {date}")
            }
            Self::DuplicateAssignment { date } => {
                write!(f, "a question is already assigned for {date}")
            }
            Self::QuestionNotFound(id) => write!(f, "question not found: {id}"),
            Self::ResponseNotFound(id) => write!(f, "response not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::StoreBusy => write!(f, "store busy past the configured timeout"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::QuestionValidation(err) => Some(err),
            Self::ResponseValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<QuestionValidationError> for RepoError {
    fn from(value: QuestionValidationError) -> Self {
        Self::QuestionValidation(value)
    }
}

impl From<ResponseValidationError> for RepoError {
    fn from(value: ResponseValidationError) -> Self {
        Self::ResponseValidation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if is_busy(&value) {
            return Self::StoreBusy;
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Returns whether a SQLite error is a busy/locked condition.
fn is_busy(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if matches!(
                failure.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            )
    )
}

/// Returns whether a SQLite error reports a unique-constraint conflict.
///
/// Checks the extended code so other constraint classes (checks, foreign
/// keys) are not misreported as duplicates.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == rusqlite::ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Returns whether a SQLite error reports a foreign-key violation.
pub(crate) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == rusqlite::ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

/// Verifies that a connection carries the schema this binary expects.
///
/// Repositories call this from their constructors so that later queries
/// can assume tables/columns exist.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    tables: &[(&'static str, &[&'static str])],
) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for (table, columns) in tables {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for column in *columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

/// Canonical TEXT encoding of a calendar date (`YYYY-MM-DD`).
pub(crate) fn date_to_db(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses the canonical TEXT date encoding, rejecting malformed rows.
pub(crate) fn parse_db_date(value: &str, context: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| RepoError::InvalidData(format!("invalid date value `{value}` in {context}")))
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
