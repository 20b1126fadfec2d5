use chrono::NaiveDate;
use qdiary_core::db::open_db_in_memory;
use qdiary_core::{
    AssignmentService, Difficulty, Question, QuestionCategory, QuestionRepository, RepoError,
    ResponseService, SqliteQuestionRepository, SqliteResponseRepository,
};
use rusqlite::Connection;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn seed_assigned_question(conn: &Connection, assigned: NaiveDate) -> Question {
    let repo = SqliteQuestionRepository::try_new(conn).unwrap();
    let question = Question::new(
        "What did you learn this week?",
        QuestionCategory::PersonalGrowth,
        Difficulty::Medium,
    );
    repo.insert_question(&question).unwrap();
    repo.assign_question(assigned, question.uuid).unwrap();
    question
}

fn assignment_service(
    conn: &Connection,
) -> AssignmentService<SqliteQuestionRepository<'_>, SqliteResponseRepository<'_>> {
    AssignmentService::new(
        SqliteQuestionRepository::try_new(conn).unwrap(),
        SqliteResponseRepository::try_new(conn).unwrap(),
    )
}

#[test]
fn unassigned_date_resolves_to_none_not_an_error() {
    let conn = open_db_in_memory().unwrap();
    let service = assignment_service(&conn);

    let resolved = service.resolve_today("user-a", date(2024, 1, 1)).unwrap();
    assert!(resolved.is_none());
}

#[test]
fn assigned_but_unanswered_date_has_empty_response_fields() {
    let conn = open_db_in_memory().unwrap();
    let today = date(2024, 1, 1);
    let question = seed_assigned_question(&conn, today);
    let service = assignment_service(&conn);

    let summary = service.resolve_today("user-a", today).unwrap().unwrap();
    assert_eq!(summary.assigned_date, today);
    assert_eq!(summary.question_id, question.uuid);
    assert_eq!(summary.question_text, question.text);
    assert_eq!(summary.category, QuestionCategory::PersonalGrowth);
    assert!(summary.response_id.is_none());
    assert!(summary.response_content.is_none());
    assert!(summary.mood_rating.is_none());
    assert!(!summary.is_completed());
}

#[test]
fn answered_date_carries_the_response_fields() {
    let conn = open_db_in_memory().unwrap();
    let today = date(2024, 1, 1);
    let question = seed_assigned_question(&conn, today);

    let writer = ResponseService::new(SqliteResponseRepository::try_new(&conn).unwrap());
    let created = writer
        .create_response("user-a", question.uuid, today, "today I learned", Some(8))
        .unwrap();

    let service = assignment_service(&conn);
    let summary = service.resolve_today("user-a", today).unwrap().unwrap();
    assert_eq!(summary.response_id, Some(created.id));
    assert_eq!(summary.response_content.as_deref(), Some("today I learned"));
    assert_eq!(summary.word_count, Some(3));
    assert_eq!(summary.mood_rating, Some(8));
    assert!(summary.is_completed());
}

#[test]
fn another_users_answer_stays_invisible() {
    let conn = open_db_in_memory().unwrap();
    let today = date(2024, 1, 1);
    let question = seed_assigned_question(&conn, today);

    let writer = ResponseService::new(SqliteResponseRepository::try_new(&conn).unwrap());
    writer
        .create_response("user-b", question.uuid, today, "someone else", None)
        .unwrap();

    let service = assignment_service(&conn);
    let summary = service.resolve_today("user-a", today).unwrap().unwrap();
    assert!(summary.response_id.is_none(), "user-a has not answered");
}

#[test]
fn resolve_today_is_idempotent_between_writes() {
    let conn = open_db_in_memory().unwrap();
    let today = date(2024, 1, 1);
    let question = seed_assigned_question(&conn, today);

    let writer = ResponseService::new(SqliteResponseRepository::try_new(&conn).unwrap());
    writer
        .create_response("user-a", question.uuid, today, "stable answer", Some(5))
        .unwrap();

    let service = assignment_service(&conn);
    let first = service.resolve_today("user-a", today).unwrap();
    let second = service.resolve_today("user-a", today).unwrap();
    assert_eq!(first, second);
}

#[test]
fn one_assignment_per_date_is_store_enforced() {
    let conn = open_db_in_memory().unwrap();
    let today = date(2024, 1, 1);
    let repo = SqliteQuestionRepository::try_new(&conn).unwrap();

    let first = Question::new("first", QuestionCategory::Goals, Difficulty::Easy);
    let second = Question::new("second", QuestionCategory::Creativity, Difficulty::Hard);
    repo.insert_question(&first).unwrap();
    repo.insert_question(&second).unwrap();

    repo.assign_question(today, first.uuid).unwrap();
    let err = repo.assign_question(today, second.uuid).unwrap_err();
    assert!(matches!(err, RepoError::DuplicateAssignment { date: d } if d == today));

    // The original assignment survives.
    let assignment = repo.get_assignment(today).unwrap().unwrap();
    assert_eq!(assignment.question_id, first.uuid);
}

#[test]
fn catalog_listing_returns_active_questions_only() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteQuestionRepository::try_new(&conn).unwrap();

    let active = Question::new("shown", QuestionCategory::Reflection, Difficulty::Easy);
    let mut inactive = Question::new("hidden", QuestionCategory::Goals, Difficulty::Easy);
    inactive.is_active = false;
    repo.insert_question(&active).unwrap();
    repo.insert_question(&inactive).unwrap();

    let service = assignment_service(&conn);
    let listed = service.list_active_questions(None, 0).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].uuid, active.uuid);
}
