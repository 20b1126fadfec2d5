use chrono::NaiveDate;
use qdiary_core::db::open_db_in_memory;
use qdiary_core::{
    Difficulty, Question, QuestionCategory, QuestionRepository, RepoError, ResponseService,
    ResponseServiceError, SqliteQuestionRepository, SqliteResponseRepository,
};
use rusqlite::Connection;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn seed_question(conn: &Connection) -> Question {
    let repo = SqliteQuestionRepository::try_new(conn).unwrap();
    let question = Question::new(
        "What are you grateful for today?",
        QuestionCategory::Gratitude,
        Difficulty::Easy,
    );
    repo.insert_question(&question).unwrap();
    question
}

#[test]
fn create_trims_content_and_derives_word_count() {
    let conn = open_db_in_memory().unwrap();
    let question = seed_question(&conn);
    let service = ResponseService::new(SqliteResponseRepository::try_new(&conn).unwrap());

    let response = service
        .create_response("user-a", question.uuid, date(2024, 1, 1), "  a b c  ", Some(7))
        .unwrap();

    assert_eq!(response.content, "a b c");
    assert_eq!(response.word_count, 3);
    assert_eq!(response.mood_rating, Some(7));
    assert_eq!(response.response_date, date(2024, 1, 1));
    assert_eq!(response.user_id, "user-a");
}

#[test]
fn whitespace_only_content_fails_before_any_store_call() {
    let conn = open_db_in_memory().unwrap();
    let question = seed_question(&conn);
    let service = ResponseService::new(SqliteResponseRepository::try_new(&conn).unwrap());

    let err = service
        .create_response("user-a", question.uuid, date(2024, 1, 1), "   ", None)
        .unwrap_err();
    assert!(matches!(err, ResponseServiceError::InvalidContent));

    // Nothing was written.
    assert!(service
        .get_response_for_date("user-a", date(2024, 1, 1))
        .unwrap()
        .is_none());
}

#[test]
fn mood_rating_boundaries_are_inclusive() {
    let conn = open_db_in_memory().unwrap();
    let question = seed_question(&conn);
    let service = ResponseService::new(SqliteResponseRepository::try_new(&conn).unwrap());

    service
        .create_response("user-a", question.uuid, date(2024, 1, 1), "low end", Some(1))
        .unwrap();
    service
        .create_response("user-a", question.uuid, date(2024, 1, 2), "high end", Some(10))
        .unwrap();

    let low_err = service
        .create_response("user-a", question.uuid, date(2024, 1, 3), "too low", Some(0))
        .unwrap_err();
    assert!(matches!(low_err, ResponseServiceError::InvalidMoodRating(0)));

    let high_err = service
        .create_response("user-a", question.uuid, date(2024, 1, 3), "too high", Some(11))
        .unwrap_err();
    assert!(matches!(
        high_err,
        ResponseServiceError::InvalidMoodRating(11)
    ));

    // Absent mood is accepted.
    service
        .create_response("user-a", question.uuid, date(2024, 1, 3), "no mood", None)
        .unwrap();
}

#[test]
fn second_create_for_same_day_reports_already_answered() {
    let conn = open_db_in_memory().unwrap();
    let question = seed_question(&conn);
    let service = ResponseService::new(SqliteResponseRepository::try_new(&conn).unwrap());

    service
        .create_response("user-a", question.uuid, date(2024, 1, 1), "first", None)
        .unwrap();

    let err = service
        .create_response("user-a", question.uuid, date(2024, 1, 1), "second", None)
        .unwrap_err();
    assert!(
        matches!(err, ResponseServiceError::AlreadyAnswered(d) if d == date(2024, 1, 1)),
        "unexpected error: {err}"
    );

    // The first write is untouched.
    let stored = service
        .get_response_for_date("user-a", date(2024, 1, 1))
        .unwrap()
        .unwrap();
    assert_eq!(stored.content, "first");
}

#[test]
fn same_date_different_users_both_succeed() {
    let conn = open_db_in_memory().unwrap();
    let question = seed_question(&conn);
    let service = ResponseService::new(SqliteResponseRepository::try_new(&conn).unwrap());

    service
        .create_response("user-a", question.uuid, date(2024, 1, 1), "from a", None)
        .unwrap();
    service
        .create_response("user-b", question.uuid, date(2024, 1, 1), "from b", None)
        .unwrap();
}

#[test]
fn update_recomputes_word_count_and_preserves_identity() {
    let conn = open_db_in_memory().unwrap();
    let question = seed_question(&conn);
    let service = ResponseService::new(SqliteResponseRepository::try_new(&conn).unwrap());

    let created = service
        .create_response("user-a", question.uuid, date(2024, 1, 1), "one two", Some(5))
        .unwrap();

    let updated = service
        .update_response("user-a", created.id, "  one two three four  ", Some(9))
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.response_date, created.response_date);
    assert_eq!(updated.content, "one two three four");
    assert_eq!(updated.word_count, 4);
    assert_eq!(updated.mood_rating, Some(9));
    assert_eq!(updated.created_at, created.created_at);
}

#[test]
fn update_can_clear_mood_rating() {
    let conn = open_db_in_memory().unwrap();
    let question = seed_question(&conn);
    let service = ResponseService::new(SqliteResponseRepository::try_new(&conn).unwrap());

    let created = service
        .create_response("user-a", question.uuid, date(2024, 1, 1), "rated", Some(6))
        .unwrap();

    let updated = service
        .update_response("user-a", created.id, "rated no more", None)
        .unwrap();
    assert_eq!(updated.mood_rating, None);
}

#[test]
fn cross_user_update_and_delete_report_not_found() {
    let conn = open_db_in_memory().unwrap();
    let question = seed_question(&conn);
    let service = ResponseService::new(SqliteResponseRepository::try_new(&conn).unwrap());

    let owned = service
        .create_response("user-a", question.uuid, date(2024, 1, 1), "mine", Some(8))
        .unwrap();

    let update_err = service
        .update_response("user-b", owned.id, "stolen", None)
        .unwrap_err();
    assert!(matches!(update_err, ResponseServiceError::NotFound(id) if id == owned.id));

    let delete_err = service.delete_response("user-b", owned.id).unwrap_err();
    assert!(matches!(delete_err, ResponseServiceError::NotFound(id) if id == owned.id));

    // The row is unchanged for the owner.
    let stored = service
        .get_response_for_date("user-a", date(2024, 1, 1))
        .unwrap()
        .unwrap();
    assert_eq!(stored.content, "mine");
    assert_eq!(stored.mood_rating, Some(8));
}

#[test]
fn second_delete_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let question = seed_question(&conn);
    let service = ResponseService::new(SqliteResponseRepository::try_new(&conn).unwrap());

    let created = service
        .create_response("user-a", question.uuid, date(2024, 1, 1), "to remove", None)
        .unwrap();

    service.delete_response("user-a", created.id).unwrap();
    let err = service.delete_response("user-a", created.id).unwrap_err();
    assert!(matches!(err, ResponseServiceError::NotFound(id) if id == created.id));

    // The day is answerable again after the delete.
    service
        .create_response("user-a", question.uuid, date(2024, 1, 1), "again", None)
        .unwrap();
}

#[test]
fn update_validation_matches_create() {
    let conn = open_db_in_memory().unwrap();
    let question = seed_question(&conn);
    let service = ResponseService::new(SqliteResponseRepository::try_new(&conn).unwrap());

    let created = service
        .create_response("user-a", question.uuid, date(2024, 1, 1), "valid", None)
        .unwrap();

    let content_err = service
        .update_response("user-a", created.id, "   ", None)
        .unwrap_err();
    assert!(matches!(content_err, ResponseServiceError::InvalidContent));

    let mood_err = service
        .update_response("user-a", created.id, "still valid", Some(11))
        .unwrap_err();
    assert!(matches!(
        mood_err,
        ResponseServiceError::InvalidMoodRating(11)
    ));
}

#[test]
fn create_against_unknown_question_reports_question_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = ResponseService::new(SqliteResponseRepository::try_new(&conn).unwrap());

    let phantom = uuid::Uuid::new_v4();
    let err = service
        .create_response("user-a", phantom, date(2024, 1, 1), "orphan", None)
        .unwrap_err();
    assert!(matches!(
        err,
        ResponseServiceError::Repo(RepoError::QuestionNotFound(id)) if id == phantom
    ));
}

#[test]
fn concurrent_double_submit_yields_one_success_one_conflict() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("race.db");

    // Seed through one connection, then race two writers on their own
    // connections; the unique index must arbitrate.
    let question = {
        let conn = qdiary_core::db::open_db(&path).unwrap();
        seed_question(&conn)
    };

    let mut handles = Vec::new();
    for submission in ["first submit", "second submit"] {
        let path = path.clone();
        let question_id = question.uuid;
        handles.push(std::thread::spawn(move || {
            let conn = qdiary_core::db::open_db(&path).unwrap();
            let service =
                ResponseService::new(SqliteResponseRepository::try_new(&conn).unwrap());
            service.create_response("user-a", question_id, date(2024, 1, 1), submission, None)
        }));
    }

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    let successes = results.iter().filter(|result| result.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|result| {
            matches!(result, Err(ResponseServiceError::AlreadyAnswered(d)) if *d == date(2024, 1, 1))
        })
        .count();
    assert_eq!(successes, 1, "exactly one submit must win");
    assert_eq!(conflicts, 1, "the loser must see AlreadyAnswered");
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteResponseRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}
