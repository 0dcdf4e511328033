use game_core::model::{
    CompletionDelta, Feedback, QuizId, Rating, TopicId, UserId, UserLedger,
};
use game_core::time::fixed_now;
use game_core::xp::XpFormula;
use storage::repository::{
    CatalogRepository, CompletionRepository, FeedbackRepository, LedgerRepository, StorageError,
};
use storage::seed::CatalogSnapshot;
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

#[tokio::test]
async fn sqlite_catalog_round_trips_documents() {
    let repo = connect("memdb_catalog").await;
    CatalogSnapshot::sample()
        .unwrap()
        .load_into(&repo)
        .await
        .expect("seed");

    let topics = repo.list_topics().await.unwrap();
    assert_eq!(topics.len(), 2);
    assert_eq!(topics[0].id.as_str(), "rust-ownership");
    assert_eq!(topics[0].quizzes.len(), 2);

    let topic = repo
        .get_topic(&TopicId::new("rust-traits").unwrap())
        .await
        .unwrap()
        .expect("topic");
    assert_eq!(topic.resources.len(), 2);
    assert!(
        repo.get_topic(&TopicId::new("missing").unwrap())
            .await
            .unwrap()
            .is_none()
    );

    let quiz = repo
        .find_quiz(&QuizId::new("lifetimes-intro").unwrap())
        .await
        .unwrap()
        .expect("nested quiz");
    assert_eq!(quiz.questions.len(), 1);
    assert_eq!(quiz.questions[0].correct_option(), "Lives for the whole program");

    assert_eq!(repo.list_resources().await.unwrap().len(), 3);
    assert_eq!(repo.list_challenges().await.unwrap().len(), 2);
    assert_eq!(repo.list_recommendations().await.unwrap().len(), 1);
}

#[tokio::test]
async fn sqlite_rejects_malformed_documents() {
    let repo = connect("memdb_malformed").await;
    sqlx::query(
        r#"
        INSERT INTO topics (id, document, updated_at)
        VALUES ('broken', '{"id":"broken","title":"No quizzes"}', '2023-11-14T22:13:20Z')
        "#,
    )
    .execute(repo.pool())
    .await
    .unwrap();

    let err = repo.list_topics().await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[tokio::test]
async fn sqlite_ledger_applies_xp_atomically() {
    let repo = connect("memdb_ledger").await;
    let ledger = UserLedger::new(user("u1"), 100, fixed_now());
    repo.insert_ledger(&ledger).await.unwrap();
    assert!(matches!(
        repo.insert_ledger(&ledger).await,
        Err(StorageError::Conflict)
    ));

    assert_eq!(
        repo.apply_xp(&user("u1"), 50, XpFormula::Baseline).await.unwrap(),
        Some(150)
    );
    assert_eq!(
        repo.apply_xp(&user("u1"), 10, XpFormula::Baseline).await.unwrap(),
        Some(110)
    );
    assert_eq!(
        repo.apply_xp(&user("u1"), 5, XpFormula::Cumulative).await.unwrap(),
        Some(115)
    );
    assert_eq!(
        repo.apply_xp(&user("nobody"), 5, XpFormula::Baseline).await.unwrap(),
        None
    );

    let (total, required, started_at): (i64, i64, chrono::DateTime<chrono::Utc>) = sqlx::query_as(
        "SELECT user_xp, required_xp, started_at FROM user_levels WHERE user_id = 'u1'",
    )
    .fetch_one(repo.pool())
    .await
    .unwrap();
    assert_eq!(total, 115);
    assert_eq!(required, 100);
    assert_eq!(started_at, fixed_now());
}

#[tokio::test]
async fn sqlite_completion_increments_only_positive_columns() {
    let repo = connect("memdb_completions").await;
    let u = user("u1");

    assert!(
        repo.increment_completions(&u, &CompletionDelta::quizzes(3))
            .await
            .unwrap()
            .is_none()
    );

    repo.ensure_completions(&u).await.unwrap();
    repo.increment_completions(&u, &CompletionDelta::topics(1))
        .await
        .unwrap();
    let record = repo
        .increment_completions(
            &u,
            &CompletionDelta {
                topics: Some(0),
                quizzes: Some(3),
                resources: None,
            },
        )
        .await
        .unwrap()
        .expect("record");

    assert_eq!(record.topics_completed, 1);
    assert_eq!(record.quizzes_completed, 3);
    assert_eq!(record.resources_completed, 0);

    // A second ensure must not reset counters.
    repo.ensure_completions(&u).await.unwrap();
    let again = repo.get_completions(&u).await.unwrap().unwrap();
    assert_eq!(again, record);
}

#[tokio::test]
async fn sqlite_feedback_persists() {
    let repo = connect("memdb_feedback").await;
    let topic = TopicId::new("rust-traits").unwrap();
    let feedback = Feedback::new(
        user("u1"),
        topic.clone(),
        Rating::new(4).unwrap(),
        "Clear examples",
        fixed_now(),
    )
    .unwrap();
    repo.insert_feedback(&feedback).await.unwrap();
    assert!(matches!(
        repo.insert_feedback(&feedback).await,
        Err(StorageError::Conflict)
    ));

    let (id, rating, comment): (String, i64, String) = sqlx::query_as(
        "SELECT id, rating, comment FROM feedbacks WHERE topic_id = ?1",
    )
    .bind(topic.as_str())
    .fetch_one(repo.pool())
    .await
    .unwrap();
    assert_eq!(id, feedback.id().to_string());
    assert_eq!(rating, 4);
    assert_eq!(comment, "Clear examples");
}

#[tokio::test]
async fn sqlite_completion_counters_saturate() {
    let repo = connect("memdb_saturate").await;
    let u = user("u1");
    repo.ensure_completions(&u).await.unwrap();

    repo.increment_completions(&u, &CompletionDelta::quizzes(u32::MAX))
        .await
        .unwrap();
    let record = repo
        .increment_completions(&u, &CompletionDelta::quizzes(5))
        .await
        .unwrap()
        .expect("record");
    assert_eq!(record.quizzes_completed, u32::MAX);

    let stored = repo.get_completions(&u).await.unwrap().unwrap();
    assert_eq!(stored.quizzes_completed, u32::MAX);
    assert_eq!(stored.topics_completed, 0);
}
