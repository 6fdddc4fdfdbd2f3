use std::sync::Arc;

use chrono::{Duration, Utc};
use sea_orm::{DatabaseBackend, DbConn, MockDatabase, MockExecResult};
use uuid::Uuid;

use blog_core::domain::BlogDraft;
use blog_core::ports::{BaseRepository, BlogRepository};

use crate::database::entity::blog_post;
use crate::database::postgres_repo::PostgresBlogRepository;

fn model(title: &str, age_minutes: i64) -> blog_post::Model {
    let at = Utc::now() - Duration::minutes(age_minutes);
    blog_post::Model {
        id: Uuid::new_v4(),
        title: title.to_owned(),
        content: "Content".to_owned(),
        author: "Author".to_owned(),
        created_at: at.into(),
        updated_at: at.into(),
    }
}

fn draft(title: &str) -> BlogDraft {
    BlogDraft {
        title: title.to_owned(),
        content: "Content".to_owned(),
        author: "Author".to_owned(),
    }
}

fn mock_repo(db: MockDatabase) -> (PostgresBlogRepository, Arc<DbConn>) {
    let conn = Arc::new(db.into_connection());
    (PostgresBlogRepository::new(Arc::clone(&conn)), conn)
}

/// SQL of every statement the repository sent, in order.
fn sent_sql(repo: PostgresBlogRepository, conn: Arc<DbConn>) -> Vec<String> {
    drop(repo);
    Arc::try_unwrap(conn)
        .ok()
        .expect("connection still shared")
        .into_transaction_log()
        .iter()
        .flat_map(|txn| txn.statements().iter().map(|stmt| stmt.sql.clone()))
        .collect()
}

#[tokio::test]
async fn test_find_post_by_id() {
    let row = model("Test Post", 0);
    let (repo, conn) = mock_repo(
        MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![row.clone()]]),
    );

    let post = repo.find_by_id(&row.id.to_string()).await.unwrap().unwrap();
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, row.id.to_string());

    let sql = sent_sql(repo, conn);
    assert_eq!(sql.len(), 1);
    assert!(sql[0].contains(r#"WHERE "blog_posts"."id" = $1"#), "{}", sql[0]);
}

#[tokio::test]
async fn test_find_missing_post() {
    let (repo, _conn) = mock_repo(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<blog_post::Model>::new()]),
    );

    assert!(
        repo.find_by_id(&Uuid::new_v4().to_string())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_non_uuid_ids_never_reach_the_database() {
    let (repo, conn) = mock_repo(MockDatabase::new(DatabaseBackend::Postgres));

    assert!(repo.find_by_id("not-an-id").await.unwrap().is_none());
    assert!(
        repo.update("65f0c1e2a9b8c7d6e5f4a3b2", draft("t"), Utc::now())
            .await
            .unwrap()
            .is_none()
    );
    assert!(!repo.delete("not-an-id").await.unwrap());

    assert!(sent_sql(repo, conn).is_empty());
}

#[tokio::test]
async fn test_list_orders_by_created_at_desc() {
    let (repo, conn) = mock_repo(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model("newer", 0), model("older", 5)]]),
    );

    let posts = repo.list_newest_first().await.unwrap();
    assert_eq!(posts.len(), 2);

    let sql = sent_sql(repo, conn);
    assert_eq!(sql.len(), 1);
    assert!(
        sql[0].contains(r#"ORDER BY "blog_posts"."created_at" DESC"#),
        "{}",
        sql[0]
    );
}

#[tokio::test]
async fn test_create_inserts_with_returning() {
    let row = model("Created", 0);
    let (repo, conn) = mock_repo(
        MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![row.clone()]]),
    );

    let stored = repo.create(draft("Created"), Utc::now()).await.unwrap();
    assert_eq!(stored.id, row.id.to_string());
    assert_eq!(stored.created_at, stored.updated_at);

    let sql = sent_sql(repo, conn);
    assert_eq!(sql.len(), 1);
    assert!(sql[0].starts_with(r#"INSERT INTO "blog_posts""#), "{}", sql[0]);
    assert!(sql[0].contains("RETURNING"), "{}", sql[0]);
}

#[tokio::test]
async fn test_update_missing_post_returns_none() {
    let (repo, _conn) = mock_repo(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<blog_post::Model>::new()]),
    );

    let result = repo
        .update(&Uuid::new_v4().to_string(), draft("t"), Utc::now())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_update_is_one_clamped_statement() {
    let mut row = model("A2", 1);
    row.updated_at = Utc::now().into();
    let (repo, conn) = mock_repo(
        MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![row.clone()]]),
    );

    let updated = repo
        .update(&row.id.to_string(), draft("A2"), Utc::now())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "A2");

    let sql = sent_sql(repo, conn);
    assert_eq!(sql.len(), 1);
    let update = &sql[0];
    assert!(update.starts_with(r#"UPDATE "blog_posts" SET"#), "{update}");
    assert!(
        update.contains(r#""updated_at" = GREATEST("created_at", $4)"#),
        "{update}"
    );
    assert!(update.contains(r#"WHERE "blog_posts"."id" = $5"#), "{update}");
    assert!(update.contains("RETURNING"), "{update}");
    assert!(!update.contains(r#""created_at" = "#), "{update}");
}

#[tokio::test]
async fn test_delete_reports_whether_a_row_was_removed() {
    let (repo, conn) = mock_repo(MockDatabase::new(DatabaseBackend::Postgres).append_exec_results(
        [
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ],
    ));
    let id = Uuid::new_v4().to_string();

    assert!(repo.delete(&id).await.unwrap());
    assert!(!repo.delete(&id).await.unwrap());

    let sql = sent_sql(repo, conn);
    assert_eq!(sql.len(), 2);
    assert!(
        sql[0].starts_with(r#"DELETE FROM "blog_posts" WHERE "blog_posts"."id" = $1"#),
        "{}",
        sql[0]
    );
}
