//! `PgStore` against a real PostgreSQL database.
//!
//! Each test gets a fresh database with `./migrations` applied. They need
//! `DATABASE_URL` and run with `cargo test -- --ignored`.

use resume_vault::auth::repo_types::NewUser;
use resume_vault::config::DeletePolicy;
use resume_vault::resumes::repo_types::{NewResume, ResumeChanges};
use resume_vault::store::{PgStore, ResumeStore, StoreError, UserStore};
use sqlx::PgPool;
use uuid::Uuid;

fn new_user(email: &str) -> NewUser {
    NewUser {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: email.into(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".into(),
    }
}

fn new_resume(owner: Uuid, title: &str) -> NewResume {
    NewResume {
        user_id: owner,
        title: title.into(),
        content: "body".into(),
    }
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT count(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_email_is_reported_and_one_row_kept(pool: PgPool) {
    let store = PgStore::new(pool.clone());

    store.create_user(new_user("dup@example.com")).await.unwrap();
    let err = store.create_user(new_user("dup@example.com")).await.unwrap_err();

    assert!(matches!(err, StoreError::DuplicateEmail), "{err:?}");
    assert_eq!(count(&pool, "users").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn committed_resume_is_visible_to_owner_only(pool: PgPool) {
    let store = PgStore::new(pool.clone());
    let owner = store.create_user(new_user("a@example.com")).await.unwrap();
    let other = store.create_user(new_user("b@example.com")).await.unwrap();

    let r = store.create_resume(new_resume(owner.id, "Draft")).await.unwrap();
    assert_eq!(r.user_id, owner.id);

    let listed = store.list_resumes(owner.id).await.unwrap();
    assert_eq!(listed, vec![r.clone()]);
    assert!(store.get_resume(other.id, r.id).await.unwrap().is_none());
    assert!(store.list_resumes(other.id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn failed_insert_rolls_back(pool: PgPool) {
    let store = PgStore::new(pool.clone());
    let owner = store.create_user(new_user("a@example.com")).await.unwrap();

    // owner row missing: foreign key violation inside the transaction
    let err = store
        .create_resume(new_resume(Uuid::new_v4(), "Orphan"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Backend(_)), "{err:?}");

    // blank title: check constraint violation
    let err = store.create_resume(new_resume(owner.id, "  ")).await.unwrap_err();
    assert!(matches!(err, StoreError::Backend(_)), "{err:?}");

    assert_eq!(count(&pool, "resumes").await, 0);
    assert!(store.list_resumes(owner.id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn partial_update_and_delete_policies(pool: PgPool) {
    let store = PgStore::new(pool.clone());
    let owner = store.create_user(new_user("a@example.com")).await.unwrap();

    let soft = store.create_resume(new_resume(owner.id, "Soft")).await.unwrap();
    let hard = store.create_resume(new_resume(owner.id, "Hard")).await.unwrap();

    let changes = ResumeChanges {
        title: Some("Soft v2".into()),
        content: None,
    };
    let updated = store.update_resume(owner.id, soft.id, changes).await.unwrap().unwrap();
    assert_eq!(updated.title, "Soft v2");
    assert_eq!(updated.content, "body");

    assert!(store.delete_resume(owner.id, soft.id, DeletePolicy::Soft).await.unwrap());
    assert!(store.delete_resume(owner.id, hard.id, DeletePolicy::Hard).await.unwrap());

    assert!(store.list_resumes(owner.id).await.unwrap().is_empty());
    assert!(!store.delete_resume(owner.id, soft.id, DeletePolicy::Hard).await.unwrap());
    // the tombstone stays, the hard-deleted row is gone
    assert_eq!(count(&pool, "resumes").await, 1);
}
