use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::DeletePolicy;
use crate::resumes::repo_types::{NewResume, Resume, ResumeChanges};

/// Insert a resume inside a transaction; nothing is visible unless the commit succeeds.
pub async fn insert(db: &PgPool, new: &NewResume) -> anyhow::Result<Resume> {
    let mut tx = db.begin().await.context("begin tx")?;

    let inserted = sqlx::query_as::<_, Resume>(
        r#"
        INSERT INTO resumes (id, user_id, title, content)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, title, content, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.user_id)
    .bind(&new.title)
    .bind(&new.content)
    .fetch_optional(&mut *tx)
    .await;

    let resume = match inserted {
        Ok(Some(r)) => r,
        Ok(None) => {
            tx.rollback().await.context("rollback tx")?;
            anyhow::bail!("insert resume affected no rows");
        }
        Err(e) => {
            tx.rollback().await.context("rollback tx")?;
            return Err(e).context("insert resume");
        }
    };

    tx.commit().await.context("commit tx")?;
    Ok(resume)
}

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Resume>> {
    let rows = sqlx::query_as::<_, Resume>(
        r#"
        SELECT id, user_id, title, content, created_at, updated_at
        FROM resumes
        WHERE user_id = $1 AND deleted_at IS NULL
        ORDER BY created_at DESC, id
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list resumes by user")?;
    Ok(rows)
}

pub async fn get_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Resume>> {
    let row = sqlx::query_as::<_, Resume>(
        r#"
        SELECT id, user_id, title, content, created_at, updated_at
        FROM resumes
        WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("get resume")?;
    Ok(row)
}

pub async fn update_owned(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    changes: &ResumeChanges,
) -> anyhow::Result<Option<Resume>> {
    let row = sqlx::query_as::<_, Resume>(
        r#"
        UPDATE resumes
           SET title = COALESCE($3, title),
               content = COALESCE($4, content),
               updated_at = now()
         WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
        RETURNING id, user_id, title, content, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(changes.title.as_deref())
    .bind(changes.content.as_deref())
    .fetch_optional(db)
    .await
    .context("update resume")?;
    Ok(row)
}

/// Returns whether a visible row owned by `user_id` was deleted.
pub async fn delete_owned(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    policy: DeletePolicy,
) -> anyhow::Result<bool> {
    let query = match policy {
        DeletePolicy::Hard => {
            r#"
            DELETE FROM resumes
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#
        }
        DeletePolicy::Soft => {
            r#"
            UPDATE resumes
               SET deleted_at = now()
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#
        }
    };
    let done = sqlx::query(query)
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete resume")?;
    Ok(done.rows_affected() > 0)
}
