use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use super::{ResumeStore, StoreError, UserStore};
use crate::auth::repo_types::{NewUser, User};
use crate::config::DeletePolicy;
use crate::resumes::repo;
use crate::resumes::repo_types::{NewResume, Resume, ResumeChanges};

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self::new(db))
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db)
            .await
            .context("run migrations")
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        match User::create(&self.db, &new).await {
            Ok(u) => Ok(u),
            Err(e) if is_unique_violation(&e) => Err(StoreError::DuplicateEmail),
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_email(&self.db, email)
            .await
            .context("find user by email")?)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_id(&self.db, id)
            .await
            .context("find user by id")?)
    }
}

#[async_trait]
impl ResumeStore for PgStore {
    async fn create_resume(&self, new: NewResume) -> Result<Resume, StoreError> {
        Ok(repo::insert(&self.db, &new).await?)
    }

    async fn list_resumes(&self, owner: Uuid) -> Result<Vec<Resume>, StoreError> {
        Ok(repo::list_by_user(&self.db, owner).await?)
    }

    async fn get_resume(&self, owner: Uuid, id: Uuid) -> Result<Option<Resume>, StoreError> {
        Ok(repo::get_owned(&self.db, owner, id).await?)
    }

    async fn update_resume(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: ResumeChanges,
    ) -> Result<Option<Resume>, StoreError> {
        Ok(repo::update_owned(&self.db, owner, id, &changes).await?)
    }

    async fn delete_resume(
        &self,
        owner: Uuid,
        id: Uuid,
        policy: DeletePolicy,
    ) -> Result<bool, StoreError> {
        Ok(repo::delete_owned(&self.db, owner, id, policy).await?)
    }
}
