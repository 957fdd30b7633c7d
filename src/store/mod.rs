//! Persistence seam. Handlers only see these traits; the backend is chosen at startup.

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, User};
use crate::config::DeletePolicy;
use crate::resumes::repo_types::{NewResume, Resume, ResumeChanges};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}

/// Every per-record method filters by both `id` and `owner`; a record owned by
/// someone else behaves exactly like a missing one.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn create_resume(&self, new: NewResume) -> Result<Resume, StoreError>;
    async fn list_resumes(&self, owner: Uuid) -> Result<Vec<Resume>, StoreError>;
    async fn get_resume(&self, owner: Uuid, id: Uuid) -> Result<Option<Resume>, StoreError>;
    async fn update_resume(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: ResumeChanges,
    ) -> Result<Option<Resume>, StoreError>;
    async fn delete_resume(
        &self,
        owner: Uuid,
        id: Uuid,
        policy: DeletePolicy,
    ) -> Result<bool, StoreError>;
}

pub trait Store: UserStore + ResumeStore {}

impl<T: UserStore + ResumeStore> Store for T {}
