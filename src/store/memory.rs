use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ResumeStore, StoreError, UserStore};
use crate::auth::repo_types::{NewUser, User};
use crate::config::DeletePolicy;
use crate::resumes::repo_types::{NewResume, Resume, ResumeChanges};

#[derive(Debug, Clone)]
struct StoredResume {
    resume: Resume,
    deleted_at: Option<OffsetDateTime>,
}

impl StoredResume {
    fn visible_to(&self, owner: Uuid) -> bool {
        self.deleted_at.is_none() && self.resume.user_id == owner
    }
}

/// In-process store with the same visibility rules as [`super::PgStore`].
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    resumes: RwLock<HashMap<Uuid, StoredResume>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows physically held, tombstones included.
    pub async fn stored_resume_count(&self) -> usize {
        self.resumes.read().await.len()
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new.email) {
            return Err(StoreError::DuplicateEmail);
        }
        let user = User {
            id: Uuid::new_v4(),
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            password_hash: new.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl ResumeStore for MemoryStore {
    async fn create_resume(&self, new: NewResume) -> Result<Resume, StoreError> {
        let now = OffsetDateTime::now_utc();
        let resume = Resume {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            title: new.title,
            content: new.content,
            created_at: now,
            updated_at: now,
        };
        self.resumes.write().await.insert(
            resume.id,
            StoredResume {
                resume: resume.clone(),
                deleted_at: None,
            },
        );
        Ok(resume)
    }

    async fn list_resumes(&self, owner: Uuid) -> Result<Vec<Resume>, StoreError> {
        let resumes = self.resumes.read().await;
        let mut out: Vec<Resume> = resumes
            .values()
            .filter(|r| r.visible_to(owner))
            .map(|r| r.resume.clone())
            .collect();
        out.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(out)
    }

    async fn get_resume(&self, owner: Uuid, id: Uuid) -> Result<Option<Resume>, StoreError> {
        let resumes = self.resumes.read().await;
        Ok(resumes
            .get(&id)
            .filter(|r| r.visible_to(owner))
            .map(|r| r.resume.clone()))
    }

    async fn update_resume(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: ResumeChanges,
    ) -> Result<Option<Resume>, StoreError> {
        let mut resumes = self.resumes.write().await;
        let Some(stored) = resumes.get_mut(&id).filter(|r| r.visible_to(owner)) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            stored.resume.title = title;
        }
        if let Some(content) = changes.content {
            stored.resume.content = content;
        }
        stored.resume.updated_at = OffsetDateTime::now_utc();
        Ok(Some(stored.resume.clone()))
    }

    async fn delete_resume(
        &self,
        owner: Uuid,
        id: Uuid,
        policy: DeletePolicy,
    ) -> Result<bool, StoreError> {
        let mut resumes = self.resumes.write().await;
        if !resumes.get(&id).is_some_and(|r| r.visible_to(owner)) {
            return Ok(false);
        }
        match policy {
            DeletePolicy::Hard => {
                resumes.remove(&id);
            }
            DeletePolicy::Soft => {
                if let Some(r) = resumes.get_mut(&id) {
                    r.deleted_at = Some(OffsetDateTime::now_utc());
                }
            }
        }
        Ok(true)
    }
}
